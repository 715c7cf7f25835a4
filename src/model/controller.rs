//! The `Controller`: owns a [`State`], enforces full legality (including
//! self-check), and drives promotion and checkmate detection through a
//! [`Listener`].

use std::io::{Read, Write};

use strum::IntoEnumIterator;

use crate::error::GameError;
use crate::model::event::{self, Event};
use crate::model::listener::Listener;
use crate::model::state::State;
use crate::model::{Colour, PieceKind, Phase, Square};

/// Drives a single game: validates and applies [`Event`]s, asks its
/// [`Listener`] to resolve promotions, and tracks when the game has ended.
pub struct Controller {
    state: State,
    listener: Box<dyn Listener>,
}

impl Controller {
    /// A controller for `state`, reporting through `listener`.
    pub fn new(state: State, listener: Box<dyn Listener>) -> Controller {
        Controller { state, listener }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Attempts to apply `event`. Returns `true` if it was legal and has
    /// been committed; otherwise the state is left unchanged and `false` is
    /// returned. Invalid events are rejected silently — only promotion and
    /// load failures reach the listener's `catch_error`.
    ///
    /// The pipeline, in order: reject if the game has already ended; reject
    /// if the event fails its own local validity check; reject if applying
    /// it would leave the mover's own king in check; commit it; resolve any
    /// pending promotion; hand the turn to the other side; and finally
    /// check whether the new position is checkmate.
    pub fn update(&mut self, event: &Event) -> bool {
        if self.state.phase() != Phase::Running {
            return false;
        }

        if !event.is_valid(&self.state) {
            return false;
        }

        if self.would_event_cause_check(event, self.state.turn()) {
            return false;
        }

        event.apply(&mut self.state);
        self.look_for_promotion();
        self.state.next_turn();
        self.look_for_checkmate();
        true
    }

    /// Whether committing `event` (as `mover`) to a scratch copy of the
    /// state would leave `mover`'s king in check. Simulated on a cloned
    /// [`State`] rather than a cloned `Controller` — the check only needs
    /// the resulting position, not a second listener to narrate it.
    fn would_event_cause_check(&self, event: &Event, mover: Colour) -> bool {
        let mut scratch = self.state.clone();
        event.apply(&mut scratch);
        Self::in_check(&scratch, mover)
    }

    /// Whether `colour`'s king is currently attacked in `state`.
    ///
    /// A missing king is a programmer error, not a game condition the rules
    /// can encounter through legal play or a successfully validated load —
    /// asserted rather than treated as "not in check".
    fn in_check(state: &State, colour: Colour) -> bool {
        let king = state.board().find(PieceKind::King, colour).expect("every reachable position has both kings");
        event::king_is_attacked(state, colour.opposite(), king)
    }

    /// If the piece that just moved is a pawn sitting on the back rank,
    /// asks the listener what to promote it to, reporting
    /// [`GameError::IllegalPromotion`] and asking again for as long as the
    /// listener names something other than a queen, rook, bishop, or
    /// knight.
    fn look_for_promotion(&mut self) {
        for (colour, back_rank) in [(Colour::White, 7u8), (Colour::Black, 0u8)] {
            for file in 0..8u8 {
                let square = Square::from_rank_file(back_rank, file).expect("file in 0..8");
                let piece = self.state.board().get(square);
                if piece.colour == colour && piece.kind == PieceKind::Pawn {
                    let choice = loop {
                        let choice = self.listener.promote_pawn(&self.state, square);
                        if matches!(choice, PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight) {
                            break choice;
                        }
                        self.listener.catch_error(&self.state, GameError::IllegalPromotion);
                    };
                    let mut promoted = piece;
                    promoted.kind = choice;
                    self.state.board_mut().set(square, promoted);
                    self.state.mark_altered(square);
                }
            }
        }
    }

    /// After a turn has passed, checks whether the side to move has any
    /// legal move at all. If not, the other side has won — this engine
    /// doesn't distinguish stalemate from checkmate (§9).
    fn look_for_checkmate(&mut self) {
        let mover = self.state.turn();
        if self.has_any_legal_move(mover) {
            return;
        }
        self.state.set_phase(match mover {
            Colour::White => Phase::BlackWon,
            Colour::Black => Phase::WhiteWon,
        });
    }

    /// Enumerates only `Move` candidates, per §4.5 — `lookForCheckmate`
    /// never constructs a `Castling` event, so a position whose one
    /// non-losing reply is castling is still terminal.
    fn has_any_legal_move(&self, mover: Colour) -> bool {
        for origin in Square::iter() {
            let piece = self.state.board().get(origin);
            if piece.is_empty() || piece.colour != mover {
                continue;
            }
            for dest in Square::iter() {
                let candidate = Event::Move { origin, dest };
                if candidate.is_valid(&self.state) && !self.would_event_cause_check(&candidate, mover) {
                    return true;
                }
            }
        }
        false
    }

    /// Writes the current state using [`State::save`].
    pub fn save<W: Write>(&self, out: W) -> std::io::Result<()> {
        self.state.save(out)
    }

    /// Replaces the current state with one read from `input`. On success,
    /// checkmate is recomputed immediately, since `phase` is never part of
    /// the save format. On failure the current state is left untouched and
    /// the listener is told why.
    pub fn load<R: Read>(&mut self, input: R) -> Result<(), GameError> {
        match State::load(input) {
            Ok(state) => {
                self.state = state;
                self.look_for_checkmate();
                Ok(())
            }
            Err(error) => {
                self.listener.catch_error(&self.state, error);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::listener::SilentListener;

    #[test]
    fn opening_move_succeeds_and_passes_the_turn() {
        let mut controller = Controller::new(State::new(), Box::new(SilentListener));
        assert!(controller.update(&Event::Move { origin: Square::e2, dest: Square::e4 }));
        assert_eq!(controller.state().turn(), Colour::Black);
    }

    #[test]
    fn cannot_move_a_pinned_piece_off_the_pin() {
        use crate::model::{Colour as C, Piece, PieceKind as K};

        let mut controller = Controller::new(State::new(), Box::new(SilentListener));
        {
            let board = controller.state.board_mut();
            *board = crate::model::board::Board::empty();
            board.set(Square::e1, Piece { kind: K::King, colour: C::White });
            board.set(Square::e2, Piece { kind: K::Knight, colour: C::White });
            board.set(Square::e8, Piece { kind: K::Rook, colour: C::Black });
            board.set(Square::a8, Piece { kind: K::King, colour: C::Black });
        }
        assert!(!controller.update(&Event::Move { origin: Square::e2, dest: Square::d4 }));
        assert_eq!(controller.state().board().get(Square::e2).kind, K::Knight);
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut controller = Controller::new(State::new(), Box::new(SilentListener));
        for (origin, dest) in [
            (Square::f2, Square::f3),
            (Square::e7, Square::e5),
            (Square::g2, Square::g4),
        ] {
            assert!(controller.update(&Event::Move { origin, dest }));
        }
        assert!(controller.update(&Event::Move { origin: Square::d8, dest: Square::h4 }));
        assert_eq!(controller.state().phase(), Phase::BlackWon);
    }
}
