//! Game state: the board plus everything needed to know whose move it is,
//! whether an en passant capture is available, and how the game ended.

use std::io::{self, Read, Write};

use chumsky::prelude::*;
use strum::IntoEnumIterator;

use crate::error::GameError;
use crate::model::board::Board;
use crate::model::{Colour, Phase, Piece, PieceKind, Square};

/// Everything about a position that isn't implied by the rules themselves.
///
/// `altered` tracks which squares have ever been written to since the game
/// began — used only to gate castling eligibility, but carried through the
/// save format too so a reloaded game keeps exactly the same rights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    board: Board,
    turn: Colour,
    phase: Phase,
    en_passant_target: Option<Square>,
    altered: [bool; 64],
}

impl State {
    /// A fresh game in the standard starting position, White to move.
    pub fn new() -> State {
        State {
            board: Board::new(),
            turn: Colour::White,
            phase: Phase::Running,
            en_passant_target: None,
            altered: [false; 64],
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn turn(&self) -> Colour {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Sets (or clears) the en passant target square. A `Some` value must
    /// sit on rank 3 or rank 6 — the only ranks a pawn's midpoint can ever
    /// land on — callers that violate this have a bug, not bad input.
    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        if let Some(sq) = target {
            debug_assert!(sq.rank() == 2 || sq.rank() == 5, "en passant target must sit on rank 3 or 6");
        }
        self.en_passant_target = target;
    }

    pub fn is_altered(&self, sq: Square) -> bool {
        self.altered[sq.index() as usize]
    }

    pub fn mark_altered(&mut self, sq: Square) {
        self.altered[sq.index() as usize] = true;
    }

    /// Moves whatever sits on `origin` to `dest`, clearing `origin` and
    /// marking both squares altered. Does not check legality or run
    /// per-kind post-move hooks — callers go through [`crate::model::event`]
    /// for that.
    pub fn move_piece(&mut self, origin: Square, dest: Square) {
        let piece = self.board.get(origin);
        self.board.clear(origin);
        self.board.set(dest, piece);
        self.mark_altered(origin);
        self.mark_altered(dest);
    }

    pub fn next_turn(&mut self) {
        self.turn = self.turn.opposite();
    }

    /// Writes the save format: `version turn enpassant` then one
    /// `square colour kind altered` quadruple per occupied square, terminated
    /// by a lone `-1`. `Phase` is never written — `load` always recomputes
    /// it.
    pub fn save<W: Write>(&self, mut out: W) -> io::Result<()> {
        const VERSION: i32 = 1;
        write!(out, "{} ", VERSION)?;
        write!(out, "{} ", self.turn as i32)?;
        match self.en_passant_target {
            Some(sq) => write!(out, "{} ", sq.index() as i32)?,
            None => write!(out, "{} ", 64)?,
        }
        for sq in Square::iter() {
            let piece = self.board.get(sq);
            if !piece.is_empty() {
                write!(
                    out,
                    "{} {} {} {} ",
                    sq.index() as i32,
                    piece.colour as i32,
                    piece.kind as i32,
                    self.is_altered(sq) as i32
                )?;
            }
        }
        writeln!(out, "-1")
    }

    /// Reads a game previously written by [`State::save`].
    pub fn load<R: Read>(mut input: R) -> Result<State, GameError> {
        let mut text = String::new();
        input.read_to_string(&mut text).map_err(|_| GameError::IoVersion)?;
        Self::load_str(&text)
    }

    /// Parses the save format from a string, applying every validation rule
    /// the format implies: version must be the one this crate writes, the
    /// turn marker must be 0 or 1, the en passant square (if present) must
    /// sit on rank 3 or 6, and every piece record must name an in-range
    /// square with a real colour and kind, with no two records sharing a
    /// square.
    ///
    /// A stream that runs out of numbers, or contains something that isn't
    /// a number, mid-record is reported as `IoVersion` — by that point the
    /// record structure itself, not just one field, is what's broken.
    pub fn load_str(text: &str) -> Result<State, GameError> {
        let numbers = integer_list().parse(text).into_result().map_err(|_| GameError::IoVersion)?;
        let mut rest = numbers.into_iter();

        let version = rest.next().ok_or(GameError::IoVersion)?;
        if version != 1 {
            return Err(GameError::IoVersion);
        }

        let turn = match rest.next().ok_or(GameError::IoVersion)? {
            0 => Colour::White,
            1 => Colour::Black,
            _ => return Err(GameError::IoTurn),
        };

        let en_passant_target = match rest.next().ok_or(GameError::IoVersion)? {
            64 => None,
            n @ 0..=63 => {
                let sq = Square::from_repr(n as u8).ok_or(GameError::IoEnPassant)?;
                if sq.rank() != 2 && sq.rank() != 5 {
                    return Err(GameError::IoEnPassant);
                }
                Some(sq)
            }
            _ => return Err(GameError::IoEnPassant),
        };

        let mut board = Board::empty();
        let mut altered = [false; 64];
        loop {
            let sq_n = rest.next().ok_or(GameError::IoVersion)?;
            if sq_n == -1 {
                break;
            }
            let sq = u8::try_from(sq_n).ok().and_then(Square::from_repr).ok_or(GameError::IoSquare)?;
            if !board.get(sq).is_empty() {
                return Err(GameError::IoSquare);
            }
            let colour = match rest.next().ok_or(GameError::IoVersion)? {
                0 => Colour::White,
                1 => Colour::Black,
                _ => return Err(GameError::IoColour),
            };
            let kind_n = rest.next().ok_or(GameError::IoVersion)?;
            let kind = PieceKind::from_repr(u8::try_from(kind_n).map_err(|_| GameError::IoPieceType)?)
                .filter(|k| *k != PieceKind::None)
                .ok_or(GameError::IoPieceType)?;
            board.set(sq, Piece { kind, colour });
            let altered_n = rest.next().ok_or(GameError::IoVersion)?;
            altered[sq.index() as usize] = altered_n != 0;
        }

        Ok(State {
            board,
            turn,
            phase: Phase::Running,
            en_passant_target,
            altered,
        })
    }
}

impl Default for State {
    fn default() -> Self {
        State::new()
    }
}

/// A whitespace-separated stream of signed integers, possibly negative.
/// Mirrors the `Parsable`-per-notation pattern the FEN/SAN parsers use:
/// one small combinator, `try_map`'d into the concrete type it represents.
fn integer_list<'a>() -> impl Parser<'a, &'a str, Vec<i64>, extra::Err<Rich<'a, char>>> {
    let integer = just('-')
        .or_not()
        .then(text::int(10))
        .to_slice()
        .try_map(|s: &str, span| s.parse::<i64>().map_err(|_| Rich::custom(span, "not an integer")));

    integer
        .padded()
        .repeated()
        .collect()
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_round_trips_through_save_and_load() {
        let state = State::new();
        let mut buf = Vec::new();
        state.save(&mut buf).unwrap();
        let loaded = State::load_str(std::str::from_utf8(&buf).unwrap()).unwrap();
        assert_eq!(loaded.board(), state.board());
        assert_eq!(loaded.turn(), state.turn());
        assert_eq!(loaded.en_passant_target(), state.en_passant_target());
    }

    #[test]
    fn altered_squares_round_trip() {
        let mut state = State::new();
        state.move_piece(Square::e2, Square::e4);
        let mut buf = Vec::new();
        state.save(&mut buf).unwrap();
        let loaded = State::load_str(std::str::from_utf8(&buf).unwrap()).unwrap();
        assert!(loaded.is_altered(Square::e2));
        assert!(loaded.is_altered(Square::e4));
        assert!(!loaded.is_altered(Square::d2));
    }

    #[test]
    fn load_rejects_unknown_version() {
        let err = State::load_str("2 0 -1 -1").unwrap_err();
        assert_eq!(err, GameError::IoVersion);
    }

    #[test]
    fn load_rejects_en_passant_target_on_wrong_rank() {
        let err = State::load_str("1 0 0 -1").unwrap_err();
        assert_eq!(err, GameError::IoEnPassant);
    }

    #[test]
    fn save_writes_64_as_the_no_en_passant_sentinel() {
        let state = State::new();
        let mut buf = Vec::new();
        state.save(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.split_whitespace().nth(2), Some("64"));
    }

    #[test]
    fn load_rejects_negative_one_as_an_en_passant_sentinel() {
        let err = State::load_str("1 0 -1 -1").unwrap_err();
        assert_eq!(err, GameError::IoEnPassant);
    }

    #[test]
    fn load_rejects_invalid_turn_value() {
        let err = State::load_str("1 2 -1 -1").unwrap_err();
        assert_eq!(err, GameError::IoTurn);
    }

    #[test]
    fn load_rejects_out_of_range_square() {
        let text = format!("1 0 64 64 {white} {rook} 0 -1", white = Colour::White as i32, rook = PieceKind::Rook as i32);
        let err = State::load_str(&text).unwrap_err();
        assert_eq!(err, GameError::IoSquare);
    }

    #[test]
    fn load_rejects_invalid_colour_value() {
        let text = format!("1 0 64 0 2 {rook} 0 -1", rook = PieceKind::Rook as i32);
        let err = State::load_str(&text).unwrap_err();
        assert_eq!(err, GameError::IoColour);
    }

    #[test]
    fn load_rejects_invalid_piece_kind_value() {
        let text = format!("1 0 64 0 {white} 7 0 -1", white = Colour::White as i32);
        let err = State::load_str(&text).unwrap_err();
        assert_eq!(err, GameError::IoPieceType);
    }

    #[test]
    fn load_rejects_stored_none_piece_kind() {
        let text = format!("1 0 64 0 {white} 0 0 -1", white = Colour::White as i32);
        let err = State::load_str(&text).unwrap_err();
        assert_eq!(err, GameError::IoPieceType);
    }

    #[test]
    fn load_rejects_duplicate_piece_on_same_square() {
        let text = format!(
            "1 0 64 {sq} {white} {rook} {unaltered} {sq} {black} {queen} {unaltered} -1",
            sq = 0,
            white = Colour::White as i32,
            black = Colour::Black as i32,
            rook = PieceKind::Rook as i32,
            queen = PieceKind::Queen as i32,
            unaltered = 0,
        );
        let err = State::load_str(&text).unwrap_err();
        assert_eq!(err, GameError::IoSquare);
    }
}
