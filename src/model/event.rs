//! The two kinds of update a game can receive: an ordinary move (which may
//! incidentally be a capture, a double pawn push, or an en passant capture)
//! and castling.

use strum::IntoEnumIterator;

use crate::model::piece;
use crate::model::state::State;
use crate::model::{Colour, PieceKind, Square};

/// A single update to a game in progress.
///
/// The C++ original models `Move` and `Castling` as sibling subclasses of a
/// common `GameEvent` base; here that hierarchy becomes two variants of one
/// closed enum, matched on rather than dispatched through a vtable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Move { origin: Square, dest: Square },
    Castling { rook: Square },
}

impl Event {
    /// Whether this event is legal in `state`, ignoring whether it would
    /// leave the mover's own king in check — that's
    /// [`crate::model::controller::Controller::update`]'s job, since it
    /// requires simulating the move.
    pub fn is_valid(&self, state: &State) -> bool {
        match *self {
            Event::Move { origin, dest } => move_is_valid(state, state.turn(), origin, dest),
            Event::Castling { rook } => castling_is_valid(state, rook),
        }
    }

    /// Commits this event to `state`: moves pieces, fires the per-kind
    /// post-move hook (en passant marker/capture), and clears the en
    /// passant marker unless this move just set a fresh one.
    pub fn apply(&self, state: &mut State) {
        match *self {
            Event::Move { origin, dest } => move_apply(state, origin, dest),
            Event::Castling { rook } => castling_apply(state, rook),
        }
    }
}

fn move_is_valid(state: &State, mover: Colour, origin: Square, dest: Square) -> bool {
    let piece = state.board().get(origin);
    if piece.is_empty() || piece.colour != mover {
        return false;
    }
    let target = state.board().get(dest);
    if !target.is_empty() && (target.colour == mover || target.kind == PieceKind::King) {
        return false;
    }
    piece::can_apply(piece.kind, state, origin, dest)
}

fn move_apply(state: &mut State, origin: Square, dest: Square) {
    let kind = state.board().get(origin).kind;
    let prior_en_passant_target = state.en_passant_target();
    state.set_en_passant_target(None);
    state.move_piece(origin, dest);
    piece::after_applied(kind, state, origin, dest, prior_en_passant_target);
}

/// `rook` names the rook taking part — a1/h1 for White, a8/h8 for Black —
/// which also pins down which side the king castles to and how far it and
/// the rook travel.
///
/// Deliberately does not check whether the king starts in check, passes
/// through an attacked square, or lands on one — a known gap in the rules
/// this engine faithfully reproduces rather than fixes (§9).
fn castling_is_valid(state: &State, rook: Square) -> bool {
    let colour = state.turn();
    let king_home = match colour {
        Colour::White => Square::e1,
        Colour::Black => Square::e8,
    };
    let Some((rook_home, _king_dest, _rook_dest)) = castling_squares(colour, rook) else {
        return false;
    };
    if rook != rook_home {
        return false;
    }

    let king = state.board().get(king_home);
    if king.kind != PieceKind::King || king.colour != colour {
        return false;
    }
    let rook_piece = state.board().get(rook_home);
    if rook_piece.kind != PieceKind::Rook || rook_piece.colour != colour {
        return false;
    }
    if state.is_altered(king_home) || state.is_altered(rook_home) {
        return false;
    }

    squares_between(king_home, rook_home).all(|sq| state.board().get(sq).is_empty())
}

fn castling_apply(state: &mut State, rook: Square) {
    let colour = state.turn();
    let king_home = match colour {
        Colour::White => Square::e1,
        Colour::Black => Square::e8,
    };
    let Some((rook_home, king_dest, rook_dest)) = castling_squares(colour, rook) else {
        return;
    };
    state.set_en_passant_target(None);
    state.move_piece(king_home, king_dest);
    state.move_piece(rook_home, rook_dest);
}

/// For `colour` castling with the rook on `rook`, returns
/// `(rook_home, king_dest, rook_dest)`, or `None` if `rook` isn't one of the
/// two legal rook squares for that colour.
fn castling_squares(colour: Colour, rook: Square) -> Option<(Square, Square, Square)> {
    match (colour, rook) {
        (Colour::White, Square::h1) => Some((Square::h1, Square::g1, Square::f1)),
        (Colour::White, Square::a1) => Some((Square::a1, Square::c1, Square::d1)),
        (Colour::Black, Square::h8) => Some((Square::h8, Square::g8, Square::f8)),
        (Colour::Black, Square::a8) => Some((Square::a8, Square::c8, Square::d8)),
        _ => None,
    }
}

/// The open squares strictly between `a` and `b` along the rank they share.
fn squares_between(a: Square, b: Square) -> impl Iterator<Item = Square> {
    debug_assert_eq!(a.rank(), b.rank());
    let rank = a.rank();
    let (lo, hi) = if a.file() < b.file() { (a.file(), b.file()) } else { (b.file(), a.file()) };
    ((lo + 1)..hi).map(move |file| Square::from_rank_file(rank, file).expect("file in 0..8"))
}

/// Whether `attacker`'s king could be captured on `king_square` next move —
/// i.e. whether `colour`'s king sitting there is in check. Mirrors
/// `Move::is_valid`'s delegation to `piece::can_apply`: since `king_square`
/// is always occupied (by the king itself), a pawn's occupancy-dependent
/// branching naturally picks its capture geometry, so no separate
/// "attacks an empty square" predicate is needed here.
pub fn king_is_attacked(state: &State, attacker: Colour, king_square: Square) -> bool {
    for origin in Square::iter() {
        let occupant = state.board().get(origin);
        if occupant.is_empty() || occupant.colour != attacker {
            continue;
        }
        if piece::can_apply(occupant.kind, state, origin, king_square) {
            return true;
        }
    }
    false
}
