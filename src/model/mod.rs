//! Modeling the game of chess.
//!
//! This module holds the closed set of value types the rest of the crate is
//! built from — squares, directions, colours, and the piece vocabulary — plus
//! the board, event, and controller types layered on top of them in the
//! sibling submodules.

use strum::{EnumIter, FromRepr, VariantArray};

pub mod board;
pub mod controller;
pub mod event;
pub mod listener;
pub mod piece;
pub mod state;

pub use board::Board;
pub use controller::Controller;
pub use event::Event;
pub use listener::{Listener, SilentListener};
pub use state::State;

/// A square on the board, in file-major order starting at a1 = 0.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr, VariantArray)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Square {
    a1, b1, c1, d1, e1, f1, g1, h1,
    a2, b2, c2, d2, e2, f2, g2, h2,
    a3, b3, c3, d3, e3, f3, g3, h3,
    a4, b4, c4, d4, e4, f4, g4, h4,
    a5, b5, c5, d5, e5, f5, g5, h5,
    a6, b6, c6, d6, e6, f6, g6, h6,
    a7, b7, c7, d7, e7, f7, g7, h7,
    a8, b8, c8, d8, e8, f8, g8, h8,
}

impl Square {
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// 0-based rank (0 = rank 1 .. 7 = rank 8).
    #[inline]
    pub fn rank(self) -> u8 {
        self.index() >> 3
    }

    /// 0-based file (0 = file a .. 7 = file h).
    #[inline]
    pub fn file(self) -> u8 {
        self.index() & 0b111
    }

    pub fn from_rank_file(rank: u8, file: u8) -> Option<Square> {
        if rank < 8 && file < 8 {
            Square::from_repr(rank * 8 + file)
        } else {
            None
        }
    }

    /// The square `drank`/`dfile` steps away, or `None` if that would leave
    /// the board. Ray-walking and king/knight/pawn geometry all go through
    /// this so that no piece predicate can wrap around a board edge.
    pub fn offset(self, drank: i8, dfile: i8) -> Option<Square> {
        let rank = self.rank() as i8 + drank;
        let file = self.file() as i8 + dfile;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Square::from_rank_file(rank as u8, file as u8)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' + self.file()) as char;
        write!(f, "{file}{}", self.rank() + 1)
    }
}

/// One of the eight unit directions a piece can travel along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Direction {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Direction {
    /// `(drank, dfile)` for a single step in this direction.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::N => (1, 0),
            Direction::S => (-1, 0),
            Direction::E => (0, 1),
            Direction::W => (0, -1),
            Direction::NE => (1, 1),
            Direction::NW => (1, -1),
            Direction::SE => (-1, 1),
            Direction::SW => (-1, -1),
        }
    }
}

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Colour {
    White,
    Black,
}

impl Colour {
    #[inline]
    pub fn opposite(self) -> Colour {
        match self {
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
        }
    }
}

/// The kind of piece on a square, or `None` for an empty one.
///
/// Numbered to match the on-disk encoding of the save format (§6): `None` may
/// never appear as a *stored* record, but the discriminants still line up
/// with `original_source/src/chess/types.h`'s `PieceTypeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, VariantArray)]
#[repr(u8)]
pub enum PieceKind {
    None = 0,
    Pawn = 1,
    King = 2,
    Queen = 3,
    Bishop = 4,
    Knight = 5,
    Rook = 6,
}

/// A piece on a square. The colour of an empty piece (`kind == None`) is
/// unused and defaults to `White`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}

impl Piece {
    pub const EMPTY: Piece = Piece {
        kind: PieceKind::None,
        colour: Colour::White,
    };

    #[inline]
    pub fn is_empty(self) -> bool {
        self.kind == PieceKind::None
    }
}

impl Default for Piece {
    fn default() -> Self {
        Piece::EMPTY
    }
}

/// Whether the game is still being played, or which side won it.
///
/// This engine does not distinguish checkmate from stalemate — whichever
/// side is to move and has no legal move loses (§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    WhiteWon,
    BlackWon,
}
