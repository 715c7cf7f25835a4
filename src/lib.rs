//! A chess rules engine: board state, move legality, check and checkmate
//! detection, and a strict save/load text format.
//!
//! The entry point is [`Controller`], which owns a [`State`] and enforces
//! the full legality pipeline — self-check rejection, promotion, and
//! checkmate — on top of the per-event validity checks in [`Event`].

pub mod error;
pub mod model;

pub use error::GameError;
pub use model::{Board, Colour, Controller, Direction, Event, Listener, Phase, Piece, PieceKind, SilentListener, Square, State};
