//! The closed set of ways a game can fail.

use thiserror::Error;

/// Everything that can go wrong while updating or loading a game.
///
/// Invalid events are never reported this way — `Controller::update`
/// reports those silently through its `bool` return value. `GameError` only
/// covers the two things that need a richer report: an unacceptable
/// promotion choice, and the individual ways a saved game can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("listener returned an illegal promotion piece kind")]
    IllegalPromotion,

    #[error("save format version mismatch")]
    IoVersion,

    #[error("invalid turn value")]
    IoTurn,

    #[error("invalid en passant target")]
    IoEnPassant,

    #[error("invalid square index")]
    IoSquare,

    #[error("invalid colour value")]
    IoColour,

    #[error("invalid piece type value")]
    IoPieceType,
}
