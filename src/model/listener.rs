//! Hooks a caller supplies to resolve the choices a game can't make itself.

use crate::error::GameError;
use crate::model::{PieceKind, Square, state::State};

/// Callbacks a [`crate::model::Controller`] invokes when it needs outside
/// input, or when it wants to report a rejected update.
///
/// Both methods take `&State` rather than `&Controller`: the controller
/// can't lend out `&self` while it's mid-update with `&mut self.state`
/// borrowed, so the listener only ever sees the position, never the
/// controller that's asking.
pub trait Listener {
    /// A pawn has reached the back rank on `square` and needs a kind to
    /// become. Any answer other than `Queen`, `Rook`, `Bishop`, or `Knight`
    /// is rejected by the caller, which reports [`GameError::IllegalPromotion`]
    /// and asks again.
    fn promote_pawn(&mut self, state: &State, square: Square) -> PieceKind;

    /// Called whenever an update is rejected, with the reason it failed.
    fn catch_error(&mut self, state: &State, error: GameError);
}

/// A listener that always promotes to a queen and never reports errors
/// anywhere. Used when a caller needs to try an update purely to see
/// whether it succeeds — e.g. the controller's own self-check simulation —
/// without a real listener's side effects firing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentListener;

impl Listener for SilentListener {
    fn promote_pawn(&mut self, _state: &State, _square: Square) -> PieceKind {
        PieceKind::Queen
    }

    fn catch_error(&mut self, _state: &State, _error: GameError) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_listener_always_promotes_to_queen() {
        let state = State::new();
        let mut listener = SilentListener;
        assert_eq!(listener.promote_pawn(&state, Square::e8), PieceKind::Queen);
    }
}
