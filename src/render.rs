//! Contract between the puzzle core and the rendering subsystem.
//!
//! The core owns all puzzle state; the renderer holds only non-owning mesh
//! handles keyed by [`PieceId`] and receives transform updates from the move
//! executor. A 2D diagram view can subscribe to [`RenderSink::on_move_settled`]
//! to redraw sticker colors once per settled move.

use crate::puzzle::{PieceId, PieceTransform, PuzzleSnapshot};

/// Receiver for piece transforms produced by the move executor.
///
/// Implemented by the host's rendering subsystem. All methods are called from
/// the same thread that drives [`PuzzleController::advance`].
///
/// [`PuzzleController::advance`]: crate::puzzle::PuzzleController::advance
pub trait RenderSink {
    /// Registers a piece when a puzzle is (re)built. `transform` is the
    /// piece's solved rest pose.
    fn attach_piece(&mut self, piece: PieceId, transform: PieceTransform);

    /// Updates the world transform of one piece. Called every animation frame
    /// for pieces in flight, and once at rest pose when a move settles.
    fn update_transform(&mut self, piece: PieceId, transform: PieceTransform);

    /// Discards all attached pieces. Called when the active puzzle changes.
    fn detach_all(&mut self);

    /// Called once per settled move with enough data to redraw a 2D state
    /// diagram. The canonical state-invariant checks happen here, not per
    /// frame.
    fn on_move_settled(&mut self, _snapshot: &PuzzleSnapshot) {}
}

/// Sink that discards everything. Useful for headless operation and tests.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSink;
impl RenderSink for NullSink {
    fn attach_piece(&mut self, _piece: PieceId, _transform: PieceTransform) {}
    fn update_transform(&mut self, _piece: PieceId, _transform: PieceTransform) {}
    fn detach_all(&mut self) {}
}
