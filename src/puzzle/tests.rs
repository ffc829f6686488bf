//! Helpers shared by the per-module test suites.

use std::time::Duration;

use super::common::*;
use super::controller::PuzzleController;
use super::geometry::PieceTransform;
use crate::render::{NullSink, RenderSink};

/// Collects every piece's spatial descriptor, indexed by piece id.
pub(crate) fn descriptors<P: PuzzleState + ?Sized>(puzzle: &P) -> Vec<SpatialDescriptor> {
    (0..puzzle.pieces().len())
        .map(|i| puzzle.descriptor(PieceId(i as u16)))
        .collect()
}

/// Applies a sequence of moves to the discrete state.
pub(crate) fn apply_all<P: PuzzleState + ?Sized>(
    puzzle: &mut P,
    moves: impl IntoIterator<Item = Move>,
) {
    for mv in moves {
        puzzle.apply(mv);
    }
}

/// Drives the controller with oversized frame deltas until its queue drains.
pub(crate) fn settle_all(ctl: &mut PuzzleController) {
    while ctl.is_animating() {
        ctl.advance(Duration::from_secs(10), &mut NullSink);
    }
}

/// Render sink that counts its calls.
#[derive(Debug, Default)]
pub(crate) struct CountingSink {
    pub attached: usize,
    pub updates: usize,
    pub detaches: usize,
    pub settles: usize,
}
impl RenderSink for CountingSink {
    fn attach_piece(&mut self, _piece: PieceId, _transform: PieceTransform) {
        self.attached += 1;
    }
    fn update_transform(&mut self, _piece: PieceId, _transform: PieceTransform) {
        self.updates += 1;
    }
    fn detach_all(&mut self) {
        self.detaches += 1;
    }
    fn on_move_settled(&mut self, _snapshot: &PuzzleSnapshot) {
        self.settles += 1;
    }
}
