//! The 1×3×2 "tree" figure: six non-cubical wedges in three rows of two.
//!
//! Tree pieces are wedges whose bounding geometry does not align with a
//! uniform grid, so layer membership uses the piece-local `row`/`side` tags
//! instead of coordinate thresholds. The tags themselves are recomputed from
//! the settled geometry after every move.

use cgmath::{Rad, Vector3, Zero};
use smallvec::smallvec;
use std::f32::consts::PI;
use std::time::Duration;

use super::common::*;
use super::geometry::{Flip, MoveGeometry, PieceTransform, CUBIE_SIZE, GRID_UNIT};
use crate::colors::{cube, tree};

/// Vertical spacing between rows, chosen so the wedges touch.
const ROW_SPACING: f32 = 0.68 * GRID_UNIT;
/// Horizontal offset of a wedge centroid from the trunk line. Only its sign
/// matters for relabeling.
const SIDE_OFFSET: f32 = CUBIE_SIZE * 0.3;

const HALF_TURN_MS: u64 = 450;

fn row_y(row: Row) -> f32 {
    match row {
        Row::Top => ROW_SPACING,
        Row::Middle => 0.0,
        Row::Bottom => -ROW_SPACING,
    }
}
fn side_x(side: Side) -> f32 {
    match side {
        Side::Left => -SIDE_OFFSET,
        Side::Right => SIDE_OFFSET,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Wedge {
    home_row: Row,
    home_side: Side,
    row: Row,
    side: Side,
    orientation: Flip,
}
impl Wedge {
    fn home_centroid(&self) -> Vector3<f32> {
        Vector3::new(side_x(self.home_side), row_y(self.home_row), 0.0)
    }

    /// Re-derives the symbolic tags from where the accumulated rotations put
    /// the wedge, the same way membership is computed at rest.
    fn retag(&mut self) {
        let centroid = self.orientation.apply(self.home_centroid());
        self.row = if centroid.y > ROW_SPACING / 2.0 {
            Row::Top
        } else if centroid.y < -ROW_SPACING / 2.0 {
            Row::Bottom
        } else {
            Row::Middle
        };
        self.side = if centroid.x < 0.0 {
            Side::Left
        } else {
            Side::Right
        };
    }
}

/// The tree figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFigure {
    wedges: Vec<Wedge>,
    info: Vec<PieceInfo>,
}
impl TreeFigure {
    /// Constructs the solved figure: top, middle, bottom rows, left wedge
    /// before right in each.
    pub fn new() -> Self {
        let mut wedges = vec![];
        let mut info = vec![];
        for row in [Row::Top, Row::Middle, Row::Bottom] {
            for side in [Side::Left, Side::Right] {
                wedges.push(Wedge {
                    home_row: row,
                    home_side: side,
                    row,
                    side,
                    orientation: Flip::Id,
                });
                info.push(PieceInfo {
                    kind: PieceKind::Wedge,
                    stickers: wedge_stickers(row, side),
                });
            }
        }
        Self { wedges, info }
    }

    fn selected_row(face: Face) -> Option<Row> {
        match face {
            Face::Up => Some(Row::Top),
            Face::Middle => Some(Row::Middle),
            Face::Down => Some(Row::Bottom),
            _ => None,
        }
    }
    fn selected_side(face: Face) -> Option<Side> {
        match face {
            Face::Left => Some(Side::Left),
            Face::Right => Some(Side::Right),
            _ => None,
        }
    }
}
impl Default for TreeFigure {
    fn default() -> Self {
        Self::new()
    }
}

fn wedge_stickers(row: Row, side: Side) -> smallvec::SmallVec<[StickerInfo; 6]> {
    let slant = match side {
        Side::Left => StickerInfo {
            face: Face::Left,
            color: cube::LEFT,
        },
        Side::Right => StickerInfo {
            face: Face::Right,
            color: cube::RIGHT,
        },
    };
    let mut stickers = smallvec![
        StickerInfo {
            face: Face::Front,
            color: cube::FRONT,
        },
        StickerInfo {
            face: Face::Back,
            color: cube::BACK,
        },
        StickerInfo {
            face: Face::Up,
            color: cube::UP,
        },
        StickerInfo {
            face: Face::Down,
            color: cube::DOWN,
        },
        slant,
    ];
    if row == Row::Bottom {
        // Trunk bump under the bottom row.
        stickers.push(StickerInfo {
            face: Face::Down,
            color: tree::TRUNK,
        });
    }
    stickers
}

impl PuzzleState for TreeFigure {
    fn ty(&self) -> PuzzleTypeEnum {
        PuzzleTypeEnum::Tree
    }
    fn pieces(&self) -> &[PieceInfo] {
        &self.info
    }
    fn descriptor(&self, piece: PieceId) -> SpatialDescriptor {
        let wedge = &self.wedges[piece.0 as usize];
        SpatialDescriptor::RowSide {
            row: wedge.row,
            side: wedge.side,
        }
    }

    fn select(&self, mv: Move) -> Vec<PieceId> {
        let Move::Face { face, .. } = mv else {
            return vec![];
        };
        let row = Self::selected_row(face);
        let side = Self::selected_side(face);
        if row.is_none() && side.is_none() {
            return vec![];
        }
        self.wedges
            .iter()
            .enumerate()
            .filter(|(_, w)| row.map_or(false, |r| w.row == r) || side.map_or(false, |s| w.side == s))
            .map(|(i, _)| PieceId(i as u16))
            .collect()
    }

    fn move_geometry(&self, mv: Move) -> MoveGeometry {
        let Move::Face { face, .. } = mv else {
            return MoveGeometry::noop();
        };
        if let Some(row) = Self::selected_row(face) {
            // Rows flip about a vertical axis through the row center.
            MoveGeometry {
                axis: Vector3::unit_y(),
                pivot: Vector3::new(0.0, row_y(row), 0.0),
                angle: Rad(PI),
                base_duration: Duration::from_millis(HALF_TURN_MS),
            }
        } else {
            // Side slices flip about the horizontal axis through the trunk.
            MoveGeometry {
                axis: Vector3::unit_x(),
                pivot: Vector3::zero(),
                angle: Rad(PI),
                base_duration: Duration::from_millis(HALF_TURN_MS),
            }
        }
    }

    fn apply(&mut self, mv: Move) {
        let selected = self.select(mv);
        let Move::Face { face, .. } = mv else {
            return;
        };
        let flip = if Self::selected_row(face).is_some() {
            Flip::Y
        } else {
            Flip::X
        };
        for piece in selected {
            let wedge = &mut self.wedges[piece.0 as usize];
            wedge.orientation = flip.compose(wedge.orientation);
            wedge.retag();
        }
    }

    fn rest_transform(&self, piece: PieceId) -> PieceTransform {
        let wedge = &self.wedges[piece.0 as usize];
        let rotation = wedge.orientation.quaternion();
        let home = Vector3::new(0.0, row_y(wedge.home_row), 0.0);
        let current = Vector3::new(0.0, row_y(wedge.row), 0.0);
        PieceTransform {
            rotation,
            position: current - rotation * home,
        }
    }

    fn snapshot(&self) -> PuzzleSnapshot {
        let stickers = self
            .wedges
            .iter()
            .zip(&self.info)
            .enumerate()
            .flat_map(|(i, (wedge, info))| {
                info.stickers.iter().map(move |sticker| StickerState {
                    piece: PieceId(i as u16),
                    face: flip_face(wedge.orientation, sticker.face),
                    color: sticker.color,
                })
            })
            .collect();
        PuzzleSnapshot {
            ty: PuzzleTypeEnum::Tree,
            stickers,
        }
    }

    fn is_solved(&self) -> bool {
        self.wedges.iter().all(|w| w.orientation == Flip::Id)
    }

    fn move_pool(&self) -> Vec<Move> {
        [Face::Up, Face::Middle, Face::Down, Face::Left, Face::Right]
            .into_iter()
            .map(|face| Move::face(face, TwistDirection::CW))
            .collect()
    }

    fn scramble_moves_count(&self) -> usize {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::tests::{apply_all, descriptors};

    #[test]
    fn test_row_and_side_selection_counts() {
        let p = TreeFigure::new();
        for face in [Face::Up, Face::Middle, Face::Down] {
            assert_eq!(p.select(Move::face(face, TwistDirection::CW)).len(), 2);
        }
        for face in [Face::Left, Face::Right] {
            assert_eq!(p.select(Move::face(face, TwistDirection::CW)).len(), 3);
        }
        assert!(p.select(Move::face(Face::Front, TwistDirection::CW)).is_empty());
    }

    #[test]
    fn test_row_move_swaps_sides() {
        let mut p = TreeFigure::new();
        p.apply(Move::face(Face::Up, TwistDirection::CW));
        assert_eq!(
            p.descriptor(PieceId(0)),
            SpatialDescriptor::RowSide {
                row: Row::Top,
                side: Side::Right,
            }
        );
        assert_eq!(
            p.descriptor(PieceId(1)),
            SpatialDescriptor::RowSide {
                row: Row::Top,
                side: Side::Left,
            }
        );
        // The middle row was not touched.
        assert_eq!(
            p.descriptor(PieceId(2)),
            SpatialDescriptor::RowSide {
                row: Row::Middle,
                side: Side::Left,
            }
        );
    }

    #[test]
    fn test_side_move_swaps_rows_and_keeps_middle() {
        let mut p = TreeFigure::new();
        p.apply(Move::face(Face::Left, TwistDirection::CW));
        // Top-left <-> bottom-left; middle-left stays in the middle row.
        assert_eq!(
            p.descriptor(PieceId(0)),
            SpatialDescriptor::RowSide {
                row: Row::Bottom,
                side: Side::Left,
            }
        );
        assert_eq!(
            p.descriptor(PieceId(4)),
            SpatialDescriptor::RowSide {
                row: Row::Top,
                side: Side::Left,
            }
        );
        assert_eq!(
            p.descriptor(PieceId(2)),
            SpatialDescriptor::RowSide {
                row: Row::Middle,
                side: Side::Left,
            }
        );
    }

    #[test]
    fn test_row_move_involution() {
        let mut p = TreeFigure::new();
        let before = descriptors(&p);
        let mv = Move::face(Face::Middle, TwistDirection::CW);
        p.apply(mv);
        assert_ne!(descriptors(&p), before);
        p.apply(mv);
        assert_eq!(descriptors(&p), before);
        assert!(p.is_solved());
    }

    #[test]
    fn test_mixed_sequence_returns_home() {
        let mut p = TreeFigure::new();
        let before = descriptors(&p);
        let u = Move::face(Face::Up, TwistDirection::CW);
        let v = Move::face(Face::Left, TwistDirection::CW);
        // Each move is an involution, so the palindrome undoes itself.
        apply_all(&mut p, [u, v, v, u]);
        assert_eq!(descriptors(&p), before);
        assert!(p.is_solved());
    }
}
