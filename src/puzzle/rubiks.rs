//! N×N×N cubes and rectangular cuboids.

use cgmath::{Matrix3, Quaternion, Rad, Vector3, Zero};
use itertools::iproduct;
use smallvec::SmallVec;
use std::f32::consts::{FRAC_PI_2, PI};
use std::ops::RangeInclusive;
use std::time::Duration;
use strum::IntoEnumIterator;

use super::common::*;
use super::geometry::{
    grid_to_world, rotate_cell, Axis, MoveGeometry, PieceTransform, Sign, GRID_UNIT,
    LAYER_SELECT_TOLERANCE,
};
use crate::colors::{cube, Rgb};

/// Default layer count for a cube.
pub const DEFAULT_LAYER_COUNT: u8 = 3;
/// Minimum layer count along any axis.
pub const MIN_LAYER_COUNT: u8 = 1;
/// Maximum layer count along any axis.
pub const MAX_LAYER_COUNT: u8 = 9;
/// Supported layer counts.
pub const LAYER_COUNT_RANGE: RangeInclusive<u8> = MIN_LAYER_COUNT..=MAX_LAYER_COUNT;

const QUARTER_TURN_MS: u64 = 300;
const HALF_TURN_MS: u64 = 450;

/// Returns the sticker color for a face.
fn face_color(face: Face) -> Rgb {
    match face {
        Face::Right => cube::RIGHT,
        Face::Left => cube::LEFT,
        Face::Up => cube::UP,
        Face::Down => cube::DOWN,
        Face::Front => cube::FRONT,
        Face::Back => cube::BACK,
        Face::Middle => crate::colors::DARK,
    }
}

fn face_from_axis_sign(axis: Axis, sign: Sign) -> Face {
    match (axis, sign) {
        (Axis::X, Sign::Pos) => Face::Right,
        (Axis::X, Sign::Neg) => Face::Left,
        (Axis::Y, Sign::Pos) => Face::Up,
        (Axis::Y, Sign::Neg) => Face::Down,
        (Axis::Z, Sign::Pos) => Face::Front,
        (Axis::Z, Sign::Neg) => Face::Back,
    }
}

/// The faces toward which a piece's local +X, +Y, and +Z stickers currently
/// point (assuming it has those stickers).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct AxisFrame([Face; 3]);
impl Default for AxisFrame {
    fn default() -> Self {
        Self([Face::Right, Face::Up, Face::Front])
    }
}
impl AxisFrame {
    /// 90° rotation carrying axis `from` into axis `to`.
    #[must_use]
    fn rotate(mut self, from: Axis, to: Axis) -> Self {
        for face in &mut self.0 {
            if face.axis() == from || face.axis() == to {
                let target = if face.axis() == from { to } else { from };
                *face = face_from_axis_sign(target, face.sign());
            }
        }
        self.mirror(from)
    }
    #[must_use]
    fn mirror(mut self, axis: Axis) -> Self {
        for face in &mut self.0 {
            if face.axis() == axis {
                *face = face.opposite();
            }
        }
        self
    }

    /// Applies a face turn to the frame. `half_turn` overrides the direction,
    /// since both 180° turns are the same rotation.
    #[must_use]
    pub(crate) fn twist(self, face: Face, mut direction: TwistDirection, half_turn: bool) -> Self {
        if face.sign() == Sign::Neg {
            direction = direction.rev();
        }
        let [a, b] = face.axis().perpendiculars();
        if half_turn {
            self.mirror(a).mirror(b)
        } else {
            match direction {
                TwistDirection::CW => self.rotate(a, b),
                TwistDirection::CCW => self.rotate(b, a),
            }
        }
    }

    /// Returns the face a local sticker direction currently points toward.
    pub(crate) fn apply(self, local: Face) -> Face {
        let face = self.0[local.axis() as usize];
        match local.sign() {
            Sign::Pos => face,
            Sign::Neg => face.opposite(),
        }
    }

    /// Returns the frame as a rotation.
    pub(crate) fn quaternion(self) -> Quaternion<f32> {
        Matrix3::from_cols(self.0[0].vector(), self.0[1].vector(), self.0[2].vector()).into()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Cubie {
    home: [u8; 3],
    cell: [u8; 3],
    frame: AxisFrame,
}

/// An N×N×N cube or rectangular cuboid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rubiks {
    ty: PuzzleTypeEnum,
    dims: [u8; 3],
    cubies: Vec<Cubie>,
    info: Vec<PieceInfo>,
}
impl Rubiks {
    /// Constructs a solved cube. All three dimensions must be equal; use
    /// [`Rubiks::new_cuboid`] otherwise.
    pub fn new(dims: [u8; 3]) -> Self {
        assert!(dims[0] == dims[1] && dims[1] == dims[2]);
        Self::build(PuzzleTypeEnum::Rubiks {
            layer_count: dims[0],
        })
    }
    /// Constructs a solved rectangular cuboid.
    pub fn new_cuboid(dims: [u8; 3]) -> Self {
        Self::build(PuzzleTypeEnum::Cuboid { dims })
    }

    fn build(ty: PuzzleTypeEnum) -> Self {
        let dims = match ty {
            PuzzleTypeEnum::Rubiks { layer_count } => [layer_count; 3],
            PuzzleTypeEnum::Cuboid { dims } => dims,
            _ => unreachable!("not a cube family type"),
        };
        assert!(dims.iter().all(|d| LAYER_COUNT_RANGE.contains(d)));

        let mut cubies = vec![];
        let mut info = vec![];
        for (x, y, z) in iproduct!(0..dims[0], 0..dims[1], 0..dims[2]) {
            let mut stickers = SmallVec::new();
            let mut push_sticker_if = |condition: bool, face: Face| {
                if condition {
                    stickers.push(StickerInfo {
                        face,
                        color: face_color(face),
                    });
                }
            };
            push_sticker_if(x + 1 == dims[0], Face::Right);
            push_sticker_if(x == 0, Face::Left);
            push_sticker_if(y + 1 == dims[1], Face::Up);
            push_sticker_if(y == 0, Face::Down);
            push_sticker_if(z + 1 == dims[2], Face::Front);
            push_sticker_if(z == 0, Face::Back);

            cubies.push(Cubie {
                home: [x, y, z],
                cell: [x, y, z],
                frame: AxisFrame::default(),
            });
            info.push(PieceInfo {
                kind: PieceKind::Cubie,
                stickers,
            });
        }
        Self {
            ty,
            dims,
            cubies,
            info,
        }
    }

    /// Returns whether `face` can make quarter turns: its perpendicular
    /// dimensions must be equal or the layer would not map onto the grid.
    pub fn face_is_square(&self, face: Face) -> bool {
        let [a, b] = face.axis().perpendiculars();
        self.dims[a as usize] == self.dims[b as usize]
    }

    fn max_depth(&self, face: Face) -> u8 {
        let n = self.dims[face.axis() as usize];
        1 + (n - 1) / 2
    }

    fn world_position(&self, cell: [u8; 3]) -> Vector3<f32> {
        Vector3::new(
            grid_to_world(cell[0], self.dims[0]),
            grid_to_world(cell[1], self.dims[1]),
            grid_to_world(cell[2], self.dims[2]),
        )
    }
}
impl PuzzleState for Rubiks {
    fn ty(&self) -> PuzzleTypeEnum {
        self.ty
    }
    fn pieces(&self) -> &[PieceInfo] {
        &self.info
    }
    fn descriptor(&self, piece: PieceId) -> SpatialDescriptor {
        SpatialDescriptor::Grid {
            cell: self.cubies[piece.0 as usize].cell,
        }
    }

    fn select(&self, mv: Move) -> Vec<PieceId> {
        let Move::Face { face, depth, .. } = mv else {
            return vec![];
        };
        if face == Face::Middle {
            return vec![];
        }
        let axis = face.axis();
        let n = self.dims[axis as usize];
        // An axis with a single layer cannot turn; selecting nothing makes
        // the move a completed no-op.
        if n == 1 || depth == 0 || depth > self.max_depth(face) {
            return vec![];
        }

        let outer = match face.sign() {
            Sign::Pos => grid_to_world(n - 1, n),
            Sign::Neg => grid_to_world(0, n),
        };
        let target = outer - face.sign().float() * (depth - 1) as f32 * GRID_UNIT;

        self.cubies
            .iter()
            .enumerate()
            .filter(|(_, cubie)| {
                let pos = grid_to_world(cubie.cell[axis as usize], n);
                if depth == 1 {
                    match face.sign() {
                        Sign::Pos => pos > target - LAYER_SELECT_TOLERANCE,
                        Sign::Neg => pos < target + LAYER_SELECT_TOLERANCE,
                    }
                } else {
                    (pos - target).abs() < LAYER_SELECT_TOLERANCE
                }
            })
            .map(|(i, _)| PieceId(i as u16))
            .collect()
    }

    fn move_geometry(&self, mv: Move) -> MoveGeometry {
        let Move::Face {
            face, direction, ..
        } = mv
        else {
            return MoveGeometry::noop();
        };
        if self.face_is_square(face) {
            let angle = match direction {
                TwistDirection::CW => -FRAC_PI_2,
                TwistDirection::CCW => FRAC_PI_2,
            };
            MoveGeometry {
                axis: face.vector(),
                pivot: Vector3::zero(),
                angle: Rad(angle),
                base_duration: Duration::from_millis(QUARTER_TURN_MS),
            }
        } else {
            MoveGeometry {
                axis: face.vector(),
                pivot: Vector3::zero(),
                angle: Rad(PI),
                base_duration: Duration::from_millis(HALF_TURN_MS),
            }
        }
    }

    fn apply(&mut self, mv: Move) {
        let selected = self.select(mv);
        let Move::Face {
            face, direction, ..
        } = mv
        else {
            return;
        };
        let half_turn = !self.face_is_square(face);
        // Quarter turns about the positive axis; clockwise seen from outside
        // the face is a negative turn about its outward vector.
        let quarter_turns: i8 = if half_turn {
            2
        } else {
            let outward = match direction {
                TwistDirection::CW => -1,
                TwistDirection::CCW => 1,
            };
            outward * face.sign().int()
        };
        for piece in selected {
            let cubie = &mut self.cubies[piece.0 as usize];
            cubie.cell = rotate_cell(cubie.cell, self.dims, face.axis(), quarter_turns);
            cubie.frame = cubie.frame.twist(face, direction, half_turn);
        }
    }

    fn rest_transform(&self, piece: PieceId) -> PieceTransform {
        let cubie = &self.cubies[piece.0 as usize];
        let rotation = cubie.frame.quaternion();
        let home = self.world_position(cubie.home);
        let current = self.world_position(cubie.cell);
        PieceTransform {
            rotation,
            position: current - rotation * home,
        }
    }

    fn snapshot(&self) -> PuzzleSnapshot {
        let stickers = self
            .cubies
            .iter()
            .zip(&self.info)
            .enumerate()
            .flat_map(|(i, (cubie, info))| {
                info.stickers.iter().map(move |sticker| StickerState {
                    piece: PieceId(i as u16),
                    face: cubie.frame.apply(sticker.face),
                    color: sticker.color,
                })
            })
            .collect();
        PuzzleSnapshot {
            ty: self.ty,
            stickers,
        }
    }

    fn is_solved(&self) -> bool {
        self.cubies.iter().zip(&self.info).all(|(cubie, info)| {
            info.stickers
                .iter()
                .all(|sticker| cubie.frame.apply(sticker.face) == sticker.face)
        })
    }

    fn move_pool(&self) -> Vec<Move> {
        let mut pool = vec![];
        for face in Face::iter().filter(|&f| f != Face::Middle) {
            if self.dims[face.axis() as usize] == 1 {
                continue;
            }
            for depth in 1..=self.max_depth(face) {
                for direction in TwistDirection::iter() {
                    pool.push(Move::Face {
                        face,
                        direction,
                        depth,
                        wide: false,
                    });
                }
            }
        }
        pool
    }

    fn scramble_moves_count(&self) -> usize {
        let max_dim = *self.dims.iter().max().unwrap_or(&DEFAULT_LAYER_COUNT) as usize;
        max_dim * max_dim * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::tests::{apply_all, descriptors};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_top_turn_moves_exactly_the_top_layer() {
        // A solved 3x3 turned U must rotate the 9 max-Y pieces' sticker
        // assignments a quarter turn and leave the other 18 untouched.
        let mut p = Rubiks::new([3; 3]);
        let before = descriptors(&p);
        let mv = Move::face(Face::Up, TwistDirection::CW);

        let selected = p.select(mv);
        assert_eq!(selected.len(), 9);
        for &piece in &selected {
            let SpatialDescriptor::Grid { cell } = p.descriptor(piece) else {
                panic!("cube pieces have grid descriptors");
            };
            assert_eq!(cell[1], 2);
        }

        p.apply(mv);
        let after = descriptors(&p);
        for i in 0..before.len() {
            let piece = PieceId(i as u16);
            if selected.contains(&piece) {
                // Moved pieces stay in the top layer.
                let SpatialDescriptor::Grid { cell } = after[i] else {
                    unreachable!()
                };
                assert_eq!(cell[1], 2);
            } else {
                assert_eq!(after[i], before[i]);
            }
        }
        assert!(!p.is_solved());

        // The U sticker keeps facing up; side stickers rotate one quadrant.
        let corner = p
            .cubies
            .iter()
            .position(|c| c.home == [2, 2, 2])
            .map(|i| PieceId(i as u16))
            .expect("corner exists");
        let frame = p.cubies[corner.0 as usize].frame;
        assert_eq!(frame.apply(Face::Up), Face::Up);
        assert_eq!(frame.apply(Face::Front), Face::Left);
        assert_eq!(frame.apply(Face::Right), Face::Front);
    }

    #[test]
    fn test_move_inverse_cancellation() {
        let mut p = Rubiks::new([3; 3]);
        let before = descriptors(&p);
        for face in Face::iter().filter(|&f| f != Face::Middle) {
            let mv = Move::face(face, TwistDirection::CW);
            apply_all(&mut p, [mv, mv.reverse()]);
            assert_eq!(descriptors(&p), before);
            assert!(p.is_solved());
        }
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        let mut p = Rubiks::new([4; 3]);
        let before = descriptors(&p);
        let mv = Move::face(Face::Right, TwistDirection::CCW);
        apply_all(&mut p, [mv; 4]);
        assert_eq!(descriptors(&p), before);
    }

    #[test]
    fn test_inner_slice_selection() {
        let p = Rubiks::new([5; 3]);
        // Depth 2 on a 5x5 selects one inner slab of 25 pieces (full grid
        // construction keeps interior pieces).
        let mv = Move::Face {
            face: Face::Right,
            direction: TwistDirection::CW,
            depth: 2,
            wide: false,
        };
        let selected = p.select(mv);
        assert_eq!(selected.len(), 25);
        for piece in selected {
            let SpatialDescriptor::Grid { cell } = p.descriptor(piece) else {
                unreachable!()
            };
            assert_eq!(cell[0], 3);
        }
        // Depth past the deepest inner slice selects nothing.
        let too_deep = Move::Face {
            face: Face::Right,
            direction: TwistDirection::CW,
            depth: 4,
            wide: false,
        };
        assert!(p.select(too_deep).is_empty());
    }

    #[test]
    fn test_single_layer_axis_is_a_no_op() {
        let p = Rubiks::new_cuboid([1, 2, 3]);
        let mv = Move::face(Face::Right, TwistDirection::CW);
        assert!(p.select(mv).is_empty());
        assert!(!p.is_legal(mv));
    }

    #[test]
    fn test_non_square_face_turns_180() {
        let mut p = Rubiks::new_cuboid([1, 2, 3]);
        assert!(!p.face_is_square(Face::Up));
        let geom = p.move_geometry(Move::face(Face::Up, TwistDirection::CW));
        assert_eq!(geom.angle, Rad(PI));

        // A 180° turn is an involution.
        let before = descriptors(&p);
        let mv = Move::face(Face::Up, TwistDirection::CW);
        p.apply(mv);
        assert_ne!(descriptors(&p), before);
        p.apply(mv);
        assert_eq!(descriptors(&p), before);
    }

    #[test]
    fn test_middle_selects_nothing_on_cubes() {
        let p = Rubiks::new([3; 3]);
        assert!(p.select(Move::face(Face::Middle, TwistDirection::CW)).is_empty());
    }
}
