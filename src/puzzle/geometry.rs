//! Shared geometric vocabulary: axes, signs, orientation flips, and the
//! transforms handed to the render sink.

use cgmath::{Matrix3, Matrix4, Quaternion, Rad, Rotation3, Vector3, Zero};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::time::Duration;

/// Half of a cubie's edge length, in world units.
pub const CUBIE_SIZE: f32 = 0.45;
/// Gap between adjacent cubies, in world units.
pub const GAP: f32 = 0.02;
/// Distance between adjacent grid cell centers.
pub const GRID_UNIT: f32 = CUBIE_SIZE * 2.0 + GAP;

/// Tolerance for classifying a piece into a layer by world coordinate.
///
/// Must exceed any numerical error a piece coordinate can carry and stay
/// below half of [`GRID_UNIT`], or adjacent layers misclassify. A quarter of
/// the cell pitch satisfies both bounds with a wide margin.
pub const LAYER_SELECT_TOLERANCE: f32 = GRID_UNIT * 0.25;

/// 3-dimensional axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// X axis (right).
    X = 0,
    /// Y axis (up).
    Y = 1,
    /// Z axis (towards the camera).
    Z = 2,
}
impl Axis {
    /// Returns the perpendicular axes from this one, using the left-hand
    /// rule. (The cross product of the returned axes is the opposite of the
    /// input.) This is more convenient for twisty puzzles, where clockwise
    /// rotations are the default.
    pub fn perpendiculars(self) -> [Axis; 2] {
        use Axis::*;
        match self {
            X => [Z, Y], // X+ => rotate from Z+ to Y+.
            Y => [X, Z], // Y+ => rotate from X+ to Z+.
            Z => [Y, X], // Z+ => rotate from Y+ to X+.
        }
    }

    /// Returns an iterator over all axes.
    pub fn iter() -> impl Iterator<Item = Axis> {
        [Axis::X, Axis::Y, Axis::Z].into_iter()
    }

    /// Returns the unit vector along this axis.
    pub fn unit_vec3(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

/// Positive or negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    /// Positive.
    Pos = 1,
    /// Negative.
    Neg = -1,
}
impl std::ops::Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Sign {
        match self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }
}
impl Sign {
    /// Returns an integer representation of the sign (either -1 or 1).
    pub const fn int(self) -> i8 {
        match self {
            Sign::Pos => 1,
            Sign::Neg => -1,
        }
    }
    /// Returns a floating-point representation of the sign (either -1.0 or
    /// 1.0).
    pub const fn float(self) -> f32 {
        self.int() as f32
    }
}

/// Orientation class of a piece that only ever turns by 180°: the identity or
/// a half-turn about one of the three axes (the Klein four-group).
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Flip {
    /// Unrotated.
    #[default]
    Id,
    /// Half-turn about the X axis.
    X,
    /// Half-turn about the Y axis.
    Y,
    /// Half-turn about the Z axis.
    Z,
}
impl Flip {
    /// Composes two flips: `a.compose(b)` applies `b` first, then `a`.
    /// Every element is its own inverse; composing two distinct half-turns
    /// yields the third.
    #[must_use]
    pub fn compose(self, other: Flip) -> Flip {
        use Flip::*;
        match (self, other) {
            (Id, f) | (f, Id) => f,
            (a, b) if a == b => Id,
            (X, Y) | (Y, X) => Z,
            (X, Z) | (Z, X) => Y,
            _ => X, // (Y, Z) | (Z, Y)
        }
    }

    /// Applies the flip to a point.
    pub fn apply(self, v: Vector3<f32>) -> Vector3<f32> {
        match self {
            Flip::Id => v,
            Flip::X => Vector3::new(v.x, -v.y, -v.z),
            Flip::Y => Vector3::new(-v.x, v.y, -v.z),
            Flip::Z => Vector3::new(-v.x, -v.y, v.z),
        }
    }

    /// Returns the flip as a rotation.
    pub fn quaternion(self) -> Quaternion<f32> {
        match self {
            Flip::Id => Quaternion::from_angle_x(Rad(0.0)),
            Flip::X => Quaternion::from_angle_x(Rad(PI)),
            Flip::Y => Quaternion::from_angle_y(Rad(PI)),
            Flip::Z => Quaternion::from_angle_z(Rad(PI)),
        }
    }
}

/// World transform of a piece relative to its solved rest pose:
/// `world_point = rotation * solved_point + position`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PieceTransform {
    /// Accumulated rotation.
    pub rotation: Quaternion<f32>,
    /// Translation applied after the rotation.
    pub position: Vector3<f32>,
}
impl Default for PieceTransform {
    fn default() -> Self {
        Self {
            rotation: Quaternion::from_angle_x(Rad(0.0)),
            position: Vector3::zero(),
        }
    }
}
impl PieceTransform {
    /// Returns the transform as a single matrix.
    pub fn matrix(self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(Matrix3::from(self.rotation))
    }

    /// Returns this transform with an additional rotation of `angle` about
    /// `axis` (a unit vector) through `pivot` applied on top.
    #[must_use]
    pub fn rotated(self, axis: Vector3<f32>, angle: Rad<f32>, pivot: Vector3<f32>) -> Self {
        let r = Quaternion::from_axis_angle(axis, angle);
        Self {
            rotation: r * self.rotation,
            position: r * (self.position - pivot) + pivot,
        }
    }
}

/// How a move rotates its selected pieces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MoveGeometry {
    /// Unit rotation axis.
    pub axis: Vector3<f32>,
    /// Point the axis passes through.
    pub pivot: Vector3<f32>,
    /// Signed total rotation angle.
    pub angle: Rad<f32>,
    /// Animation duration before preference scaling.
    pub base_duration: Duration,
}
impl MoveGeometry {
    /// A zero-angle rotation, used for moves that do not apply to a puzzle.
    pub fn noop() -> Self {
        Self {
            axis: Vector3::unit_y(),
            pivot: Vector3::zero(),
            angle: Rad(0.0),
            base_duration: Duration::ZERO,
        }
    }
}

/// Returns the world coordinate of grid cell `cell` on an axis with `count`
/// layers.
pub(crate) fn grid_to_world(cell: u8, count: u8) -> f32 {
    (cell as f32 - (count - 1) as f32 / 2.0) * GRID_UNIT
}

/// Rotates a grid cell about the puzzle center by `quarter_turns` right-hand
/// quarter turns about the positive `axis`. Exact integer arithmetic; the
/// result is snapped back onto the grid by construction.
pub(crate) fn rotate_cell(cell: [u8; 3], dims: [u8; 3], axis: Axis, quarter_turns: i8) -> [u8; 3] {
    // Doubled centered coordinates stay integral for any parity of `dims`.
    let mut c = [0_i16; 3];
    for i in 0..3 {
        c[i] = 2 * cell[i] as i16 - (dims[i] as i16 - 1);
    }
    for _ in 0..quarter_turns.rem_euclid(4) {
        c = match axis {
            Axis::X => [c[0], -c[2], c[1]],
            Axis::Y => [c[2], c[1], -c[0]],
            Axis::Z => [-c[1], c[0], c[2]],
        };
    }
    let mut out = [0_u8; 3];
    for i in 0..3 {
        out[i] = ((c[i] + dims[i] as i16 - 1) / 2) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_composition_table() {
        use Flip::*;
        for f in [Id, X, Y, Z] {
            assert_eq!(f.compose(f), Id);
            assert_eq!(f.compose(Id), f);
        }
        assert_eq!(X.compose(Y), Z);
        assert_eq!(Y.compose(Z), X);
        assert_eq!(Z.compose(X), Y);
    }

    #[test]
    fn test_rotate_cell_quarter_turn() {
        // 3x3x3, +90° about Y: (x, z) = (2, 0) -> (0, 0).
        assert_eq!(rotate_cell([2, 1, 0], [3, 3, 3], Axis::Y, 1), [0, 1, 0]);
        // Four quarter turns are the identity.
        let cell = [2, 0, 1];
        assert_eq!(rotate_cell(cell, [3, 3, 3], Axis::X, 4), cell);
    }

    #[test]
    fn test_rotate_cell_half_turn_on_cuboid() {
        // 1x2x3, 180° about X: both perpendicular coordinates invert.
        assert_eq!(rotate_cell([0, 1, 2], [1, 2, 3], Axis::X, 2), [0, 0, 0]);
    }
}
