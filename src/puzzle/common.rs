//! Common types used by every puzzle: piece identities, moves, spatial
//! descriptors, and the [`PuzzleState`] trait.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use strum::EnumIter;

use super::geometry::{Axis, Flip, MoveGeometry, PieceTransform, Sign};
use super::{floppy, pyraminx, rubiks, square1, tree};
use crate::colors::Rgb;

/// Identity of a piece within the active puzzle. Stable for the lifetime of a
/// puzzle instance; moves permute and rotate pieces, never create or destroy
/// them.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceId(pub u16);
impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A face, or more generally the name of a layer: cube faces, tree rows and
/// sides, Pyraminx vertex layers.
#[derive(Serialize, Deserialize, EnumIter, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    /// Right (+X). Also the tree figure's right side.
    #[default]
    Right,
    /// Left (-X). Also the tree figure's left side.
    Left,
    /// Up (+Y). Also the top Pyraminx vertex and the tree figure's top row.
    Up,
    /// Down (-Y).
    Down,
    /// Front (+Z).
    Front,
    /// Back (-Z). Also the back Pyraminx vertex.
    Back,
    /// Middle row of the tree figure. Selects nothing on other puzzles.
    Middle,
}
impl Face {
    /// Returns the axis perpendicular to this face.
    pub fn axis(self) -> Axis {
        use Face::*;
        match self {
            Right | Left => Axis::X,
            Up | Down | Middle => Axis::Y,
            Front | Back => Axis::Z,
        }
    }
    /// Returns the sign of the face along its axis. `Middle` has no outward
    /// side; its sign is arbitrary.
    pub fn sign(self) -> Sign {
        use Face::*;
        match self {
            Right | Up | Front | Middle => Sign::Pos,
            Left | Down | Back => Sign::Neg,
        }
    }
    /// Returns the face on the other side of the same axis.
    #[must_use]
    pub fn opposite(self) -> Self {
        use Face::*;
        match self {
            Right => Left,
            Left => Right,
            Up => Down,
            Down => Up,
            Front => Back,
            Back => Front,
            Middle => Middle,
        }
    }

    /// Returns the short name for this face.
    pub fn symbol(self) -> &'static str {
        use Face::*;
        match self {
            Right => "R",
            Left => "L",
            Up => "U",
            Down => "D",
            Front => "F",
            Back => "B",
            Middle => "M",
        }
    }
    /// Returns the full name for this face.
    pub fn name(self) -> &'static str {
        use Face::*;
        match self {
            Right => "Right",
            Left => "Left",
            Up => "Up",
            Down => "Down",
            Front => "Front",
            Back => "Back",
            Middle => "Middle",
        }
    }

    /// Returns the outward unit vector of this face.
    pub fn vector(self) -> cgmath::Vector3<f32> {
        self.axis().unit_vec3() * self.sign().float()
    }
}
impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rotation direction; clockwise or counterclockwise, as seen from outside
/// the turned face.
#[derive(Serialize, Deserialize, EnumIter, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TwistDirection {
    /// Clockwise.
    #[default]
    CW,
    /// Counterclockwise.
    CCW,
}
impl TwistDirection {
    /// Returns the reverse direction.
    #[must_use]
    pub fn rev(self) -> Self {
        match self {
            TwistDirection::CW => TwistDirection::CCW,
            TwistDirection::CCW => TwistDirection::CW,
        }
    }
    fn symbol(self) -> &'static str {
        match self {
            TwistDirection::CW => "",
            TwistDirection::CCW => "'",
        }
    }
}

/// One of the Square-1's two rotating layers.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerHalf {
    /// Top layer.
    #[default]
    Top,
    /// Bottom layer.
    Bottom,
}
impl LayerHalf {
    /// Returns the other layer.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            LayerHalf::Top => LayerHalf::Bottom,
            LayerHalf::Bottom => LayerHalf::Top,
        }
    }
}

/// Tree figure row.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Row {
    /// Top row.
    Top,
    /// Middle row.
    Middle,
    /// Bottom row.
    Bottom,
}

/// Tree figure side.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left half.
    Left,
    /// Right half.
    Right,
}

/// A named move. Moves are values; history is an ordered sequence of them.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// Turn of a face or layer, used by the cube family, the tree figure, the
    /// floppy cuboid, and the Pyraminx.
    Face {
        /// Which face or layer to turn.
        face: Face,
        /// Turn direction. Ignored by faces that can only turn 180°.
        direction: TwistDirection,
        /// 1-based layer depth: 1 is the outermost layer on this face,
        /// `1 + k` is the k-th inner slice.
        depth: u8,
        /// Pyraminx only: turn the two layers nearest the vertex instead of
        /// just the tip.
        wide: bool,
    },
    /// Square-1 layer turn by `amount` steps of 30°. Positive is
    /// counterclockwise seen from above.
    Turn {
        /// Which layer to turn.
        layer: LayerHalf,
        /// Signed number of 30° steps.
        amount: i8,
    },
    /// Square-1 equatorial slice: the right half rotates 180° about the cut
    /// plane. An involution.
    Slice,
}
impl Move {
    /// Convenience constructor for an outer-layer face turn.
    pub fn face(face: Face, direction: TwistDirection) -> Self {
        Move::Face {
            face,
            direction,
            depth: 1,
            wide: false,
        }
    }
    /// Convenience constructor for a wide Pyraminx turn.
    pub fn wide(face: Face, direction: TwistDirection) -> Self {
        Move::Face {
            face,
            direction,
            depth: 1,
            wide: true,
        }
    }

    /// Returns the move that undoes this one. 180°-only moves and the slice
    /// are involutions and are their own inverse.
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Move::Face {
                face,
                direction,
                depth,
                wide,
            } => Move::Face {
                face,
                direction: direction.rev(),
                depth,
                wide,
            },
            Move::Turn { layer, amount } => Move::Turn {
                layer,
                amount: -amount,
            },
            Move::Slice => Move::Slice,
        }
    }
}
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Face {
                face,
                direction,
                depth,
                wide,
            } => {
                if *depth > 1 {
                    write!(f, "{depth}")?;
                }
                write!(f, "{}", face.symbol())?;
                if *wide {
                    write!(f, "w")?;
                }
                write!(f, "{}", direction.symbol())
            }
            Move::Turn { layer, amount } => {
                let layer = match layer {
                    LayerHalf::Top => "T",
                    LayerHalf::Bottom => "B",
                };
                write!(f, "{layer}{amount:+}")
            }
            Move::Slice => write!(f, "/"),
        }
    }
}

/// Returns the face a sticker points toward after `flip`: a half-turn about
/// an axis carries every face not on that axis to its opposite.
pub(crate) fn flip_face(flip: Flip, face: Face) -> Face {
    let negated = match flip {
        Flip::Id => return face,
        Flip::X => face.axis() != Axis::X,
        Flip::Y => face.axis() != Axis::Y,
        Flip::Z => face.axis() != Axis::Z,
    };
    if negated && face != Face::Middle {
        face.opposite()
    } else {
        face
    }
}

/// Where a piece currently is, in the discrete legal set of its puzzle.
///
/// Every variant is exact integral data; at the end of every completed move
/// each piece's descriptor is a member of this set, with no residual
/// fractional state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SpatialDescriptor {
    /// Cube/cuboid grid cell.
    Grid {
        /// Cell indices along X, Y, Z.
        cell: [u8; 3],
    },
    /// Tree figure symbolic tags.
    RowSide {
        /// Current row.
        row: Row,
        /// Current side.
        side: Side,
    },
    /// Floppy cuboid slot plus orientation class.
    Slot {
        /// Slot index, row-major in the 3×3 grid.
        slot: u8,
        /// Orientation class.
        flip: Flip,
    },
    /// Pyraminx barycentric level coordinates (non-negative, sum 2).
    Simplex {
        /// Levels away from each of the four faces.
        coords: [u8; 4],
    },
    /// Square-1 wedge.
    Angular {
        /// Current layer.
        layer: LayerHalf,
        /// Start angle in degrees, a multiple of 30 in `0..360`.
        angle_deg: u16,
        /// Angular span in degrees (30 or 60).
        span_deg: u16,
    },
}

/// Role of a piece within its puzzle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// Cube or cuboid element.
    Cubie,
    /// Tree figure wedge.
    Wedge,
    /// Floppy cuboid tile.
    Tile,
    /// Pyraminx tetrahedron.
    Tetra,
    /// Square-1 corner (60° span).
    Corner,
    /// Square-1 edge (30° span).
    Edge,
}

/// Construction-time metadata for one piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceInfo {
    /// Role of the piece.
    pub kind: PieceKind,
    /// Colored stickers, tagged with the face they point toward when solved.
    pub stickers: SmallVec<[StickerInfo; 6]>,
}

/// One colored sticker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StickerInfo {
    /// Face the sticker points toward in the solved state.
    pub face: Face,
    /// Sticker color, fixed at construction.
    pub color: Rgb,
}

/// Current world placement of one sticker, for 2D diagram redraws.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StickerState {
    /// Piece the sticker is on.
    pub piece: PieceId,
    /// Face the sticker currently points toward.
    pub face: Face,
    /// Sticker color.
    pub color: Rgb,
}

/// Everything a 2D diagram needs to redraw the puzzle after a settled move.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleSnapshot {
    /// Type of the active puzzle.
    pub ty: PuzzleTypeEnum,
    /// Current placement of every sticker.
    pub stickers: Vec<StickerState>,
}

/// Floppy cuboid flavor.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FloppyVariant {
    /// Uniform tiles; solved means position and orientation both match.
    #[default]
    Block,
    /// Mirror-style tiles of distinct sizes; orientation is visually
    /// immaterial once a piece is in place, so solved means position only.
    Mirror,
}

/// Enumeration of all puzzle types.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PuzzleTypeEnum {
    /// N×N×N cube.
    Rubiks {
        /// Number of layers along each axis.
        layer_count: u8,
    },
    /// Rectangular cuboid, e.g. 1×2×3.
    Cuboid {
        /// Layer counts along X, Y, Z.
        dims: [u8; 3],
    },
    /// 1×3×2 tree figure built from wedges.
    Tree,
    /// 1×3×3 floppy cuboid.
    Floppy {
        /// Block or mirror flavor.
        variant: FloppyVariant,
    },
    /// Pyraminx.
    Pyraminx,
    /// Square-1.
    SquareOne,
}
impl PuzzleTypeEnum {
    /// Checks setup-time constraints. An invalid type is a configuration
    /// error; [`Puzzle::new`] panics on one.
    pub fn validate(self) -> Result<(), String> {
        match self {
            PuzzleTypeEnum::Rubiks { layer_count } => {
                if rubiks::LAYER_COUNT_RANGE.contains(&layer_count) {
                    Ok(())
                } else {
                    Err(format!("invalid layer count {layer_count} for this puzzle"))
                }
            }
            PuzzleTypeEnum::Cuboid { dims } => {
                if dims.iter().all(|d| rubiks::LAYER_COUNT_RANGE.contains(d)) {
                    Ok(())
                } else {
                    Err(format!("invalid dimensions {dims:?} for this puzzle"))
                }
            }
            _ => Ok(()),
        }
    }

    /// Returns a display name for the puzzle.
    pub fn name(self) -> String {
        match self {
            PuzzleTypeEnum::Rubiks { layer_count } => format!("{0}x{0}x{0}", layer_count),
            PuzzleTypeEnum::Cuboid { dims } => format!("{}x{}x{}", dims[0], dims[1], dims[2]),
            PuzzleTypeEnum::Tree => "Tree".to_string(),
            PuzzleTypeEnum::Floppy {
                variant: FloppyVariant::Block,
            } => "Floppy 1x3x3".to_string(),
            PuzzleTypeEnum::Floppy {
                variant: FloppyVariant::Mirror,
            } => "Mirror 1x3x3".to_string(),
            PuzzleTypeEnum::Pyraminx => "Pyraminx".to_string(),
            PuzzleTypeEnum::SquareOne => "Square-1".to_string(),
        }
    }
}
impl Default for PuzzleTypeEnum {
    fn default() -> Self {
        Self::Rubiks { layer_count: 3 }
    }
}
impl fmt::Display for PuzzleTypeEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A twisty puzzle: a piece registry plus the move semantics acting on it.
///
/// Implementations keep all authoritative state discrete and exact;
/// continuous transforms are derived output for the render sink.
pub trait PuzzleState {
    /// Returns the puzzle type.
    fn ty(&self) -> PuzzleTypeEnum;

    /// Returns construction-time metadata for every piece, indexed by
    /// [`PieceId`].
    fn pieces(&self) -> &[PieceInfo];

    /// Returns where `piece` currently is.
    fn descriptor(&self, piece: PieceId) -> SpatialDescriptor;

    /// Returns the subset of pieces affected by `mv`. Pure; an unsupported or
    /// out-of-range move selects nothing.
    fn select(&self, mv: Move) -> Vec<PieceId>;

    /// Returns whether `mv` does anything on the current state. Moves for
    /// which this is false are completed no-ops.
    fn is_legal(&self, mv: Move) -> bool {
        !self.select(mv).is_empty()
    }

    /// Returns the rotation animating `mv`.
    fn move_geometry(&self, mv: Move) -> MoveGeometry;

    /// Commits `mv` to the discrete state: permutes descriptors, updates
    /// orientations, and relabels symbolic tags from the resulting geometry.
    /// Applying an illegal move is a no-op.
    fn apply(&mut self, mv: Move);

    /// Returns the current rest transform of `piece` (no animation applied).
    fn rest_transform(&self, piece: PieceId) -> PieceTransform;

    /// Returns the current placement of every sticker.
    fn snapshot(&self) -> PuzzleSnapshot;

    /// Returns whether every sticker shows its solved color.
    fn is_solved(&self) -> bool;

    /// Returns the legal move alphabet used for scrambling.
    fn move_pool(&self) -> Vec<Move>;

    /// Returns the default number of scramble moves.
    fn scramble_moves_count(&self) -> usize;
}

/// Puzzle of any type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Puzzle {
    /// N×N×N cube or rectangular cuboid.
    Rubiks(rubiks::Rubiks),
    /// Tree figure.
    Tree(tree::TreeFigure),
    /// Floppy cuboid.
    Floppy(floppy::Floppy),
    /// Pyraminx.
    Pyraminx(pyraminx::Pyraminx),
    /// Square-1.
    SquareOne(square1::SquareOne),
}
impl Default for Puzzle {
    fn default() -> Self {
        Self::new(PuzzleTypeEnum::default())
    }
}
impl Puzzle {
    /// Creates a new solved puzzle of a particular type.
    ///
    /// # Panics
    ///
    /// Panics if `ty` fails [`PuzzleTypeEnum::validate`]; an unrecognized or
    /// out-of-range configuration is a setup-time contract violation, not a
    /// runtime condition to recover from.
    pub fn new(ty: PuzzleTypeEnum) -> Puzzle {
        match ty {
            PuzzleTypeEnum::Rubiks { layer_count } => {
                Puzzle::Rubiks(rubiks::Rubiks::new([layer_count; 3]))
            }
            PuzzleTypeEnum::Cuboid { dims } => Puzzle::Rubiks(rubiks::Rubiks::new_cuboid(dims)),
            PuzzleTypeEnum::Tree => Puzzle::Tree(tree::TreeFigure::new()),
            PuzzleTypeEnum::Floppy { variant } => Puzzle::Floppy(floppy::Floppy::new(variant)),
            PuzzleTypeEnum::Pyraminx => Puzzle::Pyraminx(pyraminx::Pyraminx::new()),
            PuzzleTypeEnum::SquareOne => Puzzle::SquareOne(square1::SquareOne::new()),
        }
    }

    fn as_dyn(&self) -> &dyn PuzzleState {
        match self {
            Puzzle::Rubiks(p) => p,
            Puzzle::Tree(p) => p,
            Puzzle::Floppy(p) => p,
            Puzzle::Pyraminx(p) => p,
            Puzzle::SquareOne(p) => p,
        }
    }
    fn as_dyn_mut(&mut self) -> &mut dyn PuzzleState {
        match self {
            Puzzle::Rubiks(p) => p,
            Puzzle::Tree(p) => p,
            Puzzle::Floppy(p) => p,
            Puzzle::Pyraminx(p) => p,
            Puzzle::SquareOne(p) => p,
        }
    }
}
impl PuzzleState for Puzzle {
    fn ty(&self) -> PuzzleTypeEnum {
        self.as_dyn().ty()
    }
    fn pieces(&self) -> &[PieceInfo] {
        self.as_dyn().pieces()
    }
    fn descriptor(&self, piece: PieceId) -> SpatialDescriptor {
        self.as_dyn().descriptor(piece)
    }
    fn select(&self, mv: Move) -> Vec<PieceId> {
        self.as_dyn().select(mv)
    }
    fn is_legal(&self, mv: Move) -> bool {
        self.as_dyn().is_legal(mv)
    }
    fn move_geometry(&self, mv: Move) -> MoveGeometry {
        self.as_dyn().move_geometry(mv)
    }
    fn apply(&mut self, mv: Move) {
        self.as_dyn_mut().apply(mv);
    }
    fn rest_transform(&self, piece: PieceId) -> PieceTransform {
        self.as_dyn().rest_transform(piece)
    }
    fn snapshot(&self) -> PuzzleSnapshot {
        self.as_dyn().snapshot()
    }
    fn is_solved(&self) -> bool {
        self.as_dyn().is_solved()
    }
    fn move_pool(&self) -> Vec<Move> {
        self.as_dyn().move_pool()
    }
    fn scramble_moves_count(&self) -> usize {
        self.as_dyn().scramble_moves_count()
    }
}
