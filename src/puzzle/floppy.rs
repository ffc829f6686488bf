//! The 1×3×3 floppy cuboid (and its mirror variant), plus an optimal
//! breadth-first solver.
//!
//! The puzzle is a 3×3 grid of tiles, thin along Z. Rows turn 180° about the
//! Y axis, columns about the X axis; each move swaps the two end slots of its
//! line and composes a half-turn onto all three tiles' orientation classes.

use cgmath::{Rad, Vector3, Zero};
use smallvec::SmallVec;
use std::collections::{HashSet, VecDeque};
use std::f32::consts::PI;
use std::time::Duration;
use thiserror::Error;

use super::common::*;
use super::geometry::{Axis, Flip, MoveGeometry, PieceTransform, Sign, GRID_UNIT};
use crate::colors::cube;

const HALF_TURN_MS: u64 = 450;

/// The six generator moves: three rows (Y layers) and three columns
/// (X layers), every one a 180° involution.
pub(crate) const GENERATORS: [Move; 6] = [
    Move::Face {
        face: Face::Up,
        direction: TwistDirection::CW,
        depth: 1,
        wide: false,
    },
    Move::Face {
        face: Face::Up,
        direction: TwistDirection::CW,
        depth: 2,
        wide: false,
    },
    Move::Face {
        face: Face::Down,
        direction: TwistDirection::CW,
        depth: 1,
        wide: false,
    },
    Move::Face {
        face: Face::Right,
        direction: TwistDirection::CW,
        depth: 1,
        wide: false,
    },
    Move::Face {
        face: Face::Right,
        direction: TwistDirection::CW,
        depth: 2,
        wide: false,
    },
    Move::Face {
        face: Face::Left,
        direction: TwistDirection::CW,
        depth: 1,
        wide: false,
    },
];

/// Error from [`Floppy::solve`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The search space was exhausted without reaching the goal. Cannot
    /// happen for states produced by legal moves; reported instead of
    /// looping.
    #[error("search exhausted without reaching the goal")]
    Unreachable,
}

/// Line of slots a generator acts on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Line {
    /// Fixed y; turns about the Y axis.
    Row(u8),
    /// Fixed x; turns about the X axis.
    Col(u8),
}
impl Line {
    /// Maps a face turn to the line it affects, mirroring how inner-slice
    /// depths select cube layers.
    fn from_move(mv: Move) -> Option<Line> {
        let Move::Face { face, depth, .. } = mv else {
            return None;
        };
        if face == Face::Middle {
            return None;
        }
        let index = match (face.sign(), depth) {
            (Sign::Pos, 1) => 2,
            (_, 2) => 1,
            (Sign::Neg, 1) => 0,
            _ => return None,
        };
        match face.axis() {
            Axis::Y => Some(Line::Row(index)),
            Axis::X => Some(Line::Col(index)),
            Axis::Z => None,
        }
    }

    fn contains(self, slot: u8) -> bool {
        let (x, y) = (slot % 3, slot / 3);
        match self {
            Line::Row(r) => y == r,
            Line::Col(c) => x == c,
        }
    }
    /// Where a slot in this line ends up after the half turn: the end slots
    /// swap, the center slot stays.
    fn permute(self, slot: u8) -> u8 {
        let (x, y) = (slot % 3, slot / 3);
        match self {
            Line::Row(_) => y * 3 + (2 - x),
            Line::Col(_) => (2 - y) * 3 + x,
        }
    }
    fn flip(self) -> Flip {
        match self {
            Line::Row(_) => Flip::Y,
            Line::Col(_) => Flip::X,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Tile {
    home: u8,
    slot: u8,
    flip: Flip,
}

/// A 1×3×3 floppy or mirror cuboid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floppy {
    variant: FloppyVariant,
    tiles: Vec<Tile>,
    info: Vec<PieceInfo>,
}
impl Floppy {
    /// Constructs a solved puzzle. Slot indices are row-major: `y * 3 + x`
    /// with x rightward and y upward.
    pub fn new(variant: FloppyVariant) -> Self {
        let mut tiles = vec![];
        let mut info = vec![];
        for slot in 0..9 {
            let (x, y) = (slot % 3, slot / 3);
            let mut stickers = SmallVec::new();
            let mut push_sticker_if = |condition: bool, face: Face| {
                if condition {
                    stickers.push(StickerInfo {
                        face,
                        color: match face {
                            Face::Right => cube::RIGHT,
                            Face::Left => cube::LEFT,
                            Face::Up => cube::UP,
                            Face::Down => cube::DOWN,
                            Face::Front => cube::FRONT,
                            Face::Back => cube::BACK,
                            Face::Middle => crate::colors::DARK,
                        },
                    });
                }
            };
            // Thin along Z: every tile shows both front and back.
            push_sticker_if(true, Face::Front);
            push_sticker_if(true, Face::Back);
            push_sticker_if(x == 2, Face::Right);
            push_sticker_if(x == 0, Face::Left);
            push_sticker_if(y == 2, Face::Up);
            push_sticker_if(y == 0, Face::Down);

            tiles.push(Tile {
                home: slot,
                slot,
                flip: Flip::Id,
            });
            info.push(PieceInfo {
                kind: PieceKind::Tile,
                stickers,
            });
        }
        Self {
            variant,
            tiles,
            info,
        }
    }

    /// Returns the variant.
    pub fn variant(&self) -> FloppyVariant {
        self.variant
    }

    /// Current contents of each slot: (piece id, orientation class). Each of
    /// the 9 slots holds exactly one piece; the mapping is a bijection.
    fn slots(&self) -> [(u8, Flip); 9] {
        let mut slots = [(0, Flip::Id); 9];
        for (id, tile) in self.tiles.iter().enumerate() {
            slots[tile.slot as usize] = (id as u8, tile.flip);
        }
        slots
    }

    fn goal(variant: FloppyVariant, slots: &[(u8, Flip); 9]) -> bool {
        slots.iter().enumerate().all(|(slot, &(id, flip))| {
            id as usize == slot
                && match variant {
                    FloppyVariant::Block => flip == Flip::Id,
                    // Mirror pieces are asymmetric-sized; orientation is
                    // visually immaterial once a piece is in place.
                    FloppyVariant::Mirror => true,
                }
        })
    }

    /// Canonical visited-set key. The mirror variant keys on positions only,
    /// collapsing orientation-equivalent states.
    fn state_key(variant: FloppyVariant, slots: &[(u8, Flip); 9]) -> [u8; 9] {
        let mut key = [0; 9];
        for (i, &(id, flip)) in slots.iter().enumerate() {
            key[i] = match variant {
                FloppyVariant::Block => id << 2 | flip as u8,
                FloppyVariant::Mirror => id,
            };
        }
        key
    }

    fn apply_to_slots(slots: &[(u8, Flip); 9], line: Line) -> [(u8, Flip); 9] {
        let mut next = *slots;
        for slot in 0..9u8 {
            if line.contains(slot) {
                let (id, flip) = slots[slot as usize];
                next[line.permute(slot) as usize] = (id, line.flip().compose(flip));
            }
        }
        next
    }

    /// Finds a shortest move sequence to the goal of the active variant by
    /// breadth-first search.
    ///
    /// Returns `Ok(vec![])` exactly when the state already satisfies the goal
    /// predicate. `Err` means the search space was exhausted, which indicates
    /// a corrupted state rather than a hard scramble.
    pub fn solve(&self) -> Result<Vec<Move>, SolveError> {
        let start = self.slots();
        if Self::goal(self.variant, &start) {
            return Ok(vec![]);
        }

        let lines: Vec<(Move, Line)> = GENERATORS
            .iter()
            .map(|&mv| (mv, Line::from_move(mv).expect("generators are line moves")))
            .collect();

        let mut visited = HashSet::new();
        visited.insert(Self::state_key(self.variant, &start));
        let mut queue = VecDeque::new();
        queue.push_back((start, Vec::new()));

        while let Some((slots, path)) = queue.pop_front() {
            for &(mv, line) in &lines {
                let next = Self::apply_to_slots(&slots, line);
                let mut next_path = path.clone();
                next_path.push(mv);
                if Self::goal(self.variant, &next) {
                    log::debug!("floppy solved in {} moves", next_path.len());
                    return Ok(next_path);
                }
                if visited.insert(Self::state_key(self.variant, &next)) {
                    queue.push_back((next, next_path));
                }
            }
        }

        log::error!("floppy search exhausted; state is not a legal position");
        Err(SolveError::Unreachable)
    }

    fn world_position(slot: u8) -> Vector3<f32> {
        let (x, y) = (slot % 3, slot / 3);
        Vector3::new(
            (x as f32 - 1.0) * GRID_UNIT,
            (y as f32 - 1.0) * GRID_UNIT,
            0.0,
        )
    }
}
impl PuzzleState for Floppy {
    fn ty(&self) -> PuzzleTypeEnum {
        PuzzleTypeEnum::Floppy {
            variant: self.variant,
        }
    }
    fn pieces(&self) -> &[PieceInfo] {
        &self.info
    }
    fn descriptor(&self, piece: PieceId) -> SpatialDescriptor {
        let tile = &self.tiles[piece.0 as usize];
        SpatialDescriptor::Slot {
            slot: tile.slot,
            flip: tile.flip,
        }
    }

    fn select(&self, mv: Move) -> Vec<PieceId> {
        let Some(line) = Line::from_move(mv) else {
            return vec![];
        };
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| line.contains(t.slot))
            .map(|(i, _)| PieceId(i as u16))
            .collect()
    }

    fn move_geometry(&self, mv: Move) -> MoveGeometry {
        let Some(line) = Line::from_move(mv) else {
            return MoveGeometry::noop();
        };
        let axis = match line {
            Line::Row(_) => Vector3::unit_y(),
            Line::Col(_) => Vector3::unit_x(),
        };
        MoveGeometry {
            axis,
            pivot: Vector3::zero(),
            angle: Rad(PI),
            base_duration: Duration::from_millis(HALF_TURN_MS),
        }
    }

    fn apply(&mut self, mv: Move) {
        let Some(line) = Line::from_move(mv) else {
            return;
        };
        for tile in &mut self.tiles {
            if line.contains(tile.slot) {
                tile.slot = line.permute(tile.slot);
                tile.flip = line.flip().compose(tile.flip);
            }
        }
    }

    fn rest_transform(&self, piece: PieceId) -> PieceTransform {
        let tile = &self.tiles[piece.0 as usize];
        let rotation = tile.flip.quaternion();
        let home = Self::world_position(tile.home);
        let current = Self::world_position(tile.slot);
        PieceTransform {
            rotation,
            position: current - rotation * home,
        }
    }

    fn snapshot(&self) -> PuzzleSnapshot {
        let stickers = self
            .tiles
            .iter()
            .zip(&self.info)
            .enumerate()
            .flat_map(|(i, (tile, info))| {
                info.stickers.iter().map(move |sticker| StickerState {
                    piece: PieceId(i as u16),
                    face: flip_face(tile.flip, sticker.face),
                    color: sticker.color,
                })
            })
            .collect();
        PuzzleSnapshot {
            ty: self.ty(),
            stickers,
        }
    }

    fn is_solved(&self) -> bool {
        Self::goal(self.variant, &self.slots())
    }

    fn move_pool(&self) -> Vec<Move> {
        GENERATORS.to_vec()
    }

    fn scramble_moves_count(&self) -> usize {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::tests::{apply_all, descriptors};
    use pretty_assertions::assert_eq;

    fn line_move(face: Face, depth: u8) -> Move {
        Move::Face {
            face,
            direction: TwistDirection::CW,
            depth,
            wide: false,
        }
    }

    #[test]
    fn test_row_move_swaps_ends_and_flips() {
        let mut p = Floppy::new(FloppyVariant::Block);
        p.apply(line_move(Face::Up, 1));
        // Top row is slots 6..9; its ends swap and all three tiles flip Y.
        assert_eq!(
            p.descriptor(PieceId(6)),
            SpatialDescriptor::Slot {
                slot: 8,
                flip: Flip::Y,
            }
        );
        assert_eq!(
            p.descriptor(PieceId(7)),
            SpatialDescriptor::Slot {
                slot: 7,
                flip: Flip::Y,
            }
        );
        assert_eq!(
            p.descriptor(PieceId(8)),
            SpatialDescriptor::Slot {
                slot: 6,
                flip: Flip::Y,
            }
        );
        // Everything else untouched.
        for id in 0..6u16 {
            assert_eq!(
                p.descriptor(PieceId(id)),
                SpatialDescriptor::Slot {
                    slot: id as u8,
                    flip: Flip::Id,
                }
            );
        }
    }

    #[test]
    fn test_generator_involution() {
        for mv in GENERATORS {
            let mut p = Floppy::new(FloppyVariant::Block);
            let before = descriptors(&p);
            p.apply(mv);
            assert_ne!(descriptors(&p), before);
            p.apply(mv);
            assert_eq!(descriptors(&p), before);
        }
    }

    #[test]
    fn test_slot_bijection_after_moves() {
        let mut p = Floppy::new(FloppyVariant::Block);
        apply_all(
            &mut p,
            [
                line_move(Face::Up, 1),
                line_move(Face::Right, 1),
                line_move(Face::Up, 2),
                line_move(Face::Left, 1),
            ],
        );
        let mut seen = [false; 9];
        for (id, _) in p.slots() {
            assert!(!seen[id as usize]);
            seen[id as usize] = true;
        }
    }

    #[test]
    fn test_solver_already_solved() {
        let p = Floppy::new(FloppyVariant::Block);
        assert_eq!(p.solve(), Ok(vec![]));
    }

    #[test]
    fn test_solver_finds_shortest_solution() {
        let mut p = Floppy::new(FloppyVariant::Block);
        let scramble = [line_move(Face::Up, 1), line_move(Face::Right, 1)];
        apply_all(&mut p, scramble);

        let solution = p.solve().expect("reachable state");
        // Two non-commuting generators cannot cancel to fewer moves.
        assert_eq!(solution.len(), 2);
        apply_all(&mut p, solution);
        assert!(p.is_solved());
    }

    #[test]
    fn test_solver_determinism() {
        let mut p = Floppy::new(FloppyVariant::Block);
        apply_all(
            &mut p,
            [
                line_move(Face::Up, 1),
                line_move(Face::Left, 1),
                line_move(Face::Down, 1),
            ],
        );
        assert_eq!(p.solve(), p.solve());
    }

    #[test]
    fn test_mirror_goal_ignores_orientation() {
        // All tiles home, center tile flipped in place: an orientation-only
        // mismatch. The block goal rejects it; the mirror goal does not.
        let mut block = Floppy::new(FloppyVariant::Block);
        block.tiles[4].flip = Flip::Y;
        assert!(!block.is_solved());

        let mut mirror = Floppy::new(FloppyVariant::Mirror);
        mirror.tiles[4].flip = Flip::Y;
        assert!(mirror.is_solved());
        assert_eq!(mirror.solve(), Ok(vec![]));
    }

    #[test]
    fn test_mirror_solver_on_permuted_identity_orientations() {
        // Pieces permuted but every tile in its orientation-identity class:
        // the mirror solver ignores orientation entirely and only restores
        // positions.
        let mut p = Floppy::new(FloppyVariant::Mirror);
        p.tiles[0].slot = 2;
        p.tiles[2].slot = 0;
        let solution = p.solve().expect("reachable");
        assert_eq!(solution.len(), 1); // one bottom-row turn restores the swap
        apply_all(&mut p, solution);
        assert!(p.is_solved());
    }

    #[test]
    fn test_mirror_solver_restores_positions() {
        let mut p = Floppy::new(FloppyVariant::Mirror);
        apply_all(
            &mut p,
            [
                line_move(Face::Up, 1),
                line_move(Face::Down, 1),
                line_move(Face::Left, 1),
            ],
        );
        let solution = p.solve().expect("reachable");
        assert!(!solution.is_empty());
        apply_all(&mut p, solution);
        assert!(p.is_solved());
    }
}
