//! Pyraminx: ten small tetrahedra inside a regular tetrahedron of edge 3.
//!
//! Authoritative state is exact: piece positions are barycentric level
//! coordinates (non-negative integers summing to 2) and orientations are
//! vertex permutations of the outer tetrahedron. Layer membership is always
//! derived from the current geometry, both when selecting a move and when
//! relabeling after one settles.

use cgmath::{InnerSpace, One, Quaternion, Rad, Rotation3, Vector3};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::f32::consts::PI;
use std::time::Duration;
use strum::IntoEnumIterator;

use super::common::*;
use super::geometry::{MoveGeometry, PieceTransform};
use crate::colors::{pyraminx, Rgb};

/// Edge length of the outer tetrahedron.
pub const EDGE: f32 = 1.5;

/// A piece whose centroid is within this distance of a vertex is that
/// vertex's tip. The tip centroid sits at `EDGE / 3 * sqrt(3/8) * ...` ≈ 0.31
/// and the next row at ≈ 0.77, so 0.4 edges separates them cleanly.
const TIP_THRESHOLD: f32 = EDGE * 0.4;

/// A piece belongs to a vertex's wide layer when the scalar projection of its
/// centroid onto the vertex→opposite-face axis is below this fraction: the
/// tip row projects to 1/4, the second row to 7/12, the far row to 3/4 and
/// beyond.
const WIDE_LIMIT: f32 = 2.0 / 3.0;

const TURN_MS: u64 = 300;

lazy_static! {
    /// Outer tetrahedron vertices: top, front-left, front-right, back.
    static ref VERTICES: [Vector3<f32>; 4] = {
        let h = EDGE * (2.0_f32 / 3.0).sqrt();
        [
            Vector3::new(0.0, h, 0.0),
            Vector3::new(-EDGE / 2.0, -h / 3.0, EDGE * 3.0_f32.sqrt() / 6.0),
            Vector3::new(EDGE / 2.0, -h / 3.0, EDGE * 3.0_f32.sqrt() / 6.0),
            Vector3::new(0.0, -h / 3.0, -EDGE * 3.0_f32.sqrt() / 3.0),
        ]
    };

    /// Vertex permutation of each 120° turn, derived from the same rotations
    /// the animator uses.
    static ref CYCLES: [[VertexPerm; 2]; 4] = {
        let mut cycles = [[VertexPerm::IDENTITY; 2]; 4];
        for (v, cycle) in cycles.iter_mut().enumerate() {
            for (d, perm) in cycle.iter_mut().enumerate() {
                let q = turn_quaternion(v, [TwistDirection::CW, TwistDirection::CCW][d]);
                let mut map = [0_u8; 4];
                for w in 0..4 {
                    let rotated = q * VERTICES[w];
                    let nearest = (0..4)
                        .min_by(|&a, &b| {
                            let da = (rotated - VERTICES[a]).magnitude2();
                            let db = (rotated - VERTICES[b]).magnitude2();
                            da.total_cmp(&db)
                        })
                        .expect("four vertices");
                    map[w] = nearest as u8;
                }
                *perm = VertexPerm(map);
            }
        }
        cycles
    };

    /// The 12 rotations of the tetrahedron, keyed by vertex permutation.
    static ref ROTATIONS: HashMap<VertexPerm, Quaternion<f32>> = {
        let mut map = HashMap::new();
        map.insert(VertexPerm::IDENTITY, Quaternion::one());
        let generators: Vec<(VertexPerm, Quaternion<f32>)> = (0..4)
            .flat_map(|v| {
                [TwistDirection::CW, TwistDirection::CCW].map(|d| {
                    (CYCLES[v][d as usize], turn_quaternion(v, d))
                })
            })
            .collect();
        loop {
            let known: Vec<(VertexPerm, Quaternion<f32>)> =
                map.iter().map(|(&p, &q)| (p, q)).collect();
            let before = map.len();
            for (p, q) in known {
                for &(gp, gq) in &generators {
                    map.entry(gp.compose(p)).or_insert(gq * q);
                }
            }
            if map.len() == before {
                break;
            }
        }
        map
    };
}

fn turn_quaternion(vertex: usize, direction: TwistDirection) -> Quaternion<f32> {
    let angle = match direction {
        TwistDirection::CW => -2.0 * PI / 3.0,
        TwistDirection::CCW => 2.0 * PI / 3.0,
    };
    Quaternion::from_axis_angle(VERTICES[vertex].normalize(), Rad(angle))
}

/// Face opposite a vertex.
fn vertex_face(vertex: u8) -> Face {
    match vertex {
        0 => Face::Down,
        1 => Face::Right,
        2 => Face::Left,
        _ => Face::Front,
    }
}
fn face_color(face: Face) -> Rgb {
    match face {
        Face::Down => pyraminx::BOTTOM,
        Face::Right => pyraminx::RIGHT,
        Face::Left => pyraminx::LEFT,
        _ => pyraminx::FRONT,
    }
}
/// Vertex whose layers a move name refers to.
fn face_vertex(face: Face) -> Option<usize> {
    match face {
        Face::Up => Some(0),
        Face::Left => Some(1),
        Face::Right => Some(2),
        Face::Back => Some(3),
        _ => None,
    }
}

/// An even permutation of the four outer vertices; the exact orientation of a
/// piece.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct VertexPerm([u8; 4]);
impl VertexPerm {
    const IDENTITY: Self = Self([0, 1, 2, 3]);

    /// `a.compose(b)` applies `b` first, then `a`.
    #[must_use]
    fn compose(self, other: Self) -> Self {
        let mut out = [0; 4];
        for i in 0..4 {
            out[i] = self.0[other.0[i] as usize];
        }
        Self(out)
    }
    fn apply(self, vertex: u8) -> u8 {
        self.0[vertex as usize]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Tet {
    home: [u8; 4],
    coords: [u8; 4],
    orient: VertexPerm,
}
impl Tet {
    /// World centroid from barycentric level coordinates.
    fn centroid(coords: [u8; 4]) -> Vector3<f32> {
        let mut c = Vector3::new(0.0, 0.0, 0.0);
        for i in 0..4 {
            c += VERTICES[i] * ((4 * coords[i] + 1) as f32 / 12.0);
        }
        c
    }
}

/// A Pyraminx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pyraminx {
    tets: Vec<Tet>,
    info: Vec<PieceInfo>,
}
impl Pyraminx {
    /// Constructs a solved Pyraminx: the ten upward tetrahedra of the edge-3
    /// subdivision.
    pub fn new() -> Self {
        let mut tets = vec![];
        let mut info = vec![];
        for i in 0..4 {
            for j in i..4 {
                let mut coords = [0_u8; 4];
                coords[i] += 1;
                coords[j] += 1;

                // A piece touches the face planes its level coordinate is
                // zero on; those faces carry its stickers.
                let stickers: SmallVec<[StickerInfo; 6]> = (0..4u8)
                    .filter(|&m| coords[m as usize] == 0)
                    .map(|m| {
                        let face = vertex_face(m);
                        StickerInfo {
                            face,
                            color: face_color(face),
                        }
                    })
                    .collect();

                tets.push(Tet {
                    home: coords,
                    coords,
                    orient: VertexPerm::IDENTITY,
                });
                info.push(PieceInfo {
                    kind: PieceKind::Tetra,
                    stickers,
                });
            }
        }
        Self { tets, info }
    }

    /// Tip membership: Euclidean distance from the piece centroid to the
    /// vertex.
    fn is_tip(coords: [u8; 4], vertex: usize) -> bool {
        (Tet::centroid(coords) - VERTICES[vertex]).magnitude() < TIP_THRESHOLD
    }

    /// Wide membership: scalar projection of the piece centroid onto the
    /// vertex→opposite-face-center axis.
    fn in_wide_layer(coords: [u8; 4], vertex: usize) -> bool {
        let v = VERTICES[vertex];
        let face_center = -v / 3.0;
        let axis = face_center - v;
        let t = (Tet::centroid(coords) - v).dot(axis) / axis.magnitude2();
        t < WIDE_LIMIT
    }
}
impl Default for Pyraminx {
    fn default() -> Self {
        Self::new()
    }
}
impl PuzzleState for Pyraminx {
    fn ty(&self) -> PuzzleTypeEnum {
        PuzzleTypeEnum::Pyraminx
    }
    fn pieces(&self) -> &[PieceInfo] {
        &self.info
    }
    fn descriptor(&self, piece: PieceId) -> SpatialDescriptor {
        SpatialDescriptor::Simplex {
            coords: self.tets[piece.0 as usize].coords,
        }
    }

    fn select(&self, mv: Move) -> Vec<PieceId> {
        let Move::Face { face, wide, .. } = mv else {
            return vec![];
        };
        let Some(vertex) = face_vertex(face) else {
            return vec![];
        };
        self.tets
            .iter()
            .enumerate()
            .filter(|(_, tet)| {
                if wide {
                    Self::in_wide_layer(tet.coords, vertex)
                } else {
                    Self::is_tip(tet.coords, vertex)
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
        let Some(vertex) = face_vertex(face) else {
            return MoveGeometry::noop();
        };
        let angle = match direction {
            TwistDirection::CW => -2.0 * PI / 3.0,
            TwistDirection::CCW => 2.0 * PI / 3.0,
        };
        MoveGeometry {
            axis: VERTICES[vertex].normalize(),
            pivot: VERTICES[vertex],
            angle: Rad(angle),
            base_duration: Duration::from_millis(TURN_MS),
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
        let Some(vertex) = face_vertex(face) else {
            return;
        };
        let sigma = CYCLES[vertex][direction as usize];
        for piece in selected {
            let tet = &mut self.tets[piece.0 as usize];
            let mut next = [0_u8; 4];
            for i in 0..4u8 {
                next[sigma.apply(i) as usize] = tet.coords[i as usize];
            }
            tet.coords = next;
            tet.orient = sigma.compose(tet.orient);
        }
    }

    fn rest_transform(&self, piece: PieceId) -> PieceTransform {
        let tet = &self.tets[piece.0 as usize];
        let rotation = *ROTATIONS
            .get(&tet.orient)
            .expect("orientation is a tetrahedral rotation");
        PieceTransform {
            rotation,
            position: Tet::centroid(tet.coords) - rotation * Tet::centroid(tet.home),
        }
    }

    fn snapshot(&self) -> PuzzleSnapshot {
        let stickers = self
            .tets
            .iter()
            .enumerate()
            .flat_map(|(i, tet)| {
                (0..4u8)
                    .filter(|&m| tet.home[m as usize] == 0)
                    .map(move |m| StickerState {
                        piece: PieceId(i as u16),
                        face: vertex_face(tet.orient.apply(m)),
                        color: face_color(vertex_face(m)),
                    })
            })
            .collect();
        PuzzleSnapshot {
            ty: PuzzleTypeEnum::Pyraminx,
            stickers,
        }
    }

    fn is_solved(&self) -> bool {
        self.tets
            .iter()
            .all(|tet| tet.coords == tet.home && tet.orient == VertexPerm::IDENTITY)
    }

    fn move_pool(&self) -> Vec<Move> {
        let mut pool = vec![];
        for face in [Face::Up, Face::Left, Face::Right, Face::Back] {
            for wide in [false, true] {
                for direction in TwistDirection::iter() {
                    pool.push(Move::Face {
                        face,
                        direction,
                        depth: 1,
                        wide,
                    });
                }
            }
        }
        pool
    }

    fn scramble_moves_count(&self) -> usize {
        15
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::tests::{apply_all, descriptors};

    #[test]
    fn test_tip_vs_wide_selection_counts() {
        // A tip move affects exactly the tip tetrahedron; a wide move affects
        // the tip plus the full second row.
        let p = Pyraminx::new();
        for face in [Face::Up, Face::Left, Face::Right, Face::Back] {
            assert_eq!(p.select(Move::face(face, TwistDirection::CW)).len(), 1);
            assert_eq!(p.select(Move::wide(face, TwistDirection::CW)).len(), 4);
        }
    }

    #[test]
    fn test_tip_is_inside_its_wide_layer() {
        let p = Pyraminx::new();
        let tip = p.select(Move::face(Face::Up, TwistDirection::CW));
        let wide = p.select(Move::wide(Face::Up, TwistDirection::CW));
        assert!(tip.iter().all(|piece| wide.contains(piece)));
    }

    #[test]
    fn test_move_inverse_cancellation() {
        for face in [Face::Up, Face::Left, Face::Right, Face::Back] {
            for wide in [false, true] {
                let mut p = Pyraminx::new();
                let before = descriptors(&p);
                let mv = Move::Face {
                    face,
                    direction: TwistDirection::CW,
                    depth: 1,
                    wide,
                };
                apply_all(&mut p, [mv, mv.reverse()]);
                assert_eq!(descriptors(&p), before);
                assert!(p.is_solved());
            }
        }
    }

    #[test]
    fn test_three_turns_are_identity() {
        let mut p = Pyraminx::new();
        let before = descriptors(&p);
        let mv = Move::wide(Face::Left, TwistDirection::CW);
        apply_all(&mut p, [mv; 3]);
        assert_eq!(descriptors(&p), before);
        assert!(p.is_solved());
    }

    #[test]
    fn test_wide_move_mixes_second_row() {
        let mut p = Pyraminx::new();
        let before = descriptors(&p);
        p.apply(Move::wide(Face::Up, TwistDirection::CW));
        let after = descriptors(&p);
        let changed = before
            .iter()
            .zip(&after)
            .filter(|(b, a)| b != a)
            .count();
        // The tip spins in place (same coordinates); the three second-row
        // pieces cycle.
        assert_eq!(changed, 3);
        assert!(!p.is_solved());

        // Membership is recomputed from the settled geometry: the wide layer
        // is still exactly four pieces.
        assert_eq!(p.select(Move::wide(Face::Up, TwistDirection::CW)).len(), 4);
    }

    #[test]
    fn test_tip_turn_changes_orientation_only() {
        let mut p = Pyraminx::new();
        let before = descriptors(&p);
        p.apply(Move::face(Face::Back, TwistDirection::CCW));
        // Coordinates unchanged; the puzzle is still not solved because the
        // tip's stickers rotated.
        assert_eq!(descriptors(&p), before);
        assert!(!p.is_solved());
    }

    #[test]
    fn test_rotation_table_is_closed() {
        assert_eq!(ROTATIONS.len(), 12);
        for v in 0..4 {
            for d in 0..2 {
                assert!(ROTATIONS.contains_key(&CYCLES[v][d]));
                // Each cycle fixes its own vertex and moves the other three.
                let perm = CYCLES[v][d];
                assert_eq!(perm.apply(v as u8), v as u8);
                for w in 0..4u8 {
                    if w != v as u8 {
                        assert_ne!(perm.apply(w), w);
                    }
                }
            }
        }
        // CW and CCW about the same vertex are inverse permutations.
        for v in 0..4 {
            assert_eq!(
                CYCLES[v][0].compose(CYCLES[v][1]),
                VertexPerm::IDENTITY
            );
        }
    }
}
