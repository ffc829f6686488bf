//! Square-1: two layers of corner and edge wedges plus the equatorial slice.
//!
//! Piece positions are angles in whole degrees, always multiples of 30;
//! poses handed to the render sink are reconstructed from the descriptor
//! each frame, so nothing continuous accumulates between moves.

use cgmath::{Quaternion, Rad, Rotation3, Vector3, Zero};
use smallvec::SmallVec;
use std::f32::consts::PI;
use std::time::Duration;

use super::common::*;
use super::geometry::{MoveGeometry, PieceTransform};
use crate::colors::{sq1, Rgb};

const SLICE_MS: u64 = 350;
/// Per-step turn duration; a turn animates `min(|amount| * 80, 400)` ms.
const TURN_STEP_MS: u64 = 80;
const TURN_MAX_MS: u64 = 400;

fn norm_angle(a: i32) -> u16 {
    a.rem_euclid(360) as u16
}

/// Returns the quadrant color of the side wall at `angle` degrees.
fn side_color(angle: u16) -> Rgb {
    match angle % 360 {
        0..=89 => sq1::RIGHT,
        90..=179 => sq1::FRONT,
        180..=269 => sq1::LEFT,
        _ => sq1::BACK,
    }
}
/// Returns the quadrant face of the side wall at `angle` degrees.
fn side_face(angle: u16) -> Face {
    match angle % 360 {
        0..=89 => Face::Right,
        90..=179 => Face::Front,
        180..=269 => Face::Left,
        _ => Face::Back,
    }
}

/// Rotation that adds `delta` degrees to every piece's angular coordinate
/// (counterclockwise seen from above).
fn yaw(delta_deg: f32) -> Quaternion<f32> {
    Quaternion::from_angle_y(Rad(-delta_deg.to_radians()))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Wedge {
    kind: PieceKind,
    home_layer: LayerHalf,
    home_angle: u16,
    layer: LayerHalf,
    angle: u16,
    span: u16,
    /// Toggled by every slice; a flipped piece's angular order is mirrored.
    flipped: bool,
}

/// A Square-1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareOne {
    wedges: Vec<Wedge>,
    info: Vec<PieceInfo>,
}
impl SquareOne {
    /// Constructs a solved Square-1: the top layer alternates corner/edge
    /// starting with a corner at 0°, the bottom layer starts with an edge.
    pub fn new() -> Self {
        let mut wedges = vec![];
        let mut info = vec![];
        for layer in [LayerHalf::Top, LayerHalf::Bottom] {
            let mut angle = 0_u16;
            for _ in 0..4 {
                let order = match layer {
                    LayerHalf::Top => [PieceKind::Corner, PieceKind::Edge],
                    LayerHalf::Bottom => [PieceKind::Edge, PieceKind::Corner],
                };
                for kind in order {
                    let span = match kind {
                        PieceKind::Corner => 60,
                        _ => 30,
                    };
                    wedges.push(Wedge {
                        kind,
                        home_layer: layer,
                        home_angle: angle,
                        layer,
                        angle,
                        span,
                        flipped: false,
                    });
                    info.push(PieceInfo {
                        kind,
                        stickers: wedge_stickers(layer, angle, span),
                    });
                    angle += span;
                }
            }
        }
        Self { wedges, info }
    }

    /// Returns whether the slice can turn: no piece's span may straddle the
    /// 0° or 180° cut line.
    pub fn can_slice(&self) -> bool {
        self.wedges
            .iter()
            .all(|w| !straddles(w, 0) && !straddles(w, 180))
    }

    /// Pieces entirely within the right half (angles 0..180), both layers.
    fn right_half(&self) -> Vec<PieceId> {
        self.wedges
            .iter()
            .enumerate()
            .filter(|(_, w)| w.angle < 180 && w.angle + w.span <= 180)
            .map(|(i, _)| PieceId(i as u16))
            .collect()
    }
}
impl Default for SquareOne {
    fn default() -> Self {
        Self::new()
    }
}

fn straddles(wedge: &Wedge, cut: u16) -> bool {
    let start = wedge.angle % 360;
    let end = (wedge.angle + wedge.span) % 360;
    if start < end {
        cut > start && cut < end
    } else {
        cut > start || cut < end
    }
}

fn wedge_stickers(layer: LayerHalf, angle: u16, span: u16) -> SmallVec<[StickerInfo; 6]> {
    let cap = match layer {
        LayerHalf::Top => StickerInfo {
            face: Face::Up,
            color: sq1::TOP,
        },
        LayerHalf::Bottom => StickerInfo {
            face: Face::Down,
            color: sq1::BOTTOM,
        },
    };
    let mut stickers: SmallVec<[StickerInfo; 6]> = SmallVec::new();
    stickers.push(cap);
    // Side walls sample the quadrant color at the middle of each 30° part.
    stickers.push(StickerInfo {
        face: side_face(angle + 15),
        color: side_color(angle + 15),
    });
    if span == 60 {
        stickers.push(StickerInfo {
            face: side_face(angle + 45),
            color: side_color(angle + 45),
        });
    }
    stickers
}

impl PuzzleState for SquareOne {
    fn ty(&self) -> PuzzleTypeEnum {
        PuzzleTypeEnum::SquareOne
    }
    fn pieces(&self) -> &[PieceInfo] {
        &self.info
    }
    fn descriptor(&self, piece: PieceId) -> SpatialDescriptor {
        let w = &self.wedges[piece.0 as usize];
        SpatialDescriptor::Angular {
            layer: w.layer,
            angle_deg: w.angle,
            span_deg: w.span,
        }
    }

    fn select(&self, mv: Move) -> Vec<PieceId> {
        match mv {
            Move::Turn { layer, .. } => self
                .wedges
                .iter()
                .enumerate()
                .filter(|(_, w)| w.layer == layer)
                .map(|(i, _)| PieceId(i as u16))
                .collect(),
            Move::Slice => self.right_half(),
            Move::Face { .. } => vec![],
        }
    }

    fn is_legal(&self, mv: Move) -> bool {
        match mv {
            Move::Turn { amount, .. } => amount != 0,
            // A slice against a straddling piece is rejected outright, never
            // partially executed.
            Move::Slice => self.can_slice(),
            Move::Face { .. } => false,
        }
    }

    fn move_geometry(&self, mv: Move) -> MoveGeometry {
        match mv {
            Move::Turn { amount, .. } => MoveGeometry {
                axis: Vector3::unit_y(),
                pivot: Vector3::zero(),
                angle: Rad(-(amount as f32 * 30.0).to_radians()),
                base_duration: Duration::from_millis(
                    (amount.unsigned_abs() as u64 * TURN_STEP_MS).min(TURN_MAX_MS),
                ),
            },
            Move::Slice => MoveGeometry {
                axis: Vector3::unit_z(),
                pivot: Vector3::zero(),
                angle: Rad(PI),
                base_duration: Duration::from_millis(SLICE_MS),
            },
            Move::Face { .. } => MoveGeometry::noop(),
        }
    }

    fn apply(&mut self, mv: Move) {
        match mv {
            Move::Turn { layer, amount } => {
                let delta = amount as i32 * 30;
                for w in &mut self.wedges {
                    if w.layer == layer {
                        w.angle = norm_angle(w.angle as i32 + delta);
                    }
                }
            }
            Move::Slice => {
                if !self.can_slice() {
                    return;
                }
                for piece in self.right_half() {
                    let w = &mut self.wedges[piece.0 as usize];
                    // 180° about the cut: the arc [a, a+s) lands on
                    // [180-a-s, 180-a), and the piece changes layers.
                    w.angle = norm_angle(180 - w.angle as i32 - w.span as i32);
                    w.layer = w.layer.opposite();
                    w.flipped = !w.flipped;
                }
            }
            Move::Face { .. } => {}
        }
    }

    fn rest_transform(&self, piece: PieceId) -> PieceTransform {
        let w = &self.wedges[piece.0 as usize];
        let rotation = if w.flipped {
            // A flipped piece's pose is a half-turn about the cut axis
            // followed by a yaw to its current start angle.
            let start_after_flip = 180 - w.home_angle as i32 - w.span as i32;
            yaw((w.angle as i32 - start_after_flip) as f32)
                * Quaternion::from_angle_z(Rad(PI))
        } else {
            yaw((w.angle as i32 - w.home_angle as i32) as f32)
        };
        PieceTransform {
            rotation,
            position: Vector3::zero(),
        }
    }

    fn snapshot(&self) -> PuzzleSnapshot {
        let mut stickers = vec![];
        for (i, (w, info)) in self.wedges.iter().zip(&self.info).enumerate() {
            let piece = PieceId(i as u16);
            // Cap sticker: pieces keep their construction-time cap color;
            // a flipped piece shows it on the other layer's face.
            let cap = info.stickers[0];
            let cap_face = if w.flipped {
                cap.face.opposite()
            } else {
                cap.face
            };
            stickers.push(StickerState {
                piece,
                face: cap_face,
                color: cap.color,
            });
            // Side stickers: a flip mirrors the order of the 30° parts.
            let offsets: &[u16] = if w.span == 60 { &[15, 45] } else { &[15] };
            for (k, &offset) in offsets.iter().enumerate() {
                let sample = if w.flipped {
                    norm_angle(w.angle as i32 + w.span as i32 - offset as i32)
                } else {
                    norm_angle(w.angle as i32 + offset as i32)
                };
                stickers.push(StickerState {
                    piece,
                    face: side_face(sample),
                    color: info.stickers[k + 1].color,
                });
            }
        }
        PuzzleSnapshot {
            ty: PuzzleTypeEnum::SquareOne,
            stickers,
        }
    }

    fn is_solved(&self) -> bool {
        self.wedges
            .iter()
            .all(|w| w.layer == w.home_layer && w.angle == w.home_angle && !w.flipped)
    }

    fn move_pool(&self) -> Vec<Move> {
        let mut pool = vec![Move::Slice];
        for layer in [LayerHalf::Top, LayerHalf::Bottom] {
            for amount in (-5..=5).filter(|&a| a != 0) {
                pool.push(Move::Turn { layer, amount });
            }
        }
        pool
    }

    fn scramble_moves_count(&self) -> usize {
        20
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::tests::{apply_all, descriptors};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_solved_layout() {
        let p = SquareOne::new();
        assert_eq!(p.wedges.len(), 16);
        // Every layer covers the full circle.
        for layer in [LayerHalf::Top, LayerHalf::Bottom] {
            let total: u16 = p
                .wedges
                .iter()
                .filter(|w| w.layer == layer)
                .map(|w| w.span)
                .sum();
            assert_eq!(total, 360);
        }
        assert!(p.is_solved());
        assert!(p.can_slice());
    }

    #[test]
    fn test_turn_updates_angles() {
        let mut p = SquareOne::new();
        p.apply(Move::Turn {
            layer: LayerHalf::Top,
            amount: 1,
        });
        let SpatialDescriptor::Angular { angle_deg, .. } = p.descriptor(PieceId(0)) else {
            panic!("square-1 pieces have angular descriptors");
        };
        assert_eq!(angle_deg, 30);
        // Bottom layer untouched.
        let SpatialDescriptor::Angular { angle_deg, .. } = p.descriptor(PieceId(8)) else {
            panic!();
        };
        assert_eq!(angle_deg, 0);
        // All angles stay multiples of 30.
        for i in 0..16u16 {
            let SpatialDescriptor::Angular { angle_deg, .. } = p.descriptor(PieceId(i)) else {
                panic!();
            };
            assert_eq!(angle_deg % 30, 0);
        }
    }

    #[test]
    fn test_turn_and_inverse_cancel() {
        let mut p = SquareOne::new();
        let before = descriptors(&p);
        let mv = Move::Turn {
            layer: LayerHalf::Bottom,
            amount: 3,
        };
        apply_all(&mut p, [mv, mv.reverse()]);
        assert_eq!(descriptors(&p), before);
    }

    #[test]
    fn test_slice_swaps_right_half_layers() {
        let mut p = SquareOne::new();
        let right = p.right_half();
        // Solved layout: each layer has four pieces entirely inside 0..180.
        assert_eq!(right.len(), 8);
        p.apply(Move::Slice);
        for piece in right {
            let SpatialDescriptor::Angular { layer, .. } = p.descriptor(piece) else {
                panic!();
            };
            let home = p.wedges[piece.0 as usize].home_layer;
            assert_eq!(layer, home.opposite());
        }
    }

    #[test]
    fn test_slice_involution() {
        let mut p = SquareOne::new();
        let before = descriptors(&p);
        p.apply(Move::Slice);
        assert_ne!(descriptors(&p), before);
        p.apply(Move::Slice);
        assert_eq!(descriptors(&p), before);
        assert!(p.is_solved());
    }

    #[test]
    fn test_slice_rejected_when_straddled() {
        let mut p = SquareOne::new();
        // Turn the top layer back 30°: the corner that started at 0° now
        // sits at 330° with a 60° span, crossing the 0° cut line.
        p.apply(Move::Turn {
            layer: LayerHalf::Top,
            amount: -1,
        });
        let straddler = p
            .wedges
            .iter()
            .find(|w| w.kind == PieceKind::Corner && w.angle == 330)
            .expect("a corner crosses the cut");
        assert!(straddles(straddler, 0));
        assert!(!p.can_slice());
        assert!(!p.is_legal(Move::Slice));

        // The slice must be a no-op, not a partial execution.
        let before = descriptors(&p);
        p.apply(Move::Slice);
        assert_eq!(descriptors(&p), before);
    }

    #[test]
    fn test_zero_amount_turn_is_illegal() {
        let p = SquareOne::new();
        assert!(!p.is_legal(Move::Turn {
            layer: LayerHalf::Top,
            amount: 0,
        }));
    }

    #[test]
    fn test_slice_turn_slice_round_trip() {
        // A slice, a full-circle turn, and another slice restore the start.
        let mut p = SquareOne::new();
        let before = descriptors(&p);
        apply_all(
            &mut p,
            [
                Move::Slice,
                Move::Turn {
                    layer: LayerHalf::Top,
                    amount: 12,
                },
                Move::Slice,
            ],
        );
        assert_eq!(descriptors(&p), before);
    }
}
