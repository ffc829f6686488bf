//! Scramble sequence generation.
//!
//! Sequences are generated against a simulated copy of the puzzle so that
//! every validity check (notably the Square-1 slice) sees the settled state
//! that move will actually apply to.

use rand::Rng;

use super::common::*;

/// Generates `count` scramble moves for `puzzle`.
///
/// The only validity constraint is "no immediately repeated face"; for the
/// Square-1 every third move is a slice attempt, silently skipped when a
/// piece straddles a cut line at that moment.
pub fn scramble_moves<R: Rng + ?Sized>(puzzle: &Puzzle, count: usize, rng: &mut R) -> Vec<Move> {
    let mut sim = puzzle.clone();
    let mut moves = Vec::with_capacity(count);

    if puzzle.ty() == PuzzleTypeEnum::SquareOne {
        for i in 0..count {
            if i % 3 == 2 {
                if sim.is_legal(Move::Slice) {
                    sim.apply(Move::Slice);
                    moves.push(Move::Slice);
                }
                continue;
            }
            let layer = if rng.random_bool(0.5) {
                LayerHalf::Top
            } else {
                LayerHalf::Bottom
            };
            let mut amount: i8 = rng.random_range(-5..=5);
            if amount == 0 {
                amount = 1;
            }
            let mv = Move::Turn { layer, amount };
            sim.apply(mv);
            moves.push(mv);
        }
        return moves;
    }

    let pool = puzzle.move_pool();
    if pool.is_empty() {
        log::warn!("{} has no legal moves to scramble with", puzzle.ty());
        return moves;
    }
    let mut last_face = None;
    for _ in 0..count {
        let mv = loop {
            let candidate = pool[rng.random_range(0..pool.len())];
            let Move::Face { face, .. } = candidate else {
                break candidate;
            };
            // Avoid the same face twice in a row.
            if Some(face) != last_face {
                break candidate;
            }
        };
        if let Move::Face { face, .. } = mv {
            last_face = Some(face);
        }
        sim.apply(mv);
        moves.push(mv);
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_no_immediate_face_repeat() {
        let puzzle = Puzzle::new(PuzzleTypeEnum::Rubiks { layer_count: 4 });
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let moves = scramble_moves(&puzzle, 100, &mut rng);
        assert_eq!(moves.len(), 100);
        for pair in moves.windows(2) {
            let (Move::Face { face: a, .. }, Move::Face { face: b, .. }) = (pair[0], pair[1])
            else {
                panic!("cube scrambles are face moves");
            };
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_sq1_every_third_move_is_a_slice_attempt() {
        let puzzle = Puzzle::new(PuzzleTypeEnum::SquareOne);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let moves = scramble_moves(&puzzle, 60, &mut rng);
        // Slices may be skipped, so the sequence can be shorter, but it must
        // contain at least one slice and no slice may follow a straddled
        // state.
        assert!(moves.iter().any(|m| *m == Move::Slice));
        let mut sim = Puzzle::new(PuzzleTypeEnum::SquareOne);
        for mv in moves {
            assert!(sim.is_legal(mv));
            sim.apply(mv);
        }
    }

    #[test]
    fn test_seeded_scramble_is_reproducible() {
        let puzzle = Puzzle::new(PuzzleTypeEnum::Pyraminx);
        let a = scramble_moves(&puzzle, 20, &mut ChaCha8Rng::seed_from_u64(11));
        let b = scramble_moves(&puzzle, 20, &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scramble_moves_are_legal_on_replayed_state() {
        for ty in [
            PuzzleTypeEnum::Cuboid { dims: [1, 2, 3] },
            PuzzleTypeEnum::Tree,
            PuzzleTypeEnum::Floppy {
                variant: FloppyVariant::Block,
            },
        ] {
            let puzzle = Puzzle::new(ty);
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            let mut sim = puzzle.clone();
            for mv in scramble_moves(&puzzle, 25, &mut rng) {
                assert!(sim.is_legal(mv), "{mv} illegal on {ty}");
                sim.apply(mv);
            }
        }
    }
}
