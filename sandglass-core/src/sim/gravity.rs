//! Per-tick gravity pass
//!
//! Gravity pulls towards the logical corner `(0, 7)`. From `(x, y)` a grain
//! can slide *left* to `(x - 1, y)`, *right* to `(x, y + 1)`, or fall
//! straight *down* to `(x - 1, y + 1)`. Every move lowers the grain's sweep
//! slice, so walking the slices from the gravity corner outward moves each
//! grain at most once per tick.
//!
//! Both matrices are stepped with the same geometry; grains never cross
//! between them here.

use rand::{Rng, RngCore};

use super::sweep::{diagonal, SweepDirection, SLICES};
use crate::traits::{MatrixId, MatrixPair, MATRIX_SIZE};

const MAX: u8 = MATRIX_SIZE - 1;

/// A single grain movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Move {
    Down,
    Left,
    Right,
}

impl Move {
    /// Destination of a grain at `(x, y)`
    ///
    /// Callers must have checked the move is legal for this cell.
    pub const fn target(self, x: u8, y: u8) -> (u8, u8) {
        match self {
            Move::Down => (x - 1, y + 1),
            Move::Left => (x - 1, y),
            Move::Right => (x, y + 1),
        }
    }
}

fn can_go_left<M: MatrixPair>(m: &M, id: MatrixId, x: u8, y: u8) -> bool {
    x != 0 && !m.get(id, x - 1, y)
}

fn can_go_right<M: MatrixPair>(m: &M, id: MatrixId, x: u8, y: u8) -> bool {
    y != MAX && !m.get(id, x, y + 1)
}

/// Choose the move for the grain at `(x, y)`, if it can move at all
///
/// Straight down requires both side paths to be open as well, so a grain
/// never slips diagonally between two neighbours. With both sides open and
/// no way down the direction is a coin flip drawn from `rng`.
pub fn plan_move<M: MatrixPair, R: RngCore>(
    matrices: &M,
    matrix: MatrixId,
    x: u8,
    y: u8,
    rng: &mut R,
) -> Option<Move> {
    if !matrices.get(matrix, x, y) {
        return None;
    }

    let left = can_go_left(matrices, matrix, x, y);
    let right = can_go_right(matrices, matrix, x, y);

    match (left, right) {
        (false, false) => None,
        (true, true) if !matrices.get(matrix, x - 1, y + 1) => Some(Move::Down),
        (true, false) => Some(Move::Left),
        (false, true) => Some(Move::Right),
        (true, true) => {
            if rng.gen::<bool>() {
                Some(Move::Left)
            } else {
                Some(Move::Right)
            }
        }
    }
}

/// Try to move the grain at `(x, y)`; returns true if it moved
pub fn move_particle<M: MatrixPair, R: RngCore>(
    matrices: &mut M,
    matrix: MatrixId,
    x: u8,
    y: u8,
    rng: &mut R,
) -> bool {
    match plan_move(matrices, matrix, x, y, rng) {
        Some(step) => {
            let (tx, ty) = step.target(x, y);
            matrices.set(matrix, x, y, false);
            matrices.set(matrix, tx, ty, true);
            true
        }
        None => false,
    }
}

/// Run one gravity tick over both matrices
///
/// Each slice is walked in a direction picked at random so that ties between
/// neighbouring grains do not always resolve the same way. Returns true if
/// any grain in either matrix moved.
pub fn step<M: MatrixPair, R: RngCore>(matrices: &mut M, rng: &mut R) -> bool {
    let mut moved = false;

    for slice in 0..SLICES {
        let direction = if rng.gen::<bool>() {
            SweepDirection::Ascending
        } else {
            SweepDirection::Descending
        };

        for (x, y) in diagonal(slice, direction) {
            moved |= move_particle(matrices, MatrixId::B, x, y, rng);
            moved |= move_particle(matrices, MatrixId::A, x, y, rng);
        }
    }

    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{fill, ParticleField};
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5A4D)
    }

    fn field_from_bits(a: u64, b: u64) -> ParticleField {
        let mut field = ParticleField::new();
        for i in 0..64u8 {
            let (x, y) = (i % 8, i / 8);
            field.set(MatrixId::A, x, y, a & (1 << i) != 0);
            field.set(MatrixId::B, x, y, b & (1 << i) != 0);
        }
        field
    }

    #[test]
    fn test_empty_cell_does_not_move() {
        let field = ParticleField::new();
        assert_eq!(plan_move(&field, MatrixId::A, 3, 3, &mut rng()), None);
    }

    #[test]
    fn test_free_grain_falls_down() {
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 3, 3, true);
        assert_eq!(plan_move(&field, MatrixId::A, 3, 3, &mut rng()), Some(Move::Down));

        assert!(move_particle(&mut field, MatrixId::A, 3, 3, &mut rng()));
        assert!(!field.get(MatrixId::A, 3, 3));
        assert!(field.get(MatrixId::A, 2, 4));
    }

    #[test]
    fn test_blocked_down_picks_a_side() {
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 3, 3, true);
        field.set(MatrixId::A, 2, 4, true);

        let mut rng = rng();
        for _ in 0..32 {
            let step = plan_move(&field, MatrixId::A, 3, 3, &mut rng);
            assert!(matches!(step, Some(Move::Left) | Some(Move::Right)));
        }
    }

    #[test]
    fn test_one_side_open() {
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 3, 3, true);
        field.set(MatrixId::A, 2, 3, true);
        assert_eq!(plan_move(&field, MatrixId::A, 3, 3, &mut rng()), Some(Move::Right));

        let mut field = ParticleField::new();
        field.set(MatrixId::A, 3, 3, true);
        field.set(MatrixId::A, 3, 4, true);
        assert_eq!(plan_move(&field, MatrixId::A, 3, 3, &mut rng()), Some(Move::Left));
    }

    #[test]
    fn test_grain_on_two_supports_is_stuck() {
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 3, 3, true);
        field.set(MatrixId::A, 2, 3, true);
        field.set(MatrixId::A, 3, 4, true);
        assert_eq!(plan_move(&field, MatrixId::A, 3, 3, &mut rng()), None);
    }

    #[test]
    fn test_edges() {
        // Left edge: only slides right, never down
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 0, 2, true);
        assert_eq!(plan_move(&field, MatrixId::A, 0, 2, &mut rng()), Some(Move::Right));

        // Bottom edge: only slides left
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 4, 7, true);
        assert_eq!(plan_move(&field, MatrixId::A, 4, 7, &mut rng()), Some(Move::Left));

        // Gravity corner: nowhere to go
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 0, 7, true);
        assert_eq!(plan_move(&field, MatrixId::A, 0, 7, &mut rng()), None);
    }

    #[test]
    fn test_fill_is_at_rest() {
        let mut field = ParticleField::new();
        fill(&mut field, MatrixId::B, 60);
        let before = field.clone();

        assert!(!step(&mut field, &mut rng()));
        assert_eq!(field, before);
    }

    #[test]
    fn test_single_grain_settles_in_corner() {
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 7, 0, true);
        let mut rng = rng();

        let mut ticks = 0;
        while step(&mut field, &mut rng) {
            ticks += 1;
            assert!(ticks <= 14, "grain kept moving");
        }
        assert!(field.get(MatrixId::A, 0, 7));
        assert_eq!(field.count(MatrixId::A), 1);
    }

    #[test]
    fn test_matrices_do_not_mix() {
        let mut field = ParticleField::new();
        fill(&mut field, MatrixId::A, 10);
        field.set(MatrixId::B, 7, 0, true);
        let mut rng = rng();

        for _ in 0..20 {
            step(&mut field, &mut rng);
        }
        assert_eq!(field.count(MatrixId::A), 10);
        assert_eq!(field.count(MatrixId::B), 1);
    }

    #[test]
    fn test_same_seed_same_trace() {
        let mut first = field_from_bits(0x00FF_00FF_00FF_00FF, 0x0F0F_0F0F_0F0F_0F0F);
        let mut second = first.clone();
        let mut rng_a = SmallRng::seed_from_u64(7);
        let mut rng_b = SmallRng::seed_from_u64(7);

        for _ in 0..10 {
            assert_eq!(step(&mut first, &mut rng_a), step(&mut second, &mut rng_b));
            assert_eq!(first, second);
        }
    }

    proptest! {
        #[test]
        fn prop_gravity_conserves_particles(a: u64, b: u64, seed: u64, rotation in 0u16..4) {
            let mut field = field_from_bits(a, b);
            field.set_rotation(rotation * 90);
            let (count_a, count_b) = (field.count(MatrixId::A), field.count(MatrixId::B));
            let mut rng = SmallRng::seed_from_u64(seed);

            for _ in 0..4 {
                step(&mut field, &mut rng);
                prop_assert_eq!(field.count(MatrixId::A), count_a);
                prop_assert_eq!(field.count(MatrixId::B), count_b);
            }
        }

        #[test]
        fn prop_edge_grains_never_leave_the_grid(a: u64, seed: u64, y in 0u8..7, x in 0u8..8) {
            let mut field = field_from_bits(a, 0);
            let mut rng = SmallRng::seed_from_u64(seed);

            // Left edge never moves left or down
            field.set(MatrixId::A, 0, y, true);
            let step_left = plan_move(&field, MatrixId::A, 0, y, &mut rng);
            prop_assert!(step_left.is_none() || step_left == Some(Move::Right));

            // Bottom edge never moves right or down
            field.set(MatrixId::A, x, 7, true);
            let step_bottom = plan_move(&field, MatrixId::A, x, 7, &mut rng);
            prop_assert!(step_bottom.is_none() || step_bottom == Some(Move::Left));
        }
    }
}
