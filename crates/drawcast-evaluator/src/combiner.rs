//! Combination: merging dimension boards into one board.
//!
//! # Design: Linear Weighted Sum
//!
//! ```text
//! combined[z] = w₁·board₁[z] + w₂·board₂[z] + ... + w₁₀·board₁₀[z]
//! ```
//!
//! Where `boardᵢ[z]` is the normalized score of sign `z` in dimension `i` (∈ \[0, 100\]) and
//! `wᵢ` is the weight learned by the genetic algorithm (∈ \[0, 10\]).
//!
//! Combination is pure: the same weights and boards always give bit-identical results, which
//! keeps backtests reproducible. Ranking of the result is done by
//! [`ScoreBoard::ranking()`](crate::score_board::ScoreBoard::ranking).
//!
//! # Jitter
//!
//! The user-facing prediction path may add a bounded per-sign perturbation ([`Jitter`]) to the
//! combined board. It draws from the caller's generator, so a seeded generator gives
//! reproducible predictions. Backtests never apply it.

use std::iter;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::score_board::ScoreBoard;

/// Linear weighted-sum combiner; weights are supplied per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCombiner;

impl ScoreCombiner {
    /// Computes `Σ weightᵢ × boardᵢ`.
    ///
    /// # Panics
    ///
    /// Panics if `weights.len() != boards.len()`
    #[must_use]
    pub fn combine(weights: &[f32], boards: &[ScoreBoard]) -> ScoreBoard {
        assert_eq!(weights.len(), boards.len());
        let mut combined = ScoreBoard::default();
        for (w, board) in iter::zip(weights, boards) {
            combined.add_scaled(board, *w);
        }
        combined
    }
}

/// Bounded random perturbation added to each sign on the prediction path.
///
/// Each sign gains an independent value drawn uniformly from `[0, amplitude)`. An amplitude of
/// zero (or less) disables the jitter and leaves the generator untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Jitter {
    pub amplitude: f32,
}

impl Default for Jitter {
    fn default() -> Self {
        Self { amplitude: 5.0 }
    }
}

impl Jitter {
    pub const NONE: Self = Self { amplitude: 0.0 };

    pub fn apply<R>(&self, board: &mut ScoreBoard, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.amplitude <= 0.0 {
            return;
        }
        let noise = ScoreBoard::from_fn(|_| rng.random_range(0.0..self.amplitude));
        board.add_scaled(&noise, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use drawcast_core::Zodiac;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn random_boards(rng: &mut Pcg64Mcg) -> Vec<ScoreBoard> {
        (0..10)
            .map(|_| ScoreBoard::from_fn(|_| rng.random_range(0.0..=100.0)))
            .collect()
    }

    #[test]
    fn test_combine_is_deterministic() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let boards = random_boards(&mut rng);
        let weights: Vec<f32> = (0..10).map(|_| rng.random_range(0.0..=10.0)).collect();
        let a = ScoreCombiner::combine(&weights, &boards);
        let b = ScoreCombiner::combine(&weights, &boards);
        assert_eq!(a, b);
        assert_eq!(a.ranking(), b.ranking());
    }

    #[test]
    fn test_combine_is_linear_in_each_weight() {
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let boards = random_boards(&mut rng);
        let mut weights = vec![1.0; 10];
        let base = ScoreCombiner::combine(&weights, &boards);
        weights[3] += 2.5;
        let raised = ScoreCombiner::combine(&weights, &boards);
        for z in Zodiac::ALL {
            assert!(raised[z] >= base[z]);
            let expected = base[z] + 2.5 * boards[3][z];
            assert!((raised[z] - expected).abs() < 1e-2);
        }
    }

    #[test]
    #[should_panic(expected = "assertion")]
    fn test_combine_rejects_mismatched_lengths() {
        let _ = ScoreCombiner::combine(&[1.0], &[]);
    }

    #[test]
    fn test_jitter_is_bounded_and_seeded() {
        let board = ScoreBoard::default();
        let jitter = Jitter { amplitude: 3.0 };

        let mut a = board;
        jitter.apply(&mut a, &mut Pcg64Mcg::seed_from_u64(9));
        let mut b = board;
        jitter.apply(&mut b, &mut Pcg64Mcg::seed_from_u64(9));
        assert_eq!(a, b);
        assert!(a.iter().all(|(_, v)| (0.0..3.0).contains(&v)));

        let mut c = board;
        Jitter::NONE.apply(&mut c, &mut Pcg64Mcg::seed_from_u64(9));
        assert_eq!(c, board);
    }
}
