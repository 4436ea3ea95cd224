//! Score boards over zodiac signs and numbers.

use std::ops::{Index, IndexMut};

use arrayvec::ArrayVec;
use drawcast_core::{Number, Zodiac, ZodiacMap};

use crate::kill_list::KillList;

/// Upper bound of a normalized board.
pub const NORMALIZED_MAX: f32 = 100.0;

/// Score forced onto killed signs. Far below anything a combination can produce.
pub const KILL_SCORE: f32 = -1.0e9;

/// Scores for the 12 zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBoard([f32; Zodiac::LEN]);

impl ScoreBoard {
    #[must_use]
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Zodiac) -> f32,
    {
        Self(std::array::from_fn(|i| f(Zodiac::from_index(i))))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zodiac, f32)> + '_ {
        Zodiac::ALL.into_iter().zip(self.0.iter().copied())
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.0.iter().copied().fold(f32::MIN, f32::max)
    }

    /// Scales the board so its maximum becomes [`NORMALIZED_MAX`].
    ///
    /// A board whose maximum is not positive carries no signal and becomes all zeros.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let max = self.max();
        if max <= 0.0 {
            return Self::default();
        }
        Self(self.0.map(|v| v.max(0.0) / max * NORMALIZED_MAX))
    }

    /// Adds `other × weight` to this board.
    pub fn add_scaled(&mut self, other: &Self, weight: f32) {
        for (v, o) in self.0.iter_mut().zip(other.0) {
            *v += o * weight;
        }
    }

    /// Forces every sign in `kill_list` to [`KILL_SCORE`].
    pub fn suppress(&mut self, kill_list: &KillList) {
        for &z in kill_list.iter() {
            self[z] = KILL_SCORE;
        }
    }

    /// Ranks signs by descending score; equal scores keep declaration order.
    #[must_use]
    pub fn ranking(&self) -> Ranking {
        let mut order = ArrayVec::from(Zodiac::ALL);
        order.sort_by(|a, b| self[*b].total_cmp(&self[*a]));
        Ranking(order)
    }
}

impl Index<Zodiac> for ScoreBoard {
    type Output = f32;

    fn index(&self, zodiac: Zodiac) -> &f32 {
        &self.0[zodiac.index()]
    }
}

impl IndexMut<Zodiac> for ScoreBoard {
    fn index_mut(&mut self, zodiac: Zodiac) -> &mut f32 {
        &mut self.0[zodiac.index()]
    }
}

/// Scores for the 49 numbers.
///
/// Dimensions that reason about individual numbers fill one of these, and it is reduced to a
/// [`ScoreBoard`] by summing each sign's member numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberScores([f32; Number::COUNT]);

impl Default for NumberScores {
    fn default() -> Self {
        Self([0.0; Number::COUNT])
    }
}

impl NumberScores {
    pub fn iter(&self) -> impl Iterator<Item = (Number, f32)> + '_ {
        Number::all().zip(self.0.iter().copied())
    }

    #[must_use]
    pub fn to_board(&self, map: &ZodiacMap) -> ScoreBoard {
        ScoreBoard::from_fn(|z| map.numbers_of(z).iter().map(|n| self[*n]).sum())
    }
}

impl Index<Number> for NumberScores {
    type Output = f32;

    fn index(&self, number: Number) -> &f32 {
        &self.0[number.index()]
    }
}

impl IndexMut<Number> for NumberScores {
    fn index_mut(&mut self, number: Number) -> &mut f32 {
        &mut self.0[number.index()]
    }
}

/// Signs ordered best-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking(ArrayVec<Zodiac, { Zodiac::LEN }>);

impl Ranking {
    #[must_use]
    pub fn as_slice(&self) -> &[Zodiac] {
        &self.0
    }

    /// The best `k` signs (or all of them if `k > 12`).
    #[must_use]
    pub fn top(&self, k: usize) -> &[Zodiac] {
        &self.0[..k.min(self.0.len())]
    }

    /// Zero-based rank of `zodiac`.
    #[must_use]
    pub fn position(&self, zodiac: Zodiac) -> Option<usize> {
        self.0.iter().position(|z| *z == zodiac)
    }

    #[must_use]
    pub fn is_in_top(&self, zodiac: Zodiac, k: usize) -> bool {
        self.position(zodiac).is_some_and(|rank| rank < k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_scales_to_hundred() {
        let mut board = ScoreBoard::default();
        board[Zodiac::Rat] = 4.0;
        board[Zodiac::Pig] = 2.0;
        let board = board.normalized();
        assert!((board[Zodiac::Rat] - 100.0).abs() < 1e-4);
        assert!((board[Zodiac::Pig] - 50.0).abs() < 1e-4);
        assert!(board[Zodiac::Ox].abs() < f32::EPSILON);
    }

    #[test]
    fn test_normalized_zero_board_stays_zero() {
        assert_eq!(ScoreBoard::default().normalized(), ScoreBoard::default());
    }

    #[test]
    fn test_ranking_ties_keep_declaration_order() {
        let mut board = ScoreBoard::default();
        board[Zodiac::Dog] = 1.0;
        board[Zodiac::Ox] = 1.0;
        let ranking = board.ranking();
        assert_eq!(ranking.top(2), &[Zodiac::Ox, Zodiac::Dog]);
        assert_eq!(ranking.as_slice()[2], Zodiac::Rat);
        assert_eq!(ranking.position(Zodiac::Pig), Some(11));
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_is_in_top_matches_position() {
        let board = ScoreBoard::from_fn(|z| 12.0 - z.index() as f32);
        let ranking = board.ranking();
        assert!(ranking.is_in_top(Zodiac::Rat, 1));
        assert!(ranking.is_in_top(Zodiac::Snake, 6));
        assert!(!ranking.is_in_top(Zodiac::Horse, 6));
        assert!(!ranking.is_in_top(Zodiac::Rat, 0));
        assert!(ranking.is_in_top(Zodiac::Pig, 20));
    }

    #[test]
    fn test_number_scores_reduce_by_sum() {
        let map = ZodiacMap::default();
        let mut scores = NumberScores::default();
        scores[Number::new(1).unwrap()] = 1.0;
        scores[Number::new(13).unwrap()] = 2.0;
        scores[Number::new(2).unwrap()] = 5.0;
        let board = scores.to_board(&map);
        assert!((board[Zodiac::Horse] - 3.0).abs() < f32::EPSILON);
        assert!((board[Zodiac::Snake] - 5.0).abs() < f32::EPSILON);
    }
}
