//! Scoring dimensions.
//!
//! Each dimension is an independent heuristic mapping a draw history to scores over the 12
//! zodiac signs. Every dimension produces a board normalized to \[0, 100\] (its own maximum
//! becomes 100), so no dimension dominates the combination just because its raw values are
//! larger.
//!
//! # Dimensions
//!
//! **Frequency** ([`frequency`]):
//! - [`Trend`] - recent special-number signs, recent draws counting more
//! - [`Omission`] - signs absent for a long time ("cold is due")
//!
//! **Relations** ([`relation`]):
//! - [`RelationLink`] - harmony and triad partners of the latest sign
//! - [`ColorContrarian`] - members of the least drawn color band
//! - [`ElementGeneration`] - members of the element generated by the latest element
//! - [`PlainCooccurrence`] - signs of the latest plain numbers
//! - [`OffsetAdjacency`] - numbers at fixed offsets from the latest special
//!
//! **Digits** ([`digit`]):
//! - [`DigitAffinity::tail`] - numbers sharing frequent ones-digits
//! - [`DigitAffinity::head`] - numbers sharing frequent tens-digits
//!
//! **Analogs** ([`analog`]):
//! - [`HistoricalAnalog`] - what followed past draws resembling the latest one
//!
//! # Processing Pipeline
//!
//! 1. **Extract Raw** - [`ScoreDimension::extract_raw()`] produces raw sign or number scores
//! 2. **Reduce** - number scores are summed per sign
//! 3. **Normalize** - [`ScoreBoard::normalized()`] scales to \[0, 100\]
//!
//! See [`ScoreDimension::score()`] for the complete pipeline. Every dimension returns an all-zero
//! board for an empty history.

use std::fmt;

use crate::{
    score_board::{NumberScores, ScoreBoard},
    scoring_context::ScoringContext,
};

pub use self::{
    analog::{AnalogParams, HistoricalAnalog},
    digit::{DigitAffinity, DigitKind},
    frequency::{Omission, Trend},
    relation::{ColorContrarian, ElementGeneration, OffsetAdjacency, PlainCooccurrence, RelationLink},
};

pub mod analog;
pub mod digit;
pub mod frequency;
pub mod relation;

/// Raw output of a dimension, before reduction and normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DimensionScores {
    Zodiac(ScoreBoard),
    Number(NumberScores),
}

impl DimensionScores {
    #[must_use]
    pub fn to_board(&self, ctx: &ScoringContext<'_>) -> ScoreBoard {
        match self {
            Self::Zodiac(board) => *board,
            Self::Number(scores) => scores.to_board(ctx.zodiac_map()),
        }
    }
}

pub trait ScoreDimension: fmt::Debug + Send + Sync {
    #[must_use]
    fn id(&self) -> &str;
    #[must_use]
    fn name(&self) -> &str;
    #[must_use]
    fn clone_boxed(&self) -> BoxedScoreDimension;

    #[must_use]
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores;

    /// Raw scores reduced to signs and normalized to \[0, 100\].
    #[must_use]
    fn score(&self, ctx: &ScoringContext<'_>) -> ScoreBoard {
        self.extract_raw(ctx).to_board(ctx).normalized()
    }
}

pub type BoxedScoreDimension = Box<dyn ScoreDimension>;

impl Clone for BoxedScoreDimension {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl ScoreDimension for BoxedScoreDimension {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn clone_boxed(&self) -> BoxedScoreDimension {
        self.as_ref().clone_boxed()
    }

    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        self.as_ref().extract_raw(ctx)
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> ScoreBoard {
        self.as_ref().score(ctx)
    }
}

/// All dimensions in weight-vector order, with default parameters.
#[must_use]
pub fn all_dimensions() -> Vec<BoxedScoreDimension> {
    all_dimensions_with(&AnalogParams::default())
}

/// All dimensions in weight-vector order.
#[must_use]
pub fn all_dimensions_with(analog: &AnalogParams) -> Vec<BoxedScoreDimension> {
    vec![
        // frequency
        Box::new(Trend),
        Box::new(Omission),
        // relations
        Box::new(RelationLink),
        // digits
        Box::new(DigitAffinity::tail()),
        Box::new(DigitAffinity::head()),
        // relations
        Box::new(ColorContrarian),
        Box::new(ElementGeneration),
        // analogs
        Box::new(HistoricalAnalog::new(analog.clone())),
        // relations
        Box::new(PlainCooccurrence),
        Box::new(OffsetAdjacency),
    ]
}

/// Scores `ctx` with every dimension, in order.
#[must_use]
pub fn score_all<D>(dimensions: &[D], ctx: &ScoringContext<'_>) -> Vec<ScoreBoard>
where
    D: ScoreDimension,
{
    dimensions.iter().map(|d| d.score(ctx)).collect()
}


#[cfg(test)]
mod tests {
    use drawcast_core::ZodiacMap;

    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let dims = all_dimensions();
        assert_eq!(dims.len(), 10);
        let mut ids: Vec<_> = dims.iter().map(|d| d.id().to_owned()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_empty_history_scores_zero() {
        let map = ZodiacMap::default();
        let ctx = ScoringContext::new(&[], &map);
        for board in score_all(&all_dimensions(), &ctx) {
            assert_eq!(board, ScoreBoard::default());
        }
    }

    #[test]
    fn test_boards_are_normalized() {
        let map = ZodiacMap::default();
        let draws = test_util::specials(&[26, 16, 6, 33, 12, 45, 8, 19, 40, 2, 27, 35]);
        let ctx = ScoringContext::new(&draws, &map);
        for (dim, board) in all_dimensions().iter().zip(score_all(&all_dimensions(), &ctx)) {
            let max = board.max();
            assert!(
                max.abs() < f32::EPSILON || (max - 100.0).abs() < 1e-3,
                "{} max = {max}",
                dim.id()
            );
            assert!(board.iter().all(|(_, v)| v >= 0.0), "{}", dim.id());
        }
    }
}
