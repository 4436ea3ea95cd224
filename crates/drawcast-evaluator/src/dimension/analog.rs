//! Historical analog dimension: "find past look-alikes and see what followed".

use serde::{Deserialize, Serialize};

use crate::{
    dimension::{BoxedScoreDimension, DimensionScores, ScoreDimension},
    score_board::ScoreBoard,
    scoring_context::ScoringContext,
};

/// Similarity weights for [`HistoricalAnalog`].
///
/// A past draw's similarity to the latest draw is `zodiac_weight` if their special signs match
/// plus `color_weight` if their special color bands match. Draws reaching `threshold` count as
/// analogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalogParams {
    pub zodiac_weight: f32,
    pub color_weight: f32,
    pub threshold: f32,
    /// Most recent draws never considered as analogs.
    pub skip_recent: usize,
}

impl Default for AnalogParams {
    fn default() -> Self {
        Self {
            zodiac_weight: 30.0,
            color_weight: 20.0,
            threshold: 30.0,
            skip_recent: 2,
        }
    }
}

impl AnalogParams {
    fn similarity(&self, ctx: &ScoringContext<'_>, index: usize) -> f32 {
        let mut similarity = 0.0;
        if ctx.special_zodiacs()[index] == ctx.special_zodiacs()[0] {
            similarity += self.zodiac_weight;
        }
        if ctx.special_color(index) == ctx.special_color(0) {
            similarity += self.color_weight;
        }
        similarity
    }
}

/// Signs that followed past draws resembling the latest one.
///
/// # Raw measurement
///
/// For every draw `i` older than `skip_recent` whose similarity reaches the threshold, the sign
/// of the draw that came right after it (`i - 1`, one step newer) gains the similarity.
///
/// This is the only dimension that scans the full history, so it dominates the cost of a
/// scoring pass.
#[derive(Debug, Clone, Default)]
pub struct HistoricalAnalog {
    params: AnalogParams,
}

impl HistoricalAnalog {
    #[must_use]
    pub fn new(params: AnalogParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &AnalogParams {
        &self.params
    }
}

impl ScoreDimension for HistoricalAnalog {
    fn id(&self) -> &'static str {
        "historical_analog"
    }
    fn name(&self) -> &'static str {
        "Historical Analog"
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let mut board = ScoreBoard::default();
        let zodiacs = ctx.special_zodiacs();
        for i in self.params.skip_recent.max(1)..zodiacs.len() {
            let similarity = self.params.similarity(ctx, i);
            if similarity >= self.params.threshold && similarity > 0.0 {
                board[zodiacs[i - 1]] += similarity;
            }
        }
        DimensionScores::Zodiac(board)
    }
}

#[cfg(test)]
mod tests {
    use drawcast_core::{Zodiac, ZodiacMap};

    use super::*;
    use crate::dimension::test_util;

    #[test]
    fn test_analog_rewards_what_followed() {
        let map = ZodiacMap::default();
        // newest first: 1 (Horse, red) ... index 3 is 13 (Horse, red), followed by 4 (Rabbit)
        let draws = test_util::specials(&[1, 5, 4, 13, 6]);
        let ctx = ScoringContext::new(&draws, &map);
        let DimensionScores::Zodiac(board) = HistoricalAnalog::default().extract_raw(&ctx) else {
            panic!("historical analog scores signs");
        };
        assert!((board[Zodiac::Rabbit] - 50.0).abs() < f32::EPSILON);
        assert!(board[Zodiac::Horse].abs() < f32::EPSILON);
    }

    #[test]
    fn test_analog_skips_recent_draws() {
        let map = ZodiacMap::default();
        // index 1 matches the latest but is within the skipped range
        let draws = test_util::specials(&[1, 13, 5]);
        let ctx = ScoringContext::new(&draws, &map);
        let DimensionScores::Zodiac(board) = HistoricalAnalog::default().extract_raw(&ctx) else {
            panic!("historical analog scores signs");
        };
        assert_eq!(board, ScoreBoard::default());
    }

    #[test]
    fn test_color_only_match_is_below_threshold() {
        let map = ZodiacMap::default();
        // 2 is red like 1 but a different sign: similarity 20 < 30
        let draws = test_util::specials(&[1, 5, 4, 2, 6]);
        let ctx = ScoringContext::new(&draws, &map);
        let DimensionScores::Zodiac(board) = HistoricalAnalog::default().extract_raw(&ctx) else {
            panic!("historical analog scores signs");
        };
        assert_eq!(board, ScoreBoard::default());
    }
}
