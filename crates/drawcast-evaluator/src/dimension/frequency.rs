//! Frequency dimensions: how often and how recently each sign was drawn.

use drawcast_core::Zodiac;

use crate::{
    dimension::{BoxedScoreDimension, DimensionScores, ScoreDimension},
    score_board::ScoreBoard,
    scoring_context::ScoringContext,
};

/// Recency-weighted special-number sign counts.
///
/// # Raw measurement
///
/// For each of the last [`Trend::LONG_WINDOW`] draws, the special number's sign gains
/// [`Trend::RECENT_INCREMENT`] if the draw is among the last [`Trend::RECENT_WINDOW`], otherwise
/// [`Trend::OLDER_INCREMENT`].
#[derive(Debug, Clone)]
pub struct Trend;

impl Trend {
    pub const RECENT_WINDOW: usize = 10;
    pub const LONG_WINDOW: usize = 30;
    pub const RECENT_INCREMENT: f32 = 2.0;
    pub const OLDER_INCREMENT: f32 = 1.0;
}

impl ScoreDimension for Trend {
    fn id(&self) -> &'static str {
        "trend"
    }
    fn name(&self) -> &'static str {
        "Trend"
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let mut board = ScoreBoard::default();
        for (i, &z) in ctx.special_zodiacs().iter().take(Self::LONG_WINDOW).enumerate() {
            board[z] += if i < Self::RECENT_WINDOW {
                Self::RECENT_INCREMENT
            } else {
                Self::OLDER_INCREMENT
            };
        }
        DimensionScores::Zodiac(board)
    }
}

/// Bucketed gap since each sign's last appearance.
///
/// # Raw measurement
///
/// - `gap` = number of draws newer than the sign's most recent special-number appearance
///   (the whole history length if it never appeared)
/// - `raw = min(floor(gap / 10) × 10, CAP)`
#[derive(Debug, Clone)]
pub struct Omission;

impl Omission {
    pub const BUCKET: usize = 10;
    pub const CAP: usize = 60;

    /// Draws since each sign last appeared as the special number.
    #[must_use]
    pub fn gaps(ctx: &ScoringContext<'_>) -> [usize; Zodiac::LEN] {
        let zodiacs = ctx.special_zodiacs();
        Zodiac::ALL.map(|z| zodiacs.iter().position(|&x| x == z).unwrap_or(zodiacs.len()))
    }
}

impl ScoreDimension for Omission {
    fn id(&self) -> &'static str {
        "omission"
    }
    fn name(&self) -> &'static str {
        "Omission"
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let gaps = Self::gaps(ctx);
        let board = ScoreBoard::from_fn(|z| {
            let bucketed = (gaps[z.index()] / Self::BUCKET) * Self::BUCKET;
            bucketed.min(Self::CAP) as f32
        });
        DimensionScores::Zodiac(board)
    }
}

#[cfg(test)]
mod tests {
    use drawcast_core::ZodiacMap;

    use super::*;
    use crate::dimension::test_util;

    #[test]
    fn test_trend_weights_recent_draws_more() {
        let map = ZodiacMap::default();
        // 1 → Horse (recent), 2 → Snake (older, twice)
        let mut values = vec![1];
        values.extend([3; 9]);
        values.extend([2, 2]);
        let draws = test_util::specials(&values);
        let ctx = ScoringContext::new(&draws, &map);
        let DimensionScores::Zodiac(board) = Trend.extract_raw(&ctx) else {
            panic!("trend scores signs");
        };
        assert!((board[Zodiac::Horse] - Trend::RECENT_INCREMENT).abs() < f32::EPSILON);
        assert!((board[Zodiac::Snake] - 2.0 * Trend::OLDER_INCREMENT).abs() < f32::EPSILON);
        assert!((board[Zodiac::Dragon] - 9.0 * Trend::RECENT_INCREMENT).abs() < f32::EPSILON);
    }

    #[test]
    fn test_omission_buckets_gaps() {
        let map = ZodiacMap::default();
        // latest is Horse; Snake last seen 11 draws ago; the rest are Dragon
        let mut values = vec![1];
        values.extend([3; 10]);
        values.push(2);
        let draws = test_util::specials(&values);
        let ctx = ScoringContext::new(&draws, &map);

        let gaps = Omission::gaps(&ctx);
        assert_eq!(gaps[Zodiac::Horse.index()], 0);
        assert_eq!(gaps[Zodiac::Dragon.index()], 1);
        assert_eq!(gaps[Zodiac::Snake.index()], 11);
        assert_eq!(gaps[Zodiac::Rat.index()], 12);

        let DimensionScores::Zodiac(board) = Omission.extract_raw(&ctx) else {
            panic!("omission scores signs");
        };
        assert!(board[Zodiac::Horse].abs() < f32::EPSILON);
        assert!(board[Zodiac::Dragon].abs() < f32::EPSILON);
        assert!((board[Zodiac::Snake] - 10.0).abs() < f32::EPSILON);
        assert!((board[Zodiac::Rat] - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_omission_is_capped() {
        let map = ZodiacMap::default();
        let draws = test_util::specials(&[1; 90]);
        let ctx = ScoringContext::new(&draws, &map);
        let DimensionScores::Zodiac(board) = Omission.extract_raw(&ctx) else {
            panic!("omission scores signs");
        };
        assert!((board[Zodiac::Rat] - 60.0).abs() < f32::EPSILON);
    }
}
