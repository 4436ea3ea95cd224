//! Relation dimensions: bonuses derived from the latest draw through fixed relation tables.

use drawcast_core::{ColorBand, Number};

use crate::{
    dimension::{BoxedScoreDimension, DimensionScores, ScoreDimension},
    score_board::{NumberScores, ScoreBoard},
    scoring_context::ScoringContext,
};

/// Flat bonus used by every relation dimension.
pub const RELATION_BONUS: f32 = 10.0;

/// Harmony and triad partners of the latest special number's sign.
///
/// # Raw measurement
///
/// - the six-harmony partner gains [`RELATION_BONUS`]
/// - each of the two three-harmony partners gains [`RELATION_BONUS`]
#[derive(Debug, Clone)]
pub struct RelationLink;

impl ScoreDimension for RelationLink {
    fn id(&self) -> &'static str {
        "relation_link"
    }
    fn name(&self) -> &'static str {
        "Relation Link"
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let mut board = ScoreBoard::default();
        if let Some(&latest) = ctx.special_zodiacs().first() {
            board[latest.harmony()] += RELATION_BONUS;
            for partner in latest.triad() {
                board[partner] += RELATION_BONUS;
            }
        }
        DimensionScores::Zodiac(board)
    }
}

/// Members of the least frequent color band among recent special numbers.
///
/// # Raw measurement
///
/// 1. Count color bands over the last [`ColorContrarian::WINDOW`] special numbers
/// 2. The least frequent band wins (ties favour declaration order red, blue, green)
/// 3. Every member number of that band gains [`RELATION_BONUS`]
#[derive(Debug, Clone)]
pub struct ColorContrarian;

impl ColorContrarian {
    pub const WINDOW: usize = 30;

    /// The overdue band, or `None` for an empty history.
    #[must_use]
    pub fn overdue_band(ctx: &ScoringContext<'_>) -> Option<ColorBand> {
        if ctx.draws().is_empty() {
            return None;
        }
        let mut counts = [0_usize; ColorBand::LEN];
        for n in ctx.recent_specials(Self::WINDOW) {
            counts[n.color_band().index()] += 1;
        }
        ColorBand::ALL.into_iter().min_by_key(|b| counts[b.index()])
    }
}

impl ScoreDimension for ColorContrarian {
    fn id(&self) -> &'static str {
        "color_contrarian"
    }
    fn name(&self) -> &'static str {
        "Color-Band Contrarian"
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let mut scores = NumberScores::default();
        if let Some(band) = Self::overdue_band(ctx) {
            for n in band.members() {
                scores[n] += RELATION_BONUS;
            }
        }
        DimensionScores::Number(scores)
    }
}

/// Members of the element generated by the latest special number's element.
#[derive(Debug, Clone)]
pub struct ElementGeneration;

impl ScoreDimension for ElementGeneration {
    fn id(&self) -> &'static str {
        "element_generation"
    }
    fn name(&self) -> &'static str {
        "Elemental Generation"
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let mut scores = NumberScores::default();
        if let Some(latest) = ctx.latest() {
            for n in latest.special().element().generates().members() {
                scores[n] += RELATION_BONUS;
            }
        }
        DimensionScores::Number(scores)
    }
}

/// Signs of the latest draw's six plain numbers.
///
/// A sign owning several of the plain numbers gains the bonus once per number.
#[derive(Debug, Clone)]
pub struct PlainCooccurrence;

impl ScoreDimension for PlainCooccurrence {
    fn id(&self) -> &'static str {
        "plain_cooccurrence"
    }
    fn name(&self) -> &'static str {
        "Plain Co-occurrence"
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let mut board = ScoreBoard::default();
        if let Some(latest) = ctx.latest() {
            for &n in latest.numbers() {
                board[ctx.zodiac_map().zodiac_of(n)] += RELATION_BONUS;
            }
        }
        DimensionScores::Zodiac(board)
    }
}

/// Numbers at fixed offsets from the latest special number, wrapping within `[1, 49]`.
#[derive(Debug, Clone)]
pub struct OffsetAdjacency;

impl OffsetAdjacency {
    pub const OFFSETS: [i32; 6] = [1, -1, 10, -10, 12, -12];

    /// The numbers rewarded for a given special number.
    #[must_use]
    pub fn neighbours(special: Number) -> [Number; 6] {
        Self::OFFSETS.map(|d| special.offset(d))
    }
}

impl ScoreDimension for OffsetAdjacency {
    fn id(&self) -> &'static str {
        "offset_adjacency"
    }
    fn name(&self) -> &'static str {
        "Numeric-Offset Adjacency"
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let mut scores = NumberScores::default();
        if let Some(latest) = ctx.latest() {
            for n in Self::neighbours(latest.special()) {
                scores[n] += RELATION_BONUS;
            }
        }
        DimensionScores::Number(scores)
    }
}

#[cfg(test)]
mod tests {
    use drawcast_core::{Element, Zodiac, ZodiacMap};

    use super::*;
    use crate::dimension::test_util;

    fn n(value: u8) -> Number {
        Number::new(value).unwrap()
    }

    #[test]
    fn test_offset_adjacency_around_26() {
        let map = ZodiacMap::default();
        let draws = test_util::specials(&[26, 16, 6, 33, 41]);
        let ctx = ScoringContext::new(&draws, &map);
        let DimensionScores::Number(scores) = OffsetAdjacency.extract_raw(&ctx) else {
            panic!("offset adjacency scores numbers");
        };
        for rewarded in [16, 36, 25, 27, 14, 38] {
            assert!(scores[n(rewarded)] > 0.0, "{rewarded}");
        }
        assert!(scores[n(26)].abs() < f32::EPSILON);
        assert!(scores[n(6)].abs() < f32::EPSILON);

        let board = OffsetAdjacency.score(&ctx);
        assert!(board[map.zodiac_of(n(16))] > 0.0);
        assert!(board[map.zodiac_of(n(27))] > 0.0);
    }

    #[test]
    fn test_relation_link_partners() {
        let map = ZodiacMap::default();
        // 1 → Horse: harmony Goat, triad Dog and Tiger
        let draws = test_util::specials(&[1, 2]);
        let ctx = ScoringContext::new(&draws, &map);
        let board = RelationLink.score(&ctx);
        for z in Zodiac::ALL {
            let expected = matches!(z, Zodiac::Goat | Zodiac::Dog | Zodiac::Tiger);
            assert_eq!(board[z] > 0.0, expected, "{z}");
        }
    }

    #[test]
    fn test_relation_link_honours_announced_sign() {
        let map = ZodiacMap::default();
        let mut draws = test_util::specials(&[1]);
        draws[0] = draws[0].clone().with_special_zodiac(Zodiac::Rat);
        let ctx = ScoringContext::new(&draws, &map);
        let board = RelationLink.score(&ctx);
        assert!(board[Zodiac::Ox] > 0.0);
        assert!(board[Zodiac::Goat].abs() < f32::EPSILON);
    }

    #[test]
    fn test_color_contrarian_picks_least_frequent_band() {
        let map = ZodiacMap::default();
        // red: 1, 2, 7; blue: 3; green: none
        let draws = test_util::specials(&[1, 2, 7, 3]);
        let ctx = ScoringContext::new(&draws, &map);
        assert_eq!(ColorContrarian::overdue_band(&ctx), Some(ColorBand::Green));

        let DimensionScores::Number(scores) = ColorContrarian.extract_raw(&ctx) else {
            panic!("color contrarian scores numbers");
        };
        for (number, score) in scores.iter() {
            assert_eq!(score > 0.0, number.color_band() == ColorBand::Green);
        }
    }

    #[test]
    fn test_element_generation_targets_generated_element() {
        let map = ZodiacMap::default();
        // 1 is Metal, which generates Water
        let draws = test_util::specials(&[1]);
        let ctx = ScoringContext::new(&draws, &map);
        let DimensionScores::Number(scores) = ElementGeneration.extract_raw(&ctx) else {
            panic!("element generation scores numbers");
        };
        for (number, score) in scores.iter() {
            assert_eq!(score > 0.0, number.element() == Element::Water, "{number}");
        }
    }

    #[test]
    fn test_plain_cooccurrence_counts_each_plain_number() {
        let map = ZodiacMap::default();
        // plain 1, 13 (Horse twice), 2, 3, 4, 5
        let draws = test_util::draws(&[([1, 13, 2, 3, 4, 5], 40)]);
        let ctx = ScoringContext::new(&draws, &map);
        let DimensionScores::Zodiac(board) = PlainCooccurrence.extract_raw(&ctx) else {
            panic!("plain co-occurrence scores signs");
        };
        assert!((board[Zodiac::Horse] - 2.0 * RELATION_BONUS).abs() < f32::EPSILON);
        assert!((board[Zodiac::Snake] - RELATION_BONUS).abs() < f32::EPSILON);
        assert!(board[Zodiac::Pig].abs() < f32::EPSILON);
    }
}
