//! Prediction assembly: from a weight vector and a history to a structured prediction.
//!
//! # How It Works
//!
//! 1. **Pad** - a cold history (fewer than 5 draws) is padded with seeded random filler
//! 2. **Score** - every dimension scores the history
//! 3. **Combine** - boards are combined with the weights, then [`Jitter`] is added
//! 4. **Kill** - the [`KillList`] forces its signs to the bottom
//! 5. **Rank** - the best 6 signs are the top picks, the best 3 the core picks
//! 6. **Derive** - color, size and parity calls and the confidence figure
//!
//! Killed signs are at most 3 of 12 and always rank last, so they never reach the top 6.

use std::{cmp::Ordering, collections::BTreeMap, iter};

use chrono::{DateTime, Utc};
use drawcast_core::{ColorBand, Element, History, IssueId, Number, Parity, Size, Zodiac, ZodiacMap};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    combiner::{Jitter, ScoreCombiner},
    dimension::{BoxedScoreDimension, score_all},
    kill_list::{KillList, KillRules},
    scoring_context::ScoringContext,
};

pub const TOP_COUNT: usize = 6;
pub const CORE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub top_categories: Vec<Zodiac>,
    pub core_categories: Vec<Zodiac>,
    pub banned_categories: Vec<Zodiac>,
    pub primary_color: ColorBand,
    pub secondary_color: ColorBand,
    pub size_call: Size,
    pub parity_call: Parity,
    pub generation_info: GenerationInfo,
}

/// Where a prediction came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub generation: u64,
    pub fitness: f32,
    /// `min(100, round(fitness / reference_max_fitness × 100))`
    pub confidence: u8,
    /// Gene weights keyed by dimension id.
    pub weights: BTreeMap<String, f32>,
    /// Latest real draw the prediction was built from (`None` for an empty history).
    pub based_on_issue: Option<IssueId>,
    /// Issue the prediction is for.
    pub target_issue: Option<IssueId>,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Fitness mapped to 100% confidence. A calibration constant, not a computed bound.
    pub reference_max_fitness: f32,
    pub jitter: Jitter,
    pub kill_rules: KillRules,
    /// Elements whose numbers weigh more in the color recommendation.
    pub fast_elements: Vec<Element>,
    pub fast_element_weight: f32,
    /// Specials considered by the size and parity calls.
    pub contrarian_window: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            reference_max_fitness: 2000.0,
            jitter: Jitter::default(),
            kill_rules: KillRules::default(),
            fast_elements: vec![Element::Metal, Element::Fire],
            fast_element_weight: 1.5,
            contrarian_window: 20,
        }
    }
}

impl PredictionConfig {
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn confidence(&self, fitness: f32) -> u8 {
        if self.reference_max_fitness <= 0.0 || fitness <= 0.0 {
            return 0;
        }
        (fitness / self.reference_max_fitness * 100.0).round().min(100.0) as u8
    }
}

#[derive(Debug, Clone)]
pub struct PredictionBuilder {
    dimensions: Vec<BoxedScoreDimension>,
    zodiac_map: ZodiacMap,
    config: PredictionConfig,
}

impl PredictionBuilder {
    #[must_use]
    pub fn new(
        dimensions: Vec<BoxedScoreDimension>,
        zodiac_map: ZodiacMap,
        config: PredictionConfig,
    ) -> Self {
        Self {
            dimensions,
            zodiac_map,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Builds the prediction for the draw following `history`.
    ///
    /// # Panics
    ///
    /// Panics if `weights.len()` differs from the number of dimensions.
    pub fn build<R>(
        &self,
        history: &History,
        weights: &[f32],
        fitness: f32,
        generation: u64,
        rng: &mut R,
    ) -> Prediction
    where
        R: Rng + ?Sized,
    {
        let padded = history.with_cold_start_filler(rng);
        let ctx = ScoringContext::new(padded.draws(), &self.zodiac_map);

        let boards = score_all(&self.dimensions, &ctx);
        let mut combined = ScoreCombiner::combine(weights, &boards);
        self.config.jitter.apply(&mut combined, rng);
        let kill_list = KillList::derive(&ctx, &self.config.kill_rules);
        combined.suppress(&kill_list);
        tracing::debug!(
            draws = history.len(),
            padded = padded.len() != history.len(),
            killed = kill_list.len(),
            "scored categories for prediction"
        );

        let ranking = combined.ranking();
        let top_categories = ranking.top(TOP_COUNT).to_vec();
        let core_categories = ranking.top(CORE_COUNT).to_vec();
        let (primary_color, secondary_color) = self.recommend_colors(&core_categories);

        let recent: Vec<Number> = ctx.recent_specials(self.config.contrarian_window).collect();
        let size_call = minority(recent.iter().map(|n| n.size()), Size::Big).unwrap_or(Size::Small);
        let parity_call =
            minority(recent.iter().map(|n| n.parity()), Parity::Odd).unwrap_or(Parity::Odd);

        let based_on_issue = history.latest().map(|d| d.issue());
        let generation_info = GenerationInfo {
            generation,
            fitness,
            confidence: self.config.confidence(fitness),
            weights: iter::zip(&self.dimensions, weights)
                .map(|(d, w)| (d.id().to_owned(), *w))
                .collect(),
            based_on_issue,
            target_issue: based_on_issue.map(IssueId::next),
            computed_at: Utc::now(),
        };

        Prediction {
            top_categories,
            core_categories,
            banned_categories: kill_list.as_slice().to_vec(),
            primary_color,
            secondary_color,
            size_call,
            parity_call,
            generation_info,
        }
    }

    /// Weighs the member numbers of `core` by color band; fast-cycle elements weigh more.
    fn recommend_colors(&self, core: &[Zodiac]) -> (ColorBand, ColorBand) {
        let mut weights = [0.0_f32; ColorBand::LEN];
        for &z in core {
            for n in self.zodiac_map.numbers_of(z) {
                let fast = self.config.fast_elements.contains(&n.element());
                weights[n.color_band().index()] +=
                    if fast { self.config.fast_element_weight } else { 1.0 };
            }
        }
        let mut bands = ColorBand::ALL;
        bands.sort_by(|a, b| weights[b.index()].total_cmp(&weights[a.index()]));
        (bands[0], bands[1])
    }
}

/// The less frequent of two classes; a tie goes against the first (most recent) item.
///
/// `None` for an empty sequence.
fn minority<T, I>(items: I, class: T) -> Option<T>
where
    T: Copy + PartialEq + Opposite,
    I: IntoIterator<Item = T>,
{
    let mut items = items.into_iter().peekable();
    let latest = *items.peek()?;
    let (mut this, mut other) = (0_usize, 0_usize);
    for item in items {
        if item == class {
            this += 1;
        } else {
            other += 1;
        }
    }
    Some(match this.cmp(&other) {
        Ordering::Less => class,
        Ordering::Greater => class.opposite(),
        Ordering::Equal => latest.opposite(),
    })
}

trait Opposite {
    fn opposite(self) -> Self;
}

impl Opposite for Size {
    fn opposite(self) -> Self {
        Size::opposite(self)
    }
}

impl Opposite for Parity {
    fn opposite(self) -> Self {
        Parity::opposite(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use drawcast_core::DrawRecord;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::dimension::{all_dimensions, test_util};

    fn builder() -> PredictionBuilder {
        PredictionBuilder::new(
            all_dimensions(),
            ZodiacMap::default(),
            PredictionConfig::default(),
        )
    }

    fn sample_history() -> History {
        History::from_newest_first(test_util::specials(&[
            26, 16, 6, 33, 12, 45, 8, 19, 40, 2, 27, 35, 1, 49, 30, 22, 14, 9, 38, 41, 17, 5,
        ]))
    }

    #[test]
    fn test_prediction_invariants() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let prediction = builder().build(&sample_history(), &[1.0; 10], 500.0, 4, &mut rng);

        assert_eq!(prediction.top_categories.len(), TOP_COUNT);
        assert_eq!(prediction.core_categories.len(), CORE_COUNT);
        assert_eq!(prediction.core_categories, prediction.top_categories[..CORE_COUNT]);
        assert!(!prediction.banned_categories.is_empty());
        for banned in &prediction.banned_categories {
            assert!(!prediction.top_categories.contains(banned));
        }
        assert_ne!(prediction.primary_color, prediction.secondary_color);

        let info = &prediction.generation_info;
        assert_eq!(info.generation, 4);
        assert_eq!(info.confidence, 25);
        assert_eq!(info.weights.len(), 10);
        assert_eq!(info.based_on_issue, Some(IssueId::from(22)));
        assert_eq!(info.target_issue, Some(IssueId::from(23)));
    }

    #[test]
    fn test_same_seed_same_prediction() {
        let history = sample_history();
        let a = builder().build(&history, &[2.0; 10], 0.0, 0, &mut Pcg64Mcg::seed_from_u64(5));
        let b = builder().build(&history, &[2.0; 10], 0.0, 0, &mut Pcg64Mcg::seed_from_u64(5));
        assert_eq!(a.top_categories, b.top_categories);
        assert_eq!(a.banned_categories, b.banned_categories);
    }

    #[test]
    fn test_cold_start_still_predicts() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let empty = builder().build(&History::default(), &[1.0; 10], 0.0, 0, &mut rng);
        assert_eq!(empty.top_categories.len(), TOP_COUNT);
        assert_eq!(empty.generation_info.based_on_issue, None);

        let draw = DrawRecord::new(
            IssueId::from(7),
            [1, 2, 3, 4, 5, 6].map(|v| Number::new(v).unwrap()),
            Number::new(26).unwrap(),
            DateTime::UNIX_EPOCH,
        )
        .unwrap();
        let one = builder().build(
            &History::from_newest_first(vec![draw]),
            &[1.0; 10],
            0.0,
            0,
            &mut rng,
        );
        assert_eq!(one.generation_info.target_issue, Some(IssueId::from(8)));
    }

    #[test]
    fn test_confidence_is_capped() {
        let config = PredictionConfig::default();
        assert_eq!(config.confidence(0.0), 0);
        assert_eq!(config.confidence(-10.0), 0);
        assert_eq!(config.confidence(1000.0), 50);
        assert_eq!(config.confidence(3200.0), 100);
    }

    #[test]
    fn test_minority_calls() {
        use Size::{Big, Small};
        assert_eq!(minority([Big, Big, Small], Big), Some(Small));
        assert_eq!(minority([Small, Small, Big], Big), Some(Big));
        // tie: against the latest
        assert_eq!(minority([Small, Big], Big), Some(Big));
        assert_eq!(minority([Big, Small], Big), Some(Small));
        assert_eq!(minority(Vec::<Size>::new(), Big), None);
    }

    #[test]
    fn test_prediction_json_round_trip() {
        let mut rng = Pcg64Mcg::seed_from_u64(13);
        let prediction = builder().build(&sample_history(), &[0.5; 10], 812.0, 9, &mut rng);
        let json = serde_json::to_string(&prediction).unwrap();
        let restored: Prediction = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, prediction);
    }
}
