//! Backtesting: replaying the combiner against past draws to score a weight vector.
//!
//! # How It Works
//!
//! For every offset `t` in `0..window`, the draws strictly older than draw `t`
//! (`draws[t + 1..]`) are what a forecaster would have had before draw `t` happened. Every
//! dimension scores that sub-history and the actual sign of draw `t` is recorded.
//!
//! Dimension boards do not depend on weights, so they are computed once per batch
//! ([`ModelCache::build`]) and each gene only pays for a linear combination and a ranking
//! per entry ([`ModelCache::evaluate`]).
//!
//! Caching stops at the first offset whose sub-history is shorter than `min_remaining`. A short
//! history simply yields a small (possibly empty) cache, on which every gene scores zero.

use drawcast_core::{DrawRecord, Zodiac, ZodiacMap};
use drawcast_evaluator::{
    combiner::ScoreCombiner,
    dimension::{ScoreDimension, score_all},
    kill_list::{KillList, KillRules},
    score_board::ScoreBoard,
    scoring_context::ScoringContext,
};
use serde::{Deserialize, Serialize};

/// Points awarded per cache entry depending on where the actual sign ranked.
///
/// Bonuses are cumulative: with the defaults a top-3 hit scores 10 + 30 = 40.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessRule {
    pub wide_top: usize,
    pub wide_bonus: f32,
    pub narrow_top: usize,
    pub narrow_bonus: f32,
}

impl Default for FitnessRule {
    fn default() -> Self {
        Self {
            wide_top: 6,
            wide_bonus: 10.0,
            narrow_top: 3,
            narrow_bonus: 30.0,
        }
    }
}

impl FitnessRule {
    /// Best possible fitness over `entries` cache entries.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn max_fitness(&self, entries: usize) -> f32 {
        entries as f32 * (self.wide_bonus + self.narrow_bonus)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestParams {
    /// Number of past draws replayed.
    pub window: usize,
    /// Minimum sub-history length for an offset to be cached.
    pub min_remaining: usize,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            window: 80,
            min_remaining: 50,
        }
    }
}

impl BacktestParams {
    /// Draws needed to fill the whole window.
    #[must_use]
    pub fn required_history(&self) -> usize {
        self.window + self.min_remaining
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    boards: Vec<ScoreBoard>,
    kill_list: KillList,
    actual: Zodiac,
}

impl CacheEntry {
    #[must_use]
    pub fn boards(&self) -> &[ScoreBoard] {
        &self.boards
    }

    #[must_use]
    pub fn kill_list(&self) -> &KillList {
        &self.kill_list
    }

    #[must_use]
    pub fn actual(&self) -> Zodiac {
        self.actual
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelCache {
    entries: Vec<CacheEntry>,
}

impl ModelCache {
    /// Scores every offset of `draws` (newest-first) with `dimensions`.
    ///
    /// Each entry's kill list is derived with `kill_rules`, which should be the rules the
    /// prediction builder uses so that backtests rank like live predictions.
    #[must_use]
    pub fn build<D>(
        draws: &[DrawRecord],
        dimensions: &[D],
        zodiac_map: &ZodiacMap,
        params: &BacktestParams,
        kill_rules: &KillRules,
    ) -> Self
    where
        D: ScoreDimension,
    {
        let mut entries = Vec::with_capacity(params.window);
        for t in 0..params.window.min(draws.len()) {
            let sub_history = &draws[t + 1..];
            if sub_history.len() < params.min_remaining {
                break;
            }
            let ctx = ScoringContext::new(sub_history, zodiac_map);
            entries.push(CacheEntry {
                boards: score_all(dimensions, &ctx),
                kill_list: KillList::derive(&ctx, kill_rules),
                actual: draws[t].special_zodiac(zodiac_map),
            });
        }
        tracing::debug!(entries = entries.len(), draws = draws.len(), "built model cache");
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fitness of `weights` over every cached entry.
    ///
    /// With `apply_kill`, each entry's kill list is forced to the bottom before ranking.
    #[must_use]
    pub fn evaluate(&self, weights: &[f32], rule: &FitnessRule, apply_kill: bool) -> f32 {
        let mut fitness = 0.0;
        for entry in &self.entries {
            let mut combined = ScoreCombiner::combine(weights, &entry.boards);
            if apply_kill {
                combined.suppress(&entry.kill_list);
            }
            let ranking = combined.ranking();
            if ranking.is_in_top(entry.actual, rule.wide_top) {
                fitness += rule.wide_bonus;
            }
            if ranking.is_in_top(entry.actual, rule.narrow_top) {
                fitness += rule.narrow_bonus;
            }
        }
        fitness
    }
}
