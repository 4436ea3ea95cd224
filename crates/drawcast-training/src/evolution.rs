//! The evolution step: one budgeted batch of generations, persisted to the settings store.
//!
//! # State Machine
//!
//! The persisted [`EvolutionState`] is the only task state. Its phase is the busy flag:
//!
//! ```text
//! Idle ──(step starts)──▶ Running ──(step ends, success or failure)──▶ Idle
//! ```
//!
//! An invocation that finds the state `Running` returns [`StepOutcome::Busy`] without touching
//! any other key, unless the lock is older than `stale_lock_secs`, in which case it takes the
//! lock over with a warning. The `evolution_enabled` flag is checked once at the start.
//!
//! Taking the lock is a compare-and-set against the exact state value that was read, so of two
//! invocations racing from the same idle (or stale) state only one proceeds; the other reports
//! [`StepOutcome::Busy`].
//!
//! # One Invocation
//!
//! 1. Load history, zodiac mapping, population and generation counter
//! 2. If the latest issue changed since the previous step, restart the generation counter
//!    (the population carries over)
//! 3. Build the [`ModelCache`] once
//! 4. Evaluate and evolve until the time budget or generation cap is reached
//! 5. Build the staging prediction from the best gene
//! 6. Persist population, generation counter, staging prediction and the idle state
//!
//! The state records the new target issue only once step 6 succeeded, so a failed step is
//! retried as a restart on the next invocation.

use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use drawcast_core::{IssueId, ZodiacMap};
use drawcast_evaluator::{
    dimension::{AnalogParams, ScoreDimension as _, all_dimensions_with},
    prediction::{Prediction, PredictionBuilder, PredictionConfig},
};
use drawcast_store::{HistoryStore, SettingsStore, keys};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    EvolutionError,
    backtest::{BacktestParams, FitnessRule, ModelCache},
    genetic::{Population, PopulationEvolver, StoredGene},
    settings,
    stats::FitnessSummary,
};

/// Tunables of the evolution step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_weight: f32,
    pub mutation_rate: f64,
    /// Draws loaded from the history store.
    pub history_depth: usize,
    pub backtest: BacktestParams,
    pub fitness: FitnessRule,
    /// Apply the kill list when ranking during backtests.
    pub kill_in_backtest: bool,
    /// Wall-clock budget of one invocation.
    pub time_budget_secs: f64,
    /// Optional cap on generations per invocation.
    pub max_generations: Option<u64>,
    /// A `Running` lock older than this is considered abandoned.
    pub stale_lock_secs: u64,
    pub analog: AnalogParams,
    pub prediction: PredictionConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        let backtest = BacktestParams::default();
        Self {
            population_size: 15,
            max_weight: 10.0,
            mutation_rate: 0.3,
            history_depth: backtest.required_history() + 20,
            backtest,
            fitness: FitnessRule::default(),
            kill_in_backtest: false,
            time_budget_secs: 50.0,
            max_generations: None,
            stale_lock_secs: 300,
            analog: AnalogParams::default(),
            prediction: PredictionConfig::default(),
        }
    }
}

impl EvolutionConfig {
    fn time_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_budget_secs).unwrap_or(Duration::ZERO)
    }

    fn stale_after(&self) -> TimeDelta {
        i64::try_from(self.stale_lock_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// The prediction builder matching this configuration.
    #[must_use]
    pub fn prediction_builder(&self, zodiac_map: ZodiacMap) -> PredictionBuilder {
        PredictionBuilder::new(
            all_dimensions_with(&self.analog),
            zodiac_map,
            self.prediction.clone(),
        )
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Running,
}

/// Persisted record of the evolution task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionState {
    pub phase: Phase,
    /// Generation counter at the last state change.
    pub generation: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Issue the population was last evolved to predict.
    pub target_issue: Option<IssueId>,
}

impl EvolutionState {
    pub fn load<S>(store: &S) -> Result<Self, EvolutionError>
    where
        S: SettingsStore + ?Sized,
    {
        Ok(settings::read_json_lenient(store, keys::EVOLUTION_STATE)?.unwrap_or_default())
    }

    pub fn save<S>(&self, store: &mut S) -> Result<(), EvolutionError>
    where
        S: SettingsStore + ?Sized,
    {
        settings::write_json(store, keys::EVOLUTION_STATE, self)
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The enabled flag is off; nothing was touched.
    Disabled,
    /// Another step holds the lock; nothing else was touched.
    Busy { since: Option<DateTime<Utc>> },
    Completed(StepReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub generations_run: u64,
    /// Generation counter after this step.
    pub generation: u64,
    pub cache_entries: usize,
    /// Best fitness reachable over the cache.
    pub max_fitness: f32,
    pub fitness: Option<FitnessSummary>,
    pub target_issue: Option<IssueId>,
    pub prediction: Prediction,
    pub elapsed: Duration,
}

/// Runs one evolution step against `store`.
///
/// The lock is released (state set back to idle) whether the step succeeds or fails.
pub fn run_evolution_step<S, R>(
    store: &mut S,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Result<StepOutcome, EvolutionError>
where
    S: SettingsStore + HistoryStore + ?Sized,
    R: Rng + ?Sized,
{
    if !settings::is_enabled(&*store)? {
        tracing::info!("evolution disabled, skipping step");
        return Ok(StepOutcome::Disabled);
    }

    let mut state = match acquire(store, config)? {
        Acquire::Acquired(state) => state,
        Acquire::Held { since } => return Ok(StepOutcome::Busy { since }),
    };

    let result = evolve_and_predict(store, config, &state, rng);
    if let Ok(report) = &result {
        state.generation = report.generation;
        state.target_issue = report.target_issue;
    }

    state.phase = Phase::Idle;
    state.finished_at = Some(Utc::now());
    let released = state.save(store);
    let report = result?;
    released?;
    Ok(StepOutcome::Completed(report))
}

enum Acquire {
    Acquired(EvolutionState),
    Held { since: Option<DateTime<Utc>> },
}

/// Moves the state to `Running` unless a fresh lock is held.
fn acquire<S>(store: &mut S, config: &EvolutionConfig) -> Result<Acquire, EvolutionError>
where
    S: SettingsStore + ?Sized,
{
    let raw = store.get(keys::EVOLUTION_STATE)?;
    let mut state: EvolutionState =
        settings::decode_lenient(keys::EVOLUTION_STATE, raw.as_deref()).unwrap_or_default();
    let now = Utc::now();
    if state.phase.is_running() {
        match state.started_at {
            Some(since) if now.signed_duration_since(since) <= config.stale_after() => {
                tracing::info!(%since, "evolution step already running");
                return Ok(Acquire::Held { since: Some(since) });
            }
            since => {
                tracing::warn!(?since, "taking over stale evolution lock");
            }
        }
    }

    state.phase = Phase::Running;
    state.started_at = Some(now);
    if settings::compare_and_set_json(store, keys::EVOLUTION_STATE, raw.as_deref(), &state)? {
        return Ok(Acquire::Acquired(state));
    }

    let holder = EvolutionState::load(&*store)?;
    tracing::info!(since = ?holder.started_at, "lost the race for the evolution lock");
    Ok(Acquire::Held {
        since: holder.started_at,
    })
}

fn evolve_and_predict<S, R>(
    store: &mut S,
    config: &EvolutionConfig,
    state: &EvolutionState,
    rng: &mut R,
) -> Result<StepReport, EvolutionError>
where
    S: SettingsStore + HistoryStore + ?Sized,
    R: Rng + ?Sized,
{
    let started = Instant::now();
    let history = settings::load_history(&*store, config.history_depth)?;
    let (zodiac_map, _) = settings::zodiac_map(&*store)?;
    let target_issue = history.latest().map(|d| d.issue().next());

    let mut generation = if state.target_issue == target_issue {
        settings::generation_counter(&*store)?
    } else {
        tracing::info!(
            previous = ?state.target_issue,
            target = ?target_issue,
            "new draw since last step, restarting generation counter"
        );
        0
    };

    let builder = config.prediction_builder(zodiac_map.clone());
    let dimensions = all_dimensions_with(&config.analog);
    let dimension_ids: Vec<String> = dimensions.iter().map(|d| d.id().to_owned()).collect();

    let size = config.population_size.max(1);
    let stored: Option<Vec<StoredGene>> =
        settings::read_json_lenient(&*store, keys::POPULATION)?;
    let mut population = match stored {
        Some(stored) if !stored.is_empty() => {
            Population::from_stored(dimension_ids, &stored, size, rng, config.max_weight)
        }
        _ => {
            tracing::warn!(size, "no stored population, seeding");
            Population::random(dimension_ids, size, rng, config.max_weight)
        }
    };

    let cache = ModelCache::build(
        history.draws(),
        &dimensions,
        &zodiac_map,
        &config.backtest,
        &config.prediction.kill_rules,
    );
    let max_fitness = config.fitness.max_fitness(cache.len());
    let evolver = PopulationEvolver::for_population(size, config.max_weight, config.mutation_rate);
    let budget = config.time_budget();

    tracing::info!(
        generation,
        draws = history.len(),
        cache_entries = cache.len(),
        max_fitness,
        "evolution step started"
    );

    let mut generations_run = 0;
    loop {
        population.evaluate_fitness(&cache, &config.fitness, config.kill_in_backtest);
        generation += 1;
        generations_run += 1;

        if let Some(summary) = population.fitness_summary() {
            tracing::debug!(
                generation,
                max = summary.max,
                mean = summary.mean,
                median = summary.median,
                std_dev = summary.std_dev,
                "generation evaluated"
            );
        }

        let capped = config.max_generations.is_some_and(|cap| generations_run >= cap);
        if capped || started.elapsed() >= budget {
            break;
        }
        population = evolver.evolve(&population, rng);
    }

    let (weights, fitness) = population
        .best()
        .map(|g| (g.weights().to_vec(), g.fitness()))
        .unwrap_or_default();
    let prediction = builder.build(&history, &weights, fitness, generation, rng);
    let summary = population.fitness_summary();

    settings::write_json(store, keys::POPULATION, &population.to_stored())?;
    store.set(keys::GENERATION_COUNTER, &generation.to_string())?;
    settings::write_json(store, keys::STAGING_PREDICTION, &prediction)?;

    let elapsed = started.elapsed();
    tracing::info!(
        generation,
        generations_run,
        best_fitness = fitness,
        confidence = prediction.generation_info.confidence,
        elapsed_ms = elapsed.as_millis(),
        "evolution step finished"
    );

    Ok(StepReport {
        generations_run,
        generation,
        cache_entries: cache.len(),
        max_fitness,
        fitness: summary,
        target_issue,
        prediction,
        elapsed,
    })
}
