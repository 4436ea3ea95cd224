//! Operator actions around the evolution step: publish, status and on-demand prediction.

use drawcast_core::{IssueId, ZodiacConfigStatus};
use drawcast_evaluator::{
    dimension::{ScoreDimension as _, all_dimensions_with},
    prediction::{GenerationInfo, Prediction},
};
use drawcast_store::{HistoryStore, SettingsStore, keys};
use rand::Rng;
use serde::Serialize;

use crate::{
    EvolutionError,
    evolution::{EvolutionConfig, EvolutionState},
    genetic::{Population, StoredGene},
    settings,
};

/// Copies the staging prediction to the published key.
///
/// Returns the published prediction, or `None` (publishing nothing) if no staging prediction
/// exists yet.
pub fn publish<S>(store: &mut S) -> Result<Option<Prediction>, EvolutionError>
where
    S: SettingsStore + ?Sized,
{
    let staging = settings::read_json::<_, Prediction>(&*store, keys::STAGING_PREDICTION)?;
    let Some(prediction) = staging else {
        tracing::warn!("nothing to publish, no staging prediction");
        return Ok(None);
    };
    settings::write_json(store, keys::PUBLISHED_PREDICTION, &prediction)?;
    tracing::info!(
        generation = prediction.generation_info.generation,
        target = ?prediction.generation_info.target_issue,
        "prediction published"
    );
    Ok(Some(prediction))
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub enabled: bool,
    pub state: EvolutionState,
    pub generation_counter: u64,
    pub draw_count: usize,
    pub latest_issue: Option<IssueId>,
    /// `missing`, `accepted` or `rejected: <reason>`.
    pub zodiac_config: String,
    pub population_size: usize,
    pub best_gene: Option<StoredGene>,
    pub staging: Option<GenerationInfo>,
    pub published: Option<GenerationInfo>,
}

pub fn status<S>(store: &S) -> Result<StatusReport, EvolutionError>
where
    S: SettingsStore + HistoryStore + ?Sized,
{
    let (_, zodiac_status) = settings::zodiac_map(store)?;
    let zodiac_config = match zodiac_status {
        ZodiacConfigStatus::Missing => "missing".to_owned(),
        ZodiacConfigStatus::Accepted => "accepted".to_owned(),
        ZodiacConfigStatus::Rejected(err) => format!("rejected: {err}"),
    };
    let population: Vec<StoredGene> =
        settings::read_json_lenient(store, keys::POPULATION)?.unwrap_or_default();
    let staging: Option<Prediction> =
        settings::read_json_lenient(store, keys::STAGING_PREDICTION)?;
    let published: Option<Prediction> =
        settings::read_json_lenient(store, keys::PUBLISHED_PREDICTION)?;

    Ok(StatusReport {
        enabled: settings::is_enabled(store)?,
        state: EvolutionState::load(store)?,
        generation_counter: settings::generation_counter(store)?,
        draw_count: store.draw_count()?,
        latest_issue: store.recent_draws(1)?.first().map(|d| d.issue()),
        zodiac_config,
        population_size: population.len(),
        best_gene: best_stored(population),
        staging: staging.map(|p| p.generation_info),
        published: published.map(|p| p.generation_info),
    })
}

/// Builds a prediction from the best stored gene without evolving or persisting anything.
///
/// Falls back to a random gene when no population is stored.
pub fn predict_now<S, R>(
    store: &S,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Result<Prediction, EvolutionError>
where
    S: SettingsStore + HistoryStore + ?Sized,
    R: Rng + ?Sized,
{
    let history = settings::load_history(store, config.history_depth)?;
    let (zodiac_map, _) = settings::zodiac_map(store)?;
    let generation = settings::generation_counter(store)?;
    let builder = config.prediction_builder(zodiac_map);

    let dimension_ids: Vec<String> = all_dimensions_with(&config.analog)
        .iter()
        .map(|d| d.id().to_owned())
        .collect();
    let stored: Vec<StoredGene> =
        settings::read_json_lenient(store, keys::POPULATION)?.unwrap_or_default();
    let best = best_stored(stored).into_iter().collect::<Vec<_>>();
    if best.is_empty() {
        tracing::warn!("no stored population, predicting with a random gene");
    }
    let population = Population::from_stored(dimension_ids, &best, 1, rng, config.max_weight);
    let gene = &population.genes()[0];

    Ok(builder.build(&history, gene.weights(), gene.fitness(), generation, rng))
}

fn best_stored(population: Vec<StoredGene>) -> Option<StoredGene> {
    population
        .into_iter()
        .reduce(|best, g| if g.fitness > best.fitness { g } else { best })
}
