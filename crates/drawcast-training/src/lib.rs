//! Weight evolution for the scoring model.
//!
//! This crate tunes the per-dimension weights used by `drawcast-evaluator` with a small
//! genetic algorithm, scoring every candidate by replaying past draws.
//!
//! # How Training Works
//!
//! 1. **Cache** - every dimension scores the history as it stood before each of the last
//!    `window` draws ([`backtest::ModelCache`]); this is the expensive part and runs once
//! 2. **Evaluate** - each gene's fitness counts how often the actual sign landed in its top 6
//!    and top 3 ([`backtest::FitnessRule`])
//! 3. **Select** - the top half survives unchanged
//! 4. **Reproduce** - the rest are mutated copies of survivors
//! 5. **Repeat** - until the invocation's time budget or generation cap runs out
//!
//! # Architecture
//!
//! ```text
//! Evolution step (busy flag, budget, persistence)
//!     ↓ evolves
//! Population of genes (weight vectors)
//!     ↓ scored by
//! Backtester (cached dimension boards × weights → rank → hits)
//!     ↓ best gene feeds
//! PredictionBuilder (drawcast-evaluator)
//! ```
//!
//! # Design Principles
//!
//! ## Resumable batches
//!
//! A step never runs forever. It loads everything from the settings store, evolves within its
//! budget and writes everything back, so an external scheduler can simply invoke it again.
//! The persisted [`evolution::EvolutionState`] doubles as the busy flag that keeps two steps
//! from interleaving.
//!
//! ## One random source
//!
//! Every function that needs randomness takes the generator as an argument. Seeding it makes
//! a whole step reproducible, apart from where the time budget cuts the loop.
//!
//! # Current Limitations
//!
//! - **Tiny search**: single-parent copies and single-point mutation only
//! - **Overfitting**: fitness is measured on the same recent draws every generation
//! - **Wall-clock budget**: the number of generations per step depends on machine speed

use drawcast_core::ZodiacConfigError;
use drawcast_store::StoreError;

pub use self::{
    control::{StatusReport, predict_now, publish, status},
    evolution::{EvolutionConfig, EvolutionState, Phase, StepOutcome, StepReport, run_evolution_step},
};

pub mod backtest;
pub mod control;
pub mod evolution;
pub mod genetic;
pub mod settings;
pub mod stats;
pub mod weights;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvolutionError {
    #[display("settings store failed: {source}")]
    Store { source: StoreError },
    #[display("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
    #[display("stored {key} is not valid JSON: {source}")]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
    #[display("zodiac config rejected: {source}")]
    ZodiacConfig { source: ZodiacConfigError },
}

impl From<StoreError> for EvolutionError {
    fn from(source: StoreError) -> Self {
        Self::Store { source }
    }
}
