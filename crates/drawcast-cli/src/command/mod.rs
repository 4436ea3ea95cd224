use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use drawcast_core::rng::{self, SeededRng};
use drawcast_store::SqliteStore;
use drawcast_training::EvolutionConfig;

use self::{
    evolve::EvolveArg, ingest::IngestArg, predict::PredictArg, simulate::SimulateArg,
    zodiac_config::ZodiacConfigCommand,
};
use crate::util;

mod control;
mod evolve;
mod ingest;
mod predict;
mod simulate;
mod zodiac_config;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GlobalArgs {
    /// SQLite database holding draws and settings
    #[arg(
        long,
        global = true,
        env = "DRAWCAST_DB",
        default_value = "data/drawcast.db"
    )]
    db: PathBuf,
    /// JSON file overriding evolution and prediction tunables
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for every random step (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl GlobalArgs {
    pub(crate) fn open_store(&self) -> anyhow::Result<SqliteStore> {
        SqliteStore::open(&self.db)
            .with_context(|| format!("Failed to open database: {}", self.db.display()))
    }

    pub(crate) fn evolution_config(&self) -> anyhow::Result<EvolutionConfig> {
        match &self.config {
            Some(path) => util::read_json_file("config", path),
            None => Ok(EvolutionConfig::default()),
        }
    }

    pub(crate) fn rng(&self) -> SeededRng {
        if let Some(seed) = self.seed {
            tracing::debug!(seed, "seeded random source");
        }
        rng::seeded_or_random(self.seed)
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Parse a draw announcement and store its draw
    Ingest(#[clap(flatten)] IngestArg),
    /// Append random draws after the latest stored issue, for dry runs
    Simulate(#[clap(flatten)] SimulateArg),
    /// Run one budgeted evolution step and refresh the staging prediction
    Evolve(#[clap(flatten)] EvolveArg),
    /// Build a prediction from the best stored gene without evolving
    Predict(#[clap(flatten)] PredictArg),
    /// Copy the staging prediction to the published slot
    Publish,
    /// Show or replace the zodiac number mapping
    #[command(subcommand)]
    ZodiacConfig(ZodiacConfigCommand),
    /// Allow evolution steps to run
    Enable,
    /// Make evolution steps return immediately
    Disable,
    /// Print the evolution state, counters and prediction metadata as JSON
    Status,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let global = &args.global;
    match &args.mode {
        Mode::Ingest(arg) => ingest::run(global, arg)?,
        Mode::Simulate(arg) => simulate::run(global, arg)?,
        Mode::Evolve(arg) => evolve::run(global, arg)?,
        Mode::Predict(arg) => predict::run(global, arg)?,
        Mode::Publish => control::publish(global)?,
        Mode::ZodiacConfig(command) => zodiac_config::run(global, command)?,
        Mode::Enable => control::set_enabled(global, true)?,
        Mode::Disable => control::set_enabled(global, false)?,
        Mode::Status => control::status(global)?,
    }
    Ok(())
}
