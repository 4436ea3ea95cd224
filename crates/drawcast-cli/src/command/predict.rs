use std::path::PathBuf;

use anyhow::Context as _;
use drawcast_training::predict_now;

use super::GlobalArgs;
use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    /// Output file path (prints to stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(global: &GlobalArgs, arg: &PredictArg) -> anyhow::Result<()> {
    let config = global.evolution_config()?;
    let store = global.open_store()?;
    let mut rng = global.rng();

    let prediction = predict_now(&store, &config, &mut rng).context("Failed to build prediction")?;
    util::save_json(&prediction, arg.output.as_deref())
}
