use anyhow::Context as _;
use drawcast_training::settings;

use super::GlobalArgs;
use crate::util;

pub(crate) fn publish(global: &GlobalArgs) -> anyhow::Result<()> {
    let mut store = global.open_store()?;
    match drawcast_training::publish(&mut store).context("Failed to publish prediction")? {
        Some(prediction) => util::save_json(&prediction, None),
        None => {
            println!("No staging prediction yet; run `drawcast evolve` first");
            Ok(())
        }
    }
}

pub(crate) fn set_enabled(global: &GlobalArgs, enabled: bool) -> anyhow::Result<()> {
    let mut store = global.open_store()?;
    settings::set_enabled(&mut store, enabled).context("Failed to update evolution flag")?;
    println!(
        "Evolution {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub(crate) fn status(global: &GlobalArgs) -> anyhow::Result<()> {
    let store = global.open_store()?;
    let report = drawcast_training::status(&store).context("Failed to read status")?;
    util::save_json(&report, None)
}
