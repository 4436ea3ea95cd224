use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context as _;
use clap::Subcommand;
use drawcast_core::{Number, NumberInfo, ZodiacConfigStatus};
use drawcast_training::settings;
use serde::Serialize;

use super::GlobalArgs;
use crate::util;

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum ZodiacConfigCommand {
    /// Print the mapping in force and whether it comes from a stored override
    Show,
    /// Validate and store a mapping of sign glyph to numbers (JSON object)
    Set {
        /// JSON file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    status: String,
    mapping: BTreeMap<String, Vec<u8>>,
    numbers: Vec<NumberInfo>,
}

pub(crate) fn run(global: &GlobalArgs, command: &ZodiacConfigCommand) -> anyhow::Result<()> {
    match command {
        ZodiacConfigCommand::Show => {
            let store = global.open_store()?;
            let (map, status) =
                settings::zodiac_map(&store).context("Failed to read zodiac config")?;
            let status = match status {
                ZodiacConfigStatus::Missing => "default".to_owned(),
                ZodiacConfigStatus::Accepted => "override".to_owned(),
                ZodiacConfigStatus::Rejected(err) => {
                    format!("default (stored override rejected: {err})")
                }
            };
            util::save_json(
                &ShowOutput {
                    status,
                    mapping: map.to_config(),
                    numbers: Number::all().map(|n| map.info(n)).collect(),
                },
                None,
            )
        }
        ZodiacConfigCommand::Set { file } => {
            let json = util::read_text_input("zodiac config", file.as_deref())?;
            let mut store = global.open_store()?;
            let map = settings::set_zodiac_config(&mut store, &json)
                .context("Zodiac config rejected; the previous mapping is kept")?;
            util::save_json(&map.to_config(), None)
        }
    }
}
