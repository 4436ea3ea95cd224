use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use drawcast_store::HistoryStore as _;

use super::GlobalArgs;
use crate::{announcement::Announcement, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct IngestArg {
    /// Announcement text file (reads stdin when omitted)
    file: Option<PathBuf>,
    /// Draw time in RFC 3339 (defaults to now)
    #[arg(long)]
    drawn_at: Option<DateTime<Utc>>,
}

pub(crate) fn run(global: &GlobalArgs, arg: &IngestArg) -> anyhow::Result<()> {
    let text = util::read_text_input("announcement", arg.file.as_deref())?;
    let announcement = Announcement::parse(&text).context("Failed to parse announcement")?;
    let draw = announcement
        .to_draw(arg.drawn_at.unwrap_or_else(Utc::now))
        .context("Announcement is not a valid draw")?;

    let mut store = global.open_store()?;
    let inserted = store
        .append_draw(&draw)
        .with_context(|| format!("Failed to store issue {}", draw.issue()))?;
    if inserted {
        tracing::info!(
            issue = %draw.issue(),
            special = %draw.special(),
            announced_zodiac = ?draw.announced_zodiac(),
            "draw ingested"
        );
        println!("Stored issue {}", draw.issue());
    } else {
        println!("Issue {} is already stored", draw.issue());
    }
    Ok(())
}
