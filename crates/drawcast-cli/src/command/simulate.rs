use anyhow::Context as _;
use chrono::{TimeDelta, Utc};
use drawcast_core::{DrawRecord, IssueId};
use drawcast_store::HistoryStore as _;

use super::GlobalArgs;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of draws to append
    #[arg(long, default_value_t = 150)]
    count: u64,
}

pub(crate) fn run(global: &GlobalArgs, arg: &SimulateArg) -> anyhow::Result<()> {
    let mut store = global.open_store()?;
    let mut rng = global.rng();

    let latest = store
        .recent_draws(1)
        .context("Failed to read latest draw")?
        .first()
        .map(DrawRecord::issue);
    let first = latest.map_or(IssueId::from(1), IssueId::next);
    let now = Utc::now();

    let mut inserted = 0;
    for offset in 0..arg.count {
        let issue = IssueId::from(first.get() + offset);
        let days_ago = i64::try_from(arg.count - offset).unwrap_or(i64::MAX);
        let drawn_at = now - TimeDelta::try_days(days_ago).unwrap_or(TimeDelta::zero());
        let draw = DrawRecord::random(&mut rng, issue, drawn_at);
        if store
            .append_draw(&draw)
            .with_context(|| format!("Failed to store issue {issue}"))?
        {
            inserted += 1;
        }
    }

    tracing::info!(inserted, first = %first, "simulated draws appended");
    println!("Appended {inserted} simulated draws starting at issue {first}");
    Ok(())
}
