use anyhow::Context as _;
use drawcast_training::{StepOutcome, publish, run_evolution_step};

use super::GlobalArgs;
use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Wall-clock budget of this step in seconds (overrides the config)
    #[arg(long)]
    budget: Option<f64>,
    /// Stop after this many generations (overrides the config)
    #[arg(long)]
    generations: Option<u64>,
    /// Publish the staging prediction once the step completes
    #[arg(long)]
    publish: bool,
}

pub(crate) fn run(global: &GlobalArgs, arg: &EvolveArg) -> anyhow::Result<()> {
    let mut config = global.evolution_config()?;
    if let Some(budget) = arg.budget {
        config.time_budget_secs = budget;
    }
    if arg.generations.is_some() {
        config.max_generations = arg.generations;
    }

    let mut store = global.open_store()?;
    let mut rng = global.rng();

    let report = match run_evolution_step(&mut store, &config, &mut rng)
        .context("Evolution step failed")?
    {
        StepOutcome::Disabled => {
            println!("Evolution is disabled; run `drawcast enable` to turn it back on");
            return Ok(());
        }
        StepOutcome::Busy { since } => {
            match since {
                Some(since) => println!("Another evolution step has been running since {since}"),
                None => println!("Another evolution step is running"),
            }
            return Ok(());
        }
        StepOutcome::Completed(report) => report,
    };

    eprintln!(
        "Ran {} generation(s) in {:.1}s, generation counter now {}",
        report.generations_run,
        report.elapsed.as_secs_f64(),
        report.generation
    );
    if let Some(fitness) = &report.fitness {
        eprintln!(
            "Fitness: max={:.1} mean={:.1} median={:.1} min={:.1} std_dev={:.2} (best possible {:.0} over {} backtest draws)",
            fitness.max,
            fitness.mean,
            fitness.median,
            fitness.min,
            fitness.std_dev,
            report.max_fitness,
            report.cache_entries
        );
    }

    if arg.publish {
        publish(&mut store).context("Failed to publish prediction")?;
    }
    util::save_json(&report.prediction, None)
}
