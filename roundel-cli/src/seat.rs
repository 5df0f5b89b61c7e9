//! `seat` command - produce the next round's seating.

use std::path::PathBuf;

use tracing::{info, warn};

use roundel_core::evaluate::compute_issues;
use roundel_core::round::{PlayerId, Round};
use roundel_optimizer::{Optimizer, OptimizerConfig, SeatingTemplates};

use crate::read_json;

pub struct SeatArgs {
    pub history: Option<PathBuf>,
    pub players: PathBuf,
    pub templates: PathBuf,
    pub seed: Option<u64>,
    pub iterations: usize,
    pub chains: usize,
    pub sequential: bool,
}

pub fn run(args: SeatArgs) -> anyhow::Result<()> {
    let history: Vec<Round> = match &args.history {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let players: Vec<PlayerId> = read_json(&args.players)?;

    let config = OptimizerConfig {
        iterations: args.iterations,
        chains: args.chains,
        seed: args.seed,
        parallel: !args.sequential,
        time_budget: None,
    };
    let mut optimizer = Optimizer::new(config);
    if args.templates.exists() {
        optimizer = optimizer.with_templates(SeatingTemplates::load(&args.templates)?);
    } else {
        info!(
            path = %args.templates.display(),
            "no template asset found, relying on the search"
        );
    }

    let round = optimizer.initial_seating(&history, &players)?;

    // surface residual violations the way the tournament screens would
    let mut played = history;
    played.push(round.clone());
    let report = compute_issues(&played);
    for (rule, instances) in report.iter() {
        for offenders in instances {
            warn!(
                rule = rule.describe(),
                players = offenders.join(", "),
                "seating violation"
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&round)?);
    Ok(())
}
