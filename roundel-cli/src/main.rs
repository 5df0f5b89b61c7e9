//! ROUNDEL CLI - Tournament seating from the command line
//!
//! Commands:
//! - seat: compute the next round's seating from history and player files
//! - check: report seating-fairness violations over played rounds

mod check;
mod seat;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(name = "roundel")]
#[command(about = "Tournament seating engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the next round's seating
    Seat {
        /// JSON file with past rounds (rounds of tables of player ids)
        #[arg(long)]
        history: Option<PathBuf>,
        /// JSON file with the player ids eligible for the new round
        #[arg(long)]
        players: PathBuf,
        /// Precomputed seating template asset
        #[arg(long, default_value = "assets/templates.json")]
        templates: PathBuf,
        /// Random seed for reproducible seatings
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "3000")]
        iterations: usize,
        #[arg(long, default_value = "4")]
        chains: usize,
        /// Run search chains one after another instead of in parallel
        #[arg(long)]
        sequential: bool,
    },
    /// Report seating-fairness violations over played rounds
    Check {
        /// JSON file with played rounds
        #[arg(long)]
        history: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Seat {
            history,
            players,
            templates,
            seed,
            iterations,
            chains,
            sequential,
        } => seat::run(seat::SeatArgs {
            history,
            players,
            templates,
            seed,
            iterations,
            chains,
            sequential,
        }),
        Commands::Check { history } => check::run(&history),
    }
}

/// Read and parse a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}
