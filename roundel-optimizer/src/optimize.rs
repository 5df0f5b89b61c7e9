//! Seating orchestration: template lookup first, annealing search otherwise.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use roundel_core::deal::default_seating;
use roundel_core::error::SeatingError;
use roundel_core::evaluate::{compare_scores, Evaluator};
use roundel_core::round::{PlayerId, Round};

use crate::anneal::{run_chain, ChainResult, SearchContext, CLEAN};
use crate::book::{template_seating, SeatingTemplates};

/// Tuning knobs for the seating search.
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    /// Annealing steps per chain.
    pub iterations: usize,
    /// Number of independent search chains.
    pub chains: usize,
    /// Random seed for reproducibility (None = random).
    pub seed: Option<u64>,
    /// Whether to run chains on worker threads.
    pub parallel: bool,
    /// Optional wall-clock budget for the whole search.
    pub time_budget: Option<Duration>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            iterations: 3000,
            chains: 4,
            seed: None,
            parallel: true,
            time_budget: None,
        }
    }
}

impl OptimizerConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run chains one after another on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Cooperative cancellation flag, cloneable across threads.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Produces a new round's seating from the round history and the players
/// eligible for the new round.
pub struct Optimizer {
    config: OptimizerConfig,
    templates: SeatingTemplates,
    cancel: CancelToken,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            templates: SeatingTemplates::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Attach the precomputed-template asset.
    pub fn with_templates(mut self, templates: SeatingTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Token a caller can use to abort a running search from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Seat the eligible players for the upcoming round.
    ///
    /// Round 1 is a shuffled default deal. Later rounds try the precomputed
    /// templates, then fall back to the annealing search, which returns the
    /// best seating found within its budget (not necessarily violation-free;
    /// callers inspect the result with `compute_issues`).
    ///
    /// # Errors
    /// `InvalidPlayerCount` when the eligible players cannot fill tables of
    /// 4 or 5.
    pub fn initial_seating(
        &self,
        history: &[Round],
        eligible: &[PlayerId],
    ) -> Result<Round, SeatingError> {
        let seed = self.config.seed.unwrap_or_else(rand::random);

        if history.is_empty() {
            // any first-round seating is valid
            let mut players = eligible.to_vec();
            players.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
            return default_seating(players);
        }

        if let Some(round) = template_seating(history, eligible, &self.templates) {
            info!(
                players = eligible.len(),
                round = history.len() + 1,
                "seated from precomputed template"
            );
            return Ok(round);
        }

        if eligible.is_empty() {
            return Ok(Round::new());
        }

        self.search(history, eligible, seed)
    }

    fn search(
        &self,
        history: &[Round],
        eligible: &[PlayerId],
        seed: u64,
    ) -> Result<Round, SeatingError> {
        let evaluator = Evaluator::over(history, eligible);
        let base = evaluator.measure_rounds(history);
        let solved = AtomicBool::new(false);
        let ctx = SearchContext {
            evaluator: &evaluator,
            base: &base,
            eligible,
            iterations: self.config.iterations,
            deadline: self.config.time_budget.map(|budget| Instant::now() + budget),
            solved: &solved,
            cancel: &self.cancel,
        };

        let chains = self.config.chains.max(1);
        let run = |chain: usize| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(chain as u64));
            run_chain(&ctx, &mut rng)
        };
        let results: Result<Vec<ChainResult>, SeatingError> = if self.config.parallel {
            (0..chains).into_par_iter().map(run).collect()
        } else {
            (0..chains).map(run).collect()
        };

        let best = results?
            .into_iter()
            .min_by(|a, b| compare_scores(&a.score, &b.score))
            .expect("at least one chain runs");

        if best.score == CLEAN {
            debug!("search reached a violation-free seating");
        } else {
            warn!(
                residual = best.report.total(),
                "seating search exhausted its budget with violations remaining"
            );
        }
        Ok(best.seating.into_round())
    }
}
