//! One simulated-annealing search chain.
//!
//! A chain owns its own seating container and random generator; chains only
//! share the solved flag and the cancel token, so they can run on separate
//! worker threads without locking.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::Instant;

use rand::{seq::SliceRandom, Rng};
use rustc_hash::FxHashSet;

use roundel_core::deal::default_seating;
use roundel_core::error::SeatingError;
use roundel_core::evaluate::{compare_scores, Evaluator, IssueReport, RuleCounts, RULE_COUNT};
use roundel_core::measure::Measure;
use roundel_core::round::PlayerId;
use roundel_core::seating::Seating;

use crate::optimize::CancelToken;

pub(crate) const CLEAN: RuleCounts = [0; RULE_COUNT];

/// Search state shared by all chains of one invocation.
pub(crate) struct SearchContext<'a> {
    pub evaluator: &'a Evaluator,
    pub base: &'a Measure,
    pub eligible: &'a [PlayerId],
    pub iterations: usize,
    pub deadline: Option<Instant>,
    pub solved: &'a AtomicBool,
    pub cancel: &'a CancelToken,
}

impl SearchContext<'_> {
    fn stopped(&self) -> bool {
        self.solved.load(AtomicOrdering::Relaxed)
            || self.cancel.is_cancelled()
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Final state of one chain.
pub(crate) struct ChainResult {
    pub seating: Seating,
    pub score: RuleCounts,
    pub report: IssueReport,
}

/// Run one annealing chain to completion (clean seating, budget exhausted,
/// another chain solved, cancellation or deadline).
///
/// Starts from a fresh shuffled default deal. Each step swaps a
/// temperature-scaled number of violation participants to random seats and
/// keeps the result only if its score is not lexicographically worse, so a
/// chain's score never increases.
pub(crate) fn run_chain<R: Rng>(
    ctx: &SearchContext,
    rng: &mut R,
) -> Result<ChainResult, SeatingError> {
    let mut order = ctx.eligible.to_vec();
    order.shuffle(rng);
    let mut seating = Seating::new(&default_seating(order)?);

    let total = ctx.base.clone() + &ctx.evaluator.measure(seating.round());
    let mut score = ctx.evaluator.fast_score(&total);
    let mut report = ctx.evaluator.issues(&total);

    if score == CLEAN {
        ctx.solved.store(true, AtomicOrdering::Relaxed);
        return Ok(ChainResult {
            seating,
            score,
            report,
        });
    }

    let max_switches = ctx.eligible.len() / 2;
    let span = (ctx.iterations.max(2) as f64).ln();
    for it in 0..ctx.iterations {
        if ctx.stopped() {
            break;
        }

        // cooling: near 1 at the start, 0 at the end
        let temperature = 1.0 - ((it + 1) as f64).ln() / span;
        let mut target =
            (1.0 + max_switches.saturating_sub(1) as f64 * temperature).round() as usize;
        if target < 2 && rng.gen_bool(0.5) {
            target = 2;
        }

        let mut candidate = seating.clone();
        for player in swap_targets(&report, ctx.eligible, target, rng) {
            candidate.random_swap(&player, rng);
        }

        let total = ctx.base.clone() + &ctx.evaluator.measure(candidate.round());
        let candidate_score = ctx.evaluator.fast_score(&total);
        if compare_scores(&candidate_score, &score) != Ordering::Greater {
            seating = candidate;
            score = candidate_score;
            report = ctx.evaluator.issues(&total);
            if score == CLEAN {
                ctx.solved.store(true, AtomicOrdering::Relaxed);
                break;
            }
        }
    }

    Ok(ChainResult {
        seating,
        score,
        report,
    })
}

/// Pick up to `target` distinct eligible players to move: one representative
/// per violation instance in rule order, padded with random eligible players.
fn swap_targets<R: Rng>(
    report: &IssueReport,
    eligible: &[PlayerId],
    target: usize,
    rng: &mut R,
) -> Vec<PlayerId> {
    let pool: FxHashSet<&PlayerId> = eligible.iter().collect();
    let mut picked: Vec<PlayerId> = Vec::with_capacity(target);
    let mut seen: FxHashSet<&PlayerId> = FxHashSet::default();

    'rules: for (_, instances) in report.iter() {
        for offenders in instances {
            if picked.len() >= target {
                break 'rules;
            }
            let fresh = offenders
                .iter()
                .find(|p| pool.contains(p) && !seen.contains(p));
            if let Some(player) = fresh {
                seen.insert(player);
                picked.push(player.clone());
            }
        }
    }

    if picked.len() < target {
        let mut rest: Vec<&PlayerId> = eligible.iter().filter(|p| !seen.contains(p)).collect();
        rest.shuffle(rng);
        for player in rest {
            if picked.len() >= target {
                break;
            }
            picked.push(player.clone());
        }
    }
    picked
}
