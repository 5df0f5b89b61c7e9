//! Precomputed conflict-free seatings, loaded from a static JSON asset.
//!
//! The asset maps a player count (as a string key) to the three round
//! layouts of a 3-round tournament, expressed in sequential player numbers
//! 1..n. The engine never generates or edits this data; it only looks a
//! count up and remaps numbers back to player ids.

use std::path::Path;

use anyhow::Context;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use roundel_core::round::{round_players, PlayerId, Round};

/// One round layout: tables of 1-based sequential player numbers.
pub type RoundPlan = Vec<Vec<usize>>;

/// Lookup table of precomputed 3-round seatings keyed by player count.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct SeatingTemplates {
    by_count: FxHashMap<String, Vec<RoundPlan>>,
}

impl SeatingTemplates {
    /// Parse the asset from its JSON text.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid seating template asset")
    }

    /// Load the asset from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read seating templates from {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Round plans for a player count, if the asset covers it.
    pub fn get(&self, players: usize) -> Option<&[RoundPlan]> {
        self.by_count.get(&players.to_string()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_count.is_empty()
    }
}

/// Recover a precomputed seating for the upcoming round, when applicable.
///
/// Applicable only for rounds 2 and 3 (0-based index 1 or 2) of a 3-round
/// tournament whose eligible players are exactly the players of round 1.
/// Round-1 players are numbered 1..n sequentially in table order; the
/// requested round's plan is remapped through that numbering. Any mismatch
/// reports "not applicable" by returning `None`.
pub fn template_seating(
    history: &[Round],
    eligible: &[PlayerId],
    templates: &SeatingTemplates,
) -> Option<Round> {
    let round_index = history.len();
    if round_index != 1 && round_index != 2 {
        return None;
    }
    let first = history.first()?;
    let numbered: Vec<&PlayerId> = round_players(first).collect();
    let count = numbered.len();
    if eligible.len() != count {
        return None;
    }
    let eligible_set: FxHashSet<&PlayerId> = eligible.iter().collect();
    if eligible_set.len() != count || numbered.iter().any(|p| !eligible_set.contains(p)) {
        return None;
    }

    let plan = templates.get(count)?.get(round_index)?;
    let mut round = Round::new();
    for table in plan {
        let mut seats = Vec::with_capacity(table.len());
        for &number in table {
            if number == 0 || number > count {
                return None; // malformed plan entry
            }
            seats.push(numbered[number - 1].clone());
        }
        round.push(seats);
    }
    Some(round)
}
