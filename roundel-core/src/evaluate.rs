//! Seating quality evaluation.
//!
//! Builds per-round measurement matrices from the templates, sums them over
//! a history, and derives rule violations from the aggregate. Nine rules are
//! checked, in priority order; the optimizer compares seatings by their
//! per-rule violation counts lexicographically in that order.

use std::cmp::Ordering;

use crate::measure::{Measure, PlayerIndex};
use crate::round::{PlayerId, Round, MAX_TABLE_SIZE, MIN_TABLE_SIZE};
use crate::templates::{
    self, CROSS_TABLE, GRAND_PREDATOR, GRAND_PREY, NEIGHBOUR, NON_NEIGHBOUR, OPPONENT, PLAYED,
    PREDATOR, PREY, SEAT1, SEAT5, TRANSFERS, VPS,
};

/// Number of seating-fairness rules.
pub const RULE_COUNT: usize = 9;

/// Per-rule violation counts, in rule priority order.
pub type RuleCounts = [u32; RULE_COUNT];

/// The seating-fairness rules, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// A pair repeated a predator or prey relationship.
    RepeatPredatorPrey,
    /// A pair was seated together in every round played.
    PermanentOpponent,
    /// A player's available victory points strayed from the field average.
    UnevenVps,
    /// A pair was seated together more than once.
    RepeatOpponent,
    /// A player took the fifth seat more than once.
    FifthSeatTwice,
    /// A pair repeated any positional relationship.
    RepeatPosition,
    /// A player took the same seat more than once.
    RepeatSeat,
    /// A player's starting transfers strayed from the field average.
    UnevenTransfers,
    /// A pair repeated a neighbourhood grouping.
    RepeatGrouping,
}

impl Rule {
    /// All rules, in priority order.
    pub const ALL: [Rule; RULE_COUNT] = [
        Rule::RepeatPredatorPrey,
        Rule::PermanentOpponent,
        Rule::UnevenVps,
        Rule::RepeatOpponent,
        Rule::FifthSeatTwice,
        Rule::RepeatPosition,
        Rule::RepeatSeat,
        Rule::UnevenTransfers,
        Rule::RepeatGrouping,
    ];

    /// 0-based position in priority order.
    pub fn index(self) -> usize {
        match self {
            Rule::RepeatPredatorPrey => 0,
            Rule::PermanentOpponent => 1,
            Rule::UnevenVps => 2,
            Rule::RepeatOpponent => 3,
            Rule::FifthSeatTwice => 4,
            Rule::RepeatPosition => 5,
            Rule::RepeatSeat => 6,
            Rule::UnevenTransfers => 7,
            Rule::RepeatGrouping => 8,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Rule::RepeatPredatorPrey => "repeated predator/prey pairing",
            Rule::PermanentOpponent => "seated together every round",
            Rule::UnevenVps => "uneven access to victory points",
            Rule::RepeatOpponent => "seated together twice",
            Rule::FifthSeatTwice => "fifth seat more than once",
            Rule::RepeatPosition => "repeated table position",
            Rule::RepeatSeat => "repeated seat",
            Rule::UnevenTransfers => "uneven starting transfers",
            Rule::RepeatGrouping => "repeated neighbourhood grouping",
        }
    }
}

/// Which gates apply during the rule scan.
///
/// `Report` is what the UI shows: small events are exempt from the
/// repeat-opponent rules that cannot be satisfied at low player counts.
/// `Search` is the annealing objective and keeps those rules ungated, so the
/// optimizer still steers away from repeats the report would forgive. The two
/// modes can therefore disagree on small tournaments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gating {
    Report,
    Search,
}

/// Violations grouped by rule; each instance names the offending player or
/// pair.
#[derive(Clone, Debug, Default)]
pub struct IssueReport {
    by_rule: [Vec<Vec<PlayerId>>; RULE_COUNT],
}

impl IssueReport {
    pub fn rule(&self, rule: Rule) -> &[Vec<PlayerId>] {
        &self.by_rule[rule.index()]
    }

    /// Instance counts per rule, in priority order.
    pub fn counts(&self) -> RuleCounts {
        let mut counts = [0; RULE_COUNT];
        for (count, instances) in counts.iter_mut().zip(&self.by_rule) {
            *count = instances.len() as u32;
        }
        counts
    }

    /// True iff every rule's instance list is empty.
    pub fn is_clean(&self) -> bool {
        self.by_rule.iter().all(Vec::is_empty)
    }

    /// Total number of violation instances.
    pub fn total(&self) -> usize {
        self.by_rule.iter().map(Vec::len).sum()
    }

    /// Rules with their instances, in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Rule, &[Vec<PlayerId>])> + '_ {
        Rule::ALL.iter().map(move |&rule| (rule, self.rule(rule)))
    }

    fn push(&mut self, rule: Rule, players: Vec<PlayerId>) {
        self.by_rule[rule.index()].push(players);
    }
}

/// Lexicographic comparison of per-rule counts: the first rule where the
/// counts differ decides, fewer is better.
pub fn compare_scores(lhs: &RuleCounts, rhs: &RuleCounts) -> Ordering {
    lhs.cmp(rhs)
}

/// Quantifies seatings over a fixed player universe.
pub struct Evaluator {
    index: PlayerIndex,
}

impl Evaluator {
    pub fn new(index: PlayerIndex) -> Self {
        Self { index }
    }

    /// Evaluator over every player appearing in `history` plus `eligible`,
    /// so dropped or rejoined players stay represented.
    pub fn over(history: &[Round], eligible: &[PlayerId]) -> Self {
        Self::new(PlayerIndex::collect(history, eligible))
    }

    pub fn index(&self) -> &PlayerIndex {
        &self.index
    }

    /// Measurement matrix of a single round.
    pub fn measure(&self, round: &Round) -> Measure {
        self.measure_tables(round, None)
    }

    /// Like [`measure`](Self::measure), restricted to the listed table
    /// indices (used e.g. to keep a finals table out of the evaluation).
    /// Tables that are not 4- or 5-seat contribute nothing.
    pub fn measure_tables(&self, round: &Round, only: Option<&[usize]>) -> Measure {
        let mut measure = Measure::zero(self.index.len());
        for (t, table) in round.iter().enumerate() {
            if let Some(only) = only {
                if !only.contains(&t) {
                    continue;
                }
            }
            let size = table.len();
            if !(MIN_TABLE_SIZE..=MAX_TABLE_SIZE).contains(&size) {
                continue; // malformed table, contributes nothing
            }
            for (i, player) in table.iter().enumerate() {
                let Some(pi) = self.index.row(player) else {
                    continue;
                };
                let Some(position) = templates::position(size, i) else {
                    continue;
                };
                Measure::accumulate(measure.diagonal_mut(pi), position);
                for (j, other) in table.iter().enumerate() {
                    if j == i {
                        continue;
                    }
                    let Some(pj) = self.index.row(other) else {
                        continue;
                    };
                    if pi < pj {
                        // above the diagonal; the mirrored pass writes this
                        // pair from the other player's perspective
                        continue;
                    }
                    let offset = (j + size - i) % size;
                    let Some(relationship) = templates::relationship(size, offset) else {
                        continue;
                    };
                    Measure::accumulate(measure.pair_mut(pi, pj), relationship);
                }
            }
        }
        measure
    }

    /// Element-wise sum of [`measure`](Self::measure) over every round.
    pub fn measure_rounds(&self, rounds: &[Round]) -> Measure {
        let mut total = Measure::zero(self.index.len());
        for round in rounds {
            total += &self.measure(round);
        }
        total
    }

    /// Violations with offender lists, under [`Gating::Report`].
    pub fn issues(&self, measure: &Measure) -> IssueReport {
        let mut report = IssueReport::default();
        self.scan(measure, Gating::Report, |rule, rows| {
            report.push(rule, rows.iter().map(|&r| self.index.id(r).clone()).collect());
        });
        report
    }

    /// Violation counts only, under [`Gating::Search`]. This is the cheap
    /// objective for the annealing loop.
    pub fn fast_score(&self, measure: &Measure) -> RuleCounts {
        let mut counts = [0; RULE_COUNT];
        self.scan(measure, Gating::Search, |rule, _| {
            counts[rule.index()] += 1;
        });
        counts
    }

    /// Walk the lower triangle and emit every rule violation. `emit` receives
    /// the rule and the offending row indices (one for self-records, two for
    /// pairs).
    fn scan(&self, measure: &Measure, gating: Gating, mut emit: impl FnMut(Rule, &[usize])) {
        let dim = self.index.len();

        // Field aggregates over players who actually played.
        let mut playing = 0u32;
        let mut rounds = 0u32;
        let mut vp_rate_sum = 0.0f64;
        let mut tr_rate_sum = 0.0f64;
        for row in 0..dim {
            let own = measure.diagonal(row);
            if own[PLAYED] == 0 {
                continue;
            }
            playing += 1;
            rounds = rounds.max(own[PLAYED]);
            vp_rate_sum += own[VPS] as f64 / own[PLAYED] as f64;
            tr_rate_sum += own[TRANSFERS] as f64 / own[PLAYED] as f64;
        }
        if rounds == 0 {
            return;
        }
        let mean_vps = vp_rate_sum / playing as f64;
        let mean_transfers = tr_rate_sum / playing as f64;
        let crowded = playing > 20;

        for i in 0..dim {
            for j in 0..=i {
                if j == i {
                    let own = measure.diagonal(i);
                    let played = own[PLAYED];
                    if played == 0 {
                        continue;
                    }
                    let tolerance = 1.0 / played as f64;
                    if (mean_vps - own[VPS] as f64 / played as f64).abs() > tolerance {
                        emit(Rule::UnevenVps, &[i]);
                    }
                    if own[SEAT5] > 1 {
                        emit(Rule::FifthSeatTwice, &[i]);
                    }
                    if (SEAT1..=SEAT5).any(|seat| own[seat] > 1) {
                        emit(Rule::RepeatSeat, &[i]);
                    }
                    if (mean_transfers - own[TRANSFERS] as f64 / played as f64).abs()
                        > 2.0 * tolerance
                    {
                        emit(Rule::UnevenTransfers, &[i]);
                    }
                } else {
                    let rel = measure.pair(i, j);
                    if rel[OPPONENT] == 0 {
                        continue; // never met
                    }
                    if rel[PREY] > 1 || rel[PREDATOR] > 1 {
                        emit(Rule::RepeatPredatorPrey, &[i, j]);
                    }
                    let permanent_gate = match gating {
                        Gating::Report => crowded && rounds > 2,
                        Gating::Search => true,
                    };
                    if permanent_gate && rel[OPPONENT] >= rounds {
                        emit(Rule::PermanentOpponent, &[i, j]);
                    }
                    let repeat_gate = match gating {
                        Gating::Report => crowded,
                        Gating::Search => true,
                    };
                    if repeat_gate && rel[OPPONENT] > 1 {
                        emit(Rule::RepeatOpponent, &[i, j]);
                    }
                    if [PREY, GRAND_PREY, GRAND_PREDATOR, PREDATOR, CROSS_TABLE]
                        .iter()
                        .any(|&channel| rel[channel] > 1)
                    {
                        emit(Rule::RepeatPosition, &[i, j]);
                    }
                    if crowded && (rel[NEIGHBOUR] > 1 || rel[NON_NEIGHBOUR] > 1) {
                        emit(Rule::RepeatGrouping, &[i, j]);
                    }
                }
            }
        }
    }
}

/// Read-only diagnostic over played rounds, for showing per-player warnings.
pub fn compute_issues(rounds: &[Round]) -> IssueReport {
    let evaluator = Evaluator::over(rounds, &[]);
    let measure = evaluator.measure_rounds(rounds);
    evaluator.issues(&measure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(ids: &[&str]) -> Vec<PlayerId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_measure_five_seat_table() {
        let round = vec![table(&["a", "b", "c", "d", "e"])];
        let ev = Evaluator::over(std::slice::from_ref(&round), &[]);
        let m = ev.measure(&round);

        // seat 2 ("b"): played once, 5 VPs contestable, 2 transfers
        let b = ev.index().row(&"b".to_string()).unwrap();
        assert_eq!(m.diagonal(b)[PLAYED], 1);
        assert_eq!(m.diagonal(b)[VPS], 5);
        assert_eq!(m.diagonal(b)[TRANSFERS], 2);
        assert_eq!(m.diagonal(b)[SEAT1 + 1], 1);

        // "b" preys on "c": recorded from the higher row's perspective
        let c = ev.index().row(&"c".to_string()).unwrap();
        let rel = m.pair(c, b);
        assert_eq!(rel[OPPONENT], 1);
        // c is the higher row; b is c's predator
        assert_eq!(rel[PREDATOR], 1);
        assert_eq!(rel[PREY], 0);
        assert_eq!(rel[NEIGHBOUR], 1);

        // "a" and "c" are two seats apart: grand relation, non-neighbour
        let a = ev.index().row(&"a".to_string()).unwrap();
        let rel = m.pair(a, c);
        assert_eq!(rel[OPPONENT], 1);
        // from c's perspective, a is c's grand-predator
        assert_eq!(rel[GRAND_PREDATOR], 1);
        assert_eq!(rel[NON_NEIGHBOUR], 1);
    }

    #[test]
    fn test_measure_four_seat_cross_table() {
        let round = vec![table(&["a", "b", "c", "d"])];
        let ev = Evaluator::over(std::slice::from_ref(&round), &[]);
        let m = ev.measure(&round);
        let a = ev.index().row(&"a".to_string()).unwrap();
        let c = ev.index().row(&"c".to_string()).unwrap();
        let rel = m.pair(a, c);
        assert_eq!(rel[CROSS_TABLE], 1);
        assert_eq!(rel[NON_NEIGHBOUR], 1);
        assert_eq!(rel[PREY], 0);
    }

    #[test]
    fn test_malformed_tables_contribute_nothing() {
        let round = vec![table(&["a", "b", "c"]), table(&["d", "e", "f", "g"])];
        let ev = Evaluator::over(std::slice::from_ref(&round), &[]);
        let m = ev.measure(&round);
        let a = ev.index().row(&"a".to_string()).unwrap();
        assert_eq!(m.diagonal(a)[PLAYED], 0);
        let d = ev.index().row(&"d".to_string()).unwrap();
        assert_eq!(m.diagonal(d)[PLAYED], 1);
    }

    #[test]
    fn test_table_filter() {
        let round = vec![
            table(&["a", "b", "c", "d"]),
            table(&["e", "f", "g", "h"]),
        ];
        let ev = Evaluator::over(std::slice::from_ref(&round), &[]);
        let m = ev.measure_tables(&round, Some(&[1]));
        let a = ev.index().row(&"a".to_string()).unwrap();
        let e = ev.index().row(&"e".to_string()).unwrap();
        assert_eq!(m.diagonal(a)[PLAYED], 0);
        assert_eq!(m.diagonal(e)[PLAYED], 1);
    }

    #[test]
    fn test_measure_rounds_is_additive() {
        let r1 = vec![table(&["a", "b", "c", "d"]), table(&["e", "f", "g", "h"])];
        let r2 = vec![table(&["a", "e", "b", "f"]), table(&["c", "g", "d", "h"])];
        let history = vec![r1.clone(), r2.clone()];
        let ev = Evaluator::over(&history, &[]);

        let total = ev.measure_rounds(&history);
        let summed = ev.measure(&r1) + &ev.measure(&r2);
        assert_eq!(total, summed);
    }

    #[test]
    fn test_repeat_predator_prey_detected() {
        // "a" preys on "b" in both rounds
        let history = vec![
            vec![table(&["a", "b", "c", "d"])],
            vec![table(&["a", "b", "d", "c"])],
        ];
        let ev = Evaluator::over(&history, &[]);
        let report = ev.issues(&ev.measure_rounds(&history));
        let offenders = report.rule(Rule::RepeatPredatorPrey);
        assert_eq!(offenders.len(), 1);
        let pair = &offenders[0];
        assert!(pair.contains(&"a".to_string()) && pair.contains(&"b".to_string()));
        // the same repeat also counts as a repeated position
        assert_eq!(report.rule(Rule::RepeatPosition).len(), 1);
    }

    #[test]
    fn test_reversed_adjacency_is_not_a_repeat() {
        // "a" preys on "b", then "b" preys on "a"
        let history = vec![
            vec![table(&["a", "b", "c", "d"])],
            vec![table(&["b", "a", "d", "c"])],
        ];
        let ev = Evaluator::over(&history, &[]);
        let report = ev.issues(&ev.measure_rounds(&history));
        assert!(report.rule(Rule::RepeatPredatorPrey).is_empty());
    }

    #[test]
    fn test_seat_repeats_dual_flag() {
        // "e" takes seat 5 in both rounds
        let history = vec![
            vec![table(&["a", "b", "c", "d", "e"])],
            vec![table(&["b", "a", "d", "c", "e"])],
        ];
        let ev = Evaluator::over(&history, &[]);
        let report = ev.issues(&ev.measure_rounds(&history));
        assert_eq!(report.rule(Rule::FifthSeatTwice).len(), 1);
        assert_eq!(report.rule(Rule::FifthSeatTwice)[0], vec!["e".to_string()]);
        // seat 5 twice is also a repeated seat
        assert!(report
            .rule(Rule::RepeatSeat)
            .iter()
            .any(|p| p[0] == "e"));
    }

    #[test]
    fn test_uneven_vps_at_mixed_table_sizes() {
        // Same 9-player seating twice: the 4-seat table players fall short
        // of the field's mean VP rate by more than 1/played.
        let round = vec![
            table(&["a", "b", "c", "d", "e"]),
            table(&["f", "g", "h", "i"]),
        ];
        let history = vec![round.clone(), round.clone()];
        let ev = Evaluator::over(&history, &[]);
        let report = ev.issues(&ev.measure_rounds(&history));
        // mean rate = (5*5 + 4*4)/9 ≈ 4.556; |4 − 4.556| > 0.5, |5 − 4.556| < 0.5
        let flagged: Vec<&str> = report
            .rule(Rule::UnevenVps)
            .iter()
            .map(|p| p[0].as_str())
            .collect();
        assert_eq!(flagged, vec!["f", "g", "h", "i"]);
    }

    #[test]
    fn test_search_gating_is_stricter_than_report() {
        // Two players seated together twice in an 8-player event: the report
        // forgives a small field, the search objective does not.
        let history = vec![
            vec![table(&["a", "b", "c", "d"]), table(&["e", "f", "g", "h"])],
            vec![table(&["a", "b", "e", "f"]), table(&["c", "d", "g", "h"])],
        ];
        let ev = Evaluator::over(&history, &[]);
        let m = ev.measure_rounds(&history);
        let report = ev.issues(&m);
        assert!(report.rule(Rule::RepeatOpponent).is_empty());
        let score = ev.fast_score(&m);
        assert!(score[Rule::RepeatOpponent.index()] > 0);
        assert!(score[Rule::PermanentOpponent.index()] > 0);
    }

    #[test]
    fn test_clean_report_matches_zero_counts() {
        let history = vec![
            vec![table(&["a", "b", "c", "d"]), table(&["e", "f", "g", "h"])],
        ];
        let ev = Evaluator::over(&history, &[]);
        let m = ev.measure_rounds(&history);
        let report = ev.issues(&m);
        assert_eq!(report.is_clean(), report.counts() == [0; RULE_COUNT]);
    }

    #[test]
    fn test_empty_history_is_clean() {
        let report = compute_issues(&[]);
        assert!(report.is_clean());
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_compare_scores_is_lexicographic() {
        assert_eq!(
            compare_scores(&[0, 5, 5, 5, 5, 5, 5, 5, 5], &[1, 0, 0, 0, 0, 0, 0, 0, 0]),
            Ordering::Less
        );
        assert_eq!(
            compare_scores(&[0, 1, 0, 0, 0, 0, 0, 0, 0], &[0, 1, 0, 0, 0, 0, 0, 0, 0]),
            Ordering::Equal
        );
        assert_eq!(
            compare_scores(&[0, 1, 1, 0, 0, 0, 0, 0, 0], &[0, 1, 0, 9, 9, 9, 9, 9, 9]),
            Ordering::Greater
        );
    }
}
