//! `check` command - report seating-fairness violations.

use std::path::Path;

use roundel_core::evaluate::compute_issues;
use roundel_core::round::Round;

use crate::read_json;

pub fn run(history: &Path) -> anyhow::Result<()> {
    let rounds: Vec<Round> = read_json(history)?;
    let report = compute_issues(&rounds);

    if report.is_clean() {
        println!("no seating violations in {} rounds", rounds.len());
        return Ok(());
    }

    for (rule, instances) in report.iter() {
        if instances.is_empty() {
            continue;
        }
        println!("{}:", rule.describe());
        for offenders in instances {
            println!("  - {}", offenders.join(", "));
        }
    }
    println!("{} violations total", report.total());
    Ok(())
}
