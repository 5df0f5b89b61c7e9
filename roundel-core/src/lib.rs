//! ROUNDEL Core - Tournament seating engine
//!
//! This crate provides the algorithmic heart of the seating system:
//! - Relationship and position templates for 4- and 5-seat tables
//! - The triangular measurement matrix summed over played rounds
//! - Rule-violation detection in report and search gating modes
//! - A mutable seating container with O(1) seat swaps
//! - The default dealer splitting a player sequence into tables

pub mod deal;
pub mod error;
pub mod evaluate;
pub mod measure;
pub mod round;
pub mod seating;
pub mod templates;

// Re-exports for convenient access
pub use deal::default_seating;
pub use error::SeatingError;
pub use evaluate::{compare_scores, compute_issues, Evaluator, Gating, IssueReport, Rule, RuleCounts};
pub use measure::{Measure, PlayerIndex};
pub use round::{PlayerId, Round, Table};
pub use seating::Seating;
