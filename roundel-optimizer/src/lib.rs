//! ROUNDEL Optimizer - Seat assignment search
//!
//! Turns a round history and the eligible players into the next round's
//! seating:
//! - Precomputed-template lookup for rounds 2 and 3 of a 3-round format
//! - Parallel simulated-annealing chains guided by the rule evaluator
//! - Iteration, wall-clock and cancellation budgets

mod anneal;
pub mod book;
pub mod optimize;

pub use book::{template_seating, RoundPlan, SeatingTemplates};
pub use optimize::{CancelToken, Optimizer, OptimizerConfig};
