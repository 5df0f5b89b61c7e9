//! Error types for the seating engine.

/// Errors surfaced by the seating engine.
#[derive(Debug, thiserror::Error)]
pub enum SeatingError {
    /// The player count cannot be split into tables of 4 or 5 (1, 2, 3, 6,
    /// 7 and 11 players have no legal split).
    #[error("cannot seat {0} players at tables of 4 or 5")]
    InvalidPlayerCount(usize),
}
