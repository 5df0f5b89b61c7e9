//! Round and table primitives shared across the workspace.
//!
//! The engine treats players as opaque tokens. A table is an ordered group of
//! 4 or 5 of them; the order encodes seat number and therefore turn order.

/// Opaque player token. The engine uses no other player attribute.
pub type PlayerId = String;

/// Ordered seats of one table. Index 0 is seat 1.
pub type Table = Vec<PlayerId>;

/// The simultaneous tables of one tournament round.
pub type Round = Vec<Table>;

/// Smallest legal table.
pub const MIN_TABLE_SIZE: usize = 4;

/// Largest legal table.
pub const MAX_TABLE_SIZE: usize = 5;

/// Iterate every player of a round in table order, seat order.
pub fn round_players(round: &Round) -> impl Iterator<Item = &PlayerId> {
    round.iter().flatten()
}
