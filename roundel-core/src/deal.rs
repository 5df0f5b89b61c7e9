//! Default dealing of an ordered player sequence into tables.

use crate::error::SeatingError;
use crate::round::{PlayerId, Round};

/// Split an already-ordered player sequence into consecutive tables of 5 then
/// 4 seats, keeping table sizes as uniform as possible.
///
/// With `r = n mod 5` (5 when the remainder is 0), the first
/// `n - 4 * (5 - r)` players fill 5-seat tables and the rest fill 4-seat
/// tables. Input order is preserved within and across tables.
///
/// # Errors
/// `InvalidPlayerCount` when a non-empty sequence has no legal split
/// (n = 1, 2, 3, 6, 7 or 11). An empty sequence yields an empty round.
pub fn default_seating(players: Vec<PlayerId>) -> Result<Round, SeatingError> {
    let n = players.len();
    if n == 0 {
        return Ok(Round::new());
    }
    let remainder = match n % 5 {
        0 => 5,
        r => r,
    };
    let seats_in_fives = n as i64 - 4 * (5 - remainder as i64);
    if seats_in_fives < 0 {
        return Err(SeatingError::InvalidPlayerCount(n));
    }

    let mut round = Round::new();
    let mut players = players.into_iter();
    for _ in 0..seats_in_fives as usize / 5 {
        round.push(players.by_ref().take(5).collect());
    }
    while players.len() > 0 {
        round.push(players.by_ref().take(4).collect());
    }
    Ok(round)
}
