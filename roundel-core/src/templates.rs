//! Fixed relationship and position templates for 4- and 5-seat tables.
//!
//! Pure data. For every table size and seat offset there is one relationship
//! vector, and for every seat one position vector; the evaluator sums these
//! into the measurement matrix.

/// Length of both vector kinds.
pub const VECTOR_LEN: usize = 8;

/// One measurement vector: a relationship vector off the matrix diagonal, a
/// position vector on it.
pub type Vector = [u32; VECTOR_LEN];

// Relationship channels.
pub const OPPONENT: usize = 0;
pub const PREY: usize = 1;
pub const GRAND_PREY: usize = 2;
pub const GRAND_PREDATOR: usize = 3;
pub const PREDATOR: usize = 4;
pub const CROSS_TABLE: usize = 5;
pub const NEIGHBOUR: usize = 6;
pub const NON_NEIGHBOUR: usize = 7;

// Position channels.
pub const PLAYED: usize = 0;
pub const VPS: usize = 1;
pub const TRANSFERS: usize = 2;
pub const SEAT1: usize = 3;
pub const SEAT5: usize = 7;

/// Relationship of a seat toward the seat `offset` places later in turn
/// order, at a 4-seat table. Every co-seated pair is an opponent; offsets 1
/// and 3 are the prey/predator neighbours, offset 2 faces across the table.
static RELATIONSHIPS_4: [Vector; 3] = [
    [1, 1, 0, 0, 0, 0, 1, 0], // prey
    [1, 0, 0, 0, 0, 1, 0, 1], // cross-table
    [1, 0, 0, 0, 1, 0, 1, 0], // predator
];

/// Same for a 5-seat table, where offsets 2 and 3 are the grand-prey and
/// grand-predator instead of a cross-table seat.
static RELATIONSHIPS_5: [Vector; 4] = [
    [1, 1, 0, 0, 0, 0, 1, 0], // prey
    [1, 0, 1, 0, 0, 0, 0, 1], // grand-prey
    [1, 0, 0, 1, 0, 0, 0, 1], // grand-predator
    [1, 0, 0, 0, 1, 0, 1, 0], // predator
];

/// Position vectors by seat at a 4-seat table: played flag, contestable
/// victory points, starting transfers, then the seat-occupancy flags.
static POSITIONS_4: [Vector; 4] = [
    [1, 4, 1, 1, 0, 0, 0, 0],
    [1, 4, 2, 0, 1, 0, 0, 0],
    [1, 4, 3, 0, 0, 1, 0, 0],
    [1, 4, 4, 0, 0, 0, 1, 0],
];

/// Same at a 5-seat table. Seats 4 and 5 both start with 4 transfers.
static POSITIONS_5: [Vector; 5] = [
    [1, 5, 1, 1, 0, 0, 0, 0],
    [1, 5, 2, 0, 1, 0, 0, 0],
    [1, 5, 3, 0, 0, 1, 0, 0],
    [1, 5, 4, 0, 0, 0, 1, 0],
    [1, 5, 4, 0, 0, 0, 0, 1],
];

/// Relationship vector for a seat toward the seat `offset` places later
/// (`1 <= offset < table_size`). None for unsupported sizes or offsets.
pub fn relationship(table_size: usize, offset: usize) -> Option<&'static Vector> {
    let rels: &[Vector] = match table_size {
        4 => &RELATIONSHIPS_4,
        5 => &RELATIONSHIPS_5,
        _ => return None,
    };
    rels.get(offset.checked_sub(1)?)
}

/// Position vector for a 0-based seat at a table of the given size.
pub fn position(table_size: usize, seat: usize) -> Option<&'static Vector> {
    let positions: &[Vector] = match table_size {
        4 => &POSITIONS_4,
        5 => &POSITIONS_5,
        _ => return None,
    };
    positions.get(seat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_channels() {
        // Every relationship carries the opponent channel, exactly one
        // positional channel and exactly one grouping channel.
        for size in [4, 5] {
            for offset in 1..size {
                let rel = relationship(size, offset).unwrap();
                assert_eq!(rel[OPPONENT], 1);
                let positional: u32 = [PREY, GRAND_PREY, GRAND_PREDATOR, PREDATOR, CROSS_TABLE]
                    .iter()
                    .map(|&c| rel[c])
                    .sum();
                assert_eq!(positional, 1, "size {} offset {}", size, offset);
                assert_eq!(rel[NEIGHBOUR] + rel[NON_NEIGHBOUR], 1);
            }
        }
    }

    #[test]
    fn test_relationship_unsupported() {
        assert!(relationship(3, 1).is_none());
        assert!(relationship(6, 1).is_none());
        assert!(relationship(4, 0).is_none());
        assert!(relationship(4, 4).is_none());
        assert!(relationship(5, 5).is_none());
    }

    #[test]
    fn test_position_transfers_cap_at_four() {
        assert_eq!(position(5, 3).unwrap()[TRANSFERS], 4);
        assert_eq!(position(5, 4).unwrap()[TRANSFERS], 4);
        assert_eq!(position(4, 0).unwrap()[TRANSFERS], 1);
    }

    #[test]
    fn test_position_marks_one_seat() {
        for size in [4, 5] {
            for seat in 0..size {
                let pos = position(size, seat).unwrap();
                assert_eq!(pos[PLAYED], 1);
                assert_eq!(pos[VPS], size as u32);
                let seats: u32 = (SEAT1..=SEAT5).map(|c| pos[c]).sum();
                assert_eq!(seats, 1);
                assert_eq!(pos[SEAT1 + seat], 1);
            }
        }
    }
}
