//! Mutable candidate seating with O(1) seat swaps.
//!
//! The annealing loop clones and mutates these containers thousands of times
//! per search, so seat moves go through two small maps instead of rebuilding
//! the round.

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::round::{PlayerId, Round};

/// A candidate table assignment with a bijection between flat seat numbers
/// and (table, seat) coordinates, and between players and their seats.
#[derive(Clone, Debug)]
pub struct Seating {
    tables: Round,
    coords: Vec<(usize, usize)>,
    seat_of: FxHashMap<PlayerId, usize>,
}

impl Seating {
    /// Build from a round. The source round is copied, never mutated.
    pub fn new(round: &Round) -> Self {
        let tables = round.clone();
        let mut coords = Vec::new();
        let mut seat_of = FxHashMap::default();
        for (t, table) in tables.iter().enumerate() {
            for (s, player) in table.iter().enumerate() {
                seat_of.insert(player.clone(), coords.len());
                coords.push((t, s));
            }
        }
        Self {
            tables,
            coords,
            seat_of,
        }
    }

    /// Total number of seats.
    pub fn seats(&self) -> usize {
        self.coords.len()
    }

    pub fn round(&self) -> &Round {
        &self.tables
    }

    pub fn into_round(self) -> Round {
        self.tables
    }

    /// Flat seat number currently held by `player`.
    pub fn seat_of(&self, player: &PlayerId) -> Option<usize> {
        self.seat_of.get(player).copied()
    }

    pub fn player_at(&self, seat: usize) -> &PlayerId {
        let (t, s) = self.coords[seat];
        &self.tables[t][s]
    }

    /// Exchange the occupants of two flat seats.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (ta, sa) = self.coords[a];
        let (tb, sb) = self.coords[b];
        let pa = self.tables[ta][sa].clone();
        let pb = self.tables[tb][sb].clone();
        self.tables[ta][sa] = pb.clone();
        self.tables[tb][sb] = pa.clone();
        self.seat_of.insert(pa, b);
        self.seat_of.insert(pb, a);
    }

    /// Swap `player` into a uniformly random different seat.
    pub fn random_swap<R: Rng>(&mut self, player: &PlayerId, rng: &mut R) {
        if self.seats() < 2 {
            return;
        }
        let Some(seat) = self.seat_of(player) else {
            return;
        };
        let mut other = rng.gen_range(0..self.seats() - 1);
        if other >= seat {
            other += 1;
        }
        self.swap(seat, other);
    }

    /// Fisher-Yates over all seats, expressed as swaps so the maps stay
    /// consistent.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        for i in (1..self.seats()).rev() {
            let j = rng.gen_range(0..=i);
            self.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seating() -> Seating {
        Seating::new(&vec![
            vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            vec!["f".into(), "g".into(), "h".into(), "i".into()],
        ])
    }

    #[test]
    fn test_swap_updates_both_maps() {
        let mut s = seating();
        // "a" sits seat 0, "g" sits seat 6
        s.swap(0, 6);
        assert_eq!(s.player_at(0), "g");
        assert_eq!(s.player_at(6), "a");
        assert_eq!(s.seat_of(&"a".to_string()), Some(6));
        assert_eq!(s.seat_of(&"g".to_string()), Some(0));
        assert_eq!(s.round()[0][0], "g");
        assert_eq!(s.round()[1][1], "a");
    }

    #[test]
    fn test_swap_same_seat_is_noop() {
        let mut s = seating();
        s.swap(3, 3);
        assert_eq!(s.player_at(3), "d");
        assert_eq!(s.seat_of(&"d".to_string()), Some(3));
    }

    #[test]
    fn test_random_swap_moves_player() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let mut s = seating();
            s.random_swap(&"c".to_string(), &mut rng);
            assert_ne!(s.seat_of(&"c".to_string()), Some(2));
        }
    }

    #[test]
    fn test_shuffle_preserves_players_and_shape() {
        let mut s = seating();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        s.shuffle(&mut rng);
        let sizes: Vec<usize> = s.round().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 4]);
        let mut players: Vec<&PlayerId> = s.round().iter().flatten().collect();
        players.sort();
        let names: Vec<String> = players.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
        // maps stay consistent after many swaps
        for seat in 0..s.seats() {
            let player = s.player_at(seat).clone();
            assert_eq!(s.seat_of(&player), Some(seat));
        }
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let mut a = seating();
        let mut b = seating();
        a.shuffle(&mut ChaCha8Rng::seed_from_u64(9));
        b.shuffle(&mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a.round(), b.round());
    }
}
