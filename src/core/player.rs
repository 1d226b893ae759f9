//! Seat identification and per-seat data storage.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. Seats are 0-based and fixed for the whole
//! match; the dealer rotates over them.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by `Vec` for O(1) access, indexable by
//! `PlayerId`. Used for hands, points, deltas and anything else that
//! exists once per seat.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier for a 3- or 4-player table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats of a table with `player_count` players.
    ///
    /// ```
    /// use riichi_engine::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(seats.len(), 4);
    /// assert_eq!(seats[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The seat acting after this one (counter-clockwise turn order).
    #[must_use]
    pub const fn next(self, player_count: usize) -> Self {
        Self(((self.0 as usize + 1) % player_count) as u8)
    }

    /// How many seats after `from` this seat sits, in turn order.
    ///
    /// `from.next(n).distance_from(from, n) == 1`; a seat is at distance 0
    /// from itself.
    #[must_use]
    pub const fn distance_from(self, from: PlayerId, player_count: usize) -> usize {
        (self.0 as usize + player_count - from.0 as usize) % player_count
    }

    /// Seats after `from` in turn order, excluding `from` itself.
    pub fn others_in_order(from: PlayerId, player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..player_count).map(move |d| PlayerId(((from.0 as usize + d) % player_count) as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// One value per seat, indexed by [`PlayerId`].
///
/// ```
/// use riichi_engine::core::{PlayerId, PlayerMap};
///
/// let mut points: PlayerMap<i32> = PlayerMap::with_value(4, 25_000);
/// points[PlayerId::new(1)] -= 8_000;
/// assert_eq!(points.values().sum::<i32>(), 92_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build one value per seat from `init`.
    pub fn new(player_count: usize, init: impl Fn(PlayerId) -> T) -> Self {
        Self::from_vec(PlayerId::all(player_count).map(init).collect())
    }

    /// Seat `i` gets `seats[i]`.
    pub fn from_vec(seats: Vec<T>) -> Self {
        assert!(
            (1..=u8::MAX as usize).contains(&seats.len()),
            "a table needs between 1 and 255 seats"
        );
        Self { seats }
    }

    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.player_ids().zip(self.seats.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter_mut())
    }

    /// Values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.seats.iter()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.seats.len())
    }

    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.seats.len()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        assert_eq!(p0.index(), 0);
        assert_eq!(format!("{}", p0), "Seat 0");
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(PlayerId::new(3).next(4), PlayerId::new(0));
        assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
        assert_eq!(PlayerId::new(1).next(4), PlayerId::new(2));
    }

    #[test]
    fn test_distance_from() {
        let discarder = PlayerId::new(2);
        assert_eq!(PlayerId::new(3).distance_from(discarder, 4), 1);
        assert_eq!(PlayerId::new(0).distance_from(discarder, 4), 2);
        assert_eq!(PlayerId::new(1).distance_from(discarder, 4), 3);
        assert_eq!(discarder.distance_from(discarder, 4), 0);
    }

    #[test]
    fn test_others_in_order() {
        let order: Vec<_> = PlayerId::others_in_order(PlayerId::new(1), 4).collect();
        assert_eq!(order, vec![PlayerId::new(2), PlayerId::new(3), PlayerId::new(0)]);

        let sanma: Vec<_> = PlayerId::others_in_order(PlayerId::new(2), 3).collect();
        assert_eq!(sanma, vec![PlayerId::new(0), PlayerId::new(1)]);
    }

    #[test]
    fn test_player_map_by_seat() {
        let mut points: PlayerMap<i32> = PlayerMap::new(3, |p| 35_000 - p.index() as i32 * 1_000);
        points[PlayerId::new(2)] -= 1_000;
        assert_eq!(points.values().copied().collect::<Vec<_>>(), vec![35_000, 34_000, 32_000]);
        assert!(points.contains(PlayerId::new(2)));
        assert!(!points.contains(PlayerId::new(3)));
        assert_eq!(points.player_ids().last(), Some(PlayerId::new(2)));
    }

    #[test]
    fn test_player_map_serializes_as_seat_list() {
        let map: PlayerMap<i32> = PlayerMap::with_value(4, 0);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"seats":[0,0,0,0]}"#);
        let back: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }

    #[test]
    #[should_panic(expected = "between 1 and 255 seats")]
    fn test_player_map_needs_a_seat() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }
}
