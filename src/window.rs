//! Sliding window over the most recently visited locations.

use crate::snapshot::LocationKey;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const RECENT_WINDOW: usize = 3;

/// The last `RECENT_WINDOW` distinct locations, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentLocations {
    entries: VecDeque<LocationKey>,
}

impl RecentLocations {
    pub fn new() -> RecentLocations {
        RecentLocations {
            entries: VecDeque::with_capacity(RECENT_WINDOW),
        }
    }

    /// Appends `key` unless it repeats the newest entry. Returns whether the
    /// window changed.
    pub fn visit(&mut self, key: LocationKey) -> bool {
        if self.entries.back() == Some(&key) {
            return false;
        }
        if self.entries.len() == RECENT_WINDOW {
            self.entries.pop_front();
        }
        self.entries.push_back(key);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationKey> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True for a full window whose map ids read `[A, B, A]` with `A != B`.
    pub fn is_oscillation(&self) -> bool {
        if self.entries.len() < RECENT_WINDOW {
            return false;
        }
        let (a, b, c) = (self.entries[0].map, self.entries[1].map, self.entries[2].map);
        a == c && a != b
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::maps::MapId;

    fn key(x: u8, map: u8) -> LocationKey {
        LocationKey {
            x,
            y: 0,
            map: MapId(map),
        }
    }

    #[test]
    fn oldest_is_evicted() {
        let mut w = RecentLocations::new();
        for x in 0..5 {
            assert!(w.visit(key(x, 0)));
        }
        let xs: Vec<u8> = w.iter().map(|k| k.x).collect();
        assert_eq!(xs, vec![2, 3, 4]);
    }

    #[test]
    fn repeats_do_not_advance() {
        let mut w = RecentLocations::new();
        assert!(w.visit(key(1, 0)));
        assert!(!w.visit(key(1, 0)));
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn oscillation_patterns() {
        let mut w = RecentLocations::new();
        w.visit(key(0, 1));
        w.visit(key(0, 2));
        assert!(!w.is_oscillation());
        w.visit(key(1, 1));
        assert!(w.is_oscillation());

        let mut same = RecentLocations::new();
        same.visit(key(0, 1));
        same.visit(key(1, 1));
        same.visit(key(2, 1));
        assert!(!same.is_oscillation());

        let mut distinct = RecentLocations::new();
        distinct.visit(key(0, 1));
        distinct.visit(key(0, 2));
        distinct.visit(key(0, 3));
        assert!(!distinct.is_oscillation());
    }
}
