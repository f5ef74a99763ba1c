//! Property tests over random tick sequences.

use brockgym::maps::MapId;
use brockgym::snapshot::LocationKey;
use brockgym::window::RecentLocations;
use brockgym::{GameStats, Location, TickInput, Tracker, TrackerConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Event {
    Tick { x: u8, y: u8, map: u8, seen: u32 },
    Reset,
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        9 => (0u8..8, 0u8..8, 0u8..6, 0u32..10)
            .prop_map(|(x, y, map, seen)| Event::Tick { x, y, map, seen }),
        1 => Just(Event::Reset),
    ]
}

proptest! {
    /// All-time discovery never shrinks and always contains the episode's.
    #[test]
    fn all_time_is_a_growing_superset(events in prop::collection::vec(event(), 1..200)) {
        let mut tracker = Tracker::new(TrackerConfig::default()).unwrap();
        let mut maps_seen = 0;
        let mut locations_seen = 0;

        for (step, ev) in events.iter().enumerate() {
            match ev {
                Event::Tick { x, y, map, seen } => {
                    let stats = GameStats { seen_pokemon: *seen, ..GameStats::default() };
                    let input = TickInput::at(Location::new(*x, *y, MapId(*map)), stats);
                    let out = tracker.step(&input, step as u32 + 1);
                    prop_assert!(out.reward.total.is_finite());
                    prop_assert_eq!(tracker.observe().len(), tracker.observation_len());
                }
                Event::Reset => tracker.reset_episode(),
            }

            let state = tracker.state();
            prop_assert!(state.is_consistent());
            prop_assert!(state.maps_all_time.len() >= maps_seen);
            prop_assert!(state.locations_all_time.len() >= locations_seen);
            maps_seen = state.maps_all_time.len();
            locations_seen = state.locations_all_time.len();
        }
    }

    /// The oscillation predicate matches `[A, B, A]` with `A != B` and nothing else.
    #[test]
    fn oscillation_iff_a_b_a(maps in prop::collection::vec(0u8..4, 3)) {
        let mut window = RecentLocations::new();
        for (i, m) in maps.iter().enumerate() {
            window.visit(LocationKey { x: i as u8, y: 0, map: MapId(*m) });
        }
        let expected = maps[0] == maps[2] && maps[0] != maps[1];
        prop_assert_eq!(window.is_oscillation(), expected);
    }
}
