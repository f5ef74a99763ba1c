use super::{RewardTerm, TickContext};
use crate::config::MapBonusSchedule;
use crate::maps::{MapId, OAKS_LAB, PALLET_TOWN};
use crate::tracker::TrackerState;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;

/// Penalty for standing on the same tile two ticks in a row. Waiting on grass
/// is how wild encounters happen, so it is exempt there.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Revisit {
    pub penalty: f32,
}

#[typetag::serde]
impl RewardTerm for Revisit {
    fn name(&self) -> &'static str {
        "revisit"
    }

    fn score(&self, ctx: &TickContext<'_>, _state: &mut TrackerState) -> f32 {
        let repeated = ctx
            .previous_location
            .as_ref()
            .map_or(false, |prev| prev.key() == ctx.location().key());
        if repeated && !ctx.input.on_grass {
            self.penalty
        } else {
            0.0
        }
    }
}

/// Two-tier bonus for entering a map: once per episode, and a larger one the
/// first time the map is ever seen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapDiscovery {
    pub episode_step: f32,
    pub all_time: MapBonusSchedule,
}

#[typetag::serde]
impl RewardTerm for MapDiscovery {
    fn name(&self) -> &'static str {
        "map_discovery"
    }

    fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> f32 {
        let map = ctx.location().map;
        let mut reward = 0.0;

        if state.maps_this_episode.insert(map) {
            reward += self.episode_step * state.maps_this_episode.len() as f32;
        }
        if state.maps_all_time.insert(map) {
            let found = state.maps_all_time.len();
            reward += self.all_time.bonus(found);
            tracing::info!(%map, found, "new map discovered");
        }
        reward
    }
}

/// Two-tier bonus for stepping on an `(x, y, map)` tile not visited before.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationDiscovery {
    pub episode_bonus: f32,
    pub all_time_bonus: f32,
    pub distance_scale: f32,
}

#[typetag::serde]
impl RewardTerm for LocationDiscovery {
    fn name(&self) -> &'static str {
        "location_discovery"
    }

    fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> f32 {
        let key = ctx.location().key();
        let scale = 1.0 + self.distance_scale * ctx.distance;
        let mut reward = 0.0;

        if state.locations_this_episode.insert(key) {
            reward += self.episode_bonus * scale;
        }
        if state.locations_all_time.insert(key) {
            reward += self.all_time_bonus * scale;
        }
        reward
    }
}

/// Rewards moving away from where a map was first entered.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistanceProgress {
    /// Farther than the previous tick.
    pub gain: f32,
    /// Farther than ever before on this map this episode.
    pub episode_max: f32,
    /// Farther than ever before on this map.
    pub all_time_max: f32,
    /// Moved, but the distance did not change.
    pub stuck: f32,
}

#[typetag::serde]
impl RewardTerm for DistanceProgress {
    fn name(&self) -> &'static str {
        "distance"
    }

    fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> f32 {
        let map = ctx.location().map;
        let d = ctx.distance;
        let mut reward = 0.0;

        if let Some(prev) = ctx.previous_distance {
            if d > prev {
                reward += self.gain;
            } else if d == prev && ctx.moved() {
                reward += self.stuck;
            }
        }

        let episode = state.max_distance_this_episode.entry(map).or_insert(0.0);
        if d > *episode {
            *episode = d;
            reward += self.episode_max;
        }
        let all_time = state.max_distance_all_time.entry(map).or_insert(0.0);
        if d > *all_time {
            *all_time = d;
            reward += self.all_time_max;
        }
        reward
    }
}

/// Penalty for bouncing between two maps (`A -> B -> A`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapOscillation {
    pub penalty: f32,
}

#[typetag::serde]
impl RewardTerm for MapOscillation {
    fn name(&self) -> &'static str {
        "oscillation"
    }

    fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> f32 {
        if ctx.window_advanced && state.recent.is_oscillation() {
            tracing::debug!(map = %ctx.location().map, "map oscillation");
            self.penalty
        } else {
            0.0
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontierDirection {
    /// Progress means a larger y (walking down the screen).
    Increasing,
    /// Progress means a smaller y (walking up the screen).
    Decreasing,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierTarget {
    pub map: MapId,
    pub direction: FrontierDirection,
}

/// Bonus for pushing the y coordinate further in a map's "forward" direction
/// than before in this episode. The first tick on a map sets the baseline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Frontier {
    pub bonus: f32,
    pub targets: Vec<FrontierTarget>,
}

impl Frontier {
    /// Out of Oak's lab (towards its door), then north out of Pallet Town.
    pub fn kanto_start(bonus: f32) -> Frontier {
        Frontier {
            bonus,
            targets: vec![
                FrontierTarget {
                    map: OAKS_LAB,
                    direction: FrontierDirection::Increasing,
                },
                FrontierTarget {
                    map: PALLET_TOWN,
                    direction: FrontierDirection::Decreasing,
                },
            ],
        }
    }
}

#[typetag::serde]
impl RewardTerm for Frontier {
    fn name(&self) -> &'static str {
        "frontier"
    }

    fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> f32 {
        let loc = ctx.location();
        let target = match self.targets.iter().find(|t| t.map == loc.map) {
            Some(t) => t,
            None => return 0.0,
        };
        let best = match state.frontier_this_episode.entry(loc.map) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                e.insert(loc.y);
                return 0.0;
            }
        };
        let advanced = match target.direction {
            FrontierDirection::Increasing => loc.y > *best,
            FrontierDirection::Decreasing => loc.y < *best,
        };
        if advanced {
            *best = loc.y;
            self.bonus
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::maps::{MapId, ROUTE_1};
    use crate::snapshot::{GameStats, Location, TickInput};

    fn input(x: u8, y: u8, map: MapId) -> TickInput {
        TickInput::at(Location::new(x, y, map), GameStats::default())
    }

    fn ctx<'a>(input: &'a TickInput, prev: Option<&TickInput>) -> TickContext<'a> {
        TickContext {
            input,
            previous_location: prev.map(|p| p.location.clone()),
            previous_stats: prev.map(|p| p.stats),
            distance: 0.0,
            previous_distance: None,
            window_advanced: false,
        }
    }

    #[test]
    fn revisit_penalised_except_on_grass() {
        let term = Revisit { penalty: -5.0 };
        let mut state = TrackerState::new();
        let a = input(1, 1, ROUTE_1);
        assert_eq!(term.score(&ctx(&a, None), &mut state), 0.0);
        assert_eq!(term.score(&ctx(&a, Some(&a)), &mut state), -5.0);

        let mut grass = a.clone();
        grass.on_grass = true;
        assert_eq!(term.score(&ctx(&grass, Some(&a)), &mut state), 0.0);

        let b = input(2, 1, ROUTE_1);
        assert_eq!(term.score(&ctx(&b, Some(&a)), &mut state), 0.0);
    }

    #[test]
    fn map_bonus_tiers() {
        let term = MapDiscovery {
            episode_step: 100.0,
            all_time: MapBonusSchedule::Linear {
                step: 300.0,
                cap: 3000.0,
            },
        };
        let mut state = TrackerState::new();

        let first = input(0, 0, MapId(0));
        assert_eq!(term.score(&ctx(&first, None), &mut state), 100.0 + 300.0);
        let second = input(0, 0, MapId(1));
        assert_eq!(term.score(&ctx(&second, None), &mut state), 200.0 + 600.0);
        assert_eq!(term.score(&ctx(&second, None), &mut state), 0.0);

        state.reset_episode();
        // rediscovery pays only the episode tier
        assert_eq!(term.score(&ctx(&second, None), &mut state), 100.0);
    }

    #[test]
    fn first_ever_map_beats_rediscovery() {
        let term = MapDiscovery {
            episode_step: 100.0,
            all_time: MapBonusSchedule::Constant(50.0),
        };
        let mut state = TrackerState::new();
        let a = input(0, 0, MapId(4));
        let fresh = term.score(&ctx(&a, None), &mut state);
        state.reset_episode();
        let again = term.score(&ctx(&a, None), &mut state);
        assert!(fresh > again);
    }

    #[test]
    fn location_bonus_scales_with_distance() {
        let term = LocationDiscovery {
            episode_bonus: 1.0,
            all_time_bonus: 5.0,
            distance_scale: 0.5,
        };
        let mut state = TrackerState::new();
        let a = input(4, 0, ROUTE_1);
        let mut c = ctx(&a, None);
        c.distance = 4.0;
        assert_eq!(term.score(&c, &mut state), 6.0 * 3.0);
        assert_eq!(term.score(&c, &mut state), 0.0);
    }

    #[test]
    fn distance_rewards_progress_and_punishes_sidesteps() {
        let term = DistanceProgress {
            gain: 1.0,
            episode_max: 2.0,
            all_time_max: 5.0,
            stuck: -1.0,
        };
        let mut state = TrackerState::new();
        let a = input(0, 0, ROUTE_1);
        let b = input(1, 0, ROUTE_1);
        let c = input(0, 1, ROUTE_1);

        let mut step = ctx(&b, Some(&a));
        step.distance = 1.0;
        step.previous_distance = Some(0.0);
        assert_eq!(term.score(&step, &mut state), 1.0 + 2.0 + 5.0);

        let mut side = ctx(&c, Some(&b));
        side.distance = 1.0;
        side.previous_distance = Some(1.0);
        assert_eq!(term.score(&side, &mut state), -1.0);

        // standing still is the revisit term's business
        let mut still = ctx(&c, Some(&c));
        still.distance = 1.0;
        still.previous_distance = Some(1.0);
        assert_eq!(term.score(&still, &mut state), 0.0);

        state.reset_episode();
        let mut again = ctx(&b, Some(&a));
        again.distance = 1.0;
        again.previous_distance = Some(0.0);
        assert_eq!(term.score(&again, &mut state), 1.0 + 2.0);
    }

    #[test]
    fn oscillation_only_when_window_advances() {
        let term = MapOscillation { penalty: -100.0 };
        let mut state = TrackerState::new();
        let a = input(0, 0, MapId(1));
        let b = input(0, 0, MapId(2));
        let a2 = input(1, 0, MapId(1));
        for i in [&a, &b, &a2] {
            state.recent.visit(i.location.key());
        }
        let mut c = ctx(&a2, Some(&b));
        c.window_advanced = true;
        assert_eq!(term.score(&c, &mut state), -100.0);
        c.window_advanced = false;
        assert_eq!(term.score(&c, &mut state), 0.0);
    }

    #[test]
    fn frontier_rewards_new_extremes() {
        let term = Frontier::kanto_start(3.0);
        let mut state = TrackerState::new();

        let base = input(5, 10, PALLET_TOWN);
        assert_eq!(term.score(&ctx(&base, None), &mut state), 0.0);
        let north = input(5, 8, PALLET_TOWN);
        assert_eq!(term.score(&ctx(&north, None), &mut state), 3.0);
        let south = input(5, 12, PALLET_TOWN);
        assert_eq!(term.score(&ctx(&south, None), &mut state), 0.0);

        let lab = input(5, 2, OAKS_LAB);
        assert_eq!(term.score(&ctx(&lab, None), &mut state), 0.0);
        let lab_door = input(5, 6, OAKS_LAB);
        assert_eq!(term.score(&ctx(&lab_door, None), &mut state), 3.0);

        let elsewhere = input(5, 0, ROUTE_1);
        assert_eq!(term.score(&ctx(&elsewhere, None), &mut state), 0.0);
    }
}
