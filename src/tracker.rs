//! Exploration and reward bookkeeping.
//!
//! The tracker keeps two generations of discovery data: "all-time" sets that
//! live as long as the process (or checkpoint) does, and "this episode" sets
//! that are cleared whenever an episode ends. Every all-time structure is a
//! superset of its per-episode counterpart.

use crate::config::{ObservationSchema, TrackerConfig};
use crate::error::Result;
use crate::maps::MapId;
use crate::reward::{RewardBreakdown, ScoringPipeline, TickContext};
use crate::snapshot::{GameStats, Location, LocationKey, TickInput};
use crate::window::RecentLocations;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerMode {
    Exploring,
    InBattle,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub maps_all_time: HashSet<MapId>,
    pub maps_this_episode: HashSet<MapId>,
    pub locations_all_time: HashSet<LocationKey>,
    pub locations_this_episode: HashSet<LocationKey>,

    /// First coordinate ever seen on each map. Never reset.
    pub start_location: HashMap<MapId, (u8, u8)>,
    pub max_distance_all_time: HashMap<MapId, f32>,
    pub max_distance_this_episode: HashMap<MapId, f32>,

    pub recent: RecentLocations,

    pub seen_pokemon_all_time: u32,
    pub seen_pokemon_this_episode: u32,

    // one-tick lookback
    pub last_location: Option<Location>,
    pub last_stats: Option<GameStats>,
    pub last_distance: Option<f32>,

    pub in_battle: bool,

    /// Best y coordinate reached this episode on maps with a frontier.
    pub frontier_this_episode: HashMap<MapId, u8>,
}

impl TrackerState {
    pub fn new() -> TrackerState {
        TrackerState::default()
    }

    pub fn mode(&self) -> TrackerMode {
        if self.in_battle {
            TrackerMode::InBattle
        } else {
            TrackerMode::Exploring
        }
    }

    pub fn max_distance_this_episode(&self, map: MapId) -> f32 {
        self.max_distance_this_episode.get(&map).copied().unwrap_or(0.0)
    }

    pub fn max_distance_all_time(&self, map: MapId) -> f32 {
        self.max_distance_all_time.get(&map).copied().unwrap_or(0.0)
    }

    /// Clears everything scoped to one episode.
    pub fn reset_episode(&mut self) {
        self.maps_this_episode.clear();
        self.locations_this_episode.clear();
        self.max_distance_this_episode.clear();
        self.seen_pokemon_this_episode = 0;
        self.in_battle = false;
        self.recent.clear();
        self.frontier_this_episode.clear();
    }

    /// Whether every all-time structure contains its per-episode counterpart.
    pub fn is_consistent(&self) -> bool {
        self.maps_this_episode.is_subset(&self.maps_all_time)
            && self.locations_this_episode.is_subset(&self.locations_all_time)
            && self
                .max_distance_this_episode
                .iter()
                .all(|(map, d)| *d <= self.max_distance_all_time(*map))
            && self.seen_pokemon_this_episode <= self.seen_pokemon_all_time
    }
}

/// Result of feeding one tick through the tracker.
#[derive(Clone, Debug)]
pub struct TickOutcome {
    pub reward: RewardBreakdown,
    pub done: bool,
    pub truncated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Tracker {
    config: TrackerConfig,
    pipeline: ScoringPipeline,
    state: TrackerState,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Tracker> {
        let pipeline = ScoringPipeline::from_config(&config);
        Tracker::with_pipeline(config, pipeline)
    }

    /// A tracker running a custom set of terms. `config` still supplies the
    /// metric, observation schema and step ceiling, and is validated.
    pub fn with_pipeline(config: TrackerConfig, pipeline: ScoringPipeline) -> Result<Tracker> {
        config.validate()?;
        Ok(Tracker {
            config,
            pipeline,
            state: TrackerState::new(),
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn pipeline(&self) -> &ScoringPipeline {
        &self.pipeline
    }

    pub fn mode(&self) -> TrackerMode {
        self.state.mode()
    }

    pub fn observation_len(&self) -> usize {
        self.config.observation.len()
    }

    /// Fixed-length summary of the latest tick. All zeros before the first one.
    pub fn observe(&self) -> Vec<f32> {
        let s = &self.state;
        let distance = s.last_distance.unwrap_or(0.0);
        let (x, y, map) = match &s.last_location {
            Some(loc) => (loc.x as f32, loc.y as f32, loc.map.0 as f32),
            None => (0.0, 0.0, 0.0),
        };
        match self.config.observation {
            ObservationSchema::DistanceAndMap => vec![distance, map],
            ObservationSchema::Position => vec![x, y, map],
            ObservationSchema::Full => {
                let seen = s.last_stats.map_or(0.0, |st| st.seen_pokemon as f32);
                let battle = if s.in_battle { 1.0 } else { 0.0 };
                vec![distance, map, x, y, seen, battle]
            }
        }
    }

    fn distance_from_start(&mut self, location: &Location) -> f32 {
        let start = *self
            .state
            .start_location
            .entry(location.map)
            .or_insert((location.x, location.y));
        self.config
            .distance_metric
            .between((location.x, location.y), start)
    }

    /// Scores one tick and advances the lookback.
    pub fn score(&mut self, input: &TickInput) -> RewardBreakdown {
        let location = &input.location;
        let distance = self.distance_from_start(location);

        let previous_distance = match &self.state.last_location {
            Some(prev) if prev.map == location.map => self.state.last_distance,
            _ => None,
        };
        let window_advanced = self.state.recent.visit(location.key());

        let ctx = TickContext {
            input,
            previous_location: self.state.last_location.clone(),
            previous_stats: self.state.last_stats,
            distance,
            previous_distance,
            window_advanced,
        };
        let breakdown = self.pipeline.score(&ctx, &mut self.state);

        self.state.last_location = Some(location.clone());
        self.state.last_stats = Some(input.stats);
        self.state.last_distance = Some(distance);
        breakdown
    }

    /// The gym leader was beaten: a badge was gained since the previous tick.
    pub fn is_done(&self, stats: &GameStats) -> bool {
        self.state
            .last_stats
            .map_or(false, |prev| stats.badges > prev.badges)
    }

    pub fn is_truncated(&self, steps: u32) -> bool {
        steps >= self.config.max_steps
    }

    pub fn reset_episode(&mut self) {
        self.state.reset_episode();
    }

    /// Records `input` as the previous tick without scoring it, e.g. right
    /// after the emulator reloaded its start state.
    pub fn prime(&mut self, input: &TickInput) {
        let distance = self.distance_from_start(&input.location);
        self.state.recent.visit(input.location.key());
        self.state.last_location = Some(input.location.clone());
        self.state.last_stats = Some(input.stats);
        self.state.last_distance = Some(distance);
    }

    /// Scores a tick, evaluates both termination predicates and resets the
    /// episode state when either fires.
    pub fn step(&mut self, input: &TickInput, steps: u32) -> TickOutcome {
        let done = self.is_done(&input.stats);
        let reward = self.score(input);
        let truncated = !done && self.is_truncated(steps);

        if done {
            tracing::info!(
                badges = input.stats.badges,
                steps,
                maps = self.state.maps_this_episode.len(),
                "badge earned, episode done"
            );
        } else if truncated {
            tracing::info!(
                steps,
                maps = self.state.maps_this_episode.len(),
                "step ceiling reached, episode truncated"
            );
        }
        if done || truncated {
            self.reset_episode();
        }

        TickOutcome {
            reward,
            done,
            truncated,
        }
    }
}
