use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    Euclidean,
    Manhattan,
}

impl DistanceMetric {
    pub fn between(self, a: (u8, u8), b: (u8, u8)) -> f32 {
        let dx = a.0 as f32 - b.0 as f32;
        let dy = a.1 as f32 - b.1 as f32;
        match self {
            DistanceMetric::Euclidean => (dx * dx + dy * dy).sqrt(),
            DistanceMetric::Manhattan => dx.abs() + dy.abs(),
        }
    }
}

/// Layout of the vector returned by `observe`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservationSchema {
    /// `[distance_from_map_start, map_id]`
    DistanceAndMap,
    /// `[x, y, map_id]`
    Position,
    /// `[distance_from_map_start, map_id, x, y, seen_pokemon, in_battle]`
    Full,
}

impl ObservationSchema {
    pub fn len(self) -> usize {
        match self {
            ObservationSchema::DistanceAndMap => 2,
            ObservationSchema::Position => 3,
            ObservationSchema::Full => 6,
        }
    }
}

/// Bonus paid the first time a map is ever entered, as a function of how many
/// distinct maps have been found so far (including this one).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MapBonusSchedule {
    Constant(f32),
    /// `min(step * n, cap)`
    Linear { step: f32, cap: f32 },
}

impl MapBonusSchedule {
    pub fn bonus(self, maps_found: usize) -> f32 {
        match self {
            MapBonusSchedule::Constant(v) => v,
            MapBonusSchedule::Linear { step, cap } => (step * maps_found as f32).min(cap),
        }
    }

    /// Finite and strictly positive for every map count.
    fn is_valid(self) -> bool {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        match self {
            MapBonusSchedule::Constant(v) => positive(v),
            MapBonusSchedule::Linear { step, cap } => positive(step) && positive(cap),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleRewards {
    pub start: f32,
    pub fight: f32,
    pub attack_chosen: f32,
    pub tackle: f32,
    pub fled: f32,
}

impl Default for BattleRewards {
    fn default() -> BattleRewards {
        BattleRewards {
            start: 20.0,
            fight: 1.0,
            attack_chosen: 5.0,
            tackle: 10.0,
            fled: -20.0,
        }
    }
}

/// Reward magnitudes and toggles for the exploration tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub distance_metric: DistanceMetric,
    pub observation: ObservationSchema,

    pub revisit_penalty: f32,
    pub episode_map_bonus_step: f32,
    pub all_time_map_bonus: MapBonusSchedule,
    pub episode_location_bonus: f32,
    pub all_time_location_bonus: f32,
    /// Location bonuses are multiplied by `1 + scale * distance_from_start`.
    pub location_distance_scale: f32,

    pub distance_gain_bonus: f32,
    pub episode_max_distance_bonus: f32,
    pub all_time_max_distance_bonus: f32,
    pub stuck_penalty: f32,

    pub oscillation_penalty: f32,

    pub pokemon_seen_bonus: f32,
    pub pokemon_record_bonus: f32,

    pub battle_detection: bool,
    pub battle: BattleRewards,

    pub xp_per_point: f32,
    pub frontier_bonus: f32,

    /// Truncation ceiling in steps.
    pub max_steps: u32,
}

impl Default for TrackerConfig {
    fn default() -> TrackerConfig {
        TrackerConfig {
            distance_metric: DistanceMetric::Manhattan,
            observation: ObservationSchema::DistanceAndMap,
            revisit_penalty: -5.0,
            episode_map_bonus_step: 100.0,
            all_time_map_bonus: MapBonusSchedule::Linear {
                step: 300.0,
                cap: 3000.0,
            },
            episode_location_bonus: 1.0,
            all_time_location_bonus: 5.0,
            location_distance_scale: 0.0,
            distance_gain_bonus: 1.0,
            episode_max_distance_bonus: 2.0,
            all_time_max_distance_bonus: 5.0,
            stuck_penalty: -1.0,
            oscillation_penalty: -100.0,
            pokemon_seen_bonus: 50.0,
            pokemon_record_bonus: 100.0,
            battle_detection: true,
            battle: BattleRewards::default(),
            xp_per_point: 0.5,
            frontier_bonus: 3.0,
            max_steps: 1000,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        let b = &self.battle;
        let magnitudes = [
            self.revisit_penalty,
            self.episode_map_bonus_step,
            self.episode_location_bonus,
            self.all_time_location_bonus,
            self.location_distance_scale,
            self.distance_gain_bonus,
            self.episode_max_distance_bonus,
            self.all_time_max_distance_bonus,
            self.stuck_penalty,
            self.oscillation_penalty,
            self.pokemon_seen_bonus,
            self.pokemon_record_bonus,
            b.start,
            b.fight,
            b.attack_chosen,
            b.tackle,
            b.fled,
            self.xp_per_point,
            self.frontier_bonus,
        ];
        if !magnitudes.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidConfig("reward magnitudes must be finite"));
        }
        if !self.all_time_map_bonus.is_valid() {
            return Err(Error::InvalidConfig(
                "all-time map bonus must be finite and positive",
            ));
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfig("max_steps must be positive"));
        }
        if self.location_distance_scale < 0.0 {
            return Err(Error::InvalidConfig("location_distance_scale must not be negative"));
        }
        Ok(())
    }
}

/// Environment wiring around the tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Frames the emulator advances per action.
    pub act_freq: u32,
    /// Emulator save state loaded on reset.
    pub init_state: String,
    pub tracker: TrackerConfig,
}

impl Default for EnvConfig {
    fn default() -> EnvConfig {
        EnvConfig {
            act_freq: 24,
            init_state: "has_pokedex.state".to_string(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl EnvConfig {
    pub fn validate(&self) -> Result<()> {
        if self.act_freq == 0 {
            return Err(Error::InvalidConfig("act_freq must be positive"));
        }
        self.tracker.validate()
    }
}
