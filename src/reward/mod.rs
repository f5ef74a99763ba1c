//! The scoring pipeline: a list of independent reward terms whose outputs are
//! summed every tick.

mod battle;
mod exploration;
mod progress;

pub use self::battle::BattleProgress;
pub use self::exploration::{
    DistanceProgress, Frontier, FrontierDirection, FrontierTarget, LocationDiscovery,
    MapDiscovery, MapOscillation, Revisit,
};
pub use self::progress::{ExperienceGain, PokedexProgress};

use crate::battle::ExactTemplateClassifier;
use crate::config::TrackerConfig;
use crate::snapshot::{GameStats, Location, TickInput};
use crate::tracker::TrackerState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a term sees for one tick, besides the mutable tracker state.
#[derive(Debug)]
pub struct TickContext<'a> {
    pub input: &'a TickInput,
    pub previous_location: Option<Location>,
    pub previous_stats: Option<GameStats>,
    /// Distance from the first coordinate seen on the current map.
    pub distance: f32,
    /// Distance at the previous tick, if that tick was on the same map.
    pub previous_distance: Option<f32>,
    /// A new entry entered the recent-locations window this tick.
    pub window_advanced: bool,
}

impl<'a> TickContext<'a> {
    pub fn location(&self) -> &Location {
        &self.input.location
    }

    pub fn moved(&self) -> bool {
        self.previous_location
            .as_ref()
            .map_or(false, |prev| prev.key() != self.input.location.key())
    }

    /// Whether the distance metric differs from the previous tick. A map
    /// change counts as a change.
    pub fn distance_changed(&self) -> bool {
        match self.previous_distance {
            Some(prev) => prev != self.distance,
            None => self.previous_location.is_some(),
        }
    }
}

#[typetag::serde]
pub trait RewardTerm: fmt::Debug + Send {
    fn name(&self) -> &'static str;

    fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> f32;
}

/// Per-term contributions for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RewardBreakdown {
    pub total: f32,
    pub components: Vec<(&'static str, f32)>,
}

impl RewardBreakdown {
    pub fn component(&self, name: &str) -> Option<f32> {
        self.components
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScoringPipeline {
    terms: Vec<Box<dyn RewardTerm>>,
}

impl ScoringPipeline {
    pub fn new(terms: Vec<Box<dyn RewardTerm>>) -> ScoringPipeline {
        ScoringPipeline { terms }
    }

    /// Every term, in evaluation order, with magnitudes from `config`.
    pub fn from_config(config: &TrackerConfig) -> ScoringPipeline {
        let mut terms: Vec<Box<dyn RewardTerm>> = vec![
            Box::new(Revisit {
                penalty: config.revisit_penalty,
            }),
            Box::new(MapDiscovery {
                episode_step: config.episode_map_bonus_step,
                all_time: config.all_time_map_bonus,
            }),
            Box::new(LocationDiscovery {
                episode_bonus: config.episode_location_bonus,
                all_time_bonus: config.all_time_location_bonus,
                distance_scale: config.location_distance_scale,
            }),
            Box::new(DistanceProgress {
                gain: config.distance_gain_bonus,
                episode_max: config.episode_max_distance_bonus,
                all_time_max: config.all_time_max_distance_bonus,
                stuck: config.stuck_penalty,
            }),
            Box::new(MapOscillation {
                penalty: config.oscillation_penalty,
            }),
            Box::new(PokedexProgress {
                seen_bonus: config.pokemon_seen_bonus,
                record_bonus: config.pokemon_record_bonus,
            }),
        ];
        if config.battle_detection {
            terms.push(Box::new(BattleProgress {
                rewards: config.battle,
                classifier: Box::new(ExactTemplateClassifier),
            }));
        }
        terms.push(Box::new(ExperienceGain {
            per_point: config.xp_per_point,
        }));
        terms.push(Box::new(Frontier::kanto_start(config.frontier_bonus)));
        ScoringPipeline { terms }
    }

    /// Drops the term called `name`, if present.
    pub fn without(mut self, name: &str) -> ScoringPipeline {
        self.terms.retain(|t| t.name() != name);
        self
    }

    pub fn push(&mut self, term: Box<dyn RewardTerm>) {
        self.terms.push(term);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.terms.iter().map(|t| t.name()).collect()
    }

    pub fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> RewardBreakdown {
        let mut breakdown = RewardBreakdown::default();
        for term in &self.terms {
            let value = term.score(ctx, state);
            if value != 0.0 {
                tracing::debug!(term = term.name(), value, "reward component");
            }
            breakdown.total += value;
            breakdown.components.push((term.name(), value));
        }
        breakdown
    }
}
