use super::{RewardTerm, TickContext};
use crate::tracker::TrackerState;
use serde::{Deserialize, Serialize};

/// Bonus when the Pokedex "seen" counter goes up, plus a second bonus when it
/// passes the best count of the whole run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PokedexProgress {
    pub seen_bonus: f32,
    pub record_bonus: f32,
}

#[typetag::serde]
impl RewardTerm for PokedexProgress {
    fn name(&self) -> &'static str {
        "pokedex"
    }

    fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> f32 {
        let seen = ctx.input.stats.seen_pokemon;
        let mut reward = 0.0;

        if let Some(prev) = ctx.previous_stats {
            if seen > prev.seen_pokemon {
                reward += self.seen_bonus;
                state.seen_pokemon_this_episode += seen - prev.seen_pokemon;
                if seen > state.seen_pokemon_all_time {
                    reward += self.record_bonus;
                    tracing::info!(seen, "new pokedex record");
                }
            }
        }
        state.seen_pokemon_all_time = state
            .seen_pokemon_all_time
            .max(seen)
            .max(state.seen_pokemon_this_episode);
        reward
    }
}

/// Reward proportional to experience gained by the lead party member.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExperienceGain {
    pub per_point: f32,
}

#[typetag::serde]
impl RewardTerm for ExperienceGain {
    fn name(&self) -> &'static str {
        "experience"
    }

    fn score(&self, ctx: &TickContext<'_>, _state: &mut TrackerState) -> f32 {
        match ctx.previous_stats {
            Some(prev) if ctx.input.stats.xp > prev.xp => {
                self.per_point * (ctx.input.stats.xp - prev.xp) as f32
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::maps::PALLET_TOWN;
    use crate::snapshot::{GameStats, Location, TickInput};

    fn stats(seen: u32, xp: u32) -> GameStats {
        GameStats {
            seen_pokemon: seen,
            xp,
            ..GameStats::default()
        }
    }

    fn ctx(input: &TickInput, prev: Option<GameStats>) -> TickContext<'_> {
        TickContext {
            input,
            previous_location: None,
            previous_stats: prev,
            distance: 0.0,
            previous_distance: None,
            window_advanced: false,
        }
    }

    fn input(seen: u32, xp: u32) -> TickInput {
        TickInput::at(Location::new(0, 0, PALLET_TOWN), stats(seen, xp))
    }

    const TERM: PokedexProgress = PokedexProgress {
        seen_bonus: 50.0,
        record_bonus: 100.0,
    };

    #[test]
    fn new_record_pays_both_bonuses() {
        let mut state = TrackerState::new();
        state.seen_pokemon_all_time = 3;
        let now = input(4, 0);
        assert_eq!(TERM.score(&ctx(&now, Some(stats(3, 0))), &mut state), 150.0);
        assert_eq!(state.seen_pokemon_all_time, 4);
        assert_eq!(state.seen_pokemon_this_episode, 1);
    }

    #[test]
    fn below_record_pays_discovery_only() {
        let mut state = TrackerState::new();
        state.seen_pokemon_all_time = 5;
        let now = input(4, 0);
        assert_eq!(TERM.score(&ctx(&now, Some(stats(3, 0))), &mut state), 50.0);
        assert_eq!(state.seen_pokemon_all_time, 5);
    }

    #[test]
    fn first_tick_only_records_the_baseline() {
        let mut state = TrackerState::new();
        let now = input(3, 0);
        assert_eq!(TERM.score(&ctx(&now, None), &mut state), 0.0);
        assert_eq!(state.seen_pokemon_all_time, 3);
        assert_eq!(state.seen_pokemon_this_episode, 0);
    }

    #[test]
    fn experience_is_proportional() {
        let term = ExperienceGain { per_point: 0.5 };
        let mut state = TrackerState::new();
        let now = input(0, 140);
        assert_eq!(term.score(&ctx(&now, Some(stats(0, 100))), &mut state), 20.0);
        assert_eq!(term.score(&ctx(&now, Some(stats(0, 200))), &mut state), 0.0);
        assert_eq!(term.score(&ctx(&now, None), &mut state), 0.0);
    }
}
