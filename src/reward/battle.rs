use super::{RewardTerm, TickContext};
use crate::battle::{BattleScreen, BattleScreenClassifier, TEMPLATE_ROWS};
use crate::config::BattleRewards;
use crate::tracker::TrackerState;
use serde::{Deserialize, Serialize};

/// Drives the `Exploring` / `InBattle` latch and rewards progress through the
/// battle menus while latched.
///
/// A wild battle opens with a blank flash while the player stands on grass;
/// that latches the battle. It is released as soon as the distance from the
/// map start changes again, i.e. the player is walking around.
#[derive(Debug, Serialize, Deserialize)]
pub struct BattleProgress {
    pub rewards: BattleRewards,
    pub classifier: Box<dyn BattleScreenClassifier>,
}

impl BattleProgress {
    fn screen_reward(&self, screen: BattleScreen) -> f32 {
        match screen {
            BattleScreen::Fight => self.rewards.fight,
            BattleScreen::AttackChosen => self.rewards.attack_chosen,
            BattleScreen::TacklePerformed => self.rewards.tackle,
            BattleScreen::Fled => self.rewards.fled,
        }
    }
}

#[typetag::serde]
impl RewardTerm for BattleProgress {
    fn name(&self) -> &'static str {
        "battle"
    }

    fn score(&self, ctx: &TickContext<'_>, state: &mut TrackerState) -> f32 {
        let input = ctx.input;

        if !state.in_battle {
            if input.on_grass && input.frame_blank {
                state.in_battle = true;
                tracing::info!(map = %input.location.map, "battle started");
                return self.rewards.start;
            }
            return 0.0;
        }

        if ctx.distance_changed() {
            state.in_battle = false;
            tracing::info!(map = %input.location.map, "battle over");
            return 0.0;
        }

        let bottom = match input.tiles.bottom_rows(TEMPLATE_ROWS) {
            Ok(bottom) => bottom,
            Err(e) => {
                if !input.tiles.is_empty() {
                    tracing::warn!(error = %e, "skipping battle screen check");
                }
                return 0.0;
            }
        };
        match self.classifier.classify(bottom) {
            Some(screen) => {
                tracing::debug!(?screen, "battle screen");
                self.screen_reward(screen)
            }
            None => {
                tracing::trace!("no battle template matched");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::battle::ExactTemplateClassifier;
    use crate::maps::ROUTE_1;
    use crate::snapshot::{GameStats, Location, TickInput, TileGrid};

    fn term() -> BattleProgress {
        BattleProgress {
            rewards: BattleRewards::default(),
            classifier: Box::new(ExactTemplateClassifier),
        }
    }

    fn input(tiles: TileGrid, on_grass: bool, frame_blank: bool) -> TickInput {
        TickInput {
            location: Location::new(3, 3, ROUTE_1),
            stats: GameStats::default(),
            on_grass,
            tiles,
            frame_blank,
        }
    }

    fn ctx(input: &TickInput, previous_distance: f32, distance: f32) -> TickContext<'_> {
        TickContext {
            input,
            previous_location: Some(input.location.clone()),
            previous_stats: None,
            distance,
            previous_distance: Some(previous_distance),
            window_advanced: false,
        }
    }

    #[test]
    fn latches_on_grass_flash() {
        let t = term();
        let mut state = TrackerState::new();

        let walking = input(TileGrid::default(), true, false);
        assert_eq!(t.score(&ctx(&walking, 2.0, 2.0), &mut state), 0.0);
        assert!(!state.in_battle);

        let flash = input(TileGrid::default(), false, true);
        assert_eq!(t.score(&ctx(&flash, 2.0, 2.0), &mut state), 0.0);
        assert!(!state.in_battle, "a blank frame off grass is a map transition");

        let encounter = input(TileGrid::default(), true, true);
        assert_eq!(t.score(&ctx(&encounter, 2.0, 2.0), &mut state), 20.0);
        assert!(state.in_battle);
    }

    #[test]
    fn rewards_menu_screens_while_latched() {
        let t = term();
        let mut state = TrackerState::new();
        state.in_battle = true;

        let expected = [
            (BattleScreen::Fight, 1.0),
            (BattleScreen::AttackChosen, 5.0),
            (BattleScreen::TacklePerformed, 10.0),
            (BattleScreen::Fled, -20.0),
        ];
        for (screen, reward) in expected.iter() {
            let i = input(screen.render(), true, false);
            assert_eq!(t.score(&ctx(&i, 2.0, 2.0), &mut state), *reward);
            assert!(state.in_battle);
        }

        let unknown = input(TileGrid::filled(18, 20, 0x17F), true, false);
        assert_eq!(t.score(&ctx(&unknown, 2.0, 2.0), &mut state), 0.0);
    }

    #[test]
    fn unlatches_when_distance_changes() {
        let t = term();
        let mut state = TrackerState::new();
        state.in_battle = true;

        let moved = input(BattleScreen::Fight.render(), true, false);
        assert_eq!(t.score(&ctx(&moved, 2.0, 3.0), &mut state), 0.0);
        assert!(!state.in_battle);
    }

    #[test]
    fn small_tile_grid_is_skipped() {
        let t = term();
        let mut state = TrackerState::new();
        state.in_battle = true;
        let tiny = input(TileGrid::filled(2, 20, 0), true, false);
        assert_eq!(t.score(&ctx(&tiny, 1.0, 1.0), &mut state), 0.0);
        assert!(state.in_battle);
    }
}
