//! Reinforcement-learning environment for the first gym of Pokemon Red
//! (Brock), layered over an external Game Boy emulator.
//!
//! The emulator hands over a [`TickInput`] every step; the [`Tracker`] turns it
//! into a reward, an observation vector and the episode-boundary signals.

pub mod battle;
pub mod checkpoint;
pub mod config;
pub mod env;
pub mod error;
pub mod keypad;
pub mod maps;
pub mod mirror;
pub mod reward;
pub mod snapshot;
pub mod tracker;
pub mod window;

pub use crate::battle::{BattleScreen, BattleScreenClassifier, ExactTemplateClassifier};
pub use crate::config::{EnvConfig, TrackerConfig};
pub use crate::env::{BrockEnv, Emulator, StepResult};
pub use crate::error::{Error, Result};
pub use crate::keypad::{Button, KeyEvent};
pub use crate::maps::MapId;
pub use crate::mirror::{MemoryBus, Mirror};
pub use crate::reward::{RewardBreakdown, RewardTerm, ScoringPipeline};
pub use crate::snapshot::{GameStats, Location, TickInput, TileGrid};
pub use crate::tracker::{TickOutcome, Tracker, TrackerMode, TrackerState};
