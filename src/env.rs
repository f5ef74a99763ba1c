//! The Brock environment: one action per step, driven by an external emulator.

use crate::config::EnvConfig;
use crate::error::Result;
use crate::keypad::{Button, KeyEvent, Keypad};
use crate::reward::RewardBreakdown;
use crate::snapshot::TickInput;
use crate::tracker::Tracker;

/// Frames a button is held before it is released within one action.
const PRESS_FRAMES: u32 = 8;

/// What the environment needs from the emulator. Emulation itself, save-state
/// files and rendering all live on the other side of this trait.
pub trait Emulator {
    /// Load the named save state.
    fn load_state(&mut self, name: &str) -> Result<()>;

    /// Set the current joypad mask. Mask bit = 1 means pressed.
    fn set_joypad_mask(&mut self, mask: u8);

    /// Run `frames` frames.
    fn tick(&mut self, frames: u32);

    /// Read the current game state.
    fn read_tick(&mut self) -> Result<TickInput>;
}

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult {
    pub observation: Vec<f32>,
    pub reward: f32,
    /// A badge was earned.
    pub terminated: bool,
    /// The step ceiling was reached.
    pub truncated: bool,
    pub info: RewardBreakdown,
}

pub struct BrockEnv<E: Emulator> {
    emulator: E,
    tracker: Tracker,
    keypad: Keypad,
    act_freq: u32,
    init_state: String,
    steps: u32,
}

impl<E: Emulator> BrockEnv<E> {
    pub fn new(emulator: E, config: EnvConfig) -> Result<BrockEnv<E>> {
        config.validate()?;
        let tracker = Tracker::new(config.tracker)?;
        Ok(BrockEnv::with_tracker(
            emulator,
            tracker,
            config.act_freq,
            config.init_state,
        ))
    }

    /// Wrap an existing tracker, e.g. one restored from a checkpoint.
    pub fn with_tracker(
        emulator: E,
        tracker: Tracker,
        act_freq: u32,
        init_state: String,
    ) -> BrockEnv<E> {
        BrockEnv {
            emulator,
            tracker,
            keypad: Keypad::new(),
            act_freq: act_freq.max(1),
            init_state,
            steps: 0,
        }
    }

    pub fn reset(&mut self) -> Result<Vec<f32>> {
        self.emulator.load_state(&self.init_state)?;
        self.keypad = Keypad::new();
        self.emulator.set_joypad_mask(self.keypad.mask());
        self.steps = 0;

        let input = self.emulator.read_tick()?;
        self.tracker.reset_episode();
        self.tracker.prime(&input);
        Ok(self.tracker.observe())
    }

    pub fn step(&mut self, action: u8) -> Result<StepResult> {
        let button = Button::from_index(action)?;

        let held = PRESS_FRAMES.min(self.act_freq);
        self.send(button.press());
        self.emulator.tick(held);
        self.send(button.release());
        if self.act_freq > held {
            self.emulator.tick(self.act_freq - held);
        }
        self.steps += 1;

        let input = self.emulator.read_tick()?;
        let outcome = self.tracker.step(&input, self.steps);
        tracing::trace!(
            step = self.steps,
            ?button,
            reward = outcome.reward.total,
            "step"
        );

        Ok(StepResult {
            observation: self.tracker.observe(),
            reward: outcome.reward.total,
            terminated: outcome.done,
            truncated: outcome.truncated,
            info: outcome.reward,
        })
    }

    fn send(&mut self, event: KeyEvent) {
        self.keypad.apply(event);
        self.emulator.set_joypad_mask(self.keypad.mask());
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn observation_len(&self) -> usize {
        self.tracker.observation_len()
    }

    pub fn action_count(&self) -> usize {
        Button::ALL.len()
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn emulator(&self) -> &E {
        &self.emulator
    }

    pub fn emulator_mut(&mut self) -> &mut E {
        &mut self.emulator
    }

    pub fn into_parts(self) -> (E, Tracker) {
        (self.emulator, self.tracker)
    }
}
