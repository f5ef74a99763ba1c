use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use brockgym::snapshot::is_blank_frame;
use brockgym::{Mirror, RewardBreakdown, TickInput, TileGrid, TrackerConfig};

fn to_py_err(e: brockgym::Error) -> PyErr {
    match e {
        brockgym::Error::Io(io) => PyIOError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Reward tracker fed from a Python-side emulator (e.g. PyBoy).
#[pyclass]
pub struct Tracker {
    tracker: brockgym::Tracker,
    last: RewardBreakdown,
}

#[pymethods]
impl Tracker {
    #[new]
    #[pyo3(signature = (max_steps = 1000))]
    fn new(max_steps: u32) -> PyResult<Self> {
        let config = TrackerConfig {
            max_steps,
            ..TrackerConfig::default()
        };
        let tracker = brockgym::Tracker::new(config).map_err(to_py_err)?;
        Ok(Tracker {
            tracker,
            last: RewardBreakdown::default(),
        })
    }

    /// Score one step from a RAM mirror (`MIRROR_SIZE` bytes), the visible
    /// tile grid and the raw screen buffer. Returns
    /// `(reward, terminated, truncated)`.
    fn step(
        &mut self,
        mirror: &[u8],
        tiles: Vec<Vec<u16>>,
        frame: &[u8],
        steps: u32,
    ) -> PyResult<(f32, bool, bool)> {
        let input = tick_input(mirror, tiles, is_blank_frame(frame))?;
        let outcome = self.tracker.step(&input, steps);
        let result = (outcome.reward.total, outcome.done, outcome.truncated);
        self.last = outcome.reward;
        Ok(result)
    }

    /// Record the state right after a reset without scoring it.
    fn prime(&mut self, mirror: &[u8], tiles: Vec<Vec<u16>>) -> PyResult<()> {
        let input = tick_input(mirror, tiles, false)?;
        self.tracker.prime(&input);
        Ok(())
    }

    fn observe(&self) -> Vec<f32> {
        self.tracker.observe()
    }

    fn reset_episode(&mut self) {
        self.tracker.reset_episode();
    }

    /// Per-term rewards of the last step.
    fn components(&self) -> Vec<(String, f32)> {
        self.last
            .components
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[getter]
    fn in_battle(&self) -> bool {
        self.tracker.state().in_battle
    }

    #[getter]
    fn maps_discovered(&self) -> usize {
        self.tracker.state().maps_all_time.len()
    }

    fn save(&self, path: &str) -> PyResult<()> {
        self.tracker.save_to_path(path).map_err(to_py_err)
    }

    #[staticmethod]
    fn load(path: &str) -> PyResult<Self> {
        let tracker = brockgym::Tracker::load_from_path(path).map_err(to_py_err)?;
        Ok(Tracker {
            tracker,
            last: RewardBreakdown::default(),
        })
    }
}

fn tick_input(mirror: &[u8], tiles: Vec<Vec<u16>>, frame_blank: bool) -> PyResult<TickInput> {
    let mirror = Mirror::from_bytes(mirror).map_err(to_py_err)?;
    let grid = TileGrid::from_rows(tiles).map_err(to_py_err)?;
    Ok(mirror.tick_input(grid, frame_blank))
}
