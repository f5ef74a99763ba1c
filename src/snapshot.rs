//! Per-tick values read from the emulator.

use crate::error::{Error, Result};
use crate::maps::MapId;
use serde::{Deserialize, Serialize};

/// Player position at one tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: u8,
    pub y: u8,
    pub map: MapId,
    pub map_name: String,
}

impl Location {
    pub fn new(x: u8, y: u8, map: MapId) -> Location {
        Location {
            x,
            y,
            map,
            map_name: map.name().to_string(),
        }
    }

    pub fn key(&self) -> LocationKey {
        LocationKey {
            x: self.x,
            y: self.y,
            map: self.map,
        }
    }
}

/// The `(x, y, map)` tuple used for discovery sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    pub x: u8,
    pub y: u8,
    pub map: MapId,
}

/// Game counters sampled once per tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub badges: u8,
    pub seen_pokemon: u32,
    pub caught_pokemon: u32,
    pub xp: u32,
    pub party_size: u8,
}

/// Visible background tiles, row-major.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tiles: Vec<u16>,
}

impl TileGrid {
    pub const SCREEN_ROWS: usize = 18;
    pub const SCREEN_COLS: usize = 20;

    pub fn new(rows: usize, cols: usize, tiles: Vec<u16>) -> Result<TileGrid> {
        if tiles.len() != rows * cols {
            return Err(Error::TileGridShape { rows, cols });
        }
        Ok(TileGrid { rows, cols, tiles })
    }

    /// Builds a grid from nested rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<u16>>) -> Result<TileGrid> {
        let count = rows.len();
        let cols = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != cols) {
            return Err(Error::TileGridShape { rows: count, cols });
        }
        TileGrid::new(count, cols, rows.into_iter().flatten().collect())
    }

    /// A grid filled with one tile id.
    pub fn filled(rows: usize, cols: usize, tile: u16) -> TileGrid {
        TileGrid {
            rows,
            cols,
            tiles: vec![tile; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn set(&mut self, r: usize, c: usize, tile: u16) {
        self.tiles[r * self.cols + c] = tile;
    }

    /// The last `n` rows, oldest row first. Fails if the grid is shorter than `n`.
    pub fn bottom_rows(&self, n: usize) -> Result<&[u16]> {
        if self.rows < n {
            return Err(Error::TileGridShape {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(&self.tiles[(self.rows - n) * self.cols..])
    }
}

/// Everything the tracker consumes for one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub location: Location,
    pub stats: GameStats,
    pub on_grass: bool,
    pub tiles: TileGrid,
    pub frame_blank: bool,
}

impl TickInput {
    /// An overworld tick with no battle signals.
    pub fn at(location: Location, stats: GameStats) -> TickInput {
        TickInput {
            location,
            stats,
            on_grass: false,
            tiles: TileGrid::default(),
            frame_blank: false,
        }
    }
}

/// True when every pixel of the framebuffer holds the same value, as during
/// the flash that opens a wild battle.
pub fn is_blank_frame(frame: &[u8]) -> bool {
    match frame.split_first() {
        Some((first, rest)) => rest.iter().all(|p| p == first),
        None => false,
    }
}
