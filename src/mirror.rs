use crate::error::{Error, Result};
use crate::maps::MapId;
use crate::snapshot::{GameStats, Location, TickInput, TileGrid};
use serde::{Deserialize, Serialize};

// Pokemon Red/Blue work RAM
const WRAM_TILE_UNDER_PLAYER: u16 = 0xC45C; // wTileMap row 9, col 8
const WRAM_PARTY_COUNT: u16 = 0xD163;
const WRAM_PARTY_LEAD_XP: u16 = 0xD179; // 3 bytes, big-endian
const WRAM_POKEDEX_OWNED: u16 = 0xD2F7;
const WRAM_POKEDEX_SEEN: u16 = 0xD30A;
const WRAM_BADGES: u16 = 0xD356;
const WRAM_MAP_ID: u16 = 0xD35E;
const WRAM_PLAYER_Y: u16 = 0xD361;
const WRAM_PLAYER_X: u16 = 0xD362;
const WRAM_GRASS_TILE: u16 = 0xD535;
const POKEDEX_BYTES: usize = 19;

pub const MIRROR_FRAME_COUNTER: usize = 0x00;
pub const MIRROR_MAP_ID: usize = 0x04;
pub const MIRROR_PLAYER_X: usize = 0x05;
pub const MIRROR_PLAYER_Y: usize = 0x06;
pub const MIRROR_BADGES: usize = 0x07;
pub const MIRROR_PARTY_COUNT: usize = 0x08;
pub const MIRROR_LEAD_XP: usize = 0x09; // 3 bytes
pub const MIRROR_TILE_UNDER_PLAYER: usize = 0x0C;
pub const MIRROR_GRASS_TILE: usize = 0x0D;
pub const MIRROR_POKEDEX_OWNED: usize = 0x0E; // 19 bytes
pub const MIRROR_POKEDEX_SEEN: usize = 0x21; // 19 bytes

/*
Mirror layout (offsets are mirror-relative):
 0x00  4  Frame counter        -> u32 LE (increments each capture)
 0x04  1  Map ID               -> u8
 0x05  1  Player X             -> u8
 0x06  1  Player Y             -> u8
 0x07  1  Badges               -> u8 (bitfield)
 0x08  1  Party count          -> u8
 0x09  3  Lead experience      -> 24-bit BE, copied verbatim
 0x0C  1  Tile under player    -> u8
 0x0D  1  Grass tile of tileset-> u8 (0xFF when the tileset has none)
 0x0E 19  Pokedex owned        -> bitfield, one bit per species
 0x21 19  Pokedex seen         -> bitfield, one bit per species
 0x34 12  Reserved

Total size: 0x40 (64 bytes)
*/
pub const MIRROR_SIZE: usize = 0x40;

const NO_GRASS_TILE: u8 = 0xFF;

/// Byte reads against the emulated address space.
pub trait MemoryBus {
    fn rb(&mut self, address: u16) -> u8;
}

/// A compact copy of the game variables the tracker needs, taken once per tick.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    #[serde(with = "serde_arrays")]
    bytes: [u8; MIRROR_SIZE],
    frame_counter: u32,
}

impl Default for Mirror {
    fn default() -> Mirror {
        Mirror {
            bytes: [0; MIRROR_SIZE],
            frame_counter: 0,
        }
    }
}

impl std::fmt::Debug for Mirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror")
            .field("frame", &self.frame_counter)
            .field("location", &self.location())
            .field("stats", &self.game_stats())
            .finish()
    }
}

impl Mirror {
    pub fn new() -> Mirror {
        Mirror::default()
    }

    /// Accept a mirror captured elsewhere (e.g. by a Python front-end).
    pub fn from_bytes(data: &[u8]) -> Result<Mirror> {
        if data.len() < MIRROR_SIZE {
            return Err(Error::MirrorTooShort {
                expected: MIRROR_SIZE,
                actual: data.len(),
            });
        }
        let mut bytes = [0; MIRROR_SIZE];
        bytes.copy_from_slice(&data[..MIRROR_SIZE]);
        let frame_counter = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Ok(Mirror {
            bytes,
            frame_counter,
        })
    }

    pub fn capture<B: MemoryBus>(&mut self, bus: &mut B) {
        // --- frame counter ---
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.bytes[MIRROR_FRAME_COUNTER..MIRROR_FRAME_COUNTER + 4]
            .copy_from_slice(&self.frame_counter.to_le_bytes());

        // --- map & player ---
        self.bytes[MIRROR_MAP_ID] = bus.rb(WRAM_MAP_ID);
        self.bytes[MIRROR_PLAYER_X] = bus.rb(WRAM_PLAYER_X);
        self.bytes[MIRROR_PLAYER_Y] = bus.rb(WRAM_PLAYER_Y);

        // --- progress ---
        self.bytes[MIRROR_BADGES] = bus.rb(WRAM_BADGES);
        self.bytes[MIRROR_PARTY_COUNT] = bus.rb(WRAM_PARTY_COUNT);
        for i in 0..3 {
            self.bytes[MIRROR_LEAD_XP + i] = bus.rb(WRAM_PARTY_LEAD_XP + i as u16);
        }

        // --- terrain ---
        self.bytes[MIRROR_TILE_UNDER_PLAYER] = bus.rb(WRAM_TILE_UNDER_PLAYER);
        self.bytes[MIRROR_GRASS_TILE] = bus.rb(WRAM_GRASS_TILE);

        // --- pokedex ---
        for i in 0..POKEDEX_BYTES {
            self.bytes[MIRROR_POKEDEX_OWNED + i] = bus.rb(WRAM_POKEDEX_OWNED + i as u16);
            self.bytes[MIRROR_POKEDEX_SEEN + i] = bus.rb(WRAM_POKEDEX_SEEN + i as u16);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn location(&self) -> Location {
        Location::new(
            self.bytes[MIRROR_PLAYER_X],
            self.bytes[MIRROR_PLAYER_Y],
            MapId(self.bytes[MIRROR_MAP_ID]),
        )
    }

    pub fn game_stats(&self) -> GameStats {
        let xp = &self.bytes[MIRROR_LEAD_XP..MIRROR_LEAD_XP + 3];
        GameStats {
            badges: self.bytes[MIRROR_BADGES].count_ones() as u8,
            seen_pokemon: popcount(self.pokedex(MIRROR_POKEDEX_SEEN)),
            caught_pokemon: popcount(self.pokedex(MIRROR_POKEDEX_OWNED)),
            xp: (xp[0] as u32) << 16 | (xp[1] as u32) << 8 | xp[2] as u32,
            party_size: self.bytes[MIRROR_PARTY_COUNT],
        }
    }

    pub fn on_grass(&self) -> bool {
        let grass = self.bytes[MIRROR_GRASS_TILE];
        grass != NO_GRASS_TILE && self.bytes[MIRROR_TILE_UNDER_PLAYER] == grass
    }

    /// Everything the tracker needs for one tick, with the screen state
    /// supplied by the caller.
    pub fn tick_input(&self, tiles: TileGrid, frame_blank: bool) -> TickInput {
        TickInput {
            location: self.location(),
            stats: self.game_stats(),
            on_grass: self.on_grass(),
            tiles,
            frame_blank,
        }
    }

    fn pokedex(&self, offset: usize) -> &[u8] {
        &self.bytes[offset..offset + POKEDEX_BYTES]
    }
}

fn popcount(bits: &[u8]) -> u32 {
    bits.iter().map(|b| b.count_ones()).sum()
}
