use serde::{Deserialize, Serialize};
use std::fmt;

/// In-game map identifier as stored in work RAM.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(pub u8);

pub const PALLET_TOWN: MapId = MapId(0x00);
pub const VIRIDIAN_CITY: MapId = MapId(0x01);
pub const PEWTER_CITY: MapId = MapId(0x02);
pub const ROUTE_1: MapId = MapId(0x0C);
pub const ROUTE_2: MapId = MapId(0x0D);
pub const OAKS_LAB: MapId = MapId(0x28);
pub const VIRIDIAN_FOREST: MapId = MapId(0x33);
pub const PEWTER_GYM: MapId = MapId(0x36);

// Indexed by map id. Covers everything reachable before Mt. Moon.
static MAP_NAMES: [&str; 0x3C] = [
    "PALLET_TOWN",
    "VIRIDIAN_CITY",
    "PEWTER_CITY",
    "CERULEAN_CITY",
    "LAVENDER_TOWN",
    "VERMILION_CITY",
    "CELADON_CITY",
    "FUCHSIA_CITY",
    "CINNABAR_ISLAND",
    "INDIGO_PLATEAU",
    "SAFFRON_CITY",
    "UNUSED_MAP_0B",
    "ROUTE_1",
    "ROUTE_2",
    "ROUTE_3",
    "ROUTE_4",
    "ROUTE_5",
    "ROUTE_6",
    "ROUTE_7",
    "ROUTE_8",
    "ROUTE_9",
    "ROUTE_10",
    "ROUTE_11",
    "ROUTE_12",
    "ROUTE_13",
    "ROUTE_14",
    "ROUTE_15",
    "ROUTE_16",
    "ROUTE_17",
    "ROUTE_18",
    "ROUTE_19",
    "ROUTE_20",
    "ROUTE_21",
    "ROUTE_22",
    "ROUTE_23",
    "ROUTE_24",
    "ROUTE_25",
    "REDS_HOUSE_1F",
    "REDS_HOUSE_2F",
    "BLUES_HOUSE",
    "OAKS_LAB",
    "VIRIDIAN_POKECENTER",
    "VIRIDIAN_MART",
    "VIRIDIAN_SCHOOL_HOUSE",
    "VIRIDIAN_NICKNAME_HOUSE",
    "VIRIDIAN_GYM",
    "DIGLETTS_CAVE_ROUTE_2",
    "VIRIDIAN_FOREST_NORTH_GATE",
    "ROUTE_2_TRADE_HOUSE",
    "ROUTE_2_GATE",
    "VIRIDIAN_FOREST_SOUTH_GATE",
    "VIRIDIAN_FOREST",
    "MUSEUM_1F",
    "MUSEUM_2F",
    "PEWTER_GYM",
    "PEWTER_NIDORAN_HOUSE",
    "PEWTER_MART",
    "PEWTER_SPEECH_HOUSE",
    "PEWTER_POKECENTER",
    "MT_MOON_1F",
];

pub fn map_name(id: MapId) -> &'static str {
    MAP_NAMES.get(id.0 as usize).copied().unwrap_or("UNKNOWN")
}

impl MapId {
    pub fn name(self) -> &'static str {
        map_name(self)
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04X})", self.name(), self.0)
    }
}
