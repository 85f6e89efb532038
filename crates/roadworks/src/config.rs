use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const GRID_WIDTH: i32 = 128;
pub const GRID_HEIGHT: i32 = 128;

/// Width of one road piece in cells. Junction footprints, snap ranges and the
/// decoration cadence are all derived from it.
pub const ROAD_SEGMENT_WIDTH: i32 = 5;
pub const ROAD_HALF_WIDTH: i32 = ROAD_SEGMENT_WIDTH / 2;

/// Distance from a junction center at which its arms are probed.
pub const NODE_PROBE_OFFSET: i32 = ROAD_HALF_WIDTH + 1;

/// Distance from a crossing center to the apron tile on each arm.
pub const APRON_OFFSET: i32 = ROAD_SEGMENT_WIDTH + 1;

/// Edge cells between two street-furniture placement attempts.
pub const LAMP_INTERVAL: usize = 2 * ROAD_SEGMENT_WIDTH as usize;

/// Half extent of the box around a junction that is cleared of furniture.
pub const JUNCTION_CLEARANCE: i32 = 2 * ROAD_SEGMENT_WIDTH;

/// Samples in the running average used to find grading targets on open ground.
pub const GRADE_SAMPLE_WINDOW: usize = 4;

/// Extra cells searched past `ROAD_SEGMENT_WIDTH` when snapping a pointer.
pub const SNAP_EXTRA_DISTANCE: i32 = 2;

/// Highest terrain step produced by the noise generator.
pub const MAX_TERRAIN_STEP: u8 = 24;
pub const TERRAIN_BASE_FREQUENCY: f32 = 0.02;

/// Noise values below this become water.
pub const WATER_THRESHOLD: f32 = 0.12;

/// Dynamic occupant slots per cell, on top of the single static slot.
pub const DYNAMIC_OWNER_SLOTS: usize = 3;

// ---------------------------------------------------------------------------
// Tile atlas layout
// ---------------------------------------------------------------------------

pub const TILE_STRAIGHT: u8 = 0;
pub const TILE_CROSSING: u8 = 1;
pub const TILE_APRON: u8 = 2;
pub const TILE_SELECT: u8 = 3;

/// First curve tile. Each corner variant owns `ROAD_SEGMENT_WIDTH` consecutive
/// indices starting here, in `TL, BL, BR, TR` order.
pub const TILE_CURVE_FIRST: u8 = 4;
pub const TILE_CURVE_LAST: u8 = TILE_CURVE_FIRST + 4 * ROAD_SEGMENT_WIDTH as u8 - 1;

// ---------------------------------------------------------------------------
// Runtime tunables
// ---------------------------------------------------------------------------

/// Road tool settings that may change while the app runs.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadToolConfig {
    /// Cells searched past one segment width when snapping endpoints.
    pub snap_extra_distance: i32,
    /// Chance that a furniture slot gets a road sign instead of a lamppost.
    pub road_sign_chance: f32,
    /// Drags that stay on the start cell this soon after the press are ignored.
    pub drag_settle_secs: f32,
    pub decorate: bool,
}

impl Default for RoadToolConfig {
    fn default() -> Self {
        Self {
            snap_extra_distance: SNAP_EXTRA_DISTANCE,
            road_sign_chance: 0.1,
            drag_settle_secs: 0.15,
            decorate: true,
        }
    }
}

impl RoadToolConfig {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
