use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::{MAX_TERRAIN_STEP, TERRAIN_BASE_FREQUENCY, WATER_THRESHOLD};
use crate::grid::{Cell, GridAccess, WorldGrid};

/// Fill the grid with stepped noise terrain and water, then shade it.
pub fn generate_terrain(grid: &mut WorldGrid, seed: i32) {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(TERRAIN_BASE_FREQUENCY));

    for y in 0..grid.height {
        for x in 0..grid.width {
            let raw = noise.get_noise_2d(x as f32, y as f32);
            let elevation = ((raw + 1.0) * 0.5).clamp(0.0, 1.0);
            let step = (elevation * MAX_TERRAIN_STEP as f32).round() as u8;
            let cell = if elevation < WATER_THRESHOLD {
                Cell::water(step)
            } else {
                Cell::ground(step)
            };
            grid.set_cell(IVec2::new(x, y), cell);
        }
    }

    let max = IVec2::new(grid.width - 1, grid.height - 1);
    grid.recompute_ground_adjacency(IVec2::ZERO, max);
}
