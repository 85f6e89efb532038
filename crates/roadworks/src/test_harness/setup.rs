//! Grid painting helpers and builder methods for world setup.

use bevy::prelude::*;

use crate::config::{RoadToolConfig, ROAD_HALF_WIDTH};
use crate::grid::{Cell, Direction, GridAccess, WorldGrid};
use crate::props::{InstancePlacement, PropHandle, PropKind, PropStore};

use super::TestWorld;

/// A `width` x `height` grid of open ground at `height_step`.
pub fn flat_grid(width: i32, height: i32, height_step: u8) -> WorldGrid {
    let mut grid = WorldGrid::new(width, height);
    for cell in grid.cells.iter_mut() {
        *cell = Cell::ground(height_step);
    }
    grid
}

/// Paint plain road from `from` to `to` along the dominant axis, bypassing
/// the builder. Heights follow the ground underneath.
pub fn lay_road<G: GridAccess + ?Sized>(grid: &mut G, from: IVec2, to: IVec2) {
    let delta = to - from;
    let dir = Direction::from_delta(delta).unwrap_or(Direction::North);
    let steps = if dir.is_vertical() {
        delta.y.abs()
    } else {
        delta.x.abs()
    };
    for k in 0..=steps {
        let pos = from + dir.offset() * k;
        let Some(mut cell) = grid.cell(pos) else {
            continue;
        };
        let h = cell.ground_height();
        cell.make_road(dir);
        cell.set_heights(h, h);
        grid.set_cell(pos, cell);
    }
}

/// Flag `center` as a junction center and the road around it, up to the
/// half width on every side, as its footprint.
pub fn mark_junction<G: GridAccess + ?Sized>(grid: &mut G, center: IVec2) {
    if let Some(mut cell) = grid.cell(center) {
        cell.set_road_node(true);
        cell.set_node_center(true);
        grid.set_cell(center, cell);
    }
    for dir in Direction::ALL {
        for k in 1..=ROAD_HALF_WIDTH {
            let pos = center + dir.offset() * k;
            if let Some(mut cell) = grid.cell(pos).filter(|c| c.is_road()) {
                cell.set_road_node(true);
                grid.set_cell(pos, cell);
            }
        }
    }
}

impl TestWorld {
    // -----------------------------------------------------------------------
    // Roads, props and config
    // -----------------------------------------------------------------------

    /// Paint a road straight into the grid resource.
    pub fn with_road(mut self, from: IVec2, to: IVec2) -> Self {
        {
            let mut grid = self.app.world_mut().resource_mut::<WorldGrid>();
            lay_road(&mut *grid, from, to);
        }
        self
    }

    pub fn with_config(mut self, config: RoadToolConfig) -> Self {
        self.app.world_mut().insert_resource(config);
        self
    }

    /// Replace the prop store with one that refuses placements past `limit`.
    pub fn with_prop_capacity(mut self, limit: usize) -> Self {
        self.app
            .world_mut()
            .insert_resource(PropStore::with_capacity_limit(limit));
        self
    }

    /// Place a prop directly, outside any gesture.
    pub fn place_prop(&mut self, kind: PropKind, pos: IVec2, facing: Direction) -> Option<PropHandle> {
        self.app
            .world_mut()
            .resource_mut::<PropStore>()
            .place_instance(kind, pos, facing)
    }
}
