//! Hover highlight for the road under the pointer.
//!
//! Holds at most one selected road piece. The highlight is written straight
//! into the cells' emissive bit and never goes through the edit ledger, so
//! it survives previews being rolled back and is never committed.

use bevy::prelude::*;

use crate::config::{APRON_OFFSET, ROAD_HALF_WIDTH, SNAP_EXTRA_DISTANCE};
use crate::grid::{GridAccess, NodeType};
use crate::road_topology::snap_to_nearest_node;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRoad {
    pub origin: IVec2,
    pub node_type: NodeType,
    /// Every cell currently lit for this selection.
    pub cells: Vec<IVec2>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct RoadSelection {
    selected: Option<SelectedRoad>,
}

fn set_emissive<G: GridAccess + ?Sized>(grid: &mut G, pos: IVec2, on: bool) {
    if let Some(mut cell) = grid.cell(pos) {
        cell.set_emissive(on);
        grid.set_cell(pos, cell);
    }
}

/// Cells lit when `origin` is picked: the junction footprint (plus aprons for
/// crossings), or the straight piece around the cell.
fn footprint<G: GridAccess + ?Sized>(grid: &G, origin: IVec2, node_type: NodeType) -> Vec<IVec2> {
    let mut cells = vec![origin];
    if node_type.is_valid() {
        for arm in node_type.arms() {
            for k in 1..=ROAD_HALF_WIDTH {
                cells.push(origin + arm.offset() * k);
            }
            if node_type.is_crossing() {
                cells.push(origin + arm.offset() * APRON_OFFSET);
            }
        }
    } else if let Some(cell) = grid.cell(origin) {
        let heading = cell.direction();
        for k in 1..=ROAD_HALF_WIDTH {
            cells.push(origin + heading.offset() * k);
            cells.push(origin - heading.offset() * k);
        }
    }
    cells.retain(|p| grid.is_road(*p));
    cells
}

impl RoadSelection {
    pub fn current(&self) -> Option<&SelectedRoad> {
        self.selected.as_ref()
    }

    /// Highlight the road piece nearest `pos`. Clears any earlier selection
    /// first; returns `None` when there is no road at `pos`.
    pub fn select<G: GridAccess + ?Sized>(&mut self, grid: &mut G, pos: IVec2) -> Option<&SelectedRoad> {
        self.deselect(grid);
        if !grid.is_road(pos) {
            return None;
        }
        let (origin, node_type) = snap_to_nearest_node(&*grid, pos, SNAP_EXTRA_DISTANCE);
        let origin = if node_type.is_valid() { origin } else { pos };
        let cells = footprint(&*grid, origin, node_type);
        for &cell in &cells {
            set_emissive(grid, cell, true);
        }
        self.selected = Some(SelectedRoad {
            origin,
            node_type,
            cells,
        });
        self.selected.as_ref()
    }

    pub fn deselect<G: GridAccess + ?Sized>(&mut self, grid: &mut G) {
        if let Some(previous) = self.selected.take() {
            for pos in previous.cells {
                set_emissive(grid, pos, false);
            }
        }
    }
}
