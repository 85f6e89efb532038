use bevy::prelude::*;
use xxhash_rust::xxh32::xxh32;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};

mod cell;
mod direction;
mod node_type;

pub use cell::{Cell, CellKind, CellTag, OccupantId, OwnerSlots};
pub use direction::Direction;
pub use node_type::NodeType;

const FINGERPRINT_SEED: u32 = 0x524f_4144;

/// Cell-level access to the world, injected into every road algorithm.
///
/// Out-of-bounds reads return `None`; out-of-bounds writes are ignored.
pub trait GridAccess {
    fn cell(&self, pos: IVec2) -> Option<Cell>;

    fn set_cell(&mut self, pos: IVec2, cell: Cell);

    /// Refresh ground shading for every cell in the inclusive box `min..=max`.
    /// Callers inside an edit snapshot the box first
    /// ([`EditLedger::snapshot_area`](crate::undo_ledger::EditLedger::snapshot_area)).
    fn recompute_ground_adjacency(&mut self, min: IVec2, max: IVec2);

    /// Walking height at `pos`: the road's mid height on road cells, ground
    /// height elsewhere.
    fn current_height_at(&self, pos: IVec2) -> Option<u8> {
        self.cell(pos).map(|c| {
            if c.is_road() {
                c.road_mid_height()
            } else {
                c.ground_height()
            }
        })
    }

    fn in_bounds(&self, pos: IVec2) -> bool {
        self.cell(pos).is_some()
    }

    fn is_road(&self, pos: IVec2) -> bool {
        self.cell(pos).is_some_and(|c| c.is_road())
    }

    fn is_road_node(&self, pos: IVec2) -> bool {
        self.cell(pos).is_some_and(|c| c.is_road_node())
    }
}

#[derive(Resource, Clone)]
pub struct WorldGrid {
    pub cells: Vec<Cell>,
    pub width: i32,
    pub height: i32,
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl WorldGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            cells: vec![Cell::default(); (width * height) as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn index(&self, pos: IVec2) -> Option<usize> {
        if pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, pos: IVec2) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// Clamp an inclusive box to the grid. `None` when it misses entirely.
    pub fn clamp_area(&self, min: IVec2, max: IVec2) -> Option<(IVec2, IVec2)> {
        let lo = min.max(IVec2::ZERO);
        let hi = max.min(IVec2::new(self.width - 1, self.height - 1));
        (lo.x <= hi.x && lo.y <= hi.y).then_some((lo, hi))
    }

    /// Every in-bounds coordinate, row by row.
    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| IVec2::new(x, y)))
    }

    /// Stable hash of every cell's packed word and owner slots.
    pub fn fingerprint(&self) -> u32 {
        let mut bytes = Vec::with_capacity(self.cells.len() * 12);
        for cell in &self.cells {
            bytes.extend_from_slice(&cell.packed().to_le_bytes());
            let owner = cell.owners.static_slot.map_or(u32::MAX, |o| o.0);
            bytes.extend_from_slice(&owner.to_le_bytes());
        }
        xxh32(&bytes, FINGERPRINT_SEED)
    }

    pub fn road_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_road()).count()
    }
}

impl GridAccess for WorldGrid {
    #[inline]
    fn cell(&self, pos: IVec2) -> Option<Cell> {
        self.get(pos).copied()
    }

    #[inline]
    fn set_cell(&mut self, pos: IVec2, cell: Cell) {
        if let Some(slot) = self.get_mut(pos) {
            *slot = cell;
        }
    }

    fn recompute_ground_adjacency(&mut self, min: IVec2, max: IVec2) {
        let Some((lo, hi)) = self.clamp_area(min, max) else {
            return;
        };
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let pos = IVec2::new(x, y);
                let Some(own) = self.get(pos).map(|c| c.ground_height()) else {
                    continue;
                };
                let mut mask = 0u8;
                for (bit, dir) in Direction::ALL.iter().enumerate() {
                    let higher = self
                        .get(pos + dir.offset())
                        .is_some_and(|n| n.ground_height() > own);
                    if higher {
                        mask |= 1 << bit;
                    }
                }
                if let Some(cell) = self.get_mut(pos) {
                    cell.set_ground_shade(mask);
                }
            }
        }
    }
}
