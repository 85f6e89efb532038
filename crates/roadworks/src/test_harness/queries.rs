//! Query methods for `TestWorld`.

use bevy::prelude::*;

use crate::grid::{Cell, GridAccess, WorldGrid};
use crate::props::{PropKind, PropStore};
use crate::road_tool::{GestureOutcome, RoadTool, ToolPhase};
use crate::selection::RoadSelection;

use super::TestWorld;

impl TestWorld {
    /// Access the ECS world mutably.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn grid(&self) -> &WorldGrid {
        self.app.world().resource::<WorldGrid>()
    }

    pub fn props(&self) -> &PropStore {
        self.app.world().resource::<PropStore>()
    }

    pub fn tool(&self) -> &RoadTool {
        self.app.world().resource::<RoadTool>()
    }

    pub fn selection(&self) -> &RoadSelection {
        self.app.world().resource::<RoadSelection>()
    }

    pub fn phase(&self) -> ToolPhase {
        self.tool().phase()
    }

    /// Copy of the cell at `pos`. Panics when out of bounds.
    pub fn cell(&self, pos: IVec2) -> Cell {
        match self.grid().cell(pos) {
            Some(cell) => cell,
            None => panic!("cell {pos} is outside the grid"),
        }
    }

    pub fn fingerprint(&self) -> u32 {
        self.grid().fingerprint()
    }

    pub fn outcomes(&self) -> &[GestureOutcome] {
        &self.outcomes
    }

    pub fn visible_props(&self, kind: PropKind) -> usize {
        self.props().count_visible(kind)
    }

    pub fn pending_cells(&self) -> usize {
        self.grid().cells.iter().filter(|c| c.is_pending()).count()
    }
}
