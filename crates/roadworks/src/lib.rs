use bevy::prelude::*;

pub mod autotile;
pub mod config;
pub mod decoration;
pub mod grid;
pub mod props;
pub mod road_builder;
pub mod road_tool;
pub mod road_topology;
pub mod selection;
pub mod sim_rng;
pub mod terrain;
pub mod undo_ledger;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use config::RoadToolConfig;
use grid::WorldGrid;
use props::PropStore;
use road_tool::{handle_road_tool_input, RoadEditOutcome, RoadTool, RoadToolInput};
use selection::RoadSelection;
use sim_rng::SimRng;

/// Road drawing on the world grid.
///
/// Every resource is added with `init_resource`, so a grid, prop store or
/// config inserted before the plugin is kept.
pub struct RoadworksPlugin;

impl Plugin for RoadworksPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldGrid>()
            .init_resource::<PropStore>()
            .init_resource::<RoadTool>()
            .init_resource::<RoadSelection>()
            .init_resource::<RoadToolConfig>()
            .init_resource::<SimRng>()
            .add_event::<RoadToolInput>()
            .add_event::<RoadEditOutcome>()
            .add_systems(Update, handle_road_tool_input);
    }
}
