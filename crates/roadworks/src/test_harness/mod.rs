//! # TestWorld — headless harness for road tool tests
//!
//! Wraps `bevy::app::App` + `RoadworksPlugin` so integration tests can feed
//! pointer gestures through the real input system and inspect the grid, the
//! prop store and the emitted outcomes afterwards. The free painting helpers
//! in [`setup`] work on any `GridAccess` and are shared with unit tests.

mod assertions;
mod gestures;
mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::grid::WorldGrid;
use crate::road_tool::GestureOutcome;
use crate::terrain::generate_terrain;
use crate::RoadworksPlugin;

pub use setup::{flat_grid, lay_road, mark_junction};

/// A headless Bevy App wrapping `RoadworksPlugin`.
pub struct TestWorld {
    app: App,
    /// Every gesture outcome seen so far, oldest first.
    outcomes: Vec<GestureOutcome>,
    /// Read position in the outcome event queue, so each event is seen once.
    outcome_cursor: bevy::ecs::event::EventCursor<crate::road_tool::RoadEditOutcome>,
    /// Pointer of the previous gesture event, fed back as `last` on drags.
    last_pointer: IVec2,
    /// Elapsed time when the current gesture was pressed.
    pressed_at: f32,
}

impl TestWorld {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A flat 128x128 world at ground height 0 with no props.
    pub fn new() -> Self {
        Self::with_grid(WorldGrid::default())
    }

    /// Start from a prepared grid.
    pub fn with_grid(grid: WorldGrid) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        // Insert before the plugin so its init_resource keeps ours.
        app.insert_resource(grid);
        app.add_plugins(RoadworksPlugin);
        app.update();

        Self {
            app,
            outcomes: Vec::new(),
            outcome_cursor: Default::default(),
            last_pointer: IVec2::ZERO,
            pressed_at: 0.0,
        }
    }

    /// A 128x128 world with generated terrain.
    pub fn with_terrain(seed: i32) -> Self {
        let mut grid = WorldGrid::default();
        generate_terrain(&mut grid, seed);
        Self::with_grid(grid)
    }

    /// Run one frame and collect the outcomes it produced.
    pub fn update(&mut self) {
        self.app.update();
        let events = self
            .app
            .world()
            .resource::<Events<crate::road_tool::RoadEditOutcome>>();
        self.outcomes
            .extend(self.outcome_cursor.read(events).map(|e| e.0));
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
