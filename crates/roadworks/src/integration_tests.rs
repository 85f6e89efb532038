//! Integration tests for the road tool using the `TestWorld` harness.
//!
//! These tests spin up a headless Bevy App with `RoadworksPlugin`, drive
//! gestures through the `RoadToolInput` event and check the committed grid.

mod gesture_tests;
mod scenario_tests;

use bevy::prelude::*;

use crate::road_tool::{GestureOutcome, RoadToolInput, ToolPhase};
use crate::test_harness::TestWorld;

// ===========================================================================
// Harness bootstrap
// ===========================================================================

#[test]
fn empty_world_has_no_road() {
    let world = TestWorld::new();
    assert_eq!(world.grid().road_cell_count(), 0);
    assert!(world.props().is_empty());
    assert_eq!(world.phase(), ToolPhase::Idle);
    assert!(world.outcomes().is_empty());
}

#[test]
fn terrain_world_is_not_flat() {
    let world = TestWorld::with_terrain(11);
    let first = world.grid().cells[0].ground_height();
    assert!(world
        .grid()
        .cells
        .iter()
        .any(|c| c.ground_height() != first));
}

#[test]
fn outcome_event_is_sent_once_per_gesture() {
    let mut world = TestWorld::new();
    world.draw_road(IVec2::new(10, 10), IVec2::new(10, 30));
    world.draw_road(IVec2::new(40, 10), IVec2::new(40, 30));
    assert_eq!(world.outcomes().len(), 2);
    assert!(world
        .outcomes()
        .iter()
        .all(|o| matches!(o, GestureOutcome::Committed { .. })));
}

#[test]
fn release_without_press_sends_nothing() {
    let mut world = TestWorld::new();
    assert!(world.release(IVec2::new(5, 5)).is_none());
    assert!(world.outcomes().is_empty());
}

#[test]
fn inputs_in_one_frame_are_handled_in_order() {
    let mut world = TestWorld::new();
    let (start, end) = (IVec2::new(8, 8), IVec2::new(8, 20));
    {
        let w = world.world_mut();
        w.send_event(RoadToolInput::Press { pointer: start });
        w.send_event(RoadToolInput::Drag {
            pointer: end,
            last: start,
            started_at: 0.0,
        });
        w.send_event(RoadToolInput::Release { pointer: end });
    }
    world.update();
    assert_eq!(world.outcomes().len(), 1);
    world.assert_road(end);
    world.assert_settled();
}
