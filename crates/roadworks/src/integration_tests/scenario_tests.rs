//! End-to-end drawing scenarios on a flat 128x128 world.

use bevy::prelude::*;

use crate::autotile::resolve_tile;
use crate::config::{
    APRON_OFFSET, ROAD_HALF_WIDTH, ROAD_SEGMENT_WIDTH, TILE_APRON, TILE_CROSSING,
    TILE_CURVE_FIRST, TILE_STRAIGHT,
};
use crate::grid::{Direction, GridAccess, NodeType};
use crate::props::{InstancePlacement, PropKind};
use crate::road_tool::{GestureOutcome, RollbackReason};
use crate::test_harness::TestWorld;

// ====================================================================
// A: a single straight road on flat ground
// ====================================================================

#[test]
fn test_straight_road_on_flat_ground() {
    let mut world = TestWorld::new();
    let outcome = world.draw_road(IVec2::new(0, 0), IVec2::new(0, 20));
    assert!(matches!(
        outcome,
        Some(GestureOutcome::Committed { junctions: 0, .. })
    ));

    assert_eq!(world.grid().road_cell_count(), 21);
    for y in 0..=20 {
        let pos = IVec2::new(0, y);
        let cell = world.cell(pos);
        assert!(cell.is_road(), "no road at {pos}");
        assert!(!cell.is_road_node(), "unexpected node at {pos}");
        assert_eq!(cell.direction(), Direction::North);
        assert_eq!((cell.height_begin(), cell.height_end()), (0, 0));
        assert_eq!(cell.tile(), TILE_STRAIGHT);
    }
    world.assert_no_road(IVec2::new(0, 21));
    world.assert_settled();
}

// ====================================================================
// B: two roads meeting in an L
// ====================================================================

#[test]
fn test_two_roads_meet_in_a_corner() {
    let mut world = TestWorld::new();
    let corner = IVec2::new(20, 0);
    world.draw_road(IVec2::new(0, 0), corner);
    let outcome = world.draw_road(corner, IVec2::new(20, 20));
    assert!(matches!(
        outcome,
        Some(GestureOutcome::Committed { junctions: 1, .. })
    ));

    let center = world.cell(corner);
    assert!(center.is_road_node() && center.is_node_center());
    world.assert_node_type(corner, NodeType::CornerBottomLeft);

    let block = TILE_CURVE_FIRST + ROAD_SEGMENT_WIDTH as u8;
    world.assert_tile(corner, block + 2);
    // First cell of each arm, one on either side of the middle tile.
    world.assert_tile(corner + Direction::East.offset(), block + 3);
    world.assert_tile(corner + Direction::North.offset(), block + 1);
    for k in 1..=ROAD_HALF_WIDTH {
        for arm in [Direction::East, Direction::North] {
            let pos = corner + arm.offset() * k;
            world.assert_node_type(pos, NodeType::CornerBottomLeft);
            let tile = world.cell(pos).tile();
            assert!((block..block + ROAD_SEGMENT_WIDTH as u8).contains(&tile));
        }
    }
    world.assert_settled();
}

// ====================================================================
// C: two roads crossing
// ====================================================================

#[test]
fn test_crossing_gets_aprons_and_signals() {
    let mut world = TestWorld::new();
    let center = IVec2::new(64, 64);
    world.draw_road(IVec2::new(44, 64), IVec2::new(84, 64));
    let outcome = world.draw_road(IVec2::new(64, 44), IVec2::new(64, 84));
    assert!(matches!(
        outcome,
        Some(GestureOutcome::Committed { junctions: 1, .. })
    ));

    world.assert_node_type(center, NodeType::XingAll);
    world.assert_tile(center, TILE_CROSSING);
    for dir in Direction::ALL {
        world.assert_tile(center + dir.offset() * APRON_OFFSET, TILE_APRON);
        world.assert_tile(center + dir.offset() * (APRON_OFFSET - 1), TILE_STRAIGHT);
        for k in 1..=ROAD_HALF_WIDTH {
            assert!(world.cell(center + dir.offset() * k).is_road_node());
        }
    }

    let controllers: Vec<_> = world
        .props()
        .iter()
        .filter(|(_, p)| p.kind == PropKind::TrafficController)
        .map(|(_, p)| p.clone())
        .collect();
    assert_eq!(controllers.len(), 1);
    let controller = &controllers[0];
    assert_eq!(controller.pos, center);
    assert_eq!(controller.members.len(), 4);
    for member in &controller.members {
        let sign = world.props().lookup_instance(*member).cloned();
        assert!(sign.is_some_and(|s| s.kind == PropKind::TrafficSign && !s.hidden));
    }
    assert_eq!(world.visible_props(PropKind::TrafficSign), 4);
    world.assert_settled();
}

fn assert_tiles_match_a_fresh_resolve(world: &TestWorld) {
    let grid = world.grid();
    for pos in grid.positions() {
        let Some(cell) = grid.cell(pos).filter(|c| c.is_road()) else {
            continue;
        };
        let choice = resolve_tile(grid, pos, cell.direction(), cell.is_road_node());
        assert_eq!(choice.tile, cell.tile(), "tile drifted at {pos}");
        assert_eq!(choice.node_type, cell.node_type(), "node type drifted at {pos}");
    }
}

#[test]
fn test_committed_tiles_match_a_fresh_resolve() {
    let mut world = TestWorld::new();
    world.draw_road(IVec2::new(44, 64), IVec2::new(84, 64));
    world.draw_road(IVec2::new(64, 44), IVec2::new(64, 84));
    world.draw_road(IVec2::new(20, 10), IVec2::new(40, 10));
    world.draw_road(IVec2::new(40, 10), IVec2::new(40, 30));
    assert_tiles_match_a_fresh_resolve(&world);
}

#[test]
fn test_extending_a_corner_into_a_tee_retiles_the_far_arm() {
    let mut world = TestWorld::new();
    let center = IVec2::new(20, 20);
    world.draw_road(IVec2::new(8, 20), center);
    world.draw_road(center, IVec2::new(20, 40));
    world.assert_node_type(center, NodeType::CornerBottomLeft);
    assert_tiles_match_a_fresh_resolve(&world);

    let outcome = world.draw_road(IVec2::new(20, 5), center);
    assert!(matches!(
        outcome,
        Some(GestureOutcome::Committed { junctions: 1, .. })
    ));
    world.assert_node_type(center, NodeType::XingNoWest);
    for k in 1..=ROAD_HALF_WIDTH {
        let arm = center + Direction::North.offset() * k;
        world.assert_node_type(arm, NodeType::XingNoWest);
        world.assert_tile(arm, TILE_CROSSING);
    }
    assert_tiles_match_a_fresh_resolve(&world);
}

// ====================================================================
// D: releasing outside the grid
// ====================================================================

#[test]
fn test_release_outside_grid_leaves_nothing() {
    let mut world = TestWorld::new();
    let before = world.fingerprint();
    world.press(IVec2::new(10, 100));
    world.drag_to(IVec2::new(10, 140));
    let outcome = world.release(IVec2::new(10, 140));
    assert_eq!(
        outcome,
        Some(GestureOutcome::RolledBack(RollbackReason::ReleasedOutOfBounds))
    );
    assert_eq!(world.fingerprint(), before);
    assert_eq!(world.grid().road_cell_count(), 0);
    assert!(world.props().is_empty());
    world.assert_settled();
}

#[test]
fn test_preview_then_release_outside_grid_is_undone() {
    let mut world = TestWorld::new();
    let before = world.fingerprint();
    world.press(IVec2::new(10, 60));
    world.drag_to(IVec2::new(10, 120));
    assert!(world.grid().road_cell_count() > 0);
    world.release(IVec2::new(10, 130));
    assert_eq!(world.fingerprint(), before);
    assert!(world.props().is_empty());
    world.assert_settled();
}
