//! Gesture lifecycle through the Bevy input system: previews, commits,
//! rollbacks and the prop side effects that go with them.

use bevy::prelude::*;

use crate::config::RoadToolConfig;
use crate::grid::GridAccess;
use crate::props::PropKind;
use crate::road_tool::{GestureOutcome, RollbackReason, ToolPhase};
use crate::test_harness::TestWorld;

fn prop_spots(world: &TestWorld) -> Vec<(PropKind, IVec2)> {
    let mut spots: Vec<(PropKind, IVec2)> = world
        .props()
        .iter()
        .filter(|(_, p)| !p.hidden)
        .map(|(_, p)| (p.kind, p.pos))
        .collect();
    spots.sort_by_key(|(kind, pos)| (*kind as u8, pos.x, pos.y));
    spots
}

#[test]
fn test_preview_is_pending_until_release() {
    let mut world = TestWorld::new();
    let start = IVec2::new(30, 10);
    world.press(start);
    assert_eq!(world.phase(), ToolPhase::Started { start });
    world.drag_to(IVec2::new(30, 40));
    assert!(matches!(world.phase(), ToolPhase::Previewed { .. }));
    assert!(world.pending_cells() >= 31);
    assert!(world.cell(IVec2::new(30, 25)).is_emissive());

    world.release(IVec2::new(30, 40));
    assert_eq!(world.phase(), ToolPhase::Idle);
    world.assert_settled();
    assert!(!world.cell(IVec2::new(30, 25)).is_emissive());
    world.assert_road(IVec2::new(30, 40));
}

#[test]
fn test_rollback_restores_terrain_exactly() {
    let mut world = TestWorld::with_terrain(3);
    let before = world.fingerprint();
    world.press(IVec2::new(40, 5));
    world.drag_to(IVec2::new(40, 90));
    world.drag_to(IVec2::new(40, 60));
    let outcome = world.release(IVec2::new(40, -5));
    assert_eq!(
        outcome,
        Some(GestureOutcome::RolledBack(RollbackReason::ReleasedOutOfBounds))
    );
    assert_eq!(world.fingerprint(), before);
    assert!(world.props().is_empty());
    world.assert_settled();
}

#[test]
fn test_same_seed_same_result() {
    let draw = || {
        let mut world = TestWorld::with_terrain(9);
        world.draw_road(IVec2::new(20, 4), IVec2::new(20, 100));
        world.draw_road(IVec2::new(4, 50), IVec2::new(100, 50));
        world
    };
    let a = draw();
    let b = draw();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.outcomes(), b.outcomes());
    assert_eq!(prop_spots(&a), prop_spots(&b));
}

#[test]
fn test_refused_props_do_not_fail_the_edit() {
    let mut world = TestWorld::new().with_prop_capacity(2);
    let outcome = world.draw_road(IVec2::new(30, 2), IVec2::new(30, 70));
    assert!(matches!(outcome, Some(GestureOutcome::Committed { .. })));
    assert_eq!(world.props().len(), 2);
    assert_eq!(world.grid().road_cell_count(), 69);
    world.assert_settled();
}

#[test]
fn test_decoration_can_be_switched_off() {
    let config = RoadToolConfig {
        decorate: false,
        ..Default::default()
    };
    let mut world = TestWorld::new().with_config(config);
    world.draw_road(IVec2::new(30, 2), IVec2::new(30, 70));
    assert!(world.props().is_empty());
}

#[test]
fn test_road_signs_follow_configured_chance() {
    let config = RoadToolConfig {
        road_sign_chance: 1.0,
        ..Default::default()
    };
    let mut world = TestWorld::new().with_config(config);
    world.draw_road(IVec2::new(30, 2), IVec2::new(30, 70));
    assert_eq!(world.visible_props(PropKind::Lamppost), 0);
    assert!(world.visible_props(PropKind::RoadSign) > 0);
}

#[test]
fn test_existing_furniture_is_cleared_from_new_road() {
    let mut world = TestWorld::new();
    let lamp = IVec2::new(30, 20);
    world.place_prop(PropKind::Lamppost, lamp, crate::grid::Direction::North);

    // Preview hides it, rollback brings it back.
    world.press(IVec2::new(30, 2));
    world.drag_to(IVec2::new(30, 40));
    assert_eq!(world.visible_props(PropKind::Lamppost), world.props().len() - 1);
    world.release(IVec2::new(30, -1));
    assert_eq!(world.props().len(), 1);
    assert_eq!(world.visible_props(PropKind::Lamppost), 1);

    // Commit removes it for good.
    world.draw_road(IVec2::new(30, 2), IVec2::new(30, 40));
    assert!(world.props().iter().all(|(_, p)| p.pos != lamp));
}

#[test]
fn test_drawing_over_an_existing_road_is_rolled_back() {
    let mut world = TestWorld::new().with_road(IVec2::new(10, 10), IVec2::new(10, 30));
    let before = world.fingerprint();
    let outcome = world.draw_road(IVec2::new(10, 12), IVec2::new(10, 28));
    assert_eq!(
        outcome,
        Some(GestureOutcome::RolledBack(RollbackReason::NothingBuilt))
    );
    assert_eq!(world.fingerprint(), before);
}

#[test]
fn test_hover_highlights_road_under_pointer() {
    let mut world = TestWorld::new().with_road(IVec2::new(10, 10), IVec2::new(10, 30));
    world.hover(IVec2::new(10, 20));
    let selected = world.selection().current().cloned();
    assert!(selected.is_some_and(|s| s.cells.len() == 5));
    assert!(world.cell(IVec2::new(10, 20)).is_emissive());

    world.hover(IVec2::new(50, 50));
    assert!(world.selection().current().is_none());
    assert!(!world.grid().cells.iter().any(|c| c.is_emissive()));
    assert!(world.grid().is_road(IVec2::new(10, 20)));
}
