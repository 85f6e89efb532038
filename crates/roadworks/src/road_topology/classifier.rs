use bevy::prelude::*;

use crate::config::{NODE_PROBE_OFFSET, ROAD_HALF_WIDTH};
use crate::grid::{Direction, GridAccess, NodeType};

/// Road continues `remaining` more cells past `pos` in `dir`. Only road
/// running along `dir` counts, so a parallel street next to the probe does
/// not read as an arm.
fn probe_arm<G: GridAccess + ?Sized>(grid: &G, pos: IVec2, dir: Direction, remaining: i32) -> bool {
    match grid.cell(pos) {
        Some(cell) if cell.is_road() && cell.direction().same_axis(dir) => true,
        Some(_) if remaining > 0 => probe_arm(grid, pos + dir.offset(), dir, remaining - 1),
        _ => false,
    }
}

pub fn arm_present<G: GridAccess + ?Sized>(grid: &G, pos: IVec2, dir: Direction) -> bool {
    probe_arm(
        grid,
        pos + dir.offset() * NODE_PROBE_OFFSET,
        dir,
        ROAD_HALF_WIDTH,
    )
}

/// Junction shape implied by the road around `pos`, ignoring node flags.
pub fn geometric_type<G: GridAccess + ?Sized>(grid: &G, pos: IVec2) -> NodeType {
    if !grid.is_road(pos) {
        return NodeType::Invalid;
    }
    NodeType::from_arms(
        arm_present(grid, pos, Direction::North),
        arm_present(grid, pos, Direction::East),
        arm_present(grid, pos, Direction::South),
        arm_present(grid, pos, Direction::West),
    )
}

fn is_center_at<G: GridAccess + ?Sized>(grid: &G, pos: IVec2) -> Option<NodeType> {
    let cell = grid.cell(pos)?;
    if !(cell.is_road_node() && cell.is_node_center()) {
        return None;
    }
    let ty = geometric_type(grid, pos);
    ty.is_valid().then_some(ty)
}

/// Center of the junction whose footprint contains `pos`, searching inline
/// along `heading` (nearest first, ahead before behind).
pub fn locate_junction<G: GridAccess + ?Sized>(
    grid: &G,
    pos: IVec2,
    heading: Direction,
) -> Option<(IVec2, NodeType)> {
    if let Some(ty) = is_center_at(grid, pos) {
        return Some((pos, ty));
    }
    if !grid.is_road_node(pos) {
        return None;
    }
    for k in 1..=ROAD_HALF_WIDTH {
        for side in [heading, heading.opposite()] {
            let q = pos + side.offset() * k;
            if let Some(ty) = is_center_at(grid, q) {
                return Some((q, ty));
            }
        }
    }
    None
}

/// Classify `pos` as a junction. The flag is set only for the exact center.
///
/// Footprint cells report the type of the junction they belong to. Pass
/// `None` to search along the cell's own recorded heading.
pub fn classify<G: GridAccess + ?Sized>(
    grid: &G,
    pos: IVec2,
    heading: Option<Direction>,
) -> (NodeType, bool) {
    let Some(cell) = grid.cell(pos).filter(|c| c.is_road()) else {
        return (NodeType::Invalid, false);
    };
    let ty = geometric_type(grid, pos);
    if ty.is_valid() {
        return (ty, cell.is_road_node() && cell.is_node_center());
    }
    if cell.is_road_node() {
        let heading = heading.unwrap_or(cell.direction());
        if let Some((_, ty)) = locate_junction(grid, pos, heading) {
            return (ty, false);
        }
    }
    (NodeType::Invalid, false)
}
