use bevy::prelude::*;

use crate::config::{ROAD_HALF_WIDTH, ROAD_SEGMENT_WIDTH};
use crate::grid::{Direction, GridAccess, NodeType};

use super::classifier::classify;

/// Nearest junction center inline with `pos` along the road's own heading.
///
/// Sides are walked alternately (ahead first) and a side stops at the first
/// non-road cell. Returns `(pos, Invalid)` when nothing is in reach.
pub fn snap_to_nearest_node<G: GridAccess + ?Sized>(
    grid: &G,
    pos: IVec2,
    extra_distance: i32,
) -> (IVec2, NodeType) {
    let Some(cell) = grid.cell(pos).filter(|c| c.is_road()) else {
        return (pos, NodeType::Invalid);
    };
    let (ty, is_center) = classify(grid, pos, None);
    if is_center {
        return (pos, ty);
    }

    let heading = cell.direction();
    let sides = [heading, heading.opposite()];
    let mut alive = [true, true];
    for k in 1..=ROAD_SEGMENT_WIDTH + extra_distance {
        for (side, open) in sides.iter().zip(alive.iter_mut()) {
            if !*open {
                continue;
            }
            let q = pos + side.offset() * k;
            if !grid.is_road(q) {
                *open = false;
                continue;
            }
            let (ty, is_center) = classify(grid, q, Some(heading));
            if is_center {
                return (q, ty);
            }
        }
        if !alive.iter().any(|a| *a) {
            break;
        }
    }
    (pos, NodeType::Invalid)
}

enum SideEnd {
    /// Ran out of reach with road all the way.
    Open,
    /// Road stops `distance` cells out.
    End { at: IVec2, distance: i32 },
    /// A junction sits at or just past the end of this side.
    Junction,
}

fn walk_to_end<G: GridAccess + ?Sized>(grid: &G, pos: IVec2, side: Direction, reach: i32) -> SideEnd {
    let mut last = pos;
    for k in 1..=reach {
        let q = pos + side.offset() * k;
        if grid.is_road_node(q) {
            return SideEnd::Junction;
        }
        if grid.is_road(q) {
            last = q;
            continue;
        }
        // Straight runs stop short of a junction footprint; look across the gap.
        let bridged = (1..=ROAD_HALF_WIDTH).any(|j| grid.is_road_node(q + side.offset() * j));
        if bridged {
            return SideEnd::Junction;
        }
        return SideEnd::End {
            at: last,
            distance: k - 1,
        };
    }
    SideEnd::Open
}

/// Nearest free end of the straight road through `pos`.
///
/// Junction cells are returned unchanged, as is `pos` when either side runs
/// into a junction or neither end is in reach.
pub fn snap_to_nearest_end<G: GridAccess + ?Sized>(grid: &G, pos: IVec2, extra_distance: i32) -> IVec2 {
    let Some(cell) = grid.cell(pos).filter(|c| c.is_road() && !c.is_road_node()) else {
        return pos;
    };
    let heading = cell.direction();
    let reach = ROAD_SEGMENT_WIDTH + extra_distance;

    let mut best: Option<(IVec2, i32)> = None;
    for side in [heading, heading.opposite()] {
        match walk_to_end(grid, pos, side, reach) {
            SideEnd::Junction => return pos,
            SideEnd::Open => {}
            SideEnd::End { at, distance } => {
                if best.map_or(true, |(_, d)| distance < d) {
                    best = Some((at, distance));
                }
            }
        }
    }
    best.map_or(pos, |(at, _)| at)
}

/// Normalise a user-picked cell: a junction center if one is inline,
/// otherwise the nearest free road end, otherwise the cell itself.
pub fn snap_endpoint<G: GridAccess + ?Sized>(grid: &G, pos: IVec2, extra_distance: i32) -> IVec2 {
    if !grid.is_road(pos) {
        return pos;
    }
    let (node, ty) = snap_to_nearest_node(grid, pos, extra_distance);
    if ty.is_valid() {
        return node;
    }
    snap_to_nearest_end(grid, pos, extra_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WorldGrid;
    use crate::test_harness::{lay_road, mark_junction};

    /// Corner at (20,20) with a horizontal arm running east and a vertical
    /// arm running north, 10 cells each.
    fn corner_grid() -> (WorldGrid, IVec2) {
        let mut g = WorldGrid::new(64, 64);
        let center = IVec2::new(20, 20);
        lay_road(&mut g, center + Direction::East.offset() * 10, center);
        lay_road(&mut g, center + Direction::North.offset(), center + Direction::North.offset() * 10);
        mark_junction(&mut g, center);
        (g, center)
    }

    #[test]
    fn test_snap_node_from_center_is_identity() {
        let (g, center) = corner_grid();
        assert_eq!(snap_to_nearest_node(&g, center, 2), (center, NodeType::CornerBottomLeft));
    }

    #[test]
    fn test_snap_node_walks_inline() {
        let (g, center) = corner_grid();
        let pos = center + Direction::North.offset() * 6;
        assert_eq!(snap_to_nearest_node(&g, pos, 2), (center, NodeType::CornerBottomLeft));
        let too_far = center + Direction::North.offset() * 8;
        assert_eq!(snap_to_nearest_node(&g, too_far, 2), (too_far, NodeType::Invalid));
    }

    #[test]
    fn test_snap_node_off_road() {
        let (g, _) = corner_grid();
        let pos = IVec2::new(50, 50);
        assert_eq!(snap_to_nearest_node(&g, pos, 2), (pos, NodeType::Invalid));
    }

    #[test]
    fn test_snap_end_of_straight_run() {
        let mut g = WorldGrid::new(64, 64);
        lay_road(&mut g, IVec2::new(5, 5), IVec2::new(5, 20));
        assert_eq!(snap_to_nearest_end(&g, IVec2::new(5, 17), 2), IVec2::new(5, 20));
        assert_eq!(snap_to_nearest_end(&g, IVec2::new(5, 7), 2), IVec2::new(5, 5));
        // Middle of a long road: neither end in reach.
        assert_eq!(snap_to_nearest_end(&g, IVec2::new(5, 12), 0), IVec2::new(5, 12));
    }

    #[test]
    fn test_snap_end_bridges_gap_to_junction() {
        let mut g = WorldGrid::new(64, 64);
        let center = IVec2::new(30, 30);
        lay_road(&mut g, center, center);
        lay_road(&mut g, center + Direction::North.offset(), center + Direction::North.offset() * 2);
        lay_road(&mut g, center + Direction::East.offset(), center + Direction::East.offset() * 8);
        mark_junction(&mut g, center);
        // Straight run that stops one cell short of the north footprint.
        let start = center + Direction::North.offset() * 4;
        lay_road(&mut g, start, center + Direction::North.offset() * 9);
        let pos = center + Direction::North.offset() * 6;
        assert_eq!(snap_to_nearest_end(&g, pos, 2), pos);
    }

    #[test]
    fn test_snap_endpoint_prefers_node() {
        let (g, center) = corner_grid();
        let pos = center + Direction::East.offset() * 3;
        assert_eq!(snap_endpoint(&g, pos, 2), center);
        let ground = IVec2::new(2, 2);
        assert_eq!(snap_endpoint(&g, ground, 2), ground);
    }
}
