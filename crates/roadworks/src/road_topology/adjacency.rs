use bevy::prelude::*;

use crate::grid::{Cell, Direction, GridAccess};

/// One probed neighbour. `cell` is `None` outside the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub pos: IVec2,
    pub cell: Option<Cell>,
}

impl Probe {
    pub fn at<G: GridAccess + ?Sized>(grid: &G, pos: IVec2) -> Self {
        Self {
            pos,
            cell: grid.cell(pos),
        }
    }

    pub fn is_road(&self) -> bool {
        self.cell.is_some_and(|c| c.is_road())
    }
}

/// Cells `offset` steps to either side of `heading` (left, right) when
/// `perpendicular`, otherwise ahead and behind along it.
pub fn adjacent_sides<G: GridAccess + ?Sized>(
    grid: &G,
    pos: IVec2,
    heading: Direction,
    offset: i32,
    perpendicular: bool,
) -> (Probe, Probe) {
    let (a, b) = if perpendicular {
        (heading.left(), heading.right())
    } else {
        (heading, heading.opposite())
    };
    (
        Probe::at(grid, pos + a.offset() * offset),
        Probe::at(grid, pos + b.offset() * offset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WorldGrid;

    #[test]
    fn test_perpendicular_sides_of_vertical_heading_are_horizontal() {
        let grid = WorldGrid::new(16, 16);
        let pos = IVec2::new(8, 8);
        let (a, b) = adjacent_sides(&grid, pos, Direction::North, 2, true);
        assert_eq!(a.pos.y, pos.y);
        assert_eq!(b.pos.y, pos.y);
        assert_eq!((a.pos.x - b.pos.x).abs(), 4);
    }

    #[test]
    fn test_inline_sides_are_ahead_then_behind() {
        let grid = WorldGrid::new(16, 16);
        let pos = IVec2::new(8, 8);
        let (ahead, behind) = adjacent_sides(&grid, pos, Direction::North, 3, false);
        assert_eq!(ahead.pos, IVec2::new(8, 11));
        assert_eq!(behind.pos, IVec2::new(8, 5));
    }

    #[test]
    fn test_absent_outside_grid() {
        let grid = WorldGrid::new(4, 4);
        let (ahead, behind) = adjacent_sides(&grid, IVec2::new(0, 0), Direction::South, 1, false);
        assert!(ahead.cell.is_none());
        assert!(behind.cell.is_some());
        assert!(!ahead.is_road());
    }
}
