//! Tile selection for road cells.
//!
//! Straight edges get the straight tile, except the cell exactly one apron
//! offset from a crossing. Crossing footprints are flat. Corner footprints
//! are five cells bent into an L and each cell picks one of five curve tiles
//! from the atlas block of its corner variant.

use bevy::prelude::*;

use crate::config::{
    APRON_OFFSET, ROAD_HALF_WIDTH, ROAD_SEGMENT_WIDTH, TILE_APRON, TILE_CROSSING, TILE_CURVE_FIRST,
    TILE_STRAIGHT,
};
use crate::grid::{Direction, GridAccess, NodeType};
use crate::road_topology::{classify, locate_junction, snap_to_nearest_node};
use crate::undo_ledger::EditLedger;

/// Resolved appearance of one road cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChoice {
    pub tile: u8,
    pub node_type: NodeType,
    pub is_center: bool,
}

impl TileChoice {
    const STRAIGHT: TileChoice = TileChoice {
        tile: TILE_STRAIGHT,
        node_type: NodeType::Invalid,
        is_center: false,
    };
}

/// Position along a corner's L, `0..ROAD_SEGMENT_WIDTH`.
///
/// `distance` is the number of cells to the corner center. Cells travelling
/// horizontally count down toward the center, vertical ones count up away
/// from it. The bottom-left and top-right atlas blocks are drawn mirrored.
fn curve_index(ty: NodeType, heading: Direction, distance: i32) -> u8 {
    let k = distance.clamp(0, ROAD_HALF_WIDTH);
    let index = if heading.is_vertical() {
        ROAD_HALF_WIDTH + k
    } else {
        ROAD_HALF_WIDTH - k
    };
    let index = match ty {
        NodeType::CornerBottomLeft | NodeType::CornerTopRight => ROAD_SEGMENT_WIDTH - 1 - index,
        _ => index,
    };
    index as u8
}

/// Pick the tile for a road cell. Pure; reads the grid only.
pub fn resolve_tile<G: GridAccess + ?Sized>(
    grid: &G,
    pos: IVec2,
    heading: Direction,
    is_node: bool,
) -> TileChoice {
    if !is_node {
        let (node, ty) = snap_to_nearest_node(grid, pos, 1);
        let distance = (node - pos).abs();
        if ty.is_crossing() && distance.x + distance.y == APRON_OFFSET {
            return TileChoice {
                tile: TILE_APRON,
                ..TileChoice::STRAIGHT
            };
        }
        return TileChoice::STRAIGHT;
    }

    let (ty, is_center) = classify(grid, pos, Some(heading));
    if ty.is_crossing() {
        return TileChoice {
            tile: TILE_CROSSING,
            node_type: ty,
            is_center,
        };
    }
    if let Some(ordinal) = ty.corner_ordinal() {
        let distance = locate_junction(grid, pos, heading)
            .map(|(center, _)| (center - pos).abs().max_element())
            .unwrap_or(0);
        let tile = TILE_CURVE_FIRST + ordinal * ROAD_SEGMENT_WIDTH as u8
            + curve_index(ty, heading, distance);
        return TileChoice {
            tile,
            node_type: ty,
            is_center,
        };
    }
    TileChoice::STRAIGHT
}

/// Resolve every cell in `cells` against the current grid, then write the
/// results. Returns the number of cells written.
pub fn retile_cells<G: GridAccess + ?Sized>(
    grid: &mut G,
    ledger: &mut EditLedger,
    cells: &[IVec2],
) -> usize {
    let choices: Vec<(IVec2, TileChoice)> = cells
        .iter()
        .filter_map(|&pos| {
            let cell = grid.cell(pos).filter(|c| c.is_road())?;
            Some((pos, resolve_tile(grid, pos, cell.direction(), cell.is_road_node())))
        })
        .collect();

    for &(pos, choice) in &choices {
        ledger.modify(grid, pos, |cell| {
            cell.set_tile(choice.tile);
            cell.set_node_type(choice.node_type);
        });
    }
    choices.len()
}
