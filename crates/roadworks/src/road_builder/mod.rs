//! Straight road construction with terrain grading.
//!
//! A build runs in two passes. [`segments`] walks the locked axis and sorts
//! every cell into new ground, existing road or junction footprint. The
//! grading pass then resolves one height per cell, pinned at junctions and
//! eased with smoothstep in between. [`build_road`] writes the result through
//! the edit ledger, regrades the cross streets at every junction and levels
//! the ground along the new road.

mod grading;
mod segments;

use std::collections::HashSet;
use std::fmt;

use bevy::prelude::*;

use crate::config::{APRON_OFFSET, ROAD_HALF_WIDTH};
use crate::grid::{Direction, GridAccess};
use crate::road_topology::{adjacent_sides, geometric_type};
use crate::undo_ledger::EditLedger;

pub use grading::smoothstep;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadBuildError {
    /// Start and end resolve to the same cell.
    DegenerateGesture,
    /// Start or end lies outside the grid.
    OutOfBounds,
    /// Nothing along the line could be built on.
    NoSegments,
}

impl fmt::Display for RoadBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadBuildError::DegenerateGesture => write!(f, "start and end are the same cell"),
            RoadBuildError::OutOfBounds => write!(f, "road endpoint outside the grid"),
            RoadBuildError::NoSegments => write!(f, "no buildable cells along the road"),
        }
    }
}

impl std::error::Error for RoadBuildError {}

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// New road on open ground.
    Edge,
    /// Road already running along our axis; left untouched.
    Existing,
    /// Junction center.
    Node,
    /// Junction footprint on our axis.
    NodeArm,
    /// Junction footprint behind the start of the walk.
    Patch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub pos: IVec2,
    pub kind: SegmentKind,
    /// Smoothed ground height around the cell.
    pub sample: f32,
    /// Entry and exit heights the road is pinned to.
    pub anchor: Option<(f32, f32)>,
    pub height_begin: u8,
    pub height_end: u8,
}

impl Segment {
    pub fn new(pos: IVec2, kind: SegmentKind, sample: f32, anchor: Option<(f32, f32)>) -> Self {
        Self {
            pos,
            kind,
            sample,
            anchor,
            height_begin: 0,
            height_end: 0,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::Node | SegmentKind::NodeArm | SegmentKind::Patch
        )
    }

    pub fn writes_cell(&self) -> bool {
        self.kind != SegmentKind::Existing
    }
}

/// Graded road ready to be written.
#[derive(Debug, Clone)]
pub struct RoadPlan {
    pub heading: Direction,
    pub segments: Vec<Segment>,
    pub junctions: Vec<(IVec2, u8)>,
}

/// What a build wrote.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub heading: Direction,
    /// Road cells written along the drawn line, in travel order, with
    /// whether each one is part of a junction.
    pub road: Vec<(IVec2, bool)>,
    /// Junction centers that survived the build.
    pub junctions: Vec<IVec2>,
    /// Cells whose tile needs resolving.
    pub retile: Vec<IVec2>,
}

/// Snap `end` onto the axis of the drag. Returns the heading and the number
/// of steps from `start`.
pub fn lock_axis(start: IVec2, end: IVec2) -> Result<(Direction, i32), RoadBuildError> {
    let heading = Direction::from_delta(end - start).ok_or(RoadBuildError::DegenerateGesture)?;
    let delta = end - start;
    let length = if heading.is_vertical() {
        delta.y.abs()
    } else {
        delta.x.abs()
    };
    Ok((heading, length))
}

/// Walk and grade without touching the grid.
pub fn plan_road<G: GridAccess + ?Sized>(
    grid: &G,
    start: IVec2,
    end: IVec2,
) -> Result<RoadPlan, RoadBuildError> {
    if !grid.in_bounds(start) || !grid.in_bounds(end) {
        return Err(RoadBuildError::OutOfBounds);
    }
    let (heading, length) = lock_axis(start, end)?;
    let walk = segments::walk(grid, start, heading, length);
    if !walk.segments.iter().any(Segment::writes_cell) {
        return Err(RoadBuildError::NoSegments);
    }
    let mut segments = walk.segments;
    grading::resolve_heights(&mut segments);
    Ok(RoadPlan {
        heading,
        segments,
        junctions: walk.junctions,
    })
}

/// Build a straight road from `start` toward `end` through `ledger`.
pub fn build_road<G: GridAccess + ?Sized>(
    grid: &mut G,
    ledger: &mut EditLedger,
    start: IVec2,
    end: IVec2,
) -> Result<BuildReport, RoadBuildError> {
    let plan = plan_road(&*grid, start, end)?;
    let heading = plan.heading;
    let mut report = BuildReport {
        heading,
        ..Default::default()
    };
    let mut retile: Vec<IVec2> = Vec::new();

    for seg in plan.segments.iter().filter(|s| s.writes_cell()) {
        let (begin, end) = (seg.height_begin, seg.height_end);
        let kind = seg.kind;
        ledger.modify(grid, seg.pos, |cell| {
            if !cell.is_road() {
                cell.make_road(heading);
            }
            cell.set_heights_along(heading, begin, end);
            cell.set_ground_height(begin.min(end));
            match kind {
                SegmentKind::Node => {
                    cell.set_road_node(true);
                    cell.set_node_center(true);
                }
                SegmentKind::NodeArm | SegmentKind::Patch => cell.set_road_node(true),
                SegmentKind::Edge | SegmentKind::Existing => {}
            }
            cell.set_emissive(true);
        });
        report.road.push((seg.pos, seg.is_node()));
        retile.push(seg.pos);

        if kind == SegmentKind::Edge {
            let level = begin.min(end);
            let (left, right) = adjacent_sides(&*grid, seg.pos, heading, 1, true);
            for side in [left, right] {
                if side.cell.is_some_and(|c| c.is_buildable_ground()) {
                    ledger.modify(grid, side.pos, |c| c.set_ground_height(level));
                }
            }
        }
    }

    for &(center, height) in &plan.junctions {
        retile.extend(grading::regrade_cross_street(
            grid, ledger, center, height, heading,
        ));
    }

    for &(center, _) in &plan.junctions {
        if geometric_type(&*grid, center).is_valid() {
            report.junctions.push(center);
            for dir in Direction::ALL {
                // Arms off our line keep their old shape unless resolved again.
                for k in 1..=ROAD_HALF_WIDTH {
                    let arm = center + dir.offset() * k;
                    if grid.is_road(arm) {
                        retile.push(arm);
                    }
                }
                let apron = center + dir.offset() * APRON_OFFSET;
                if grid.is_road(apron) {
                    retile.push(apron);
                }
            }
        } else {
            debug!("junction at {center} has fewer than two arms, clearing it");
            retile.extend(clear_junction(grid, ledger, center));
        }
    }

    let mut seen = HashSet::new();
    retile.retain(|p| seen.insert(*p));
    if let (Some(lo), Some(hi)) = (
        retile.iter().copied().reduce(IVec2::min),
        retile.iter().copied().reduce(IVec2::max),
    ) {
        let (lo, hi) = (lo - IVec2::ONE * 2, hi + IVec2::ONE * 2);
        ledger.snapshot_area(&*grid, lo, hi);
        grid.recompute_ground_adjacency(lo, hi);
    }
    report.retile = retile;

    debug!(
        "built {} road cells heading {:?}, {} junctions",
        report.road.len(),
        heading,
        report.junctions.len()
    );
    Ok(report)
}

/// Drop node flags from a junction that no longer has a valid shape.
fn clear_junction<G: GridAccess + ?Sized>(
    grid: &mut G,
    ledger: &mut EditLedger,
    center: IVec2,
) -> Vec<IVec2> {
    let mut cleared = Vec::new();
    if grid.is_road_node(center) {
        ledger.modify(grid, center, |c| c.set_road_node(false));
        cleared.push(center);
    }
    for dir in Direction::ALL {
        for k in 1..=ROAD_HALF_WIDTH {
            let pos = center + dir.offset() * k;
            if grid.is_road_node(pos) {
                ledger.modify(grid, pos, |c| c.set_road_node(false));
                cleared.push(pos);
            }
        }
    }
    cleared
}
