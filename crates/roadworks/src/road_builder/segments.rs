use bevy::prelude::*;

use crate::config::ROAD_HALF_WIDTH;
use crate::grid::{Cell, Direction, GridAccess};
use crate::road_topology::locate_junction;

use super::{Segment, SegmentKind};

/// First pass: the cells the road will run over, in travel order.
pub(super) struct Walk {
    pub segments: Vec<Segment>,
    /// Junction centers crossed, with their anchor height.
    pub junctions: Vec<(IVec2, u8)>,
}

struct Walker<'a, G: GridAccess + ?Sized> {
    grid: &'a G,
    heading: Direction,
    segments: Vec<Segment>,
    junctions: Vec<(IVec2, u8)>,
    /// Cells still to flatten after a junction, and their height.
    window: Option<(i32, f32)>,
}

impl<'a, G: GridAccess + ?Sized> Walker<'a, G> {
    fn ground_sample(&self, pos: IVec2) -> f32 {
        let step = self.heading.offset();
        let heights: Vec<f32> = [pos - step, pos, pos + step]
            .into_iter()
            .filter_map(|p| self.grid.current_height_at(p))
            .map(f32::from)
            .collect();
        if heights.is_empty() {
            0.0
        } else {
            heights.iter().sum::<f32>() / heights.len() as f32
        }
    }

    fn push(&mut self, pos: IVec2, kind: SegmentKind, sample: f32, anchor: Option<(f32, f32)>) {
        self.segments.push(Segment::new(pos, kind, sample, anchor));
    }

    /// Open an intersection window at `pos`.
    fn open_junction(&mut self, pos: IVec2, height: f32) {
        let flat = Some((height, height));
        // Flatten the arm we arrived on.
        for seg in self.segments.iter_mut().rev() {
            let distance = (seg.pos - pos).abs().max_element();
            if distance > ROAD_HALF_WIDTH {
                break;
            }
            if seg.kind != SegmentKind::Patch {
                seg.kind = SegmentKind::NodeArm;
            }
            seg.anchor = flat;
        }

        if self.segments.is_empty() {
            // Walk begins on the junction: pick up the arm behind it too.
            for k in (1..=ROAD_HALF_WIDTH).rev() {
                let q = pos - self.heading.offset() * k;
                let behind = self
                    .grid
                    .cell(q)
                    .is_some_and(|c| c.is_road() && c.direction().same_axis(self.heading));
                if behind {
                    self.push(q, SegmentKind::Patch, height, flat);
                }
            }
        }

        self.push(pos, SegmentKind::Node, height, flat);
        self.junctions.push((pos, height.round().clamp(0.0, 255.0) as u8));
        self.window = Some((ROAD_HALF_WIDTH, height));
    }

    /// Returns false when the walk has to stop at `pos`.
    fn visit(&mut self, pos: IVec2, cell: Cell) -> bool {
        if let Some((remaining, height)) = self.window.filter(|(r, _)| *r > 0) {
            let continues_arm = cell.is_buildable_ground()
                || (cell.is_road() && cell.direction().same_axis(self.heading) && !cell.is_node_center());
            if !continues_arm {
                return false;
            }
            self.push(pos, SegmentKind::NodeArm, height, Some((height, height)));
            self.window = Some((remaining - 1, height));
            return true;
        }

        if cell.is_buildable_ground() {
            let sample = self.ground_sample(pos);
            self.push(pos, SegmentKind::Edge, sample, None);
            return true;
        }
        if !cell.is_road() {
            return false;
        }

        if cell.is_road_node() {
            if cell.is_node_center() {
                self.open_junction(pos, cell.road_mid_height() as f32);
                return true;
            }
            // Footprint of a junction further along our line.
            return match locate_junction(self.grid, pos, self.heading) {
                Some((center, _)) => {
                    let h = self
                        .grid
                        .cell(center)
                        .map_or(cell.road_mid_height(), |c| c.road_mid_height()) as f32;
                    self.push(pos, SegmentKind::NodeArm, h, Some((h, h)));
                    true
                }
                None => false,
            };
        }

        if cell.direction().same_axis(self.heading) {
            let near = cell.height_toward(self.heading.opposite()) as f32;
            let far = cell.height_toward(self.heading) as f32;
            self.push(pos, SegmentKind::Existing, near, Some((near, far)));
            return true;
        }

        // Straight road across our path becomes a junction.
        self.open_junction(pos, cell.road_mid_height() as f32);
        true
    }
}

/// Walk `length + 1` cells from `start` along `heading`, stopping early at
/// anything a road cannot go through.
pub(super) fn walk<G: GridAccess + ?Sized>(
    grid: &G,
    start: IVec2,
    heading: Direction,
    length: i32,
) -> Walk {
    let mut walker = Walker {
        grid,
        heading,
        segments: Vec::new(),
        junctions: Vec::new(),
        window: None,
    };
    for k in 0..=length {
        let pos = start + heading.offset() * k;
        let Some(cell) = grid.cell(pos) else {
            debug!("road walk left the grid at {pos}");
            break;
        };
        if !walker.visit(pos, cell) {
            debug!("road walk blocked at {pos}");
            break;
        }
    }
    Walk {
        segments: walker.segments,
        junctions: walker.junctions,
    }
}
