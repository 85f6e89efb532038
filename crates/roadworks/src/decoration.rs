//! Street furniture along freshly built roads.
//!
//! Runs after tiles are final. Furniture near junctions and on the new road
//! surface is hidden first; then the edit is walked back to front, putting
//! traffic signs on every crossing and lampposts (now and then a road sign)
//! along plain stretches.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{APRON_OFFSET, JUNCTION_CLEARANCE, LAMP_INTERVAL, ROAD_HALF_WIDTH};
use crate::grid::{Direction, GridAccess};
use crate::props::{InstancePlacement, PropHandle, PropKind};
use crate::road_builder::BuildReport;
use crate::road_topology::classify;
use crate::undo_ledger::EditLedger;

/// Kinds that a road edit may push out of the way.
const RETRACTABLE: [PropKind; 2] = [PropKind::Lamppost, PropKind::RoadSign];

/// Half extent of the box searched for furniture before placing more.
const FURNITURE_SPACING: i32 = 2 * ROAD_HALF_WIDTH;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecorationStats {
    pub hidden: usize,
    pub lampposts: usize,
    pub road_signs: usize,
    pub traffic_signs: usize,
    pub refused: usize,
}

struct Decorator<'a, G: ?Sized, P: ?Sized> {
    grid: &'a mut G,
    props: &'a mut P,
    ledger: &'a mut EditLedger,
    stats: DecorationStats,
}

impl<G: GridAccess + ?Sized, P: InstancePlacement + ?Sized> Decorator<'_, G, P> {
    fn place(&mut self, kind: PropKind, pos: IVec2, facing: Direction) -> Option<PropHandle> {
        match self.props.place_instance(kind, pos, facing) {
            Some(handle) => {
                self.ledger.record_placed(handle);
                Some(handle)
            }
            None => {
                warn!("could not place {kind:?} at {pos}, skipping");
                self.stats.refused += 1;
                None
            }
        }
    }

    fn hide_area(&mut self, min: IVec2, max: IVec2) {
        for kind in RETRACTABLE {
            let hidden = self.props.hide_instances_in_area(min, max, kind);
            self.stats.hidden += hidden.len();
            self.ledger.record_hidden(hidden);
        }
    }

    fn level_to(&mut self, pos: IVec2, height: u8) {
        if self.grid.cell(pos).is_some_and(|c| !c.is_road()) {
            self.ledger
                .modify(self.grid, pos, |c| c.set_ground_height(height));
        }
    }

    /// One traffic sign per arm just past the apron, grouped under the
    /// crossing's controller.
    fn signal_crossing(&mut self, center: IVec2) {
        let (ty, _) = classify(&*self.grid, center, None);
        let mut new_signs = Vec::new();
        for arm in ty.arms() {
            let apron = center + arm.offset() * APRON_OFFSET;
            let spot = apron + arm.right().offset();
            if !self
                .props
                .find_instances_in_area(spot, spot, PropKind::TrafficSign)
                .is_empty()
            {
                continue;
            }
            if let Some(h) = self.grid.current_height_at(apron) {
                self.level_to(spot, h);
            }
            if let Some(sign) = self.place(PropKind::TrafficSign, spot, arm.opposite()) {
                self.stats.traffic_signs += 1;
                new_signs.push(sign);
            }
        }
        if new_signs.is_empty() {
            return;
        }
        let controller = self
            .props
            .find_instances_in_area(center, center, PropKind::TrafficController)
            .first()
            .copied()
            .or_else(|| self.place(PropKind::TrafficController, center, Direction::North));
        if let Some(controller) = controller {
            self.props.group_under(controller, &new_signs);
        }
    }

    fn furnish_edge<R: Rng + ?Sized>(
        &mut self,
        pos: IVec2,
        side: Direction,
        rng: &mut R,
        road_sign_chance: f32,
    ) {
        let spot = pos + side.offset();
        if !self.grid.cell(spot).is_some_and(|c| c.is_buildable_ground()) {
            return;
        }
        let min = spot - IVec2::splat(FURNITURE_SPACING);
        let max = spot + IVec2::splat(FURNITURE_SPACING);
        let crowded = RETRACTABLE
            .iter()
            .any(|kind| !self.props.find_instances_in_area(min, max, *kind).is_empty());
        if crowded {
            return;
        }
        let facing = self.grid.cell(pos).map_or(side, |c| c.direction());
        if rng.gen::<f32>() < road_sign_chance {
            if self.place(PropKind::RoadSign, spot, facing).is_some() {
                self.stats.road_signs += 1;
            }
        } else if self.place(PropKind::Lamppost, spot, facing).is_some() {
            self.stats.lampposts += 1;
        }
    }
}

/// Decorate the cells of `report`. Placement failures are skipped.
pub fn decorate<G, P, R>(
    grid: &mut G,
    props: &mut P,
    ledger: &mut EditLedger,
    report: &BuildReport,
    rng: &mut R,
    road_sign_chance: f32,
) -> DecorationStats
where
    G: GridAccess + ?Sized,
    P: InstancePlacement + ?Sized,
    R: Rng + ?Sized,
{
    let mut deco = Decorator {
        grid,
        props,
        ledger,
        stats: DecorationStats::default(),
    };

    for &center in &report.junctions {
        let reach = IVec2::splat(JUNCTION_CLEARANCE);
        deco.hide_area(center - reach, center + reach);
    }
    for &(pos, _) in &report.road {
        deco.hide_area(pos, pos);
    }

    let near_junction = |pos: IVec2| {
        report
            .junctions
            .iter()
            .any(|c| (*c - pos).abs().max_element() <= JUNCTION_CLEARANCE)
    };

    let mut side = report.heading.left();
    let mut edge_count = 0usize;
    for &(pos, is_node) in report.road.iter().rev() {
        if is_node {
            let (ty, is_center) = classify(&*deco.grid, pos, None);
            if is_center && ty.is_crossing() {
                deco.signal_crossing(pos);
            }
            continue;
        }
        edge_count += 1;
        if edge_count % LAMP_INTERVAL != 0 {
            continue;
        }
        side = side.opposite();
        if near_junction(pos) {
            continue;
        }
        deco.furnish_edge(pos, side, rng, road_sign_chance);
    }

    debug!("decoration: {:?}", deco.stats);
    deco.stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WorldGrid;
    use crate::props::PropStore;
    use crate::road_builder::build_road;
    use crate::sim_rng::drag_rng;

    #[test]
    fn test_lampposts_along_a_long_road() {
        let mut grid = WorldGrid::new(64, 64);
        let mut props = PropStore::default();
        let mut ledger = EditLedger::default();
        let report = build_road(&mut grid, &mut ledger, IVec2::new(30, 1), IVec2::new(30, 60)).unwrap();
        let stats = decorate(&mut grid, &mut props, &mut ledger, &report, &mut drag_rng(1), 0.0);

        // 60 edge cells, one attempt every 10.
        assert_eq!(stats.lampposts, 6);
        assert_eq!(stats.road_signs, 0);
        for (_, prop) in props.iter() {
            assert_eq!((prop.pos.x - 30).abs(), 1, "lamp not beside the road");
            assert!(!grid.is_road(prop.pos));
        }
        let left = props.iter().filter(|(_, p)| p.pos.x == 31).count();
        assert_eq!(left, 3, "sides should alternate");
    }

    #[test]
    fn test_road_sign_chance_one_places_only_signs() {
        let mut grid = WorldGrid::new(64, 64);
        let mut props = PropStore::default();
        let mut ledger = EditLedger::default();
        let report = build_road(&mut grid, &mut ledger, IVec2::new(30, 1), IVec2::new(30, 60)).unwrap();
        let stats = decorate(&mut grid, &mut props, &mut ledger, &report, &mut drag_rng(1), 1.0);
        assert_eq!(stats.lampposts, 0);
        assert_eq!(stats.road_signs, 6);
    }

    #[test]
    fn test_refused_placement_is_skipped() {
        let mut grid = WorldGrid::new(64, 64);
        let mut props = PropStore::with_capacity_limit(2);
        let mut ledger = EditLedger::default();
        let report = build_road(&mut grid, &mut ledger, IVec2::new(30, 1), IVec2::new(30, 60)).unwrap();
        let stats = decorate(&mut grid, &mut props, &mut ledger, &report, &mut drag_rng(1), 0.0);
        assert_eq!(stats.lampposts, 2);
        assert_eq!(stats.refused, 4);
        assert_eq!(ledger.placed().len(), 2);
    }

    #[test]
    fn test_props_on_the_new_road_are_hidden() {
        let mut grid = WorldGrid::new(64, 64);
        let mut props = PropStore::default();
        let old = props
            .place_instance(PropKind::Lamppost, IVec2::new(30, 12), Direction::North)
            .unwrap();
        let mut ledger = EditLedger::default();
        let report = build_road(&mut grid, &mut ledger, IVec2::new(30, 1), IVec2::new(30, 20)).unwrap();
        let stats = decorate(&mut grid, &mut props, &mut ledger, &report, &mut drag_rng(1), 0.0);
        assert_eq!(stats.hidden, 1);
        assert!(props.lookup_instance(old).unwrap().hidden);
    }
}
