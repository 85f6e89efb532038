//! Street furniture instances.
//!
//! Props are not part of the cell word; they live in a separate store keyed
//! by handle, the way the 3D instancing layer would hold them. The road
//! engine only talks to it through [`InstancePlacement`].

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropKind {
    Lamppost,
    RoadSign,
    TrafficSign,
    /// Invisible parent grouping the signs of one crossing.
    TrafficController,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropHandle(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct PropInstance {
    pub kind: PropKind,
    pub pos: IVec2,
    pub facing: Direction,
    pub hidden: bool,
    /// Grouped children; only controllers carry any.
    pub members: Vec<PropHandle>,
}

pub trait InstancePlacement {
    /// `None` when the backing store refuses the instance.
    fn place_instance(&mut self, kind: PropKind, pos: IVec2, facing: Direction)
        -> Option<PropHandle>;

    fn destroy_instance_immediately(&mut self, handle: PropHandle);

    /// Hide every visible instance of `kind` inside the inclusive box and
    /// return the handles that were hidden by this call.
    fn hide_instances_in_area(&mut self, min: IVec2, max: IVec2, kind: PropKind)
        -> Vec<PropHandle>;

    fn show_instance(&mut self, handle: PropHandle);

    fn lookup_instance(&self, handle: PropHandle) -> Option<&PropInstance>;

    /// Visible instances of `kind` inside the inclusive box.
    fn find_instances_in_area(&self, min: IVec2, max: IVec2, kind: PropKind) -> Vec<PropHandle>;

    /// Attach `members` to `controller`, skipping ones already attached.
    fn group_under(&mut self, controller: PropHandle, members: &[PropHandle]);
}

#[derive(Resource, Default)]
pub struct PropStore {
    instances: BTreeMap<PropHandle, PropInstance>,
    next_handle: u32,
    capacity: Option<usize>,
}

impl PropStore {
    /// Store that refuses placements beyond `limit` live instances.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            capacity: Some(limit),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropHandle, &PropInstance)> {
        self.instances.iter().map(|(h, p)| (*h, p))
    }

    pub fn count_visible(&self, kind: PropKind) -> usize {
        self.instances
            .values()
            .filter(|p| p.kind == kind && !p.hidden)
            .count()
    }
}

fn in_box(pos: IVec2, min: IVec2, max: IVec2) -> bool {
    pos.x >= min.x && pos.y >= min.y && pos.x <= max.x && pos.y <= max.y
}

impl InstancePlacement for PropStore {
    fn place_instance(
        &mut self,
        kind: PropKind,
        pos: IVec2,
        facing: Direction,
    ) -> Option<PropHandle> {
        if self.capacity.is_some_and(|cap| self.instances.len() >= cap) {
            return None;
        }
        let handle = PropHandle(self.next_handle);
        self.next_handle += 1;
        self.instances.insert(
            handle,
            PropInstance {
                kind,
                pos,
                facing,
                hidden: false,
                members: Vec::new(),
            },
        );
        Some(handle)
    }

    fn destroy_instance_immediately(&mut self, handle: PropHandle) {
        if self.instances.remove(&handle).is_some() {
            for prop in self.instances.values_mut() {
                prop.members.retain(|m| *m != handle);
            }
        }
    }

    fn hide_instances_in_area(
        &mut self,
        min: IVec2,
        max: IVec2,
        kind: PropKind,
    ) -> Vec<PropHandle> {
        let mut hidden = Vec::new();
        for (handle, prop) in self.instances.iter_mut() {
            if prop.kind == kind && !prop.hidden && in_box(prop.pos, min, max) {
                prop.hidden = true;
                hidden.push(*handle);
            }
        }
        hidden
    }

    fn show_instance(&mut self, handle: PropHandle) {
        if let Some(prop) = self.instances.get_mut(&handle) {
            prop.hidden = false;
        }
    }

    fn lookup_instance(&self, handle: PropHandle) -> Option<&PropInstance> {
        self.instances.get(&handle)
    }

    fn find_instances_in_area(&self, min: IVec2, max: IVec2, kind: PropKind) -> Vec<PropHandle> {
        self.instances
            .iter()
            .filter(|(_, p)| p.kind == kind && !p.hidden && in_box(p.pos, min, max))
            .map(|(h, _)| *h)
            .collect()
    }

    fn group_under(&mut self, controller: PropHandle, members: &[PropHandle]) {
        if let Some(parent) = self.instances.get_mut(&controller) {
            for member in members {
                if !parent.members.contains(member) {
                    parent.members.push(*member);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_lookup() {
        let mut store = PropStore::default();
        let h = store
            .place_instance(PropKind::Lamppost, IVec2::new(3, 4), Direction::East)
            .unwrap();
        let prop = store.lookup_instance(h).unwrap();
        assert_eq!(prop.kind, PropKind::Lamppost);
        assert_eq!(prop.pos, IVec2::new(3, 4));
        assert!(!prop.hidden);
    }

    #[test]
    fn test_capacity_limit_refuses() {
        let mut store = PropStore::with_capacity_limit(1);
        assert!(store
            .place_instance(PropKind::Lamppost, IVec2::ZERO, Direction::North)
            .is_some());
        assert!(store
            .place_instance(PropKind::Lamppost, IVec2::ONE, Direction::North)
            .is_none());
    }

    #[test]
    fn test_hide_only_reports_newly_hidden() {
        let mut store = PropStore::default();
        store.place_instance(PropKind::Lamppost, IVec2::new(1, 1), Direction::North);
        store.place_instance(PropKind::RoadSign, IVec2::new(1, 2), Direction::North);
        store.place_instance(PropKind::Lamppost, IVec2::new(9, 9), Direction::North);

        let hidden = store.hide_instances_in_area(IVec2::ZERO, IVec2::new(4, 4), PropKind::Lamppost);
        assert_eq!(hidden.len(), 1);
        let again = store.hide_instances_in_area(IVec2::ZERO, IVec2::new(4, 4), PropKind::Lamppost);
        assert!(again.is_empty());
        assert_eq!(store.count_visible(PropKind::Lamppost), 1);

        store.show_instance(hidden[0]);
        assert_eq!(store.count_visible(PropKind::Lamppost), 2);
    }

    #[test]
    fn test_destroy_removes_from_groups() {
        let mut store = PropStore::default();
        let ctrl = store
            .place_instance(PropKind::TrafficController, IVec2::ZERO, Direction::North)
            .unwrap();
        let sign = store
            .place_instance(PropKind::TrafficSign, IVec2::ONE, Direction::South)
            .unwrap();
        store.group_under(ctrl, &[sign, sign]);
        assert_eq!(store.lookup_instance(ctrl).unwrap().members, vec![sign]);

        store.destroy_instance_immediately(sign);
        assert!(store.lookup_instance(sign).is_none());
        assert!(store.lookup_instance(ctrl).unwrap().members.is_empty());
    }
}
