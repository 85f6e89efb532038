//! Packed grid cell.
//!
//! Every road/terrain attribute of a cell lives in one `u64` word. The bit
//! layout below is the single place that knows shifts and masks; everything
//! else goes through the named accessors on [`Cell`].

use serde::{Deserialize, Serialize};

use crate::config::DYNAMIC_OWNER_SLOTS;

use super::direction::Direction;
use super::node_type::NodeType;

// ---------------------------------------------------------------------------
// Bit layout
// ---------------------------------------------------------------------------

mod layout {
    /// `(shift, mask)` pairs; masks are applied after shifting down.
    pub const KIND: (u32, u64) = (0, 0x1);
    pub const TAG: (u32, u64) = (1, 0x3);
    pub const ROAD_NODE: (u32, u64) = (3, 0x1);
    pub const NODE_CENTER: (u32, u64) = (4, 0x1);
    pub const DIRECTION: (u32, u64) = (5, 0x3);
    pub const HEIGHT_BEGIN: (u32, u64) = (7, 0xff);
    pub const HEIGHT_END: (u32, u64) = (15, 0xff);
    pub const TILE: (u32, u64) = (23, 0xff);
    pub const NODE_TYPE: (u32, u64) = (31, 0xf);
    pub const GROUND_HEIGHT: (u32, u64) = (35, 0xff);
    pub const GROUND_SHADE: (u32, u64) = (43, 0xf);
    pub const PENDING: (u32, u64) = (47, 0x1);
    pub const EMISSIVE: (u32, u64) = (48, 0x1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Ground,
    /// Road and other overlays; see [`CellTag`].
    Extended,
}

/// Sub-tag of an extended cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellTag {
    #[default]
    None,
    Road,
    Water,
    Structure,
}

/// Opaque reference to whatever occupies a cell (building, prop group, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupantId(pub u32);

impl OccupantId {
    /// Static occupant of every road cell.
    pub const ROAD: OccupantId = OccupantId(u32::MAX - 1);
}

/// One static occupant plus a few dynamic ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnerSlots {
    pub static_slot: Option<OccupantId>,
    pub dynamic: [Option<OccupantId>; DYNAMIC_OWNER_SLOTS],
}

impl OwnerSlots {
    pub fn has_static(&self) -> bool {
        self.static_slot.is_some()
    }

    pub fn dynamic_count(&self) -> usize {
        self.dynamic.iter().filter(|s| s.is_some()).count()
    }

    /// Put `id` in the first free dynamic slot. Returns false when all are taken.
    pub fn add_dynamic(&mut self, id: OccupantId) -> bool {
        match self.dynamic.iter_mut().find(|s| s.is_none()) {
            Some(slot) => {
                *slot = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn remove_dynamic(&mut self, id: OccupantId) {
        for slot in self.dynamic.iter_mut() {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    packed: u64,
    pub owners: OwnerSlots,
}

impl Cell {
    #[inline]
    fn field(&self, (shift, mask): (u32, u64)) -> u64 {
        (self.packed >> shift) & mask
    }

    #[inline]
    fn set_field(&mut self, (shift, mask): (u32, u64), value: u64) {
        self.packed = (self.packed & !(mask << shift)) | ((value & mask) << shift);
    }

    #[inline]
    fn flag(&self, field: (u32, u64)) -> bool {
        self.field(field) != 0
    }

    #[inline]
    fn set_flag(&mut self, field: (u32, u64), on: bool) {
        self.set_field(field, on as u64);
    }

    /// Raw packed word, used for hashing.
    pub fn packed(&self) -> u64 {
        self.packed
    }

    /// Ground cell at the given terrain step.
    pub fn ground(height: u8) -> Self {
        let mut cell = Self::default();
        cell.set_ground_height(height);
        cell
    }

    pub fn water(height: u8) -> Self {
        let mut cell = Self::ground(height);
        cell.set_kind(CellKind::Extended);
        cell.set_tag(CellTag::Water);
        cell
    }

    // --- kind / tag ---------------------------------------------------------

    pub fn kind(&self) -> CellKind {
        match self.field(layout::KIND) {
            0 => CellKind::Ground,
            _ => CellKind::Extended,
        }
    }

    pub fn set_kind(&mut self, kind: CellKind) {
        self.set_field(layout::KIND, kind as u64);
    }

    pub fn tag(&self) -> CellTag {
        match self.field(layout::TAG) {
            1 => CellTag::Road,
            2 => CellTag::Water,
            3 => CellTag::Structure,
            _ => CellTag::None,
        }
    }

    pub fn set_tag(&mut self, tag: CellTag) {
        self.set_field(layout::TAG, tag as u64);
    }

    #[inline]
    pub fn is_road(&self) -> bool {
        self.kind() == CellKind::Extended && self.tag() == CellTag::Road
    }

    /// Turn the cell into a road piece, keeping heights and ground. The road
    /// takes the static owner slot; dynamic occupants stay.
    pub fn make_road(&mut self, direction: Direction) {
        self.set_kind(CellKind::Extended);
        self.set_tag(CellTag::Road);
        self.set_direction(direction);
        self.owners.static_slot = Some(OccupantId::ROAD);
    }

    /// Plain ground that a road may be laid on.
    pub fn is_buildable_ground(&self) -> bool {
        self.kind() == CellKind::Ground && !self.owners.has_static()
    }

    #[inline]
    pub fn is_road_node(&self) -> bool {
        self.is_road() && self.flag(layout::ROAD_NODE)
    }

    pub fn set_road_node(&mut self, on: bool) {
        self.set_flag(layout::ROAD_NODE, on);
        if !on {
            self.set_node_center(false);
            self.set_node_type(NodeType::Invalid);
        }
    }

    pub fn is_node_center(&self) -> bool {
        self.flag(layout::NODE_CENTER)
    }

    pub fn set_node_center(&mut self, on: bool) {
        self.set_flag(layout::NODE_CENTER, on);
    }

    // --- road attributes ----------------------------------------------------

    pub fn direction(&self) -> Direction {
        Direction::from_bits(self.field(layout::DIRECTION))
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.set_field(layout::DIRECTION, direction.to_bits());
    }

    pub fn height_begin(&self) -> u8 {
        self.field(layout::HEIGHT_BEGIN) as u8
    }

    pub fn height_end(&self) -> u8 {
        self.field(layout::HEIGHT_END) as u8
    }

    pub fn set_heights(&mut self, begin: u8, end: u8) {
        self.set_field(layout::HEIGHT_BEGIN, begin as u64);
        self.set_field(layout::HEIGHT_END, end as u64);
    }

    /// Store heights given in travel order along `heading`, swapping them
    /// when the cell itself was drawn the other way.
    pub fn set_heights_along(&mut self, heading: Direction, first: u8, second: u8) {
        if self.direction() == heading.opposite() {
            self.set_heights(second, first);
        } else {
            self.set_heights(first, second);
        }
    }

    /// Road height at the side of the cell reached when travelling `heading`.
    pub fn height_toward(&self, heading: Direction) -> u8 {
        if self.direction() == heading {
            self.height_end()
        } else if self.direction() == heading.opposite() {
            self.height_begin()
        } else {
            self.road_mid_height()
        }
    }

    pub fn road_mid_height(&self) -> u8 {
        ((self.height_begin() as u16 + self.height_end() as u16 + 1) / 2) as u8
    }

    pub fn tile(&self) -> u8 {
        self.field(layout::TILE) as u8
    }

    pub fn set_tile(&mut self, tile: u8) {
        self.set_field(layout::TILE, tile as u64);
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::from_bits(self.field(layout::NODE_TYPE))
    }

    pub fn set_node_type(&mut self, node_type: NodeType) {
        self.set_field(layout::NODE_TYPE, node_type.to_bits());
    }

    // --- terrain ------------------------------------------------------------

    pub fn ground_height(&self) -> u8 {
        self.field(layout::GROUND_HEIGHT) as u8
    }

    pub fn set_ground_height(&mut self, height: u8) {
        self.set_field(layout::GROUND_HEIGHT, height as u64);
    }

    /// Bitmask of cardinal neighbours standing higher than this cell, in
    /// `Direction::ALL` order.
    pub fn ground_shade(&self) -> u8 {
        self.field(layout::GROUND_SHADE) as u8
    }

    pub fn set_ground_shade(&mut self, mask: u8) {
        self.set_field(layout::GROUND_SHADE, mask as u64);
    }

    // --- transient flags ----------------------------------------------------

    pub fn is_pending(&self) -> bool {
        self.flag(layout::PENDING)
    }

    pub fn set_pending(&mut self, on: bool) {
        self.set_flag(layout::PENDING, on);
    }

    pub fn is_emissive(&self) -> bool {
        self.flag(layout::EMISSIVE)
    }

    pub fn set_emissive(&mut self, on: bool) {
        self.set_flag(layout::EMISSIVE, on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_is_flat_ground() {
        let cell = Cell::default();
        assert_eq!(cell.kind(), CellKind::Ground);
        assert!(!cell.is_road());
        assert!(cell.is_buildable_ground());
        assert_eq!(cell.node_type(), NodeType::Invalid);
        assert_eq!(cell.ground_height(), 0);
    }

    #[test]
    fn test_fields_do_not_bleed_into_each_other() {
        let mut cell = Cell::ground(200);
        cell.make_road(Direction::West);
        cell.set_heights(255, 7);
        cell.set_tile(0xff);
        cell.set_node_type(NodeType::XingAll);
        cell.set_ground_shade(0xf);
        cell.set_pending(true);

        assert!(cell.is_road());
        assert_eq!(cell.direction(), Direction::West);
        assert_eq!(cell.height_begin(), 255);
        assert_eq!(cell.height_end(), 7);
        assert_eq!(cell.tile(), 0xff);
        assert_eq!(cell.node_type(), NodeType::XingAll);
        assert_eq!(cell.ground_height(), 200);
        assert_eq!(cell.ground_shade(), 0xf);
        assert!(cell.is_pending());
        assert!(!cell.is_emissive());
        assert!(!cell.is_road_node());

        cell.set_heights(0, 0);
        assert_eq!(cell.tile(), 0xff, "clearing heights must not touch the tile");
        assert_eq!(cell.ground_height(), 200);
    }

    #[test]
    fn test_clearing_node_flag_resets_classification() {
        let mut cell = Cell::default();
        cell.make_road(Direction::North);
        cell.set_road_node(true);
        cell.set_node_center(true);
        cell.set_node_type(NodeType::CornerTopLeft);
        assert!(cell.is_road_node());

        cell.set_road_node(false);
        assert!(!cell.is_node_center());
        assert_eq!(cell.node_type(), NodeType::Invalid);
    }

    #[test]
    fn test_height_toward_follows_heading() {
        let mut cell = Cell::default();
        cell.make_road(Direction::North);
        cell.set_heights(2, 6);
        assert_eq!(cell.height_toward(Direction::North), 6);
        assert_eq!(cell.height_toward(Direction::South), 2);
        assert_eq!(cell.height_toward(Direction::East), 4);
    }

    #[test]
    fn test_water_and_structures_are_not_buildable() {
        assert!(!Cell::water(3).is_buildable_ground());
        let mut cell = Cell::ground(0);
        cell.owners.static_slot = Some(OccupantId(9));
        assert!(!cell.is_buildable_ground());
    }

    #[test]
    fn test_road_claims_static_slot_only() {
        let mut cell = Cell::ground(1);
        assert!(cell.owners.add_dynamic(OccupantId(4)));
        cell.make_road(Direction::East);
        assert_eq!(cell.owners.static_slot, Some(OccupantId::ROAD));
        assert_eq!(cell.owners.dynamic_count(), 1);
    }

    #[test]
    fn test_dynamic_slots_fill_up() {
        let mut owners = OwnerSlots::default();
        for i in 0..DYNAMIC_OWNER_SLOTS as u32 {
            assert!(owners.add_dynamic(OccupantId(i)));
        }
        assert!(!owners.add_dynamic(OccupantId(99)));
        owners.remove_dynamic(OccupantId(0));
        assert_eq!(owners.dynamic_count(), DYNAMIC_OWNER_SLOTS - 1);
    }
}
