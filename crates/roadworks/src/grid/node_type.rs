use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// Junction classification stored on every cell of a junction footprint.
///
/// Corner names follow the counter-clockwise winding of the arm table:
/// arms `E+S` make a top-left corner, `E+N` bottom-left, `W+N` bottom-right,
/// `W+S` top-right. Three-way crossings are named after their missing arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeType {
    #[default]
    Invalid,
    CornerTopLeft,
    CornerBottomLeft,
    CornerBottomRight,
    CornerTopRight,
    XingNoNorth,
    XingNoEast,
    XingNoSouth,
    XingNoWest,
    XingAll,
}

/// Three-of-four subsets in the order they are tested.
const THREE_WAY_PRIORITY: [(NodeType, Direction); 4] = [
    (NodeType::XingNoNorth, Direction::North),
    (NodeType::XingNoEast, Direction::East),
    (NodeType::XingNoSouth, Direction::South),
    (NodeType::XingNoWest, Direction::West),
];

impl NodeType {
    /// Resolve a junction type from which of its four arms are present.
    pub fn from_arms(north: bool, east: bool, south: bool, west: bool) -> Self {
        let present = |dir: Direction| match dir {
            Direction::North => north,
            Direction::East => east,
            Direction::South => south,
            Direction::West => west,
        };
        let count = [north, east, south, west].iter().filter(|&&a| a).count();
        match count {
            4 => NodeType::XingAll,
            3 => THREE_WAY_PRIORITY
                .iter()
                .find(|(_, missing)| {
                    Direction::ALL
                        .iter()
                        .filter(|d| **d != *missing)
                        .all(|d| present(*d))
                })
                .map(|(ty, _)| *ty)
                .unwrap_or(NodeType::Invalid),
            2 => match (north, east, south, west) {
                (false, true, true, false) => NodeType::CornerTopLeft,
                (true, true, false, false) => NodeType::CornerBottomLeft,
                (true, false, false, true) => NodeType::CornerBottomRight,
                (false, false, true, true) => NodeType::CornerTopRight,
                _ => NodeType::Invalid,
            },
            _ => NodeType::Invalid,
        }
    }

    pub fn is_valid(self) -> bool {
        self != NodeType::Invalid
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            NodeType::CornerTopLeft
                | NodeType::CornerBottomLeft
                | NodeType::CornerBottomRight
                | NodeType::CornerTopRight
        )
    }

    pub fn is_crossing(self) -> bool {
        matches!(
            self,
            NodeType::XingNoNorth
                | NodeType::XingNoEast
                | NodeType::XingNoSouth
                | NodeType::XingNoWest
                | NodeType::XingAll
        )
    }

    /// Whether the junction has an arm leaving in `dir`.
    pub fn has_arm(self, dir: Direction) -> bool {
        match self {
            NodeType::Invalid => false,
            NodeType::CornerTopLeft => matches!(dir, Direction::East | Direction::South),
            NodeType::CornerBottomLeft => matches!(dir, Direction::East | Direction::North),
            NodeType::CornerBottomRight => matches!(dir, Direction::West | Direction::North),
            NodeType::CornerTopRight => matches!(dir, Direction::West | Direction::South),
            NodeType::XingNoNorth => dir != Direction::North,
            NodeType::XingNoEast => dir != Direction::East,
            NodeType::XingNoSouth => dir != Direction::South,
            NodeType::XingNoWest => dir != Direction::West,
            NodeType::XingAll => true,
        }
    }

    /// Arms in `Direction::ALL` order.
    pub fn arms(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.has_arm(*d))
    }

    /// Position of a corner variant in the curve tile atlas.
    pub fn corner_ordinal(self) -> Option<u8> {
        match self {
            NodeType::CornerTopLeft => Some(0),
            NodeType::CornerBottomLeft => Some(1),
            NodeType::CornerBottomRight => Some(2),
            NodeType::CornerTopRight => Some(3),
            _ => None,
        }
    }

    pub(crate) fn to_bits(self) -> u64 {
        match self {
            NodeType::Invalid => 0,
            NodeType::CornerTopLeft => 1,
            NodeType::CornerBottomLeft => 2,
            NodeType::CornerBottomRight => 3,
            NodeType::CornerTopRight => 4,
            NodeType::XingNoNorth => 5,
            NodeType::XingNoEast => 6,
            NodeType::XingNoSouth => 7,
            NodeType::XingNoWest => 8,
            NodeType::XingAll => 9,
        }
    }

    pub(crate) fn from_bits(bits: u64) -> Self {
        match bits {
            1 => NodeType::CornerTopLeft,
            2 => NodeType::CornerBottomLeft,
            3 => NodeType::CornerBottomRight,
            4 => NodeType::CornerTopRight,
            5 => NodeType::XingNoNorth,
            6 => NodeType::XingNoEast,
            7 => NodeType::XingNoSouth,
            8 => NodeType::XingNoWest,
            9 => NodeType::XingAll,
            _ => NodeType::Invalid,
        }
    }
}
