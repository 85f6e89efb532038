use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Compass heading of a road piece.
///
/// The isometric camera looks at the map from the south-east, so grid `+x`
/// runs toward the west edge and `+y` toward the north edge. All offsets go
/// through [`Direction::offset`]; nothing else should assume an axis sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Probe order used by the classifier and the decoration engine.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, 1),
            Direction::South => IVec2::new(0, -1),
            Direction::East => IVec2::new(-1, 0),
            Direction::West => IVec2::new(1, 0),
        }
    }

    /// Heading of `sign(delta)` along its dominant axis. Ties go to the
    /// horizontal axis; a zero delta has no heading.
    pub fn from_delta(delta: IVec2) -> Option<Self> {
        if delta == IVec2::ZERO {
            return None;
        }
        if delta.x.abs() >= delta.y.abs() {
            Some(if delta.x > 0 {
                Direction::West
            } else {
                Direction::East
            })
        } else {
            Some(if delta.y > 0 {
                Direction::North
            } else {
                Direction::South
            })
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Quarter turn counter-clockwise on the compass.
    pub fn left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Quarter turn clockwise on the compass.
    pub fn right(self) -> Self {
        self.left().opposite()
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// True when both headings lie on the same axis (equal or opposite).
    #[inline]
    pub fn same_axis(self, other: Direction) -> bool {
        self.is_vertical() == other.is_vertical()
    }

    pub(crate) fn to_bits(self) -> u64 {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    pub(crate) fn from_bits(bits: u64) -> Self {
        match bits & 0b11 {
            0 => Direction::North,
            1 => Direction::South,
            2 => Direction::East,
            _ => Direction::West,
        }
    }
}
