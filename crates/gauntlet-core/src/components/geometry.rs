//! Tags for the static geometry entities.

use serde::{Deserialize, Serialize};

/// Marker for the floor plane
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Floor;

/// Which boundary a border wall closes off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderSide {
    /// Behind the agents' starting area, spanning the full width
    Left,
    /// The +x side wall
    Top,
    /// The -x side wall
    Bottom,
}

impl BorderSide {
    pub const ALL: [BorderSide; 3] = [BorderSide::Left, BorderSide::Top, BorderSide::Bottom];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderWall {
    pub side: BorderSide,
}

/// Which side of the door gap a separator segment sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparatorSide {
    Left,
    Right,
}

/// A wall segment of a challenge separator. Recreated every episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorWall {
    pub challenge: u32,
    pub side: SeparatorSide,
}
