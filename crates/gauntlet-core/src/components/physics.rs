//! Physics-facing components: pose, shape, response type and accumulated forces.
//!
//! Every floor, wall and agent entity carries the full set, so the broadphase
//! can register any of them the same way.

use glam::EulerRot;
use serde::{Deserialize, Serialize};

use super::common::{Diag3x3, Quat, Vec3};

/// World-space position of the entity's center
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec3);

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rotation(pub Quat);

impl Rotation {
    /// Heading of `angle` radians around the up axis
    pub fn from_yaw(angle: f32) -> Self {
        Self(Quat::from_axis_angle(Vec3::UP.into(), angle))
    }

    pub fn yaw(&self) -> f32 {
        let (yaw, _, _) = self.0.to_euler(EulerRot::ZYX);
        yaw
    }
}

/// Non-uniform scale applied to the object's unit shape
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Scale(pub Diag3x3);

/// Shape/asset identifiers understood by the physics and render backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum SimObject {
    Wall = 0,
    Agent = 1,
    Plane = 2,
}

/// Object identifier component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectId(pub SimObject);

/// How the physics step treats an entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    /// Integrated and pushed by forces
    #[default]
    Dynamic,
    /// Immovable but collidable
    Static,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub const ZERO: Self = Self {
        linear: Vec3::ZERO,
        angular: Vec3::ZERO,
    };
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalForce(pub Vec3);

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalTorque(pub Vec3);

/// Handle of the entity's leaf in the broadphase index. Only meaningful for
/// the episode in which it was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeafId(pub u32);
