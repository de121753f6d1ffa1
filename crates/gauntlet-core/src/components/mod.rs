//! Component definitions for the ECS world.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in generation.

mod agent;
mod common;
mod geometry;
mod physics;

pub use agent::*;
pub use common::*;
pub use geometry::*;
pub use physics::*;
