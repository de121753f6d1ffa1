//! Generation - persistent arena setup and per-episode world layout.
//!
//! Per-episode generation is a strict two-phase pipeline:
//!   1. reset_persistent_entities -- registers floor/borders/agents, re-poses agents
//!   2. generate_challenges       -- lays out separator wall pairs with door gaps
//!
//! Phase 1 hands back an [`AgentsReset`] token that phase 2 consumes, so the
//! order cannot be swapped at a call site.

mod challenges;
mod dynamic;
mod persistent;
pub mod placement;
mod reset;

pub use challenges::*;
pub use dynamic::*;
pub use persistent::*;
pub use reset::*;

use hecs::{Entity, World};

use crate::arena::ArenaState;
use crate::backend::{Broadphase, RandomStream, ViewSystem};
use crate::components::{
    Diag3x3, ExternalForce, ExternalTorque, LeafId, ObjectId, Position, Quat, ResponseType,
    Rotation, Scale, SimObject, Vec3, Velocity,
};

/// Component set shared by every physics-backed entity
pub(crate) type PhysicsBundle = (
    Position,
    Rotation,
    Scale,
    ObjectId,
    ResponseType,
    Velocity,
    ExternalForce,
    ExternalTorque,
    LeafId,
);

/// Physics components for an entity at rest with the given pose.
pub(crate) fn physics_bundle(
    position: Vec3,
    rotation: Quat,
    object: SimObject,
    response: ResponseType,
    scale: Diag3x3,
) -> PhysicsBundle {
    (
        Position(position),
        Rotation(rotation),
        Scale(scale),
        ObjectId(object),
        response,
        Velocity::ZERO,
        ExternalForce(Vec3::ZERO),
        ExternalTorque(Vec3::ZERO),
        LeafId::default(),
    )
}

/// Register `entity` with the broadphase and store the leaf handle on it.
pub(crate) fn register_physics_entity(
    world: &mut World,
    physics: &mut impl Broadphase,
    entity: Entity,
    object: SimObject,
) {
    let leaf = physics.register_entity(world, entity, object);
    if let Ok(mut id) = world.get::<&mut LeafId>(entity) {
        *id = leaf;
    }
}

/// Lay out a fresh episode: reset the persistent entities, then build the
/// challenge partitions.
///
/// Entities are registered before their new pose is written, so the
/// broadphase is refit once everything is placed. The caller still owns
/// `Broadphase::rebuild` between episodes.
pub fn generate_world(
    world: &mut World,
    arena: &mut ArenaState,
    physics: &mut impl Broadphase,
    views: &mut impl ViewSystem,
    rng: &mut impl RandomStream,
) {
    let reset = reset_persistent_entities(world, arena, physics, views, rng);
    generate_challenges(world, arena, physics, rng, reset);
    physics.refit(world);
}
