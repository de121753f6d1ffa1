//! Per-episode reset of the persistent entities.

use std::f32::consts::FRAC_PI_4;

use hecs::World;

use super::placement::{rand_between, rand_in_range_centered};
use super::register_physics_entity;
use crate::arena::ArenaState;
use crate::backend::{Broadphase, RandomStream, ViewSystem};
use crate::components::*;
use crate::config::ArenaConfig;

pub const VIEW_FOV_DEGREES: f32 = 90.0;
pub const VIEW_NEAR_PLANE: f32 = 0.001;
/// Camera mount height above the agent's origin
pub const VIEW_MOUNT_HEIGHT: f32 = 1.5;

/// Proof that the persistent entities have been reset for this episode.
///
/// Only [`reset_persistent_entities`] can make one, and
/// [`generate_challenges`](super::generate_challenges) consumes it.
#[derive(Debug)]
#[must_use = "pass the token on to generate_challenges"]
pub struct AgentsReset {
    _private: (),
}

/// Re-register the floor, borders and agents with the broadphase and give
/// every agent a fresh starting pose and zeroed transient state.
///
/// Agents spawn just past the back wall in two groups: even indices biased a
/// quarter arena width toward +x, odd indices toward -x.
pub fn reset_persistent_entities(
    world: &mut World,
    arena: &ArenaState,
    physics: &mut impl Broadphase,
    views: &mut impl ViewSystem,
    rng: &mut impl RandomStream,
) -> AgentsReset {
    let config = arena.config();

    register_physics_entity(world, physics, arena.floor(), SimObject::Plane);
    for &border in arena.borders() {
        register_physics_entity(world, physics, border, SimObject::Wall);
    }

    for (i, &agent) in arena.agents().iter().enumerate() {
        register_physics_entity(world, physics, agent, SimObject::Agent);

        let camera = views.setup_view(
            VIEW_FOV_DEGREES,
            VIEW_NEAR_PLANE,
            Vec3::UP * VIEW_MOUNT_HEIGHT,
            i as u32,
        );

        let spawn = spawn_position(config, i, rng);
        let heading = Rotation::from_yaw(rand_in_range_centered(rng, FRAC_PI_4));

        if let Ok((pos, rot, vel, force, torque, action, progress, done, view)) = world
            .query_one_mut::<(
                &mut Position,
                &mut Rotation,
                &mut Velocity,
                &mut ExternalForce,
                &mut ExternalTorque,
                &mut Action,
                &mut Progress,
                &mut Done,
                &mut ViewCamera,
            )>(agent)
        {
            pos.0 = spawn;
            *rot = heading;
            *vel = Velocity::ZERO;
            force.0 = Vec3::ZERO;
            torque.0 = Vec3::ZERO;
            *action = Action::neutral(config.num_move_buckets);
            *progress = Progress::default();
            *done = Done::default();
            *view = camera;
        }
    }

    log::debug!("Reset {} agents", arena.agents().len());

    AgentsReset { _private: () }
}

/// Starting position for agent `index`. Draws x first, then y.
pub fn spawn_position(config: &ArenaConfig, index: usize, rng: &mut impl RandomStream) -> Vec3 {
    let mut pos = Vec3::new(
        rand_in_range_centered(rng, config.spawn_clearance()),
        rand_between(rng, 0.0, config.distance_per_progress / 2.0) + 1.1 * config.agent_radius,
        0.0,
    );

    pos.x += group_bias(config, index);
    pos
}

/// Horizontal offset separating the two spawn groups
pub fn group_bias(config: &ArenaConfig, index: usize) -> f32 {
    if index % 2 == 0 {
        config.world_width / 4.0
    } else {
        -config.world_width / 4.0
    }
}
