//! One-time creation of the floor, the border walls and the agent roster.

use hecs::{Entity, EntityBuilder, World};

use super::{physics_bundle, DynamicEntities};
use crate::arena::ArenaState;
use crate::components::*;
use crate::config::ArenaConfig;

/// Height of the border walls
const BORDER_HEIGHT: f32 = 2.0;

/// Create the entities that live for the whole simulation.
///
/// Agents get placeholder poses here; the first episode reset gives them real
/// ones. Nothing is registered with physics yet, since the broadphase is
/// rebuilt every episode. `config` must already be validated.
pub fn create_persistent_entities(world: &mut World, config: &ArenaConfig) -> ArenaState {
    let floor = world.spawn(
        EntityBuilder::new()
            .add_bundle(physics_bundle(
                Vec3::ZERO,
                Quat::IDENTITY,
                SimObject::Plane,
                ResponseType::Static,
                Diag3x3::UNIT,
            ))
            .add(Floor)
            .build(),
    );

    let borders = BorderSide::ALL.map(|side| spawn_border(world, config, side));

    let agents: Vec<Entity> = (0..config.num_agents)
        .map(|i| spawn_agent(world, config, i))
        .collect();

    // Each agent sees every other agent, in roster order
    for (i, &agent) in agents.iter().enumerate() {
        let others: Vec<Entity> = agents
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, &other)| other)
            .collect();

        if let Ok(mut other_agents) = world.get::<&mut OtherAgents>(agent) {
            other_agents.0 = others;
        }
    }

    log::info!(
        "Created persistent arena: {}x{} with {} agents",
        config.world_width,
        config.world_length,
        agents.len()
    );

    ArenaState {
        config: config.clone(),
        floor,
        borders,
        agents,
        dynamic: DynamicEntities::new(config.max_dynamic_entities as usize),
        doors: Vec::with_capacity(config.num_challenges as usize),
    }
}

fn spawn_border(world: &mut World, config: &ArenaConfig, side: BorderSide) -> Entity {
    let half_width = config.world_width / 2.0;
    let half_wall = config.wall_width / 2.0;

    let (position, scale) = match side {
        BorderSide::Left => (
            Vec3::new(0.0, -half_wall, 0.0),
            Diag3x3::new(
                config.world_width + config.wall_width * 2.0,
                config.wall_width,
                BORDER_HEIGHT,
            ),
        ),
        BorderSide::Top => (
            Vec3::new(half_width + half_wall, config.world_length / 2.0, 0.0),
            Diag3x3::new(config.wall_width, config.world_length, BORDER_HEIGHT),
        ),
        BorderSide::Bottom => (
            Vec3::new(-half_width - half_wall, config.world_length / 2.0, 0.0),
            Diag3x3::new(config.wall_width, config.world_length, BORDER_HEIGHT),
        ),
    };

    world.spawn(
        EntityBuilder::new()
            .add_bundle(physics_bundle(
                position,
                Quat::IDENTITY,
                SimObject::Wall,
                ResponseType::Static,
                scale,
            ))
            .add(BorderWall { side })
            .build(),
    )
}

fn spawn_agent(world: &mut World, config: &ArenaConfig, index: u32) -> Entity {
    world.spawn(
        EntityBuilder::new()
            .add_bundle(physics_bundle(
                Vec3::ZERO,
                Quat::IDENTITY,
                SimObject::Agent,
                ResponseType::Dynamic,
                Diag3x3::UNIT,
            ))
            .add_bundle((
                AgentIndex(index),
                Action::neutral(config.num_move_buckets),
                Progress::default(),
                Done::default(),
                OtherAgents(Vec::with_capacity((config.num_agents as usize).saturating_sub(1))),
                ViewCamera::default(),
            ))
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn build(config: &ArenaConfig) -> (World, ArenaState) {
        let mut world = World::new();
        let arena = create_persistent_entities(&mut world, config);
        (world, arena)
    }

    #[test]
    fn test_creates_floor_borders_and_agents() {
        let config = ArenaConfig::default();
        let (world, arena) = build(&config);

        assert_eq!(world.len(), 1 + 3 + config.num_agents);
        assert_eq!(arena.agents().len(), config.num_agents as usize);
        assert!(arena.separators().is_empty());

        let floor_obj = world.get::<&ObjectId>(arena.floor()).map(|o| o.0).ok();
        assert_eq!(floor_obj, Some(SimObject::Plane));
        for &border in arena.borders() {
            assert_eq!(
                world.get::<&ResponseType>(border).map(|r| *r).ok(),
                Some(ResponseType::Static)
            );
        }
        for &agent in arena.agents() {
            assert_eq!(
                world.get::<&ResponseType>(agent).map(|r| *r).ok(),
                Some(ResponseType::Dynamic)
            );
            assert_eq!(world.get::<&Scale>(agent).map(|s| s.0).ok(), Some(Diag3x3::UNIT));
        }
    }

    #[test]
    fn test_border_walls_frame_the_arena() {
        let config = ArenaConfig::default();
        let (world, arena) = build(&config);

        let pose = |e: Entity| {
            let pos = world.get::<&Position>(e).map(|p| p.0).unwrap_or_default();
            let scale = world.get::<&Scale>(e).map(|s| s.0).unwrap_or_default();
            (pos, scale)
        };

        let [left, top, bottom] = *arena.borders();
        let (left_pos, left_scale) = pose(left);
        assert_relative_eq!(left_pos.y, -0.5);
        assert_relative_eq!(left_scale.d0, 22.0);

        let (top_pos, top_scale) = pose(top);
        assert_relative_eq!(top_pos.x, 10.5);
        assert_relative_eq!(top_pos.y, 20.0);
        assert_relative_eq!(top_scale.d1, 40.0);

        let (bottom_pos, _) = pose(bottom);
        assert_relative_eq!(bottom_pos.x, -10.5);

        assert_eq!(
            world.get::<&BorderWall>(top).map(|b| b.side).ok(),
            Some(BorderSide::Top)
        );
    }

    #[test]
    fn test_peer_lists_skip_self_in_roster_order() {
        let config = ArenaConfig {
            num_agents: 4,
            ..Default::default()
        };
        let (world, arena) = build(&config);
        let agents = arena.agents();

        for (i, &agent) in agents.iter().enumerate() {
            let others = world
                .get::<&OtherAgents>(agent)
                .map(|o| o.0.clone())
                .unwrap_or_default();
            let expected: Vec<Entity> = agents
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, &e)| e)
                .collect();
            assert_eq!(others, expected);
        }
    }

    #[test]
    fn test_single_agent_has_no_peers() {
        let config = ArenaConfig {
            num_agents: 1,
            ..Default::default()
        };
        let (world, arena) = build(&config);
        let peers = world
            .get::<&OtherAgents>(arena.agents()[0])
            .map(|o| o.len())
            .ok();
        assert_eq!(peers, Some(0));
    }
}
