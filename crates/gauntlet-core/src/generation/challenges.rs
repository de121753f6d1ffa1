//! Challenge partitions: one wall pair per zone, with a single randomized door.

use hecs::{EntityBuilder, World};
use serde::{Deserialize, Serialize};

use super::placement::rand_between;
use super::{physics_bundle, register_physics_entity, AgentsReset};
use crate::arena::ArenaState;
use crate::backend::{Broadphase, RandomStream};
use crate::components::*;

/// Separator walls stand taller than an agent
pub const SEPARATOR_HEIGHT: f32 = 1.75;

/// Where one challenge's door ended up. Informational; nothing in the
/// generator reads these back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorPlacement {
    pub challenge: u32,
    /// y of the separator's center line
    pub y: f32,
    /// Door center in arena coordinates (x = 0 is the arena midline)
    pub center_x: f32,
    /// Span of the wall segment between the -x border and the door
    pub left_len: f32,
    /// Span of the wall segment between the door and the +x border
    pub right_len: f32,
}

/// Build every challenge separator for this episode.
///
/// Last episode's separators are released first; their slots are reused.
pub fn generate_challenges(
    world: &mut World,
    arena: &mut ArenaState,
    physics: &mut impl Broadphase,
    rng: &mut impl RandomStream,
    _reset: AgentsReset,
) {
    arena.dynamic.clear();
    arena.doors.clear();

    for challenge in 0..arena.config.num_challenges {
        let door = make_challenge_separator(world, arena, physics, rng, challenge);
        arena.doors.push(door);
    }

    log::debug!(
        "Generated {} challenge separators ({} walls)",
        arena.doors.len(),
        arena.dynamic.len()
    );
}

/// Place a door somewhere along the separator line and wall off both sides
/// of it, up to the borders.
fn make_challenge_separator(
    world: &mut World,
    arena: &mut ArenaState,
    physics: &mut impl Broadphase,
    rng: &mut impl RandomStream,
    challenge: u32,
) -> DoorPlacement {
    let config = &arena.config;
    let world_width = config.world_width;
    let door_width = config.door_width;
    let wall_width = config.wall_width;

    let y = config.challenge_length() * (challenge + 1) as f32 - wall_width / 2.0;

    // Quarter door of buffer against each side wall
    let door_center = rand_between(rng, 0.75 * door_width, world_width - 0.75 * door_width);
    let left_len = door_center - 0.5 * door_width;
    let right_len = world_width - door_center - 0.5 * door_width;

    let segments = [
        (
            SeparatorSide::Left,
            Vec3::new((-world_width + left_len) / 2.0, y, 0.0),
            left_len,
        ),
        (
            SeparatorSide::Right,
            Vec3::new((world_width - right_len) / 2.0, y, 0.0),
            right_len,
        ),
    ];

    for (side, position, len) in segments {
        let mut builder = EntityBuilder::new();
        builder
            .add_bundle(physics_bundle(
                position,
                Quat::IDENTITY,
                SimObject::Wall,
                ResponseType::Static,
                Diag3x3::new(len, wall_width, SEPARATOR_HEIGHT),
            ))
            .add(SeparatorWall { challenge, side });

        let wall = arena.dynamic.alloc(world, builder.build());
        register_physics_entity(world, physics, wall, SimObject::Wall);
    }

    log::debug!(
        "Challenge {}: door at x={:.2} (walls {:.2} / {:.2})",
        challenge,
        door_center - world_width / 2.0,
        left_len,
        right_len
    );

    DoorPlacement {
        challenge,
        y,
        center_x: door_center - world_width / 2.0,
        left_len,
        right_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CameraRig, LeafRegistry};
    use crate::config::ArenaConfig;
    use crate::generation::placement::tests::Sequence;
    use crate::generation::{create_persistent_entities, reset_persistent_entities};
    use approx::assert_relative_eq;

    fn episode(config: &ArenaConfig, draws: &[f32]) -> (World, ArenaState, LeafRegistry) {
        let mut world = World::new();
        let mut arena = create_persistent_entities(&mut world, config);
        let mut physics = LeafRegistry::new();
        let mut views = CameraRig::new();
        let mut rng = Sequence::new(draws);
        let reset = reset_persistent_entities(&mut world, &arena, &mut physics, &mut views, &mut rng);
        generate_challenges(&mut world, &mut arena, &mut physics, &mut rng, reset);
        (world, arena, physics)
    }

    fn wall_pose(world: &World, wall: hecs::Entity) -> (Vec3, Diag3x3) {
        let pos = world.get::<&Position>(wall).map(|p| p.0).unwrap_or_default();
        let scale = world.get::<&Scale>(wall).map(|s| s.0).unwrap_or_default();
        (pos, scale)
    }

    #[test]
    fn test_door_at_lowest_draw_hugs_left_buffer() {
        let config = ArenaConfig {
            num_challenges: 1,
            ..Default::default()
        };
        // Agents take 3 draws each; the separator's draw comes last
        let (world, arena, _) = episode(&config, &[0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.0]);

        let door = arena.doors()[0];
        let d = config.door_width;
        assert_relative_eq!(door.left_len, 0.25 * d, epsilon = 1e-5);
        assert_relative_eq!(door.right_len, 20.0 - 1.25 * d, epsilon = 1e-5);
        assert_relative_eq!(door.y, 39.5);

        let [left, right] = [arena.separators()[0], arena.separators()[1]];
        let (left_pos, left_scale) = wall_pose(&world, left);
        assert_relative_eq!(left_pos.x - left_scale.d0 / 2.0, -10.0, epsilon = 1e-5);
        assert_relative_eq!(left_scale.d2, SEPARATOR_HEIGHT);

        let (right_pos, right_scale) = wall_pose(&world, right);
        assert_relative_eq!(right_pos.x + right_scale.d0 / 2.0, 10.0, epsilon = 1e-5);
        assert_relative_eq!(right_pos.y, 39.5);
    }

    #[test]
    fn test_separators_are_evenly_spaced() {
        let config = ArenaConfig {
            num_challenges: 4,
            ..Default::default()
        };
        let (world, arena, _) = episode(&config, &[0.5]);

        let ys: Vec<f32> = arena.doors().iter().map(|d| d.y).collect();
        assert_eq!(ys, vec![9.5, 19.5, 29.5, 39.5]);
        for (i, &wall) in arena.separators().iter().enumerate() {
            let tag = world.get::<&SeparatorWall>(wall).map(|t| *t).ok();
            let side = if i % 2 == 0 {
                SeparatorSide::Left
            } else {
                SeparatorSide::Right
            };
            assert_eq!(
                tag,
                Some(SeparatorWall {
                    challenge: (i / 2) as u32,
                    side
                })
            );
        }
    }

    #[test]
    fn test_separators_register_after_persistent_entities() {
        let config = ArenaConfig::default();
        let (world, arena, physics) = episode(&config, &[0.3]);

        let persistent = 1 + 3 + config.num_agents as usize;
        assert_eq!(physics.len(), persistent + 2 * config.num_challenges as usize);
        for (offset, &wall) in arena.separators().iter().enumerate() {
            let leaf = world.get::<&LeafId>(wall).map(|l| *l).ok();
            assert_eq!(leaf, Some(LeafId((persistent + offset) as u32)));
            assert_eq!(physics.leaves()[persistent + offset].entity, wall);
        }
    }

    #[test]
    fn test_no_challenges_leaves_arena_open() {
        let config = ArenaConfig {
            num_challenges: 0,
            ..Default::default()
        };
        let (world, arena, physics) = episode(&config, &[0.5]);
        assert!(arena.separators().is_empty());
        assert!(arena.doors().is_empty());
        assert_eq!(physics.len(), 4 + config.num_agents as usize);
        assert_eq!(world.query::<&SeparatorWall>().iter().count(), 0);
    }
}
