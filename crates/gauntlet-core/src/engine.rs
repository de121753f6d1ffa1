//! Arena engine - main entry point for running episodes

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::arena::ArenaState;
use crate::backend::{Broadphase, CameraRig, LeafRegistry, RandomStream, ViewSystem};
use crate::components::*;
use crate::config::{ArenaConfig, ConfigError};
use crate::generation::{create_persistent_entities, generate_world, DoorPlacement};
use crate::snapshot::ArenaSnapshot;

/// Owns the ECS world and everything generation needs between episodes.
pub struct ArenaEngine<P = LeafRegistry, V = CameraRig, R = ChaCha8Rng> {
    /// ECS world containing all entities
    pub world: World,
    arena: ArenaState,
    physics: P,
    views: V,
    rng: R,
    episode: u64,
}

impl ArenaEngine {
    /// Engine with the in-process backends and a seeded ChaCha8 stream
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_backends(
            config,
            LeafRegistry::new(),
            CameraRig::new(),
            ChaCha8Rng::seed_from_u64(seed),
        )
    }
}

impl<P: Broadphase, V: ViewSystem, R: RandomStream> ArenaEngine<P, V, R> {
    /// Validate `config` and create the persistent entities.
    ///
    /// No entity exists until validation passes.
    pub fn with_backends(
        config: ArenaConfig,
        physics: P,
        views: V,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        let arena = create_persistent_entities(&mut world, &config);

        Ok(Self {
            world,
            arena,
            physics,
            views,
            rng,
            episode: 0,
        })
    }

    /// Start a new episode: rebuild the broadphase, then generate the world.
    pub fn new_episode(&mut self) {
        self.physics.rebuild();
        generate_world(
            &mut self.world,
            &mut self.arena,
            &mut self.physics,
            &mut self.views,
            &mut self.rng,
        );
        self.episode += 1;

        log::debug!(
            "Episode {} ready: {} entities, {} separators ({} slots allocated)",
            self.episode,
            self.world.len(),
            self.arena.separators().len(),
            self.arena.dynamic.allocated()
        );
    }

    /// Episodes generated so far
    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn arena(&self) -> &ArenaState {
        &self.arena
    }

    pub fn config(&self) -> &ArenaConfig {
        self.arena.config()
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn views(&self) -> &V {
        &self.views
    }

    pub fn doors(&self) -> &[DoorPlacement] {
        self.arena.doors()
    }

    pub fn agent_count(&self) -> usize {
        self.world.query::<&AgentIndex>().iter().count()
    }

    /// Separator walls tagged in the world for the current episode
    pub fn separator_count(&self) -> usize {
        self.arena
            .separators()
            .iter()
            .filter(|&&e| self.world.get::<&SeparatorWall>(e).is_ok())
            .count()
    }

    /// Capture every pose and agent state of the current episode
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot::capture(&self.world, &self.arena, self.episode)
    }
}
