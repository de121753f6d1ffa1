//! Arena state: handles to the persistent entities and the per-episode slots.

use hecs::Entity;

use crate::config::ArenaConfig;
use crate::generation::{DoorPlacement, DynamicEntities};

/// Everything generation needs to find again between episodes.
///
/// Built once by [`create_persistent_entities`](crate::generation::create_persistent_entities);
/// the floor, border and agent handles never change after that.
#[derive(Debug)]
pub struct ArenaState {
    pub(crate) config: ArenaConfig,
    pub(crate) floor: Entity,
    pub(crate) borders: [Entity; 3],
    pub(crate) agents: Vec<Entity>,
    pub(crate) dynamic: DynamicEntities,
    pub(crate) doors: Vec<DoorPlacement>,
}

impl ArenaState {
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn floor(&self) -> Entity {
        self.floor
    }

    /// Left, top and bottom border walls, in that order
    pub fn borders(&self) -> &[Entity; 3] {
        &self.borders
    }

    pub fn agents(&self) -> &[Entity] {
        &self.agents
    }

    /// Separator walls of the current episode, in creation order
    pub fn separators(&self) -> &[Entity] {
        self.dynamic.live()
    }

    /// Door placements of the current episode, one per challenge
    pub fn doors(&self) -> &[DoorPlacement] {
        &self.doors
    }
}
