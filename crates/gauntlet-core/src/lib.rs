//! Gauntlet Core - Episode World Generator
//!
//! Builds and resets the arena for each training episode of a multi-agent
//! simulation. The arena is a walled rectangle split along its length into
//! challenge zones. Each zone ends in a wall pair with one randomized door.
//!
//! # Architecture
//!
//! The world uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: floor, border walls, agents, challenge separators
//! - **Components**: Pure data attached to entities (Position, Action, OtherAgents, etc.)
//! - **Generation**: one-time persistent setup, then a two-phase per-episode pass
//!
//! Physics registration, agent views and randomness come in through the
//! traits in [`backend`].
//!
//! # Example
//!
//! ```rust,no_run
//! use gauntlet_core::prelude::*;
//!
//! let mut engine = ArenaEngine::new(ArenaConfig::default(), 42)?;
//!
//! loop {
//!     engine.new_episode();
//!     // ... step physics, collect rewards ...
//! }
//! # Ok::<(), gauntlet_core::config::ConfigError>(())
//! ```

pub mod arena;
pub mod backend;
pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod snapshot;
pub mod validation;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::arena::ArenaState;
    pub use crate::backend::{Broadphase, CameraRig, LeafRegistry, RandomStream, ViewSystem};
    pub use crate::components::*;
    pub use crate::config::ArenaConfig;
    pub use crate::engine::ArenaEngine;
    pub use crate::generation::{create_persistent_entities, generate_world, DoorPlacement};
    pub use crate::snapshot::ArenaSnapshot;
}
