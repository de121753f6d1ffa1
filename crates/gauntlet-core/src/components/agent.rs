//! Agent components: identity, discretized action, progress and episode state.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Index of the agent in the arena roster. Also identifies the agent's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentIndex(pub u32);

/// Discretized movement action. Each axis is a bucket in `[0, num_move_buckets)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub x: i32,
    pub y: i32,
    pub r: i32,
}

impl Action {
    /// The "don't move" action: the middle bucket on every axis
    pub fn neutral(num_move_buckets: i32) -> Self {
        let mid = num_move_buckets / 2;
        Self { x: mid, y: mid, r: mid }
    }
}

/// Count of discrete forward-advancement increments made this episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub num_progress_increments: u32,
}

/// Episode termination flag, 0 or 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Done {
    pub v: i32,
}

/// References to every other agent, ascending by roster index.
///
/// Filled once at creation and never touched again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtherAgents(pub Vec<Entity>);

impl OtherAgents {
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Handle of the observation view attached to an agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCamera {
    pub view: u32,
}
