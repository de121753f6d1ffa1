//! Serializable capture of an episode's layout and agent state.
//!
//! Snapshots are plain data: entity handles are replaced by roster indices,
//! so two snapshots from separate worlds compare equal when their layouts do.
//! Bincode gives a byte-exact encoding for determinism checks; JSON is for
//! dumping layouts to look at.

use std::collections::HashMap;
use std::io::Write;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arena::ArenaState;
use crate::components::*;
use crate::config::ArenaConfig;
use crate::generation::DoorPlacement;

/// Version number for the snapshot format (increment when format changes)
const SNAPSHOT_VERSION: u32 = 1;

/// Pose and physics classification of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub object: SimObject,
    pub response: ResponseType,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Diag3x3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub index: u32,
    pub body: BodySnapshot,
    pub velocity: Velocity,
    pub force: Vec3,
    pub torque: Vec3,
    pub action: Action,
    pub progress: Progress,
    pub done: Done,
    pub view: ViewCamera,
    /// Roster indices of the agents in this agent's peer list
    pub peers: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatorSnapshot {
    pub tag: SeparatorWall,
    pub body: BodySnapshot,
}

/// Everything an episode's layout consists of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub version: u32,
    pub episode: u64,
    pub config: ArenaConfig,
    pub floor: Option<BodySnapshot>,
    pub borders: Vec<BodySnapshot>,
    pub agents: Vec<AgentSnapshot>,
    pub separators: Vec<SeparatorSnapshot>,
    pub doors: Vec<DoorPlacement>,
}

fn body(world: &World, entity: Entity) -> Option<BodySnapshot> {
    let mut query = world
        .query_one::<(&ObjectId, &ResponseType, &Position, &Rotation, &Scale)>(entity)
        .ok()?;
    let snapshot = query.get().map(|(obj, response, pos, rot, scale)| BodySnapshot {
        object: obj.0,
        response: *response,
        position: pos.0,
        rotation: rot.0,
        scale: scale.0,
    });
    snapshot
}

fn agent(world: &World, entity: Entity, roster: &HashMap<Entity, u32>) -> Option<AgentSnapshot> {
    let body = body(world, entity)?;
    let mut query = world
        .query_one::<(
            &AgentIndex,
            &Velocity,
            &ExternalForce,
            &ExternalTorque,
            &Action,
            &Progress,
            &Done,
            &ViewCamera,
            &OtherAgents,
        )>(entity)
        .ok()?;
    let snapshot = query.get().map(
        |(index, velocity, force, torque, action, progress, done, view, others)| AgentSnapshot {
            index: index.0,
            body,
            velocity: *velocity,
            force: force.0,
            torque: torque.0,
            action: *action,
            progress: *progress,
            done: *done,
            view: *view,
            peers: others
                .iter()
                .filter_map(|other| roster.get(other).copied())
                .collect(),
        },
    );
    snapshot
}

impl ArenaSnapshot {
    /// Capture the current episode
    pub fn capture(world: &World, arena: &ArenaState, episode: u64) -> Self {
        let roster: HashMap<Entity, u32> = arena
            .agents()
            .iter()
            .enumerate()
            .map(|(i, &e)| (e, i as u32))
            .collect();

        let separators = arena
            .separators()
            .iter()
            .filter_map(|&wall| {
                let tag = world.get::<&SeparatorWall>(wall).map(|t| *t).ok()?;
                Some(SeparatorSnapshot {
                    tag,
                    body: body(world, wall)?,
                })
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            episode,
            config: arena.config().clone(),
            floor: body(world, arena.floor()),
            borders: arena
                .borders()
                .iter()
                .filter_map(|&b| body(world, b))
                .collect(),
            agents: arena
                .agents()
                .iter()
                .filter_map(|&a| agent(world, a, &roster))
                .collect(),
            separators,
            doors: arena.doors().to_vec(),
        }
    }

    /// Byte-exact encoding
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Pretty-printed JSON
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), SnapshotError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Errors that can occur while encoding or decoding snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}
