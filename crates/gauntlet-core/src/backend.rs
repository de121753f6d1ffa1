//! Collaborator interfaces the generator drives, plus in-process backends.
//!
//! The physics broadphase, the observation views and the random stream all
//! live outside the generator. It only needs one or two calls from each, so
//! each gets a small trait. `LeafRegistry` and `CameraRig` are headless
//! implementations that record what was asked of them.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::components::{
    BoundingBox, LeafId, Position, Rotation, Scale, SimObject, Vec3, ViewCamera,
};

/// Spatial index the physics step queries for collisions
pub trait Broadphase {
    /// Drop every leaf. The index is rebuilt from scratch each episode.
    fn rebuild(&mut self);

    /// Insert an entity's collider and return its leaf handle.
    fn register_entity(&mut self, world: &World, entity: Entity, object: SimObject) -> LeafId;

    /// Bring leaf bounds up to date with the entities' current poses.
    fn refit(&mut self, _world: &World) {}
}

/// Observation view setup for agents
pub trait ViewSystem {
    fn setup_view(
        &mut self,
        fov_degrees: f32,
        near_plane: f32,
        mount_offset: Vec3,
        agent_index: u32,
    ) -> ViewCamera;
}

/// Source of uniform floats in `[0, 1)`
pub trait RandomStream {
    fn rand(&mut self) -> f32;
}

impl<R: rand::Rng> RandomStream for R {
    fn rand(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// One collider in the registry
#[derive(Debug, Clone, Copy)]
pub struct Leaf {
    pub entity: Entity,
    pub object: SimObject,
    pub bounds: BoundingBox,
}

/// Flat broadphase: a list of world-space AABBs, one per registered entity.
#[derive(Debug, Default)]
pub struct LeafRegistry {
    leaves: Vec<Leaf>,
}

impl LeafRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn leaf(&self, id: LeafId) -> Option<&Leaf> {
        self.leaves.get(id.0 as usize)
    }

    /// Leaves whose bounds strictly overlap `bounds`
    pub fn overlapping<'a>(&'a self, bounds: &'a BoundingBox) -> impl Iterator<Item = &'a Leaf> {
        self.leaves.iter().filter(move |leaf| leaf.bounds.overlaps(bounds))
    }
}

/// World-space bounds of an entity's collider.
///
/// Walls and agents are unit cubes stretched by their scale. The plane is
/// unbounded across the floor and flat in z.
pub fn collider_bounds(world: &World, entity: Entity, object: SimObject) -> BoundingBox {
    let position = world
        .get::<&Position>(entity)
        .map(|p| p.0)
        .unwrap_or_default();

    if object == SimObject::Plane {
        return BoundingBox::new(
            Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, position.z),
            Vec3::new(f32::INFINITY, f32::INFINITY, position.z),
        );
    }

    let rotation = world
        .get::<&Rotation>(entity)
        .map(|r| r.0)
        .unwrap_or_default();
    let half = world
        .get::<&Scale>(entity)
        .map(|s| glam::Vec3::from(s.0.as_vec3()))
        .unwrap_or(glam::Vec3::ONE)
        * 0.5;

    let extents = rotation.mul_vec3(glam::Vec3::X * half.x).abs()
        + rotation.mul_vec3(glam::Vec3::Y * half.y).abs()
        + rotation.mul_vec3(glam::Vec3::Z * half.z).abs();

    BoundingBox::from_center(position, extents.into())
}

impl Broadphase for LeafRegistry {
    fn rebuild(&mut self) {
        self.leaves.clear();
    }

    fn register_entity(&mut self, world: &World, entity: Entity, object: SimObject) -> LeafId {
        let id = LeafId(self.leaves.len() as u32);
        self.leaves.push(Leaf {
            entity,
            object,
            bounds: collider_bounds(world, entity, object),
        });
        id
    }

    fn refit(&mut self, world: &World) {
        for leaf in &mut self.leaves {
            leaf.bounds = collider_bounds(world, leaf.entity, leaf.object);
        }
    }
}

/// Parameters of one agent's observation view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub mount_offset: Vec3,
    pub agent_index: u32,
}

/// Keeps one view per agent index; setting a view up again replaces it.
#[derive(Debug, Default)]
pub struct CameraRig {
    views: Vec<Option<ViewConfig>>,
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, camera: ViewCamera) -> Option<&ViewConfig> {
        self.views.get(camera.view as usize).and_then(Option::as_ref)
    }

    pub fn view_count(&self) -> usize {
        self.views.iter().flatten().count()
    }
}

impl ViewSystem for CameraRig {
    fn setup_view(
        &mut self,
        fov_degrees: f32,
        near_plane: f32,
        mount_offset: Vec3,
        agent_index: u32,
    ) -> ViewCamera {
        let slot = agent_index as usize;
        if self.views.len() <= slot {
            self.views.resize(slot + 1, None);
        }
        self.views[slot] = Some(ViewConfig {
            fov_degrees,
            near_plane,
            mount_offset,
            agent_index,
        });
        ViewCamera { view: agent_index }
    }
}
