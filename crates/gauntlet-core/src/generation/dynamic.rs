//! Reused storage for per-episode entities.
//!
//! Slots are spawned on first use and overwritten in later episodes. Nothing
//! is despawned: resetting just moves the live count back to zero, and
//! anything past the live count is free to be claimed again.

use hecs::{DynamicBundle, Entity, World};

#[derive(Debug)]
pub struct DynamicEntities {
    slots: Vec<Entity>,
    live: usize,
    capacity: usize,
}

impl DynamicEntities {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            live: 0,
            capacity,
        }
    }

    /// Release every slot for the next episode.
    pub fn clear(&mut self) {
        self.live = 0;
    }

    /// Claim the next slot and give it `components`, replacing whatever the
    /// slot carried last episode.
    ///
    /// Panics past capacity; `ArenaConfig::validate` rules that out.
    pub fn alloc(&mut self, world: &mut World, components: impl DynamicBundle) -> Entity {
        assert!(
            self.live < self.capacity,
            "dynamic entity capacity {} exhausted",
            self.capacity
        );

        let slot = self.slots.get(self.live).copied();
        let entity = match slot.filter(|&e| world.contains(e)) {
            Some(slot) => {
                let inserted = world.insert(slot, components);
                debug_assert!(inserted.is_ok(), "live slot {:?} rejected insert", slot);
                slot
            }
            None => {
                let entity = world.spawn(components);
                if slot.is_some() {
                    log::warn!("dynamic slot {} was despawned externally", self.live);
                    self.slots[self.live] = entity;
                } else {
                    self.slots.push(entity);
                }
                entity
            }
        };

        self.live += 1;
        entity
    }

    /// Entities claimed since the last `clear`
    pub fn live(&self) -> &[Entity] {
        &self.slots[..self.live]
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots ever spawned, live or free
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Tag(u32);

    #[test]
    fn test_slots_are_reused_after_clear() {
        let mut world = World::new();
        let mut dynamic = DynamicEntities::new(4);

        let first = dynamic.alloc(&mut world, (Tag(1),));
        let second = dynamic.alloc(&mut world, (Tag(2),));
        assert_eq!(dynamic.live(), &[first, second]);

        dynamic.clear();
        assert!(dynamic.is_empty());

        let reused = dynamic.alloc(&mut world, (Tag(3),));
        assert_eq!(reused, first);
        assert_eq!(dynamic.len(), 1);
        assert_eq!(dynamic.allocated(), 2);
        assert_eq!(world.len(), 2);
        assert_eq!(world.get::<&Tag>(reused).map(|t| t.0).ok(), Some(3));
    }

    #[test]
    fn test_despawned_slot_is_replaced() {
        let mut world = World::new();
        let mut dynamic = DynamicEntities::new(2);
        let first = dynamic.alloc(&mut world, (Tag(1),));
        dynamic.clear();

        world.despawn(first).ok();
        let replacement = dynamic.alloc(&mut world, (Tag(9),));
        assert_ne!(replacement, first);
        assert_eq!(dynamic.live(), &[replacement]);
        assert_eq!(dynamic.allocated(), 1);
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_alloc_past_capacity_panics() {
        let mut world = World::new();
        let mut dynamic = DynamicEntities::new(1);
        dynamic.alloc(&mut world, (Tag(1),));
        dynamic.alloc(&mut world, (Tag(2),));
    }
}
