// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generational entity allocation and recycling.

use crate::bitset::SlotBitset;
use proteus_core::Entity;

/// Allocates generational entity ids and recycles destroyed slots.
///
/// Each slot carries a generation counter; destroying an entity pushes its
/// slot onto a LIFO free list, and the generation is incremented on reuse so
/// stale handles can never address the new occupant.
///
/// Recycling is LIFO by contract: the most-recently-freed slot is reused
/// first, which callers may rely on for locality.
#[derive(Debug, Default)]
pub struct EntityManager {
    generations: Vec<u32>,
    alive: SlotBitset,
    free_list: Vec<u32>,
    alive_count: usize,
}

impl EntityManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: SlotBitset::new(),
            free_list: Vec::new(),
            alive_count: 0,
        }
    }

    /// Creates a new entity. O(1); never fails (growth is fatal on OOM).
    ///
    /// Fresh slots start at generation 1; recycled slots have their
    /// generation incremented before being handed out.
    ///
    /// # Panics
    ///
    /// Panics if a slot's generation counter would overflow `u32`. Slot
    /// corruption of this kind is a programmer error and fails fast.
    pub fn create(&mut self) -> Entity {
        if let Some(index) = self.free_list.pop() {
            let slot = index as usize;
            let generation = self.generations[slot]
                .checked_add(1)
                .expect("entity slot generation overflowed");
            self.generations[slot] = generation;
            self.alive.set(index);
            self.alive_count += 1;
            return Entity::new(index, generation);
        }

        let index = self.generations.len() as u32;
        self.generations.push(1);
        self.alive.set(index);
        self.alive_count += 1;
        Entity::new(index, 1)
    }

    /// Destroys an entity.
    ///
    /// Returns `true` iff the entity was alive. Destroying a stale handle,
    /// a double-destroy, or the invalid entity returns `false` and changes
    /// nothing.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.alive.clear(entity.index);
        self.free_list.push(entity.index);
        self.alive_count -= 1;
        true
    }

    /// Returns `true` if the exact handle refers to a live entity.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index as usize;
        if slot >= self.generations.len() {
            return false;
        }
        self.alive.is_set(entity.index) && self.generations[slot] == entity.generation
    }

    /// Number of currently live entities.
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Total number of slots ever allocated, including recycled ones.
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    /// Number of slots waiting on the free list.
    pub fn recycled_count(&self) -> usize {
        self.free_list.len()
    }

    /// Reserves capacity for `count` entity slots.
    pub fn reserve(&mut self, count: usize) {
        self.generations.reserve(count);
        self.alive.reserve(count);
    }

    /// Resets the manager, forgetting all slots and generations.
    pub fn clear(&mut self) {
        self.generations.clear();
        self.alive.clear_all();
        self.free_list.clear();
        self.alive_count = 0;
    }

    /// Calls `func` for every live entity, in slot order.
    pub fn for_each(&self, mut func: impl FnMut(Entity)) {
        for slot in 0..self.generations.len() {
            let index = slot as u32;
            if self.alive.is_set(index) {
                func(Entity::new(index, self.generations[slot]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proteus_core::INVALID_ENTITY;

    #[test]
    fn test_create_starts_at_generation_one() {
        let mut manager = EntityManager::new();
        let e = manager.create();
        assert_eq!(e.index, 0);
        assert_eq!(e.generation, 1);
        assert!(e.is_valid());
        assert!(manager.is_alive(e));
    }

    #[test]
    fn test_recycling_bumps_generation() {
        let mut manager = EntityManager::new();

        let e1 = manager.create();
        assert_eq!((e1.index, e1.generation), (0, 1));

        assert!(manager.destroy(e1));
        let e2 = manager.create();
        assert_eq!((e2.index, e2.generation), (0, 2));

        assert!(!manager.is_alive(e1));
        assert!(manager.is_alive(e2));
    }

    #[test]
    fn test_recycling_is_lifo() {
        let mut manager = EntityManager::new();
        let e1 = manager.create();
        let e2 = manager.create();
        let e3 = manager.create();
        assert_eq!((e1.index, e2.index, e3.index), (0, 1, 2));

        manager.destroy(e1);
        manager.destroy(e2);
        manager.destroy(e3);

        let r1 = manager.create();
        let r2 = manager.create();
        let r3 = manager.create();
        assert_eq!(r1.index, 2);
        assert_eq!(r2.index, 1);
        assert_eq!(r3.index, 0);
    }

    #[test]
    fn test_double_destroy_and_invalid_destroy_return_false() {
        let mut manager = EntityManager::new();
        let e = manager.create();

        assert!(manager.destroy(e));
        assert!(!manager.destroy(e));
        assert!(!manager.destroy(INVALID_ENTITY));
        assert_eq!(manager.alive_count(), 0);
    }

    #[test]
    fn test_destroyed_entity_stays_dead_forever() {
        let mut manager = EntityManager::new();
        let e1 = manager.create();
        manager.destroy(e1);

        // The slot is reused, but the old handle never comes back to life.
        let _e2 = manager.create();
        assert!(!manager.is_alive(e1));
        assert!(!manager.destroy(e1));
    }

    #[test]
    fn test_create_never_repeats_handles() {
        let mut manager = EntityManager::new();
        let mut seen = std::collections::HashSet::new();

        for round in 0..10 {
            let entities: Vec<_> = (0..8).map(|_| manager.create()).collect();
            for e in &entities {
                assert!(seen.insert(*e), "handle repeated in round {round}");
            }
            for e in entities {
                manager.destroy(e);
            }
        }
    }

    #[test]
    fn test_counts_and_clear() {
        let mut manager = EntityManager::new();
        let a = manager.create();
        let _b = manager.create();
        manager.destroy(a);

        assert_eq!(manager.alive_count(), 1);
        assert_eq!(manager.capacity(), 2);
        assert_eq!(manager.recycled_count(), 1);

        manager.clear();
        assert_eq!(manager.alive_count(), 0);
        assert_eq!(manager.capacity(), 0);
        assert_eq!(manager.recycled_count(), 0);
    }

    #[test]
    fn test_for_each_visits_live_entities_in_slot_order() {
        let mut manager = EntityManager::new();
        let a = manager.create();
        let b = manager.create();
        let c = manager.create();
        manager.destroy(b);

        let mut visited = Vec::new();
        manager.for_each(|e| visited.push(e));
        assert_eq!(visited, vec![a, c]);
    }
}
