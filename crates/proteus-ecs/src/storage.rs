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

//! Sparse-set component storage.

use crate::component::Component;
use proteus_core::Entity;
use std::any::{Any, TypeId};

/// Sentinel marking an empty slot in the sparse index array.
const INVALID_INDEX: usize = usize::MAX;

/// Type-erased interface over a [`ComponentArray`].
///
/// The registry stores arrays behind this trait; typed access downcasts
/// through `as_any`, which is sound because each array is created by the
/// same generic that later recovers it.
pub trait ComponentStore {
    /// `TypeId` of the stored component type.
    fn component_type_id(&self) -> TypeId;

    /// Number of components stored.
    fn len(&self) -> usize;

    /// Returns `true` if no components are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `entity` has a component in this array.
    fn has(&self, entity: Entity) -> bool;

    /// Removes the component for `entity`, if present.
    fn remove(&mut self, entity: Entity);

    /// Called when an entity is destroyed anywhere in the world.
    fn on_entity_destroyed(&mut self, entity: Entity);

    /// Removes every component.
    fn clear(&mut self);

    /// Upcast for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse-set storage for components of type `T`.
///
/// Three parallel structures back the set: `dense_entities` and `dense`
/// (same length, densely packed), and `sparse`, indexed by entity index,
/// holding either a dense position or [`INVALID_INDEX`].
///
/// Invariants:
/// - `sparse[dense_entities[d].index] == d` for every dense index `d`.
/// - Removal swaps with the last entry to preserve density; dense order of
///   the remaining entries is not preserved.
///
/// Structural mutation (set/remove) while iterating the same array is not
/// supported; collect entities first and mutate afterwards.
#[derive(Debug, Default)]
pub struct ComponentArray<T: Component> {
    dense_entities: Vec<Entity>,
    dense: Vec<T>,
    sparse: Vec<usize>,
}

impl<T: Component> ComponentArray<T> {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self {
            dense_entities: Vec::new(),
            dense: Vec::new(),
            sparse: Vec::new(),
        }
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let slot = entity.index as usize;
        let dense_idx = *self.sparse.get(slot)?;
        if dense_idx == INVALID_INDEX || dense_idx >= self.dense_entities.len() {
            return None;
        }
        if self.dense_entities[dense_idx] != entity {
            return None;
        }
        Some(dense_idx)
    }

    /// Inserts or replaces the component for `entity` and returns a mutable
    /// reference to it. O(1) amortized.
    ///
    /// Pointers to other entries are not kept valid across a call (the dense
    /// vector may reallocate).
    pub fn set(&mut self, entity: Entity, component: T) -> &mut T {
        if let Some(dense_idx) = self.dense_index(entity) {
            self.dense[dense_idx] = component;
            return &mut self.dense[dense_idx];
        }

        let slot = entity.index as usize;
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, INVALID_INDEX);
        }

        self.sparse[slot] = self.dense_entities.len();
        self.dense_entities.push(entity);
        self.dense.push(component);
        self.dense.last_mut().unwrap()
    }

    /// Returns the component for `entity`, if present.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|idx| &self.dense[idx])
    }

    /// Returns the component for `entity` mutably, if present.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.dense_index(entity).map(|idx| &mut self.dense[idx])
    }

    /// Returns `true` if `entity` has a component here.
    pub fn has(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Removes the component for `entity`. O(1); a no-op if absent.
    ///
    /// Uses swap-with-last: the formerly-last entry takes the removed slot
    /// and its sparse index is updated accordingly.
    pub fn remove(&mut self, entity: Entity) {
        let Some(dense_idx) = self.dense_index(entity) else {
            return;
        };
        let last_idx = self.dense_entities.len() - 1;

        if dense_idx != last_idx {
            self.dense_entities.swap(dense_idx, last_idx);
            self.dense.swap(dense_idx, last_idx);
            self.sparse[self.dense_entities[dense_idx].index as usize] = dense_idx;
        }

        self.dense_entities.pop();
        self.dense.pop();
        self.sparse[entity.index as usize] = INVALID_INDEX;
    }

    /// Number of components stored.
    pub fn len(&self) -> usize {
        self.dense_entities.len()
    }

    /// Returns `true` if no components are stored.
    pub fn is_empty(&self) -> bool {
        self.dense_entities.is_empty()
    }

    /// Iterates all `(entity, &component)` pairs in dense order.
    pub fn for_each(&self, mut func: impl FnMut(Entity, &T)) {
        for i in 0..self.dense_entities.len() {
            func(self.dense_entities[i], &self.dense[i]);
        }
    }

    /// Iterates all `(entity, &mut component)` pairs in dense order.
    ///
    /// The visited component may be mutated through the closure; structural
    /// mutation of any component array during iteration is not allowed.
    pub fn for_each_mut(&mut self, mut func: impl FnMut(Entity, &mut T)) {
        for i in 0..self.dense_entities.len() {
            func(self.dense_entities[i], &mut self.dense[i]);
        }
    }

    /// The dense entity list backing this array.
    pub fn entities(&self) -> &[Entity] {
        &self.dense_entities
    }

    /// Direct contiguous view of the dense component data, for bulk access.
    pub fn data(&self) -> &[T] {
        &self.dense
    }

    /// Mutable contiguous view of the dense component data.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Reserves capacity for `count` components.
    pub fn reserve(&mut self, count: usize) {
        self.dense_entities.reserve(count);
        self.dense.reserve(count);
    }

    /// Removes every component.
    pub fn clear(&mut self) {
        self.dense_entities.clear();
        self.dense.clear();
        self.sparse.clear();
    }
}

impl<T: Component> ComponentStore for ComponentArray<T> {
    fn component_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn len(&self) -> usize {
        self.dense_entities.len()
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentArray::has(self, entity)
    }

    fn remove(&mut self, entity: Entity) {
        ComponentArray::remove(self, entity);
    }

    fn on_entity_destroyed(&mut self, entity: Entity) {
        ComponentArray::remove(self, entity);
    }

    fn clear(&mut self) {
        ComponentArray::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
