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

//! Type-erased registry over all component arrays.

use crate::component::Component;
use crate::storage::{ComponentArray, ComponentStore};
use proteus_core::Entity;
use std::any::TypeId;
use std::collections::HashMap;

/// Maps component types to their sparse-set arrays.
///
/// Arrays are created lazily on first typed access. Typed access recovers
/// the concrete array by downcasting; the downcast is sound because the
/// entry was created by the same generic under the same `TypeId` key.
#[derive(Default)]
pub struct ComponentRegistry {
    arrays: HashMap<TypeId, Box<dyn ComponentStore>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            arrays: HashMap::new(),
        }
    }

    /// Registers a component type ahead of first use. Idempotent.
    pub fn register<T: Component>(&mut self) {
        self.arrays
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentArray::<T>::new()));
    }

    /// Returns `true` if `T` has been registered.
    pub fn is_registered<T: Component>(&self) -> bool {
        self.arrays.contains_key(&TypeId::of::<T>())
    }

    /// Returns the array for `T`, if it has been registered.
    pub fn array<T: Component>(&self) -> Option<&ComponentArray<T>> {
        self.arrays
            .get(&TypeId::of::<T>())
            .and_then(|store| store.as_any().downcast_ref::<ComponentArray<T>>())
    }

    /// Returns the array for `T`, registering it on first access.
    pub fn array_mut<T: Component>(&mut self) -> &mut ComponentArray<T> {
        self.register::<T>();
        self.arrays
            .get_mut(&TypeId::of::<T>())
            .and_then(|store| store.as_any_mut().downcast_mut::<ComponentArray<T>>())
            .expect("component array stored under mismatched type id")
    }

    /// Returns the type-erased array stored under `type_id`, if any.
    pub fn array_by_id(&self, type_id: TypeId) -> Option<&dyn ComponentStore> {
        self.arrays.get(&type_id).map(|store| store.as_ref())
    }

    /// Mutable variant of [`ComponentRegistry::array_by_id`].
    pub fn array_by_id_mut(&mut self, type_id: TypeId) -> Option<&mut (dyn ComponentStore + '_)> {
        match self.arrays.get_mut(&type_id) {
            Some(store) => {
                let store: &mut (dyn ComponentStore + '_) = store.as_mut();
                Some(store)
            }
            None => None,
        }
    }

    /// Fans an entity destruction out to every registered array.
    ///
    /// Iteration order among arrays is unspecified but completes before
    /// returning.
    pub fn on_entity_destroyed(&mut self, entity: Entity) {
        for store in self.arrays.values_mut() {
            store.on_entity_destroyed(entity);
        }
    }

    /// Number of registered component types.
    pub fn array_count(&self) -> usize {
        self.arrays.len()
    }

    /// Drops every registered array.
    pub fn clear(&mut self) {
        self.arrays.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position(f32);
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity(f32);
    impl Component for Velocity {}

    fn entity(index: u32) -> Entity {
        Entity::new(index, 1)
    }

    #[test]
    fn test_lazy_registration_on_typed_access() {
        let mut registry = ComponentRegistry::new();
        assert!(!registry.is_registered::<Position>());
        assert!(registry.array::<Position>().is_none());

        registry.array_mut::<Position>().set(entity(0), Position(1.0));
        assert!(registry.is_registered::<Position>());
        assert_eq!(registry.array::<Position>().unwrap().len(), 1);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ComponentRegistry::new();
        registry.array_mut::<Position>().set(entity(0), Position(1.0));
        registry.register::<Position>();
        // Existing data survives re-registration.
        assert_eq!(registry.array::<Position>().unwrap().len(), 1);
        assert_eq!(registry.array_count(), 1);
    }

    #[test]
    fn test_type_erased_lookup() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Position>();

        let store = registry.array_by_id(TypeId::of::<Position>()).unwrap();
        assert_eq!(store.component_type_id(), TypeId::of::<Position>());
        assert!(registry.array_by_id(TypeId::of::<Velocity>()).is_none());
    }

    #[test]
    fn test_destroy_fans_out_to_every_array() {
        let mut registry = ComponentRegistry::new();
        let e = entity(0);
        let other = entity(1);
        registry.array_mut::<Position>().set(e, Position(1.0));
        registry.array_mut::<Position>().set(other, Position(2.0));
        registry.array_mut::<Velocity>().set(e, Velocity(3.0));

        registry.on_entity_destroyed(e);

        assert!(!registry.array::<Position>().unwrap().has(e));
        assert!(!registry.array::<Velocity>().unwrap().has(e));
        assert!(registry.array::<Position>().unwrap().has(other));
    }
}
