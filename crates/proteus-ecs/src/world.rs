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

//! The World facade composing entities, components, and systems.

use crate::component::Component;
use crate::entity_manager::EntityManager;
use crate::query::{Query, QueryTuple, View};
use crate::registry::ComponentRegistry;
use crate::system::{System, SystemFn, SystemRegistry};
use crate::systems::FunctionSystem;
use proteus_core::{Entity, Stopwatch};
use proteus_telemetry::profiler;

/// The central container for the simulation: entity manager, component
/// registry, and system registry, plus the per-tick entry point.
///
/// A tick is a profiler frame wrapped around one pass over the enabled
/// systems in registration order.
#[derive(Default)]
pub struct World {
    entities: EntityManager,
    components: ComponentRegistry,
    systems: SystemRegistry,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self {
            entities: EntityManager::new(),
            components: ComponentRegistry::new(),
            systems: SystemRegistry::new(),
        }
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Creates a new entity.
    pub fn create_entity(&mut self) -> Entity {
        self.entities.create()
    }

    /// Destroys an entity and removes all of its components.
    ///
    /// Returns `true` iff the entity was alive. The component fan-out runs
    /// only for entities that were actually alive, so stale handles cannot
    /// disturb a recycled slot's components.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if self.entities.destroy(entity) {
            self.components.on_entity_destroyed(entity);
            true
        } else {
            false
        }
    }

    /// Returns `true` if the exact handle refers to a live entity.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Reserves capacity for `count` entity slots.
    pub fn reserve_entities(&mut self, count: usize) {
        self.entities.reserve(count);
    }

    /// Starts a fluent entity build: create, attach components, done.
    pub fn build_entity(&mut self) -> EntityBuilder<'_> {
        let entity = self.create_entity();
        EntityBuilder {
            world: self,
            entity,
        }
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attaches (or replaces) a component on an entity and returns a
    /// mutable reference to the stored value.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> &mut T {
        self.components.array_mut::<T>().set(entity, component)
    }

    /// Returns the `T` component of `entity`, if present.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components.array::<T>()?.get(entity)
    }

    /// Returns the `T` component of `entity` mutably, if present.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.array_mut::<T>().get_mut(entity)
    }

    /// Returns `true` if `entity` has a `T` component.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components
            .array::<T>()
            .is_some_and(|array| array.has(entity))
    }

    /// Removes the `T` component from `entity`. A no-op if absent.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) {
        self.components.array_mut::<T>().remove(entity);
    }

    /// Registers a component type ahead of first use.
    pub fn register_component<T: Component>(&mut self) {
        self.components.register::<T>();
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Creates a streaming join over the entities holding every component
    /// in `Q`.
    pub fn query<Q: QueryTuple>(&mut self) -> Query<'_, Q> {
        Query::new(&mut self.components)
    }

    /// Creates an iterator over `(Entity, components)` for read-only
    /// traversal.
    pub fn view<Q: QueryTuple>(&mut self) -> View<'_, Q> {
        View::new(&mut self.components)
    }

    // ── Systems ──────────────────────────────────────────────────────

    /// Appends a system to the pipeline and returns a reference to it.
    pub fn register_system<S: System>(&mut self, system: S) -> &mut S {
        self.systems.register(system)
    }

    /// Returns the first system of type `S`, if registered.
    pub fn get_system<S: System>(&self) -> Option<&S> {
        self.systems.get::<S>()
    }

    /// Returns the first system of type `S` mutably, if registered.
    pub fn get_system_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems.get_mut::<S>()
    }

    /// Number of registered systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Replaces the first system of type `Old` with `new`, in place.
    ///
    /// `Old`'s `shutdown` runs before `new`'s `init`; both observe this
    /// world. Registration order of the other systems is untouched.
    pub fn replace_system<Old: System, New: System>(&mut self, new: New) -> &mut New {
        let mut systems = std::mem::take(&mut self.systems);
        let index = systems.replace_index::<Old, New>(self, new);
        self.restore_systems(systems);
        self.systems.downcast_at::<New>(index)
    }

    /// Replaces the first system whose display name is `name` with `new`.
    pub fn replace_system_by_name<New: System>(&mut self, name: &str, new: New) -> &mut New {
        let mut systems = std::mem::take(&mut self.systems);
        let index = systems.replace_by_name_index(self, name, new);
        self.restore_systems(systems);
        self.systems.downcast_at::<New>(index)
    }

    /// Installs a generated update function under `name`, replacing the
    /// system currently carrying that display name (or appending).
    ///
    /// The swap happens between ticks; the next `update` pass already runs
    /// the new function.
    pub fn install_system_fn(&mut self, name: &str, func: SystemFn) -> &mut FunctionSystem {
        log::info!("World: installing generated system '{name}'.");
        self.replace_system_by_name(name, FunctionSystem::new(name, func))
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Initializes every registered system.
    pub fn init(&mut self) {
        let mut systems = std::mem::take(&mut self.systems);
        systems.init_all(self);
        self.restore_systems(systems);
    }

    /// Runs one pass over the enabled systems without profiler framing.
    pub fn update(&mut self, dt: f32) {
        let mut systems = std::mem::take(&mut self.systems);
        systems.update_all(self, dt);
        self.restore_systems(systems);
    }

    /// Advances the simulation by one frame.
    ///
    /// Equivalent to `begin_frame`, a full system update pass, stamping the
    /// frame's entity and system counts, then `end_frame`. With the
    /// profiler uninitialized the framing calls are no-ops and the tick
    /// stays live.
    pub fn tick(&mut self, dt: f32) {
        profiler::begin_frame();

        let update_timer = Stopwatch::new();
        self.update(dt);
        if let Some(elapsed) = update_timer.elapsed() {
            profiler::set_update_time(elapsed);
        }

        profiler::set_entity_count(self.entity_count() as u32);
        profiler::set_system_count(self.system_count() as u32);
        profiler::end_frame();
    }

    /// Shuts every system down, in reverse registration order.
    pub fn shutdown(&mut self) {
        let mut systems = std::mem::take(&mut self.systems);
        systems.shutdown_all(self);
        self.restore_systems(systems);
    }

    /// Destroys all entities and components. Systems are kept.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.clear();
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The entity manager.
    pub fn entity_manager(&self) -> &EntityManager {
        &self.entities
    }

    /// The component registry.
    pub fn component_registry(&self) -> &ComponentRegistry {
        &self.components
    }

    /// The component registry, mutably.
    pub fn component_registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// The system registry.
    pub fn system_registry(&self) -> &SystemRegistry {
        &self.systems
    }

    /// The system registry, mutably.
    pub fn system_registry_mut(&mut self) -> &mut SystemRegistry {
        &mut self.systems
    }

    /// Reattaches the registry after a detached system pass. Systems that
    /// were registered while the pass ran landed in the placeholder
    /// registry; they are appended behind the in-flight set.
    fn restore_systems(&mut self, systems: SystemRegistry) {
        let added = std::mem::replace(&mut self.systems, systems);
        for system in added.into_inner() {
            self.systems.push_boxed(system);
        }
    }
}

/// Fluent builder attaching components to a freshly created entity.
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl<'w> EntityBuilder<'w> {
    /// Attaches a component to the entity under construction.
    pub fn with<T: Component>(self, component: T) -> Self {
        self.world.add_component(self.entity, component);
        self
    }

    /// Returns the built entity.
    pub fn entity(&self) -> Entity {
        self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Transform, Velocity};
    use proteus_core::math::Vec3;

    #[test]
    fn test_entity_lifecycle_through_world() {
        let mut world = World::new();
        let e1 = world.create_entity();
        let e2 = world.create_entity();

        assert_eq!(world.entity_count(), 2);
        assert!(world.is_alive(e1));

        assert!(world.destroy_entity(e1));
        assert!(!world.destroy_entity(e1));
        assert_eq!(world.entity_count(), 1);
        assert!(world.is_alive(e2));
    }

    #[test]
    fn test_destroy_removes_all_components() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Transform::default());
        world.add_component(e, Velocity::default());
        world.add_component(e, Health::new(50.0));

        assert!(world.destroy_entity(e));

        assert!(!world.has_component::<Transform>(e));
        assert!(!world.has_component::<Velocity>(e));
        assert!(!world.has_component::<Health>(e));
    }

    #[test]
    fn test_destroying_stale_handle_spares_recycled_slot() {
        let mut world = World::new();
        let old = world.create_entity();
        world.destroy_entity(old);

        let reborn = world.create_entity();
        assert_eq!(reborn.index, old.index);
        world.add_component(reborn, Transform::default());

        // The stale handle must not strip the new occupant's components.
        assert!(!world.destroy_entity(old));
        assert!(world.has_component::<Transform>(reborn));
    }

    #[test]
    fn test_component_roundtrip() {
        let mut world = World::new();
        let e = world.create_entity();

        world.add_component(e, Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        assert!(world.has_component::<Transform>(e));
        assert_eq!(
            world.get_component::<Transform>(e).unwrap().position,
            Vec3::new(1.0, 2.0, 3.0)
        );

        world.get_component_mut::<Transform>(e).unwrap().position.x = 9.0;
        assert_eq!(world.get_component::<Transform>(e).unwrap().position.x, 9.0);

        world.remove_component::<Transform>(e);
        assert!(!world.has_component::<Transform>(e));
        assert!(world.get_component::<Transform>(e).is_none());
    }

    #[test]
    fn test_two_component_join_through_world() {
        let mut world = World::new();
        let e1 = world
            .build_entity()
            .with(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .with(Velocity::from_linear(Vec3::new(0.1, 0.0, 0.0)))
            .entity();
        let e2 = world
            .build_entity()
            .with(Transform::from_position(Vec3::new(2.0, 0.0, 0.0)))
            .with(Velocity::from_linear(Vec3::new(0.2, 0.0, 0.0)))
            .with(Health::new(10.0))
            .entity();
        let e3 = world
            .build_entity()
            .with(Transform::from_position(Vec3::new(3.0, 0.0, 0.0)))
            .entity();

        assert_eq!(world.query::<(Transform, Velocity)>().count(), 2);

        let dt = 1.0;
        world
            .query::<(Transform, Velocity)>()
            .for_each_mut(|_, (transform, velocity)| {
                transform.position.x += velocity.linear.x * dt;
            });

        let x = |e| world.get_component::<Transform>(e).unwrap().position.x;
        assert!((x(e1) - 1.1).abs() < 1e-6);
        assert!((x(e2) - 2.2).abs() < 1e-6);
        assert!((x(e3) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_clear_keeps_systems() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Transform::default());
        world.register_system(crate::systems::CleanupSystem::new());

        world.clear();

        assert_eq!(world.entity_count(), 0);
        assert!(!world.has_component::<Transform>(e));
        assert_eq!(world.system_count(), 1);
    }
}
