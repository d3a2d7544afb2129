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

//! System trait, implementation variants, and the ordered system registry.

use crate::world::World;
use proteus_telemetry::profiler;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;

/// Signature of a generated system update function, as supplied by an
/// external code generator. Wrapped by
/// [`FunctionSystem`](crate::systems::FunctionSystem) for installation via
/// [`SystemRegistry::replace_by_name`].
pub type SystemFn = fn(&mut World, f32);

/// A stateful update routine invoked once per tick.
///
/// Identity is the concrete type (via `as_any`); the display name is a
/// mutable label used for diagnostics and name-keyed replacement.
pub trait System: Any {
    /// Display name of the system.
    fn name(&self) -> &str;

    /// Returns `true` if the system should be updated this tick.
    fn is_enabled(&self) -> bool;

    /// Enables or disables the system.
    fn set_enabled(&mut self, enabled: bool);

    /// Called once when the system enters the registry's init pass or is
    /// installed by replacement.
    fn init(&mut self, _world: &mut World) {}

    /// Advances the system by `dt` seconds.
    fn update(&mut self, world: &mut World, dt: f32);

    /// Called when the system is shut down or replaced.
    fn shutdown(&mut self, _world: &mut World) {}

    /// Upcast for identity checks and typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the variant capability of this system, if it has one.
    fn variant(&self) -> Option<&dyn VariantSystem> {
        None
    }

    /// Mutable variant capability of this system, if it has one.
    fn variant_mut(&mut self) -> Option<&mut dyn VariantSystem> {
        None
    }
}

/// Display name and enabled flag embedded by concrete systems.
#[derive(Debug, Clone)]
pub struct SystemBase {
    name: String,
    enabled: bool,
}

impl SystemBase {
    /// Creates an enabled base with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
        }
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Changes the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether the owning system is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the owning system.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// A selectable implementation strategy for a variant-capable system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemVariant {
    /// Straightforward per-entity implementation.
    Scalar,
    /// Vectorized implementation.
    SIMD,
    /// GPU-offloaded implementation.
    GPU,
    /// Degraded approximation trading accuracy for speed.
    Approximate,
}

impl SystemVariant {
    /// Returns the identifier of this variant as a string, verbatim.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SystemVariant::Scalar => "Scalar",
            SystemVariant::SIMD => "SIMD",
            SystemVariant::GPU => "GPU",
            SystemVariant::Approximate => "Approximate",
        }
    }
}

impl fmt::Display for SystemVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability exposed by systems with multiple hot-swappable
/// implementations.
///
/// The Scalar variant must always be available. Successful switches take
/// effect on the next `update` invocation.
pub trait VariantSystem {
    /// The variants this system can run.
    fn available_variants(&self) -> Vec<SystemVariant>;

    /// The variant currently selected.
    fn current_variant(&self) -> SystemVariant;

    /// Selects `variant`. Returns `false` if it is unsupported.
    fn switch_variant(&mut self, variant: SystemVariant) -> bool;
}

/// Ordered collection of systems with in-place replacement.
///
/// Registration order is preserved across all operations; replacement
/// reuses the replaced system's slot.
#[derive(Default)]
pub struct SystemRegistry {
    systems: Vec<Box<dyn System>>,
}

impl SystemRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Appends `system` and returns a reference to it.
    ///
    /// Registration never initializes: `init` runs in `init_all` or on
    /// replacement.
    pub fn register<S: System>(&mut self, system: S) -> &mut S {
        log::debug!("SystemRegistry: registered '{}'.", system.name());
        self.systems.push(Box::new(system));
        self.systems
            .last_mut()
            .unwrap()
            .as_any_mut()
            .downcast_mut::<S>()
            .expect("freshly registered system downcasts to its own type")
    }

    pub(crate) fn push_boxed(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    /// Returns the first system of type `S`, if registered.
    pub fn get<S: System>(&self) -> Option<&S> {
        self.systems
            .iter()
            .find_map(|system| system.as_any().downcast_ref::<S>())
    }

    /// Returns the first system of type `S` mutably, if registered.
    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems
            .iter_mut()
            .find_map(|system| system.as_any_mut().downcast_mut::<S>())
    }

    /// Replaces the first system of type `Old` with `new`, in place.
    ///
    /// The old system's `shutdown` runs before the new system's `init`;
    /// the slot index and the order of all other systems are preserved.
    /// If no `Old` is registered, `new` is appended and still initialized.
    pub fn replace<Old: System, New: System>(
        &mut self,
        world: &mut World,
        new: New,
    ) -> &mut New {
        let index = self.replace_index::<Old, New>(world, new);
        self.downcast_at::<New>(index)
    }

    /// Replaces the first system whose display name is `name` with `new`.
    ///
    /// Same contract as [`SystemRegistry::replace`], keyed by name.
    pub fn replace_by_name<New: System>(
        &mut self,
        world: &mut World,
        name: &str,
        new: New,
    ) -> &mut New {
        let index = self.replace_by_name_index(world, name, new);
        self.downcast_at::<New>(index)
    }

    pub(crate) fn replace_index<Old: System, New: System>(
        &mut self,
        world: &mut World,
        new: New,
    ) -> usize {
        let target = TypeId::of::<Old>();
        let position = self
            .systems
            .iter()
            .position(|system| system.as_any().type_id() == target);
        self.install_at(position, world, new)
    }

    pub(crate) fn replace_by_name_index<New: System>(
        &mut self,
        world: &mut World,
        name: &str,
        new: New,
    ) -> usize {
        let position = self.systems.iter().position(|system| system.name() == name);
        self.install_at(position, world, new)
    }

    fn install_at<New: System>(
        &mut self,
        position: Option<usize>,
        world: &mut World,
        new: New,
    ) -> usize {
        let index = match position {
            Some(index) => {
                log::info!(
                    "SystemRegistry: replacing '{}' with '{}' in slot {index}.",
                    self.systems[index].name(),
                    new.name()
                );
                self.systems[index].shutdown(world);
                self.systems[index] = Box::new(new);
                index
            }
            None => {
                log::info!(
                    "SystemRegistry: no replacement target, appending '{}'.",
                    new.name()
                );
                self.systems.push(Box::new(new));
                self.systems.len() - 1
            }
        };
        self.systems[index].init(world);
        index
    }

    pub(crate) fn downcast_at<S: System>(&mut self, index: usize) -> &mut S {
        self.systems[index]
            .as_any_mut()
            .downcast_mut::<S>()
            .expect("freshly installed system downcasts to its own type")
    }

    pub(crate) fn into_inner(self) -> Vec<Box<dyn System>> {
        self.systems
    }

    /// Initializes every system, in registration order.
    pub fn init_all(&mut self, world: &mut World) {
        for system in &mut self.systems {
            system.init(world);
        }
    }

    /// Updates every enabled system, in registration order.
    ///
    /// Each update runs inside a profiler zone named after the system.
    pub fn update_all(&mut self, world: &mut World, dt: f32) {
        for system in &mut self.systems {
            if !system.is_enabled() {
                continue;
            }
            let zone = profiler::begin_zone(system.name(), file!(), line!());
            system.update(world, dt);
            profiler::end_zone(zone);
        }
    }

    /// Shuts every system down, in reverse registration order.
    pub fn shutdown_all(&mut self, world: &mut World) {
        for system in self.systems.iter_mut().rev() {
            system.shutdown(world);
        }
    }

    /// Number of registered systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no systems are registered.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Iterates the systems in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn System> {
        self.systems.iter().map(|system| system.as_ref())
    }

    /// Iterates the systems mutably in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn System>> {
        self.systems.iter_mut()
    }

    /// Drops every system without running shutdown hooks.
    pub fn clear(&mut self) {
        self.systems.clear();
    }
}
