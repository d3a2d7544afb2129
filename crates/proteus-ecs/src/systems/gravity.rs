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

use crate::components::{Gravity, Mass, Velocity};
use crate::system::{System, SystemBase};
use crate::world::World;
use proteus_core::math::Vec3;
use std::any::Any;
use std::collections::HashMap;

const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Applies gravity to every entity with `Velocity` and `Mass`:
/// `velocity += g * dt`, honoring a per-entity [`Gravity`] override.
pub struct GravitySystem {
    base: SystemBase,
}

impl GravitySystem {
    /// Creates the system.
    pub fn new() -> Self {
        Self {
            base: SystemBase::new("GravitySystem"),
        }
    }
}

impl Default for GravitySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GravitySystem {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base.set_enabled(enabled);
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        // Overrides are collected up front so the main pass keeps exclusive
        // access to the Velocity and Mass arrays.
        let mut overrides = HashMap::new();
        world.query::<(Gravity,)>().for_each(|entity, (gravity,)| {
            overrides.insert(entity, gravity.0);
        });

        world
            .query::<(Velocity, Mass)>()
            .for_each_mut(|entity, (velocity, _mass)| {
                let gravity = overrides.get(&entity).copied().unwrap_or(DEFAULT_GRAVITY);
                velocity.linear += gravity * dt;
            });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
