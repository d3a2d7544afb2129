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

use crate::components::{Acceleration, Velocity};
use crate::system::{System, SystemBase};
use crate::world::World;
use std::any::Any;

/// Applies acceleration to velocity: `velocity += acceleration * dt`.
pub struct AccelerationSystem {
    base: SystemBase,
}

impl AccelerationSystem {
    /// Creates the system.
    pub fn new() -> Self {
        Self {
            base: SystemBase::new("AccelerationSystem"),
        }
    }
}

impl Default for AccelerationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AccelerationSystem {
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
        world
            .query::<(Velocity, Acceleration)>()
            .for_each_mut(|_, (velocity, acceleration)| {
                velocity.linear += acceleration.0 * dt;
            });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proteus_core::math::Vec3;

    #[test]
    fn test_acceleration_is_integrated() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Velocity::default());
        world.add_component(e, Acceleration(Vec3::new(2.0, 0.0, 0.0)));

        let mut system = AccelerationSystem::new();
        system.update(&mut world, 0.5);

        let v = world.get_component::<Velocity>(e).unwrap();
        assert!((v.linear.x - 1.0).abs() < 1e-6);
    }
}
