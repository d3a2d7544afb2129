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

use crate::components::Destroyed;
use crate::system::{System, SystemBase};
use crate::world::World;
use std::any::Any;

/// Destroys every entity tagged [`Destroyed`].
///
/// Entities are collected first and destroyed afterwards, since structural
/// mutation is not allowed while iterating a component array.
pub struct CleanupSystem {
    base: SystemBase,
}

impl CleanupSystem {
    /// Creates the system.
    pub fn new() -> Self {
        Self {
            base: SystemBase::new("CleanupSystem"),
        }
    }
}

impl Default for CleanupSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CleanupSystem {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base.set_enabled(enabled);
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let doomed = world.query::<(Destroyed,)>().entities();
        if doomed.is_empty() {
            return;
        }

        log::debug!("CleanupSystem: destroying {} entities.", doomed.len());
        for entity in doomed {
            world.destroy_entity(entity);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
