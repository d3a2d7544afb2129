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

use crate::system::{System, SystemBase, SystemFn};
use crate::world::World;
use std::any::Any;

/// A system whose `update` forwards to an externally supplied function
/// pointer.
///
/// This is the hot-swap boundary for generated code: a code generator hands
/// over a `fn(&mut World, f32)` and the proxy is installed atomically
/// between ticks via
/// [`World::install_system_fn`](crate::world::World::install_system_fn).
pub struct FunctionSystem {
    base: SystemBase,
    func: SystemFn,
}

impl FunctionSystem {
    /// Wraps `func` under the given display name.
    pub fn new(name: impl Into<String>, func: SystemFn) -> Self {
        Self {
            base: SystemBase::new(name),
            func,
        }
    }

    /// The wrapped function pointer.
    pub fn func(&self) -> SystemFn {
        self.func
    }
}

impl System for FunctionSystem {
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
        (self.func)(world, dt);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
