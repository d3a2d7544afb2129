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

//! Velocity integration with hot-swappable Scalar and SIMD variants.

use crate::components::{Transform, Velocity};
use crate::system::{System, SystemBase, SystemVariant, VariantSystem};
use crate::world::World;
use std::any::Any;

/// Integrates linear velocity into position: `position += linear * dt`.
///
/// Variant-capable. The SIMD path vectorizes the per-entity `Vec3` update
/// with 4-float SSE2 operations (the padded `Vec3` layout keeps the loads in
/// bounds); it produces results numerically equivalent to the scalar path.
/// On targets without SSE2 only the Scalar variant is offered.
pub struct VelocitySystem {
    base: SystemBase,
    current_variant: SystemVariant,
}

impl VelocitySystem {
    /// Creates the system in its Scalar variant.
    pub fn new() -> Self {
        Self {
            base: SystemBase::new("VelocitySystem"),
            current_variant: SystemVariant::Scalar,
        }
    }

    fn update_scalar(&self, world: &mut World, dt: f32) {
        world
            .query::<(Transform, Velocity)>()
            .for_each_mut(|_, (transform, velocity)| {
                transform.position += velocity.linear * dt;
            });
    }

    #[cfg(target_arch = "x86_64")]
    fn update_simd(&self, world: &mut World, dt: f32) {
        use std::arch::x86_64::{_mm_add_ps, _mm_loadu_ps, _mm_mul_ps, _mm_set1_ps, _mm_storeu_ps};

        // SSE2 is part of the x86_64 baseline, so no runtime detection is
        // needed here. Storage is AoS, so this vectorizes one Vec3 per
        // entity; the fourth lane is the zero padding float.
        world
            .query::<(Transform, Velocity)>()
            .for_each_mut(|_, (transform, velocity)| unsafe {
                let dt_vec = _mm_set1_ps(dt);
                let pos = _mm_loadu_ps(&transform.position.x);
                let vel = _mm_loadu_ps(&velocity.linear.x);
                let out = _mm_add_ps(pos, _mm_mul_ps(vel, dt_vec));
                _mm_storeu_ps(&mut transform.position.x, out);
            });
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn update_simd(&self, world: &mut World, dt: f32) {
        self.update_scalar(world, dt);
    }
}

impl Default for VelocitySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for VelocitySystem {
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
        match self.current_variant {
            SystemVariant::SIMD => self.update_simd(world, dt),
            _ => self.update_scalar(world, dt),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn variant(&self) -> Option<&dyn VariantSystem> {
        Some(self)
    }

    fn variant_mut(&mut self) -> Option<&mut dyn VariantSystem> {
        Some(self)
    }
}

impl VariantSystem for VelocitySystem {
    fn available_variants(&self) -> Vec<SystemVariant> {
        let mut variants = vec![SystemVariant::Scalar];
        if cfg!(target_arch = "x86_64") {
            variants.push(SystemVariant::SIMD);
        }
        variants
    }

    fn current_variant(&self) -> SystemVariant {
        self.current_variant
    }

    fn switch_variant(&mut self, variant: SystemVariant) -> bool {
        if self.available_variants().contains(&variant) {
            self.current_variant = variant;
            return true;
        }
        false
    }
}
