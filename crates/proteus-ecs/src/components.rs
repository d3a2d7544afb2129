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

//! Common simulation components.

use crate::component::Component;
use proteus_core::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation, and scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// Creates a transform at `position` with identity rotation and unit
    /// scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

impl Component for Transform {}

/// Linear and angular velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    /// Linear velocity in units per second.
    pub linear: Vec3,
    /// Angular velocity in radians per second.
    pub angular: Vec3,
}

impl Velocity {
    /// Creates a velocity with the given linear part and no spin.
    pub fn from_linear(linear: Vec3) -> Self {
        Self {
            linear,
            angular: Vec3::ZERO,
        }
    }
}

impl Component for Velocity {}

/// Mass with a precomputed inverse. A mass of zero means immovable
/// (inverse mass zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    /// Mass in kilograms.
    pub value: f32,
    /// `1 / value`, or zero for immovable bodies.
    pub inverse: f32,
}

impl Mass {
    /// Creates a mass, precomputing its inverse.
    pub fn new(value: f32) -> Self {
        Self {
            value,
            inverse: if value > 0.0 { 1.0 / value } else { 0.0 },
        }
    }
}

impl Default for Mass {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Component for Mass {}

/// Acceleration applied to velocity each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Acceleration(pub Vec3);

impl Component for Acceleration {}

/// Per-entity gravity override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity(pub Vec3);

impl Default for Gravity {
    fn default() -> Self {
        Self(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl Component for Gravity {}

/// Hit points of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current hit points.
    pub current: f32,
    /// Maximum hit points.
    pub max: f32,
}

impl Health {
    /// Creates a health component at full hit points.
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Component for Health {}

/// Tag: entity is active and should be processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Active;
impl Component for Active {}

/// Tag: entity never moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Static;
impl Component for Static {}

/// Tag: entity needs recalculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty;
impl Component for Dirty {}

/// Tag: entity should be rendered by the host's render shim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visible;
impl Component for Visible {}

/// Tag: entity is scheduled for destruction by the cleanup system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Destroyed;
impl Component for Destroyed {}
