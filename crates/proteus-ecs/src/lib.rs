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

//! # Proteus ECS
//!
//! A sparse-set Entity-Component-System with a hot-swappable execution
//! pipeline. Component storage guarantees O(1) insert/remove/lookup with
//! dense, cache-friendly iteration; the system registry supports in-place
//! replacement while preserving registration order; variant-capable systems
//! expose selectable implementation strategies for the adaptive controller.
//!
//! The primary entry point is the [`World`] struct.

mod bitset;
mod component;
mod components;
mod entity_manager;
mod query;
mod registry;
mod storage;
mod system;
pub mod systems;
mod world;

pub use component::Component;
pub use components::*;
pub use entity_manager::EntityManager;
pub use proteus_core::math::{Quat, Vec3};
pub use proteus_core::{Entity, INVALID_ENTITY};
pub use query::{Query, QueryTuple, View};
pub use registry::ComponentRegistry;
pub use storage::{ComponentArray, ComponentStore};
pub use system::{
    System, SystemBase, SystemFn, SystemRegistry, SystemVariant, VariantSystem,
};
pub use world::{EntityBuilder, World};
