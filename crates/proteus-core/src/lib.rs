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

//! # Proteus Core
//!
//! Foundational crate containing the shared identity types, error taxonomy,
//! event bus, math primitives, and memory instrumentation used by the rest
//! of the simulation core.

#![warn(missing_docs)]

pub mod entity;
pub mod error;
pub mod event;
pub mod math;
pub mod memory;
pub mod utils;

pub use entity::{Entity, INVALID_ENTITY};
pub use error::ErrorCode;
pub use event::EventBus;
pub use utils::timer::Stopwatch;
