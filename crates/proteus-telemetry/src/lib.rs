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

//! # Proteus Telemetry
//!
//! Process-wide frame profiler: frame boundaries, named zones, a rolling
//! history ring, and aggregated percentile statistics.
//!
//! The profiler is a guarded singleton with an explicit lifecycle. Until
//! [`profiler::init`] is called every entry point is a no-op, so simulation
//! ticks stay live when profiling is disabled.

#![warn(missing_docs)]

mod frame;
pub mod profiler;
mod scoped;

pub use frame::{FrameStats, ProfilerStats, Zone};
pub use scoped::ScopedZone;
