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

//! Data carried by the profiler: per-frame statistics, per-zone timings, and
//! the aggregate derived from the history ring.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistics for a single frame. All durations have nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Monotonic frame number stamped at `begin_frame`.
    pub frame_number: u64,
    /// Wall time between `begin_frame` and `end_frame`.
    pub total_time: Duration,
    /// Time spent updating systems, when recorded by the host.
    pub update_time: Duration,
    /// Time spent rendering, when recorded by the host.
    pub render_time: Duration,
    /// Live entity count stamped for this frame.
    pub entity_count: u32,
    /// Registered system count stamped for this frame.
    pub system_count: u32,
    /// Bytes attributed to this frame via the recording APIs.
    pub memory_used: u64,
    /// Allocations recorded during this frame.
    pub allocation_count: u64,
    /// Deallocations recorded during this frame.
    pub deallocation_count: u64,
}

impl FrameStats {
    /// An all-zero frame record.
    pub const fn new() -> Self {
        Self {
            frame_number: 0,
            total_time: Duration::ZERO,
            update_time: Duration::ZERO,
            render_time: Duration::ZERO,
            entity_count: 0,
            system_count: 0,
            memory_used: 0,
            allocation_count: 0,
            deallocation_count: 0,
        }
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A named interval within a frame, bracketed by `begin_zone`/`end_zone`.
///
/// The id is the zone's index within the current frame's zone vector; zones
/// are reset at every `begin_frame`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    /// Index of this zone within the frame.
    pub id: u64,
    /// Display name of the timed section.
    pub name: String,
    /// Source file that opened the zone.
    pub file: &'static str,
    /// Source line that opened the zone.
    pub line: u32,
    /// Wall time between begin and end.
    pub total_time: Duration,
    /// Time spent in the zone excluding child zones.
    pub self_time: Duration,
    /// Number of times this zone was entered.
    pub call_count: u64,
    /// Id of the enclosing zone, or 0 for root zones.
    pub parent_id: u64,
}

/// Aggregated statistics over the frame history ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilerStats {
    /// Mean frame time (integer nanosecond division).
    pub avg_frame_time: Duration,
    /// Fastest frame in the history.
    pub min_frame_time: Duration,
    /// Slowest frame in the history.
    pub max_frame_time: Duration,
    /// 95th percentile frame time.
    pub p95_frame_time: Duration,
    /// 99th percentile frame time.
    pub p99_frame_time: Duration,
    /// Frames per second derived from the mean frame time.
    pub avg_fps: f64,
    /// Frames per second of the slowest frame.
    pub min_fps: f64,
    /// Frames per second of the fastest frame.
    pub max_fps: f64,
    /// Number of frames exceeding [`ProfilerStats::spike_threshold`].
    pub spike_count: u32,
    /// Twice the mean frame time.
    pub spike_threshold: Duration,
    /// Number of frames the aggregate was computed over.
    pub sample_count: u64,
}

impl Default for ProfilerStats {
    fn default() -> Self {
        Self {
            avg_frame_time: Duration::ZERO,
            min_frame_time: Duration::MAX,
            max_frame_time: Duration::ZERO,
            p95_frame_time: Duration::ZERO,
            p99_frame_time: Duration::ZERO,
            avg_fps: 0.0,
            min_fps: 0.0,
            max_fps: 0.0,
            spike_count: 0,
            spike_threshold: Duration::ZERO,
            sample_count: 0,
        }
    }
}
