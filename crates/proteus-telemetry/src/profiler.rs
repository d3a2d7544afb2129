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

//! The process-wide frame profiler.
//!
//! State lives behind one internal mutex; the frame counter and the
//! initialized flag are relaxed atomics so cheap reads never contend.
//! Frame and zone lifecycles are single-threaded by contract (the tick
//! thread); the recording APIs and stat queries tolerate other threads.

use crate::frame::{FrameStats, ProfilerStats, Zone};
use proteus_core::Stopwatch;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Default number of frames retained in the history ring.
pub const DEFAULT_HISTORY_SIZE: usize = 300;

/// Zone buffer capacity reserved at init.
const ZONE_RESERVE: usize = 256;

struct ProfilerState {
    history: VecDeque<FrameStats>,
    zones: Vec<Zone>,
    zone_starts: Vec<Stopwatch>,
    current: FrameStats,
    frame_start: Option<Stopwatch>,
    history_size: usize,
}

impl ProfilerState {
    const fn new() -> Self {
        Self {
            history: VecDeque::new(),
            zones: Vec::new(),
            zone_starts: Vec::new(),
            current: FrameStats::new(),
            frame_start: None,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

static STATE: Mutex<ProfilerState> = Mutex::new(ProfilerState::new());
static FRAME_NUMBER: AtomicU64 = AtomicU64::new(0);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

fn initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

/// Initializes the profiler with the given history ring capacity.
pub fn init(history_size: usize) {
    let Ok(mut state) = STATE.lock() else { return };
    state.history_size = history_size;
    state.history.clear();
    state.history.reserve(history_size);
    state.zones.clear();
    state.zones.reserve(ZONE_RESERVE);
    state.zone_starts.clear();
    state.zone_starts.reserve(ZONE_RESERVE);
    state.current = FrameStats::new();
    state.frame_start = None;
    FRAME_NUMBER.store(0, Ordering::Relaxed);
    INITIALIZED.store(true, Ordering::Release);

    log::info!("Profiler initialized with history size {history_size}.");
}

/// Shuts the profiler down and drops all recorded data.
pub fn shutdown() {
    let Ok(mut state) = STATE.lock() else { return };
    state.history.clear();
    state.zones.clear();
    state.zone_starts.clear();
    state.frame_start = None;
    INITIALIZED.store(false, Ordering::Release);

    log::info!("Profiler shut down.");
}

/// Opens a new frame: snapshots the start time, resets the in-flight frame
/// record and zone buffers, and stamps the current frame number.
///
/// A no-op while the profiler is uninitialized.
pub fn begin_frame() {
    if !initialized() {
        return;
    }
    let Ok(mut state) = STATE.lock() else { return };
    state.frame_start = Some(Stopwatch::new());
    state.current = FrameStats::new();
    state.current.frame_number = FRAME_NUMBER.load(Ordering::Relaxed);
    state.zones.clear();
    state.zone_starts.clear();
}

/// Closes the current frame: computes its total time, appends it to the
/// history ring (evicting the oldest entry when full), and advances the
/// frame counter.
pub fn end_frame() {
    if !initialized() {
        return;
    }
    let Ok(mut state) = STATE.lock() else { return };
    let total = state
        .frame_start
        .and_then(|sw| sw.elapsed())
        .unwrap_or(Duration::ZERO);
    state.current.total_time = total;

    let frame = state.current;
    while state.history.len() >= state.history_size {
        state.history.pop_front();
    }
    state.history.push_back(frame);

    FRAME_NUMBER.fetch_add(1, Ordering::Relaxed);
}

/// Returns the current frame number.
pub fn current_frame() -> u64 {
    FRAME_NUMBER.load(Ordering::Relaxed)
}

/// Returns a copy of the in-flight frame's statistics.
pub fn current_frame_stats() -> FrameStats {
    STATE
        .lock()
        .map(|state| state.current)
        .unwrap_or_default()
}

/// Returns a snapshot of the frame history, oldest first.
pub fn frame_history() -> Vec<FrameStats> {
    STATE
        .lock()
        .map(|state| state.history.iter().copied().collect())
        .unwrap_or_default()
}

/// Clears the frame history without resetting the frame counter.
pub fn reset_stats() {
    if let Ok(mut state) = STATE.lock() {
        state.history.clear();
    }
}

/// Opens a named zone and returns its id within the current frame.
///
/// Returns 0 while the profiler is uninitialized; the matching
/// [`end_zone`] call is then a no-op.
pub fn begin_zone(name: impl Into<String>, file: &'static str, line: u32) -> u64 {
    if !initialized() {
        return 0;
    }
    let Ok(mut state) = STATE.lock() else { return 0 };
    let id = state.zones.len() as u64;
    state.zones.push(Zone {
        id,
        name: name.into(),
        file,
        line,
        total_time: Duration::ZERO,
        self_time: Duration::ZERO,
        call_count: 1,
        parent_id: 0,
    });
    state.zone_starts.push(Stopwatch::new());
    id
}

/// Closes the zone with the given id.
///
/// A no-op when uninitialized or when the id is out of range for the
/// current frame.
pub fn end_zone(zone_id: u64) {
    if !initialized() {
        return;
    }
    let Ok(mut state) = STATE.lock() else { return };
    let index = zone_id as usize;
    if index >= state.zones.len() {
        return;
    }
    let elapsed = state.zone_starts[index].elapsed().unwrap_or(Duration::ZERO);
    let zone = &mut state.zones[index];
    zone.total_time = elapsed;
    // TODO: subtract child zone time once parent ids are threaded through.
    zone.self_time = elapsed;
}

/// Returns the zones recorded so far in the current frame.
pub fn zones() -> Vec<Zone> {
    STATE
        .lock()
        .map(|state| state.zones.clone())
        .unwrap_or_default()
}

/// Adds `bytes` to the in-flight frame's memory counter.
pub fn record_allocation(bytes: u64) {
    if !initialized() {
        return;
    }
    if let Ok(mut state) = STATE.lock() {
        state.current.memory_used += bytes;
        state.current.allocation_count += 1;
    }
}

/// Subtracts `bytes` from the in-flight frame's memory counter, saturating
/// at zero.
pub fn record_deallocation(bytes: u64) {
    if !initialized() {
        return;
    }
    if let Ok(mut state) = STATE.lock() {
        state.current.memory_used = state.current.memory_used.saturating_sub(bytes);
        state.current.deallocation_count += 1;
    }
}

/// Stamps the live entity count on the in-flight frame.
pub fn set_entity_count(count: u32) {
    if !initialized() {
        return;
    }
    if let Ok(mut state) = STATE.lock() {
        state.current.entity_count = count;
    }
}

/// Stamps the registered system count on the in-flight frame.
pub fn set_system_count(count: u32) {
    if !initialized() {
        return;
    }
    if let Ok(mut state) = STATE.lock() {
        state.current.system_count = count;
    }
}

/// Stamps the time spent updating systems on the in-flight frame.
pub fn set_update_time(elapsed: Duration) {
    if !initialized() {
        return;
    }
    if let Ok(mut state) = STATE.lock() {
        state.current.update_time = elapsed;
    }
}

/// Stamps the time spent rendering on the in-flight frame.
pub fn set_render_time(elapsed: Duration) {
    if !initialized() {
        return;
    }
    if let Ok(mut state) = STATE.lock() {
        state.current.render_time = elapsed;
    }
}

/// Computes the aggregate statistics over the current history ring.
pub fn profiler_stats() -> ProfilerStats {
    STATE
        .lock()
        .map(|state| compute_stats(&state.history))
        .unwrap_or_default()
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let index = (p * (sorted.len() - 1) as f64) as usize;
    sorted[index]
}

fn compute_stats(history: &VecDeque<FrameStats>) -> ProfilerStats {
    let mut stats = ProfilerStats::default();
    if history.is_empty() {
        return stats;
    }

    stats.sample_count = history.len() as u64;

    let mut total_nanos: u128 = 0;
    for frame in history {
        total_nanos += frame.total_time.as_nanos();
        if frame.total_time < stats.min_frame_time {
            stats.min_frame_time = frame.total_time;
        }
        if frame.total_time > stats.max_frame_time {
            stats.max_frame_time = frame.total_time;
        }
    }
    stats.avg_frame_time = Duration::from_nanos((total_nanos / history.len() as u128) as u64);

    let mut sorted: Vec<Duration> = history.iter().map(|f| f.total_time).collect();
    sorted.sort_unstable();
    stats.p95_frame_time = percentile(&sorted, 0.95);
    stats.p99_frame_time = percentile(&sorted, 0.99);

    stats.avg_fps = 1.0 / stats.avg_frame_time.as_secs_f64();
    stats.min_fps = 1.0 / stats.max_frame_time.as_secs_f64();
    stats.max_fps = 1.0 / stats.min_frame_time.as_secs_f64();

    stats.spike_threshold = stats.avg_frame_time * 2;
    stats.spike_count = history
        .iter()
        .filter(|f| f.total_time > stats.spike_threshold)
        .count() as u32;

    stats
}
