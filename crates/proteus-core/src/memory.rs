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

//! Tagged memory accounting and a tracking global allocator.
//!
//! Subsystems report their allocations against a [`MemoryTag`]; the counters
//! are relaxed atomics and safe to touch from any thread. Peak tracking uses
//! a compare-exchange loop so it never goes backwards under contention.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Allocation category used for per-subsystem memory accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryTag {
    /// Allocations that were not attributed to a subsystem.
    Unknown = 0,
    /// Core services (event bus, bookkeeping).
    Core,
    /// ECS bookkeeping that is not component data.
    Ecs,
    /// Dense component storage.
    Components,
    /// Entity slot metadata.
    Entities,
    /// System instances and registry storage.
    Systems,
    /// Profiler history and zone buffers.
    Profiler,
    /// Short-lived scratch allocations.
    Temporary,
    /// Debug-only allocations.
    Debug,
}

const TAG_COUNT: usize = 9;

impl MemoryTag {
    /// Returns the identifier of this tag as a string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MemoryTag::Unknown => "Unknown",
            MemoryTag::Core => "Core",
            MemoryTag::Ecs => "Ecs",
            MemoryTag::Components => "Components",
            MemoryTag::Entities => "Entities",
            MemoryTag::Systems => "Systems",
            MemoryTag::Profiler => "Profiler",
            MemoryTag::Temporary => "Temporary",
            MemoryTag::Debug => "Debug",
        }
    }
}

/// Snapshot of the counters for one tag (or the totals across all tags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Bytes currently attributed to the tag.
    pub current_bytes: usize,
    /// High-water mark of `current_bytes`.
    pub peak_bytes: usize,
    /// Number of allocations recorded.
    pub total_allocations: u64,
    /// Number of deallocations recorded.
    pub total_deallocations: u64,
}

struct TagTracker {
    current_bytes: AtomicUsize,
    peak_bytes: AtomicUsize,
    total_allocations: AtomicU64,
    total_deallocations: AtomicU64,
}

impl TagTracker {
    const fn new() -> Self {
        Self {
            current_bytes: AtomicUsize::new(0),
            peak_bytes: AtomicUsize::new(0),
            total_allocations: AtomicU64::new(0),
            total_deallocations: AtomicU64::new(0),
        }
    }
}

const TRACKER_INIT: TagTracker = TagTracker::new();
static TRACKERS: [TagTracker; TAG_COUNT] = [TRACKER_INIT; TAG_COUNT];

/// Records an allocation of `bytes` against `tag`.
pub fn track_allocation(tag: MemoryTag, bytes: usize) {
    let tracker = &TRACKERS[tag as usize];
    let current = tracker.current_bytes.fetch_add(bytes, Ordering::Relaxed) + bytes;

    // Lock-free peak update: retry while another thread holds a lower peak.
    let mut peak = tracker.peak_bytes.load(Ordering::Relaxed);
    while current > peak {
        match tracker.peak_bytes.compare_exchange_weak(
            peak,
            current,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(observed) => peak = observed,
        }
    }

    tracker.total_allocations.fetch_add(1, Ordering::Relaxed);
}

/// Records a deallocation of `bytes` against `tag`.
///
/// The current-bytes counter saturates at zero rather than underflowing.
pub fn track_deallocation(tag: MemoryTag, bytes: usize) {
    let tracker = &TRACKERS[tag as usize];
    let result = tracker
        .current_bytes
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
            Some(current.saturating_sub(bytes))
        });
    if result.is_err() {
        log::error!(
            "Memory tracking counter update failed during dealloc for tag {}.",
            tag.as_str()
        );
    }
    tracker.total_deallocations.fetch_add(1, Ordering::Relaxed);
}

/// Returns the counters recorded for a single tag.
pub fn memory_stats(tag: MemoryTag) -> MemoryStats {
    let tracker = &TRACKERS[tag as usize];
    MemoryStats {
        current_bytes: tracker.current_bytes.load(Ordering::Relaxed),
        peak_bytes: tracker.peak_bytes.load(Ordering::Relaxed),
        total_allocations: tracker.total_allocations.load(Ordering::Relaxed),
        total_deallocations: tracker.total_deallocations.load(Ordering::Relaxed),
    }
}

/// Returns the counters summed across every tag.
pub fn total_memory_stats() -> MemoryStats {
    let mut total = MemoryStats::default();
    for tracker in &TRACKERS {
        total.current_bytes += tracker.current_bytes.load(Ordering::Relaxed);
        total.peak_bytes += tracker.peak_bytes.load(Ordering::Relaxed);
        total.total_allocations += tracker.total_allocations.load(Ordering::Relaxed);
        total.total_deallocations += tracker.total_deallocations.load(Ordering::Relaxed);
    }
    total
}

/// Resets every tag counter to zero.
pub fn reset_memory_stats() {
    for tracker in &TRACKERS {
        tracker.current_bytes.store(0, Ordering::Relaxed);
        tracker.peak_bytes.store(0, Ordering::Relaxed);
        tracker.total_allocations.store(0, Ordering::Relaxed);
        tracker.total_deallocations.store(0, Ordering::Relaxed);
    }
}

/// Total bytes currently allocated through [`TrackingAllocator`].
static ALLOCATED_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Returns the bytes currently live under the tracking allocator, if one is
/// installed as the global allocator.
pub fn allocated_bytes() -> usize {
    ALLOCATED_BYTES.load(Ordering::Relaxed)
}

/// A wrapper around a `GlobalAlloc` implementation (defaults to `System`)
/// that maintains a process-wide count of currently allocated bytes.
///
/// Install it with `#[global_allocator]` in the host binary to feed the
/// `memory_used` figures reported by tooling.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackingAllocator<A = System> {
    inner: A,
}

impl<A> TrackingAllocator<A> {
    /// Creates a tracking allocator wrapping the given inner allocator.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            let result =
                ALLOCATED_BYTES.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                    current.checked_add(layout.size())
                });
            if result.is_err() {
                log::error!(
                    "Allocated-bytes counter overflowed during alloc. Size: {}",
                    layout.size()
                );
            }
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let result =
            ALLOCATED_BYTES.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_sub(layout.size())
            });
        if result.is_err() {
            log::error!(
                "Allocated-bytes counter underflowed during dealloc. Size: {}",
                layout.size()
            );
        }
        unsafe { self.inner.dealloc(ptr, layout) };
    }
}
