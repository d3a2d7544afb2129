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

//! Heuristic analysis of profiler aggregates into optimization hints.

use proteus_telemetry::{profiler, ProfilerStats};
use std::fmt;

/// Average FPS below which the engine is considered struggling.
const LOW_FPS_THRESHOLD: f64 = 30.0;
/// Minimum history size before FPS judgments are made.
const MIN_SAMPLES_FOR_FPS: u64 = 10;
/// Spike count above which frame pacing is flagged.
const SPIKE_WARN_COUNT: u32 = 5;

/// How urgent a hint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HintSeverity {
    /// Informational; no action needed.
    Info,
    /// Worth investigating.
    Warning,
    /// Actively degrading the simulation.
    Critical,
}

/// A single analysis finding.
#[derive(Debug, Clone)]
pub struct OptimizationHint {
    /// Subsystem the finding concerns.
    pub subsystem: String,
    /// Human-readable description.
    pub message: String,
    /// Urgency of the finding.
    pub severity: HintSeverity,
}

impl fmt::Display for OptimizationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] {}: {}",
            self.severity, self.subsystem, self.message
        )
    }
}

/// Snapshots profiler aggregates and derives [`OptimizationHint`]s.
#[derive(Debug, Default)]
pub struct StatsCollector {
    current: ProfilerStats,
}

impl StatsCollector {
    /// Creates a collector with an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes the snapshot from the profiler.
    pub fn collect(&mut self) {
        self.current = profiler::profiler_stats();
    }

    /// The most recent snapshot.
    pub fn current(&self) -> &ProfilerStats {
        &self.current
    }

    /// Derives hints from the current snapshot.
    pub fn analyze(&self) -> Vec<OptimizationHint> {
        Self::analyze_stats(&self.current)
    }

    fn analyze_stats(stats: &ProfilerStats) -> Vec<OptimizationHint> {
        let mut hints = Vec::new();

        if stats.sample_count > MIN_SAMPLES_FOR_FPS && stats.avg_fps < LOW_FPS_THRESHOLD {
            hints.push(OptimizationHint {
                subsystem: "Engine".to_owned(),
                message: format!(
                    "Low average FPS ({:.1} < {LOW_FPS_THRESHOLD:.0})",
                    stats.avg_fps
                ),
                severity: HintSeverity::Critical,
            });
        }

        if stats.spike_count > SPIKE_WARN_COUNT {
            hints.push(OptimizationHint {
                subsystem: "Engine".to_owned(),
                message: format!(
                    "Frame time spikes detected ({} above {:?})",
                    stats.spike_count, stats.spike_threshold
                ),
                severity: HintSeverity::Warning,
            });
        }

        hints
    }
}
