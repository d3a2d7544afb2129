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

//! RAII zone guard for scope-based timing.

use crate::profiler;

/// Opens a profiler zone on construction and closes it on drop, so the
/// measurement is recorded even on early returns.
pub struct ScopedZone {
    zone_id: u64,
}

impl ScopedZone {
    /// Opens a zone with the given name and source location.
    pub fn new(name: impl Into<String>, file: &'static str, line: u32) -> Self {
        Self {
            zone_id: profiler::begin_zone(name, file, line),
        }
    }
}

impl Drop for ScopedZone {
    fn drop(&mut self) {
        profiler::end_zone(self.zone_id);
    }
}

/// Profiles the rest of the enclosing scope under the given zone name.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_zone = $crate::ScopedZone::new($name, file!(), line!());
    };
}
