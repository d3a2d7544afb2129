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

//! Error taxonomy shared across the simulation core.
//!
//! Hot-path failures are represented as returned `Option`s or booleans;
//! `ErrorCode` exists for the operations and collaborators that report a
//! categorized outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorized outcome of a core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The operation completed successfully.
    Success,
    /// A caller-supplied argument was rejected.
    InvalidArgument,
    /// An allocation failed. Treated as fatal by the core.
    OutOfMemory,
    /// The addressed entity, component, or system does not exist.
    NotFound,
    /// The target already exists and cannot be created again.
    AlreadyExists,
    /// The operation is not legal in the current lifecycle state.
    InvalidState,
    /// The operation did not complete within its allotted time.
    Timeout,
    /// The requested capability is not implemented.
    NotImplemented,
    /// An underlying platform or OS call failed.
    SystemError,
    /// A validation pass rejected the requested change.
    ValidationFailed,
    /// The requested change must be rolled back by a higher layer.
    RollbackRequired,
}

impl ErrorCode {
    /// Returns the identifier of this code as a string, verbatim.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::InvalidArgument => "InvalidArgument",
            ErrorCode::OutOfMemory => "OutOfMemory",
            ErrorCode::NotFound => "NotFound",
            ErrorCode::AlreadyExists => "AlreadyExists",
            ErrorCode::InvalidState => "InvalidState",
            ErrorCode::Timeout => "Timeout",
            ErrorCode::NotImplemented => "NotImplemented",
            ErrorCode::SystemError => "SystemError",
            ErrorCode::ValidationFailed => "ValidationFailed",
            ErrorCode::RollbackRequired => "RollbackRequired",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for ErrorCode {}
