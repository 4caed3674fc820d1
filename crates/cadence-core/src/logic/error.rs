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

//! Errors raised while configuring the scheduler.
//!
//! Scheduling itself never fails: operations on stale handles are no-ops and
//! storage grows on demand. Only configuration can be rejected.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or applying a [`LogicConfig`](super::LogicConfig).
#[derive(Debug, Error)]
pub enum LogicError {
    /// A storage block must hold at least one slot.
    #[error("invalid slots_per_block {0}: a block must hold at least one slot")]
    InvalidBlockSize(usize),

    /// The configuration file could not be read or written.
    #[error("failed to access config file '{path}': {source}")]
    Io {
        /// The path of the configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed or serialized.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
