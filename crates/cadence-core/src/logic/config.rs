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

//! Scheduler configuration.

use super::error::LogicError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of timer slots in one storage block when nothing else is configured.
pub const DEFAULT_SLOTS_PER_BLOCK: usize = 32;

/// Configuration of the callback scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicConfig {
    /// How many timer slots are allocated together when a bucket runs out of room.
    /// Blocks are never freed or moved once allocated.
    pub slots_per_block: usize,
}

impl LogicConfig {
    /// Load the configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LogicError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LogicError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LogicError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        log::info!("Loaded logic configuration from '{}'", path.display());
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), LogicError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| LogicError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks that the configuration can be used to build a scheduler.
    pub fn validate(&self) -> Result<(), LogicError> {
        if self.slots_per_block == 0 {
            return Err(LogicError::InvalidBlockSize(self.slots_per_block));
        }
        Ok(())
    }
}

impl Default for LogicConfig {
    fn default() -> Self {
        Self {
            slots_per_block: DEFAULT_SLOTS_PER_BLOCK,
        }
    }
}
