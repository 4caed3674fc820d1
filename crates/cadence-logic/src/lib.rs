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

//! # Cadence Logic
//!
//! The frame-driven callback scheduler. Any part of the application can ask
//! the [`LogicSystem`] to call a function at a chosen simulation time,
//! optionally repeated, and have it retired automatically.
//!
//! ```
//! use cadence_core::{At, FOREVER};
//! use cadence_logic::{Callback, LogicSystem};
//!
//! let mut logic = LogicSystem::new();
//! // Every third second, starting one second in.
//! let id = logic.schedule(At::PreDraw, Callback::from_fn(|| {}), 1.0, FOREVER, 3.0);
//! logic.dispatch(At::PreDraw, 1.0, 1.0 / 60.0);
//! assert!(logic.is_scheduled(id));
//! ```

#![warn(missing_docs)]

mod bucket;
mod callback;
mod storage;
mod system;
mod timer;

#[cfg(test)]
mod tests;

pub use bucket::BucketStats;
pub use callback::Callback;
pub use system::LogicSystem;
