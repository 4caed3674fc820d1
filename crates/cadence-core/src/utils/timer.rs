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

//! A monotonic stopwatch used to derive simulation time from the host clock.

use std::time::{Duration, Instant};

/// Measures the time elapsed since it was started, and the time between laps.
///
/// Real-time frame clocks take one lap per frame: the lap length is the
/// frame's `delta` and `elapsed` is the simulation time since first use.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    started_at: Instant,
    last_lap: Instant,
}

impl Stopwatch {
    /// Creates a new stopwatch, started now.
    #[inline]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started_at: now,
            last_lap: now,
        }
    }

    /// Returns the time elapsed since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Returns the elapsed time in seconds as `f32`, the unit the scheduler works in.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    /// Returns the elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Closes the current lap and returns its length in seconds.
    ///
    /// The first lap starts when the stopwatch is created.
    pub fn lap(&mut self) -> f32 {
        let now = Instant::now();
        let lap = now.duration_since(self.last_lap);
        self.last_lap = now;
        lap.as_secs_f32()
    }

    /// Restarts the stopwatch, discarding the elapsed time and the current lap.
    pub fn restart(&mut self) {
        *self = Self::new();
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
