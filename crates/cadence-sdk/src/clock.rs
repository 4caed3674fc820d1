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

//! Simulation clocks for the frame driver.

use cadence_core::Stopwatch;

/// Where a [`FrameClock`] takes its deltas from.
#[derive(Debug, Clone)]
pub enum ClockMode {
    /// Every frame lasts exactly this many seconds. Deterministic, used for
    /// headless runs and tests.
    Fixed(f32),
    /// Frames last as long as they take on the host clock.
    Realtime(Stopwatch),
}

/// The simulation clock of the application.
///
/// Time is counted in seconds from the first use of the clock, so it starts at
/// zero no matter when the application was launched. It never goes backwards.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: ClockMode,
    time: f32,
    delta: f32,
}

impl FrameClock {
    /// A clock that advances by `delta` seconds every frame.
    pub fn fixed(delta: f32) -> Self {
        Self::with_mode(ClockMode::Fixed(delta.max(0.0)))
    }

    /// A clock that follows the host's monotonic clock.
    pub fn realtime() -> Self {
        Self::with_mode(ClockMode::Realtime(Stopwatch::new()))
    }

    fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            time: 0.0,
            delta: 0.0,
        }
    }

    /// Starts a new frame and returns `(time, delta)` for it.
    pub fn tick(&mut self) -> (f32, f32) {
        let delta = match &mut self.mode {
            ClockMode::Fixed(delta) => *delta,
            ClockMode::Realtime(stopwatch) => stopwatch.lap(),
        };
        self.advance(delta)
    }

    /// Starts a new frame lasting `delta` seconds, whatever the mode.
    pub fn advance(&mut self, delta: f32) -> (f32, f32) {
        let delta = delta.max(0.0);
        self.time += delta;
        self.delta = delta;
        (self.time, self.delta)
    }

    /// Simulation time of the current frame.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Length of the current frame.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Returns the clock's mode.
    pub fn mode(&self) -> &ClockMode {
        &self.mode
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::fixed(1.0 / 60.0)
    }
}
