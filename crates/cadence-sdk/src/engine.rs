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

use crate::{Application, ClockMode, EngineContext, FrameClock};
use anyhow::{Context, Result};
use cadence_core::{At, LogicConfig};
use cadence_logic::LogicSystem;

/// Settings for an [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Configuration of the callback scheduler.
    pub logic: LogicConfig,
    /// Stop after this many frames, if set.
    pub max_frames: Option<u64>,
}

/// Drives the frame loop of an [`Application`].
///
/// Each frame the clock is advanced, then the scheduler and the application
/// are run in a fixed order:
/// `PreUpdate` → `update` → `PostUpdate` → `PreDraw` → `draw` → `PostDraw`.
#[derive(Debug)]
pub struct Engine {
    logic: LogicSystem,
    clock: FrameClock,
    frame: u64,
    max_frames: Option<u64>,
}

impl Engine {
    /// Creates an engine with the default scheduler and a fixed 60 Hz clock.
    pub fn new() -> Self {
        Self {
            logic: LogicSystem::new(),
            clock: FrameClock::default(),
            frame: 0,
            max_frames: None,
        }
    }

    /// Creates an engine from a configuration and a clock.
    pub fn with_config(config: EngineConfig, clock: FrameClock) -> Result<Self> {
        let logic = LogicSystem::with_config(config.logic)
            .context("Failed to configure the logic system")?;
        Ok(Self {
            logic,
            clock,
            frame: 0,
            max_frames: config.max_frames,
        })
    }

    /// Creates the application, letting it register its initial callbacks.
    pub fn boot<A: Application>(&mut self) -> A {
        log::info!("Booting application at t = {}", self.clock.time());
        A::new(EngineContext {
            logic: &mut self.logic,
            time: self.clock.time(),
            delta: 0.0,
        })
    }

    /// Runs one frame, taking the delta from the engine's clock.
    pub fn tick<A: Application>(&mut self, app: &mut A) {
        let (time, delta) = self.clock.tick();
        self.run_frame(app, time, delta);
    }

    /// Runs one frame lasting exactly `delta` seconds.
    pub fn step<A: Application>(&mut self, app: &mut A, delta: f32) {
        let (time, delta) = self.clock.advance(delta);
        self.run_frame(app, time, delta);
    }

    /// Boots the application and runs frames until it asks to exit or the
    /// configured frame limit is reached. Returns the application's final state.
    pub fn run<A: Application>(&mut self) -> Result<A> {
        let frozen = matches!(self.clock.mode(), ClockMode::Fixed(delta) if *delta <= 0.0);
        if frozen && self.max_frames.is_none() {
            anyhow::bail!("A fixed clock with a zero delta and no frame limit never advances");
        }

        let mut app = self.boot::<A>();
        while !app.should_exit() && self.max_frames.map_or(true, |max| self.frame < max) {
            self.tick(&mut app);
        }

        log::info!(
            "Stopped after {} frame(s) at t = {}, {} callback(s) still scheduled",
            self.frame,
            self.clock.time(),
            self.logic.live_count()
        );
        Ok(app)
    }

    fn run_frame<A: Application>(&mut self, app: &mut A, time: f32, delta: f32) {
        self.frame += 1;
        log::trace!("Frame {} at t = {time} (dt = {delta})", self.frame);

        self.logic.dispatch(At::PreUpdate, time, delta);
        app.update(self.context(time, delta));
        self.logic.dispatch(At::PostUpdate, time, delta);

        self.logic.dispatch(At::PreDraw, time, delta);
        app.draw(self.context(time, delta));
        self.logic.dispatch(At::PostDraw, time, delta);
    }

    fn context(&mut self, time: f32, delta: f32) -> EngineContext<'_> {
        EngineContext {
            logic: &mut self.logic,
            time,
            delta,
        }
    }

    /// The scheduler driven by this engine.
    pub fn logic(&self) -> &LogicSystem {
        &self.logic
    }

    /// Mutable access to the scheduler, e.g. to register callbacks between frames.
    pub fn logic_mut(&mut self) -> &mut LogicSystem {
        &mut self.logic
    }

    /// The simulation clock.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Number of frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
