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

//! The public-facing SDK for applications driven by the cadence scheduler.
//! This crate provides the frame loop: it owns the [`LogicSystem`], advances
//! the simulation clock and dispatches the four callback categories around the
//! application's own update and draw.

mod clock;
mod engine;

pub use clock::{ClockMode, FrameClock};
pub use engine::{Engine, EngineConfig};

use cadence_logic::LogicSystem;

pub mod prelude {
    pub use crate::{Application, Engine, EngineConfig, EngineContext, FrameClock};
    pub use cadence_core::{At, LogicConfig, ScheduleId, Span, FOREVER, ONCE};
    pub use cadence_logic::{BucketStats, Callback, LogicSystem};
}

/// What the application sees of the engine during a frame.
pub struct EngineContext<'a> {
    /// The scheduler, to register or cancel callbacks.
    pub logic: &'a mut LogicSystem,
    /// Simulation time of the current frame, in seconds since the clock started.
    pub time: f32,
    /// Time elapsed since the previous frame.
    pub delta: f32,
}

pub trait Application: Sized + 'static {
    /// Called once before the first frame to create the initial state.
    /// This is where long-lived callbacks are usually registered.
    fn new(context: EngineContext) -> Self;

    /// Called every frame for game logic updates, between the `PreUpdate` and
    /// `PostUpdate` dispatches.
    fn update(&mut self, context: EngineContext);

    /// Called every frame to draw, between the `PreDraw` and `PostDraw` dispatches.
    fn draw(&mut self, context: EngineContext);

    /// Checked after every frame; returning `true` stops [`Engine::run`].
    fn should_exit(&self) -> bool {
        false
    }
}
