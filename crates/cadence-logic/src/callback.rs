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

//! Callbacks and the adapters that normalize their arity.

use crate::LogicSystem;
use std::fmt;

type CallbackFn = dyn FnMut(&mut LogicSystem, f32, f32, f32);

/// A function scheduled to be called by the [`LogicSystem`].
///
/// Every callback is stored behind the same contract: it receives the
/// scheduler, the time since the last frame (`delta`), the current simulation
/// time (`time`) and the progress of its timer (`percent`). Progress is `0` for
/// timers that run forever, `1` for one-shot timers and the final call of a
/// finite timer, and grows from `0` to `1` in between.
///
/// Most callbacks only care about some of those arguments, so there is one
/// constructor per accepted arity; the ignored arguments are simply dropped.
///
/// ```
/// use cadence_logic::Callback;
///
/// let full = Callback::new(|delta, time, percent| println!("{delta} {time} {percent}"));
/// let timed = Callback::from_delta_time(|_delta, time| println!("now {time}"));
/// let ticked = Callback::from_delta(|delta| println!("{delta}s since last frame"));
/// let plain = Callback::from_fn(|| println!("ding"));
/// ```
pub struct Callback {
    inner: Box<CallbackFn>,
}

impl Callback {
    /// Wraps a callback taking `(delta, time, percent)`.
    pub fn new(mut callback: impl FnMut(f32, f32, f32) + 'static) -> Self {
        Self::with_logic(move |_, delta, time, percent| callback(delta, time, percent))
    }

    /// Wraps a callback taking `(delta, time)`.
    pub fn from_delta_time(mut callback: impl FnMut(f32, f32) + 'static) -> Self {
        Self::with_logic(move |_, delta, time, _| callback(delta, time))
    }

    /// Wraps a callback taking only `delta`.
    pub fn from_delta(mut callback: impl FnMut(f32) + 'static) -> Self {
        Self::with_logic(move |_, delta, _, _| callback(delta))
    }

    /// Wraps a callback taking no argument.
    pub fn from_fn(mut callback: impl FnMut() + 'static) -> Self {
        Self::with_logic(move |_, _, _, _| callback())
    }

    /// Wraps a callback that also needs the scheduler, e.g. to cancel its own
    /// registration or to schedule follow-up callbacks while it runs.
    pub fn with_logic(callback: impl FnMut(&mut LogicSystem, f32, f32, f32) + 'static) -> Self {
        Self {
            inner: Box::new(callback),
        }
    }

    /// Invokes the callback.
    pub fn call(&mut self, logic: &mut LogicSystem, delta: f32, time: f32, percent: f32) {
        (self.inner)(logic, delta, time, percent)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}
