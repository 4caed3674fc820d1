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

//! The scheduler facade: registration, removal, liveness and dispatch.

use crate::bucket::{BucketStats, TimerBucket};
use crate::Callback;
use cadence_core::{At, LogicConfig, LogicError, ScheduleId, Span};

/// Manages the callbacks of the application.
///
/// Callbacks are registered against one of the four dispatch categories and
/// are called by [`LogicSystem::dispatch`], which the frame driver invokes once
/// per category per frame. Each category owns an independent bucket of timer
/// slots that grows on demand and never shrinks.
///
/// A callback registered while its category is being dispatched never fires in
/// that same pass; it becomes eligible on the next one.
#[derive(Debug)]
pub struct LogicSystem {
    config: LogicConfig,
    buckets: [TimerBucket; At::COUNT],
}

impl LogicSystem {
    /// Creates a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::build(LogicConfig::default())
    }

    /// Creates a scheduler from a configuration, validating it first.
    pub fn with_config(config: LogicConfig) -> Result<Self, LogicError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: LogicConfig) -> Self {
        log::info!(
            "LogicSystem initialized ({} slots per block).",
            config.slots_per_block
        );
        let slots_per_block = config.slots_per_block;
        Self {
            config,
            buckets: std::array::from_fn(|_| TimerBucket::new(slots_per_block)),
        }
    }

    /// Returns the configuration the scheduler was built with.
    pub fn config(&self) -> &LogicConfig {
        &self.config
    }

    /// Schedules `callback` to be called at `at`.
    ///
    /// The callback is not called before the simulation time reaches `start`.
    /// `end` decides when it stops: [`ONCE`](cadence_core::ONCE) calls it a
    /// single time, [`FOREVER`](cadence_core::FOREVER) keeps calling it every
    /// `spacing` seconds, and any other value calls it every `spacing` seconds
    /// until that time, with the progress towards it. A non-positive spacing
    /// means once per frame.
    ///
    /// `start` and `end` are simulation times, measured from the moment the
    /// frame driver started its clock, not wall-clock times.
    pub fn schedule(
        &mut self,
        at: At,
        callback: Callback,
        start: f32,
        end: impl Into<Span>,
        spacing: f32,
    ) -> ScheduleId {
        let span = end.into();
        let (slot, generation) = self.bucket_mut(at).add(callback, start, span, spacing);
        let id = ScheduleId {
            at,
            slot,
            generation,
        };
        log::trace!("Scheduled {id} (start {start}, {span:?}, spacing {spacing})");
        id
    }

    /// Schedules `callback` to be called once, on the next dispatch of `at`.
    pub fn schedule_once(&mut self, at: At, callback: Callback) -> ScheduleId {
        self.schedule(at, callback, 0.0, Span::Once, 0.0)
    }

    /// Replaces the callback and timing of a registration, keeping its handle.
    ///
    /// Returns `false`, and does nothing, if the handle is stale.
    pub fn reschedule(
        &mut self,
        id: ScheduleId,
        callback: Callback,
        start: f32,
        end: impl Into<Span>,
        spacing: f32,
    ) -> bool {
        let span = end.into();
        let found = self
            .bucket_mut(id.at)
            .replace(id.slot, id.generation, callback, start, span, spacing);
        if !found {
            log::debug!("Ignoring reschedule of stale handle {id}");
        }
        found
    }

    /// Stops a callback from being called, without a final call.
    ///
    /// Returns `false`, and does nothing, if the handle is stale.
    pub fn cancel(&mut self, id: ScheduleId) -> bool {
        let found = self.bucket_mut(id.at).remove(id.slot, id.generation);
        if !found {
            log::debug!("Ignoring cancel of stale handle {id}");
        }
        found
    }

    /// Returns `true` if the callback is still going to be called in the future.
    pub fn is_scheduled(&self, id: ScheduleId) -> bool {
        self.bucket(id.at).contains(id.slot, id.generation)
    }

    /// Calls every due callback of category `at`.
    ///
    /// `time` is the current simulation time and `delta` the time elapsed since
    /// the previous frame. Slots are visited in increasing index order. Calling
    /// this from a callback of the same category is ignored.
    pub fn dispatch(&mut self, at: At, time: f32, delta: f32) {
        let Some(scan) = self.bucket_mut(at).begin_pass() else {
            log::warn!("Re-entrant dispatch of {at} ignored");
            return;
        };
        log::trace!("Dispatching {at} over {scan} slot(s) at {time}");

        for slot in 0..scan {
            while let Some(mut due) = self.bucket_mut(at).take_due(slot, time) {
                due.callback.call(self, delta, time, due.percent);
                if !self.bucket_mut(at).restore(slot, due) {
                    break;
                }
            }
        }

        self.bucket_mut(at).end_pass();
    }

    /// Returns occupancy statistics for the bucket of `at`.
    pub fn stats(&self, at: At) -> BucketStats {
        self.bucket(at).stats()
    }

    /// Returns the number of callbacks scheduled across all categories.
    pub fn live_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.stats().live).sum()
    }

    fn bucket(&self, at: At) -> &TimerBucket {
        &self.buckets[at.index()]
    }

    fn bucket_mut(&mut self, at: At) -> &mut TimerBucket {
        &mut self.buckets[at.index()]
    }
}

impl Default for LogicSystem {
    fn default() -> Self {
        Self::new()
    }
}
