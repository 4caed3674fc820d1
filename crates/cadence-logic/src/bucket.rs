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

//! One independent timer store per dispatch category.

use crate::storage::SlotStorage;
use crate::timer::{Step, Timer};
use crate::Callback;
use cadence_core::Span;

/// A snapshot of a bucket's occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketStats {
    /// Number of callbacks currently scheduled.
    pub live: usize,
    /// Number of slots allocated, live or vacant.
    pub capacity: usize,
    /// Number of storage blocks allocated.
    pub blocks: usize,
    /// One past the highest slot index ever used; bounds the per-frame scan.
    pub high_water: usize,
}

/// A call that is due, with the callback taken out of its slot.
pub(crate) struct DueCall {
    pub generation: u32,
    pub callback: Callback,
    pub percent: f32,
    pub last: bool,
}

/// Slot storage, free list and generation space of a single category.
#[derive(Debug)]
pub(crate) struct TimerBucket {
    timers: SlotStorage<Timer>,
    /// Incremented at the start of every dispatch pass.
    pass: u64,
    dispatching: bool,
}

impl TimerBucket {
    pub fn new(slots_per_block: usize) -> Self {
        Self {
            timers: SlotStorage::new(slots_per_block),
            pass: 0,
            dispatching: false,
        }
    }

    /// Stores a new timer and returns its slot and generation.
    pub fn add(&mut self, callback: Callback, start: f32, span: Span, spacing: f32) -> (u32, u32) {
        let timer = Timer::new(callback, start, span, spacing, self.pass);
        self.timers.insert(timer)
    }

    /// Overwrites a live timer in place, keeping its slot and generation.
    pub fn replace(
        &mut self,
        slot: u32,
        generation: u32,
        callback: Callback,
        start: f32,
        span: Span,
        spacing: f32,
    ) -> bool {
        let pass = self.pass;
        match self.timers.get_mut(slot, generation) {
            Some(timer) => {
                *timer = Timer::new(callback, start, span, spacing, pass);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, slot: u32, generation: u32) -> bool {
        self.timers.remove(slot, generation).is_some()
    }

    pub fn contains(&self, slot: u32, generation: u32) -> bool {
        self.timers.get(slot, generation).is_some()
    }

    /// Starts a dispatch pass. Returns the number of slots to scan, or `None`
    /// if the bucket is already being dispatched.
    pub fn begin_pass(&mut self) -> Option<u32> {
        if self.dispatching {
            return None;
        }
        self.dispatching = true;
        self.pass += 1;
        Some(self.timers.high_water())
    }

    pub fn end_pass(&mut self) {
        self.dispatching = false;
    }

    /// Applies the timing policy to `slot` at `time`.
    ///
    /// If a call is due, the callback is moved out of the slot and returned so it
    /// can run without borrowing the bucket. Timers that expire without a due
    /// call are released here.
    pub fn take_due(&mut self, slot: u32, time: f32) -> Option<DueCall> {
        let pass = self.pass;
        let (generation, timer) = self.timers.occupant_mut(slot)?;
        if timer.armed_pass == pass {
            return None;
        }
        match timer.step(time) {
            Step::Idle => None,
            Step::Expire => {
                log::debug!("Timer in slot {slot} expired at {time}");
                self.timers.remove(slot, generation);
                None
            }
            Step::Fire { percent, last } => {
                let callback = timer.callback.take()?;
                Some(DueCall {
                    generation,
                    callback,
                    percent,
                    last,
                })
            }
        }
    }

    /// Puts a callback back after it ran. Returns `true` if the slot should be
    /// checked again in the same frame.
    ///
    /// Nothing is restored when the registration was cancelled or rescheduled
    /// by the callback itself: the generation no longer matches, or a new
    /// callback already sits in the slot.
    pub fn restore(&mut self, slot: u32, call: DueCall) -> bool {
        let Some(timer) = self.timers.get_mut(slot, call.generation) else {
            return false;
        };
        if timer.callback.is_some() {
            return false;
        }
        if call.last {
            self.timers.remove(slot, call.generation);
            return false;
        }
        timer.callback = Some(call.callback);
        timer.advance()
    }

    pub fn stats(&self) -> BucketStats {
        BucketStats {
            live: self.timers.len(),
            capacity: self.timers.capacity(),
            blocks: self.timers.block_count(),
            high_water: self.timers.high_water() as usize,
        }
    }
}
