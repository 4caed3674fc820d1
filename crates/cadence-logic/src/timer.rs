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

//! The per-registration timer record and its timing policy.

use crate::Callback;
use cadence_core::Span;

/// What a timer wants to do at a given simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step {
    /// Not due yet, or already fired as often as it should this frame.
    Idle,
    /// Call the callback with this progress. `last` means the timer is done afterwards.
    Fire { percent: f32, last: bool },
    /// The end time has passed with no call due: release the slot silently.
    Expire,
}

/// State of one scheduled callback.
#[derive(Debug)]
pub(crate) struct Timer {
    pub start: f32,
    /// Simulation time of the next call. Starts at `start` and only grows.
    pub next: f32,
    pub span: Span,
    pub spacing: f32,
    /// Taken out of the slot for the duration of a call.
    pub callback: Option<Callback>,
    /// The bucket pass during which this timer was (re)armed. A timer never
    /// fires in the pass that armed it.
    pub armed_pass: u64,
}

impl Timer {
    pub fn new(callback: Callback, start: f32, span: Span, spacing: f32, armed_pass: u64) -> Self {
        Self {
            start,
            next: start,
            span,
            spacing,
            callback: Some(callback),
            armed_pass,
        }
    }

    /// Decides what to do at `time`. Called repeatedly within a frame until it
    /// stops returning [`Step::Fire`], with [`Timer::advance`] between calls.
    pub fn step(&self, time: f32) -> Step {
        if time < self.start {
            return Step::Idle;
        }
        match self.span {
            Span::Once => Step::Fire {
                percent: 1.0,
                last: true,
            },
            Span::Forever if self.next <= time => Step::Fire {
                percent: 0.0,
                last: false,
            },
            Span::Forever => Step::Idle,
            Span::Until(end) if time >= end => {
                if self.next <= time {
                    Step::Fire {
                        percent: 1.0,
                        last: true,
                    }
                } else {
                    Step::Expire
                }
            }
            Span::Until(end) if self.next <= time => Step::Fire {
                percent: ((time - self.start) / (end - self.start)).clamp(0.0, 1.0),
                last: false,
            },
            Span::Until(_) => Step::Idle,
        }
    }

    /// Moves `next` one spacing forward. Returns `false` when the timer must not
    /// be checked again this frame: the spacing is not positive, or too small to
    /// move `next` at its current magnitude.
    pub fn advance(&mut self) -> bool {
        if self.spacing.is_nan() || self.spacing <= 0.0 {
            return false;
        }
        let next = self.next + self.spacing;
        if next > self.next {
            self.next = next;
            true
        } else {
            false
        }
    }
}
