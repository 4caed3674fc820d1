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

//! Contracts of the frame-driven callback scheduler.
//!
//! Callbacks are registered against one of four fixed points in the frame
//! ([`At`]) and are identified by a generation-tagged [`ScheduleId`]. How long a
//! registration lives is described by a [`Span`], which can also be written with
//! the raw [`ONCE`] and [`FOREVER`] sentinels.

mod config;
mod error;

pub use self::config::{LogicConfig, DEFAULT_SLOTS_PER_BLOCK};
pub use self::error::LogicError;

use serde::{Deserialize, Serialize};
use std::fmt;

/// End time sentinel: the callback keeps being called until the application closes.
pub const FOREVER: f32 = -1.0;

/// End time sentinel: the callback is called exactly one time.
pub const ONCE: f32 = 0.0;

/// The point in the frame at which a callback is dispatched.
///
/// The frame driver dispatches every category once per frame, in declaration
/// order: `PreUpdate`, (game update), `PostUpdate`, `PreDraw`, (game draw),
/// `PostDraw`. Custom UI belongs in `PostDraw`; anything that depends on work
/// done in `PreUpdate` fits best in `PostUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum At {
    /// Before the game update.
    PreUpdate,
    /// After the game update.
    PostUpdate,
    /// Before the game draw.
    PreDraw,
    /// After the game draw.
    PostDraw,
}

impl At {
    /// The number of dispatch categories.
    pub const COUNT: usize = 4;

    /// Every category, in the order the frame driver dispatches them.
    pub const ALL: [At; At::COUNT] = [At::PreUpdate, At::PostUpdate, At::PreDraw, At::PostDraw];

    /// Returns the position of this category in [`At::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for At {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            At::PreUpdate => "pre_update",
            At::PostUpdate => "post_update",
            At::PreDraw => "pre_draw",
            At::PostDraw => "post_draw",
        };
        f.write_str(name)
    }
}

/// A handle to a callback that is scheduled to be called in the future.
///
/// It combines the slot the callback occupies with the generation of that slot.
/// When the registration ends, the slot can be recycled for a new callback, but
/// its generation is incremented first, so an old `ScheduleId` can never reach
/// the new occupant. All three fields take part in equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleId {
    /// The category whose bucket holds the callback.
    pub at: At,
    /// The index of the slot within the bucket.
    pub slot: u32,
    /// The generation of the slot when the callback was registered.
    pub generation: u32,
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}v{}", self.at, self.slot, self.generation)
    }
}

/// How long a scheduled callback stays alive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Span {
    /// Called one time, as soon as the start time is reached.
    Once,
    /// Called every `spacing` seconds, until it is cancelled.
    Forever,
    /// Called every `spacing` seconds until the given simulation time, with
    /// a progress value growing from 0 to 1.
    Until(f32),
}

impl Span {
    /// Returns the raw end time for this span, using the [`ONCE`] and
    /// [`FOREVER`] sentinels.
    pub fn end_time(self) -> f32 {
        match self {
            Span::Once => ONCE,
            Span::Forever => FOREVER,
            Span::Until(end) => end,
        }
    }

    /// Returns `true` if the span stops on its own.
    pub fn is_finite(self) -> bool {
        !matches!(self, Span::Forever)
    }
}

impl From<f32> for Span {
    /// Decodes a raw end time.
    ///
    /// Exactly [`ONCE`] (and NaN) means once, any negative value means forever,
    /// everything else is a real end time.
    fn from(end: f32) -> Self {
        if end == ONCE || end.is_nan() {
            Span::Once
        } else if end < 0.0 {
            Span::Forever
        } else {
            Span::Until(end)
        }
    }
}
