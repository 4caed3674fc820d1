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

use super::{Callback, LogicSystem};
use approx::assert_relative_eq;
use cadence_core::{At, LogicConfig, LogicError, ScheduleId, Span, FOREVER, ONCE};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

// --- HELPERS ---

/// Shared log of the progress values a callback was called with.
type Calls = Rc<RefCell<Vec<f32>>>;

fn recorder() -> (Calls, Callback) {
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let sink = calls.clone();
    let callback = Callback::new(move |_delta, _time, percent| sink.borrow_mut().push(percent));
    (calls, callback)
}

fn counter() -> (Rc<Cell<u32>>, Callback) {
    let count = Rc::new(Cell::new(0));
    let sink = count.clone();
    (count, Callback::from_fn(move || sink.set(sink.get() + 1)))
}

// --- TIMING ---

#[test]
fn once_fires_a_single_time_when_start_is_reached() {
    let mut logic = LogicSystem::new();
    let (calls, callback) = recorder();
    let id = logic.schedule(At::PreUpdate, callback, 2.0, ONCE, 0.0);

    logic.dispatch(At::PreUpdate, 1.0, 1.0);
    assert!(calls.borrow().is_empty(), "not active before its start time");
    assert!(logic.is_scheduled(id));

    logic.dispatch(At::PreUpdate, 2.0, 1.0);
    assert_eq!(*calls.borrow(), vec![1.0]);

    logic.dispatch(At::PreUpdate, 3.0, 1.0);
    assert_eq!(calls.borrow().len(), 1, "a once timer never fires twice");
    assert!(!logic.is_scheduled(id));
}

#[test]
fn forever_fires_once_per_due_dispatch() {
    let mut logic = LogicSystem::new();
    let (calls, callback) = recorder();
    let id = logic.schedule(At::PreDraw, callback, 0.0, FOREVER, 2.0);

    for (frame, time) in [0.0, 2.0, 4.0, 6.0].into_iter().enumerate() {
        logic.dispatch(At::PreDraw, time, 2.0);
        logic.dispatch(At::PreDraw, time, 0.0);
        assert_eq!(calls.borrow().len(), frame + 1, "no double fire at {time}");
    }
    assert!(calls.borrow().iter().all(|&percent| percent == 0.0));
    assert!(logic.is_scheduled(id));
}

#[test]
fn finite_timer_reports_progress_then_retires() {
    let mut logic = LogicSystem::new();
    let (calls, callback) = recorder();
    let id = logic.schedule(At::PostUpdate, callback, 0.0, 10.0, 5.0);

    logic.dispatch(At::PostUpdate, 0.0, 0.0);
    logic.dispatch(At::PostUpdate, 5.0, 5.0);
    assert!(logic.is_scheduled(id));
    logic.dispatch(At::PostUpdate, 10.0, 5.0);

    let calls = calls.borrow();
    assert_eq!(calls.len(), 3);
    assert_relative_eq!(calls[0], 0.0);
    assert_relative_eq!(calls[1], 0.5);
    assert_relative_eq!(calls[2], 1.0);
    assert!(!logic.is_scheduled(id));
}

#[test]
fn callbacks_receive_delta_and_time() {
    let mut logic = LogicSystem::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    logic.schedule(
        At::PostDraw,
        Callback::from_delta_time(move |delta, time| sink.borrow_mut().push((delta, time))),
        0.0,
        FOREVER,
        0.0,
    );

    logic.dispatch(At::PostDraw, 0.5, 0.5);
    logic.dispatch(At::PostDraw, 0.75, 0.25);
    assert_eq!(*seen.borrow(), vec![(0.5, 0.5), (0.25, 0.75)]);
}

#[test]
fn categories_are_independent() {
    let mut logic = LogicSystem::new();
    let (pre, pre_cb) = counter();
    let (post, post_cb) = counter();
    let pre_id = logic.schedule_once(At::PreUpdate, pre_cb);
    let post_id = logic.schedule_once(At::PostDraw, post_cb);

    assert_eq!(pre_id.slot, post_id.slot, "each category has its own slot space");
    assert_ne!(pre_id, post_id);

    logic.dispatch(At::PreUpdate, 0.0, 0.0);
    assert_eq!((pre.get(), post.get()), (1, 0));
    assert!(logic.is_scheduled(post_id));

    logic.dispatch(At::PostDraw, 0.0, 0.0);
    assert_eq!((pre.get(), post.get()), (1, 1));
    assert_eq!(logic.live_count(), 0);
}

// --- HANDLES ---

#[test]
fn live_handles_are_unique() {
    let mut logic = LogicSystem::with_config(LogicConfig { slots_per_block: 4 })
        .expect("valid config");
    let mut live: Vec<ScheduleId> = Vec::new();

    for round in 0..40u32 {
        let at = At::ALL[(round % 2) as usize];
        live.push(logic.schedule(at, Callback::from_fn(|| {}), 100.0, FOREVER, 1.0));
        if round % 3 == 0 {
            let victim = live.remove((round as usize * 7) % live.len());
            assert!(logic.cancel(victim));
        }

        let unique: HashSet<ScheduleId> = live.iter().copied().collect();
        assert_eq!(unique.len(), live.len(), "duplicate live handle at round {round}");
        assert!(live.iter().all(|&id| logic.is_scheduled(id)));
    }
}

#[test]
fn cancelled_handle_stays_stale_after_slot_reuse() {
    let mut logic = LogicSystem::new();
    let old = logic.schedule(At::PreUpdate, Callback::from_fn(|| {}), 0.0, FOREVER, 1.0);
    assert!(logic.cancel(old));
    assert!(!logic.is_scheduled(old));

    let (count, callback) = counter();
    let new = logic.schedule(At::PreUpdate, callback, 0.0, FOREVER, 1.0);
    assert_eq!(new.slot, old.slot, "the freed slot is reused first");
    assert_ne!(new.generation, old.generation);

    assert!(!logic.is_scheduled(old));
    assert!(!logic.cancel(old), "stale cancel reports not found");
    assert!(!logic.reschedule(old, Callback::from_fn(|| {}), 0.0, ONCE, 0.0));

    logic.dispatch(At::PreUpdate, 0.0, 0.0);
    assert_eq!(count.get(), 1, "stale operations left the new timer untouched");
    assert!(logic.is_scheduled(new));
}

#[test]
fn out_of_range_handle_is_ignored() {
    let mut logic = LogicSystem::new();
    let bogus = ScheduleId {
        at: At::PreDraw,
        slot: 10_000,
        generation: 0,
    };
    assert!(!logic.is_scheduled(bogus));
    assert!(!logic.cancel(bogus));
    assert!(!logic.reschedule(bogus, Callback::from_fn(|| {}), 0.0, ONCE, 0.0));
}

#[test]
fn reschedule_keeps_the_handle() {
    let mut logic = LogicSystem::new();
    let (first, first_cb) = counter();
    let (second, second_cb) = counter();
    let id = logic.schedule(At::PreUpdate, first_cb, 5.0, ONCE, 0.0);

    assert!(logic.reschedule(id, second_cb, 1.0, FOREVER, 1.0));
    assert!(logic.is_scheduled(id));

    logic.dispatch(At::PreUpdate, 1.0, 1.0);
    logic.dispatch(At::PreUpdate, 2.0, 1.0);
    assert_eq!((first.get(), second.get()), (0, 2));
}

// --- DISPATCH EDGE CASES ---

#[test]
fn callback_can_cancel_itself() {
    let mut logic = LogicSystem::new();
    let own_id: Rc<Cell<Option<ScheduleId>>> = Rc::new(Cell::new(None));
    let calls = Rc::new(Cell::new(0));

    let (me, count) = (own_id.clone(), calls.clone());
    let id = logic.schedule(
        At::PreUpdate,
        Callback::with_logic(move |logic, _, _, _| {
            count.set(count.get() + 1);
            if let Some(id) = me.get() {
                assert!(logic.cancel(id));
            }
        }),
        0.0,
        FOREVER,
        1.0,
    );
    own_id.set(Some(id));
    let (neighbour, neighbour_cb) = counter();
    logic.schedule(At::PreUpdate, neighbour_cb, 0.0, FOREVER, 1.0);

    // Far enough ahead that a restored timer would fire several times.
    logic.dispatch(At::PreUpdate, 3.0, 3.0);
    assert_eq!(calls.get(), 1);
    assert_eq!(neighbour.get(), 4, "the neighbour slot is still visited");
    assert!(!logic.is_scheduled(id));

    logic.dispatch(At::PreUpdate, 4.0, 1.0);
    assert_eq!(calls.get(), 1);

    let reused = logic.schedule_once(At::PreUpdate, Callback::from_fn(|| {}));
    assert_eq!(reused.slot, id.slot, "the slot is reusable afterwards");
}

#[test]
fn callback_can_reschedule_itself() {
    let mut logic = LogicSystem::new();
    let own_id: Rc<Cell<Option<ScheduleId>>> = Rc::new(Cell::new(None));
    let (later, later_cb) = counter();
    let later_cb = RefCell::new(Some(later_cb));

    let me = own_id.clone();
    let id = logic.schedule(
        At::PreUpdate,
        Callback::with_logic(move |logic, _, _, _| {
            if let (Some(id), Some(next)) = (me.get(), later_cb.borrow_mut().take()) {
                assert!(logic.reschedule(id, next, 10.0, ONCE, 0.0));
            }
        }),
        0.0,
        ONCE,
        0.0,
    );
    own_id.set(Some(id));

    logic.dispatch(At::PreUpdate, 0.0, 0.0);
    assert!(logic.is_scheduled(id), "rescheduling replaced the finished once timer");

    logic.dispatch(At::PreUpdate, 10.0, 10.0);
    assert_eq!(later.get(), 1);
    assert!(!logic.is_scheduled(id));
}

#[test]
fn registration_during_dispatch_waits_for_next_pass() {
    let mut logic = LogicSystem::new();
    let (spawned, spawned_cb) = counter();
    let spawned_cb = RefCell::new(Some(spawned_cb));

    logic.schedule(
        At::PreUpdate,
        Callback::with_logic(move |logic, _, _, _| {
            if let Some(callback) = spawned_cb.borrow_mut().take() {
                logic.schedule_once(At::PreUpdate, callback);
            }
        }),
        0.0,
        ONCE,
        0.0,
    );

    logic.dispatch(At::PreUpdate, 0.0, 0.0);
    assert_eq!(spawned.get(), 0, "not visible in the pass that registered it");

    logic.dispatch(At::PreUpdate, 0.1, 0.1);
    assert_eq!(spawned.get(), 1);
}

#[test]
fn registration_reusing_a_later_slot_waits_for_next_pass() {
    let mut logic = LogicSystem::new();
    let (spawned, spawned_cb) = counter();
    let spawned_cb = RefCell::new(Some(spawned_cb));
    let victim: Rc<Cell<Option<ScheduleId>>> = Rc::new(Cell::new(None));

    let target = victim.clone();
    logic.schedule(
        At::PreDraw,
        Callback::with_logic(move |logic, _, _, _| {
            if let (Some(id), Some(callback)) = (target.get(), spawned_cb.borrow_mut().take()) {
                logic.cancel(id);
                let reused = logic.schedule_once(At::PreDraw, callback);
                assert_eq!(reused.slot, id.slot);
            }
        }),
        0.0,
        ONCE,
        0.0,
    );
    let (victim_count, victim_cb) = counter();
    victim.set(Some(logic.schedule(At::PreDraw, victim_cb, 0.0, FOREVER, 1.0)));

    logic.dispatch(At::PreDraw, 0.0, 0.0);
    assert_eq!(victim_count.get(), 0, "cancelled before its turn");
    assert_eq!(spawned.get(), 0, "same-pass registrations never fire");

    logic.dispatch(At::PreDraw, 0.1, 0.1);
    assert_eq!(spawned.get(), 1);
}

#[test]
fn reentrant_dispatch_is_ignored() {
    let mut logic = LogicSystem::new();
    let (inner, inner_cb) = counter();
    logic.schedule(At::PostUpdate, inner_cb, 0.0, FOREVER, 0.0);
    logic.schedule(
        At::PostUpdate,
        Callback::with_logic(|logic, delta, time, _| logic.dispatch(At::PostUpdate, time, delta)),
        0.0,
        FOREVER,
        0.0,
    );

    logic.dispatch(At::PostUpdate, 0.0, 0.0);
    assert_eq!(inner.get(), 1);
}

#[test]
fn dispatching_another_category_from_a_callback_is_allowed() {
    let mut logic = LogicSystem::new();
    let (draw, draw_cb) = counter();
    logic.schedule_once(At::PostDraw, draw_cb);
    logic.schedule_once(
        At::PreUpdate,
        Callback::with_logic(|logic, delta, time, _| logic.dispatch(At::PostDraw, time, delta)),
    );

    logic.dispatch(At::PreUpdate, 0.0, 0.0);
    assert_eq!(draw.get(), 1);
}

// --- CONFIGURATION & STATS ---

#[test]
fn invalid_config_is_rejected() {
    let err = LogicSystem::with_config(LogicConfig { slots_per_block: 0 }).unwrap_err();
    assert!(matches!(err, LogicError::InvalidBlockSize(0)));
}

#[test]
fn stats_follow_registrations() {
    let mut logic = LogicSystem::with_config(LogicConfig { slots_per_block: 2 })
        .expect("valid config");
    let ids: Vec<ScheduleId> = (0..3)
        .map(|_| logic.schedule(At::PreDraw, Callback::from_fn(|| {}), 0.0, Span::Forever, 1.0))
        .collect();

    let stats = logic.stats(At::PreDraw);
    assert_eq!((stats.live, stats.capacity, stats.blocks, stats.high_water), (3, 4, 2, 3));

    logic.cancel(ids[2]);
    let stats = logic.stats(At::PreDraw);
    assert_eq!(stats.live, 2);
    assert_eq!(stats.high_water, 3, "the high-water mark never shrinks");
    assert_eq!(logic.stats(At::PreUpdate).capacity, 0);
}
