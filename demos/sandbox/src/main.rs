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

// Cadence Sandbox
// Headless demo of a small game driving its timing through the scheduler.

use anyhow::Result;
use cadence_sdk::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const CLOUD_SPAWN_INTERVAL: f32 = 2.0;
const BOOST_DURATION: f32 = 3.0;
const BULLET_ALIVE_TIME: f32 = 5.0;
const SCORE_INTERVAL: f32 = 3.0;

#[derive(Debug, Default)]
struct World {
    clouds: u32,
    score: u32,
    boost: f32,
    bullets_alive: u32,
}

struct SandboxApp {
    world: Rc<RefCell<World>>,
    boost: Option<ScheduleId>,
    frames: u32,
}

impl Application for SandboxApp {
    fn new(context: EngineContext) -> Self {
        log::info!("SandboxApp: Registering callbacks...");
        let world = Rc::new(RefCell::new(World::default()));

        let clouds = world.clone();
        context.logic.schedule(
            At::PreUpdate,
            Callback::from_fn(move || {
                let mut world = clouds.borrow_mut();
                world.clouds += 1;
                log::debug!("Spawned cloud #{}", world.clouds);
            }),
            0.0,
            FOREVER,
            CLOUD_SPAWN_INTERVAL,
        );

        // Every third second, starting one second in.
        let score = world.clone();
        context.logic.schedule(
            At::PreDraw,
            Callback::from_fn(move || score.borrow_mut().score += 1),
            1.0,
            FOREVER,
            SCORE_INTERVAL,
        );

        context.logic.schedule(
            At::PostDraw,
            Callback::from_delta_time(|_, time| log::info!("Intro text hidden at t = {time:.2}")),
            1.5,
            ONCE,
            0.0,
        );

        Self {
            world,
            boost: None,
            frames: 0,
        }
    }

    fn update(&mut self, context: EngineContext) {
        self.frames += 1;

        // Boost the truck every four seconds, easing the boost out over its duration.
        let boosting = self.boost.is_some_and(|id| context.logic.is_scheduled(id));
        if !boosting && self.frames % 240 == 1 {
            let world = self.world.clone();
            let start = context.time;
            self.boost = Some(context.logic.schedule(
                At::PostUpdate,
                Callback::new(move |_, _, percent| world.borrow_mut().boost = 1.0 - percent),
                start,
                start + BOOST_DURATION,
                0.0,
            ));
            log::info!("Boost started at t = {start:.2}");
        }

        // Fire a bullet every second; each one retires itself after its lifetime.
        if self.frames % 60 == 0 {
            self.fire_bullet(context);
        }
    }

    fn draw(&mut self, _context: EngineContext) {}

    fn should_exit(&self) -> bool {
        self.world.borrow().score >= 4
    }
}

impl SandboxApp {
    fn fire_bullet(&mut self, context: EngineContext) {
        self.world.borrow_mut().bullets_alive += 1;

        let world = self.world.clone();
        let own_id: Rc<Cell<Option<ScheduleId>>> = Rc::new(Cell::new(None));
        let me = own_id.clone();
        let spawned_at = context.time;
        let id = context.logic.schedule(
            At::PostUpdate,
            Callback::with_logic(move |logic, _, time, _| {
                if time - spawned_at >= BULLET_ALIVE_TIME {
                    world.borrow_mut().bullets_alive -= 1;
                    if let Some(id) = me.get() {
                        logic.cancel(id);
                    }
                }
            }),
            spawned_at,
            FOREVER,
            0.0,
        );
        own_id.set(Some(id));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EngineConfig {
        logic: LogicConfig::default(),
        max_frames: Some(60 * 60),
    };
    let mut engine = Engine::with_config(config, FrameClock::fixed(1.0 / 60.0))?;
    let app: SandboxApp = engine.run()?;

    let world = app.world.borrow();
    log::info!("--- Sandbox Summary ---");
    log::info!("  Frames: {}", engine.frame_count());
    log::info!("  Clouds spawned: {}", world.clouds);
    log::info!("  Score: {}", world.score);
    log::info!("  Boost level: {:.2}", world.boost);
    log::info!("  Bullets alive: {}", world.bullets_alive);
    for at in At::ALL {
        let stats = engine.logic().stats(at);
        log::info!(
            "  {at}: {} live / {} slots in {} block(s)",
            stats.live,
            stats.capacity,
            stats.blocks
        );
    }
    Ok(())
}
