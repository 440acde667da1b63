//! Host driver: ticks the engine at a fixed rate and keeps note views in sync.
//!
//! The loop owns the engine and is the only place it is ticked. Gestures
//! from other threads arrive through the `SystemBus`; spawn and release
//! requests are turned into view handles via the host's `NoteViewFactory`.

use crate::logic::capabilities::{AudioClock, NoteViewFactory};
use crate::models::engine::NoteId;
use crate::shared::snapshot::TickReport;
use crate::state::GameEngine;
use crate::system::bus::{SystemBus, SystemEvent};
use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

/// Target ticks per second for the engine thread.
pub const TPS: u64 = 200;

pub struct GameLoop<C: AudioClock, V: NoteViewFactory> {
    engine: GameEngine,
    clock: C,
    views: V,
    handles: HashMap<NoteId, V::Handle>,
    bus: SystemBus,
    paused: bool,
}

impl<C: AudioClock, V: NoteViewFactory> GameLoop<C, V> {
    pub fn new(engine: GameEngine, clock: C, views: V, bus: SystemBus) -> Self {
        Self {
            engine,
            clock,
            views,
            handles: HashMap::new(),
            bus,
            paused: false,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn views(&self) -> &V {
        &self.views
    }

    /// Number of notes that currently own a view.
    pub fn live_views(&self) -> usize {
        self.handles.len()
    }

    /// Runs one engine tick at the clock's current time. Returns `None` while
    /// paused or while the audio is not playing; queued gestures then wait
    /// for the next tick.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.paused || !self.clock.is_playing() {
            return None;
        }

        let events = self.bus.drain_gestures();
        let report = self.engine.tick(self.clock.now(), &events);
        self.sync_views(&report);
        self.bus.publish(self.engine.snapshot());
        Some(report)
    }

    fn sync_views(&mut self, report: &TickReport) {
        for request in &report.spawn_requests {
            match self.views.spawn(request.id, &request.descriptor) {
                Some(handle) => {
                    self.handles.insert(request.id, handle);
                }
                None => log::warn!("LOOP: No view available for {:?}, note stays invisible", request.id),
            }
        }
        for id in &report.release_requests {
            if let Some(handle) = self.handles.remove(id) {
                self.views.release(handle);
            }
        }
    }

    /// Handles queued system events. Returns `false` once a quit was requested.
    fn handle_system_events(&mut self) -> bool {
        while let Ok(event) = self.bus.sys_rx.try_recv() {
            match event {
                SystemEvent::Quit => {
                    log::info!("LOOP: Quit received...");
                    return false;
                }
                SystemEvent::Pause => self.paused = true,
                SystemEvent::Resume => self.paused = false,
            }
        }
        true
    }

    /// Fixed-timestep loop. Runs until `SystemEvent::Quit` and hands the
    /// engine back for result inspection.
    pub fn run(mut self) -> GameEngine {
        let mut accumulator = Duration::new(0, 0);
        let mut last_time = Instant::now();
        let target_dt = Duration::from_secs_f64(1.0 / TPS as f64);

        loop {
            if !self.handle_system_events() {
                break;
            }

            let current_time = Instant::now();
            accumulator += current_time - last_time;
            last_time = current_time;

            // The engine reads the audio clock, so one tick is enough to catch up.
            if accumulator >= target_dt {
                accumulator = Duration::new(0, 0);
                self.tick();
            } else {
                thread::sleep(target_dt - accumulator);
            }
        }

        self.engine
    }
}

impl<C, V> GameLoop<C, V>
where
    C: AudioClock + Send + 'static,
    V: NoteViewFactory + Send + 'static,
    V::Handle: Send,
{
    /// Spawns the engine thread.
    pub fn start_thread(self) -> std::io::Result<thread::JoinHandle<GameEngine>> {
        thread::Builder::new()
            .name("Engine Thread".to_string())
            .spawn(move || {
                log::info!("LOOP: Thread started");
                let engine = self.run();
                log::info!("LOOP: Thread stopped");
                engine
            })
    }
}
