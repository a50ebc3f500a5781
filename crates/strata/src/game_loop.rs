//! # STRATA Simulation Loop
//!
//! Fixed-timestep orchestration on a dedicated thread.
//!
//! ```text
//! Loop iteration N:
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ 1. ACCUMULATE   elapsed wall-clock time, clamped                │
//! │ 2. TICK         while accumulator >= 1:                         │
//! │    ├─ drain pending edit commands into the overlay              │
//! │    ├─ sample input intents                                      │
//! │    ├─ budgeted terrain prefetch around the player               │
//! │    ├─ physics step (intents, gravity, collision)                │
//! │    └─ recompute camera                                          │
//! │ 3. PUBLISH      one immutable FrameSnapshot                     │
//! │ 4. SIGNAL       one render request (ticks may be 0 or many)     │
//! │ 5. YIELD        short sleep                                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All world and player mutation happens on the simulation thread; the
//! host only touches atomics, channels and the snapshot cell. Shutdown is
//! cooperative: `stop()` clears the running flag and joins, and the thread
//! observes the flag at the loop boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use strata_core::{SessionConfig, SnapshotCell};
use strata_procedural::WorldField;

use crate::camera::Camera;
use crate::events::{EditCommand, EventSystem, FrameSignal};
use crate::physics::{self, InputState, Player};
use crate::snapshot::{FrameSnapshot, TileView};

/// Voluntary yield between loop iterations.
const LOOP_YIELD: Duration = Duration::from_millis(2);

/// Most ticks one iteration may accumulate; anything beyond is dropped so
/// a long stall cannot trigger a tick avalanche.
const MAX_CATCHUP_TICKS: f64 = 5.0;

/// Final statistics for one simulation run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimStats {
    /// Physics ticks executed.
    pub ticks: u64,
    /// Loop iterations (= render signals attempted).
    pub frames: u64,
    /// Chunks generated over the whole session.
    pub chunks_generated: u64,
    /// Ticks whose prefetch hit the generation budget.
    pub budget_overruns: u64,
    /// Player edits recorded in the overlay.
    pub overlay_entries: usize,
}

/// The simulation state owned by the loop thread.
struct Simulation {
    config: SessionConfig,
    world: WorldField,
    player: Player,
    camera: Camera,
    tick: u64,
}

impl Simulation {
    fn new(config: SessionConfig) -> Self {
        let world = WorldField::new(&config);
        let player = Player::spawn(&world, &config);
        let camera = Camera::from_player(&player, &config);
        Self {
            config,
            world,
            player,
            camera,
            tick: 0,
        }
    }

    /// One logical tick: edits, intents, prefetch, physics, camera.
    fn tick(&mut self, input: InputState, edits: &Receiver<EditCommand>) {
        // Edits land before physics so a placed block collides this tick.
        while let Ok(edit) = edits.try_recv() {
            self.world.set_block(edit.tile_x, edit.tile_y, edit.block);
        }

        self.world.begin_tick();
        let ts = f64::from(self.config.tile_size);
        let center = (self.player.center_x() / ts).floor() as i64;
        let half = i64::from(self.config.viewport_width / self.config.tile_size) / 2 + 2;
        if self.world.prefetch(center - half, center + half).is_err() {
            // Already logged by the world field; uncovered chunks fall
            // back to lazy generation inside the physics reads.
        }

        physics::step(&mut self.player, input, &mut self.world, &self.config);
        self.camera = Camera::from_player(&self.player, &self.config);
        self.tick += 1;
    }

    fn snapshot(&mut self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            player: self.player,
            camera: self.camera,
            view: TileView::capture(&mut self.world, &self.camera, &self.config),
        }
    }

    fn stats(&self, frames: u64) -> SimStats {
        let world = self.world.stats();
        SimStats {
            ticks: self.tick,
            frames,
            chunks_generated: world.chunks_generated,
            budget_overruns: world.budget_overruns,
            overlay_entries: world.overlay_entries,
        }
    }
}

/// The loop body, run on the simulation thread until the flag clears.
fn run(
    mut sim: Simulation,
    running: &AtomicBool,
    input: &Mutex<InputState>,
    events: &EventSystem,
    cell: &SnapshotCell<FrameSnapshot>,
) -> SimStats {
    tracing::debug!("simulation thread started");

    let tick_duration = 1.0 / f64::from(sim.config.target_tps);
    let mut accumulator = 0.0_f64;
    let mut last = Instant::now();
    let mut frame: u64 = 0;

    while running.load(Ordering::Acquire) {
        let now = Instant::now();
        let pending = now.duration_since(last).as_secs_f64() / tick_duration;
        last = now;
        if pending > MAX_CATCHUP_TICKS {
            tracing::warn!(
                "simulation fell behind: dropping {:.1} pending ticks",
                pending - MAX_CATCHUP_TICKS
            );
        }
        accumulator += pending.min(MAX_CATCHUP_TICKS);

        let mut ticks_run: u32 = 0;
        while accumulator >= 1.0 {
            let current = *input.lock();
            sim.tick(current, &events.edit_receiver);
            accumulator -= 1.0;
            ticks_run += 1;
        }

        if ticks_run > 0 {
            cell.publish(sim.snapshot());
        }
        // One render request per iteration, decoupled from tick count.
        events.signal_frame(FrameSignal { frame, ticks_run });
        frame += 1;

        thread::sleep(LOOP_YIELD);
    }

    tracing::debug!("simulation thread stopping after {} ticks", sim.tick);
    sim.stats(frame)
}

/// Owner's handle to a running simulation.
///
/// Dropping the handle stops the simulation; prefer [`stop`] to also
/// collect the final statistics.
///
/// [`stop`]: SimulationHandle::stop
pub struct SimulationHandle {
    running: Arc<AtomicBool>,
    input: Arc<Mutex<InputState>>,
    snapshot: Arc<SnapshotCell<FrameSnapshot>>,
    edit_sender: Sender<EditCommand>,
    frame_receiver: Receiver<FrameSignal>,
    thread: Option<JoinHandle<SimStats>>,
}

impl SimulationHandle {
    /// Spawns the simulation thread for one session.
    ///
    /// The spawn area is generated before the thread starts, so the first
    /// published snapshot is already standing on real terrain.
    #[must_use]
    pub fn spawn(config: SessionConfig) -> Self {
        let mut sim = Simulation::new(config);
        let running = Arc::new(AtomicBool::new(true));
        let input = Arc::new(Mutex::new(InputState::default()));
        let snapshot = Arc::new(SnapshotCell::new(sim.snapshot()));
        let events = EventSystem::new();

        let edit_sender = events.edit_sender.clone();
        let frame_receiver = events.frame_receiver.clone();

        let thread = {
            let running = Arc::clone(&running);
            let input = Arc::clone(&input);
            let snapshot = Arc::clone(&snapshot);
            thread::spawn(move || run(sim, &running, &input, &events, &snapshot))
        };

        Self {
            running,
            input,
            snapshot,
            edit_sender,
            frame_receiver,
            thread: Some(thread),
        }
    }

    /// Replaces the input intents sampled by upcoming ticks.
    pub fn set_input(&self, input: InputState) {
        *self.input.lock() = input;
    }

    /// Channel for break/place requests.
    #[must_use]
    pub fn edit_sender(&self) -> &Sender<EditCommand> {
        &self.edit_sender
    }

    /// Channel carrying one render request per loop iteration.
    #[must_use]
    pub fn frame_receiver(&self) -> &Receiver<FrameSignal> {
        &self.frame_receiver
    }

    /// The most recently published frame snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<FrameSnapshot> {
        self.snapshot.latest()
    }

    /// Number of snapshots published so far.
    #[must_use]
    pub fn snapshot_version(&self) -> u64 {
        self.snapshot.version()
    }

    /// True until `stop` is called (or the handle is dropped).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Cooperative shutdown: clears the running flag, waits for the
    /// simulation thread to observe it and exit, and returns the final
    /// statistics.
    #[must_use]
    pub fn stop(mut self) -> SimStats {
        self.running.store(false, Ordering::Release);
        self.thread
            .take()
            .and_then(|thread| thread.join().ok())
            .unwrap_or_default()
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
