//! # Headless Simulation Run
//!
//! Drives a full simulation session without any window or renderer:
//!
//! Spawn → Walk Right → Jump → Break a Block → Verify Snapshot → Stop
//!
//! Acts as a smoke test for the whole stack (terrain generation, physics,
//! edit overlay, snapshot publication, cooperative shutdown) and exits
//! nonzero if any stage misbehaves.

use std::path::Path;
use std::time::Duration;

use strata::procedural::BlockType;
use strata::{EditCommand, InputState, SimulationHandle};
use strata_core::{ConfigError, SessionConfig};

/// How long to wait for a single frame signal before declaring the
/// simulation thread stalled.
const FRAME_TIMEOUT: Duration = Duration::from_millis(250);

/// Everything that can end the session early.
#[derive(Debug, thiserror::Error)]
enum SessionError {
    /// The configuration file was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The simulation thread stopped producing frame signals.
    #[error("simulation thread stalled")]
    SimulationStalled,
    /// A scenario stage did not observe the expected state.
    #[error("stage failed: {0}")]
    StageFailed(&'static str),
}

/// Waits for `frames` loop iterations and returns the ticks they ran.
fn wait_frames(handle: &SimulationHandle, frames: u32) -> Result<u64, SessionError> {
    let mut ticks: u64 = 0;
    for _ in 0..frames {
        let signal = handle
            .frame_receiver()
            .recv_timeout(FRAME_TIMEOUT)
            .map_err(|_| SessionError::SimulationStalled)?;
        ticks += u64::from(signal.ticks_run);
    }
    Ok(ticks)
}

fn run() -> Result<(), SessionError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(Path::new(&path))?,
        None => SessionConfig::default(),
    };

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║                STRATA HEADLESS SESSION                   ║");
    println!("║     spawn → walk → jump → edit → verify → stop           ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "world seed: {:#018x}, target {} tps",
        config.world_seed, config.target_tps
    );
    println!();

    let tile_size = f64::from(config.tile_size);
    let handle = SimulationHandle::spawn(config);

    // ── Phase 1: spawn sanity ────────────────────────────────────────
    let spawn = handle.snapshot();
    println!(
        "[spawn]  player at ({:.1}, {:.1}), tick {}",
        spawn.player.x, spawn.player.y, spawn.tick
    );

    // ── Phase 2: walk right ──────────────────────────────────────────
    handle.set_input(InputState {
        right: true,
        ..InputState::default()
    });
    wait_frames(&handle, 120)?;
    let walked = handle.snapshot();
    println!(
        "[walk]   player at ({:.1}, {:.1}), tick {}",
        walked.player.x, walked.player.y, walked.tick
    );
    if walked.player.x <= spawn.player.x {
        return Err(SessionError::StageFailed("player did not move right"));
    }

    // ── Phase 3: jump ────────────────────────────────────────────────
    handle.set_input(InputState {
        jump: true,
        ..InputState::default()
    });
    wait_frames(&handle, 5)?;
    let airborne = handle.snapshot();
    handle.set_input(InputState::default());
    wait_frames(&handle, 60)?;
    let landed = handle.snapshot();
    println!(
        "[jump]   peak y {:.1}, back on ground: {}",
        airborne.player.y, landed.player.on_ground
    );

    // ── Phase 4: break the surface block two tiles ahead ─────────────
    let tx = (landed.player.center_x() / tile_size).floor() as i64 + 2;
    let rows = i32::try_from(landed.view.rows()).unwrap_or(i32::MAX);
    let Some(ty) = (0..rows).find(|&ty| landed.view.get(tx, ty).is_solid()) else {
        return Err(SessionError::StageFailed("no surface found ahead"));
    };
    handle
        .edit_sender()
        .send(EditCommand {
            tile_x: tx,
            tile_y: ty,
            block: BlockType::Air,
        })
        .map_err(|_| SessionError::SimulationStalled)?;
    wait_frames(&handle, 5)?;
    let edited = handle.snapshot();
    println!("[edit]   broke block at ({tx}, {ty})");
    if edited.view.get(tx, ty) != BlockType::Air {
        return Err(SessionError::StageFailed("break not visible in snapshot"));
    }

    // ── Phase 5: place a block into the hole ─────────────────────────
    handle
        .edit_sender()
        .send(EditCommand {
            tile_x: tx,
            tile_y: ty,
            block: BlockType::Stone,
        })
        .map_err(|_| SessionError::SimulationStalled)?;
    wait_frames(&handle, 5)?;
    let placed = handle.snapshot();
    println!("[edit]   placed stone at ({tx}, {ty})");
    if placed.view.get(tx, ty) != BlockType::Stone {
        return Err(SessionError::StageFailed("place not visible in snapshot"));
    }

    // ── Phase 6: cooperative stop ────────────────────────────────────
    let versions = handle.snapshot_version();
    let stats = handle.stop();

    println!();
    println!("┌─ SESSION STATS ──────────────────────────────────────────┐");
    println!("│ ticks executed:     {:>8}                             │", stats.ticks);
    println!("│ loop iterations:    {:>8}                             │", stats.frames);
    println!("│ snapshots:          {:>8}                             │", versions);
    println!("│ chunks generated:   {:>8}                             │", stats.chunks_generated);
    println!("│ budget overruns:    {:>8}                             │", stats.budget_overruns);
    println!("│ overlay entries:    {:>8}                             │", stats.overlay_entries);
    println!("└──────────────────────────────────────────────────────────┘");

    if stats.ticks == 0 {
        return Err(SessionError::StageFailed("no ticks executed"));
    }
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {
            println!();
            println!("✅ HEADLESS SESSION PASSED");
        }
        Err(err) => {
            eprintln!();
            eprintln!("❌ HEADLESS SESSION FAILED: {err}");
            std::process::exit(1);
        }
    }
}
