//! Integration tests for the simulation loop lifecycle.
//!
//! Each test spawns a real simulation thread with the default
//! configuration, interacts with it through the handle's channels, and
//! stops it cooperatively. Deadlines are generous so a loaded CI machine
//! cannot produce flakes.

use std::time::{Duration, Instant};

use strata::procedural::BlockType;
use strata::{EditCommand, InputState, SimulationHandle};
use strata_core::SessionConfig;

const DEADLINE: Duration = Duration::from_secs(5);
const POLL: Duration = Duration::from_millis(5);

/// Polls until `predicate` holds or the deadline passes.
fn wait_until(handle: &SimulationHandle, predicate: impl Fn(&SimulationHandle) -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < DEADLINE {
        if predicate(handle) {
            return true;
        }
        std::thread::sleep(POLL);
    }
    false
}

#[test]
fn test_ticks_advance_and_snapshots_publish() {
    let handle = SimulationHandle::spawn(SessionConfig::default());

    assert!(
        wait_until(&handle, |h| h.snapshot().tick >= 5),
        "simulation never reached tick 5"
    );
    assert!(handle.snapshot_version() >= 1);

    // Frame signals keep arriving while the loop runs.
    let signal = handle
        .frame_receiver()
        .recv_timeout(DEADLINE)
        .expect("no frame signal");
    let later = handle
        .frame_receiver()
        .recv_timeout(DEADLINE)
        .expect("no second frame signal");
    assert!(later.frame > signal.frame);

    let stats = handle.stop();
    assert!(stats.ticks >= 5);
    assert!(stats.frames > 0);
    assert!(stats.chunks_generated > 0, "spawn area was never generated");
}

#[test]
fn test_edit_command_lands_in_snapshot() {
    let handle = SimulationHandle::spawn(SessionConfig::default());

    // Rows 0 and 1 are always air in generated terrain, so a placed block
    // there is unambiguous.
    handle
        .edit_sender()
        .send(EditCommand {
            tile_x: 2,
            tile_y: 0,
            block: BlockType::Wood,
        })
        .expect("edit channel closed");

    assert!(
        wait_until(&handle, |h| h.snapshot().view.get(2, 0) == BlockType::Wood),
        "edit never appeared in a snapshot"
    );

    let stats = handle.stop();
    assert!(stats.overlay_entries >= 1);
}

#[test]
fn test_input_intents_move_the_player() {
    let handle = SimulationHandle::spawn(SessionConfig::default());
    let start_x = handle.snapshot().player.x;

    handle.set_input(InputState {
        right: true,
        ..InputState::default()
    });
    assert!(
        wait_until(&handle, |h| h.snapshot().player.x > start_x + 10.0),
        "player never moved right"
    );

    // Releasing the key stops horizontal motion.
    handle.set_input(InputState::default());
    assert!(
        wait_until(&handle, |h| h.snapshot().player.vx.abs() < f64::EPSILON),
        "player kept moving after release"
    );

    let _ = handle.stop();
}

#[test]
fn test_stop_is_cooperative() {
    let handle = SimulationHandle::spawn(SessionConfig::default());
    assert!(handle.is_running());
    assert!(wait_until(&handle, |h| h.snapshot().tick >= 1));

    let stats = handle.stop();
    assert!(stats.ticks >= 1);
}

#[test]
fn test_drop_without_stop_joins_the_thread() {
    let handle = SimulationHandle::spawn(SessionConfig::default());
    assert!(wait_until(&handle, |h| h.snapshot().tick >= 1));
    drop(handle);
}
