//! # STRATA Event Plumbing
//!
//! Channel-based communication across the simulation boundary.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  EditCommand   ┌─────────────┐  FrameSignal  ┌──────────┐
//! │ Input layer │ ─────────────► │ Simulation  │ ────────────► │ Render   │
//! │ (any thread)│                │   thread    │               │ consumer │
//! └─────────────┘                └─────────────┘               └──────────┘
//! ```
//!
//! Edits flow into the simulation and are applied at the start of a tick.
//! Frame signals flow out once per loop iteration; the channel holds one
//! entry and signals are dropped, never blocked on, when the consumer lags.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use strata_procedural::BlockType;

/// A break/place request from outside the simulation.
///
/// Breaking is placing Air; the selected block for placement is external
/// UI state and arrives here already resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditCommand {
    /// Target tile column.
    pub tile_x: i64,
    /// Target tile row. Out-of-range rows are a no-op, by world contract.
    pub tile_y: i32,
    /// Block to write (Air = break).
    pub block: BlockType,
}

/// One render request, emitted after a loop iteration drained its ticks.
///
/// Decoupled from tick count: zero, one, or many ticks may have run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSignal {
    /// Loop iteration number.
    pub frame: u64,
    /// Ticks executed in this iteration.
    pub ticks_run: u32,
}

/// The channel bundle connecting the simulation to its host.
pub struct EventSystem {
    /// Host-side: submit break/place requests.
    pub edit_sender: Sender<EditCommand>,
    /// Sim-side: drain pending edits at tick start.
    pub(crate) edit_receiver: Receiver<EditCommand>,
    /// Sim-side: emit render requests.
    pub(crate) frame_sender: Sender<FrameSignal>,
    /// Host-side: wait for render requests.
    pub frame_receiver: Receiver<FrameSignal>,
}

impl EventSystem {
    /// Edit channel capacity. Far more than any input layer produces
    /// between two ticks.
    const EDIT_CAPACITY: usize = 256;

    /// Creates the channel bundle.
    #[must_use]
    pub fn new() -> Self {
        let (edit_sender, edit_receiver) = bounded(Self::EDIT_CAPACITY);
        // One slot: the consumer only ever cares about the newest request.
        let (frame_sender, frame_receiver) = bounded(1);
        Self {
            edit_sender,
            edit_receiver,
            frame_sender,
            frame_receiver,
        }
    }

    /// Emits a render request, dropping it if the consumer has not picked
    /// up the previous one. Rendering must never block the simulation.
    pub(crate) fn signal_frame(&self, signal: FrameSignal) {
        match self.frame_sender.try_send(signal) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => {
                // Consumer is gone; the simulation keeps running until the
                // owner stops it.
            }
        }
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_flow_through() {
        let events = EventSystem::new();
        let edit = EditCommand {
            tile_x: 3,
            tile_y: 2,
            block: BlockType::Stone,
        };
        events.edit_sender.send(edit).expect("channel open");
        assert_eq!(events.edit_receiver.try_recv(), Ok(edit));
    }

    #[test]
    fn test_frame_signals_drop_when_consumer_lags() {
        let events = EventSystem::new();
        events.signal_frame(FrameSignal { frame: 0, ticks_run: 1 });
        // Consumer lags; this one is dropped instead of blocking.
        events.signal_frame(FrameSignal { frame: 1, ticks_run: 1 });

        assert_eq!(
            events.frame_receiver.try_recv(),
            Ok(FrameSignal { frame: 0, ticks_run: 1 })
        );
        assert!(events.frame_receiver.try_recv().is_err());
    }
}
