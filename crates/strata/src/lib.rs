//! # STRATA
//!
//! A side-scrolling, tile-based 2D world simulation: infinite procedural
//! terrain, a gravity-bound player, and a sparse overlay of player edits,
//! advanced at a fixed 60 ticks per second on a dedicated thread.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      SIMULATION THREAD                          │
//! │                                                                 │
//! │  input intents ──► PhysicsStep ──► WorldField ──► Camera        │
//! │  edit commands ──────────────────► (overlay)                    │
//! │                                                                 │
//! │  per frame: FrameSnapshot ──► SnapshotCell ──► FrameSignal      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                        │
//!                                        ▼
//!                        render consumer (any thread, read-only)
//! ```
//!
//! Data flows one direction per tick: input intents into physics, physics
//! reads/writes the world field, and render consumers only ever see the
//! immutable snapshot published at the end of the iteration.
//!
//! ## Modules
//!
//! - `physics`: player body and axis-sequential tile collision
//! - `camera`: derived viewport origin
//! - `events`: edit commands and render signals (crossbeam channels)
//! - `snapshot`: the immutable per-frame view
//! - `game_loop`: fixed-timestep loop, thread lifecycle, statistics

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod camera;
pub mod events;
pub mod game_loop;
pub mod physics;
pub mod snapshot;

// Re-export the lower layers
pub use strata_core as core;
pub use strata_procedural as procedural;

// Re-export commonly used types
pub use camera::Camera;
pub use events::{EditCommand, EventSystem, FrameSignal};
pub use game_loop::{SimStats, SimulationHandle};
pub use physics::{InputState, Player, PLAYER_HEIGHT, PLAYER_WIDTH};
pub use snapshot::{FrameSnapshot, TileView};
