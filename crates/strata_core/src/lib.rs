//! # STRATA Core
//!
//! Foundation types shared by every STRATA crate.
//!
//! ## Core Components
//!
//! - `SessionConfig`: all tunables for one world session, TOML-loadable
//! - `SnapshotCell`: single-writer handoff of immutable frame snapshots
//!   from the simulation thread to any render consumer
//!
//! ## Design Principles
//!
//! 1. **One writer**: the simulation thread owns all mutable state
//! 2. **Immutable handoff**: render consumers only ever see snapshots
//! 3. **No GPU, no IO in the hot path**: config is loaded once at startup

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod sync;

pub use config::{ConfigError, SessionConfig};
pub use sync::SnapshotCell;
