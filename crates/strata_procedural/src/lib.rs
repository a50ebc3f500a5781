//! # STRATA Procedural Generation
//!
//! Deterministic world generation for an infinite, reproducible
//! side-scrolling tile world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: Columns are generated in fixed-width chunks
//! 3. **Order-independent**: Every column is a pure function of
//!    `(seed, tile_x)`; the order chunks are generated in can never
//!    change the terrain
//! 4. **Edits win**: The overlay of player edits permanently shadows
//!    generated content
//!
//! ## Core Components
//!
//! - `hash`: pure coordinate hash replacing any stateful RNG
//! - `TerrainGenerator`: surface, cave and tree generation per chunk
//! - `WorldField`: column cache, chunk status map, edit overlay and the
//!   per-tick generation budget
//!
//! ## Example
//!
//! ```rust
//! use strata_core::SessionConfig;
//! use strata_procedural::{BlockType, WorldField};
//!
//! let config = SessionConfig::default();
//! let mut world = WorldField::new(&config);
//!
//! // Reads generate lazily and never fail.
//! let _ = world.block(1_000, 10);
//!
//! // Edits shadow generated terrain forever.
//! world.set_block(1_000, 10, BlockType::Stone);
//! assert_eq!(world.block(1_000, 10), BlockType::Stone);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod hash;
pub mod terrain;
pub mod world;

pub use hash::WorldSeed;
pub use terrain::{BlockType, Chunk, Column, TerrainGenerator};
pub use world::{ChunkState, WorldError, WorldField, WorldStats};
