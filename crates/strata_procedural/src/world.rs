//! # World Field
//!
//! The owned world-session value: column cache, chunk status map and the
//! permanent edit overlay. Every operation goes through one `WorldField`
//! passed by reference; there is no ambient or static world state.
//!
//! ## Read / Write Contract
//!
//! - `block` and `column` never fail; ungenerated terrain is generated
//!   lazily on first touch
//! - `set_block` records a permanent overlay entry that shadows generated
//!   content forever (breaking a block is an Air entry, not a removal)
//! - Rows outside `[0, world_height)` read Air and ignore writes
//!
//! ## Generation Budget
//!
//! A fast-moving player could make one tick generate arbitrarily many
//! chunks through the lazy read path. `prefetch` bounds that work per tick
//! and surfaces the overrun instead of stalling the simulation.

use std::collections::HashMap;

use strata_core::SessionConfig;
use thiserror::Error;

use crate::terrain::{BlockType, Column, TerrainGenerator};

/// Generation status of a chunk.
///
/// Tracked explicitly so a chunk is never generated twice and a render of
/// partially generated state is impossible: columns are only published to
/// the cache together with the `Ready` transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Generation started but its columns are not yet visible.
    Requested,
    /// All columns of the chunk are in the cache.
    Ready,
}

/// Recoverable conditions surfaced by the world field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// One tick asked for more chunk generation than the configured budget
    /// allows. Terrain already generated this call stays; the rest is
    /// deferred to lazy generation or the next tick's prefetch.
    #[error(
        "generation budget exhausted: tick needed {requested} chunks, \
         budget is {budget}"
    )]
    GenerationBudgetExceeded {
        /// Chunks the prefetch span required.
        requested: u32,
        /// Configured per-tick generation cap.
        budget: u32,
    },
}

/// Counters describing a world session.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorldStats {
    /// Chunks generated since the session started.
    pub chunks_generated: u64,
    /// Permanent overlay entries (player edits).
    pub overlay_entries: usize,
    /// Ticks whose prefetch hit the generation budget.
    pub budget_overruns: u64,
}

/// The chunked world store: generator, column cache, chunk status map and
/// edit overlay.
///
/// Confined to the simulation thread; render consumers only ever see
/// immutable snapshots taken from it.
pub struct WorldField {
    generator: TerrainGenerator,
    world_height: i32,
    states: HashMap<i64, ChunkState>,
    columns: HashMap<i64, Column>,
    overlay: HashMap<(i64, i32), BlockType>,
    budget: u32,
    generated_this_tick: u32,
    chunks_generated: u64,
    budget_overruns: u64,
}

impl WorldField {
    /// Creates an empty world field for the given session.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            generator: TerrainGenerator::new(config),
            world_height: i32::try_from(config.world_height).unwrap_or(i32::MAX),
            states: HashMap::new(),
            columns: HashMap::new(),
            overlay: HashMap::new(),
            budget: config.max_chunks_per_tick,
            generated_this_tick: 0,
            chunks_generated: 0,
            budget_overruns: 0,
        }
    }

    /// Chunk index owning tile-x.
    #[inline]
    #[must_use]
    pub fn chunk_of(&self, tx: i64) -> i64 {
        self.generator.chunk_of(tx)
    }

    /// Returns true once `cx` has been generated.
    #[inline]
    #[must_use]
    pub fn is_chunk_ready(&self, cx: i64) -> bool {
        matches!(self.states.get(&cx), Some(ChunkState::Ready))
    }

    /// Generates chunk `cx` exactly once; no-op when already generated.
    ///
    /// The `Requested` status guards against reentrant generation of the
    /// same chunk; columns become visible only together with `Ready`.
    pub fn ensure_chunk(&mut self, cx: i64) {
        if self.states.contains_key(&cx) {
            return;
        }
        self.states.insert(cx, ChunkState::Requested);

        let origin = self.generator.chunk_origin(cx);
        let columns = self.generator.generate_chunk(cx).into_columns();
        for (offset, column) in columns.into_iter().enumerate() {
            self.columns.insert(origin + offset as i64, column);
        }

        self.states.insert(cx, ChunkState::Ready);
        self.generated_this_tick += 1;
        self.chunks_generated += 1;
        tracing::debug!("generated chunk {}", cx);
    }

    /// The column at tile-x, generating its chunk and both horizontal
    /// neighbors on first touch (so trees and the camera can read across
    /// chunk boundaries without further generation).
    pub fn column(&mut self, tx: i64) -> &Column {
        let cx = self.chunk_of(tx);
        self.ensure_chunk(cx - 1);
        self.ensure_chunk(cx);
        self.ensure_chunk(cx + 1);
        &self.columns[&tx]
    }

    /// Block at `(tx, ty)`: Air out of bounds, otherwise the overlay entry
    /// if present, otherwise generated terrain. Never fails; may generate
    /// lazily.
    pub fn block(&mut self, tx: i64, ty: i32) -> BlockType {
        if ty < 0 || ty >= self.world_height {
            return BlockType::Air;
        }
        if let Some(&block) = self.overlay.get(&(tx, ty)) {
            return block;
        }
        self.column(tx).get(ty)
    }

    /// Records a permanent edit at `(tx, ty)`; no-op out of bounds.
    ///
    /// Does not require the owning chunk to be generated first; the entry
    /// shadows whatever generation later produces for that tile.
    pub fn set_block(&mut self, tx: i64, ty: i32, block: BlockType) {
        if ty < 0 || ty >= self.world_height {
            return;
        }
        self.overlay.insert((tx, ty), block);
    }

    /// Resets the per-tick generation counter. Call once per tick, before
    /// `prefetch`.
    pub fn begin_tick(&mut self) {
        self.generated_this_tick = 0;
    }

    /// Generates every chunk overlapping `[tx_min, tx_max]` plus one chunk
    /// of margin each side, stopping at the per-tick budget.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::GenerationBudgetExceeded`] when the span needs
    /// more generation than the budget allows this tick. Reads remain
    /// valid either way; the uncovered chunks fall back to lazy generation.
    pub fn prefetch(&mut self, tx_min: i64, tx_max: i64) -> Result<u32, WorldError> {
        let first = self.chunk_of(tx_min.min(tx_max)) - 1;
        let last = self.chunk_of(tx_min.max(tx_max)) + 1;

        let before = self.generated_this_tick;
        for cx in first..=last {
            if self.is_chunk_ready(cx) {
                continue;
            }
            if self.generated_this_tick >= self.budget {
                self.budget_overruns += 1;
                let requested = (last - first + 1) as u32;
                tracing::warn!(
                    "generation budget exhausted: tick needed {} chunks, budget is {}",
                    requested,
                    self.budget
                );
                return Err(WorldError::GenerationBudgetExceeded {
                    requested,
                    budget: self.budget,
                });
            }
            self.ensure_chunk(cx);
        }
        Ok(self.generated_this_tick - before)
    }

    /// Surface row at tile-x (pure, no generation side effect).
    #[inline]
    #[must_use]
    pub fn surface_height(&self, tx: i64) -> i32 {
        self.generator.surface_height(tx)
    }

    /// World height in tiles.
    #[inline]
    #[must_use]
    pub fn world_height(&self) -> i32 {
        self.world_height
    }

    /// Session counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            chunks_generated: self.chunks_generated,
            overlay_entries: self.overlay.len(),
            budget_overruns: self.budget_overruns,
        }
    }
}
