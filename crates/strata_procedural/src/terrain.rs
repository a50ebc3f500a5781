//! # Terrain Generation
//!
//! Blocks, columns and the chunk generator.
//!
//! ## Generation Passes (per column)
//!
//! 1. **Surface**: two chunk-local sine phases shape a rolling surface line
//! 2. **Fill**: air above the surface, then grass / dirt / dirt / stone
//! 3. **Caves**: depth-scaled carving keyed by global coordinates
//! 4. **Trees**: trunk into the owning column, canopy into every column it
//!    reaches
//!
//! Surface height and tree parameters are pure functions of
//! `(seed, tile_x)`, so a column can apply the canopy of a tree whose trunk
//! lives in a neighboring, never-generated chunk. Generation is therefore
//! idempotent and independent of chunk generation order.

use std::f64::consts::PI;

use strata_core::SessionConfig;

use crate::hash::{self, WorldSeed};

/// One tile's content. Closed set, no payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. The only non-solid block.
    #[default]
    Air,
    /// Surface block.
    Grass,
    /// Sub-surface filler.
    Dirt,
    /// Deep terrain.
    Stone,
    /// Tree trunk.
    Wood,
    /// Tree canopy.
    Leaves,
}

impl BlockType {
    /// Returns true for empty space.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Returns true if this block obstructs movement.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !self.is_air()
    }
}

/// One tile-x's full vertical stack of blocks, row 0 = top.
///
/// Always exactly world-height rows; replaced wholesale on generation,
/// never resized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    blocks: Box<[BlockType]>,
}

impl Column {
    /// An all-air column of the given height.
    #[must_use]
    fn air(height: usize) -> Self {
        Self {
            blocks: vec![BlockType::Air; height].into_boxed_slice(),
        }
    }

    /// Number of rows (= world height).
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    /// Block at `row`; rows outside `[0, height)` read Air.
    #[inline]
    #[must_use]
    pub fn get(&self, row: i32) -> BlockType {
        usize::try_from(row)
            .ok()
            .and_then(|r| self.blocks.get(r).copied())
            .unwrap_or(BlockType::Air)
    }

    /// Writes `block` at `row`; rows outside `[0, height)` are ignored.
    #[inline]
    fn set(&mut self, row: i32, block: BlockType) {
        if let Ok(r) = usize::try_from(row) {
            if let Some(slot) = self.blocks.get_mut(r) {
                *slot = block;
            }
        }
    }

    /// All rows, top to bottom.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[BlockType] {
        &self.blocks
    }
}

/// One generated chunk: a fixed-width run of columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    coord: i64,
    columns: Vec<Column>,
}

impl Chunk {
    /// The chunk index this chunk was generated for.
    #[inline]
    #[must_use]
    pub fn coord(&self) -> i64 {
        self.coord
    }

    /// Columns in tile-x order, starting at the chunk origin.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Consumes the chunk, yielding its columns.
    #[inline]
    #[must_use]
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

/// Deterministic terrain generator for one world session.
///
/// Holds no mutable state; every method is a pure function of the seed and
/// the coordinates passed in.
pub struct TerrainGenerator {
    phase_seed: WorldSeed,
    cave_seed: WorldSeed,
    tree_seed: WorldSeed,
    trunk_seed: WorldSeed,
    height: i32,
    chunk_width: i64,
}

impl TerrainGenerator {
    /// Probability that a given tile-x hosts a tree.
    const TREE_CHANCE: f64 = 0.08;
    /// Minimum trunk length in tiles.
    const TRUNK_MIN: i64 = 3;
    /// Maximum trunk length in tiles.
    const TRUNK_MAX: i64 = 5;
    /// Canopy half-width in tile-x.
    const CANOPY_RADIUS: i64 = 2;
    /// Base cave carving probability at the shallowest carvable row.
    const CAVE_BASE: f64 = 0.02;
    /// Additional carving probability at the deepest row.
    const CAVE_DEPTH_BONUS: f64 = 0.08;

    /// Creates a generator for the given session.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let seed = WorldSeed::new(config.world_seed);
        Self {
            phase_seed: seed.derive(1),
            cave_seed: seed.derive(2),
            tree_seed: seed.derive(3),
            trunk_seed: seed.derive(4),
            height: i32::try_from(config.world_height).unwrap_or(i32::MAX),
            chunk_width: i64::from(config.chunk_width),
        }
    }

    /// Chunk index owning tile-x (floor division, correct for negatives).
    #[inline]
    #[must_use]
    pub fn chunk_of(&self, tx: i64) -> i64 {
        tx.div_euclid(self.chunk_width)
    }

    /// First tile-x of chunk `cx`.
    #[inline]
    #[must_use]
    pub fn chunk_origin(&self, cx: i64) -> i64 {
        cx * self.chunk_width
    }

    /// Width of every chunk in tile columns.
    #[inline]
    #[must_use]
    pub fn chunk_width(&self) -> i64 {
        self.chunk_width
    }

    /// Surface row for tile-x: two stacked sines with chunk-local phases,
    /// clamped to `[2, height - 6]`.
    #[must_use]
    pub fn surface_height(&self, tx: i64) -> i32 {
        let cx = self.chunk_of(tx);
        let phase1 = hash::unit2(self.phase_seed, cx, 0).mul_add(2.0 * PI, -PI);
        let phase2 = hash::unit2(self.phase_seed, cx, 1).mul_add(2.0 * PI, -PI);

        let x = tx as f64;
        let h = f64::from(self.height);
        let surf = h / 2.0
            + (x.mul_add(0.12, phase1)).sin() * 2.2
            + (x.mul_add(0.05, phase2)).sin() * 3.5;

        let surf = surf.round() as i32;
        surf.clamp(2, self.height - 6)
    }

    /// Trunk length of the tree rooted at tile-x, if any.
    fn tree_at(&self, tx: i64) -> Option<i32> {
        if hash::unit1(self.tree_seed, tx) < Self::TREE_CHANCE {
            let len = hash::range1(self.trunk_seed, tx, Self::TRUNK_MIN, Self::TRUNK_MAX);
            Some(len as i32)
        } else {
            None
        }
    }

    /// Generates the column at tile-x.
    ///
    /// Pure in `(seed, tx)`; never fails, all row indices clamp. A column
    /// with zero caves or trees is valid output.
    #[must_use]
    pub fn generate_column(&self, tx: i64) -> Column {
        let mut column = Column::air(self.height.max(0) as usize);
        let surf = self.surface_height(tx);

        // Pass 1: fill. Rows above `surf` stay air.
        column.set(surf, BlockType::Grass);
        column.set(surf + 1, BlockType::Dirt);
        column.set(surf + 2, BlockType::Dirt);
        for row in (surf + 3)..self.height {
            column.set(row, BlockType::Stone);
        }

        // Pass 2: caves. Keyed by global (x, y) so the carving pattern is
        // identical no matter how the world is partitioned into chunks.
        let first = surf + 3;
        let depth_span = (self.height - 1 - first).max(1);
        for row in first..self.height {
            let depth_fraction = f64::from(row - first) / f64::from(depth_span);
            let carve =
                Self::CAVE_DEPTH_BONUS.mul_add(depth_fraction, Self::CAVE_BASE);
            if hash::unit2(self.cave_seed, tx, i64::from(row)) < carve {
                column.set(row, BlockType::Air);
            }
        }

        // Pass 3: own trunk. Rows [surf - len, surf - 1], above the grass.
        if let Some(len) = self.tree_at(tx) {
            for row in (surf - len)..surf {
                column.set(row, BlockType::Wood);
            }
        }

        // Pass 4: canopy of every tree within reach, own tree included.
        // Tree parameters are pure in (seed, x), so trunks in neighboring
        // chunks contribute without those chunks ever being generated.
        for root in (tx - Self::CANOPY_RADIUS)..=(tx + Self::CANOPY_RADIUS) {
            let Some(len) = self.tree_at(root) else {
                continue;
            };
            let top = self.surface_height(root) - len;
            for row in (top - 1)..=(top + 1) {
                if column.get(row).is_air() {
                    column.set(row, BlockType::Leaves);
                }
            }
        }

        column
    }

    /// Generates every column of chunk `cx`.
    #[must_use]
    pub fn generate_chunk(&self, cx: i64) -> Chunk {
        let origin = self.chunk_origin(cx);
        let columns = (origin..origin + self.chunk_width)
            .map(|tx| self.generate_column(tx))
            .collect();
        Chunk { coord: cx, columns }
    }
}
