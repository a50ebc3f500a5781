//! # Frame Snapshots
//!
//! The immutable view a render consumer receives. Captured on the
//! simulation thread at the end of a loop iteration, so a renderer can
//! never observe a column mid-generation or the player mid-update.

use strata_core::SessionConfig;
use strata_procedural::{BlockType, WorldField};

use crate::camera::Camera;
use crate::physics::Player;

/// A copied rectangular tile region, overlay already applied.
///
/// Covers the camera's horizontal span plus one column of margin each
/// side, and the full world height.
#[derive(Clone, Debug)]
pub struct TileView {
    origin_tx: i64,
    columns: usize,
    rows: usize,
    blocks: Vec<BlockType>,
}

impl TileView {
    /// Copies the region the camera can see out of the world.
    #[must_use]
    pub fn capture(world: &mut WorldField, camera: &Camera, config: &SessionConfig) -> Self {
        let ts = f64::from(config.tile_size);
        let origin_tx = (camera.x / ts).floor() as i64;
        let columns = (config.viewport_width / config.tile_size + 2) as usize;
        let rows = config.world_height as usize;

        let mut blocks = Vec::with_capacity(columns * rows);
        for offset in 0..columns {
            let tx = origin_tx + offset as i64;
            for ty in 0..rows {
                blocks.push(world.block(tx, ty as i32));
            }
        }

        Self {
            origin_tx,
            columns,
            rows,
            blocks,
        }
    }

    /// First tile column covered by this view.
    #[inline]
    #[must_use]
    pub fn origin_tx(&self) -> i64 {
        self.origin_tx
    }

    /// Number of tile columns covered.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of tile rows covered (= world height).
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Block at world tile `(tx, ty)`; Air outside the captured region.
    #[must_use]
    pub fn get(&self, tx: i64, ty: i32) -> BlockType {
        let Ok(offset) = usize::try_from(tx - self.origin_tx) else {
            return BlockType::Air;
        };
        let Ok(row) = usize::try_from(ty) else {
            return BlockType::Air;
        };
        if offset >= self.columns || row >= self.rows {
            return BlockType::Air;
        }
        self.blocks[offset * self.rows + row]
    }
}

/// Everything a renderer needs for one frame, immutable.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    /// Ticks completed when this snapshot was taken.
    pub tick: u64,
    /// Player body as of the last tick.
    pub player: Player,
    /// Derived viewport origin as of the last tick.
    pub camera: Camera,
    /// Copied visible tile region.
    pub view: TileView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_matches_world_and_bounds() {
        let config = SessionConfig::default();
        let mut world = WorldField::new(&config);
        world.set_block(1, 2, BlockType::Wood);

        let camera = Camera { x: 0.0, y: 0.0 };
        let view = TileView::capture(&mut world, &camera, &config);

        assert_eq!(view.origin_tx(), 0);
        assert_eq!(view.columns(), 27);
        assert_eq!(view.rows(), 18);

        // Overlay edit is visible in the copy.
        assert_eq!(view.get(1, 2), BlockType::Wood);

        // The copy agrees with the live world everywhere it covers.
        for tx in 0..27 {
            for ty in 0..18 {
                assert_eq!(view.get(tx, ty), world.block(tx, ty), "({tx}, {ty})");
            }
        }

        // Outside the captured region everything reads Air.
        assert_eq!(view.get(-1, 2), BlockType::Air);
        assert_eq!(view.get(100, 2), BlockType::Air);
        assert_eq!(view.get(0, -1), BlockType::Air);
        assert_eq!(view.get(0, 18), BlockType::Air);
    }

    #[test]
    fn test_negative_camera_origin() {
        let config = SessionConfig::default();
        let mut world = WorldField::new(&config);
        let camera = Camera { x: -100.0, y: 0.0 };
        let view = TileView::capture(&mut world, &camera, &config);
        assert_eq!(view.origin_tx(), -4);
        assert_eq!(view.get(-4, 9), world.block(-4, 9));
    }
}
