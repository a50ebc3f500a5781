//! # Camera Derivation
//!
//! The camera is not state: it is recomputed from the player and viewport
//! every tick. Vertically it clamps to the world band; horizontally it
//! follows the player without limit (the world is infinite sideways).

use strata_core::SessionConfig;

use crate::physics::Player;

/// Viewport top-left corner in pixels, derived once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    /// Left edge (pixels). Never clamped.
    pub x: f64,
    /// Top edge (pixels). Clamped to `[0, world_height_px - viewport_h]`.
    pub y: f64,
}

impl Camera {
    /// Centers the viewport on the player, clamping vertically.
    #[must_use]
    pub fn from_player(player: &Player, config: &SessionConfig) -> Self {
        let vw = f64::from(config.viewport_width);
        let vh = f64::from(config.viewport_height);

        let x = player.center_x() - vw / 2.0;

        let max_y = (config.world_pixel_height() - vh).max(0.0);
        let y = (player.center_y() - vh / 2.0).clamp(0.0, max_y);

        Self { x, y }
    }
}
