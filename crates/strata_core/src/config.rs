//! # Session Configuration
//!
//! All tunables for one world session, collected in a single value that is
//! loaded once at startup and passed by reference everywhere. There is no
//! ambient or static configuration state.
//!
//! Defaults reproduce the reference world exactly; a TOML file may override
//! any subset of fields. Every loaded configuration is validated before use.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors produced while loading or validating a [`SessionConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML (or has wrong field types).
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Falling faster than one tile per tick can tunnel through a
    /// one-tile-thick platform, so this combination is rejected as unsafe.
    #[error(
        "unsafe configuration: max_fall_speed ({max_fall_speed}) must stay \
         below tile_size ({tile_size})"
    )]
    UnsafeFallSpeed {
        /// Configured terminal fall speed (pixels per tick).
        max_fall_speed: f64,
        /// Configured tile edge length (pixels).
        tile_size: u32,
    },

    /// The surface band `[2, world_height - 6]` must be non-empty.
    #[error("world_height must be at least 9, got {0}")]
    WorldTooShort(u32),

    /// A chunk must span at least one column.
    #[error("chunk_width must be at least 1")]
    ZeroChunkWidth,

    /// The simulation needs a positive logical tick rate.
    #[error("target_tps must be at least 1")]
    ZeroTickRate,

    /// A single column read may generate up to three chunks, so any smaller
    /// per-tick budget could never be satisfied.
    #[error("max_chunks_per_tick must be at least 3, got {0}")]
    BudgetTooSmall(u32),
}

/// Configuration for one world session.
///
/// Horizontal world extent is unbounded by design; everything else about
/// the session is fixed here for its whole lifetime.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed for all procedural generation.
    pub world_seed: u64,
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// World height in tiles, fixed for the session.
    pub world_height: u32,
    /// Chunk width in tile columns.
    pub chunk_width: u32,
    /// Horizontal movement speed (pixels per tick).
    pub move_speed: f64,
    /// Gravity acceleration (pixels per tick, per tick).
    pub gravity_per_tick: f64,
    /// Terminal fall speed (pixels per tick).
    pub max_fall_speed: f64,
    /// Jump impulse (pixels per tick, negative = up).
    pub jump_velocity: f64,
    /// Viewport width in pixels (camera derivation only).
    pub viewport_width: u32,
    /// Viewport height in pixels (camera derivation only).
    pub viewport_height: u32,
    /// Target logical updates per second.
    pub target_tps: u32,
    /// Upper bound on chunks generated by one tick's prefetch.
    pub max_chunks_per_tick: u32,
}

impl SessionConfig {
    /// Default world seed.
    pub const DEFAULT_WORLD_SEED: u64 = 0xDA7A_5EED_0001_C0DE;

    /// Loads and validates a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Parses and validates a configuration from a TOML string.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not parse or fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants every session relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_fall_speed >= f64::from(self.tile_size) {
            return Err(ConfigError::UnsafeFallSpeed {
                max_fall_speed: self.max_fall_speed,
                tile_size: self.tile_size,
            });
        }
        if self.world_height < 9 {
            return Err(ConfigError::WorldTooShort(self.world_height));
        }
        if self.chunk_width == 0 {
            return Err(ConfigError::ZeroChunkWidth);
        }
        if self.target_tps == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.max_chunks_per_tick < 3 {
            return Err(ConfigError::BudgetTooSmall(self.max_chunks_per_tick));
        }
        Ok(())
    }

    /// World height in pixels.
    #[inline]
    #[must_use]
    pub fn world_pixel_height(&self) -> f64 {
        f64::from(self.world_height) * f64::from(self.tile_size)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world_seed: Self::DEFAULT_WORLD_SEED,
            tile_size: 32,
            world_height: 18,
            chunk_width: 16,
            move_speed: 3.0,
            gravity_per_tick: 0.6,
            max_fall_speed: 12.0,
            jump_velocity: -10.0,
            viewport_width: 800,
            viewport_height: 576,
            target_tps: 60,
            max_chunks_per_tick: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        config.validate().expect("defaults must validate");
        assert_eq!(config.tile_size, 32);
        assert_eq!(config.world_height, 18);
        assert_eq!(config.chunk_width, 16);
        assert_eq!(config.target_tps, 60);
    }

    #[test]
    fn test_toml_overrides_subset() {
        let config = SessionConfig::from_toml_str(
            r#"
            world_seed = 42
            move_speed = 4.5
            "#,
        )
        .expect("valid override");
        assert_eq!(config.world_seed, 42);
        assert!((config.move_speed - 4.5).abs() < f64::EPSILON);
        // Untouched fields keep their defaults.
        assert_eq!(config.world_height, 18);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = SessionConfig::from_toml_str("gravity = 9.81");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_fall_speed_tile_size_safety() {
        let result = SessionConfig::from_toml_str("max_fall_speed = 32.0");
        assert!(matches!(
            result,
            Err(ConfigError::UnsafeFallSpeed { tile_size: 32, .. })
        ));
    }

    #[test]
    fn test_short_world_rejected() {
        let result = SessionConfig::from_toml_str("world_height = 8");
        assert!(matches!(result, Err(ConfigError::WorldTooShort(8))));
    }

    #[test]
    fn test_tiny_budget_rejected() {
        let result = SessionConfig::from_toml_str("max_chunks_per_tick = 2");
        assert!(matches!(result, Err(ConfigError::BudgetTooSmall(2))));
    }
}
