//! # STRATA Physics
//!
//! Kinematic player body with tile collision.
//!
//! Features:
//! - Gravity with terminal fall speed
//! - AABB collision against the tile grid
//! - Ground detection and grounded-only jumping
//!
//! ## Collision Model
//!
//! Axes are resolved sequentially: the horizontal move completes (including
//! its snap) before the vertical move starts. Within an axis, the AABB's
//! leading edge picks one tile line, which is scanned in a fixed order
//! (rows top to bottom, columns left to right); the first solid tile wins
//! and stops the scan. This ordering is part of the simulation's observable
//! behavior, corner cases included, and must not be reordered.

use strata_core::SessionConfig;
use strata_procedural::WorldField;

/// Player hitbox width (pixels).
pub const PLAYER_WIDTH: f64 = 24.0;
/// Player hitbox height (pixels).
pub const PLAYER_HEIGHT: f64 = 48.0;

/// Movement intents for one tick, sampled from the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Move left. Checked before `right`: both pressed yields left.
    pub left: bool,
    /// Move right.
    pub right: bool,
    /// Jump. Only honored while on the ground; no buffering.
    pub jump: bool,
}

/// The player body. Position is the AABB's top-left corner in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// Left edge (pixels).
    pub x: f64,
    /// Top edge (pixels).
    pub y: f64,
    /// Horizontal velocity (pixels per tick).
    pub vx: f64,
    /// Vertical velocity (pixels per tick, positive = down).
    pub vy: f64,
    /// True while the last downward collision pass hit ground.
    pub on_ground: bool,
}

impl Player {
    /// Creates a stationary, airborne player at the given position.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            on_ground: false,
        }
    }

    /// Spawns a player standing on the surface of the column at tile-x 0.
    #[must_use]
    pub fn spawn(world: &WorldField, config: &SessionConfig) -> Self {
        let ts = f64::from(config.tile_size);
        let surf = world.surface_height(0);
        // Centered on tile 0, feet on the surface row.
        let x = (ts - PLAYER_WIDTH) / 2.0;
        let y = f64::from(surf).mul_add(ts, -PLAYER_HEIGHT);
        Self::at(x, y)
    }

    /// Horizontal center (pixels), for camera derivation.
    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + PLAYER_WIDTH / 2.0
    }

    /// Vertical center (pixels), for camera derivation.
    #[inline]
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + PLAYER_HEIGHT / 2.0
    }
}

/// Tile index containing pixel coordinate `p`.
#[inline]
fn tile_coord(p: f64, tile_size: f64) -> i64 {
    (p / tile_size).floor() as i64
}

/// Whether the tile at `(tx, row)` obstructs movement. Rows beyond the
/// i32 range are far outside the world and therefore air.
fn is_solid(world: &mut WorldField, tx: i64, row: i64) -> bool {
    i32::try_from(row).is_ok_and(|ty| world.block(tx, ty).is_solid())
}

/// Advances the player by one tick: intents, gravity, then horizontal and
/// vertical movement with collision.
pub fn step(
    player: &mut Player,
    input: InputState,
    world: &mut WorldField,
    config: &SessionConfig,
) {
    let ts = f64::from(config.tile_size);

    // Horizontal intent. Left is checked first by contract.
    if input.left {
        player.vx = -config.move_speed;
    } else if input.right {
        player.vx = config.move_speed;
    } else {
        player.vx = 0.0;
    }

    // Jump, gated on ground contact. No buffering, no double-jump.
    if input.jump && player.on_ground {
        player.vy = config.jump_velocity;
        player.on_ground = false;
    }

    // Gravity is unconditional; the vertical pass corrects it on ground.
    player.vy += config.gravity_per_tick;
    if player.vy > config.max_fall_speed {
        player.vy = config.max_fall_speed;
    }

    // Horizontal move, then resolve against the leading edge.
    player.x += player.vx;
    let top = tile_coord(player.y, ts);
    let bottom = tile_coord(player.y + PLAYER_HEIGHT - 1.0, ts);
    if player.vx > 0.0 {
        let lead = tile_coord(player.x + PLAYER_WIDTH - 1.0, ts);
        for row in top..=bottom {
            if is_solid(world, lead, row) {
                player.x = (lead as f64).mul_add(ts, -PLAYER_WIDTH);
                player.vx = 0.0;
                break;
            }
        }
    } else if player.vx < 0.0 {
        let lead = tile_coord(player.x, ts);
        for row in top..=bottom {
            if is_solid(world, lead, row) {
                player.x = (lead + 1) as f64 * ts;
                player.vx = 0.0;
                break;
            }
        }
    }

    // Vertical move, resolved symmetrically. Ground contact must be proven
    // again every tick.
    player.y += player.vy;
    player.on_ground = false;
    let left = tile_coord(player.x, ts);
    let right = tile_coord(player.x + PLAYER_WIDTH - 1.0, ts);
    if player.vy > 0.0 {
        let lead = tile_coord(player.y + PLAYER_HEIGHT - 1.0, ts);
        for tx in left..=right {
            if is_solid(world, tx, lead) {
                player.y = (lead as f64).mul_add(ts, -PLAYER_HEIGHT);
                player.vy = 0.0;
                player.on_ground = true;
                break;
            }
        }
    } else if player.vy < 0.0 {
        let lead = tile_coord(player.y, ts);
        for tx in left..=right {
            if is_solid(world, tx, lead) {
                player.y = (lead + 1) as f64 * ts;
                player.vy = 0.0;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_procedural::BlockType;

    fn setup() -> (WorldField, SessionConfig) {
        let config = SessionConfig::default();
        let mut world = WorldField::new(&config);
        // Overwrite generated terrain with air so every test controls its
        // own tiles through the overlay.
        for tx in -4..16 {
            for ty in 0..18 {
                world.set_block(tx, ty, BlockType::Air);
            }
        }
        (world, config)
    }

    #[test]
    fn test_falling_player_snaps_onto_platform() {
        let (mut world, config) = setup();
        // Platform whose top surface is at pixel y = 256 (row 8).
        for tx in 2..=4 {
            world.set_block(tx, 8, BlockType::Stone);
        }

        let mut player = Player::at(100.0, 140.0);
        let input = InputState::default();

        for _ in 0..200 {
            step(&mut player, input, &mut world, &config);
            if player.on_ground {
                break;
            }
        }

        assert!(player.on_ground, "player never landed");
        assert!((player.y - (256.0 - PLAYER_HEIGHT)).abs() < f64::EPSILON);
        assert!((player.vy).abs() < f64::EPSILON);
    }

    /// Lands the player on whatever is below and returns once grounded.
    fn settle(player: &mut Player, world: &mut WorldField, config: &SessionConfig) {
        for _ in 0..200 {
            step(player, InputState::default(), world, config);
            if player.on_ground {
                return;
            }
        }
        panic!("player never landed");
    }

    #[test]
    fn test_player_stays_snapped_while_grounded() {
        let (mut world, config) = setup();
        for tx in 2..=4 {
            world.set_block(tx, 8, BlockType::Stone);
        }
        let mut player = Player::at(100.0, 140.0);
        settle(&mut player, &mut world, &config);

        // Gravity keeps being applied; the snap pulls the player back to
        // the resting position within at most two ticks, forever.
        let rest = 256.0 - PLAYER_HEIGHT;
        for _ in 0..20 {
            step(&mut player, InputState::default(), &mut world, &config);
            assert!(player.y >= rest && player.y < rest + 1.0, "y drifted: {}", player.y);
            if player.on_ground {
                assert!((player.y - rest).abs() < f64::EPSILON);
            }
        }
        assert!(player.on_ground || player.vy < 1.0, "ground contact lost");
    }

    #[test]
    fn test_airborne_jump_is_ignored() {
        let (mut world, config) = setup();
        let mut player = Player::at(100.0, 100.0);
        assert!(!player.on_ground);

        let input = InputState {
            jump: true,
            ..InputState::default()
        };
        step(&mut player, input, &mut world, &config);

        // Only gravity acted; the jump impulse never fired.
        assert!((player.vy - config.gravity_per_tick).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grounded_jump_fires() {
        let (mut world, config) = setup();
        for tx in 2..=4 {
            world.set_block(tx, 8, BlockType::Stone);
        }
        let mut player = Player::at(100.0, 140.0);
        settle(&mut player, &mut world, &config);

        let input = InputState {
            jump: true,
            ..InputState::default()
        };
        step(&mut player, input, &mut world, &config);
        assert!(!player.on_ground);
        assert!(
            (player.vy - (config.jump_velocity + config.gravity_per_tick)).abs() < f64::EPSILON
        );
    }

    #[test]
    fn test_simultaneous_press_yields_left() {
        let (mut world, config) = setup();
        let mut player = Player::at(100.0, 100.0);
        let input = InputState {
            left: true,
            right: true,
            jump: false,
        };
        step(&mut player, input, &mut world, &config);
        assert!((player.vx - (-config.move_speed)).abs() < f64::EPSILON);
        assert!((player.x - 97.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_terminal_velocity_clamp() {
        let (mut world, config) = setup();
        let mut player = Player::at(100.0, -2_000.0);

        for _ in 0..100 {
            step(&mut player, InputState::default(), &mut world, &config);
            assert!(player.vy <= config.max_fall_speed);
        }
        assert!((player.vy - config.max_fall_speed).abs() < f64::EPSILON);
    }

    #[test]
    fn test_horizontal_snap_moving_right() {
        let (mut world, config) = setup();
        // Wall at tile column 5, spanning the player's rows.
        for ty in 0..18 {
            world.set_block(5, ty, BlockType::Stone);
        }
        let mut player = Player::at(130.0, 100.0);
        let input = InputState {
            right: true,
            ..InputState::default()
        };

        for _ in 0..10 {
            step(&mut player, input, &mut world, &config);
        }

        // Snapped flush against the wall: 5 * 32 - 24.
        assert!((player.x - 136.0).abs() < f64::EPSILON);
        assert!((player.vx).abs() < f64::EPSILON);
    }

    #[test]
    fn test_horizontal_snap_moving_left() {
        let (mut world, config) = setup();
        for ty in 0..18 {
            world.set_block(1, ty, BlockType::Stone);
        }
        let mut player = Player::at(80.0, 100.0);
        let input = InputState {
            left: true,
            ..InputState::default()
        };

        for _ in 0..10 {
            step(&mut player, input, &mut world, &config);
        }

        // Snapped flush against the wall's right face: (1 + 1) * 32.
        assert!((player.x - 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rising_player_bumps_head() {
        let (mut world, config) = setup();
        // Floor at row 8, ceiling at row 5 (96 px gap fits the player).
        for tx in 2..=4 {
            world.set_block(tx, 8, BlockType::Stone);
            world.set_block(tx, 5, BlockType::Stone);
        }
        let mut player = Player::at(100.0, 230.0);
        settle(&mut player, &mut world, &config);

        let jump = InputState {
            jump: true,
            ..InputState::default()
        };
        step(&mut player, jump, &mut world, &config);
        let mut bumped = false;
        for _ in 0..20 {
            step(&mut player, InputState::default(), &mut world, &config);
            // Head snapped to the ceiling's underside: (5 + 1) * 32.
            if (player.y - 192.0).abs() < f64::EPSILON {
                bumped = true;
                break;
            }
        }
        assert!(bumped, "player never reached the ceiling");
    }
}
