/// Game tunables.  Everything is measured in logical pixels on a fixed
/// 800×600 play field; the renderer projects that field onto whatever
/// terminal grid is available.

use std::time::Duration;

// ── Play field ────────────────────────────────────────────────────────────────

pub const WIDTH: i32 = 800;
pub const HEIGHT: i32 = 600;

/// Simulation rate of the Playing state.
pub const FPS: u32 = 45;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: (i32, i32) = (64, 64);
pub const PLAYER_SPEED: i32 = 5;

/// Gap between the bottom of the field and the player / stowed rocket.
pub const BOTTOM_MARGIN: i32 = 10;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_SIZE: (i32, i32) = (64, 64);
pub const ENEMY_SPEED_X: i32 = 4;
/// Drop applied every time an enemy bounces off a side wall.
pub const ENEMY_STEP_Y: i32 = 40;
/// Vertical band (inclusive) where enemies spawn and respawn.
pub const SPAWN_BAND: (i32, i32) = (50, 150);
/// Live enemies per session.  Every kill is replaced one-for-one.
pub const ENEMY_POOL: usize = 6;

// ── Rocket ────────────────────────────────────────────────────────────────────

pub const ROCKET_SIZE: (i32, i32) = (32, 32);
pub const ROCKET_SPEED_Y: i32 = -10;

// ── Explosion (menu decoration) ───────────────────────────────────────────────

pub const EXPLOSION_SIZE: (i32, i32) = (64, 64);
pub const EXPLOSION_FRAMES: usize = 12;
pub const EXPLOSION_FRAME_TIME: Duration = Duration::from_millis(150);
pub const EXPLOSION_CENTER: (i32, i32) = (WIDTH / 2, 400);

// ── Screens ───────────────────────────────────────────────────────────────────

/// Wall-clock hold on the "GAME OVER" overlay before returning to the menu.
pub const GAME_OVER_PAUSE: Duration = Duration::from_millis(3000);

pub fn frame_time() -> Duration {
    Duration::from_secs(1) / FPS
}
