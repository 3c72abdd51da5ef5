//! Gun Game - a fixed-tick arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, power-ups, player lives)
//! - `highscores`: Top 10 leaderboard collaborator
//! - `settings`: Run configuration (seed, playfield size)
//! - `web`: Browser bindings (wasm32 only)

pub mod highscores;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{HighScores, LeaderboardEntry};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation period in milliseconds
    pub const TICK_MS: u64 = 30;

    /// Player sits at the playfield center with this hit radius
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const STARTING_LIVES: u8 = 3;
    /// Hidden, hit-ignoring window before a life is taken
    pub const RESPAWN_DELAY_MS: u64 = 2000;
    /// Visible-but-immune window after respawn
    pub const RESPAWN_IMMUNITY_MS: u64 = 5000;

    /// Blink animation: start interval, decay per toggle, floor
    pub const BLINK_START_INTERVAL_MS: f32 = 500.0;
    pub const BLINK_DECAY: f32 = 0.88;
    pub const BLINK_MIN_INTERVAL_MS: f32 = 100.0;

    /// Weapon
    pub const PROJECTILE_SPEED: f32 = 8.0;
    pub const PROJECTILE_SIZE: f32 = 6.0;
    pub const MAX_SHOTS: u8 = 5;
    pub const FIRE_RATE_MS: u64 = 1500;
    pub const SHOTGUN_SPREAD: [f32; 5] = [-0.3, -0.15, 0.0, 0.15, 0.3];

    /// Spawning
    pub const CIRCLES_PER_LEVEL: usize = 5;
    pub const SPAWN_ATTEMPTS: u32 = 50;
    /// Extra clearance between a freshly spawned circle and the player
    pub const SPAWN_CLEARANCE: f32 = 50.0;
    pub const LEVEL_SPAWN_DELAY_MS: u64 = 1000;
    pub const SPLIT_OFFSET: f32 = 15.0;
    pub const SPLIT_JITTER: f32 = 0.5;
    pub const SPLIT_MIN_SPEED: f32 = 2.0;
    pub const SPLIT_MAX_SPEED: f32 = 3.0;
    pub const SPECIAL_CHANCE: f64 = 0.05;
    pub const SPECIAL_DURATION_MS: u64 = 5000;

    /// Power-ups
    pub const POWERUP_RADIUS: f32 = 15.0;
    pub const POWERUP_LIFETIME_MS: u64 = 10_000;
    pub const SHOTGUN_DURATION_MS: u64 = 10_000;
    pub const BOUNCE_DURATION_MS: u64 = 10_000;
    pub const INVINCIBILITY_DURATION_MS: u64 = 30_000;
    pub const POINTS_BONUS: u64 = 100;
    pub const NUKE_BONUS: u64 = 250;
    pub const LEVEL_CLEAR_BONUS: u64 = 25;
    pub const MESSAGE_DURATION_MS: u64 = 2500;

    /// Elapsed-time display refresh
    pub const CLOCK_INTERVAL_MS: u64 = 1000;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit-speed direction scaled to `speed` along `angle` (radians, screen space)
#[inline]
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

/// Format whole seconds as `m:ss`
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
