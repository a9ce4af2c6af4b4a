//! Asteroid Drift - a wrap-around arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawning, game state)
//! - `tuning`: Data-driven game balance
//! - `highscores`: In-memory top 10 leaderboard handed to the host at game over
//! - `error`: Error types shared by the simulation and tuning loader

pub mod error;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::{SimError, TuningError};
pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Screen height all base sizes and speeds are authored against
    pub const REFERENCE_HEIGHT: f32 = 600.0;
    /// Default play area, used by the headless runner and tests
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Number of decorative stars seeded per game
    pub const STAR_COUNT: usize = 49;
    /// Asteroids present when a game starts
    pub const INITIAL_ASTEROIDS: usize = 5;
    pub const INITIAL_ASTEROID_LEVEL: u32 = 2;
    /// Largest level a spawned asteroid can have
    pub const MAX_ASTEROID_LEVEL: u32 = 8;
    /// Upper bound on launch impulses per asteroid
    pub const MAX_ASTEROID_IMPULSES: u32 = 1_000;

    /// Ship heading at game start (degrees, screen space with y down)
    pub const SHIP_START_HEADING: f32 = 225.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector pointing along a heading given in degrees
#[inline]
pub fn heading_to_direction(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Rotate a local-space point by a heading in degrees
#[inline]
pub fn rotate_degrees(point: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(point)
}
