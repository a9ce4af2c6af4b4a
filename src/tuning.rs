//! Data-driven game balance
//!
//! Every constant the simulation formulas use lives here instead of being
//! hard-coded. Stored as JSON; missing keys fall back to the defaults so a
//! file can override only the values it cares about.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ASTEROID_IMPULSES, MAX_ASTEROID_LEVEL};
use crate::error::TuningError;
use crate::sim::cheat::Key;

/// Score tier for choosing the level of a spawned asteroid.
///
/// When the score is above `min_score`, the level is
/// `1 + floor(offset + r * spread)` with `r` uniform in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelTier {
    pub min_score: u64,
    pub offset: f32,
    pub spread: f32,
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ship ===
    /// Degrees turned per tick while a turn key is held
    pub ship_turn_rate: f32,
    /// Velocity gained per tick of thrust (before resolution scale)
    pub ship_thrust: f32,
    /// Safe zone radius as a fraction of the play area height
    pub safe_zone_height_fraction: f32,

    // === Asteroids ===
    /// Velocity gained per launch impulse
    pub asteroid_thrust: f32,
    /// Minimum launch impulses; the actual count adds [0, asteroid_impulse_range)
    pub asteroid_min_impulses: u32,
    pub asteroid_impulse_range: u32,
    /// Vertex radius contributed by each level
    pub asteroid_radius_per_level: f32,
    /// Extra random vertex radius in [0, jitter)
    pub asteroid_radius_jitter: f32,
    /// Each vertex coordinate is offset by up to ± this amount
    pub asteroid_vertex_jitter: f32,
    /// Spin is drawn from (-max, max] degrees per tick
    pub asteroid_max_spin: f32,

    // === Spawner ===
    /// Spawn probability per tick at score 0
    pub spawn_base_rate: f32,
    /// Upper bound on the score-driven spawn rate multiplier
    pub spawn_rate_cap: f32,
    /// Score that adds 1.0 to the spawn and speed multipliers
    pub score_divisor: f32,
    /// Spawn positions are drawn from the left/upper part of the play area
    pub spawn_x_fraction: f32,
    pub spawn_y_fraction: f32,
    /// Score factor on spawned asteroid speed while multi-shot is active
    pub multi_shot_speed_factor: f32,
    /// Upper bound on the spawned asteroid speed multiplier
    pub speed_multiplier_cap: f32,
    /// Level tiers, checked highest `min_score` first
    pub level_tiers: Vec<LevelTier>,

    // === Splitter ===
    /// Children appear within ± this offset of the parent on each axis
    pub split_jitter: f32,

    // === Weapon ===
    pub fire_cooldown_ticks: u32,
    pub max_projectiles: usize,
    pub max_projectiles_multi_shot: usize,
    /// Muzzle speed added on top of the ship velocity (before resolution scale)
    pub projectile_speed: f32,
    /// Angle between the center shot and each side shot, in degrees
    pub multi_shot_spread: f32,
    /// Points for a level 1 kill; halves with each level above
    pub base_kill_score: u64,
    /// Flat points per kill while multi-shot is active
    pub multi_shot_kill_score: u64,

    // === Cheat ===
    pub cheat_sequence: Vec<Key>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_turn_rate: 4.5,
            ship_thrust: 0.07,
            safe_zone_height_fraction: 0.25,

            asteroid_thrust: 0.06,
            asteroid_min_impulses: 4,
            asteroid_impulse_range: 10,
            asteroid_radius_per_level: 15.0,
            asteroid_radius_jitter: 15.0,
            asteroid_vertex_jitter: 7.5,
            asteroid_max_spin: 0.5,

            // 50% chance per second at 60 Hz
            spawn_base_rate: 0.5 / 60.0,
            spawn_rate_cap: 2.0,
            score_divisor: 10_000.0,
            spawn_x_fraction: 1.0 / 3.0,
            spawn_y_fraction: 1.0 / 3.0,
            multi_shot_speed_factor: 5.0,
            speed_multiplier_cap: 10.0,
            level_tiers: vec![
                LevelTier {
                    min_score: 15_000,
                    offset: 0.5,
                    spread: 2.0,
                },
                LevelTier {
                    min_score: 5_000,
                    offset: 0.0,
                    spread: 2.5,
                },
                LevelTier {
                    min_score: 1_000,
                    offset: 0.0,
                    spread: 2.0,
                },
            ],

            split_jitter: 15.0,

            fire_cooldown_ticks: 30,
            max_projectiles: 3,
            max_projectiles_multi_shot: 9,
            projectile_speed: 3.0,
            multi_shot_spread: 15.0,
            base_kill_score: 100,
            multi_shot_kill_score: 10,

            cheat_sequence: Key::DEFAULT_SEQUENCE.to_vec(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter file)
    pub fn to_json_string(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }
        let in_unit = |v: f32| v > 0.0 && v <= 1.0;

        if !(self.projectile_speed > 0.0) {
            return invalid("projectile_speed", "must be positive");
        }
        if self.max_projectiles == 0 {
            return invalid("max_projectiles", "must be at least 1");
        }
        if self.max_projectiles_multi_shot == 0 {
            return invalid("max_projectiles_multi_shot", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.spawn_base_rate) {
            return invalid("spawn_base_rate", "must be a probability in [0, 1]");
        }
        if !(self.score_divisor > 0.0) {
            return invalid("score_divisor", "must be positive");
        }
        if !(self.speed_multiplier_cap >= 1.0) {
            return invalid("speed_multiplier_cap", "must be at least 1");
        }
        if !in_unit(self.spawn_x_fraction) {
            return invalid("spawn_x_fraction", "must be in (0, 1]");
        }
        if !in_unit(self.spawn_y_fraction) {
            return invalid("spawn_y_fraction", "must be in (0, 1]");
        }
        if !in_unit(self.safe_zone_height_fraction) {
            return invalid("safe_zone_height_fraction", "must be in (0, 1]");
        }
        if self.level_tiers.iter().any(|t| !(t.offset >= 0.0 && t.spread >= 0.0)) {
            return invalid("level_tiers", "offset and spread must be non-negative");
        }
        // Highest reachable level is 1 + floor(offset + spread)
        if self
            .level_tiers
            .iter()
            .any(|t| !(t.offset + t.spread < MAX_ASTEROID_LEVEL as f32))
        {
            return invalid("level_tiers", "offset + spread exceeds the maximum asteroid level");
        }
        let max_impulses = self
            .asteroid_min_impulses
            .checked_add(self.asteroid_impulse_range);
        if max_impulses.is_none_or(|n| n > MAX_ASTEROID_IMPULSES) {
            return invalid(
                "asteroid_impulse_range",
                "min impulses + range exceeds the impulse limit",
            );
        }
        if self.cheat_sequence.is_empty() {
            return invalid("cheat_sequence", "must not be empty");
        }
        Ok(())
    }
}
