//! Entities: one struct for everything that lives on the play field
//!
//! Behavior differences between ships, asteroids, projectiles and stars are
//! expressed through [`EntityKind`] and dispatched by free functions in the
//! movement and collision modules.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{self, Aabb, Shape};
use crate::error::SimError;
use crate::tuning::Tuning;
use crate::{heading_to_direction, normalize_degrees};

/// Stable entity identifier, unique within a game session
pub type EntityId = u32;

/// What an entity is, plus the data only that kind carries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Ship {
        /// Spawn exclusion radius around the ship
        safe_zone_radius: f32,
        killed: bool,
    },
    Asteroid {
        level: u32,
        /// Degrees per tick
        rotational_speed: f32,
    },
    Projectile,
    Star,
}

/// Kind tag without payload, reported to the host in tick diffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindTag {
    Ship,
    Asteroid,
    Projectile,
    Star,
}

/// A moving (or decorative) object on the play field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees, 0 = +x, clockwise on screen
    pub heading: f32,
    pub shape: Shape,
    pub kind: EntityKind,
}

impl Entity {
    pub fn tag(&self) -> KindTag {
        match self.kind {
            EntityKind::Ship { .. } => KindTag::Ship,
            EntityKind::Asteroid { .. } => KindTag::Asteroid,
            EntityKind::Projectile => KindTag::Projectile,
            EntityKind::Star => KindTag::Star,
        }
    }

    /// Asteroid level, `None` for other kinds
    pub fn level(&self) -> Option<u32> {
        match self.kind {
            EntityKind::Asteroid { level, .. } => Some(level),
            _ => None,
        }
    }

    /// Shape vertices in world space
    pub fn world_polygon(&self) -> Vec<Vec2> {
        self.shape.to_world(self.position, self.heading)
    }

    /// World-space bounding box
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.world_polygon())
    }

    pub fn turn(&mut self, degrees: f32) {
        self.heading = normalize_degrees(self.heading + degrees);
    }

    /// Add `amount` of velocity along the current heading
    pub fn accelerate(&mut self, amount: f32) {
        self.velocity += heading_to_direction(self.heading) * amount;
    }

    pub fn is_killed(&self) -> bool {
        matches!(self.kind, EntityKind::Ship { killed: true, .. })
    }
}

/// Player ship at rest
pub fn new_ship(id: EntityId, position: Vec2, heading: f32, safe_zone_radius: f32, scale: f32) -> Entity {
    Entity {
        id,
        position,
        velocity: Vec2::ZERO,
        heading: normalize_degrees(heading),
        shape: geometry::ship_shape(scale),
        kind: EntityKind::Ship {
            safe_zone_radius,
            killed: false,
        },
    }
}

/// Asteroid of the given level with randomized shape, heading, speed and spin.
///
/// `velocity_multiplier` is divided by `sqrt(level)` so smaller rocks move faster.
pub fn new_asteroid(
    id: EntityId,
    position: Vec2,
    level: u32,
    velocity_multiplier: f32,
    tuning: &Tuning,
    scale: f32,
    rng: &mut impl Rng,
) -> Result<Entity, SimError> {
    let shape = geometry::asteroid_shape(
        level,
        tuning.asteroid_radius_per_level,
        tuning.asteroid_radius_jitter,
        tuning.asteroid_vertex_jitter,
        scale,
        rng,
    )?;

    let heading = rng.random_range(0..360) as f32;
    let extra_impulses = if tuning.asteroid_impulse_range > 0 {
        rng.random_range(0..tuning.asteroid_impulse_range)
    } else {
        0
    };
    let impulses = tuning.asteroid_min_impulses.saturating_add(extra_impulses);
    let speed = impulses as f32 * tuning.asteroid_thrust * scale;
    let velocity = heading_to_direction(heading) * speed * velocity_multiplier / (level as f32).sqrt();
    // (-max, max]
    let rotational_speed = tuning.asteroid_max_spin - rng.random::<f32>() * 2.0 * tuning.asteroid_max_spin;

    Ok(Entity {
        id,
        position,
        velocity,
        heading,
        shape,
        kind: EntityKind::Asteroid {
            level,
            rotational_speed,
        },
    })
}

/// Projectile leaving `origin` along `heading`
pub fn new_projectile(id: EntityId, origin: Vec2, heading: f32, velocity: Vec2, scale: f32) -> Entity {
    Entity {
        id,
        position: origin,
        velocity,
        heading: normalize_degrees(heading),
        shape: geometry::projectile_shape(scale),
        kind: EntityKind::Projectile,
    }
}

/// Background star at a random orientation
pub fn new_star(id: EntityId, position: Vec2, scale: f32, rng: &mut impl Rng) -> Entity {
    Entity {
        id,
        position,
        velocity: Vec2::ZERO,
        heading: rng.random_range(0..360) as f32,
        shape: geometry::star_shape(scale),
        kind: EntityKind::Star,
    }
}
