//! Per-tick movement and toroidal wraparound

use glam::Vec2;

use super::entity::{Entity, EntityKind};
use crate::normalize_degrees;

/// Advance an entity by one tick.
///
/// Ships and asteroids wrap around the play area, projectiles fly straight
/// (bounds removal happens in the tick), stars never move.
pub fn advance(entity: &mut Entity, width: f32, height: f32) {
    match entity.kind {
        EntityKind::Star => {}
        EntityKind::Projectile => {
            entity.position += entity.velocity;
        }
        EntityKind::Ship { .. } => {
            entity.position += entity.velocity;
            wrap(entity, width, height);
        }
        EntityKind::Asteroid {
            rotational_speed, ..
        } => {
            entity.position += entity.velocity;
            wrap(entity, width, height);
            entity.heading = normalize_degrees(entity.heading + rotational_speed);
        }
    }
}

/// Teleport an entity that has completely left the play area to the opposite side.
///
/// Only applies while the entity is still moving outward. A freshly wrapped
/// entity straddles the opposite boundary, and without the direction check it
/// would be sent straight back on the next tick.
///
/// The shift is `dimension + extent`, so the leading edge re-enters by exactly
/// the distance the trailing edge had overshot.
pub fn wrap(entity: &mut Entity, width: f32, height: f32) {
    let bounds = entity.bounds();
    let extent = bounds.size();
    let mut shift = Vec2::ZERO;

    if bounds.max.x < 0.0 && entity.velocity.x < 0.0 {
        shift.x = width + extent.x;
    } else if bounds.min.x > width && entity.velocity.x > 0.0 {
        shift.x = -(width + extent.x);
    }

    if bounds.max.y < 0.0 && entity.velocity.y < 0.0 {
        shift.y = height + extent.y;
    } else if bounds.min.y > height && entity.velocity.y > 0.0 {
        shift.y = -(height + extent.y);
    }

    if shift != Vec2::ZERO {
        entity.position += shift;
    }
}

/// True once a projectile's origin has left the play rectangle
pub fn is_out_of_bounds(entity: &Entity, width: f32, height: f32) -> bool {
    let p = entity.position;
    p.x < 0.0 || p.x > width || p.y < 0.0 || p.y > height
}
