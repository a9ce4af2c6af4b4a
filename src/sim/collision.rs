//! Collision detection between entity shapes
//!
//! Hits are decided by exact polygon intersection in world space. Asteroid
//! outlines are irregular and may be concave, so a bounding circle would
//! report hits on near misses around the vertices.

use glam::Vec2;

use super::entity::{Entity, EntityKind};
use super::geometry::{circle_overlaps_polygon, polygons_overlap};

/// Whether two entities' shapes overlap. Stars never collide.
///
/// Symmetric: `collide(a, b) == collide(b, a)`.
pub fn collide(a: &Entity, b: &Entity) -> bool {
    if matches!(a.kind, EntityKind::Star) || matches!(b.kind, EntityKind::Star) {
        return false;
    }
    polygons_overlap(&a.world_polygon(), &b.world_polygon())
}

/// Center of the ship's safe zone.
///
/// The zone leads the ship by one tick of velocity so a fast ship does not
/// fly into a rock that spawned just outside it.
pub fn safe_zone_center(ship: &Entity) -> Vec2 {
    ship.position + ship.velocity
}

/// Whether `other` intrudes on the ship's safe zone.
///
/// Returns false when `ship` is not a ship.
pub fn in_safe_zone(ship: &Entity, other: &Entity) -> bool {
    let EntityKind::Ship {
        safe_zone_radius, ..
    } = ship.kind
    else {
        return false;
    };
    circle_overlaps_polygon(safe_zone_center(ship), safe_zone_radius, &other.world_polygon())
}
