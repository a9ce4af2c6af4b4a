//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod cheat;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod movement;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapon;

pub use cheat::Key;
pub use collision::{collide, in_safe_zone, safe_zone_center};
pub use entity::{Entity, EntityId, EntityKind, KindTag};
pub use geometry::{Aabb, Shape, circle_overlaps_polygon, point_in_polygon, polygons_overlap, segments_intersect};
pub use movement::{advance, is_out_of_bounds, wrap};
pub use spawner::{maybe_spawn, split};
pub use state::{GameEvent, GamePhase, GameState, World};
pub use tick::{TickDiff, TickInput, tick};
pub use weapon::{fire, kill_score};
