//! Ship weapon: cooldown, projectile cap, multi-shot spread and kill scoring

use super::entity::{self, EntityId};
use super::geometry::try_normalize;
use super::state::{GameState, World};
use crate::error::SimError;
use crate::heading_to_direction;
use crate::tuning::Tuning;

/// Maximum live projectiles for the current weapon mode
pub fn projectile_cap(state: &GameState, tuning: &Tuning) -> usize {
    if state.multi_shot_active {
        tuning.max_projectiles_multi_shot
    } else {
        tuning.max_projectiles
    }
}

/// Whether a fire request would produce any shots right now
pub fn can_fire(world: &World) -> bool {
    world.state.fire_cooldown == 0 && world.projectiles.len() < projectile_cap(&world.state, &world.tuning)
}

/// Heading offsets (degrees) of the shots in one volley
pub fn volley_offsets(multi_shot: bool, spread: f32) -> Vec<f32> {
    if multi_shot {
        vec![-spread, 0.0, spread]
    } else {
        vec![0.0]
    }
}

/// Fire a volley from the ship if the weapon is ready.
///
/// Each projectile flies along its own heading at the muzzle speed, plus the
/// ship's velocity. Firing restarts the cooldown. Returns the new projectile
/// ids; empty when the cooldown is running or the cap is reached.
pub fn fire(world: &mut World) -> Result<Vec<EntityId>, SimError> {
    if !can_fire(world) {
        return Ok(Vec::new());
    }

    let muzzle_speed = world.tuning.projectile_speed * world.scale;
    let offsets = volley_offsets(world.state.multi_shot_active, world.tuning.multi_shot_spread);
    let mut fired = Vec::with_capacity(offsets.len());

    for offset in offsets {
        let heading = world.ship.heading + offset;
        let forward = heading_to_direction(heading) * world.tuning.projectile_speed;
        let velocity = try_normalize(forward, "projectile muzzle velocity")? * muzzle_speed + world.ship.velocity;

        let id = world.ids.next_id();
        world
            .projectiles
            .push(entity::new_projectile(id, world.ship.position, heading, velocity, world.scale));
        fired.push(id);
    }

    world.state.fire_cooldown = world.tuning.fire_cooldown_ticks;
    Ok(fired)
}

/// Count the cooldown down by one tick, stopping at zero
pub fn decrement_cooldown(state: &mut GameState) {
    state.fire_cooldown = state.fire_cooldown.saturating_sub(1);
}

/// Points for destroying an asteroid of `level`.
///
/// Halves with each level above 1 (bigger rocks pay out through their
/// fragments). Multi-shot kills pay a flat reduced amount.
pub fn kill_score(level: u32, multi_shot: bool, tuning: &Tuning) -> u64 {
    if multi_shot {
        return tuning.multi_shot_kill_score;
    }
    tuning
        .base_kill_score
        .checked_shr(level.saturating_sub(1))
        .unwrap_or(0)
}
