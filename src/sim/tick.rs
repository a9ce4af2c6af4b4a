//! Fixed timestep simulation tick
//!
//! Runs the per-frame pipeline in a fixed order and reports what changed so
//! the host can render and play sounds without touching the world itself.

use serde::{Deserialize, Serialize};

use super::collision::collide;
use super::entity::{Entity, EntityId, EntityKind, KindTag};
use super::movement::{advance, is_out_of_bounds};
use super::spawner::{maybe_spawn, split};
use super::state::{GameEvent, GamePhase, World};
use super::weapon::{decrement_cooldown, fire, kill_score};
use crate::error::SimError;

/// Held input state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    pub fire: bool,
}

/// What one tick changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickDiff {
    /// Index of the tick that produced this diff
    pub tick: u64,
    pub added: Vec<(EntityId, KindTag)>,
    pub removed: Vec<EntityId>,
    pub score_delta: u64,
    pub game_over: bool,
    pub events: Vec<GameEvent>,
}

/// Advance the world by one fixed timestep.
///
/// Order: input, cooldown, spawn, movement, projectile hits, bounds cleanup,
/// ship hits. Spawning before movement and collision means a new asteroid is
/// only ever tested at positions it reached by moving, after its spawn point
/// was checked against the safe zone.
///
/// Paused or finished games are left untouched.
pub fn tick(world: &mut World, input: &TickInput) -> Result<TickDiff, SimError> {
    if world.state.paused || world.phase == GamePhase::GameOver {
        return Ok(TickDiff {
            tick: world.time_ticks,
            game_over: world.phase == GamePhase::GameOver,
            ..Default::default()
        });
    }

    world.time_ticks += 1;
    let mut diff = TickDiff {
        tick: world.time_ticks,
        ..Default::default()
    };

    // 1. Held input
    let turn_rate = world.tuning.ship_turn_rate;
    if input.turn_left {
        world.ship.turn(-turn_rate);
    }
    if input.turn_right {
        world.ship.turn(turn_rate);
    }
    if input.thrust {
        world.ship.accelerate(world.tuning.ship_thrust * world.scale);
    }
    if input.fire {
        let fired = fire(world)?;
        if !fired.is_empty() {
            diff.events.push(GameEvent::Fired {
                count: fired.len(),
                multi_shot: world.state.multi_shot_active,
            });
            diff.added
                .extend(fired.into_iter().map(|id| (id, KindTag::Projectile)));
        }
    }

    // 2. Cooldown
    decrement_cooldown(&mut world.state);

    // 3. Spawn
    if let Some(id) = maybe_spawn(world)? {
        diff.added.push((id, KindTag::Asteroid));
    }

    // 4. Movement
    let (width, height) = (world.width, world.height);
    advance(&mut world.ship, width, height);
    for asteroid in &mut world.asteroids {
        advance(asteroid, width, height);
    }
    for projectile in &mut world.projectiles {
        advance(projectile, width, height);
    }

    // 5. Projectiles vs asteroids
    let fragments = resolve_projectile_hits(world, &mut diff)?;

    // 6. Projectiles that left the screen
    world.projectiles.retain(|p| {
        let gone = is_out_of_bounds(p, width, height);
        if gone {
            diff.removed.push(p.id);
        }
        !gone
    });

    // 7. Ship vs asteroids. Fragments join afterwards and are first tested
    // next tick, once they have moved.
    if world.asteroids.iter().any(|a| collide(&world.ship, a)) {
        end_game(world, &mut diff);
    }

    diff.added
        .extend(fragments.iter().map(|f| (f.id, KindTag::Asteroid)));
    world.asteroids.extend(fragments);
    world.normalize_order();

    Ok(diff)
}

/// Remove every asteroid hit by a projectile, award points and return the
/// fragments to add.
///
/// An asteroid is destroyed (and scored) once no matter how many projectiles
/// overlap it; all of those projectiles are consumed. A projectile is
/// consumed by the first asteroid it hits.
fn resolve_projectile_hits(world: &mut World, diff: &mut TickDiff) -> Result<Vec<Entity>, SimError> {
    let mut consumed = vec![false; world.projectiles.len()];
    let mut destroyed = vec![false; world.asteroids.len()];

    for (ai, asteroid) in world.asteroids.iter().enumerate() {
        for (pi, projectile) in world.projectiles.iter().enumerate() {
            if !consumed[pi] && collide(projectile, asteroid) {
                consumed[pi] = true;
                destroyed[ai] = true;
            }
        }
    }

    let mut fragments = Vec::new();
    let multi_shot = world.state.multi_shot_active;
    for (ai, asteroid) in world.asteroids.iter().enumerate() {
        if !destroyed[ai] {
            continue;
        }
        let EntityKind::Asteroid { level, .. } = asteroid.kind else {
            continue;
        };

        let points = kill_score(level, multi_shot, &world.tuning);
        world.state.score = world.state.score.saturating_add(points);
        diff.score_delta = diff.score_delta.saturating_add(points);
        diff.removed.push(asteroid.id);
        diff.events.push(GameEvent::AsteroidDestroyed {
            id: asteroid.id,
            level,
        });

        fragments.extend(split(
            asteroid,
            &world.tuning,
            world.scale,
            &mut world.rng,
            &mut world.ids,
        )?);
    }

    let mut index = 0;
    world.asteroids.retain(|_| {
        let keep = !destroyed[index];
        index += 1;
        keep
    });

    let mut index = 0;
    world.projectiles.retain(|p| {
        let keep = !consumed[index];
        if !keep {
            diff.removed.push(p.id);
        }
        index += 1;
        keep
    });

    Ok(fragments)
}

fn end_game(world: &mut World, diff: &mut TickDiff) {
    if let EntityKind::Ship { killed, .. } = &mut world.ship.kind {
        *killed = true;
    }
    world.phase = GamePhase::GameOver;
    // Multi-shot does not survive death
    world.state.multi_shot_active = false;
    diff.game_over = true;
    diff.events.push(GameEvent::ShipDestroyed);
    log::info!(
        "Ship destroyed at tick {} with score {}",
        world.time_ticks,
        world.state.score
    );
}
