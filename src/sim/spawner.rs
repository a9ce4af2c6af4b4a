//! Asteroid spawning and splitting
//!
//! Spawn rate, asteroid level and asteroid speed all scale with score.
//! Destroyed asteroids split into smaller ones with strictly lower levels, so
//! fragmentation always terminates.

use glam::Vec2;
use rand::Rng;

use super::collision::in_safe_zone;
use super::entity::{self, Entity, EntityId};
use super::state::{IdAllocator, World};
use crate::consts::MAX_ASTEROID_LEVEL;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Per-tick spawn probability for the given score, clamped to [0, 1]
pub fn spawn_chance(score: u64, tuning: &Tuning) -> f32 {
    let growth = 1.0 + score as f32 / tuning.score_divisor;
    (tuning.spawn_base_rate * growth.min(tuning.spawn_rate_cap)).clamp(0.0, 1.0)
}

/// Level for a newly spawned asteroid, from the highest tier the score clears.
///
/// Never exceeds `MAX_ASTEROID_LEVEL`, even for tiers that skipped validation.
pub fn choose_level(score: u64, tuning: &Tuning, rng: &mut impl Rng) -> u32 {
    let tier = tuning
        .level_tiers
        .iter()
        .filter(|t| score > t.min_score)
        .max_by_key(|t| t.min_score);

    match tier {
        Some(t) => {
            let extra = (t.offset + rng.random::<f32>() * t.spread).floor() as u32;
            extra.saturating_add(1).min(MAX_ASTEROID_LEVEL)
        }
        None => 1,
    }
}

/// Velocity multiplier for spawned asteroids. Multi-shot makes score count
/// for more, and the result is capped.
pub fn speed_multiplier(score: u64, multi_shot: bool, tuning: &Tuning) -> f32 {
    let factor = if multi_shot {
        tuning.multi_shot_speed_factor
    } else {
        1.0
    };
    (1.0 + score as f32 / tuning.score_divisor * factor).min(tuning.speed_multiplier_cap)
}

/// Roll for a spawn this tick.
///
/// Returns the new asteroid's id, or `None` when the roll failed or the
/// candidate landed in the ship's safe zone (it is dropped, and the next tick
/// rolls again).
pub fn maybe_spawn(world: &mut World) -> Result<Option<EntityId>, SimError> {
    let score = world.state.score;
    let chance = spawn_chance(score, &world.tuning);
    if world.rng.random::<f32>() >= chance {
        return Ok(None);
    }

    let position = Vec2::new(
        world.rng.random::<f32>() * world.width * world.tuning.spawn_x_fraction,
        world.rng.random::<f32>() * world.height * world.tuning.spawn_y_fraction,
    );
    let level = choose_level(score, &world.tuning, &mut world.rng);
    let multiplier = speed_multiplier(score, world.state.multi_shot_active, &world.tuning);

    let asteroid = entity::new_asteroid(
        world.ids.next_id(),
        position,
        level,
        multiplier,
        &world.tuning,
        world.scale,
        &mut world.rng,
    )?;

    if in_safe_zone(&world.ship, &asteroid) {
        log::trace!("Spawn at {:?} rejected by safe zone", position);
        return Ok(None);
    }

    let id = asteroid.id;
    log::debug!(
        "Spawned level {} asteroid {} at ({:.0}, {:.0}), speed x{:.2}",
        level,
        id,
        position.x,
        position.y,
        multiplier
    );
    world.asteroids.push(asteroid);
    Ok(Some(id))
}

/// Fragments of a destroyed asteroid.
///
/// Level 1 leaves nothing. Level `n` yields exactly `n` children: each of the
/// first `n / 2` has a `1/n` chance of being level `n - 1`, all others are
/// level 1. Children scatter around the parent with fresh random velocities.
pub fn split(
    parent: &Entity,
    tuning: &Tuning,
    scale: f32,
    rng: &mut impl Rng,
    ids: &mut IdAllocator,
) -> Result<Vec<Entity>, SimError> {
    let level = match parent.level() {
        Some(level) if level > 1 => level,
        _ => return Ok(Vec::new()),
    };

    let jitter = tuning.split_jitter;
    let mut children = Vec::with_capacity(level as usize);
    for i in 0..level {
        let child_level = if i < level / 2 && rng.random::<f32>() < 1.0 / level as f32 {
            level - 1
        } else {
            1
        };
        let offset = Vec2::new(
            rng.random::<f32>() * 2.0 * jitter - jitter,
            rng.random::<f32>() * 2.0 * jitter - jitter,
        );
        children.push(entity::new_asteroid(
            ids.next_id(),
            parent.position + offset,
            child_level,
            1.0,
            tuning,
            scale,
            rng,
        )?);
    }

    log::debug!(
        "Split level {} asteroid {} into levels {:?}",
        level,
        parent.id,
        children.iter().filter_map(Entity::level).collect::<Vec<_>>()
    );
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::tuning::LevelTier;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn asteroid(level: u32, rng: &mut Pcg32) -> Entity {
        entity::new_asteroid(99, Vec2::new(300.0, 300.0), level, 1.0, &Tuning::default(), 1.0, rng)
            .unwrap()
    }

    #[test]
    fn test_spawn_chance_scales_and_caps() {
        let tuning = Tuning::default();
        let base = spawn_chance(0, &tuning);
        assert!((base - 0.5 / 60.0).abs() < 1e-7);
        let mid = spawn_chance(5_000, &tuning);
        assert!((mid - base * 1.5).abs() < 1e-6);
        let capped = spawn_chance(1_000_000, &tuning);
        assert!((capped - base * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_choose_level_tiers() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..200 {
            assert_eq!(choose_level(0, &tuning, &mut rng), 1);
            assert_eq!(choose_level(1_000, &tuning, &mut rng), 1);
            let low = choose_level(1_001, &tuning, &mut rng);
            assert!((1..=2).contains(&low));
            let mid = choose_level(6_000, &tuning, &mut rng);
            assert!((1..=3).contains(&mid));
            let high = choose_level(20_000, &tuning, &mut rng);
            assert!((1..=3).contains(&high));
        }
    }

    #[test]
    fn test_choose_level_ignores_tier_order() {
        let mut tuning = Tuning::default();
        tuning.level_tiers = vec![
            LevelTier {
                min_score: 0,
                offset: 0.0,
                spread: 0.0,
            },
            LevelTier {
                min_score: 100,
                offset: 3.0,
                spread: 0.0,
            },
        ];
        let mut rng = Pcg32::seed_from_u64(4);
        assert_eq!(choose_level(500, &tuning, &mut rng), 4);
        assert_eq!(choose_level(50, &tuning, &mut rng), 1);
    }

    #[test]
    fn test_choose_level_clamps_unvalidated_tier() {
        let mut tuning = Tuning::default();
        tuning.level_tiers = vec![LevelTier {
            min_score: 0,
            offset: 5e9,
            spread: 0.0,
        }];
        let mut rng = Pcg32::seed_from_u64(4);
        assert_eq!(choose_level(10, &tuning, &mut rng), MAX_ASTEROID_LEVEL);
    }

    #[test]
    fn test_speed_multiplier() {
        let tuning = Tuning::default();
        assert!((speed_multiplier(0, false, &tuning) - 1.0).abs() < 1e-6);
        assert!((speed_multiplier(10_000, false, &tuning) - 2.0).abs() < 1e-6);
        assert!((speed_multiplier(10_000, true, &tuning) - 6.0).abs() < 1e-6);
        assert!((speed_multiplier(1_000_000, true, &tuning) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_split_level_one_is_empty() {
        let mut rng = Pcg32::seed_from_u64(8);
        let parent = asteroid(1, &mut rng);
        let mut ids = IdAllocator::default();
        assert!(split(&parent, &Tuning::default(), 1.0, &mut rng, &mut ids).unwrap().is_empty());
    }

    #[test]
    fn test_split_counts_and_levels() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut ids = IdAllocator::default();
        for level in 2..=6u32 {
            for _ in 0..50 {
                let parent = asteroid(level, &mut rng);
                let children = split(&parent, &tuning, 1.0, &mut rng, &mut ids).unwrap();
                assert_eq!(children.len(), level as usize);
                let ones = children.iter().filter(|c| c.level() == Some(1)).count();
                assert!(ones >= (level - level / 2) as usize);
                for child in &children {
                    let l = child.level().unwrap();
                    assert!(l < level);
                    assert!((child.position - parent.position).abs().max_element() <= 15.0);
                }
            }
        }
    }

    #[test]
    fn test_spawn_respects_safe_zone() {
        // Force a spawn every tick inside a safe zone that covers everything
        let mut tuning = Tuning::default();
        tuning.spawn_base_rate = 1.0;
        tuning.safe_zone_height_fraction = 1.0;
        let mut world = World::new_game(DEFAULT_WIDTH, DEFAULT_HEIGHT, 3, tuning).unwrap();
        let before = world.asteroids.len();
        for _ in 0..20 {
            assert_eq!(maybe_spawn(&mut world).unwrap(), None);
        }
        assert_eq!(world.asteroids.len(), before);
    }

    #[test]
    fn test_spawn_outside_safe_zone_is_added() {
        let mut tuning = Tuning::default();
        tuning.spawn_base_rate = 1.0;
        let mut world = World::new_game(DEFAULT_WIDTH, DEFAULT_HEIGHT, 3, tuning).unwrap();
        // Park the ship in the far corner so the spawn region is clear
        world.ship.position = Vec2::new(DEFAULT_WIDTH - 20.0, DEFAULT_HEIGHT - 20.0);
        let id = maybe_spawn(&mut world).unwrap().expect("spawn should succeed");
        let spawned = world.asteroids.last().unwrap();
        assert_eq!(spawned.id, id);
        assert!(spawned.position.x < DEFAULT_WIDTH / 3.0);
        assert!(spawned.position.y < DEFAULT_HEIGHT / 3.0);
    }
}
