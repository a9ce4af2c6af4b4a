//! End-to-end gameplay scenarios and simulation invariants

use asteroid_drift::Tuning;
use asteroid_drift::consts::*;
use asteroid_drift::sim::cheat::{self, Key};
use asteroid_drift::sim::entity::{new_asteroid, new_projectile};
use asteroid_drift::sim::state::IdAllocator;
use asteroid_drift::sim::weapon::{projectile_cap, volley_offsets};
use asteroid_drift::sim::{GameEvent, KindTag, TickInput, World, collide, polygons_overlap, split, tick};
use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn quiet_world(seed: u64) -> World {
    let tuning = Tuning {
        spawn_base_rate: 0.0,
        ..Tuning::default()
    };
    let mut world = World::new_game(DEFAULT_WIDTH, DEFAULT_HEIGHT, seed, tuning).unwrap();
    world.asteroids.clear();
    world
}

fn still_asteroid(world: &mut World, position: Vec2, level: u32, rng: &mut Pcg32) -> u32 {
    let id = world.next_entity_id();
    let mut asteroid = new_asteroid(id, position, level, 0.0, &world.tuning, world.scale, rng).unwrap();
    asteroid.velocity = Vec2::ZERO;
    world.asteroids.push(asteroid);
    id
}

#[test]
fn test_shot_splits_level_two_asteroid() {
    let mut world = quiet_world(21);
    let mut rng = Pcg32::seed_from_u64(21);
    let target = still_asteroid(&mut world, Vec2::new(100.0, 100.0), 2, &mut rng);

    let shot = world.next_entity_id();
    world
        .projectiles
        .push(new_projectile(shot, Vec2::new(100.0, 100.0), 0.0, Vec2::ZERO, world.scale));

    let diff = tick(&mut world, &TickInput::default()).unwrap();

    assert_eq!(diff.score_delta, 50);
    assert_eq!(world.state.score, 50);
    assert!(diff.removed.contains(&target));
    assert!(diff.removed.contains(&shot));
    assert!(world.projectiles.is_empty());
    assert!(
        diff.events
            .contains(&GameEvent::AsteroidDestroyed { id: target, level: 2 })
    );

    // A level 2 rock always breaks into two level 1 rocks
    assert_eq!(world.asteroids.len(), 2);
    assert!(world.asteroids.iter().all(|a| a.level() == Some(1)));
    let added: Vec<_> = diff.added.iter().filter(|(_, tag)| *tag == KindTag::Asteroid).collect();
    assert_eq!(added.len(), 2);
    assert!(!diff.game_over);
}

#[test]
fn test_one_asteroid_scores_once_for_two_shots() {
    let mut world = quiet_world(22);
    let mut rng = Pcg32::seed_from_u64(22);
    still_asteroid(&mut world, Vec2::new(100.0, 100.0), 1, &mut rng);
    for _ in 0..2 {
        let id = world.next_entity_id();
        world
            .projectiles
            .push(new_projectile(id, Vec2::new(100.0, 100.0), 0.0, Vec2::ZERO, world.scale));
    }

    let diff = tick(&mut world, &TickInput::default()).unwrap();
    assert_eq!(diff.score_delta, 100);
    assert!(world.asteroids.is_empty());
    assert!(world.projectiles.is_empty());
}

#[test]
fn test_multi_shot_kill_pays_flat_score() {
    let mut world = quiet_world(23);
    let mut rng = Pcg32::seed_from_u64(23);
    world.state.multi_shot_active = true;
    still_asteroid(&mut world, Vec2::new(100.0, 100.0), 3, &mut rng);
    let id = world.next_entity_id();
    world
        .projectiles
        .push(new_projectile(id, Vec2::new(100.0, 100.0), 0.0, Vec2::ZERO, world.scale));

    let diff = tick(&mut world, &TickInput::default()).unwrap();
    assert_eq!(diff.score_delta, 10);
}

#[test]
fn test_ship_collision_ends_game_for_any_level() {
    for level in 1..=3 {
        let mut world = quiet_world(30 + level as u64);
        let mut rng = Pcg32::seed_from_u64(level as u64);
        let at = world.ship.position;
        still_asteroid(&mut world, at, level, &mut rng);

        let diff = tick(&mut world, &TickInput::default()).unwrap();
        assert!(diff.game_over, "level {level} should end the game");
        assert!(world.is_game_over());
    }
}

#[test]
fn test_asteroid_wraps_across_left_edge() {
    let mut world = quiet_world(40);
    let mut rng = Pcg32::seed_from_u64(40);
    still_asteroid(&mut world, Vec2::new(-60.0, 100.0), 1, &mut rng);
    world.asteroids[0].velocity = Vec2::new(-1.0, 0.0);

    tick(&mut world, &TickInput::default()).unwrap();
    let wrapped = world.asteroids[0].position.x;
    assert!(wrapped > DEFAULT_WIDTH / 2.0, "expected to reappear on the right, got {wrapped}");

    // Straddling the right edge while still moving left must not bounce back
    for _ in 0..5 {
        tick(&mut world, &TickInput::default()).unwrap();
    }
    assert!((world.asteroids[0].position.x - (wrapped - 5.0)).abs() < 1e-3);
}

#[test]
fn test_ship_wraps_across_bottom_edge() {
    let mut world = quiet_world(41);
    world.ship.position = Vec2::new(400.0, DEFAULT_HEIGHT + 40.0);
    world.ship.velocity = Vec2::new(0.0, 2.0);
    tick(&mut world, &TickInput::default()).unwrap();
    assert!(world.ship.position.y < DEFAULT_HEIGHT / 2.0);
}

#[test]
fn test_pause_blocks_every_tick() {
    let mut world = quiet_world(50);
    world.pause();
    for _ in 0..10 {
        let diff = tick(
            &mut world,
            &TickInput {
                fire: true,
                thrust: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(diff.added.is_empty());
    }
    assert_eq!(world.time_ticks, 0);
    assert!(world.projectiles.is_empty());
    assert_eq!(world.ship.velocity, Vec2::ZERO);
}

fn arb_polygon() -> impl Strategy<Value = Vec<Vec2>> {
    prop::collection::vec((-40.0f32..40.0, -40.0f32..40.0), 3..8)
        .prop_map(|pts| pts.into_iter().map(|(x, y)| Vec2::new(x, y)).collect())
}

fn arb_input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(turn_left, turn_right, thrust, fire)| TickInput {
            turn_left,
            turn_right,
            thrust,
            fire,
        },
    )
}

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::Left),
        Just(Key::Right),
        Just(Key::Fire),
        Just(Key::Other),
    ]
}

proptest! {
    #[test]
    fn prop_polygon_overlap_is_symmetric(a in arb_polygon(), b in arb_polygon(), shift in (-60.0f32..60.0, -60.0f32..60.0)) {
        let offset = Vec2::new(shift.0, shift.1);
        let b: Vec<Vec2> = b.into_iter().map(|p| p + offset).collect();
        prop_assert_eq!(polygons_overlap(&a, &b), polygons_overlap(&b, &a));
    }

    #[test]
    fn prop_entity_collision_is_symmetric(seed in any::<u64>(), x in 0.0f32..200.0, y in 0.0f32..200.0, heading in 0.0f32..360.0) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let rock = new_asteroid(1, Vec2::new(100.0, 100.0), 2, 1.0, &tuning, 1.0, &mut rng).unwrap();
        let shot = new_projectile(2, Vec2::new(x, y), heading, Vec2::ZERO, 1.0);
        prop_assert_eq!(collide(&rock, &shot), collide(&shot, &rock));
    }

    #[test]
    fn prop_split_yields_smaller_rocks(seed in any::<u64>(), level in 1u32..9) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdAllocator::default();
        let parent = new_asteroid(ids.next_id(), Vec2::new(300.0, 300.0), level, 1.0, &tuning, 1.0, &mut rng).unwrap();
        let children = split(&parent, &tuning, 1.0, &mut rng, &mut ids).unwrap();

        if level == 1 {
            prop_assert!(children.is_empty());
        } else {
            prop_assert_eq!(children.len(), level as usize);
            for child in &children {
                let l = child.level().unwrap();
                prop_assert!(l >= 1 && l < level);
                prop_assert!(child.id != parent.id);
            }
        }
    }

    #[test]
    fn prop_cheat_progress_stays_in_range(keys in prop::collection::vec(arb_key(), 0..60)) {
        let mut progress = 0;
        for key in keys {
            let s = cheat::step(&Key::DEFAULT_SEQUENCE, progress, key);
            prop_assert!(s.progress < Key::DEFAULT_SEQUENCE.len());
            if s.completed {
                prop_assert_eq!(s.progress, 0);
            }
            progress = s.progress;
        }
    }

    #[test]
    fn prop_tick_invariants(seed in any::<u64>(), multi_shot in any::<bool>(), inputs in prop::collection::vec(arb_input(), 1..200)) {
        let mut world = World::new_game(DEFAULT_WIDTH, DEFAULT_HEIGHT, seed, Tuning::default()).unwrap();
        world.state.multi_shot_active = multi_shot;
        let mut score = 0u64;
        for input in &inputs {
            // Death clears multi-shot, so take the cap that applied when firing
            let cap = projectile_cap(&world.state, &world.tuning);
            let volley = volley_offsets(world.state.multi_shot_active, world.tuning.multi_shot_spread).len();
            let diff = tick(&mut world, input).unwrap();
            score += diff.score_delta;
            prop_assert_eq!(world.state.score, score);
            prop_assert!(world.state.fire_cooldown <= world.tuning.fire_cooldown_ticks);
            // The cap gates a fire request, so one volley can overshoot it by
            // all but one of its shots
            prop_assert!(world.projectiles.len() <= cap + volley - 1);
            prop_assert!(world.asteroids.iter().all(|a| a.level().is_some_and(|l| l >= 1)));
            prop_assert!(world.asteroids.windows(2).all(|w| w[0].id < w[1].id));
            if diff.game_over {
                break;
            }
        }
    }
}
