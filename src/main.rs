//! Asteroid Drift headless runner
//!
//! Plays a seeded attract-mode session with a simple autopilot and logs the
//! result. Usage: `asteroid-drift [tuning.json] [seed]`

use asteroid_drift::{
    HighScores, Tuning,
    consts::*,
    heading_to_direction,
    sim::{KindTag, TickInput, World, tick},
};

/// Give up after ten simulated minutes
const MAX_TICKS: u64 = 10 * 60 * TICK_RATE as u64;

fn main() {
    env_logger::init();
    log::info!("Asteroid Drift (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

    let mut world = match World::new_game(DEFAULT_WIDTH, DEFAULT_HEIGHT, seed, tuning) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Failed to start game: {}", e);
            std::process::exit(1);
        }
    };

    while !world.is_game_over() && world.time_ticks < MAX_TICKS {
        let input = autopilot(&world);
        match tick(&mut world, &input) {
            Ok(diff) => {
                if diff.score_delta > 0 {
                    log::debug!("Tick {}: +{} (score {})", diff.tick, diff.score_delta, world.state.score);
                }
                for (id, _) in diff.added.iter().filter(|(_, tag)| *tag == KindTag::Asteroid) {
                    if let Some(level) = world.find(*id).and_then(|e| e.level()) {
                        log::trace!("Tick {}: asteroid {} (level {}) entered", diff.tick, id, level);
                    }
                }
            }
            Err(e) => {
                log::error!("Simulation error at tick {}: {}", world.time_ticks, e);
                break;
            }
        }
    }

    log::info!(
        "Session over after {} ticks ({:.1}s), score {}",
        world.time_ticks,
        world.time_ticks as f32 * SIM_DT,
        world.state.score
    );

    let mut scores = HighScores::new();
    if let Some(rank) = scores.add_score("AUTO", world.state.score) {
        log::info!("Autopilot placed #{}", rank);
    }
    if scores.is_empty() {
        log::info!("No score to record");
    } else {
        println!("{}", scores);
    }
}

/// Turn toward the nearest asteroid, shoot when roughly lined up, and nudge
/// forward now and then so the ship doesn't sit still.
fn autopilot(world: &World) -> TickInput {
    let ship = &world.ship;
    let Some(target) = world.asteroids.iter().min_by(|a, b| {
        a.position
            .distance_squared(ship.position)
            .total_cmp(&b.position.distance_squared(ship.position))
    }) else {
        return TickInput::default();
    };

    let facing = heading_to_direction(ship.heading);
    let to_target = (target.position - ship.position).normalize_or_zero();
    // Positive when the target is clockwise of the heading (y down)
    let side = facing.perp_dot(to_target);
    let aligned = facing.dot(to_target) > 0.95;

    TickInput {
        turn_left: side < -0.05,
        // Directly behind: pick a side
        turn_right: side > 0.05 || (side.abs() <= 0.05 && !aligned),
        thrust: world.time_ticks % 120 < 10,
        fire: aligned,
    }
}
