//! Game state and the simulation world
//!
//! The world owns every entity. The host reads it between ticks and only
//! talks to it through `tick`, pause/resume, key presses and `new_game`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cheat::{self, Key};
use super::entity::{self, Entity, EntityId};
use crate::consts::*;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks run (unless paused)
    Playing,
    /// The ship was hit; ticks are no-ops until a new game
    GameOver,
}

/// Things the host may want to react to (sounds, flashes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { count: usize, multi_shot: bool },
    AsteroidDestroyed { id: EntityId, level: u32 },
    ShipDestroyed,
    MultiShotToggled { active: bool },
}

/// Scalar game state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub paused: bool,
    pub multi_shot_active: bool,
    /// Ticks until the weapon can fire again
    pub fire_cooldown: u32,
    /// Keys of the cheat sequence matched so far
    pub cheat_progress: usize,
}

/// Hands out entity ids, never reusing one within a session
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Everything alive in one game session
#[derive(Debug, Clone)]
pub struct World {
    pub width: f32,
    pub height: f32,
    /// Resolution scale relative to the reference height
    pub scale: f32,
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Ticks simulated so far (paused ticks do not count)
    pub time_ticks: u64,
    pub state: GameState,
    pub ship: Entity,
    pub asteroids: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    pub stars: Vec<Entity>,
    pub(crate) rng: Pcg32,
    pub(crate) ids: IdAllocator,
}

impl World {
    /// Start a fresh game: stars scattered, five level 2 asteroids on the
    /// left third, the ship centered and at rest.
    pub fn new_game(width: f32, height: f32, seed: u64, tuning: Tuning) -> Result<Self, SimError> {
        let scale = height / REFERENCE_HEIGHT;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdAllocator::default();

        let safe_zone_radius = height * tuning.safe_zone_height_fraction;
        let ship = entity::new_ship(
            ids.next_id(),
            Vec2::new(width / 2.0, height / 2.0),
            SHIP_START_HEADING,
            safe_zone_radius,
            scale,
        );

        let stars = (0..STAR_COUNT)
            .map(|_| {
                let pos = Vec2::new(rng.random::<f32>() * width, rng.random::<f32>() * height);
                entity::new_star(ids.next_id(), pos, scale, &mut rng)
            })
            .collect();

        let mut asteroids = Vec::with_capacity(INITIAL_ASTEROIDS);
        for _ in 0..INITIAL_ASTEROIDS {
            let pos = Vec2::new(
                rng.random::<f32>() * width / 3.0,
                rng.random::<f32>() * height,
            );
            asteroids.push(entity::new_asteroid(
                ids.next_id(),
                pos,
                INITIAL_ASTEROID_LEVEL,
                1.0,
                &tuning,
                scale,
                &mut rng,
            )?);
        }

        log::info!(
            "New game {}x{} (scale {:.2}, seed {}), {} asteroids",
            width,
            height,
            scale,
            seed,
            asteroids.len()
        );

        Ok(Self {
            width,
            height,
            scale,
            seed,
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
            state: GameState::default(),
            ship,
            asteroids,
            projectiles: Vec::new(),
            stars,
            rng,
            ids,
        })
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn pause(&mut self) {
        if !self.state.paused {
            self.state.paused = true;
            self.state.cheat_progress = 0;
            log::debug!("Paused at tick {}", self.time_ticks);
        }
    }

    pub fn resume(&mut self) {
        if self.state.paused {
            self.state.paused = false;
            self.state.cheat_progress = 0;
            log::debug!("Resumed at tick {}", self.time_ticks);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.state.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Feed a discrete key press to the cheat detector.
    ///
    /// Ignored unless paused. Completing the sequence toggles multi-shot.
    pub fn on_key_press(&mut self, key: Key) -> Option<GameEvent> {
        if !self.state.paused {
            return None;
        }

        let step = cheat::step(&self.tuning.cheat_sequence, self.state.cheat_progress, key);
        self.state.cheat_progress = step.progress;
        if !step.completed {
            return None;
        }

        self.state.multi_shot_active = !self.state.multi_shot_active;
        log::debug!("Multi-shot toggled: {}", self.state.multi_shot_active);
        Some(GameEvent::MultiShotToggled {
            active: self.state.multi_shot_active,
        })
    }

    /// Every entity, back to front: stars, asteroids, projectiles, ship
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.stars
            .iter()
            .chain(&self.asteroids)
            .chain(&self.projectiles)
            .chain(std::iter::once(&self.ship))
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.entities().find(|e| e.id == id)
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Ensure entity lists are sorted by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.asteroids.sort_by_key(|a| a.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}
