//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`] so the tick can be driven
//! without a terminal.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen until the pause toggle is pressed again
    Paused,
    /// Run ended (terminal)
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Lives ran out
    OutOfLives,
    /// Player quit
    Quit,
}

/// Something that happened during a tick. Drained by the frontend to drive
/// audio cues and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ProjectileThrown { id: u32 },
    EnemySpawned { id: u32 },
    /// A stone knocked out a hunter
    EnemyHit { projectile: u32, enemy: u32 },
    /// A hunter walked off the bottom of the arena
    EnemyEscaped { id: u32 },
    /// A hunter reached the bear or the cub
    PlayerStruck { id: u32 },
    Paused,
    Resumed,
    RunEnded { reason: EndReason },
}

/// A falling hunter
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub rect: Rect,
}

/// A thrown stone
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub rect: Rect,
    /// Stone sprite index, picked when thrown
    pub variant: u8,
}

/// The bear, the cub it protects, and the run's bookkeeping
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// The bear (player-controlled horizontally)
    pub paddle: Rect,
    /// The cub; never moves
    pub companion: Rect,
    pub lives: u32,
    pub score: u64,
    /// Ticks until the next stone may be thrown
    pub cooldown: u32,
}

impl PlayerState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            paddle: Rect::from_center(tuning.paddle_center, tuning.paddle_size),
            companion: Rect::from_center(tuning.companion_center, tuning.companion_size),
            lives: tuning.starting_lives,
            score: 0,
            cooldown: 0,
        }
    }

    /// True if `rect` touches the bear or the cub
    pub fn is_struck_by(&self, rect: &Rect) -> bool {
        rect.overlaps(&self.paddle) || rect.overlaps(&self.companion)
    }
}

/// Complete state of a run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Arena bounds
    pub arena: Rect,
    pub phase: GamePhase,
    pub player: PlayerState,
    /// Live hunters in creation order
    pub enemies: Vec<Enemy>,
    /// Live stones in creation order
    pub projectiles: Vec<Projectile>,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
    /// Tick count at which the next hunter spawns
    pub spawn_threshold: u32,
    /// Simulation tick counter (only advances while running)
    pub time_ticks: u64,
    /// Events emitted since the last drain
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed and tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (lo, hi) = tuning.spawn_interval();
        let spawn_threshold = rng.random_range(lo..=hi);

        Self {
            seed,
            arena: Rect::new(0.0, 0.0, tuning.arena_width, tuning.arena_height),
            phase: GamePhase::Running,
            player: PlayerState::new(&tuning),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            spawn_timer: 0,
            spawn_threshold,
            time_ticks: 0,
            events: Vec::new(),
            rng,
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Throw a stone from the top centre of the bear
    pub fn spawn_projectile(&mut self) -> u32 {
        let id = self.next_entity_id();
        let size = self.tuning.projectile_size;
        let paddle = self.player.paddle;
        let pos = Vec2::new(paddle.center().x - size.x / 2.0, paddle.top());
        let variant = self.rng.random_range(0..self.tuning.projectile_variants.max(1));
        self.projectiles.push(Projectile {
            id,
            rect: Rect { pos, size },
            variant,
        });
        id
    }

    /// Drop a hunter in at a random column above the arena
    pub fn spawn_enemy(&mut self) -> u32 {
        let id = self.next_entity_id();
        let size = self.tuning.enemy_size;
        let max_x = (self.arena.size.x - size.x).max(0.0);
        let x = if max_x > 0.0 {
            // Whole-unit columns
            self.rng.random_range(0..=max_x as u32) as f32
        } else {
            0.0
        };
        self.enemies.push(Enemy {
            id,
            rect: Rect {
                pos: Vec2::new(self.arena.left() + x, self.tuning.enemy_spawn_y),
                size,
            },
        });
        id
    }

    /// Draw a fresh spawn threshold from the tuning range
    pub fn roll_spawn_threshold(&mut self) {
        let (lo, hi) = self.tuning.spawn_interval();
        self.spawn_threshold = self.rng.random_range(lo..=hi);
    }

    /// Take one life. Ends the run when none remain.
    pub fn lose_life(&mut self) {
        self.player.lives = self.player.lives.saturating_sub(1);
        log::info!("Life lost, {} remaining", self.player.lives);
        if self.player.lives == 0 {
            self.end_run(EndReason::OutOfLives);
        }
    }

    /// Move to GameOver. No-op if the run already ended.
    pub fn end_run(&mut self, reason: EndReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::RunEnded { reason });
        log::info!(
            "Run ended ({:?}) after {} ticks, score {}",
            reason,
            self.time_ticks,
            self.player.score
        );
    }
}
