//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a settings file can
//! rebalance the game without touching code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Gameplay tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Arena width in world units
    pub arena_width: f32,
    /// Arena height in world units
    pub arena_height: f32,

    // === Bear (paddle) ===
    pub paddle_size: Vec2,
    /// Starting centre of the paddle
    pub paddle_center: Vec2,
    /// Horizontal speed per tick at full input
    pub paddle_speed: f32,

    // === Cub (companion) ===
    pub companion_size: Vec2,
    pub companion_center: Vec2,

    // === Hunters ===
    pub enemy_size: Vec2,
    /// Downward speed per tick
    pub enemy_speed: f32,
    /// Y of the top edge for newly spawned hunters (negative = above arena)
    pub enemy_spawn_y: f32,
    /// Inclusive range the spawn threshold is drawn from (ticks)
    pub spawn_interval_min: u32,
    pub spawn_interval_max: u32,

    // === Stones ===
    pub projectile_size: Vec2,
    /// Upward speed per tick
    pub projectile_speed: f32,
    /// Number of stone sprites to pick from
    pub projectile_variants: u8,
    /// Ticks between throws
    pub fire_cooldown: u32,

    // === Run ===
    pub starting_lives: u32,
    /// Analog stick magnitude below which input is ignored
    pub axis_dead_zone: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 600.0,
            arena_height: 800.0,

            paddle_size: Vec2::new(130.0, 200.0),
            paddle_center: Vec2::new(300.0, 700.0),
            paddle_speed: 5.0,

            companion_size: Vec2::new(100.0, 150.0),
            companion_center: Vec2::new(300.0, 750.0),

            enemy_size: Vec2::new(100.0, 100.0),
            enemy_speed: 4.0,
            enemy_spawn_y: -200.0,
            spawn_interval_min: 45,
            spawn_interval_max: 100,

            projectile_size: Vec2::new(60.0, 60.0),
            projectile_speed: 7.0,
            projectile_variants: 5,
            fire_cooldown: 30,

            starting_lives: 3,
            axis_dead_zone: 0.2,
        }
    }
}

impl Tuning {
    /// Spawn threshold range with the bounds put in order
    pub fn spawn_interval(&self) -> (u32, u32) {
        let lo = self.spawn_interval_min.max(1);
        let hi = self.spawn_interval_max.max(1);
        if lo <= hi { (lo, hi) } else { (hi, lo) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "enemy_speed": 6.5 }"#).unwrap();
        assert_eq!(tuning.enemy_speed, 6.5);
        assert_eq!(tuning.fire_cooldown, 30);
        assert_eq!(tuning.paddle_size, Vec2::new(130.0, 200.0));
    }

    #[test]
    fn test_spawn_interval_is_ordered_and_nonzero() {
        let tuning = Tuning {
            spawn_interval_min: 90,
            spawn_interval_max: 0,
            ..Default::default()
        };
        assert_eq!(tuning.spawn_interval(), (1, 90));
        assert_eq!(Tuning::default().spawn_interval(), (45, 100));
    }
}
