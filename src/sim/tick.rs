//! Fixed timestep simulation tick
//!
//! Advances a run by one frame. The frontend samples input once per frame
//! and calls [`tick`] with it.

use glam::Vec2;

use super::collision::{resolve_player_strikes, resolve_projectile_hits};
use super::state::{EndReason, GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left key held
    pub left: bool,
    /// Right key held
    pub right: bool,
    /// Analog stick horizontal axis in [-1, 1], if a controller is present
    pub axis: Option<f32>,
    /// Throw key held
    pub fire: bool,
    /// Controller throw button held
    pub pad_fire: bool,
    /// Pause toggle (edge)
    pub pause: bool,
    /// Quit (edge)
    pub quit: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    step(state, input);

    // Quit takes effect once the frame has run
    if input.quit {
        state.end_run(EndReason::Quit);
    }
}

fn step(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused at tick {}", state.time_ticks);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed at tick {}", state.time_ticks);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;

    if state.player.cooldown > 0 {
        state.player.cooldown -= 1;
    }

    move_paddle(state, input);

    if (input.fire || input.pad_fire) && state.player.cooldown == 0 {
        let id = state.spawn_projectile();
        state.player.cooldown = state.tuning.fire_cooldown;
        state.events.push(GameEvent::ProjectileThrown { id });
    }

    state.spawn_timer += 1;
    if state.spawn_timer >= state.spawn_threshold {
        state.spawn_timer = 0;
        state.roll_spawn_threshold();
        let id = state.spawn_enemy();
        state.events.push(GameEvent::EnemySpawned { id });
        log::debug!("Hunter {} spawned, next in {} ticks", id, state.spawn_threshold);
    }

    advance_enemies(state);
    if state.is_over() {
        return;
    }

    advance_projectiles(state);

    let hits = resolve_projectile_hits(&mut state.projectiles, &mut state.enemies);
    for hit in hits {
        state.player.score += 1;
        state.events.push(GameEvent::EnemyHit {
            projectile: hit.projectile,
            enemy: hit.enemy,
        });
        log::info!("Hunter {} hit, score {}", hit.enemy, state.player.score);
    }

    let struck = resolve_player_strikes(&mut state.enemies, &state.player.paddle, &state.player.companion);
    for id in struck {
        state.events.push(GameEvent::PlayerStruck { id });
        state.lose_life();
        if state.is_over() {
            return;
        }
    }
}

/// Horizontal paddle motion from keys or the analog stick, clamped to the arena
fn move_paddle(state: &mut GameState, input: &TickInput) {
    let speed = state.tuning.paddle_speed;

    let mut dx = 0.0;
    if input.left {
        dx = -speed;
    } else if input.right {
        dx = speed;
    }

    // The stick overrides the keys when pushed past the dead zone
    if let Some(axis) = input.axis {
        let axis = axis.clamp(-1.0, 1.0);
        if axis.abs() > state.tuning.axis_dead_zone {
            dx = axis * speed;
        }
    }

    state.player.paddle.translate(Vec2::new(dx, 0.0));
    state.player.paddle.clamp_within(&state.arena);
}

/// Move hunters down; any that leave the bottom cost a life
fn advance_enemies(state: &mut GameState) {
    let step = Vec2::new(0.0, state.tuning.enemy_speed);
    let floor = state.arena.bottom();

    let mut escaped = Vec::new();
    state.enemies.retain_mut(|enemy| {
        enemy.rect.translate(step);
        if enemy.rect.top() > floor {
            escaped.push(enemy.id);
            false
        } else {
            true
        }
    });

    for id in escaped {
        state.events.push(GameEvent::EnemyEscaped { id });
        log::info!("Hunter {} got past", id);
        state.lose_life();
        if state.is_over() {
            return;
        }
    }
}

/// Move stones up and drop the ones that left the top
fn advance_projectiles(state: &mut GameState) {
    let step = Vec2::new(0.0, -state.tuning.projectile_speed);
    let ceiling = state.arena.top();
    state.projectiles.retain_mut(|stone| {
        stone.rect.translate(step);
        stone.rect.bottom() >= ceiling
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Enemy, Projectile};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Tuning with spawning pushed far into the future
    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_interval_min: 1_000_000,
            spawn_interval_max: 1_000_000,
            ..Default::default()
        }
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = GameState::new(12345, quiet_tuning());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks = state.time_ticks;

        // Nothing advances while paused
        tick(&mut state, &fire());
        assert_eq!(state.time_ticks, ticks);
        assert!(state.projectiles.is_empty());

        // Unpausing runs the frame
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_quit_ends_run() {
        let mut state = GameState::new(1, quiet_tuning());
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::RunEnded { reason: EndReason::Quit })
        );

        // GameOver is terminal
        tick(&mut state, &fire());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_quit_frame_still_resolves_hits() {
        let mut state = GameState::new(1, quiet_tuning());
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            rect: Rect::new(0.0, 100.0, 100.0, 100.0),
        });
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            rect: Rect::new(20.0, 205.0, 60.0, 60.0),
            variant: 0,
        });

        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.player.score, 1);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        let events = state.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::RunEnded { reason: EndReason::Quit })
        );
    }

    #[test]
    fn test_quit_while_paused() {
        let mut state = GameState::new(1, quiet_tuning());
        state.phase = GamePhase::Paused;
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_fire_resets_cooldown() {
        let mut state = GameState::new(1, quiet_tuning());
        tick(&mut state, &fire());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.player.cooldown, 30);

        // Held fire does nothing until the cooldown runs out
        for _ in 0..29 {
            tick(&mut state, &fire());
            assert_eq!(state.projectiles.len(), 1);
        }
        assert_eq!(state.player.cooldown, 1);

        tick(&mut state, &fire());
        assert_eq!(state.projectiles.len(), 2);
        assert_eq!(state.player.cooldown, 30);
    }

    #[test]
    fn test_pad_button_fires() {
        let mut state = GameState::new(1, quiet_tuning());
        let input = TickInput {
            pad_fire: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_left_key_wins_over_right() {
        let mut state = GameState::new(1, quiet_tuning());
        let start = state.player.paddle.left();
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.paddle.left(), start - 5.0);
    }

    #[test]
    fn test_axis_overrides_keys_past_dead_zone() {
        let mut state = GameState::new(1, quiet_tuning());
        let start = state.player.paddle.left();

        let input = TickInput {
            left: true,
            axis: Some(0.5),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!((state.player.paddle.left() - (start + 2.5)).abs() < 1e-4);

        // Inside the dead zone the key applies
        let input = TickInput {
            left: true,
            axis: Some(0.2),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!((state.player.paddle.left() - (start - 2.5)).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_threshold_rerolled() {
        let tuning = Tuning {
            spawn_interval_min: 3,
            spawn_interval_max: 3,
            ..Default::default()
        };
        let mut state = GameState::new(5, tuning);
        let input = TickInput::default();
        for _ in 0..2 {
            tick(&mut state, &input);
        }
        assert!(state.enemies.is_empty());
        tick(&mut state, &input);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawn_timer, 0);
        // Freshly spawned hunters move in their spawn frame
        assert_eq!(state.enemies[0].rect.top(), -196.0);

        for _ in 0..3 {
            tick(&mut state, &input);
        }
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_three_escapes_end_the_run() {
        let mut state = GameState::new(9, quiet_tuning());
        let input = TickInput::default();

        // Clear of the bear and the cub, one tick from falling out
        for _ in 0..3 {
            let id = state.next_entity_id();
            state.enemies.push(Enemy {
                id,
                rect: Rect::new(0.0, 798.0, 100.0, 100.0),
            });
            tick(&mut state, &input);
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.player.score, 0);
        assert!(state.enemies.is_empty());

        let events = state.drain_events();
        let escapes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyEscaped { .. }))
            .count();
        assert_eq!(escapes, 3);
        assert_eq!(
            events.last(),
            Some(&GameEvent::RunEnded { reason: EndReason::OutOfLives })
        );
    }

    #[test]
    fn test_enemy_on_bottom_edge_is_not_escaped() {
        let mut state = GameState::new(9, quiet_tuning());
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            rect: Rect::new(0.0, 796.0, 100.0, 100.0),
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.player.lives, 3);
    }

    #[test]
    fn test_intercept_fresh_spawn_same_frame() {
        // Full-width hunters spawning just above the bear on the first tick
        let tuning = Tuning {
            spawn_interval_min: 1,
            spawn_interval_max: 1,
            enemy_size: glam::Vec2::new(600.0, 100.0),
            enemy_spawn_y: 500.0,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning);

        tick(&mut state, &fire());

        assert_eq!(state.player.score, 1);
        assert!(state.projectiles.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.lives, 3);

        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyHit { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PlayerStruck { .. })));
    }

    #[test]
    fn test_hunter_reaching_cub_costs_life() {
        let mut state = GameState::new(9, quiet_tuning());
        // Bear out of the way so only the cub is in the hunter's path
        state.player.paddle.pos.x = 0.0;
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            rect: Rect::new(250.0, 572.0, 100.0, 100.0),
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.lives, 2);
        assert!(state.enemies.is_empty());
        assert!(state.drain_events().contains(&GameEvent::PlayerStruck { id }));
    }

    #[test]
    fn test_stone_leaves_top() {
        let mut state = GameState::new(9, quiet_tuning());
        tick(&mut state, &fire());
        // Top starts at 600 and the stone is 60 tall: gone once bottom < 0
        let frames = (660.0f32 / 7.0).ceil() as usize;
        for _ in 2..frames {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.projectiles.len(), 1);
        }
        tick(&mut state, &TickInput::default());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            fire(),
            TickInput {
                axis: Some(-0.7),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.projectiles, state2.projectiles);
        assert_eq!(state1.player.score, state2.player.score);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_arena(
            moves in prop::collection::vec((any::<bool>(), any::<bool>(), prop::option::of(-1.5f32..1.5)), 1..300)
        ) {
            let mut state = GameState::new(0, quiet_tuning());
            let max_x = state.arena.size.x - state.player.paddle.size.x;
            for (left, right, axis) in moves {
                let input = TickInput { left, right, axis, ..Default::default() };
                tick(&mut state, &input);
                let x = state.player.paddle.left();
                prop_assert!((0.0..=max_x).contains(&x), "paddle x {} out of bounds", x);
            }
        }

        #[test]
        fn prop_no_throw_during_cooldown(fires in prop::collection::vec(any::<bool>(), 1..200)) {
            let mut state = GameState::new(0, quiet_tuning());
            for fire in fires {
                let before = state.projectiles.len();
                let cooldown_before = state.player.cooldown;
                tick(&mut state, &TickInput { fire, ..Default::default() });
                if state.projectiles.len() > before {
                    prop_assert!(cooldown_before <= 1);
                    prop_assert_eq!(state.player.cooldown, 30);
                }
            }
        }
    }
}
