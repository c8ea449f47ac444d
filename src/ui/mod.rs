//! Screens
//!
//! Every screen draws into a [`Surface`] in world coordinates, so layout is
//! expressed against the 600x800 arena no matter how big the terminal is.

pub mod name_entry;

use glam::Vec2;

pub use name_entry::{EntryKey, EntryOutcome, NameEntry};

use crate::highscores::{DISPLAY_COUNT, Leaderboard};
use crate::renderer::{Color, Label, Sprite, Surface};
use crate::sim::{GamePhase, GameState};

pub const RED: Color = Color::Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Color = Color::Rgb { r: 0, g: 255, b: 0 };
pub const WHITE: Color = Color::Rgb { r: 255, g: 255, b: 255 };
pub const YELLOW: Color = Color::Rgb { r: 255, g: 255, b: 0 };
pub const BACKGROUND: Color = Color::Black;

const INSTRUCTIONS: [(&str, Color); 3] = [
    ("Enter 3 letters for your name", WHITE),
    ("Press ENTER when done", GREEN),
    ("Press ESC to skip", RED),
];

/// Score and lives, shown in every phase
pub fn hud_labels(world: Vec2, score: u64, lives: u32) -> [Label; 2] {
    [
        Label::new(format!("Score: {score}"), Vec2::new(world.x - 70.0, 25.0), RED),
        Label::new(format!("Lives: {lives}"), Vec2::new(50.0, 25.0), WHITE),
    ]
}

/// One frame of the running game. While paused only the pause banner and the
/// HUD are drawn.
pub fn draw_play(surface: &mut dyn Surface, state: &GameState) {
    let world = surface.world_size();
    surface.fill_background(BACKGROUND);

    if state.phase == GamePhase::Paused {
        surface.draw_label(&Label::new("PAUSED", world / 2.0, RED));
    } else {
        for enemy in &state.enemies {
            surface.blit(Sprite::Hunter, enemy.rect);
        }
        for stone in &state.projectiles {
            surface.blit(Sprite::Stone(stone.variant), stone.rect);
        }
        surface.blit(Sprite::Bear, state.player.paddle);
        surface.blit(Sprite::Cub, state.player.companion);
    }

    for label in hud_labels(world, state.player.score, state.player.lives) {
        surface.draw_label(&label);
    }
}

/// Empty screen shown while the failure cue plays
pub fn draw_blank(surface: &mut dyn Surface) {
    surface.fill_background(BACKGROUND);
}

pub fn game_over_label(world: Vec2, score: u64) -> Label {
    Label::new(format!("Game Over! Score: {score}"), world / 2.0, RED)
}

pub fn draw_name_entry(surface: &mut dyn Surface, score: u64, entry: &NameEntry) {
    let world = surface.world_size();
    surface.fill_background(BACKGROUND);
    surface.draw_label(&game_over_label(world, score));
    surface.draw_label(&Label::new(
        format!("Enter name: {}", entry.text()),
        Vec2::new(world.x / 2.0, world.y / 2.0 - 200.0),
        WHITE,
    ));
    for (i, (text, color)) in INSTRUCTIONS.iter().enumerate() {
        let y = world.y - 200.0 + i as f32 * 60.0;
        surface.draw_label(&Label::new(*text, Vec2::new(world.x / 2.0, y), *color));
    }
}

/// Leaderboard rows as drawn, with entries matching `final_score` in yellow
pub fn high_score_rows(board: &Leaderboard, final_score: u64) -> Vec<(String, Color)> {
    board
        .top(DISPLAY_COUNT)
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let color = if entry.score == final_score { YELLOW } else { WHITE };
            (format!("{}. {}", i + 1, entry), color)
        })
        .collect()
}

pub fn draw_high_scores(surface: &mut dyn Surface, board: &Leaderboard, final_score: u64) {
    let world = surface.world_size();
    let cx = world.x / 2.0;
    surface.fill_background(BACKGROUND);
    surface.draw_label(&Label::new("HIGH SCORES", Vec2::new(cx, 100.0), YELLOW));
    for (i, (text, color)) in high_score_rows(board, final_score).into_iter().enumerate() {
        let y = 200.0 + i as f32 * 70.0;
        surface.draw_label(&Label::new(text, Vec2::new(cx, y), color));
    }
    surface.draw_label(&Label::new(
        "Press any key to exit",
        Vec2::new(cx, world.y - 100.0),
        RED,
    ));
}
