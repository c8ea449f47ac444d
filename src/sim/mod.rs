//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Hit, resolve_player_strikes, resolve_projectile_hits};
pub use rect::Rect;
pub use state::{EndReason, Enemy, GameEvent, GamePhase, GameState, PlayerState, Projectile};
pub use tick::{TickInput, tick};
