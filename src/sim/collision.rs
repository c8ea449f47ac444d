//! Collision resolution between stones, hunters and the player
//!
//! Both passes scan a fixed snapshot of the collections, mark what was hit,
//! and compact each collection once at the end.

use super::rect::Rect;
use super::state::{Enemy, Projectile};

/// A stone/hunter pair removed by [`resolve_projectile_hits`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile: u32,
    pub enemy: u32,
}

/// Match each projectile (in creation order) with the first live enemy (in
/// creation order) it overlaps. Each enemy is consumed by at most one
/// projectile and each projectile destroys at most one enemy. Matched pairs
/// are removed from both collections.
pub fn resolve_projectile_hits(projectiles: &mut Vec<Projectile>, enemies: &mut Vec<Enemy>) -> Vec<Hit> {
    let mut enemy_gone = vec![false; enemies.len()];
    let mut projectile_gone = vec![false; projectiles.len()];
    let mut hits = Vec::new();

    for (pi, projectile) in projectiles.iter().enumerate() {
        let first = enemies
            .iter()
            .enumerate()
            .find(|(ei, enemy)| !enemy_gone[*ei] && projectile.rect.overlaps(&enemy.rect));
        if let Some((ei, enemy)) = first {
            enemy_gone[ei] = true;
            projectile_gone[pi] = true;
            hits.push(Hit {
                projectile: projectile.id,
                enemy: enemy.id,
            });
        }
    }

    compact(projectiles, &projectile_gone);
    compact(enemies, &enemy_gone);
    hits
}

/// Remove every enemy overlapping either of the player's rectangles and
/// return their IDs in creation order.
pub fn resolve_player_strikes(enemies: &mut Vec<Enemy>, paddle: &Rect, companion: &Rect) -> Vec<u32> {
    let struck: Vec<bool> = enemies
        .iter()
        .map(|e| e.rect.overlaps(paddle) || e.rect.overlaps(companion))
        .collect();
    let ids = enemies
        .iter()
        .zip(&struck)
        .filter(|(_, hit)| **hit)
        .map(|(e, _)| e.id)
        .collect();
    compact(enemies, &struck);
    ids
}

/// Drop the items whose flag is set, keeping the order of the rest
fn compact<T>(items: &mut Vec<T>, remove: &[bool]) {
    let mut flags = remove.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}
