//! Movement stage: player, projectiles, enemies and power-ups.

use crate::entities::{Bullet, GameMode, GameState, Rect};
use crate::input::InputSnapshot;

pub fn step(state: &mut GameState, input: &InputSnapshot) {
    move_player(state, input);
    if input.fire && state.player.alive {
        fire_player_bullet(state);
    }
    move_bullets(state);
    match state.mode() {
        GameMode::Wave => fall(state),
        GameMode::Formation => march(state),
    }
    drift_power_ups(state);
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Each axis moves independently; a step that would leave any part of the
/// ship outside the canvas is dropped rather than clamped.
fn move_player(state: &mut GameState, input: &InputSnapshot) {
    let (width, height) = (state.config.width, state.config.height);
    let player = &mut state.player;
    let speed = player.speed;

    let dx = axis_delta(input.left, input.right, speed);
    let dy = axis_delta(input.up, input.down, speed);

    if dx != 0.0 {
        let moved = Rect { x: player.rect.x + dx, ..player.rect };
        if moved.within(width, height) {
            player.rect = moved;
        }
    }
    if dy != 0.0 {
        let moved = Rect { y: player.rect.y + dy, ..player.rect };
        if moved.within(width, height) {
            player.rect = moved;
        }
    }
}

fn axis_delta(negative: bool, positive: bool, speed: f32) -> f32 {
    match (negative, positive) {
        (true, false) => -speed,
        (false, true) => speed,
        _ => 0.0,
    }
}

/// One shot from the nose of the ship at the current bullet speed.
pub fn fire_player_bullet(state: &mut GameState) {
    let tuning = &state.config.tuning.player;
    let p = &state.player.rect;
    state.entities.bullets.push(Bullet {
        rect: Rect::new(
            p.center_x() - tuning.bullet_width / 2.0,
            p.y,
            tuning.bullet_width,
            tuning.bullet_height,
        ),
        vy: -state.difficulty.bullet_speed,
        active: true,
    });
}

// ── Projectiles ───────────────────────────────────────────────────────────────

fn move_bullets(state: &mut GameState) {
    let height = state.config.height;

    for b in &mut state.entities.bullets {
        b.rect.y += b.vy;
    }
    // Gone once fully above the top edge.
    state.entities.bullets.retain(|b| b.active && b.rect.bottom() > 0.0);

    for b in &mut state.entities.enemy_bullets {
        b.rect.y += b.vy;
    }
    state.entities.enemy_bullets.retain(|b| b.active && b.rect.y < height);
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Wave mode: independent descent at the shared speed.
fn fall(state: &mut GameState) {
    let speed = state.difficulty.enemy_speed;
    let height = state.config.height;
    for e in &mut state.entities.enemies {
        e.rect.y += speed;
    }
    state.entities.enemies.retain(|e| e.active && e.rect.y < height);
}

/// Formation mode: lockstep lateral march. If any enemy would cross a side
/// edge the whole grid reverses and drops one row instead of moving sideways.
fn march(state: &mut GameState) {
    let width = state.config.width;
    let formation = &state.config.tuning.formation;
    let row_height = state.config.tuning.enemy.height + formation.padding;
    let dx = formation.march_speed * state.march_dir;

    let hits_edge = state
        .entities
        .enemies
        .iter()
        .filter(|e| e.active)
        .any(|e| e.rect.x + dx < 0.0 || e.rect.right() + dx > width);

    if hits_edge {
        for e in state.entities.enemies.iter_mut().filter(|e| e.active) {
            e.rect.y += row_height;
        }
        state.march_dir = -state.march_dir;
    } else {
        for e in state.entities.enemies.iter_mut().filter(|e| e.active) {
            e.rect.x += dx;
        }
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

fn drift_power_ups(state: &mut GameState) {
    let speed = state.config.tuning.power_up.drift_speed;
    let height = state.config.height;
    for p in &mut state.entities.power_ups {
        p.rect.y += speed;
    }
    state.entities.power_ups.retain(|p| p.active && p.rect.y < height);
}
