//! Collision resolver.
//!
//! Three independent passes per tick. Each pass only flags entities and the
//! store is swept before the next pass starts, so nothing consumed in one
//! pass is visible to a later one. Within a pass the first match in
//! collection order wins and every entity is consumed at most once.

use rand::Rng;
use tracing::{debug, info};

use crate::entities::{start_rect, FrameEvent, GameState, PowerUp, PowerUpKind, Rect};

pub fn resolve(state: &mut GameState, rng: &mut impl Rng) {
    bullets_vs_enemies(state, rng);
    state.entities.sweep();
    enemy_bullets_vs_player(state);
    state.entities.sweep();
    power_ups_vs_player(state);
    state.entities.sweep();
}

// ── Pass 1: player bullets ↔ enemies ─────────────────────────────────────────

fn bullets_vs_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let mut destroyed: Vec<Rect> = Vec::new();

    for bullet in state.entities.bullets.iter_mut().filter(|b| b.active) {
        let hit = state
            .entities
            .enemies
            .iter_mut()
            .find(|e| e.active && bullet.rect.intersects(&e.rect));
        if let Some(enemy) = hit {
            bullet.active = false;
            enemy.active = false;
            destroyed.push(enemy.rect);
        }
    }

    let points = state.config.tuning.enemy.points;
    let drop = state.config.tuning.power_up;
    for rect in destroyed {
        award_points(state, points);
        state.events.push(FrameEvent::EnemyDestroyed { points });
        if rng.gen_bool(drop.drop_chance) {
            state.entities.power_ups.push(PowerUp {
                rect: Rect::new(rect.x, rect.y, drop.width, drop.height),
                kind: PowerUpKind::ExtraLife,
                active: true,
            });
            state.events.push(FrameEvent::PowerUpDropped {
                kind: PowerUpKind::ExtraLife,
            });
        }
    }
}

/// Score only goes up; the high score follows it once strictly exceeded.
pub fn award_points(state: &mut GameState, points: u32) {
    state.score = state.score.saturating_add(points);
    if state.score > state.high_score {
        state.high_score = state.score;
        state.events.push(FrameEvent::HighScore { score: state.score });
    }
}

// ── Pass 2: enemy bullets ↔ player ───────────────────────────────────────────

fn enemy_bullets_vs_player(state: &mut GameState) {
    for bullet in state.entities.enemy_bullets.iter_mut() {
        if !state.player.alive {
            break;
        }
        if !bullet.active || !bullet.rect.intersects(&state.player.rect) {
            continue;
        }
        bullet.active = false;
        state.player.lives = state.player.lives.saturating_sub(1);
        state.events.push(FrameEvent::PlayerHit {
            lives_left: state.player.lives,
        });

        if state.player.lives == 0 {
            // Final hit: the wreck stays where it was.
            state.player.alive = false;
            info!(score = state.score, "player destroyed");
        } else {
            state.player.rect = start_rect(&state.config);
            debug!(lives = state.player.lives, "player hit, respawned");
        }
    }
}

// ── Pass 3: power-ups ↔ player ───────────────────────────────────────────────

fn power_ups_vs_player(state: &mut GameState) {
    if !state.player.alive {
        return;
    }
    let max_lives = state.config.tuning.player.max_lives;
    for power_up in state.entities.power_ups.iter_mut() {
        if !power_up.active || !power_up.rect.intersects(&state.player.rect) {
            continue;
        }
        power_up.active = false;
        match power_up.kind {
            PowerUpKind::ExtraLife => {
                state.player.lives = state.player.lives.saturating_add(1).min(max_lives);
                state.events.push(FrameEvent::LifeRestored {
                    lives: state.player.lives,
                });
            }
        }
    }
}
