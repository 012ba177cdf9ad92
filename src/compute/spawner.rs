//! Enemy creation and enemy fire.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::entities::{Bullet, Enemy, EnemyVariant, FrameEvent, GameMode, GameState, Rect};

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Fixed rows×cols grid at the top-left offset. Built once per game.
pub fn build_formation(state: &mut GameState) {
    let enemy = state.config.tuning.enemy;
    let f = state.config.tuning.formation;

    for row in 0..f.rows {
        for col in 0..f.cols {
            state.entities.enemies.push(Enemy {
                rect: Rect::new(
                    f.offset_left + f32::from(col) * (enemy.width + f.padding),
                    f.offset_top + f32::from(row) * (enemy.height + f.padding),
                    enemy.width,
                    enemy.height,
                ),
                variant: EnemyVariant::Formation { row, col },
                active: true,
            });
        }
    }
    state.formation_built = true;
    state.march_dir = 1.0;

    let count = u32::from(f.rows) * u32::from(f.cols);
    debug!(count, "formation built");
    state.events.push(FrameEvent::FormationBuilt { count });
}

/// A batch of `max_enemies` free-falling enemies at random columns, all
/// starting above the visible area.
pub fn spawn_wave(state: &mut GameState, rng: &mut impl Rng) {
    let enemy = state.config.tuning.enemy;
    let count = state.difficulty.max_enemies;
    let max_x = state.config.width - enemy.width;

    for _ in 0..count {
        let x = rng.gen_range(0.0..max_x);
        let lift = if enemy.spawn_band > 0.0 {
            rng.gen_range(0.0..enemy.spawn_band)
        } else {
            0.0
        };
        let y = -enemy.height - lift;
        state.entities.enemies.push(Enemy {
            rect: Rect::new(x, y, enemy.width, enemy.height),
            variant: EnemyVariant::FreeFall,
            active: true,
        });
    }

    debug!(count, level = state.level, "wave spawned");
    state.events.push(FrameEvent::WaveSpawned { count });
}

/// Respawn-if-cleared: a new wave once every enemy is gone, or the grid on
/// the first tick of a formation game.
pub fn replenish(state: &mut GameState, rng: &mut impl Rng) {
    match state.mode() {
        GameMode::Wave => {
            if state.entities.active_enemies() == 0 {
                spawn_wave(state, rng);
            }
        }
        GameMode::Formation => {
            if !state.formation_built {
                build_formation(state);
            }
        }
    }
}

// ── Enemy fire ────────────────────────────────────────────────────────────────

pub fn enemy_fire(state: &mut GameState, rng: &mut impl Rng) {
    match state.mode() {
        GameMode::Wave => fire_by_chance(state, rng),
        GameMode::Formation => fire_queued_volleys(state, rng),
    }
}

/// Every active enemy rolls independently.
fn fire_by_chance(state: &mut GameState, rng: &mut impl Rng) {
    let chance = state.config.tuning.enemy.fire_chance;
    let shooters: Vec<Rect> = state
        .entities
        .enemies
        .iter()
        .filter(|e| e.active)
        .filter(|_| rng.gen_bool(chance))
        .map(|e| e.rect)
        .collect();
    for rect in shooters {
        push_enemy_bullet(state, &rect);
    }
}

/// One random active enemy per queued volley. Volleys queued while no enemy
/// is alive are dropped.
fn fire_queued_volleys(state: &mut GameState, rng: &mut impl Rng) {
    let volleys = std::mem::take(&mut state.pending_volleys);
    for _ in 0..volleys {
        let shooter = state
            .entities
            .enemies
            .iter()
            .filter(|e| e.active)
            .map(|e| e.rect)
            .collect::<Vec<_>>()
            .choose(rng)
            .copied();
        match shooter {
            Some(rect) => push_enemy_bullet(state, &rect),
            None => break,
        }
    }
}

fn push_enemy_bullet(state: &mut GameState, shooter: &Rect) {
    let enemy = &state.config.tuning.enemy;
    state.entities.enemy_bullets.push(Bullet {
        rect: Rect::new(
            shooter.center_x() - enemy.bullet_width / 2.0,
            shooter.bottom(),
            enemy.bullet_width,
            enemy.bullet_height,
        ),
        vy: state.difficulty.enemy_bullet_speed,
        active: true,
    });
}
