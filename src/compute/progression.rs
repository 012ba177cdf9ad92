//! Session state machine: pause, level-ups and the two terminal outcomes.
//!
//! ```text
//! Running ⇄ Paused
//! Running → Won   (formation cleared)
//! Running → Lost  (no lives left, formation landed, or forfeit)
//! ```

use rand::Rng;
use tracing::info;

use super::spawner;
use crate::entities::{FrameEvent, GameMode, GameState, GameStatus};

/// Terminal and level checks after the collision passes.
pub fn check(state: &mut GameState, rng: &mut impl Rng) {
    if state.status != GameStatus::Running {
        return;
    }
    if !state.player.alive || state.player.lives == 0 {
        lose(state);
        return;
    }

    match state.mode() {
        GameMode::Formation => {
            if state.formation_built && state.entities.active_enemies() == 0 {
                win(state);
            } else if formation_landed(state) {
                lose(state);
            }
        }
        GameMode::Wave => {
            if reached_next_level(state) {
                level_up(state, rng);
            }
        }
    }
}

fn reached_next_level(state: &GameState) -> bool {
    let threshold = u64::from(state.level)
        * u64::from(state.config.tuning.difficulty.points_per_level);
    u64::from(state.score) >= threshold
}

/// The grid reaching the bottom of the canvas ends the game.
fn formation_landed(state: &GameState) -> bool {
    let height = state.config.height;
    state
        .entities
        .enemies
        .iter()
        .any(|e| e.active && e.rect.bottom() >= height)
}

/// Faster enemies and bullets, a bigger wave, and that wave right away.
pub fn level_up(state: &mut GameState, rng: &mut impl Rng) {
    let tuning = state.config.tuning.difficulty;
    state.level += 1;
    state.difficulty.enemy_speed += tuning.speed_step;
    state.difficulty.bullet_speed += tuning.speed_step;
    state.difficulty.enemy_bullet_speed += tuning.speed_step;
    state.difficulty.max_enemies += tuning.max_enemies_step;

    info!(
        level = state.level,
        enemy_speed = state.difficulty.enemy_speed,
        max_enemies = state.difficulty.max_enemies,
        "level up"
    );
    state.events.push(FrameEvent::LevelUp { level: state.level });
    spawner::spawn_wave(state, rng);
}

fn win(state: &mut GameState) {
    state.status = GameStatus::Won;
    info!(score = state.score, frame = state.frame, "formation cleared");
    state.events.push(FrameEvent::Won);
}

fn lose(state: &mut GameState) {
    state.status = GameStatus::Lost;
    state.player.alive = false;
    info!(score = state.score, level = state.level, "game over");
    state.events.push(FrameEvent::Lost);
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Running ⇄ Paused. Finished games ignore it.
pub fn toggle_pause(state: &mut GameState) {
    state.status = match state.status {
        GameStatus::Running => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Running,
        terminal => terminal,
    };
}

/// Give up the current game. No effect once it is already over.
pub fn forfeit(state: &mut GameState) {
    if !state.status.is_terminal() {
        lose(state);
    }
}
