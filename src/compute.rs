//! Pure game-logic functions.
//!
//! Every public function here takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`. Side effects are limited to the injected RNG. The stage
//! modules below do the actual work on a private copy.
//!
//! A tick is split in two so a renderer can draw between them:
//! `advance` (movement) and `resolve` (collisions, progression, enemy fire,
//! respawn). `tick` runs both back to back.

pub mod collision;
pub mod movement;
pub mod progression;
pub mod spawner;

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus, Player};
use crate::input::InputSnapshot;
use crate::store::EntityStore;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state. Enemies appear on the first tick.
///
/// `config` must pass `GameConfig::validate`; `Driver::new` checks it.
pub fn init_state(config: GameConfig, high_score: u32) -> GameState {
    let difficulty = config.tuning.difficulty.initial;
    GameState {
        player: Player::spawn(&config),
        entities: EntityStore::new(),
        score: 0,
        high_score,
        level: 1,
        status: GameStatus::Running,
        difficulty,
        frame: 0,
        march_dir: 1.0,
        formation_built: false,
        pending_volleys: 0,
        events: Vec::new(),
        config,
    }
}

/// Fresh session with the same configuration; only the high score survives.
pub fn restart(state: &GameState) -> GameState {
    init_state(state.config.clone(), state.high_score)
}

// ── Session commands ─────────────────────────────────────────────────────────

pub fn toggle_pause(state: &GameState) -> GameState {
    let mut next = state.clone();
    progression::toggle_pause(&mut next);
    next
}

pub fn end_game(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    progression::forfeit(&mut next);
    next
}

/// Queue `volleys` enemy shots for the next tick (formation fire timer).
pub fn queue_volleys(state: &GameState, volleys: u32) -> GameState {
    GameState {
        pending_volleys: state.pending_volleys.saturating_add(volleys),
        ..state.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Movement half of a tick. A paused or finished game comes back unchanged.
pub fn advance(state: &GameState, input: &InputSnapshot) -> GameState {
    if state.status != GameStatus::Running {
        return state.clone();
    }
    let mut next = state.clone();
    next.events.clear();
    next.frame += 1;
    movement::step(&mut next, input);
    next
}

/// Everything after movement: collisions, level/terminal checks, enemy fire
/// and respawn. All randomness comes through `rng` so callers control
/// determinism (tests use a seeded RNG).
pub fn resolve(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Running {
        return state.clone();
    }
    let mut next = state.clone();
    collision::resolve(&mut next, rng);
    progression::check(&mut next, rng);
    if next.status == GameStatus::Running {
        spawner::enemy_fire(&mut next, rng);
        spawner::replenish(&mut next, rng);
    }
    next
}

/// Advance the simulation by one frame.
pub fn tick(state: &GameState, input: &InputSnapshot, rng: &mut impl Rng) -> GameState {
    resolve(&advance(state, input), rng)
}
