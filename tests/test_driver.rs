use std::collections::VecDeque;
use std::time::Duration;

use arcade_shooter::compute::init_state;
use arcade_shooter::config::GameConfig;
use arcade_shooter::driver::Driver;
use arcade_shooter::entities::*;
use arcade_shooter::error::ConfigError;
use arcade_shooter::input::{Command, InputSnapshot, Intent};
use arcade_shooter::persistence::MemoryHighScoreStore;
use arcade_shooter::ports::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Fakes ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingFrontend {
    /// Enemy rects as seen by each draw call.
    drawn: Vec<Vec<Rect>>,
    lines: Vec<ScoreLine>,
    outcomes: Vec<Outcome>,
}

impl Renderer for RecordingFrontend {
    fn draw(&mut self, state: &GameState) {
        self.drawn
            .push(state.entities.enemies.iter().map(|e| e.rect).collect());
    }
}

impl Scoreboard for RecordingFrontend {
    fn show(&mut self, line: ScoreLine) {
        self.lines.push(line);
    }
}

impl Signal for RecordingFrontend {
    fn notify(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }
}

/// Replays one batch of commands per frame, then quits.
struct ScriptedInput {
    script: VecDeque<Vec<Command>>,
    held: InputSnapshot,
}

impl InputSource for ScriptedInput {
    fn snapshot(&mut self) -> InputSnapshot {
        self.held
    }

    fn commands(&mut self) -> Vec<Command> {
        self.script.pop_front().unwrap_or_else(|| vec![Command::Quit])
    }
}

struct FixedClock {
    waits: usize,
}

impl FrameClock for FixedClock {
    fn wait_next_frame(&mut self) -> Duration {
        self.waits += 1;
        Duration::from_millis(16)
    }
}

fn quiet_config(mode: GameMode) -> GameConfig {
    let mut config = GameConfig::new(800.0, 600.0, mode);
    config.tuning.enemy.fire_chance = 0.0;
    config.tuning.power_up.drop_chance = 0.0;
    config
}

fn driver(mode: GameMode) -> Driver<StdRng, MemoryHighScoreStore> {
    Driver::new(
        quiet_config(mode),
        StdRng::seed_from_u64(42),
        MemoryHighScoreStore::default(),
    )
    .expect("valid config")
}

fn resume(state: GameState) -> Driver<StdRng, MemoryHighScoreStore> {
    Driver::from_state(
        state,
        StdRng::seed_from_u64(42),
        MemoryHighScoreStore::default(),
    )
    .expect("valid config")
}

const DT: Duration = Duration::from_millis(16);

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn high_score_loaded_from_store() {
    let store = MemoryHighScoreStore {
        value: Some(500),
        saves: 0,
    };
    let d = Driver::new(quiet_config(GameMode::Wave), StdRng::seed_from_u64(1), store)
        .expect("valid config");
    assert_eq!(d.state().high_score, 500);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut config = quiet_config(GameMode::Wave);
    config.tuning.enemy.fire_chance = 1.5;
    let err = Driver::new(
        config,
        StdRng::seed_from_u64(42),
        MemoryHighScoreStore::default(),
    )
    .err();
    assert_eq!(
        err,
        Some(ConfigError::ProbabilityOutOfRange {
            name: "enemy fire chance",
            value: 1.5,
        })
    );

    let mut state = init_state(quiet_config(GameMode::Wave), 0);
    state.config.tuning.enemy.width = -30.0;
    let err = Driver::from_state(
        state,
        StdRng::seed_from_u64(42),
        MemoryHighScoreStore::default(),
    )
    .err();
    assert!(matches!(err, Some(ConfigError::Geometry { name: "enemy", .. })));
}

#[test]
fn empty_store_means_zero() {
    assert_eq!(driver(GameMode::Wave).state().high_score, 0);
}

// ── Frame ordering ────────────────────────────────────────────────────────────

#[test]
fn draw_sees_post_movement_positions() {
    let mut d = driver(GameMode::Wave);
    let mut front = RecordingFrontend::default();
    let idle = InputSnapshot::default();

    d.frame(&idle, DT, &mut front); // spawns the first wave after drawing
    let spawned: Vec<Rect> = d.state().entities.enemies.iter().map(|e| e.rect).collect();
    assert_eq!(spawned.len(), 5);
    assert!(front.drawn[0].is_empty());

    d.frame(&idle, DT, &mut front);
    let expected: Vec<Rect> = spawned
        .iter()
        .map(|r| Rect { y: r.y + 0.5, ..*r })
        .collect();
    assert_eq!(front.drawn[1], expected);
    assert_eq!(front.lines.len(), 2);
}

#[test]
fn paused_frames_draw_but_do_not_simulate() {
    let mut d = driver(GameMode::Wave);
    let mut front = RecordingFrontend::default();
    d.frame(&InputSnapshot::default(), DT, &mut front);

    assert!(d.apply(Command::TogglePause, &mut front));
    let before = d.state().clone();
    for _ in 0..5 {
        d.frame(&InputSnapshot::default().with(Intent::Right), DT, &mut front);
    }
    assert_eq!(d.state(), &before);
    assert_eq!(front.drawn.len(), 6);
    assert_eq!(front.lines.len(), 6);

    d.apply(Command::TogglePause, &mut front);
    d.frame(&InputSnapshot::default(), DT, &mut front);
    assert_eq!(d.state().frame, before.frame + 1);
}

// ── Events reach the collaborators ────────────────────────────────────────────

#[test]
fn new_high_score_is_saved() {
    let mut state = init_state(quiet_config(GameMode::Wave), 0);
    state.entities.bullets.push(Bullet {
        rect: Rect::new(100.0, 110.0, 5.0, 10.0),
        vy: -3.0,
        active: true,
    });
    state.entities.enemies.push(Enemy {
        rect: Rect::new(98.0, 105.0, 30.0, 20.0),
        variant: EnemyVariant::FreeFall,
        active: true,
    });
    let mut d = resume(state);
    let mut front = RecordingFrontend::default();
    d.frame(&InputSnapshot::default(), DT, &mut front);

    assert_eq!(d.store().value, Some(10));
    assert_eq!(d.store().saves, 1);
    assert_eq!(
        front.lines.last().copied(),
        Some(ScoreLine { score: 10, high_score: 10, lives: 3, level: 1 })
    );
}

#[test]
fn final_hit_signals_loss_once() {
    let mut state = init_state(quiet_config(GameMode::Wave), 0);
    state.player.lives = 1;
    state.entities.enemy_bullets.push(Bullet {
        rect: Rect::new(390.0, 545.0, 5.0, 10.0),
        vy: 2.0,
        active: true,
    });
    let mut d = resume(state);
    let mut front = RecordingFrontend::default();
    for _ in 0..3 {
        d.frame(&InputSnapshot::default(), DT, &mut front);
    }
    assert_eq!(d.state().status, GameStatus::Lost);
    assert_eq!(front.outcomes, vec![Outcome::Lost]);
    assert_eq!(d.store().saves, 0);
}

#[test]
fn end_game_command_signals_loss() {
    let mut d = driver(GameMode::Wave);
    let mut front = RecordingFrontend::default();
    d.apply(Command::EndGame, &mut front);
    d.frame(&InputSnapshot::default(), DT, &mut front);
    d.apply(Command::EndGame, &mut front);
    assert_eq!(front.outcomes, vec![Outcome::Lost]);
}

#[test]
fn cleared_formation_signals_win() {
    let mut d = driver(GameMode::Formation);
    let mut front = RecordingFrontend::default();
    d.frame(&InputSnapshot::default(), DT, &mut front);
    assert_eq!(d.state().entities.enemies.len(), 24);

    let mut state = d.state().clone();
    state.entities.enemies.clear();
    let mut d = resume(state);
    d.frame(&InputSnapshot::default(), DT, &mut front);
    assert_eq!(d.state().status, GameStatus::Won);
    assert_eq!(front.outcomes, vec![Outcome::Won]);
}

// ── Formation fire timer ──────────────────────────────────────────────────────

#[test]
fn formation_fires_once_per_interval() {
    let mut d = driver(GameMode::Formation);
    let mut front = RecordingFrontend::default();
    let quarter = Duration::from_millis(250);

    for _ in 0..3 {
        d.frame(&InputSnapshot::default(), quarter, &mut front);
    }
    assert!(d.state().entities.enemy_bullets.is_empty());

    d.frame(&InputSnapshot::default(), quarter, &mut front);
    assert_eq!(d.state().entities.enemy_bullets.len(), 1);
    assert_eq!(d.state().pending_volleys, 0);
}

#[test]
fn wave_mode_ignores_the_timer() {
    let mut d = driver(GameMode::Wave);
    let mut front = RecordingFrontend::default();
    d.frame(&InputSnapshot::default(), Duration::from_secs(5), &mut front);
    assert!(d.state().entities.enemy_bullets.is_empty());
    assert_eq!(d.state().pending_volleys, 0);
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[test]
fn run_until_quit() {
    let mut d = driver(GameMode::Wave);
    let mut front = RecordingFrontend::default();
    let mut input = ScriptedInput {
        script: VecDeque::from(vec![vec![], vec![], vec![Command::TogglePause], vec![]]),
        held: InputSnapshot::default().with(Intent::Left),
    };
    let mut clock = FixedClock { waits: 0 };

    d.run(&mut input, &mut front, &mut clock);

    assert_eq!(front.drawn.len(), 4);
    assert_eq!(clock.waits, 4);
    // Two active frames before the pause, then frozen.
    assert_eq!(d.state().frame, 2);
    assert_eq!(d.state().status, GameStatus::Paused);
    assert_eq!(d.state().player.rect.x, 355.0);
}

#[test]
fn restart_command_resets_session() {
    let mut d = driver(GameMode::Wave);
    let mut front = RecordingFrontend::default();
    for _ in 0..10 {
        d.frame(&InputSnapshot::default().with(Intent::Fire), DT, &mut front);
    }
    d.apply(Command::Restart, &mut front);
    assert_eq!(d.state().frame, 0);
    assert!(d.state().entities.is_empty());
    assert_eq!(d.state().status, GameStatus::Running);
    assert!(!d.apply(Command::Quit, &mut front));
}
