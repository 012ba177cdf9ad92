mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use arcade_shooter::config::GameConfig;
use arcade_shooter::driver::Driver;
use arcade_shooter::entities::GameMode;
use arcade_shooter::input::{Command, InputSnapshot, Intent};
use arcade_shooter::persistence::{default_score_path, FileHighScoreStore};
use arcade_shooter::ports::{FrameClock, InputSource};

use crate::display::TerminalFrontend;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "arcade_shooter")]
#[command(about = "Shoot down descending enemies before they shoot you")]
struct Args {
    /// Enemy behaviour for the whole session
    #[arg(long, value_enum, default_value_t = ModeArg::Wave)]
    mode: ModeArg,

    /// Seed for enemy spawns and fire (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Where tracing output goes; the terminal itself is taken by the game
    #[arg(long, default_value = "arcade_shooter.log")]
    log_file: PathBuf,

    /// High-score file (defaults to ~/.arcade_shooter_score)
    #[arg(long)]
    score_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Wave,
    Formation,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Wave => GameMode::Wave,
            ModeArg::Formation => GameMode::Formation,
        }
    }
}

// ── Held-key input ────────────────────────────────────────────────────────────

/// Min frames between shots while Space is held.
/// 12 frames @ 60 FPS = 5 shots/sec.
const SHOOT_COOLDOWN: u32 = 12;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms at
/// 60 FPS) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

fn intent_for(code: &KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Intent::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Intent::Right),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Intent::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Intent::Down),
        KeyCode::Char(' ') => Some(Intent::Fire),
        _ => None,
    }
}

fn command_for(code: &KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(Command::EndGame),
        _ => None,
    }
}

/// Input model: instead of acting on each key event individually, we keep a
/// `key_frame` map with the frame number of the last press/repeat event for
/// every key. Each frame the keys that are still "fresh" (within
/// `HOLD_WINDOW` frames) become the snapshot, so Space + A/D can be held at
/// the same time. Mouse presses stand in for touch: the pressed quadrant of
/// the screen is held until release.
struct KeyboardInput {
    rx: mpsc::Receiver<Event>,
    key_frame: HashMap<KeyCode, u64>,
    touch: Option<InputSnapshot>,
    frame: u64,
    shoot_cooldown: u32,
    cols: u16,
    rows: u16,
}

impl KeyboardInput {
    fn new(rx: mpsc::Receiver<Event>, cols: u16, rows: u16) -> Self {
        Self {
            rx,
            key_frame: HashMap::new(),
            touch: None,
            frame: 0,
            shoot_cooldown: 0,
            cols,
            rows,
        }
    }

    fn is_held(&self, last: u64) -> bool {
        self.frame.saturating_sub(last) <= HOLD_WINDOW
    }
}

impl InputSource for KeyboardInput {
    /// Drains all pending terminal events (non-blocking).
    fn commands(&mut self) -> Vec<Command> {
        self.frame += 1;
        let mut commands = Vec::new();

        while let Ok(ev) = self.rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        if let Some(command) = command_for(&code, modifiers) {
                            commands.push(command);
                        }
                        self.key_frame.insert(code, self.frame);
                    }
                    KeyEventKind::Repeat => {
                        self.key_frame.insert(code, self.frame);
                    }
                    // Keyboard-enhancement terminals report releases.
                    KeyEventKind::Release => {
                        self.key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => match kind {
                    MouseEventKind::Down(_) | MouseEventKind::Drag(_) => {
                        self.touch = Some(InputSnapshot::from_touch(
                            f32::from(column),
                            f32::from(row),
                            f32::from(self.cols),
                            f32::from(self.rows),
                        ));
                    }
                    MouseEventKind::Up(_) => self.touch = None,
                    _ => {}
                },
                Event::Resize(cols, rows) => {
                    self.cols = cols;
                    self.rows = rows;
                }
                _ => {}
            }
        }
        commands
    }

    fn snapshot(&mut self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        for (code, &last) in &self.key_frame {
            if !self.is_held(last) {
                continue;
            }
            if let Some(intent) = intent_for(code) {
                snapshot.set(intent, true);
            }
        }
        if let Some(touch) = self.touch {
            snapshot = snapshot.merge(touch);
        }

        // Throttle so holding Space doesn't fire every frame.
        if snapshot.fire && self.shoot_cooldown == 0 {
            self.shoot_cooldown = SHOOT_COOLDOWN;
        } else {
            snapshot.fire = false;
        }
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        snapshot
    }
}

// ── Frame clock ───────────────────────────────────────────────────────────────

struct SleepClock {
    frame: Duration,
    last: Instant,
}

impl SleepClock {
    fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last: Instant::now(),
        }
    }
}

impl FrameClock for SleepClock {
    fn wait_next_frame(&mut self) -> Duration {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame {
            thread::sleep(self.frame - elapsed);
        }
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        dt
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_target(false)
            .with_ansi(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&args, &mut out, rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(args: &Args, out: &mut W, rx: mpsc::Receiver<Event>) -> Result<()> {
    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let (width, height) = display::canvas_size(cols, rows);
    let config = GameConfig::new(width, height, args.mode.into());

    let seed = args.seed.unwrap_or_else(rand::random);
    let score_path = args.score_file.clone().unwrap_or_else(default_score_path);
    info!(seed, cols, rows, mode = ?args.mode, score_file = %score_path.display(), "starting");

    let store = FileHighScoreStore::new(score_path);
    let mut driver = Driver::new(config, StdRng::seed_from_u64(seed), store)
        .with_context(|| format!("invalid game configuration for a {cols}x{rows} terminal"))?;
    let mut input = KeyboardInput::new(rx, cols, rows);
    let mut frontend = TerminalFrontend::new(out, cols, rows);
    let mut clock = SleepClock::new(args.fps);

    driver.run(&mut input, &mut frontend, &mut clock);

    if let Some(err) = frontend.take_error() {
        return Err(err).context("drawing to the terminal");
    }
    Ok(())
}
