//! Game loop driver: sequences the stages once per frame and talks to the
//! collaborators in `ports`.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::compute;
use crate::config::GameConfig;
use crate::entities::{FrameEvent, GameMode, GameState, GameStatus};
use crate::error::ConfigError;
use crate::input::{Command, InputSnapshot};
use crate::ports::{
    FrameClock, HighScoreStore, InputSource, Outcome, Renderer, ScoreLine, Scoreboard, Signal,
};

// ── Fire timer ────────────────────────────────────────────────────────────────

/// Wall-clock interval timer for formation fire. Time is fed in from the
/// frame deltas so a seeded run with a fixed clock replays exactly.
#[derive(Debug, Clone)]
pub struct FireTimer {
    interval: Duration,
    elapsed: Duration,
}

impl FireTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Add `dt` and return how many intervals completed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

pub struct Driver<R, S> {
    state: GameState,
    rng: R,
    store: S,
    fire_timer: FireTimer,
}

impl<R: Rng, S: HighScoreStore> Driver<R, S> {
    /// Fails on an invalid config; the stages assume a validated one.
    pub fn new(config: GameConfig, rng: R, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let high_score = store.load();
        let fire_timer = FireTimer::new(config.tuning.formation.fire_interval);
        info!(mode = ?config.mode, high_score, "new session");
        Ok(Self {
            state: compute::init_state(config, high_score),
            rng,
            store,
            fire_timer,
        })
    }

    /// Resume from an existing state, e.g. a prepared scenario.
    pub fn from_state(state: GameState, rng: R, store: S) -> Result<Self, ConfigError> {
        state.config.validate()?;
        let fire_timer = FireTimer::new(state.config.tuning.formation.fire_interval);
        Ok(Self {
            state,
            rng,
            store,
            fire_timer,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply a session command. Returns `false` once the player asked to quit.
    pub fn apply<F: Signal>(&mut self, command: Command, signal: &mut F) -> bool {
        debug!(?command, "command");
        match command {
            Command::TogglePause => self.state = compute::toggle_pause(&self.state),
            Command::Restart => {
                self.state = compute::restart(&self.state);
                self.fire_timer.reset();
            }
            Command::EndGame => {
                self.state = compute::end_game(&self.state);
                self.dispatch_events(signal);
            }
            Command::Quit => return false,
        }
        true
    }

    /// One animation frame. Paused and finished games only redraw, so an
    /// unpause picks up exactly where the game stopped.
    pub fn frame<F>(&mut self, input: &InputSnapshot, dt: Duration, frontend: &mut F)
    where
        F: Renderer + Scoreboard + Signal,
    {
        if self.state.status == GameStatus::Running {
            if self.state.mode() == GameMode::Formation {
                let volleys = self.fire_timer.advance(dt);
                if volleys > 0 {
                    self.state = compute::queue_volleys(&self.state, volleys);
                }
            }
            self.state = compute::advance(&self.state, input);
            // Draw the post-movement positions the collision passes will see.
            frontend.draw(&self.state);
            self.state = compute::resolve(&self.state, &mut self.rng);
            self.dispatch_events(frontend);
        } else {
            frontend.draw(&self.state);
        }
        frontend.show(ScoreLine::from(&self.state));
    }

    /// `while !quit { frame(); wait_next_frame() }`
    pub fn run<I, F, C>(&mut self, input: &mut I, frontend: &mut F, clock: &mut C)
    where
        I: InputSource,
        F: Renderer + Scoreboard + Signal,
        C: FrameClock,
    {
        let mut dt = Duration::ZERO;
        loop {
            for command in input.commands() {
                if !self.apply(command, frontend) {
                    info!(score = self.state.score, "quit");
                    return;
                }
            }
            let snapshot = input.snapshot();
            self.frame(&snapshot, dt, frontend);
            dt = clock.wait_next_frame();
        }
    }

    fn dispatch_events<F: Signal>(&mut self, signal: &mut F) {
        let mut best = None;
        for event in &self.state.events {
            match event {
                FrameEvent::HighScore { score } => best = Some(*score),
                FrameEvent::Won => signal.notify(Outcome::Won),
                FrameEvent::Lost => signal.notify(Outcome::Lost),
                _ => {}
            }
        }
        if let Some(score) = best {
            self.store.save(score);
        }
    }
}
