//! Collaborators the core talks to. None of them can fail the simulation:
//! the core reads from them or fires and forgets.

use std::time::Duration;

use crate::entities::GameState;
use crate::input::{Command, InputSnapshot};

pub trait InputSource {
    /// Intents held right now.
    fn snapshot(&mut self) -> InputSnapshot;
    /// Commands received since the last call.
    fn commands(&mut self) -> Vec<Command>;
}

pub trait Renderer {
    fn draw(&mut self, state: &GameState);
}

/// Values shown next to the playfield every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreLine {
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    pub level: u32,
}

impl From<&GameState> for ScoreLine {
    fn from(state: &GameState) -> Self {
        Self {
            score: state.score,
            high_score: state.high_score,
            lives: state.player.lives,
            level: state.level,
        }
    }
}

pub trait Scoreboard {
    fn show(&mut self, line: ScoreLine);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

pub trait Signal {
    fn notify(&mut self, outcome: Outcome);
}

/// A single persisted integer. A store with nothing in it loads as 0.
pub trait HighScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, score: u32);
}

pub trait FrameClock {
    /// Block until the next frame is due; returns the time since the last call.
    fn wait_next_frame(&mut self) -> Duration;
}
