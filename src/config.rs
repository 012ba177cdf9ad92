//! Gameplay tuning and per-session configuration.
//!
//! Keep this separate from runtime options of the terminal binary (frame
//! rate, file paths); those live in `main.rs`.

use std::time::Duration;

use crate::entities::{Difficulty, GameMode, Rect};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Canvas units moved per tick while a direction is held.
    pub speed: f32,
    /// Distance from the canvas bottom to the top edge of a freshly spawned ship.
    pub bottom_offset: f32,
    pub max_lives: u8,
    pub bullet_width: f32,
    pub bullet_height: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 30.0,
            speed: 10.0,
            bottom_offset: 50.0,
            max_lives: 3,
            bullet_width: 5.0,
            bullet_height: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTuning {
    pub width: f32,
    pub height: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Wave mode: chance that an active enemy fires on a given tick.
    pub fire_chance: f64,
    /// Wave mode: fresh enemies start up to this far above the visible area.
    pub spawn_band: f32,
    pub points: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 20.0,
            bullet_width: 5.0,
            bullet_height: 10.0,
            fire_chance: 0.02,
            spawn_band: 100.0,
            points: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationTuning {
    pub rows: u8,
    pub cols: u8,
    pub padding: f32,
    pub offset_top: f32,
    pub offset_left: f32,
    /// Lateral distance covered per tick.
    pub march_speed: f32,
    /// Wall-clock time between volleys.
    pub fire_interval: Duration,
}

impl Default for FormationTuning {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 8,
            padding: 10.0,
            offset_top: 40.0,
            offset_left: 40.0,
            march_speed: 1.0,
            fire_interval: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpTuning {
    pub width: f32,
    pub height: f32,
    pub drift_speed: f32,
    /// Chance that a destroyed enemy leaves a power-up behind.
    pub drop_chance: f64,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            drift_speed: 1.0,
            drop_chance: 0.1,
        }
    }
}

/// Level 1 values and the per-level increments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyTuning {
    pub initial: Difficulty,
    pub speed_step: f32,
    pub max_enemies_step: u32,
    pub points_per_level: u32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            initial: Difficulty {
                enemy_speed: 0.5,
                bullet_speed: 3.0,
                enemy_bullet_speed: 2.0,
                max_enemies: 5,
            },
            speed_step: 0.25,
            max_enemies_step: 2,
            points_per_level: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub formation: FormationTuning,
    pub power_up: PowerUpTuning,
    pub difficulty: DifficultyTuning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub mode: GameMode,
    pub tuning: Tuning,
}

impl GameConfig {
    pub fn new(width: f32, height: f32, mode: GameMode) -> Self {
        Self {
            width,
            height,
            mode,
            tuning: Tuning::default(),
        }
    }

    /// Width of the formation grid from its first column to its last.
    pub fn formation_span(&self) -> f32 {
        let f = &self.tuning.formation;
        let cols = f32::from(f.cols);
        cols * (self.tuning.enemy.width + f.padding) - f.padding
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(ConfigError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }

        let t = &self.tuning;
        for (name, width, height) in [
            ("player", t.player.width, t.player.height),
            ("player bullet", t.player.bullet_width, t.player.bullet_height),
            ("enemy", t.enemy.width, t.enemy.height),
            ("enemy bullet", t.enemy.bullet_width, t.enemy.bullet_height),
            ("power-up", t.power_up.width, t.power_up.height),
        ] {
            Rect::try_new(0.0, 0.0, width, height)
                .map_err(|source| ConfigError::Geometry { name, source })?;
        }
        let d = &t.difficulty.initial;
        for (name, value) in [
            ("player speed", t.player.speed),
            ("march speed", t.formation.march_speed),
            ("power-up drift speed", t.power_up.drift_speed),
            ("enemy speed", d.enemy_speed),
            ("bullet speed", d.bullet_speed),
            ("enemy bullet speed", d.enemy_bullet_speed),
            ("speed step", t.difficulty.speed_step),
            ("formation padding", t.formation.padding),
            ("formation top offset", t.formation.offset_top),
            ("formation left offset", t.formation.offset_left),
            ("spawn band", t.enemy.spawn_band),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeTuning { name, value });
            }
        }
        if !t.player.bottom_offset.is_finite() || t.player.bottom_offset < t.player.height {
            return Err(ConfigError::PlayerBelowCanvas {
                bottom_offset: t.player.bottom_offset,
                height: t.player.height,
            });
        }

        let mut min_width = t.player.width.max(t.enemy.width + 1.0);
        let mut min_height = t.player.bottom_offset;
        if self.mode == GameMode::Formation {
            let f = &t.formation;
            let rows = f32::from(f.rows);
            min_width = min_width.max(f.offset_left + self.formation_span());
            min_height = min_height.max(f.offset_top + rows * (t.enemy.height + f.padding));
        }
        if self.width < min_width || self.height < min_height {
            return Err(ConfigError::CanvasTooSmall {
                width: self.width,
                height: self.height,
                min_width,
                min_height,
            });
        }

        if t.formation.fire_interval.is_zero() {
            return Err(ConfigError::ZeroFireInterval);
        }
        for (name, value) in [
            ("enemy fire chance", t.enemy.fire_chance),
            ("power-up drop chance", t.power_up.drop_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        Ok(())
    }
}
