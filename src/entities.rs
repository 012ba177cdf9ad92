//! Game entity types: plain data plus rectangle geometry.

use crate::config::GameConfig;
use crate::error::GeometryError;
use crate::store::EntityStore;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in canvas units. Every entity is one of these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Checked constructor for values coming from outside the simulation.
    pub fn try_new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, GeometryError> {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if width < 0.0 || height < 0.0 {
            return Err(GeometryError::NegativeSize { width, height });
        }
        Ok(Self::new(x, y, width, height))
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Strict AABB overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True if the whole rectangle lies inside `[0,width]×[0,height]`.
    pub fn within(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

// ── Modes & status ────────────────────────────────────────────────────────────

/// Enemy behaviour for a whole session. Never mixed within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    /// Replenished batches that free-fall and fire with a per-tick chance.
    /// Score thresholds raise the level.
    Wave,
    /// One marching grid per game, interval fire, cleared grid wins.
    Formation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Paused,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub speed: f32,
    pub lives: u8,
    pub alive: bool,
}

impl Player {
    pub fn spawn(config: &GameConfig) -> Self {
        let tuning = &config.tuning.player;
        Self {
            rect: start_rect(config),
            speed: tuning.speed,
            lives: tuning.max_lives,
            alive: true,
        }
    }
}

/// Default player position: centred horizontally, fixed offset from the bottom.
pub fn start_rect(config: &GameConfig) -> Rect {
    let tuning = &config.tuning.player;
    Rect::new(
        config.width / 2.0 - tuning.width / 2.0,
        config.height - tuning.bottom_offset,
        tuning.width,
        tuning.height,
    )
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A projectile from either side. Which side fired it is given by the
/// collection it lives in; `vy` is negative for player shots.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    pub vy: f32,
    pub active: bool,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyVariant {
    FreeFall,
    Formation { row: u8, col: u8 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub variant: EnemyVariant,
    pub active: bool,
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Restores one life, up to the maximum.
    ExtraLife,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub active: bool,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Level-scaled parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
    pub enemy_speed: f32,
    pub bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    pub max_enemies: u32,
}

/// Things that happened during the last tick, drained by the loop driver.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    EnemyDestroyed { points: u32 },
    PowerUpDropped { kind: PowerUpKind },
    PlayerHit { lives_left: u8 },
    LifeRestored { lives: u8 },
    HighScore { score: u32 },
    LevelUp { level: u32 },
    WaveSpawned { count: u32 },
    FormationBuilt { count: u32 },
    Won,
    Lost,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so the update functions in `compute`
/// can return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub config: GameConfig,
    pub player: Player,
    pub entities: EntityStore,
    pub score: u32,
    /// Best score ever seen, loaded from the external store at startup.
    pub high_score: u32,
    pub level: u32,
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub frame: u64,
    /// Lateral march direction of the formation: `1.0` right, `-1.0` left.
    pub march_dir: f32,
    /// Set once the formation grid for the current game exists.
    pub formation_built: bool,
    /// Volleys queued by the fire timer, consumed on the next tick.
    pub pending_volleys: u32,
    pub events: Vec<FrameEvent>,
}

impl GameState {
    pub fn mode(&self) -> GameMode {
        self.config.mode
    }
}
