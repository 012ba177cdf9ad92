//! Terminal frontend. All terminal output lives here.
//!
//! `TerminalFrontend` is the Renderer, Scoreboard and Signal for the
//! terminal build. Canvas coordinates are scaled onto character cells; no
//! game logic is performed here.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use tracing::warn;

use arcade_shooter::entities::{GameState, GameStatus, Rect};
use arcade_shooter::ports::{Outcome, Renderer, ScoreLine, Scoreboard, Signal};

// ── Canvas ↔ cell mapping ─────────────────────────────────────────────────────

/// Canvas units per terminal column.
pub const CELL_W: f32 = 10.0;
/// Canvas units per terminal row (cells are roughly twice as tall as wide).
pub const CELL_H: f32 = 20.0;

/// Rows used by the HUD, the two border bars and the hint line.
const CHROME_ROWS: u16 = 4;

/// Canvas size that fills the playfield of a `cols`×`rows` terminal.
pub fn canvas_size(cols: u16, rows: u16) -> (f32, f32) {
    (
        f32::from(cols.saturating_sub(2)) * CELL_W,
        f32::from(rows.saturating_sub(CHROME_ROWS)) * CELL_H,
    )
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::Green;
const C_ENEMY: Color = Color::Cyan;
const C_BULLET_PLAYER: Color = Color::Red;
const C_BULLET_ENEMY: Color = Color::Yellow;
const C_POWER_UP: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

pub struct TerminalFrontend<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    banner: Option<Outcome>,
    /// First I/O failure; the game keeps running and `main` reports it.
    error: Option<io::Error>,
}

impl<W: Write> TerminalFrontend<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            banner: None,
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            if self.error.is_none() {
                warn!(%err, "terminal write failed");
                self.error = Some(err);
            }
        }
    }

    fn field_cols(&self) -> u16 {
        self.cols.saturating_sub(2)
    }

    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(CHROME_ROWS)
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    fn draw_frame(&mut self, state: &GameState) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border()?;

        for enemy in &state.entities.enemies {
            self.fill(&enemy.rect, "▼", C_ENEMY)?;
        }
        for power_up in &state.entities.power_ups {
            self.fill(&power_up.rect, "♥", C_POWER_UP)?;
        }
        for bullet in &state.entities.bullets {
            self.fill(&bullet.rect, "║", C_BULLET_PLAYER)?;
        }
        for bullet in &state.entities.enemy_bullets {
            self.fill(&bullet.rect, "↓", C_BULLET_ENEMY)?;
        }
        let ship = if state.player.alive { "█" } else { "░" };
        self.fill(&state.player.rect, ship, C_PLAYER)?;

        self.draw_controls_hint()?;

        match (state.status, self.banner) {
            (GameStatus::Paused, _) => self.draw_box(&["PAUSED", "P - Resume"], Color::White)?,
            (GameStatus::Won | GameStatus::Lost, Some(outcome)) => {
                self.draw_game_over(state, outcome)?
            }
            _ => {}
        }
        Ok(())
    }

    /// Paint every cell the rectangle touches, clipped to the playfield.
    fn fill(&mut self, rect: &Rect, glyph: &str, color: Color) -> io::Result<()> {
        let Some((c0, r0, c1, r1)) = self.cell_span(rect) else {
            return Ok(());
        };
        self.out.queue(style::SetForegroundColor(color))?;
        let line = glyph.repeat(usize::from(c1 - c0));
        for row in r0..r1 {
            self.out.queue(cursor::MoveTo(c0 + 1, row + 2))?;
            self.out.queue(Print(&line))?;
        }
        Ok(())
    }

    fn cell_span(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let clip = |v: f32, max: u16| v.clamp(0.0, f32::from(max)) as u16;
        let (cols, rows) = (self.field_cols(), self.field_rows());
        let c0 = clip((rect.x / CELL_W).floor(), cols);
        let c1 = clip((rect.right() / CELL_W).ceil(), cols);
        let r0 = clip((rect.y / CELL_H).floor(), rows);
        let r1 = clip((rect.bottom() / CELL_H).ceil(), rows);
        (c0 < c1 && r0 < r1).then_some((c0, r0, c1, r1))
    }

    // ── Border ────────────────────────────────────────────────────────────────

    fn draw_border(&mut self) -> io::Result<()> {
        let w = usize::from(self.field_cols());
        let bottom = self.rows.saturating_sub(2);

        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(0, 1))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
        self.out.queue(cursor::MoveTo(0, bottom))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

        for row in 2..bottom {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(self.cols.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    // ── HUD (row 0) ───────────────────────────────────────────────────────────

    fn draw_hud(&mut self, line: ScoreLine) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        self.out.queue(Print(format!(
            "Score:{:>6}  Hi:{:>6}",
            line.score, line.high_score
        )))?;

        let level_str = format!("[ LEVEL {} ]", line.level);
        let lx = (self.cols / 2).saturating_sub(level_str.len() as u16 / 2);
        self.out.queue(cursor::MoveTo(lx, 0))?;
        self.out.queue(style::SetForegroundColor(Color::White))?;
        self.out.queue(Print(&level_str))?;

        let lives_str = format!("Lives:{}", "♥".repeat(usize::from(line.lives)));
        let rx = self
            .cols
            .saturating_sub(lives_str.chars().count() as u16 + 1);
        self.out.queue(cursor::MoveTo(rx, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
        self.out.queue(Print(&lives_str))?;
        Ok(())
    }

    // ── Controls hint (last row) ──────────────────────────────────────────────

    fn draw_controls_hint(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, self.rows.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(
            "←↑→↓ / WASD : Move   SPACE : Shoot   P : Pause   R : Restart   E : End   Q : Quit",
        ))?;
        Ok(())
    }

    // ── Overlays ──────────────────────────────────────────────────────────────

    fn draw_game_over(&mut self, state: &GameState, outcome: Outcome) -> io::Result<()> {
        let (title, color) = match outcome {
            Outcome::Won => ("YOU  WIN", Color::Green),
            Outcome::Lost => ("GAME  OVER", Color::Red),
        };
        let score_line = format!("Final Score: {:>6}", state.score);
        let best_line = if state.score >= state.high_score && state.score > 0 {
            format!("★ NEW BEST: {:>6} ★", state.high_score)
        } else {
            format!("Best Score:  {:>6}", state.high_score)
        };
        self.draw_box(
            &[title, score_line.as_str(), best_line.as_str(), "R - Play Again  Q - Quit"],
            color,
        )
    }

    fn draw_box(&mut self, lines: &[&str], color: Color) -> io::Result<()> {
        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
        let cx = self.cols / 2;
        let start_row = (self.rows / 2).saturating_sub((lines.len() as u16 + 2) / 2);

        let mut rows = Vec::with_capacity(lines.len() + 2);
        rows.push(format!("╔{}╗", "═".repeat(inner)));
        for line in lines {
            rows.push(format!("║{:^width$}║", line, width = inner));
        }
        rows.push(format!("╚{}╝", "═".repeat(inner)));

        self.out.queue(style::SetForegroundColor(color))?;
        for (i, row) in rows.iter().enumerate() {
            let col = cx.saturating_sub(row.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            self.out.queue(Print(row))?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalFrontend<W> {
    fn draw(&mut self, state: &GameState) {
        if state.status == GameStatus::Running {
            self.banner = None;
        }
        let result = self.draw_frame(state);
        self.record(result);
    }
}

impl<W: Write> Scoreboard for TerminalFrontend<W> {
    /// Last thing drawn each frame, so it also flushes.
    fn show(&mut self, line: ScoreLine) {
        let result = self.draw_hud(line).and_then(|()| {
            self.out.queue(style::ResetColor)?;
            self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
            self.out.flush()
        });
        self.record(result);
    }
}

impl<W: Write> Signal for TerminalFrontend<W> {
    /// Non-blocking: the overlay appears on the next frame.
    fn notify(&mut self, outcome: Outcome) {
        self.banner = Some(outcome);
    }
}
