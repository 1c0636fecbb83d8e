//! Terminal rasteriser for draw-command frames.
//!
//! The library hands over a `Frame` in arena pixels; this module scales it
//! onto the terminal grid and prints glyphs. No game logic lives here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use koukaton_shooter::consts::{GAME_WIDTH, HEIGHT, WIDTH};
use koukaton_shooter::entities::{Facing, Mood};
use koukaton_shooter::geometry::Rect;
use koukaton_shooter::hud::{HudCall, TextSize};
use koukaton_shooter::render::{DrawCall, Frame, Sprite};
use koukaton_shooter::GameStatus;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_PLAYER: Color = Color::White;
const C_PLAYER_INVINCIBLE: Color = Color::Yellow;
const C_PLAYER_CHEER: Color = Color::Green;
const C_PLAYER_HIT: Color = Color::Red;
const C_SHIELD: Color = Color::Blue;
const C_BEAM: Color = Color::Cyan;
const C_BOSS: Color = Color::Magenta;
const C_DISABLED: Color = Color::DarkGrey;
const C_EXPLOSION: [Color; 2] = [Color::Red, Color::Yellow];
const C_HINT: Color = Color::DarkGrey;
const ENEMY_SKINS: [Color; 3] = [Color::Green, Color::Red, Color::Magenta];

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb { r: c[0], g: c[1], b: c[2] }
}

/// Maps arena pixels (whole window, HUD included) to terminal cells.
struct Viewport {
    cols: u16,
    /// Rows available for the arena; the last terminal row holds the hint.
    rows: u16,
}

impl Viewport {
    fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(2),
            rows: rows.saturating_sub(1).max(2),
        }
    }

    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let col = (x / WIDTH * self.cols as f32).clamp(0.0, (self.cols - 1) as f32);
        let row = (y / HEIGHT * self.rows as f32).clamp(0.0, (self.rows - 1) as f32);
        (col as u16, row as u16)
    }

    /// Last column of the play area.
    fn play_edge(&self) -> u16 {
        self.cell(GAME_WIDTH, 0.0).0
    }

    fn span(&self, rect: &Rect) -> ((u16, u16), (u16, u16)) {
        let edge = self.play_edge().saturating_sub(1);
        let (c0, r0) = self.cell(rect.left(), rect.top());
        let (c1, r1) = self.cell(rect.right(), rect.bottom());
        ((c0.min(edge), r0), (c1.min(edge), r1))
    }
}

fn is_full_arena(rect: &Rect) -> bool {
    rect.w >= GAME_WIDTH && rect.h >= HEIGHT
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    frame: &Frame,
    status: GameStatus,
    score: u32,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let view = Viewport::new(cols, rows);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view, overlay_tint(frame))?;
    for call in &frame.play {
        draw_call(out, &view, call)?;
    }
    for call in &frame.hud {
        draw_hud_call(out, &view, call)?;
    }
    draw_controls_hint(out, rows)?;

    if status == GameStatus::GameOver {
        draw_game_over(out, &view, score)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Border colour reflecting the topmost full-arena overlay, if any.
fn overlay_tint(frame: &Frame) -> Color {
    frame
        .play
        .iter()
        .rev()
        .find_map(|call| match call.sprite {
            Sprite::Fill(c) if c[3] > 0 && is_full_arena(&call.dest) => {
                Some(if c[..3] == [0, 0, 0] { Color::DarkGrey } else { rgb([c[0], c[1], c[2]]) })
            }
            _ => None,
        })
        .unwrap_or(C_BORDER)
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport, color: Color) -> std::io::Result<()> {
    let edge = view.play_edge();
    out.queue(style::SetForegroundColor(color))?;
    for row in 0..view.rows {
        out.queue(cursor::MoveTo(edge, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── Play area ─────────────────────────────────────────────────────────────────

fn facing_glyph(facing: Facing) -> &'static str {
    let v = facing.vector();
    match (v.x, v.y) {
        (1, -1) => "↗",
        (0, -1) => "↑",
        (-1, -1) => "↖",
        (-1, 0) => "←",
        (-1, 1) => "↙",
        (0, 1) => "↓",
        (1, 1) => "↘",
        _ => "→",
    }
}

fn put<W: Write>(out: &mut W, at: (u16, u16), color: Color, glyph: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(at.0, at.1))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn fill<W: Write>(out: &mut W, view: &Viewport, rect: &Rect, color: Color, glyph: &str) -> std::io::Result<()> {
    let ((c0, r0), (c1, r1)) = view.span(rect);
    let row_text = glyph.repeat((c1 - c0.min(c1) + 1) as usize);
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1.max(r0) {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&row_text))?;
    }
    Ok(())
}

fn draw_call<W: Write>(out: &mut W, view: &Viewport, call: &DrawCall) -> std::io::Result<()> {
    let center = call.dest.center();
    let at = view.cell(center.x, center.y);
    match &call.sprite {
        Sprite::Shield { .. } => fill(out, view, &call.dest, C_SHIELD, "█"),
        Sprite::Player { facing, mood, invincible } => {
            let color = match mood {
                Mood::Hit => C_PLAYER_HIT,
                _ if *invincible => C_PLAYER_INVINCIBLE,
                Mood::Cheer => C_PLAYER_CHEER,
                Mood::Normal => C_PLAYER,
            };
            put(out, at, color, facing_glyph(*facing))
        }
        Sprite::Beam { .. } => put(out, at, C_BEAM, "•"),
        Sprite::Enemy { skin, emp } => {
            let color = if *emp {
                C_DISABLED
            } else {
                ENEMY_SKINS[*skin as usize % ENEMY_SKINS.len()]
            };
            put(out, (at.0.saturating_sub(1), at.1), color, "«▼»")
        }
        Sprite::Boss { emp, .. } => {
            let color = if *emp { C_DISABLED } else { C_BOSS };
            fill(out, view, &call.dest, color, "▓")
        }
        Sprite::Bomb { color, disabled } => {
            let color = if *disabled { C_DISABLED } else { rgb(*color) };
            put(out, at, color, "●")
        }
        Sprite::Explosion { flipped } => {
            let idx = usize::from(*flipped);
            put(out, at, C_EXPLOSION[idx], if *flipped { "✷" } else { "✶" })
        }
        // Full-arena tints only recolour the border.
        Sprite::Fill(c) if is_full_arena(&call.dest) || c[3] == 0 || call.dest.w < 1.0 => Ok(()),
        Sprite::Fill(c) => fill(out, view, &call.dest, rgb([c[0], c[1], c[2]]), "▀"),
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

const PORTRAIT: [&str; 3] = [" ,_,", "(O,O)", "(   )"];

fn draw_hud_call<W: Write>(out: &mut W, view: &Viewport, call: &HudCall) -> std::io::Result<()> {
    match call {
        HudCall::Panel { .. } => Ok(()),
        HudCall::Text { text, at, size, color } => {
            let cell = view.cell(GAME_WIDTH + at.x, at.y);
            let text = match size {
                TextSize::Title => format!("★ {text} ★"),
                TextSize::Big | TextSize::Mid => text.clone(),
            };
            put(out, cell, rgb(*color), &text)
        }
        HudCall::Icon { center, color, .. } => {
            put(out, view.cell(GAME_WIDTH + center.x, center.y), rgb(*color), "●")
        }
        HudCall::Portrait { rect } => {
            let c = rect.center();
            let (col, row) = view.cell(GAME_WIDTH + c.x, c.y);
            for (i, line) in PORTRAIT.iter().enumerate() {
                put(out, (col.saturating_sub(2), row + i as u16), C_PLAYER_INVINCIBLE, line)?;
            }
            Ok(())
        }
    }
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "Arrows: Move  SPACE: Fire  Q: Skill  E: EMP(20)  ENTER: Gravity(200)  S: Shield(50)  ESC: Quit",
    ))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, view: &Viewport, score: u32) -> std::io::Result<()> {
    let score_line = format!("Final Score: {score:>6}");
    let lines: [(&str, Color); 5] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        ("R - Play Again  ESC - Quit", Color::White),
    ];

    let cx = view.play_edge() / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        put(out, (col, start_row + i as u16), *color, msg)?;
    }
    Ok(())
}
