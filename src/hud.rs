//! HUD strip to the right of the play area.
//!
//! Read-only: a [`HudView`] is copied out of the game state and laid out
//! into [`HudCall`]s with coordinates relative to the strip's top-left.

use glam::Vec2;

use crate::consts::{HEIGHT, HUD_WIDTH, PLAYER_SIZE};
use crate::director::GameState;
use crate::geometry::Rect;

/// Data the HUD needs from the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudView {
    pub score: u32,
    pub lives: u32,
    pub skill_charges: u32,
}

impl From<&GameState> for HudView {
    fn from(state: &GameState) -> Self {
        Self {
            score: state.score,
            lives: state.lives,
            skill_charges: state.skill_charges,
        }
    }
}

/// Font sizes used by the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSize {
    Mid,
    Big,
    Title,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HudCall {
    Panel { rect: Rect, color: [u8; 3] },
    Text { text: String, at: Vec2, size: TextSize, color: [u8; 3] },
    Icon { center: Vec2, radius: f32, color: [u8; 3] },
    /// Large player portrait.
    Portrait { rect: Rect },
}

const LEFT: f32 = 20.0;
const ICON_RADIUS: f32 = 12.0;
const ICON_STEP: f32 = 35.0;
const PORTRAIT_SCALE: f32 = 3.0;

fn label(text: &str, x: f32, y: f32, size: TextSize, color: [u8; 3]) -> HudCall {
    HudCall::Text {
        text: text.to_string(),
        at: Vec2::new(x, y),
        size,
        color,
    }
}

fn icons(count: u32, y: f32, color: [u8; 3], out: &mut Vec<HudCall>) {
    for i in 0..count {
        out.push(HudCall::Icon {
            center: Vec2::new(LEFT + 20.0 + i as f32 * ICON_STEP, y + 50.0),
            radius: ICON_RADIUS,
            color,
        });
    }
}

pub fn hud_calls(view: &HudView) -> Vec<HudCall> {
    let mut out = vec![HudCall::Panel {
        rect: Rect::new(0.0, 0.0, HUD_WIDTH, HEIGHT),
        color: [20, 20, 20],
    }];

    let mut y = 30.0;
    out.push(label("GAME TITLE", LEFT, y, TextSize::Mid, [255, 255, 0]));
    out.push(label("Koukaton", LEFT, y + 30.0, TextSize::Title, [255, 100, 50]));

    y += 120.0;
    out.push(label("SCORE", LEFT, y, TextSize::Mid, [200, 200, 255]));
    out.push(label(&view.score.to_string(), LEFT, y + 30.0, TextSize::Big, [255, 255, 255]));

    y += 120.0;
    out.push(label("LIFE", LEFT, y, TextSize::Mid, [255, 200, 200]));
    icons(view.lives, y, [255, 100, 100], &mut out);

    y += 120.0;
    out.push(label("SKILL", LEFT, y, TextSize::Mid, [200, 255, 200]));
    icons(view.skill_charges, y, [100, 255, 100], &mut out);

    let w = PLAYER_SIZE.0 * PORTRAIT_SCALE;
    let h = PLAYER_SIZE.1 * PORTRAIT_SCALE;
    out.push(HudCall::Portrait {
        rect: Rect::new((HUD_WIDTH - w) / 2.0, HEIGHT - h - 130.0, w, h),
    });

    out
}
