//! Draw commands as plain data.
//!
//! The core never touches a screen: [`build_frame`] turns a `GameState`
//! into ordered draw calls that a front-end rasterises however it likes.

use crate::director::GameState;
use crate::effects::{EmpField, Explosion, GravityField, Shield, SkillFlash};
use crate::entities::{Beam, Bomb, Enemy, EnemyKind, Facing, Mood, Player};
use crate::geometry::Rect;
use crate::hud::{hud_calls, HudCall, HudView};

pub type Rgba = [u8; 4];

pub const HP_BACK: Rgba = [255, 0, 0, 255];
pub const HP_FILL: Rgba = [0, 255, 0, 255];
pub const EMP_TINT: Rgba = [255, 255, 0, 100];
pub const GRAVITY_TINT: Rgba = [0, 0, 0, 128];

/// What to paint into a destination rectangle.
#[derive(Clone, Debug, PartialEq)]
pub enum Sprite {
    Shield { heading: f32 },
    Player { facing: Facing, mood: Mood, invincible: bool },
    Beam { heading: f32 },
    Enemy { skin: u8, emp: bool },
    Boss { skin: u8, emp: bool },
    Bomb { color: [u8; 3], disabled: bool },
    Explosion { flipped: bool },
    /// Solid or translucent rectangle (HP bars, overlays).
    Fill(Rgba),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub sprite: Sprite,
    pub dest: Rect,
}

impl DrawCall {
    pub fn new(sprite: Sprite, dest: Rect) -> Self {
        Self { sprite, dest }
    }
}

/// One frame worth of drawing: play area back-to-front, then the HUD strip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub play: Vec<DrawCall>,
    pub hud: Vec<HudCall>,
}

pub trait Drawable {
    fn draw(&self, out: &mut Vec<DrawCall>);
}

fn draw_all<T: Drawable>(items: &[T], out: &mut Vec<DrawCall>) {
    for item in items {
        item.draw(out);
    }
}

pub fn build_frame(state: &GameState) -> Frame {
    let mut play = Vec::new();
    draw_all(&state.shields, &mut play);
    state.player.draw(&mut play);
    draw_all(&state.beams, &mut play);
    draw_all(&state.enemies, &mut play);
    draw_all(&state.bombs, &mut play);
    draw_all(&state.gravities, &mut play);
    draw_all(&state.explosions, &mut play);
    draw_all(&state.emps, &mut play);
    draw_all(&state.flashes, &mut play);

    Frame {
        play,
        hud: hud_calls(&HudView::from(state)),
    }
}

impl Drawable for Shield {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        out.push(DrawCall::new(Sprite::Shield { heading: self.heading }, self.rect));
    }
}

impl Drawable for Player {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        let sprite = Sprite::Player {
            facing: self.facing,
            mood: self.mood,
            invincible: self.invincible,
        };
        out.push(DrawCall::new(sprite, self.rect));
    }
}

impl Drawable for Beam {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        out.push(DrawCall::new(Sprite::Beam { heading: self.heading }, self.rect));
    }
}

impl Drawable for Enemy {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        let sprite = match self.kind {
            EnemyKind::Normal => Sprite::Enemy { skin: self.skin, emp: self.emp_disabled },
            EnemyKind::Boss => Sprite::Boss { skin: self.skin, emp: self.emp_disabled },
        };
        out.push(DrawCall::new(sprite, self.rect));

        // HP bar above the sprite; the boss gets a thicker one.
        let (bar_h, gap) = match self.kind {
            EnemyKind::Normal => (5.0, 2.0),
            EnemyKind::Boss => (15.0, 5.0),
        };
        let top = self.rect.top() - bar_h - gap;
        let fill_w = (self.rect.w * self.hp_ratio()).floor();
        out.push(DrawCall::new(
            Sprite::Fill(HP_BACK),
            Rect::new(self.rect.left(), top, self.rect.w, bar_h),
        ));
        out.push(DrawCall::new(
            Sprite::Fill(HP_FILL),
            Rect::new(self.rect.left(), top, fill_w, bar_h),
        ));
    }
}

impl Drawable for Bomb {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        let sprite = Sprite::Bomb {
            color: self.color,
            disabled: self.disabled,
        };
        out.push(DrawCall::new(sprite, self.rect));
    }
}

impl Drawable for GravityField {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        out.push(DrawCall::new(Sprite::Fill(GRAVITY_TINT), self.rect));
    }
}

impl Drawable for Explosion {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        out.push(DrawCall::new(Sprite::Explosion { flipped: self.flipped }, self.rect));
    }
}

impl Drawable for EmpField {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        out.push(DrawCall::new(Sprite::Fill(EMP_TINT), self.rect));
    }
}

impl Drawable for SkillFlash {
    fn draw(&self, out: &mut Vec<DrawCall>) {
        out.push(DrawCall::new(Sprite::Fill([255, 255, 255, self.alpha]), self.rect));
    }
}
