//! Frame-counted effects: explosions and the ability overlays.
//!
//! Every effect owns a [`Countdown`] and dies on its own when it runs out.
//! Overlays that act on other entities (EMP) do so once, at deployment.

use log::debug;

use crate::consts::*;
use crate::entities::{Bomb, Enemy, Entity, Player};
use crate::geometry::{rotated_extent, Rect};

/// When a countdown is considered finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Dies on the step that takes it below zero.
    BelowZero,
    /// Dies on the step that takes it to zero.
    AtZero,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    pub remaining: i32,
    pub expiry: Expiry,
}

impl Countdown {
    pub fn new(frames: i32, expiry: Expiry) -> Self {
        Self { remaining: frames, expiry }
    }

    /// Count one frame down; true once the timer has run out.
    pub fn step(&mut self) -> bool {
        self.remaining -= 1;
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Expiry::BelowZero => self.remaining < 0,
            Expiry::AtZero => self.remaining <= 0,
        }
    }
}

/// Something that advances itself one frame without outside context.
pub trait Animate: Entity {
    fn advance(&mut self);
}

pub fn advance_all<T: Animate>(group: &mut [T]) {
    for item in group.iter_mut().filter(|e| e.is_alive()) {
        item.advance();
    }
}

fn play_area() -> Rect {
    Rect::new(0.0, 0.0, GAME_WIDTH, HEIGHT)
}

// ── Explosion ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Explosion {
    pub rect: Rect,
    pub life: Countdown,
    /// Second animation frame (sprite flipped on both axes).
    pub flipped: bool,
    pub alive: bool,
}

impl Explosion {
    /// Explosion centred on whatever it replaces.
    pub fn at(anchor: &Rect, life: i32) -> Self {
        Self {
            rect: Rect::from_center(anchor.center(), EXPLOSION_SIZE),
            life: Countdown::new(life, Expiry::BelowZero),
            flipped: false,
            alive: true,
        }
    }
}

impl Entity for Explosion {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Animate for Explosion {
    fn advance(&mut self) {
        let expired = self.life.step();
        self.flipped = self.life.remaining.div_euclid(10).rem_euclid(2) == 1;
        if expired {
            self.alive = false;
        }
    }
}

// ── EMP ───────────────────────────────────────────────────────────────────────

/// Frames an EMP overlay stays up at the given loop rate.
pub fn emp_life(frame_rate: u32) -> i32 {
    ((EMP_SECONDS * frame_rate as f32) as i32).max(1)
}

/// Full-arena flash left behind by an EMP burst.
#[derive(Clone, Debug)]
pub struct EmpField {
    pub rect: Rect,
    pub life: Countdown,
    pub alive: bool,
}

impl EmpField {
    /// Disable every live enemy and bomb, then return the overlay.
    pub fn deploy(frame_rate: u32, enemies: &mut [Enemy], bombs: &mut [Bomb]) -> Self {
        let mut hit_enemies = 0;
        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            enemy.apply_emp();
            hit_enemies += 1;
        }
        let mut hit_bombs = 0;
        for bomb in bombs.iter_mut().filter(|b| b.alive) {
            bomb.apply_emp();
            hit_bombs += 1;
        }
        debug!("emp disabled {hit_enemies} enemies and {hit_bombs} bombs");
        Self {
            rect: play_area(),
            life: Countdown::new(emp_life(frame_rate), Expiry::BelowZero),
            alive: true,
        }
    }
}

impl Entity for EmpField {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Animate for EmpField {
    fn advance(&mut self) {
        if self.life.step() {
            self.alive = false;
        }
    }
}

// ── Shield ────────────────────────────────────────────────────────────────────

/// Thin wall planted in front of the player, facing where the player faces.
#[derive(Clone, Debug)]
pub struct Shield {
    pub rect: Rect,
    /// Rotation of the wall in degrees.
    pub heading: f32,
    pub life: Countdown,
    pub alive: bool,
}

impl Shield {
    pub fn new(player: &Player, life: i32) -> Self {
        let heading = player.facing.heading();
        let extent = rotated_extent(SHIELD_THICKNESS, player.rect.h * 2.0, heading);
        let reach = player.rect.w.max(player.rect.h);
        let center = player.rect.center() + player.facing.as_vec2() * reach;
        Self {
            rect: Rect::from_center(center, extent),
            heading,
            life: Countdown::new(life, Expiry::BelowZero),
            alive: true,
        }
    }
}

impl Entity for Shield {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Animate for Shield {
    fn advance(&mut self) {
        if self.life.step() {
            self.alive = false;
        }
    }
}

// ── Gravity well ──────────────────────────────────────────────────────────────

/// Dark full-arena field. The collision pass wipes the board while it lives.
#[derive(Clone, Debug)]
pub struct GravityField {
    pub rect: Rect,
    pub life: Countdown,
    pub alive: bool,
}

impl GravityField {
    pub fn new(life: i32) -> Self {
        Self {
            rect: play_area(),
            life: Countdown::new(life, Expiry::AtZero),
            alive: true,
        }
    }
}

impl Entity for GravityField {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Animate for GravityField {
    fn advance(&mut self) {
        if self.life.step() {
            self.alive = false;
        }
    }
}

// ── Skill flash ───────────────────────────────────────────────────────────────

/// White strobe played when the skill fires. Cosmetic only.
#[derive(Clone, Debug)]
pub struct SkillFlash {
    pub rect: Rect,
    pub life: Countdown,
    pub alpha_hi: u8,
    pub alpha_lo: u8,
    pub toggle_interval: i32,
    /// Alpha of the tint this frame.
    pub alpha: u8,
    pub alive: bool,
}

impl SkillFlash {
    pub fn new(life: i32, alpha_hi: u8, alpha_lo: u8) -> Self {
        Self {
            rect: play_area(),
            life: Countdown::new(life, Expiry::BelowZero),
            alpha_hi,
            alpha_lo,
            toggle_interval: SKILL_FLASH_TOGGLE,
            alpha: alpha_hi,
            alive: true,
        }
    }
}

impl Default for SkillFlash {
    fn default() -> Self {
        Self::new(SKILL_FLASH_LIFE, SKILL_FLASH_ALPHA.0, SKILL_FLASH_ALPHA.1)
    }
}

impl Entity for SkillFlash {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Animate for SkillFlash {
    fn advance(&mut self) {
        if self.life.step() {
            self.alive = false;
            return;
        }
        self.alpha = if (self.life.remaining / self.toggle_interval) % 2 == 0 {
            self.alpha_hi
        } else {
            self.alpha_lo
        };
    }
}
