//! Enemy bullet patterns.
//!
//! A fan is `count` bombs launched at once, evenly spread over `spread`
//! degrees around a base heading. The heading is either straight down or
//! aimed at the player when the fan is generated; bombs are never re-aimed.

use log::debug;
use rand::Rng;

use crate::consts::{BOSS_QUIET_FROM, BOSS_WINDOW};
use crate::entities::{Bomb, Enemy, Player, BOMB_COLORS};
use crate::geometry::{direction_to, heading_of};

/// Straight down.
pub const DOWN: f32 = 270.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aim {
    /// Base heading fixed at 270°.
    Fixed,
    /// Base heading toward the player at generation time.
    Seeking,
}

/// Parameters of one fan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanSpec {
    pub aim: Aim,
    pub radius: f32,
    pub speed: f32,
    pub count: u32,
    /// Total angular width in whole degrees.
    pub spread: i32,
}

impl FanSpec {
    pub const fn fixed(radius: f32, speed: f32, count: u32, spread: i32) -> Self {
        Self { aim: Aim::Fixed, radius, speed, count, spread }
    }

    pub const fn seeking(radius: f32, speed: f32, count: u32, spread: i32) -> Self {
        Self { aim: Aim::Seeking, radius, speed, count, spread }
    }
}

/// Headings of a fan around `base`.
///
/// Uses floor division on whole degrees, so odd spreads or uneven counts
/// lose the remainder. A single bomb ignores the spread entirely.
pub fn fan_headings(base: f32, count: u32, spread: i32) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![base],
        _ => {
            let start = (-spread).div_euclid(2);
            let step = spread.div_euclid(count as i32 - 1);
            (0..count as i32)
                .map(|i| base + (start + step * i) as f32)
                .collect()
        }
    }
}

/// Base heading for `aim`, falling back to straight down when the enemy
/// and the player share a centre.
pub fn base_heading(aim: Aim, enemy: &Enemy, player: &Player) -> f32 {
    match aim {
        Aim::Fixed => DOWN,
        Aim::Seeking => direction_to(enemy.rect.center(), player.rect.center())
            .map(heading_of)
            .unwrap_or(DOWN),
    }
}

/// Bombs for one fan, launched from the enemy's bottom-centre.
pub fn fan(spec: &FanSpec, enemy: &Enemy, player: &Player, rng: &mut impl Rng) -> Vec<Bomb> {
    let muzzle = enemy.rect.bottom_center();
    let base = base_heading(spec.aim, enemy, player);
    fan_headings(base, spec.count, spec.spread)
        .into_iter()
        .map(|heading| {
            let color = BOMB_COLORS[rng.gen_range(0..BOMB_COLORS.len())];
            Bomb::new(muzzle, spec.radius, spec.speed, heading, color)
        })
        .collect()
}

// ── Normal enemies ────────────────────────────────────────────────────────────

/// Weighted pick for a normal enemy's attack, `roll` in `0..=100`.
pub fn normal_pattern(roll: u32) -> FanSpec {
    match roll {
        0..=20 => FanSpec::fixed(10.0, 5.0, 5, 60),
        21..=60 => FanSpec::seeking(10.0, 5.0, 5, 60),
        80 => FanSpec::fixed(20.0, 2.0, 3, 90),
        _ => FanSpec::seeking(10.0, 10.0, 1, 0),
    }
}

pub fn roll(rng: &mut impl Rng) -> u32 {
    rng.gen_range(0..=100)
}

// ── Boss ──────────────────────────────────────────────────────────────────────

/// Boss attack tier, denser as the roll grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossTier {
    /// Heavy single shots plus an aimed spread.
    Drizzle,
    /// Rapid aimed needles plus a narrow fixed fan.
    Needles,
    /// Two stacked fixed fans, aimed fan on the off-beat.
    Crossfire,
    /// Full 360° rings.
    Ring,
}

impl BossTier {
    pub fn from_roll(roll: u32) -> Self {
        match roll {
            0..=25 => BossTier::Drizzle,
            26..=50 => BossTier::Needles,
            51..=75 => BossTier::Crossfire,
            _ => BossTier::Ring,
        }
    }

    /// Fans this tier fires on `frame`.
    pub fn volleys(self, frame: u64) -> Vec<FanSpec> {
        let mut out = Vec::new();
        match self {
            BossTier::Drizzle => {
                if frame % 10 == 0 {
                    out.push(FanSpec::fixed(20.0, 5.0, 1, 0));
                }
                if frame % 50 == 0 {
                    out.push(FanSpec::seeking(10.0, 5.0, 5, 60));
                }
            }
            BossTier::Needles => {
                if frame % 8 == 0 {
                    out.push(FanSpec::seeking(10.0, 10.0, 1, 0));
                }
                if frame % 50 == 0 {
                    out.push(FanSpec::fixed(10.0, 5.0, 3, 30));
                }
            }
            BossTier::Crossfire => {
                if frame % 50 == 0 {
                    out.push(FanSpec::fixed(10.0, 5.0, 5, 60));
                    out.push(FanSpec::fixed(10.0, 4.0, 4, 45));
                }
                if frame % 50 == 25 {
                    out.push(FanSpec::seeking(10.0, 5.0, 3, 30));
                }
            }
            BossTier::Ring => {
                if frame % 10 == 0 {
                    out.push(FanSpec::fixed(10.0, 5.0, 20, 360));
                }
            }
        }
        out
    }
}

/// Boss phase cycling: a fresh roll every window, silence at its tail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BossSchedule {
    /// Last roll; `None` until the first window boundary.
    pub roll: Option<u32>,
}

impl BossSchedule {
    /// Fans the boss fires on `frame`, re-rolling on window boundaries.
    pub fn on_frame(&mut self, frame: u64, rng: &mut impl Rng) -> Vec<FanSpec> {
        if frame % BOSS_WINDOW == 0 {
            let r = roll(rng);
            debug!("boss phase roll {r} -> {:?}", BossTier::from_roll(r));
            self.roll = Some(r);
        }
        match self.roll {
            Some(r) if frame % BOSS_WINDOW < BOSS_QUIET_FROM => BossTier::from_roll(r).volleys(frame),
            _ => Vec::new(),
        }
    }

    pub fn tier(&self) -> Option<BossTier> {
        self.roll.map(BossTier::from_roll)
    }
}
