//! Koukaton shooter: the per-frame simulation core of a single-screen arcade
//! shooter.
//!
//! - `geometry`: rectangles, bounds checks, headings
//! - `entities`: player, shots, bombs and enemies
//! - `effects`: timed overlays (EMP, shield, gravity well, skill flash) and explosions
//! - `patterns`: enemy bullet fans and the boss schedule
//! - `collision`: per-frame damage resolution
//! - `director`: fixed-step frame driver owning every collection
//! - `render` / `hud`: draw commands as plain data
//! - `config`: settings file and CLI overrides

pub mod collision;
pub mod config;
pub mod director;
pub mod effects;
pub mod entities;
pub mod geometry;
pub mod hud;
pub mod patterns;
pub mod render;

pub use config::Settings;
pub use director::{init_state, tick, Command, FrameInput, GameState, GameStatus};
pub use geometry::Rect;

/// Arena layout and gameplay tuning.
pub mod consts {
    /// Whole window width (play area + HUD strip).
    pub const WIDTH: f32 = 1200.0;
    pub const HEIGHT: f32 = 800.0;
    pub const HUD_WIDTH: f32 = 300.0;
    /// Width of the simulated play area.
    pub const GAME_WIDTH: f32 = WIDTH - HUD_WIDTH;

    /// Reference loop rate (steps per second).
    pub const FRAME_RATE: u32 = 50;
    /// Highest loop rate accepted from settings or the command line.
    pub const MAX_FRAME_RATE: u32 = 1000;

    // Player
    pub const PLAYER_SIZE: (f32, f32) = (60.0, 60.0);
    pub const PLAYER_SPEED: f32 = 10.0;
    pub const SHOT_INTERVAL: u64 = 10;
    pub const RAPID_SHOT_INTERVAL: u64 = 5;
    /// Seconds of invincibility granted by a skill charge.
    pub const SKILL_SECONDS: u32 = 5;
    pub const SKILL_CHARGES: u32 = 3;
    pub const LIVES: u32 = 3;

    // Beams
    pub const BEAM_SIZE: (f32, f32) = (12.0, 12.0);
    pub const BEAM_SPEED: f32 = 10.0;
    pub const BEAM_ATTACK: i32 = 1;
    pub const BEAM_FAN: u32 = 5;
    pub const BEAM_FAN_SPREAD: i32 = 60;

    // Enemies
    pub const ENEMY_SIZE: (f32, f32) = (60.0, 50.0);
    pub const BOSS_SIZE: (f32, f32) = (180.0, 150.0);
    pub const ENEMY_DESCENT_SPEED: f32 = 6.0;
    pub const BOSS_SPEED: f32 = 3.0;
    pub const BOSS_SPAWN_Y: f32 = 100.0;
    pub const ENEMY_SKINS: u8 = 3;
    pub const OFFSET_FRAMES: u32 = 20;

    // Schedule
    pub const SPAWN_EVERY: u64 = 100;
    pub const FRAMES_PER_LEVEL: u64 = 1000;
    pub const BOSS_LEVEL_CYCLE: u32 = 3;
    pub const BOSS_WINDOW: u64 = 300;
    pub const BOSS_QUIET_FROM: u64 = 200;

    // Scoring and ability costs
    pub const ENEMY_SCORE: u32 = 10;
    pub const BOMB_SCORE: u32 = 1;
    pub const EMP_COST: u32 = 20;
    pub const GRAVITY_COST: u32 = 200;
    pub const SHIELD_COST: u32 = 50;

    // Lifetimes (frames)
    pub const ENEMY_EXPLOSION_LIFE: i32 = 100;
    pub const BOMB_EXPLOSION_LIFE: i32 = 50;
    pub const EXPLOSION_SIZE: (f32, f32) = (50.0, 50.0);
    pub const SHIELD_LIFE: i32 = 400;
    pub const SHIELD_THICKNESS: f32 = 20.0;
    pub const GRAVITY_LIFE: i32 = 400;
    pub const SKILL_FLASH_LIFE: i32 = 12;
    pub const SKILL_FLASH_TOGGLE: i32 = 2;
    pub const SKILL_FLASH_ALPHA: (u8, u8) = (180, 0);
    /// EMP overlay duration in seconds; at least one frame.
    pub const EMP_SECONDS: f32 = 0.05;
}
