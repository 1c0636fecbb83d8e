//! Fixed-step frame driver.
//!
//! `GameState` owns every entity collection plus the shared context (frame
//! counter, score, charges). [`tick`] takes an immutable state, the input
//! snapshot and an injected RNG and returns the next state, so callers pick
//! determinism (tests pass a seeded RNG).

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use crate::collision::{self, CollisionReport};
use crate::config::Settings;
use crate::consts::*;
use crate::effects::{advance_all, EmpField, Explosion, GravityField, Shield, SkillFlash};
use crate::entities::{beam_fan, compact, live_count, Beam, Bomb, DirectionSet, Enemy, Player};
use crate::patterns::{fan, normal_pattern, roll, BossSchedule};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// An unguarded bomb hit the player.
    GameOver,
    /// The player asked to leave.
    Quit,
}

/// Discrete, edge-triggered commands (one per key press).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ActivateSkill,
    ActivateEmp,
    ActivateGravity,
    ActivateShield,
    Quit,
}

/// Everything the director reads from the input device for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub keys: DirectionSet,
    /// Fire button held.
    pub fire: bool,
    pub commands: Vec<Command>,
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub beams: Vec<Beam>,
    pub bombs: Vec<Bomb>,
    /// Normal enemies, or just the boss while one is live.
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub emps: Vec<EmpField>,
    pub shields: Vec<Shield>,
    pub gravities: Vec<GravityField>,
    pub flashes: Vec<SkillFlash>,
    pub boss: BossSchedule,
    pub boss_spawned: bool,
    /// Scoreboard and ability currency.
    pub score: u32,
    /// Shown on the HUD only; a single hit ends the run.
    pub lives: u32,
    pub skill_charges: u32,
    pub frame: u64,
    pub frame_rate: u32,
    pub status: GameStatus,
    pub last_report: CollisionReport,
}

/// Fresh run with the player at the bottom centre of the arena.
pub fn init_state(settings: &Settings) -> GameState {
    GameState {
        player: Player::new(Vec2::new(GAME_WIDTH / 2.0, HEIGHT - 100.0)),
        beams: Vec::new(),
        bombs: Vec::new(),
        enemies: Vec::new(),
        explosions: Vec::new(),
        emps: Vec::new(),
        shields: Vec::new(),
        gravities: Vec::new(),
        flashes: Vec::new(),
        boss: BossSchedule::default(),
        boss_spawned: false,
        score: 0,
        lives: settings.lives,
        skill_charges: settings.skill_charges,
        frame: 0,
        frame_rate: settings.frame_rate.clamp(1, MAX_FRAME_RATE),
        status: GameStatus::Playing,
        last_report: CollisionReport::default(),
    }
}

/// Advance the simulation by one frame.
pub fn tick(state: &GameState, input: &FrameInput, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    step(&mut next, input, rng);
    next
}

/// In-place form of [`tick`]. Does nothing once the run has ended.
pub fn step(state: &mut GameState, input: &FrameInput, rng: &mut impl Rng) {
    if state.status != GameStatus::Playing {
        return;
    }

    // ── 1. Fire ───────────────────────────────────────────────────────────────
    if input.fire && state.frame % state.player.shot_interval == 0 {
        state.beams.extend(beam_fan(&state.player, BEAM_FAN));
    }

    // ── 2. Abilities ──────────────────────────────────────────────────────────
    for command in &input.commands {
        match command {
            Command::Quit => {
                info!("quit at frame {} with score {}", state.frame, state.score);
                state.status = GameStatus::Quit;
                return;
            }
            Command::ActivateSkill => {
                activate_skill(state);
            }
            Command::ActivateEmp => {
                activate_emp(state);
            }
            Command::ActivateGravity => {
                activate_gravity(state);
            }
            Command::ActivateShield => {
                activate_shield(state);
            }
        }
    }

    // ── 3. Spawns ─────────────────────────────────────────────────────────────
    spawn_wave(state, rng);

    // ── 4–5. Enemy and boss attacks ───────────────────────────────────────────
    enemy_attacks(state, rng);
    if state.boss_spawned {
        boss_attacks(state, rng);
    }

    // ── 6. Collisions ─────────────────────────────────────────────────────────
    let report = collision::resolve(state);
    state.last_report = report;
    if report.player_hit {
        info!("run over at frame {} with score {}", state.frame, state.score);
        state.status = GameStatus::GameOver;
        compact_all(state);
        return;
    }

    // ── 7. Advance ────────────────────────────────────────────────────────────
    advance_all(&mut state.shields);
    state.player.update(&input.keys);
    for beam in state.beams.iter_mut().filter(|b| b.alive) {
        beam.update();
    }
    let frame = state.frame;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.update(rng);
        // Parked on a due frame without firing: skips this attack.
        if enemy.attack_due(frame) {
            enemy.begin_shoot();
        }
    }
    for bomb in state.bombs.iter_mut().filter(|b| b.alive) {
        bomb.update();
    }
    advance_all(&mut state.gravities);
    advance_all(&mut state.explosions);
    advance_all(&mut state.emps);
    advance_all(&mut state.flashes);

    compact_all(state);

    // ── 8. Bookkeeping ────────────────────────────────────────────────────────
    state.frame += 1;
    if state.boss_spawned && !state.enemies.iter().any(Enemy::is_boss) {
        debug!("boss cleared at frame {}", state.frame);
        state.boss_spawned = false;
    }
}

fn compact_all(state: &mut GameState) {
    compact(&mut state.beams);
    compact(&mut state.bombs);
    compact(&mut state.enemies);
    compact(&mut state.explosions);
    compact(&mut state.emps);
    compact(&mut state.shields);
    compact(&mut state.gravities);
    compact(&mut state.flashes);
}

/// Level for the current frame: one more every thousand frames.
pub fn level_at(frame: u64) -> u32 {
    (frame / FRAMES_PER_LEVEL + 1) as u32
}

fn spawn_wave(state: &mut GameState, rng: &mut impl Rng) {
    if state.boss_spawned || state.frame % SPAWN_EVERY != 0 {
        return;
    }
    let level = level_at(state.frame);
    if level % BOSS_LEVEL_CYCLE == 1 {
        // The boss takes over the whole enemy roster.
        state.enemies = vec![Enemy::boss(level, rng)];
        state.boss_spawned = true;
    } else {
        state.enemies.push(Enemy::new(level, rng));
    }
}

fn enemy_attacks(state: &mut GameState, rng: &mut impl Rng) {
    let frame = state.frame;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        if !enemy.attack_due(frame) {
            continue;
        }
        let spec = normal_pattern(roll(rng));
        state.bombs.extend(fan(&spec, enemy, &state.player, rng));
        enemy.begin_shoot();
    }
}

fn boss_attacks(state: &mut GameState, rng: &mut impl Rng) {
    let volleys = state.boss.on_frame(state.frame, rng);
    if volleys.is_empty() {
        return;
    }
    for boss in state.enemies.iter().filter(|e| e.alive && e.is_boss()) {
        for spec in &volleys {
            state.bombs.extend(fan(spec, boss, &state.player, rng));
        }
    }
}

// ── Abilities ─────────────────────────────────────────────────────────────────

/// Spend a skill charge. Returns whether it fired.
pub fn activate_skill(state: &mut GameState) -> bool {
    let (activated, charges) = state
        .player
        .activate_skill(state.skill_charges, state.frame_rate);
    state.skill_charges = charges;
    if activated {
        debug!("skill activated, {charges} charges left");
        state.flashes.push(SkillFlash::default());
    }
    activated
}

/// Needs 20 score and no EMP already on screen.
pub fn activate_emp(state: &mut GameState) -> bool {
    if state.score < EMP_COST || live_count(&state.emps) > 0 {
        return false;
    }
    state.score -= EMP_COST;
    let field = EmpField::deploy(state.frame_rate, &mut state.enemies, &mut state.bombs);
    state.emps.push(field);
    debug!("emp activated, score now {}", state.score);
    true
}

/// Needs 200 score. Several fields may overlap.
pub fn activate_gravity(state: &mut GameState) -> bool {
    if state.score < GRAVITY_COST {
        return false;
    }
    state.score -= GRAVITY_COST;
    state.gravities.push(GravityField::new(GRAVITY_LIFE));
    debug!("gravity field activated, score now {}", state.score);
    true
}

/// Needs 50 score and no shield already up.
pub fn activate_shield(state: &mut GameState) -> bool {
    if state.score < SHIELD_COST || live_count(&state.shields) > 0 {
        return false;
    }
    state.score -= SHIELD_COST;
    state.shields.push(Shield::new(&state.player, SHIELD_LIFE));
    debug!("shield raised, score now {}", state.score);
    true
}
