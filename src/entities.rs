//! Player, shots, bombs and enemies.
//!
//! Entities own only their own fields. Collection membership is the
//! director's business: an entity marks itself dead and the owning `Vec`
//! is compacted once per frame.

use glam::{IVec2, Vec2};
use log::debug;
use rand::Rng;

use crate::consts::*;
use crate::geometry::{fully_inside, heading_of, velocity_for, Rect};

/// Capability shared by every simulated object.
pub trait Entity {
    fn rect(&self) -> &Rect;
    fn is_alive(&self) -> bool;
}

/// Drop every dead member of a collection.
pub fn compact<T: Entity>(group: &mut Vec<T>) {
    group.retain(|e| e.is_alive());
}

/// Number of live members, ignoring ones already marked dead this frame.
pub fn live_count<T: Entity>(group: &[T]) -> usize {
    group.iter().filter(|e| e.is_alive()).count()
}

// ── Input directions ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Snapshot of the movement keys held this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionSet {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionSet {
    pub fn of(dirs: &[Direction]) -> Self {
        let mut set = Self::default();
        for &d in dirs {
            set.insert(d);
        }
        set
    }

    pub fn insert(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    pub fn contains(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Sum of the unit deltas of every held direction.
    pub fn sum(&self) -> IVec2 {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter(|&d| self.contains(d))
            .map(Direction::delta)
            .sum()
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// One of the eight compass directions; never `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Facing(IVec2);

impl Facing {
    pub const RIGHT: Facing = Facing(IVec2::new(1, 0));

    pub fn new(v: IVec2) -> Option<Self> {
        let in_range = v.x.abs() <= 1 && v.y.abs() <= 1;
        (in_range && v != IVec2::ZERO).then_some(Facing(v))
    }

    pub fn vector(self) -> IVec2 {
        self.0
    }

    /// Unnormalised float form, e.g. `(1, 1)` for down-right.
    pub fn as_vec2(self) -> Vec2 {
        self.0.as_vec2()
    }

    /// Heading in degrees (right = 0°, up = 90°).
    pub fn heading(self) -> f32 {
        heading_of(self.as_vec2())
    }
}

/// Player face shown by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mood {
    #[default]
    Normal,
    /// Just destroyed an enemy.
    Cheer,
    /// Took the run-ending hit.
    Hit,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub facing: Facing,
    pub speed: f32,
    pub invincible: bool,
    /// Frames of invincibility left.
    pub invincible_timer: u32,
    pub rapid_fire: bool,
    /// Frames between beam fans.
    pub shot_interval: u64,
    pub mood: Mood,
}

impl Player {
    pub fn new(center: Vec2) -> Self {
        Self {
            rect: Rect::from_center(center, PLAYER_SIZE),
            facing: Facing::RIGHT,
            speed: PLAYER_SPEED,
            invincible: false,
            invincible_timer: 0,
            rapid_fire: false,
            shot_interval: SHOT_INTERVAL,
            mood: Mood::Normal,
        }
    }

    /// Move by the summed key deltas. An excursion on either axis cancels
    /// the whole step.
    pub fn apply_input(&mut self, keys: &DirectionSet) {
        let sum = keys.sum();
        let step = sum.as_vec2() * self.speed;
        self.rect.translate(step);
        if !fully_inside(&self.rect) {
            self.rect.translate(-step);
        }
        if let Some(facing) = Facing::new(sum) {
            self.facing = facing;
        }
    }

    pub fn update(&mut self, keys: &DirectionSet) {
        self.apply_input(keys);

        if self.invincible {
            self.invincible_timer = self.invincible_timer.saturating_sub(1);
            if self.invincible_timer == 0 {
                self.invincible = false;
                self.rapid_fire = false;
            }
        }

        self.shot_interval = if self.rapid_fire {
            RAPID_SHOT_INTERVAL
        } else {
            SHOT_INTERVAL
        };
    }

    /// Spend one skill charge on invincibility + rapid fire.
    ///
    /// Returns whether the skill fired and the charges left.
    pub fn activate_skill(&mut self, charges: u32, frame_rate: u32) -> (bool, u32) {
        if charges == 0 {
            return (false, charges);
        }
        self.invincible = true;
        self.invincible_timer = frame_rate.saturating_mul(SKILL_SECONDS);
        self.rapid_fire = true;
        (true, charges - 1)
    }
}

impl Entity for Player {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    // Losing ends the run; the player itself is never removed.
    fn is_alive(&self) -> bool {
        true
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Palette enemy bombs are painted from.
pub const BOMB_COLORS: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
];

/// Enemy bomb.
#[derive(Clone, Debug)]
pub struct Bomb {
    pub rect: Rect,
    pub vel: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
    /// Slowed and greyed out by an EMP.
    pub disabled: bool,
    pub alive: bool,
}

impl Bomb {
    pub fn new(muzzle: Vec2, radius: f32, speed: f32, heading: f32, color: [u8; 3]) -> Self {
        Self {
            rect: Rect::from_center(muzzle, (2.0 * radius, 2.0 * radius)),
            vel: velocity_for(speed, heading),
            radius,
            color,
            disabled: false,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        self.rect.translate(self.vel);
        if !fully_inside(&self.rect) {
            self.alive = false;
        }
    }

    /// Halve speed and mark disabled. A bomb is only slowed once.
    pub fn apply_emp(&mut self) {
        if !self.disabled {
            self.vel *= 0.5;
            self.disabled = true;
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Entity for Bomb {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Player shot.
#[derive(Clone, Debug)]
pub struct Beam {
    pub rect: Rect,
    pub vel: Vec2,
    /// Firing heading in degrees, kept for the sprite rotation.
    pub heading: f32,
    pub attack: i32,
    pub alive: bool,
}

impl Beam {
    /// Spawn one player-extent ahead of the player along `heading`.
    pub fn new(player: &Player, heading: f32) -> Self {
        let unit = velocity_for(1.0, heading);
        let origin = player.rect.center() + Vec2::new(player.rect.w * unit.x, player.rect.h * unit.y);
        Self {
            rect: Rect::from_center(origin, BEAM_SIZE),
            vel: unit * BEAM_SPEED,
            heading,
            attack: BEAM_ATTACK,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        self.rect.translate(self.vel);
        if !fully_inside(&self.rect) {
            self.alive = false;
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Entity for Beam {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Fan of `count` beams spread over ±30° around the player's facing.
pub fn beam_fan(player: &Player, count: u32) -> Vec<Beam> {
    let base = player.facing.heading();
    if count <= 1 {
        return vec![Beam::new(player, base)];
    }
    let half = BEAM_FAN_SPREAD / 2;
    let step = (BEAM_FAN_SPREAD / (count as i32 - 1)).max(1);
    (-half..=half)
        .step_by(step as usize)
        .map(|offset| Beam::new(player, base + offset as f32))
        .collect()
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Normal,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    /// Descending toward its bound.
    Moving,
    /// Parked, waiting for the director to trigger an attack.
    Stop,
    /// Just fired; arms the recoil jitter on the next update.
    Shoot,
    /// Recoil jitter in progress.
    Offset,
    /// Boss bounce movement.
    Alive,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub rect: Rect,
    pub vel: Vec2,
    pub max_hp: i32,
    pub hp: i32,
    pub state: EnemyState,
    /// Centre-y at which the descent ends.
    pub bound: f32,
    /// Frames between attacks; `None` once an EMP has suspended it.
    pub interval: Option<u64>,
    pub ready_to_shoot: bool,
    /// Alien sprite index.
    pub skin: u8,
    /// Sprite altered by an EMP.
    pub emp_disabled: bool,
    pub offset_frames: u32,
    pub offset_vel: Vec2,
    pub alive: bool,
}

impl Enemy {
    /// Normal enemy entering at the top edge.
    pub fn new(level: u32, rng: &mut impl Rng) -> Self {
        let center = Vec2::new(rng.gen_range(0.0..=GAME_WIDTH), 0.0);
        let max_hp = 3 + level as i32;
        debug!("spawning enemy level={level} hp={max_hp} at x={:.0}", center.x);
        Self {
            kind: EnemyKind::Normal,
            rect: Rect::from_center(center, ENEMY_SIZE),
            vel: Vec2::new(0.0, ENEMY_DESCENT_SPEED),
            max_hp,
            hp: max_hp,
            state: EnemyState::Moving,
            bound: rng.gen_range(50..=(HEIGHT as i32 / 2)) as f32,
            interval: Some(rng.gen_range(50..=80)),
            ready_to_shoot: true,
            skin: rng.gen_range(0..ENEMY_SKINS),
            emp_disabled: false,
            offset_frames: 0,
            offset_vel: Vec2::ZERO,
            alive: true,
        }
    }

    /// Boss: fixed spawn point, horizontal bounce, no descent.
    pub fn boss(level: u32, rng: &mut impl Rng) -> Self {
        let max_hp = 50 + level as i32 * 10;
        debug!("spawning boss level={level} hp={max_hp}");
        Self {
            kind: EnemyKind::Boss,
            rect: Rect::from_center(Vec2::new(GAME_WIDTH / 2.0, BOSS_SPAWN_Y), BOSS_SIZE),
            vel: Vec2::new(BOSS_SPEED, 0.0),
            max_hp,
            hp: max_hp,
            state: EnemyState::Alive,
            bound: BOSS_SPAWN_Y,
            interval: Some(rng.gen_range(50..=80)),
            ready_to_shoot: false,
            skin: rng.gen_range(0..ENEMY_SKINS),
            emp_disabled: false,
            offset_frames: 0,
            offset_vel: Vec2::ZERO,
            alive: true,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        if self.kind == EnemyKind::Boss {
            self.rect.translate(Vec2::new(self.vel.x, 0.0));
            if self.rect.right() >= GAME_WIDTH || self.rect.left() <= 0.0 {
                self.vel.x = -self.vel.x;
            }
            return;
        }

        match self.state {
            EnemyState::Moving => {
                self.rect.translate(self.vel);
                if self.rect.center().y >= self.bound {
                    self.vel.y = 0.0;
                    self.state = EnemyState::Stop;
                    self.ready_to_shoot = true;
                }
            }
            EnemyState::Stop | EnemyState::Alive => {}
            EnemyState::Shoot => {
                self.offset_frames = OFFSET_FRAMES;
                self.offset_vel = Vec2::new(
                    rng.gen_range(-3..=3) as f32,
                    rng.gen_range(-3..=3) as f32,
                );
                self.state = EnemyState::Offset;
            }
            EnemyState::Offset => {
                if self.offset_frames > 0 {
                    self.rect.translate(self.offset_vel);
                    self.offset_frames -= 1;
                } else {
                    self.state = EnemyState::Stop;
                }
            }
        }
    }

    /// Parked and this frame is a multiple of its attack interval.
    pub fn attack_due(&self, frame: u64) -> bool {
        self.state == EnemyState::Stop && self.interval.is_some_and(|i| frame % i == 0)
    }

    pub fn begin_shoot(&mut self) {
        self.state = EnemyState::Shoot;
        self.ready_to_shoot = false;
    }

    /// Suspend attacks for good and grey out the sprite.
    pub fn apply_emp(&mut self) {
        self.interval = None;
        self.emp_disabled = true;
    }

    /// Subtract `amount` HP; true when this blow destroyed the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.hp <= 0
    }

    pub fn hp_ratio(&self) -> f32 {
        (self.hp as f32 / self.max_hp as f32).max(0.0)
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Entity for Enemy {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
