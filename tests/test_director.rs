use glam::Vec2;
use koukaton_shooter::consts::*;
use koukaton_shooter::director::{activate_emp, activate_gravity, activate_shield, activate_skill, level_at, step};
use koukaton_shooter::entities::*;
use koukaton_shooter::patterns::BossSchedule;
use koukaton_shooter::{init_state, tick, Command, FrameInput, GameState, GameStatus, Settings};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Fresh state on a frame that spawns nothing.
fn make_state() -> GameState {
    let mut s = init_state(&Settings::default());
    s.frame = 1;
    s
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> FrameInput {
    FrameInput::default()
}

fn commands(list: &[Command]) -> FrameInput {
    FrameInput {
        commands: list.to_vec(),
        ..FrameInput::default()
    }
}

fn parked_enemy(center: Vec2, interval: Option<u64>) -> Enemy {
    let mut e = Enemy::new(2, &mut seeded_rng());
    e.rect.set_center(center);
    e.state = EnemyState::Stop;
    e.vel = Vec2::ZERO;
    e.interval = interval;
    e
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_at_bottom_centre() {
    let s = init_state(&Settings::default());
    assert_eq!(s.player.rect.center(), Vec2::new(450.0, 700.0));
    assert_eq!(s.player.facing, Facing::RIGHT);
}

#[test]
fn init_state_counters() {
    let s = init_state(&Settings::default());
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.lives, LIVES);
    assert_eq!(s.skill_charges, SKILL_CHARGES);
    assert_eq!(s.frame_rate, FRAME_RATE);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.enemies.is_empty());
    assert!(!s.boss_spawned);
}

#[test]
fn init_state_follows_settings() {
    let settings = Settings {
        frame_rate: 30,
        skill_charges: 1,
        lives: 5,
        ..Settings::default()
    };
    let s = init_state(&settings);
    assert_eq!(s.frame_rate, 30);
    assert_eq!(s.skill_charges, 1);
    assert_eq!(s.lives, 5);
}

#[test]
fn init_state_caps_frame_rate() {
    let settings = Settings {
        frame_rate: u32::MAX,
        ..Settings::default()
    };
    let mut s = init_state(&settings);
    assert_eq!(s.frame_rate, MAX_FRAME_RATE);
    assert!(activate_skill(&mut s));
    assert_eq!(s.player.invincible_timer, MAX_FRAME_RATE * SKILL_SECONDS);
}

// ── tick basics ───────────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let s = make_state();
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(next.frame, 2);
}

#[test]
fn tick_leaves_input_state_untouched() {
    let s = make_state();
    let input = FrameInput {
        keys: DirectionSet::of(&[Direction::Left]),
        ..FrameInput::default()
    };
    let next = tick(&s, &input, &mut seeded_rng());
    assert_eq!(s.frame, 1);
    assert_eq!(s.player.rect.center(), Vec2::new(450.0, 700.0));
    assert_eq!(next.player.rect.center(), Vec2::new(440.0, 700.0));
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut a = init_state(&Settings::default());
    let mut b = a.clone();
    let mut rng_a = seeded_rng();
    let mut rng_b = seeded_rng();
    let input = FrameInput { fire: true, ..FrameInput::default() };
    for _ in 0..400 {
        a = tick(&a, &input, &mut rng_a);
        b = tick(&b, &input, &mut rng_b);
    }
    assert_eq!(a.frame, b.frame);
    assert_eq!(a.score, b.score);
    assert_eq!(a.status, b.status);
    assert_eq!(a.bombs.len(), b.bombs.len());
    let ca: Vec<_> = a.enemies.iter().map(|e| e.rect.center()).collect();
    let cb: Vec<_> = b.enemies.iter().map(|e| e.rect.center()).collect();
    assert_eq!(ca, cb);
}

#[test]
fn ended_run_is_frozen() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    let next = tick(&s, &FrameInput { fire: true, ..FrameInput::default() }, &mut seeded_rng());
    assert_eq!(next.frame, s.frame);
    assert!(next.beams.is_empty());
}

#[test]
fn quit_command_stops_the_run() {
    let s = make_state();
    let next = tick(&s, &commands(&[Command::Quit]), &mut seeded_rng());
    assert_eq!(next.status, GameStatus::Quit);
    assert_eq!(next.frame, s.frame);
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn fire_on_shot_interval() {
    let mut s = make_state();
    s.frame = 10;
    let next = tick(&s, &FrameInput { fire: true, ..FrameInput::default() }, &mut seeded_rng());
    assert_eq!(next.beams.len(), BEAM_FAN as usize);
}

#[test]
fn fire_off_interval_does_nothing() {
    let mut s = make_state();
    s.frame = 11;
    let next = tick(&s, &FrameInput { fire: true, ..FrameInput::default() }, &mut seeded_rng());
    assert!(next.beams.is_empty());
}

#[test]
fn skill_enables_rapid_fire_next_frame() {
    let mut s = make_state();
    s.frame = 14;
    let mut rng = seeded_rng();
    s = tick(&s, &commands(&[Command::ActivateSkill]), &mut rng);
    assert_eq!(s.player.shot_interval, RAPID_SHOT_INTERVAL);
    s = tick(&s, &FrameInput { fire: true, ..FrameInput::default() }, &mut rng);
    assert_eq!(s.beams.len(), BEAM_FAN as usize);
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn level_steps_every_thousand_frames() {
    assert_eq!(level_at(0), 1);
    assert_eq!(level_at(999), 1);
    assert_eq!(level_at(1000), 2);
    assert_eq!(level_at(3000), 4);
}

#[test]
fn boss_arrives_on_level_one() {
    let s = init_state(&Settings::default());
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert!(next.boss_spawned);
    assert_eq!(next.enemies.len(), 1);
    assert!(next.enemies[0].is_boss());
    assert_eq!(next.enemies[0].max_hp, 60);
}

#[test]
fn boss_replaces_the_roster() {
    let mut s = init_state(&Settings::default());
    s.enemies.push(parked_enemy(Vec2::new(200.0, 200.0), Some(77)));
    s.enemies.push(parked_enemy(Vec2::new(400.0, 200.0), Some(77)));
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(next.enemies.len(), 1);
    assert!(next.enemies[0].is_boss());
}

#[test]
fn normal_enemy_on_level_two() {
    let mut s = make_state();
    s.frame = 1100;
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert!(!next.boss_spawned);
    assert_eq!(next.enemies.len(), 1);
    assert_eq!(next.enemies[0].kind, EnemyKind::Normal);
    assert_eq!(next.enemies[0].max_hp, 5);
}

#[test]
fn no_spawns_while_boss_lives() {
    let mut rng = seeded_rng();
    let mut s = init_state(&Settings::default());
    s = tick(&s, &idle(), &mut rng);
    s.frame = 200;
    let next = tick(&s, &idle(), &mut rng);
    assert_eq!(next.enemies.len(), 1);
}

#[test]
fn boss_flag_clears_when_boss_is_gone() {
    let mut s = make_state();
    s.boss_spawned = true;
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert!(!next.boss_spawned);
}

// ── Enemy attacks ─────────────────────────────────────────────────────────────

#[test]
fn parked_enemy_fires_on_its_interval() {
    let mut s = make_state();
    s.frame = 50;
    s.enemies.push(parked_enemy(Vec2::new(450.0, 300.0), Some(50)));
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert!(!next.bombs.is_empty());
    assert_eq!(next.enemies[0].state, EnemyState::Offset);
    assert!(!next.enemies[0].ready_to_shoot);
}

#[test]
fn emp_disabled_enemy_never_fires() {
    let mut s = make_state();
    s.frame = 50;
    let mut e = parked_enemy(Vec2::new(450.0, 300.0), Some(50));
    e.apply_emp();
    s.enemies.push(e);
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert!(next.bombs.is_empty());
    assert_eq!(next.enemies[0].state, EnemyState::Stop);
}

#[test]
fn unguarded_hit_is_game_over() {
    let mut s = make_state();
    s.bombs.push(Bomb::new(s.player.rect.center(), 10.0, 5.0, 270.0, BOMB_COLORS[0]));
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(next.status, GameStatus::GameOver);
    assert!(next.last_report.player_hit);
    assert!(next.bombs.is_empty());
    assert_eq!(next.frame, s.frame);
}

// ── Boss attacks ──────────────────────────────────────────────────────────────

/// State one frame after the level-one boss arrived, bombs cleared and the
/// boss locked on the ring tier.
fn boss_on_ring(rng: &mut StdRng) -> GameState {
    let mut s = tick(&init_state(&Settings::default()), &idle(), rng);
    s.bombs.clear();
    s.boss = BossSchedule { roll: Some(100) };
    s
}

#[test]
fn boss_opens_fire_on_its_first_frame() {
    let next = tick(&init_state(&Settings::default()), &idle(), &mut seeded_rng());
    let tier = next.boss.tier().unwrap();
    let expected: usize = tier.volleys(0).iter().map(|f| f.count as usize).sum();
    assert!(expected > 0);
    assert_eq!(next.bombs.len(), expected);

    // Every bomb left from the boss's bottom-centre at its spawn point.
    let muzzle = Vec2::new(GAME_WIDTH / 2.0, BOSS_SPAWN_Y + BOSS_SIZE.1 / 2.0);
    for bomb in &next.bombs {
        assert!((bomb.rect.center() - bomb.vel).abs_diff_eq(muzzle, 1e-3));
    }
}

#[test]
fn ring_tier_fires_twenty_from_the_muzzle() {
    let mut rng = seeded_rng();
    let mut s = boss_on_ring(&mut rng);
    s.frame = 10;
    let muzzle = s.enemies[0].rect.bottom_center();
    let next = tick(&s, &idle(), &mut rng);
    assert_eq!(next.bombs.len(), 20);
    for bomb in &next.bombs {
        assert!((bomb.rect.center() - bomb.vel).abs_diff_eq(muzzle, 1e-3));
        assert!((bomb.vel.length() - 5.0).abs() < 1e-4);
    }
}

#[test]
fn boss_is_silent_at_the_tail_of_each_window() {
    let mut rng = seeded_rng();
    let mut s = boss_on_ring(&mut rng);
    for frame in [200, 210, 250, 290, 510] {
        s.frame = frame;
        let next = tick(&s, &idle(), &mut rng);
        assert!(next.bombs.is_empty(), "volley on frame {frame}");
        assert!(next.boss_spawned);
    }
}

#[test]
fn boss_volleys_stop_once_gravity_kills_it() {
    let mut rng = seeded_rng();
    let mut s = boss_on_ring(&mut rng);
    s.frame = 10;
    s.score = GRAVITY_COST;

    // The ring fires, then the sweep takes the bombs and the boss.
    let mut s = tick(&s, &commands(&[Command::ActivateGravity]), &mut rng);
    assert!(s.enemies.is_empty());
    assert!(!s.boss_spawned);
    assert!(s.bombs.is_empty());
    assert_eq!(s.score, 20 * BOMB_SCORE + ENEMY_SCORE);

    s.gravities.clear();
    s.frame = 20;
    let next = tick(&s, &idle(), &mut rng);
    assert!(next.bombs.is_empty());
    assert!(next.enemies.is_empty());
}

// ── Abilities ─────────────────────────────────────────────────────────────────

#[test]
fn skill_spends_a_charge_and_flashes() {
    let mut s = make_state();
    assert!(activate_skill(&mut s));
    assert_eq!(s.skill_charges, 2);
    assert_eq!(s.flashes.len(), 1);
    assert!(s.player.invincible);
}

#[test]
fn skill_without_charges_fails() {
    let mut s = make_state();
    s.skill_charges = 0;
    assert!(!activate_skill(&mut s));
    assert!(s.flashes.is_empty());
    assert!(!s.player.invincible);
}

#[test]
fn skill_wears_off_after_five_seconds() {
    let mut rng = seeded_rng();
    let mut s = tick(&make_state(), &commands(&[Command::ActivateSkill]), &mut rng);
    for _ in 1..249 {
        s = tick(&s, &idle(), &mut rng);
    }
    assert!(s.player.invincible);
    s = tick(&s, &idle(), &mut rng);
    assert!(!s.player.invincible);
    assert!(!s.player.rapid_fire);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn emp_needs_score() {
    let mut s = make_state();
    assert!(!activate_emp(&mut s));
    assert!(s.emps.is_empty());
    assert_eq!(s.score, 0);
}

#[test]
fn emp_spends_score_and_expires() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.score = EMP_COST;
    s = tick(&s, &commands(&[Command::ActivateEmp]), &mut rng);
    assert_eq!(s.score, 0);
    assert_eq!(s.emps.len(), 1);
    s = tick(&s, &idle(), &mut rng);
    assert_eq!(s.emps.len(), 1);
    s = tick(&s, &idle(), &mut rng);
    assert!(s.emps.is_empty());
}

#[test]
fn only_one_emp_at_a_time() {
    let mut s = make_state();
    s.score = 2 * EMP_COST;
    let next = tick(&s, &commands(&[Command::ActivateEmp, Command::ActivateEmp]), &mut seeded_rng());
    assert_eq!(next.emps.len(), 1);
    assert_eq!(next.score, EMP_COST);
}

#[test]
fn emp_disables_everything_on_screen() {
    let mut s = make_state();
    s.score = EMP_COST;
    s.enemies.push(parked_enemy(Vec2::new(200.0, 200.0), Some(50)));
    s.bombs.push(Bomb::new(Vec2::new(100.0, 100.0), 10.0, 6.0, 270.0, BOMB_COLORS[0]));
    assert!(activate_emp(&mut s));
    assert!(s.enemies[0].emp_disabled);
    assert_eq!(s.enemies[0].interval, None);
    assert!(s.bombs[0].disabled);
}

#[test]
fn gravity_needs_two_hundred() {
    let mut s = make_state();
    s.score = GRAVITY_COST - 1;
    assert!(!activate_gravity(&mut s));
    s.score = GRAVITY_COST;
    assert!(activate_gravity(&mut s));
    assert_eq!(s.score, 0);
    assert_eq!(s.gravities.len(), 1);
}

#[test]
fn gravity_sweeps_in_its_first_frame() {
    let mut s = make_state();
    s.score = GRAVITY_COST;
    s.bombs.push(Bomb::new(Vec2::new(100.0, 100.0), 10.0, 5.0, 270.0, BOMB_COLORS[0]));
    s.bombs.push(Bomb::new(Vec2::new(200.0, 100.0), 10.0, 5.0, 270.0, BOMB_COLORS[1]));
    s.enemies.push(parked_enemy(Vec2::new(600.0, 200.0), Some(77)));
    let next = tick(&s, &commands(&[Command::ActivateGravity]), &mut seeded_rng());
    assert_eq!(next.score, 2 * BOMB_SCORE + ENEMY_SCORE);
    assert!(next.bombs.is_empty());
    assert!(next.enemies.is_empty());
}

#[test]
fn shield_needs_fifty_and_is_unique() {
    let mut s = make_state();
    s.score = 2 * SHIELD_COST;
    assert!(activate_shield(&mut s));
    assert_eq!(s.score, SHIELD_COST);
    assert!(!activate_shield(&mut s));
    assert_eq!(s.score, SHIELD_COST);
    assert_eq!(s.shields.len(), 1);
}

#[test]
fn gravity_fields_may_stack() {
    let mut s = make_state();
    s.score = 2 * GRAVITY_COST;
    assert!(activate_gravity(&mut s));
    assert!(activate_gravity(&mut s));
    assert_eq!(s.gravities.len(), 2);
}

#[test]
fn step_matches_tick() {
    let s = make_state();
    let mut in_place = s.clone();
    step(&mut in_place, &idle(), &mut seeded_rng());
    let next = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(in_place.frame, next.frame);
    assert_eq!(in_place.player.rect, next.player.rect);
}
