//! Per-frame collision and damage resolution.
//!
//! Runs after spawning and attacks, before entities advance. Nothing is
//! removed here: hits only flip liveness flags, and the director compacts
//! every collection at the end of the frame.

use log::trace;

use crate::consts::*;
use crate::director::GameState;
use crate::effects::Explosion;
use crate::entities::Mood;

/// What the resolver did this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Enemies destroyed by beams.
    pub enemies_shot: u32,
    /// Bombs soaked up while the player was invincible.
    pub bombs_absorbed: u32,
    pub gravity_bombs: u32,
    pub gravity_enemies: u32,
    pub bombs_shielded: u32,
    pub score_gained: u32,
    /// An unguarded bomb reached the player; the run is over.
    pub player_hit: bool,
}

pub fn resolve(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();

    beams_vs_enemies(state, &mut report);

    if bombs_vs_player(state, &mut report) {
        trace!("collision: {report:?}");
        return report;
    }

    if state.gravities.iter().any(|g| g.alive) {
        gravity_sweep(state, &mut report);
    }

    bombs_vs_shields(state, &mut report);

    state.score += report.score_gained;
    trace!("collision: {report:?}");
    report
}

fn beams_vs_enemies(state: &mut GameState, report: &mut CollisionReport) {
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        let mut damage = 0;
        for beam in state.beams.iter_mut().filter(|b| b.alive) {
            if beam.rect.overlaps(&enemy.rect) {
                beam.kill();
                damage += beam.attack;
            }
        }
        if damage > 0 && enemy.take_damage(damage) {
            state.explosions.push(Explosion::at(&enemy.rect, ENEMY_EXPLOSION_LIFE));
            enemy.kill();
            report.enemies_shot += 1;
            report.score_gained += ENEMY_SCORE;
            state.player.mood = Mood::Cheer;
        }
    }
}

/// True when the player took an unguarded hit.
fn bombs_vs_player(state: &mut GameState, report: &mut CollisionReport) -> bool {
    for bomb in state.bombs.iter_mut().filter(|b| b.alive) {
        if !bomb.rect.overlaps(&state.player.rect) {
            continue;
        }
        bomb.kill();
        if state.player.invincible {
            state.explosions.push(Explosion::at(&bomb.rect, BOMB_EXPLOSION_LIFE));
            report.bombs_absorbed += 1;
            continue;
        }
        state.player.mood = Mood::Hit;
        report.player_hit = true;
        // Beam kills earlier this frame still count toward the final score.
        state.score += report.score_gained;
        return true;
    }
    false
}

fn gravity_sweep(state: &mut GameState, report: &mut CollisionReport) {
    for bomb in state.bombs.iter_mut().filter(|b| b.alive) {
        state.explosions.push(Explosion::at(&bomb.rect, BOMB_EXPLOSION_LIFE));
        bomb.kill();
        report.gravity_bombs += 1;
        report.score_gained += BOMB_SCORE;
    }
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        state.explosions.push(Explosion::at(&enemy.rect, ENEMY_EXPLOSION_LIFE));
        enemy.kill();
        report.gravity_enemies += 1;
        report.score_gained += ENEMY_SCORE;
    }
}

fn bombs_vs_shields(state: &mut GameState, report: &mut CollisionReport) {
    let shields: Vec<_> = state
        .shields
        .iter()
        .filter(|s| s.alive)
        .map(|s| s.rect)
        .collect();
    if shields.is_empty() {
        return;
    }
    for bomb in state.bombs.iter_mut().filter(|b| b.alive) {
        if shields.iter().any(|s| s.overlaps(&bomb.rect)) {
            state.explosions.push(Explosion::at(&bomb.rect, BOMB_EXPLOSION_LIFE));
            bomb.kill();
            report.bombs_shielded += 1;
        }
    }
}
