//! Melee combat
//!
//! The player's sword swing, damage against enemies, and enemy contact hits
//! against the player.

use glam::Vec2;

use super::collision::{Rect, overlaps};
use super::progression;
use super::state::{AttackState, Enemy, GameEvent, GamePhase, GameState, Player};
use crate::consts::*;

/// Try to start a swing. Rejected while cooling down, swinging, dying or
/// outside active play.
pub fn begin_attack(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if state.phase != GamePhase::Playing
        || player.is_dying()
        || player.is_attacking()
        || player.attack_cooldown > 0.0
    {
        return false;
    }

    player.attack = AttackState::Swinging {
        progress: 0.0,
        hit_resolved: false,
    };
    player.attack_cooldown = ATTACK_COOLDOWN;
    state.events.push(GameEvent::Attack {
        origin: player.body.center(),
        direction: player.direction,
    });
    true
}

/// The blade's hitbox for the player's current facing
pub fn sword_rect(player: &Player) -> Rect {
    let body = player.body.rect();
    let x = if player.direction > 0.0 {
        body.right() - SWORD_INSET
    } else {
        body.x - SWORD_REACH + SWORD_INSET
    };
    Rect::new(x, body.y, SWORD_REACH, body.h)
}

/// Advance the cooldown and any swing in progress.
///
/// The blade is tested against enemies exactly once per swing, the first
/// frame progress lands inside the hit window.
pub fn update_swing(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    player.attack_cooldown = (player.attack_cooldown - dt).max(0.0);

    let AttackState::Swinging {
        progress,
        hit_resolved,
    } = player.attack
    else {
        return;
    };

    let progress = progress + dt / SWING_DURATION;
    let in_window = (HIT_WINDOW_START..=HIT_WINDOW_END).contains(&progress);
    let resolve_now = in_window && !hit_resolved;

    player.attack = if progress >= 1.0 {
        AttackState::Idle
    } else {
        AttackState::Swinging {
            progress,
            hit_resolved: hit_resolved || resolve_now,
        }
    };

    if resolve_now {
        resolve_sword_hits(state);
    }
}

/// Damage every live enemy the blade overlaps
fn resolve_sword_hits(state: &mut GameState) {
    let blade = sword_rect(&state.player);
    let targets: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive && overlaps(&blade, &e.body.rect()))
        .map(|(i, _)| i)
        .collect();

    for index in targets {
        hit_enemy(state, index);
    }
}

/// Apply one sword hit to the enemy at `index`. Dead enemies are ignored.
pub fn hit_enemy(state: &mut GameState, index: usize) {
    let direction = state.player.direction;
    let Some(enemy) = state.enemies.get_mut(index).filter(|e| e.alive) else {
        return;
    };

    enemy.health -= SWORD_DAMAGE;
    enemy.hit_cooldown = ENEMY_HIT_COOLDOWN;
    enemy.body.knockback_x = direction * SWORD_KNOCKBACK;

    if enemy.health > 0 {
        state.events.push(GameEvent::EnemyHit {
            id: enemy.id,
            pos: enemy.body.pos,
        });
        return;
    }

    enemy.alive = false;
    let (id, kind, points, pos) = (enemy.id, enemy.kind, enemy.points, enemy.body.pos);
    state.score += points;
    log::debug!("Enemy {id} ({kind:?}) defeated for {points} points");

    commit_nearby_code(state, pos);
    state.events.push(GameEvent::EnemyDefeated {
        id,
        kind,
        points,
        pos,
    });
    progression::update_floor(state);
}

/// Light up a few uncommitted code blocks around a defeated enemy
fn commit_nearby_code(state: &mut GameState, pos: Vec2) {
    let nearby = state
        .code_blocks
        .iter_mut()
        .filter(|b| !b.is_committed() && b.pos.distance(pos) < COMMIT_RADIUS)
        .take(COMMIT_LIMIT);

    for block in nearby {
        if block.commit() {
            state.events.push(GameEvent::CodeCommitted { pos: block.pos });
        }
    }
}

/// An enemy lands a contact hit on the player
pub fn strike_player(player: &mut Player, enemy: &mut Enemy, events: &mut Vec<GameEvent>) {
    player.health -= CONTACT_DAMAGE;
    enemy.hit_cooldown = CONTACT_COOLDOWN;

    let away = if player.body.pos.x < enemy.body.pos.x {
        -1.0
    } else {
        1.0
    };
    player.body.knockback_x = away * CONTACT_KNOCKBACK;

    events.push(GameEvent::PlayerHit {
        damage: CONTACT_DAMAGE,
        pos: player.body.pos,
    });
}
