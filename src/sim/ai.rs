//! Enemy behaviour
//!
//! Every enemy patrols its platform until it first sees the player, freezes
//! for a moment (startled), then turns aggressive for the rest of the level.

use super::collision::{Platform, movement_blocked, overlaps};
use super::combat;
use super::state::{AiState, Enemy, GameEvent, GameState, Player};
use crate::consts::*;

/// Update every live enemy. Dead enemies are dropped first.
pub fn update_enemies(state: &mut GameState, dt: f32) {
    state.enemies.retain(|e| e.alive);

    let GameState {
        player,
        enemies,
        platforms,
        events,
        ..
    } = state;

    for enemy in enemies.iter_mut() {
        update_enemy(enemy, player, platforms, events, dt);
    }
}

fn update_enemy(
    enemy: &mut Enemy,
    player: &mut Player,
    platforms: &[Platform],
    events: &mut Vec<GameEvent>,
    dt: f32,
) {
    enemy.hit_cooldown = (enemy.hit_cooldown - dt).max(0.0);
    if let AiState::Startled { remaining } = enemy.ai {
        let remaining = remaining - dt;
        enemy.ai = if remaining <= 0.0 {
            AiState::Aggressive
        } else {
            AiState::Startled { remaining }
        };
    }

    enemy.body.apply_gravity(dt);
    enemy.body.apply_knockback(dt, ENEMY_KNOCKBACK_DECAY);
    enemy.body.land_on(platforms);

    // Sight uses top-left corners
    let dx = (player.body.pos.x - enemy.body.pos.x).abs();
    let dy = (player.body.pos.y - enemy.body.pos.y).abs();
    if enemy.ai == AiState::Patrol && dx < SIGHT_RANGE_X && dy < SIGHT_RANGE_Y {
        enemy.ai = AiState::Startled {
            remaining: STARTLE_DURATION,
        };
        log::trace!("Enemy {} spotted the player", enemy.id);
    }

    let can_act = enemy.body.on_ground
        && !matches!(enemy.ai, AiState::Startled { .. })
        && enemy.body.knockback_x == 0.0;
    if can_act {
        if let Some(platform) = platforms.get(enemy.platform_index) {
            patrol(enemy, player, platform, events, dx, dt);
        }
    }

    if enemy.body.pos.y > ENEMY_FALL_LIMIT || enemy.health <= 0 {
        enemy.alive = false;
    }
}

/// Walk, bump into the player, turn at edges and chase when aggressive
fn patrol(
    enemy: &mut Enemy,
    player: &mut Player,
    platform: &Platform,
    events: &mut Vec<GameEvent>,
    dx: f32,
    dt: f32,
) {
    let current = enemy.body.rect();
    let future = current.with_x(enemy.body.pos.x + enemy.direction * enemy.speed * dt);
    let player_rect = player.body.rect();
    let colliding = overlaps(&current, &player_rect);

    let offset = (player.body.center() - enemy.body.center()).abs();
    let close = offset.x < CONTACT_RANGE_X && offset.y < CONTACT_RANGE_Y;
    if close && enemy.hit_cooldown <= 0.0 && !player.is_dying() {
        combat::strike_player(player, enemy, events);
    }

    if !movement_blocked(&current, &future, &player_rect) {
        enemy.body.pos.x = future.x;
    }

    let x = enemy.body.pos.x;
    if x <= platform.x + EDGE_MARGIN || x >= platform.right() - enemy.body.size.x - EDGE_MARGIN {
        enemy.direction = -enemy.direction;
    }

    let dy = (player.body.pos.y - enemy.body.pos.y).abs();
    if enemy.ai == AiState::Aggressive && dx < CHASE_RANGE_X && dy < CHASE_RANGE_Y && !colliding {
        enemy.direction = if player.body.pos.x > enemy.body.pos.x {
            1.0
        } else {
            -1.0
        };
    }
}
