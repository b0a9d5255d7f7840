//! Body integration and player movement
//!
//! Knockback, gravity and platform landing for every body, plus the
//! input-driven part of player movement.

use super::collision::{Platform, movement_blocked};
use super::combat;
use super::state::{Body, GameEvent, GameState, Player};
use super::tick::TickInput;
use crate::consts::*;

impl Body {
    /// Move by the knockback impulse and decay it toward zero
    pub fn apply_knockback(&mut self, dt: f32, decay_rate: f32) {
        if self.knockback_x == 0.0 {
            return;
        }
        self.pos.x += self.knockback_x * dt;
        self.knockback_x *= 1.0 - dt * decay_rate;
        if self.knockback_x.abs() < KNOCKBACK_EPSILON {
            self.knockback_x = 0.0;
        }
    }

    /// Accelerate downward and move vertically
    pub fn apply_gravity(&mut self, dt: f32) {
        self.velocity_y += GRAVITY * dt;
        self.pos.y += self.velocity_y * dt;
    }

    /// Resolve landing against every platform.
    ///
    /// Platforms are checked in order and a later match overrides an earlier
    /// one (each match snaps the body before the next platform is tested).
    /// Upward motion is never interrupted.
    pub fn land_on(&mut self, platforms: &[Platform]) {
        self.on_ground = false;
        for platform in platforms {
            if self.velocity_y < 0.0 {
                continue;
            }
            let rect = self.rect();
            let bottom = rect.bottom();
            if rect.overlaps_x(platform)
                && bottom > platform.y
                && bottom < platform.bottom() + LANDING_TOLERANCE
            {
                self.pos.y = platform.y - self.size.y;
                self.velocity_y = 0.0;
                self.on_ground = true;
            }
        }
    }

    /// Launch upward. Only allowed while standing on something.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity_y = -JUMP_VELOCITY;
        self.on_ground = false;
        true
    }
}

impl Player {
    /// Keep the player inside the play field horizontally
    pub fn clamp_to_viewport(&mut self, viewport_width: f32) {
        let max_x = (viewport_width - self.body.size.x).max(0.0);
        self.body.pos.x = self.body.pos.x.clamp(0.0, max_x);
    }
}

/// Apply horizontal input and jump requests to the player.
///
/// Walking into an enemy follows the same rule as enemies walking into the
/// player: separating is fine, burrowing further is not. Getting close to an
/// enemy that is off cooldown costs a contact hit.
pub fn apply_player_input(state: &mut GameState, input: &TickInput, dt: f32) {
    let move_x = input.move_x.clamp(-1.0, 1.0);
    let viewport_width = state.settings.viewport_width;
    let GameState {
        player,
        enemies,
        events,
        ..
    } = state;

    if move_x != 0.0 {
        player.direction = if move_x > 0.0 { 1.0 } else { -1.0 };
        let new_x = player.body.pos.x + move_x * player.speed * dt;
        let current = player.body.rect();
        let future = current.with_x(new_x);

        let mut can_move = true;
        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            let enemy_rect = enemy.body.rect();
            let touching = super::collision::overlaps(&current, &enemy_rect)
                || super::collision::overlaps(&future, &enemy_rect);
            let close = (player.body.pos.x - enemy.body.pos.x).abs() < WALK_IN_RANGE_X;
            if touching && close && enemy.hit_cooldown <= 0.0 {
                combat::strike_player(player, enemy, events);
            }
            if movement_blocked(&current, &future, &enemy_rect) {
                can_move = false;
            }
        }

        if can_move {
            player.body.pos.x = new_x;
            player.clamp_to_viewport(viewport_width);
        }
    }

    if input.jump && player.body.jump() {
        events.push(GameEvent::Jump);
    }
}

/// Knockback, gravity and landing for the player
pub fn step_player(state: &mut GameState, dt: f32) {
    let viewport_width = state.settings.viewport_width;
    let player = &mut state.player;
    let dying = player.is_dying();

    if !dying && player.body.knockback_x != 0.0 {
        player.body.apply_knockback(dt, PLAYER_KNOCKBACK_DECAY);
        player.clamp_to_viewport(viewport_width);
    }

    // Gravity keeps pulling during the death animation
    player.body.apply_gravity(dt);

    if dying {
        player.body.on_ground = false;
    } else {
        player.body.land_on(&state.platforms);
    }
}
