//! Simulation step
//!
//! One call advances the whole world by `dt` seconds in a fixed order:
//! player input, player physics, enemies, the sword swing, then progression.

use serde::Serialize;

use super::state::{GamePhase, GameState};
use super::{ai, combat, notify, physics, progression};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal axis, -1.0 (left) to 1.0 (right)
    pub move_x: f32,
    /// Jump requested this frame
    pub jump: bool,
    /// Attack requested this frame
    pub attack: bool,
    /// A host-side modal is covering the game
    pub modal_active: bool,
}

impl TickInput {
    /// Combine held left/right keys; pressing both cancels out
    pub fn from_keys(left: bool, right: bool) -> Self {
        let move_x = f32::from(u8::from(right)) - f32::from(u8::from(left));
        Self {
            move_x,
            ..Default::default()
        }
    }
}

/// Turns host timestamps into simulation steps.
///
/// The step is clamped so a stalled host never hands the world a long jump
/// in time; a slow host sees slow motion instead.
#[derive(Debug, Clone, Serialize)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Restart timing from `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Seconds to simulate for a frame at `now_ms`. The first frame is empty.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, self.max_dt)
    }

    /// Timestamp of the most recent frame
    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }
}

impl GameState {
    /// Run one host frame: derive the step from the timestamp and tick
    pub fn frame(&mut self, input: &TickInput, now_ms: f64) -> f32 {
        let dt = self.clock.advance(now_ms);
        tick(self, input, dt);
        dt
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if dt <= 0.0 {
        return;
    }
    match state.phase {
        GamePhase::Ready | GamePhase::Ended { .. } => return,
        GamePhase::Playing | GamePhase::Interrupted { .. } => {}
    }

    // A notification or host modal swallows input, the world keeps going
    let input_blocked =
        input.modal_active || matches!(state.phase, GamePhase::Interrupted { .. });
    if !input_blocked && !state.player.is_dying() {
        if input.attack {
            combat::begin_attack(state);
        }
        physics::apply_player_input(state, input, dt);
    }

    physics::step_player(state, dt);
    ai::update_enemies(state, dt);
    combat::update_swing(state, dt);
    if state.is_ended() {
        return;
    }

    progression::collect_goals(state);
    if state.is_ended() {
        return;
    }

    notify::update(state, dt);
    progression::update_death(state, dt);

    state.game_time += dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::state::{AiState, GameEvent, PlayerLife};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_settings() -> Settings {
        Settings {
            notifications: false,
            ..Settings::default()
        }
    }

    fn playing(seed: u64, level: u32) -> GameState {
        let mut state = GameState::with_settings(seed, level, quiet_settings());
        state.start(0.0);
        state
    }

    #[test]
    fn test_ready_state_does_not_advance() {
        let mut state = GameState::new(12345);
        let before = state.player.body.pos;
        tick(&mut state, &TickInput::from_keys(false, true), DT);
        assert_eq!(state.player.body.pos, before);
        assert_eq!(state.game_time, 0.0);
    }

    #[test]
    fn test_player_settles_on_ground_after_start() {
        let mut state = playing(12345, 1);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.player.body.on_ground);
        assert_eq!(state.player.body.rect().bottom(), 580.0);
        assert!(state.game_time > 1.9);
    }

    #[test]
    fn test_frame_clock_clamps_stalls() {
        let mut clock = FrameClock::new(MAX_FRAME_DT);
        assert_eq!(clock.advance(1_000.0), 0.0);
        assert!((clock.advance(1_010.0) - 0.010).abs() < 1e-6);
        assert_eq!(clock.advance(3_000.0), MAX_FRAME_DT);
        // Time going backwards never yields a negative step
        assert_eq!(clock.advance(2_000.0), 0.0);
        assert_eq!(clock.last_ms(), Some(2_000.0));
    }

    #[test]
    fn test_frame_uses_host_timestamps() {
        let mut state = playing(1, 1);
        let dt = state.frame(&TickInput::default(), 500.0);
        assert_eq!(dt, MAX_FRAME_DT);
        let dt = state.frame(&TickInput::default(), 508.0);
        assert!((dt - 0.008).abs() < 1e-6);
    }

    #[test]
    fn test_from_keys_cancels_opposites() {
        assert_eq!(TickInput::from_keys(true, true).move_x, 0.0);
        assert_eq!(TickInput::from_keys(true, false).move_x, -1.0);
        assert_eq!(TickInput::from_keys(false, true).move_x, 1.0);
    }

    #[test]
    fn test_modal_blocks_input_not_physics() {
        let mut state = playing(7, 1);
        state.player.body.pos.y = 300.0;
        state.player.body.on_ground = false;
        let x = state.player.body.pos.x;

        let input = TickInput {
            move_x: 1.0,
            jump: true,
            attack: true,
            modal_active: true,
        };
        tick(&mut state, &input, DT);

        assert_eq!(state.player.body.pos.x, x);
        assert!(!state.player.is_attacking());
        assert!(state.player.body.pos.y > 300.0, "gravity keeps running");
    }

    #[test]
    fn test_notification_blocks_input_until_dismissed() {
        let mut state = GameState::new(9);
        state.enemies.clear();
        state.start(0.0);
        let mut shown = false;
        for _ in 0..400 {
            tick(&mut state, &TickInput::default(), DT);
            if state.active_notification().is_some() {
                shown = true;
                break;
            }
        }
        assert!(shown);

        let x = state.player.body.pos.x;
        let right = TickInput::from_keys(false, true);
        tick(&mut state, &right, DT);
        assert_eq!(state.player.body.pos.x, x);

        state.dismiss_notification();
        tick(&mut state, &right, DT);
        assert!(state.player.body.pos.x > x);
    }

    #[test]
    fn test_last_contact_hit_ends_in_defeat() {
        let mut state = playing(8, 1);
        // Tutorial enemy on platform 1 (x 150..400, y 500), player right beside it
        state.player.body.pos = Vec2::new(270.0, 455.0);
        state.player.health = CONTACT_DAMAGE;
        let enemy = &mut state.enemies[0];
        enemy.body.pos = Vec2::new(250.0, 470.0);
        enemy.ai = AiState::Aggressive;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.health, 0);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerHit { damage, .. } if *damage == CONTACT_DAMAGE))
        );
        assert!(matches!(state.player.life, PlayerLife::Dying { .. }));
        assert!(state.events.contains(&GameEvent::GameOver));

        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), DT);
            if state.is_ended() {
                break;
            }
        }
        let outcome = state.outcome().expect("should have ended");
        assert!(!outcome.won);

        // Ended sessions ignore further ticks
        let pos = state.player.body.pos;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.body.pos, pos);
    }

    #[test]
    fn test_walking_onto_goal_scores() {
        let mut state = playing(3, 1);
        state.enemies.clear();
        let goal = state.goals[0].center();
        state.player.body.pos = Vec2::new(goal.x - 22.5, 455.0);

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.goals[0].is_collected());
        assert_eq!(state.score, GOAL_BONUS);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing(99999, 3);
        let mut state2 = playing(99999, 3);

        let inputs = [
            TickInput::from_keys(false, true),
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                attack: true,
                ..TickInput::from_keys(true, false)
            },
            TickInput::default(),
        ];

        for _ in 0..150 {
            for input in &inputs {
                tick(&mut state1, input, DT);
                tick(&mut state2, input, DT);
            }
        }

        assert_eq!(state1.player.body.pos, state2.player.body.pos);
        assert_eq!(state1.player.health, state2.player.health);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.body.pos, b.body.pos);
            assert_eq!(a.ai, b.ai);
        }
    }
}
