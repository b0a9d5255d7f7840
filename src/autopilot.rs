//! Scripted player for headless runs
//!
//! Heads for the nearest uncollected goal, climbs toward it one platform at a
//! time, swings at enemies in front of it and closes any popup that appears.

use glam::Vec2;

use crate::max_jump_height;
use crate::sim::{GameState, Platform, TickInput};

/// Horizontal slack before the pilot bothers to steer
const STEER_DEAD_ZONE: f32 = 6.0;
/// Swing when an enemy is this close in front
const SWING_RANGE_X: f32 = 90.0;
const SWING_RANGE_Y: f32 = 40.0;
/// Keep clear of the jump limit so discrete integration still makes it
const CLIMB_MARGIN: f32 = 15.0;
/// Widest horizontal gap a running jump clears onto the next step
const JUMP_REACH_X: f32 = 110.0;

/// Scripted player. Remembers the platform it jumped for so it keeps
/// steering at it while airborne.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    step: Option<Platform>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this frame's input. Dismisses a pending notification first.
    pub fn drive(&mut self, state: &mut GameState) -> TickInput {
        if state.dismiss_notification() {
            log::debug!("Autopilot dismissed a notification");
        }

        let player = &state.player;
        let feet = Vec2::new(player.body.center().x, player.body.rect().bottom());
        let center = player.body.center();
        let grounded = player.body.on_ground;

        let attack = state.enemies.iter().filter(|e| e.alive).any(|e| {
            let offset = e.body.center() - center;
            offset.x.abs() < SWING_RANGE_X
                && offset.y.abs() < SWING_RANGE_Y
                && offset.x.signum() == player.direction
        });

        let Some(goal) = state
            .goals
            .iter()
            .filter(|g| !g.is_collected())
            .min_by(|a, b| a.center().distance(center).total_cmp(&b.center().distance(center)))
        else {
            return TickInput::default();
        };
        let goal_center = goal.center();

        if grounded {
            self.step = None;
        }

        // Goal above our head: aim for the next platform up instead
        let mut jump = false;
        let target_x = match self.step {
            Some(step) => step.center().x,
            None if grounded && goal_center.y < player.body.pos.y - 10.0 => {
                match next_step(&state.platforms, feet, goal_center) {
                    Some(step) => {
                        jump = horizontal_gap(&step, feet.x) <= JUMP_REACH_X;
                        if jump {
                            self.step = Some(step);
                        }
                        step.center().x
                    }
                    None => goal_center.x,
                }
            }
            None => goal_center.x,
        };

        let dx = target_x - feet.x;
        let move_x = if dx.abs() > STEER_DEAD_ZONE {
            dx.signum()
        } else {
            0.0
        };

        TickInput {
            move_x,
            jump,
            attack,
            modal_active: false,
        }
    }
}

/// Highest platform above the feet that one jump can reach, nearest the goal
fn next_step(platforms: &[Platform], feet: Vec2, goal: Vec2) -> Option<Platform> {
    let reach = max_jump_height() - CLIMB_MARGIN;
    platforms
        .iter()
        .filter(|p| p.y < feet.y - 5.0 && feet.y - p.y <= reach)
        .min_by(|a, b| {
            let da = (a.center().x - goal.x).abs() + (a.y - goal.y).abs();
            let db = (b.center().x - goal.x).abs() + (b.y - goal.y).abs();
            da.total_cmp(&db)
        })
        .copied()
}

/// Horizontal distance from `x` to the platform's span, zero when under it
fn horizontal_gap(platform: &Platform, x: f32) -> f32 {
    (platform.x - x).max(x - platform.right()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Rect, tick};

    const DT: f32 = 1.0 / 60.0;

    fn quiet(level: u32) -> GameState {
        let settings = Settings {
            notifications: false,
            ..Settings::default()
        };
        let mut state = GameState::with_settings(21, level, settings);
        state.enemies.clear();
        state.start(0.0);
        state
    }

    #[test]
    fn test_heads_toward_goal() {
        let mut state = GameState::with_settings(1, 1, Settings::default());
        state.start(0.0);
        // Nearest goal on level 1 sits on the first ledge to the left
        let input = Autopilot::new().drive(&mut state);
        assert_ne!(input.move_x, 0.0);
    }

    #[test]
    fn test_picks_reachable_step() {
        let platforms = [
            Rect::new(0.0, 580.0, 800.0, 20.0),
            Rect::new(100.0, 500.0, 100.0, 20.0),
            Rect::new(100.0, 300.0, 100.0, 20.0),
        ];
        let step = next_step(&platforms, Vec2::new(50.0, 580.0), Vec2::new(150.0, 270.0));
        assert_eq!(step, Some(platforms[1]));
    }

    #[test]
    fn test_horizontal_gap() {
        let platform = Rect::new(450.0, 430.0, 200.0, 20.0);
        assert_eq!(horizontal_gap(&platform, 340.0), 110.0);
        assert_eq!(horizontal_gap(&platform, 500.0), 0.0);
        assert_eq!(horizontal_gap(&platform, 700.0), 50.0);
    }

    #[test]
    fn test_running_jump_across_gap() {
        // Level 2, platform 1 spans x 150..350 at y 500; the next step up
        // starts at x 450
        let mut state = quiet(2);
        state.goals[0].collect();
        state.player.body.pos = Vec2::new(345.0 - 22.5, 455.0);
        state.player.body.on_ground = true;

        let mut pilot = Autopilot::new();
        let input = pilot.drive(&mut state);
        assert!(input.jump);
        assert_eq!(input.move_x, 1.0);
    }

    #[test]
    fn test_clears_level_two() {
        let mut state = quiet(2);
        let mut pilot = Autopilot::new();
        for _ in 0..3_000 {
            let input = pilot.drive(&mut state);
            tick(&mut state, &input, DT);
            if state.is_ended() {
                break;
            }
        }
        assert!(state.outcome().is_some_and(|o| o.won));
    }

    #[test]
    fn test_dismisses_notifications() {
        let mut state = GameState::new(4);
        state.enemies.clear();
        state.start(0.0);
        let mut pilot = Autopilot::new();
        let mut dismissed = 0;
        for _ in 0..2_000 {
            if state.active_notification().is_some() {
                dismissed += 1;
            }
            let input = pilot.drive(&mut state);
            assert!(state.active_notification().is_none());
            tick(&mut state, &input, DT);
            if state.is_ended() {
                break;
            }
        }
        assert!(dismissed <= 1);
    }
}
