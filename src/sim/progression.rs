//! Win/loss arbitration
//!
//! Goal collection, the floor metric, the death sequence and the end-of-level
//! outcome (with a time rating on full-game victory).

use serde::Serialize;

use super::state::{GameEvent, GamePhase, GameState, Outcome, PlayerLife};
use crate::consts::*;

/// Performance tier awarded for finishing the final level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Rating {
    SPlus,
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Rating {
    /// Tier thresholds in seconds per level, best first
    const THRESHOLDS: [(Rating, f64); 6] = [
        (Rating::SPlus, 15.0),
        (Rating::S, 25.0),
        (Rating::A, 35.0),
        (Rating::B, 50.0),
        (Rating::C, 75.0),
        (Rating::D, 120.0),
    ];

    /// Rate a completion time. Thresholds scale linearly with the level.
    pub fn for_time(seconds: f64, level: u32) -> Self {
        let level = f64::from(level.max(1));
        Self::THRESHOLDS
            .iter()
            .find(|(_, limit)| seconds <= limit * level)
            .map_or(Rating::F, |&(rating, _)| rating)
    }

    pub fn grade(self) -> &'static str {
        match self {
            Rating::SPlus => "S+",
            Rating::S => "S",
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
            Rating::F => "F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::SPlus => "Scrum Master",
            Rating::S => "Sprint Hero",
            Rating::A => "Agile Ace",
            Rating::B => "Backlog Burner",
            Rating::C => "Code Crawler",
            Rating::D => "Debug Drifter",
            Rating::F => "Feature Freeze",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.grade(), self.label())
    }
}

/// Format milliseconds as `m:ss`
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Collect every goal within reach. Collecting the last one wins the level.
pub fn collect_goals(state: &mut GameState) {
    if state.player.is_dying() {
        return;
    }
    let center = state.player.body.center();

    for (index, goal) in state.goals.iter_mut().enumerate() {
        if goal.is_collected() || goal.center().distance(center) >= GOAL_RADIUS {
            continue;
        }
        if goal.collect() {
            state.score += GOAL_BONUS;
            state.events.push(GameEvent::GoalCollected {
                index,
                pos: goal.pos,
            });
        }
    }

    if !state.goals.is_empty() && state.all_goals_collected() && !state.level_complete {
        log::info!("All goals collected on level {}", state.level);
        end_level(state, true);
    }
}

/// Recompute the floor after an enemy death and check the top-of-level win.
///
/// The floor only ever rises within a level.
pub fn update_floor(state: &mut GameState) {
    let alive = state.alive_enemy_count() as u32;
    let floor = BASE_FLOOR.saturating_sub(alive / 2).max(1);
    state.floor = state.floor.max(floor);

    if alive == 0 && state.player.body.pos.y < TOP_THRESHOLD && !state.level_complete {
        log::info!("Level {} cleared from the top", state.level);
        end_level(state, true);
    }
}

/// Fall-off and health checks, and the death animation timer
pub fn update_death(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    match player.life {
        PlayerLife::Alive => {
            if player.body.pos.y > PLAYER_FALL_LIMIT {
                player.health = 0;
            }
            if player.health <= 0 {
                player.life = PlayerLife::Dying { timer: 0.0 };
                player.body.velocity_y = -DEATH_BOUNCE;
                player.body.knockback_x = 0.0;
                state.events.push(GameEvent::GameOver);
                log::info!("Player down on level {}", state.level);
            }
        }
        PlayerLife::Dying { timer } => {
            let timer = timer + dt;
            player.life = PlayerLife::Dying { timer };
            if timer > DEATH_DURATION || player.body.pos.y > DEATH_FALL_LIMIT {
                end_level(state, false);
            }
        }
    }
}

/// Finish the level attempt and hand the outcome to the host
pub fn end_level(state: &mut GameState, won: bool) {
    if state.is_ended() {
        return;
    }
    state.player.has_won = won;
    state.level_complete = won;

    let (elapsed_ms, rating) = if won && state.level == MAX_LEVEL {
        let elapsed = match (state.clock.last_ms(), state.run_started_ms) {
            (Some(now), Some(started)) => Some((now - started).max(0.0) as u64),
            _ => None,
        };
        let rating = elapsed.map(|ms| Rating::for_time(ms as f64 / 1000.0, state.level));
        (elapsed, rating)
    } else {
        (None, None)
    };

    let outcome = Outcome {
        won,
        score: state.score,
        level: state.level,
        elapsed_ms,
        rating,
    };

    if won {
        state.events.push(GameEvent::Victory);
    }
    state.events.push(GameEvent::LevelEnded { outcome });
    state.phase = GamePhase::Ended { outcome };

    match (outcome.rating, outcome.elapsed_ms) {
        (Some(rating), Some(ms)) => {
            log::info!(
                "Run complete: score {} in {} rated {}",
                outcome.score,
                format_elapsed(ms),
                rating
            );
        }
        _ => log::info!(
            "Level {} ended: {} with score {}",
            outcome.level,
            if won { "won" } else { "lost" },
            outcome.score
        ),
    }
}
