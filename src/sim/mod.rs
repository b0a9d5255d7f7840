//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied, clamped timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod level;
pub mod notify;
pub mod physics;
pub mod progression;
pub mod state;
pub mod tick;

pub use collision::{Platform, Rect, movement_blocked, overlaps};
pub use level::{GapReport, LevelConfig, LEVELS, reachability};
pub use notify::{Notification, NotificationTimer, Urgency};
pub use progression::Rating;
pub use state::{
    AiState, AttackState, Body, CodeBlock, Enemy, EnemyKind, GameEvent, GamePhase, GameState,
    Goal, Outcome, Player, PlayerLife,
};
pub use tick::{FrameClock, TickInput, tick};
