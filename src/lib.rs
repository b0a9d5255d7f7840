//! Git Over It - a single-screen action platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, enemy AI, combat, progression)
//! - `settings`: Host-tunable settings
//! - `highscores`: In-memory leaderboard of finished levels
//! - `autopilot`: Scripted player for headless runs

pub mod autopilot;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Play field width (the world is a single 800x600 screen)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    /// Largest step the frame clock will ever hand to the simulation
    pub const MAX_FRAME_DT: f32 = 0.016;

    /// Downward acceleration (pixels/s²), shared by player and enemies
    pub const GRAVITY: f32 = 1200.0;
    /// Launch speed of a jump (pixels/s, applied upward)
    pub const JUMP_VELOCITY: f32 = 600.0;
    /// Depth below a platform top that still counts as landing on it
    pub const LANDING_TOLERANCE: f32 = 10.0;
    /// Knockback below this magnitude snaps to zero
    pub const KNOCKBACK_EPSILON: f32 = 10.0;
    /// Knockback decay rates (1/s); the player recovers faster
    pub const PLAYER_KNOCKBACK_DECAY: f32 = 4.0;
    pub const ENEMY_KNOCKBACK_DECAY: f32 = 3.0;

    /// Player defaults
    pub const PLAYER_START: Vec2 = Vec2::new(400.0, 500.0);
    pub const PLAYER_SIZE: Vec2 = Vec2::new(45.0, 45.0);
    pub const PLAYER_RENDER_SIZE: Vec2 = Vec2::new(60.0, 60.0);
    pub const PLAYER_MAX_HEALTH: i32 = 150;
    pub const PLAYER_SPEED: f32 = 200.0;
    /// Player falling past this line dies
    pub const PLAYER_FALL_LIMIT: f32 = 650.0;
    /// Upward pop when the death sequence starts
    pub const DEATH_BOUNCE: f32 = 400.0;
    /// Longest the death sequence runs before the level ends
    pub const DEATH_DURATION: f32 = 2.0;
    /// A dying player below this line ends the sequence early
    pub const DEATH_FALL_LIMIT: f32 = 700.0;

    /// Enemy contact damage
    pub const CONTACT_DAMAGE: i32 = 25;
    pub const CONTACT_KNOCKBACK: f32 = 150.0;
    pub const CONTACT_COOLDOWN: f32 = 1.5;
    /// Centre-to-centre proximity for an enemy to land a contact hit
    pub const CONTACT_RANGE_X: f32 = 50.0;
    pub const CONTACT_RANGE_Y: f32 = 30.0;
    /// Top-left distance for a hit when the player walks into an enemy
    pub const WALK_IN_RANGE_X: f32 = 40.0;

    /// Sword
    pub const SWORD_DAMAGE: i32 = 25;
    pub const SWORD_REACH: f32 = 80.0;
    /// How far the blade starts inside the player's leading edge
    pub const SWORD_INSET: f32 = 10.0;
    pub const SWORD_KNOCKBACK: f32 = 100.0;
    pub const SWING_DURATION: f32 = 0.3;
    pub const ATTACK_COOLDOWN: f32 = 0.4;
    /// Normalized swing progress during which the blade connects
    pub const HIT_WINDOW_START: f32 = 0.3;
    pub const HIT_WINDOW_END: f32 = 0.6;
    pub const ENEMY_HIT_COOLDOWN: f32 = 0.3;

    /// Enemy defaults
    pub const ENEMY_SIZE: Vec2 = Vec2::new(30.0, 30.0);
    pub const ENEMY_RENDER_SIZE: Vec2 = Vec2::new(40.0, 40.0);
    pub const BOSS_SIZE: Vec2 = Vec2::new(45.0, 45.0);
    pub const BOSS_RENDER_SIZE: Vec2 = Vec2::new(60.0, 60.0);
    /// Enemies falling past this line are removed
    pub const ENEMY_FALL_LIMIT: f32 = 700.0;

    /// Enemy AI
    pub const SIGHT_RANGE_X: f32 = 150.0;
    pub const SIGHT_RANGE_Y: f32 = 80.0;
    pub const STARTLE_DURATION: f32 = 0.5;
    pub const CHASE_RANGE_X: f32 = 120.0;
    pub const CHASE_RANGE_Y: f32 = 80.0;
    /// Patrol turnaround margin from the platform edges
    pub const EDGE_MARGIN: f32 = 10.0;

    /// Goals
    pub const GOAL_SIZE: Vec2 = Vec2::new(35.0, 35.0);
    pub const GOAL_RADIUS: f32 = 50.0;
    pub const GOAL_BONUS: u64 = 50;

    /// Progression
    pub const MAX_LEVEL: u32 = 5;
    pub const BASE_FLOOR: u32 = 8;
    /// Clearing every enemy above this line also wins the level
    pub const TOP_THRESHOLD: f32 = 100.0;

    /// Decorative code blocks
    pub const CODE_BLOCK_COUNT: usize = 80;
    pub const COMMIT_RADIUS: f32 = 100.0;
    pub const COMMIT_LIMIT: usize = 3;
}

/// Highest point a jump reaches above its launch height (v² / 2g)
#[inline]
pub fn max_jump_height() -> f32 {
    consts::JUMP_VELOCITY * consts::JUMP_VELOCITY / (2.0 * consts::GRAVITY)
}
