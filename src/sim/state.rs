//! Game state and core simulation types
//!
//! A `GameState` owns everything for one level attempt. Level transitions and
//! restarts rebuild it wholesale; no entity survives a level boundary.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{Platform, Rect};
use super::level::{self, LevelConfig};
use super::notify::{Notification, NotificationTimer};
use super::progression::Rating;
use super::tick::FrameClock;
use crate::consts::*;
use crate::settings::Settings;

/// Current mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GamePhase {
    /// Level built, waiting for the host to start play
    Ready,
    /// Active gameplay
    Playing,
    /// A notification popup blocks player input until dismissed
    Interrupted { notification: Notification },
    /// Level attempt is over
    Ended { outcome: Outcome },
}

/// Result handed to the host when a level attempt ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub won: bool,
    pub score: u64,
    pub level: u32,
    /// Wall-clock run time, only set on full-game victory
    pub elapsed_ms: Option<u64>,
    /// Performance tier, only set on full-game victory
    pub rating: Option<Rating>,
}

impl Outcome {
    /// Whether the host may offer a "next level" transition
    pub fn can_advance(&self) -> bool {
        self.won && self.level < MAX_LEVEL
    }
}

/// Discrete events raised during a tick, for audio/effects collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    Jump,
    Attack { origin: Vec2, direction: f32 },
    EnemyHit { id: u32, pos: Vec2 },
    EnemyDefeated { id: u32, kind: EnemyKind, points: u64, pos: Vec2 },
    CodeCommitted { pos: Vec2 },
    PlayerHit { damage: i32, pos: Vec2 },
    GoalCollected { index: usize, pos: Vec2 },
    Victory,
    GameOver,
    NotificationShown { notification: Notification },
    LevelEnded { outcome: Outcome },
}

/// Physical state shared by the player and enemies
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Collision size (smaller than the rendered sprite)
    pub size: Vec2,
    pub velocity_y: f32,
    /// Transient horizontal impulse, decays toward zero
    pub knockback_x: f32,
    pub on_ground: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity_y: 0.0,
            knockback_x: 0.0,
            on_ground: true,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Sword swing state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AttackState {
    Idle,
    /// `progress` runs 0..1 over the swing; `hit_resolved` is set once the
    /// blade has been tested against enemies
    Swinging { progress: f32, hit_resolved: bool },
}

/// Player life cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PlayerLife {
    Alive,
    /// Death animation running; `timer` counts up
    Dying { timer: f32 },
}

/// The player-controlled octopus
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub body: Body,
    pub render_size: Vec2,
    /// May dip below zero for a frame before the death check runs
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    /// -1.0 (left) or 1.0 (right)
    pub direction: f32,
    pub attack: AttackState,
    /// Seconds until the next swing may start
    pub attack_cooldown: f32,
    pub life: PlayerLife,
    pub has_won: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            body: Body::new(PLAYER_START, PLAYER_SIZE),
            render_size: PLAYER_RENDER_SIZE,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            speed: PLAYER_SPEED,
            direction: 1.0,
            attack: AttackState::Idle,
            attack_cooldown: 0.0,
            life: PlayerLife::Alive,
            has_won: false,
        }
    }
}

impl Player {
    #[inline]
    pub fn is_dying(&self) -> bool {
        matches!(self.life, PlayerLife::Dying { .. })
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        matches!(self.attack, AttackState::Swinging { .. })
    }

    /// Swing progress for the renderer (0 when idle)
    pub fn attack_progress(&self) -> f32 {
        match self.attack {
            AttackState::Swinging { progress, .. } => progress,
            AttackState::Idle => 0.0,
        }
    }

    /// Health as shown on the HUD (never negative)
    pub fn display_health(&self) -> i32 {
        self.health.max(0)
    }
}

/// Enemy types. Type decides looks, stats and points; behaviour is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnemyKind {
    Bug,
    Conflict,
    Legacy,
    Timeout,
    Boss,
}

impl EnemyKind {
    /// Kinds that spawn on regular platforms
    pub const REGULAR: [EnemyKind; 4] = [
        EnemyKind::Bug,
        EnemyKind::Conflict,
        EnemyKind::Legacy,
        EnemyKind::Timeout,
    ];

    pub fn base_health(self, level: u32) -> i32 {
        match self {
            EnemyKind::Boss => 50 + (level.saturating_sub(3) as i32) * 25,
            _ => 50,
        }
    }

    /// Speed before the level multiplier (pixels/s)
    pub fn base_speed(self) -> f32 {
        match self {
            EnemyKind::Bug => 50.0,
            EnemyKind::Conflict => 60.0,
            EnemyKind::Legacy => 30.0,
            EnemyKind::Timeout => 80.0,
            EnemyKind::Boss => 40.0,
        }
    }

    pub fn points(self, level: u32) -> u64 {
        match self {
            EnemyKind::Bug => 10,
            EnemyKind::Conflict => 15,
            EnemyKind::Legacy => 20,
            EnemyKind::Timeout => 12,
            EnemyKind::Boss => 100 * level as u64,
        }
    }

    pub fn emoji(self, level: u32) -> &'static str {
        match self {
            EnemyKind::Bug => "🐛",
            EnemyKind::Conflict => "⚡",
            EnemyKind::Legacy => "💩",
            EnemyKind::Timeout => "⏰",
            EnemyKind::Boss => match level {
                4 => "🤖",
                5 => "👾",
                _ => "👹",
            },
        }
    }
}

/// Enemy AI state. Only ever moves forward: Patrol -> Startled -> Aggressive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AiState {
    Patrol,
    /// Just spotted the player; frozen while `remaining` counts down
    Startled { remaining: f32 },
    Aggressive,
}

impl AiState {
    /// One-way latch: once the player has been seen it stays seen
    #[inline]
    pub fn has_seen_player(&self) -> bool {
        !matches!(self, AiState::Patrol)
    }

    /// 1.0 at the moment of the startle, falling to 0.0 (for the "!" bubble)
    pub fn startle_progress(&self) -> f32 {
        match *self {
            AiState::Startled { remaining } => (remaining / STARTLE_DURATION).max(0.0),
            _ => 0.0,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    pub render_size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub direction: f32,
    /// Seconds before this enemy can deal (or is stunned from) another hit
    pub hit_cooldown: f32,
    /// False marks the enemy for removal by the next compaction pass
    pub alive: bool,
    /// Platform this enemy patrols
    pub platform_index: usize,
    pub points: u64,
    pub ai: AiState,
}

/// A collectible level objective
#[derive(Debug, Clone, Serialize)]
pub struct Goal {
    pub pos: Vec2,
    pub size: Vec2,
    pub emoji: &'static str,
    collected: bool,
}

impl Goal {
    pub fn new(pos: Vec2, emoji: &'static str) -> Self {
        Self {
            pos,
            size: GOAL_SIZE,
            emoji,
            collected: false,
        }
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark collected. Returns true only on the first call.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Background code snippet; "committed" when an enemy dies nearby
#[derive(Debug, Clone, Serialize)]
pub struct CodeBlock {
    pub pos: Vec2,
    pub text: &'static str,
    pub opacity: f32,
    committed: bool,
}

impl CodeBlock {
    pub fn new(pos: Vec2, text: &'static str, opacity: f32) -> Self {
        Self {
            pos,
            text,
            opacity,
            committed: false,
        }
    }

    #[inline]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Commit this block. Returns true only on the first call.
    pub fn commit(&mut self) -> bool {
        if self.committed {
            return false;
        }
        self.committed = true;
        self.opacity = 1.0;
        true
    }
}

/// Complete session state for one level attempt
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    /// Current level (1..=MAX_LEVEL)
    pub level: u32,
    pub config: &'static LevelConfig,
    pub phase: GamePhase,
    /// Cumulative across the levels of a run
    pub score: u64,
    /// Progress metric derived from surviving enemies; never decreases
    pub floor: u32,
    pub level_complete: bool,
    /// Simulated seconds spent playing this level
    pub game_time: f32,
    pub player: Player,
    /// Static platforms; index 0 is the ground
    pub platforms: Vec<Platform>,
    /// Active enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    pub goals: Vec<Goal>,
    pub code_blocks: Vec<CodeBlock>,
    pub notifications: NotificationTimer,
    pub clock: FrameClock,
    /// Host timestamp when level 1 of this run started
    pub run_started_ms: Option<f64>,
    /// Events raised during the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session on level 1 with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, 1, Settings::default())
    }

    /// Create a new session on the given level
    pub fn with_settings(seed: u64, level: u32, settings: Settings) -> Self {
        let level = level::effective_level(level);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock: FrameClock::new(settings.max_frame_dt),
            settings,
            level,
            config: level::config_for(level),
            phase: GamePhase::Ready,
            score: 0,
            floor: 1,
            level_complete: false,
            game_time: 0.0,
            player: Player::default(),
            platforms: Vec::new(),
            enemies: Vec::new(),
            goals: Vec::new(),
            code_blocks: Vec::new(),
            notifications: NotificationTimer::default(),
            run_started_ms: None,
            events: Vec::new(),
            next_id: 1,
        };
        state.rebuild_level();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Throw away every entity and build the current level from scratch
    pub(crate) fn rebuild_level(&mut self) {
        self.config = level::config_for(self.level);
        self.player = Player::default();
        self.phase = GamePhase::Ready;
        self.floor = 1;
        self.level_complete = false;
        self.game_time = 0.0;
        self.enemies.clear();
        self.events.clear();
        self.notifications = NotificationTimer::default();
        level::build_level(self);
        self.notifications.arm(&mut self.rng);
        self.normalize_order();
    }

    /// Begin play. On level 1 this also starts the run timer.
    pub fn start(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Ready {
            return;
        }
        if self.level == 1 {
            self.run_started_ms = Some(now_ms);
        }
        self.clock.reset(now_ms);
        self.phase = GamePhase::Playing;
        log::info!("Level {} started: {}", self.level, self.config.description);
    }

    /// Move to the next level after a win. Returns false if not allowed.
    pub fn advance_level(&mut self) -> bool {
        let allowed = matches!(self.phase, GamePhase::Ended { outcome } if outcome.can_advance());
        if !allowed {
            return false;
        }
        self.level += 1;
        self.rebuild_level();
        log::info!("Advanced to level {}", self.level);
        true
    }

    /// Start over from level 1, clearing score and run timer
    pub fn restart(&mut self) {
        self.level = 1;
        self.score = 0;
        self.run_started_ms = None;
        self.rebuild_level();
        log::info!("Run restarted");
    }

    /// Close the active notification popup. Returns false if none was shown.
    pub fn dismiss_notification(&mut self) -> bool {
        if let GamePhase::Interrupted { .. } = self.phase {
            self.phase = GamePhase::Playing;
            true
        } else {
            false
        }
    }

    /// Notification currently blocking input, if any
    pub fn active_notification(&self) -> Option<Notification> {
        match self.phase {
            GamePhase::Interrupted { notification } => Some(notification),
            _ => None,
        }
    }

    /// Outcome of the attempt once it has ended
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Ended { outcome } => Some(outcome),
            _ => None,
        }
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, GamePhase::Ended { .. })
    }

    /// Enemies still standing (dead ones may linger until the next compaction)
    pub fn alive_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn all_goals_collected(&self) -> bool {
        self.goals.iter().all(Goal::is_collected)
    }

    /// Ensure enemies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_ready_on_level_one() {
        let state = GameState::new(7);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.platforms.len(), 6);
        assert!(!state.goals.is_empty());
    }

    #[test]
    fn test_out_of_range_level_falls_back_to_one() {
        let state = GameState::with_settings(7, 42, Settings::default());
        assert_eq!(state.level, 1);
        let state = GameState::with_settings(7, 0, Settings::default());
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_goal_collect_latch() {
        let mut goal = Goal::new(Vec2::ZERO, "🚀");
        assert!(goal.collect());
        assert!(!goal.collect());
        assert!(goal.is_collected());
    }

    #[test]
    fn test_ai_state_latch_helpers() {
        assert!(!AiState::Patrol.has_seen_player());
        assert!(AiState::Startled { remaining: 0.25 }.has_seen_player());
        assert!((AiState::Startled { remaining: 0.25 }.startle_progress() - 0.5).abs() < 1e-6);
        assert!(AiState::Aggressive.has_seen_player());
    }

    #[test]
    fn test_boss_stats_scale_with_level() {
        assert_eq!(EnemyKind::Boss.base_health(3), 50);
        assert_eq!(EnemyKind::Boss.base_health(5), 100);
        assert_eq!(EnemyKind::Boss.points(4), 400);
    }

    #[test]
    fn test_advance_requires_win() {
        let mut state = GameState::new(1);
        assert!(!state.advance_level());
        state.phase = GamePhase::Ended {
            outcome: Outcome {
                won: false,
                score: 0,
                level: 1,
                elapsed_ms: None,
                rating: None,
            },
        };
        assert!(!state.advance_level());
    }

    #[test]
    fn test_advance_rebuilds_world_and_keeps_score() {
        let mut state = GameState::new(1);
        state.score = 120;
        state.player.health = 10;
        state.phase = GamePhase::Ended {
            outcome: Outcome {
                won: true,
                score: 120,
                level: 1,
                elapsed_ms: None,
                rating: None,
            },
        };
        assert!(state.advance_level());
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 120);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.platforms.len(), 8);
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.goals.iter().all(|g| !g.is_collected()));
    }

    #[test]
    fn test_restart_clears_score() {
        let mut state = GameState::with_settings(3, 4, Settings::default());
        state.score = 999;
        state.run_started_ms = Some(10.0);
        state.restart();
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.run_started_ms, None);
    }
}
