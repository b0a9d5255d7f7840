//! Level tables and per-level world generation
//!
//! Platforms are hand-authored; goals, enemies and background code blocks
//! are derived from them when a level is built.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::collision::{Platform, Rect};
use super::state::{AiState, Body, CodeBlock, Enemy, EnemyKind, GameState, Goal};
use crate::consts::*;
use crate::max_jump_height;

/// Immutable per-level definition
#[derive(Debug, Serialize)]
pub struct LevelConfig {
    pub platforms: &'static [Platform],
    /// Chance (0..1) that a regular platform gets an enemy
    pub enemy_spawn_rate: f64,
    /// Multiplier on enemy base speed
    pub enemy_speed: f32,
    pub description: &'static str,
}

const fn p(x: f32, y: f32, w: f32) -> Platform {
    Rect::new(x, y, w, 20.0)
}

/// All levels, index 0 is level 1
pub static LEVELS: [LevelConfig; MAX_LEVEL as usize] = [
    LevelConfig {
        platforms: &[
            p(0.0, 580.0, 800.0),
            p(150.0, 500.0, 250.0),
            p(400.0, 430.0, 250.0),
            p(150.0, 360.0, 250.0),
            p(400.0, 290.0, 250.0),
            p(300.0, 200.0, 200.0),
        ],
        // Level 1 overrides this with exactly one enemy
        enemy_spawn_rate: 1.0,
        enemy_speed: 0.7,
        description: "Tutorial: Learn the ropes",
    },
    LevelConfig {
        platforms: &[
            p(0.0, 580.0, 800.0),
            p(150.0, 500.0, 200.0),
            p(450.0, 430.0, 200.0),
            p(150.0, 360.0, 200.0),
            p(450.0, 290.0, 200.0),
            p(200.0, 220.0, 200.0),
            p(400.0, 150.0, 200.0),
            p(300.0, 80.0, 200.0),
        ],
        enemy_spawn_rate: 0.6,
        enemy_speed: 1.0,
        description: "Basic: Standard challenge",
    },
    LevelConfig {
        platforms: &[
            p(0.0, 580.0, 800.0),
            p(100.0, 500.0, 150.0),
            p(550.0, 430.0, 150.0),
            p(100.0, 360.0, 150.0),
            p(550.0, 290.0, 150.0),
            p(200.0, 220.0, 150.0),
            p(450.0, 150.0, 150.0),
            p(100.0, 80.0, 150.0),
            p(550.0, 20.0, 150.0),
        ],
        enemy_spawn_rate: 0.8,
        enemy_speed: 1.2,
        description: "Advanced: Narrow platforms",
    },
    LevelConfig {
        platforms: &[
            p(0.0, 580.0, 800.0),
            p(100.0, 520.0, 120.0),
            p(300.0, 480.0, 120.0),
            p(580.0, 440.0, 120.0),
            p(50.0, 380.0, 120.0),
            p(350.0, 340.0, 120.0),
            p(600.0, 300.0, 120.0),
            p(200.0, 240.0, 120.0),
            p(500.0, 180.0, 120.0),
            p(100.0, 120.0, 120.0),
            p(580.0, 60.0, 120.0),
            p(340.0, 20.0, 120.0),
        ],
        enemy_spawn_rate: 0.9,
        enemy_speed: 1.4,
        description: "Expert: Precise jumps required",
    },
    LevelConfig {
        platforms: &[
            p(0.0, 580.0, 800.0),
            p(50.0, 500.0, 100.0),
            p(200.0, 460.0, 100.0),
            p(350.0, 420.0, 100.0),
            p(500.0, 380.0, 100.0),
            p(650.0, 340.0, 100.0),
            p(100.0, 280.0, 100.0),
            p(300.0, 240.0, 100.0),
            p(500.0, 200.0, 100.0),
            p(200.0, 140.0, 100.0),
            p(400.0, 100.0, 100.0),
            p(600.0, 60.0, 100.0),
            p(350.0, 20.0, 100.0),
        ],
        enemy_spawn_rate: 1.0,
        enemy_speed: 1.6,
        description: "BOSS LEVEL: The final challenge!",
    },
];

/// Goal emoji, handed out in platform order
pub const GOAL_EMOJIS: [&str; 10] = ["🚀", "💎", "⭐", "🏆", "👑", "💯", "🎯", "🔥", "⚡", "🌟"];
pub const FINAL_GOAL_EMOJI: &str = "🎯";

/// Snippets scattered in the background
pub const CODE_SNIPPETS: [&str; 16] = [
    "git rebase -i",
    "cargo build --release",
    "fn main() {}",
    "git push --force",
    "impl Drop for Bug",
    "match result { .. }",
    "git cherry-pick",
    "#[derive(Debug)]",
    "git stash pop",
    "unsafe { }",
    "git bisect bad",
    "todo!()",
    "git merge --no-ff",
    "Arc<Mutex<T>>",
    "git commit --amend",
    "cargo clippy",
];

/// Clamp an arbitrary level number into range, falling back to level 1
pub fn effective_level(level: u32) -> u32 {
    if (1..=MAX_LEVEL).contains(&level) {
        level
    } else {
        log::warn!("Level {} out of range, falling back to level 1", level);
        1
    }
}

/// Config for a level number (level 1 if out of range)
pub fn config_for(level: u32) -> &'static LevelConfig {
    (level as usize)
        .checked_sub(1)
        .and_then(|i| LEVELS.get(i))
        .unwrap_or(&LEVELS[0])
}

/// Populate platforms, goals, code blocks and enemies for `state.level`
pub fn build_level(state: &mut GameState) {
    state.platforms = state.config.platforms.to_vec();
    state.goals = derive_goals(&state.platforms);
    state.code_blocks = scatter_code_blocks(&mut state.rng);
    spawn_enemies(state);

    for gap in reachability(&state.platforms) {
        log::debug!(
            "Platform {}: v-gap={}px h-gap={}px reachable={}",
            gap.index,
            gap.vertical_gap,
            gap.horizontal_gap,
            gap.reachable
        );
    }
    log::info!(
        "Built level {}: {} platforms, {} goals, {} enemies",
        state.level,
        state.platforms.len(),
        state.goals.len(),
        state.enemies.len()
    );
}

/// Every second platform from index 1 gets a goal near its right edge, and
/// the final platform always gets the terminal goal at its midpoint.
pub fn derive_goals(platforms: &[Platform]) -> Vec<Goal> {
    let mut goals = Vec::new();

    for (i, platform) in platforms.iter().enumerate().skip(1).step_by(2) {
        let emoji_index = (i - 1) / 2;
        let Some(&emoji) = GOAL_EMOJIS.get(emoji_index) else {
            break;
        };
        let pos = Vec2::new(platform.right() - 40.0, platform.y - 30.0);
        goals.push(Goal::new(pos, emoji));
    }

    if platforms.len() > 1 {
        if let Some(last) = platforms.last() {
            let pos = Vec2::new(last.x + last.w / 2.0 - 15.0, last.y - 30.0);
            goals.push(Goal::new(pos, FINAL_GOAL_EMOJI));
        }
    }

    goals
}

fn scatter_code_blocks<R: Rng>(rng: &mut R) -> Vec<CodeBlock> {
    (0..CODE_BLOCK_COUNT)
        .map(|_| {
            let x = rng.random::<f32>() * 750.0 + 25.0;
            let y = rng.random::<f32>() * 650.0 + 50.0;
            let text = CODE_SNIPPETS[rng.random_range(0..CODE_SNIPPETS.len())];
            let opacity = 0.2 + rng.random::<f32>() * 0.3;
            CodeBlock::new(Vec2::new(x, y), text, opacity)
        })
        .collect()
}

/// Spawn regular enemies on the middle platforms, plus a boss from level 3
pub fn spawn_enemies(state: &mut GameState) {
    let platform_count = state.platforms.len();
    if platform_count < 3 {
        return;
    }
    let tutorial = state.level == 1;

    for index in 1..platform_count - 1 {
        let spawn = if tutorial {
            index == 1
        } else {
            state.rng.random::<f64>() < state.config.enemy_spawn_rate
        };
        if !spawn {
            continue;
        }

        let kind = EnemyKind::REGULAR[state.rng.random_range(0..EnemyKind::REGULAR.len())];
        let platform = state.platforms[index];
        let x = platform.x + state.rng.random::<f32>() * (platform.w - 40.0);
        let direction = if state.rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
        let pos = Vec2::new(x, platform.y - 40.0);
        let enemy = make_enemy(state, kind, pos, ENEMY_SIZE, ENEMY_RENDER_SIZE, direction, index);
        state.enemies.push(enemy);

        if tutorial {
            break;
        }
    }

    if state.level >= 3 {
        let index = platform_count - 1;
        let platform = state.platforms[index];
        let pos = Vec2::new(platform.x + platform.w / 2.0 - 30.0, platform.y - 60.0);
        let boss = make_enemy(state, EnemyKind::Boss, pos, BOSS_SIZE, BOSS_RENDER_SIZE, 1.0, index);
        state.enemies.push(boss);
    }
}

fn make_enemy(
    state: &mut GameState,
    kind: EnemyKind,
    pos: Vec2,
    size: Vec2,
    render_size: Vec2,
    direction: f32,
    platform_index: usize,
) -> Enemy {
    let health = kind.base_health(state.level);
    Enemy {
        id: state.next_entity_id(),
        kind,
        body: Body::new(pos, size),
        render_size,
        health,
        max_health: health,
        speed: kind.base_speed() * state.config.enemy_speed,
        direction,
        hit_cooldown: 0.0,
        alive: true,
        platform_index,
        points: kind.points(state.level),
        ai: AiState::Patrol,
    }
}

/// Reachability of one platform from the one before it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapReport {
    pub index: usize,
    pub vertical_gap: f32,
    pub horizontal_gap: f32,
    pub reachable: bool,
}

/// Offline check of consecutive platform gaps against the jump height
pub fn reachability(platforms: &[Platform]) -> Vec<GapReport> {
    let jump_height = max_jump_height();
    platforms
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (previous, current) = (&pair[0], &pair[1]);
            let vertical_gap = previous.y - current.y;
            GapReport {
                index: i + 1,
                vertical_gap,
                horizontal_gap: (current.x - (previous.x + previous.w / 2.0)).abs(),
                reachable: vertical_gap <= jump_height,
            }
        })
        .collect()
}

/// True when every consecutive gap is within a single jump
pub fn is_reachable(platforms: &[Platform]) -> bool {
    reachability(platforms).iter().all(|gap| gap.reachable)
}
