//! Git Over It headless driver
//!
//! Runs the simulation under the autopilot with a synthetic host clock, logs
//! what happens and prints the outcome.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use git_over_it::autopilot::Autopilot;
use git_over_it::sim::{GameEvent, GameState, Outcome};
use git_over_it::{HighScores, Settings};

#[derive(Parser, Debug)]
#[command(name = "git-over-it")]
#[command(about = "Headless runner for the Git Over It simulation")]
struct Cli {
    /// RNG seed for level layout, spawns and notifications
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Level to start on (out-of-range values fall back to 1)
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Frames to simulate per level before giving up
    #[arg(long, default_value_t = 36_000)]
    max_frames: u32,
    /// Host frame interval in milliseconds
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,
    /// Keep going to the next level after each win
    #[arg(long)]
    campaign: bool,
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Print the final world snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let mut state = GameState::with_settings(cli.seed, cli.level, settings);
    let mut scores = HighScores::new();
    let mut pilot = Autopilot::new();
    let mut now_ms = 0.0;

    log::info!("Git Over It (headless) seed={} level={}", cli.seed, state.level);

    loop {
        state.start(now_ms);
        let outcome = run_level(&mut state, &mut pilot, &mut now_ms, &cli);

        let Some(outcome) = outcome else {
            log::warn!(
                "Level {} still running after {} frames",
                state.level,
                cli.max_frames
            );
            break;
        };
        report(&outcome);
        if let Some(rank) = scores.record(&outcome) {
            println!("  leaderboard rank: #{rank}");
        }

        if !(cli.campaign && state.advance_level()) {
            break;
        }
    }

    if cli.snapshot {
        let json = serde_json::to_string_pretty(&state).context("serializing snapshot")?;
        println!("{json}");
    }
    Ok(())
}

/// Drive one level until it ends or the frame budget runs out
fn run_level(
    state: &mut GameState,
    pilot: &mut Autopilot,
    now_ms: &mut f64,
    cli: &Cli,
) -> Option<Outcome> {
    for _ in 0..cli.max_frames {
        *now_ms += cli.frame_ms;
        let input = pilot.drive(state);
        state.frame(&input, *now_ms);

        for event in &state.events {
            log_event(event);
        }
        if let Some(outcome) = state.outcome() {
            return Some(outcome);
        }
    }
    None
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::EnemyDefeated { kind, points, .. } => {
            log::info!("Defeated {kind:?} (+{points})");
        }
        GameEvent::PlayerHit { damage, .. } => log::info!("Took {damage} damage"),
        GameEvent::GoalCollected { index, .. } => log::info!("Collected goal {index}"),
        GameEvent::NotificationShown { notification } => {
            log::info!(
                "{} {}: {}",
                notification.urgency.emoji(),
                notification.sender,
                notification.message
            );
        }
        GameEvent::Victory => log::info!("Victory!"),
        GameEvent::GameOver => log::info!("Game over"),
        other => log::debug!("{other:?}"),
    }
}

fn report(outcome: &Outcome) {
    let verdict = if outcome.won { "WON" } else { "LOST" };
    println!(
        "Level {}: {verdict} with score {}",
        outcome.level, outcome.score
    );
    if let (Some(ms), Some(rating)) = (outcome.elapsed_ms, outcome.rating) {
        println!(
            "  run time {} rated {rating}",
            git_over_it::sim::progression::format_elapsed(ms)
        );
    }
}
