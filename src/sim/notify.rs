//! Interrupting notifications
//!
//! Workplace chat messages that pop up mid-level and block player input until
//! the host dismisses them. The world keeps moving underneath; only the
//! notification timer itself is paused while one is on screen.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::state::{GameEvent, GamePhase, GameState};

/// How loudly a message demands attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn emoji(self) -> &'static str {
        match self {
            Urgency::Low => "🟢",
            Urgency::Medium => "🟡",
            Urgency::High => "🔴",
        }
    }
}

/// A single popup message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub sender: &'static str,
    pub message: &'static str,
    pub urgency: Urgency,
}

const fn note(sender: &'static str, message: &'static str, urgency: Urgency) -> Notification {
    Notification {
        sender,
        message,
        urgency,
    }
}

pub static MESSAGES: [Notification; 16] = [
    note(
        "Sarah Chen (PM)",
        "Where's the status update on the authentication feature? Client is asking for ETA.",
        Urgency::High,
    ),
    note(
        "Mike Roberts (CEO)",
        "We need to ship this today. No excuses. The board meeting is tomorrow.",
        Urgency::High,
    ),
    note(
        "Jennifer Liu (PM)",
        "Can you hop on a quick call? Just need 5 minutes to discuss the requirements.",
        Urgency::Medium,
    ),
    note(
        "David Thompson (CTO)",
        "Production is down. Drop everything and fix the payment gateway NOW.",
        Urgency::High,
    ),
    note(
        "Lisa Parker (PM)",
        "Client changed their mind again. Need to revert all changes and start over.",
        Urgency::Medium,
    ),
    note(
        "James Wilson (CTO)",
        "The database is corrupted. Please tell me you have backups ready.",
        Urgency::High,
    ),
    note(
        "Michelle Chang (PM)",
        "Marketing needs the API docs by EOD. Can you prioritize this?",
        Urgency::Medium,
    ),
    note(
        "Kevin Martinez (QA)",
        "Found 47 new bugs in the latest build. Should I create tickets for all of them?",
        Urgency::Medium,
    ),
    note(
        "Rachel Wong (Designer)",
        "The buttons are 2px off from the mockup. Can you fix them before launch?",
        Urgency::Low,
    ),
    note(
        "Tony Stark (DevOps)",
        "The CI/CD pipeline is broken again. Third time this week. Help?",
        Urgency::High,
    ),
    note(
        "Emma Johnson (HR)",
        "Don't forget about the mandatory team building session at 2pm today!",
        Urgency::Low,
    ),
    note(
        "Alex Kumar (PM)",
        "Can we add 'just one more feature'? It's super simple, I promise.",
        Urgency::Medium,
    ),
    note(
        "Derek Kim (CTO)",
        "Security audit found vulnerabilities. Need patches deployed immediately.",
        Urgency::High,
    ),
    note(
        "Natalie Brown (PM)",
        "Can you join the retrospective? We need to discuss why velocity is down.",
        Urgency::Low,
    ),
    note(
        "Tyler Scott (QA)",
        "All tests are failing after your last commit. Can you take a look?",
        Urgency::High,
    ),
    note(
        "Ethan Davis (PM)",
        "Can you estimate how long it would take to rewrite everything in React?",
        Urgency::Low,
    ),
];

/// Delay before the first message of a level (seconds)
const FIRST_DELAY: (f32, f32) = (1.0, 5.0);
/// Delay between later messages (seconds)
const LATER_DELAY: (f32, f32) = (15.0, 40.0);

/// Per-level notification schedule
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationTimer {
    /// Seconds accumulated toward the next message
    pub elapsed: f32,
    /// Messages shown so far this level
    pub sent: u32,
    /// Delay until the next message fires
    pub next_interval: f32,
}

impl NotificationTimer {
    /// Draw the delay for the next message
    pub fn arm(&mut self, rng: &mut Pcg32) {
        let (lo, hi) = if self.sent == 0 {
            FIRST_DELAY
        } else {
            LATER_DELAY
        };
        self.elapsed = 0.0;
        self.next_interval = rng.random_range(lo..hi);
    }
}

/// Maximum messages for a level
pub fn limit_for(state: &GameState) -> u32 {
    state.level.min(state.settings.notification_cap)
}

/// Advance the notification timer and pop a message when it fires.
///
/// Only runs during uninterrupted play.
pub fn update(state: &mut GameState, dt: f32) {
    if !state.settings.notifications || state.phase != GamePhase::Playing {
        return;
    }
    if state.notifications.sent >= limit_for(state) {
        return;
    }

    state.notifications.elapsed += dt;
    if state.notifications.elapsed <= state.notifications.next_interval {
        return;
    }

    let notification = MESSAGES[state.rng.random_range(0..MESSAGES.len())];
    state.notifications.sent += 1;
    state.notifications.arm(&mut state.rng);
    state.phase = GamePhase::Interrupted { notification };
    state.events.push(GameEvent::NotificationShown { notification });
    log::debug!(
        "Notification {} from {}",
        state.notifications.sent,
        notification.sender
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    const DT: f32 = 0.016;

    fn playing(level: u32, settings: Settings) -> GameState {
        let mut state = GameState::with_settings(21, level, settings);
        state.start(0.0);
        state
    }

    /// Run the timer until a message pops, dismissing nothing
    fn run_until_shown(state: &mut GameState, max_steps: usize) -> Option<usize> {
        for step in 0..max_steps {
            update(state, DT);
            if state.active_notification().is_some() {
                return Some(step);
            }
        }
        None
    }

    #[test]
    fn test_first_delay_is_armed_in_range() {
        let state = GameState::new(3);
        let interval = state.notifications.next_interval;
        assert!((1.0..5.0).contains(&interval));
    }

    #[test]
    fn test_first_message_within_five_seconds() {
        let mut state = playing(1, Settings::default());
        let step = run_until_shown(&mut state, 400).expect("no message within 6.4s");
        assert!(step as f32 * DT <= 5.0 + DT);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::NotificationShown { .. })
        ));
        assert!((15.0..40.0).contains(&state.notifications.next_interval));
    }

    #[test]
    fn test_timer_paused_while_shown() {
        let mut state = playing(2, Settings::default());
        run_until_shown(&mut state, 400).expect("no message");
        let elapsed = state.notifications.elapsed;
        for _ in 0..100 {
            update(&mut state, DT);
        }
        assert_eq!(state.notifications.elapsed, elapsed);
        assert!(state.dismiss_notification());
        assert!(!state.dismiss_notification());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_level_limit_caps_messages() {
        let mut state = playing(1, Settings::default());
        run_until_shown(&mut state, 400).expect("no message");
        state.dismiss_notification();
        // Level 1 allows a single message
        assert_eq!(run_until_shown(&mut state, 5_000), None);
        assert_eq!(state.notifications.sent, 1);
    }

    #[test]
    fn test_cap_and_toggle_from_settings() {
        let settings = Settings {
            notification_cap: 1,
            ..Settings::default()
        };
        let state = playing(4, settings);
        assert_eq!(limit_for(&state), 1);

        let settings = Settings {
            notifications: false,
            ..Settings::default()
        };
        let mut state = playing(4, settings);
        assert_eq!(run_until_shown(&mut state, 5_000), None);
    }

    #[test]
    fn test_messages_are_well_formed() {
        assert!(MESSAGES.iter().all(|m| !m.sender.is_empty() && !m.message.is_empty()));
        assert!(MESSAGES.iter().any(|m| m.urgency == Urgency::Low));
        assert_eq!(Urgency::High.emoji(), "🔴");
    }
}
