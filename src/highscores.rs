//! High score leaderboard
//!
//! Tracks the top 10 finished levels of a session, in memory only.

use serde::{Deserialize, Serialize};

use crate::sim::{Outcome, Rating};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level the attempt ended on
    pub level: u32,
    pub won: bool,
    /// Full-run time, only for final-level victories
    pub elapsed_ms: Option<u64>,
    /// Tier label, only for final-level victories
    pub rating: Option<String>,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Record a finished level attempt.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn record(&mut self, outcome: &Outcome) -> Option<usize> {
        if !self.qualifies(outcome.score) {
            return None;
        }

        let entry = HighScoreEntry {
            score: outcome.score,
            level: outcome.level,
            won: outcome.won,
            elapsed_ms: outcome.elapsed_ms,
            rating: outcome.rating.map(|r: Rating| r.to_string()),
        };

        // Ties keep the earlier entry ahead
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("New high score #{rank}: {}", outcome.score);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(score: u64, level: u32) -> Outcome {
        Outcome {
            won: false,
            score,
            level,
            elapsed_ms: None,
            rating: None,
        }
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&outcome(0, 1)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_entries_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&outcome(100, 1)), Some(1));
        assert_eq!(scores.record(&outcome(300, 2)), Some(1));
        assert_eq!(scores.record(&outcome(200, 2)), Some(2));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_board_is_capped() {
        let mut scores = HighScores::new();
        for i in 1..=12 {
            scores.record(&outcome(i * 10, 1));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
        assert!(!scores.qualifies(30));
        assert_eq!(scores.record(&outcome(35, 1)), Some(10));
    }

    #[test]
    fn test_rating_is_recorded_as_label() {
        let mut scores = HighScores::new();
        let finished = Outcome {
            won: true,
            score: 900,
            level: 5,
            elapsed_ms: Some(60_000),
            rating: Some(Rating::SPlus),
        };
        scores.record(&finished);
        assert_eq!(scores.entries[0].rating.as_deref(), Some("S+ (Scrum Master)"));
        assert!(scores.entries[0].won);
    }
}
