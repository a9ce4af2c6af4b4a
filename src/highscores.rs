//! High score leaderboard
//!
//! Kept in memory for the session, top 10 scores. Storing it is up to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name as entered at game over
    pub name: String,
    pub points: u64,
}

impl fmt::Display for HighScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.points)
    }
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, points: u64) -> bool {
        if points == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| points > e.points)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, points: u64) -> Option<usize> {
        if !self.qualifies(points) {
            return None;
        }
        let rank = self.entries.iter().position(|e| points > e.points);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score if it qualifies. Returns the rank achieved (1-indexed).
    ///
    /// Ties rank below existing entries with the same points.
    pub fn add_score(&mut self, name: impl Into<String>, points: u64) -> Option<usize> {
        let rank = self.potential_rank(points)?;
        let entry = HighScoreEntry {
            name: name.into(),
            points,
        };
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("High score {} entered at rank {}", points, rank);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.points)
    }
}

impl fmt::Display for HighScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{:>2}. {}", i + 1, entry)?;
        }
        Ok(())
    }
}
