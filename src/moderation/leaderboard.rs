//! Global guardian leaderboard, bounded to the policy's top-N

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub actions: u64,
}

/// Name used for a guardian's first leaderboard appearance
pub fn default_display_name(moderator_id: &str) -> String {
    let short: String = moderator_id.chars().take(8).collect();
    format!("Guardian {short}")
}

/// Sorted (descending by score) list of at most `capacity` entries.
///
/// Re-sorting the whole list per write is fine at this size; a min-heap of
/// `capacity` would be the replacement if the list ever grows large.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }

    /// Insert or refresh a guardian, then re-rank and truncate.
    ///
    /// An existing entry keeps its display name; `name` only applies on insert.
    pub fn upsert(&mut self, id: &str, name: String, score: f64, actions: u64, capacity: usize) {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.score = score;
                entry.actions = actions;
            }
            None => self.entries.push(LeaderboardEntry {
                id: id.to_string(),
                name,
                score,
                actions,
            }),
        }

        // Ties fall back to id so the order is deterministic
        self.entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        self.entries.truncate(capacity);
    }
}
