//! Guardian reputation ledger
//!
//! Cumulative per-guardian totals. `total_actions` always equals
//! `approvals + flags` and `total_rewards` never decreases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::consensus::ModerationAction;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianStats {
    pub total_actions: u64,
    pub total_rewards: f64,
    pub approvals: u64,
    pub flags: u64,
    /// None until the guardian's first decision
    pub last_action_at: Option<DateTime<Utc>>,
}

impl GuardianStats {
    /// Credit one decision
    pub fn record_decision(&mut self, action: ModerationAction, reward: f64, now: DateTime<Utc>) {
        self.total_actions += 1;
        self.total_rewards += reward.max(0.0);
        match action {
            ModerationAction::Validate => self.approvals += 1,
            ModerationAction::FlagFalse => self.flags += 1,
        }
        self.last_action_at = Some(now);
    }
}

/// Stats as reported to callers, with derived title and leader flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianStatsView {
    #[serde(flatten)]
    pub stats: GuardianStats,
    pub title: String,
    pub is_active_leader: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_decision_keeps_invariant() {
        let mut stats = GuardianStats::default();
        stats.record_decision(ModerationAction::Validate, 50.0, Utc::now());
        stats.record_decision(ModerationAction::FlagFalse, 20.0, Utc::now());
        stats.record_decision(ModerationAction::Validate, 50.0, Utc::now());

        assert_eq!(stats.total_actions, 3);
        assert_eq!(stats.approvals, 2);
        assert_eq!(stats.flags, 1);
        assert_eq!(stats.total_actions, stats.approvals + stats.flags);
        assert_eq!(stats.total_rewards, 120.0);
        assert!(stats.last_action_at.is_some());
    }

    #[test]
    fn test_view_serializes_flat() {
        let view = GuardianStatsView {
            stats: GuardianStats::default(),
            title: "Junior Guardian".to_string(),
            is_active_leader: false,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["totalActions"], 0);
        assert_eq!(json["title"], "Junior Guardian");
        assert_eq!(json["isActiveLeader"], false);
    }
}
