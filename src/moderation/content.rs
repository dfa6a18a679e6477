//! Content records: pinned items, their decision history and quality rating

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::consensus::{
    ModerationAction, ModerationLogEntry, ModerationStatus, replay_confidence, resolve_status,
};
use super::policy::ModerationPolicy;

/// Community quality rating, independent of guardian moderation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReputation {
    pub total_score: f64,
    pub count: u64,
    pub average: f64,
}

impl ContentReputation {
    pub fn add_rating(&mut self, score: f64) {
        self.total_score += score;
        self.count += 1;
        self.average = self.total_score / self.count as f64;
    }
}

/// Third-party acknowledgement of a content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub receipt_id: String,
    pub authority_id: String,
    pub authority_name: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub signature: String,
}

/// A moderated content item keyed by CID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub cid: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub pinned_at: DateTime<Utc>,
    #[serde(default)]
    pub reputation: ContentReputation,
    #[serde(default)]
    pub receipts: Vec<Receipt>,
    #[serde(default)]
    pub moderation_log: Vec<ModerationLogEntry>,
    /// Cached signed sum of `moderation_log` powers
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub moderation_status: ModerationStatus,
    #[serde(default)]
    pub conflict_alert: bool,
    #[serde(default)]
    pub incentive_weights: f64,
}

/// Effect of one decision on a content record
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDecision {
    pub status: ModerationStatus,
    pub confidence_score: f64,
    pub escalated: bool,
}

impl ContentRecord {
    pub fn new(cid: String, metadata: serde_json::Value, pinned_at: DateTime<Utc>) -> Self {
        Self {
            cid,
            metadata,
            pinned_at,
            reputation: ContentReputation::default(),
            receipts: Vec::new(),
            moderation_log: Vec::new(),
            confidence_score: 0.0,
            moderation_status: ModerationStatus::PendingCommunityConsensus,
            conflict_alert: false,
            incentive_weights: 0.0,
        }
    }

    /// Confidence recomputed from the log
    pub fn replayed_confidence(&self) -> f64 {
        replay_confidence(&self.moderation_log)
    }

    pub fn is_consistent(&self) -> bool {
        (self.replayed_confidence() - self.confidence_score).abs() < 1e-9
    }

    /// Append a decision, then rescore and re-resolve status
    pub fn apply_decision(
        &mut self,
        moderator_id: &str,
        action: ModerationAction,
        applied_power: f64,
        reward: f64,
        now: DateTime<Utc>,
        policy: &ModerationPolicy,
    ) -> AppliedDecision {
        let replayed = self.replayed_confidence();
        if !self.is_consistent() {
            warn!(
                cid = %self.cid,
                cached = self.confidence_score,
                replayed = replayed,
                "Cached confidence diverged from moderation log, using replayed value"
            );
        }

        let confidence_after = replayed + action.sign() * applied_power;
        let resolution = resolve_status(
            &self.moderation_log,
            action,
            applied_power,
            confidence_after,
            policy,
        );

        self.moderation_log.push(ModerationLogEntry {
            moderator_id: moderator_id.to_string(),
            action,
            timestamp: now,
            reward_earned: reward,
            applied_power,
        });
        self.confidence_score = confidence_after;
        self.incentive_weights += policy.incentive_for(action);
        self.moderation_status = resolution.status;
        if resolution.escalated {
            self.conflict_alert = true;
        }

        AppliedDecision {
            status: resolution.status,
            confidence_score: confidence_after,
            escalated: resolution.escalated,
        }
    }
}

/// Badge derived from a content item's own rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentBadge {
    #[serde(rename = "Privacy Guardian")]
    PrivacyGuardian,
    #[serde(rename = "Trusted Contributor")]
    TrustedContributor,
    #[serde(rename = "Verified Pioneer")]
    VerifiedPioneer,
    #[serde(rename = "Novice")]
    Novice,
}

impl ContentBadge {
    pub fn for_reputation(reputation: &ContentReputation) -> Self {
        let ContentReputation { count, average, .. } = *reputation;
        if count >= 10 && average >= 4.5 {
            ContentBadge::PrivacyGuardian
        } else if count >= 5 && average >= 4.0 {
            ContentBadge::TrustedContributor
        } else if count >= 1 {
            ContentBadge::VerifiedPioneer
        } else {
            ContentBadge::Novice
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ContentRecord {
        ContentRecord::new("bafy-test".to_string(), serde_json::json!({}), Utc::now())
    }

    #[test]
    fn test_apply_decisions_accumulates() {
        let policy = ModerationPolicy::default();
        let mut content = record();

        let first = content.apply_decision("a", ModerationAction::Validate, 2.5, 50.0, Utc::now(), &policy);
        assert_eq!(first.confidence_score, 2.5);
        assert_eq!(content.incentive_weights, 100.0);

        content.apply_decision("b", ModerationAction::FlagFalse, 1.0, 20.0, Utc::now(), &policy);
        assert_eq!(content.confidence_score, 1.5);
        // Flags add nothing to the incentive pool
        assert_eq!(content.incentive_weights, 100.0);
        assert_eq!(content.moderation_log.len(), 2);
        assert!(content.is_consistent());
    }

    #[test]
    fn test_verified_after_threshold() {
        let policy = ModerationPolicy::default();
        let mut content = record();
        content.apply_decision("s1", ModerationAction::Validate, 5.0, 50.0, Utc::now(), &policy);
        let applied =
            content.apply_decision("s2", ModerationAction::Validate, 5.0, 50.0, Utc::now(), &policy);
        assert_eq!(applied.status, ModerationStatus::VerifiedByGuardian);
        assert!(!content.conflict_alert);
    }

    #[test]
    fn test_divergent_cache_is_repaired() {
        let policy = ModerationPolicy::default();
        let mut content = record();
        content.apply_decision("a", ModerationAction::Validate, 1.0, 50.0, Utc::now(), &policy);
        content.confidence_score = 42.0;
        assert!(!content.is_consistent());

        content.apply_decision("b", ModerationAction::Validate, 1.0, 50.0, Utc::now(), &policy);
        assert_eq!(content.confidence_score, 2.0);
        assert!(content.is_consistent());
    }

    #[test]
    fn test_rating_average() {
        let mut reputation = ContentReputation::default();
        reputation.add_rating(5.0);
        reputation.add_rating(4.0);
        assert_eq!(reputation.count, 2);
        assert!((reputation.average - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_badges() {
        let rep = |count: u64, average: f64| ContentReputation {
            total_score: average * count as f64,
            count,
            average,
        };
        assert_eq!(ContentBadge::for_reputation(&rep(10, 4.5)), ContentBadge::PrivacyGuardian);
        assert_eq!(ContentBadge::for_reputation(&rep(9, 4.9)), ContentBadge::TrustedContributor);
        assert_eq!(ContentBadge::for_reputation(&rep(5, 3.9)), ContentBadge::VerifiedPioneer);
        assert_eq!(ContentBadge::for_reputation(&rep(0, 0.0)), ContentBadge::Novice);
        assert_eq!(
            serde_json::to_string(&ContentBadge::TrustedContributor).unwrap(),
            "\"Trusted Contributor\""
        );
    }
}
