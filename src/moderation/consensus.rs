//! Weighted consensus: confidence scoring, dispute detection, status resolution
//!
//! The moderation log is the source of truth. Confidence is the signed sum of
//! applied powers across the log; status is recomputed from that score and the
//! dispute check after every decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::policy::ModerationPolicy;

/// Decision a guardian casts on a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationAction {
    /// Content is genuine
    Validate,
    /// Content is false or abusive
    FlagFalse,
}

impl ModerationAction {
    /// +1 for validations, -1 for flags
    pub fn sign(self) -> f64 {
        match self {
            ModerationAction::Validate => 1.0,
            ModerationAction::FlagFalse => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModerationAction::Validate => "VALIDATE",
            ModerationAction::FlagFalse => "FLAG_FALSE",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VALIDATE" => Ok(ModerationAction::Validate),
            "FLAG_FALSE" => Ok(ModerationAction::FlagFalse),
            other => Err(format!(
                "Unknown action '{other}' (expected VALIDATE or FLAG_FALSE)"
            )),
        }
    }
}

/// Moderation status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationStatus {
    #[default]
    PendingCommunityConsensus,
    VerifiedByGuardian,
    FlaggedForReview,
    /// Senior guardians disagree; needs human resolution
    JointReviewRequired,
}

/// One entry of a content item's append-only decision history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationLogEntry {
    pub moderator_id: String,
    pub action: ModerationAction,
    pub timestamp: DateTime<Utc>,
    pub reward_earned: f64,
    pub applied_power: f64,
}

impl ModerationLogEntry {
    /// Contribution of this entry to the confidence score
    pub fn signed_power(&self) -> f64 {
        self.action.sign() * self.applied_power
    }
}

/// Signed sum of applied powers over a log
pub fn replay_confidence(log: &[ModerationLogEntry]) -> f64 {
    log.iter().map(ModerationLogEntry::signed_power).sum()
}

/// True when a prior senior decision disagrees with `action`
pub fn has_senior_conflict(
    prior_log: &[ModerationLogEntry],
    action: ModerationAction,
    policy: &ModerationPolicy,
) -> bool {
    prior_log
        .iter()
        .filter(|entry| policy.is_senior(entry.applied_power))
        .any(|entry| entry.action != action)
}

/// Status derived from the confidence score alone
pub fn status_from_score(confidence: f64, policy: &ModerationPolicy) -> ModerationStatus {
    if confidence >= policy.verify_threshold {
        ModerationStatus::VerifiedByGuardian
    } else if confidence <= policy.flag_threshold {
        ModerationStatus::FlaggedForReview
    } else {
        ModerationStatus::PendingCommunityConsensus
    }
}

/// Result of resolving status after a new decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub status: ModerationStatus,
    /// A senior dispute was escalated by this decision
    pub escalated: bool,
}

/// Resolve the status after appending a decision.
///
/// `prior_log` excludes the decision being resolved. Escalation only happens
/// when the new decision is itself senior; a junior dissent falls through to
/// the score thresholds.
pub fn resolve_status(
    prior_log: &[ModerationLogEntry],
    action: ModerationAction,
    applied_power: f64,
    confidence_after: f64,
    policy: &ModerationPolicy,
) -> Resolution {
    if policy.is_senior(applied_power) && has_senior_conflict(prior_log, action, policy) {
        return Resolution {
            status: ModerationStatus::JointReviewRequired,
            escalated: true,
        };
    }

    Resolution {
        status: status_from_score(confidence_after, policy),
        escalated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, action: ModerationAction, power: f64) -> ModerationLogEntry {
        ModerationLogEntry {
            moderator_id: id.to_string(),
            action,
            timestamp: Utc::now(),
            reward_earned: 0.0,
            applied_power: power,
        }
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("VALIDATE".parse::<ModerationAction>(), Ok(ModerationAction::Validate));
        assert_eq!("FLAG_FALSE".parse::<ModerationAction>(), Ok(ModerationAction::FlagFalse));
        assert!("validate".parse::<ModerationAction>().is_err());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ModerationStatus::JointReviewRequired).unwrap();
        assert_eq!(json, "\"JOINT_REVIEW_REQUIRED\"");
        let json = serde_json::to_string(&ModerationAction::FlagFalse).unwrap();
        assert_eq!(json, "\"FLAG_FALSE\"");
    }

    #[test]
    fn test_replay_confidence() {
        let log = vec![
            entry("a", ModerationAction::Validate, 2.5),
            entry("b", ModerationAction::FlagFalse, 1.5),
            entry("c", ModerationAction::Validate, 5.0),
        ];
        assert_eq!(replay_confidence(&log), 6.0);
        assert_eq!(replay_confidence(&[]), 0.0);
    }

    #[test]
    fn test_score_thresholds() {
        let policy = ModerationPolicy::default();
        assert_eq!(status_from_score(10.0, &policy), ModerationStatus::VerifiedByGuardian);
        assert_eq!(status_from_score(9.5, &policy), ModerationStatus::PendingCommunityConsensus);
        assert_eq!(status_from_score(-4.0, &policy), ModerationStatus::PendingCommunityConsensus);
        assert_eq!(status_from_score(-5.0, &policy), ModerationStatus::FlaggedForReview);
    }

    #[test]
    fn test_senior_dispute_escalates() {
        let policy = ModerationPolicy::default();
        let prior = vec![entry("s1", ModerationAction::Validate, 5.0)];

        let resolution = resolve_status(&prior, ModerationAction::FlagFalse, 5.0, 0.0, &policy);
        assert_eq!(resolution.status, ModerationStatus::JointReviewRequired);
        assert!(resolution.escalated);
    }

    #[test]
    fn test_junior_dissent_does_not_escalate() {
        let policy = ModerationPolicy::default();
        let prior = vec![
            entry("s1", ModerationAction::Validate, 5.0),
            entry("s2", ModerationAction::Validate, 5.0),
        ];

        let resolution = resolve_status(&prior, ModerationAction::FlagFalse, 2.5, 7.5, &policy);
        assert_eq!(resolution.status, ModerationStatus::PendingCommunityConsensus);
        assert!(!resolution.escalated);
    }

    #[test]
    fn test_senior_agreement_uses_score() {
        let policy = ModerationPolicy::default();
        let prior = vec![
            entry("s1", ModerationAction::Validate, 5.0),
            entry("j1", ModerationAction::FlagFalse, 1.0),
        ];

        // Junior flag in the history is not a senior conflict
        let resolution = resolve_status(&prior, ModerationAction::Validate, 5.0, 9.0, &policy);
        assert_eq!(resolution.status, ModerationStatus::PendingCommunityConsensus);
        assert!(!resolution.escalated);
    }
}
