//! Moderation Policy
//!
//! Reward amounts, decision power tiers, status thresholds and leaderboard
//! bounds. Everything the engine would otherwise hard-code lives here so it
//! can be tuned from configuration and pinned in tests.

use serde::{Deserialize, Serialize};

use super::consensus::ModerationAction;

/// One rung of the reputation ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerTier {
    /// Cumulative rewards needed to reach this tier (inclusive)
    pub min_rewards: f64,
    /// Weight applied to decisions cast from this tier
    pub power: f64,
    /// Display title for guardians in this tier
    pub title: String,
}

impl PowerTier {
    pub fn new(min_rewards: f64, power: f64, title: &str) -> Self {
        Self {
            min_rewards,
            power,
            title: title.to_string(),
        }
    }
}

/// Governance-configurable moderation policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationPolicy {
    /// Reward credited for a VALIDATE decision
    pub validate_reward: f64,
    /// Reward credited for a FLAG_FALSE decision
    pub flag_reward: f64,

    /// Incentive pool growth per VALIDATE
    pub validate_incentive: f64,
    /// Incentive pool growth per FLAG_FALSE
    pub flag_incentive: f64,

    /// Ladder ordered by ascending `min_rewards`, first rung at 0
    pub power_tiers: Vec<PowerTier>,

    /// Decisions at or above this power count as senior for dispute checks
    pub senior_power: f64,

    /// Confidence at or above which content is verified
    pub verify_threshold: f64,
    /// Confidence at or below which content is flagged
    pub flag_threshold: f64,

    /// Maximum leaderboard entries kept
    pub leaderboard_size: usize,

    /// Week-over-week comparisons inspected for the growth streak
    pub streak_window: u32,
    /// Consecutive increases needed for active leader status
    pub active_leader_streak: u32,

    /// Optimistic commit attempts before giving up on contention
    pub max_commit_attempts: u32,
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            validate_reward: 50.0,
            flag_reward: 20.0,
            validate_incentive: 100.0,
            flag_incentive: 0.0,
            power_tiers: vec![
                PowerTier::new(0.0, 1.0, "Junior Guardian"),
                PowerTier::new(1000.0, 1.5, "Privacy Guardian"),
                PowerTier::new(5000.0, 2.5, "Security Arbiter"),
                PowerTier::new(10000.0, 5.0, "Senior Arbiter"),
            ],
            senior_power: 5.0,
            verify_threshold: 10.0,
            flag_threshold: -5.0,
            leaderboard_size: 10,
            streak_window: 3,
            active_leader_streak: 2,
            max_commit_attempts: 5,
        }
    }
}

impl ModerationPolicy {
    /// Highest tier reached by `total_rewards`
    pub fn tier_for(&self, total_rewards: f64) -> Option<&PowerTier> {
        self.power_tiers
            .iter()
            .rev()
            .find(|tier| total_rewards >= tier.min_rewards)
    }

    /// Voting weight for a guardian holding `prior_rewards` before this decision
    pub fn decision_power(&self, prior_rewards: f64) -> f64 {
        self.tier_for(prior_rewards)
            .or_else(|| self.power_tiers.first())
            .map_or(0.0, |t| t.power)
    }

    pub fn title_for(&self, total_rewards: f64) -> &str {
        self.tier_for(total_rewards)
            .or_else(|| self.power_tiers.first())
            .map_or("", |t| t.title.as_str())
    }

    pub fn reward_for(&self, action: ModerationAction) -> f64 {
        match action {
            ModerationAction::Validate => self.validate_reward,
            ModerationAction::FlagFalse => self.flag_reward,
        }
    }

    pub fn incentive_for(&self, action: ModerationAction) -> f64 {
        match action {
            ModerationAction::Validate => self.validate_incentive,
            ModerationAction::FlagFalse => self.flag_incentive,
        }
    }

    pub fn is_senior(&self, power: f64) -> bool {
        power >= self.senior_power
    }

    /// Check internal consistency before the policy is put into service
    pub fn validate(&self) -> Result<(), String> {
        let first = self
            .power_tiers
            .first()
            .ok_or_else(|| "At least one power tier is required".to_string())?;
        if first.min_rewards != 0.0 {
            return Err("The first power tier must start at 0 rewards".to_string());
        }
        for pair in self.power_tiers.windows(2) {
            if pair[1].min_rewards <= pair[0].min_rewards {
                return Err(format!(
                    "Power tiers must be strictly ascending ({} after {})",
                    pair[1].min_rewards, pair[0].min_rewards
                ));
            }
        }
        if let Some(tier) = self
            .power_tiers
            .iter()
            .find(|t| !(t.power.is_finite() && t.power > 0.0))
        {
            return Err(format!("Tier '{}' has a non-positive power", tier.title));
        }
        let amounts = [
            ("validateReward", self.validate_reward),
            ("flagReward", self.flag_reward),
            ("validateIncentive", self.validate_incentive),
            ("flagIncentive", self.flag_incentive),
        ];
        for (name, value) in amounts {
            if !value.is_finite() {
                return Err(format!("{name} must be a finite number"));
            }
        }
        if self.validate_reward < 0.0 || self.flag_reward < 0.0 {
            return Err("Rewards cannot be negative".to_string());
        }
        if !(self.verify_threshold.is_finite() && self.flag_threshold.is_finite()) {
            return Err("Consensus thresholds must be finite numbers".to_string());
        }
        let max_power = self
            .power_tiers
            .iter()
            .map(|t| t.power)
            .fold(f64::MIN, f64::max);
        if !(self.senior_power.is_finite() && self.senior_power > 0.0) {
            return Err("Senior power must be a positive finite number".to_string());
        }
        if self.senior_power > max_power {
            return Err(format!(
                "Senior power {} is above the strongest tier ({})",
                self.senior_power, max_power
            ));
        }
        if self.flag_threshold >= self.verify_threshold {
            return Err(format!(
                "Flag threshold {} must be below verify threshold {}",
                self.flag_threshold, self.verify_threshold
            ));
        }
        if self.leaderboard_size == 0 {
            return Err("Leaderboard size must be at least 1".to_string());
        }
        if self.max_commit_attempts == 0 {
            return Err("At least one commit attempt is required".to_string());
        }
        Ok(())
    }
}
