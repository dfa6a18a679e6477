//! Guardian Moderation Consensus
//!
//! Guardians validate or flag pinned content. Each decision is weighted by the
//! guardian's accumulated rewards, and content status follows the weighted sum.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ GuardianStats    │────►│ ModerationEngine  │◄────│ ModerationPolicy │
//! │ (reward ledger)  │     │ (orchestrator)    │     │ (tiers, rewards) │
//! └──────────────────┘     └───────────────────┘     └──────────────────┘
//!                                   │
//!               ┌───────────────────┼───────────────────┐
//!               ▼                   ▼                   ▼
//!      ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//!      │ ContentRecord   │ │ WeeklySnapshot  │ │ Leaderboard     │
//!      │ (log, status)   │ │ (ISO week)      │ │ (top-N)         │
//!      └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Consensus Model
//!
//! - Power comes from the guardian's rewards *before* the current decision
//! - Confidence is the signed sum of applied powers in the moderation log
//! - Confidence >= 10 verifies, <= -5 flags for review
//! - A senior decision contradicting an earlier senior decision escalates to
//!   joint review and raises a sticky conflict alert

mod consensus;
mod content;
mod engine;
mod leaderboard;
mod ledger;
mod policy;
mod weekly;

pub use consensus::{
    ModerationAction, ModerationLogEntry, ModerationStatus, Resolution, has_senior_conflict,
    replay_confidence, resolve_status, status_from_score,
};
pub use content::{AppliedDecision, ContentBadge, ContentRecord, ContentReputation, Receipt};
pub use engine::{
    ContentAudit, DecisionOutcome, DecisionRequest, ModerationEngine, ReceiptRequest,
};
pub use leaderboard::{Leaderboard, LeaderboardEntry, default_display_name};
pub use ledger::{GuardianStats, GuardianStatsView};
pub use policy::{ModerationPolicy, PowerTier};
pub use weekly::{WeekId, WeeklyReport, WeeklySnapshot, growth_streak};
