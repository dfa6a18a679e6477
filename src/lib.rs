//! Guardian Moderation Consensus Engine
//!
//! Reputation-weighted moderation of pinned content: guardians validate or
//! flag content, decisions are weighted by each guardian's reward tier, and
//! senior disagreements escalate to joint review.
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── lib.rs          - Crate root with re-exports
//! ├── main.rs         - Server entrypoint
//! ├── config.rs       - Environment configuration
//! ├── error.rs        - ModerationError taxonomy
//! ├── moderation/     - Consensus engine
//! │   ├── policy.rs      - Tiers, rewards, thresholds
//! │   ├── consensus.rs   - Confidence, disputes, status resolution
//! │   ├── content.rs     - Content records, receipts, ratings, badges
//! │   ├── ledger.rs      - Per-guardian reward ledger
//! │   ├── weekly.rs      - ISO-week snapshots and growth streaks
//! │   ├── leaderboard.rs - Top-N guardians
//! │   └── engine.rs      - Orchestrator
//! ├── store/          - Versioned key-value persistence
//! │   ├── memory.rs   - In-process backend
//! │   └── postgres.rs - PostgreSQL backend
//! └── api/            - HTTP API endpoints
//!     ├── guardian.rs   - /moderate and /guardian/*
//!     ├── content.rs    - /ipfs/*
//!     ├── error.rs      - Error responses
//!     └── middleware.rs - Rate limiting, headers, logging
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod moderation;
pub mod store;

// Re-export main types for convenience
pub use config::GuardianConfig;
pub use error::ModerationError;
pub use moderation::{
    ContentBadge, ContentRecord, DecisionOutcome, DecisionRequest, GuardianStats,
    GuardianStatsView, LeaderboardEntry, ModerationAction, ModerationEngine, ModerationPolicy,
    ModerationStatus, WeekId, WeeklyReport, WeeklySnapshot,
};
pub use store::{MemoryStore, PostgresStore, StateStore, StoreError, VersionedValue, WriteBatch};

// Re-export API types
pub use api::{GuardianApiState, SecurityMiddlewareConfig, SecurityState, create_app, create_router};
