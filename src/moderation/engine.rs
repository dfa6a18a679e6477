//! Moderation Engine - Main Orchestrator
//!
//! Runs the decision pipeline (ledger → power → consensus → status → weekly
//! snapshot → leaderboard) and answers the read-side queries. Every decision
//! reads the records it touches with their versions and commits all of them
//! in one conditional batch, retrying from fresh reads on conflict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ModerationError, Result, required};
use crate::moderation::{
    ContentRecord, ContentReputation, GuardianStats, GuardianStatsView, Leaderboard,
    LeaderboardEntry, ModerationAction, ModerationPolicy, ModerationStatus, Receipt, WeekId,
    WeeklyReport, WeeklySnapshot, default_display_name, growth_streak,
};
use crate::store::{StateStore, StoreError, WriteBatch, keys, load};

/// Body of a decision submission; fields are optional so absence is a
/// validation error rather than a decode failure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub cid: Option<String>,
    pub action: Option<String>,
    pub moderator_id: Option<String>,
    pub moderator_name: Option<String>,
}

impl DecisionRequest {
    pub fn new(cid: &str, action: ModerationAction, moderator_id: &str) -> Self {
        Self {
            cid: Some(cid.to_string()),
            action: Some(action.to_string()),
            moderator_id: Some(moderator_id.to_string()),
            moderator_name: None,
        }
    }

    fn validate(&self) -> Result<Decision> {
        let cid = required(self.cid.as_deref(), "cid")?;
        let action = required(self.action.as_deref(), "action")?
            .parse::<ModerationAction>()
            .map_err(ModerationError::Validation)?;
        let moderator_id = required(self.moderator_id.as_deref(), "moderatorId")?;
        let display_name = self
            .moderator_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_display_name(&moderator_id));

        Ok(Decision {
            cid,
            action,
            moderator_id,
            display_name,
        })
    }
}

#[derive(Debug, Clone)]
struct Decision {
    cid: String,
    action: ModerationAction,
    moderator_id: String,
    display_name: String,
}

/// Result of an accepted decision
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    pub status: ModerationStatus,
    pub reward: f64,
    pub total_incentive: f64,
    pub guardian_stats: GuardianStats,
    pub applied_power: f64,
    pub confidence_score: f64,
    pub conflict_alert: bool,
}

/// Body of a receipt submission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub cid: Option<String>,
    pub authority_id: Option<String>,
    pub authority_name: Option<String>,
    pub status: Option<String>,
    pub signature: Option<String>,
}

/// Cached score versus log replay for one content item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAudit {
    pub cid: String,
    pub cached_score: f64,
    pub replayed_score: f64,
    pub log_entries: usize,
    pub consistent: bool,
}

pub struct ModerationEngine {
    store: Arc<dyn StateStore>,
    policy: ModerationPolicy,
}

impl ModerationEngine {
    pub fn new(store: Arc<dyn StateStore>, policy: ModerationPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &ModerationPolicy {
        &self.policy
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Submit a guardian decision at the current time
    pub async fn submit_decision(&self, request: &DecisionRequest) -> Result<DecisionOutcome> {
        self.submit_decision_at(request, Utc::now()).await
    }

    pub async fn submit_decision_at(
        &self,
        request: &DecisionRequest,
        now: DateTime<Utc>,
    ) -> Result<DecisionOutcome> {
        let decision = request.validate().inspect_err(|e| {
            warn!(error = %e, "Rejected decision submission");
        })?;

        let outcome = self
            .with_commit_retries("decision", || self.try_submit(&decision, now))
            .await?;

        info!(
            cid = %decision.cid,
            moderator_id = %decision.moderator_id,
            action = %decision.action,
            power = outcome.applied_power,
            confidence = outcome.confidence_score,
            status = ?outcome.status,
            "Recorded moderation decision"
        );
        if outcome.conflict_alert && outcome.status == ModerationStatus::JointReviewRequired {
            warn!(cid = %decision.cid, "Senior guardians disagree, joint review required");
        }

        Ok(outcome)
    }

    async fn try_submit(&self, decision: &Decision, now: DateTime<Utc>) -> Result<DecisionOutcome> {
        let store = self.store.as_ref();

        let content_key = keys::content(&decision.cid);
        let (content, content_version) = load::<ContentRecord>(store, &content_key).await?;
        let mut content = content.ok_or_else(|| {
            ModerationError::NotFound(format!("Content not found: {}", decision.cid))
        })?;

        let guardian_key = keys::guardian(&decision.moderator_id);
        let (stats, stats_version) = load::<GuardianStats>(store, &guardian_key).await?;
        let mut stats = stats.unwrap_or_default();

        // Power comes from rewards as they stood before this decision
        let applied_power = self.policy.decision_power(stats.total_rewards);
        let reward = self.policy.reward_for(decision.action);

        let applied = content.apply_decision(
            &decision.moderator_id,
            decision.action,
            applied_power,
            reward,
            now,
            &self.policy,
        );
        stats.record_decision(decision.action, reward, now);

        let week = WeekId::containing(now);
        let weekly_key = keys::weekly(week, &decision.moderator_id);
        let (snapshot, snapshot_version) = load::<WeeklySnapshot>(store, &weekly_key).await?;
        let mut snapshot = snapshot.unwrap_or_else(|| WeeklySnapshot::empty(week));
        snapshot.accumulate(reward, now);

        let (board, board_version) = load::<Leaderboard>(store, keys::LEADERBOARD).await?;
        let mut board = board.unwrap_or_default();
        board.upsert(
            &decision.moderator_id,
            decision.display_name.clone(),
            stats.total_rewards,
            stats.total_actions,
            self.policy.leaderboard_size,
        );

        let mut batch = WriteBatch::new();
        batch
            .put(content_key, content_version, &content)?
            .put(guardian_key, stats_version, &stats)?
            .put(weekly_key, snapshot_version, &snapshot)?
            .put(keys::LEADERBOARD, board_version, &board)?;
        self.store.commit(batch).await?;

        Ok(DecisionOutcome {
            status: applied.status,
            reward,
            total_incentive: content.incentive_weights,
            guardian_stats: stats,
            applied_power,
            confidence_score: applied.confidence_score,
            conflict_alert: content.conflict_alert,
        })
    }

    /// Run `attempt` until it commits, re-reading on version conflicts
    async fn with_commit_retries<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.policy.max_commit_attempts.max(1);
        let mut tries = 0;
        loop {
            tries += 1;
            match attempt().await {
                Err(ModerationError::Storage(StoreError::Conflict { key })) if tries < max_attempts => {
                    debug!(
                        operation = operation,
                        key = %key,
                        attempt = tries,
                        "Concurrent update detected, retrying from fresh state"
                    );
                }
                Err(ModerationError::Storage(StoreError::Conflict { key })) => {
                    warn!(
                        operation = operation,
                        key = %key,
                        attempts = tries,
                        "Giving up after repeated write conflicts"
                    );
                    return Err(StoreError::Conflict { key }.into());
                }
                other => return other,
            }
        }
    }

    /// Stats for a guardian, with title and active-leader flag
    pub async fn guardian_stats(&self, moderator_id: Option<&str>) -> Result<GuardianStatsView> {
        self.guardian_stats_at(moderator_id, Utc::now()).await
    }

    pub async fn guardian_stats_at(
        &self,
        moderator_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<GuardianStatsView> {
        let moderator_id = required(moderator_id, "moderatorId")?;
        let (stats, _) =
            load::<GuardianStats>(self.store.as_ref(), &keys::guardian(&moderator_id)).await?;

        let Some(stats) = stats else {
            return Ok(GuardianStatsView {
                stats: GuardianStats::default(),
                title: self.policy.title_for(0.0).to_string(),
                is_active_leader: false,
            });
        };

        let streak = self.growth_streak_at(&moderator_id, now).await?;
        debug!(moderator_id = %moderator_id, streak = streak, "Computed growth streak");

        Ok(GuardianStatsView {
            title: self.policy.title_for(stats.total_rewards).to_string(),
            is_active_leader: streak >= self.policy.active_leader_streak,
            stats,
        })
    }

    /// Consecutive weeks of strictly increasing rewards, ending this week
    pub async fn growth_streak_at(&self, moderator_id: &str, now: DateTime<Utc>) -> Result<u32> {
        let current = WeekId::containing(now);
        let window = self.policy.streak_window;

        let mut totals = Vec::with_capacity(window as usize + 1);
        for weeks_back in 0..=window {
            let key = keys::weekly(current.back(weeks_back), moderator_id);
            let (snapshot, _) = load::<WeeklySnapshot>(self.store.as_ref(), &key).await?;
            totals.push(snapshot.map(|s| s.rewards));
        }

        Ok(growth_streak(&totals, window))
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let (board, _) = load::<Leaderboard>(self.store.as_ref(), keys::LEADERBOARD).await?;
        Ok(board.unwrap_or_default().into_entries())
    }

    pub async fn weekly_report(&self, moderator_id: Option<&str>) -> Result<WeeklyReport> {
        self.weekly_report_at(moderator_id, Utc::now()).await
    }

    pub async fn weekly_report_at(
        &self,
        moderator_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<WeeklyReport> {
        let moderator_id = required(moderator_id, "moderatorId")?;
        let week = WeekId::containing(now);
        let previous_week = week.previous();

        let store = self.store.as_ref();
        let (current, _) =
            load::<WeeklySnapshot>(store, &keys::weekly(week, &moderator_id)).await?;
        let (previous, _) =
            load::<WeeklySnapshot>(store, &keys::weekly(previous_week, &moderator_id)).await?;

        Ok(WeeklyReport {
            current: current.unwrap_or_else(|| WeeklySnapshot::empty(week)),
            previous: previous.unwrap_or_else(|| WeeklySnapshot::empty(previous_week)),
            week_number: week,
        })
    }

    /// Snapshots of every guardian for one week, keyed by moderator id
    pub async fn weekly_snapshots(&self, week: WeekId) -> Result<Vec<(String, WeeklySnapshot)>> {
        let prefix = keys::weekly_prefix(week);
        let rows = self.store.scan_prefix(&prefix).await?;

        rows.into_iter()
            .map(|(key, stored)| {
                let snapshot = stored.decode::<WeeklySnapshot>(&key)?;
                let moderator_id = key[prefix.len()..].to_string();
                Ok((moderator_id, snapshot))
            })
            .collect()
    }

    /// Create a content record; pinning an existing CID returns it unchanged
    pub async fn pin_content(
        &self,
        cid: Option<&str>,
        metadata: serde_json::Value,
    ) -> Result<(ContentRecord, bool)> {
        self.pin_content_at(cid, metadata, Utc::now()).await
    }

    pub async fn pin_content_at(
        &self,
        cid: Option<&str>,
        metadata: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<(ContentRecord, bool)> {
        let cid = required(cid, "cid")?;
        let key = keys::content(&cid);

        if let (Some(existing), _) = load::<ContentRecord>(self.store.as_ref(), &key).await? {
            debug!(cid = %cid, "Content already pinned");
            return Ok((existing, false));
        }

        let record = ContentRecord::new(cid.clone(), metadata, now);
        let mut batch = WriteBatch::new();
        batch.put(key.clone(), 0, &record)?;

        match self.store.commit(batch).await {
            Ok(()) => {
                info!(cid = %cid, "Pinned content");
                Ok((record, true))
            }
            Err(StoreError::Conflict { .. }) => {
                // Lost a race with another pin of the same CID
                let (existing, _) = load::<ContentRecord>(self.store.as_ref(), &key).await?;
                existing
                    .map(|r| (r, false))
                    .ok_or_else(|| StoreError::Conflict { key }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_content(&self, cid: Option<&str>) -> Result<ContentRecord> {
        let cid = required(cid, "cid")?;
        let (record, _) =
            load::<ContentRecord>(self.store.as_ref(), &keys::content(&cid)).await?;
        record.ok_or_else(|| ModerationError::NotFound(format!("Content not found: {cid}")))
    }

    /// Append a third-party receipt to a content record
    pub async fn add_receipt(&self, request: &ReceiptRequest) -> Result<Receipt> {
        self.add_receipt_at(request, Utc::now()).await
    }

    pub async fn add_receipt_at(
        &self,
        request: &ReceiptRequest,
        now: DateTime<Utc>,
    ) -> Result<Receipt> {
        let cid = required(request.cid.as_deref(), "cid")?;
        let authority_id = required(request.authority_id.as_deref(), "authorityId")?;
        let status = required(request.status.as_deref(), "status")?;

        let receipt = Receipt {
            receipt_id: Uuid::new_v4().to_string(),
            authority_name: request
                .authority_name
                .clone()
                .unwrap_or_else(|| authority_id.clone()),
            authority_id,
            timestamp: now,
            status,
            signature: request.signature.clone().unwrap_or_default(),
        };

        self.with_commit_retries("receipt", || {
            self.update_content(&cid, |record| record.receipts.push(receipt.clone()))
        })
        .await?;

        info!(cid = %cid, receipt_id = %receipt.receipt_id, "Appended receipt");
        Ok(receipt)
    }

    /// Record a 1-5 quality rating for a content item
    pub async fn rate_content(&self, cid: Option<&str>, score: Option<f64>) -> Result<ContentReputation> {
        let cid = required(cid, "cid")?;
        let score = score
            .filter(|s| s.is_finite() && (1.0..=5.0).contains(s))
            .ok_or_else(|| {
                ModerationError::Validation("score must be a number between 1 and 5".to_string())
            })?;

        let record = self
            .with_commit_retries("rating", || {
                self.update_content(&cid, |record| record.reputation.add_rating(score))
            })
            .await?;

        debug!(cid = %cid, score = score, average = record.reputation.average, "Rated content");
        Ok(record.reputation)
    }

    /// Compare the cached confidence against a replay of the log
    pub async fn audit_content(&self, cid: Option<&str>) -> Result<ContentAudit> {
        let record = self.get_content(cid).await?;
        let replayed = record.replayed_confidence();
        let consistent = record.is_consistent();
        if !consistent {
            warn!(
                cid = %record.cid,
                cached = record.confidence_score,
                replayed = replayed,
                "Confidence cache diverges from moderation log"
            );
        }

        Ok(ContentAudit {
            cid: record.cid,
            cached_score: record.confidence_score,
            replayed_score: replayed,
            log_entries: record.moderation_log.len(),
            consistent,
        })
    }

    async fn update_content<F>(&self, cid: &str, mutate: F) -> Result<ContentRecord>
    where
        F: FnOnce(&mut ContentRecord),
    {
        let key = keys::content(cid);
        let (record, version) = load::<ContentRecord>(self.store.as_ref(), &key).await?;
        let mut record =
            record.ok_or_else(|| ModerationError::NotFound(format!("Content not found: {cid}")))?;

        mutate(&mut record);

        let mut batch = WriteBatch::new();
        batch.put(key, version, &record)?;
        self.store.commit(batch).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn engine() -> ModerationEngine {
        ModerationEngine::new(Arc::new(MemoryStore::new()), ModerationPolicy::default())
    }

    async fn seed_rewards(engine: &ModerationEngine, moderator_id: &str, total_rewards: f64) {
        let stats = GuardianStats {
            total_actions: (total_rewards / 50.0) as u64,
            total_rewards,
            approvals: (total_rewards / 50.0) as u64,
            flags: 0,
            last_action_at: None,
        };
        let mut batch = WriteBatch::new();
        batch.put(keys::guardian(moderator_id), 0, &stats).unwrap();
        engine.store().commit(batch).await.unwrap();
    }

    #[tokio::test]
    async fn test_first_decision_on_new_content() {
        let engine = engine();
        engine.pin_content(Some("cid-x"), serde_json::json!({})).await.unwrap();

        let outcome = engine
            .submit_decision(&DecisionRequest::new("cid-x", ModerationAction::Validate, "alice"))
            .await
            .unwrap();

        assert_eq!(outcome.applied_power, 1.0);
        assert_eq!(outcome.reward, 50.0);
        assert_eq!(outcome.confidence_score, 1.0);
        assert_eq!(outcome.status, ModerationStatus::PendingCommunityConsensus);
        assert_eq!(outcome.total_incentive, 100.0);
        assert_eq!(outcome.guardian_stats.total_actions, 1);
    }

    #[tokio::test]
    async fn test_missing_fields_are_validation_errors() {
        let engine = engine();
        let request = DecisionRequest {
            cid: Some("cid".to_string()),
            action: None,
            moderator_id: Some("m".to_string()),
            moderator_name: None,
        };
        let err = engine.submit_decision(&request).await.unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));

        let request = DecisionRequest {
            action: Some("APPROVE".to_string()),
            ..DecisionRequest::new("cid", ModerationAction::Validate, "m")
        };
        let err = engine.submit_decision(&request).await.unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_content_mutates_nothing() {
        let store = Arc::new(MemoryStore::new());
        let engine = ModerationEngine::new(store.clone(), ModerationPolicy::default());

        let err = engine
            .submit_decision(&DecisionRequest::new("missing", ModerationAction::Validate, "m"))
            .await
            .unwrap_err();

        assert!(matches!(err, ModerationError::NotFound(_)));
        assert!(store.scan_prefix("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_power_tier_uses_prior_rewards() {
        let engine = engine();
        engine.pin_content(Some("cid"), serde_json::json!({})).await.unwrap();
        seed_rewards(&engine, "vet", 9950.0).await;

        let first = engine
            .submit_decision(&DecisionRequest::new("cid", ModerationAction::Validate, "vet"))
            .await
            .unwrap();
        assert_eq!(first.applied_power, 2.5);
        assert_eq!(first.guardian_stats.total_rewards, 10000.0);

        let second = engine
            .submit_decision(&DecisionRequest::new("cid", ModerationAction::Validate, "vet"))
            .await
            .unwrap();
        assert_eq!(second.applied_power, 5.0);
    }

    #[tokio::test]
    async fn test_active_leader_requires_two_increases() {
        let engine = engine();
        engine.pin_content(Some("cid"), serde_json::json!({})).await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let submit = |at: DateTime<Utc>| {
            let engine = &engine;
            async move {
                engine
                    .submit_decision_at(
                        &DecisionRequest::new("cid", ModerationAction::Validate, "lead"),
                        at,
                    )
                    .await
                    .unwrap();
            }
        };

        // 1 decision two weeks ago, 2 last week, 3 this week
        submit(now - Duration::weeks(2)).await;
        for _ in 0..2 {
            submit(now - Duration::weeks(1)).await;
        }
        let stats = engine.guardian_stats_at(Some("lead"), now).await.unwrap();
        assert!(!stats.is_active_leader);

        for _ in 0..3 {
            submit(now).await;
        }
        let stats = engine.guardian_stats_at(Some("lead"), now).await.unwrap();
        assert!(stats.is_active_leader);
        assert_eq!(engine.growth_streak_at("lead", now).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_guardian_stats_are_zero() {
        let engine = engine();
        let view = engine.guardian_stats(Some("nobody")).await.unwrap();
        assert_eq!(view.stats, GuardianStats::default());
        assert_eq!(view.title, "Junior Guardian");
        assert!(!view.is_active_leader);

        assert!(matches!(
            engine.guardian_stats(None).await,
            Err(ModerationError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_weekly_report_defaults() {
        let engine = engine();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let report = engine.weekly_report_at(Some("g"), now).await.unwrap();

        assert_eq!(report.week_number.to_string(), "2026-W43");
        assert_eq!(report.current.rewards, 0.0);
        assert_eq!(report.previous.week_start, Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_pin_is_idempotent() {
        let engine = engine();
        let (first, created) = engine
            .pin_content(Some("cid"), serde_json::json!({"title": "a"}))
            .await
            .unwrap();
        assert!(created);

        let (second, created) = engine
            .pin_content(Some("cid"), serde_json::json!({"title": "b"}))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_receipts_and_ratings() {
        let engine = engine();
        engine.pin_content(Some("cid"), serde_json::json!({})).await.unwrap();

        let receipt = engine
            .add_receipt(&ReceiptRequest {
                cid: Some("cid".to_string()),
                authority_id: Some("auth-1".to_string()),
                authority_name: Some("Archive".to_string()),
                status: Some("STORED".to_string()),
                signature: Some("sig".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(receipt.authority_name, "Archive");

        engine.rate_content(Some("cid"), Some(5.0)).await.unwrap();
        let reputation = engine.rate_content(Some("cid"), Some(4.0)).await.unwrap();
        assert_eq!(reputation.count, 2);

        let err = engine.rate_content(Some("cid"), Some(6.0)).await.unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));

        let record = engine.get_content(Some("cid")).await.unwrap();
        assert_eq!(record.receipts.len(), 1);
        assert_eq!(record.reputation.count, 2);
    }

    #[tokio::test]
    async fn test_concurrent_decisions_lose_no_updates() {
        let engine = Arc::new(engine());
        engine.pin_content(Some("hot"), serde_json::json!({})).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..4 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                let request = DecisionRequest::new("hot", ModerationAction::Validate, &format!("g{i}"));
                engine.submit_decision(&request).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let record = engine.get_content(Some("hot")).await.unwrap();
        assert_eq!(record.moderation_log.len(), 4);
        assert_eq!(record.confidence_score, 4.0);
        assert_eq!(engine.leaderboard().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_weekly_snapshots_scan() {
        let engine = engine();
        engine.pin_content(Some("cid"), serde_json::json!({})).await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        for id in ["b", "a"] {
            engine
                .submit_decision_at(&DecisionRequest::new("cid", ModerationAction::FlagFalse, id), now)
                .await
                .unwrap();
        }

        let rows = engine.weekly_snapshots(WeekId::containing(now)).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(rows[0].1.rewards, 20.0);
    }
}
