//! Guardian API Endpoints
//!
//! Decision submission plus the read-side queries over guardian state.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::GuardianApiState;
use super::error::json_body;
use crate::error::ModerationError;
use crate::moderation::{
    DecisionOutcome, DecisionRequest, GuardianStatsView, LeaderboardEntry, ModerationPolicy,
    WeekId, WeeklyReport, WeeklySnapshot,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianQuery {
    pub moderator_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// ISO week label such as `2026-W03`; the current week when absent
    pub week: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModerateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: DecisionOutcome,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: GuardianStatsView,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReportResponse {
    pub success: bool,
    pub report: WeeklyReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianWeek {
    pub moderator_id: String,
    #[serde(flatten)]
    pub snapshot: WeeklySnapshot,
}

#[derive(Debug, Serialize)]
pub struct WeeklySnapshotsResponse {
    pub success: bool,
    pub week: WeekId,
    pub snapshots: Vec<GuardianWeek>,
}

#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub success: bool,
    pub policy: ModerationPolicy,
}

/// POST /moderate - Submit a guardian decision
pub async fn moderate(
    State(state): State<GuardianApiState>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<ModerateResponse>, ModerationError> {
    let request = json_body(payload)?;
    let outcome = state.engine.submit_decision(&request).await?;

    Ok(Json(ModerateResponse {
        success: true,
        outcome,
    }))
}

/// GET /guardian/stats?moderatorId=
pub async fn get_stats(
    State(state): State<GuardianApiState>,
    Query(query): Query<GuardianQuery>,
) -> Result<Json<StatsResponse>, ModerationError> {
    let stats = state
        .engine
        .guardian_stats(query.moderator_id.as_deref())
        .await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// GET /guardian/leaderboard
pub async fn get_leaderboard(
    State(state): State<GuardianApiState>,
) -> Result<Json<LeaderboardResponse>, ModerationError> {
    let leaderboard = state.engine.leaderboard().await?;

    Ok(Json(LeaderboardResponse {
        success: true,
        leaderboard,
    }))
}

/// GET /guardian/weekly-report?moderatorId=
pub async fn get_weekly_report(
    State(state): State<GuardianApiState>,
    Query(query): Query<GuardianQuery>,
) -> Result<Json<WeeklyReportResponse>, ModerationError> {
    let report = state
        .engine
        .weekly_report(query.moderator_id.as_deref())
        .await?;

    Ok(Json(WeeklyReportResponse {
        success: true,
        report,
    }))
}

/// GET /guardian/weekly-snapshots?week=YYYY-Www - Every guardian's totals for one week
pub async fn get_weekly_snapshots(
    State(state): State<GuardianApiState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklySnapshotsResponse>, ModerationError> {
    let week = match query.week.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.parse().map_err(ModerationError::Validation)?,
        _ => WeekId::containing(Utc::now()),
    };

    let snapshots = state
        .engine
        .weekly_snapshots(week)
        .await?
        .into_iter()
        .map(|(moderator_id, snapshot)| GuardianWeek {
            moderator_id,
            snapshot,
        })
        .collect();

    Ok(Json(WeeklySnapshotsResponse {
        success: true,
        week,
        snapshots,
    }))
}

/// GET /guardian/policy - Policy currently in force
pub async fn get_policy(State(state): State<GuardianApiState>) -> Json<PolicyResponse> {
    Json(PolicyResponse {
        success: true,
        policy: state.engine.policy().clone(),
    })
}

pub fn create_router(state: GuardianApiState) -> Router {
    Router::new()
        .route("/moderate", post(moderate))
        .route("/guardian/stats", get(get_stats))
        .route("/guardian/leaderboard", get(get_leaderboard))
        .route("/guardian/weekly-report", get(get_weekly_report))
        .route("/guardian/weekly-snapshots", get(get_weekly_snapshots))
        .route("/guardian/policy", get(get_policy))
        .with_state(state)
}
