//! Content API Endpoints
//!
//! Pinning, lookup, receipts, ratings and the confidence audit.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::GuardianApiState;
use super::error::json_body;
use crate::error::ModerationError;
use crate::moderation::{
    ContentAudit, ContentBadge, ContentRecord, ContentReputation, Receipt, ReceiptRequest,
};

#[derive(Debug, Deserialize)]
pub struct CidQuery {
    pub cid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PinRequest {
    pub cid: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RateRequest {
    pub cid: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub success: bool,
    #[serde(flatten)]
    pub record: ContentRecord,
    pub badge: ContentBadge,
}

#[derive(Debug, Serialize)]
pub struct PinResponse {
    pub success: bool,
    pub created: bool,
    pub content: ContentRecord,
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub success: bool,
    pub receipt: Receipt,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub success: bool,
    pub reputation: ContentReputation,
    pub badge: ContentBadge,
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub success: bool,
    #[serde(flatten)]
    pub audit: ContentAudit,
}

/// GET /ipfs/get?cid= - Content record with its badge
pub async fn get_content(
    State(state): State<GuardianApiState>,
    Query(query): Query<CidQuery>,
) -> Result<Json<ContentResponse>, ModerationError> {
    let record = state.engine.get_content(query.cid.as_deref()).await?;
    let badge = ContentBadge::for_reputation(&record.reputation);

    Ok(Json(ContentResponse {
        success: true,
        record,
        badge,
    }))
}

/// POST /ipfs/pin - Create a content record (idempotent)
pub async fn pin_content(
    State(state): State<GuardianApiState>,
    payload: Result<Json<PinRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PinResponse>), ModerationError> {
    let request = json_body(payload)?;
    let metadata = request
        .metadata
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

    let (content, created) = state
        .engine
        .pin_content(request.cid.as_deref(), metadata)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(PinResponse {
            success: true,
            created,
            content,
        }),
    ))
}

/// POST /ipfs/receipt - Append an authority receipt
pub async fn add_receipt(
    State(state): State<GuardianApiState>,
    payload: Result<Json<ReceiptRequest>, JsonRejection>,
) -> Result<Json<ReceiptResponse>, ModerationError> {
    let request = json_body(payload)?;
    let receipt = state.engine.add_receipt(&request).await?;

    Ok(Json(ReceiptResponse {
        success: true,
        receipt,
    }))
}

/// POST /ipfs/rate - Rate content quality (1-5)
pub async fn rate_content(
    State(state): State<GuardianApiState>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> Result<Json<RateResponse>, ModerationError> {
    let request = json_body(payload)?;
    let reputation = state
        .engine
        .rate_content(request.cid.as_deref(), request.score)
        .await?;
    let badge = ContentBadge::for_reputation(&reputation);

    Ok(Json(RateResponse {
        success: true,
        reputation,
        badge,
    }))
}

/// GET /ipfs/audit?cid= - Cached confidence versus log replay
pub async fn audit_content(
    State(state): State<GuardianApiState>,
    Query(query): Query<CidQuery>,
) -> Result<Json<AuditResponse>, ModerationError> {
    let audit = state.engine.audit_content(query.cid.as_deref()).await?;

    Ok(Json(AuditResponse {
        success: true,
        audit,
    }))
}

pub fn create_router(state: GuardianApiState) -> Router {
    Router::new()
        .route("/get", get(get_content))
        .route("/pin", post(pin_content))
        .route("/receipt", post(add_receipt))
        .route("/rate", post(rate_content))
        .route("/audit", get(audit_content))
        .with_state(state)
}
