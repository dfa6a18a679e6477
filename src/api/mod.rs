//! HTTP API for the guardian moderation service
//!
//! Provides REST APIs for:
//! - Guardian decisions and guardian queries (`/moderate`, `/guardian/*`)
//! - Content pinning, lookup, receipts, ratings and audit (`/ipfs/*`)
//! - Security middleware (rate limiting, body limits, headers, request logging)

pub mod content;
pub mod error;
pub mod guardian;
pub mod middleware;

use axum::{
    Json, Router, extract::DefaultBodyLimit, middleware as axum_middleware, routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::moderation::ModerationEngine;

pub use error::json_body;
pub use middleware::{
    RateLimiter, SecurityMiddlewareConfig, SecurityState, body_size_middleware,
    logging_middleware, rate_limit_middleware, security_headers_middleware,
};

/// Shared state for every guardian route
#[derive(Clone)]
pub struct GuardianApiState {
    pub engine: Arc<ModerationEngine>,
}

impl GuardianApiState {
    pub fn new(engine: Arc<ModerationEngine>) -> Self {
        Self { engine }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "success": true, "status": "ok" }))
}

/// All routes, without middleware
pub fn create_router(state: GuardianApiState) -> Router {
    Router::new()
        .merge(guardian::create_router(state.clone()))
        .nest("/ipfs", content::create_router(state))
        .route("/health", get(health))
}

/// Routes wrapped in the security and tracing layers
pub fn create_app(state: GuardianApiState, security: SecurityState) -> Router {
    create_router(state)
        .layer(DefaultBodyLimit::max(security.config.max_request_size))
        .layer(axum_middleware::from_fn_with_state(
            security.clone(),
            body_size_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            security.clone(),
            rate_limit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            security,
            logging_middleware,
        ))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}
