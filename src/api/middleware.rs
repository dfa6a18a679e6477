//! Security Middleware for the Guardian API
//!
//! Provides:
//! - Rate limiting per IP
//! - Request body size limits
//! - Security headers
//! - Request logging with sanitization

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::config::GuardianConfig;
use crate::error::ModerationError;

/// Security configuration for middleware
#[derive(Debug, Clone)]
pub struct SecurityMiddlewareConfig {
    /// Rate limit: requests per minute per IP
    pub rate_limit_per_minute: u32,
    /// Maximum request body size in bytes
    pub max_request_size: usize,
    /// Enable request logging
    pub log_requests: bool,
    /// Mask client IPs in logs
    pub sanitize_logs: bool,
}

impl Default for SecurityMiddlewareConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 120,
            max_request_size: 64 * 1024,
            log_requests: false,
            sanitize_logs: true,
        }
    }
}

impl From<&GuardianConfig> for SecurityMiddlewareConfig {
    fn from(config: &GuardianConfig) -> Self {
        Self {
            rate_limit_per_minute: config.security.rate_limit_per_minute,
            max_request_size: config.security.max_request_size,
            log_requests: config.logging.log_requests,
            sanitize_logs: config.logging.sanitize_logs,
        }
    }
}

/// Fixed-window request counter per client IP
#[derive(Debug)]
pub struct RateLimiter {
    /// Map of IP -> (request count, window start)
    requests: DashMap<String, (u32, Instant)>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self::with_window(requests_per_minute, Duration::from_secs(60))
    }

    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            requests: DashMap::new(),
            limit,
            window,
        }
    }

    /// Check if request is allowed and update counter.
    /// Returns (allowed, remaining, reset_after_secs)
    pub fn check_request(&self, ip: &str) -> (bool, u32, u64) {
        let now = Instant::now();

        let mut entry = self.requests.entry(ip.to_string()).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) >= self.window {
            *count = 0;
            *window_start = now;
        }

        let reset_after = self
            .window
            .checked_sub(now.duration_since(*window_start))
            .map(|d| d.as_secs())
            .unwrap_or(0);

        if *count >= self.limit {
            return (false, 0, reset_after);
        }

        *count += 1;
        (true, self.limit - *count, reset_after)
    }

    /// Drop clients whose window expired long ago
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.requests
            .retain(|_, (_, window_start)| now.duration_since(*window_start) < self.window * 2);
    }

    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}

/// Shared state for security middleware
#[derive(Clone)]
pub struct SecurityState {
    pub config: SecurityMiddlewareConfig,
    pub rate_limiter: Arc<RateLimiter>,
}

impl SecurityState {
    pub fn new(config: SecurityMiddlewareConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit_per_minute));
        Self {
            config,
            rate_limiter,
        }
    }
}

/// Client IP from proxy headers, then the socket address if the server recorded one
fn get_client_ip(headers: &HeaderMap, request: &Request) -> String {
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
    {
        return ip.trim().to_string();
    }

    if let Some(ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return ip.trim().to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Mask the middle of a value for logging
pub fn sanitize_for_log(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<SecurityState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = get_client_ip(&headers, &request);
    let (allowed, remaining, reset_after) = state.rate_limiter.check_request(&client_ip);
    let limit = state.config.rate_limit_per_minute;

    if !allowed {
        warn!(
            client_ip = %sanitize_for_log(&client_ip),
            path = %request.uri().path(),
            "Rate limit exceeded"
        );

        let body = axum::Json(json!({
            "success": false,
            "error": "Rate limit exceeded",
        }));
        let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        let headers = response.headers_mut();
        headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from(0u32));
        headers.insert("X-RateLimit-Reset", HeaderValue::from(reset_after));
        headers.insert("Retry-After", HeaderValue::from(reset_after));
        return response;
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
    headers.insert("X-RateLimit-Reset", HeaderValue::from(reset_after));

    response
}

/// Security headers middleware
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));
    // Moderation state changes per request
    headers.insert(
        "Cache-Control",
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    headers.remove("Server");

    response
}

/// Request logging middleware with sanitization
pub async fn logging_middleware(
    State(state): State<SecurityState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.log_requests {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = get_client_ip(&headers, &request);
    let log_ip = if state.config.sanitize_logs {
        sanitize_for_log(&client_ip)
    } else {
        client_ip
    };

    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        error!(method = %method, path = %path, status, duration_ms, client_ip = %log_ip, "Request failed");
    } else if response.status().is_client_error() {
        warn!(method = %method, path = %path, status, duration_ms, client_ip = %log_ip, "Client error");
    } else {
        info!(method = %method, path = %path, status, duration_ms, client_ip = %log_ip, "Request completed");
    }

    response
}

/// Reject bodies whose declared length exceeds the configured maximum.
///
/// Bodies without a `Content-Length` are capped by the `DefaultBodyLimit`
/// layer in `create_app` once a handler buffers them.
pub async fn body_size_middleware(
    State(state): State<SecurityState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let declared = headers
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    if let Some(length) = declared {
        if length > state.config.max_request_size {
            warn!(
                length,
                max = state.config.max_request_size,
                "Request body too large"
            );
            return ModerationError::PayloadTooLarge.into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter() {
        let limiter = RateLimiter::new(3);

        assert_eq!(limiter.check_request("127.0.0.1"), (true, 2, 60));
        assert!(limiter.check_request("127.0.0.1").0);
        assert!(limiter.check_request("127.0.0.1").0);

        let (allowed, remaining, _) = limiter.check_request("127.0.0.1");
        assert!(!allowed);
        assert_eq!(remaining, 0);

        // Different IP should still be allowed
        assert!(limiter.check_request("192.168.1.1").0);
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_rate_limiter_window_reset() {
        let limiter = RateLimiter::with_window(1, Duration::ZERO);
        assert!(limiter.check_request("10.0.0.1").0);
        assert!(limiter.check_request("10.0.0.1").0);

        limiter.cleanup();
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_sanitize_for_log() {
        assert_eq!(sanitize_for_log("short"), "*****");
        assert_eq!(sanitize_for_log("abcdefghij"), "abcd...ghij");
        let result = sanitize_for_log("192.168.1.100");
        assert!(result.starts_with("192."));
        assert!(result.ends_with(".100"));
    }
}
