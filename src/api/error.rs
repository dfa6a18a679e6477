//! Mapping of engine errors onto HTTP responses

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::ModerationError;
use crate::store::StoreError;

impl ModerationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ModerationError::Validation(_) => StatusCode::BAD_REQUEST,
            ModerationError::NotFound(_) => StatusCode::NOT_FOUND,
            ModerationError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ModerationError::Storage(StoreError::Conflict { .. }) => StatusCode::CONFLICT,
            ModerationError::Storage(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ModerationError::Storage(StoreError::Malformed { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ModerationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ModerationError::Storage(e) = &self {
            error!(error = %e, status = status.as_u16(), "State store failure");
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Unwrap a JSON body, turning decode failures into validation errors
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ModerationError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Request body exceeded the configured limit");
            Err(ModerationError::PayloadTooLarge)
        }
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "Rejected request body");
            Err(ModerationError::Validation(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ModerationError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ModerationError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ModerationError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (
                StoreError::Conflict { key: "k".into() }.into(),
                StatusCode::CONFLICT,
            ),
            (
                StoreError::Unavailable("down".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                StoreError::Malformed {
                    key: "k".into(),
                    reason: "bad".into(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected);
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
