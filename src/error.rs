//! Error taxonomy surfaced by the moderation engine

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModerationError {
    /// Missing or malformed input; rejected before any read
    #[error("{0}")]
    Validation(String),
    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),
    #[error("Request body too large")]
    PayloadTooLarge,
    /// Persistence failed, conflicted past the retry budget, or returned bad data
    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ModerationError>;

/// Trimmed value of a required field, or a validation error naming it
pub fn required(value: Option<&str>, field: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ModerationError::Validation(format!(
            "Missing required field: {field}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required(Some(" cid-1 "), "cid").unwrap(), "cid-1");
        assert_eq!(
            required(Some("   "), "cid"),
            Err(ModerationError::Validation("Missing required field: cid".to_string()))
        );
        assert!(required(None, "moderatorId").is_err());
    }

    #[test]
    fn test_store_error_converts() {
        let err: ModerationError = StoreError::Unavailable("down".to_string()).into();
        assert!(matches!(err, ModerationError::Storage(_)));
        assert_eq!(err.to_string(), "store unavailable: down");
    }
}
