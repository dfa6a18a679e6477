//! Versioned Key-Value State Store
//!
//! The engine consumes a namespaced key-value store but does not own it.
//! Every value carries a version; writes are conditional on the version the
//! caller read, and a batch of writes is applied all-or-nothing.
//!
//! ## Key Layout
//!
//! ```text
//! content:{cid}                  ContentRecord
//! guardian:{moderator_id}        GuardianStats
//! weekly:{YYYY-Www}:{moderator}  WeeklySnapshot
//! leaderboard:global             Vec<LeaderboardEntry>
//! ```

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::moderation::WeekId;

/// A stored JSON value together with its version (always >= 1 once written)
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedValue {
    pub value: serde_json::Value,
    pub version: u64,
}

impl VersionedValue {
    /// Decode the stored JSON into a typed record
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        serde_json::from_value(self.value.clone()).map_err(|e| StoreError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Errors raised by a state store backend
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// A conditional write found a different version than expected
    #[error("write conflict on key {key}")]
    Conflict { key: String },
    /// Backend could not be reached or rejected the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Stored data could not be decoded
    #[error("malformed value at {key}: {reason}")]
    Malformed { key: String, reason: String },
}

/// One conditional write inside a batch
#[derive(Debug, Clone)]
pub struct ConditionalWrite {
    pub key: String,
    /// Version observed on read; 0 means the key must not exist yet
    pub expected_version: u64,
    pub value: serde_json::Value,
}

/// An atomic group of conditional writes
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: Vec<ConditionalWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a typed value for writing at `key`
    pub fn put<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        expected_version: u64,
        value: &T,
    ) -> Result<&mut Self, StoreError> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|e| StoreError::Malformed {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.writes.push(ConditionalWrite {
            key,
            expected_version,
            value,
        });
        Ok(self)
    }

    pub fn writes(&self) -> &[ConditionalWrite] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<ConditionalWrite> {
        self.writes
    }
}

/// Abstract persistence consumed by the moderation engine
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a single key
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError>;

    /// Read every key starting with `prefix`, sorted by key
    async fn scan_prefix(&self, prefix: &str)
    -> Result<Vec<(String, VersionedValue)>, StoreError>;

    /// Apply all writes or none of them
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

/// Read and decode a typed record, returning it with its version (0 if absent)
pub async fn load<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
) -> Result<(Option<T>, u64), StoreError> {
    match store.get(key).await? {
        Some(stored) => Ok((Some(stored.decode(key)?), stored.version)),
        None => Ok((None, 0)),
    }
}

pub mod keys {
    use super::WeekId;

    pub const LEADERBOARD: &str = "leaderboard:global";

    pub fn content(cid: &str) -> String {
        format!("content:{cid}")
    }

    pub fn guardian(moderator_id: &str) -> String {
        format!("guardian:{moderator_id}")
    }

    pub fn weekly(week: WeekId, moderator_id: &str) -> String {
        format!("weekly:{week}:{moderator_id}")
    }

    /// Prefix covering every snapshot of one week
    pub fn weekly_prefix(week: WeekId) -> String {
        format!("weekly:{week}:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let week = WeekId::new(2026, 3).unwrap();
        assert_eq!(keys::content("bafy1"), "content:bafy1");
        assert_eq!(keys::guardian("g-1"), "guardian:g-1");
        assert_eq!(keys::weekly(week, "g-1"), "weekly:2026-W03:g-1");
        assert!(keys::weekly(week, "g-1").starts_with(&keys::weekly_prefix(week)));
    }

    #[test]
    fn test_decode_malformed_value() {
        let stored = VersionedValue {
            value: serde_json::json!("not a number"),
            version: 1,
        };
        let err = stored.decode::<u64>("k").unwrap_err();
        assert!(matches!(err, StoreError::Malformed { key, .. } if key == "k"));
    }

    #[test]
    fn test_batch_put() {
        let mut batch = WriteBatch::new();
        batch.put("a", 0, &1u32).unwrap().put("b", 3, &"x").unwrap();
        assert_eq!(batch.writes().len(), 2);
        assert_eq!(batch.writes()[1].expected_version, 3);
    }
}
