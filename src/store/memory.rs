//! In-memory state store
//!
//! Used when PostgreSQL is disabled and in tests. Commits hold the write lock
//! for the whole batch so version checks and writes cannot interleave.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{StateStore, StoreError, VersionedValue, WriteBatch};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, VersionedValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn scan_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StoreError> {
        let entries = self.entries.read().await;
        let mut found: Vec<(String, VersionedValue)> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(found)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;

        for write in batch.writes() {
            let current = entries.get(&write.key).map(|v| v.version).unwrap_or(0);
            if current != write.expected_version {
                debug!(
                    key = %write.key,
                    expected = write.expected_version,
                    found = current,
                    "Rejecting batch on version mismatch"
                );
                return Err(StoreError::Conflict {
                    key: write.key.clone(),
                });
            }
        }

        for write in batch.into_writes() {
            entries.insert(
                write.key,
                VersionedValue {
                    value: write.value,
                    version: write.expected_version + 1,
                },
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_commit_and_get() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch.put("content:a", 0, &json!({"x": 1})).unwrap();
        store.commit(batch).await.unwrap();

        let stored = store.get("content:a").await.unwrap().unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(stored.value, json!({"x": 1}));
        assert!(store.get("content:b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_version_rejects_whole_batch() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch.put("a", 0, &1).unwrap();
        store.commit(batch).await.unwrap();

        // "b" is new and valid, "a" is stale: nothing may land
        let mut batch = WriteBatch::new();
        batch.put("b", 0, &2).unwrap().put("a", 0, &3).unwrap();
        let err = store.commit(batch).await.unwrap_err();

        assert_eq!(err, StoreError::Conflict { key: "a".to_string() });
        assert!(store.get("b").await.unwrap().is_none());
        assert_eq!(store.get("a").await.unwrap().unwrap().value, json!(1));
    }

    #[tokio::test]
    async fn test_scan_prefix_sorted() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .put("weekly:2026-W02:b", 0, &1)
            .unwrap()
            .put("weekly:2026-W02:a", 0, &2)
            .unwrap()
            .put("weekly:2026-W03:a", 0, &3)
            .unwrap();
        store.commit(batch).await.unwrap();

        let found = store.scan_prefix("weekly:2026-W02:").await.unwrap();
        let keys: Vec<_> = found.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["weekly:2026-W02:a", "weekly:2026-W02:b"]);
    }
}
