//! PostgreSQL state store using sqlx
//!
//! All records live in one JSONB table keyed by the namespaced key. Each row
//! carries a version column that conditional writes compare against.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use super::{StateStore, StoreError, VersionedValue, WriteBatch};

pub struct PostgresStore {
    pool: PgPool,
}

fn unavailable(context: &str, e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(format!("{context}: {e}"))
}

fn version_from_row(key: &str, version: i64) -> Result<u64, StoreError> {
    u64::try_from(version).map_err(|_| StoreError::Malformed {
        key: key.to_string(),
        reason: format!("negative version {version}"),
    })
}

impl PostgresStore {
    pub async fn connect(connection_string: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(connection_string)
            .await
            .map_err(|e| unavailable("Failed to connect to PostgreSQL", e))?;

        info!("Connected to PostgreSQL");

        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        info!("Initializing guardian schema...");

        sqlx::query("CREATE SCHEMA IF NOT EXISTS guardian")
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to create guardian schema", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guardian.kv (
                key TEXT PRIMARY KEY,
                value JSONB NOT NULL,
                version BIGINT NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable("Failed to create kv table", e))?;

        info!("Guardian schema initialized");
        Ok(())
    }
}

#[async_trait]
impl StateStore for PostgresStore {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        let row = sqlx::query("SELECT value, version FROM guardian.kv WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to read key", e))?;

        match row {
            Some(row) => {
                let value: serde_json::Value = row.get("value");
                let version: i64 = row.get("version");
                Ok(Some(VersionedValue {
                    value,
                    version: version_from_row(key, version)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn scan_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT key, value, version
            FROM guardian.kv
            WHERE starts_with(key, $1)
            ORDER BY key
        "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| unavailable("Failed to scan prefix", e))?;

        let mut found = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.get("key");
            let version: i64 = row.get("version");
            let version = version_from_row(&key, version)?;
            found.push((
                key,
                VersionedValue {
                    value: row.get("value"),
                    version,
                },
            ));
        }

        Ok(found)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| unavailable("Failed to begin transaction", e))?;
        let now = Utc::now();

        for write in batch.writes() {
            let result = if write.expected_version == 0 {
                sqlx::query(
                    r#"
                    INSERT INTO guardian.kv (key, value, version, updated_at)
                    VALUES ($1, $2, 1, $3)
                    ON CONFLICT (key) DO NOTHING
                "#,
                )
                .bind(&write.key)
                .bind(&write.value)
                .bind(now)
                .execute(&mut *tx)
                .await
            } else {
                sqlx::query(
                    r#"
                    UPDATE guardian.kv
                    SET value = $2, version = version + 1, updated_at = $4
                    WHERE key = $1 AND version = $3
                "#,
                )
                .bind(&write.key)
                .bind(&write.value)
                .bind(write.expected_version as i64)
                .bind(now)
                .execute(&mut *tx)
                .await
            };
            let result = result.map_err(|e| unavailable("Failed to write key", e))?;

            if result.rows_affected() != 1 {
                debug!(key = %write.key, "Version mismatch, rolling back batch");
                tx.rollback()
                    .await
                    .map_err(|e| unavailable("Failed to roll back", e))?;
                return Err(StoreError::Conflict {
                    key: write.key.clone(),
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| unavailable("Failed to commit transaction", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_row() {
        assert_eq!(version_from_row("k", 7).unwrap(), 7);
        assert!(matches!(
            version_from_row("k", -1),
            Err(StoreError::Malformed { .. })
        ));
    }
}
