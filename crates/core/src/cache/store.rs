//! Durable key-value store.
//!
//! The result cache and UI preferences only ever need single-key get/set/remove,
//! so that is all [`KeyValueStore`] offers. No prefix scan, no TTL.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use tokio_rusqlite::params;

use super::connection::CacheDb;
use crate::Error;

/// Single-key persistent storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Insert or overwrite the value at `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Read the value at `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Delete `key`. Returns whether an entry existed.
    async fn remove(&self, key: &str) -> Result<bool, Error>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        (**self).set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key).await
    }

    async fn remove(&self, key: &str) -> Result<bool, Error> {
        (**self).remove(key).await
    }
}

impl CacheDb {
    /// Read a raw value from the key-value table.
    pub async fn kv_get(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;

                match stmt.query_row(params![key], |row| row.get(0)) {
                    Ok(value) => Ok(Some(value)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a raw value.
    ///
    /// Uses UPSERT semantics so a key never holds more than one row.
    pub async fn kv_set(&self, key: &str, value: &str) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_store (key, value, updated_at)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a key. Returns whether a row was removed.
    pub async fn kv_remove(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry not written within the last `days` days.
    ///
    /// Returns the number of deleted entries. An age too large to express as
    /// a timestamp matches nothing.
    pub async fn purge_older_than(&self, days: i64) -> Result<u64, Error> {
        let Some(cutoff) = Duration::try_days(days).and_then(|age| Utc::now().checked_sub_signed(age)) else {
            tracing::debug!(days, "purge age out of range, nothing to delete");
            return Ok(0);
        };
        let cutoff = cutoff.to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM kv_store WHERE updated_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored entries.
    pub async fn kv_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl KeyValueStore for CacheDb {
    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.kv_set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.kv_get(key).await
    }

    async fn remove(&self, key: &str) -> Result<bool, Error> {
        self.kv_remove(key).await
    }
}

/// In-process store.
///
/// Not durable: entries live only as long as the value does. Useful for tests
/// and for running with persistence switched off.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn remove(&self, key: &str) -> Result<bool, Error> {
        Ok(self.entries.remove(key).is_some())
    }
}
