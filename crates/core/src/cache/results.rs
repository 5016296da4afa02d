//! Source result cache.
//!
//! Holds at most one page per candidate source. Whether a source may be cached
//! at all is the caller's decision (see [`crate::policy`]); this layer only
//! stores, loads and forgets.

use chrono::{DateTime, Utc};
use dashmap::DashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::key::key_for;
use super::store::KeyValueStore;
use crate::search::{SearchPage, SortDirection};
use crate::source::CandidateSource;

/// The last fetched page of a source, with the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CachedPage {
    pub source_id: i64,
    /// One-based.
    pub page_number: u32,
    pub page_size: u32,
    pub sort_fields: Vec<String>,
    pub sort_direction: SortDirection,
    pub results: SearchPage,
    #[schemars(with = "String")]
    pub captured_at: DateTime<Utc>,
}

/// Result cache over a [`KeyValueStore`].
///
/// Store failures are logged and degrade to a miss. The keys written through
/// this instance are tracked so [`SourceResultCache::clear_all`] can remove
/// them without a prefix scan.
#[derive(Debug)]
pub struct SourceResultCache<S> {
    store: S,
    written: DashSet<String>,
}

impl<S: KeyValueStore> SourceResultCache<S> {
    pub fn new(store: S) -> Self {
        Self { store, written: DashSet::new() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite the entry for `source`.
    pub async fn put(&self, source: &CandidateSource, page: &CachedPage) {
        let key = key_for(source);
        let json = match serde_json::to_string(page) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to encode cached page");
                return;
            }
        };

        match self.store.set(&key, &json).await {
            Ok(()) => {
                tracing::debug!(%key, page = page.page_number, size = page.page_size, "cached source results");
                self.written.insert(key);
            }
            Err(e) => tracing::warn!(%key, error = %e, "failed to write cached page"),
        }
    }

    /// Load the entry for `source`, `None` on absence or any failure.
    pub async fn get(&self, source: &CandidateSource) -> Option<CachedPage> {
        let key = key_for(source);
        let json = match self.store.get(&key).await {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<CachedPage>(&json) {
            Ok(page) if page.source_id == source.id() => Some(page),
            Ok(page) => {
                tracing::warn!(%key, stored_id = page.source_id, "cached page belongs to another source");
                None
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "corrupt cache entry, treating as miss");
                None
            }
        }
    }

    /// Forget the entry for `source`. Absent entries are fine.
    pub async fn remove(&self, source: &CandidateSource) {
        let key = key_for(source);
        match self.store.remove(&key).await {
            Ok(existed) => tracing::debug!(%key, existed, "invalidated source results"),
            Err(e) => tracing::warn!(%key, error = %e, "failed to remove cached page"),
        }
        self.written.remove(&key);
    }

    /// Remove every entry this instance has written.
    ///
    /// Returns the number of keys attempted.
    pub async fn clear_all(&self) -> usize {
        let keys: Vec<String> = self.written.iter().map(|k| k.key().clone()).collect();
        for key in &keys {
            if let Err(e) = self.store.remove(key).await {
                tracing::warn!(%key, error = %e, "failed to remove cached page");
            }
            self.written.remove(key);
        }
        tracing::debug!(count = keys.len(), "cleared source result cache");
        keys.len()
    }

    /// Number of keys currently tracked as written by this instance.
    pub fn tracked(&self) -> usize {
        self.written.len()
    }
}
