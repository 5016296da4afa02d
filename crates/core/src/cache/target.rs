//! Remembered target list per source.
//!
//! When a user saves a selection from a source into a list, the chosen list
//! is remembered so the next save from that source can default to it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::key::target_list_key_for;
use super::store::KeyValueStore;
use crate::Error;
use crate::source::CandidateSource;

/// The list a source's selections were last saved into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetList {
    pub source_id: i64,
    pub list_id: i64,
    pub name: String,
    /// Whether the last save replaced the list contents instead of adding.
    pub replace: bool,
}

/// Remember `target` for `source`.
pub async fn remember_target_list<S: KeyValueStore + ?Sized>(
    store: &S, source: &CandidateSource, target: &TargetList,
) -> Result<(), Error> {
    let json = serde_json::to_string(target)?;
    store.set(&target_list_key_for(source), &json).await
}

/// The remembered target list for `source`, if any.
///
/// Unreadable entries are treated as absent.
pub async fn recall_target_list<S: KeyValueStore + ?Sized>(store: &S, source: &CandidateSource) -> Option<TargetList> {
    let key = target_list_key_for(source);
    match store.get(&key).await {
        Ok(Some(json)) => serde_json::from_str(&json)
            .inspect_err(|e| tracing::warn!(%key, error = %e, "corrupt target list entry"))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(%key, error = %e, "target list read failed");
            None
        }
    }
}
