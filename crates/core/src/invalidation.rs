//! Cache invalidation after mutating operations.
//!
//! Every operation that can change what a source shows must, once it has
//! succeeded remotely, drop the cached page of each affected source. This is
//! not transactional with the remote call: if it never runs, the cached page
//! stays until the next forced refresh or a fetch for a different page.

use serde::{Deserialize, Serialize};

use crate::cache::{KeyValueStore, SourceResultCache};
use crate::source::CandidateSource;

/// A mutation that can make cached results stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Candidates added to a list.
    Merge,
    /// List contents replaced.
    Replace,
    /// Candidates removed from a list.
    Remove,
    /// Candidate status changed in a way that can affect membership.
    StatusUpdate,
    /// Source starred or unstarred by the current user.
    Star,
    /// Source watched or unwatched by the current user.
    Watch,
    /// Selected candidates of a search saved into `target`.
    SaveSelection { target: CandidateSource },
    /// Contents copied into `target`.
    Copy { target: CandidateSource },
}

impl Mutation {
    /// Sources whose cached pages may be stale once this mutation on
    /// `acted_on` has succeeded.
    pub fn stale_sources<'a>(&'a self, acted_on: &'a CandidateSource) -> Vec<&'a CandidateSource> {
        match self {
            Mutation::SaveSelection { target } | Mutation::Copy { target } => {
                if target.kind() == acted_on.kind() && target.id() == acted_on.id() {
                    vec![acted_on]
                } else {
                    vec![acted_on, target]
                }
            }
            _ => vec![acted_on],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Merge => "merge",
            Mutation::Replace => "replace",
            Mutation::Remove => "remove",
            Mutation::StatusUpdate => "status_update",
            Mutation::Star => "star",
            Mutation::Watch => "watch",
            Mutation::SaveSelection { .. } => "save_selection",
            Mutation::Copy { .. } => "copy",
        }
    }
}

/// Drop the cached pages made stale by a successful `mutation` on `acted_on`.
///
/// Returns the number of sources invalidated.
pub async fn invalidate_after<S: KeyValueStore>(
    cache: &SourceResultCache<S>, mutation: &Mutation, acted_on: &CandidateSource,
) -> usize {
    let stale = mutation.stale_sources(acted_on);
    for source in &stale {
        cache.remove(source).await;
    }
    tracing::debug!(op = mutation.name(), source = %acted_on, invalidated = stale.len(), "invalidated after mutation");
    stale.len()
}
