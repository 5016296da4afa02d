//! Durable cache key derivation.
//!
//! Keys are plain strings built from the source's variant tag and id, so they
//! survive restarts and a search and a list sharing an id never collide.

use crate::source::{CandidateSource, SourceKind};

const RESULTS_NAMESPACE: &str = "results";
const TARGET_LIST_NAMESPACE: &str = "target";

fn scoped(namespace: &str, kind: SourceKind, id: i64) -> String {
    format!("{namespace}/{}:{id}", kind.tag())
}

/// Key of the cached result page for `source`.
pub fn key_for(source: &CandidateSource) -> String {
    scoped(RESULTS_NAMESPACE, source.kind(), source.id())
}

/// Key of the remembered target list for `source`.
pub fn target_list_key_for(source: &CandidateSource) -> String {
    scoped(TARGET_LIST_NAMESPACE, source.kind(), source.id())
}
