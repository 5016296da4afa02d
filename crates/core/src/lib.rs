//! Core types and shared functionality for tc-sources.
//!
//! This crate provides:
//! - The candidate source model (saved searches and saved lists)
//! - Cacheability policy and source-scoped result cache over a key-value store
//! - The cache-first paged search orchestrator and invalidation triggers
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod policy;
pub mod search;
pub mod source;

pub use cache::{CacheDb, CachedPage, KeyValueStore, MemoryStore, SourceResultCache, TargetList};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use invalidation::{Mutation, invalidate_after};
pub use policy::is_cacheable;
pub use search::{LoadOutcome, PagedSearch, PagedSearchRequest, RemoteSearch, SearchPage, SortDirection};
pub use source::{
    CandidateSource, DEFAULT_REVIEW_STATUS_FILTER, ReviewStatus, SavedList, SavedSearch, SourceInfo, SourceKind,
};
