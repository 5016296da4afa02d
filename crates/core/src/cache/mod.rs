//! Source-scoped result cache.
//!
//! This module provides the persistence side of the candidate-source cache:
//!
//! - A single-key [`KeyValueStore`] abstraction, backed by SQLite (via
//!   tokio-rusqlite, WAL mode, versioned migrations) or by memory
//! - Stable keys derived from a source's variant and id
//! - One cached page per source, with tracked keys for bulk clearing
//! - Remembered target lists for saving selections

pub mod connection;
pub mod key;
pub mod migrations;
pub mod results;
pub mod store;
pub mod target;

pub use crate::Error;

pub use connection::CacheDb;
pub use key::{key_for, target_list_key_for};
pub use results::{CachedPage, SourceResultCache};
pub use store::{KeyValueStore, MemoryStore};
pub use target::{TargetList, recall_target_list, remember_target_list};
