//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and maintaining the result cache.

pub mod clear;
pub mod get;
pub mod purge;
pub mod target;

pub use clear::clear_impl;
pub use get::{CacheGetParams, get_impl};
pub use purge::{CachePurgeParams, purge_impl};
pub use target::{TargetListGetParams, target_list_impl};
