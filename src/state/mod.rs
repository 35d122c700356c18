//! State management module
//!
//! Handles bookmark tracking, checkpointing, and resumability.
//! State is persisted between sync runs to enable incremental syncs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Singer state document (`bookmarks` plus `currently_syncing`)
//! - `BookmarkValue` - integer or string bookmark
//! - `StateManager` - shared handle with optional file persistence

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{BookmarkValue, State};
