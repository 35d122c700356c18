// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tap-dixa
//!
//! Singer tap for the Dixa customer-support platform. Pulls conversations,
//! messages and activity logs, and emits SCHEMA / RECORD / STATE messages as
//! JSON lines.
//!
//! ## Features
//!
//! - **Two API roots**: exports (Basic auth) and integrations (raw token)
//! - **Retrying transport**: typed error classification, constant backoff,
//!   optional client-side rate limit
//! - **Windowed extraction**: contiguous `[after, before)` windows up to a
//!   fixed "now"
//! - **Incremental sync**: per-stream bookmarks with legacy fallback
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_dixa::{Connector, DixaConnector, MemorySink, StateManager, TapConfig};
//!
//! #[tokio::main]
//! async fn main() -> tap_dixa::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let connector = DixaConnector::new(config)?;
//!
//!     let catalog = connector.discover().await?;
//!     let mut sink = MemorySink::new();
//!     connector
//!         .sync(&catalog, StateManager::in_memory(), &mut sink)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Connector Interface                         │
//! │     check() → CheckResult    discover() → Catalog               │
//! │     sync(catalog, state, sink) → SyncStats                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │  Streams  │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Basic    │ GET       │ Page key      │ Convos    │ JSON lines  │
//! │ Raw token│ Retry     │ Offset        │ Messages  │ Memory      │
//! │          │ Rate Limit│ Windows       │ Act. logs │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Timestamp and batching helpers
pub mod helpers;

/// Time windows over a sync range
pub mod window;

/// Authentication for the two API roots
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// State management and checkpointing
pub mod state;

/// Message sinks
pub mod output;

/// Main execution engine
pub mod engine;

/// Stream definitions and record sources
pub mod streams;

/// Embedded schemas and catalog metadata
pub mod schema;

/// Tap config and catalog
pub mod config;

/// Connector trait and Dixa implementation
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{Catalog, TapConfig};
pub use connector::{CheckResult, Connector, DixaConnector};
pub use engine::{Message, SyncEngine, SyncStats};
pub use output::{JsonLinesWriter, MemorySink, MessageSink};
pub use state::StateManager;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
