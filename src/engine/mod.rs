//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Runs the selected catalog streams in order
//! - `ReplicationStrategy` - Incremental and full-table behavior
//! - Message types for output (Schema, Record, State)
//!
//! "Now" is captured once when the engine is built; every window of every
//! stream in the run ends at that instant.

mod strategy;
mod types;

pub use strategy::{
    replication_value_ms, strategy_for, FullTableSync, IncrementalSync, ReplicationStrategy,
    SyncContext,
};
pub use types::{Message, SyncStats};

use crate::config::{Catalog, CatalogEntry, TapConfig};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::MessageSink;
use crate::schema::RecordProjection;
use crate::state::StateManager;
use crate::streams::{find_stream, open_source, SourceOptions, StreamDefinition};
use chrono::Utc;
use std::time::Instant;
use tracing::info;

/// Sync engine for orchestrating data extraction
pub struct SyncEngine<'a> {
    /// HTTP client
    client: &'a HttpClient,
    /// State manager
    state: StateManager,
    /// Message destination
    sink: &'a mut dyn MessageSink,
    /// Resolved source settings
    options: SourceOptions,
    /// Config start date in epoch milliseconds
    start_date_ms: i64,
    /// Fixed end of every window in this run
    now_ms: i64,
    /// Statistics
    stats: SyncStats,
}

impl<'a> SyncEngine<'a> {
    /// Create a new sync engine
    ///
    /// Fails on an unknown interval or start date before any request is made.
    pub fn new(
        client: &'a HttpClient,
        state: StateManager,
        sink: &'a mut dyn MessageSink,
        config: &TapConfig,
    ) -> Result<Self> {
        Ok(Self {
            client,
            state,
            sink,
            options: SourceOptions::from_config(config)?,
            start_date_ms: config.start_date_millis()?,
            now_ms: Utc::now().timestamp_millis(),
            stats: SyncStats::default(),
        })
    }

    /// Pin the end of the sync range
    #[must_use]
    pub fn with_now_ms(mut self, now_ms: i64) -> Self {
        self.now_ms = now_ms;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Sync every selected stream in catalog order
    pub async fn run(&mut self, catalog: &Catalog) -> Result<SyncStats> {
        let started = Instant::now();

        for entry in catalog.selected_streams() {
            let def = find_stream(&entry.tap_stream_id).ok_or_else(|| Error::StreamNotFound {
                stream: entry.tap_stream_id.clone(),
            })?;

            self.state
                .set_currently_syncing(Some(def.stream_id))
                .await?;
            self.sync_stream(def, entry).await?;
        }

        self.state.set_currently_syncing(None).await?;
        self.emit_state().await?;
        self.sink.flush()?;

        self.stats.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            streams = self.stats.streams_synced,
            records = self.stats.records_emitted,
            pages = self.stats.pages_fetched,
            duration_ms = self.stats.duration_ms,
            "Sync completed"
        );
        Ok(self.stats.clone())
    }

    /// Sync a single stream as described by its catalog entry
    pub async fn sync_stream(
        &mut self,
        def: &StreamDefinition,
        entry: &CatalogEntry,
    ) -> Result<SyncStats> {
        let strategy = strategy_for(def.replication_method);
        let start_ms = strategy
            .start_ms(&self.state, def, self.start_date_ms)
            .await?;

        info!(
            stream = def.stream_id,
            start_ms,
            end_ms = self.now_ms,
            "Starting sync"
        );

        self.sink.emit(&Message::schema(
            def.stream_id,
            entry.schema.clone(),
            def.key_properties(),
            def.replication_key.into_iter().map(ToString::to_string).collect(),
        ))?;

        let projection = RecordProjection::for_entry(entry);
        let mut source = open_source(def, start_ms, self.now_ms, &self.options);
        let mut stream_stats = SyncStats::default();
        {
            let mut ctx = SyncContext {
                client: self.client,
                state: &self.state,
                sink: &mut *self.sink,
                stats: &mut stream_stats,
                projection: Some(&projection),
            };
            strategy
                .replicate(&mut ctx, def, start_ms, source.as_mut())
                .await?;
        }

        stream_stats.add_stream();
        info!(
            stream = def.stream_id,
            records = stream_stats.records_emitted,
            skipped = stream_stats.records_skipped,
            pages = stream_stats.pages_fetched,
            "Completed sync"
        );

        self.stats.merge(&stream_stats);
        Ok(stream_stats)
    }

    async fn emit_state(&mut self) -> Result<()> {
        let snapshot = self.state.snapshot().await;
        self.sink.emit(&Message::state(snapshot))
    }
}
