//! Output module
//!
//! Writes engine messages as JSON lines.
//!
//! # Overview
//!
//! - [`MessageSink`] - destination for emitted messages
//! - [`JsonLinesWriter`] - one JSON object per line on any writer (stdout by default)
//! - [`MemorySink`] - collects messages in memory

mod writer;

pub use writer::{JsonLinesWriter, MemorySink, MessageSink};

#[cfg(test)]
mod tests;
