//! Dixa streams
//!
//! Static stream definitions and the record sources that pull them.
//!
//! # Overview
//!
//! | stream          | API          | endpoint                          | replication key     |
//! |-----------------|--------------|-----------------------------------|---------------------|
//! | `conversations` | exports      | `/v1/conversation_export`         | `updated_at`        |
//! | `messages`      | exports      | `/v1/message_export`              | `created_at`        |
//! | `activity_logs` | integrations | `/v1/conversations/activitylog`   | `activityTimestamp` |
//!
//! Each [`RecordSource`] yields one API response worth of records per call
//! and returns `None` once its time range is exhausted.

mod activity_logs;
mod conversations;
mod messages;
mod types;

pub use activity_logs::{ActivityLogsSource, OffsetLogs, PageKeyLogs};
pub use conversations::{ConversationIdBatches, ConversationsSource};
pub use messages::MessagesSource;
pub use types::{
    extract_records, find_stream, open_source, RecordSource, SourceOptions, StreamDefinition,
    StreamKind, ACTIVITY_LOGS, CONVERSATIONS, MESSAGES, STREAMS,
};
