//! Unified error types for chatmigrate.
//!
//! This module provides a single [`MigrateError`] enum covering every fatal
//! condition of a run. Conditions the engine recovers from locally (an
//! unresolved user, an unknown event kind, a thread without a source id)
//! are not errors: they are reported as
//! [`MigrationWarning`](crate::core::MigrationWarning)s on the run report.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Operators** get clear messages naming the channel and event at fault
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatmigrate operations.
///
/// # Example
///
/// ```rust
/// use chatmigrate::error::Result;
/// use chatmigrate::models::TargetMessage;
///
/// fn my_function() -> Result<Vec<TargetMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, MigrateError>;

/// The error type for all chatmigrate operations.
///
/// Every variant aborts the run: the engine has no partial-success mode, so a
/// channel either produces a complete message list or no output is written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MigrateError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - An export file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing the import directory)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse an input file.
    ///
    /// Contains the format being parsed, the underlying parse error,
    /// and optionally the file path.
    #[error("Failed to parse {format} export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "Flowdock messages", "Slack users")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The input doesn't match the expected structure.
    ///
    /// This occurs when:
    /// - An export directory contains no flow with a `messages.json`
    /// - A user directory is not a JSON array
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// An event lacks a field the engine cannot fabricate.
    ///
    /// Missing authors and timestamps are fatal: inventing either would
    /// corrupt the channel's ordering or attribution.
    #[error("Event {event_id} in channel '{channel}' is missing required field '{field}'")]
    MalformedEvent {
        /// Source channel name
        channel: String,
        /// Source event id
        event_id: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// Events were not sorted ascending by send time.
    ///
    /// Thread reconstruction is order-dependent, so out-of-order input is
    /// rejected rather than silently producing a different thread layout.
    #[error("Event {event_id} in channel '{channel}' is out of order (sent {current} after {previous})")]
    EventsOutOfOrder {
        /// Source channel name
        channel: String,
        /// Source event id of the offending event
        event_id: String,
        /// Send time of the preceding event (epoch milliseconds)
        previous: i64,
        /// Send time of the offending event (epoch milliseconds)
        current: i64,
    },

    /// Two source channels normalize to the same target channel name.
    ///
    /// Their day files would overwrite each other in the import directory.
    #[error("Channels '{first}' and '{second}' both map to target channel '{name}'")]
    ChannelNameCollision {
        /// The shared target name
        name: String,
        /// Source name of the channel seen first
        first: String,
        /// Source name of the colliding channel
        second: String,
    },

    /// The migration configuration is unusable.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong
        message: String,
    },
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON parsing error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Generic parsing error
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl MigrateError {
    /// Creates a parse error for a Flowdock export file.
    pub fn flowdock_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        MigrateError::Parse {
            format: "Flowdock",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates a parse error for a Slack export file.
    pub fn slack_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        MigrateError::Parse {
            format: "Slack",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        MigrateError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a malformed event error.
    pub fn malformed_event(
        channel: impl Into<String>,
        event_id: impl Into<String>,
        field: &'static str,
    ) -> Self {
        MigrateError::MalformedEvent {
            channel: channel.into(),
            event_id: event_id.into(),
            field,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MigrateError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, MigrateError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, MigrateError::Parse { .. })
    }

    /// Returns `true` if this error was caused by a bad event.
    pub fn is_event_error(&self) -> bool {
        matches!(
            self,
            MigrateError::MalformedEvent { .. } | MigrateError::EventsOutOfOrder { .. }
        )
    }

    /// Returns `true` if two channels share a target name.
    pub fn is_channel_collision(&self) -> bool {
        matches!(self, MigrateError::ChannelNameCollision { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, MigrateError::InvalidConfig { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
