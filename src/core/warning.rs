//! Recoverable conditions met during a run.
//!
//! Each warning is logged through `tracing` when recorded and kept on the
//! run report so operators can review what fell back to the bot identity or
//! was skipped.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::warn;

/// A condition the engine recovered from locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum MigrationWarning {
    /// A source user has no counterpart in the target directory.
    UnresolvedUser { source_id: String, nick: String },

    /// A message author is missing from the source directory altogether.
    UnknownAuthor { channel: String, author_id: String },

    /// A reactor could not be resolved; the reaction went to the bot.
    UnresolvedReactor { channel: String, user_id: String },

    /// The event kind is not migrated.
    UnknownEventKind {
        channel: String,
        event_id: String,
        kind: String,
    },

    /// A thread has no source id to link back to; the backlink was omitted.
    MissingBacklinkContext { channel: String, parent_ts: String },
}

impl fmt::Display for MigrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationWarning::UnresolvedUser { source_id, nick } => {
                write!(f, "user {source_id} ({nick}) has no target account")
            }
            MigrationWarning::UnknownAuthor { channel, author_id } => {
                write!(f, "[{channel}] author {author_id} is not in the source directory")
            }
            MigrationWarning::UnresolvedReactor { channel, user_id } => {
                write!(f, "[{channel}] reactor {user_id} attributed to the bot")
            }
            MigrationWarning::UnknownEventKind {
                channel,
                event_id,
                kind,
            } => write!(f, "[{channel}] skipped event {event_id} of kind '{kind}'"),
            MigrationWarning::MissingBacklinkContext { channel, parent_ts } => {
                write!(f, "[{channel}] thread {parent_ts} has no source thread to link")
            }
        }
    }
}

/// Ordered, de-duplicated collection of warnings.
#[derive(Debug, Default, Clone)]
pub struct WarningLog {
    entries: Vec<MigrationWarning>,
    seen: HashSet<MigrationWarning>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning; a warning identical to one already recorded is dropped.
    pub fn push(&mut self, warning: MigrationWarning) {
        if self.seen.contains(&warning) {
            return;
        }
        warn!(target: "chatmigrate", "{warning}");
        self.seen.insert(warning.clone());
        self.entries.push(warning);
    }

    pub fn entries(&self) -> &[MigrationWarning] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<MigrationWarning> {
        self.entries
    }
}
