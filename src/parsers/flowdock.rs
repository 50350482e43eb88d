//! Flowdock export loader.
//!
//! An export directory holds one sub-directory per flow, each with the flow's
//! full message log:
//!
//! ```text
//! <export>/<flow>/messages.json
//! ```
//!
//! The user directory (`users.json`) is a separate file of
//! `{id, email, nick, name}` records.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::core::processor::SourceChannel;
use crate::error::{MigrateError, Result};
use crate::models::{SourceEvent, SourceUser};

/// File name of a flow's message log.
pub const MESSAGES_FILE: &str = "messages.json";

/// Parses a Flowdock `users.json` array.
pub fn parse_users_str(content: &str) -> Result<Vec<SourceUser>> {
    serde_json::from_str(content).map_err(|e| MigrateError::flowdock_parse(e, None))
}

/// Reads and parses a Flowdock `users.json` file.
pub fn parse_users(path: impl AsRef<Path>) -> Result<Vec<SourceUser>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| MigrateError::flowdock_parse(e, Some(path.to_path_buf())))
}

/// Parses a flow's `messages.json`, returning events stably sorted by send
/// time. Events without a send time keep their position relative to each
/// other and sort first.
///
/// ```
/// use chatmigrate::parsers::flowdock;
///
/// let events = flowdock::parse_messages_str(r#"[
///     {"id": 2, "event": "message", "user": "7", "sent": 2000, "content": "later"},
///     {"id": 1, "event": "message", "user": "7", "sent": 1000, "content": "earlier"}
/// ]"#).unwrap();
/// assert_eq!(events[0].id, "1");
/// ```
pub fn parse_messages_str(content: &str) -> Result<Vec<SourceEvent>> {
    let events: Vec<SourceEvent> =
        serde_json::from_str(content).map_err(|e| MigrateError::flowdock_parse(e, None))?;
    Ok(sorted(events))
}

/// Reads and parses a flow's `messages.json` file.
pub fn parse_messages(path: impl AsRef<Path>) -> Result<Vec<SourceEvent>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let events: Vec<SourceEvent> = serde_json::from_str(&content)
        .map_err(|e| MigrateError::flowdock_parse(e, Some(path.to_path_buf())))?;
    Ok(sorted(events))
}

/// Loads one flow directory as a channel named after the directory.
pub fn load_channel(flow_dir: impl AsRef<Path>) -> Result<SourceChannel> {
    let flow_dir = flow_dir.as_ref();
    let name = flow_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            MigrateError::invalid_format(
                "Flowdock",
                format!("flow directory has no usable name: {}", flow_dir.display()),
            )
        })?
        .to_string();

    let events = parse_messages(flow_dir.join(MESSAGES_FILE))?;
    debug!(channel = %name, events = events.len(), "loaded flow");
    Ok(SourceChannel::new(name, events))
}

/// Loads every flow under `dir` that has a `messages.json`, sorted by name.
///
/// Sub-directories without a message log are ignored.
pub fn load_export_dir(dir: impl AsRef<Path>) -> Result<Vec<SourceChannel>> {
    let dir = dir.as_ref();
    let mut flow_dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() && path.join(MESSAGES_FILE).is_file() {
            flow_dirs.push(path);
        }
    }
    flow_dirs.sort();

    let channels = flow_dirs
        .iter()
        .map(load_channel)
        .collect::<Result<Vec<_>>>()?;
    info!(dir = %dir.display(), flows = channels.len(), "loaded export directory");
    Ok(channels)
}

fn sorted(mut events: Vec<SourceEvent>) -> Vec<SourceEvent> {
    events.sort_by_key(|e| e.sent_at);
    events
}
