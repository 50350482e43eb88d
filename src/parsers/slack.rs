//! Slack user directory loader.

use std::fs;
use std::path::Path;

use crate::error::{MigrateError, Result};
use crate::models::TargetUser;

/// Parses a Slack `users.json` array.
///
/// ```
/// use chatmigrate::parsers::slack;
///
/// let users = slack::parse_users_str(
///     r#"[{"id": "U1", "name": "ann", "profile": {"email": "ann@x.com", "real_name": "Ann"}}]"#,
/// ).unwrap();
/// assert_eq!(users[0].email(), Some("ann@x.com"));
/// ```
pub fn parse_users_str(content: &str) -> Result<Vec<TargetUser>> {
    serde_json::from_str(content).map_err(|e| MigrateError::slack_parse(e, None))
}

/// Reads and parses a Slack `users.json` file.
pub fn parse_users(path: impl AsRef<Path>) -> Result<Vec<TargetUser>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| MigrateError::slack_parse(e, Some(path.to_path_buf())))
}
