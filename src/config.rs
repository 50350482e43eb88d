//! Configuration for a migration run.
//!
//! [`MigrationConfig`] is a plain serde struct: it can be built in code with
//! `with_*` builders or read from a JSON file where every field is optional.
//!
//! # Example
//!
//! ```rust
//! use chatmigrate::config::MigrationConfig;
//!
//! let config = MigrationConfig::new()
//!     .with_organization("acme")
//!     .with_max_message_chars(4000)
//!     .with_channel_prefix("fd-");
//!
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};
use crate::models::UserProfile;

/// Default split threshold, safely below the target's 40 000 character limit.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 35_000;

/// Prefix of every chunk after the first of a split message.
pub const DEFAULT_CONTINUATION_MARKER: &str = "(continued) ";

/// The stand-in target user for anything that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotIdentity {
    pub id: String,
    pub display_name: String,
    pub real_name: String,
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self {
            id: "USLACKBOT".to_string(),
            display_name: "migration-bot".to_string(),
            real_name: "Migration Bot".to_string(),
        }
    }
}

impl BotIdentity {
    pub fn profile(&self) -> UserProfile {
        UserProfile::new(&self.display_name, &self.real_name)
    }
}

/// Settings of one migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Messages longer than this (in characters) are split (default: 35 000)
    pub max_message_chars: usize,

    /// Prefix of every chunk after the first (default: `"(continued) "`)
    pub continuation_marker: String,

    /// Fallback identity for unresolved users and synthetic messages
    pub bot: BotIdentity,

    /// Name of the source platform, used in backlinks and channel purposes
    pub source_platform: String,

    /// Source organization, substituted into `thread_url_template`
    pub organization: String,

    /// URL of a source thread; `{organization}`, `{channel}` and `{thread_id}`
    /// are substituted
    pub thread_url_template: String,

    /// Prepended to every target channel name (default: empty)
    pub channel_prefix: String,

    /// Mark migrated channels as archived (default: true)
    pub archive_channels: bool,

    /// Source emoji name to target emoji name
    pub emoji_aliases: BTreeMap<String, String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            continuation_marker: DEFAULT_CONTINUATION_MARKER.to_string(),
            bot: BotIdentity::default(),
            source_platform: "Flowdock".to_string(),
            organization: String::new(),
            thread_url_template:
                "https://www.flowdock.com/app/{organization}/{channel}/threads/{thread_id}"
                    .to_string(),
            channel_prefix: String::new(),
            archive_channels: true,
            emoji_aliases: BTreeMap::new(),
        }
    }
}

impl MigrationConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| MigrateError::Parse {
            format: "configuration",
            source: e.into(),
            path: Some(path.to_path_buf()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a run.
    ///
    /// The continuation marker must leave room for at least one character of
    /// text in a continuation chunk.
    pub fn validate(&self) -> Result<()> {
        if self.max_message_chars == 0 {
            return Err(MigrateError::invalid_config(
                "max_message_chars must be greater than zero",
            ));
        }
        let marker_chars = self.continuation_marker.chars().count();
        if marker_chars >= self.max_message_chars {
            return Err(MigrateError::invalid_config(format!(
                "continuation marker ({} chars) does not fit in max_message_chars ({})",
                marker_chars, self.max_message_chars
            )));
        }
        if self.bot.id.trim().is_empty() {
            return Err(MigrateError::invalid_config("bot id must not be empty"));
        }
        Ok(())
    }

    /// The source URL of a thread. Substituted values are percent-encoded.
    pub fn thread_url(&self, channel: &str, thread_id: &str) -> String {
        self.thread_url_template
            .replace("{organization}", &urlencoding::encode(&self.organization))
            .replace("{channel}", &urlencoding::encode(channel))
            .replace("{thread_id}", &urlencoding::encode(thread_id))
    }

    /// Sets the split threshold.
    #[must_use]
    pub fn with_max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = max;
        self
    }

    /// Sets the continuation marker.
    #[must_use]
    pub fn with_continuation_marker(mut self, marker: impl Into<String>) -> Self {
        self.continuation_marker = marker.into();
        self
    }

    /// Sets the fallback bot identity.
    #[must_use]
    pub fn with_bot(mut self, bot: BotIdentity) -> Self {
        self.bot = bot;
        self
    }

    /// Sets the source organization.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Sets the target channel name prefix.
    #[must_use]
    pub fn with_channel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.channel_prefix = prefix.into();
        self
    }

    /// Sets whether migrated channels are archived.
    #[must_use]
    pub fn with_archive_channels(mut self, archive: bool) -> Self {
        self.archive_channels = archive;
        self
    }

    /// Adds an emoji rename.
    #[must_use]
    pub fn with_emoji_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.emoji_aliases.insert(from.into(), to.into());
        self
    }
}
