//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Verbosity`] - log level chosen by `-v`/`-q`
//!
//! [`Args::migration_config`] layers the command-line overrides on top of the
//! optional configuration file, so the binary and tests share the same
//! precedence rules.

use std::path::PathBuf;

use clap::Parser;

use crate::config::MigrationConfig;
use crate::core::processor::SourceChannel;
use crate::error::Result;

/// Migrate a Flowdock export into a Slack import directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatmigrate")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatmigrate export/ --source-users export/users.json --target-users slack/users.json
    chatmigrate export/ --source-users users.json --target-users slack.json -o import --organization acme
    chatmigrate export/ --source-users users.json --target-users slack.json --only main --only dev
    chatmigrate export/ --source-users users.json --target-users slack.json -c migration.json -v")]
pub struct Args {
    /// Export directory with one `<flow>/messages.json` per flow
    pub export_dir: PathBuf,

    /// Source user directory (Flowdock users.json)
    #[arg(long, value_name = "FILE")]
    pub source_users: PathBuf,

    /// Target user directory (Slack users.json)
    #[arg(long, value_name = "FILE")]
    pub target_users: PathBuf,

    /// Output directory for the import files
    #[arg(short, long, default_value = "slack_import")]
    pub output: PathBuf,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Split messages longer than this many characters
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,

    /// Source organization, used in thread backlinks
    #[arg(long, value_name = "ORG")]
    pub organization: Option<String>,

    /// Prefix for every target channel name
    #[arg(long, value_name = "PREFIX")]
    pub channel_prefix: Option<String>,

    /// Only migrate these flows (repeatable)
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Show debug logs
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Show errors only
    #[arg(short, long)]
    pub quiet: bool,
}

/// Log level selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// The `tracing` filter directive for this level.
    pub fn filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "chatmigrate=debug",
        }
    }
}

impl Args {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Builds the run configuration: defaults, then the config file, then
    /// command-line overrides.
    pub fn migration_config(&self) -> Result<MigrationConfig> {
        let mut config = match &self.config {
            Some(path) => MigrationConfig::from_path(path)?,
            None => MigrationConfig::new(),
        };
        if let Some(max) = self.max_chars {
            config = config.with_max_message_chars(max);
        }
        if let Some(org) = &self.organization {
            config = config.with_organization(org);
        }
        if let Some(prefix) = &self.channel_prefix {
            config = config.with_channel_prefix(prefix);
        }
        config.validate()?;
        Ok(config)
    }

    /// Applies `--only`; keeps every channel when it was not given.
    pub fn select_channels(&self, channels: Vec<SourceChannel>) -> Vec<SourceChannel> {
        if self.only.is_empty() {
            return channels;
        }
        channels
            .into_iter()
            .filter(|c| self.only.iter().any(|name| *name == c.name))
            .collect()
    }
}
