//! Channel assembly and whole-run orchestration.
//!
//! [`assemble_channel`] drives one source channel through normalization,
//! splitting and thread reconstruction; [`migrate`] does so for every channel
//! of a run and collects the warnings and statistics.

use std::collections::{BTreeSet, HashMap};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::context::MigrationContext;
use crate::core::normalizer::normalize_event;
use crate::core::thread::ThreadReconstructor;
use crate::core::warning::{MigrationWarning, WarningLog};
use crate::error::{MigrateError, Result};
use crate::models::{Channel, ChannelTopic, SourceEvent, TargetMessage};

/// Longest channel name the target accepts.
const MAX_CHANNEL_NAME: usize = 80;

/// One source channel and its events, ascending by send time.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceChannel {
    pub name: String,
    pub events: Vec<SourceEvent>,
}

impl SourceChannel {
    pub fn new(name: impl Into<String>, events: Vec<SourceEvent>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }
}

/// Counters for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub events_read: usize,
    pub skipped_events: usize,
    pub messages_written: usize,
    pub threads: usize,
    pub split_messages: usize,
}

/// A fully assembled target channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelExport {
    pub channel: Channel,
    pub messages: Vec<TargetMessage>,
    pub stats: ChannelStats,
}

/// Run-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationStats {
    pub events_read: usize,
    pub messages_written: usize,
    pub skipped_events: usize,
    pub threads: usize,
    pub split_messages: usize,
    pub unresolved_users: usize,
}

impl MigrationStats {
    fn add(&mut self, channel: &ChannelStats) {
        self.events_read += channel.events_read;
        self.messages_written += channel.messages_written;
        self.skipped_events += channel.skipped_events;
        self.threads += channel.threads;
        self.split_messages += channel.split_messages;
    }

    /// Percentage of source users that resolved to a target account.
    pub fn resolution_rate(&self, source_users: usize) -> f64 {
        if source_users == 0 {
            return 100.0;
        }
        let resolved = source_users.saturating_sub(self.unresolved_users);
        resolved as f64 / source_users as f64 * 100.0
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    pub channels: Vec<ChannelExport>,
    pub warnings: Vec<MigrationWarning>,
    pub stats: MigrationStats,
}

impl MigrationReport {
    pub fn channel(&self, name: &str) -> Option<&ChannelExport> {
        self.channels.iter().find(|c| c.channel.name == name)
    }
}

/// Migrates one channel.
///
/// # Errors
///
/// Fails with [`MigrateError::EventsOutOfOrder`] if the events are not sorted
/// by send time, and with [`MigrateError::MalformedEvent`] if an event lacks
/// its author or send time. No partial channel is returned.
pub fn assemble_channel(
    ctx: &MigrationContext,
    source: &SourceChannel,
    warnings: &mut WarningLog,
) -> Result<ChannelExport> {
    check_order(source)?;

    let mut threads = ThreadReconstructor::new(ctx, &source.name);
    let mut members = BTreeSet::new();
    let mut stats = ChannelStats {
        events_read: source.events.len(),
        ..ChannelStats::default()
    };

    for event in &source.events {
        let Some(message) = normalize_event(event, ctx, &source.name, warnings)? else {
            stats.skipped_events += 1;
            continue;
        };
        if message.author.resolved {
            members.insert(message.author.id.clone());
        }
        threads.push(message, warnings);
    }

    stats.threads = threads.thread_count();
    stats.split_messages = threads.split_count();
    let messages = threads.into_messages();
    stats.messages_written = messages.len();

    let created = messages.first().map_or(0, |m| m.ts.secs());
    let channel = channel_record(ctx, &source.name, created, members.into_iter().collect());

    debug!(
        channel = %source.name,
        events = stats.events_read,
        messages = stats.messages_written,
        threads = stats.threads,
        "assembled channel"
    );

    Ok(ChannelExport {
        channel,
        messages,
        stats,
    })
}

/// Migrates every channel, in the given order.
///
/// # Errors
///
/// The first channel error aborts the run. Channels whose names normalize to
/// the same target name are rejected before any channel is assembled.
pub fn migrate(ctx: &MigrationContext, channels: &[SourceChannel]) -> Result<MigrationReport> {
    check_unique_names(ctx, channels)?;

    let mut warnings = WarningLog::new();
    ctx.report_unresolved(&mut warnings);

    let mut stats = MigrationStats {
        unresolved_users: ctx.identities().unresolved().len(),
        ..MigrationStats::default()
    };

    let mut exports = Vec::with_capacity(channels.len());
    for source in channels {
        let export = assemble_channel(ctx, source, &mut warnings)?;
        stats.add(&export.stats);
        exports.push(export);
    }

    info!(
        channels = exports.len(),
        messages = stats.messages_written,
        warnings = warnings.len(),
        "migration finished"
    );

    Ok(MigrationReport {
        channels: exports,
        warnings: warnings.into_vec(),
        stats,
    })
}

fn check_order(source: &SourceChannel) -> Result<()> {
    let mut previous: Option<i64> = None;
    for event in &source.events {
        let Some(current) = event.sent_at else {
            continue;
        };
        if let Some(prev) = previous
            && current < prev
        {
            return Err(MigrateError::EventsOutOfOrder {
                channel: source.name.clone(),
                event_id: event.id.clone(),
                previous: prev,
                current,
            });
        }
        previous = Some(current);
    }
    Ok(())
}

fn check_unique_names(ctx: &MigrationContext, channels: &[SourceChannel]) -> Result<()> {
    let prefix = &ctx.config().channel_prefix;
    let mut taken: HashMap<String, &str> = HashMap::with_capacity(channels.len());
    for source in channels {
        let name = channel_name(prefix, &source.name);
        if let Some(first) = taken.get(&name) {
            return Err(MigrateError::ChannelNameCollision {
                name,
                first: (*first).to_string(),
                second: source.name.clone(),
            });
        }
        taken.insert(name, &source.name);
    }
    Ok(())
}

fn channel_record(ctx: &MigrationContext, source_name: &str, created: i64, members: Vec<String>) -> Channel {
    let config = ctx.config();
    let bot = &ctx.bot().id;
    let name = channel_name(&config.channel_prefix, source_name);
    let description = ChannelTopic {
        value: format!(
            "Migrated from {} flow \"{}\"",
            config.source_platform, source_name
        ),
        creator: bot.clone(),
        last_set: created,
    };

    Channel {
        id: channel_id(&name),
        name,
        created,
        creator: bot.clone(),
        is_archived: config.archive_channels,
        is_general: false,
        members,
        topic: description.clone(),
        purpose: description,
    }
}

/// Normalizes a source channel name to the target alphabet: lowercase
/// `[a-z0-9_-]`, other characters become `-`, at most 80 characters.
///
/// ```
/// use chatmigrate::core::processor::channel_name;
///
/// assert_eq!(channel_name("", "Main Flow!"), "main-flow-");
/// assert_eq!(channel_name("fd-", "ops"), "fd-ops");
/// ```
pub fn channel_name(prefix: &str, source_name: &str) -> String {
    format!("{prefix}{source_name}")
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .take(MAX_CHANNEL_NAME)
        .collect()
}

/// Deterministic channel id: `C` followed by the upper-case hex of the first
/// ten bytes of the name's SHA-256.
pub fn channel_id(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    format!("C{}", hex::encode_upper(&digest[..10]))
}
