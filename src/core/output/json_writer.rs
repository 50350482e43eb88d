//! JSON output writer.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::core::processor::MigrationReport;
use crate::error::Result;
use crate::models::{Channel, TargetMessage, TargetUser};

/// Day key used when a timestamp is outside chrono's range.
const EPOCH_DAY: &str = "1970-01-01";

/// What [`write_import_dir`] produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub channels: usize,
    pub day_files: usize,
    pub messages: usize,
}

/// Serializes any record (or list of records) as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes `value` as pretty-printed JSON to `path`.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Groups messages by the UTC day of their `ts`, keeping output order
/// within each day.
pub fn day_files(messages: &[TargetMessage]) -> BTreeMap<String, Vec<&TargetMessage>> {
    let mut days: BTreeMap<String, Vec<&TargetMessage>> = BTreeMap::new();
    for message in messages {
        let day = message
            .ts
            .to_datetime()
            .map_or_else(|| EPOCH_DAY.to_string(), |dt| dt.format("%Y-%m-%d").to_string());
        days.entry(day).or_default().push(message);
    }
    days
}

/// Writes a complete import directory for `report`.
///
/// `dir` is created if missing; existing files with the same names are
/// overwritten.
pub fn write_import_dir(
    report: &MigrationReport,
    target_users: &[TargetUser],
    dir: impl AsRef<Path>,
) -> Result<WriteSummary> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    write_json(target_users, dir.join("users.json"))?;
    let channels: Vec<&Channel> = report.channels.iter().map(|c| &c.channel).collect();
    write_json(&channels, dir.join("channels.json"))?;

    let mut summary = WriteSummary::default();
    for export in &report.channels {
        let channel_dir = dir.join(&export.channel.name);
        fs::create_dir_all(&channel_dir)?;

        for (day, messages) in day_files(&export.messages) {
            write_json(&messages, channel_dir.join(format!("{day}.json")))?;
            summary.day_files += 1;
            summary.messages += messages.len();
        }
        summary.channels += 1;
        debug!(channel = %export.channel.name, dir = %channel_dir.display(), "wrote channel");
    }

    Ok(summary)
}
