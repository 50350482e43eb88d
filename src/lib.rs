//! # Chatmigrate
//!
//! A Rust library for migrating a Flowdock conversation export into a Slack
//! import directory.
//!
//! ## Overview
//!
//! The source export is a flat, time-ordered log of events per flow. The
//! target import needs resolved user identities, reconstructed threads and
//! message records in its own format. Chatmigrate does that transformation:
//!
//! - **Identity resolution**: source users are matched to target accounts
//!   by email, then by name
//! - **Normalization**: mentions are rewritten, reactions mapped and file
//!   shares replaced by a placeholder
//! - **Splitting**: over-length messages are split at whitespace
//! - **Thread reconstruction**: parents, replies and backlinks are rebuilt
//!   from the flat stream with unique, strictly increasing timestamps
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatmigrate::prelude::*;
//! use chatmigrate::parsers::{flowdock, slack};
//!
//! fn main() -> Result<()> {
//!     let ctx = MigrationContext::new(
//!         MigrationConfig::new().with_organization("acme"),
//!         flowdock::parse_users("export/users.json")?,
//!         slack::parse_users("slack/users.json")?,
//!     )?;
//!
//!     let channels = flowdock::load_export_dir("export")?;
//!     let report = migrate(&ctx, &channels)?;
//!     write_import_dir(&report, ctx.target_users(), "import")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## In-memory use
//!
//! ```rust
//! use chatmigrate::prelude::*;
//!
//! let ctx = MigrationContext::new(
//!     MigrationConfig::new(),
//!     vec![SourceUser::new("1", "ann").with_email("ann@x.com")],
//!     vec![TargetUser::new("U1", "ann").with_email("ann@x.com")],
//! )?;
//! let channel = SourceChannel::new(
//!     "main",
//!     vec![SourceEvent::message("10", "1", 1_000, "hello @Bob")],
//! );
//! let report = migrate(&ctx, &[channel])?;
//!
//! let message = &report.channels[0].messages[0];
//! assert_eq!(message.author_id, "U1");
//! assert_eq!(message.text, "hello <@bob>");
//! assert_eq!(message.ts.to_string(), "1.000000");
//! # Ok::<(), chatmigrate::MigrateError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`core`] - the transformation engine
//!   - [`core::identity`], [`core::mention`], [`core::reactions`],
//!     [`core::normalizer`], [`core::splitter`], [`core::thread`],
//!     [`core::processor`], [`core::output`]
//! - [`models`] - source and target records, [`MessageTs`]
//! - [`parsers`] - Flowdock and Slack loaders
//! - [`config`] - [`MigrationConfig`]
//! - [`error`] - [`MigrateError`], [`Result`]
//! - [`cli`] - CLI arguments (`cli` feature)
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod parsers;

// Re-export the main types at the crate root for convenience
pub use config::MigrationConfig;
pub use error::{MigrateError, Result};
pub use models::MessageTs;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatmigrate::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{MigrateError, Result};

    // Configuration and run context
    pub use crate::config::{BotIdentity, MigrationConfig};
    pub use crate::core::context::MigrationContext;

    // Records
    pub use crate::models::{
        Channel, EventBody, EventKind, MessageTs, Reaction, SourceEvent, SourceUser,
        TargetMessage, TargetUser, ThreadSummary,
    };

    // Engine
    pub use crate::core::processor::{
        ChannelExport, MigrationReport, MigrationStats, SourceChannel, assemble_channel, migrate,
    };
    pub use crate::core::warning::MigrationWarning;

    // Output
    pub use crate::core::output::{to_json, write_import_dir};
}
