//! Output writers for the target import layout.
//!
//! A target import directory looks like:
//!
//! ```text
//! <out>/users.json
//! <out>/channels.json
//! <out>/<channel>/<YYYY-MM-DD>.json
//! ```
//!
//! Each day file holds that channel's messages whose `ts` falls on the given
//! UTC day, in output order. [`to_json`] and [`day_files`] give the same
//! content in memory.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatmigrate::Result<()> {
//! use chatmigrate::prelude::*;
//!
//! let ctx = MigrationContext::new(MigrationConfig::new(), vec![], vec![])?;
//! let report = migrate(&ctx, &[])?;
//! write_import_dir(&report, ctx.target_users(), "import")?;
//! # Ok(())
//! # }
//! ```

mod json_writer;

pub use json_writer::{WriteSummary, day_files, to_json, write_import_dir, write_json};
