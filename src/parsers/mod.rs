//! Loaders for the source and target exports.
//!
//! - [`flowdock`] - source user directory, flow message logs and whole
//!   export directories
//! - [`slack`] - target user directory
//!
//! Every loader comes as a `parse_*_str` / `parse_*` pair: the first works on
//! in-memory content, the second reads a file and reports parse failures with
//! its path.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatmigrate::Result<()> {
//! use chatmigrate::parsers::{flowdock, slack};
//!
//! let source_users = flowdock::parse_users("export/users.json")?;
//! let target_users = slack::parse_users("slack/users.json")?;
//! let channels = flowdock::load_export_dir("export")?;
//! # Ok(())
//! # }
//! ```

pub mod flowdock;
pub mod slack;

pub use flowdock::load_export_dir;
