//! The message and thread transformation engine.
//!
//! Components, leaf first:
//! - [`identity`] - source-to-target user resolution ([`IdentityMap`])
//! - [`mention`] - `@handle` rewriting
//! - [`reactions`] - reactor id mapping
//! - [`normalizer`] - one source event to one message skeleton
//! - [`splitter`] - over-length message splitting
//! - [`thread`] - thread reconstruction ([`ThreadReconstructor`])
//! - [`processor`] - per-channel assembly and [`migrate`]
//! - [`output`] - import directory writer
//!
//! Every component takes the run's [`MigrationContext`] by reference and
//! records recoverable problems in a [`WarningLog`].

pub mod context;
pub mod identity;
pub mod mention;
pub mod normalizer;
pub mod output;
pub mod processor;
pub mod reactions;
pub mod splitter;
pub mod thread;
pub mod warning;

pub use context::MigrationContext;
pub use identity::{IdentityMap, strip_name_suffix};
pub use mention::rewrite_mentions;
pub use normalizer::{NormalizedMessage, normalize_event};
pub use output::{to_json, write_import_dir, write_json};
pub use processor::{
    ChannelExport, ChannelStats, MigrationReport, MigrationStats, SourceChannel, assemble_channel,
    migrate,
};
pub use reactions::map_reactions;
pub use splitter::MessageSplitter;
pub use thread::ThreadReconstructor;
pub use warning::{MigrationWarning, WarningLog};
