//! Typed records flowing through a migration.
//!
//! - [`source`] - what the loaders read: [`SourceUser`], [`SourceEvent`]
//! - [`target`] - what the engine produces: [`TargetMessage`], [`Channel`], [`TargetUser`]
//! - [`ts`] - [`MessageTs`], the fixed-point message key

pub mod source;
pub mod target;
pub mod ts;

pub use source::{CommentBody, EventBody, EventKind, FileDescriptor, SourceEvent, SourceUser};
pub use target::{
    Channel, ChannelTopic, Reaction, ReplyStub, TargetMessage, TargetUser, ThreadSummary,
    UserProfile,
};
pub use ts::MessageTs;
