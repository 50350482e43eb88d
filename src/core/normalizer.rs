//! Per-event normalization into target message skeletons.
//!
//! The normalizer decides the text, author and identifiers of a message. It
//! does not place the message in a thread: final `ts`/`thread_ts` values are
//! assigned by the [`ThreadReconstructor`](crate::core::thread::ThreadReconstructor).

use sha2::{Digest, Sha256};

use crate::core::context::MigrationContext;
use crate::core::mention::rewrite_mentions;
use crate::core::reactions::map_reactions;
use crate::core::warning::{MigrationWarning, WarningLog};
use crate::error::{MigrateError, Result};
use crate::models::{EventBody, EventKind, MessageTs, Reaction, SourceEvent, UserProfile};

/// Text put in place of a file share; the file's declared name follows.
pub const ATTACHMENT_NOT_IMPORTED: &str = "Attachment not imported: ";

/// Display values for an author missing from the source directory.
const UNKNOWN_DISPLAY_NAME: &str = "unknown";
const UNKNOWN_REAL_NAME: &str = "Unknown user";

/// The resolved author of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Target user id (the bot's id when unresolved)
    pub id: String,
    pub profile: UserProfile,
    /// `false` when the bot identity stands in for the real author
    pub resolved: bool,
}

/// One event after normalization, before thread placement.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMessage {
    pub source_id: String,
    pub thread_id: Option<String>,
    /// Timestamp derived from the event's send time
    pub sent_ts: MessageTs,
    pub author: Author,
    pub text: String,
    pub client_msg_id: String,
    pub reactions: Vec<Reaction>,
}

/// Normalizes one event.
///
/// Returns `Ok(None)` for event kinds that are not migrated (recorded as a
/// warning). An event without an author or send time is a fatal error.
pub fn normalize_event(
    event: &SourceEvent,
    ctx: &MigrationContext,
    channel: &str,
    warnings: &mut WarningLog,
) -> Result<Option<NormalizedMessage>> {
    let text = match &event.kind {
        EventKind::Message | EventKind::Comment => rewrite_mentions(&event.body.text()).into_owned(),
        EventKind::File => file_placeholder(&event.body),
        EventKind::Other(kind) => {
            warnings.push(MigrationWarning::UnknownEventKind {
                channel: channel.to_string(),
                event_id: event.id.clone(),
                kind: kind.clone(),
            });
            return Ok(None);
        }
    };

    let author_id = event
        .author_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| MigrateError::malformed_event(channel, &event.id, "user"))?;
    let sent_at = event
        .sent_at
        .ok_or_else(|| MigrateError::malformed_event(channel, &event.id, "sent"))?;

    Ok(Some(NormalizedMessage {
        source_id: event.id.clone(),
        thread_id: event.thread_id.clone(),
        sent_ts: MessageTs::from_millis(sent_at),
        author: resolve_author(author_id, ctx, channel, warnings),
        text,
        client_msg_id: client_msg_id(event)?,
        reactions: map_reactions(&event.reactions, ctx, channel, warnings),
    }))
}

fn file_placeholder(body: &EventBody) -> String {
    format!("{ATTACHMENT_NOT_IMPORTED}{}", body.text())
}

/// Resolves an author, synthesizing a bot-backed stand-in when needed.
///
/// The stand-in keeps the source user's nick and name when the source
/// directory knows the id, and generic placeholders otherwise.
pub fn resolve_author(
    author_id: &str,
    ctx: &MigrationContext,
    channel: &str,
    warnings: &mut WarningLog,
) -> Author {
    if let Some(target) = ctx.identities().get(author_id) {
        return Author {
            id: target.id.clone(),
            profile: target.profile.for_message(),
            resolved: true,
        };
    }

    let profile = match ctx.source_user(author_id) {
        Some(source) => UserProfile::new(&source.display_nick, &source.full_name),
        None => {
            warnings.push(MigrationWarning::UnknownAuthor {
                channel: channel.to_string(),
                author_id: author_id.to_string(),
            });
            UserProfile::new(UNKNOWN_DISPLAY_NAME, UNKNOWN_REAL_NAME)
        }
    };

    Author {
        id: ctx.bot().id.clone(),
        profile,
        resolved: false,
    }
}

/// Deterministic message id: SHA-256 of the event's canonical JSON.
pub fn client_msg_id(event: &SourceEvent) -> Result<String> {
    let canonical = serde_json::to_vec(event)?;
    Ok(derive_client_msg_id(&canonical))
}

/// Formats the SHA-256 digest of `seed` as an 8-4-4-4-12 identifier.
///
/// ```
/// use chatmigrate::core::normalizer::derive_client_msg_id;
///
/// let id = derive_client_msg_id(b"seed");
/// let groups: Vec<usize> = id.split('-').map(str::len).collect();
/// assert_eq!(groups, [8, 4, 4, 4, 12]);
/// assert_eq!(id, derive_client_msg_id(b"seed"));
/// ```
pub fn derive_client_msg_id(seed: &[u8]) -> String {
    let hex = hex::encode(Sha256::digest(seed));
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
