//! Records of the source platform's export.
//!
//! Field names follow the Flowdock export (`users.json` and a flow's
//! `messages.json`). Ids appear as numbers in some files and strings in
//! others, so every id is normalized to a `String` on the way in.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A user of the source platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUser {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "nick", default)]
    pub display_nick: String,

    #[serde(rename = "name", default)]
    pub full_name: String,
}

impl SourceUser {
    pub fn new(id: impl Into<String>, display_nick: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_nick: display_nick.into(),
            full_name: String::new(),
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }
}

/// What an event records.
///
/// Only messages, comments and file shares become target messages; every
/// other kind (`action`, `tag-change`, `message-edit`, ...) is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Message,
    Comment,
    File,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Message => "message",
            EventKind::Comment => "comment",
            EventKind::File => "file",
            EventKind::Other(kind) => kind,
        }
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "message" => EventKind::Message,
            "comment" => EventKind::Comment,
            "file" => EventKind::File,
            _ => EventKind::Other(s),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared metadata of a shared file. The payload itself is never migrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub file_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Body of a comment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentBody {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The `content` field of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventBody {
    Text(String),
    File(FileDescriptor),
    Comment(CommentBody),
    /// Anything else (action payloads, tag lists, ...).
    Other(serde_json::Value),
}

impl Default for EventBody {
    fn default() -> Self {
        EventBody::Text(String::new())
    }
}

impl EventBody {
    /// The human-readable text of the body.
    ///
    /// Files yield their declared name; unstructured payloads yield nothing.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            EventBody::Text(s) => Cow::Borrowed(s),
            EventBody::Comment(c) => Cow::Borrowed(&c.text),
            EventBody::File(f) => Cow::Borrowed(&f.file_name),
            EventBody::Other(_) => Cow::Borrowed(""),
        }
    }
}

/// One immutable record of the source conversation log.
///
/// `author_id` and `sent_at` are optional at the serde level so that a
/// malformed export is reported with the offending event, not as an opaque
/// deserialization failure of the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvent {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    #[serde(rename = "event")]
    pub kind: EventKind,

    #[serde(rename = "user", default, deserialize_with = "de_opt_id")]
    pub author_id: Option<String>,

    #[serde(rename = "content", default)]
    pub body: EventBody,

    /// Epoch milliseconds.
    #[serde(rename = "sent", default)]
    pub sent_at: Option<i64>,

    #[serde(default, deserialize_with = "de_opt_id")]
    pub thread_id: Option<String>,

    /// Emoji name to the ids of the users who reacted with it.
    #[serde(
        rename = "emojiReactions",
        default,
        deserialize_with = "de_reactions",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub reactions: BTreeMap<String, Vec<String>>,
}

impl SourceEvent {
    /// Creates a plain-text message event.
    pub fn message(
        id: impl Into<String>,
        author_id: impl Into<String>,
        sent_at: i64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EventKind::Message,
            author_id: Some(author_id.into()),
            body: EventBody::Text(text.into()),
            sent_at: Some(sent_at),
            thread_id: None,
            reactions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: EventBody) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    #[must_use]
    pub fn with_reaction<I, S>(mut self, emoji: impl Into<String>, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reactions
            .insert(emoji.into(), users.into_iter().map(Into::into).collect());
        self
    }
}

// ============================================================================
// Id normalization
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Num(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

fn de_reactions<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<String>>, D::Error> {
    let raw = Option::<BTreeMap<String, Vec<RawId>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(emoji, users)| (emoji, users.into_iter().map(String::from).collect()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_ids() {
        let json = r#"{"id": 42, "email": "a@x.com", "nick": "alice", "name": "Alice A"}"#;
        let user: SourceUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.display_nick, "alice");
        assert_eq!(user.full_name, "Alice A");
    }

    #[test]
    fn test_deserialize_message_event() {
        let json = r#"{
            "id": 100, "event": "message", "user": "42", "content": "hello",
            "sent": 1585000000000, "thread_id": "abc",
            "emojiReactions": {"+1": ["42", 7]}
        }"#;
        let event: SourceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "100");
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.author_id.as_deref(), Some("42"));
        assert_eq!(event.body.text(), "hello");
        assert_eq!(event.sent_at, Some(1_585_000_000_000));
        assert_eq!(event.thread_id.as_deref(), Some("abc"));
        assert_eq!(event.reactions["+1"], vec!["42", "7"]);
    }

    #[test]
    fn test_deserialize_comment_and_file_bodies() {
        let comment: SourceEvent = serde_json::from_str(
            r#"{"id": 1, "event": "comment", "user": 1, "sent": 1,
                "content": {"title": "Deploy", "text": "looks good"}}"#,
        )
        .unwrap();
        assert!(matches!(comment.body, EventBody::Comment(_)));
        assert_eq!(comment.body.text(), "looks good");

        let file: SourceEvent = serde_json::from_str(
            r#"{"id": 2, "event": "file", "user": 1, "sent": 2,
                "content": {"file_name": "report.pdf", "content_type": "application/pdf"}}"#,
        )
        .unwrap();
        assert_eq!(file.kind, EventKind::File);
        assert!(matches!(file.body, EventBody::File(ref f) if f.file_name == "report.pdf"));
    }

    #[test]
    fn test_unknown_kind_and_missing_fields() {
        let event: SourceEvent = serde_json::from_str(
            r##"{"id": "x", "event": "tag-change", "content": {"add": ["#ops"]}}"##,
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::Other("tag-change".into()));
        assert!(event.author_id.is_none());
        assert!(event.sent_at.is_none());
        assert!(event.reactions.is_empty());
        assert_eq!(event.body.text(), "");
    }

    #[test]
    fn test_kind_round_trips_as_string() {
        let json = serde_json::to_string(&EventKind::Other("action".into())).unwrap();
        assert_eq!(json, r#""action""#);
        let json = serde_json::to_string(&EventKind::Comment).unwrap();
        assert_eq!(json, r#""comment""#);
    }
}
