//! Records of the target platform's import format.
//!
//! Field names follow the Slack export layout, so these types serialize
//! directly into `users.json`, `channels.json` and the per-day message files.

use serde::{Deserialize, Serialize};

use super::ts::MessageTs;

/// Display information attached to users and, denormalized, to messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub real_name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_72: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_hash: Option<String>,
}

impl UserProfile {
    pub fn new(display_name: impl Into<String>, real_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            real_name: real_name.into(),
            ..Self::default()
        }
    }

    /// The profile as shown on a message: contact details stripped.
    #[must_use]
    pub fn for_message(&self) -> Self {
        Self {
            email: None,
            ..self.clone()
        }
    }
}

/// A user of the target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUser {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,

    #[serde(default)]
    pub profile: UserProfile,
}

impl TargetUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            real_name: None,
            profile: UserProfile::default(),
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.profile.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_real_name(mut self, name: impl Into<String>) -> Self {
        self.profile.real_name = name.into();
        self
    }

    pub fn email(&self) -> Option<&str> {
        self.profile.email.as_deref()
    }

    /// The profile's real name, falling back to the top-level one.
    pub fn real_name(&self) -> &str {
        if self.profile.real_name.is_empty() {
            self.real_name.as_deref().unwrap_or_default()
        } else {
            &self.profile.real_name
        }
    }
}

/// One emoji reaction on a target message.
///
/// Invariant: `count == users.len()` and `users` holds no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    pub users: Vec<String>,
    pub count: usize,
}

/// A `{user, ts}` entry in a thread parent's reply list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyStub {
    pub user: String,
    pub ts: MessageTs,
}

/// Reply bookkeeping carried only by thread parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub replies: Vec<ReplyStub>,
    pub reply_users: Vec<String>,
    pub reply_users_count: usize,
    pub reply_count: usize,
    pub latest_reply: MessageTs,
    pub last_read: MessageTs,
    pub subscribed: bool,
}

impl ThreadSummary {
    /// Bookkeeping for a thread whose first reply is about to be recorded:
    /// a single stub attributed to `bot_id` at the parent's own ts.
    pub fn opened_by(bot_id: &str, parent_ts: MessageTs) -> Self {
        Self {
            replies: vec![ReplyStub {
                user: bot_id.to_string(),
                ts: parent_ts,
            }],
            reply_users: vec![bot_id.to_string()],
            reply_users_count: 1,
            reply_count: 1,
            latest_reply: parent_ts,
            last_read: parent_ts,
            subscribed: false,
        }
    }

    /// Records one reply and refreshes every derived counter.
    pub fn record_reply(&mut self, user: &str, ts: MessageTs) {
        self.replies.push(ReplyStub {
            user: user.to_string(),
            ts,
        });
        self.reply_count = self.replies.len();
        if !self.reply_users.iter().any(|u| u == user) {
            self.reply_users.push(user.to_string());
        }
        self.reply_users_count = self.reply_users.len();
        self.latest_reply = ts;
        self.last_read = ts;
        self.subscribed = false;
    }
}

fn message_type() -> String {
    "message".to_string()
}

/// One message of the target import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMessage {
    #[serde(rename = "type", default = "message_type")]
    pub message_type: String,

    pub ts: MessageTs,

    /// The ts of the thread's first message; equals `ts` when not threaded.
    pub thread_ts: MessageTs,

    #[serde(rename = "user")]
    pub author_id: String,

    pub user_profile: UserProfile,

    pub text: String,

    pub client_msg_id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_user_id: Option<String>,

    #[serde(flatten)]
    pub thread: Option<ThreadSummary>,
}

impl TargetMessage {
    /// `true` for messages that are neither a thread parent nor a reply.
    pub fn is_standalone(&self) -> bool {
        self.parent_user_id.is_none() && self.thread.is_none() && self.thread_ts == self.ts
    }

    pub fn is_reply(&self) -> bool {
        self.parent_user_id.is_some()
    }
}

/// Topic or purpose of a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTopic {
    pub value: String,
    pub creator: String,
    pub last_set: i64,
}

/// An entry of `channels.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub created: i64,
    pub creator: String,
    pub is_archived: bool,
    pub is_general: bool,
    pub members: Vec<String>,
    pub topic: ChannelTopic,
    pub purpose: ChannelTopic,
}
