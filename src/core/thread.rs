//! Thread reconstruction from a time-ordered message stream.
//!
//! Messages of one channel are stored in a single ordered arena; the thread
//! index maps a source thread id to the arena position of that thread's
//! parent, so reply bookkeeping is written straight into the parent already
//! present in the output.
//!
//! Per source thread id the state moves from unseen to open without replies
//! (the first message becomes the parent) to open with replies (the first
//! reply emits a backlink message and seeds the parent's bookkeeping with a
//! bot stub). An over-length message is split; its first chunk follows the
//! rules above and the remaining chunks are replies to the resulting parent,
//! forming an ad-hoc thread when the message had no source thread.
//!
//! Every emitted `ts` is strictly greater than the one before it, so
//! `thread_ts` of a reply always names a message that precedes it.

use std::collections::HashMap;

use tracing::debug;

use crate::core::context::MigrationContext;
use crate::core::normalizer::{Author, NormalizedMessage, derive_client_msg_id};
use crate::core::splitter::MessageSplitter;
use crate::core::warning::{MigrationWarning, WarningLog};
use crate::models::{MessageTs, Reaction, TargetMessage, ThreadSummary};

/// Per-channel thread bookkeeping. Create one per channel.
#[derive(Debug)]
pub struct ThreadReconstructor<'a> {
    ctx: &'a MigrationContext,
    channel: &'a str,
    messages: Vec<TargetMessage>,
    index: HashMap<String, usize>,
    last_ts: Option<MessageTs>,
    split_messages: usize,
}

/// Fields shared by every target message produced from one normalized message.
struct Draft<'m> {
    author: &'m Author,
    text: String,
    client_msg_id: String,
    reactions: Vec<Reaction>,
    ts: MessageTs,
}

impl<'a> ThreadReconstructor<'a> {
    pub fn new(ctx: &'a MigrationContext, channel: &'a str) -> Self {
        Self {
            ctx,
            channel,
            messages: Vec::new(),
            index: HashMap::new(),
            last_ts: None,
            split_messages: 0,
        }
    }

    /// Places one normalized message (splitting it when over-length).
    ///
    /// Messages must arrive in ascending send-time order.
    pub fn push(&mut self, msg: NormalizedMessage, warnings: &mut WarningLog) {
        let ctx = self.ctx;
        let splitter = MessageSplitter::from_config(ctx.config());
        let chunks = splitter.split(&msg.text);
        if chunks.len() > 1 {
            self.split_messages += 1;
            debug!(
                channel = self.channel,
                source_id = %msg.source_id,
                chunks = chunks.len(),
                "split over-length message"
            );
        }

        let mut drafts = chunks.into_iter().enumerate().map(|(i, text)| Draft {
            author: &msg.author,
            text,
            client_msg_id: if i == 0 {
                msg.client_msg_id.clone()
            } else {
                derive_client_msg_id(format!("{}:{i}", msg.client_msg_id).as_bytes())
            },
            reactions: if i == 0 { msg.reactions.clone() } else { Vec::new() },
            ts: msg.sent_ts.plus_micros(i as u64),
        });

        let thread_id = msg.thread_id.as_deref();
        let Some(first) = drafts.next() else {
            return;
        };

        let parent = match thread_id.and_then(|id| self.index.get(id).copied()) {
            Some(parent) => {
                self.append_reply(parent, first, thread_id, warnings);
                parent
            }
            None => {
                let parent = self.append_root(first);
                if let Some(id) = thread_id {
                    self.index.insert(id.to_string(), parent);
                }
                parent
            }
        };

        for draft in drafts {
            self.append_reply(parent, draft, thread_id, warnings);
        }
    }

    /// Messages emitted so far, in output order.
    pub fn messages(&self) -> &[TargetMessage] {
        &self.messages
    }

    /// Number of messages that carry reply bookkeeping.
    pub fn thread_count(&self) -> usize {
        self.messages.iter().filter(|m| m.thread.is_some()).count()
    }

    /// Number of messages that had to be split.
    pub fn split_count(&self) -> usize {
        self.split_messages
    }

    pub fn into_messages(self) -> Vec<TargetMessage> {
        self.messages
    }

    /// Appends a standalone message or a thread parent.
    fn append_root(&mut self, draft: Draft<'_>) -> usize {
        let ts = self.claim_ts(draft.ts);
        self.messages.push(TargetMessage {
            message_type: "message".to_string(),
            ts,
            thread_ts: ts,
            author_id: draft.author.id.clone(),
            user_profile: draft.author.profile.clone(),
            text: draft.text,
            client_msg_id: draft.client_msg_id,
            reactions: draft.reactions,
            parent_user_id: None,
            thread: None,
        });
        self.messages.len() - 1
    }

    /// Appends a reply to the parent at `parent`, emitting the backlink first
    /// when this is the parent's first reply.
    fn append_reply(
        &mut self,
        parent: usize,
        draft: Draft<'_>,
        thread_id: Option<&str>,
        warnings: &mut WarningLog,
    ) {
        let parent_ts = self.messages[parent].ts;
        let parent_user = self.messages[parent].author_id.clone();

        if self.messages[parent].thread.is_none() {
            match thread_id {
                Some(id) => {
                    let backlink = self.backlink(id, parent_ts, &parent_user);
                    self.messages.push(backlink);
                }
                None => warnings.push(MigrationWarning::MissingBacklinkContext {
                    channel: self.channel.to_string(),
                    parent_ts: parent_ts.to_string(),
                }),
            }
        }

        let ts = self.claim_ts(draft.ts);
        let ctx = self.ctx;
        let bot_id = &ctx.bot().id;
        self.messages[parent]
            .thread
            .get_or_insert_with(|| ThreadSummary::opened_by(bot_id, parent_ts))
            .record_reply(&draft.author.id, ts);

        self.messages.push(TargetMessage {
            message_type: "message".to_string(),
            ts,
            thread_ts: parent_ts,
            author_id: draft.author.id.clone(),
            user_profile: draft.author.profile.clone(),
            text: draft.text,
            client_msg_id: draft.client_msg_id,
            reactions: draft.reactions,
            parent_user_id: Some(parent_user),
            thread: None,
        });
    }

    /// The synthetic reply pointing back at the source thread, placed at the
    /// first free ts after the parent.
    fn backlink(&mut self, thread_id: &str, parent_ts: MessageTs, parent_user: &str) -> TargetMessage {
        let ctx = self.ctx;
        let config = ctx.config();
        let bot = ctx.bot();
        let url = config.thread_url(self.channel, thread_id);
        let text = format!(
            "This thread was migrated from {}. Original thread: {}",
            config.source_platform, url
        );
        let seed = format!("backlink:{}:{}", self.channel, thread_id);

        TargetMessage {
            message_type: "message".to_string(),
            ts: self.claim_ts(parent_ts.next()),
            thread_ts: parent_ts,
            author_id: bot.id.clone(),
            user_profile: bot.profile(),
            text,
            client_msg_id: derive_client_msg_id(seed.as_bytes()),
            reactions: Vec::new(),
            parent_user_id: Some(parent_user.to_string()),
            thread: None,
        }
    }

    /// Returns `wanted`, or the first ts after the last emitted one if
    /// `wanted` would not keep the output strictly increasing.
    fn claim_ts(&mut self, wanted: MessageTs) -> MessageTs {
        let ts = match self.last_ts {
            Some(last) if wanted <= last => last.next(),
            _ => wanted,
        };
        self.last_ts = Some(ts);
        ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MigrationConfig;
    use crate::models::{SourceUser, TargetUser, UserProfile};

    fn ctx(config: MigrationConfig) -> MigrationContext {
        MigrationContext::new(
            config.with_organization("acme"),
            vec![SourceUser::new("1", "a").with_email("a@x.com")],
            vec![TargetUser::new("U1", "a").with_email("a@x.com")],
        )
        .unwrap()
    }

    fn msg(id: &str, author: &str, sent_ms: i64, thread: Option<&str>, text: &str) -> NormalizedMessage {
        NormalizedMessage {
            source_id: id.to_string(),
            thread_id: thread.map(str::to_string),
            sent_ts: MessageTs::from_millis(sent_ms),
            author: Author {
                id: author.to_string(),
                profile: UserProfile::new(author, author),
                resolved: true,
            },
            text: text.to_string(),
            client_msg_id: derive_client_msg_id(id.as_bytes()),
            reactions: Vec::new(),
        }
    }

    #[test]
    fn test_standalone_message() {
        let ctx = ctx(MigrationConfig::new());
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U1", 1000, None, "hi"), &mut warnings);

        let out = threads.messages();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].ts.to_string(), "1.000000");
        assert_eq!(out[0].thread_ts, out[0].ts);
        assert!(out[0].is_standalone());
    }

    #[test]
    fn test_first_message_of_thread_becomes_parent() {
        let ctx = ctx(MigrationConfig::new());
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U2", 2000, Some("T"), "root"), &mut warnings);

        let out = threads.messages();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].thread_ts, out[0].ts);
        assert!(out[0].thread.is_none());
        assert!(out[0].parent_user_id.is_none());
    }

    #[test]
    fn test_first_reply_emits_backlink_and_seeds_bookkeeping() {
        let ctx = ctx(MigrationConfig::new());
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U2", 2000, Some("T"), "root"), &mut warnings);
        threads.push(msg("2", "U1", 3000, Some("T"), "reply"), &mut warnings);

        let out = threads.messages();
        assert_eq!(out.len(), 3);

        let backlink = &out[1];
        assert_eq!(backlink.author_id, "USLACKBOT");
        assert_eq!(backlink.thread_ts, out[0].ts);
        assert!(backlink.text.contains("https://www.flowdock.com/app/acme/main/threads/T"));

        let reply = &out[2];
        assert_eq!(reply.thread_ts, out[0].ts);
        assert_eq!(reply.parent_user_id.as_deref(), Some("U2"));
        assert!(backlink.ts < reply.ts);

        let summary = out[0].thread.as_ref().unwrap();
        assert_eq!(summary.reply_count, 2);
        assert_eq!(summary.replies[0].user, "USLACKBOT");
        assert_eq!(summary.replies[0].ts, out[0].ts);
        assert_eq!(summary.replies[1].ts, reply.ts);
        assert_eq!(summary.reply_users, vec!["USLACKBOT", "U1"]);
        assert_eq!(summary.reply_users_count, 2);
        assert_eq!(summary.latest_reply, reply.ts);
        assert_eq!(summary.last_read, reply.ts);
        assert!(!summary.subscribed);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_second_reply_has_no_backlink() {
        let ctx = ctx(MigrationConfig::new());
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U2", 2000, Some("T"), "root"), &mut warnings);
        threads.push(msg("2", "U1", 3000, Some("T"), "r1"), &mut warnings);
        threads.push(msg("3", "U1", 4000, Some("T"), "r2"), &mut warnings);

        let out = threads.messages();
        assert_eq!(out.len(), 4);
        let summary = out[0].thread.as_ref().unwrap();
        assert_eq!(summary.reply_count, 3);
        assert_eq!(summary.reply_users_count, 2);
        assert_eq!(threads.thread_count(), 1);
    }

    #[test]
    fn test_interleaved_threads_keep_separate_parents() {
        let ctx = ctx(MigrationConfig::new());
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U1", 1000, Some("A"), "a"), &mut warnings);
        threads.push(msg("2", "U1", 2000, Some("B"), "b"), &mut warnings);
        threads.push(msg("3", "U2", 3000, Some("A"), "a-reply"), &mut warnings);
        threads.push(msg("4", "U2", 4000, Some("B"), "b-reply"), &mut warnings);

        let out = threads.messages();
        let a_ts = out[0].ts;
        let b_ts = out[1].ts;
        let a_reply = out.iter().find(|m| m.text == "a-reply").unwrap();
        let b_reply = out.iter().find(|m| m.text == "b-reply").unwrap();
        assert_eq!(a_reply.thread_ts, a_ts);
        assert_eq!(b_reply.thread_ts, b_ts);
        assert_eq!(threads.thread_count(), 2);
    }

    #[test]
    fn test_duplicate_send_times_get_unique_ts() {
        let ctx = ctx(MigrationConfig::new());
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U1", 1000, None, "a"), &mut warnings);
        threads.push(msg("2", "U1", 1000, None, "b"), &mut warnings);

        let out = threads.messages();
        assert_eq!(out[0].ts.to_string(), "1.000000");
        assert_eq!(out[1].ts.to_string(), "1.000001");
    }

    #[test]
    fn test_oversized_standalone_becomes_adhoc_thread() {
        let ctx = ctx(MigrationConfig::new()
            .with_max_message_chars(12)
            .with_continuation_marker("+ "));
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U1", 1000, None, "alpha beta gamma delta"), &mut warnings);

        let out = threads.messages();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].text, "alpha beta ");
        assert_eq!(out[1].text, "+ gamma ");
        assert_eq!(out[1].ts.to_string(), "1.000001");
        assert_eq!(out[2].ts.to_string(), "1.000002");
        assert!(out[1..].iter().all(|m| m.thread_ts == out[0].ts));

        let summary = out[0].thread.as_ref().unwrap();
        assert_eq!(summary.reply_count, 3);
        assert_eq!(threads.split_count(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings.entries()[0],
            MigrationWarning::MissingBacklinkContext { .. }
        ));
    }

    #[test]
    fn test_oversized_first_message_of_thread() {
        let ctx = ctx(MigrationConfig::new()
            .with_max_message_chars(12)
            .with_continuation_marker("+ "));
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U1", 1000, Some("T"), "alpha beta gamma"), &mut warnings);
        threads.push(msg("2", "U2", 5000, Some("T"), "short"), &mut warnings);

        let out = threads.messages();
        // parent, backlink, chunk 2, reply
        assert_eq!(out.len(), 4);
        assert_eq!(out[1].author_id, "USLACKBOT");
        assert_eq!(out[2].text, "+ gamma");
        assert!(out[1..].iter().all(|m| m.thread_ts == out[0].ts));
        assert_eq!(out[0].thread.as_ref().unwrap().reply_count, 3);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_oversized_reply_chunks_all_reply_to_parent() {
        let ctx = ctx(MigrationConfig::new()
            .with_max_message_chars(12)
            .with_continuation_marker("+ "));
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        let mut warnings = WarningLog::new();
        threads.push(msg("1", "U1", 1000, Some("T"), "root"), &mut warnings);
        threads.push(msg("2", "U2", 2000, Some("T"), "alpha beta gamma"), &mut warnings);

        let out = threads.messages();
        // parent, backlink, two chunks
        assert_eq!(out.len(), 4);
        assert_eq!(out[2].text, "alpha beta ");
        assert_eq!(out[3].text, "+ gamma");
        assert!(out[2].ts < out[3].ts);
        let summary = out[0].thread.as_ref().unwrap();
        assert_eq!(summary.reply_count, 3);
        assert_eq!(summary.reply_users, vec!["USLACKBOT", "U2"]);
    }

    #[test]
    fn test_chunk_ids_are_distinct() {
        let ctx = ctx(MigrationConfig::new()
            .with_max_message_chars(12)
            .with_continuation_marker("+ "));
        let mut threads = ThreadReconstructor::new(&ctx, "main");
        threads.push(msg("1", "U1", 1000, None, "alpha beta gamma delta"), &mut WarningLog::new());

        let ids: std::collections::HashSet<_> =
            threads.messages().iter().map(|m| m.client_msg_id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }
}
