//! Inline mention rewriting.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@+(\w+)").expect("mention pattern is valid"));

/// Rewrites every `@handle` (one or more `@` followed by word characters)
/// into the target mention syntax `<@handle>`, lower-casing the handle.
///
/// Text without such tokens is returned unchanged and unallocated.
///
/// ```
/// use chatmigrate::core::mention::rewrite_mentions;
///
/// assert_eq!(rewrite_mentions("@Bob thanks"), "<@bob> thanks");
/// assert_eq!(rewrite_mentions("ping @@Team"), "ping <@team>");
/// assert_eq!(rewrite_mentions("no mentions"), "no mentions");
/// ```
pub fn rewrite_mentions(text: &str) -> Cow<'_, str> {
    MENTION_RE.replace_all(text, |caps: &Captures<'_>| {
        format!("<@{}>", caps[1].to_lowercase())
    })
}
