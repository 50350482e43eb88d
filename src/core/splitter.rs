//! Splitting of over-length messages into chunks.
//!
//! Chunks break only after a run of whitespace, so a word never straddles two
//! chunks. The whitespace stays at the end of the earlier chunk, which makes
//! the split lossless: removing the continuation markers and concatenating
//! the chunks gives back the original text byte for byte. A single word
//! longer than a chunk's budget is the one exception and is cut at a
//! character boundary.

use crate::config::MigrationConfig;

/// Splits text at whitespace into chunks of at most `max_chars` characters.
///
/// ```
/// use chatmigrate::core::splitter::MessageSplitter;
///
/// let splitter = MessageSplitter::new(12, "+ ");
/// let chunks = splitter.split("alpha beta gamma delta");
/// assert_eq!(chunks, ["alpha beta ", "+ gamma ", "+ delta"]);
/// ```
#[derive(Debug, Clone)]
pub struct MessageSplitter<'a> {
    max_chars: usize,
    marker: &'a str,
    marker_chars: usize,
}

impl<'a> MessageSplitter<'a> {
    /// Creates a splitter. `marker` must be shorter than `max_chars`
    /// (see [`MigrationConfig::validate`]).
    pub fn new(max_chars: usize, marker: &'a str) -> Self {
        Self {
            max_chars,
            marker,
            marker_chars: marker.chars().count(),
        }
    }

    pub fn from_config(config: &'a MigrationConfig) -> Self {
        Self::new(config.max_message_chars, &config.continuation_marker)
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn marker(&self) -> &str {
        self.marker
    }

    pub fn needs_split(&self, text: &str) -> bool {
        text.chars().count() > self.max_chars
    }

    /// Splits `text`; text within the limit comes back as a single chunk.
    ///
    /// The first chunk is a verbatim prefix of `text`; every later chunk
    /// starts with the continuation marker.
    pub fn split(&self, text: &str) -> Vec<String> {
        if !self.needs_split(text) {
            return vec![text.to_string()];
        }

        let mut bodies: Vec<&str> = Vec::new();
        let mut start = 0;
        let mut len = 0;

        for (offset, end) in segments(text) {
            let seg_len = text[offset..end].chars().count();

            if len + seg_len <= self.budget(bodies.len()) {
                len += seg_len;
                continue;
            }
            if len > 0 {
                bodies.push(&text[start..offset]);
            }
            start = offset;
            len = seg_len;

            // A word longer than a whole chunk is cut at character boundaries.
            while len > self.budget(bodies.len()) {
                let cut = nth_char_offset(&text[start..], self.budget(bodies.len()));
                bodies.push(&text[start..start + cut]);
                start += cut;
                len = text[start..end].chars().count();
            }
        }
        if start < text.len() {
            bodies.push(&text[start..]);
        }

        bodies
            .into_iter()
            .enumerate()
            .map(|(i, body)| {
                if i == 0 {
                    body.to_string()
                } else {
                    format!("{}{}", self.marker, body)
                }
            })
            .collect()
    }

    /// Removes the continuation marker from a chunk produced by [`split`](Self::split).
    pub fn strip_marker<'t>(&self, chunk: &'t str) -> &'t str {
        chunk.strip_prefix(self.marker).unwrap_or(chunk)
    }

    fn budget(&self, chunk_index: usize) -> usize {
        if chunk_index == 0 {
            self.max_chars
        } else {
            self.max_chars.saturating_sub(self.marker_chars).max(1)
        }
    }
}

/// Byte ranges of the words of `text`, each carrying the whitespace that
/// follows it. Leading whitespace forms a segment of its own.
fn segments(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_ws = false;

    for (i, c) in text.char_indices() {
        let ws = c.is_whitespace();
        if prev_ws && !ws && i > start {
            out.push((start, i));
            start = i;
        }
        prev_ws = ws;
    }
    if start < text.len() {
        out.push((start, text.len()));
    }
    out
}

fn nth_char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(splitter: &MessageSplitter<'_>, chunks: &[String]) -> String {
        chunks
            .iter()
            .enumerate()
            .map(|(i, c)| if i == 0 { c.as_str() } else { splitter.strip_marker(c) })
            .collect()
    }

    #[test]
    fn test_short_text_is_untouched() {
        let splitter = MessageSplitter::new(10, "> ");
        assert_eq!(splitter.split("short"), ["short"]);
        assert_eq!(splitter.split("exactly10!"), ["exactly10!"]);
        assert_eq!(splitter.split(""), [""]);
    }

    #[test]
    fn test_splits_at_whitespace() {
        let splitter = MessageSplitter::new(10, "> ");
        let text = "one two three four five";
        let chunks = splitter.split(text);

        assert_eq!(chunks[0], "one two ");
        assert!(chunks[1..].iter().all(|c| c.starts_with("> ")));
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(rejoin(&splitter, &chunks), text);
    }

    #[test]
    fn test_never_breaks_words_that_fit() {
        let splitter = MessageSplitter::new(8, "+");
        let text = "aaaa bbbbbbb cc";
        let chunks = splitter.split(text);
        for chunk in &chunks {
            let body = splitter.strip_marker(chunk);
            for word in body.split_whitespace() {
                assert!(text.split_whitespace().any(|w| w == word));
            }
        }
        assert_eq!(rejoin(&splitter, &chunks), text);
    }

    #[test]
    fn test_overlong_word_is_cut() {
        let splitter = MessageSplitter::new(5, "+");
        let text = "abcdefghijklm xy";
        let chunks = splitter.split(text);

        assert_eq!(chunks[0], "abcde");
        assert!(chunks.iter().all(|c| c.chars().count() <= 5));
        assert_eq!(rejoin(&splitter, &chunks), text);
    }

    #[test]
    fn test_multibyte_text() {
        let splitter = MessageSplitter::new(6, "…");
        let text = "привет мир ёжик 🎉🎉🎉🎉🎉🎉🎉";
        let chunks = splitter.split(text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 6));
        assert_eq!(rejoin(&splitter, &chunks), text);
    }

    #[test]
    fn test_leading_and_newline_whitespace_preserved() {
        let splitter = MessageSplitter::new(7, "> ");
        let text = "  first\n\nsecond line\tend";
        let chunks = splitter.split(text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 7));
        assert_eq!(rejoin(&splitter, &chunks), text);
    }

    #[test]
    fn test_from_config() {
        let config = MigrationConfig::new().with_max_message_chars(50);
        let splitter = MessageSplitter::from_config(&config);
        assert_eq!(splitter.max_chars(), 50);
        assert_eq!(splitter.marker(), "(continued) ");
    }
}
