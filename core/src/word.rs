//! Word boundaries around a cursor.
//!
//! A word is a maximal run of non-separator characters. "Character" means an
//! extended grapheme cluster, so scans never stop inside a multi-unit
//! character. Offsets are byte offsets into the buffer.
//!
//! The same separator test drives both scan directions, which keeps
//! `word_span` symmetric: the span found from any cursor inside a word is the
//! same span.

use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Separator set used to split the buffer into words.
///
/// Unicode whitespace is always a separator; `extra` adds more characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBoundary {
    extra: Vec<char>,
}

impl WordBoundary {
    /// Whitespace-only separators.
    pub fn whitespace() -> Self {
        Self::default()
    }

    /// Whitespace plus every character of `extra`.
    pub fn with_extra(extra: &str) -> Self {
        let mut chars: Vec<char> = extra.chars().filter(|c| !c.is_whitespace()).collect();
        chars.sort_unstable();
        chars.dedup();
        Self { extra: chars }
    }

    pub fn is_separator_char(&self, ch: char) -> bool {
        ch.is_whitespace() || self.extra.binary_search(&ch).is_ok()
    }

    /// A grapheme is a separator when every char in it is one ("\r\n" is).
    pub fn is_separator(&self, grapheme: &str) -> bool {
        !grapheme.is_empty() && grapheme.chars().all(|c| self.is_separator_char(c))
    }

    /// Half-open byte range of the word containing or adjacent to `cursor`.
    ///
    /// Returns `cursor..cursor` for an empty buffer or a cursor sitting
    /// between two separators. `cursor` is clamped to the buffer and snapped
    /// back to the nearest grapheme boundary.
    pub fn word_span(&self, buffer: &str, cursor: usize) -> Range<usize> {
        let cursor = snap_to_boundary(buffer, cursor);

        let mut start = cursor;
        for (idx, grapheme) in buffer[..cursor].grapheme_indices(true).rev() {
            if self.is_separator(grapheme) {
                break;
            }
            start = idx;
        }

        let mut end = cursor;
        for (idx, grapheme) in buffer[cursor..].grapheme_indices(true) {
            if self.is_separator(grapheme) {
                break;
            }
            end = cursor + idx + grapheme.len();
        }

        start..end
    }

    /// Text of the word under `cursor`; empty when there is none.
    pub fn current_word<'a>(&self, buffer: &'a str, cursor: usize) -> &'a str {
        let span = self.word_span(buffer, cursor);
        &buffer[span]
    }

    /// Replace the word under `cursor` with `new_text`.
    ///
    /// Returns the new buffer and a cursor placed right after the inserted
    /// text. Everything outside the old span is kept byte for byte.
    pub fn replace_word(&self, buffer: &str, cursor: usize, new_text: &str) -> (String, usize) {
        let span = self.word_span(buffer, cursor);
        let mut out = String::with_capacity(buffer.len() - span.len() + new_text.len());
        out.push_str(&buffer[..span.start]);
        out.push_str(new_text);
        let new_cursor = out.len();
        out.push_str(&buffer[span.end..]);
        (out, new_cursor)
    }
}

/// Clamp `pos` into the buffer and move it back onto a grapheme boundary.
pub(crate) fn snap_to_boundary(buffer: &str, pos: usize) -> usize {
    if pos >= buffer.len() {
        return buffer.len();
    }
    let mut snapped = 0;
    for (idx, _) in buffer.grapheme_indices(true) {
        if idx > pos {
            break;
        }
        snapped = idx;
    }
    snapped
}

/// Byte offset of the grapheme boundary before `pos`, if any.
pub(crate) fn prev_boundary(buffer: &str, pos: usize) -> Option<usize> {
    buffer[..pos].grapheme_indices(true).next_back().map(|(idx, _)| idx)
}

/// Byte offset of the grapheme boundary after `pos`, if any.
pub(crate) fn next_boundary(buffer: &str, pos: usize) -> Option<usize> {
    buffer[pos..]
        .graphemes(true)
        .next()
        .map(|grapheme| pos + grapheme.len())
}

/// Span of the word under `cursor` using whitespace separators.
pub fn word_span(buffer: &str, cursor: usize) -> Range<usize> {
    WordBoundary::whitespace().word_span(buffer, cursor)
}

/// Word under `cursor` using whitespace separators.
pub fn current_word(buffer: &str, cursor: usize) -> &str {
    WordBoundary::whitespace().current_word(buffer, cursor)
}

/// Replace the word under `cursor` using whitespace separators.
pub fn replace_word(buffer: &str, cursor: usize, new_text: &str) -> (String, usize) {
    WordBoundary::whitespace().replace_word(buffer, cursor, new_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        assert_eq!(word_span("", 0), 0..0);
        assert_eq!(current_word("", 0), "");
    }

    #[test]
    fn test_cursor_at_end_of_word() {
        assert_eq!(word_span("helo", 4), 0..4);
        assert_eq!(current_word("helo", 4), "helo");
    }

    #[test]
    fn test_cursor_inside_word() {
        let buffer = "I siad hello";
        assert_eq!(word_span(buffer, 4), 2..6);
        assert_eq!(current_word(buffer, 4), "siad");
        assert_eq!(current_word(buffer, 2), "siad");
        assert_eq!(current_word(buffer, 6), "siad");
    }

    #[test]
    fn test_cursor_between_separators() {
        assert_eq!(word_span("a  b", 2), 2..2);
        assert_eq!(current_word("hello ", 6), "");
    }

    #[test]
    fn test_extra_separators() {
        let boundary = WordBoundary::with_extra("-/");
        assert_eq!(boundary.current_word("well-known", 2), "well");
        assert_eq!(boundary.current_word("well-known", 7), "known");
        assert_eq!(current_word("well-known", 2), "well-known");
    }

    #[test]
    fn test_multibyte_graphemes() {
        // "é" as e + combining acute is one grapheme of three bytes
        let buffer = "cafe\u{301} ok";
        assert_eq!(current_word(buffer, 6), "cafe\u{301}");
        // cursor inside the combining sequence snaps back
        assert_eq!(word_span(buffer, 5), 0..6);
        assert_eq!(current_word("日本語 text", 3), "日本語");
    }

    #[test]
    fn test_crlf_is_one_separator() {
        assert_eq!(current_word("ab\r\ncd", 6), "cd");
        assert_eq!(current_word("ab\r\ncd", 2), "ab");
    }

    #[test]
    fn test_replace_word_mid_buffer() {
        let (out, cursor) = replace_word("I siad hello", 4, "said");
        assert_eq!(out, "I said hello");
        assert_eq!(cursor, 6);
    }

    #[test]
    fn test_replace_word_with_longer_text() {
        let (out, cursor) = replace_word("go thru it", 4, "through");
        assert_eq!(out, "go through it");
        assert_eq!(cursor, 10);
    }

    #[test]
    fn test_replace_empty_span_inserts() {
        let (out, cursor) = replace_word("a  b", 2, "x");
        assert_eq!(out, "a x b");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_out_of_range_cursor_is_clamped() {
        assert_eq!(word_span("abc", 99), 0..3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn span_brackets_cursor(s in "[a-z \u{e9}\u{65e5}]{0,40}", raw in 0usize..200) {
            let cursor = snap_to_boundary(&s, raw);
            let span = word_span(&s, cursor);
            prop_assert!(span.start <= cursor);
            prop_assert!(cursor <= span.end);
            prop_assert!(span.end <= s.len());
            prop_assert!(!s[span.clone()].chars().any(char::is_whitespace));
        }

        #[test]
        fn span_is_same_from_every_inner_cursor(s in "[a-z ]{1,30}", raw in 0usize..30) {
            let cursor = raw.min(s.len());
            let span = word_span(&s, cursor);
            for inner in span.start..=span.end {
                if span.is_empty() {
                    break;
                }
                prop_assert_eq!(word_span(&s, inner), span.clone());
            }
        }

        #[test]
        fn replace_keeps_outside_text(s in "[a-z ]{0,30}", raw in 0usize..30, new in "[a-z]{1,8}") {
            let cursor = raw.min(s.len());
            let span = word_span(&s, cursor);
            let (out, new_cursor) = replace_word(&s, cursor, &new);
            prop_assert_eq!(&out[..span.start], &s[..span.start]);
            prop_assert_eq!(&out[new_cursor..], &s[span.end..]);
            prop_assert_eq!(current_word(&out, new_cursor), new.as_str());
        }
    }
}
