//! Input buffer with cursor tracking.
//!
//! The buffer stores the text being composed and a cursor inside it. The
//! cursor is a byte offset that always sits on a grapheme cluster boundary;
//! every movement and deletion steps over one whole user-perceived character.

use crate::word::{next_boundary, prev_boundary, snap_to_boundary};

/// Composed text plus cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize, // Byte offset on a grapheme boundary
}

impl InputBuffer {
    /// Create a new empty input buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer with the cursor at `cursor` (snapped to a boundary).
    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        let text = text.into();
        let cursor = snap_to_boundary(&text, cursor);
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position (byte offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position counted in UTF-16 code units.
    pub fn cursor_utf16(&self) -> usize {
        self.text[..self.cursor].encode_utf16().count()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor_at_end(&self) -> bool {
        self.cursor == self.text.len()
    }

    /// Clear the buffer and reset cursor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Insert a string at the cursor and move the cursor past it.
    ///
    /// Inserted text can fuse with a following combining mark; the cursor
    /// then lands after the fused grapheme.
    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        let target = self.cursor + s.len();
        let snapped = snap_to_boundary(&self.text, target);
        self.cursor = if snapped == target {
            target
        } else {
            next_boundary(&self.text, snapped).unwrap_or(self.text.len())
        };
    }

    /// Delete the character before the cursor (backspace).
    /// Returns true if a character was deleted.
    pub fn delete_before(&mut self) -> bool {
        let Some(prev) = prev_boundary(&self.text, self.cursor) else {
            return false;
        };
        self.text.replace_range(prev..self.cursor, "");
        self.cursor = prev;
        true
    }

    /// Delete the character at the cursor (forward delete).
    /// Returns true if a character was deleted.
    pub fn delete_after(&mut self) -> bool {
        let Some(next) = next_boundary(&self.text, self.cursor) else {
            return false;
        };
        self.text.replace_range(self.cursor..next, "");
        true
    }

    /// Move cursor left by one character.
    /// Returns true if cursor moved.
    pub fn move_left(&mut self) -> bool {
        match prev_boundary(&self.text, self.cursor) {
            Some(prev) => {
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    /// Move cursor right by one character.
    /// Returns true if cursor moved.
    pub fn move_right(&mut self) -> bool {
        match next_boundary(&self.text, self.cursor) {
            Some(next) => {
                self.cursor = next;
                true
            }
            None => false,
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Set the cursor position. Fails unless `pos` is a grapheme boundary.
    pub fn set_cursor(&mut self, pos: usize) -> bool {
        if pos <= self.text.len() && snap_to_boundary(&self.text, pos) == pos {
            self.cursor = pos;
            true
        } else {
            false
        }
    }

    /// Replace the whole text, placing the cursor at `cursor`.
    pub(crate) fn replace(&mut self, text: String, cursor: usize) {
        self.cursor = snap_to_boundary(&text, cursor);
        self.text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut buf = InputBuffer::new();
        buf.insert_str("helo");
        assert_eq!(buf.text(), "helo");
        assert_eq!(buf.cursor(), 4);
        assert!(buf.cursor_at_end());

        buf.move_left();
        buf.insert_str("l");
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn test_delete_before_at_start() {
        let mut buf = InputBuffer::with_cursor("abc", 0);
        assert!(!buf.delete_before());
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn test_delete_after_at_end() {
        let mut buf = InputBuffer::with_cursor("abc", 3);
        assert!(!buf.delete_after());
        assert!(buf.delete_before());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_delete_after_keeps_cursor() {
        let mut buf = InputBuffer::with_cursor("abc", 1);
        assert!(buf.delete_after());
        assert_eq!(buf.text(), "ac");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn test_moves_over_whole_graphemes() {
        // family emoji is a single grapheme made of several code points
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        let text = format!("a{}b", family);
        let mut buf = InputBuffer::with_cursor(text.clone(), text.len());

        assert!(buf.move_left());
        assert_eq!(buf.cursor(), 1 + family.len());
        assert!(buf.move_left());
        assert_eq!(buf.cursor(), 1);
        assert!(buf.move_right());
        assert_eq!(buf.cursor(), 1 + family.len());

        assert!(buf.delete_before());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn test_combining_mark_joins_previous_character() {
        let mut buf = InputBuffer::new();
        buf.insert_str("e");
        buf.insert_str("\u{301}");
        assert_eq!(buf.cursor(), buf.len());
        assert!(buf.delete_before());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_cursor_utf16() {
        let buf = InputBuffer::with_cursor("a\u{1F600}b", 5);
        assert_eq!(buf.cursor(), 5);
        assert_eq!(buf.cursor_utf16(), 3);
    }

    #[test]
    fn test_set_cursor_rejects_mid_character() {
        let mut buf = InputBuffer::with_cursor("日本", 0);
        assert!(!buf.set_cursor(1));
        assert!(buf.set_cursor(3));
        assert!(!buf.set_cursor(7));
    }
}
