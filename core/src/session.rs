//! Composition state.
//!
//! `CompositionState` combines the input buffer, the suggestion list, the
//! selection cursor and the navigation flag. Every mutator leaves the state
//! consistent: cursor inside the buffer on a character boundary, selection
//! inside the suggestion list.

use crate::input_buffer::InputBuffer;
use crate::suggestion::SuggestionList;
use crate::word::WordBoundary;

/// Phase of the composition, derived from the state rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing composed
    Idle,
    /// Text composed, no suggestions shown
    Composing,
    /// Suggestions shown, selection untouched
    Suggesting,
    /// Selection moved with the arrow keys
    Navigating,
}

/// Buffer, cursor and suggestion state for one composition.
#[derive(Debug, Clone)]
pub struct CompositionState {
    buffer: InputBuffer,
    suggestions: SuggestionList,
    navigating: bool,
    boundary: WordBoundary,
}

impl CompositionState {
    /// Create an empty state with whitespace separators and the default cap.
    pub fn new() -> Self {
        Self::with_options(WordBoundary::whitespace(), SuggestionList::DEFAULT_MAX)
    }

    pub fn with_options(boundary: WordBoundary, max_suggestions: usize) -> Self {
        Self {
            buffer: InputBuffer::new(),
            suggestions: SuggestionList::with_max_len(max_suggestions),
            navigating: false,
            boundary,
        }
    }

    /// Start from existing text with the cursor at `cursor`.
    pub fn with_text(text: &str, cursor: usize) -> Self {
        let mut state = Self::new();
        state.buffer = InputBuffer::with_cursor(text, cursor);
        state
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn cursor_utf16(&self) -> usize {
        self.buffer.cursor_utf16()
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn boundary(&self) -> &WordBoundary {
        &self.boundary
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn cursor_at_end(&self) -> bool {
        self.buffer.cursor_at_end()
    }

    /// Word under the cursor; empty when there is none.
    pub fn current_word(&self) -> &str {
        self.boundary
            .current_word(self.buffer.text(), self.buffer.cursor())
    }

    pub fn has_current_word(&self) -> bool {
        !self.current_word().is_empty()
    }

    pub fn phase(&self) -> Phase {
        if self.buffer.is_empty() {
            Phase::Idle
        } else if self.suggestions.is_empty() {
            Phase::Composing
        } else if self.navigating {
            Phase::Navigating
        } else {
            Phase::Suggesting
        }
    }

    /// Insert text at the cursor. No-op on empty text.
    pub fn insert_at_cursor(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.buffer.insert_str(text);
        self.navigating = false;
        self.check_invariants();
    }

    /// Backspace. Returns false at the start of the buffer.
    pub fn delete_before_cursor(&mut self) -> bool {
        let deleted = self.buffer.delete_before();
        if deleted {
            self.navigating = false;
        }
        self.check_invariants();
        deleted
    }

    /// Forward delete. Returns false at the end of the buffer.
    pub fn delete_after_cursor(&mut self) -> bool {
        let deleted = self.buffer.delete_after();
        if deleted {
            self.navigating = false;
        }
        self.check_invariants();
        deleted
    }

    pub fn move_cursor_left(&mut self) -> bool {
        let moved = self.buffer.move_left();
        if moved {
            self.navigating = false;
        }
        moved
    }

    pub fn move_cursor_right(&mut self) -> bool {
        let moved = self.buffer.move_right();
        if moved {
            self.navigating = false;
        }
        moved
    }

    /// Replace the word under the cursor with `text`.
    ///
    /// When the word ran to the end of the buffer a single space follows the
    /// replacement so typing continues with a new word. A word in the middle
    /// of the buffer is replaced without adding a separator. Suggestions and
    /// navigation are cleared.
    pub fn replace_current_word(&mut self, text: &str) {
        let span = self
            .boundary
            .word_span(self.buffer.text(), self.buffer.cursor());
        let at_end = span.end == self.buffer.len();

        let (mut replaced, mut cursor) =
            self.boundary
                .replace_word(self.buffer.text(), self.buffer.cursor(), text);
        if at_end {
            replaced.push(' ');
            cursor += 1;
        }
        self.buffer.replace(replaced, cursor);

        self.suggestions.clear();
        self.navigating = false;
        self.check_invariants();
    }

    /// Replace the suggestion list as a whole. Resets selection and navigation.
    pub fn set_suggestions(&mut self, items: Vec<String>) {
        self.suggestions.set(items);
        self.navigating = false;
        self.check_invariants();
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.navigating = false;
    }

    /// Move the selection up and enter navigation. No-op without suggestions.
    pub fn select_previous(&mut self) -> bool {
        if self.suggestions.is_empty() {
            return false;
        }
        self.navigating = true;
        self.suggestions.select_previous()
    }

    /// Move the selection down and enter navigation. No-op without suggestions.
    pub fn select_next(&mut self) -> bool {
        if self.suggestions.is_empty() {
            return false;
        }
        self.navigating = true;
        self.suggestions.select_next()
    }

    /// Clear everything. Calling it twice is the same as calling it once.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.suggestions.clear();
        self.navigating = false;
    }

    fn check_invariants(&self) {
        debug_assert!(self.buffer.cursor() <= self.buffer.len());
        debug_assert!(self.buffer.text().is_char_boundary(self.buffer.cursor()));
        debug_assert!(self.suggestions.selection_in_range());
    }
}

impl Default for CompositionState {
    fn default() -> Self {
        Self::new()
    }
}
