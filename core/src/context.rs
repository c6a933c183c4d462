//! Host-facing capabilities and a recording host context.
//!
//! The controller never reaches for global UI state. It is handed a
//! [`TextSink`] (where marked and committed text goes) and a
//! [`CandidatePresenter`] (the suggestion window). [`HostContext`] implements
//! both as plain data that a platform adapter reads back after each key, in
//! the same spirit as a preedit/commit/candidates context struct.

/// Target for composed and committed text.
pub trait TextSink {
    /// Show `text` as in-progress (marked) text with the caret at `cursor`
    /// (byte offset into `text`).
    fn set_composing_text(&mut self, text: &str, cursor: usize);

    /// Finalize `text` into the document and drop any marking.
    fn commit_text(&mut self, text: &str);

    /// Remove marked text without committing anything.
    fn clear_composing_text(&mut self);
}

/// The on-screen suggestion window.
pub trait CandidatePresenter {
    fn show(&mut self, candidates: &[String]);
    fn update(&mut self, candidates: &[String]);
    fn hide(&mut self);
    fn move_selection_up(&mut self);
    fn move_selection_down(&mut self);
}

/// Presenter used when no suggestion window is available. Every call is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl CandidatePresenter for NullPresenter {
    fn show(&mut self, candidates: &[String]) {
        tracing::trace!(count = candidates.len(), "no presenter: show ignored");
    }

    fn update(&mut self, candidates: &[String]) {
        tracing::trace!(count = candidates.len(), "no presenter: update ignored");
    }

    fn hide(&mut self) {}

    fn move_selection_up(&mut self) {}

    fn move_selection_down(&mut self) {}
}

/// Recording host context.
///
/// # Fields
///
/// - `preedit_text`: marked text currently shown (underlined)
/// - `preedit_cursor`: caret inside the marked text (byte offset)
/// - `commit_text`: text committed since the platform last drained it
/// - `candidates`: suggestions currently in the window
/// - `candidate_cursor`: highlighted row in the window
/// - `candidates_visible`: whether the window is shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostContext {
    /// Marked (in-progress) text
    pub preedit_text: String,

    /// Caret position within the marked text (byte offset)
    pub preedit_cursor: usize,

    /// Text committed to the application
    pub commit_text: String,

    /// Suggestions shown in the window
    pub candidates: Vec<String>,

    /// Highlighted suggestion (0-based)
    pub candidate_cursor: usize,

    /// Whether the suggestion window is visible
    pub candidates_visible: bool,

    /// Number of `show` calls received
    pub show_count: usize,

    /// Number of `hide` calls received
    pub hide_count: usize,
}

impl HostContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the committed text, leaving it empty.
    pub fn take_commit(&mut self) -> String {
        std::mem::take(&mut self.commit_text)
    }

    pub fn has_commit(&self) -> bool {
        !self.commit_text.is_empty()
    }

    /// Whether there is any marked text or a visible suggestion window.
    pub fn has_visible_state(&self) -> bool {
        !self.preedit_text.is_empty() || self.candidates_visible
    }
}

impl TextSink for HostContext {
    fn set_composing_text(&mut self, text: &str, cursor: usize) {
        self.preedit_text.clear();
        self.preedit_text.push_str(text);
        self.preedit_cursor = cursor;
    }

    fn commit_text(&mut self, text: &str) {
        self.commit_text.push_str(text);
        self.preedit_text.clear();
        self.preedit_cursor = 0;
    }

    fn clear_composing_text(&mut self) {
        self.preedit_text.clear();
        self.preedit_cursor = 0;
    }
}

impl CandidatePresenter for HostContext {
    fn show(&mut self, candidates: &[String]) {
        self.candidates = candidates.to_vec();
        self.candidate_cursor = 0;
        self.candidates_visible = true;
        self.show_count += 1;
    }

    fn update(&mut self, candidates: &[String]) {
        self.candidates = candidates.to_vec();
        self.candidate_cursor = 0;
    }

    fn hide(&mut self) {
        self.candidates.clear();
        self.candidate_cursor = 0;
        self.candidates_visible = false;
        self.hide_count += 1;
    }

    fn move_selection_up(&mut self) {
        self.candidate_cursor = self.candidate_cursor.saturating_sub(1);
    }

    fn move_selection_down(&mut self) {
        if self.candidate_cursor + 1 < self.candidates.len() {
            self.candidate_cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_clears_marked_text() {
        let mut ctx = HostContext::new();
        ctx.set_composing_text("helo", 4);
        assert!(ctx.has_visible_state());

        ctx.commit_text("helo");
        assert_eq!(ctx.preedit_text, "");
        assert_eq!(ctx.take_commit(), "helo");
        assert!(!ctx.has_commit());
    }

    #[test]
    fn test_commits_accumulate_until_taken() {
        let mut ctx = HostContext::new();
        ctx.commit_text("a");
        ctx.commit_text("b");
        assert_eq!(ctx.take_commit(), "ab");
    }

    #[test]
    fn test_presenter_selection_is_clamped() {
        let mut ctx = HostContext::new();
        ctx.show(&["a".to_string(), "b".to_string()]);
        ctx.move_selection_up();
        assert_eq!(ctx.candidate_cursor, 0);
        ctx.move_selection_down();
        ctx.move_selection_down();
        assert_eq!(ctx.candidate_cursor, 1);

        ctx.hide();
        assert!(!ctx.candidates_visible);
        assert!(ctx.candidates.is_empty());
        assert_eq!((ctx.show_count, ctx.hide_count), (1, 1));
    }
}
