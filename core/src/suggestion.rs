//! Suggestion list with a clamped selection cursor.
//!
//! The list keeps provider order (most relevant first), is capped at a
//! maximum length and is only ever replaced as a whole. Selection never wraps.

/// Ordered suggestions plus the highlighted index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionList {
    /// Suggestions in relevance order
    items: Vec<String>,

    /// Maximum number of suggestions kept
    max_len: usize,

    /// Highlighted suggestion (0-based)
    selected: usize,
}

impl SuggestionList {
    /// Default cap on the number of suggestions.
    pub const DEFAULT_MAX: usize = 7;

    /// Create a new empty list with the default cap.
    pub fn new() -> Self {
        Self::with_max_len(Self::DEFAULT_MAX)
    }

    /// Create an empty list holding at most `max_len` suggestions.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            items: Vec::new(),
            max_len: max_len.max(1), // Ensure at least 1
            selected: 0,
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Replace every suggestion, truncating to the cap and resetting the selection.
    pub fn set(&mut self, mut items: Vec<String>) {
        items.truncate(self.max_len);
        self.items = items;
        self.selected = 0;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    /// Index of the highlighted suggestion.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The highlighted suggestion, if the list is non-empty.
    pub fn selected(&self) -> Option<&str> {
        self.get(self.selected)
    }

    /// Move the selection up. Stays on the first entry.
    /// Returns true if the selection moved.
    pub fn select_previous(&mut self) -> bool {
        if self.selected > 0 {
            self.selected -= 1;
            true
        } else {
            false
        }
    }

    /// Move the selection down. Stays on the last entry.
    /// Returns true if the selection moved.
    pub fn select_next(&mut self) -> bool {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
            true
        } else {
            false
        }
    }

    /// Whether the selection index is valid for the current contents.
    pub(crate) fn selection_in_range(&self) -> bool {
        self.selected < self.items.len().max(1)
    }
}

impl Default for SuggestionList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_truncates_and_resets_selection() {
        let mut list = SuggestionList::with_max_len(2);
        list.set(words(&["a", "b"]));
        list.select_next();
        assert_eq!(list.selected_index(), 1);

        list.set(words(&["x", "y", "z"]));
        assert_eq!(list.items(), &["x".to_string(), "y".to_string()]);
        assert_eq!(list.selected_index(), 0);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut list = SuggestionList::new();
        list.set(words(&["hello", "help", "held"]));

        assert!(!list.select_previous());
        assert_eq!(list.selected_index(), 0);

        assert!(list.select_next());
        assert!(list.select_next());
        assert!(!list.select_next());
        assert_eq!(list.selected(), Some("held"));
    }

    #[test]
    fn test_empty_list() {
        let mut list = SuggestionList::new();
        assert!(!list.select_next());
        assert_eq!(list.selected(), None);
        assert!(list.selection_in_range());
    }

    #[test]
    fn test_zero_cap_is_raised_to_one() {
        let mut list = SuggestionList::with_max_len(0);
        list.set(words(&["a", "b"]));
        assert_eq!(list.len(), 1);
    }
}
