//! Scripted host: feeds key scripts to an `InputController` and plays the
//! part of the text field, so a run ends with a readable document.
//!
//! Keys the controller declines get a minimal default treatment: text is
//! inserted, Enter and Tab insert `\n` and `\t`, Backspace/Delete/Left/Right
//! edit the document directly.

use crate::engine::SpellingEngine;
use crate::keys::{parse_script, ScriptStep};
use enput_core::{
    Config, HostContext, InputController, KeyCode, KeyEvent, KeyResult, ManualClock,
};
use serde::Serialize;
use std::rc::Rc;
use std::time::Duration;

pub type ReplayController = InputController<Rc<SpellingEngine>, HostContext, HostContext>;

/// Observable state after a script has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Committed document text
    pub document: String,
    /// Marked text still being composed
    pub marked: String,
    /// Caret inside the marked text (byte offset)
    pub cursor: usize,
    /// Suggestions in the window, empty when hidden
    pub candidates: Vec<String>,
    /// Highlighted suggestion while the window is visible
    pub selected: Option<usize>,
    pub phase: String,
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.document)?;
        if !self.marked.is_empty() {
            let (before, after) = self.marked.split_at(self.cursor.min(self.marked.len()));
            write!(f, "[{}|{}]", before, after)?;
        }
        for (i, candidate) in self.candidates.iter().enumerate() {
            let mark = if Some(i) == self.selected { '>' } else { ' ' };
            write!(f, "\n {}{} {}", mark, i + 1, candidate)?;
        }
        Ok(())
    }
}

/// Controller plus emulated document.
pub struct Replay {
    controller: ReplayController,
    clock: ManualClock,
    delay: Duration,
    document: String,
    doc_cursor: usize,
}

impl Replay {
    pub fn new(engine: Rc<SpellingEngine>, config: &Config) -> Self {
        let clock = ManualClock::new();
        let mut controller =
            InputController::new(engine, HostContext::new(), HostContext::new(), config)
                .with_clock(clock.clone());
        controller.activate();
        Self {
            controller,
            clock,
            delay: config.debounce(),
            document: String::new(),
            doc_cursor: 0,
        }
    }

    pub fn controller(&self) -> &ReplayController {
        &self.controller
    }

    /// Parse and run `script`, returning the state afterwards.
    pub fn run_script(&mut self, script: &str) -> anyhow::Result<Snapshot> {
        let steps = parse_script(script)?;
        tracing::debug!(steps = steps.len(), "running script");
        for step in &steps {
            self.step(step);
        }
        Ok(self.snapshot())
    }

    pub fn step(&mut self, step: &ScriptStep) {
        match step {
            ScriptStep::Wait => {
                self.clock.advance(self.delay);
                self.controller.poll_timers();
            }
            ScriptStep::Key(event) => {
                let result = self.controller.handle_key(event);
                self.drain_commit();
                if result == KeyResult::NotHandled {
                    self.default_action(event);
                }
            }
        }
    }

    /// Focus leaves the field: the composition is committed.
    pub fn finish(&mut self) -> Snapshot {
        self.controller.deactivate();
        self.drain_commit();
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        let sink = self.controller.sink();
        let window = self.controller.presenter();
        Snapshot {
            document: self.document.clone(),
            marked: sink.preedit_text.clone(),
            cursor: sink.preedit_cursor,
            candidates: if window.candidates_visible {
                window.candidates.clone()
            } else {
                Vec::new()
            },
            selected: window.candidates_visible.then_some(window.candidate_cursor),
            phase: format!("{:?}", self.controller.phase()),
        }
    }

    fn drain_commit(&mut self) {
        let committed = self.controller.sink_mut().take_commit();
        if !committed.is_empty() {
            self.insert(&committed);
        }
    }

    fn insert(&mut self, text: &str) {
        self.document.insert_str(self.doc_cursor, text);
        self.doc_cursor += text.len();
    }

    fn default_action(&mut self, event: &KeyEvent) {
        if event.modifiers.is_shortcut() {
            return;
        }
        match event.code {
            KeyCode::Return | KeyCode::KeypadEnter => self.insert("\n"),
            KeyCode::Tab => self.insert("\t"),
            KeyCode::Backspace => {
                if let Some(ch) = self.document[..self.doc_cursor].chars().next_back() {
                    self.doc_cursor -= ch.len_utf8();
                    self.document.remove(self.doc_cursor);
                }
            }
            KeyCode::ForwardDelete => {
                if self.doc_cursor < self.document.len() {
                    self.document.remove(self.doc_cursor);
                }
            }
            KeyCode::Left => {
                if let Some(ch) = self.document[..self.doc_cursor].chars().next_back() {
                    self.doc_cursor -= ch.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(ch) = self.document[self.doc_cursor..].chars().next() {
                    self.doc_cursor += ch.len_utf8();
                }
            }
            _ => {
                if let Some(text) = event.text.as_deref() {
                    if !text.chars().any(char::is_control) {
                        self.insert(text);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;

    fn replay() -> Replay {
        let engine = SpellingEngine::new(Dictionary::builtin().expect("builtin"));
        Replay::new(Rc::new(engine), &Config::default())
    }

    #[test]
    fn test_tab_accepts_first_correction() {
        let mut replay = replay();
        let snap = replay.run_script("helo<wait>").expect("runs");
        assert_eq!(snap.marked, "helo");
        assert_eq!(&snap.candidates[..2], &["hello", "help"]);
        assert_eq!(snap.selected, Some(0));

        let snap = replay.run_script("<tab>").expect("runs");
        assert_eq!(snap.marked, "hello ");
        assert!(snap.candidates.is_empty());
        assert_eq!(replay.finish().document, "hello ");
    }

    #[test]
    fn test_declined_keys_reach_the_document() {
        let mut replay = replay();
        let snap = replay.run_script("hi. <enter>ok<bs>").expect("runs");
        assert_eq!(snap.document, "hi. \n");
        assert_eq!(snap.marked, "o");
        assert_eq!(replay.finish().document, "hi. \no");
    }

    #[test]
    fn test_display_marks_cursor_and_selection() {
        let mut replay = replay();
        let snap = replay.run_script("wrld<left><wait><down>").expect("runs");
        let shown = snap.to_string();
        assert!(shown.starts_with("[wrl|d]"), "got {:?}", shown);
        assert!(shown.contains("\n  1 world"), "got {:?}", shown);
        assert!(shown.contains("\n >2 "), "got {:?}", shown);
        assert_eq!(snap.phase, "Navigating");
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut replay = replay();
        let snap = replay.run_script("a").expect("runs");
        let json = serde_json::to_value(&snap).expect("serializes");
        assert_eq!(json["marked"], "a");
        assert_eq!(json["phase"], "Composing");
    }
}
