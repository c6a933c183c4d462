//! Key event dispatch.
//!
//! `InputController` is a plain event handler: a platform adapter forwards
//! key events, focus changes and timer wake-ups to it and does nothing else.
//! The controller owns the composition state and the suggestion coordinator
//! and is handed its text sink and candidate presenter at construction.
//!
//! Everything runs on the caller's thread. The only deferred work is the
//! debounced lookup, which fires when the host calls [`InputController::poll_timers`]
//! at or after [`InputController::next_deadline`].

use std::time::Instant;

use crate::context::{CandidatePresenter, TextSink};
use crate::coordinator::{SuggestionCoordinator, SuggestionProvider};
use crate::debounce::{Clock, SystemClock};
use crate::session::{CompositionState, Phase};
use crate::Config;

/// Physical key identity, independent of the platform's key code encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Any key whose meaning is its text payload
    Character,
    Return,
    KeypadEnter,
    Backspace,
    ForwardDelete,
    Left,
    Right,
    Up,
    Down,
    Tab,
    Space,
    Escape,
    /// Platform key code the controller has no name for
    Other(u16),
}

/// Modifier keys held during the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub option: bool,
    pub command: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        option: false,
        command: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        ..Modifiers::NONE
    };
    pub const COMMAND: Modifiers = Modifiers {
        command: true,
        ..Modifiers::NONE
    };

    /// Command or Control: the event belongs to a host shortcut.
    pub fn is_shortcut(&self) -> bool {
        self.command || self.control
    }
}

/// A key press as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    /// Text the key produces, if any
    pub text: Option<String>,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key that types `ch`.
    pub fn char(ch: char) -> Self {
        Self {
            code: KeyCode::Character,
            text: Some(ch.to_string()),
            modifiers: Modifiers::NONE,
        }
    }

    /// A key that types `text` (dead-key sequences can produce several chars).
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            code: KeyCode::Character,
            text: Some(text.into()),
            modifiers: Modifiers::NONE,
        }
    }

    /// A named key without text.
    pub fn key(code: KeyCode) -> Self {
        Self {
            code,
            text: None,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was consumed by the input method
    Handled,
    /// Key was not handled (pass through to application)
    NotHandled,
}

impl KeyResult {
    pub fn is_handled(self) -> bool {
        self == KeyResult::Handled
    }
}

/// What a key event means to the composition.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Compose(String),
    Punctuation,
    Backspace,
    ForwardDelete,
    Left,
    Right,
    Up,
    Down,
    Tab,
    Enter,
    Space,
    Escape,
}

fn classify(event: &KeyEvent) -> Option<Action> {
    let action = match event.code {
        KeyCode::Return | KeyCode::KeypadEnter => Action::Enter,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::ForwardDelete => Action::ForwardDelete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Tab => Action::Tab,
        KeyCode::Space => Action::Space,
        KeyCode::Escape => Action::Escape,
        KeyCode::Character | KeyCode::Other(_) => {
            let text = event.text.as_deref().filter(|t| !t.is_empty())?;
            let first = text.chars().next()?;
            if text == " " {
                Action::Space
            } else if first.is_alphanumeric() {
                Action::Compose(text.to_string())
            } else if first.is_control() {
                return None;
            } else {
                Action::Punctuation
            }
        }
    };
    Some(action)
}

/// Key-driven composition controller.
pub struct InputController<P, S, C> {
    state: CompositionState,
    coordinator: SuggestionCoordinator<P>,
    sink: S,
    presenter: C,
    clock: Box<dyn Clock>,
    active: bool,
}

impl<P, S, C> InputController<P, S, C>
where
    P: SuggestionProvider,
    S: TextSink,
    C: CandidatePresenter,
{
    pub fn new(provider: P, sink: S, presenter: C, config: &Config) -> Self {
        let mut coordinator = SuggestionCoordinator::new(provider, config.debounce());
        coordinator.set_auto_show(config.auto_show_suggestions);
        Self {
            state: CompositionState::with_options(config.word_boundary(), config.max_suggestions),
            coordinator,
            sink,
            presenter,
            clock: Box::new(SystemClock),
            active: false,
        }
    }

    /// Use `clock` for debounce deadlines instead of the wall clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn coordinator(&self) -> &SuggestionCoordinator<P> {
        &self.coordinator
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn presenter(&self) -> &C {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut C {
        &mut self.presenter
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Input focus gained.
    pub fn activate(&mut self) {
        tracing::debug!("controller activated");
        self.active = true;
        self.reset();
    }

    /// Input focus lost. Pending composition is committed, not dropped.
    pub fn deactivate(&mut self) {
        tracing::debug!(buffer = %self.state.text(), "controller deactivated");
        self.commit();
        self.coordinator.cancel();
        self.reset();
        self.active = false;
    }

    /// Drop all composition state without committing.
    pub fn reset(&mut self) {
        self.sink.clear_composing_text();
        self.state.reset();
        self.coordinator.cancel();
        self.coordinator.hide(&mut self.presenter);
    }

    /// Commit the buffer verbatim and return to idle. No-op when empty.
    pub fn commit(&mut self) {
        if self.state.is_empty() {
            return;
        }
        tracing::debug!(text = %self.state.text(), "committing composition");
        self.sink.commit_text(self.state.text());
        self.reset();
    }

    /// When the pending lookup (if any) comes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.coordinator.next_deadline()
    }

    /// Fire the pending lookup if it is due. Returns true if it fired.
    pub fn poll_timers(&mut self) -> bool {
        let now = self.clock.now();
        self.coordinator
            .fire_due(&mut self.state, &mut self.presenter, now)
    }

    /// Process a key event.
    ///
    /// Returns `KeyResult::Handled` if the key was consumed, or
    /// `KeyResult::NotHandled` if the host should apply its default handling.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyResult {
        if event.modifiers.is_shortcut() {
            tracing::trace!(?event, "shortcut passed through");
            return KeyResult::NotHandled;
        }

        let Some(action) = classify(event) else {
            tracing::trace!(?event, "unrecognized key declined");
            return KeyResult::NotHandled;
        };
        tracing::trace!(?action, phase = ?self.state.phase(), "key");

        if self.state.is_empty() {
            return match action {
                Action::Compose(text) => self.handle_compose(&text),
                _ => KeyResult::NotHandled,
            };
        }

        match action {
            Action::Compose(text) => self.handle_compose(&text),
            Action::Punctuation => {
                // The host inserts the punctuation after the committed word.
                self.commit();
                KeyResult::NotHandled
            }
            Action::Backspace => self.handle_delete(false),
            Action::ForwardDelete => self.handle_delete(true),
            Action::Left => self.handle_cursor_move(false),
            Action::Right => self.handle_cursor_move(true),
            Action::Up => self.handle_selection_move(false),
            Action::Down => self.handle_selection_move(true),
            Action::Tab => self.handle_tab(),
            Action::Enter => self.handle_enter(),
            Action::Space => self.handle_space(),
            Action::Escape => {
                self.commit();
                KeyResult::Handled
            }
        }
    }

    fn handle_compose(&mut self, text: &str) -> KeyResult {
        if let Some(index) = self.selection_digit(text) {
            self.confirm(index);
            return KeyResult::Handled;
        }

        self.state.insert_at_cursor(text);
        self.refresh_marked_text();
        self.notify_buffer_changed();
        KeyResult::Handled
    }

    /// Digit 1-9 naming a visible suggestion.
    fn selection_digit(&self, text: &str) -> Option<usize> {
        if !self.state.has_suggestions() {
            return None;
        }
        let mut chars = text.chars();
        let digit = chars.next()?.to_digit(10)?;
        if chars.next().is_some() || digit == 0 {
            return None;
        }
        let index = digit as usize - 1;
        (index < self.state.suggestions().len()).then_some(index)
    }

    fn handle_delete(&mut self, forward: bool) -> KeyResult {
        let deleted = if forward {
            self.state.delete_after_cursor()
        } else {
            self.state.delete_before_cursor()
        };
        if !deleted {
            // Nothing on that side of the cursor; keep the host away from the marked text.
            return KeyResult::Handled;
        }

        if self.state.is_empty() {
            self.reset();
        } else {
            self.refresh_marked_text();
            self.notify_buffer_changed();
        }
        KeyResult::Handled
    }

    fn handle_cursor_move(&mut self, right: bool) -> KeyResult {
        let before = self.state.current_word().to_string();
        let moved = if right {
            self.state.move_cursor_right()
        } else {
            self.state.move_cursor_left()
        };
        if moved {
            self.refresh_marked_text();
            if self.state.current_word() != before {
                self.notify_buffer_changed();
            }
        }
        KeyResult::Handled
    }

    fn handle_selection_move(&mut self, down: bool) -> KeyResult {
        if !self.state.has_suggestions() {
            if down && !self.coordinator.auto_show() {
                self.coordinator
                    .lookup_now(&mut self.state, &mut self.presenter);
            }
            return KeyResult::Handled;
        }

        if down {
            self.state.select_next();
            self.presenter.move_selection_down();
        } else {
            self.state.select_previous();
            self.presenter.move_selection_up();
        }
        tracing::trace!(
            index = self.state.suggestions().selected_index(),
            "selection moved"
        );
        KeyResult::Handled
    }

    fn handle_tab(&mut self) -> KeyResult {
        if !self.state.has_suggestions() {
            self.commit();
            return KeyResult::NotHandled;
        }
        let index = if self.state.is_navigating() {
            self.state.suggestions().selected_index()
        } else {
            0
        };
        self.confirm(index);
        KeyResult::Handled
    }

    fn handle_enter(&mut self) -> KeyResult {
        if self.state.is_navigating() && self.state.has_suggestions() {
            let index = self.state.suggestions().selected_index();
            self.confirm(index);
        } else {
            self.commit();
        }
        KeyResult::Handled
    }

    /// Space ends the word as typed; it never applies a suggestion.
    fn handle_space(&mut self) -> KeyResult {
        self.state.insert_at_cursor(" ");
        self.state.clear_suggestions();
        self.coordinator.cancel();
        self.coordinator.hide(&mut self.presenter);
        self.refresh_marked_text();
        KeyResult::Handled
    }

    /// Replace the word under the cursor with suggestion `index`.
    fn confirm(&mut self, index: usize) {
        let Some(text) = self.state.suggestions().get(index).map(str::to_string) else {
            return;
        };
        tracing::debug!(
            word = %self.state.current_word(),
            replacement = %text,
            index,
            "suggestion confirmed"
        );
        self.state.replace_current_word(&text);
        self.coordinator.cancel();
        self.coordinator.hide(&mut self.presenter);
        self.refresh_marked_text();
    }

    fn notify_buffer_changed(&mut self) {
        let now = self.clock.now();
        self.coordinator
            .on_buffer_changed(&mut self.state, &mut self.presenter, now);
    }

    fn refresh_marked_text(&mut self) {
        if self.state.is_empty() {
            self.sink.clear_composing_text();
        } else {
            self.sink
                .set_composing_text(self.state.text(), self.state.cursor());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_named_keys() {
        assert_eq!(classify(&KeyEvent::key(KeyCode::KeypadEnter)), Some(Action::Enter));
        assert_eq!(classify(&KeyEvent::key(KeyCode::Tab)), Some(Action::Tab));
        assert_eq!(classify(&KeyEvent::char(' ')), Some(Action::Space));
    }

    #[test]
    fn test_classify_text() {
        assert_eq!(
            classify(&KeyEvent::char('a')),
            Some(Action::Compose("a".to_string()))
        );
        assert_eq!(
            classify(&KeyEvent::char('7')),
            Some(Action::Compose("7".to_string()))
        );
        assert_eq!(
            classify(&KeyEvent::char('\u{e9}')),
            Some(Action::Compose("\u{e9}".to_string()))
        );
        assert_eq!(classify(&KeyEvent::char('.')), Some(Action::Punctuation));
        assert_eq!(classify(&KeyEvent::char('\u{1b}')), None);
    }

    #[test]
    fn test_classify_missing_payload() {
        assert_eq!(classify(&KeyEvent::key(KeyCode::Character)), None);
        assert_eq!(classify(&KeyEvent::key(KeyCode::Other(0x7f))), None);
        assert_eq!(classify(&KeyEvent::text("")), None);
        let mut with_text = KeyEvent::key(KeyCode::Other(0));
        with_text.text = Some("q".to_string());
        assert_eq!(classify(&with_text), Some(Action::Compose("q".to_string())));
    }

    #[test]
    fn test_shortcut_modifiers() {
        assert!(Modifiers::CONTROL.is_shortcut());
        assert!(Modifiers::COMMAND.is_shortcut());
        assert!(!Modifiers::SHIFT.is_shortcut());
    }
}
