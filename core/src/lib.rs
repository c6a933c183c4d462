//! enput-core
//!
//! Composition engine for keystroke-driven input methods: an editable buffer
//! with a grapheme-aware cursor, word boundaries around the cursor, a
//! debounced suggestion pipeline with a staleness guard, and a key-event
//! controller that decides what every key does to the composition.
//!
//! Public API:
//! - `InputController` - key dispatch, commit/confirm semantics, focus handling
//! - `CompositionState` - buffer, cursor, suggestions, selection, navigation flag
//! - `WordBoundary` - word span / current word / replace word
//! - `Debouncer` - single-slot deferred task with `Clock` abstraction
//! - `SuggestionCoordinator` - debounced provider lookups
//! - `TextSink`, `CandidatePresenter`, `SuggestionProvider` - host capabilities
//! - `Config` - tunables, loadable from TOML
//!
//! ## Usage
//!
//! ```rust,ignore
//! use enput_core::{Config, HostContext, InputController, KeyEvent, NullPresenter};
//!
//! let mut ime = InputController::new(provider, HostContext::new(), NullPresenter, &Config::default());
//! ime.activate();
//! ime.handle_key(&KeyEvent::char('h'));
//! // later, from the event loop, once `ime.next_deadline()` has passed:
//! ime.poll_timers();
//! ```

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod word;
pub use word::{current_word, replace_word, word_span, WordBoundary};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod suggestion;
pub use suggestion::SuggestionList;

pub mod session;
pub use session::{CompositionState, Phase};

pub mod debounce;
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};

pub mod context;
pub use context::{CandidatePresenter, HostContext, NullPresenter, TextSink};

pub mod coordinator;
pub use coordinator::{LookupStats, SuggestionCoordinator, SuggestionProvider};

pub mod controller;
pub use controller::{InputController, KeyCode, KeyEvent, KeyResult, Modifiers};

/// Composition engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period after the last edit before suggestions are looked up (ms)
    pub debounce_ms: u64,

    /// Maximum number of suggestions kept and shown
    pub max_suggestions: usize,

    /// Characters that end a word in addition to whitespace
    pub extra_separators: String,

    /// Look up suggestions while typing. When off, they appear only when
    /// Down is pressed during composition.
    pub auto_show_suggestions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            max_suggestions: SuggestionList::DEFAULT_MAX,
            extra_separators: String::new(),
            auto_show_suggestions: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Separator set for word detection.
    pub fn word_boundary(&self) -> WordBoundary {
        WordBoundary::with_extra(&self.extra_separators)
    }
}
