//! Spelling configuration that extends the base `Config` from core.
//!
//! Includes:
//! - All composition options from `enput_core::Config` (flattened via serde)
//! - Word list location
//! - Correction and cache tunables
//!
//! # Example
//!
//! ```rust
//! use enput_spelling::SpellingConfig;
//!
//! let config = SpellingConfig::from_toml_str("debounce_ms = 80\nmax_edit_distance = 1\n").unwrap();
//! assert_eq!(config.base().debounce_ms, 80);
//! ```

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest edit distance the fst automaton search is asked for.
pub const MAX_EDIT_DISTANCE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpellingConfig {
    /// Composition fields (debounce, suggestion cap, separators, auto show)
    #[serde(flatten)]
    pub base: enput_core::Config,

    /// Word list to use instead of the built-in one
    pub word_list: Option<PathBuf>,

    /// Edits allowed when correcting an unknown word (0 disables corrections)
    pub max_edit_distance: u32,

    /// Cached lookups kept by the engine
    pub cache_size: usize,

    /// Words shorter than this get no suggestions
    pub min_word_len: usize,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            base: enput_core::Config::default(),
            word_list: None,
            max_edit_distance: MAX_EDIT_DISTANCE,
            cache_size: 256,
            min_word_len: 1,
        }
    }
}

impl SpellingConfig {
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        if config.max_edit_distance > MAX_EDIT_DISTANCE {
            tracing::warn!(
                requested = config.max_edit_distance,
                max = MAX_EDIT_DISTANCE,
                "clamping max_edit_distance"
            );
            config.max_edit_distance = MAX_EDIT_DISTANCE;
        }
        Ok(config)
    }

    /// Convert into the base config for `InputController::new`
    pub fn into_base(self) -> enput_core::Config {
        self.base
    }

    pub fn base(&self) -> &enput_core::Config {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut enput_core::Config {
        &mut self.base
    }
}
