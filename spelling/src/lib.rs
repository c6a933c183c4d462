//! enput-spelling
//!
//! English spelling suggestions for `enput-core`. Unknown words get
//! corrections within a small edit distance; known words get completions.
//! Both come from an `fst` word map ranked by frequency.
//!
//! Public API:
//! - `SpellingEngine` - the `SuggestionProvider`, with LRU cache and learned words
//! - `Dictionary` - fst-backed word frequency map
//! - `SpellingConfig` - base `Config` plus word list and correction options
//! - `Replay` / `parse_script` - drive an `InputController` from key scripts
//!
//! ## Usage
//!
//! ```rust
//! use enput_spelling::{Dictionary, SpellingEngine};
//!
//! let engine = SpellingEngine::new(Dictionary::builtin().unwrap());
//! assert_eq!(engine.suggest("helo")[0], "hello");
//! ```

pub mod config;
pub use config::SpellingConfig;

pub mod dictionary;
pub use dictionary::{normalize, Dictionary};

pub mod engine;
pub use engine::SpellingEngine;

pub mod keys;
pub use keys::{parse_script, ScriptStep};

pub mod replay;
pub use replay::{Replay, ReplayController, Snapshot};

// Re-export the core crate so hosts need a single dependency.
pub use enput_core;
