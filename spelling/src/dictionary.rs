//! Word frequency map backed by an FST.
//!
//! Keys are normalized words (NFC, lowercase); values are frequencies. The
//! FST gives cheap membership, prefix streams for completions and bounded
//! edit-distance streams for corrections.

use anyhow::Context as _;
use fst::automaton::{Levenshtein, Str};
use fst::{Automaton, IntoStreamer, Map, Streamer};
use std::collections::BTreeMap;
use std::path::Path;

/// Word list shipped with the crate.
pub const BUILTIN_WORDS: &str = include_str!("../data/words.txt");

/// Normalize a word for lookup: NFC, trimmed, lowercase.
pub fn normalize(word: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    word.trim().nfc().collect::<String>().to_lowercase()
}

/// Immutable word → frequency map.
#[derive(Clone)]
pub struct Dictionary {
    map: Map<Vec<u8>>,
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("words", &self.map.len())
            .finish()
    }
}

impl Dictionary {
    /// An empty dictionary.
    pub fn empty() -> Self {
        Self {
            map: Map::default(),
        }
    }

    /// Build from (word, frequency) pairs. Words are normalized; duplicates
    /// keep their highest frequency.
    pub fn from_entries<I, W>(entries: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (W, u64)>,
        W: AsRef<str>,
    {
        let mut sorted: BTreeMap<String, u64> = BTreeMap::new();
        for (word, freq) in entries {
            let word = normalize(word.as_ref());
            if word.is_empty() {
                continue;
            }
            let slot = sorted.entry(word).or_insert(0);
            *slot = (*slot).max(freq);
        }
        let map = Map::from_iter(sorted).context("building word fst")?;
        Ok(Self { map })
    }

    /// Parse a word list: `word [frequency]` per line, `#` starts a comment.
    /// A missing frequency counts as 1.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut entries = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let freq = match fields.next() {
                Some(raw) => raw
                    .parse::<u64>()
                    .with_context(|| format!("line {}: bad frequency {:?}", lineno + 1, raw))?,
                None => 1,
            };
            entries.push((word.to_string(), freq));
        }
        Self::from_entries(entries)
    }

    /// Load a word list file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading word list {}", path.display()))?;
        let dict =
            Self::parse(&text).with_context(|| format!("parsing word list {}", path.display()))?;
        tracing::info!(path = %path.display(), words = dict.len(), "loaded word list");
        Ok(dict)
    }

    /// The built-in English list.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::parse(BUILTIN_WORDS).context("parsing built-in word list")
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Frequency of an already normalized word.
    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.map.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.map.contains_key(word)
    }

    /// Words that start with `prefix` and are longer than it.
    pub fn completions(&self, prefix: &str) -> Vec<(String, u64)> {
        let matcher = Str::new(prefix).starts_with();
        let mut stream = self.map.search(matcher).into_stream();
        let mut out = Vec::new();
        while let Some((key, freq)) = stream.next() {
            if key.len() == prefix.len() {
                continue;
            }
            if let Ok(word) = std::str::from_utf8(key) {
                out.push((word.to_string(), freq));
            }
        }
        out
    }

    /// Words within `distance` edits of `word`, excluding `word` itself.
    pub fn within_distance(&self, word: &str, distance: u32) -> Vec<(String, u64)> {
        let matcher = match Levenshtein::new(word, distance) {
            Ok(matcher) => matcher,
            Err(err) => {
                tracing::warn!(word, distance, error = %err, "edit-distance search skipped");
                return Vec::new();
            }
        };
        let mut stream = self.map.search(matcher).into_stream();
        let mut out = Vec::new();
        while let Some((key, freq)) = stream.next() {
            if key == word.as_bytes() {
                continue;
            }
            if let Ok(found) = std::str::from_utf8(key) {
                out.push((found.to_string(), freq));
            }
        }
        out
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Dictionary {
        Dictionary::parse("hello 10\nhelp 8\nhelpful 3\nheld 5\n# comment\n\nworld\n")
            .expect("valid list")
    }

    #[test]
    fn test_parse_counts_and_defaults() {
        let dict = small();
        assert_eq!(dict.len(), 5);
        assert_eq!(dict.frequency("hello"), Some(10));
        assert_eq!(dict.frequency("world"), Some(1));
        assert!(!dict.contains("helo"));
    }

    #[test]
    fn test_duplicates_keep_max_frequency() {
        let dict = Dictionary::from_entries(vec![("Word", 3), ("word", 7), ("WORD", 5)])
            .expect("builds");
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.frequency("word"), Some(7));
    }

    #[test]
    fn test_bad_frequency_reports_line() {
        let err = Dictionary::parse("ok 1\nbad x\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_completions_exclude_prefix_itself() {
        let dict = small();
        let mut words: Vec<String> = dict.completions("help").into_iter().map(|(w, _)| w).collect();
        words.sort();
        assert_eq!(words, vec!["helpful".to_string()]);
    }

    #[test]
    fn test_within_distance() {
        let dict = small();
        let mut words: Vec<String> = dict
            .within_distance("helo", 1)
            .into_iter()
            .map(|(w, _)| w)
            .collect();
        words.sort();
        assert_eq!(words, vec!["held", "hello", "help"]);
    }

    #[test]
    fn test_normalize_composes_and_lowercases() {
        assert_eq!(normalize(" Cafe\u{301} "), "caf\u{e9}");
    }

    #[test]
    fn test_builtin_list_loads() {
        let dict = Dictionary::builtin().expect("builtin parses");
        assert!(dict.contains("hello"));
        assert!(dict.contains("said"));
        assert!(dict.len() > 100);
    }
}
