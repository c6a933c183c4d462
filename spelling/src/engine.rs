// spelling/src/engine.rs
//
// Spelling suggestion engine over the fst word map.
// Unknown words get corrections, known words get completions; results are
// cached per normalized word and learned words rank above the built-in list.

use crate::config::{SpellingConfig, MAX_EDIT_DISTANCE};
use crate::dictionary::{normalize, Dictionary};
use enput_core::SuggestionProvider;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

/// Frequency given to a learned word before its learn count is added.
const LEARNED_BASE_FREQUENCY: u64 = 1_000;

const DEFAULT_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(n) => n,
    None => unreachable!(),
};

/// Spelling engine: corrections for unknown words, completions for known ones.
///
/// Lookups go through an LRU cache keyed by the normalized word. Learning a
/// word rebuilds the small learned-word map and clears the cache so the new
/// word shows up on the next lookup.
pub struct SpellingEngine {
    dictionary: Dictionary,
    learned_counts: RefCell<BTreeMap<String, u64>>,
    learned: RefCell<Dictionary>,
    cache: RefCell<lru::LruCache<String, Vec<String>>>,
    cache_hits: Cell<usize>,
    cache_misses: Cell<usize>,
    max_suggestions: usize,
    max_edit_distance: u32,
    min_word_len: usize,
}

impl std::fmt::Debug for SpellingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellingEngine")
            .field("dictionary", &self.dictionary)
            .field("learned", &self.learned_counts.borrow().len())
            .field("max_suggestions", &self.max_suggestions)
            .field("max_edit_distance", &self.max_edit_distance)
            .finish()
    }
}

impl SpellingEngine {
    /// Engine over `dictionary` with default tunables.
    pub fn new(dictionary: Dictionary) -> Self {
        let config = SpellingConfig::default();
        Self::with_dictionary(dictionary, &config)
    }

    /// Engine over `dictionary` using the tunables from `config`.
    pub fn with_dictionary(dictionary: Dictionary, config: &SpellingConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_size).unwrap_or(DEFAULT_CACHE_SIZE);
        Self {
            dictionary,
            learned_counts: RefCell::new(BTreeMap::new()),
            learned: RefCell::new(Dictionary::empty()),
            cache: RefCell::new(lru::LruCache::new(capacity)),
            cache_hits: Cell::new(0),
            cache_misses: Cell::new(0),
            max_suggestions: config.base.max_suggestions,
            max_edit_distance: config.max_edit_distance.min(MAX_EDIT_DISTANCE),
            min_word_len: config.min_word_len,
        }
    }

    /// Build an engine from configuration, loading `word_list` when set and
    /// the built-in list otherwise.
    pub fn from_config(config: &SpellingConfig) -> anyhow::Result<Self> {
        let dictionary = match &config.word_list {
            Some(path) => Dictionary::load(path)?,
            None => Dictionary::builtin()?,
        };
        tracing::info!(words = dictionary.len(), "SpellingEngine ready");
        Ok(Self::with_dictionary(dictionary, config))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    /// Suggestions for `word`.
    ///
    /// Known words get completions (longer words sharing the prefix). Unknown
    /// words get corrections, nearest edit distance first; when nothing is
    /// close enough they fall back to completions. Within a tier higher
    /// frequency ranks first. The first letter's case follows the input.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        let trimmed = word.trim();
        if trimmed.is_empty() || trimmed.chars().count() < self.min_word_len {
            return Vec::new();
        }
        let key = normalize(trimmed);

        let cached = self.cache.borrow_mut().get(&key).cloned();
        let ranked = match cached {
            Some(hit) => {
                self.cache_hits.set(self.cache_hits.get() + 1);
                hit
            }
            None => {
                self.cache_misses.set(self.cache_misses.get() + 1);
                let fresh = self.lookup(&key);
                self.cache.borrow_mut().put(key, fresh.clone());
                fresh
            }
        };

        ranked
            .into_iter()
            .map(|candidate| match_case(trimmed, &candidate))
            .collect()
    }

    fn lookup(&self, key: &str) -> Vec<String> {
        if self.is_known(key) {
            tracing::debug!(word = key, "fetching completions");
            return self.completions(key);
        }

        tracing::debug!(word = key, "fetching corrections");
        let mut out: Vec<String> = Vec::new();
        for distance in 1..=self.max_edit_distance {
            if out.len() >= self.max_suggestions {
                break;
            }
            let tier = self.merged(|dict| dict.within_distance(key, distance));
            for word in rank(tier) {
                if !out.contains(&word) {
                    out.push(word);
                }
            }
        }
        if out.is_empty() {
            return self.completions(key);
        }
        out.truncate(self.max_suggestions);
        out
    }

    fn completions(&self, key: &str) -> Vec<String> {
        let mut out = rank(self.merged(|dict| dict.completions(key)));
        out.truncate(self.max_suggestions);
        out
    }

    /// Run `query` against the word list and the learned words, keeping the
    /// higher frequency when a word appears in both.
    fn merged<F>(&self, query: F) -> BTreeMap<String, u64>
    where
        F: Fn(&Dictionary) -> Vec<(String, u64)>,
    {
        let mut merged: BTreeMap<String, u64> = BTreeMap::new();
        let learned = self.learned.borrow();
        for (word, freq) in query(&self.dictionary).into_iter().chain(query(&learned)) {
            let slot = merged.entry(word).or_insert(0);
            *slot = (*slot).max(freq);
        }
        merged
    }

    fn is_known(&self, key: &str) -> bool {
        self.dictionary.contains(key) || self.learned.borrow().contains(key)
    }

    /// Whether `word` is in the word list or has been learned. Blank input
    /// counts as correct.
    pub fn is_correctly_spelled(&self, word: &str) -> bool {
        let key = normalize(word);
        key.is_empty() || self.is_known(&key)
    }

    /// Add `word` to the learned words. Learning it again raises its rank.
    pub fn learn(&self, word: &str) -> anyhow::Result<()> {
        let key = normalize(word);
        if key.is_empty() {
            return Ok(());
        }
        let rebuilt = {
            let mut counts = self.learned_counts.borrow_mut();
            *counts.entry(key.clone()).or_insert(LEARNED_BASE_FREQUENCY) += 1;
            Dictionary::from_entries(counts.iter().map(|(w, c)| (w.as_str(), *c)))?
        };
        *self.learned.borrow_mut() = rebuilt;
        self.clear_cache();
        tracing::info!(word = %key, "word learned");
        Ok(())
    }

    /// Learned words with their learn-derived frequency.
    pub fn learned_words(&self) -> Vec<(String, u64)> {
        self.learned_counts
            .borrow()
            .iter()
            .map(|(w, c)| (w.clone(), *c))
            .collect()
    }

    /// (hits, misses) since the cache was last cleared.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache_hits.get(), self.cache_misses.get())
    }

    /// Hit rate as a percentage, `None` before the first lookup.
    pub fn cache_hit_rate(&self) -> Option<f32> {
        let hits = self.cache_hits.get();
        let total = hits + self.cache_misses.get();
        if total == 0 {
            None
        } else {
            Some(hits as f32 / total as f32 * 100.0)
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.borrow().cap().get()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        self.cache_hits.set(0);
        self.cache_misses.set(0);
    }
}

impl SuggestionProvider for SpellingEngine {
    fn suggestions_for(&self, word: &str) -> Vec<String> {
        self.suggest(word)
    }
}

/// Frequency descending, then shorter first, then alphabetical.
fn rank(words: BTreeMap<String, u64>) -> Vec<String> {
    let mut items: Vec<(String, u64)> = words.into_iter().collect();
    items.sort_by(|(wa, fa), (wb, fb)| {
        fb.cmp(fa)
            .then_with(|| wa.chars().count().cmp(&wb.chars().count()))
            .then_with(|| wa.cmp(wb))
    });
    items.into_iter().map(|(w, _)| w).collect()
}

/// Carry the case of `typed` over to `candidate`: all caps stays all caps,
/// a leading capital capitalizes the first letter.
fn match_case(typed: &str, candidate: &str) -> String {
    let mut letters = typed.chars().filter(|c| c.is_alphabetic());
    let Some(first) = letters.next() else {
        return candidate.to_string();
    };
    let rest_upper = letters.clone().all(char::is_uppercase);
    let has_more = letters.next().is_some();

    if first.is_uppercase() && has_more && rest_upper {
        return candidate.to_uppercase();
    }
    if first.is_uppercase() {
        let mut chars = candidate.chars();
        return match chars.next() {
            Some(c) => c.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SpellingEngine {
        SpellingEngine::new(Dictionary::builtin().expect("builtin parses"))
    }

    #[test]
    fn test_corrections_rank_nearest_then_frequent() {
        let got = engine().suggest("helo");
        assert_eq!(&got[..3], &["hello", "help", "held"]);
        assert!(got.len() <= 7);
        assert!(!got.contains(&"helo".to_string()));
    }

    #[test]
    fn test_transposition_costs_two_edits() {
        let got = engine().suggest("siad");
        assert_eq!(got.first().map(String::as_str), Some("said"));
    }

    #[test]
    fn test_known_word_gets_completions() {
        let got = engine().suggest("help");
        assert_eq!(got, vec!["helpful", "helped", "helping", "helper"]);
    }

    #[test]
    fn test_unknown_prefix_falls_back_to_completions() {
        let got = engine().suggest("keyb");
        assert_eq!(got, vec!["keyboard"]);
    }

    #[test]
    fn test_capitalization_follows_input() {
        let engine = engine();
        assert_eq!(engine.suggest("Helo")[0], "Hello");
        assert_eq!(engine.suggest("HELO")[0], "HELLO");
    }

    #[test]
    fn test_blank_and_short_words() {
        let engine = engine();
        assert!(engine.suggest("   ").is_empty());

        let config = SpellingConfig {
            min_word_len: 3,
            ..SpellingConfig::default()
        };
        let strict =
            SpellingEngine::with_dictionary(Dictionary::builtin().expect("builtin"), &config);
        assert!(strict.suggest("he").is_empty());
    }

    #[test]
    fn test_zero_distance_disables_corrections() {
        let config = SpellingConfig {
            max_edit_distance: 0,
            ..SpellingConfig::default()
        };
        let engine =
            SpellingEngine::with_dictionary(Dictionary::builtin().expect("builtin"), &config);
        assert!(engine.suggest("xqzt").is_empty());
        assert_eq!(engine.suggest("keyb"), vec!["keyboard"]);
    }

    #[test]
    fn test_cache_hits_on_repeat() {
        let engine = engine();
        engine.suggest("helo");
        engine.suggest("Helo");
        assert_eq!(engine.cache_stats(), (1, 1));
        assert_eq!(engine.cache_size(), 1);
        assert_eq!(engine.cache_hit_rate(), Some(50.0));
    }

    #[test]
    fn test_learn_adds_word_and_clears_cache() {
        let engine = engine();
        assert!(!engine.is_correctly_spelled("enput"));
        engine.suggest("enpu");

        engine.learn("Enput").expect("learns");
        assert!(engine.is_correctly_spelled("enput"));
        assert_eq!(engine.cache_stats(), (0, 0));
        assert_eq!(engine.suggest("enpu").first().map(String::as_str), Some("enput"));
        assert_eq!(engine.learned_words(), vec![("enput".to_string(), 1_001)]);
    }

    #[test]
    fn test_provider_trait_delegates() {
        let engine = engine();
        let provider: &dyn SuggestionProvider = &engine;
        assert_eq!(provider.suggestions_for("wrld")[0], "world");
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("hi", "hello"), "hello");
        assert_eq!(match_case("Hi", "hello"), "Hello");
        assert_eq!(match_case("HI", "hello"), "HELLO");
        assert_eq!(match_case("H", "hello"), "Hello");
        assert_eq!(match_case("42", "hello"), "hello");
    }
}
