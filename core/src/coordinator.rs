//! Debounced suggestion lookups.
//!
//! Edits do not query the provider directly. Each edit captures the word
//! under the cursor and (re)arms a single debounced lookup for it. When the
//! lookup comes due, the word under the cursor is read again: if it is no
//! longer the captured word the lookup is dropped without calling the
//! provider, so a result can never land on text it was not computed for.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::context::CandidatePresenter;
use crate::debounce::Debouncer;
use crate::session::CompositionState;

/// Source of spelling corrections or completions for a word.
pub trait SuggestionProvider {
    /// Suggestions for `word`, most relevant first.
    fn suggestions_for(&self, word: &str) -> Vec<String>;
}

impl<P: SuggestionProvider + ?Sized> SuggestionProvider for Rc<P> {
    fn suggestions_for(&self, word: &str) -> Vec<String> {
        (**self).suggestions_for(word)
    }
}

impl<P: SuggestionProvider + ?Sized> SuggestionProvider for Box<P> {
    fn suggestions_for(&self, word: &str) -> Vec<String> {
        (**self).suggestions_for(word)
    }
}

/// Lookup statistics, mostly for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// Lookups armed
    pub scheduled: usize,
    /// Provider calls made
    pub provider_calls: usize,
    /// Due lookups dropped because the word changed
    pub stale: usize,
}

/// Owns the provider and the pending lookup.
pub struct SuggestionCoordinator<P> {
    provider: P,
    debouncer: Debouncer<String>,
    delay: Duration,
    auto_show: bool,
    presenter_visible: bool,
    stats: LookupStats,
}

impl<P: SuggestionProvider> SuggestionCoordinator<P> {
    pub fn new(provider: P, delay: Duration) -> Self {
        Self {
            provider,
            debouncer: Debouncer::new(),
            delay,
            auto_show: true,
            presenter_visible: false,
            stats: LookupStats::default(),
        }
    }

    /// When disabled, edits never arm a lookup; see [`Self::lookup_now`].
    pub fn set_auto_show(&mut self, auto_show: bool) {
        self.auto_show = auto_show;
    }

    pub fn auto_show(&self) -> bool {
        self.auto_show
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn stats(&self) -> LookupStats {
        self.stats
    }

    /// Word the pending lookup was armed for.
    pub fn pending_word(&self) -> Option<&str> {
        self.debouncer.pending().map(String::as_str)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn is_presenter_visible(&self) -> bool {
        self.presenter_visible
    }

    /// React to a change of buffer, cursor or word.
    pub fn on_buffer_changed<C>(
        &mut self,
        state: &mut CompositionState,
        presenter: &mut C,
        now: Instant,
    ) where
        C: CandidatePresenter + ?Sized,
    {
        if !state.has_current_word() {
            self.debouncer.cancel();
            state.clear_suggestions();
            self.hide(presenter);
            return;
        }

        // Whatever is listed was computed for the previous word.
        if state.has_suggestions() || self.presenter_visible {
            state.clear_suggestions();
            self.hide(presenter);
        }

        if !self.auto_show {
            self.debouncer.cancel();
            return;
        }

        let word = state.current_word().to_string();
        tracing::trace!(word = %word, delay_ms = self.delay.as_millis() as u64, "scheduling lookup");
        self.debouncer.schedule(now, self.delay, word);
        self.stats.scheduled += 1;
    }

    /// Run the pending lookup if it is due. Returns true if one fired.
    pub fn fire_due<C>(
        &mut self,
        state: &mut CompositionState,
        presenter: &mut C,
        now: Instant,
    ) -> bool
    where
        C: CandidatePresenter + ?Sized,
    {
        let Some(word) = self.debouncer.take_due(now) else {
            return false;
        };

        if state.current_word() != word {
            tracing::debug!(
                word = %word,
                current = %state.current_word(),
                "dropping stale lookup"
            );
            self.stats.stale += 1;
            return true;
        }

        self.apply(&word, state, presenter);
        true
    }

    /// Look up the current word immediately, bypassing the debounce.
    pub fn lookup_now<C>(&mut self, state: &mut CompositionState, presenter: &mut C)
    where
        C: CandidatePresenter + ?Sized,
    {
        self.debouncer.cancel();
        if !state.has_current_word() {
            return;
        }
        let word = state.current_word().to_string();
        self.apply(&word, state, presenter);
    }

    /// Drop the pending lookup, if any.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    pub fn hide<C>(&mut self, presenter: &mut C)
    where
        C: CandidatePresenter + ?Sized,
    {
        presenter.hide();
        self.presenter_visible = false;
    }

    fn apply<C>(&mut self, word: &str, state: &mut CompositionState, presenter: &mut C)
    where
        C: CandidatePresenter + ?Sized,
    {
        let results = self.provider.suggestions_for(word);
        self.stats.provider_calls += 1;
        tracing::debug!(word = %word, count = results.len(), "suggestions received");

        state.set_suggestions(results);
        if state.has_suggestions() {
            let items = state.suggestions().items();
            if self.presenter_visible {
                presenter.update(items);
            } else {
                presenter.show(items);
                self.presenter_visible = true;
            }
        } else {
            self.hide(presenter);
        }
    }
}
