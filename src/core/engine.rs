use crate::core::candidates::CandidatePool;
use crate::core::navigation::NavigationController;
use crate::core::pattern::{self, SecretPattern};
use crate::core::pruning;
use crate::core::types::{ControlKey, Event, Outcome, Suggestion};
use crate::fuzzy::similarity::SimilarityIndex;
use crate::learning::FrequencyModel;
use crate::persistence::{load_slot, KvStore, SIMILAR_WORDS_SLOT, WORD_FREQUENCY_SLOT};
use std::collections::HashMap;
use std::path::Path;

/// Display cap for suggestion listings.
pub const MAX_SUGGESTIONS: usize = 20;

/// Working state for the round in progress, created when a masked pattern is
/// revealed and discarded when the round ends.
struct RoundState {
    pool: CandidatePool,
    nav: NavigationController,
}

/// The assistant engine. Owns the two persistent maps (occurrence counts and
/// similarity sets) plus the per-round pool and cursor. Hosts feed it tagged
/// events and apply the returned `Outcome` to their guess field; every
/// handler runs to completion on the calling thread, one event at a time.
pub struct AssistEngine {
    frequency: FrequencyModel,
    similarity: SimilarityIndex,
    round: Option<RoundState>,
    store: Option<KvStore>,
}

impl AssistEngine {
    pub fn new() -> Self {
        Self {
            frequency: FrequencyModel::new(),
            similarity: SimilarityIndex::new(),
            round: None,
            store: None,
        }
    }

    /// Loads the engine from a store directory, starting empty when the
    /// store cannot be opened or holds nothing. A similarity map whose key
    /// count disagrees with the frequency map (first run, or an interrupted
    /// save) is rebuilt from scratch and written back; the amplified cache
    /// is always rebuilt after loading.
    pub fn from_store_or_new(dir: &Path) -> Self {
        let mut engine = Self::new();
        match KvStore::open(dir) {
            Ok(store) => {
                let counts: HashMap<String, u64> = load_slot(&store, WORD_FREQUENCY_SLOT);
                engine.frequency = FrequencyModel::from_counts(counts);
                engine.similarity = load_slot(&store, SIMILAR_WORDS_SLOT);
                engine.store = Some(store);
            }
            Err(e) => {
                log::warn!(
                    "store '{}' unavailable, running without persistence: {}",
                    dir.display(),
                    e
                );
            }
        }

        if engine.similarity.len() != engine.frequency.len() {
            let words: Vec<String> = engine.frequency.words().cloned().collect();
            engine.similarity = SimilarityIndex::full_rebuild(&words);
            engine.save();
        }
        engine.frequency.rebuild_amplified(&engine.similarity);
        engine
    }

    /// Routes one host event to the component that owns it.
    pub fn handle_event(&mut self, event: Event) -> Outcome {
        match event {
            Event::PatternReveal { masked, concluded } => {
                self.on_pattern_reveal(&masked, concluded)
            }
            Event::TranscriptUpdate { messages } => self.on_transcript_update(&messages),
            Event::Input { key, text, caret } => self.on_input(key, &text, caret),
        }
    }

    /// Words learned so far.
    pub fn dictionary_size(&self) -> usize {
        self.frequency.len()
    }

    /// The current narrowed candidate view with per-word counts, capped at
    /// `limit` rows, for host display. Empty between rounds.
    pub fn suggestions(&self, limit: usize) -> Vec<Suggestion> {
        let Some(round) = &self.round else {
            return Vec::new();
        };
        round
            .pool
            .narrowed(round.nav.prefix())
            .into_iter()
            .take(limit)
            .map(|word| Suggestion {
                count: self.frequency.count(&word),
                amplified: self.frequency.amplified(&word),
                word,
            })
            .collect()
    }

    /// The whole frequency map as a plain-text payload, offered at startup
    /// for external inspection or backup.
    pub fn frequency_export(&self) -> String {
        let body = serde_json::to_string_pretty(self.frequency.counts())
            .unwrap_or_else(|_| String::from("{}"));
        format!("word_frequency = {}", body)
    }

    /// Writes both maps to the store. In-memory state is already current
    /// when this runs, so a failed write costs durability only; errors are
    /// logged and swallowed.
    pub fn save(&self) {
        let Some(store) = &self.store else { return };
        persist_slot(store, WORD_FREQUENCY_SLOT, serde_json::to_string(self.frequency.counts()));
        persist_slot(store, SIMILAR_WORDS_SLOT, serde_json::to_string(self.similarity.sets()));
    }

    fn on_pattern_reveal(&mut self, masked: &str, concluded: bool) -> Outcome {
        let masked = masked.to_lowercase();

        if concluded {
            // Round over: learn the revealed word, unless letters are
            // somehow still hidden.
            if pattern::fully_revealed(&masked) && !masked.is_empty() {
                self.frequency.record_occurrence(&masked, &mut self.similarity);
                self.save();
                self.round = None;
                log::debug!("recorded '{}', {} words known", masked, self.frequency.len());
            }
            return Outcome::Idle;
        }

        if !pattern::still_hidden(&masked) {
            // Reveal event with nothing left to guess; ignore.
            return Outcome::Idle;
        }

        let secret = SecretPattern::parse(&masked);
        let pool = CandidatePool::generate(&secret, &self.frequency);
        log::debug!(
            "pattern {:?} ({} tokens): {} candidates",
            secret.token_lengths(),
            secret.token_lengths().len(),
            pool.len()
        );
        self.log_listing(pool.words());

        // A unique candidate goes straight into the guess field.
        let unique = (pool.len() == 1).then(|| pool.words()[0].clone());
        self.round = Some(RoundState {
            pool,
            nav: NavigationController::new(),
        });
        match unique {
            Some(word) => Outcome::SetGuess(word),
            None => Outcome::Idle,
        }
    }

    fn on_transcript_update(&mut self, messages: &[String]) -> Outcome {
        if let Some(round) = &mut self.round {
            let removed = pruning::removal_set(messages, &self.similarity);
            round.pool.remove_all(&removed);
            log::debug!(
                "{} words ruled out by chat, {} candidates left",
                removed.len(),
                round.pool.len()
            );
        }
        Outcome::Idle
    }

    fn on_input(&mut self, key: Option<ControlKey>, text: &str, caret: usize) -> Outcome {
        let Some(round) = &mut self.round else {
            // No round in progress; the field is just a chat box.
            return Outcome::Idle;
        };
        let outcome = round.nav.on_input(key, text, caret, &round.pool);

        if log::log_enabled!(log::Level::Debug) {
            if let Some(round) = &self.round {
                let narrowed = round.pool.narrowed(round.nav.prefix());
                self.log_listing(&narrowed);
            }
        }
        outcome
    }

    fn log_listing(&self, words: &[String]) {
        for word in words.iter().take(MAX_SUGGESTIONS) {
            log::debug!(
                "  {} {} {}",
                word,
                self.frequency.count(word),
                self.frequency.amplified(word)
            );
        }
    }
}

impl Default for AssistEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn persist_slot(store: &KvStore, slot: &str, payload: serde_json::Result<String>) {
    match payload {
        Ok(value) => {
            if let Err(e) = store.set(slot, &value) {
                log::error!("failed to persist '{}': {}", slot, e);
            }
        }
        Err(e) => log::error!("failed to serialize '{}': {}", slot, e),
    }
}
