// File: src/learning.rs
use crate::fuzzy::similarity::SimilarityIndex;
use std::collections::HashMap;

/// Occurrence counts over every word ever revealed, plus the derived
/// "amplified" score per word: the sum of raw counts across the word's
/// similarity set. Guessing "lake" can match a round whose answer was "cake",
/// so the cluster total is what candidates are ranked by.
///
/// Only the raw counts are persisted. The amplified cache is rebuilt from the
/// counts and the index after loading, and maintained incrementally by
/// `record_occurrence` from then on.
#[derive(Clone, Default)]
pub struct FrequencyModel {
    counts: HashMap<String, u64>,
    amplified: HashMap<String, u64>,
}

impl FrequencyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-deserialized frequency map. The amplified cache is
    /// left empty; call `rebuild_amplified` once the index is in sync.
    pub fn from_counts(counts: HashMap<String, u64>) -> Self {
        Self {
            counts,
            amplified: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// How many times this exact word has been revealed; 0 if unseen.
    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Cluster-total score used for ranking; 0 if unseen.
    pub fn amplified(&self, word: &str) -> u64 {
        self.amplified.get(word).copied().unwrap_or(0)
    }

    pub fn words(&self) -> impl Iterator<Item = &String> {
        self.counts.keys()
    }

    /// The raw word -> count map, for serialization and export.
    pub fn counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    /// Records one confirmed occurrence of `word`, keeping the count, the
    /// amplified cache, and the similarity index consistent in a single
    /// mutation. For a known word the count goes up by one and every cluster
    /// member's amplified score follows. A new word enters with count 1,
    /// gets folded into the index, bumps each existing neighbor's amplified
    /// score by one, and absorbs the neighbors' raw counts into its own.
    pub fn record_occurrence(&mut self, word: &str, index: &mut SimilarityIndex) {
        if self.counts.contains_key(word) {
            *self.counts.entry(word.to_string()).or_insert(0) += 1;
            if let Some(set) = index.similar(word) {
                for member in set {
                    *self.amplified.entry(member.clone()).or_insert(0) += 1;
                }
            }
        } else {
            self.counts.insert(word.to_string(), 1);
            self.amplified.insert(word.to_string(), 1);

            let neighbors = index.insert_new_word(word);
            let mut inherited = 0;
            for neighbor in &neighbors {
                *self.amplified.entry(neighbor.clone()).or_insert(0) += 1;
                inherited += self.count(neighbor);
            }
            if let Some(own) = self.amplified.get_mut(word) {
                *own += inherited;
            }
        }
    }

    /// Recomputes the amplified cache from scratch. Only needed right after
    /// loading, when the cache is empty or the index was rebuilt.
    pub fn rebuild_amplified(&mut self, index: &SimilarityIndex) {
        self.amplified = self
            .counts
            .keys()
            .map(|word| {
                let total = match index.similar(word) {
                    Some(set) => set.iter().map(|member| self.count(member)).sum(),
                    None => self.count(word),
                };
                (word.clone(), total)
            })
            .collect();
    }
}
