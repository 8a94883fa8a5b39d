// File: src/core/candidates.rs
use crate::core::pattern::SecretPattern;
use crate::learning::FrequencyModel;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Ordered list of dictionary words still eligible as guesses for the round
/// in progress. Rebuilt on every pattern reveal, shrunk as guesses show up
/// in chat, dropped when the round ends.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    words: Vec<String>,
}

impl CandidatePool {
    /// Selects and ranks dictionary words for the given pattern. Matches are
    /// shuffled before the stable sort by amplified score, so words tied on
    /// score come out in a fresh relative order every round instead of the
    /// same top suggestions in the same sequence.
    pub fn generate(pattern: &SecretPattern, model: &FrequencyModel) -> Self {
        let mut words: Vec<String> = model
            .words()
            .filter(|w| pattern.matches(w))
            .cloned()
            .collect();
        words.shuffle(&mut rand::thread_rng());
        words.sort_by_key(|w| Reverse(model.amplified(w)));
        for word in &mut words {
            *word = word.to_lowercase();
        }
        Self { words }
    }

    pub fn from_words(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Members whose lower-cased form starts with the lower-cased prefix, in
    /// pool order. The empty prefix yields the whole pool.
    pub fn narrowed(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.words
            .iter()
            .filter(|w| w.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Drops every member present in `removed`.
    pub fn remove_all(&mut self, removed: &HashSet<String>) {
        self.words.retain(|w| !removed.contains(w));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::similarity::SimilarityIndex;
    use std::collections::HashMap;

    fn model_with(words: &[(&str, u64)]) -> FrequencyModel {
        let counts: HashMap<String, u64> = words
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect();
        let word_list: Vec<String> = counts.keys().cloned().collect();
        let index = SimilarityIndex::full_rebuild(&word_list);
        let mut model = FrequencyModel::from_counts(counts);
        model.rebuild_amplified(&index);
        model
    }

    #[test]
    fn generate_keeps_only_matching_signatures() {
        let model = model_with(&[("cake", 2), ("pier", 1), ("bread", 1), ("ice age", 1)]);
        let pool = CandidatePool::generate(&SecretPattern::parse("____"), &model);

        assert_eq!(pool.len(), 2);
        for word in pool.words() {
            assert_eq!(word.chars().count(), 4);
        }
    }

    #[test]
    fn generate_honors_the_known_letter() {
        let model = model_with(&[("cake", 2), ("lake", 5), ("pier", 1)]);
        let pool = CandidatePool::generate(&SecretPattern::parse("c___"), &model);
        assert_eq!(pool.words(), ["cake"]);
    }

    #[test]
    fn generate_ranks_by_amplified_score() {
        // cake stands alone; pier/pies form a cluster with lower totals.
        let model = model_with(&[("cake", 3), ("pier", 1), ("pies", 0)]);
        let pool = CandidatePool::generate(&SecretPattern::parse("____"), &model);

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.words()[0], "cake");
    }

    #[test]
    fn tied_candidates_are_not_always_in_the_same_order() {
        let model = model_with(&[("aaaa", 1), ("bbbb", 1), ("cccc", 1)]);
        let pattern = SecretPattern::parse("____");

        let mut seen = HashSet::new();
        for _ in 0..40 {
            let pool = CandidatePool::generate(&pattern, &model);
            seen.insert(pool.words().to_vec());
        }
        assert!(seen.len() > 1, "tie order never varied across 40 rounds");
    }

    #[test]
    fn narrowing_is_case_insensitive_prefix_match() {
        let pool = CandidatePool::from_words(
            ["cake", "cart", "lake"].iter().map(|s| s.to_string()).collect(),
        );
        assert_eq!(pool.narrowed("ca"), ["cake", "cart"]);
        assert_eq!(pool.narrowed("CA"), ["cake", "cart"]);
        assert_eq!(pool.narrowed(""), ["cake", "cart", "lake"]);
        assert!(pool.narrowed("z").is_empty());
    }

    #[test]
    fn remove_all_drops_listed_members() {
        let mut pool = CandidatePool::from_words(
            ["cake", "lake", "pier"].iter().map(|s| s.to_string()).collect(),
        );
        let removed: HashSet<String> = ["cake", "lake"].iter().map(|s| s.to_string()).collect();
        pool.remove_all(&removed);
        assert_eq!(pool.words(), ["pier"]);
    }
}
