// File: src/fuzzy/similarity.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Lookalike index over the learned dictionary. For every word it stores the
/// ordered list of words (itself included) that share its token-length
/// structure and lie within a bounded substitution distance, so that guessing
/// one member of a cluster can stand in for guessing any of them.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityIndex {
    /// Maps a word to its similarity set. The set always contains the word
    /// itself; symmetry holds after a full rebuild and is preserved by
    /// `insert_new_word`.
    sets: HashMap<String, Vec<String>>,
}

/// Distance bound for a word: tight for short words, one extra substitution
/// allowed once a word is longer than six characters.
pub fn epsilon(word: &str) -> usize {
    if word.chars().count() > 6 {
        2
    } else {
        1
    }
}

/// Count of positions where the two strings disagree.
///
/// Insertions and deletions are deliberately not modeled: two words are only
/// ever compared when their token-length structures match, which fixes the
/// total length, so substitution cost alone decides similarity. A general
/// edit distance would silently relate words of different lengths and change
/// which clusters form.
pub fn substitution_distance(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).filter(|(x, y)| x != y).count()
}

/// True when the two words are lookalikes: identical per-token length
/// structure (spaces included, position for position) and within the
/// substitution bound.
pub fn are_similar(a: &str, b: &str) -> bool {
    same_token_lengths(a, b) && substitution_distance(a, b) <= epsilon(a)
}

fn same_token_lengths(a: &str, b: &str) -> bool {
    a.split(' ')
        .map(|t| t.chars().count())
        .eq(b.split(' ').map(|t| t.chars().count()))
}

impl SimilarityIndex {
    pub fn new() -> Self {
        Self { sets: HashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.sets.contains_key(word)
    }

    /// The similarity set of `word`, or `None` for words the index has never
    /// seen.
    pub fn similar(&self, word: &str) -> Option<&[String]> {
        self.sets.get(word).map(|s| s.as_slice())
    }

    /// The raw word -> set map, for serialization.
    pub fn sets(&self) -> &HashMap<String, Vec<String>> {
        &self.sets
    }

    /// Recomputes every similarity set from scratch. O(n^2 * L) over the
    /// dictionary; only run when the persisted index has gone stale relative
    /// to the frequency map (first run, or an interrupted save).
    pub fn full_rebuild(words: &[String]) -> Self {
        let started = Instant::now();
        let sets = words
            .iter()
            .map(|w| {
                let similar = words
                    .iter()
                    .filter(|other| are_similar(w, other))
                    .cloned()
                    .collect();
                (w.clone(), similar)
            })
            .collect();
        log::info!(
            "rebuilt similarity index for {} words in {:.3}s",
            words.len(),
            started.elapsed().as_secs_f64()
        );
        Self { sets }
    }

    /// Folds a previously unseen word into the index: the word is appended to
    /// every existing neighbor's set, and its own set becomes those neighbors
    /// plus itself. Returns the existing neighbors so the caller can fold
    /// their counts into the new word's amplified score.
    pub fn insert_new_word(&mut self, word: &str) -> Vec<String> {
        let neighbors: Vec<String> = self
            .sets
            .keys()
            .filter(|existing| are_similar(word, existing))
            .cloned()
            .collect();

        for neighbor in &neighbors {
            if let Some(set) = self.sets.get_mut(neighbor) {
                set.push(word.to_string());
            }
        }

        let mut own_set = neighbors.clone();
        own_set.push(word.to_string());
        self.sets.insert(word.to_string(), own_set);

        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitution_distance_counts_differing_positions() {
        for (a, b, d) in [
            ("cake", "cake", 0),
            ("cake", "lake", 1),
            ("cake", "lace", 2),
            ("night", "light", 1),
        ] {
            assert_eq!(substitution_distance(a, b), d, "{} {}", a, b);
        }
    }

    #[test]
    fn epsilon_widens_past_six_characters() {
        assert_eq!(epsilon("cake"), 1);
        assert_eq!(epsilon("planet"), 1);
        assert_eq!(epsilon("planets"), 2);
    }

    #[test]
    fn token_structure_gates_similarity() {
        // Same total length, different token split.
        assert!(!are_similar("cat dog", "catdogs"));
        // Matching split, one substitution per token.
        assert!(are_similar("ice cream", "ice creak"));
    }

    #[test]
    fn rebuild_is_reflexive_and_symmetric() {
        let words: Vec<String> = ["cake", "lake", "bake", "pier", "pierce"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let index = SimilarityIndex::full_rebuild(&words);

        for w in &words {
            let set = index.similar(w).unwrap();
            assert!(set.contains(w), "{} missing from its own set", w);
            for other in set {
                let back = index.similar(other).unwrap();
                assert!(back.contains(w), "{} -> {} not symmetric", w, other);
            }
        }

        let cake: Vec<&str> = index.similar("cake").unwrap().iter().map(|s| s.as_str()).collect();
        assert_eq!(cake.len(), 3);
        for w in ["cake", "lake", "bake"] {
            assert!(cake.contains(&w));
        }
        assert_eq!(index.similar("pier").unwrap(), ["pier"]);
    }

    #[test]
    fn insert_extends_both_sides() {
        let words: Vec<String> = ["cake", "lake"].iter().map(|s| s.to_string()).collect();
        let mut index = SimilarityIndex::full_rebuild(&words);

        let neighbors = index.insert_new_word("bake");
        assert_eq!(neighbors.len(), 2);
        assert!(index.similar("bake").unwrap().contains(&"bake".to_string()));
        assert!(index.similar("cake").unwrap().contains(&"bake".to_string()));
        assert!(index.similar("lake").unwrap().contains(&"bake".to_string()));

        let loners = index.insert_new_word("pier");
        assert!(loners.is_empty());
        assert_eq!(index.similar("pier").unwrap(), ["pier"]);
    }
}
