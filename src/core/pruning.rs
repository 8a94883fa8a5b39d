// File: src/core/pruning.rs
use crate::fuzzy::similarity::SimilarityIndex;
use std::collections::HashSet;

/// Guess attempts found in the chat transcript. A message shaped
/// `speaker: text` counts as a guess when the text, lower-cased and trimmed,
/// has at most two whitespace-separated tokens; longer texts are chatter.
pub fn guessed_words(messages: &[String]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|message| {
            let (_, text) = message.split_once(':')?;
            let word = text.to_lowercase().trim().to_string();
            (word.split(' ').count() <= 2).then_some(word)
        })
        .collect()
}

/// Every word the transcript has ruled out: each guessed word known to the
/// index contributes its whole similarity set, duplicates collapsed. The set
/// is re-derived from the full transcript every time, so rescanning an
/// unchanged transcript removes nothing new.
pub fn removal_set(messages: &[String], index: &SimilarityIndex) -> HashSet<String> {
    let mut removed = HashSet::new();
    for word in guessed_words(messages) {
        if let Some(set) = index.similar(&word) {
            removed.extend(set.iter().cloned());
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::candidates::CandidatePool;

    fn messages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn guesses_are_short_texts_after_the_speaker() {
        let transcript = messages(&[
            "alice: Lake",
            "bob: ice age",
            "carol: that is a really nice drawing",
            "no colon here",
        ]);
        assert_eq!(guessed_words(&transcript), ["lake", "ice age"]);
    }

    #[test]
    fn a_guess_takes_its_whole_cluster_down() {
        let words: Vec<String> = ["cake", "lake", "bake", "pier"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let index = SimilarityIndex::full_rebuild(&words);
        let mut pool = CandidatePool::from_words(words);

        let removed = removal_set(&messages(&["alice: lake"]), &index);
        pool.remove_all(&removed);

        assert_eq!(pool.words(), ["pier"]);
    }

    #[test]
    fn unknown_guesses_remove_nothing() {
        let words: Vec<String> = ["cake", "pier"].iter().map(|s| s.to_string()).collect();
        let index = SimilarityIndex::full_rebuild(&words);

        let removed = removal_set(&messages(&["bob: zebra"]), &index);
        assert!(removed.is_empty());
    }

    #[test]
    fn rescanning_the_same_transcript_is_idempotent() {
        let words: Vec<String> = ["cake", "lake", "bake", "pier"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let index = SimilarityIndex::full_rebuild(&words);
        let transcript = messages(&["alice: lake", "bob: pier"]);

        let mut pool = CandidatePool::from_words(words);
        pool.remove_all(&removal_set(&transcript, &index));
        let after_first: Vec<String> = pool.words().to_vec();

        pool.remove_all(&removal_set(&transcript, &index));
        assert_eq!(pool.words(), after_first);
        assert!(pool.is_empty());
    }
}
