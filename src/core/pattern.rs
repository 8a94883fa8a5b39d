// File: src/core/pattern.rs

/// Character standing in for a still-hidden letter in the masked secret.
pub const PLACEHOLDER: char = '_';

/// Shape constraints parsed from the masked secret string: the length of
/// each space-separated token, and the first letter the game has revealed
/// (as an offset into the whole string, spaces included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPattern {
    token_lengths: Vec<usize>,
    known_letter: Option<(usize, char)>,
}

impl SecretPattern {
    /// Parses a masked secret such as `"__k_ ___"`. The known letter, when
    /// any letter is revealed, is the first ASCII-alphabetic character in
    /// the string; its offset may fall inside any token.
    pub fn parse(masked: &str) -> Self {
        let token_lengths = masked.split(' ').map(|t| t.chars().count()).collect();
        let known_letter = masked
            .chars()
            .enumerate()
            .find(|(_, c)| c.is_ascii_alphabetic());
        Self {
            token_lengths,
            known_letter,
        }
    }

    pub fn token_lengths(&self) -> &[usize] {
        &self.token_lengths
    }

    pub fn known_letter(&self) -> Option<(usize, char)> {
        self.known_letter
    }

    /// True when the word has the same per-token length signature and, if a
    /// letter is known, carries it at the same global offset.
    pub fn matches(&self, word: &str) -> bool {
        let signature_matches = word
            .split(' ')
            .map(|t| t.chars().count())
            .eq(self.token_lengths.iter().copied());
        if !signature_matches {
            return false;
        }
        match self.known_letter {
            Some((offset, letter)) => word.chars().nth(offset) == Some(letter),
            None => true,
        }
    }
}

/// True while at least one letter is still masked.
pub fn still_hidden(masked: &str) -> bool {
    masked.contains(PLACEHOLDER)
}

/// True once every placeholder has been resolved.
pub fn fully_revealed(masked: &str) -> bool {
    !masked.contains(PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_token_lengths() {
        let pattern = SecretPattern::parse("____ __");
        assert_eq!(pattern.token_lengths(), [4, 2]);
        assert_eq!(pattern.known_letter(), None);
    }

    #[test]
    fn parse_finds_the_first_revealed_letter() {
        assert_eq!(SecretPattern::parse("__k_").known_letter(), Some((2, 'k')));
        // The offset is global, so a letter in the second token counts
        // positions across the space.
        assert_eq!(
            SecretPattern::parse("___ a__").known_letter(),
            Some((4, 'a'))
        );
    }

    #[test]
    fn matches_requires_the_exact_signature() {
        let pattern = SecretPattern::parse("____ __");
        assert!(pattern.matches("cold up"));
        assert!(!pattern.matches("coldup"));
        assert!(!pattern.matches("col dup"));
        assert!(!pattern.matches("cold"));
    }

    #[test]
    fn matches_checks_the_known_letter_offset() {
        let pattern = SecretPattern::parse("c___");
        assert!(pattern.matches("cake"));
        assert!(!pattern.matches("lake"));

        let inner = SecretPattern::parse("___ a__");
        assert!(inner.matches("ice age"));
        assert!(!inner.matches("ice box"));
    }

    #[test]
    fn placeholder_checks() {
        assert!(still_hidden("__k_"));
        assert!(!still_hidden("cake"));
        assert!(fully_revealed("cake"));
        assert!(!fully_revealed("ca_e"));
    }
}
