// File: src/core/navigation.rs
use crate::core::candidates::CandidatePool;
use crate::core::types::{ControlKey, Outcome};

/// Cursor over the prefix-narrowed candidate list. The host text field owns
/// the actual typing; this controller reacts to the recognized control keys,
/// tracks the effective user-typed prefix, and says what to put in the
/// field. It never runs out of range: the index is applied modulo the
/// narrowed list's length.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    prefix: String,
    index: usize,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Handles one key event against the current pool. `text` and `caret`
    /// describe the guess field as it was when the key arrived, before the
    /// host applies the key itself.
    pub fn on_input(
        &mut self,
        key: Option<ControlKey>,
        text: &str,
        caret: usize,
        pool: &CandidatePool,
    ) -> Outcome {
        let Some(key) = key else {
            // Plain typing: re-evaluate the narrowing prefix, nothing else.
            let prefix = text.to_lowercase();
            if prefix != self.prefix {
                self.prefix = prefix;
                self.index = 0;
            }
            return Outcome::Idle;
        };

        if key == ControlKey::Submit {
            self.prefix.clear();
            self.index = 0;
            return Outcome::ClearGuess;
        }

        match key {
            // Caret movement re-derives the prefix from the field text.
            ControlKey::Left => self.prefix = prefix_upto(text, caret.saturating_sub(1)),
            ControlKey::Right => self.prefix = prefix_upto(text, caret + 1),
            _ => {}
        }

        let narrowed = pool.narrowed(&self.prefix);
        if narrowed.is_empty() {
            self.index = 0;
            return Outcome::Idle;
        }

        let len = narrowed.len();
        self.index = match key {
            ControlKey::Up => {
                if self.index == 0 {
                    len - 1
                } else {
                    self.index - 1
                }
            }
            ControlKey::Down => (self.index + 1) % len,
            // Left/Right: keep the cursor, remapped onto the new list.
            _ => self.index % len,
        };

        Outcome::SetGuess(narrowed[self.index % len].clone())
    }
}

/// Lower-cased field text truncated to `n` characters.
fn prefix_upto(text: &str, n: usize) -> String {
    text.chars().take(n).collect::<String>().to_lowercase()
}
