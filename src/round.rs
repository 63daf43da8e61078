use crate::error::WordSourceError;

/// One hint is allowed for every this many letters of the target word
pub const LETTERS_PER_HINT: usize = 3;

/// A target word and its definition, fixed for the lifetime of a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    word: String,
    definition: String,
}

#[allow(clippy::len_without_is_empty)]
impl Round {
    /// Normalizes the word to lowercase and rejects anything a player could
    /// not type on the board (empty words, digits, punctuation, non-ascii).
    pub fn new(word: impl AsRef<str>, definition: impl Into<String>) -> Result<Self, WordSourceError> {
        let word = word.as_ref().trim().to_lowercase();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WordSourceError::InvalidWord { word });
        }

        Ok(Self {
            word,
            definition: definition.into().trim().to_string(),
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Word length, which is also the board width and the number of attempts
    pub fn len(&self) -> usize {
        self.word.len()
    }

    pub fn max_hints(&self) -> usize {
        self.len() / LETTERS_PER_HINT
    }

    pub fn letter_at(&self, idx: usize) -> Option<char> {
        self.word.as_bytes().get(idx).map(|b| *b as char)
    }

    pub fn matches(&self, guess: &str) -> bool {
        self.word.eq_ignore_ascii_case(guess)
    }
}
