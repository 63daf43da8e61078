use itertools::{EitherOrBoth, Itertools};

/// Correctness of one guessed letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileState {
    /// Right letter in the right position
    Exact,
    /// Letter occurs somewhere else in the target
    Present,
    Absent,
}

/// Classifies each letter of a completed guess against the target.
///
/// Presence is a plain `contains` check: repeated letters in the guess are
/// each marked present even when the target holds the letter only once.
pub fn classify(guess: &str, target: &str) -> Vec<TileState> {
    guess
        .chars()
        .zip_longest(target.chars())
        .filter_map(|pair| match pair {
            EitherOrBoth::Both(g, t) if g == t => Some(TileState::Exact),
            EitherOrBoth::Both(g, _) | EitherOrBoth::Left(g) => Some(if target.contains(g) {
                TileState::Present
            } else {
                TileState::Absent
            }),
            EitherOrBoth::Right(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TileState::*;

    #[test]
    fn test_exact_match() {
        let states = classify("crane", "crane");
        assert_eq!(states, vec![Exact; 5]);
    }

    #[test]
    fn test_stare_against_crane() {
        assert_eq!(
            classify("stare", "crane"),
            vec![Absent, Absent, Present, Present, Exact]
        );
    }

    #[test]
    fn test_repeated_letters_are_not_rationed() {
        // crane holds a single 'e', yet every 'e' in the guess lights up
        assert_eq!(
            classify("eerie", "crane"),
            vec![Present, Present, Present, Absent, Exact]
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let first = classify("lemon", "melon");
        for _ in 0..5 {
            assert_eq!(classify("lemon", "melon"), first);
        }
    }

    #[test]
    fn test_length_mismatch_does_not_panic() {
        assert_eq!(classify("ab", "abc"), vec![Exact, Exact]);
        assert_eq!(classify("abcd", "abc"), vec![Exact, Exact, Exact, Absent]);
    }
}
