use crate::round::Round;
use crate::tiles::{classify, TileState};
use crate::timer::Countdown;

/// How a finished round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    /// Every row was used without finding the word
    OutOfAttempts,
    /// The extreme mode clock ran out
    TimedOut,
}

/// Result of pressing enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Round already over or the guess is incomplete
    Rejected,
    /// Guess recorded, play continues on the next row
    Recorded,
    Finished(Outcome),
}

/// Result of asking for a hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintResult {
    Granted(char),
    /// Every hint of the round has been spent
    NoneLeft,
    /// Round over or the current guess is already full
    Ignored,
}

/// Mutable play state over a single round
#[derive(Debug, Clone)]
pub struct GuessSession {
    round: Round,
    rows: Vec<String>,
    current_row: usize,
    input: String,
    hints_used: usize,
    outcome: Option<Outcome>,
    timer: Countdown,
}

impl GuessSession {
    pub fn new(round: Round) -> Self {
        let len = round.len();
        Self {
            rows: vec![String::new(); len],
            current_row: 0,
            input: String::with_capacity(len),
            hints_used: 0,
            outcome: None,
            timer: Countdown::for_word_len(len),
            round,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn word_len(&self) -> usize {
        self.round.len()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn current_input(&self) -> &str {
        &self.input
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    pub fn max_hints(&self) -> usize {
        self.round.max_hints()
    }

    pub fn hints_remaining(&self) -> usize {
        self.max_hints().saturating_sub(self.hints_used)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn won(&self) -> bool {
        self.outcome == Some(Outcome::Won)
    }

    pub fn extreme_mode(&self) -> bool {
        self.timer.is_engaged()
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    /// True while an external driver should be calling [`GuessSession::tick`]
    pub fn clock_running(&self) -> bool {
        !self.is_over() && self.timer.is_running()
    }

    /// Tile states for a submitted row, `None` for rows not yet played
    pub fn row_states(&self, row: usize) -> Option<Vec<TileState>> {
        if row >= self.current_row {
            return None;
        }
        self.rows
            .get(row)
            .map(|guess| classify(guess, self.round.word()))
    }

    fn input_full(&self) -> bool {
        self.input.len() >= self.word_len()
    }

    fn push_letter(&mut self, c: char) {
        self.input.push(c.to_ascii_lowercase());
        self.timer.start();
    }

    /// Appends an alphabetic character to the current guess. Returns whether it was taken.
    pub fn handle_character(&mut self, c: char) -> bool {
        if self.is_over() || !c.is_ascii_alphabetic() || self.input_full() {
            return false;
        }
        self.push_letter(c);
        true
    }

    pub fn handle_backspace(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.input.pop().is_some()
    }

    pub fn submit_guess(&mut self) -> Submission {
        if self.is_over() || self.input.len() != self.word_len() {
            return Submission::Rejected;
        }

        let guess = std::mem::take(&mut self.input);
        let solved = self.round.matches(&guess);
        self.rows[self.current_row] = guess;
        self.current_row += 1;

        // a correct guess on the final row still counts as a win
        let outcome = if solved {
            Outcome::Won
        } else if self.current_row == self.word_len() {
            Outcome::OutOfAttempts
        } else {
            return Submission::Recorded;
        };

        self.outcome = Some(outcome);
        Submission::Finished(outcome)
    }

    /// Types the next correct letter for the player, capped at floor(len / 3) per round
    pub fn request_hint(&mut self) -> HintResult {
        if self.is_over() {
            return HintResult::Ignored;
        }
        if self.hints_used >= self.max_hints() {
            return HintResult::NoneLeft;
        }
        let Some(letter) = self.round.letter_at(self.input.len()) else {
            return HintResult::Ignored;
        };

        self.push_letter(letter);
        self.hints_used += 1;
        HintResult::Granted(letter)
    }

    /// Flips extreme mode. Returns the new setting, or `None` once the round is over.
    pub fn toggle_extreme_mode(&mut self) -> Option<bool> {
        if self.is_over() {
            return None;
        }
        if self.timer.is_engaged() {
            self.timer.disengage();
        } else {
            self.timer.engage();
        }
        Some(self.timer.is_engaged())
    }

    /// One second of extreme mode. Returns true when this tick ended the round.
    pub fn tick(&mut self) -> bool {
        if !self.clock_running() {
            return false;
        }
        if self.timer.tick() {
            self.outcome = Some(Outcome::TimedOut);
            return true;
        }
        false
    }
}
