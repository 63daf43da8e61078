use tracing::{debug, error, info, warn};

use crate::error::WordSourceError;
use crate::round::Round;
use crate::score::{RoundRecord, ScoreStore, ScoreSummary};
use crate::session::{GuessSession, HintResult, Outcome, Submission};

/// Identifies one `start_round` call so late fetch results can be told apart
pub type RequestId = u64;

/// Where the controller is in the round lifecycle
#[derive(Debug)]
pub enum Phase {
    /// Waiting on the word source
    Loading { request: RequestId },
    /// The word source gave up; the player may retry
    Failed { reason: String },
    /// A round is in play or has just finished
    Playing(GuessSession),
}

/// Transient message shown under the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Notice {
    #[strum(to_string = "No more hints for you!")]
    NoMoreHints,
}

/// History shown on the stats screen
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub summary: ScoreSummary,
    pub recent: Vec<RoundRecord>,
}

/// Owns the round state and is the only thing allowed to change it
pub struct Game {
    phase: Phase,
    last_request: RequestId,
    score_store: Box<dyn ScoreStore>,
    score: u64,
    notice: Option<Notice>,
}

impl Game {
    pub fn new(score_store: Box<dyn ScoreStore>) -> Self {
        let score = score_store.current().unwrap_or_else(|e| {
            warn!(error = %e, "could not read stored score");
            0
        });
        Self {
            phase: Phase::Loading { request: 0 },
            last_request: 0,
            score_store,
            score,
            notice: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&GuessSession> {
        match &self.phase {
            Phase::Playing(session) => Some(session),
            _ => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut GuessSession> {
        match &mut self.phase {
            Phase::Playing(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// True while the extreme mode clock should be driven by `tick`
    pub fn clock_running(&self) -> bool {
        self.session().is_some_and(GuessSession::clock_running)
    }

    /// Enters the loading state and hands back the id the fetch result must carry
    pub fn start_round(&mut self) -> RequestId {
        self.last_request += 1;
        self.phase = Phase::Loading {
            request: self.last_request,
        };
        self.notice = None;
        info!(request = self.last_request, "requesting new round");
        self.last_request
    }

    /// Drops every trace of the current round and requests a fresh one
    pub fn reset_game(&mut self) -> RequestId {
        debug!("resetting game");
        self.start_round()
    }

    /// Applies a fetch result. Returns false for results nobody is waiting on.
    pub fn round_loaded(
        &mut self,
        request: RequestId,
        result: Result<Round, WordSourceError>,
    ) -> bool {
        match self.phase {
            Phase::Loading { request: pending } if pending == request => {}
            _ => {
                debug!(request, "discarding stale round");
                return false;
            }
        }

        self.phase = match result {
            Ok(round) => {
                info!(len = round.len(), max_hints = round.max_hints(), "round started");
                Phase::Playing(GuessSession::new(round))
            }
            Err(e) => {
                error!(error = %e, "could not load a round");
                Phase::Failed {
                    reason: e.to_string(),
                }
            }
        };
        true
    }

    pub fn handle_character(&mut self, c: char) -> bool {
        let accepted = self
            .session_mut()
            .is_some_and(|session| session.handle_character(c));
        if accepted {
            self.notice = None;
        }
        accepted
    }

    pub fn handle_backspace(&mut self) -> bool {
        let accepted = self
            .session_mut()
            .is_some_and(GuessSession::handle_backspace);
        if accepted {
            self.notice = None;
        }
        accepted
    }

    pub fn submit_guess(&mut self) -> Submission {
        let Some(session) = self.session_mut() else {
            return Submission::Rejected;
        };
        let submission = session.submit_guess();
        match submission {
            Submission::Finished(outcome) => {
                let record = RoundRecord::from(&*session);
                self.settle(outcome, record);
            }
            Submission::Recorded => {
                debug!(row = session.current_row(), "guess recorded");
                self.notice = None;
            }
            Submission::Rejected => {}
        }
        submission
    }

    pub fn request_hint(&mut self) -> HintResult {
        let Some(session) = self.session_mut() else {
            return HintResult::Ignored;
        };
        let result = session.request_hint();
        match result {
            HintResult::Granted(letter) => {
                debug!(%letter, used = session.hints_used(), "hint granted");
                self.notice = None;
            }
            HintResult::NoneLeft => self.notice = Some(Notice::NoMoreHints),
            HintResult::Ignored => {}
        }
        result
    }

    pub fn toggle_extreme_mode(&mut self) -> Option<bool> {
        let enabled = self.session_mut()?.toggle_extreme_mode()?;
        info!(enabled, "extreme mode toggled");
        Some(enabled)
    }

    /// One second of the extreme mode clock. Returns true when time ran out.
    pub fn tick(&mut self) -> bool {
        let Some(session) = self.session_mut() else {
            return false;
        };
        if !session.tick() {
            return false;
        }
        let record = RoundRecord::from(&*session);
        self.settle(Outcome::TimedOut, record);
        true
    }

    fn settle(&mut self, outcome: Outcome, record: RoundRecord) {
        info!(?outcome, word = %record.word, guesses = record.guesses, "round over");
        if outcome == Outcome::Won {
            match self.score_store.increment_and_get() {
                Ok(score) => self.score = score,
                Err(e) => {
                    warn!(error = %e, "could not persist score");
                    self.score += 1;
                }
            }
        }
        if let Err(e) = self.score_store.record_round(&record) {
            warn!(error = %e, "could not record round");
        }
        self.notice = None;
    }

    pub fn stats(&self, limit: usize) -> StatsSnapshot {
        let summary = self.score_store.summary().unwrap_or_else(|e| {
            warn!(error = %e, "could not read score summary");
            ScoreSummary::default()
        });
        let recent = self.score_store.recent_rounds(limit).unwrap_or_else(|e| {
            warn!(error = %e, "could not read round history");
            Vec::new()
        });
        StatsSnapshot { summary, recent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoreError;
    use crate::score::MemoryScoreStore;
    use assert_matches::assert_matches;

    fn game_with(word: &str) -> Game {
        let mut game = Game::new(Box::new(MemoryScoreStore::default()));
        let request = game.start_round();
        assert!(game.round_loaded(request, Round::new(word, "definition")));
        game
    }

    fn type_word(game: &mut Game, word: &str) {
        for c in word.chars() {
            game.handle_character(c);
        }
    }

    /// Store whose writes always fail
    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn current(&self) -> Result<u64, ScoreError> {
            Err(std::io::Error::other("gone").into())
        }
        fn increment_and_get(&mut self) -> Result<u64, ScoreError> {
            Err(std::io::Error::other("gone").into())
        }
        fn record_round(&mut self, _: &RoundRecord) -> Result<(), ScoreError> {
            Err(std::io::Error::other("gone").into())
        }
        fn recent_rounds(&self, _: usize) -> Result<Vec<RoundRecord>, ScoreError> {
            Err(std::io::Error::other("gone").into())
        }
        fn summary(&self) -> Result<ScoreSummary, ScoreError> {
            Err(std::io::Error::other("gone").into())
        }
    }

    #[test]
    fn test_loading_until_round_arrives() {
        let mut game = Game::new(Box::new(MemoryScoreStore::default()));
        let request = game.start_round();
        assert!(game.is_loading());
        assert!(!game.handle_character('a'));
        assert_eq!(game.submit_guess(), Submission::Rejected);

        assert!(game.round_loaded(request, Round::new("crane", "bird")));
        assert!(!game.is_loading());
        assert_eq!(game.session().unwrap().round().word(), "crane");
    }

    #[test]
    fn test_stale_round_is_discarded() {
        let mut game = Game::new(Box::new(MemoryScoreStore::default()));
        let first = game.start_round();
        let second = game.start_round();

        assert!(!game.round_loaded(first, Round::new("stale", "")));
        assert!(game.is_loading());
        assert!(game.round_loaded(second, Round::new("fresh", "")));
        assert_eq!(game.session().unwrap().round().word(), "fresh");

        // a late duplicate never replaces the round in play
        assert!(!game.round_loaded(second, Round::new("other", "")));
        assert_eq!(game.session().unwrap().round().word(), "fresh");
    }

    #[test]
    fn test_fetch_failure_is_surfaced() {
        let mut game = Game::new(Box::new(MemoryScoreStore::default()));
        let request = game.start_round();
        game.round_loaded(request, Err(WordSourceError::Status { status: 502 }));
        assert_matches!(game.phase(), Phase::Failed { reason } if reason.contains("502"));

        let retry = game.start_round();
        assert!(game.is_loading());
        assert!(game.round_loaded(retry, Round::new("crane", "")));
    }

    #[test]
    fn test_win_increments_score_once() {
        let mut game = game_with("crane");
        assert_eq!(game.score(), 0);
        type_word(&mut game, "crane");
        assert_eq!(game.submit_guess(), Submission::Finished(Outcome::Won));
        assert_eq!(game.score(), 1);

        // further submits on a finished round change nothing
        assert_eq!(game.submit_guess(), Submission::Rejected);
        assert_eq!(game.score(), 1);

        let stats = game.stats(10);
        assert_eq!(stats.summary, ScoreSummary { played: 1, won: 1 });
        assert_eq!(stats.recent[0].word, "crane");
    }

    #[test]
    fn test_loss_records_without_scoring() {
        let mut game = game_with("ox");
        for guess in ["no", "so"] {
            type_word(&mut game, guess);
            game.submit_guess();
        }
        let session = game.session().unwrap();
        assert!(session.is_over());
        assert!(!session.won());
        assert_eq!(game.score(), 0);
        assert_eq!(game.stats(10).summary, ScoreSummary { played: 1, won: 0 });
    }

    #[test]
    fn test_score_carries_across_rounds() {
        let mut game = game_with("cat");
        type_word(&mut game, "cat");
        game.submit_guess();

        let request = game.reset_game();
        game.round_loaded(request, Round::new("dog", ""));
        type_word(&mut game, "dog");
        game.submit_guess();
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn test_reset_wipes_round_state() {
        let mut game = game_with("crane");
        game.toggle_extreme_mode();
        game.request_hint();
        type_word(&mut game, "ra");

        let request = game.reset_game();
        assert!(game.session().is_none());
        game.round_loaded(request, Round::new("ghost", ""));

        let session = game.session().unwrap();
        assert_eq!(session.current_input(), "");
        assert_eq!(session.hints_used(), 0);
        assert!(!session.extreme_mode());
        assert!(!session.timer().is_started());
    }

    #[test]
    fn test_hint_notice() {
        let mut game = game_with("crane");
        assert_eq!(game.request_hint(), HintResult::Granted('c'));
        assert_eq!(game.notice(), None);
        assert_eq!(game.request_hint(), HintResult::NoneLeft);
        assert_eq!(game.notice(), Some(Notice::NoMoreHints));
        assert_eq!(
            game.notice().map(|n| n.to_string()).as_deref(),
            Some("No more hints for you!")
        );

        game.handle_character('r');
        assert_eq!(game.notice(), None);
        assert_eq!(game.session().unwrap().hints_used(), 1);
    }

    #[test]
    fn test_timeout_records_loss() {
        let mut game = game_with("crane");
        assert_eq!(game.toggle_extreme_mode(), Some(true));
        assert!(!game.clock_running());
        game.handle_character('c');
        assert!(game.clock_running());

        let mut ticks = 0;
        while !game.tick() {
            ticks += 1;
            assert!(ticks < 100, "clock never ran out");
        }
        assert_eq!(ticks + 1, 35);
        assert_eq!(game.session().unwrap().outcome(), Some(Outcome::TimedOut));
        assert!(!game.clock_running());
        assert!(!game.tick());
        assert_eq!(game.stats(1).summary.played, 1);
    }

    #[test]
    fn test_broken_store_never_blocks_play() {
        let mut game = Game::new(Box::new(BrokenStore));
        assert_eq!(game.score(), 0);
        let request = game.start_round();
        game.round_loaded(request, Round::new("cat", ""));
        type_word(&mut game, "cat");
        assert_eq!(game.submit_guess(), Submission::Finished(Outcome::Won));
        assert_eq!(game.score(), 1);

        let stats = game.stats(5);
        assert_eq!(stats.summary, ScoreSummary::default());
        assert!(stats.recent.is_empty());
    }
}
