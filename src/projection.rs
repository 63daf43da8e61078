//! Read-only views of a session, shaped for drawing.

use crate::session::{GuessSession, Outcome};
use crate::tiles::TileState;

/// Colour class of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Exact,
    Present,
    Absent,
    /// Not yet submitted
    Neutral,
}

impl From<TileState> for Tone {
    fn from(state: TileState) -> Self {
        match state {
            TileState::Exact => Tone::Exact,
            TileState::Present => Tone::Present,
            TileState::Absent => Tone::Absent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileView {
    /// Uppercase letter, or `None` for an empty cell
    pub letter: Option<char>,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub tiles: Vec<TileView>,
    /// The row currently receiving input
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverView {
    pub word_upper: String,
    pub definition: String,
    pub outcome: Outcome,
}

/// Square grid of word-length rows; submitted rows carry their colours
pub fn board(session: &GuessSession) -> BoardView {
    let len = session.word_len();
    let active_row = (!session.is_over()).then_some(session.current_row());

    let rows = session
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, guess)| {
            let active = active_row == Some(idx);
            let letters = if active {
                session.current_input()
            } else {
                guess.as_str()
            };
            let tones: Vec<Tone> = match session.row_states(idx) {
                Some(states) => states.into_iter().map(Tone::from).collect(),
                None => vec![Tone::Neutral; len],
            };
            let mut chars = letters.chars().map(|c| c.to_ascii_uppercase());
            let tiles = tones
                .into_iter()
                .map(|tone| TileView {
                    letter: chars.next(),
                    tone,
                })
                .collect();
            RowView { tiles, active }
        })
        .collect();

    BoardView { rows }
}

pub fn game_over(session: &GuessSession) -> Option<GameOverView> {
    let outcome = session.outcome()?;
    Some(GameOverView {
        word_upper: session.round().word().to_uppercase(),
        definition: session.round().definition().to_string(),
        outcome,
    })
}
