use derive_more::{Display, Error, From};

/// Reasons a word source could not produce a playable round
#[derive(Debug, Display, Error, From)]
pub enum WordSourceError {
    #[display("word request failed: {_0}")]
    #[from]
    Http(reqwest::Error),

    #[display("word api answered with status {status}")]
    Status { status: u16 },

    #[display("could not decode word payload: {_0}")]
    #[from]
    Decode(serde_json::Error),

    #[display("unplayable word {word:?}")]
    InvalidWord { word: String },

    #[display("word list {name:?} is not bundled")]
    UnknownWordList { name: String },

    #[display("word list is empty")]
    EmptyWordList,
}

/// Failures of the persistent score store
#[derive(Debug, Display, Error, From)]
pub enum ScoreError {
    #[display("score database error: {_0}")]
    Sqlite(rusqlite::Error),

    #[display("could not prepare score directory: {_0}")]
    Io(std::io::Error),
}
