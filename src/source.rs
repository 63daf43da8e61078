use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::WordSourceError;
use crate::round::Round;

pub const DEFAULT_API_URL: &str = "https://random-words-api-one-pearl.vercel.app/word/";

static WORDS_DIR: Dir = include_dir!("src/words");

/// Supplies the target word for a new round
pub trait WordSource: Send + Sync {
    /// Short label for logs and the status line
    fn name(&self) -> &str;
    fn fetch_round(&self) -> Result<Round, WordSourceError>;
}

#[derive(Deserialize, Debug, Clone)]
pub struct WordEntry {
    pub word: String,
    #[serde(default)]
    pub definition: String,
}

/// The api answers with either a bare object or a list holding one
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    One(WordEntry),
    Many(Vec<WordEntry>),
}

pub fn parse_payload(bytes: &[u8]) -> Result<Round, WordSourceError> {
    let entry = match serde_json::from_slice::<Payload>(bytes)? {
        Payload::One(entry) => entry,
        Payload::Many(entries) => entries
            .into_iter()
            .next()
            .ok_or(WordSourceError::EmptyWordList)?,
    };
    Round::new(entry.word, entry.definition)
}

/// Random word api over http
#[derive(Debug, Clone)]
pub struct HttpWordSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpWordSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WordSourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("glyphmare/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl WordSource for HttpWordSource {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch_round(&self) -> Result<Round, WordSourceError> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(WordSourceError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes()?;
        debug!(bytes = body.len(), "word api responded");
        parse_payload(&body)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct WordList {
    pub name: String,
    pub entries: Vec<WordEntry>,
}

/// Word list compiled into the binary, for play without network access
#[derive(Debug, Clone)]
pub struct BundledWordSource {
    list: WordList,
}

impl BundledWordSource {
    pub fn new(list_name: &str) -> Result<Self, WordSourceError> {
        let file = WORDS_DIR
            .get_file(format!("{list_name}.json"))
            .ok_or_else(|| WordSourceError::UnknownWordList {
                name: list_name.to_string(),
            })?;
        let list: WordList = serde_json::from_slice(file.contents())?;
        if list.entries.is_empty() {
            return Err(WordSourceError::EmptyWordList);
        }
        Ok(Self { list })
    }

    pub fn len(&self) -> usize {
        self.list.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.entries.is_empty()
    }
}

impl WordSource for BundledWordSource {
    fn name(&self) -> &str {
        &self.list.name
    }

    fn fetch_round(&self) -> Result<Round, WordSourceError> {
        let entry = self
            .list
            .entries
            .choose(&mut rand::thread_rng())
            .ok_or(WordSourceError::EmptyWordList)?;
        Round::new(&entry.word, entry.definition.clone())
    }
}

/// Always hands out the same word
#[derive(Debug, Clone)]
pub struct FixedWordSource {
    word: String,
    definition: String,
}

impl FixedWordSource {
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
        }
    }
}

impl WordSource for FixedWordSource {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch_round(&self) -> Result<Round, WordSourceError> {
        Round::new(&self.word, self.definition.clone())
    }
}

/// How many times a round fetch is tried before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Linear back-off before the given retry (1-based)
    pub fn delay_before(&self, retry: u32) -> Duration {
        self.delay * retry
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// Fetches a round, retrying failures per the policy and returning the last error
#[instrument(skip_all, fields(source = %source.name(), attempts = policy.attempts()))]
pub fn fetch_with_retry(
    source: &dyn WordSource,
    policy: RetryPolicy,
) -> Result<Round, WordSourceError> {
    let mut attempt = 1;
    loop {
        match source.fetch_round() {
            Ok(round) => {
                info!(attempt, len = round.len(), "round fetched");
                return Ok(round);
            }
            Err(e) if attempt < policy.attempts() => {
                warn!(attempt, error = %e, "round fetch failed, retrying");
                std::thread::sleep(policy.delay_before(attempt));
                attempt += 1;
            }
            Err(e) => {
                warn!(attempt, error = %e, "round fetch failed, giving up");
                return Err(e);
            }
        }
    }
}
