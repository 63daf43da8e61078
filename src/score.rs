use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app_dirs::AppDirs;
use crate::error::ScoreError;
use crate::session::GuessSession;

const SCORE_KEY: &str = "score";

/// A finished round as kept in the history table
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub word: String,
    pub won: bool,
    pub guesses: usize,
    pub hints: usize,
    pub extreme: bool,
    pub finished_at: DateTime<Local>,
}

impl From<&GuessSession> for RoundRecord {
    fn from(session: &GuessSession) -> Self {
        Self {
            word: session.round().word().to_string(),
            won: session.won(),
            guesses: session.current_row(),
            hints: session.hints_used(),
            extreme: session.extreme_mode(),
            finished_at: Local::now(),
        }
    }
}

/// Totals over every recorded round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    pub played: u64,
    pub won: u64,
}

impl ScoreSummary {
    /// Percentage of rounds won, 0 when nothing has been played
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            self.won as f64 / self.played as f64 * 100.0
        }
    }
}

/// Persistent win counter plus a history of finished rounds
pub trait ScoreStore {
    fn current(&self) -> Result<u64, ScoreError>;
    /// Bumps the win counter and returns the new value
    fn increment_and_get(&mut self) -> Result<u64, ScoreError>;
    fn record_round(&mut self, record: &RoundRecord) -> Result<(), ScoreError>;
    /// Most recent rounds first
    fn recent_rounds(&self, limit: usize) -> Result<Vec<RoundRecord>, ScoreError>;
    fn summary(&self) -> Result<ScoreSummary, ScoreError>;
}

/// SQLite backed store under `$HOME/.local/state/glyphmare`
#[derive(Debug)]
pub struct SqliteScoreStore {
    conn: Connection,
}

impl SqliteScoreStore {
    pub fn open_default() -> Result<Self, ScoreError> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("glyphmare_scores.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "opening score database");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, ScoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, ScoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS score (name TEXT PRIMARY KEY, value INTEGER NOT NULL)",
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS rounds (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL,
                won BOOLEAN NOT NULL,
                guesses INTEGER NOT NULL,
                hints INTEGER NOT NULL,
                extreme BOOLEAN NOT NULL,
                finished_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_rounds_finished_at ON rounds(finished_at)",
            [],
        )?;

        Ok(Self { conn })
    }
}

impl ScoreStore for SqliteScoreStore {
    fn current(&self) -> Result<u64, ScoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM score WHERE name = ?1",
                [SCORE_KEY],
                |row| row.get::<_, u64>(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    fn increment_and_get(&mut self) -> Result<u64, ScoreError> {
        let tx = self.conn.transaction()?;
        let current = tx
            .query_row(
                "SELECT value FROM score WHERE name = ?1",
                [SCORE_KEY],
                |row| row.get::<_, u64>(0),
            )
            .optional()?
            .unwrap_or(0);
        let next = current + 1;

        tx.execute(
            r#"
            INSERT INTO score (name, value) VALUES (?1, ?2)
            ON CONFLICT(name) DO UPDATE SET value = excluded.value
            "#,
            params![SCORE_KEY, next],
        )?;
        tx.commit()?;

        debug!(score = next, "score incremented");
        Ok(next)
    }

    fn record_round(&mut self, record: &RoundRecord) -> Result<(), ScoreError> {
        self.conn.execute(
            r#"
            INSERT INTO rounds (word, won, guesses, hints, extreme, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.word,
                record.won,
                record.guesses,
                record.hints,
                record.extreme,
                record.finished_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn recent_rounds(&self, limit: usize) -> Result<Vec<RoundRecord>, ScoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT word, won, guesses, hints, extreme, finished_at
            FROM rounds
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit], |row| {
            let finished_at: String = row.get(5)?;
            let finished_at = DateTime::parse_from_rfc3339(&finished_at)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Local);

            Ok(RoundRecord {
                word: row.get(0)?,
                won: row.get(1)?,
                guesses: row.get(2)?,
                hints: row.get(3)?,
                extreme: row.get(4)?,
                finished_at,
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    fn summary(&self) -> Result<ScoreSummary, ScoreError> {
        let summary = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN won THEN 1 ELSE 0 END), 0) FROM rounds",
            [],
            |row| {
                Ok(ScoreSummary {
                    played: row.get(0)?,
                    won: row.get(1)?,
                })
            },
        )?;
        Ok(summary)
    }
}

/// Store that lives only as long as the process; used when the database
/// cannot be opened and as a test double
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    score: u64,
    rounds: Vec<RoundRecord>,
}

impl ScoreStore for MemoryScoreStore {
    fn current(&self) -> Result<u64, ScoreError> {
        Ok(self.score)
    }

    fn increment_and_get(&mut self) -> Result<u64, ScoreError> {
        self.score += 1;
        Ok(self.score)
    }

    fn record_round(&mut self, record: &RoundRecord) -> Result<(), ScoreError> {
        self.rounds.push(record.clone());
        Ok(())
    }

    fn recent_rounds(&self, limit: usize) -> Result<Vec<RoundRecord>, ScoreError> {
        Ok(self.rounds.iter().rev().take(limit).cloned().collect())
    }

    fn summary(&self) -> Result<ScoreSummary, ScoreError> {
        Ok(ScoreSummary {
            played: self.rounds.len() as u64,
            won: self.rounds.iter().filter(|r| r.won).count() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, won: bool) -> RoundRecord {
        RoundRecord {
            word: word.to_string(),
            won,
            guesses: 3,
            hints: 1,
            extreme: false,
            finished_at: Local::now(),
        }
    }

    #[test]
    fn test_sqlite_score_starts_at_zero() {
        let store = SqliteScoreStore::in_memory().unwrap();
        assert_eq!(store.current().unwrap(), 0);
    }

    #[test]
    fn test_sqlite_increment_is_monotonic() {
        let mut store = SqliteScoreStore::in_memory().unwrap();
        assert_eq!(store.increment_and_get().unwrap(), 1);
        assert_eq!(store.increment_and_get().unwrap(), 2);
        assert_eq!(store.increment_and_get().unwrap(), 3);
        assert_eq!(store.current().unwrap(), 3);
    }

    #[test]
    fn test_sqlite_round_history() {
        let mut store = SqliteScoreStore::in_memory().unwrap();
        store.record_round(&record("crane", true)).unwrap();
        store.record_round(&record("plant", false)).unwrap();
        store.record_round(&record("ghost", true)).unwrap();

        let recent = store.recent_rounds(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].word, "ghost");
        assert_eq!(recent[1].word, "plant");
        assert!(!recent[1].won);
        assert_eq!(recent[0].guesses, 3);
        assert_eq!(recent[0].hints, 1);

        let summary = store.summary().unwrap();
        assert_eq!(summary, ScoreSummary { played: 3, won: 2 });
    }

    #[test]
    fn test_sqlite_summary_empty() {
        let store = SqliteScoreStore::in_memory().unwrap();
        assert_eq!(store.summary().unwrap(), ScoreSummary::default());
    }

    #[test]
    fn test_memory_store_mirrors_sqlite() {
        let mut store = MemoryScoreStore::default();
        assert_eq!(store.increment_and_get().unwrap(), 1);
        store.record_round(&record("crane", true)).unwrap();
        store.record_round(&record("plant", false)).unwrap();

        assert_eq!(store.current().unwrap(), 1);
        assert_eq!(store.recent_rounds(5).unwrap()[0].word, "plant");
        assert_eq!(store.summary().unwrap(), ScoreSummary { played: 2, won: 1 });
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(ScoreSummary::default().win_rate(), 0.0);
        assert_eq!(ScoreSummary { played: 4, won: 1 }.win_rate(), 25.0);
    }
}
