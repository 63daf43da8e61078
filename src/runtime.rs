use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::{debug, warn};

use crate::error::WordSourceError;
use crate::game::RequestId;
use crate::round::Round;
use crate::source::{fetch_with_retry, RetryPolicy, WordSource};

pub const TICK_RATE_MS: u64 = 100;

/// Everything the main loop reacts to
#[derive(Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// A background fetch finished, successfully or not
    RoundLoaded {
        request: RequestId,
        result: Result<Round, WordSourceError>,
    },
}

/// Source of terminal and background events
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<GameEvent>,
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => input_tx.send(GameEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => input_tx.send(GameEvent::Resize),
                Ok(_) => Ok(()),
                Err(e) => {
                    warn!(error = %e, "terminal input closed");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    /// Handle for background workers that report into the same queue
    pub fn sender(&self) -> Sender<GameEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel backed source for headless runs
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: GameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> GameEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GameEvent::Tick,
        }
    }
}

/// Turns frequent ticks into whole-second beats measured from when it was armed.
///
/// Keeps its own origin so a second is never counted twice or lost when
/// ticks arrive late or bunched up.
#[derive(Debug, Clone)]
pub struct SecondPulse {
    period: Duration,
    armed_at: Option<Instant>,
    fired: u64,
}

impl SecondPulse {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            armed_at: None,
            fired: 0,
        }
    }

    /// Starts counting from `now`. Re-arming a running pulse keeps its origin.
    pub fn arm(&mut self, now: Instant) {
        if self.armed_at.is_none() {
            self.armed_at = Some(now);
            self.fired = 0;
        }
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
        self.fired = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Beats that elapsed since the previous poll
    pub fn poll(&mut self, now: Instant) -> u64 {
        let Some(origin) = self.armed_at else {
            return 0;
        };
        let elapsed = now.saturating_duration_since(origin);
        let total = (elapsed.as_nanos() / self.period.as_nanos()) as u64;
        let due = total.saturating_sub(self.fired);
        self.fired = total.max(self.fired);
        due
    }
}

impl Default for SecondPulse {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Runs round fetches off the ui thread and posts the result back as an event
#[derive(Clone)]
pub struct RoundFetcher {
    source: Arc<dyn WordSource>,
    policy: RetryPolicy,
    tx: Sender<GameEvent>,
}

impl RoundFetcher {
    pub fn new(source: Arc<dyn WordSource>, policy: RetryPolicy, tx: Sender<GameEvent>) -> Self {
        Self { source, policy, tx }
    }

    pub fn spawn(&self, request: RequestId) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let policy = self.policy;
        let tx = self.tx.clone();
        debug!(request, source = %source.name(), "spawning round fetch");

        thread::spawn(move || {
            let result = fetch_with_retry(source.as_ref(), policy);
            if tx.send(GameEvent::RoundLoaded { request, result }).is_err() {
                debug!(request, "event loop gone before round arrived");
            }
        })
    }
}
