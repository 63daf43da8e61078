use std::time::Instant;

use tracing::debug;

use crate::celebration::Celebration;
use crate::game::{Game, Phase, RequestId, StatsSnapshot};
use crate::input::{command_for, Command};
use crate::runtime::{GameEvent, SecondPulse};
use crate::session::{Outcome, Submission};

/// Rounds listed on the stats screen
pub const STATS_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Board,
    GameOver,
    Failed,
    Stats,
}

/// What the main loop has to do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Continue,
    /// Start a background fetch tagged with this request
    Fetch(RequestId),
    Quit,
}

#[derive(Debug, Default)]
pub struct StatsView {
    pub snapshot: StatsSnapshot,
    pub scroll: usize,
}

pub struct App {
    pub game: Game,
    pub celebration: Celebration,
    stats: Option<StatsView>,
    pulse: SecondPulse,
    viewport: (u16, u16),
}

impl App {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            celebration: Celebration::new(),
            stats: None,
            pulse: SecondPulse::default(),
            viewport: (80, 24),
        }
    }

    pub fn screen(&self) -> Screen {
        match self.game.phase() {
            Phase::Loading { .. } => Screen::Loading,
            Phase::Failed { .. } => Screen::Failed,
            Phase::Playing(session) if !session.is_over() => Screen::Board,
            Phase::Playing(_) if self.stats.is_some() => Screen::Stats,
            Phase::Playing(_) => Screen::GameOver,
        }
    }

    pub fn stats_view(&self) -> Option<&StatsView> {
        self.stats.as_ref()
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    /// Kicks off the first round
    pub fn start(&mut self) -> RequestId {
        self.game.start_round()
    }

    pub fn handle_event(&mut self, event: GameEvent, now: Instant) -> Effect {
        match event {
            GameEvent::Key(key) => match command_for(key, self.screen()) {
                Some(command) => self.apply(command, now),
                None => Effect::Continue,
            },
            GameEvent::Resize => Effect::Continue,
            GameEvent::Tick => {
                self.on_tick(now);
                Effect::Continue
            }
            GameEvent::RoundLoaded { request, result } => {
                self.game.round_loaded(request, result);
                self.sync_pulse(now);
                Effect::Continue
            }
        }
    }

    pub fn apply(&mut self, command: Command, now: Instant) -> Effect {
        debug!(?command, "applying command");
        let effect = match command {
            Command::Letter(c) => {
                self.game.handle_character(c);
                Effect::Continue
            }
            Command::Backspace => {
                self.game.handle_backspace();
                Effect::Continue
            }
            Command::Submit => {
                if self.game.submit_guess() == Submission::Finished(Outcome::Won) {
                    let (width, height) = self.viewport;
                    self.celebration.start(width, height, now);
                }
                Effect::Continue
            }
            Command::Hint => {
                self.game.request_hint();
                Effect::Continue
            }
            Command::ToggleExtreme => {
                self.game.toggle_extreme_mode();
                // a re-engaged clock counts from a fresh second
                self.pulse.disarm();
                Effect::Continue
            }
            Command::NewRound => {
                self.stats = None;
                self.celebration.stop();
                Effect::Fetch(self.game.reset_game())
            }
            Command::Retry => Effect::Fetch(self.game.start_round()),
            Command::ShowStats => {
                self.stats = Some(StatsView {
                    snapshot: self.game.stats(STATS_HISTORY),
                    scroll: 0,
                });
                Effect::Continue
            }
            Command::Back => {
                self.stats = None;
                Effect::Continue
            }
            Command::ScrollUp => {
                if let Some(view) = self.stats.as_mut() {
                    view.scroll = view.scroll.saturating_sub(1);
                }
                Effect::Continue
            }
            Command::ScrollDown => {
                if let Some(view) = self.stats.as_mut() {
                    let last = view.snapshot.recent.len().saturating_sub(1);
                    view.scroll = (view.scroll + 1).min(last);
                }
                Effect::Continue
            }
            Command::Quit => Effect::Quit,
        };
        self.sync_pulse(now);
        effect
    }

    /// Drives the animation and converts elapsed whole seconds into clock ticks
    pub fn on_tick(&mut self, now: Instant) {
        self.celebration.update(now);
        for _ in 0..self.pulse.poll(now) {
            if self.game.tick() {
                break;
            }
        }
        self.sync_pulse(now);
    }

    fn sync_pulse(&mut self, now: Instant) {
        if self.game.clock_running() {
            self.pulse.arm(now);
        } else {
            self.pulse.disarm();
        }
    }
}
