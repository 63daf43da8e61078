use std::sync::mpsc;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use glyphmare::app::{App, Effect, Screen};
use glyphmare::game::{Game, Notice};
use glyphmare::round::Round;
use glyphmare::runtime::{FixedTicker, GameEvent, Runner, TestEventSource};
use glyphmare::score::MemoryScoreStore;
use glyphmare::session::Outcome;
use ratatui::{backend::TestBackend, Terminal};

fn key(code: KeyCode) -> GameEvent {
    GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn letters(word: &str) -> impl Iterator<Item = GameEvent> + '_ {
    word.chars().map(|c| key(KeyCode::Char(c)))
}

fn new_app() -> App {
    App::new(Game::new(Box::new(MemoryScoreStore::default())))
}

// Drives App through Runner/TestEventSource the way the binary's loop does
#[test]
fn headless_win_flow() {
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let mut app = new_app();
    let request = app.start();

    tx.send(GameEvent::RoundLoaded {
        request,
        result: Round::new("crane", "a wading bird"),
    })
    .unwrap();
    for event in letters("stare") {
        tx.send(event).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
    for event in letters("crane") {
        tx.send(event).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();

    for _ in 0..100u32 {
        let event = runner.step();
        assert_eq!(app.handle_event(event, Instant::now()), Effect::Continue);
        if app.screen() == Screen::GameOver {
            break;
        }
    }

    assert_eq!(app.screen(), Screen::GameOver);
    let session = app.game.session().unwrap();
    assert_eq!(session.outcome(), Some(Outcome::Won));
    assert_eq!(session.current_row(), 2);
    assert_eq!(app.game.score(), 1);
}

#[test]
fn headless_extreme_timeout() {
    let start = Instant::now();
    let mut app = new_app();
    let request = app.start();
    app.handle_event(
        GameEvent::RoundLoaded {
            request,
            result: Round::new("crane", ""),
        },
        start,
    );
    app.handle_event(
        GameEvent::Key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL)),
        start,
    );
    app.handle_event(key(KeyCode::Char('c')), start);

    // 100ms ticks for 34.9s of synthetic time leave the last second on the clock
    let mut now = start;
    for _ in 0..349 {
        now += Duration::from_millis(100);
        app.handle_event(GameEvent::Tick, now);
    }
    let session = app.game.session().unwrap();
    assert_eq!(session.timer().remaining_seconds(), 1);
    assert!(!session.is_over());

    app.handle_event(GameEvent::Tick, now + Duration::from_millis(100));
    assert_eq!(
        app.game.session().unwrap().outcome(),
        Some(Outcome::TimedOut)
    );
    assert_eq!(app.screen(), Screen::GameOver);
    assert_eq!(app.game.score(), 0);
}

#[test]
fn headless_hint_cap() {
    let now = Instant::now();
    let mut app = new_app();
    let request = app.start();
    app.handle_event(
        GameEvent::RoundLoaded {
            request,
            result: Round::new("butterfly", ""),
        },
        now,
    );

    for _ in 0..5 {
        app.handle_event(key(KeyCode::Tab), now);
    }
    let session = app.game.session().unwrap();
    assert_eq!(session.hints_used(), 3);
    assert_eq!(session.current_input(), "but");
    assert_eq!(app.game.notice(), Some(Notice::NoMoreHints));
}

#[test]
fn headless_new_round_after_loss() {
    let now = Instant::now();
    let mut app = new_app();
    let first = app.start();
    app.handle_event(
        GameEvent::RoundLoaded {
            request: first,
            result: Round::new("ox", ""),
        },
        now,
    );
    for guess in ["no", "so"] {
        for event in letters(guess) {
            app.handle_event(event, now);
        }
        app.handle_event(key(KeyCode::Enter), now);
    }
    assert_eq!(app.screen(), Screen::GameOver);

    let effect = app.handle_event(key(KeyCode::Enter), now);
    assert_matches!(effect, Effect::Fetch(second) if second != first);

    // the earlier request answering late must not replace anything
    app.handle_event(
        GameEvent::RoundLoaded {
            request: first,
            result: Round::new("stale", ""),
        },
        now,
    );
    assert_eq!(app.screen(), Screen::Loading);
}

#[test]
fn headless_render_through_test_backend() {
    let now = Instant::now();
    let mut app = new_app();
    let request = app.start();
    app.handle_event(
        GameEvent::RoundLoaded {
            request,
            result: Round::new("crane", ""),
        },
        now,
    );
    for event in letters("cra") {
        app.handle_event(event, now);
    }

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|f| f.render_widget(&app, f.area()))
        .unwrap();

    let text: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(text.contains("GLYPHMARE"));
    assert!(text.contains(" C "));
    assert!(text.contains(" R "));
}
