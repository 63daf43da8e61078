use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Screen;

/// What a key press means on the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Letter(char),
    Backspace,
    Submit,
    Hint,
    ToggleExtreme,
    NewRound,
    Retry,
    ShowStats,
    Back,
    ScrollUp,
    ScrollDown,
    Quit,
}

pub fn command_for(key: KeyEvent, screen: Screen) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Char('c') if ctrl => return Some(Command::Quit),
        _ => {}
    }

    match screen {
        Screen::Loading => None,
        Screen::Board => match key.code {
            KeyCode::Char('e') if ctrl => Some(Command::ToggleExtreme),
            KeyCode::Char(c) if !ctrl && c.is_ascii_alphabetic() => Some(Command::Letter(c)),
            KeyCode::Backspace => Some(Command::Backspace),
            KeyCode::Enter => Some(Command::Submit),
            KeyCode::Tab => Some(Command::Hint),
            _ => None,
        },
        Screen::GameOver => match key.code {
            KeyCode::Enter | KeyCode::Char('n') => Some(Command::NewRound),
            KeyCode::Char('s') => Some(Command::ShowStats),
            _ => None,
        },
        Screen::Failed => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => Some(Command::Retry),
            _ => None,
        },
        Screen::Stats => match key.code {
            KeyCode::Char('b') | KeyCode::Backspace => Some(Command::Back),
            KeyCode::Char('n') => Some(Command::NewRound),
            KeyCode::Up => Some(Command::ScrollUp),
            KeyCode::Down => Some(Command::ScrollDown),
            _ => None,
        },
    }
}
