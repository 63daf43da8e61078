pub mod stats;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Screen};
use crate::celebration::Celebration;
use crate::game::{Game, Phase};
use crate::projection::{self, BoardView, GameOverView, Tone};
use crate::session::{GuessSession, Outcome};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

const SEA_GREEN: Color = Color::Rgb(46, 139, 87);
const GOLD: Color = Color::Rgb(255, 215, 0);
const GREY: Color = Color::Rgb(128, 128, 128);
const LIGHT_SLATE_GRAY: Color = Color::Rgb(119, 136, 153);

pub const EXTREME_BANNER: &str =
    "Timer starts on first character. Game ends when timer runs out. Good luck!";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen() {
            Screen::Loading => render_loading(area, buf),
            Screen::Failed => render_failed(&self.game, area, buf),
            Screen::Board => {
                if let Some(session) = self.game.session() {
                    render_board(&self.game, session, area, buf);
                }
            }
            Screen::GameOver => {
                if let Some(view) = self.game.session().and_then(projection::game_over) {
                    render_game_over(&self.game, &view, area, buf);
                }
                if self.celebration.is_active() {
                    render_celebration(&self.celebration, area, buf);
                }
            }
            Screen::Stats => {
                if let Some(view) = self.stats_view() {
                    stats::render_stats(view, area, buf);
                }
            }
        }
    }
}

fn tile_style(tone: Tone) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match tone {
        Tone::Exact => bold.bg(SEA_GREEN).fg(Color::White),
        Tone::Present => bold.bg(GOLD).fg(Color::Black),
        Tone::Absent => bold.bg(GREY).fg(Color::White),
        Tone::Neutral => bold.bg(LIGHT_SLATE_GRAY).fg(Color::White),
    }
}

/// Tile rows, separated by a blank line when `spaced`
fn board_lines(view: &BoardView, spaced: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(view.rows.len() * 2);
    for (row_idx, row) in view.rows.iter().enumerate() {
        if spaced && row_idx > 0 {
            lines.push(Line::default());
        }
        let mut spans = Vec::with_capacity(row.tiles.len() * 2);
        for (idx, tile) in row.tiles.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" "));
            }
            let mut style = tile_style(tile.tone);
            if row.active {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(
                format!(" {} ", tile.letter.unwrap_or(' ')),
                style,
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn header_line(game: &Game, extreme: bool) -> Line<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("GLYPHMARE", bold.fg(SEA_GREEN)),
        Span::raw("   "),
        Span::styled(format!("Score: {}", game.score()), bold),
        Span::raw("   "),
        Span::styled(
            format!("Extreme: {}", if extreme { "ON" } else { "OFF" }),
            if extreme {
                bold.fg(Color::Red)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            },
        ),
    ])
}

fn render_board(game: &Game, session: &GuessSession, area: Rect, buf: &mut Buffer) {
    let view = projection::board(session);
    let needed = board_width(&view) as u16 + HORIZONTAL_MARGIN * 2;
    if area.width < needed {
        centered_message(
            vec![Line::from(format!(
                "Terminal too narrow for a {} letter word",
                session.word_len()
            ))],
            area,
            buf,
        );
        return;
    }
    let banner_lines: u16 = if session.extreme_mode() { 2 } else { 0 };
    // header, banner, footer and legend always keep their lines
    let chrome = 2 + banner_lines + 1 + 1 + VERTICAL_MARGIN * 2;
    let available = area.height.saturating_sub(chrome) as usize;
    let rows = view.rows.len();
    let board = if available >= (rows * 2).saturating_sub(1) {
        board_lines(&view, true)
    } else if available >= rows {
        board_lines(&view, false)
    } else {
        centered_message(
            vec![Line::from(format!(
                "Terminal too short for a {} letter word",
                session.word_len()
            ))],
            area,
            buf,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),            // header
            Constraint::Length(banner_lines), // extreme mode
            Constraint::Length(board.len() as u16),
            Constraint::Length(1), // hints and notice
            Constraint::Length(1), // legend
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(header_line(game, session.extreme_mode()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if session.extreme_mode() {
        let timer = session.timer();
        let remaining = if timer.is_started() {
            timer.remaining_seconds()
        } else {
            timer.allotment()
        };
        Paragraph::new(vec![
            Line::from(Span::styled(
                EXTREME_BANNER,
                Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled(
                format!("Time Remaining: {remaining}"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
    }

    Paragraph::new(board)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    let mut footer = vec![Span::styled(
        format!("Hint ({} remaining)", session.hints_remaining()),
        Style::default().fg(Color::Cyan),
    )];
    if let Some(notice) = game.notice() {
        footer.push(Span::raw("   "));
        footer.push(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    Paragraph::new(Line::from(footer))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(enter) submit / (tab) hint / (ctrl+e) extreme / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

fn centered_message(lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Min(height),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

fn render_loading(area: Rect, buf: &mut Buffer) {
    centered_message(
        vec![Line::from(Span::styled(
            "Fetching a new word...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))],
        area,
        buf,
    );
}

fn render_failed(game: &Game, area: Rect, buf: &mut Buffer) {
    let reason = match game.phase() {
        Phase::Failed { reason } => reason.as_str(),
        _ => "",
    };
    centered_message(
        vec![
            Line::from(Span::styled(
                "Could not fetch a word",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                reason.to_string(),
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::default(),
            Line::from(Span::styled(
                "(r)etry / (esc)ape",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ],
        area,
        buf,
    );
}

fn outcome_line(outcome: Outcome, guesses: usize) -> Line<'static> {
    match outcome {
        Outcome::Won => Line::from(Span::styled(
            format!(
                "Solved in {guesses} {}",
                if guesses == 1 { "guess" } else { "guesses" }
            ),
            Style::default().fg(SEA_GREEN).add_modifier(Modifier::BOLD),
        )),
        Outcome::OutOfAttempts => Line::from(Span::styled(
            "Out of attempts",
            Style::default().fg(Color::Red),
        )),
        Outcome::TimedOut => {
            Line::from(Span::styled("Out of time", Style::default().fg(Color::Red)))
        }
    }
}

fn render_game_over(game: &Game, view: &GameOverView, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let guesses = game.session().map_or(0, GuessSession::current_row);

    let mut lines = vec![
        Line::from(Span::styled("Game over!", bold)),
        outcome_line(view.outcome, guesses),
        Line::default(),
        Line::from("The word was:"),
        Line::from(Span::styled(view.word_upper.clone(), bold.fg(GOLD))),
        Line::default(),
    ];
    if !view.definition.is_empty() {
        lines.push(Line::from(Span::styled("Definition:", bold)));
        lines.push(Line::from(view.definition.clone()));
        lines.push(Line::default());
    }
    lines.push(Line::from(format!("Score: {}", game.score())));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(n)ew / (s)tats / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    )));

    centered_message(lines, area, buf);
}

/// Paints confetti over whatever is already in the buffer
fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
    ];

    // banner letters last so confetti never hides them
    let (banner, confetti): (Vec<_>, Vec<_>) = celebration.pieces.iter().partition(|p| p.pinned);
    for piece in confetti.into_iter().chain(banner) {
        if piece.x < 0.0 || piece.y < 0.0 {
            continue;
        }
        let (x, y) = (piece.x as u16, piece.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        let mut style = Style::default().fg(colors[piece.color_index % colors.len()]);
        if piece.pinned {
            style = style.add_modifier(Modifier::BOLD);
        }
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&piece.symbol.to_string());
            cell.set_style(style);
        }
    }
}

/// Columns one board row occupies
fn board_width(view: &BoardView) -> usize {
    board_lines(view, false).first().map_or(0, |line| {
        line.spans.iter().map(|span| span.content.width()).sum()
    })
}
