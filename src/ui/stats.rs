use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::app::StatsView;
use crate::score::RoundRecord;

/// Pure presenter for one history row
pub fn present_row(record: &RoundRecord) -> Row<'static> {
    let (result, result_color) = if record.won {
        ("won", Color::Green)
    } else {
        ("lost", Color::Red)
    };

    Row::new(vec![
        Cell::from(record.finished_at.format("%Y-%m-%d %H:%M").to_string()),
        Cell::from(record.word.to_uppercase()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(result).style(Style::default().fg(result_color)),
        Cell::from(record.guesses.to_string()),
        Cell::from(record.hints.to_string()),
        Cell::from(if record.extreme { "yes" } else { "" }),
    ])
}

pub fn render_stats(view: &StatsView, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // title and totals
            Constraint::Min(0),    // history
            Constraint::Length(1), // instructions
        ])
        .split(area);

    let summary = &view.snapshot.summary;
    Paragraph::new(vec![
        Line::from(Span::styled(
            "Round History",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Played: {}   Won: {}   Win rate: {:.0}%",
            summary.played,
            summary.won,
            summary.win_rate()
        )),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    if view.snapshot.recent.is_empty() {
        Paragraph::new("No rounds recorded yet")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .render(chunks[1], buf);
    } else {
        let header = Row::new(vec!["When", "Word", "Result", "Guesses", "Hints", "Extreme"])
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        let rows = view
            .snapshot
            .recent
            .iter()
            .skip(view.scroll)
            .map(present_row);

        Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Min(8),
                Constraint::Length(6),
                Constraint::Length(7),
                Constraint::Length(5),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .column_spacing(2)
        .render(chunks[1], buf);
    }

    Paragraph::new(Span::styled(
        "(b)ack / (n)ew / (up/down) scroll / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::StatsSnapshot;
    use crate::score::ScoreSummary;
    use chrono::{Local, TimeZone};

    fn record(word: &str, won: bool) -> RoundRecord {
        RoundRecord {
            word: word.to_string(),
            won,
            guesses: 4,
            hints: 1,
            extreme: !won,
            finished_at: Local.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap(),
        }
    }

    fn render(view: &StatsView) -> String {
        let area = Rect::new(0, 0, 80, 20);
        let mut buffer = Buffer::empty(area);
        render_stats(view, area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_empty_history() {
        let text = render(&StatsView::default());
        assert!(text.contains("Played: 0"));
        assert!(text.contains("No rounds recorded yet"));
    }

    #[test]
    fn test_history_rows_and_totals() {
        let view = StatsView {
            snapshot: StatsSnapshot {
                summary: ScoreSummary { played: 4, won: 3 },
                recent: vec![record("crane", true), record("ghost", false)],
            },
            scroll: 0,
        };
        let text = render(&view);
        assert!(text.contains("Win rate: 75%"));
        assert!(text.contains("CRANE"));
        assert!(text.contains("GHOST"));
        assert!(text.contains("2024-03-09 18:30"));
    }

    #[test]
    fn test_scroll_skips_rows() {
        let view = StatsView {
            snapshot: StatsSnapshot {
                summary: ScoreSummary { played: 2, won: 1 },
                recent: vec![record("crane", true), record("ghost", false)],
            },
            scroll: 1,
        };
        let text = render(&view);
        assert!(!text.contains("CRANE"));
        assert!(text.contains("GHOST"));
    }
}
