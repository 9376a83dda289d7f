//! Stateless UI rendering for the Codenames board.

use super::app::App;
use crate::codenames::RevealStyle;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

const GRID_COLUMNS: usize = 4;

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(4), // Dialog
            Constraint::Min(8),    // Board
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Strictly Codenames")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let dialog = Paragraph::new(vec![
        Line::from(app.clue_line().to_string()),
        Line::from(app.guess_line().to_string()),
    ])
    .block(Block::default().borders(Borders::ALL).title("Dialog"));
    frame.render_widget(dialog, chunks[1]);

    draw_board(frame, chunks[2], app);

    let status = Paragraph::new(app.status())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[3]);

    let help = Paragraph::new("Q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[4]);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let row_count = app.words().len().div_ceil(GRID_COLUMNS).max(1);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count as u32); row_count])
        .split(area);

    for (row_area, row_words) in rows.iter().zip(app.words().chunks(GRID_COLUMNS)) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row_area);

        for (cell, word) in cols.iter().zip(row_words) {
            draw_card(frame, *cell, word, app.reveal(word));
        }
    }
}

fn draw_card(frame: &mut Frame, area: Rect, word: &str, reveal: Option<RevealStyle>) {
    let style = card_style(reveal);
    let card = Paragraph::new(word.to_string())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(card, area);
}

/// Card colors per reveal style; unrevealed cards stay plain.
pub fn card_style(reveal: Option<RevealStyle>) -> Style {
    match reveal {
        None => Style::default().fg(Color::White),
        Some(RevealStyle::Correct) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        Some(RevealStyle::Wrong) => Style::default().fg(Color::DarkGray),
        Some(RevealStyle::Assassin) => Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    }
}
