//! Stateless UI rendering for gomoku.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color as UiColor, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use unicode_width::UnicodeWidthStr;

use super::app::App;
use crate::games::gomoku::{BOARD_SIZE, Cell, Color, Move};

/// Board widget width: row label, three columns per cell, borders.
const BOARD_WIDTH: u16 = 3 + 3 * BOARD_SIZE as u16 + 2;
/// Board widget height: column header, one line per row, borders.
const BOARD_HEIGHT: u16 = 1 + BOARD_SIZE as u16 + 2;

/// Renders the board, both transcript panes and the status line.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(BOARD_HEIGHT),
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new(format!("Gomoku Arena - {}", app.title()))
        .style(Style::default().fg(UiColor::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDTH),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(chunks[1]);

    draw_board(frame, center_rect(body[0], BOARD_WIDTH, BOARD_HEIGHT), app);
    draw_transcript(frame, body[1], app, Color::Black);
    draw_transcript(frame, body[2], app, Color::White);

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(UiColor::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("arrows: move  enter/space: place  r: restart  q: quit")
        .style(Style::default().fg(UiColor::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::with_capacity(BOARD_SIZE + 1);

    let mut header = String::from("   ");
    for col in 0..BOARD_SIZE {
        header.push_str(&format!("{:>2} ", col));
    }
    lines.push(Line::from(Span::styled(
        header,
        Style::default().fg(UiColor::DarkGray),
    )));

    for row in 0..BOARD_SIZE {
        let mut spans = vec![Span::styled(
            format!("{:>2} ", row),
            Style::default().fg(UiColor::DarkGray),
        )];
        for col in 0..BOARD_SIZE {
            spans.push(cell_span(app, Move::new(row, col)));
        }
        lines.push(Line::from(spans));
    }

    let board = Paragraph::new(lines).block(
        Block::default()
            .title(" Board ")
            .borders(Borders::ALL),
    );
    frame.render_widget(board, area);
}

fn cell_span(app: &App, mv: Move) -> Span<'static> {
    let (symbol, base_style) = match app.board().get(mv) {
        Some(Cell::Occupied(Color::Black)) => (
            " X ",
            Style::default().fg(UiColor::Blue).add_modifier(Modifier::BOLD),
        ),
        Some(Cell::Occupied(Color::White)) => (
            " O ",
            Style::default().fg(UiColor::Red).add_modifier(Modifier::BOLD),
        ),
        _ => (" . ", Style::default().fg(UiColor::DarkGray)),
    };

    let style = if mv == app.cursor() && !app.is_game_over() {
        base_style.bg(UiColor::White).fg(UiColor::Black)
    } else if Some(mv) == app.last_move() {
        base_style.add_modifier(Modifier::UNDERLINED)
    } else {
        base_style
    };
    Span::styled(symbol, style)
}

fn draw_transcript(frame: &mut Frame, area: Rect, app: &App, color: Color) {
    let text = app.transcript(color);
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    // Keep the newest text in view.
    let wrapped: usize = text
        .split('\n')
        .map(|line| line.width().div_ceil(inner_width).max(1))
        .sum();
    let offset = wrapped.saturating_sub(inner_height).min(u16::MAX as usize) as u16;

    let border = if app.to_move() == Some(color) {
        Style::default().fg(UiColor::Green)
    } else {
        Style::default()
    };

    let pane = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0))
        .block(
            Block::default()
                .title(format!(" {} ", color))
                .borders(Borders::ALL)
                .border_style(border),
        );
    frame.render_widget(pane, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
