//! Top-level UI layout: title header, sidebar, table and chart sections,
//! status bar.

pub mod chart_panel;
pub mod overlays;
pub mod sidebar;
pub mod status_bar;
pub mod table_panel;

use std::ops::Range;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Focus, Overlay};
use crate::theme;

pub const PAGE_TITLE: &str = "S&P 500 prices";
pub const PAGE_DESCRIPTION: &str =
    "Retrieves the list of S&P 500 companies (from Wikipedia) and their year-to-date closing prices.";

const SIDEBAR_WIDTH: u16 = 46;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(30)])
        .split(rows[1]);

    sidebar::render(f, body[0], app);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body[1]);

    table_panel::render(f, main[0], app);
    chart_panel::render(f, main[1], app);
    status_bar::render(f, rows[2], app);

    // Overlays on top.
    let area = f.area();
    match &app.overlay {
        Overlay::About => overlays::render_about(f, area),
        Overlay::ErrorHistory => overlays::render_error_history(f, area, app),
        Overlay::Search => overlays::render_search(f, area, &app.search_input),
        Overlay::None => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(PAGE_TITLE, theme::accent_bold())),
        Line::from(Span::styled(PAGE_DESCRIPTION, theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Bordered block for a control, highlighted when it has focus.
pub fn panel_block(title: &str, focus: Focus, app: &AppState) -> Block<'static> {
    let focused = app.focus == focus;
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(format!(" {title} [{}] ", focus.index() + 1))
        .title_style(theme::panel_title(focused))
}

/// Rows of a list of `len` items to show in `height` lines so that `cursor`
/// stays visible.
pub fn visible_window(cursor: usize, len: usize, height: usize) -> Range<usize> {
    if height == 0 || len == 0 {
        return 0..0;
    }
    let start = if cursor < height { 0 } else { cursor + 1 - height };
    start..(start + height).min(len)
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
