//! Sidebar: sector multiselect, company multiselect and the fetch button.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::ui::{panel_block, visible_window};

pub const SIDEBAR_HEADER: &str = "User Input Features";
pub const SECTOR_LABEL: &str = "Filter by Sector";
pub const COMPANY_LABEL: &str = "Choose companies to plot detailed graphs";
pub const FETCH_LABEL: &str =
    "Get more data from Yahoo Finance and show plots for selected companies";

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" {SIDEBAR_HEADER} "))
        .title_style(theme::neutral().add_modifier(Modifier::BOLD));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let sector_height = (app.sidebar.sectors.len() as u16 + 2).clamp(3, 14);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(sector_height),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(inner);

    render_sectors(f, chunks[0], app);
    render_companies(f, chunks[1], app);
    render_fetch_button(f, chunks[2], app);
}

fn render_sectors(f: &mut Frame, area: Rect, app: &AppState) {
    let block = panel_block(SECTOR_LABEL, Focus::Sectors, app);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let sidebar = &app.sidebar;
    let focused = app.focus == Focus::Sectors;
    let window = visible_window(
        sidebar.sector_cursor,
        sidebar.sectors.len(),
        inner.height as usize,
    );

    let lines: Vec<Line> = sidebar.sectors[window.clone()]
        .iter()
        .zip(window)
        .map(|(sector, row)| {
            let checked = sidebar.is_sector_selected(sector);
            let mark = if checked { "[x] " } else { "[ ] " };
            let style = if row == sidebar.sector_cursor {
                theme::cursor(focused)
            } else if checked {
                theme::accent()
            } else {
                theme::text()
            };
            Line::from(Span::styled(format!("{mark}{sector}"), style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_companies(f: &mut Frame, area: Rect, app: &AppState) {
    let sidebar = &app.sidebar;
    let title = format!(
        "Companies {}/{}",
        sidebar.selected_companies.len(),
        sidebar.companies.len()
    );
    let block = panel_block(&title, Focus::Companies, app);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(COMPANY_LABEL, theme::muted())),
        chunks[0],
    );

    let focused = app.focus == Focus::Companies;
    let list_area = chunks[1];
    let window = visible_window(
        sidebar.company_cursor,
        sidebar.companies.len(),
        list_area.height as usize,
    );

    let lines: Vec<Line> = sidebar.companies[window.clone()]
        .iter()
        .zip(window)
        .map(|(name, row)| {
            let rank = sidebar.company_rank(name);
            let mark = match rank {
                Some(n) => format!("[{n}] "),
                None => "[ ] ".to_string(),
            };
            let style = if row == sidebar.company_cursor {
                theme::cursor(focused)
            } else if rank.is_some() {
                theme::accent()
            } else {
                theme::text()
            };
            Line::from(Span::styled(format!("{mark}{name}"), style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), list_area);
}

fn render_fetch_button(f: &mut Frame, area: Rect, app: &AppState) {
    let block = panel_block("Fetch", Focus::Fetch, app);
    let focused = app.focus == Focus::Fetch;
    let style = if app.charts.pending {
        theme::warning()
    } else if focused {
        theme::accent_bold().add_modifier(Modifier::REVERSED)
    } else {
        theme::accent()
    };
    let label = if app.charts.pending {
        "Fetching prices...".to_string()
    } else {
        format!("{FETCH_LABEL} (g)")
    };
    let para = Paragraph::new(Span::styled(label, style))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}
