//! Table section: dimension label, the filtered table, the CSV download link.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use sp500_core::data::ConstituentTable;
use sp500_core::export::LINK_TEXT;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::ui::panel_block;

pub const TABLE_HEADER: &str = "Display companies in selected sector:";

const MAX_COLUMN_WIDTH: usize = 32;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = panel_block(TABLE_HEADER, Focus::Table, app);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(inner);

    let view = &app.table_view.view;
    f.render_widget(
        Paragraph::new(Span::styled(view.dimension_label(), theme::neutral())),
        chunks[0],
    );

    let focused = app.focus == Focus::Table;
    let cursor = focused.then_some(app.table_view.row_cursor);
    render_table(f, chunks[1], view, app.table_view.col_offset, cursor);

    render_download_link(f, chunks[2], app);
}

/// Draw `table` from column `col_offset` on, highlighting `cursor` if given.
pub fn render_table(
    f: &mut Frame,
    area: Rect,
    table: &ConstituentTable,
    col_offset: usize,
    cursor: Option<usize>,
) {
    let col_offset = col_offset.min(table.column_count().saturating_sub(1));
    let widths = column_widths(table, col_offset);

    let header = Row::new(
        table.columns()[col_offset..]
            .iter()
            .map(|c| Cell::from(c.as_str())),
    )
    .style(theme::accent_bold());

    let rows = table.rows().iter().map(|r| {
        Row::new(r[col_offset..].iter().map(|c| Cell::from(c.as_str()))).style(theme::text())
    });

    let widget = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .row_highlight_style(theme::accent().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(cursor);
    f.render_stateful_widget(widget, area, &mut state);
}

/// Widest cell per column (header included), capped.
fn column_widths(table: &ConstituentTable, col_offset: usize) -> Vec<Constraint> {
    table.columns()[col_offset..]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let col = col_offset + i;
            let widest = table
                .rows()
                .iter()
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0)
                .max(name.chars().count())
                .min(MAX_COLUMN_WIDTH);
            Constraint::Length(widest as u16)
        })
        .collect()
}

fn render_download_link(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = Vec::new();
    match &app.table_view.download {
        Some(download) => {
            spans.push(Span::styled(
                LINK_TEXT,
                theme::accent().add_modifier(Modifier::UNDERLINED),
            ));
            spans.push(Span::styled(
                format!("  [w] save {} ({} rows)", download.filename, download.rows),
                theme::muted(),
            ));
            if let Some(path) = &app.table_view.last_saved {
                spans.push(Span::styled(
                    format!("  saved to {}", path.display()),
                    theme::positive(),
                ));
            }
        }
        None => spans.push(Span::styled("CSV export unavailable", theme::negative())),
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
