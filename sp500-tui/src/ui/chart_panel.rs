//! Chart section: one two-panel figure per charted company.
//!
//! Each panel draws a dimmed area fill (bar datasets dropped to zero) under
//! a bright line. Date ticks are written vertically under each panel, one
//! character per row, so that dense ticks stay readable.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use sp500_core::chart::{CompanyChart, PanelData, DATE_AXIS_LABEL};
use sp500_core::selection::NO_COMPANY_PROMPT;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::ui::{panel_block, table_panel};

pub const CHARTS_HEADER: &str = "Closing Prices and Volumes of selected Stocks:";

/// Rows taken by one company figure: title plus two panels.
const FIGURE_HEIGHT: u16 = 1 + 2 * PANEL_HEIGHT;
const PANEL_HEIGHT: u16 = 8 + TICK_ROWS;
/// Vertical tick labels are "MM-DD".
const TICK_ROWS: u16 = 5;
const TICK_FORMAT: &str = "%m-%d";
const MAX_SELECTED_ROWS: u16 = 8;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = panel_block(CHARTS_HEADER, Focus::Charts, app);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let charts = &app.charts;
    let mut notes: Vec<Line> = Vec::new();
    if charts.pending {
        notes.push(Line::from(Span::styled(
            format!("Fetching year-to-date prices for {}...", charts.requested.join(", ")),
            theme::warning(),
        )));
    }
    if let Some(text) = charts.guidance {
        let style = if text == NO_COMPANY_PROMPT {
            theme::warning()
        } else {
            theme::muted()
        };
        notes.push(Line::from(Span::styled(text, style)));
    }
    if charts.charts.len() > 1 {
        notes.push(Line::from(Span::styled(
            format!(
                "Chart {}/{}  [j/k] scroll",
                charts.scroll + 1,
                charts.charts.len()
            ),
            theme::muted(),
        )));
    }

    let rows_height = match (&charts.selected_rows, charts.charts.is_empty()) {
        (Some(rows), false) => (rows.row_count() as u16 + 1).min(MAX_SELECTED_ROWS),
        _ => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(notes.len() as u16),
            Constraint::Length(rows_height),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(notes), chunks[0]);
    if let (Some(rows), true) = (&charts.selected_rows, rows_height > 0) {
        table_panel::render_table(f, chunks[1], rows, 0, None);
    }

    render_figures(f, chunks[2], &charts.charts[charts.scroll.min(charts.charts.len())..]);
}

/// Stack figures top to bottom while they fit. The first one always gets
/// drawn, squeezed if the area is short.
fn render_figures(f: &mut Frame, area: Rect, charts: &[CompanyChart]) {
    let mut y = area.y;
    for (i, chart) in charts.iter().enumerate() {
        let remaining = area.bottom().saturating_sub(y);
        if remaining < FIGURE_HEIGHT && i > 0 {
            break;
        }
        let height = remaining.min(FIGURE_HEIGHT);
        if height == 0 {
            break;
        }
        render_figure(f, Rect::new(area.x, y, area.width, height), chart);
        y += height;
    }
}

fn render_figure(f: &mut Frame, area: Rect, chart: &CompanyChart) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Ratio(1, 2),
            Constraint::Ratio(1, 2),
        ])
        .split(area);

    let mut title = vec![Span::styled(chart.title.clone(), theme::accent_bold())];
    if let (Some(first), Some(last)) = (chart.first_date, chart.last_date) {
        title.push(Span::styled(
            format!("  {} to {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d")),
            theme::muted(),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(title)), chunks[0]);

    if !chart.has_data() {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("No price data returned for {}", chart.company.symbol),
                theme::negative(),
            )),
            chunks[1],
        );
        return;
    }

    render_panel(f, chunks[1], chart, &chart.close, theme::CLOSE_LINE, theme::CLOSE_FILL);
    render_panel(f, chunks[2], chart, &chart.volume, theme::VOLUME_LINE, theme::VOLUME_FILL);
}

fn render_panel(
    f: &mut Frame,
    area: Rect,
    chart: &CompanyChart,
    panel: &PanelData,
    line: Color,
    fill: Color,
) {
    let tick_rows = if area.height > TICK_ROWS + 3 { TICK_ROWS } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(tick_rows)])
        .split(area);

    let [lo, hi] = panel.y_bounds;
    let y_labels: Vec<Span> = [lo, (lo + hi) / 2.0, hi]
        .into_iter()
        .map(|v| Span::styled(compact_number(v), theme::muted()))
        .collect();
    let label_width = y_labels.iter().map(|s| s.width()).max().unwrap_or(0) as u16;

    let area_fill = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Bar)
        .style(Style::default().fg(fill))
        .data(&panel.points);
    let series = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(line))
        .data(&panel.points);

    let widget = Chart::new(vec![area_fill, series])
        .x_axis(Axis::default().style(theme::muted()).bounds(chart.x_bounds))
        .y_axis(
            Axis::default()
                .title(Span::styled(panel.y_label, theme::muted()))
                .style(theme::muted())
                .bounds(panel.y_bounds)
                .labels(y_labels),
        );
    f.render_widget(widget, chunks[0]);

    if tick_rows > 0 {
        // Plot area starts after the y labels and the axis line.
        let plot_x = chunks[1].x + label_width + 1;
        let plot_width = chunks[1].width.saturating_sub(label_width + 1);
        render_date_ticks(f.buffer_mut(), chunks[1], plot_x, plot_width, chart);
    }
}

fn render_date_ticks(
    buf: &mut Buffer,
    area: Rect,
    plot_x: u16,
    plot_width: u16,
    chart: &CompanyChart,
) {
    if plot_width < 2 {
        return;
    }
    let style = theme::muted();
    if plot_x >= area.x + DATE_AXIS_LABEL.len() as u16 + 1 {
        buf.set_string(area.x, area.bottom() - 1, DATE_AXIS_LABEL, style);
    }

    let max_ticks = (plot_width as usize / 3).clamp(2, 12);
    let [x0, x1] = chart.x_bounds;
    let span = (x1 - x0).max(1.0);
    for tick in chart.date_ticks(max_ticks) {
        let offset = ((tick.x - x0) / span * f64::from(plot_width - 1)).round() as u16;
        let col = plot_x + offset.min(plot_width - 1);
        if col >= area.right() {
            continue;
        }
        let label = tick.date.format(TICK_FORMAT).to_string();
        for (row, ch) in label.chars().take(area.height as usize).enumerate() {
            buf.set_string(col, area.y + row as u16, ch.to_string(), style);
        }
    }
}

/// Short axis label: 1.2B, 35.0M, 4.5K, 181.25.
pub fn compact_number(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e4 {
        format!("{:.1}K", v / 1e3)
    } else {
        format!("{v:.2}")
    }
}
