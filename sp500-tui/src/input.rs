//! Keyboard input dispatch: overlays → global keys → focus-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Focus, Overlay};

const PAGE: usize = 10;

/// Handle one key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::About => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Search => {
            handle_search_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(focus) = Focus::from_index(c as usize - '1' as usize) {
                app.focus = focus;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus = app.focus.prev();
            } else {
                app.focus = app.focus.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::Char('?') | KeyCode::Char('a') => {
            app.overlay = Overlay::About;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('/') => {
            app.overlay = Overlay::Search;
            app.search_input.clear();
            return;
        }
        KeyCode::Char('g') => {
            app.request_charts();
            return;
        }
        KeyCode::Char('w') | KeyCode::Char('d') => {
            app.save_csv();
            return;
        }
        _ => {}
    }

    // 3. Focus-specific keys.
    match app.focus {
        Focus::Sectors => handle_sectors_key(app, key),
        Focus::Companies => handle_companies_key(app, key),
        Focus::Fetch => handle_fetch_key(app, key),
        Focus::Table => handle_table_key(app, key),
        Focus::Charts => handle_charts_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_search_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.search_input.clear();
        }
        KeyCode::Enter => {
            let query = std::mem::take(&mut app.search_input);
            app.overlay = Overlay::None;
            app.search_companies(&query);
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

/// Shared cursor movement for the list-like controls.
fn move_cursor(cursor: &mut usize, len: usize, key: KeyCode) -> bool {
    let last = len.saturating_sub(1);
    match key {
        KeyCode::Char('j') | KeyCode::Down => *cursor = (*cursor + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => *cursor = cursor.saturating_sub(1),
        KeyCode::PageDown => *cursor = (*cursor + PAGE).min(last),
        KeyCode::PageUp => *cursor = cursor.saturating_sub(PAGE),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = last,
        _ => return false,
    }
    true
}

fn handle_sectors_key(app: &mut AppState, key: KeyEvent) {
    let len = app.sidebar.sectors.len();
    if move_cursor(&mut app.sidebar.sector_cursor, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(sector) = app.sidebar.cursor_sector().map(String::from) {
                app.toggle_sector(&sector);
            }
        }
        KeyCode::Char('c') => app.clear_sectors(),
        _ => {}
    }
}

fn handle_companies_key(app: &mut AppState, key: KeyEvent) {
    let len = app.sidebar.companies.len();
    if move_cursor(&mut app.sidebar.company_cursor, len, key.code) {
        return;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(name) = app.sidebar.cursor_company().map(String::from) {
                app.toggle_company(&name);
            }
        }
        KeyCode::Char('c') => app.clear_companies(),
        _ => {}
    }
}

fn handle_fetch_key(app: &mut AppState, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
        app.request_charts();
    }
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) {
    let rows = app.table_view.view.row_count();
    if move_cursor(&mut app.table_view.row_cursor, rows, key.code) {
        return;
    }
    let cols = app.table_view.view.column_count();
    match key.code {
        KeyCode::Char('l') | KeyCode::Right => {
            if app.table_view.col_offset + 1 < cols {
                app.table_view.col_offset += 1;
            }
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.table_view.col_offset = app.table_view.col_offset.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_charts_key(app: &mut AppState, key: KeyEvent) {
    let len = app.charts.charts.len();
    move_cursor(&mut app.charts.scroll, len, key.code);
}
