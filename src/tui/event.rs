//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes. Keys
//! that change which notes should be shown only schedule a reload; the
//! event loop performs the query.

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Page};

/// Handles a keyboard event and updates the app state accordingly.
///
/// Returns `true` if the application should quit, `false` otherwise.
///
/// # Event Handling
///
/// - `q`: Quit application
/// - `1` / `2` / `3`: Jump to the Notes, Archive, or Tasks page
/// - `Tab`: Cycle to the next page
/// - `j` / `Down`, `k` / `Up`: Move the selection
/// - `s`: Cycle the sort key
/// - `t`: Cycle the tag filter
/// - `r`: Reload the current page
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.is_empty() {
        return true;
    }

    match key.code {
        KeyCode::Char('1') => app.set_page(Page::Notes),
        KeyCode::Char('2') => app.set_page(Page::Archive),
        KeyCode::Char('3') => app.set_page(Page::Tasks),
        KeyCode::Tab => app.set_page(app.page().next()),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('t') => app.cycle_tag(),
        KeyCode::Char('r') => app.request_reload(),
        _ => {}
    }

    false
}
