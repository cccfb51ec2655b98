//! Terminal User Interface module for ideabox.
//!
//! Provides a paged TUI over the note store: the active listing, the
//! archive, and a task placeholder page, using ratatui for rendering
//! and crossterm for terminal management.

use std::io;
use std::panic;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

mod app;
pub mod event;
mod ui;

pub use app::{App, Page};

use crate::query::NoteQuery;
use crate::render::{self, CardView};
use crate::service::NoteService;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This should always be called before exiting the TUI, even in error
/// cases, to prevent terminal corruption.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic handler.
///
/// Does not require a Terminal reference, making it safe to call from
/// a panic hook. Ignores errors since we're likely already in a bad
/// state.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal before panicking.
///
/// The original panic hook is preserved and called after terminal
/// restoration.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the main event loop for the TUI.
///
/// Polls for keyboard events, updates app state, reloads the listing
/// when a page, sort, or filter change requires it, and re-renders.
/// Exits when the user presses 'q' or an error occurs. Terminal state
/// is always restored, even on error.
pub fn run_event_loop(app: &mut App, service: &NoteService) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, service, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    service: &NoteService,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        if app.take_reload() {
            load_page(app, service)?;
        }

        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        if crossterm_event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
        {
            let should_quit = event::handle_key_event(app, key);
            if should_quit {
                break;
            }
        }
    }

    Ok(())
}

/// Loads the current page's listing and the tag cloud into the App.
///
/// The Tasks page and the anonymous archive have no listing; both
/// clear the cards instead of querying.
fn load_page(app: &mut App, service: &NoteService) -> Result<()> {
    let tag_cloud = service
        .tag_cloud(app.viewer())
        .context("Failed to load tag cloud")?;

    let query = match app.page() {
        Page::Notes => Some((NoteQuery::active(app.viewer()), CardView::Active)),
        Page::Archive => app
            .viewer()
            .user_id()
            .map(|owner| (NoteQuery::archived(owner), CardView::Archived)),
        Page::Tasks => None,
    };

    let cards = match query {
        Some((mut query, view)) => {
            query = query.with_sort(app.sort());
            if let Some(tag) = app.tag_filter() {
                query = query.with_tag(tag);
            }
            let notes = service.list_notes(&query).context("Failed to load notes")?;
            render::build_cards(&notes, view)
        }
        None => Vec::new(),
    };

    app.set_listing(cards, tag_cloud);
    Ok(())
}

/// Entry point for the TUI application.
///
/// Opens the database, resolves the session viewer, loads the first
/// page, and starts the event loop.
pub fn run() -> Result<()> {
    init_panic_hook();

    let db_path = crate::utils::get_database_path().context("Failed to get database path")?;
    crate::utils::ensure_parent_directory(&db_path)
        .context("Failed to ensure database directory")?;

    let db = crate::Database::open(&db_path).context("Failed to open database")?;
    let viewer = crate::auth::viewer(&db).context("Failed to resolve session")?;

    let service = NoteService::new(db);

    let mut app = App::new(viewer);
    load_page(&mut app, &service).context("Failed to load notes from database")?;
    app.take_reload();

    run_event_loop(&mut app, &service).context("TUI event loop failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{self, Viewer};
    use crate::service::NoteInput;

    fn service_with_owner() -> (NoteService, Viewer) {
        let db = crate::Database::in_memory().expect("failed to create in-memory database");
        let user = auth::sign_up(&db, "owner@example.com", "secret1").expect("sign up");
        (NoteService::new(db), Viewer::User(user.id))
    }

    fn input(title: &str, tags: &[&str]) -> NoteInput {
        NoteInput {
            title: title.to_string(),
            content: "content".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..NoteInput::default()
        }
    }

    #[test]
    fn load_page_populates_cards_and_tag_cloud() {
        let (service, viewer) = service_with_owner();
        service
            .create_note(input("First", &["rust"]), viewer)
            .expect("create");
        service
            .create_note(input("Second", &["tui"]), viewer)
            .expect("create");

        let mut app = App::new(viewer);
        load_page(&mut app, &service).expect("load");

        assert_eq!(app.cards().len(), 2);
        // Default sort is newest first
        assert_eq!(app.cards()[0].title, "Second");
        assert_eq!(app.tag_cloud(), ["rust", "tui"]);
    }

    #[test]
    fn load_page_applies_tag_filter() {
        let (service, viewer) = service_with_owner();
        service
            .create_note(input("Tagged", &["rust"]), viewer)
            .expect("create");
        service
            .create_note(input("Other", &["tui"]), viewer)
            .expect("create");

        let mut app = App::new(viewer);
        load_page(&mut app, &service).expect("load");
        app.cycle_tag(); // filter on "rust"
        load_page(&mut app, &service).expect("reload");

        assert_eq!(app.tag_filter(), Some("rust"));
        assert_eq!(app.cards().len(), 1);
        assert_eq!(app.cards()[0].title, "Tagged");
    }

    #[test]
    fn archive_page_shows_archived_notes_only() {
        let (service, viewer) = service_with_owner();
        let note = service
            .create_note(input("Keep", &[]), viewer)
            .expect("create");
        service.archive_note(note.id, viewer).expect("archive");
        service
            .create_note(input("Active", &[]), viewer)
            .expect("create");

        let mut app = App::new(viewer);
        app.set_page(Page::Archive);
        load_page(&mut app, &service).expect("load");

        assert_eq!(app.cards().len(), 1);
        assert_eq!(app.cards()[0].title, "Keep");
    }

    #[test]
    fn anonymous_archive_page_loads_no_cards() {
        let db = crate::Database::in_memory().expect("in-memory database");
        let service = NoteService::new(db);

        let mut app = App::new(Viewer::Anonymous);
        app.set_page(Page::Archive);

        load_page(&mut app, &service).expect("load");
        assert!(app.cards().is_empty());
    }

    #[test]
    fn tasks_page_loads_no_cards() {
        let (service, viewer) = service_with_owner();
        service
            .create_note(input("Note", &[]), viewer)
            .expect("create");

        let mut app = App::new(viewer);
        app.set_page(Page::Tasks);
        load_page(&mut app, &service).expect("load");

        assert!(app.cards().is_empty());
    }

    #[test]
    fn load_page_with_empty_database() {
        let db = crate::Database::in_memory().expect("in-memory database");
        let service = NoteService::new(db);
        let mut app = App::new(Viewer::Anonymous);

        load_page(&mut app, &service).expect("load");
        assert!(app.cards().is_empty());
        assert!(app.tag_cloud().is_empty());
    }
}
