//! UI rendering functions for the TUI.
//!
//! Draws the paged layout: a tab bar, the card list with a detail
//! panel beside it, and a shortcut bar showing the active sort and
//! tag filter.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use crate::auth::Viewer;
use crate::render::{CardAction, NoteCard};

use super::app::{App, Page};

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    render_tab_bar(frame, app, main_chunks[0]);
    match app.page() {
        Page::Notes | Page::Archive => render_card_page(frame, app, main_chunks[1]),
        Page::Tasks => render_tasks_page(frame, main_chunks[1]),
    }
    render_shortcut_bar(frame, app, main_chunks[2]);
}

/// Renders the page tabs at the top of the screen.
fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Page::all().iter().map(|p| Line::from(p.title())).collect();
    let selected = Page::all()
        .iter()
        .position(|p| *p == app.page())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title("ideabox"))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Renders the Notes or Archive page: card list on the left, detail
/// panel for the selected card on the right.
fn render_card_page(frame: &mut Frame, app: &App, area: Rect) {
    // The archive listing is owner-only; anonymous viewers get the
    // sign-in prompt instead of an empty list.
    if app.page() == Page::Archive && matches!(app.viewer(), Viewer::Anonymous) {
        let prompt = Paragraph::new("Please sign in to view your archived notes.")
            .block(Block::default().borders(Borders::ALL).title("Archive"))
            .wrap(Wrap { trim: false });
        frame.render_widget(prompt, area);
        return;
    }

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_card_list(frame, app, content_chunks[0]);
    render_card_detail(frame, app, content_chunks[1]);
}

/// Renders the card list for the current page.
fn render_card_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .cards()
        .iter()
        .map(|card| {
            let mut spans = vec![Span::raw(card.title.clone()), Span::raw(" ")];
            spans.push(Span::styled(
                format!("[{} | {}]", card.date, card.priority_class),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            if card.hidden_label {
                spans.push(Span::styled(" hidden", Style::default().fg(Color::Yellow)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.page().title()),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::REVERSED),
        );

    let mut list_state = ListState::default();
    list_state.select(app.selected_index());

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Renders the detail panel for the selected card.
fn render_card_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Detail");

    let content = match app.selected_card() {
        Some(card) => card_detail_text(card),
        None => Text::from("No note selected"),
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Builds the detail text for one card.
fn card_detail_text(card: &NoteCard) -> Text<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let mut text = Text::default();
    text.lines.push(Line::from(vec![
        Span::styled("Title: ", bold),
        Span::raw(card.title.clone()),
    ]));
    text.lines.push(Line::from(vec![
        Span::styled("Created: ", bold),
        Span::styled(card.date.clone(), dim),
    ]));
    if let Some(group) = &card.group_label {
        text.lines.push(Line::from(vec![
            Span::styled("Group: ", bold),
            Span::raw(group.clone()),
        ]));
    }
    if !card.tags.is_empty() {
        text.lines.push(Line::from(vec![
            Span::styled("Tags: ", bold),
            Span::styled(card.tags.join(", "), Style::default().fg(Color::Cyan)),
        ]));
    }
    if card.hidden_label {
        text.lines.push(Line::from(Span::styled(
            "Hidden from public listings",
            Style::default().fg(Color::Yellow),
        )));
    }

    text.lines.push(Line::from(""));
    text.lines.push(Line::from(card.content.clone()));

    // Mutations run through the CLI; name the exact commands for this
    // view rather than advertising keys the TUI does not bind.
    text.lines.push(Line::from(""));
    let commands: Vec<String> = card
        .actions()
        .iter()
        .map(|a| {
            let verb = match a {
                CardAction::Edit => "edit",
                CardAction::Archive => "archive",
                CardAction::Restore => "restore",
                CardAction::Delete => "delete",
            };
            format!("ideabox {verb} {}", card.id)
        })
        .collect();
    text.lines.push(Line::from(vec![
        Span::styled("CLI: ", bold),
        Span::styled(commands.join(" | "), dim),
    ]));

    text
}

/// Renders the Tasks placeholder page.
fn render_tasks_page(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("Task functionality coming soon!")
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Renders the shortcut bar at the bottom of the screen.
///
/// Shows the active sort and tag filter next to the key bindings.
fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled("q", key_style),
        Span::raw(": quit"),
        Span::styled(" | ", sep_style),
        Span::styled("Tab", key_style),
        Span::raw(": next page"),
        Span::styled(" | ", sep_style),
        Span::styled("j/k", key_style),
        Span::raw(": navigate"),
        Span::styled(" | ", sep_style),
        Span::styled("s", key_style),
        Span::raw(format!(": sort ({})", app.sort().as_str())),
        Span::styled(" | ", sep_style),
        Span::styled("t", key_style),
        Span::raw(format!(
            ": tag ({})",
            app.tag_filter().unwrap_or("all")
        )),
    ];

    if !app.status().is_empty() {
        spans.push(Span::styled(" | ", sep_style));
        spans.push(Span::styled(
            app.status().to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
