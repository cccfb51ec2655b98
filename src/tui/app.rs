//! TUI application state.

use crate::auth::Viewer;
use crate::query::SortKey;
use crate::render::NoteCard;

/// Top-level pages reachable from the navigation bar.
///
/// Tasks is a declared placeholder page with no functionality yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Notes,
    Archive,
    Tasks,
}

impl Page {
    /// Display title for the tab bar.
    pub fn title(self) -> &'static str {
        match self {
            Page::Notes => "Notes",
            Page::Archive => "Archive",
            Page::Tasks => "Tasks",
        }
    }

    /// All pages in tab order.
    pub fn all() -> [Page; 3] {
        [Page::Notes, Page::Archive, Page::Tasks]
    }

    /// The page after this one in tab order, wrapping.
    pub fn next(self) -> Page {
        match self {
            Page::Notes => Page::Archive,
            Page::Archive => Page::Tasks,
            Page::Tasks => Page::Notes,
        }
    }
}

/// Application state for the TUI.
///
/// Holds the current page, the rendered cards for it, the tag-filter
/// and sort selections, and a reload flag consumed by the event loop
/// whenever a selection change requires a fresh query.
pub struct App {
    viewer: Viewer,
    page: Page,
    cards: Vec<NoteCard>,
    tag_cloud: Vec<String>,
    tag_filter: Option<String>,
    sort: SortKey,
    selected: Option<usize>,
    needs_reload: bool,
    status: String,
}

impl App {
    /// Creates an App for the given viewer, starting on the Notes page
    /// with a pending reload.
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            page: Page::Notes,
            cards: Vec::new(),
            tag_cloud: Vec::new(),
            tag_filter: None,
            sort: SortKey::default(),
            selected: None,
            needs_reload: true,
            status: String::new(),
        }
    }

    pub fn viewer(&self) -> Viewer {
        self.viewer
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Switches page, clearing the selection and scheduling a reload.
    pub fn set_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.selected = None;
            self.needs_reload = true;
        }
    }

    pub fn cards(&self) -> &[NoteCard] {
        &self.cards
    }

    /// Replaces the listing and tag cloud after a reload.
    pub fn set_listing(&mut self, cards: Vec<NoteCard>, tag_cloud: Vec<String>) {
        if self
            .selected
            .is_some_and(|i| i >= cards.len())
        {
            self.selected = if cards.is_empty() { None } else { Some(cards.len() - 1) };
        }
        self.cards = cards;
        self.tag_cloud = tag_cloud;
    }

    pub fn tag_cloud(&self) -> &[String] {
        &self.tag_cloud
    }

    pub fn tag_filter(&self) -> Option<&str> {
        self.tag_filter.as_deref()
    }

    /// Cycles the mutually exclusive tag filter: none, each cloud tag
    /// in order, then none again. Schedules a reload.
    pub fn cycle_tag(&mut self) {
        if self.tag_cloud.is_empty() {
            return;
        }
        self.tag_filter = match &self.tag_filter {
            None => Some(self.tag_cloud[0].clone()),
            Some(current) => {
                let position = self.tag_cloud.iter().position(|t| t == current);
                match position {
                    Some(i) if i + 1 < self.tag_cloud.len() => {
                        Some(self.tag_cloud[i + 1].clone())
                    }
                    _ => None,
                }
            }
        };
        self.selected = None;
        self.needs_reload = true;
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Advances to the next sort key, wrapping. Schedules a reload.
    pub fn cycle_sort(&mut self) {
        let all = SortKey::all();
        let i = all.iter().position(|s| *s == self.sort).unwrap_or(0);
        self.sort = all[(i + 1) % all.len()];
        self.needs_reload = true;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_card(&self) -> Option<&NoteCard> {
        self.selected.and_then(|i| self.cards.get(i))
    }

    /// Moves the selection down, stopping at the last card.
    pub fn select_next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i + 1).min(self.cards.len() - 1),
        });
    }

    /// Moves the selection up, stopping at the first card.
    pub fn select_previous(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => i.saturating_sub(1),
        });
    }

    /// Requests a reload of the current page.
    pub fn request_reload(&mut self) {
        self.needs_reload = true;
    }

    /// Consumes the reload flag.
    pub fn take_reload(&mut self) -> bool {
        std::mem::take(&mut self.needs_reload)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteBuilder, NoteId, UserId};
    use crate::render::{CardView, NoteCard};

    fn cards(n: usize) -> Vec<NoteCard> {
        (0..n)
            .map(|i| {
                let note = NoteBuilder::new()
                    .id(NoteId::new(i as i64 + 1))
                    .title(format!("note {i}"))
                    .content("c")
                    .user_id(UserId::new(1))
                    .build();
                NoteCard::from_note(&note, CardView::Active)
            })
            .collect()
    }

    #[test]
    fn starts_on_notes_page_with_pending_reload() {
        let mut app = App::new(Viewer::Anonymous);
        assert_eq!(app.page(), Page::Notes);
        assert!(app.take_reload());
        assert!(!app.take_reload());
    }

    #[test]
    fn page_switch_clears_selection_and_schedules_reload() {
        let mut app = App::new(Viewer::Anonymous);
        app.take_reload();
        app.set_listing(cards(2), vec![]);
        app.select_next();

        app.set_page(Page::Archive);
        assert_eq!(app.selected_index(), None);
        assert!(app.take_reload());

        // Switching to the current page is a no-op
        app.set_page(Page::Archive);
        assert!(!app.take_reload());
    }

    #[test]
    fn selection_stops_at_ends() {
        let mut app = App::new(Viewer::Anonymous);
        app.set_listing(cards(2), vec![]);

        app.select_previous();
        assert_eq!(app.selected_index(), Some(0));
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_index(), Some(1));
        app.select_previous();
        assert_eq!(app.selected_index(), Some(0));
    }

    #[test]
    fn selection_on_empty_listing_stays_none() {
        let mut app = App::new(Viewer::Anonymous);
        app.select_next();
        assert_eq!(app.selected_index(), None);
        assert!(app.selected_card().is_none());
    }

    #[test]
    fn shrinking_listing_clamps_selection() {
        let mut app = App::new(Viewer::Anonymous);
        app.set_listing(cards(3), vec![]);
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_index(), Some(2));

        app.set_listing(cards(1), vec![]);
        assert_eq!(app.selected_index(), Some(0));

        app.set_listing(cards(0), vec![]);
        assert_eq!(app.selected_index(), None);
    }

    #[test]
    fn tag_filter_cycles_through_cloud_and_back_to_none() {
        let mut app = App::new(Viewer::Anonymous);
        app.set_listing(vec![], vec!["a".to_string(), "b".to_string()]);

        assert_eq!(app.tag_filter(), None);
        app.cycle_tag();
        assert_eq!(app.tag_filter(), Some("a"));
        app.cycle_tag();
        assert_eq!(app.tag_filter(), Some("b"));
        app.cycle_tag();
        assert_eq!(app.tag_filter(), None);
    }

    #[test]
    fn tag_cycle_without_cloud_is_a_no_op() {
        let mut app = App::new(Viewer::Anonymous);
        app.take_reload();
        app.cycle_tag();
        assert_eq!(app.tag_filter(), None);
        assert!(!app.take_reload());
    }

    #[test]
    fn sort_cycles_through_all_keys() {
        let mut app = App::new(Viewer::Anonymous);
        let start = app.sort();
        for _ in 0..SortKey::all().len() {
            app.cycle_sort();
        }
        assert_eq!(app.sort(), start);
    }

    #[test]
    fn page_next_wraps() {
        assert_eq!(Page::Notes.next(), Page::Archive);
        assert_eq!(Page::Archive.next(), Page::Tasks);
        assert_eq!(Page::Tasks.next(), Page::Notes);
    }
}
