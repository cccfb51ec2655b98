//! The note rendering pipeline.
//!
//! Pure computation: maps a query result into display cards, leaving
//! the painting (CLI text or TUI widgets) to thin adapters. All
//! user-supplied text is HTML-escaped unconditionally so any surface
//! embedding card fields into markup is safe by construction.

use std::collections::VecDeque;

use time::macros::format_description;

use crate::models::{Note, NoteId};

/// Escapes `& < > " '` for embedding in markup.
///
/// Applied to every user-supplied field on a card: title, content,
/// tags, and group label.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Which listing a card is rendered for; fixes its action affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardView {
    Active,
    Archived,
}

/// User actions offered on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Load the note into the form controller.
    Edit,
    /// Move to the archive listing.
    Archive,
    /// Move back to the active listing.
    Restore,
    /// Permanent removal; always behind an explicit confirmation.
    Delete,
}

impl CardView {
    /// Actions for this view. Hard delete is only reachable from the
    /// archive view; the active view archives first.
    pub fn actions(self) -> &'static [CardAction] {
        match self {
            CardView::Active => &[CardAction::Edit, CardAction::Archive],
            CardView::Archived => &[CardAction::Restore, CardAction::Delete],
        }
    }
}

/// One display unit per note, with all text fields pre-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub date: String,
    pub tags: Vec<String>,
    /// Escaped group label; `None` when the note has no group.
    pub group_label: Option<String>,
    pub hidden_label: bool,
    /// CSS-style class derived from the note's priority.
    pub priority_class: String,
    pub view: CardView,
}

impl NoteCard {
    /// Builds a card from a note for the given view.
    pub fn from_note(note: &Note, view: CardView) -> Self {
        let format = format_description!("[year]-[month]-[day]");
        let date = note
            .created_at
            .format(&format)
            .unwrap_or_else(|_| note.created_at.to_string());

        NoteCard {
            id: note.id,
            title: escape_html(&note.title),
            content: escape_html(&note.content),
            date,
            tags: note.tags.iter().map(|t| escape_html(t)).collect(),
            group_label: note.group.as_deref().map(escape_html),
            hidden_label: note.hidden,
            priority_class: format!("priority-{}", note.priority),
            view,
        }
    }

    /// The action affordances of this card.
    pub fn actions(&self) -> &'static [CardAction] {
        self.view.actions()
    }
}

/// Materializes cards for a query result.
///
/// The visible container builds up by prepending each produced card,
/// so cards are produced back-to-front; after a full pass the visual
/// order equals the query's requested order.
pub fn build_cards(notes: &[Note], view: CardView) -> Vec<NoteCard> {
    let mut cards: VecDeque<NoteCard> = VecDeque::with_capacity(notes.len());
    for note in notes.iter().rev() {
        cards.push_front(NoteCard::from_note(note, view));
    }
    cards.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteBuilder, Priority, UserId};

    fn note(id: i64, title: &str) -> Note {
        NoteBuilder::new()
            .id(NoteId::new(id))
            .title(title)
            .content("content")
            .user_id(UserId::new(1))
            .build()
    }

    #[test]
    fn escape_covers_all_five_characters() {
        assert_eq!(
            escape_html(r#"<a href="x" onclick='y'>&</a>"#),
            "&lt;a href=&quot;x&quot; onclick=&#39;y&#39;&gt;&amp;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn card_escapes_every_user_field() {
        let mut n = note(1, "<b>title</b>");
        n.content = "a & b".to_string();
        n.tags = vec!["<tag>".to_string()];
        n.group = Some("\"work\"".to_string());

        let card = NoteCard::from_note(&n, CardView::Active);
        assert_eq!(card.title, "&lt;b&gt;title&lt;/b&gt;");
        assert_eq!(card.content, "a &amp; b");
        assert_eq!(card.tags, vec!["&lt;tag&gt;"]);
        assert_eq!(card.group_label.as_deref(), Some("&quot;work&quot;"));
    }

    #[test]
    fn card_reflects_priority_and_hidden_flag() {
        let mut n = note(1, "t");
        n.priority = Priority::High;
        n.hidden = true;

        let card = NoteCard::from_note(&n, CardView::Active);
        assert_eq!(card.priority_class, "priority-high");
        assert!(card.hidden_label);
    }

    #[test]
    fn ungrouped_note_has_no_group_label() {
        let card = NoteCard::from_note(&note(1, "t"), CardView::Active);
        assert_eq!(card.group_label, None);
    }

    #[test]
    fn build_cards_preserves_query_order() {
        let notes = vec![note(1, "first"), note(2, "second"), note(3, "third")];

        let cards = build_cards(&notes, CardView::Active);
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn build_cards_of_empty_listing_is_empty() {
        assert!(build_cards(&[], CardView::Archived).is_empty());
    }

    #[test]
    fn actions_differ_per_view() {
        assert_eq!(
            CardView::Active.actions(),
            &[CardAction::Edit, CardAction::Archive]
        );
        assert_eq!(
            CardView::Archived.actions(),
            &[CardAction::Restore, CardAction::Delete]
        );
    }
}
