use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{NoteId, NoteKind, NoteStatus, Priority, UserId};

/// A captured note/idea.
///
/// Notes are the primary unit of capture in the system. Each note has a
/// title, content interpreted per its `kind`, a normalized tag list, an
/// optional group label, a priority, a hidden flag, and a lifecycle
/// status. The store is authoritative; this struct is a row snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier assigned by the store.
    pub id: NoteId,
    /// Non-empty display title.
    pub title: String,
    /// Content; interpretation depends on `kind`.
    pub content: String,
    /// Content kind selected when the note was captured.
    pub kind: NoteKind,
    /// Normalized tags: trimmed, non-empty, deduplicated.
    pub tags: Vec<String>,
    /// Optional group label. `None` covers the source's "none" sentinel.
    pub group: Option<String>,
    /// Priority used for sorting and display class.
    pub priority: Priority,
    /// Hidden notes are excluded from anonymous listings.
    pub hidden: bool,
    /// Active or archived.
    pub status: NoteStatus,
    /// Store-assigned creation time; the default sort key.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Owner; set at creation, immutable.
    pub user_id: UserId,
}

impl Note {
    /// True when the note is visible to an unauthenticated viewer.
    pub fn publicly_visible(&self) -> bool {
        !self.hidden && self.status == NoteStatus::Active
    }
}

/// Builder for constructing `Note` instances with optional fields.
///
/// # Examples
///
/// ```
/// use ideabox::{NoteBuilder, NoteId, UserId};
///
/// let note = NoteBuilder::new()
///     .id(NoteId::new(1))
///     .title("First idea")
///     .content("Hello")
///     .user_id(UserId::new(1))
///     .build();
///
/// assert_eq!(note.title, "First idea");
/// assert!(note.tags.is_empty());
/// assert!(!note.hidden);
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    title: Option<String>,
    content: Option<String>,
    kind: Option<NoteKind>,
    tags: Option<Vec<String>>,
    group: Option<String>,
    priority: Option<Priority>,
    hidden: Option<bool>,
    status: Option<NoteStatus>,
    created_at: Option<OffsetDateTime>,
    user_id: Option<UserId>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the content kind.
    pub fn kind(mut self, kind: NoteKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the tag list.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sets the group label.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the hidden flag.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Sets the status.
    pub fn status(mut self, status: NoteStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the creation timestamp.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the owner.
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Builds the `Note`, using defaults for optional fields.
    ///
    /// # Panics
    ///
    /// Panics if `id`, `title`, `content`, or `user_id` have not been set.
    pub fn build(self) -> Note {
        Note {
            id: self.id.expect("id is required"),
            title: self.title.expect("title is required"),
            content: self.content.expect("content is required"),
            kind: self.kind.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            group: self.group,
            priority: self.priority.unwrap_or_default(),
            hidden: self.hidden.unwrap_or(false),
            status: self.status.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(OffsetDateTime::now_utc),
            user_id: self.user_id.expect("user_id is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_note() -> Note {
        NoteBuilder::new()
            .id(NoteId::new(1))
            .title("Test note")
            .content("content")
            .user_id(UserId::new(1))
            .build()
    }

    #[test]
    fn builder_applies_defaults() {
        let note = minimal_note();

        assert_eq!(note.kind, NoteKind::Text);
        assert!(note.tags.is_empty());
        assert_eq!(note.group, None);
        assert_eq!(note.priority, Priority::Medium);
        assert!(!note.hidden);
        assert_eq!(note.status, NoteStatus::Active);
    }

    #[test]
    fn builder_allows_setting_all_fields() {
        let now = OffsetDateTime::now_utc();
        let note = NoteBuilder::new()
            .id(NoteId::new(42))
            .title("Complete")
            .content("https://example.com")
            .kind(NoteKind::Link)
            .tags(vec!["a".to_string(), "b".to_string()])
            .group("work")
            .priority(Priority::High)
            .hidden(true)
            .status(NoteStatus::Archived)
            .created_at(now)
            .user_id(UserId::new(9))
            .build();

        assert_eq!(note.id, NoteId::new(42));
        assert_eq!(note.kind, NoteKind::Link);
        assert_eq!(note.tags, vec!["a", "b"]);
        assert_eq!(note.group.as_deref(), Some("work"));
        assert_eq!(note.priority, Priority::High);
        assert!(note.hidden);
        assert_eq!(note.status, NoteStatus::Archived);
        assert_eq!(note.created_at, now);
        assert_eq!(note.user_id, UserId::new(9));
    }

    #[test]
    fn public_visibility_requires_active_and_not_hidden() {
        let mut note = minimal_note();
        assert!(note.publicly_visible());

        note.hidden = true;
        assert!(!note.publicly_visible());

        note.hidden = false;
        note.status = NoteStatus::Archived;
        assert!(!note.publicly_visible());
    }

    #[test]
    fn note_serialization_roundtrip() {
        let note = minimal_note();

        let json = serde_json::to_string(&note).unwrap();
        let deserialized: Note = serde_json::from_str(&json).unwrap();

        assert_eq!(note, deserialized);
    }
}
