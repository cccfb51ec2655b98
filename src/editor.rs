//! The note form controller.
//!
//! Holds exactly one piece of transient state: whether the next save
//! creates a new note or updates an existing one. The mode is an
//! explicit union rather than a free-floating "editing" flag, and it is
//! owned by whichever frontend drives the form.

use crate::auth::Viewer;
use crate::error::{Error, Result};
use crate::models::{Note, NoteId, NoteKind, Priority};
use crate::service::{NoteInput, NoteService};
use crate::tags;

/// Content recorded for audio notes until real capture exists.
pub const AUDIO_PLACEHOLDER: &str = "Audio recording";

/// Save mode of the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorState {
    /// The next save creates a new note.
    #[default]
    Create,
    /// The next save updates this note.
    Editing(NoteId),
}

/// Raw form state: one field per input, unvalidated.
///
/// Each content kind has its own field, mirroring the form's
/// kind-selector tabs; only the field matching `kind` is consulted on
/// save. `image_url` is filled by a successful media upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub kind: NoteKind,
    pub text: String,
    pub link_url: String,
    pub image_url: Option<String>,
    /// Comma-separated free text, normalized on validation.
    pub tags: String,
    /// Free text; empty and "none" both mean no group.
    pub group: String,
    pub priority: Priority,
    pub hidden: bool,
}

impl NoteDraft {
    /// Loads an existing note back into form state for editing.
    pub fn from_note(note: &Note) -> Self {
        let mut draft = NoteDraft {
            title: note.title.clone(),
            kind: note.kind,
            tags: note.tags.join(", "),
            group: note.group.clone().unwrap_or_default(),
            priority: note.priority,
            hidden: note.hidden,
            ..NoteDraft::default()
        };
        match note.kind {
            NoteKind::Text => draft.text = note.content.clone(),
            NoteKind::Link => draft.link_url = note.content.clone(),
            NoteKind::Image => draft.image_url = Some(note.content.clone()),
            NoteKind::Audio => {}
        }
        draft
    }

    /// Validates the draft and produces a store payload.
    ///
    /// Rejects an empty title, and a missing content field for the
    /// selected kind (for images that means no completed upload). Audio
    /// drafts are accepted with a placeholder content value. No store
    /// call happens for a rejected draft.
    pub fn validate(&self) -> Result<NoteInput> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(
                "Please add a title for your note".into(),
            ));
        }

        let content = match self.kind {
            NoteKind::Text => {
                let text = self.text.trim();
                if text.is_empty() {
                    return Err(Error::Validation(
                        "Please add content for your note".into(),
                    ));
                }
                text.to_string()
            }
            NoteKind::Link => {
                let url = self.link_url.trim();
                if url.is_empty() {
                    return Err(Error::Validation(
                        "Please add content for your note".into(),
                    ));
                }
                url.to_string()
            }
            NoteKind::Image => match &self.image_url {
                Some(url) => url.clone(),
                None => {
                    return Err(Error::Validation(
                        "Please add content for your note".into(),
                    ));
                }
            },
            NoteKind::Audio => AUDIO_PLACEHOLDER.to_string(),
        };

        Ok(NoteInput {
            title: self.title.trim().to_string(),
            content,
            kind: self.kind,
            tags: tags::normalize_tags(&self.tags),
            group: tags::normalize_group(&self.group),
            priority: self.priority,
            hidden: self.hidden,
        })
    }
}

/// The form controller: a draft plus a save mode.
#[derive(Debug, Default)]
pub struct Editor {
    state: EditorState,
    pub draft: NoteDraft,
}

impl Editor {
    /// Creates an editor in create mode with an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current save mode.
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Enters edit mode for an existing note, loading it into the form.
    pub fn begin_edit(&mut self, note: &Note) {
        self.state = EditorState::Editing(note.id);
        self.draft = NoteDraft::from_note(note);
    }

    /// Abandons the current draft and returns to create mode.
    pub fn cancel(&mut self) {
        self.state = EditorState::Create;
        self.draft = NoteDraft::default();
    }

    /// Validates the draft and dispatches create-or-update.
    ///
    /// On success the form is cleared and the editor returns to create
    /// mode; callers refresh the listing and derived views. On failure
    /// the draft and mode are kept so the user can correct and retry.
    pub fn submit(&mut self, service: &NoteService, viewer: Viewer) -> Result<Note> {
        let input = self.draft.validate()?;

        let note = match self.state {
            EditorState::Create => service.create_note(input, viewer)?,
            EditorState::Editing(id) => service.update_note(id, input, viewer)?,
        };

        self.cancel();
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;
    use crate::db::Database;

    fn setup() -> (NoteService, Viewer) {
        let service = NoteService::new(Database::in_memory().unwrap());
        let user = auth::sign_up(service.database(), "a@example.com", "secret1").unwrap();
        (service, Viewer::User(user.id))
    }

    fn text_draft(title: &str, text: &str) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            text: text.to_string(),
            ..NoteDraft::default()
        }
    }

    #[test]
    fn validate_rejects_empty_title() {
        let err = text_draft("  ", "body").validate().unwrap_err();
        assert_eq!(err.to_string(), "Please add a title for your note");
    }

    #[test]
    fn validate_requires_content_for_text_and_link() {
        let err = text_draft("Idea", "   ").validate().unwrap_err();
        assert_eq!(err.to_string(), "Please add content for your note");

        let draft = NoteDraft {
            title: "Idea".to_string(),
            kind: NoteKind::Link,
            ..NoteDraft::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn validate_image_requires_completed_upload() {
        let mut draft = NoteDraft {
            title: "Photo".to_string(),
            kind: NoteKind::Image,
            ..NoteDraft::default()
        };
        assert!(draft.validate().is_err());

        draft.image_url = Some("file:///media/1_cat.png".to_string());
        let input = draft.validate().unwrap();
        assert_eq!(input.content, "file:///media/1_cat.png");
        assert_eq!(input.kind, NoteKind::Image);
    }

    #[test]
    fn validate_audio_uses_placeholder_content() {
        let draft = NoteDraft {
            title: "Voice memo".to_string(),
            kind: NoteKind::Audio,
            ..NoteDraft::default()
        };
        let input = draft.validate().unwrap();
        assert_eq!(input.content, AUDIO_PLACEHOLDER);
    }

    #[test]
    fn validate_normalizes_tags_and_group() {
        let mut draft = text_draft("Idea", "Hello");
        draft.tags = "x, y, x".to_string();
        draft.group = "none".to_string();

        let input = draft.validate().unwrap();
        assert_eq!(input.tags, vec!["x", "y"]);
        assert_eq!(input.group, None);
    }

    #[test]
    fn submit_in_create_mode_saves_and_resets() {
        let (service, viewer) = setup();
        let mut editor = Editor::new();
        editor.draft = text_draft("Idea", "Hello");
        editor.draft.tags = "x, y, x".to_string();

        let note = editor.submit(&service, viewer).unwrap();
        assert_eq!(note.title, "Idea");
        assert_eq!(note.tags, vec!["x", "y"]);

        // Back to a clean create form
        assert_eq!(editor.state(), EditorState::Create);
        assert_eq!(editor.draft, NoteDraft::default());
    }

    #[test]
    fn submit_in_edit_mode_updates_the_loaded_note() {
        let (service, viewer) = setup();
        let mut editor = Editor::new();
        editor.draft = text_draft("Before", "body");
        let note = editor.submit(&service, viewer).unwrap();

        editor.begin_edit(&note);
        assert_eq!(editor.state(), EditorState::Editing(note.id));
        assert_eq!(editor.draft.title, "Before");
        assert_eq!(editor.draft.text, "body");

        editor.draft.title = "After".to_string();
        let updated = editor.submit(&service, viewer).unwrap();
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "After");
        assert_eq!(editor.state(), EditorState::Create);
    }

    #[test]
    fn failed_submit_keeps_mode_and_draft() {
        let (service, viewer) = setup();
        let mut editor = Editor::new();
        editor.draft = text_draft("Before", "body");
        let note = editor.submit(&service, viewer).unwrap();

        editor.begin_edit(&note);
        editor.draft.title = String::new();

        assert!(editor.submit(&service, viewer).is_err());
        assert_eq!(editor.state(), EditorState::Editing(note.id));
    }

    #[test]
    fn cancel_returns_to_create_mode() {
        let (service, viewer) = setup();
        let mut editor = Editor::new();
        editor.draft = text_draft("Idea", "body");
        let note = editor.submit(&service, viewer).unwrap();

        editor.begin_edit(&note);
        editor.cancel();
        assert_eq!(editor.state(), EditorState::Create);
        assert_eq!(editor.draft, NoteDraft::default());
    }

    #[test]
    fn draft_round_trips_each_kind() {
        let (service, viewer) = setup();
        let mut editor = Editor::new();
        editor.draft = NoteDraft {
            title: "Bookmark".to_string(),
            kind: NoteKind::Link,
            link_url: "https://example.com".to_string(),
            ..NoteDraft::default()
        };
        let note = editor.submit(&service, viewer).unwrap();

        let draft = NoteDraft::from_note(&note);
        assert_eq!(draft.kind, NoteKind::Link);
        assert_eq!(draft.link_url, "https://example.com");
        assert!(draft.text.is_empty());
    }
}
