pub mod auth;
pub mod db;
pub mod editor;
pub mod error;
pub mod media;
pub mod models;
pub mod query;
pub mod render;
pub mod service;
pub mod tags;
pub mod tui;
pub mod utils;

pub use auth::{User, Viewer};
pub use db::Database;
pub use editor::{Editor, EditorState, NoteDraft};
pub use error::{Error, Result};
pub use media::{MediaStore, StoredObject};
pub use models::{Note, NoteBuilder, NoteId, NoteKind, NoteStatus, Priority, UserId};
pub use query::{GroupFilter, NoteQuery, SortKey, TagFilter};
pub use render::{CardAction, CardView, NoteCard};
pub use service::{NoteInput, NoteService};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_accessible_from_crate_root() {
        let db = Database::in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let sort = SortKey::default();
        assert_eq!(sort.as_str(), "created_at_desc");

        let kind = NoteKind::default();
        assert_eq!(format!("{kind}"), "text");

        let query = NoteQuery::active(Viewer::Anonymous);
        assert_eq!(query.status(), NoteStatus::Active);

        let note = NoteBuilder::new()
            .id(NoteId::new(1))
            .title("test")
            .content("test")
            .user_id(UserId::new(1))
            .build();
        assert_eq!(note.priority, Priority::Medium);
    }
}
