use rusqlite::{Row, params_from_iter};
use time::OffsetDateTime;
use tracing::debug;

use crate::auth::Viewer;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Note, NoteBuilder, NoteId, NoteKind, NoteStatus, Priority};
use crate::query::NoteQuery;
use crate::tags;

/// Validated payload for creating or updating a note.
///
/// Produced by the editor after form validation; the service still
/// re-normalizes tags so the normalization invariant holds for every
/// caller, not just the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub kind: NoteKind,
    pub tags: Vec<String>,
    pub group: Option<String>,
    pub priority: Priority,
    pub hidden: bool,
}

/// Service layer providing note management operations.
///
/// NoteService owns a Database instance and provides the store-facing
/// logic for notes and the derived views. It is UI-independent and is
/// shared by the CLI and the TUI.
pub struct NoteService {
    db: Database,
}

impl NoteService {
    /// Creates a new NoteService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    ///
    /// Useful for testing or advanced operations that need direct
    /// database access (the session functions take it directly).
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates a new note owned by the signed-in viewer.
    ///
    /// The store assigns the id and creation timestamp; the note starts
    /// active. Title and content are validated and tags are normalized
    /// before persistence, for every caller, not just the editor.
    pub fn create_note(&self, input: NoteInput, viewer: Viewer) -> Result<Note> {
        let owner = viewer.require("save notes")?;
        validate_input(&input)?;

        let tags = tags::normalize_tag_list(&input.tags);
        let now = OffsetDateTime::now_utc();
        let conn = self.db.connection();

        conn.execute(
            "INSERT INTO notes (title, content, kind, tags, grp, priority, hidden, status, created_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                input.title,
                input.content,
                input.kind.as_str(),
                serde_json::to_string(&tags)?,
                input.group,
                input.priority.as_str(),
                input.hidden,
                NoteStatus::Active.as_str(),
                now.unix_timestamp(),
                owner.get(),
            ],
        )?;
        let id = NoteId::new(conn.last_insert_rowid());
        debug!(note_id = id.get(), "note created");

        let mut builder = NoteBuilder::new()
            .id(id)
            .title(input.title)
            .content(input.content)
            .kind(input.kind)
            .tags(tags)
            .priority(input.priority)
            .hidden(input.hidden)
            .created_at(OffsetDateTime::from_unix_timestamp(now.unix_timestamp())?)
            .user_id(owner);
        if let Some(group) = input.group {
            builder = builder.group(group);
        }
        Ok(builder.build())
    }

    /// Retrieves a note by its ID.
    ///
    /// Returns `None` if no note exists with the given ID. This is not
    /// considered an error condition.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(
            "SELECT id, title, content, kind, tags, grp, priority, hidden, status, created_at, user_id
             FROM notes WHERE id = ?1",
        )?;

        let mut rows = stmt.query([id.get()])?;
        match rows.next()? {
            Some(row) => Ok(Some(note_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Updates an existing note, scoped to its owner.
    ///
    /// The owner and creation timestamp are immutable; everything else
    /// is replaced by the input. A target that does not exist or is not
    /// owned by the viewer affects zero rows, which the store cannot
    /// tell apart, so both surface as [`Error::NoteNotFound`].
    pub fn update_note(&self, id: NoteId, input: NoteInput, viewer: Viewer) -> Result<Note> {
        let owner = viewer.require("update notes")?;
        validate_input(&input)?;

        let tags = tags::normalize_tag_list(&input.tags);
        let affected = self.db.connection().execute(
            "UPDATE notes
             SET title = ?1, content = ?2, kind = ?3, tags = ?4, grp = ?5, priority = ?6, hidden = ?7
             WHERE id = ?8 AND user_id = ?9",
            rusqlite::params![
                input.title,
                input.content,
                input.kind.as_str(),
                serde_json::to_string(&tags)?,
                input.group,
                input.priority.as_str(),
                input.hidden,
                id.get(),
                owner.get(),
            ],
        )?;

        if affected == 0 {
            return Err(Error::NoteNotFound(id));
        }
        debug!(note_id = id.get(), "note updated");
        self.get_note(id)?.ok_or(Error::NoteNotFound(id))
    }

    /// Archives an active note. Idempotent: archiving an already
    /// archived note is a no-op for the data.
    pub fn archive_note(&self, id: NoteId, viewer: Viewer) -> Result<()> {
        self.set_status(id, viewer, NoteStatus::Archived, "archive notes")
    }

    /// Restores an archived note to the active listing. Idempotent.
    pub fn restore_note(&self, id: NoteId, viewer: Viewer) -> Result<()> {
        self.set_status(id, viewer, NoteStatus::Active, "restore notes")
    }

    fn set_status(
        &self,
        id: NoteId,
        viewer: Viewer,
        status: NoteStatus,
        action: &'static str,
    ) -> Result<()> {
        let owner = viewer.require(action)?;
        let affected = self.db.connection().execute(
            "UPDATE notes SET status = ?1 WHERE id = ?2 AND user_id = ?3",
            rusqlite::params![status.as_str(), id.get(), owner.get()],
        )?;

        if affected == 0 {
            return Err(Error::NoteNotFound(id));
        }
        debug!(note_id = id.get(), status = status.as_str(), "status changed");
        Ok(())
    }

    /// Permanently deletes a note, scoped to its owner.
    ///
    /// Returns whether a row was removed. Deleting a note that does not
    /// exist (or is not owned) returns `Ok(false)`.
    pub fn delete_note(&self, id: NoteId, viewer: Viewer) -> Result<bool> {
        let owner = viewer.require("delete notes")?;
        let affected = self.db.connection().execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id.get(), owner.get()],
        )?;

        if affected > 0 {
            debug!(note_id = id.get(), "note deleted");
        }
        Ok(affected > 0)
    }

    /// Lists notes matching a declarative query.
    ///
    /// Returns an empty list when nothing matches. Store failures are
    /// returned as errors rather than degraded to an empty result, so
    /// callers can distinguish "no notes" from "load failed".
    pub fn list_notes(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        let (sql, params) = query.to_sql();
        let conn = self.db.connection();
        let mut stmt = conn.prepare(&sql)?;

        let mut notes = Vec::new();
        let mut rows = stmt.query(params_from_iter(params))?;
        while let Some(row) = rows.next()? {
            notes.push(note_from_row(row)?);
        }
        debug!(count = notes.len(), "listed notes");
        Ok(notes)
    }

    /// Computes the tag cloud over the viewer's full note collection
    /// (both statuses, unfiltered by tag), sorted lexicographically.
    ///
    /// Recomputed in full on every call; no caching.
    pub fn tag_cloud(&self, viewer: Viewer) -> Result<Vec<String>> {
        let notes = self.all_notes_for(viewer)?;
        Ok(tags::tag_cloud(&notes))
    }

    /// Computes the distinct group labels of the viewer's notes,
    /// excluding the absent-group sentinel, sorted lexicographically.
    ///
    /// Anonymous viewers have no groups.
    pub fn groups(&self, viewer: Viewer) -> Result<Vec<String>> {
        let Some(owner) = viewer.user_id() else {
            return Ok(Vec::new());
        };

        let conn = self.db.connection();
        let mut stmt = conn.prepare("SELECT grp FROM notes WHERE user_id = ?1")?;
        let rows = stmt.query_map([owner.get()], |row| row.get::<_, Option<String>>(0))?;

        let mut groups = Vec::new();
        for row in rows {
            groups.push(row?);
        }
        Ok(tags::group_list(groups))
    }

    /// Fetches the viewer's full note set: everything they own when
    /// signed in, the public active set otherwise.
    fn all_notes_for(&self, viewer: Viewer) -> Result<Vec<Note>> {
        let conn = self.db.connection();
        let (sql, param) = match viewer.user_id() {
            Some(owner) => (
                "SELECT id, title, content, kind, tags, grp, priority, hidden, status, created_at, user_id
                 FROM notes WHERE user_id = ?1",
                owner.get(),
            ),
            None => (
                "SELECT id, title, content, kind, tags, grp, priority, hidden, status, created_at, user_id
                 FROM notes WHERE hidden = ?1 AND status = 'active'",
                0,
            ),
        };

        let mut stmt = conn.prepare(sql)?;
        let mut notes = Vec::new();
        let mut rows = stmt.query([param])?;
        while let Some(row) = rows.next()? {
            notes.push(note_from_row(row)?);
        }
        Ok(notes)
    }
}

/// Rejects payloads with an empty title or empty content before any
/// store call. Audio payloads arrive with placeholder content, so the
/// content rule holds uniformly across kinds.
fn validate_input(input: &NoteInput) -> Result<()> {
    if input.title.trim().is_empty() {
        return Err(Error::Validation(
            "Please add a title for your note".into(),
        ));
    }
    if input.content.trim().is_empty() {
        return Err(Error::Validation(
            "Please add content for your note".into(),
        ));
    }
    Ok(())
}

/// Maps a notes row (in the canonical column order) to a `Note`.
fn note_from_row(row: &Row<'_>) -> Result<Note> {
    let tags_json: String = row.get(4)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)?;

    let kind: NoteKind = parse_column(row.get::<_, String>(3)?)?;
    let priority: Priority = parse_column(row.get::<_, String>(6)?)?;
    let status: NoteStatus = parse_column(row.get::<_, String>(8)?)?;
    let created_at = OffsetDateTime::from_unix_timestamp(row.get::<_, i64>(9)?)?;

    let mut builder = NoteBuilder::new()
        .id(NoteId::new(row.get(0)?))
        .title(row.get::<_, String>(1)?)
        .content(row.get::<_, String>(2)?)
        .kind(kind)
        .tags(tags)
        .priority(priority)
        .hidden(row.get(7)?)
        .status(status)
        .created_at(created_at)
        .user_id(crate::models::UserId::new(row.get(10)?));

    if let Some(group) = row.get::<_, Option<String>>(5)? {
        builder = builder.group(group);
    }
    Ok(builder.build())
}

fn parse_column<T: std::str::FromStr<Err = String>>(raw: String) -> Result<T> {
    raw.parse().map_err(Error::Corrupt)
}
