//! Declarative note queries.
//!
//! A listing is described by a small value object instead of an
//! imperatively chained filter expression, so the translation to SQL
//! lives in one place and can be tested without a live store. The two
//! listing modes (active and archived) are fixed at construction and
//! never mixed; the archive listing is only constructible for a
//! signed-in owner.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::Value;

use crate::auth::Viewer;
use crate::models::{NoteStatus, UserId};

/// Tag filter: everything, or only notes whose tag set contains one tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

/// Group filter: everything, or only notes with exactly this group label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupFilter {
    #[default]
    All,
    Group(String),
}

/// Sort order for a listing. Default is newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
    PriorityDesc,
    PriorityAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    /// Returns the wire/CLI representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::CreatedAtDesc => "created_at_desc",
            SortKey::CreatedAtAsc => "created_at_asc",
            SortKey::PriorityDesc => "priority_desc",
            SortKey::PriorityAsc => "priority_asc",
            SortKey::TitleAsc => "title_asc",
            SortKey::TitleDesc => "title_desc",
        }
    }

    /// All sort keys in selector order.
    pub fn all() -> [SortKey; 6] {
        [
            SortKey::CreatedAtDesc,
            SortKey::CreatedAtAsc,
            SortKey::PriorityDesc,
            SortKey::PriorityAsc,
            SortKey::TitleAsc,
            SortKey::TitleDesc,
        ]
    }

    /// SQL ORDER BY clause for this key.
    ///
    /// Priority sorts rank low < medium < high; title sorts are
    /// case-insensitive. Ties are broken by id so the order is stable.
    fn order_clause(self) -> &'static str {
        match self {
            SortKey::CreatedAtDesc => "created_at DESC, id DESC",
            SortKey::CreatedAtAsc => "created_at ASC, id ASC",
            // Stable within equal priority: newest first
            SortKey::PriorityDesc => {
                "CASE priority WHEN 'high' THEN 2 WHEN 'medium' THEN 1 ELSE 0 END DESC, \
                 created_at DESC, id DESC"
            }
            SortKey::PriorityAsc => {
                "CASE priority WHEN 'high' THEN 2 WHEN 'medium' THEN 1 ELSE 0 END ASC, \
                 created_at DESC, id DESC"
            }
            SortKey::TitleAsc => "title COLLATE NOCASE ASC, id ASC",
            SortKey::TitleDesc => "title COLLATE NOCASE DESC, id DESC",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at_desc" => Ok(SortKey::CreatedAtDesc),
            "created_at_asc" => Ok(SortKey::CreatedAtAsc),
            "priority_desc" => Ok(SortKey::PriorityDesc),
            "priority_asc" => Ok(SortKey::PriorityAsc),
            "title_asc" => Ok(SortKey::TitleAsc),
            "title_desc" => Ok(SortKey::TitleDesc),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

/// A complete listing request against the note store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    viewer: Viewer,
    status: NoteStatus,
    pub tag: TagFilter,
    pub group: GroupFilter,
    pub sort: SortKey,
}

impl NoteQuery {
    /// Main listing: active notes.
    ///
    /// A signed-in viewer sees exactly their own notes; an anonymous
    /// viewer sees only non-hidden notes.
    pub fn active(viewer: Viewer) -> Self {
        Self {
            viewer,
            status: NoteStatus::Active,
            tag: TagFilter::default(),
            group: GroupFilter::default(),
            sort: SortKey::default(),
        }
    }

    /// Archive listing: archived notes of a signed-in owner.
    pub fn archived(owner: UserId) -> Self {
        Self {
            viewer: Viewer::User(owner),
            status: NoteStatus::Archived,
            tag: TagFilter::default(),
            group: GroupFilter::default(),
            sort: SortKey::default(),
        }
    }

    /// Restricts to notes whose tag set contains `tag`.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = TagFilter::Tag(tag.into());
        self
    }

    /// Restricts to notes with exactly this group label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = GroupFilter::Group(group.into());
        self
    }

    /// Sets the sort order.
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// The identity this query runs as.
    pub fn viewer(&self) -> Viewer {
        self.viewer
    }

    /// The fixed status mode of this query.
    pub fn status(&self) -> NoteStatus {
        self.status
    }

    /// Compiles the request into a SELECT statement and its parameters.
    ///
    /// All filters combine with AND. Tag containment is expressed over
    /// the JSON-encoded tag column via json_each.
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = String::from(
            "SELECT id, title, content, kind, tags, grp, priority, hidden, status, \
             created_at, user_id FROM notes WHERE ",
        );
        let mut params: Vec<Value> = Vec::new();

        match self.viewer {
            Viewer::User(id) => {
                sql.push_str("user_id = ?");
                params.push(Value::Integer(id.get()));
            }
            Viewer::Anonymous => {
                sql.push_str("hidden = 0");
            }
        }

        sql.push_str(" AND status = ?");
        params.push(Value::Text(self.status.as_str().to_string()));

        if let TagFilter::Tag(tag) = &self.tag {
            sql.push_str(" AND EXISTS (SELECT 1 FROM json_each(notes.tags) WHERE json_each.value = ?)");
            params.push(Value::Text(tag.clone()));
        }

        if let GroupFilter::Group(group) = &self.group {
            sql.push_str(" AND grp = ?");
            params.push(Value::Text(group.clone()));
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(self.sort.order_clause());

        (sql, params)
    }
}
