use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a note.
///
/// Controls which listing a note appears in. The only transitions are
/// `Active -> Archived` (archive) and `Archived -> Active` (restore),
/// and both are idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    #[default]
    Active,
    Archived,
}

impl NoteStatus {
    /// Returns the lowercase storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            NoteStatus::Active => "active",
            NoteStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(NoteStatus::Active),
            "archived" => Ok(NoteStatus::Archived),
            other => Err(format!(
                "unknown status '{other}' (expected active or archived)"
            )),
        }
    }
}
