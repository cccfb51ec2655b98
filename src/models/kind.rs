use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content kind of a note.
///
/// Selects how the note's `content` field is produced and rendered:
/// freeform text, a link URL, the public URL of an uploaded image, or
/// an audio placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Text,
    Link,
    Image,
    Audio,
}

impl NoteKind {
    /// Returns the lowercase storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            NoteKind::Text => "text",
            NoteKind::Link => "link",
            NoteKind::Image => "image",
            NoteKind::Audio => "audio",
        }
    }

    /// All kinds in form-selector order.
    pub fn all() -> [NoteKind; 4] {
        [NoteKind::Text, NoteKind::Link, NoteKind::Image, NoteKind::Audio]
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(NoteKind::Text),
            "link" => Ok(NoteKind::Link),
            "image" => Ok(NoteKind::Image),
            "audio" => Ok(NoteKind::Audio),
            other => Err(format!(
                "unknown note kind '{other}' (expected text, link, image, or audio)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_storage_string() {
        for kind in NoteKind::all() {
            let parsed: NoteKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Link".parse::<NoteKind>().unwrap(), NoteKind::Link);
        assert_eq!(" AUDIO ".parse::<NoteKind>().unwrap(), NoteKind::Audio);
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let err = "video".parse::<NoteKind>().unwrap_err();
        assert!(err.contains("video"));
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&NoteKind::Image).unwrap();
        assert_eq!(json, "\"image\"");
    }
}
