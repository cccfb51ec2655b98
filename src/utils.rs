//! Shared filesystem path helpers for the CLI and TUI entry points.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Gets the database path.
///
/// Honors the `IDEABOX_DB` environment variable; otherwise returns
/// `{data_dir}/ideabox/notes.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn get_database_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("IDEABOX_DB") {
        return Ok(PathBuf::from(path));
    }
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;
    Ok(data_dir.join("ideabox").join("notes.db"))
}

/// Gets the media store root.
///
/// Honors the `IDEABOX_MEDIA` environment variable; otherwise returns
/// `{data_dir}/ideabox/media`.
pub fn get_media_root() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("IDEABOX_MEDIA") {
        return Ok(PathBuf::from(path));
    }
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;
    Ok(data_dir.join("ideabox").join("media"))
}

/// Ensures the parent directory of the given file exists.
pub fn ensure_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
