//! Filesystem blob store for note-attached media.
//!
//! Stands in for hosted object storage with the same consumed surface:
//! upload with fractional progress reporting, and a public URL per
//! stored object. Keys are timestamp-prefixed to avoid collisions.
//! There is no retry policy; a failed upload is re-initiated by the
//! user.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::debug;

use crate::error::Result;

/// Bucket for note-attached images.
pub const IMAGE_BUCKET: &str = "note-images";

/// Bytes written between progress callbacks.
const CHUNK_SIZE: usize = 64 * 1024;

/// Descriptor of a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub path: PathBuf,
}

/// Directory-backed blob store.
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Creates a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stores bytes under a collision-free key in the given bucket.
    ///
    /// The key is the upload's millisecond timestamp prefixed to the
    /// original file name (path components stripped). The progress
    /// callback receives monotonically non-decreasing percentages and
    /// always ends at 100.
    pub fn upload(
        &self,
        bucket: &str,
        file_name: &str,
        bytes: &[u8],
        mut on_progress: impl FnMut(u8),
    ) -> Result<StoredObject> {
        let millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let key = format!("{millis}_{}", sanitize_file_name(file_name));

        let dir = self.root.join(bucket);
        fs::create_dir_all(&dir)?;
        let path = dir.join(&key);

        let mut file = File::create(&path)?;
        let total = bytes.len();
        let mut written = 0usize;
        for chunk in bytes.chunks(CHUNK_SIZE) {
            file.write_all(chunk)?;
            written += chunk.len();
            on_progress(((written * 100) / total) as u8);
        }
        if total == 0 {
            on_progress(100);
        }
        file.flush()?;

        debug!(key = %key, size = total, "media stored");
        Ok(StoredObject { key, path })
    }

    /// Returns the public URL for a stored object.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        let path = self.root.join(bucket).join(key);
        format!("file://{}", path.display())
    }
}

/// Strips path components so a key never escapes its bucket.
fn sanitize_file_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
