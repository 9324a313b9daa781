//! The concat-demuxer list: one `file '<path>'` line per scene.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use tempfile::NamedTempFile;

use crate::{error::BatchError, scene::MediaItem};

/// The list file contents for `items`, in the given order.
///
/// A `'` inside a path is written as `'\''`, which is how the concat demuxer
/// expects quotes to be escaped.
#[must_use]
pub fn render(items: &[MediaItem]) -> Vec<u8> {
    let mut out = Vec::new();

    for item in items {
        out.extend_from_slice(b"file '");
        for &byte in item.path().as_os_str().as_encoded_bytes() {
            if byte == b'\'' {
                out.extend_from_slice(br"'\''");
            } else {
                out.push(byte);
            }
        }
        out.extend_from_slice(b"'\n");
    }

    out
}

/// Replaces whatever is at `path` with the list for `items`.
///
/// The list is written next to `path` and renamed over it, so a reader only
/// ever sees a complete list.
pub fn write(path: &Path, items: &[MediaItem]) -> Result<(), BatchError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    app_helpers::dirs::ensure_dir(&dir)
        .map_err(BatchError::io(format!("Failed to create directory {dir:?}")))?;

    let mut tmp = NamedTempFile::new_in(&dir)
        .map_err(BatchError::io(format!("Failed to create a temporary file in {dir:?}")))?;
    trace!("Writing concat list to {tmp:?}", tmp = tmp.path());

    tmp.write_all(&render(items))
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(BatchError::io(format!("Failed to write concat list for {path:?}")))?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .map_err(BatchError::io(format!("Failed to move concat list to {path:?}")))?;

    debug!(
        "Wrote concat list {path:?} with {count} entries",
        count = items.len()
    );

    Ok(())
}
