use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, trace};

use crate::error::BatchError;

/// One discovered media file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItem {
    path: PathBuf,
    name: String,
    extension: String,
}

impl MediaItem {
    /// `None` for paths without both a file stem and an extension.
    #[must_use]
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Option<Self> {
        let path = path.into();
        let name = path.file_stem()?.to_string_lossy().into_owned();
        let extension = path.extension()?.to_string_lossy().into_owned();

        Some(Self {
            path,
            name,
            extension,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file stem, e.g. `scene_04` for `scenes/scene_04.mp4`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn sort_key(&self) -> &[u8] {
        self.path
            .file_name()
            .map(OsStr::as_encoded_bytes)
            .unwrap_or_default()
    }
}

/// Lists the files in `dir` ending in `.{extension}`, ordered byte-wise by file name.
///
/// The directory has to exist but may be empty. Subdirectories are skipped even
/// when their name matches.
pub fn discover_scenes(dir: &Path, extension: &str) -> Result<Vec<MediaItem>, BatchError> {
    debug!("Looking for `.{extension}' scenes in {dir:?}");

    let entries = fs::read_dir(dir)
        .map_err(BatchError::io(format!("Failed to read scene directory {dir:?}")))?;

    let mut scenes = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(BatchError::io(format!("Failed to read entry of {dir:?}")))?
            .path();

        if path.extension() != Some(OsStr::new(extension)) || !path.is_file() {
            trace!("Skipping {path:?}");
            continue;
        }

        if let Some(item) = MediaItem::from_path(path) {
            scenes.push(item);
        }
    }

    scenes.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));

    debug!("Found {count} scene(s) in {dir:?}", count = scenes.len());

    Ok(scenes)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    fn file_names(items: &[MediaItem]) -> Vec<String> {
        items
            .iter()
            .map(|x| x.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn scenes_are_sorted_by_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), &["c.mp4", "a.mp4", "b.mp4"]);

        let scenes = discover_scenes(tmp.path(), "mp4").unwrap();

        assert_eq!(file_names(&scenes), vec!["a.mp4", "b.mp4", "c.mp4"]);
    }

    #[test]
    fn sorting_is_byte_wise() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), &["scene_10.mp4", "Scene_2.mp4", "scene_2.mp4", "scene_01.mp4"]);

        let scenes = discover_scenes(tmp.path(), "mp4").unwrap();

        assert_eq!(
            file_names(&scenes),
            vec!["Scene_2.mp4", "scene_01.mp4", "scene_10.mp4", "scene_2.mp4"]
        );
    }

    #[test]
    fn discovery_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), &["x.mp4", "m.mp4", "b.mp4", "q.mp4", "d.mp4"]);

        let first = discover_scenes(tmp.path(), "mp4").unwrap();
        let second = discover_scenes(tmp.path(), "mp4").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn only_matching_files_are_scenes() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), &["a.mp4", "b.MP4", "c.mov", "notes.txt", "mp4"]);
        fs::create_dir(tmp.path().join("nested.mp4")).unwrap();

        let scenes = discover_scenes(tmp.path(), "mp4").unwrap();

        assert_eq!(file_names(&scenes), vec!["a.mp4"]);
    }

    #[test]
    fn empty_directory_yields_no_scenes() {
        let tmp = tempfile::tempdir().unwrap();

        assert!(discover_scenes(tmp.path(), "mp4").unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();

        let res = discover_scenes(&tmp.path().join("scenes"), "mp4");

        assert_matches!(res, Err(BatchError::Io { .. }));
    }

    #[test]
    fn media_item_parts() {
        let item = MediaItem::from_path("scenes/scene_04.mp4").unwrap();

        assert_eq!(item.name(), "scene_04");
        assert_eq!(item.extension(), "mp4");
        assert_eq!(item.path(), Path::new("scenes/scene_04.mp4"));
        assert!(MediaItem::from_path("scenes/README").is_none());
    }
}
