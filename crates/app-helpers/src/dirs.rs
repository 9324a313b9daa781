use std::{fs, io, path::Path};

use log::trace;

/// Creates `dir` and its parents. An existing directory is fine.
pub fn ensure_dir<P>(dir: P) -> io::Result<()>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();

    if dir.is_dir() {
        return Ok(());
    }

    trace!("Creating {dir:?}");
    fs::create_dir_all(dir)
}

/// Creates the directory `file` will be written into.
pub fn ensure_parent_dir<P>(file: P) -> io::Result<()>
where
    P: AsRef<Path>,
{
    match file.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("media/video/thumbs");

        ensure_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }

    #[test]
    fn existing_directory_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();

        ensure_dir(tmp.path()).unwrap();
        ensure_dir(tmp.path()).unwrap();
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("thumbs");
        fs::write(&file, b"").unwrap();

        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn parent_of_bare_file_name_is_a_no_op() {
        ensure_parent_dir("final.mp4").unwrap();
    }

    #[test]
    fn creates_parent_of_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("media/output/final.mp4");

        ensure_parent_dir(&file).unwrap();

        assert!(tmp.path().join("media/output").is_dir());
        assert!(!file.exists());
    }
}
