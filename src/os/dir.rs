// osfab - os/dir.rs
//
// Directory enumeration as a forward-only stream of entry names.

use crate::os::path;
use crate::util::error::{OsLayerError, Result};
use std::fs::ReadDir;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

/// An open directory search.
///
/// Yields each entry name once, in host order, then signals end-of-stream
/// on every later call. `.` and `..` are never produced. A host error
/// while reading ends the stream.
#[derive(Debug)]
pub struct OsDir {
    entries: Option<ReadDir>,
    path: PathBuf,
}

/// Open `path` for enumeration. Returns `None` if it cannot be opened.
pub fn open_dir(path: impl AsRef<Path>) -> Option<OsDir> {
    let path = path.as_ref();
    match try_open_dir(path) {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Open directory failed");
            None
        }
    }
}

/// Like `open_dir`, reporting the classified cause on failure.
pub fn try_open_dir(path: impl AsRef<Path>) -> Result<OsDir> {
    let path = path.as_ref();
    let entries =
        std::fs::read_dir(path).map_err(|e| OsLayerError::from_io(path, "open_dir", e))?;
    Ok(OsDir {
        entries: Some(entries),
        path: path.to_path_buf(),
    })
}

impl OsDir {
    /// Directory this search was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next entry name, or `None` at end-of-stream.
    ///
    /// Names that are not valid UTF-8 are converted lossily.
    pub fn read_next(&mut self) -> Option<String> {
        loop {
            let entries = self.entries.as_mut()?;
            match entries.next() {
                Some(Ok(entry)) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if path::special_file(&name).is_some() {
                        continue;
                    }
                    return Some(name);
                }
                Some(Err(e)) => {
                    tracing::debug!(
                        path = %self.path.display(),
                        error = %e,
                        "Directory read failed; ending stream"
                    );
                    self.entries = None;
                }
                None => self.entries = None,
            }
        }
    }

    /// Whether end-of-stream has been signalled.
    pub fn is_exhausted(&self) -> bool {
        self.entries.is_none()
    }

    /// Close the search.
    pub fn close(self) {
        tracing::trace!(path = %self.path.display(), "Closed directory");
    }
}

impl Iterator for OsDir {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.read_next()
    }
}

impl FusedIterator for OsDir {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_each_entry_once_then_end() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let mut d = open_dir(dir.path()).expect("open");
        let mut seen = Vec::new();
        while let Some(name) = d.read_next() {
            seen.push(name);
        }
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert!(d.is_exhausted());
        for _ in 0..3 {
            assert!(d.read_next().is_none());
        }
        d.close();
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = open_dir(dir.path()).unwrap();
        assert!(d.read_next().is_none());
    }

    #[test]
    fn test_open_missing_or_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_dir(dir.path().join("missing")).is_none());

        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        assert!(open_dir(&file).is_none());
    }

    #[test]
    fn test_iterator_includes_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("f.t3"), b"").unwrap();
        let mut names: Vec<String> = open_dir(dir.path()).unwrap().collect();
        names.sort();
        assert_eq!(names, vec!["f.t3", "sub"]);
    }
}
