// osfab - os/file.rs
//
// File handles and the file-level operations of the OS contract.
//
// Every operation is a single synchronous pass-through to the host file
// system. Failures come back as sentinels (`None`, `false`, a short count);
// nothing here panics. The cause of the most recent failure on a handle is
// kept in `OsFile::last_failure` for callers that need to tell end-of-file
// from a real host error after a block transfer.

use crate::util::error::{OsFailure, OsLayerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

// =============================================================================
// Open modes and type hints
// =============================================================================

/// The fixed set of modes a file can be opened in.
///
/// Text and binary modes behave identically on this host: no newline
/// translation happens in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Read an existing text file.
    ReadText,
    /// Write a text file, truncating any existing contents.
    WriteText,
    /// Read and write a text file, keeping existing contents; created if missing.
    ReadWriteText,
    /// Read and write a text file, truncating existing contents; created if missing.
    ReadWriteTruncText,
    /// Read an existing binary file.
    ReadBinary,
    /// Write a binary file, truncating any existing contents.
    WriteBinary,
    /// Read and write a binary file, keeping existing contents; created if missing.
    ReadWriteBinary,
    /// Read and write a binary file, truncating existing contents; created if missing.
    ReadWriteTruncBinary,
}

impl OpenMode {
    /// Returns all variants.
    pub fn all() -> &'static [OpenMode] {
        &[
            OpenMode::ReadText,
            OpenMode::WriteText,
            OpenMode::ReadWriteText,
            OpenMode::ReadWriteTruncText,
            OpenMode::ReadBinary,
            OpenMode::WriteBinary,
            OpenMode::ReadWriteBinary,
            OpenMode::ReadWriteTruncBinary,
        ]
    }

    /// Whether this is one of the text modes.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::ReadText | Self::WriteText | Self::ReadWriteText | Self::ReadWriteTruncText
        )
    }

    /// Whether a handle opened in this mode may be read from.
    pub fn can_read(self) -> bool {
        !matches!(self, Self::WriteText | Self::WriteBinary)
    }

    /// Whether a handle opened in this mode may be written to.
    pub fn can_write(self) -> bool {
        !matches!(self, Self::ReadText | Self::ReadBinary)
    }

    /// Host open options equivalent to this mode.
    fn options(self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        match self {
            Self::ReadText | Self::ReadBinary => {
                opts.read(true);
            }
            Self::WriteText | Self::WriteBinary => {
                opts.write(true).create(true).truncate(true);
            }
            Self::ReadWriteText | Self::ReadWriteBinary => {
                opts.read(true).write(true).create(true);
            }
            Self::ReadWriteTruncText | Self::ReadWriteTruncBinary => {
                opts.read(true).write(true).create(true).truncate(true);
            }
        }
        opts
    }
}

/// File-type hint passed with every open.
///
/// Hosts with typed file systems use this to tag newly created files. On
/// this host it is accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileTypeHint {
    /// Compiled game file.
    Game,
    /// Saved game.
    Save,
    /// Transcript log.
    Log,
    /// Swap file.
    Swap,
    /// Generic data file.
    Data,
    /// Command input file.
    Command,
    /// Plain text file.
    Text,
    /// Generic binary file.
    Binary,
    /// T3 image file.
    T3Image,
    /// T3 object file.
    T3Object,
    /// T3 symbol export file.
    T3Symbol,
    /// T3 saved state.
    T3Save,
    /// Unknown or unspecified.
    #[default]
    Unknown,
}

/// Origin for `OsFile::seek`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Relative to the start of the file.
    Set,
    /// Relative to the current position.
    Cur,
    /// Relative to the end of the file.
    End,
}

// =============================================================================
// File handle
// =============================================================================

/// An open file. Closing consumes the handle.
#[derive(Debug)]
pub struct OsFile {
    file: File,
    path: PathBuf,
    mode: OpenMode,
    last_failure: Option<OsFailure>,
}

/// Open `path` in `mode`. Returns `None` on any failure.
///
/// `hint` is inert on this host.
pub fn open(path: impl AsRef<Path>, mode: OpenMode, hint: FileTypeHint) -> Option<OsFile> {
    let path = path.as_ref();
    match try_open(path, mode, hint) {
        Ok(f) => Some(f),
        Err(e) => {
            tracing::debug!(path = %path.display(), ?mode, error = %e, "Open failed");
            None
        }
    }
}

/// Open `path` in `mode`, reporting the classified cause on failure.
pub fn try_open(path: impl AsRef<Path>, mode: OpenMode, _hint: FileTypeHint) -> Result<OsFile> {
    let path = path.as_ref();
    let file = mode
        .options()
        .open(path)
        .map_err(|e| OsLayerError::from_io(path, "open", e))?;
    tracing::trace!(path = %path.display(), ?mode, "Opened file");
    Ok(OsFile {
        file,
        path: path.to_path_buf(),
        mode,
        last_failure: None,
    })
}

/// Open a text file for reading.
pub fn open_read_text(path: impl AsRef<Path>, hint: FileTypeHint) -> Option<OsFile> {
    open(path, OpenMode::ReadText, hint)
}

/// Open a text file for writing, truncating it.
pub fn open_write_text(path: impl AsRef<Path>, hint: FileTypeHint) -> Option<OsFile> {
    open(path, OpenMode::WriteText, hint)
}

/// Open a text file for reading and writing, keeping its contents.
pub fn open_rw_text(path: impl AsRef<Path>, hint: FileTypeHint) -> Option<OsFile> {
    open(path, OpenMode::ReadWriteText, hint)
}

/// Open a text file for reading and writing, truncating it.
pub fn open_rw_text_trunc(path: impl AsRef<Path>, hint: FileTypeHint) -> Option<OsFile> {
    open(path, OpenMode::ReadWriteTruncText, hint)
}

/// Open a binary file for reading.
pub fn open_read_binary(path: impl AsRef<Path>, hint: FileTypeHint) -> Option<OsFile> {
    open(path, OpenMode::ReadBinary, hint)
}

/// Open a binary file for writing, truncating it.
pub fn open_write_binary(path: impl AsRef<Path>, hint: FileTypeHint) -> Option<OsFile> {
    open(path, OpenMode::WriteBinary, hint)
}

/// Open a binary file for reading and writing, keeping its contents.
pub fn open_rw_binary(path: impl AsRef<Path>, hint: FileTypeHint) -> Option<OsFile> {
    open(path, OpenMode::ReadWriteBinary, hint)
}

/// Open a binary file for reading and writing, truncating it.
pub fn open_rw_binary_trunc(path: impl AsRef<Path>, hint: FileTypeHint) -> Option<OsFile> {
    open(path, OpenMode::ReadWriteTruncBinary, hint)
}

/// Open a source file for reading. Source files are read in text mode.
pub fn open_source(path: impl AsRef<Path>) -> Option<OsFile> {
    open(path, OpenMode::ReadText, FileTypeHint::Text)
}

impl OsFile {
    /// Path the handle was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the handle was opened in.
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Cause of the failure of the most recent operation, if it failed.
    pub fn last_failure(&self) -> Option<OsFailure> {
        self.last_failure
    }

    /// Read exactly `buf.len()` bytes.
    ///
    /// Returns `true` only if the whole buffer was filled. A short read at
    /// end-of-file and a host error both return `false`; `last_failure`
    /// tells them apart. Bytes read before the failure are left in `buf`
    /// and the position has advanced past them.
    pub fn read_block(&mut self, buf: &mut [u8]) -> bool {
        let (n, err) = self.fill(buf);
        if n == buf.len() {
            return true;
        }
        self.last_failure = Some(match err {
            Some(e) if n > 0 => {
                tracing::debug!(path = %self.path.display(), error = %e, "Block read interrupted");
                OsFailure::PartialTransfer {
                    requested: buf.len(),
                    transferred: n,
                }
            }
            Some(e) => OsFailure::classify(&e),
            None => OsFailure::EndOfStream,
        });
        false
    }

    /// Read up to `buf.len()` bytes, returning how many were read.
    ///
    /// Short host reads are retried until the buffer is full, end-of-file
    /// is reached, or an error occurs. Returns 0 at end-of-file.
    pub fn read_counted(&mut self, buf: &mut [u8]) -> usize {
        let (n, err) = self.fill(buf);
        if n < buf.len() {
            self.last_failure = Some(match err {
                Some(e) => OsFailure::classify(&e),
                None => OsFailure::EndOfStream,
            });
        }
        n
    }

    /// Write all of `buf`.
    ///
    /// Returns `true` only if every byte was written. After a `false`
    /// return the file's contents past the point of failure are undefined.
    pub fn write_block(&mut self, buf: &[u8]) -> bool {
        self.last_failure = None;
        let mut written = 0;
        while written < buf.len() {
            match self.file.write(&buf[written..]) {
                Ok(0) => {
                    self.last_failure = Some(OsFailure::PartialTransfer {
                        requested: buf.len(),
                        transferred: written,
                    });
                    return false;
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::debug!(
                        path = %self.path.display(),
                        written,
                        requested = buf.len(),
                        error = %e,
                        "Block write failed"
                    );
                    self.last_failure = Some(if written > 0 {
                        OsFailure::PartialTransfer {
                            requested: buf.len(),
                            transferred: written,
                        }
                    } else {
                        OsFailure::classify(&e)
                    });
                    return false;
                }
            }
        }
        true
    }

    /// Read one line of text into `buf`.
    ///
    /// Stops after a newline (which is stored), when `buf` is full, or at
    /// end-of-file. No terminator is written, so the whole of `buf` is
    /// usable and the rest of a longer line comes back on the next call.
    /// Returns the number of bytes stored, or `None` if end-of-file or an
    /// error was hit before any byte was read.
    pub fn read_line(&mut self, buf: &mut [u8]) -> Option<usize> {
        self.last_failure = None;
        let mut n = 0;
        while n < buf.len() {
            match self.read_char() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                    if b == b'\n' {
                        break;
                    }
                }
                None => break,
            }
        }
        if n == 0 && !buf.is_empty() {
            return None;
        }
        // EOF after a partial line still yields that line.
        if self.last_failure == Some(OsFailure::EndOfStream) {
            self.last_failure = None;
        }
        Some(n)
    }

    /// Write a string with no terminator added.
    pub fn write_str(&mut self, s: &str) -> bool {
        self.write_block(s.as_bytes())
    }

    /// Read a single byte. Returns `None` at end-of-file or on error.
    pub fn read_char(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        if self.read_block(&mut byte) {
            Some(byte[0])
        } else {
            None
        }
    }

    /// Flush buffered writes to the host.
    pub fn flush(&mut self) -> bool {
        self.last_failure = None;
        match self.file.flush() {
            Ok(()) => true,
            Err(e) => {
                self.last_failure = Some(OsFailure::classify(&e));
                false
            }
        }
    }

    /// Move the file position to `offset` relative to `origin`.
    ///
    /// Seeking before the start of the file fails and leaves the position
    /// unchanged.
    pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> bool {
        self.last_failure = None;
        let target = match origin {
            SeekOrigin::Set => match u64::try_from(offset) {
                Ok(o) => SeekFrom::Start(o),
                Err(_) => {
                    self.last_failure = Some(OsFailure::Io(io::ErrorKind::InvalidInput));
                    return false;
                }
            },
            SeekOrigin::Cur => SeekFrom::Current(offset),
            SeekOrigin::End => SeekFrom::End(offset),
        };
        match self.file.seek(target) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), offset, ?origin, error = %e, "Seek failed");
                self.last_failure = Some(OsFailure::classify(&e));
                false
            }
        }
    }

    /// Current absolute position, or `None` if the host cannot report it.
    pub fn position(&mut self) -> Option<u64> {
        self.last_failure = None;
        match self.file.stream_position() {
            Ok(pos) => Some(pos),
            Err(e) => {
                self.last_failure = Some(OsFailure::classify(&e));
                None
            }
        }
    }

    /// Close the handle, flushing any pending writes.
    pub fn close(mut self) -> bool {
        let ok = self.flush();
        tracing::trace!(path = %self.path.display(), "Closed file");
        ok
    }

    /// Read until `buf` is full, end-of-file, or an error. Returns the byte
    /// count and the error, if one stopped the read.
    fn fill(&mut self, buf: &mut [u8]) -> (usize, Option<io::Error>) {
        self.last_failure = None;
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return (filled, Some(e)),
            }
        }
        (filled, None)
    }
}

// =============================================================================
// Path-level operations
// =============================================================================

/// Delete a file. Returns `true` on success.
pub fn delete_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Delete failed");
            false
        }
    }
}

/// Rename a file. Atomic when source and destination are on the same
/// file system; an existing destination is replaced.
pub fn rename_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> bool {
    let (from, to) = (from.as_ref(), to.as_ref());
    match std::fs::rename(from, to) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(
                from = %from.display(),
                to = %to.display(),
                error = %e,
                "Rename failed"
            );
            false
        }
    }
}

/// Whether `path` exists, following symbolic links.
///
/// A dangling link is absent, matching what `open` would find. A path that
/// exists but cannot be inspected is reported as absent too.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path.as_ref()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    #[test]
    fn test_binary_round_trip() {
        let dir = temp();
        let path = dir.path().join("data.bin");
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

        let mut f = open_write_binary(&path, FileTypeHint::Binary).expect("open for write");
        assert!(f.write_block(&payload));
        assert!(f.close());

        let mut f = open_read_binary(&path, FileTypeHint::Binary).expect("open for read");
        let mut back = vec![0u8; payload.len()];
        assert!(f.read_block(&mut back));
        assert_eq!(back, payload);
    }

    #[test]
    fn test_open_missing_for_read_returns_none() {
        let dir = temp();
        let path = dir.path().join("missing.t3");
        for mode in [OpenMode::ReadText, OpenMode::ReadBinary] {
            assert!(open(&path, mode, FileTypeHint::Game).is_none());
        }
        assert!(matches!(
            try_open(&path, OpenMode::ReadBinary, FileTypeHint::Game),
            Err(OsLayerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_block_read_past_eof_reports_end_of_stream() {
        let dir = temp();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, b"abc").unwrap();

        let mut f = open_read_binary(&path, FileTypeHint::Data).unwrap();
        let mut buf = [0u8; 8];
        assert!(!f.read_block(&mut buf));
        assert_eq!(f.last_failure(), Some(OsFailure::EndOfStream));
        assert_eq!(&buf[..3], b"abc");
    }

    #[test]
    fn test_counted_read_returns_literal_count() {
        let dir = temp();
        let path = dir.path().join("count.bin");
        std::fs::write(&path, b"hello").unwrap();

        let mut f = open_read_binary(&path, FileTypeHint::Data).unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(f.read_counted(&mut buf), 3);
        assert_eq!(f.read_counted(&mut buf), 2);
        assert_eq!(&buf[..2], b"lo");
        assert_eq!(f.read_counted(&mut buf), 0);
        assert_eq!(f.last_failure(), Some(OsFailure::EndOfStream));
    }

    #[test]
    fn test_keep_mode_preserves_and_truncate_mode_clears() {
        let dir = temp();
        let path = dir.path().join("keep.txt");
        std::fs::write(&path, b"existing").unwrap();

        let mut f = open_rw_text(&path, FileTypeHint::Text).unwrap();
        assert!(f.seek(0, SeekOrigin::End));
        assert!(f.write_str("+more"));
        assert!(f.close());
        assert_eq!(std::fs::read(&path).unwrap(), b"existing+more");

        let f = open_rw_text_trunc(&path, FileTypeHint::Text).unwrap();
        assert!(f.close());
        assert_eq!(std::fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_keep_mode_creates_missing_file() {
        let dir = temp();
        let path = dir.path().join("new.sav");
        let f = open_rw_binary(&path, FileTypeHint::Save).expect("created");
        assert!(f.close());
        assert!(file_exists(&path));
    }

    #[test]
    fn test_seek_origins_and_position() {
        let dir = temp();
        let path = dir.path().join("seek.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut f = open_read_binary(&path, FileTypeHint::Data).unwrap();
        assert!(f.seek(4, SeekOrigin::Set));
        assert_eq!(f.position(), Some(4));
        assert!(f.seek(2, SeekOrigin::Cur));
        assert_eq!(f.position(), Some(6));
        assert!(f.seek(-1, SeekOrigin::End));
        assert_eq!(f.read_char(), Some(b'9'));
        assert!(!f.seek(-1, SeekOrigin::Set));
        assert_eq!(f.position(), Some(10));
    }

    #[test]
    fn test_read_line_stops_after_newline() {
        let dir = temp();
        let path = dir.path().join("lines.txt");
        std::fs::write(&path, b"first\nsecond").unwrap();

        let mut f = open_source(&path).unwrap();
        let mut buf = [0u8; 64];
        let n = f.read_line(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"first\n");
        let n = f.read_line(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"second");
        assert!(f.read_line(&mut buf).is_none());
    }

    #[test]
    fn test_read_line_respects_buffer_size() {
        let dir = temp();
        let path = dir.path().join("long.txt");
        std::fs::write(&path, b"abcdef\n").unwrap();

        let mut f = open_read_text(&path, FileTypeHint::Text).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(f.read_line(&mut buf), Some(4));
        assert_eq!(&buf, b"abcd");
        assert_eq!(f.read_line(&mut buf), Some(3));
        assert_eq!(&buf[..3], b"ef\n");
        assert_eq!(f.read_line(&mut buf), None);
    }

    #[test]
    fn test_read_line_exact_fit_leaves_newline_for_next_call() {
        let dir = temp();
        let path = dir.path().join("fit.txt");
        std::fs::write(&path, b"abcd\nz").unwrap();

        let mut f = open_read_text(&path, FileTypeHint::Text).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(f.read_line(&mut buf), Some(4));
        assert_eq!(&buf, b"abcd");
        assert_eq!(f.read_line(&mut buf), Some(1));
        assert_eq!(buf[0], b'\n');
        assert_eq!(f.read_line(&mut buf[..0]), Some(0));
        assert_eq!(f.read_line(&mut buf), Some(1));
        assert_eq!(buf[0], b'z');
    }

    #[test]
    fn test_zero_length_block_read_succeeds() {
        let dir = temp();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();

        let mut f = open_read_binary(&path, FileTypeHint::Data).unwrap();
        assert!(f.read_block(&mut []));
        assert_eq!(f.last_failure(), None);
        assert_eq!(f.read_counted(&mut []), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_to_full_device_reports_host_error() {
        let mut f = open_write_binary("/dev/full", FileTypeHint::Data).expect("open /dev/full");
        assert!(!f.write_block(b"no room"));
        let enospc = io::Error::from_raw_os_error(libc::ENOSPC).kind();
        assert_eq!(f.last_failure(), Some(OsFailure::Io(enospc)));
    }

    #[test]
    fn test_write_on_read_only_handle_fails() {
        let dir = temp();
        let path = dir.path().join("ro.txt");
        std::fs::write(&path, b"x").unwrap();

        let mut f = open_read_text(&path, FileTypeHint::Text).unwrap();
        assert!(!f.write_block(b"y"));
        assert!(f.last_failure().is_some());
    }

    #[test]
    fn test_delete_and_rename() {
        let dir = temp();
        let a = dir.path().join("a.log");
        let b = dir.path().join("b.log");
        std::fs::write(&a, b"log").unwrap();

        assert!(rename_file(&a, &b));
        assert!(!file_exists(&a));
        assert!(file_exists(&b));
        assert!(delete_file(&b));
        assert!(!delete_file(&b));
        assert!(!rename_file(&a, &b));
    }

    #[test]
    fn test_rename_replaces_existing_destination() {
        let dir = temp();
        let a = dir.path().join("new.sav");
        let b = dir.path().join("old.sav");
        std::fs::write(&a, b"fresh").unwrap();
        std::fs::write(&b, b"stale contents").unwrap();

        assert!(rename_file(&a, &b));
        assert!(!file_exists(&a));
        assert_eq!(std::fs::read(&b).unwrap(), b"fresh");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_does_not_exist() {
        let dir = temp();
        let target = dir.path().join("gone.t3");
        let link = dir.path().join("link.t3");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(!file_exists(&link));
        assert!(open_read_binary(&link, FileTypeHint::Game).is_none());

        std::fs::write(&target, b"T3").unwrap();
        assert!(file_exists(&link));
    }

    #[test]
    fn test_mode_capabilities() {
        assert_eq!(OpenMode::all().len(), 8);
        assert!(OpenMode::ReadWriteText.is_text());
        assert!(!OpenMode::ReadWriteBinary.is_text());
        assert!(!OpenMode::WriteBinary.can_read());
        assert!(!OpenMode::ReadText.can_write());
        assert!(OpenMode::ReadWriteTruncBinary.can_read());
    }
}
