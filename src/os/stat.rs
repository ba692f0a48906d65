// osfab - os/stat.rs
//
// File status queries: kind classification, attribute flags, size and
// timestamps for a path.
//
// Attribute rules on this host:
//   - hidden:   the final path component starts with '.' (but is not '.'/'..')
//   - system:   never set
//   - read:     access(2) with R_OK succeeds for this process
//   - write:    access(2) with W_OK succeeds for this process

use crate::os::path;
use crate::os::time::FileTime;
use crate::util::constants;
use crate::util::error::{OsLayerError, Result};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs::Metadata;
use std::path::Path;

// =============================================================================
// Mode and attributes
// =============================================================================

/// What kind of object a path names. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMode {
    File,
    Dir,
    CharDevice,
    BlockDevice,
    Pipe,
    Link,
    Socket,
}

impl FileMode {
    /// Classify a host file type.
    fn from_metadata(meta: &Metadata) -> Self {
        let ft = meta.file_type();
        if ft.is_symlink() {
            return Self::Link;
        }
        if ft.is_dir() {
            return Self::Dir;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if ft.is_char_device() {
                return Self::CharDevice;
            }
            if ft.is_block_device() {
                return Self::BlockDevice;
            }
            if ft.is_fifo() {
                return Self::Pipe;
            }
            if ft.is_socket() {
                return Self::Socket;
            }
        }
        Self::File
    }

    /// Short lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
            Self::CharDevice => "char",
            Self::BlockDevice => "block",
            Self::Pipe => "pipe",
            Self::Link => "link",
            Self::Socket => "socket",
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Independent attribute flags for a path.
///
/// Bit values match the `ATTR_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileAttrs(u32);

impl FileAttrs {
    pub const HIDDEN: FileAttrs = FileAttrs(constants::ATTR_HIDDEN);
    pub const SYSTEM: FileAttrs = FileAttrs(constants::ATTR_SYSTEM);
    pub const READ: FileAttrs = FileAttrs(constants::ATTR_READ);
    pub const WRITE: FileAttrs = FileAttrs(constants::ATTR_WRITE);

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every flag in `other` is set.
    pub const fn contains(self, other: FileAttrs) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the flags in `other`.
    pub fn insert(&mut self, other: FileAttrs) {
        self.0 |= other.0;
    }

    pub fn is_hidden(self) -> bool {
        self.contains(Self::HIDDEN)
    }

    pub fn is_system(self) -> bool {
        self.contains(Self::SYSTEM)
    }

    pub fn is_readable(self) -> bool {
        self.contains(Self::READ)
    }

    pub fn is_writable(self) -> bool {
        self.contains(Self::WRITE)
    }
}

impl std::ops::BitOr for FileAttrs {
    type Output = FileAttrs;

    fn bitor(self, rhs: FileAttrs) -> FileAttrs {
        FileAttrs(self.0 | rhs.0)
    }
}

impl Serialize for FileAttrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FileAttrs", 4)?;
        s.serialize_field("hidden", &self.is_hidden())?;
        s.serialize_field("system", &self.is_system())?;
        s.serialize_field("read", &self.is_readable())?;
        s.serialize_field("write", &self.is_writable())?;
        s.end()
    }
}

// =============================================================================
// Status descriptor
// =============================================================================

/// Point-in-time snapshot of a path's kind, attributes, size and times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStat {
    pub mode: FileMode,
    pub attrs: FileAttrs,
    /// Size in bytes as reported by the host.
    pub size: u64,
    /// `None` where the host does not record the time.
    pub created: Option<FileTime>,
    pub modified: Option<FileTime>,
    pub accessed: Option<FileTime>,
}

/// Status of `path`. With `follow_links` a symbolic link reports its
/// target; without it, the link itself (`FileMode::Link`).
///
/// Returns `None` if the path cannot be inspected.
pub fn file_stat(path: impl AsRef<Path>, follow_links: bool) -> Option<FileStat> {
    let path = path.as_ref();
    match try_file_stat(path, follow_links) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::debug!(path = %path.display(), follow_links, error = %e, "Stat failed");
            None
        }
    }
}

/// Like `file_stat`, reporting the classified cause on failure.
pub fn try_file_stat(path: impl AsRef<Path>, follow_links: bool) -> Result<FileStat> {
    let path = path.as_ref();
    let meta = host_metadata(path, follow_links)
        .map_err(|e| OsLayerError::from_io(path, "stat", e))?;

    Ok(FileStat {
        mode: FileMode::from_metadata(&meta),
        attrs: attributes(path, &meta),
        size: meta.len(),
        created: meta.created().ok().map(FileTime::from),
        modified: meta.modified().ok().map(FileTime::from),
        accessed: meta.accessed().ok().map(FileTime::from),
    })
}

/// Kind and attributes of `path` without the size and times.
pub fn file_mode(path: impl AsRef<Path>, follow_links: bool) -> Option<(FileMode, FileAttrs)> {
    let path = path.as_ref();
    let meta = host_metadata(path, follow_links).ok()?;
    Some((FileMode::from_metadata(&meta), attributes(path, &meta)))
}

fn host_metadata(path: &Path, follow_links: bool) -> std::io::Result<Metadata> {
    if follow_links {
        std::fs::metadata(path)
    } else {
        std::fs::symlink_metadata(path)
    }
}

fn attributes(path: &Path, meta: &Metadata) -> FileAttrs {
    let mut attrs = FileAttrs::empty();
    if is_hidden_name(path) {
        attrs.insert(FileAttrs::HIDDEN);
    }
    if host_readable(path, meta) {
        attrs.insert(FileAttrs::READ);
    }
    if host_writable(path, meta) {
        attrs.insert(FileAttrs::WRITE);
    }
    attrs
}

fn is_hidden_name(p: &Path) -> bool {
    let name = path::root_name(&p.to_string_lossy()).to_string();
    name.starts_with('.') && path::special_file(&name).is_none()
}

#[cfg(unix)]
fn host_access(path: &Path, mode: libc::c_int) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

#[cfg(unix)]
fn host_readable(path: &Path, _meta: &Metadata) -> bool {
    host_access(path, libc::R_OK)
}

#[cfg(unix)]
fn host_writable(path: &Path, _meta: &Metadata) -> bool {
    host_access(path, libc::W_OK)
}

#[cfg(not(unix))]
fn host_readable(_path: &Path, _meta: &Metadata) -> bool {
    true
}

#[cfg(not(unix))]
fn host_writable(_path: &Path, meta: &Metadata) -> bool {
    !meta.permissions().readonly()
}
