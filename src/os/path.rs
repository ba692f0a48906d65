// osfab - os/path.rs
//
// Filename conventions. The interpreter core builds and splits filenames as
// plain strings in native syntax; every separator decision goes through the
// constants table so the core never hard-codes one.

use crate::util::constants::{
    EXT_SEP, MAX_FILENAME_LEN, PATH_ALT, PATH_CHAR, PATH_LIST_SEP, PATH_PARENT, PATH_PWD, PATH_URL,
};
use std::path::{Path, PathBuf};

/// The two directory names that never name a real entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialFile {
    /// `.`
    SelfDir,
    /// `..`
    ParentDir,
}

/// Whether `c` separates path components on this host.
pub fn is_path_separator(c: char) -> bool {
    c == PATH_CHAR || PATH_ALT.contains(c)
}

/// Whether `path` is absolute.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(is_path_separator)
}

/// Join `dir` and `file` with exactly one separator.
///
/// An absolute `file` is returned unchanged, as is any `file` when `dir`
/// is empty.
pub fn build_full_path(dir: &str, file: &str) -> String {
    if dir.is_empty() || is_absolute(file) {
        return file.to_string();
    }
    let mut full = String::with_capacity(dir.len() + file.len() + 1);
    full.push_str(dir);
    if !dir.ends_with(is_path_separator) {
        full.push(PATH_CHAR);
    }
    full.push_str(file.trim_start_matches(is_path_separator));
    full
}

/// Directory portion of `path`, without a trailing separator.
///
/// Returns an empty string when `path` has no directory portion, and the
/// root separator itself for files directly under the root.
pub fn path_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_path_separator);
    if trimmed.is_empty() {
        // Either empty or nothing but separators.
        return if path.is_empty() { "" } else { &path[..1] };
    }
    match trimmed.rfind(is_path_separator) {
        None => "",
        Some(idx) => {
            let dir = trimmed[..idx].trim_end_matches(is_path_separator);
            if dir.is_empty() {
                &path[..1]
            } else {
                dir
            }
        }
    }
}

/// Final component of `path` (everything after the last separator).
pub fn root_name(path: &str) -> &str {
    match path.rfind(is_path_separator) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Byte offset of the extension separator within `path`, if the root name
/// has an extension. A leading `.` on the root name does not start one.
fn extension_start(path: &str) -> Option<usize> {
    let root = root_name(path);
    let root_start = path.len() - root.len();
    match root.rfind(EXT_SEP) {
        Some(0) | None => None,
        Some(idx) => Some(root_start + idx),
    }
}

/// Extension of the root name of `path`, without the separator.
pub fn extension(path: &str) -> Option<&str> {
    extension_start(path).map(|idx| &path[idx + 1..])
}

/// Append `.ext` to `name` unless its root name already has an extension.
pub fn default_extension(name: &str, ext: &str) -> String {
    if extension_start(name).is_some() {
        name.to_string()
    } else {
        add_extension(name, ext)
    }
}

/// Append `.ext` to `name` unconditionally.
pub fn add_extension(name: &str, ext: &str) -> String {
    let ext = ext.trim_start_matches(EXT_SEP);
    format!("{name}{EXT_SEP}{ext}")
}

/// `name` with the extension of its root name removed.
pub fn remove_extension(name: &str) -> &str {
    match extension_start(name) {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Classify `.` and `..`.
pub fn special_file(name: &str) -> Option<SpecialFile> {
    if name == PATH_PWD {
        Some(SpecialFile::SelfDir)
    } else if name == PATH_PARENT {
        Some(SpecialFile::ParentDir)
    } else {
        None
    }
}

/// Whether the root name of `name` is non-empty and fits the host's
/// filename length limit.
pub fn is_valid_filename(name: &str) -> bool {
    let root = root_name(name);
    !root.is_empty() && root.len() <= MAX_FILENAME_LEN && !root.contains('\0')
}

/// Absolute form of `name`: canonical if the path exists, otherwise joined
/// onto the current working directory. `None` only if the working
/// directory cannot be determined.
pub fn absolute_filename(name: &str) -> Option<PathBuf> {
    let path = Path::new(name);
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return Some(canonical);
    }
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }
    match std::env::current_dir() {
        Ok(cwd) => Some(cwd.join(path)),
        Err(e) => {
            tracing::debug!(name, error = %e, "Could not determine working directory");
            None
        }
    }
}

/// Split a PATH-style list into its non-empty entries.
pub fn split_path_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(PATH_LIST_SEP).filter(|s| !s.is_empty())
}

/// Convert a URL-style relative path to local syntax.
pub fn url_to_local(url: &str) -> String {
    url.chars()
        .map(|c| if PATH_URL.contains(c) { PATH_CHAR } else { c })
        .collect()
}

/// Convert a local path to URL-style syntax.
pub fn local_to_url(path: &str) -> String {
    let url_sep = PATH_URL.chars().next().unwrap_or(PATH_CHAR);
    path.chars()
        .map(|c| if is_path_separator(c) { url_sep } else { c })
        .collect()
}
