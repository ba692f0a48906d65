// osfab - os/layer.rs
//
// The OS contract as a single interface.
//
// The interpreter core is written against `OsLayer`; `HostOs` binds it to
// this host by delegating to the free functions in the sibling modules.
// A test double can implement the trait to run core logic without touching
// the real file system or heap.

use crate::os::dir::{self, OsDir};
use crate::os::file::{self, FileTypeHint, OpenMode, OsFile, SeekOrigin};
use crate::os::mem::MemBlock;
use crate::os::stat::{self, FileAttrs, FileMode, FileStat};
use crate::os::strings;
use crate::os::time::{self, FileTime};
use crate::util::constants;
use crate::util::error::OsFailure;
use std::cmp::Ordering;
use std::fmt;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Platform-identity values the core consults to behave portably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PlatformIdentity {
    pub system_name: &'static str,
    pub system_long_desc: &'static str,
    pub oem_name: &'static str,
    pub path_char: char,
    pub path_alt: &'static str,
    pub path_url: &'static str,
    pub path_list_sep: char,
    pub path_pwd: &'static str,
    pub max_filename_len: usize,
    pub newline_seq: &'static str,
    pub max_line_width: u8,
    pub max_alloc: usize,
    pub exit_success: i32,
    pub exit_failure: i32,
    pub default_swap_enabled: bool,
}

/// The identity table for this host.
pub const HOST_IDENTITY: PlatformIdentity = PlatformIdentity {
    system_name: constants::SYSTEM_NAME,
    system_long_desc: constants::SYSTEM_LONG_DESC,
    oem_name: constants::OEM_NAME,
    path_char: constants::PATH_CHAR,
    path_alt: constants::PATH_ALT,
    path_url: constants::PATH_URL,
    path_list_sep: constants::PATH_LIST_SEP,
    path_pwd: constants::PATH_PWD,
    max_filename_len: constants::MAX_FILENAME_LEN,
    newline_seq: constants::NEWLINE_SEQ,
    max_line_width: constants::MAX_LINE_WIDTH,
    max_alloc: constants::MAX_ALLOC,
    exit_success: constants::EXIT_SUCCESS,
    exit_failure: constants::EXIT_FAILURE,
    default_swap_enabled: constants::DEFAULT_SWAP_ENABLED,
};

/// Operations the interpreter core requires from its host.
///
/// Every method is synchronous and reports failure through its return
/// value; none of them panic.
pub trait OsLayer {
    type File;
    type Dir: Iterator<Item = String>;
    type Block: DerefMut<Target = [u8]>;

    /// Platform-identity table.
    fn identity(&self) -> &PlatformIdentity;

    // -- Files --
    fn open(&self, path: &Path, mode: OpenMode, hint: FileTypeHint) -> Option<Self::File>;
    fn delete(&self, path: &Path) -> bool;
    fn rename(&self, from: &Path, to: &Path) -> bool;
    fn exists(&self, path: &Path) -> bool;

    // -- Open handles --
    fn read_block(&self, file: &mut Self::File, buf: &mut [u8]) -> bool;
    fn read_counted(&self, file: &mut Self::File, buf: &mut [u8]) -> usize;
    fn write_block(&self, file: &mut Self::File, buf: &[u8]) -> bool;
    fn read_line(&self, file: &mut Self::File, buf: &mut [u8]) -> Option<usize>;
    fn write_str(&self, file: &mut Self::File, s: &str) -> bool;
    fn read_char(&self, file: &mut Self::File) -> Option<u8>;
    fn seek(&self, file: &mut Self::File, offset: i64, origin: SeekOrigin) -> bool;
    fn position(&self, file: &mut Self::File) -> Option<u64>;
    fn flush(&self, file: &mut Self::File) -> bool;
    fn close(&self, file: Self::File) -> bool;
    fn last_failure(&self, file: &Self::File) -> Option<OsFailure>;

    // -- Status and directories --
    fn stat(&self, path: &Path, follow_links: bool) -> Option<FileStat>;
    fn mode(&self, path: &Path, follow_links: bool) -> Option<(FileMode, FileAttrs)>;
    fn open_dir(&self, path: &Path) -> Option<Self::Dir>;
    fn read_dir_next(&self, dir: &mut Self::Dir) -> Option<String>;
    fn close_dir(&self, dir: Self::Dir);

    // -- Memory --
    fn alloc(&self, size: usize) -> Option<Self::Block>;
    fn resize(&self, block: &mut Self::Block, new_size: usize) -> bool;
    fn free(&self, block: Self::Block);

    // -- Strings and time --
    fn stricmp(&self, a: &str, b: &str) -> Ordering;
    fn strnicmp(&self, a: &str, b: &str, n: usize) -> Ordering;
    fn memicmp(&self, a: &[u8], b: &[u8], n: usize) -> Ordering;
    fn asprintf(&self, args: fmt::Arguments<'_>) -> String;
    fn absolute_filename(&self, name: &str) -> Option<PathBuf>;
    fn modified_time(&self, path: &Path) -> Option<FileTime>;
    fn now(&self) -> i64;
}

/// The native implementation of `OsLayer` for this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostOs;

impl OsLayer for HostOs {
    type File = OsFile;
    type Dir = OsDir;
    type Block = MemBlock;

    fn identity(&self) -> &PlatformIdentity {
        &HOST_IDENTITY
    }

    fn open(&self, path: &Path, mode: OpenMode, hint: FileTypeHint) -> Option<OsFile> {
        file::open(path, mode, hint)
    }

    fn delete(&self, path: &Path) -> bool {
        file::delete_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> bool {
        file::rename_file(from, to)
    }

    fn exists(&self, path: &Path) -> bool {
        file::file_exists(path)
    }

    fn read_block(&self, file: &mut OsFile, buf: &mut [u8]) -> bool {
        file.read_block(buf)
    }

    fn read_counted(&self, file: &mut OsFile, buf: &mut [u8]) -> usize {
        file.read_counted(buf)
    }

    fn write_block(&self, file: &mut OsFile, buf: &[u8]) -> bool {
        file.write_block(buf)
    }

    fn read_line(&self, file: &mut OsFile, buf: &mut [u8]) -> Option<usize> {
        file.read_line(buf)
    }

    fn write_str(&self, file: &mut OsFile, s: &str) -> bool {
        file.write_str(s)
    }

    fn read_char(&self, file: &mut OsFile) -> Option<u8> {
        file.read_char()
    }

    fn seek(&self, file: &mut OsFile, offset: i64, origin: SeekOrigin) -> bool {
        file.seek(offset, origin)
    }

    fn position(&self, file: &mut OsFile) -> Option<u64> {
        file.position()
    }

    fn flush(&self, file: &mut OsFile) -> bool {
        file.flush()
    }

    fn close(&self, file: OsFile) -> bool {
        file.close()
    }

    fn last_failure(&self, file: &OsFile) -> Option<OsFailure> {
        file.last_failure()
    }

    fn stat(&self, path: &Path, follow_links: bool) -> Option<FileStat> {
        stat::file_stat(path, follow_links)
    }

    fn mode(&self, path: &Path, follow_links: bool) -> Option<(FileMode, FileAttrs)> {
        stat::file_mode(path, follow_links)
    }

    fn open_dir(&self, path: &Path) -> Option<OsDir> {
        dir::open_dir(path)
    }

    fn read_dir_next(&self, dir: &mut OsDir) -> Option<String> {
        dir.read_next()
    }

    fn close_dir(&self, dir: OsDir) {
        dir.close();
    }

    fn alloc(&self, size: usize) -> Option<MemBlock> {
        MemBlock::alloc(size)
    }

    fn resize(&self, block: &mut MemBlock, new_size: usize) -> bool {
        block.resize(new_size)
    }

    fn free(&self, block: MemBlock) {
        block.free();
    }

    fn stricmp(&self, a: &str, b: &str) -> Ordering {
        strings::stricmp(a, b)
    }

    fn strnicmp(&self, a: &str, b: &str, n: usize) -> Ordering {
        strings::strnicmp(a, b, n)
    }

    fn memicmp(&self, a: &[u8], b: &[u8], n: usize) -> Ordering {
        strings::memicmp(a, b, n)
    }

    fn asprintf(&self, args: fmt::Arguments<'_>) -> String {
        strings::asprintf(args)
    }

    fn absolute_filename(&self, name: &str) -> Option<PathBuf> {
        crate::os::path::absolute_filename(name)
    }

    fn modified_time(&self, path: &Path) -> Option<FileTime> {
        time::modified_time(path)
    }

    fn now(&self) -> i64 {
        time::now()
    }
}
