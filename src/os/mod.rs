// osfab - os/mod.rs
//
// The OS abstraction contract: file and directory handles, status queries,
// memory blocks, filename conventions, string and time utilities.
// Dependencies: util, standard library, libc (POSIX access checks).
// Must NOT depend on: platform.

pub mod dir;
pub mod file;
pub mod layer;
pub mod mem;
pub mod path;
pub mod stat;
pub mod strings;
pub mod time;

pub use dir::OsDir;
pub use file::{FileTypeHint, OpenMode, OsFile, SeekOrigin};
pub use layer::{HostOs, OsLayer, PlatformIdentity, HOST_IDENTITY};
pub use mem::MemBlock;
pub use stat::{FileAttrs, FileMode, FileStat};
pub use time::FileTime;
