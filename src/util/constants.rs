// osfab - util/constants.rs
//
// Single source of truth for the platform-identity table and all named
// limits and defaults. The interpreter core consumes the identity values as
// literals; nothing here is queried at runtime.

// =============================================================================
// Application metadata
// =============================================================================

/// Probe tool display name.
pub const APP_NAME: &str = "osprobe";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "osfab";

/// Current crate version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// System identity
// =============================================================================

/// System identifier reported to the interpreter core.
pub const SYSTEM_NAME: &str = "Fabularium";

/// Descriptive system name.
pub const SYSTEM_LONG_DESC: &str = "Fabularium (Android)";

/// OEM identifier shown in the interpreter's version banner.
pub const OEM_NAME: &str = "Tim Cadogan-Cowper";

// =============================================================================
// Process exit codes
// =============================================================================

/// Successful completion.
pub const EXIT_SUCCESS: i32 = 0;

/// Failure.
pub const EXIT_FAILURE: i32 = 1;

// =============================================================================
// Path and filename conventions
// =============================================================================

/// Normal path separator character.
pub const PATH_CHAR: char = '/';

/// Alternate path separator characters (none on this host).
pub const PATH_ALT: &str = "";

/// Path separator characters used for URL conversions.
pub const PATH_URL: &str = "/";

/// Separator between entries of a PATH-style environment variable.
pub const PATH_LIST_SEP: char = ':';

/// Special path naming the current working directory.
pub const PATH_PWD: &str = ".";

/// Special path naming the parent directory.
pub const PATH_PARENT: &str = "..";

/// Maximum length of a filename (a single path component), in bytes.
pub const MAX_FILENAME_LEN: usize = 255;

/// Separator between a root name and its extension.
pub const EXT_SEP: char = '.';

// =============================================================================
// Text output
// =============================================================================

/// Newline sequence written on text output.
pub const NEWLINE_SEQ: &str = "\n";

/// Maximum width of a line of text. Must fit in a single byte.
pub const MAX_LINE_WIDTH: u8 = 255;

// =============================================================================
// Memory
// =============================================================================

/// Theoretical maximum size of a single allocation, in bytes.
///
/// Every supported host has at least a 32-bit address space, and 2^32 is a
/// good enough bound on 64-bit hosts too.
pub const MAX_ALLOC: usize = 0xffff_ffff;

/// Whether the interpreter's swap file is enabled by default.
pub const DEFAULT_SWAP_ENABLED: bool = false;

// =============================================================================
// File attribute bits
// =============================================================================

/// Hidden file (leading `.` in its name on this host).
pub const ATTR_HIDDEN: u32 = 0x0001;

/// System file. Never set on this host.
pub const ATTR_SYSTEM: u32 = 0x0002;

/// Readable by the current process.
pub const ATTR_READ: u32 = 0x0004;

/// Writable by the current process.
pub const ATTR_WRITE: u32 = 0x0008;

// =============================================================================
// Probe tool
// =============================================================================

/// Default chunk size used by `osprobe copy`.
pub const DEFAULT_COPY_CHUNK_BYTES: usize = 64 * 1024; // 64 KB

/// Minimum configurable copy chunk size.
pub const MIN_COPY_CHUNK_BYTES: usize = 1024;

/// Maximum configurable copy chunk size.
pub const MAX_COPY_CHUNK_BYTES: usize = 16 * 1024 * 1024; // 16 MB

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Valid values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
