// osfab - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
//
// The contract operations themselves never return these: they report
// failure through sentinels (`None`, `false`, a zero count). The types here
// classify a failure after the fact (`OsFailure`) and back the `try_*`
// variants and the probe tool (`OsLayerError`).

use std::fmt;
use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// Classified cause of a failed operation on a handle or path.
///
/// Recorded by `OsFile` so a caller that received a bare `false` from a
/// block transfer can tell end-of-file apart from a host error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFailure {
    /// The named resource does not exist.
    NotFound,

    /// The host refused access.
    PermissionDenied,

    /// Fewer bytes than requested were transferred before an error.
    PartialTransfer { requested: usize, transferred: usize },

    /// The heap could not satisfy an allocation.
    AllocationFailure { requested: usize },

    /// End of file or end of a directory stream.
    EndOfStream,

    /// Any other host I/O error.
    Io(io::ErrorKind),
}

impl OsFailure {
    /// Map a host I/O error onto the failure taxonomy.
    pub fn classify(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::UnexpectedEof => Self::EndOfStream,
            kind => Self::Io(kind),
        }
    }
}

impl fmt::Display for OsFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "resource not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::PartialTransfer {
                requested,
                transferred,
            } => write!(f, "partial transfer: {transferred} of {requested} bytes"),
            Self::AllocationFailure { requested } => {
                write!(f, "allocation of {requested} bytes failed")
            }
            Self::EndOfStream => write!(f, "end of stream"),
            Self::Io(kind) => write!(f, "I/O error: {kind}"),
        }
    }
}

impl std::error::Error for OsFailure {}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Top-level error type for the `Result`-returning operations.
#[derive(Debug)]
pub enum OsLayerError {
    /// The path does not exist.
    NotFound { path: PathBuf },

    /// The host refused access to the path.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// A block transfer moved fewer bytes than requested.
    PartialTransfer { requested: usize, transferred: usize },

    /// A memory block could not be allocated or grown.
    AllocationFailure { requested: usize },

    /// End of file or end of a directory stream.
    EndOfStream,

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl OsLayerError {
    /// Build an error from a host I/O failure, folding the not-found and
    /// permission-denied kinds into their dedicated variants.
    pub fn from_io(path: impl Into<PathBuf>, operation: &'static str, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io {
                path,
                operation,
                source,
            },
        }
    }

    /// The taxonomy bucket this error falls into.
    pub fn failure(&self) -> OsFailure {
        match self {
            Self::NotFound { .. } => OsFailure::NotFound,
            Self::PermissionDenied { .. } => OsFailure::PermissionDenied,
            Self::PartialTransfer {
                requested,
                transferred,
            } => OsFailure::PartialTransfer {
                requested: *requested,
                transferred: *transferred,
            },
            Self::AllocationFailure { requested } => OsFailure::AllocationFailure {
                requested: *requested,
            },
            Self::EndOfStream => OsFailure::EndOfStream,
            Self::Io { source, .. } => OsFailure::Io(source.kind()),
            Self::Config(_) => OsFailure::Io(io::ErrorKind::InvalidData),
        }
    }
}

impl fmt::Display for OsLayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "'{}' does not exist", path.display()),
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::PartialTransfer {
                requested,
                transferred,
            } => write!(
                f,
                "Partial transfer: {transferred} of {requested} bytes moved"
            ),
            Self::AllocationFailure { requested } => {
                write!(f, "Could not allocate {requested} bytes")
            }
            Self::EndOfStream => write!(f, "End of stream"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for OsLayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for OsLayerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for osfab results.
pub type Result<T> = std::result::Result<T, OsLayerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_classify_maps_host_kinds() {
        let nf = io::Error::new(io::ErrorKind::NotFound, "gone");
        let pd = io::Error::new(io::ErrorKind::PermissionDenied, "no");
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "short");
        let other = io::Error::new(io::ErrorKind::Interrupted, "sig");
        assert_eq!(OsFailure::classify(&nf), OsFailure::NotFound);
        assert_eq!(OsFailure::classify(&pd), OsFailure::PermissionDenied);
        assert_eq!(OsFailure::classify(&eof), OsFailure::EndOfStream);
        assert_eq!(
            OsFailure::classify(&other),
            OsFailure::Io(io::ErrorKind::Interrupted)
        );
    }

    #[test]
    fn test_from_io_folds_not_found() {
        let err = OsLayerError::from_io(
            "/nope",
            "open",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, OsLayerError::NotFound { .. }));
        assert_eq!(err.failure(), OsFailure::NotFound);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_error_keeps_source_chain() {
        let err = OsLayerError::from_io(
            "/dev/full",
            "write",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert!(err.source().is_some());
        let msg = err.to_string();
        assert!(msg.contains("write"), "message was: {msg}");
        assert!(msg.contains("/dev/full"), "message was: {msg}");
    }

    #[test]
    fn test_partial_transfer_display() {
        let err = OsLayerError::PartialTransfer {
            requested: 10,
            transferred: 4,
        };
        assert_eq!(err.to_string(), "Partial transfer: 4 of 10 bytes moved");
    }
}
