// osfab - platform/config.rs
//
// Configuration directory resolution and config.toml loading with startup
// validation, for the osprobe tool. The OS layer itself is not configurable.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for osfab configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/osfab/)
    pub config_dir: PathBuf,

    /// Data directory (log files and the like).
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(constants::PATH_PWD);
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    /// Where a configured `[logging] file` goes. Relative names are placed
    /// under the data directory; absolute paths are kept.
    pub fn log_file(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[probe]` section.
    pub probe: ProbeSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[probe]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ProbeSection {
    /// Whether `stat` follows symbolic links by default.
    pub follow_links: Option<bool>,
    /// Output format: "text" or "json".
    pub output: Option<String>,
    /// Chunk size used by `copy`.
    pub copy_chunk_bytes: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Output format for probe results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Follow symbolic links in `stat` unless told otherwise.
    pub follow_links: bool,
    /// Output format.
    pub output: OutputFormat,
    /// Chunk size for `copy`, in bytes.
    pub copy_chunk_bytes: usize,
    /// Logging level string.
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            follow_links: true,
            output: OutputFormat::Text,
            copy_chunk_bytes: constants::DEFAULT_COPY_CHUNK_BYTES,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from `config_dir`.
///
/// Returns the validated config and a list of non-fatal warnings. A missing
/// file yields defaults with no warnings; an unreadable or unparseable file
/// yields defaults with a warning describing the problem.
pub fn load_config(config_dir: &Path) -> (ProbeConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (ProbeConfig::default(), warnings);
    }

    let raw = match read_raw_config(&config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (ProbeConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = ProbeConfig::default();
    for e in apply_raw(&mut config, raw) {
        warnings.push(e.to_string());
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate each raw field into `config`, returning one error per rejected
/// value. Rejected values leave the default in place.
fn apply_raw(config: &mut ProbeConfig, raw: RawConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if let Some(follow) = raw.probe.follow_links {
        config.follow_links = follow;
    }

    if let Some(ref output) = raw.probe.output {
        match output.to_lowercase().as_str() {
            "text" => config.output = OutputFormat::Text,
            "json" => config.output = OutputFormat::Json,
            other => errors.push(ConfigError::ValueOutOfRange {
                field: "[probe] output".to_string(),
                value: other.to_string(),
                expected: "\"text\" or \"json\"".to_string(),
            }),
        }
    }

    if let Some(bytes) = raw.probe.copy_chunk_bytes {
        if (constants::MIN_COPY_CHUNK_BYTES..=constants::MAX_COPY_CHUNK_BYTES).contains(&bytes) {
            config.copy_chunk_bytes = bytes;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "[probe] copy_chunk_bytes".to_string(),
                value: bytes.to_string(),
                expected: format!(
                    "{}-{}",
                    constants::MIN_COPY_CHUNK_BYTES,
                    constants::MAX_COPY_CHUNK_BYTES
                ),
            });
        }
    }

    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: constants::VALID_LOG_LEVELS.join(", "),
            });
        }
    }

    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    errors
}
