// osfab - main.rs
//
// osprobe: a diagnostic front end that drives the OS layer on the current
// host. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Dispatch of one probe command through `HostOs`

use clap::{Parser, Subcommand};
use osfab::os::{self, FileStat, FileTypeHint, HostOs, MemBlock, OpenMode, OsLayer};
use osfab::platform::config::{self, OutputFormat, PlatformPaths, ProbeConfig};
use osfab::util::constants;
use osfab::util::error::{OsFailure, OsLayerError, Result};
use osfab::util::logging;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// osprobe - exercise the interpreter OS layer on this host.
#[derive(Parser, Debug)]
#[command(name = "osprobe", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Print results as JSON.
    #[arg(long = "json", global = true)]
    json: bool,

    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(short = 'c', long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the platform-identity table.
    Constants,

    /// Print the status descriptor of a path.
    Stat {
        path: PathBuf,
        /// Report a symbolic link itself rather than its target.
        #[arg(long = "no-follow")]
        no_follow: bool,
    },

    /// List the entries of a directory.
    Ls { dir: PathBuf },

    /// Compare two names ignoring case.
    Cmp {
        a: String,
        b: String,
        /// Compare only the first N bytes.
        #[arg(short = 'n')]
        n: Option<usize>,
    },

    /// Copy a file with block transfers through the layer.
    Copy { from: PathBuf, to: PathBuf },

    /// Print the config file and data directory osprobe uses.
    Paths,
}

fn main() {
    let cli = Cli::parse();

    let mut paths = PlatformPaths::resolve();
    if let Some(dir) = cli.config_dir.clone() {
        paths.config_dir = dir;
    }
    let (mut probe_config, config_warnings) = config::load_config(&paths.config_dir);
    let log_file = probe_config.log_file.as_deref().map(|f| paths.log_file(f));

    logging::init(
        cli.debug,
        probe_config.log_level.as_deref(),
        log_file.as_deref(),
    );
    tracing::debug!(config = %paths.config_file().display(), "Config loaded");
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if cli.json {
        probe_config.output = OutputFormat::Json;
    }

    tracing::debug!(
        version = constants::APP_VERSION,
        command = ?cli.command,
        "osprobe starting"
    );

    let code = match run(&HostOs, cli.command, &probe_config, &paths) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = %e, failure = %e.failure(), "Command failed");
            eprintln!("Error: {e}");
            constants::EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

/// Run one command, returning the process exit code.
fn run(
    host: &HostOs,
    command: Command,
    config: &ProbeConfig,
    paths: &PlatformPaths,
) -> Result<i32> {
    let json = config.output == OutputFormat::Json;
    match command {
        Command::Constants => {
            let id = host.identity();
            if json {
                print_json(id);
            } else {
                println!("system            {}", id.system_long_desc);
                println!("path separator    {:?}", id.path_char);
                println!("alt separators    {:?}", id.path_alt);
                println!("url separators    {:?}", id.path_url);
                println!("path-list sep     {:?}", id.path_list_sep);
                println!("current dir       {:?}", id.path_pwd);
                println!("max filename      {}", id.max_filename_len);
                println!("newline           {:?}", id.newline_seq);
                println!("max alloc         {:#x}", id.max_alloc);
                println!("exit codes        {}/{}", id.exit_success, id.exit_failure);
            }
            Ok(id.exit_success)
        }
        Command::Stat { path, no_follow } => {
            let follow = config.follow_links && !no_follow;
            let st = os::stat::try_file_stat(&path, follow)?;
            if json {
                print_json(&st);
            } else {
                print_stat(&path, &st);
            }
            Ok(constants::EXIT_SUCCESS)
        }
        Command::Ls { dir } => {
            let handle = os::dir::try_open_dir(&dir)?;
            let names: Vec<String> = handle.collect();
            if json {
                print_json(&names);
            } else {
                for name in &names {
                    println!("{name}");
                }
            }
            Ok(constants::EXIT_SUCCESS)
        }
        Command::Cmp { a, b, n } => {
            let ord = match n {
                Some(n) => host.strnicmp(&a, &b, n),
                None => host.stricmp(&a, &b),
            };
            let label = match ord {
                Ordering::Less => "less",
                Ordering::Equal => "equal",
                Ordering::Greater => "greater",
            };
            if json {
                print_json(&label);
            } else {
                println!("{label}");
            }
            Ok(if ord == Ordering::Equal {
                constants::EXIT_SUCCESS
            } else {
                constants::EXIT_FAILURE
            })
        }
        Command::Copy { from, to } => {
            let copied = copy_file(&from, &to, config.copy_chunk_bytes)?;
            tracing::info!(from = %from.display(), to = %to.display(), bytes = copied, "Copied");
            if json {
                print_json(&copied);
            } else {
                println!("{copied} bytes");
            }
            Ok(constants::EXIT_SUCCESS)
        }
        Command::Paths => {
            let config_file = paths.config_file();
            let log_file = config.log_file.as_deref().map(|f| paths.log_file(f));
            if json {
                print_json(&serde_json::json!({
                    "config_file": config_file,
                    "config_present": host.exists(&config_file),
                    "data_dir": paths.data_dir,
                    "log_file": log_file,
                }));
            } else {
                let present = if host.exists(&config_file) { "" } else { " (absent)" };
                println!("config file  {}{present}", config_file.display());
                println!("data dir     {}", paths.data_dir.display());
                match log_file {
                    Some(f) => println!("log file     {}", f.display()),
                    None => println!("log file     -"),
                }
            }
            Ok(constants::EXIT_SUCCESS)
        }
    }
}

/// Copy `from` to `to` in `chunk`-sized block transfers.
///
/// Refuses to copy a file onto itself, since opening the destination for
/// writing would truncate the source first.
fn copy_file(from: &Path, to: &Path, chunk: usize) -> Result<u64> {
    if same_file(from, to) {
        return Err(OsLayerError::from_io(
            to,
            "copy",
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "source and destination are the same file",
            ),
        ));
    }
    let mut src = os::file::try_open(from, OpenMode::ReadBinary, FileTypeHint::Binary)?;
    let mut dst = os::file::try_open(to, OpenMode::WriteBinary, FileTypeHint::Binary)?;
    let mut buf = MemBlock::try_alloc(chunk.max(1))?;
    let mut total: u64 = 0;

    loop {
        let n = src.read_counted(&mut buf);
        if n > 0 && !dst.write_block(&buf[..n]) {
            return Err(transfer_error(to, "write", dst.last_failure(), n));
        }
        total += n as u64;
        if n < buf.len() {
            match src.last_failure() {
                None | Some(OsFailure::EndOfStream) => break,
                failure => return Err(transfer_error(from, "read", failure, buf.len())),
            }
        }
    }

    if !dst.close() {
        return Err(transfer_error(to, "close", None, 0));
    }
    src.close();
    Ok(total)
}

/// Whether two paths resolve to the same existing file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn transfer_error(
    path: &Path,
    operation: &'static str,
    failure: Option<OsFailure>,
    requested: usize,
) -> OsLayerError {
    match failure {
        Some(OsFailure::PartialTransfer {
            requested,
            transferred,
        }) => OsLayerError::PartialTransfer {
            requested,
            transferred,
        },
        Some(OsFailure::EndOfStream) => OsLayerError::EndOfStream,
        other => {
            let kind = match other {
                Some(OsFailure::Io(kind)) => kind,
                Some(OsFailure::PermissionDenied) => std::io::ErrorKind::PermissionDenied,
                Some(OsFailure::NotFound) => std::io::ErrorKind::NotFound,
                _ => std::io::ErrorKind::Other,
            };
            tracing::debug!(path = %path.display(), operation, requested, ?other, "Transfer failed");
            OsLayerError::from_io(path, operation, std::io::Error::from(kind))
        }
    }
}

fn print_stat(path: &Path, st: &FileStat) {
    let mut flags = Vec::new();
    if st.attrs.is_hidden() {
        flags.push("hidden");
    }
    if st.attrs.is_system() {
        flags.push("system");
    }
    if st.attrs.is_readable() {
        flags.push("read");
    }
    if st.attrs.is_writable() {
        flags.push("write");
    }
    let fmt_time = |t: Option<os::FileTime>| {
        t.and_then(|t| t.to_local())
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    println!("path      {}", path.display());
    println!("mode      {}", st.mode);
    println!("attrs     {}", flags.join(","));
    println!("size      {}", st.size);
    println!("created   {}", fmt_time(st.created));
    println!("modified  {}", fmt_time(st.modified));
    println!("accessed  {}", fmt_time(st.accessed));
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialise output"),
    }
}
