use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::{Path, PathBuf};

/// Snapkeeper: unattended snapshot lifecycle for cloud VM disks
///
/// Each invocation runs one pass and prints its summary. Schedule the passes
/// with cron at times that do not overlap: `create` to request snapshots of
/// the machines that are due, `check` to announce completed ones and `reap`
/// to delete expired automatic snapshots.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    ///
    /// Without it the configuration comes from `SNAPKEEPER_*` environment
    /// variables alone.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request snapshots of every configured machine that is due.
    Create {
        /// Evaluate and report without requesting snapshots or touching the
        /// state file.
        #[arg(long)]
        dry_run: bool,
    },
    /// Refresh pending snapshots and notify about completed machines.
    Check,
    /// Delete automatic snapshots older than their retention.
    Reap {
        /// Report what would be deleted without deleting.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.is_file() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}
