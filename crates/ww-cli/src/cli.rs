//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// A cross platform window watcher.
///
/// Polls the focused window and appends a row to a CSV file every time focus
/// moves to a different window. Supported on Linux (X11), macOS and Windows.
#[derive(Debug, Parser)]
#[command(name = "window_watcher", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV file to log events to.
    #[arg(long, global = true, value_name = "PATH")]
    pub datafile: Option<PathBuf>,

    /// Seconds to wait between polling for window events.
    #[arg(long, value_name = "SECONDS")]
    pub poll_time: Option<f64>,

    /// Don't log windows whose app name or title matches this regex.
    ///
    /// May be given more than once.
    #[arg(long = "ignore-regex", value_name = "PATTERN")]
    pub ignore_regex: Vec<String>,

    /// Diagnostic log file (rotated by size).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings given on the command line, layered over the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            datafile: self.datafile.clone(),
            poll_time: self.poll_time,
            ignore_regex: self.ignore_regex.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Watch the focused window and log changes (the default).
    Watch,

    /// Print logged events as JSON lines.
    Events {
        /// Only show events that started at or after this Unix timestamp.
        #[arg(long, value_name = "UNIX_SECONDS")]
        after: Option<i64>,
    },
}
