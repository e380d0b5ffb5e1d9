//! Configuration loading and management.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Name of the data file inside the data directory.
const DATAFILE_NAME: &str = "window_events.csv";

/// Seconds between polls unless configured otherwise.
pub const DEFAULT_POLL_TIME: f64 = 1.0;

/// Size at which the diagnostic log is rotated.
const DEFAULT_LOG_MAX_BYTES: u64 = 10_000_000;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// CSV file that closed focus sessions are appended to.
    pub datafile: PathBuf,
    /// Seconds between polls.
    pub poll_time: f64,
    /// Patterns whose matching sessions are not written.
    #[serde(default)]
    pub ignore_regex: Vec<String>,
    /// Diagnostic log file.
    pub log_file: PathBuf,
    /// Size in bytes at which the diagnostic log is rotated.
    pub log_max_bytes: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("datafile", &self.datafile)
            .field("poll_time", &self.poll_time)
            .field("ignore_regex", &self.ignore_regex.len())
            .field("log_file", &self.log_file)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datafile: default_datafile(),
            poll_time: DEFAULT_POLL_TIME,
            ignore_regex: Vec::new(),
            log_file: std::env::temp_dir().join("window-watcher.log"),
            log_max_bytes: DEFAULT_LOG_MAX_BYTES,
        }
    }
}

/// Settings taken from command-line flags.
///
/// Only flags that were given are serialized, so absent flags leave the
/// configured value alone. Ignore patterns are appended to configured ones.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datafile: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_time: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore_regex: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration, optionally from a specific file, with flag
    /// overrides applied last.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(
        config_path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WW_*)
        figment = figment.merge(Env::prefixed("WW_"));

        // Flags win; ignore patterns accumulate
        figment = figment.admerge(Serialized::defaults(overrides));

        figment.extract()
    }

    /// The poll interval, rejecting values that can't drive a timer.
    pub fn poll_interval(&self) -> Result<Duration> {
        if !self.poll_time.is_finite() || self.poll_time <= 0.0 {
            bail!(
                "poll time must be a positive number of seconds, got {}",
                self.poll_time
            );
        }
        Ok(Duration::try_from_secs_f64(self.poll_time)?)
    }
}

/// Returns the platform-specific config directory for window watcher.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("window-watcher"))
}

/// Returns the default data file.
///
/// `$XDG_DATA_HOME/window_events.csv`, else `~/.local/share/window_events.csv`.
pub fn default_datafile() -> PathBuf {
    data_home(std::env::var_os("XDG_DATA_HOME"), dirs::home_dir()).join(DATAFILE_NAME)
}

/// Resolves the data directory from `XDG_DATA_HOME` and the home directory.
fn data_home(xdg_data_home: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    xdg_data_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| h.join(".local").join("share")))
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
