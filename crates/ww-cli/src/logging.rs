//! Diagnostic logging.
//!
//! Operational messages go to stderr and, while watching, to a size-rotated log
//! file kept apart from the data file. When a write would push the log past its
//! limit the file is moved to `<name>.1`, replacing the previous backup.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Append-only log file that keeps one backup once it grows past a limit.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    file: Option<File>,
    written: u64,
}

impl RotatingFile {
    /// Opens (or creates) the log at `path`.
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            file: Some(file),
            written,
        })
    }

    /// Path of the backup written on rotation.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".1");
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        // Close before renaming; Windows refuses to move open files.
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        fs::rename(&self.path, self.backup_path())?;
        self.file = Some(open_append(&self.path)?);
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let mut file = match self.file.take() {
            Some(file) => file,
            None => open_append(&self.path)?,
        };
        let result = file.write(buf);
        self.file = Some(file);
        let n = result?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.as_mut().map_or(Ok(()), |f| f.flush())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` is honoured, defaulting to
/// `info`. When `file` is given, events are also written there without ANSI
/// colours.
pub fn init(verbose: bool, file: Option<RotatingFile>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let file_layer = file.map(|f| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(f))
    });

    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_to_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.log");
        fs::write(&path, "earlier\n").unwrap();

        let mut log = RotatingFile::open(&path, 1024).unwrap();
        log.write_all(b"later\n").unwrap();
        log.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_rotates_past_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.log");

        let mut log = RotatingFile::open(&path, 10).unwrap();
        log.write_all(b"12345678\n").unwrap();
        log.write_all(b"abcdef\n").unwrap();
        log.flush().unwrap();

        assert_eq!(fs::read_to_string(log.backup_path()).unwrap(), "12345678\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdef\n");
    }

    #[test]
    fn test_keeps_a_single_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.log");

        let mut log = RotatingFile::open(&path, 4).unwrap();
        for line in [b"one\n", b"two\n", b"six\n"] {
            log.write_all(line).unwrap();
        }
        log.flush().unwrap();

        assert_eq!(fs::read_to_string(log.backup_path()).unwrap(), "two\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "six\n");
        assert!(!dir.path().join("watcher.log.2").exists());
    }

    #[test]
    fn test_oversized_write_into_empty_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watcher.log");

        let mut log = RotatingFile::open(&path, 2).unwrap();
        log.write_all(b"longer than the limit\n").unwrap();
        log.flush().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "longer than the limit\n"
        );
        assert!(!log.backup_path().exists());
    }
}
