//! Storage layer for the window watcher.
//!
//! Closed focus sessions are appended to a flat delimited-text file, one row
//! per event and no header:
//!
//! ```text
//! started_at,duration,appname,title
//! ```
//!
//! # Row Format
//!
//! - Delimiter `,`, quote character `|`, rows terminated by `\r\n`.
//! - Quoting is minimal: only fields containing the delimiter, the quote
//!   character or a line break are quoted. A quote character inside a quoted
//!   field is doubled.
//! - `started_at` is a Unix timestamp in seconds, `duration` whole seconds.
//!
//! # Durability
//!
//! [`EventLog`] holds no open handle. Every [`EventLog::append`] opens the file
//! in append mode, writes one complete row, syncs it to disk and closes the
//! file again, so a process killed between appends never leaves a partial row
//! and readers tailing the file only ever see whole rows.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use fs2::FileExt;
use thiserror::Error;
use ww_core::WindowEvent;

/// Quote character used in data file rows.
pub const QUOTE: u8 = b'|';

/// Field delimiter used in data file rows.
pub const DELIMITER: u8 = b',';

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening, writing or syncing the data file failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// A row could not be encoded or parsed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only log of closed focus sessions.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// Creates a log backed by the file at `path`.
    ///
    /// Nothing is opened until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one event as a single row.
    ///
    /// Creates the file and its parent directory if needed. The row is synced
    /// to stable storage before this returns.
    pub fn append(&self, event: &WindowEvent) -> Result<(), StoreError> {
        let row = encode_row(event)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Read access: Windows refuses to lock append-only handles.
        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Advisory; keeps a second watcher on the same file from interleaving
        // rows. Released when the file is closed.
        file.lock_exclusive()?;
        file.write_all(&row)?;
        file.sync_data()?;

        tracing::trace!(path = %self.path.display(), bytes = row.len(), "appended row");
        Ok(())
    }

    /// Reads every row back.
    ///
    /// A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<WindowEvent>, StoreError> {
        let content = match fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        decode_rows(&content)
    }
}

/// Encodes one event as a complete, terminated row.
pub fn encode_row(event: &WindowEvent) -> Result<Vec<u8>, StoreError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.serialize(event)?;
    writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))
}

/// Parses rows produced by [`encode_row`].
pub fn decode_rows(content: &[u8]) -> Result<Vec<WindowEvent>, StoreError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .from_reader(content);

    reader
        .deserialize::<WindowEvent>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::from)
}
