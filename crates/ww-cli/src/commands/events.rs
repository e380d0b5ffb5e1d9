//! Events command for dumping the data file.
//!
//! This module prints logged events as JSONL for debugging.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use ww_core::WindowEvent;
use ww_store::EventLog;

/// One output line: the stored row plus its start time in RFC 3339.
#[derive(Debug, Serialize)]
struct EventLine<'a> {
    #[serde(flatten)]
    event: &'a WindowEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    started: Option<DateTime<Utc>>,
}

/// Runs the events command, outputting events as JSONL to stdout.
pub fn run(log: &EventLog, after: Option<i64>) -> Result<()> {
    let stdout = std::io::stdout();
    write_events(log, after, &mut stdout.lock())
}

fn write_events(log: &EventLog, after: Option<i64>, out: &mut impl Write) -> Result<()> {
    let events = log
        .read_all()
        .with_context(|| format!("failed to read {}", log.path().display()))?;

    for event in events
        .iter()
        .filter(|e| after.is_none_or(|after| e.started_at >= after))
    {
        let line = EventLine {
            event,
            started: DateTime::from_timestamp(event.started_at, 0),
        };
        let json = serde_json::to_string(&line)?;
        writeln!(out, "{json}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(started_at: i64, appname: &str) -> WindowEvent {
        WindowEvent {
            started_at,
            duration: 3,
            appname: appname.into(),
            title: "t".into(),
        }
    }

    fn dump(log: &EventLog, after: Option<i64>) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        write_events(log, after, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_outputs_one_json_object_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("window_events.csv"));
        log.append(&event(1_700_000_000, "kitty")).unwrap();
        log.append(&event(1_700_000_003, "firefox")).unwrap();

        let lines = dump(&log, None);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["appname"], "kitty");
        assert_eq!(lines[0]["started_at"], 1_700_000_000);
        assert_eq!(lines[0]["duration"], 3);
        assert_eq!(lines[0]["started"], "2023-11-14T22:13:20Z");
        assert_eq!(lines[1]["appname"], "firefox");
    }

    #[test]
    fn test_after_filters_older_rows() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("window_events.csv"));
        for (t, app) in [(10, "a"), (20, "b"), (30, "c")] {
            log.append(&event(t, app)).unwrap();
        }

        let lines = dump(&log, Some(20));

        let apps: Vec<_> = lines.iter().map(|l| l["appname"].clone()).collect();
        assert_eq!(apps, vec!["b", "c"]);
    }

    #[test]
    fn test_missing_datafile_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("absent.csv"));
        assert!(dump(&log, None).is_empty());
    }
}
