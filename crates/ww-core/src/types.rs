//! Observations, sessions and the events written to the data file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder used for both fields when the focused window cannot be read.
pub const UNKNOWN: &str = "unknown";

/// A single sample of the focused window.
///
/// Two observations are the same window iff both fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowObservation {
    /// Application name (window class on X11, process name on Windows).
    pub appname: String,
    /// Window title.
    pub title: String,
}

impl WindowObservation {
    /// Creates an observation from an app name and title.
    pub fn new(appname: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            appname: appname.into(),
            title: title.into(),
        }
    }

    /// The sentinel observation recorded when the probe fails.
    ///
    /// It compares like any other observation, so a real window called
    /// `unknown` cannot be told apart from a failed probe.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }
}

impl fmt::Display for WindowObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.appname, self.title)
    }
}

/// The window currently believed to hold focus, and since when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSession {
    /// Application name of the focused window.
    pub appname: String,
    /// Title of the focused window.
    pub title: String,
    /// Unix timestamp (seconds) at which this window was first seen focused.
    pub started_at: i64,
}

impl FocusSession {
    /// Starts a session for `observation` at `started_at`.
    pub fn begin(observation: WindowObservation, started_at: i64) -> Self {
        Self {
            appname: observation.appname,
            title: observation.title,
            started_at,
        }
    }

    /// Returns `true` if `observation` is the window this session tracks.
    pub fn matches(&self, observation: &WindowObservation) -> bool {
        self.appname == observation.appname && self.title == observation.title
    }

    /// Closes the session at `now`, producing the event to persist.
    ///
    /// A clock that stepped backwards yields a zero duration.
    pub fn close(self, now: i64) -> WindowEvent {
        WindowEvent {
            started_at: self.started_at,
            duration: now.saturating_sub(self.started_at).max(0),
            appname: self.appname,
            title: self.title,
        }
    }
}

/// A closed focus session.
///
/// Field order is the column order of a data file row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEvent {
    /// Unix timestamp (seconds) at which the window gained focus.
    pub started_at: i64,
    /// Whole seconds the window held focus.
    pub duration: i64,
    /// Application name.
    pub appname: String,
    /// Window title.
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_equality_uses_both_fields() {
        let a = WindowObservation::new("firefox", "Inbox");
        assert_eq!(a, WindowObservation::new("firefox", "Inbox"));
        assert_ne!(a, WindowObservation::new("firefox", "Drafts"));
        assert_ne!(a, WindowObservation::new("chromium", "Inbox"));
    }

    #[test]
    fn test_unknown_is_an_ordinary_observation() {
        assert_eq!(
            WindowObservation::unknown(),
            WindowObservation::new("unknown", "unknown")
        );
    }

    #[test]
    fn test_session_close_computes_duration() {
        let session = FocusSession::begin(WindowObservation::new("kitty", "vim"), 100);
        let event = session.close(142);
        assert_eq!(event.started_at, 100);
        assert_eq!(event.duration, 42);
        assert_eq!(event.appname, "kitty");
        assert_eq!(event.title, "vim");
    }

    #[test]
    fn test_session_close_never_negative() {
        let session = FocusSession::begin(WindowObservation::new("kitty", "vim"), 100);
        assert_eq!(session.close(90).duration, 0);
    }

    #[test]
    fn test_event_serializes_in_row_order() {
        let event = WindowEvent {
            started_at: 1,
            duration: 2,
            appname: "a".into(),
            title: "t".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"started_at":1,"duration":2,"appname":"a","title":"t"}"#
        );
    }
}
