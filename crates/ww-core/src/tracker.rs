//! Focus change detection.
//!
//! [`FocusTracker`] owns the single live [`FocusSession`]. Each poll feeds it the
//! newest observation; when the observation differs from the live session the
//! session is closed into a [`WindowEvent`] and replaced.

use crate::types::{FocusSession, WindowEvent, WindowObservation};

/// Tracks which window holds focus and emits an event whenever it changes.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    session: FocusSession,
}

impl FocusTracker {
    /// Seeds the tracker with the window focused at startup.
    pub fn new(initial: WindowObservation, now: i64) -> Self {
        Self {
            session: FocusSession::begin(initial, now),
        }
    }

    /// Feeds one observation taken at `now`.
    ///
    /// Returns the closed previous session if the focused window changed. The
    /// live session is replaced on every change, whether or not the returned
    /// event is later persisted.
    pub fn observe(&mut self, current: WindowObservation, now: i64) -> Option<WindowEvent> {
        if self.session.matches(&current) {
            return None;
        }

        let previous = std::mem::replace(&mut self.session, FocusSession::begin(current, now));
        Some(previous.close(now))
    }

    /// The live session.
    pub const fn session(&self) -> &FocusSession {
        &self.session
    }
}
