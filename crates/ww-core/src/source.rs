//! The focused-window capability and its infallible wrapper.

use thiserror::Error;

use crate::types::WindowObservation;

/// Failures reading the focused window from the platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// No windowing session is reachable.
    #[error("no display available: {0}")]
    NoDisplay(String),
    /// A window system request failed.
    #[error("window system query failed: {0}")]
    Query(String),
    /// A helper process could not be run.
    #[error("failed to run {command}")]
    Command {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// A helper process produced output we could not parse.
    #[error("unexpected probe output: {0:?}")]
    UnexpectedOutput(String),
    /// This platform has no window source.
    #[error("unsupported platform: {0}")]
    Unsupported(&'static str),
}

/// Reads the currently focused window.
///
/// One implementation exists per platform; it is chosen once at startup and
/// passed to the poll loop.
pub trait WindowSource {
    /// Returns the app name and title of the focused window.
    fn fetch_focused_window(&self) -> Result<WindowObservation, PlatformError>;
}

/// Polls `source`, substituting [`WindowObservation::unknown`] on failure.
pub fn poll_window<S: WindowSource + ?Sized>(source: &S) -> WindowObservation {
    match source.fetch_focused_window() {
        Ok(observation) => observation,
        Err(err) => {
            tracing::error!(error = %err, "failed to read focused window");
            WindowObservation::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<WindowObservation>);

    impl WindowSource for Fixed {
        fn fetch_focused_window(&self) -> Result<WindowObservation, PlatformError> {
            self.0
                .clone()
                .ok_or_else(|| PlatformError::Query("BadWindow".into()))
        }
    }

    #[test]
    fn test_poll_passes_observation_through() {
        let source = Fixed(Some(WindowObservation::new("kitty", "vim")));
        assert_eq!(poll_window(&source), WindowObservation::new("kitty", "vim"));
    }

    #[test]
    fn test_poll_failure_becomes_unknown() {
        let source = Fixed(None);
        assert_eq!(poll_window(&source), WindowObservation::unknown());
    }

    #[test]
    fn test_poll_through_trait_object() {
        let source: Box<dyn WindowSource> = Box::new(Fixed(None));
        assert_eq!(poll_window(source.as_ref()), WindowObservation::unknown());
    }
}
