//! Core domain logic for the window watcher.
//!
//! This crate contains the fundamental types and logic for:
//! - Tracking: deciding when the focused window changed and closing sessions
//! - Filtering: suppressing closed sessions that match ignore patterns
//! - Sources: the capability used to read the focused window from the OS

pub mod filter;
pub mod source;
pub mod tracker;
pub mod types;

pub use filter::{EventFilter, FilterError, IgnoreRule};
pub use source::{PlatformError, WindowSource, poll_window};
pub use tracker::FocusTracker;
pub use types::{FocusSession, UNKNOWN, WindowEvent, WindowObservation};
