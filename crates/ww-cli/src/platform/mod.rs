//! Platform window sources.
//!
//! Exactly one source is compiled in per target; [`native_source`] builds it
//! once at startup and the poll loop borrows it for the life of the process.

use ww_core::{PlatformError, WindowSource};

#[cfg(target_os = "linux")]
mod linux;

#[cfg(any(target_os = "macos", test))]
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod macos;

#[cfg(windows)]
mod win32;

/// Builds the window source for the running platform.
///
/// Fails when no windowing session is reachable (e.g. `DISPLAY` unset on
/// Linux) or the platform is unsupported.
pub fn native_source() -> Result<Box<dyn WindowSource>, PlatformError> {
    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(linux::X11Source::connect()?))
    }

    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(macos::AppleScriptSource))
    }

    #[cfg(windows)]
    {
        Ok(Box::new(win32::ForegroundSource))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
    {
        Err(PlatformError::Unsupported(std::env::consts::OS))
    }
}
