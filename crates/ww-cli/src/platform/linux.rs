//! X11 window source.

use ww_core::{PlatformError, UNKNOWN, WindowObservation, WindowSource};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

/// Property reads are capped at this many 32-bit units.
const MAX_PROPERTY_LEN: u32 = 1024;

/// Reads the focused window over an X11 connection.
pub struct X11Source {
    conn: RustConnection,
    root: Window,
    net_active_window: Atom,
    net_wm_name: Atom,
    utf8_string: Atom,
}

impl X11Source {
    /// Connects to the display named by `DISPLAY`.
    pub fn connect() -> Result<Self, PlatformError> {
        if std::env::var_os("DISPLAY").is_none_or(|d| d.is_empty()) {
            return Err(PlatformError::NoDisplay(
                "DISPLAY environment variable not set".to_string(),
            ));
        }

        let (conn, screen_num) =
            x11rb::connect(None).map_err(|e| PlatformError::NoDisplay(e.to_string()))?;
        let root = conn.setup().roots[screen_num].root;

        let net_active_window = intern(&conn, "_NET_ACTIVE_WINDOW")?;
        let net_wm_name = intern(&conn, "_NET_WM_NAME")?;
        let utf8_string = intern(&conn, "UTF8_STRING")?;

        tracing::debug!(screen = screen_num, "connected to X server");

        Ok(Self {
            conn,
            root,
            net_active_window,
            net_wm_name,
            utf8_string,
        })
    }

    fn property(
        &self,
        window: Window,
        property: Atom,
        kind: Atom,
    ) -> Result<Vec<u8>, PlatformError> {
        let reply = self
            .conn
            .get_property(false, window, property, kind, 0, MAX_PROPERTY_LEN)
            .map_err(query_error)?
            .reply()
            .map_err(query_error)?;
        Ok(reply.value)
    }

    fn active_window(&self) -> Result<Option<Window>, PlatformError> {
        let reply = self
            .conn
            .get_property(false, self.root, self.net_active_window, AtomEnum::WINDOW, 0, 1)
            .map_err(query_error)?
            .reply()
            .map_err(query_error)?;

        Ok(reply
            .value32()
            .and_then(|mut ids| ids.next())
            .filter(|&id| id != 0))
    }

    /// The class half of `WM_CLASS` (`instance\0class\0`).
    fn window_class(&self, window: Window) -> Result<Option<String>, PlatformError> {
        let raw = self.property(window, AtomEnum::WM_CLASS.into(), AtomEnum::STRING.into())?;
        let mut parts = raw
            .split(|&b| b == 0)
            .filter(|part| !part.is_empty())
            .map(|part| String::from_utf8_lossy(part).into_owned());
        let instance = parts.next();
        Ok(parts.next().or(instance))
    }

    fn window_name(&self, window: Window) -> Result<Option<String>, PlatformError> {
        let utf8 = self.property(window, self.net_wm_name, self.utf8_string)?;
        if !utf8.is_empty() {
            return Ok(Some(String::from_utf8_lossy(&utf8).into_owned()));
        }

        let legacy = self.property(window, AtomEnum::WM_NAME.into(), AtomEnum::ANY.into())?;
        Ok((!legacy.is_empty()).then(|| String::from_utf8_lossy(&legacy).into_owned()))
    }
}

impl WindowSource for X11Source {
    fn fetch_focused_window(&self) -> Result<WindowObservation, PlatformError> {
        let Some(window) = self.active_window()? else {
            return Ok(WindowObservation::unknown());
        };

        let appname = self.window_class(window)?.unwrap_or_else(|| UNKNOWN.to_string());
        let title = self.window_name(window)?.unwrap_or_else(|| UNKNOWN.to_string());
        Ok(WindowObservation { appname, title })
    }
}

fn intern(conn: &RustConnection, name: &str) -> Result<Atom, PlatformError> {
    Ok(conn
        .intern_atom(false, name.as_bytes())
        .map_err(query_error)?
        .reply()
        .map_err(query_error)?
        .atom)
}

fn query_error(err: impl std::fmt::Display) -> PlatformError {
    PlatformError::Query(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "requires an X11 display"]
    fn test_reads_focused_window() {
        let source = X11Source::connect().unwrap();
        let window = source.fetch_focused_window().unwrap();
        println!("Active: {window}");
    }
}
