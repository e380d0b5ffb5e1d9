//! Win32 window source.
#![allow(unsafe_code)]

use std::path::Path;

use windows::Win32::Foundation::{CloseHandle, HWND};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId,
};
use windows::core::PWSTR;
use ww_core::{PlatformError, UNKNOWN, WindowObservation, WindowSource};

/// Reads the foreground window and the executable that owns it.
pub struct ForegroundSource;

impl WindowSource for ForegroundSource {
    fn fetch_focused_window(&self) -> Result<WindowObservation, PlatformError> {
        // SAFETY: no arguments; returns a possibly null handle.
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.0.is_null() {
            return Ok(WindowObservation::unknown());
        }

        let appname = process_name(hwnd).unwrap_or_else(|| UNKNOWN.to_string());
        let title = window_title(hwnd).unwrap_or_else(|| UNKNOWN.to_string());
        Ok(WindowObservation { appname, title })
    }
}

fn window_title(hwnd: HWND) -> Option<String> {
    let mut buf = [0u16; 512];
    // SAFETY: the buffer outlives the call and its length is passed implicitly.
    let len = unsafe { GetWindowTextW(hwnd, &mut buf) };
    let len = usize::try_from(len).ok().filter(|&n| n > 0)?;
    Some(String::from_utf16_lossy(&buf[..len]))
}

/// File name of the executable owning `hwnd`, e.g. `firefox.exe`.
fn process_name(hwnd: HWND) -> Option<String> {
    let mut pid = 0u32;
    // SAFETY: `pid` is a valid out pointer for the duration of the call.
    unsafe { GetWindowThreadProcessId(hwnd, Some(&raw mut pid)) };
    if pid == 0 {
        return None;
    }

    // SAFETY: the handle is closed below on every path.
    let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }.ok()?;
    let mut buf = [0u16; 1024];
    let mut size = u32::try_from(buf.len()).ok()?;
    // SAFETY: `size` holds the buffer capacity in u16 units.
    let queried = unsafe {
        QueryFullProcessImageNameW(
            handle,
            PROCESS_NAME_WIN32,
            PWSTR(buf.as_mut_ptr()),
            &raw mut size,
        )
    };
    // SAFETY: `handle` came from OpenProcess and is not used afterwards.
    let _ = unsafe { CloseHandle(handle) };
    queried.ok()?;

    let path = String::from_utf16_lossy(&buf[..size as usize]);
    Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
