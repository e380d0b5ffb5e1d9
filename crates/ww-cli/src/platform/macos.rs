//! macOS window source backed by `osascript`.

use std::process::Command;

use ww_core::{PlatformError, WindowObservation, WindowSource};

/// Prints the frontmost app and its main window title as `"app","title"`.
const FRONT_WINDOW_SCRIPT: &str = r#"
set windowTitle to ""
tell application "System Events"
    set frontApp to first application process whose frontmost is true
    set frontAppName to name of frontApp
    tell process frontAppName
        try
            tell (1st window whose value of attribute "AXMain" is true)
                set windowTitle to value of attribute "AXTitle"
            end tell
        end try
    end tell
end tell
return "\"" & frontAppName & "\",\"" & windowTitle & "\""
"#;

/// Asks System Events for the frontmost window.
///
/// Needs the Accessibility permission to see titles.
pub struct AppleScriptSource;

impl WindowSource for AppleScriptSource {
    fn fetch_focused_window(&self) -> Result<WindowObservation, PlatformError> {
        let output = Command::new("osascript")
            .arg("-e")
            .arg(FRONT_WINDOW_SCRIPT)
            .output()
            .map_err(|source| PlatformError::Command {
                command: "osascript",
                source,
            })?;

        if !output.status.success() {
            return Err(PlatformError::Query(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        parse_script_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Splits `"app","title"` into its two fields.
fn parse_script_output(output: &str) -> Result<WindowObservation, PlatformError> {
    let info = output.trim();
    let parsed = info.split_once(r#"",""#).and_then(|(app, title)| {
        Some(WindowObservation::new(
            app.strip_prefix('"')?,
            title.strip_suffix('"')?,
        ))
    });
    parsed.ok_or_else(|| PlatformError::UnexpectedOutput(info.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_app_and_title() {
        let window = parse_script_output("\"Safari\",\"Apple\"\n").unwrap();
        assert_eq!(window, WindowObservation::new("Safari", "Apple"));
    }

    #[test]
    fn test_parses_empty_title() {
        let window = parse_script_output(r#""Finder","""#).unwrap();
        assert_eq!(window, WindowObservation::new("Finder", ""));
    }

    #[test]
    fn test_title_may_contain_separator() {
        let window = parse_script_output(r#""Notes","a","b""#).unwrap();
        assert_eq!(window, WindowObservation::new("Notes", r#"a","b"#));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            parse_script_output("execution error: not allowed"),
            Err(PlatformError::UnexpectedOutput(_))
        ));
    }
}
