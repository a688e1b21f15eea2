//! Operator notifications - best effort, fire and forget
//!
//! Surfaces a short message as a desktop banner (macOS `osascript`) and a
//! terminal banner (OSC 9, honored by iTerm2 and friends). Failures are
//! ignored; the watch loop never consults a return value.

use std::io::Write;

/// Sink for operator notifications
pub trait Notifier: Send + Sync {
    /// Surface a short message to the operator
    fn notify(&self, message: &str);
}

/// Desktop + terminal banner notifier
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str) {
        #[cfg(target_os = "macos")]
        {
            let script = format!(
                r#"display notification "{}" with title "GitHub PR""#,
                escape_osascript(message)
            );
            // Spawn and forget; the banner either shows or it doesn't.
            let _ = std::process::Command::new("osascript")
                .args(["-e", &script])
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .spawn();
        }

        // OSC 9 terminal banner
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "\x1b]9;{message}\x07");
        let _ = stdout.flush();
    }
}

/// Escape a string for embedding in an osascript double-quoted literal.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn escape_osascript(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}
