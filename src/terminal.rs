//! Stdout/stderr rendering of the chat view.

use std::io::Write;

use crate::controller::Surface;

/// Chat lines go to stdout, alerts to stderr.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    composer_enabled: bool,
}

impl Surface for TerminalSurface {
    fn alert(&mut self, message: &str) {
        eprintln!("[!] {message}");
    }

    fn render_line(&mut self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }

    fn set_composer_enabled(&mut self, enabled: bool) {
        if enabled && !self.composer_enabled {
            println!("Connected. Type a message and hit enter; /reconnect or /quit.");
        }
        self.composer_enabled = enabled;
    }

    fn set_identity_locked(&mut self, locked: bool) {
        tracing::debug!(locked, "identity lock changed");
    }
}
