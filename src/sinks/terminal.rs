//! Terminal display sink

use crate::core::DisplaySink;
use log::warn;
use std::io::{IsTerminal, Write};

/// Two-region text display rendered to stdout
///
/// Every region update composes the whole frame and writes it in one
/// syscall, so the reader never sees a half-replaced mix of two events.
/// On a real terminal the frame repaints in place; when stdout is a pipe
/// the frames are appended instead.
pub struct TerminalSink {
    banner: String,
    details: String,
    values: String,
    ansi: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            banner: String::new(),
            details: String::new(),
            values: String::new(),
            ansi: std::io::stdout().is_terminal(),
        }
    }

    /// Static text shown above both regions (sensor list, key help)
    pub fn set_banner(&mut self, text: &str) {
        self.banner = text.to_string();
        self.repaint();
    }

    fn repaint(&self) {
        let frame = compose_frame(&self.banner, &self.details, &self.values);
        let mut stdout = std::io::stdout().lock();
        let result = if self.ansi {
            // Clear screen, cursor home, then the whole frame at once
            stdout.write_all(format!("\x1b[2J\x1b[H{}", frame).as_bytes())
        } else {
            stdout.write_all(frame.as_bytes())
        };
        if let Err(e) = result.and_then(|_| stdout.flush()) {
            warn!("failed to write frame: {}", e);
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for TerminalSink {
    fn set_details(&mut self, text: &str) {
        self.details = text.to_string();
        self.repaint();
    }

    fn set_values(&mut self, text: &str) {
        self.values = text.to_string();
        self.repaint();
    }
}

/// Compose one full frame from the three text blocks
fn compose_frame(banner: &str, details: &str, values: &str) -> String {
    let mut frame = String::new();
    if !banner.is_empty() {
        frame.push_str(banner);
        frame.push_str("\n\n");
    }
    frame.push_str("== Sensor details ==\n");
    frame.push_str(details);
    frame.push_str("\n\n== Latest reading ==\n");
    frame.push_str(values);
    frame.push('\n');
    frame
}
