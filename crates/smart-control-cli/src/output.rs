use std::io::Write;

use smart_control_core::{ActionDispatcher, ActionEvent};
use tracing::warn;

/// Writes each event as one JSON line for an external actuator process.
pub struct JsonLinesDispatcher<W> {
    writer: W,
    line_end: &'static str,
}

impl JsonLinesDispatcher<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonLinesDispatcher<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            line_end: "\n",
        }
    }

    /// Terminate lines with CRLF, needed while the terminal is in raw mode
    pub fn with_crlf(mut self) -> Self {
        self.line_end = "\r\n";
        self
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ActionDispatcher for JsonLinesDispatcher<W> {
    fn dispatch(&mut self, event: &ActionEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to encode {}: {}", event, e);
                return;
            }
        };
        let written = write!(self.writer, "{}{}", line, self.line_end).and_then(|_| self.writer.flush());
        if let Err(e) = written {
            warn!("Failed to write {}: {}", event, e);
        }
    }
}
