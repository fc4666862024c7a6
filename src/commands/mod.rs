pub mod decode;
pub mod encode;
pub mod format;
pub mod merge;

use serde::Serialize;

/// What a successful command did. Failures surface as errors instead.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub details: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            details: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    /// Plain-text rendering for the terminal.
    pub fn render(&self) -> String {
        let mut out = format!("{}: ok\n", self.command);
        for detail in &self.details {
            out.push_str(&format!("  {detail}\n"));
        }
        out
    }
}
