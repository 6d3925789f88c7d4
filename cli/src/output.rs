//! Terminal output utilities for styled CLI output.
//!
//! Results go to stdout; errors and warnings go to stderr so piped output stays clean.

use std::fmt::Display;

use console::{Term, style};
use outposts_states::ApiError;

pub struct Output {
    out: Term,
    err: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.out
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.err
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    /// Print a warning message with a yellow warning sign.
    pub fn warning(&self, message: impl Display) {
        drop(
            self.err
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    pub fn print(&self, message: impl Display) {
        drop(self.out.write_line(&message.to_string()));
    }

    pub fn header(&self, message: impl Display) {
        drop(self.out.write_line(&style(message).bold().cyan().to_string()));
    }

    pub fn dim(&self, message: impl Display) {
        drop(self.out.write_line(&style(message).dim().to_string()));
    }

    /// Print a `label: value` line.
    pub fn labeled(&self, label: impl Display, value: impl Display) {
        drop(
            self.out
                .write_line(&format!("{}: {}", style(label).dim(), value)),
        );
    }

    /// Print an API error, one line per field for validation failures.
    pub fn api_error(&self, context: impl Display, err: &ApiError) {
        match err {
            ApiError::Validation {
                fields, non_field, ..
            } => {
                self.error(format!("{context}: validation failed"));
                for message in non_field {
                    drop(self.err.write_line(&format!("  {message}")));
                }
                for (field, messages) in fields {
                    drop(self.err.write_line(&format!(
                        "  {}: {}",
                        style(field).yellow(),
                        messages.join(" ")
                    )));
                }
            }
            other => self.error(format!("{context}: {other}")),
        }
    }

    /// Clears the screen before a redraw when attached to a terminal.
    pub fn clear(&self) {
        if self.out.is_term() {
            drop(self.out.clear_screen());
        }
    }
}
