//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
///
/// Human-facing messages go to stderr; machine-readable data (JSON) goes to
/// stdout so it can be piped.
pub(crate) struct Output {
    term: Term,
    data_term: Term,
    green: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            data_term: Term::stdout(),
            green: Style::new().green(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted heading (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print machine-readable data to stdout.
    pub(crate) fn data(&self, msg: &str) {
        let _ = self.data_term.write_line(msg);
    }
}
