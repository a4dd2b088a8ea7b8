//! Source excerpts for load errors.
//!
//! The one-line `Error: ...` message is what users always see. The
//! [`Emitter`] renders the longer form shown with `--explain`:
//!
//! ```text
//! error: Incorrect width: file prog, line 4
//!  --> prog:4
//!   |
//! 4 | #:+#
//!   | ^^^^
//!   = help: expected 5 characters, found 4
//! ```

use crate::error::FormatError;
use crate::location::Located;
use std::fmt::Write as _;
use std::io::{self, Write};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// Renders load errors with the offending source line.
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    use_colors: bool,
}

impl Emitter {
    /// Creates an emitter, optionally coloring its output with ANSI codes.
    #[must_use]
    pub const fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Renders `error` against `source`, the text of the unit it occurred in.
    #[must_use]
    pub fn render(&self, error: &FormatError, source: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}: {error}", self.paint(RED, "error"));

        let Some(location) = error.location() else {
            return out;
        };
        let gutter = location.line.to_string().len();
        let pad = " ".repeat(gutter);
        let bar = self.paint(BLUE, "|");

        let _ = writeln!(
            out,
            "{pad}{} {}:{}",
            self.paint(BLUE, "-->"),
            location.unit,
            location.line
        );

        if let Some(line) = source.lines().nth(location.line.saturating_sub(1)) {
            let line = line.trim_end_matches(['\r', '\n']);
            let width = line.chars().count().max(1);
            let _ = writeln!(out, "{pad} {bar}");
            let _ = writeln!(
                out,
                "{} {bar} {line}",
                self.paint(BLUE, &location.line.to_string())
            );
            let _ = writeln!(out, "{pad} {bar} {}", self.paint(RED, &"^".repeat(width)));
        }

        if let Some(help) = help_for(error) {
            let _ = writeln!(out, "{pad} = {}: {help}", self.paint(GREEN, "help"));
        }
        out
    }

    /// Writes the rendered diagnostic to `writer`.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn emit<W: Write>(&self, writer: &mut W, error: &FormatError, source: &str) -> io::Result<()> {
        writer.write_all(self.render(error, source).as_bytes())
    }
}

fn help_for(error: &FormatError) -> Option<String> {
    match error {
        FormatError::WidthMismatch {
            expected, found, ..
        } => Some(format!("expected {expected} characters, found {found}")),
        FormatError::BadName { .. } => {
            Some("the second line of a codebox must look like `# name #`".to_string())
        }
        FormatError::BadEntry { .. } => {
            Some("the third line of a codebox must be `=` with a single `v`".to_string())
        }
        FormatError::BadRow { .. } => Some("codebox rows start and end with `#`".to_string()),
        FormatError::Unterminated { .. } => {
            Some("close the codebox with a line of `#`".to_string())
        }
        FormatError::StrayText { .. } => {
            Some("only blank lines and `{imports}` may appear outside codeboxes".to_string())
        }
        FormatError::DuplicateCommand { .. } => {
            Some("codeboxes are invoked by the first character of their name".to_string())
        }
        FormatError::Unreadable { .. } | FormatError::ImportCycle { .. } => None,
    }
}
