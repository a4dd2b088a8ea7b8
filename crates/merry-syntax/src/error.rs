//! Error types for program loading.
//!
//! Every variant is fatal: the loader stops at the first violation. The
//! `Display` output is the complete user-facing message, so callers can
//! print it after an `Error: ` prefix without further decoration.

use crate::codebox::CommandKey;
use crate::location::{Located, Location};
use std::fmt;

/// Errors that can occur while loading a Merriment program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A program unit could not be read.
    Unreadable {
        /// File the unit was looked up in (e.g. `hello.merry`)
        file: String,

        /// Underlying I/O error description
        reason: String,
    },

    /// A line inside a codebox does not match the border width.
    ///
    /// ```text
    /// #####
    /// # f #
    /// #v==#
    /// #:+#
    /// ^^^^
    /// error: Incorrect width: file lib, line 4
    /// ```
    WidthMismatch {
        /// Offending line
        location: Location,

        /// Width of the opening border, in characters
        expected: usize,

        /// Width of the offending line, in characters
        found: usize,
    },

    /// The second line of a codebox is not `# name #`.
    BadName {
        /// Offending line
        location: Location,
    },

    /// The third line of a codebox is not `#==v==#`.
    BadEntry {
        /// Offending line
        location: Location,
    },

    /// A body line is not delimited by `#` on both ends.
    BadRow {
        /// Offending line
        location: Location,
    },

    /// The unit ended while a codebox was still open.
    Unterminated {
        /// Line of the opening border
        location: Location,
    },

    /// A unit imports itself, directly or transitively.
    ImportCycle {
        /// Units along the cycle; the first and last entries are equal
        chain: Vec<String>,
    },

    /// Text outside any codebox that is neither blank nor an import
    /// (strict mode only).
    StrayText {
        /// Offending line
        location: Location,
    },

    /// Two different codeboxes share a command key (strict mode only).
    DuplicateCommand {
        /// The contested key
        key: CommandKey,

        /// Opening border of the second definition
        location: Location,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { file, .. } => write!(f, "Can't read file {file}"),
            Self::WidthMismatch { location, .. } => write!(f, "Incorrect width: {location}"),
            Self::BadName { location } => write!(f, "Bad codebox name: {location}"),
            Self::BadEntry { location } => write!(f, "Bad entry point: {location}"),
            Self::BadRow { location } => write!(f, "Bad codebox row: {location}"),
            Self::Unterminated { location } => write!(f, "Unterminated codebox: {location}"),
            Self::ImportCycle { chain } => write!(f, "Import cycle: {}", chain.join(" -> ")),
            Self::StrayText { location } => {
                write!(f, "Unexpected text outside codebox: {location}")
            }
            Self::DuplicateCommand { key, location } if key.is_main() => {
                write!(f, "Duplicate main codebox: {location}")
            }
            Self::DuplicateCommand { key, location } => {
                write!(f, "Duplicate command '{key}': {location}")
            }
        }
    }
}

impl std::error::Error for FormatError {}

impl Located for FormatError {
    fn location(&self) -> Option<&Location> {
        match self {
            Self::Unreadable { .. } | Self::ImportCycle { .. } => None,
            Self::WidthMismatch { location, .. }
            | Self::BadName { location }
            | Self::BadEntry { location }
            | Self::BadRow { location }
            | Self::Unterminated { location }
            | Self::StrayText { location }
            | Self::DuplicateCommand { location, .. } => Some(location),
        }
    }
}

/// Result type for loader operations.
pub type FormatResult<T> = Result<T, FormatError>;
