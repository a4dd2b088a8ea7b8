//! Error types for program execution.
//!
//! Runtime errors are fatal: the interpreter stops at the first one. As with
//! [`FormatError`], `Display` is the complete user-facing message.

use merry_syntax::FormatError;
use std::fmt;
use std::io;

/// Where in the program a runtime error happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Site {
    /// The main (unnamed) codebox
    Main,

    /// A codebox invoked by command, with its declared name
    Codebox(String),
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main codebox"),
            Self::Codebox(name) => write!(f, "codebox {name}"),
        }
    }
}

/// Errors that can occur while running a Merriment program.
#[derive(Debug)]
pub enum RuntimeError {
    /// No codebox has an empty name.
    NoMainCodebox,

    /// A command character names no codebox.
    CommandNotFound {
        /// The command that was invoked
        command: char,
    },

    /// The instruction pointer left the grid.
    OutOfBounds {
        /// Codebox the pointer left
        site: Site,
    },

    /// `,` with a zero divisor.
    DivisionByZero {
        /// Where the division happened
        site: Site,
    },

    /// A command popped an empty data stack.
    StackUnderflow {
        /// The command that popped
        command: char,
        /// Where it ran
        site: Site,
    },

    /// A command, or a returning call, popped an empty velocity stack.
    VelocityUnderflow {
        /// The command that popped
        command: char,
        /// Where it ran
        site: Site,
    },

    /// Arithmetic result does not fit in 64 bits.
    Overflow {
        /// The arithmetic command
        command: char,
        /// Where it ran
        site: Site,
    },

    /// `o` with a value that is not a Unicode scalar value.
    InvalidCharacter {
        /// The popped value
        value: i64,
        /// Where it ran
        site: Site,
    },

    /// Reading input or writing output failed.
    Io(io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMainCodebox => write!(f, "No main codebox found"),
            Self::CommandNotFound { command } => write!(f, "Command not found: {command}"),
            Self::OutOfBounds { site } => write!(f, "Out of bounds in {site}"),
            Self::DivisionByZero { site } => write!(f, "Division by zero in {site}"),
            Self::StackUnderflow { command, site } => {
                write!(f, "Stack underflow at '{command}' in {site}")
            }
            Self::VelocityUnderflow { command, site } => {
                write!(f, "Velocity stack underflow at '{command}' in {site}")
            }
            Self::Overflow { command, site } => {
                write!(f, "Integer overflow at '{command}' in {site}")
            }
            Self::InvalidCharacter { value, site } => {
                write!(f, "Invalid character code {value} in {site}")
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Any error a Merriment run can end with.
///
/// Unifies load and runtime errors so `?` composes both phases.
#[derive(Debug)]
pub enum Error {
    /// The program could not be loaded
    Format(FormatError),

    /// The program failed while running
    Runtime(RuntimeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(err) => write!(f, "{err}"),
            Self::Runtime(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Self::Format(err)
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Self::Runtime(err)
    }
}

/// Result type for execution.
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// Result type for a complete load-and-run.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use merry_syntax::Location;

    #[test]
    fn test_messages() {
        assert_eq!(RuntimeError::NoMainCodebox.to_string(), "No main codebox found");
        assert_eq!(
            RuntimeError::CommandNotFound { command: 'q' }.to_string(),
            "Command not found: q"
        );
        assert_eq!(
            RuntimeError::OutOfBounds { site: Site::Main }.to_string(),
            "Out of bounds in main codebox"
        );
        assert_eq!(
            RuntimeError::OutOfBounds {
                site: Site::Codebox("fib".to_string())
            }
            .to_string(),
            "Out of bounds in codebox fib"
        );
    }

    #[test]
    fn test_site_messages() {
        assert_eq!(
            RuntimeError::DivisionByZero { site: Site::Main }.to_string(),
            "Division by zero in main codebox"
        );
        assert_eq!(
            RuntimeError::StackUnderflow {
                command: '+',
                site: Site::Codebox("add".to_string())
            }
            .to_string(),
            "Stack underflow at '+' in codebox add"
        );
        assert_eq!(
            RuntimeError::InvalidCharacter {
                value: -5,
                site: Site::Main
            }
            .to_string(),
            "Invalid character code -5 in main codebox"
        );
    }

    #[test]
    fn test_error_is_transparent() {
        let err: Error = FormatError::BadRow {
            location: Location::new("p", 2),
        }
        .into();
        assert_eq!(err.to_string(), "Bad codebox row: file p, line 2");

        let err: Error = RuntimeError::NoMainCodebox.into();
        assert_eq!(err.to_string(), "No main codebox found");
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let err = RuntimeError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "I/O error: pipe closed");
        assert!(err.source().is_some());
    }
}
