//! Source locations for load-time diagnostics.
//!
//! Merriment sources are line oriented: every format rule applies to a whole
//! line, so a location is just the program unit and a 1-indexed line number.
//!
//! # Examples
//!
//! ```
//! use merry_syntax::location::Location;
//!
//! let loc = Location::new("hello", 3);
//! assert_eq!(loc.to_string(), "file hello, line 3");
//! ```

use std::fmt;

/// A line inside a named program unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Program unit name, as written on the command line or in an import
    pub unit: String,

    /// Line number (1-indexed)
    pub line: usize,
}

impl Location {
    /// Creates a location for `line` (1-indexed) of `unit`.
    #[must_use]
    pub fn new(unit: impl Into<String>, line: usize) -> Self {
        Self {
            unit: unit.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {}, line {}", self.unit, self.line)
    }
}

/// Trait for values that may point at a source line.
pub trait Located {
    /// Returns the source line this value refers to, if any.
    fn location(&self) -> Option<&Location>;
}

impl Located for Location {
    fn location(&self) -> Option<&Location> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new("lib/turns", 12).to_string(), "file lib/turns, line 12");
    }

    #[test]
    fn test_location_equality() {
        assert_eq!(Location::new("a", 1), Location::new(String::from("a"), 1));
        assert_ne!(Location::new("a", 1), Location::new("a", 2));
        assert_ne!(Location::new("a", 1), Location::new("b", 1));
    }
}
