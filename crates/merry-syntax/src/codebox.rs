//! Codeboxes and the keys they are invoked by.
//!
//! A codebox is one bordered grid of commands. It is built once by the loader
//! and never mutated afterwards; the interpreter only reads cells from it.
//!
//! # Examples
//!
//! ```
//! use merry_syntax::codebox::{Codebox, CommandKey};
//! use merry_syntax::location::Location;
//!
//! let rows = vec![":+".chars().collect(), "@ ".chars().collect()];
//! let codebox = Codebox::new("double", 2, 0, rows, Location::new("arith", 1));
//!
//! assert_eq!(codebox.key(), CommandKey::command('d'));
//! assert_eq!(codebox.cell(1, 0), Some('+'));
//! assert_eq!(codebox.cell(2, 0), None);
//! ```

use crate::location::Location;
use std::fmt;

/// The registry key a codebox is stored under.
///
/// Named codeboxes are invoked by the first character of their name. A
/// codebox with an empty name is the program's main codebox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandKey(Option<char>);

impl CommandKey {
    /// Key of the main (unnamed) codebox.
    pub const MAIN: Self = Self(None);

    /// Key invoked by the command character `c`.
    #[must_use]
    pub const fn command(c: char) -> Self {
        Self(Some(c))
    }

    /// Derives the key from a declared codebox name.
    ///
    /// ```
    /// use merry_syntax::codebox::CommandKey;
    ///
    /// assert_eq!(CommandKey::from_name("Down"), CommandKey::command('D'));
    /// assert_eq!(CommandKey::from_name(""), CommandKey::MAIN);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(name.chars().next())
    }

    /// Returns `true` for the main codebox key.
    #[must_use]
    pub const fn is_main(self) -> bool {
        self.0.is_none()
    }

    /// Returns the command character, or `None` for the main key.
    #[must_use]
    pub const fn as_char(self) -> Option<char> {
        self.0
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "{c}"),
            None => write!(f, "main"),
        }
    }
}

/// A named, immutable command grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebox {
    name: String,
    width: usize,
    entry_col: usize,
    code: Vec<Vec<char>>,
    origin: Location,
}

impl Codebox {
    /// Creates a codebox from its interior rows.
    ///
    /// Every row is expected to hold exactly `width` characters and
    /// `entry_col` to lie inside the grid; the loader guarantees both.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        width: usize,
        entry_col: usize,
        code: Vec<Vec<char>>,
        origin: Location,
    ) -> Self {
        debug_assert!(code.iter().all(|row| row.len() == width));
        debug_assert!(entry_col < width);
        Self {
            name: name.into(),
            width,
            entry_col,
            code,
            origin,
        }
    }

    /// Declared name, trimmed of surrounding spaces.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interior width in characters.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of interior rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.code.len()
    }

    /// Interior column the instruction pointer starts in, on row 0.
    #[must_use]
    pub const fn entry_col(&self) -> usize {
        self.entry_col
    }

    /// Registry key derived from the name.
    #[must_use]
    pub fn key(&self) -> CommandKey {
        CommandKey::from_name(&self.name)
    }

    /// Unit and line of the opening border.
    #[must_use]
    pub const fn origin(&self) -> &Location {
        &self.origin
    }

    /// Returns the command at `(x, y)`, or `None` outside the grid.
    ///
    /// Coordinates are signed because the instruction pointer may walk off
    /// either edge.
    #[must_use]
    pub fn cell(&self, x: i64, y: i64) -> Option<char> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.code.get(y)?.get(x).copied()
    }

    /// Returns row `y` as a slice of characters.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[char]> {
        self.code.get(y).map(Vec::as_slice)
    }

    /// Iterates over the rows as strings, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.code.iter().map(|row| row.iter().collect())
    }
}
