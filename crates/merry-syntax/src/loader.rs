//! The codebox loader.
//!
//! Loading walks a program unit line by line. Outside a codebox, a line of
//! `#` opens a box and `{name}` imports another unit; anything else is a
//! comment (or an error in strict mode). Inside a box every line must be as
//! wide as the opening border:
//!
//! ```text
//! ##########      opening border, sets the width
//! # double #      line 2: name, trimmed of spaces
//! #v=======#      line 3: entry column marked by `v`
//! #:       #      body rows
//! #+       #
//! #@       #
//! ##########      any later all-`#` line closes the box
//! ```
//!
//! Imports are merged in place: codeboxes loaded later replace earlier ones
//! with the same command key.
//!
//! # Examples
//!
//! ```
//! use merry_syntax::loader::{Loader, LoaderConfig};
//! use merry_syntax::source::MemorySource;
//!
//! let source = MemorySource::new().with_unit("main", "###\n# #\n#v#\n#@#\n###\n");
//! let registry = Loader::new(&source, LoaderConfig::default()).load("main").unwrap();
//!
//! assert_eq!(registry.main().unwrap().height(), 1);
//! ```

use crate::codebox::Codebox;
use crate::error::{FormatError, FormatResult};
use crate::location::Location;
use crate::registry::Registry;
use crate::source::SourceProvider;
use merry_log::{debug, trace, warn};

/// Loader settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Reject non-blank text outside codeboxes and codeboxes that reuse a
    /// command key. Off by default: such text is a comment and the last
    /// codebox registered under a key wins.
    pub strict: bool,
}

impl LoaderConfig {
    /// Configuration with strict checks enabled.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }
}

/// Loads program units into a [`Registry`].
pub struct Loader<S> {
    source: S,
    config: LoaderConfig,
    /// Units currently being loaded, outermost first
    loading: Vec<String>,
}

impl<S: SourceProvider> Loader<S> {
    /// Creates a loader reading units from `source`.
    #[must_use]
    pub fn new(source: S, config: LoaderConfig) -> Self {
        Self {
            source,
            config,
            loading: Vec::new(),
        }
    }

    /// Loads `unit` and, transitively, everything it imports.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormatError`] encountered in any unit.
    pub fn load(&mut self, unit: &str) -> FormatResult<Registry> {
        debug!("loading unit '{}'", unit);
        let registry = self.load_unit(unit)?;
        debug!("unit '{}' loaded: {} codeboxes", unit, registry.len());
        Ok(registry)
    }

    fn load_unit(&mut self, unit: &str) -> FormatResult<Registry> {
        if let Some(start) = self.loading.iter().position(|u| u == unit) {
            let mut chain = self.loading[start..].to_vec();
            chain.push(unit.to_string());
            return Err(FormatError::ImportCycle { chain });
        }

        let text = self.source.read_unit(unit)?;
        self.loading.push(unit.to_string());
        let result = self.parse_unit(unit, &text);
        self.loading.pop();
        result
    }

    fn parse_unit(&mut self, unit: &str, text: &str) -> FormatResult<Registry> {
        let mut registry = Registry::new();
        let mut open: Option<OpenCodebox> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches(['\r', '\n']);
            let line_no = index + 1;

            if let Some(current) = open.take() {
                match current.feed(line, unit, line_no)? {
                    Feed::Open(current) => open = Some(current),
                    Feed::Closed(codebox) => self.register(&mut registry, codebox)?,
                }
            } else if is_border(line) {
                open = Some(OpenCodebox::new(line, Location::new(unit, line_no)));
            } else if let Some(import) = import_target(line) {
                debug!("{}:{}: importing '{}'", unit, line_no, import);
                for codebox in self.load_unit(import)? {
                    self.register(&mut registry, codebox)?;
                }
            } else if self.config.strict && !line.trim().is_empty() {
                return Err(FormatError::StrayText {
                    location: Location::new(unit, line_no),
                });
            } else {
                trace!("{}:{}: ignoring text outside codebox", unit, line_no);
            }
        }

        match open {
            Some(current) => Err(FormatError::Unterminated {
                location: current.opened_at,
            }),
            None => Ok(registry),
        }
    }

    fn register(&self, registry: &mut Registry, codebox: Codebox) -> FormatResult<()> {
        let key = codebox.key();
        let origin = codebox.origin().clone();
        debug!("registering codebox '{}' as {} ({})", codebox.name(), key, origin);

        let Some(previous) = registry.insert(codebox) else {
            return Ok(());
        };
        // The same definition arriving twice through separate imports is not
        // a collision.
        if previous.origin() == &origin {
            return Ok(());
        }
        if self.config.strict {
            return Err(FormatError::DuplicateCommand {
                key,
                location: origin,
            });
        }
        warn!(
            "command {} redefined: {} replaces '{}' from {}",
            key,
            origin,
            previous.name(),
            previous.origin()
        );
        Ok(())
    }
}

/// Loads `unit` with the default configuration.
///
/// # Errors
///
/// Returns the first [`FormatError`] encountered.
pub fn load<S: SourceProvider>(source: S, unit: &str) -> FormatResult<Registry> {
    Loader::new(source, LoaderConfig::default()).load(unit)
}

/// Parse state of the codebox currently being read.
#[derive(Debug)]
struct OpenCodebox {
    /// Width of the opening border, in characters
    border_width: usize,
    /// Lines of this box seen so far, the opening border included
    lines_seen: usize,
    name: String,
    entry_col: usize,
    body: Vec<Vec<char>>,
    opened_at: Location,
}

enum Feed {
    Open(OpenCodebox),
    Closed(Codebox),
}

impl OpenCodebox {
    fn new(border: &str, opened_at: Location) -> Self {
        Self {
            border_width: border.chars().count(),
            lines_seen: 1,
            name: String::new(),
            entry_col: 0,
            body: Vec::new(),
            opened_at,
        }
    }

    fn feed(mut self, line: &str, unit: &str, line_no: usize) -> FormatResult<Feed> {
        let at = || Location::new(unit, line_no);

        let found = line.chars().count();
        if found != self.border_width {
            return Err(FormatError::WidthMismatch {
                location: at(),
                expected: self.border_width,
                found,
            });
        }
        self.lines_seen += 1;

        match self.lines_seen {
            2 => {
                self.name = parse_name(line).ok_or_else(|| FormatError::BadName { location: at() })?;
            }
            3 => {
                self.entry_col =
                    parse_entry(line).ok_or_else(|| FormatError::BadEntry { location: at() })?;
            }
            _ if is_border(line) => {
                let codebox = Codebox::new(
                    self.name,
                    self.border_width - 2,
                    self.entry_col,
                    self.body,
                    self.opened_at,
                );
                return Ok(Feed::Closed(codebox));
            }
            _ => {
                let row = interior(line).ok_or_else(|| FormatError::BadRow { location: at() })?;
                self.body.push(row.chars().collect());
            }
        }
        Ok(Feed::Open(self))
    }
}

/// A border is one or more `#` and nothing else.
fn is_border(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '#')
}

/// Text between a leading and a trailing `#`.
fn interior(line: &str) -> Option<&str> {
    line.strip_prefix('#')?.strip_suffix('#')
}

/// `{unit}` on a line of its own.
fn import_target(line: &str) -> Option<&str> {
    line.strip_prefix('{')?.strip_suffix('}')
}

/// `#  name  #`: the name with surrounding spaces removed.
fn parse_name(line: &str) -> Option<String> {
    interior(line).map(|name| name.trim_matches(' ').to_string())
}

/// `#==v==#`: the interior column of the single `v`.
fn parse_entry(line: &str) -> Option<usize> {
    let marker = interior(line)?;
    let mut entry = None;
    for (col, c) in marker.chars().enumerate() {
        match c {
            '=' => {}
            'v' if entry.is_none() => entry = Some(col),
            _ => return None,
        }
    }
    entry
}
