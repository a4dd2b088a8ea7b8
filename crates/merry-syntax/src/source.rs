//! Where program units come from.
//!
//! The loader never touches the file system itself. It asks a
//! [`SourceProvider`] for the text of a unit by name: [`FsSource`] maps names
//! to `<root>/<name>.merry`, and [`MemorySource`] serves text held in memory.

use crate::error::{FormatError, FormatResult};
use fxhash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file extension of Merriment program units.
pub const DEFAULT_EXTENSION: &str = "merry";

/// Supplies the source text of named program units.
pub trait SourceProvider {
    /// Returns the full text of `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Unreadable`] if the unit cannot be read.
    fn read_unit(&self, unit: &str) -> FormatResult<String>;
}

impl<S: SourceProvider + ?Sized> SourceProvider for &S {
    fn read_unit(&self, unit: &str) -> FormatResult<String> {
        (**self).read_unit(unit)
    }
}

/// Reads units from `<root>/<unit>.<extension>`.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    extension: String,
}

impl FsSource {
    /// Creates a provider resolving unit names against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Overrides the file extension (without the leading dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Root directory unit names are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name for `unit`, relative to the root.
    #[must_use]
    pub fn file_name(&self, unit: &str) -> String {
        format!("{unit}.{}", self.extension)
    }
}

impl SourceProvider for FsSource {
    fn read_unit(&self, unit: &str) -> FormatResult<String> {
        let file = self.file_name(unit);
        fs::read_to_string(self.root.join(&file)).map_err(|err| FormatError::Unreadable {
            file,
            reason: err.to_string(),
        })
    }
}

/// Serves units from memory. Used by tests and embedders.
///
/// ```
/// use merry_syntax::source::{MemorySource, SourceProvider};
///
/// let source = MemorySource::new().with_unit("main", "###\n# #\n#v#\n#@#\n###\n");
/// assert!(source.read_unit("main").is_ok());
/// assert!(source.read_unit("other").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    units: FxHashMap<String, String>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a unit, builder style.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(unit, text);
        self
    }

    /// Adds (or replaces) a unit.
    pub fn insert(&mut self, unit: impl Into<String>, text: impl Into<String>) {
        self.units.insert(unit.into(), text.into());
    }
}

impl SourceProvider for MemorySource {
    fn read_unit(&self, unit: &str) -> FormatResult<String> {
        self.units
            .get(unit)
            .cloned()
            .ok_or_else(|| FormatError::Unreadable {
                file: format!("{unit}.{DEFAULT_EXTENSION}"),
                reason: "no such unit".to_string(),
            })
    }
}
