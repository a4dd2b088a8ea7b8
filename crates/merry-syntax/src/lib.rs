//! Merriment Syntax: the codebox file format
//!
//! A Merriment program is a set of bordered character grids ("codeboxes")
//! spread over one or more `.merry` files. This crate turns those files into
//! a [`Registry`] mapping command keys to [`Codebox`]es:
//!
//! - [`source`] - where program units come from (file system or memory)
//! - [`loader`] - line-by-line codebox parsing and import resolution
//! - [`codebox`] - the immutable grid type and its [`CommandKey`]
//! - [`registry`] - key to codebox mapping
//! - [`error`] - load-time errors
//! - [`diagnostic`] - source excerpts for load errors
//!
//! # Examples
//!
//! ```
//! use merry_syntax::{load, CommandKey, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with_unit("main", "{lib}\n###\n# #\n#v#\n#d#\n#@#\n###\n")
//!     .with_unit("lib", "#####\n# d #\n#v==#\n#:+@#\n#####\n");
//!
//! let registry = load(&source, "main").unwrap();
//! assert!(registry.main().is_some());
//! assert!(registry.contains(CommandKey::command('d')));
//! ```

#![warn(missing_docs)]

pub mod codebox;
pub mod diagnostic;
pub mod error;
pub mod loader;
pub mod location;
pub mod registry;
pub mod source;

pub use codebox::{Codebox, CommandKey};
pub use error::{FormatError, FormatResult};
pub use loader::{Loader, LoaderConfig, load};
pub use location::{Located, Location};
pub use registry::Registry;
pub use source::{FsSource, MemorySource, SourceProvider};
