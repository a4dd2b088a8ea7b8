//! Merriment Interpreter: runs loaded codebox programs
//!
//! - [`command`] - the instruction set
//! - [`frame`] - one activation of a codebox
//! - [`interpreter`] - the frame-stack engine
//! - [`input`] - character-at-a-time UTF-8 input
//! - [`error`] - runtime errors and the combined [`Error`]
//!
//! [`run_program`] loads a program and runs its main codebox in one call:
//!
//! ```
//! use merry_interpreter::run_program;
//! use merry_syntax::{LoaderConfig, MemorySource};
//!
//! let source = MemorySource::new().with_unit("hi", "###\n# #\n#v#\n#\"#\n#H#\n#\"#\n#o#\n#@#\n###\n");
//!
//! let mut output = Vec::new();
//! run_program(&source, "hi", LoaderConfig::default(), std::io::empty(), &mut output).unwrap();
//! assert_eq!(output, b"H");
//! ```

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod frame;
pub mod input;
pub mod interpreter;

pub use command::Command;
pub use error::{Error, Result, RuntimeError, RuntimeResult, Site};
pub use frame::Frame;
pub use interpreter::{Interpreter, Status, execute};

use merry_log::debug;
use merry_syntax::{Loader, LoaderConfig, SourceProvider};
use std::io::{Read, Write};

/// Loads `unit` from `source` and runs its main codebox.
///
/// # Errors
///
/// Returns [`Error::Format`] if the program does not load and
/// [`Error::Runtime`] if it fails while running.
pub fn run_program<S, R, W>(
    source: S,
    unit: &str,
    config: LoaderConfig,
    input: R,
    output: W,
) -> Result<()>
where
    S: SourceProvider,
    R: Read,
    W: Write,
{
    let registry = Loader::new(source, config).load(unit)?;
    debug!("loaded {} codeboxes from {}", registry.len(), unit);

    Interpreter::new(&registry, input, output).run()?;
    Ok(())
}
