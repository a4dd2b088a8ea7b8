// Shared fixtures for the interpreter integration tests.

#![allow(dead_code)]

use merry_interpreter::{Interpreter, RuntimeResult};
use merry_syntax::{FsSource, MemorySource, Registry, load};
use std::path::PathBuf;

/// Draws a codebox around `rows`, with the entry marker over `entry_col`.
pub fn codebox(name: &str, entry_col: usize, rows: &[&str]) -> String {
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let width = width.max(name.chars().count()).max(entry_col + 1);
    let border = "#".repeat(width + 2);

    let mut text = format!("{border}\n#{name:^width$}#\n");
    let entry: String = (0..width).map(|c| if c == entry_col { 'v' } else { '=' }).collect();
    text.push_str(&format!("#{entry}#\n"));
    for row in rows {
        text.push_str(&format!("#{row:<width$}#\n"));
    }
    text.push_str(&border);
    text.push('\n');
    text
}

/// A one-column codebox running `program` top to bottom.
pub fn column(name: &str, program: &str) -> String {
    let rows: Vec<String> = program.chars().map(String::from).collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    codebox(name, 0, &rows)
}

/// Loads a single unit made of the given codebox texts.
pub fn registry(codeboxes: &[String]) -> Registry {
    let source = MemorySource::new().with_unit("test", codeboxes.concat());
    load(&source, "test").unwrap()
}

/// Everything observable after a run.
pub struct Outcome {
    pub result: RuntimeResult<()>,
    pub data: Vec<i64>,
    pub velocity: Vec<i64>,
    pub output: String,
}

/// Runs the main codebox of `registry` with `input` on stdin.
pub fn run(registry: &Registry, input: &str) -> Outcome {
    let mut interpreter = Interpreter::new(registry, input.as_bytes(), Vec::new());
    let result = interpreter.run();
    let (data, velocity, output) = interpreter.into_parts();
    Outcome {
        result,
        data,
        velocity,
        output: String::from_utf8(output).unwrap(),
    }
}

/// The `demos/` directory at the workspace root.
pub fn demos() -> FsSource {
    let root: PathBuf = [env!("CARGO_MANIFEST_DIR"), "..", "..", "demos"].iter().collect();
    FsSource::new(root)
}
