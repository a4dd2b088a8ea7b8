// Shared fixtures for the loader integration tests.

#![allow(dead_code)]

use merry_syntax::{FormatResult, Loader, LoaderConfig, MemorySource, Registry};

/// Draws a codebox around `rows`, with the entry marker over `entry_col`.
///
/// All rows must have the same number of characters.
pub fn codebox(name: &str, entry_col: usize, rows: &[&str]) -> String {
    let width = rows.first().map_or(name.chars().count(), |r| r.chars().count());
    let width = width.max(name.chars().count()).max(entry_col + 1);
    let border = "#".repeat(width + 2);

    let mut text = String::new();
    text.push_str(&border);
    text.push('\n');
    text.push_str(&format!("#{name:^width$}#\n"));
    let entry: String = (0..width).map(|c| if c == entry_col { 'v' } else { '=' }).collect();
    text.push_str(&format!("#{entry}#\n"));
    for row in rows {
        text.push_str(&format!("#{row:<width$}#\n"));
    }
    text.push_str(&border);
    text.push('\n');
    text
}

/// Loads `unit` from `source` with the default configuration.
pub fn load(source: &MemorySource, unit: &str) -> FormatResult<Registry> {
    Loader::new(source, LoaderConfig::default()).load(unit)
}

/// Loads `unit` from `source` with strict checks.
pub fn load_strict(source: &MemorySource, unit: &str) -> FormatResult<Registry> {
    Loader::new(source, LoaderConfig::strict()).load(unit)
}
