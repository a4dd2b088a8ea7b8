//! Call frames.
//!
//! A frame is one activation of a codebox: where its instruction pointer is,
//! which way it moves, and whether string mode is on. The data and velocity
//! stacks are not part of a frame; every frame of a run shares them.

use crate::error::Site;
use merry_syntax::{Codebox, CommandKey};

/// One activation of a codebox.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'r> {
    /// Codebox being executed
    pub codebox: &'r Codebox,
    /// Key the codebox was invoked by
    pub key: CommandKey,
    /// Instruction pointer column
    pub x: i64,
    /// Instruction pointer row
    pub y: i64,
    /// Horizontal velocity
    pub vx: i64,
    /// Vertical velocity
    pub vy: i64,
    /// Characters are pushed as code points until the next `"`
    pub string_mode: bool,
}

impl<'r> Frame<'r> {
    /// Starts a frame at the codebox entry, moving down.
    #[must_use]
    pub fn enter(codebox: &'r Codebox, key: CommandKey) -> Self {
        Self {
            codebox,
            key,
            // Grid widths are far below i64::MAX.
            x: codebox.entry_col() as i64,
            y: 0,
            vx: 0,
            vy: 1,
            string_mode: false,
        }
    }

    /// The command under the instruction pointer, or `None` off the grid.
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.codebox.cell(self.x, self.y)
    }

    /// Moves the instruction pointer by the velocity.
    pub fn advance(&mut self) {
        self.x = self.x.saturating_add(self.vx);
        self.y = self.y.saturating_add(self.vy);
    }

    /// Error site for this frame.
    ///
    /// The main frame is reported as such even though its codebox has a
    /// (blank) name.
    #[must_use]
    pub fn site(&self) -> Site {
        if self.key.is_main() {
            Site::Main
        } else {
            Site::Codebox(self.codebox.name().to_string())
        }
    }
}
