//! The Merriment instruction set.
//!
//! Every grid cell holds one character. The reserved characters decode to a
//! fixed [`Command`]; any other character invokes the codebox registered
//! under it.
//!
//! | Char        | Command                                      |
//! |-------------|----------------------------------------------|
//! | space       | no-op                                        |
//! | `0`-`9`     | push the digit                               |
//! | `↊` `↋`     | push 10, 11                                  |
//! | `+ - * ,`   | pop `a`, pop `b`; push `a+b`, `b-a`, `a*b`, `b // a` |
//! | `` ` ``     | pop `a`; push 1 if `a > 0` else 0            |
//! | `:` `.` `~` | duplicate, discard, swap                     |
//! | `{` `}`     | velocity stack to data stack, and back       |
//! | `@`         | return from the current codebox              |
//! | `"`         | toggle string mode                           |
//! | `i` `o`     | read a character, write a character          |
//! | `!`         | debug dump                                   |

/// Decoded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Do nothing
    Nop,
    /// Push a literal value
    Push(i64),
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `,` (floor division)
    Divide,
    /// `` ` ``
    Positive,
    /// `:`
    Duplicate,
    /// `.`
    Discard,
    /// `~`
    Swap,
    /// `{`
    FromVelocity,
    /// `}`
    ToVelocity,
    /// `@`
    Return,
    /// `"`
    StringMode,
    /// `i`
    Input,
    /// `o`
    Output,
    /// `!`
    Debug,
    /// Any other character: invoke the codebox registered under it
    Call(char),
}

impl Command {
    /// Decodes the command stored in a grid cell.
    ///
    /// ```
    /// use merry_interpreter::Command;
    ///
    /// assert_eq!(Command::decode('7'), Command::Push(7));
    /// assert_eq!(Command::decode('↋'), Command::Push(11));
    /// assert_eq!(Command::decode(','), Command::Divide);
    /// assert_eq!(Command::decode('f'), Command::Call('f'));
    /// ```
    #[must_use]
    pub const fn decode(c: char) -> Self {
        match c {
            ' ' => Self::Nop,
            '0'..='9' => Self::Push((c as u8 - b'0') as i64),
            '↊' => Self::Push(10),
            '↋' => Self::Push(11),
            '+' => Self::Add,
            '-' => Self::Subtract,
            '*' => Self::Multiply,
            ',' => Self::Divide,
            '`' => Self::Positive,
            ':' => Self::Duplicate,
            '.' => Self::Discard,
            '~' => Self::Swap,
            '{' => Self::FromVelocity,
            '}' => Self::ToVelocity,
            '@' => Self::Return,
            '"' => Self::StringMode,
            'i' => Self::Input,
            'o' => Self::Output,
            '!' => Self::Debug,
            other => Self::Call(other),
        }
    }

    /// Returns `true` if `c` is part of the instruction set rather than a
    /// codebox invocation.
    #[must_use]
    pub const fn is_reserved(c: char) -> bool {
        !matches!(Self::decode(c), Self::Call(_))
    }
}
