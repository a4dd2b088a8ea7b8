//! A minimal, zero-dependency logging crate for the Merriment interpreter.
//!
//! Log records go to standard error so they never interleave with the
//! characters a Merriment program writes to standard output.
//!
//! # Example
//!
//! ```
//! use merry_log::{debug, error, info, warn, Level};
//!
//! // Set the minimum log level
//! merry_log::set_level(Level::Debug);
//!
//! let unit = "hello";
//! info!("Loading program unit {}", unit);
//! debug!("Data stack: {:?}", vec![72, 105]);
//! warn!("Codebox key collision");
//! error!("Out of bounds in main codebox");
//! ```

use std::env;
use std::fmt::Arguments;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Environment variable consulted by [`init_from_env`].
pub const LOG_ENV_VAR: &str = "MERRY_LOG";

/// Log levels representing the severity of log messages.
///
/// Levels are ordered from most severe (Error) to least severe (Trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Fatal load and runtime errors
    Error = 0,
    /// Suspicious but accepted input, such as codebox key collisions
    Warn = 1,
    /// Run summaries
    Info = 2,
    /// Loader and frame activity
    Debug = 3,
    /// Every executed command
    Trace = 4,
}

impl Level {
    /// Returns the ANSI color code for this log level.
    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m", // Red
            Level::Warn => "\x1b[33m",  // Yellow
            Level::Info => "\x1b[32m",  // Green
            Level::Debug => "\x1b[36m", // Cyan
            Level::Trace => "\x1b[35m", // Magenta
        }
    }

    /// Returns the string representation of this log level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    /// Parses a level name, ignoring case.
    ///
    /// ```
    /// use merry_log::Level;
    ///
    /// assert_eq!("error".parse::<Level>(), Ok(Level::Error));
    /// assert_eq!("INFO".parse::<Level>(), Ok(Level::Info));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

/// The global logger instance.
///
/// Level and color settings are atomics, so the logger can be shared freely.
/// Use it through [`get_logger`].
pub struct Logger {
    level: AtomicU8,
    colors: AtomicBool,
}

impl Logger {
    const fn new(level: Level, colors: bool) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            colors: AtomicBool::new(colors),
        }
    }

    /// Sets the minimum log level.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum log level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Enables or disables ANSI colors.
    pub fn set_colors(&self, enabled: bool) {
        self.colors.store(enabled, Ordering::SeqCst);
    }

    /// Returns whether records are colored.
    pub fn colors(&self) -> bool {
        self.colors.load(Ordering::Relaxed)
    }

    /// Checks if a message at the given level would be logged.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it on first use.
///
/// The logger starts at [`Level::Warn`], with colors on unless `NO_COLOR`
/// is set.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn, env::var_os("NO_COLOR").is_none()))
}

/// Sets the minimum log level for the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum log level from a string.
///
/// ```
/// merry_log::set_level_from_str("debug").unwrap();
/// assert_eq!(merry_log::get_logger().level(), merry_log::Level::Debug);
/// ```
pub fn set_level_from_str(s: &str) -> Result<(), String> {
    set_level(s.parse()?);
    Ok(())
}

/// Enables or disables ANSI colors for the global logger.
pub fn set_colors(enabled: bool) {
    get_logger().set_colors(enabled);
}

/// Configures the global logger from `MERRY_LOG`.
///
/// An unset variable leaves the level untouched. An unparsable value is
/// returned as an error and leaves the level untouched.
pub fn init_from_env() -> Result<(), String> {
    match env::var(LOG_ENV_VAR) {
        Ok(value) => set_level_from_str(&value),
        Err(_) => Ok(()),
    }
}

/// Formats one record. Split out of [`__log_with_target`] so tests can see it.
fn format_record(level: Level, target: &str, args: Arguments, colors: bool) -> String {
    const RESET: &str = "\x1b[0m";

    let level_str = level.as_str();
    if colors {
        let color = level.color_code();
        format!("{color}[{level_str}]{RESET} {target}: {args}")
    } else {
        format!("[{level_str}] {target}: {args}")
    }
}

/// Writes one record to standard error.
///
/// Called by the log macros after checking that the level is enabled.
#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    let logger = get_logger();
    if !logger.enabled(level) {
        return;
    }

    eprintln!("{}", format_record(level, target, args, logger.colors()));
}

/// The primary logging macro.
///
/// Logs a message at the specified level, tagged with the calling module.
///
/// ```
/// use merry_log::{log, Level};
///
/// log!(level: Level::Info, "loaded {} codeboxes", 3);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs a message at the Error level.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs a message at the Warn level.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs a message at the Info level.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs a message at the Debug level.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs a message at the Trace level.
///
/// ```
/// use merry_log::trace;
///
/// # merry_log::set_level(merry_log::Level::Trace);
/// trace!("step {}: '{}' at ({}, {})", 1, ':', 0, 0);
/// ```
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}
