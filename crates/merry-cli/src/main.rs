//! Merriment CLI
//!
//! `merry <program>` loads `<program>.merry` (plus its imports) relative to
//! the current directory and runs its main codebox against stdin and stdout.
//! Any load or runtime error is printed as `Error: <message>` and the process
//! exits with status 1.

use std::io::{self, BufWriter, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use merry_interpreter::{Error, Interpreter};
use merry_log::{debug, warn};
use merry_syntax::diagnostic::Emitter;
use merry_syntax::source::DEFAULT_EXTENSION;
use merry_syntax::{FormatError, FsSource, Located, Loader, LoaderConfig, SourceProvider};

#[derive(Parser, Debug)]
#[command(name = "merry", version)]
#[command(about = "Run a Merriment program")]
struct Args {
    /// Program to run, without its extension (e.g. `demos/hello`)
    program: String,

    /// Reject text outside codeboxes and duplicate command keys
    #[arg(long)]
    strict: bool,

    /// Show the offending source line for load errors
    #[arg(long)]
    explain: bool,

    /// Log level (error, warn, info, debug, trace); overrides MERRY_LOG
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Disable colored diagnostics and log output
    #[arg(long)]
    no_color: bool,

    /// Source file extension
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = merry_log::init_from_env() {
        warn!("{err}");
    }
    if let Some(level) = &args.log_level {
        if let Err(err) = merry_log::set_level_from_str(level) {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    }
    let colors = !args.no_color && std::env::var_os("NO_COLOR").is_none() && io::stderr().is_terminal();
    merry_log::set_colors(colors);

    let source = FsSource::new(".").with_extension(&args.extension);
    let config = LoaderConfig {
        strict: args.strict,
    };

    match run(&source, &args.program, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            if args.explain {
                if let Error::Format(err) = &err {
                    explain(&source, err, colors);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(source: &FsSource, program: &str, config: LoaderConfig) -> merry_interpreter::Result<()> {
    let registry = Loader::new(source, config).load(program)?;
    debug!("loaded {} codeboxes: {:?}", registry.len(), registry.keys());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut interpreter = Interpreter::new(&registry, stdin.lock(), BufWriter::new(stdout.lock()));
    interpreter.run()?;
    Ok(())
}

/// Prints the source excerpt for a load error, if its unit can be re-read.
fn explain(source: &FsSource, err: &FormatError, colors: bool) {
    let Some(location) = err.location() else {
        return;
    };
    match source.read_unit(&location.unit) {
        Ok(text) => {
            let mut stderr = io::stderr().lock();
            if let Err(err) = Emitter::new(colors).emit(&mut stderr, err, &text) {
                debug!("could not write diagnostic: {err}");
            }
        }
        Err(err) => debug!("no excerpt for {}: {err}", location.unit),
    }
}
