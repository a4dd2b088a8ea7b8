//! The execution engine.
//!
//! The interpreter keeps an explicit stack of [`Frame`]s instead of
//! recursing on the native stack: invoking a codebox pushes a frame, `@`
//! pops one. Both value stacks belong to the interpreter and are shared by
//! every frame of the run.
//!
//! Around a call the caller's velocity travels through the velocity stack:
//! `vx` then `vy` are pushed before the callee starts, and popped back (`vy`
//! first) when it returns. Whatever the callee leaves on the velocity stack
//! in their place becomes the caller's new velocity, which is how Merriment
//! programs turn.
//!
//! # Examples
//!
//! ```
//! use merry_interpreter::Interpreter;
//! use merry_syntax::{load, MemorySource};
//!
//! let source = MemorySource::new().with_unit("main", "###\n# #\n#v#\n#9#\n#7#\n#+#\n#:#\n#o#\n#@#\n###\n");
//! let registry = load(&source, "main").unwrap();
//!
//! let mut output = Vec::new();
//! let mut interpreter = Interpreter::new(&registry, std::io::empty(), &mut output);
//! interpreter.run().unwrap();
//!
//! assert_eq!(interpreter.data_stack(), &[16]);
//! drop(interpreter);
//! assert_eq!(output, b"\x10");
//! ```

use crate::command::Command;
use crate::error::{RuntimeError, RuntimeResult};
use crate::frame::Frame;
use crate::input::CharReader;
use merry_log::{debug, info, trace};
use merry_syntax::{Codebox, CommandKey, Registry};
use std::io::{self, Read, Write};

/// Whether a run can continue after a [`step`](Interpreter::step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// At least one frame is still active
    Running,
    /// The outermost frame returned
    Finished,
}

/// Runs programs from a [`Registry`].
///
/// Input is read one UTF-8 character at a time from `R`; output goes to `W`.
/// Output is flushed before every read and when a run ends.
pub struct Interpreter<'r, R, W> {
    registry: &'r Registry,
    data: Vec<i64>,
    velocity: Vec<i64>,
    frames: Vec<Frame<'r>>,
    input: CharReader<R>,
    output: W,
    steps: u64,
}

impl<'r, R: Read, W: Write> Interpreter<'r, R, W> {
    /// Creates an interpreter with empty stacks.
    pub fn new(registry: &'r Registry, input: R, output: W) -> Self {
        Self {
            registry,
            data: Vec::new(),
            velocity: Vec::new(),
            frames: Vec::new(),
            input: CharReader::new(input),
            output,
            steps: 0,
        }
    }

    /// Replaces both stacks, builder style.
    #[must_use]
    pub fn with_stacks(mut self, data: Vec<i64>, velocity: Vec<i64>) -> Self {
        self.data = data;
        self.velocity = velocity;
        self
    }

    /// Runs the main codebox until it returns.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuntimeError`]; [`RuntimeError::NoMainCodebox`]
    /// if the registry has no main codebox.
    pub fn run(&mut self) -> RuntimeResult<()> {
        self.call(CommandKey::MAIN)
    }

    /// Runs the codebox registered under `key` until it returns.
    ///
    /// Any frames left over from an earlier failed run are discarded; the
    /// stacks are kept.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuntimeError`]. Output written before the error
    /// is still flushed.
    pub fn call(&mut self, key: CommandKey) -> RuntimeResult<()> {
        self.frames.clear();
        let result = self.drive(key);
        let flushed = self.output.flush().map_err(RuntimeError::from);
        match &result {
            Ok(()) => info!("{} returned after {} steps", key, self.steps),
            Err(err) => debug!("{} failed after {} steps: {}", key, self.steps, err),
        }
        result.and(flushed)
    }

    fn drive(&mut self, key: CommandKey) -> RuntimeResult<()> {
        let codebox = self.lookup(key)?;
        debug!("entering {} ('{}')", key, codebox.name());
        self.frames.push(Frame::enter(codebox, key));
        while self.step()? == Status::Running {}
        Ok(())
    }

    fn lookup(&self, key: CommandKey) -> RuntimeResult<&'r Codebox> {
        let registry = self.registry;
        registry.get(key).ok_or(match key.as_char() {
            None => RuntimeError::NoMainCodebox,
            Some(command) => RuntimeError::CommandNotFound { command },
        })
    }

    /// Executes the command under the instruction pointer of the innermost
    /// frame.
    ///
    /// # Errors
    ///
    /// Returns the [`RuntimeError`] raised by the command, or
    /// [`RuntimeError::OutOfBounds`] if the pointer is off the grid.
    pub fn step(&mut self) -> RuntimeResult<Status> {
        let Some(mut frame) = self.frames.pop() else {
            return Ok(Status::Finished);
        };
        let Some(c) = frame.current() else {
            return Err(RuntimeError::OutOfBounds { site: frame.site() });
        };
        self.steps += 1;
        trace!("{} ({}, {}) {:?}", frame.key, frame.x, frame.y, c);

        if frame.string_mode {
            if c == '"' {
                frame.string_mode = false;
            } else {
                self.data.push(i64::from(u32::from(c)));
            }
            frame.advance();
            self.frames.push(frame);
            return Ok(Status::Running);
        }

        match Command::decode(c) {
            Command::Return => return self.return_from(&frame),
            Command::Call(command) => {
                self.invoke(frame, command)?;
                return Ok(Status::Running);
            }
            Command::Nop => {}
            Command::Push(value) => self.data.push(value),
            Command::Add => {
                let (a, b) = self.pop_pair(c, &frame)?;
                self.push_checked(a.checked_add(b), c, &frame)?;
            }
            Command::Subtract => {
                let (a, b) = self.pop_pair(c, &frame)?;
                self.push_checked(b.checked_sub(a), c, &frame)?;
            }
            Command::Multiply => {
                let (a, b) = self.pop_pair(c, &frame)?;
                self.push_checked(a.checked_mul(b), c, &frame)?;
            }
            Command::Divide => {
                let (a, b) = self.pop_pair(c, &frame)?;
                if a == 0 {
                    return Err(RuntimeError::DivisionByZero { site: frame.site() });
                }
                self.push_checked(floor_div(b, a), c, &frame)?;
            }
            Command::Positive => {
                let a = self.pop(c, &frame)?;
                self.data.push(i64::from(a > 0));
            }
            Command::Duplicate => {
                let a = self.pop(c, &frame)?;
                self.data.push(a);
                self.data.push(a);
            }
            Command::Discard => {
                self.pop(c, &frame)?;
            }
            Command::Swap => {
                let (a, b) = self.pop_pair(c, &frame)?;
                self.data.push(a);
                self.data.push(b);
            }
            Command::FromVelocity => {
                let value = self.velocity.pop().ok_or_else(|| RuntimeError::VelocityUnderflow {
                    command: c,
                    site: frame.site(),
                })?;
                self.data.push(value);
            }
            Command::ToVelocity => {
                let value = self.pop(c, &frame)?;
                self.velocity.push(value);
            }
            Command::StringMode => frame.string_mode = true,
            Command::Input => {
                self.output.flush()?;
                let value = match self.input.read_char()? {
                    Some(ch) => i64::from(u32::from(ch)),
                    None => -1,
                };
                self.data.push(value);
            }
            Command::Output => {
                let value = self.pop(c, &frame)?;
                let ch = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| RuntimeError::InvalidCharacter {
                        value,
                        site: frame.site(),
                    })?;
                let mut buf = [0u8; 4];
                self.output.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            }
            Command::Debug => self.dump(&frame)?,
        }

        frame.advance();
        self.frames.push(frame);
        Ok(Status::Running)
    }

    /// Saves the caller's velocity and starts the callee.
    ///
    /// The caller is pushed back unadvanced; it moves on when the callee
    /// returns.
    fn invoke(&mut self, caller: Frame<'r>, command: char) -> RuntimeResult<()> {
        self.velocity.push(caller.vx);
        self.velocity.push(caller.vy);

        let key = CommandKey::command(command);
        let callee = self.lookup(key)?;
        debug!(
            "{} calls {} ('{}') at depth {}",
            caller.key,
            key,
            callee.name(),
            self.frames.len() + 1
        );
        self.frames.push(caller);
        self.frames.push(Frame::enter(callee, key));
        Ok(())
    }

    /// Ends `frame` and resumes its caller with the velocity popped from the
    /// velocity stack.
    fn return_from(&mut self, frame: &Frame<'r>) -> RuntimeResult<Status> {
        debug!("{} returns", frame.key);
        let Some(caller) = self.frames.last_mut() else {
            return Ok(Status::Finished);
        };

        let restored = self
            .velocity
            .pop()
            .and_then(|vy| self.velocity.pop().map(|vx| (vx, vy)));
        let Some((vx, vy)) = restored else {
            return Err(RuntimeError::VelocityUnderflow {
                command: caller.current().unwrap_or(char::REPLACEMENT_CHARACTER),
                site: caller.site(),
            });
        };

        caller.vx = vx;
        caller.vy = vy;
        caller.advance();
        Ok(Status::Running)
    }

    fn pop(&mut self, c: char, frame: &Frame<'r>) -> RuntimeResult<i64> {
        self.data.pop().ok_or_else(|| RuntimeError::StackUnderflow {
            command: c,
            site: frame.site(),
        })
    }

    /// Pops `a` (the top) and then `b`.
    fn pop_pair(&mut self, c: char, frame: &Frame<'r>) -> RuntimeResult<(i64, i64)> {
        let a = self.pop(c, frame)?;
        let b = self.pop(c, frame)?;
        Ok((a, b))
    }

    fn push_checked(&mut self, value: Option<i64>, c: char, frame: &Frame<'r>) -> RuntimeResult<()> {
        let value = value.ok_or_else(|| RuntimeError::Overflow {
            command: c,
            site: frame.site(),
        })?;
        self.data.push(value);
        Ok(())
    }

    fn dump(&mut self, frame: &Frame<'r>) -> io::Result<()> {
        writeln!(self.output, "! DEBUG !")?;
        writeln!(self.output, "Codebox: {}", frame.codebox.name())?;
        writeln!(self.output, "Position: ({}, {})", frame.x, frame.y)?;
        writeln!(self.output, "Velocity: ({}, {})", frame.vx, frame.vy)?;
        writeln!(self.output, "Data stack: {:?}", self.data)?;
        writeln!(self.output, "Velocity stack: {:?}", self.velocity)
    }

    /// The data stack, bottom first.
    #[must_use]
    pub fn data_stack(&self) -> &[i64] {
        &self.data
    }

    /// The velocity stack, bottom first.
    #[must_use]
    pub fn velocity_stack(&self) -> &[i64] {
        &self.velocity
    }

    /// Commands executed so far.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of active frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Borrows the output sink.
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }

    /// Consumes the interpreter, returning the data stack, the velocity
    /// stack and the output sink.
    pub fn into_parts(self) -> (Vec<i64>, Vec<i64>, W) {
        (self.data, self.velocity, self.output)
    }
}

/// Runs the codebox under `key` against caller-owned stacks.
///
/// The stacks are moved into an interpreter for the duration of the run and
/// handed back afterwards, whether or not the run succeeded.
///
/// # Errors
///
/// Returns the first [`RuntimeError`].
pub fn execute<R: Read, W: Write>(
    registry: &Registry,
    data: &mut Vec<i64>,
    velocity: &mut Vec<i64>,
    key: CommandKey,
    input: R,
    output: W,
) -> RuntimeResult<()> {
    let mut interpreter = Interpreter::new(registry, input, output)
        .with_stacks(std::mem::take(data), std::mem::take(velocity));
    let result = interpreter.call(key);
    let (final_data, final_velocity, _) = interpreter.into_parts();
    *data = final_data;
    *velocity = final_velocity;
    result
}

/// Integer division rounding toward negative infinity. `None` on overflow
/// or a zero divisor.
fn floor_div(b: i64, a: i64) -> Option<i64> {
    let quotient = b.checked_div(a)?;
    let remainder = b.checked_rem(a)?;
    if remainder != 0 && ((remainder < 0) != (a < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merry_syntax::Location;

    /// Registry holding one vertical main codebox that runs `column`
    /// top to bottom.
    fn column(column: &str) -> Registry {
        let rows = column.chars().map(|c| vec![c]).collect();
        std::iter::once(Codebox::new("", 1, 0, rows, Location::new("t", 1))).collect()
    }

    fn run_column(program: &str, data: Vec<i64>) -> (RuntimeResult<()>, Vec<i64>, String) {
        let registry = column(program);
        let mut output = Vec::new();
        let mut interpreter =
            Interpreter::new(&registry, io::empty(), &mut output).with_stacks(data, Vec::new());
        let result = interpreter.run();
        let stack = interpreter.data_stack().to_vec();
        drop(interpreter);
        (result, stack, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_floor_div() {
        assert_eq!(floor_div(7, 2), Some(3));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(-7, -2), Some(3));
        assert_eq!(floor_div(6, -3), Some(-2));
        assert_eq!(floor_div(1, 0), None);
        assert_eq!(floor_div(i64::MIN, -1), None);
    }

    #[test]
    fn test_arithmetic_operand_order() {
        assert_eq!(run_column("+@", vec![3, 7]).1, vec![10]);
        assert_eq!(run_column("-@", vec![3, 7]).1, vec![-4]);
        assert_eq!(run_column("*@", vec![3, 7]).1, vec![21]);
        assert_eq!(run_column(",@", vec![7, 2]).1, vec![3]);
        assert_eq!(run_column(",@", vec![-7, 2]).1, vec![-4]);
    }

    #[test]
    fn test_duplicate_discard_swap() {
        assert_eq!(run_column(":@", vec![5]).1, vec![5, 5]);
        assert_eq!(run_column(".@", vec![1, 2]).1, vec![1]);
        assert_eq!(run_column("~@", vec![3, 7]).1, vec![7, 3]);
    }

    #[test]
    fn test_positive() {
        assert_eq!(run_column("`@", vec![4]).1, vec![1]);
        assert_eq!(run_column("`@", vec![0]).1, vec![0]);
        assert_eq!(run_column("`@", vec![-4]).1, vec![0]);
    }

    #[test]
    fn test_digit_glyphs() {
        assert_eq!(run_column("09↊↋@", Vec::new()).1, vec![0, 9, 10, 11]);
    }

    #[test]
    fn test_space_is_nop() {
        assert_eq!(run_column("1 2@", Vec::new()).1, vec![1, 2]);
    }

    #[test]
    fn test_string_mode() {
        let (result, stack, _) = run_column("\"AB\"@", Vec::new());
        assert!(result.is_ok());
        assert_eq!(stack, vec![65, 66]);
    }

    #[test]
    fn test_string_mode_pushes_reserved_characters() {
        assert_eq!(run_column("\" @o\"@", Vec::new()).1, vec![32, 64, 111]);
    }

    #[test]
    fn test_velocity_stack_transfer() {
        let registry = column("}}{@");
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&registry, io::empty(), &mut output)
            .with_stacks(vec![1, 2, 3], Vec::new());
        interpreter.run().unwrap();
        assert_eq!(interpreter.data_stack(), &[1, 2]);
        assert_eq!(interpreter.velocity_stack(), &[3]);
    }

    #[test]
    fn test_output_character() {
        let (result, _, output) = run_column("o@", vec![0x263A]);
        assert!(result.is_ok());
        assert_eq!(output, "☺");
    }

    #[test]
    fn test_input_until_eof() {
        let registry = column("iii@");
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&registry, "a↊".as_bytes(), &mut output);
        interpreter.run().unwrap();
        assert_eq!(interpreter.data_stack(), &[97, 0x218A, -1]);
    }

    #[test]
    fn test_debug_dump() {
        let (result, _, output) = run_column("1 !@", vec![4]);
        assert!(result.is_ok());
        assert_eq!(
            output,
            "! DEBUG !\nCodebox: \nPosition: (0, 2)\nVelocity: (0, 1)\nData stack: [4, 1]\nVelocity stack: []\n"
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let (result, stack, _) = run_column("12", Vec::new());
        assert_eq!(stack, vec![1, 2]);
        assert_eq!(result.unwrap_err().to_string(), "Out of bounds in main codebox");
    }

    #[test]
    fn test_division_by_zero() {
        let (result, _, _) = run_column(",@", vec![1, 0]);
        assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
    }

    #[test]
    fn test_stack_underflow() {
        let (result, _, _) = run_column("+@", vec![1]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Stack underflow at '+' in main codebox"
        );
    }

    #[test]
    fn test_velocity_underflow() {
        let (result, _, _) = run_column("{@", Vec::new());
        assert!(matches!(result, Err(RuntimeError::VelocityUnderflow { command: '{', .. })));
    }

    #[test]
    fn test_overflow() {
        let (result, _, _) = run_column("*@", vec![i64::MAX, 2]);
        assert!(matches!(result, Err(RuntimeError::Overflow { command: '*', .. })));
    }

    #[test]
    fn test_invalid_character() {
        let (result, _, _) = run_column("o@", vec![-1]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid character code -1 in main codebox"
        );
        let (result, _, _) = run_column("o@", vec![0xD800]);
        assert!(matches!(result, Err(RuntimeError::InvalidCharacter { value: 0xD800, .. })));
    }

    #[test]
    fn test_no_main_codebox() {
        let registry = Registry::new();
        let mut interpreter = Interpreter::new(&registry, io::empty(), io::sink());
        assert_eq!(
            interpreter.run().unwrap_err().to_string(),
            "No main codebox found"
        );
    }

    #[test]
    fn test_command_not_found() {
        let (result, _, _) = run_column("q@", Vec::new());
        assert_eq!(result.unwrap_err().to_string(), "Command not found: q");
    }

    #[test]
    fn test_step_by_step() {
        let registry = column("12@");
        let mut interpreter = Interpreter::new(&registry, io::empty(), io::sink());
        assert_eq!(interpreter.step().unwrap(), Status::Finished);

        interpreter.frames.push(Frame::enter(registry.main().unwrap(), CommandKey::MAIN));
        assert_eq!(interpreter.step().unwrap(), Status::Running);
        assert_eq!(interpreter.data_stack(), &[1]);
        assert_eq!(interpreter.step().unwrap(), Status::Running);
        assert_eq!(interpreter.step().unwrap(), Status::Finished);
        assert_eq!(interpreter.steps(), 3);
        assert_eq!(interpreter.depth(), 0);
    }

    #[test]
    fn test_execute_hands_stacks_back() {
        let registry = column("+}@");
        let mut data = vec![2, 3];
        let mut velocity = vec![9];
        execute(
            &registry,
            &mut data,
            &mut velocity,
            CommandKey::MAIN,
            io::empty(),
            io::sink(),
        )
        .unwrap();
        assert!(data.is_empty());
        assert_eq!(velocity, vec![9, 5]);
    }

    #[test]
    fn test_execute_hands_stacks_back_on_error() {
        let registry = column("1q");
        let mut data = Vec::new();
        let mut velocity = Vec::new();
        let result = execute(
            &registry,
            &mut data,
            &mut velocity,
            CommandKey::MAIN,
            io::empty(),
            io::sink(),
        );
        assert!(result.is_err());
        assert_eq!(data, vec![1]);
        assert_eq!(velocity, vec![0, 1]);
    }
}
