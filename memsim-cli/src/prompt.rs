//! Line-oriented numeric input with re-prompting.
//!
//! A line is accepted when, after the line terminator is stripped, it holds
//! optional leading whitespace, an optional sign and at least one decimal
//! digit, and nothing else.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::error::CliError;

/// Why a line was not accepted as a number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Not a number, or trailing characters after the digits.
    #[error("not a valid number: {0:?}")]
    Parse(String),

    /// A number, but outside the target type.
    #[error("number out of range: {0:?}")]
    Range(String),
}

const OUT_OF_RANGE: &str = "Number out of range. Please try again.";
const READ_FAILED: &str = "Error reading input. Please try again.";

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Splits `line` into (negative, digits).
fn lex(line: &str) -> Result<(bool, &str), InputError> {
    let text = strip_line_ending(line);
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::Parse(text.to_string()));
    }
    Ok((negative, digits))
}

/// Parses an unsigned byte count. Negative values are out of range.
pub fn parse_size(line: &str) -> Result<u64, InputError> {
    let (negative, digits) = lex(line)?;
    let range = || InputError::Range(strip_line_ending(line).to_string());

    let magnitude = digits.parse::<u64>().map_err(|_| range())?;
    if negative && magnitude != 0 {
        return Err(range());
    }
    Ok(magnitude)
}

/// Parses a signed 32-bit integer.
pub fn parse_int(line: &str) -> Result<i32, InputError> {
    let (negative, digits) = lex(line)?;
    let range = || InputError::Range(strip_line_ending(line).to_string());

    let magnitude = digits.parse::<i64>().map_err(|_| range())?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| range())
}

/// Prompts on `output` and reads answers from `input` until one parses.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads a non-negative byte count, re-prompting on bad input.
    pub fn read_size(&mut self, prompt: &str) -> Result<u64, CliError> {
        self.read_with(
            prompt,
            parse_size,
            "Invalid input. Please enter a valid size in bytes.",
        )
    }

    /// Reads a signed integer, re-prompting on bad input.
    pub fn read_int(&mut self, prompt: &str) -> Result<i32, CliError> {
        self.read_with(
            prompt,
            parse_int,
            "Invalid input. Please enter a valid integer.",
        )
    }

    fn read_with<T>(
        &mut self,
        prompt: &str,
        parse: fn(&str) -> Result<T, InputError>,
        invalid_message: &str,
    ) -> Result<T, CliError> {
        loop {
            let line = self.read_line(prompt)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(error = %err, "rejected input");
                    let message = match err {
                        InputError::Parse(_) => invalid_message,
                        InputError::Range(_) => OUT_OF_RANGE,
                    };
                    writeln!(self.output, "{message}")?;
                }
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, CliError> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return Err(CliError::InputClosed),
                Ok(_) => return Ok(line),
                Err(err)
                    if matches!(
                        err.kind(),
                        io::ErrorKind::Interrupted | io::ErrorKind::InvalidData
                    ) =>
                {
                    debug!(error = %err, "unreadable input line");
                    writeln!(self.output, "{READ_FAILED}")?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
