//! Parser for `.ls8` program files. Every line holds the bytes of one
//! instruction, everything after a `#` is a comment:
//!
//! ```text
//! # print8.ls8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! A byte is either a bare binary number (`10000010`), a number with a radix
//! prefix (`0b1`, `0o17`, `0d42`, `0xFF`), a register (`R3`) or the mnemonic
//! of an instruction (`LDI`). Several bytes may share a line when separated by
//! whitespace or commas, so `LDI R0,0d8` is the same as the first three lines
//! above.

use std::borrow::Cow;
use std::error;
use std::{fmt, str::Lines};

use crate::processor::Instruction;
use crate::registers::REGISTER_COUNT;

use super::Byte;

macro_rules! propagate {
    ( $res:expr ) => {
        match $res {
            Ok(value) => value,
            Err(err) => return Some(Err(err)),
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidNumber { radix: u32 },
    InvalidRegister,
    InvalidToken,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidNumber { radix } => {
                write!(f, "failed to parse byte with radix `{}`", radix)
            }
            ParseErrorKind::InvalidRegister => f.write_str("invalid register"),
            ParseErrorKind::InvalidToken => {
                f.write_str("neither a number, a register nor an instruction")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Option<Cow<'static, str>>,
    line_nr: usize,
}

impl ParseError {
    fn new<C, S>(kind: ParseErrorKind, context: C, line_nr: usize) -> Self
    where
        C: Into<Option<S>>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            context: context.into().map(|inner| inner.into()),
            line_nr,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn line_nr(&self) -> usize {
        self.line_nr
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(
                f,
                "error [ln: {}]: {} - {}",
                self.line_nr, self.kind, context
            )
        } else {
            write!(f, "error [ln: {}]: {}", self.line_nr, self.kind)
        }
    }
}

impl error::Error for ParseError {}

/// Every error found in a program, in line order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", err)?;
        }

        Ok(())
    }
}

impl error::Error for ParseErrors {}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Parses a number token. Returns `None` if the token does not look like a
/// number at all and the radix on failure.
fn parse_number(token: &str) -> Option<std::result::Result<Byte, u32>> {
    let (radix, offset) = match token.as_bytes() {
        [b'0', b'b', ..] => (2, 2),
        [b'0', b'o', ..] => (8, 2),
        [b'0', b'd', ..] => (10, 2),
        [b'0', b'x', ..] => (16, 2),
        [first, ..] if first.is_ascii_digit() => (2, 0),
        _ => return None,
    };

    Some(Byte::from_str_radix(&token[offset..], radix).map_err(|_| radix))
}

#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
    line_nr: usize,
    program: Vec<Byte>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for `data`
    pub fn new(data: &'a str) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
            program: Vec::new(),
        }
    }

    /// Consumes `self` and tries to parse all of `data` into program bytes.
    ///
    /// # Errors
    ///
    /// All errors which may occur are collected and returned at the end.
    pub fn parse(mut self) -> Result<Vec<Byte>, ParseErrors> {
        let mut errors = Vec::new();

        while let Some(res) = self.parse_next_line() {
            if let Err(err) = res {
                log::error!("{}", err);
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(self.program)
        } else {
            Err(ParseErrors(errors))
        }
    }

    /// Tries to parse the next line. Bytes of a line are only kept if the
    /// whole line parses.
    fn parse_next_line(&mut self) -> Option<Result<()>> {
        let line = self.lines.next()?;
        self.line_nr += 1;

        let code = match line.find('#') {
            Some(start) => &line[..start],
            None => line,
        };

        let mut bytes = Vec::new();
        for token in code
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
        {
            bytes.push(propagate!(self.parse_token(token)));
        }

        if !bytes.is_empty() {
            log::debug!("[{}] Found {} bytes", self.line_nr, bytes.len());
        }
        self.program.extend(bytes);

        Some(Ok(()))
    }

    /// Tries to parse a single token as a byte
    ///
    /// # Examples
    ///
    /// - `10000010`
    /// - `0xFF`
    /// - `R7`
    /// - `HLT`
    fn parse_token(&self, token: &str) -> Result<Byte> {
        if let Some(number) = parse_number(token) {
            return number.map_err(|radix| {
                ParseError::new(
                    ParseErrorKind::InvalidNumber { radix },
                    format!("`{}` is not a byte", token),
                    self.line_nr,
                )
            });
        }

        if let Some(index) = token.strip_prefix('R') {
            return match index.parse::<Byte>() {
                Ok(index) if (index as usize) < REGISTER_COUNT => Ok(index),
                _ => Err(ParseError::new(
                    ParseErrorKind::InvalidRegister,
                    format!("`{}` is not one of R0 to R{}", token, REGISTER_COUNT - 1),
                    self.line_nr,
                )),
            };
        }

        Instruction::ALL
            .iter()
            .find(|instruction| token == instruction.name())
            .map(|&instruction| instruction.into())
            .ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidToken,
                    format!("unknown token `{}`", token),
                    self.line_nr,
                )
            })
    }
}

/// Parses the text of an `.ls8` program
pub fn parse_program(data: &str) -> Result<Vec<Byte>, ParseErrors> {
    Parser::new(data).parse()
}
