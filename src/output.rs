use std::fmt;
use std::io::{self, Write};

use crate::memory::Byte;
use crate::registers::Word;

/// A value printed by the running program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emitted {
    /// `PRN`: a register printed as a decimal number
    Decimal(Word),
    /// `PRA`: a register printed as an ASCII character
    Char(Byte),
}

impl fmt::Display for Emitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emitted::Decimal(value) => write!(f, "{}", value),
            Emitted::Char(value) => write!(f, "{}", *value as char),
        }
    }
}

/// Receives everything the program prints, in program order. A failed
/// write faults the machine.
pub trait Output {
    fn emit(&mut self, value: Emitted) -> io::Result<()>;
}

/// Collects the output, mostly useful for tests
impl Output for Vec<Emitted> {
    fn emit(&mut self, value: Emitted) -> io::Result<()> {
        self.push(value);
        Ok(())
    }
}

/// Prints numbers on their own line and characters as they come
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Output for Stdout {
    fn emit(&mut self, value: Emitted) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();

        match value {
            Emitted::Decimal(_) => writeln!(handle, "{}", value),
            Emitted::Char(_) => write!(handle, "{}", value).and_then(|_| handle.flush()),
        }
    }
}
