use std::error;
use std::fmt;
use std::io;

use crate::memory::{Address, Byte};

/// Conditions that stop a running machine. None of them can be recovered
/// from without loading a program again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// The byte at `address` is not a known opcode
    UnknownOpcode { address: Address, opcode: Byte },
    /// A memory access outside of the address space
    AddressOutOfRange(Address),
    /// An operand named a register that does not exist
    RegisterOutOfRange(Byte),
    /// DIV or MOD with a zero divisor
    DivisionByZero,
    /// The program does not fit into memory
    ProgramTooLarge { size: usize, capacity: usize },
    /// The output sink rejected a printed value
    OutputFailed(io::ErrorKind),
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::UnknownOpcode { address, opcode } => write!(
                f,
                "unknown opcode `0b{:08b}` at address `0x{:02X}`",
                opcode, address
            ),
            Fault::AddressOutOfRange(address) => {
                write!(f, "memory has no address `0x{:x}`", address)
            }
            Fault::RegisterOutOfRange(index) => write!(f, "register `R{}` does not exist", index),
            Fault::DivisionByZero => f.write_str("division by zero"),
            Fault::ProgramTooLarge { size, capacity } => write!(
                f,
                "program of {} bytes does not fit into {} bytes of memory",
                size, capacity
            ),
            Fault::OutputFailed(kind) => write!(f, "failed to write output: {:?}", kind),
        }
    }
}

impl error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let fault = Fault::UnknownOpcode {
            address: 0x10,
            opcode: 0xFF,
        };
        assert_eq!(
            fault.to_string(),
            "unknown opcode `0b11111111` at address `0x10`"
        );
        assert_eq!(
            Fault::AddressOutOfRange(256).to_string(),
            "memory has no address `0x100`"
        );
        assert_eq!(
            Fault::RegisterOutOfRange(9).to_string(),
            "register `R9` does not exist"
        );
        assert_eq!(
            Fault::OutputFailed(io::ErrorKind::BrokenPipe).to_string(),
            "failed to write output: BrokenPipe"
        );
    }
}
