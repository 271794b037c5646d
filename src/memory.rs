use std::convert::TryFrom;
use std::fmt::Write;
use std::ops::Deref;

use crate::fault::Fault;

pub mod parse;

pub type Byte = u8; // 1 byte
pub type Address = u16; // wide enough to name the first address past the end

/// Number of addressable cells on the LS8
pub const MEMORY_SIZE: usize = 256;

/// Default memory
pub type StdMem = Memory<MEMORY_SIZE>;

/// Emulates memory for use with the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory
    data: [Byte; S],
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory with zeroes
    fn default() -> Self {
        Memory { data: [0; S] }
    }
}

impl<const S: usize> Deref for Memory<S> {
    type Target = [Byte];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<const S: usize> Memory<S> {
    /// Number of cells in this memory
    pub const fn capacity(&self) -> usize {
        S
    }

    /// Reads a byte from the memory
    pub fn read_byte(&self, position: Address) -> Result<Byte, Fault> {
        self.data
            .get(position as usize)
            .copied()
            .ok_or(Fault::AddressOutOfRange(position))
    }

    /// Writes a byte to the memory
    pub fn write_byte(&mut self, position: Address, value: Byte) -> Result<(), Fault> {
        let cell = self
            .data
            .get_mut(position as usize)
            .ok_or(Fault::AddressOutOfRange(position))?;
        *cell = value;

        Ok(())
    }

    /// Writes an array of bytes to the memory. Nothing is written unless the
    /// whole array fits.
    pub fn write_array(&mut self, position: Address, data: &[Byte]) -> Result<(), Fault> {
        let start = position as usize;
        let end = start + data.len();

        if end > S {
            let first_invalid = Address::try_from(start.max(S)).unwrap_or(Address::MAX);
            return Err(Fault::AddressOutOfRange(first_invalid));
        }

        self.data[start..end].copy_from_slice(data);

        Ok(())
    }

    /// Renders every row of 16 bytes that holds at least one non-zero byte
    pub fn dump(&self) -> String {
        let mut out = String::new();

        for (row, chunk) in self.data.chunks(16).enumerate() {
            if chunk.iter().all(|&byte| byte == 0) {
                continue;
            }

            let _ = write!(out, "0x{:02X}:", row * 16);
            for byte in chunk {
                let _ = write!(out, " {:02X}", byte);
            }
            out.push('\n');
        }

        out
    }
}

/// Writes a block of instructions directly into the memory
#[macro_export]
macro_rules! write_instructions {
    ( $mem:ident : $pos:expr => $( $byte:expr ),+ ) => {
        $mem.write_array($pos, &[
            $(
                $byte as $crate::memory::Byte,
            )+
        ])
    };
}
