use std::fmt;

use crate::fault::Fault;
use crate::memory::Byte;

/// Width of a general purpose register
pub type Word = u8;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;

/// The general purpose registers `R0` to `R7`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Registers {
    values: [Word; REGISTER_COUNT],
}

impl Registers {
    /// Reads register `index`
    pub fn get(&self, index: Byte) -> Result<Word, Fault> {
        self.values
            .get(index as usize)
            .copied()
            .ok_or(Fault::RegisterOutOfRange(index))
    }

    /// Writes `value` into register `index`
    pub fn set(&mut self, index: Byte, value: Word) -> Result<(), Fault> {
        let register = self
            .values
            .get_mut(index as usize)
            .ok_or(Fault::RegisterOutOfRange(index))?;
        *register = value;

        Ok(())
    }

    /// Checks that `index` names a register without touching it
    pub fn check(&self, index: Byte) -> Result<Byte, Fault> {
        self.get(index).map(|_| index)
    }

    pub fn iter(&self) -> impl Iterator<Item = Word> + '_ {
        self.values.iter().copied()
    }
}

/// Result of the last `CMP`. At most one of the flags is set, and exactly one
/// after the first comparison.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags {
    pub less: bool,
    pub greater: bool,
    pub equal: bool,
}

impl Flags {
    /// Compares `a` with `b` as unsigned values
    pub fn compare(a: Word, b: Word) -> Self {
        Self {
            less: a < b,
            greater: a > b,
            equal: a == b,
        }
    }

    /// Packed as `0b00000LGE`
    pub fn bits(&self) -> Byte {
        (self.less as Byte) << 2 | (self.greater as Byte) << 1 | self.equal as Byte
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03b}", self.bits())
    }
}
