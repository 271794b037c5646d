use std::convert::TryFrom;
use std::fmt;

use crate::alu::{self, AluOp, Outcome};
use crate::fault::Fault;
use crate::memory::{Address, Byte, Memory};
use crate::output::{Emitted, Output};
use crate::registers::{Flags, Registers};
use log::*;
use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

/// What the execution loop does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Halt,
}

/// Emulates the LS8 CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Processor {
    /// Program counter
    pub pc: Address,
    /// General purpose registers
    pub registers: Registers,
    /// Result of the last comparison
    pub flags: Flags,
}

impl Default for Processor {
    /// Initializes a new CPU starting at address 0
    fn default() -> Self {
        Self::new(0x00)
    }
}

impl Processor {
    /// Initializes a new CPU
    /// @param entrypoint The start of the program
    pub fn new(entrypoint: Address) -> Self {
        Self {
            pc: entrypoint,
            registers: Registers::default(),
            flags: Flags::default(),
        }
    }

    /// Executes a single decoded instruction. Every fault is raised before
    /// the first register or memory write, so a failed instruction leaves
    /// the CPU and memory as they were.
    pub fn execute_instruction<const S: usize, O: Output>(
        &mut self,
        decoded: &Decoded,
        memory: &mut Memory<S>,
        output: &mut O,
    ) -> Result<Step, Fault> {
        let [a, b] = decoded.operands;

        match decoded.instruction.category() {
            Category::Halt => {
                debug!("HLT");
                return Ok(Step::Halt);
            }
            Category::NoOp => {
                debug!("NOP");
            }
            Category::LoadImmediate => {
                self.registers.set(a, b)?;

                debug!("LDI R{} {}", a, b);
            }
            Category::Load => {
                let target = self.registers.check(a)?;
                let address = self.registers.get(b)?;
                let value = memory.read_byte(address.into())?;
                self.registers.set(target, value)?;

                debug!("LD R{} [0x{:02X}]: {}", a, address, value);
            }
            Category::Store => {
                let address = self.registers.get(a)?;
                let value = self.registers.get(b)?;
                memory.write_byte(address.into(), value)?;

                debug!("ST [0x{:02X}] {}", address, value);
            }
            Category::Print => {
                let value = self.registers.get(a)?;
                output
                    .emit(Emitted::Decimal(value))
                    .map_err(|err| Fault::OutputFailed(err.kind()))?;

                debug!("PRN R{}: {}", a, value);
            }
            Category::PrintChar => {
                let value = self.registers.get(a)?;
                output
                    .emit(Emitted::Char(value))
                    .map_err(|err| Fault::OutputFailed(err.kind()))?;

                debug!("PRA R{}: {}", a, value);
            }
            Category::Alu(op) => {
                let lhs = self.registers.get(a)?;
                let rhs = if op.is_unary() {
                    0
                } else {
                    self.registers.get(b)?
                };

                match alu::apply(op, lhs, rhs)? {
                    Outcome::Write(result) => {
                        self.registers.set(a, result)?;

                        debug!("{} {} {}: {}", decoded.instruction, lhs, rhs, result);
                    }
                    Outcome::Compare(flags) => {
                        self.flags = flags;

                        debug!("CMP {} {}: {}", lhs, rhs, flags);
                    }
                }
            }
        }

        self.pc = decoded.next;

        Ok(Step::Continue)
    }

    /// Runs one execution step
    pub fn execute<const S: usize, O: Output>(
        &mut self,
        memory: &mut Memory<S>,
        output: &mut O,
    ) -> Result<Step, Fault> {
        let decoded = decode(memory, self.pc)?;
        self.execute_instruction(&decoded, memory, output)
    }

    /// One line snapshot of the CPU: the program counter, the bytes at and
    /// after it and all registers
    pub fn trace<const S: usize>(&self, memory: &Memory<S>) -> String {
        let byte_at = |offset: usize| match memory.get(self.pc as usize + offset) {
            Some(byte) => format!("{:02X}", byte),
            None => "--".to_owned(),
        };

        let mut line = format!(
            "TRACE: {:02X} | {} | {} {} {} |",
            self.pc,
            self.flags,
            byte_at(0),
            byte_at(1),
            byte_at(2)
        );
        for value in self.registers.iter() {
            line.push_str(&format!(" {:02X}", value));
        }

        line
    }
}

/// How the execution loop handles an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Halt,
    NoOp,
    LoadImmediate,
    Load,
    Store,
    Print,
    PrintChar,
    Alu(AluOp),
}

/// An instruction read from memory together with its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Where the opcode was read from
    pub address: Address,
    pub instruction: Instruction,
    /// Operand bytes; unused slots are zero
    operands: [Byte; 2],
    /// Address of the following instruction
    pub next: Address,
}

impl Decoded {
    /// The operands this instruction actually consumed
    pub fn operands(&self) -> &[Byte] {
        &self.operands[..self.instruction.operand_count() as usize]
    }
}

impl fmt::Display for Decoded {
    /// Formats the instruction as assembly, e.g. `LDI R0,0d8`. Immediates
    /// carry a radix prefix so the text parses back to the same bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.operands;

        match self.instruction.category() {
            Category::Halt | Category::NoOp => write!(f, "{}", self.instruction),
            Category::LoadImmediate => write!(f, "{} R{},0d{}", self.instruction, a, b),
            Category::Print | Category::PrintChar => write!(f, "{} R{}", self.instruction, a),
            Category::Alu(op) if op.is_unary() => write!(f, "{} R{}", self.instruction, a),
            Category::Load | Category::Store | Category::Alu(_) => {
                write!(f, "{} R{},R{}", self.instruction, a, b)
            }
        }
    }
}

/// Decodes the instruction at `address`
pub fn decode<const S: usize>(memory: &Memory<S>, address: Address) -> Result<Decoded, Fault> {
    let opcode = memory.read_byte(address)?;
    let instruction = Instruction::try_from(opcode)
        .map_err(|_| Fault::UnknownOpcode { address, opcode })?;

    let mut operands = [0; 2];
    let mut next = address;
    for operand in operands
        .iter_mut()
        .take(instruction.operand_count() as usize)
    {
        next = next
            .checked_add(1)
            .ok_or(Fault::AddressOutOfRange(Address::MAX))?;
        *operand = memory.read_byte(next)?;
    }
    let next = next
        .checked_add(1)
        .ok_or(Fault::AddressOutOfRange(Address::MAX))?;

    Ok(Decoded {
        address,
        instruction,
        operands,
        next,
    })
}

macro_rules! instructions {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal , )+ ) => {
        /// Defines the LS8 instructions. The opcode encodes the operand count
        /// in bits 7-6 and marks ALU operations with bit 5.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Instruction {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Instruction {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Instruction {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $( Self::$name => f.write_str(stringify!($name)) , )+
                }
            }
        }
    }
}

instructions! {
    /// No operation
    NOP = 0b0000_0000,
    /// Halt the CPU
    HLT = 0b0000_0001,
    /// Set a register to an immediate value
    /// @param register The register to set
    /// @param value The value to load
    LDI = 0b1000_0010,
    /// Load a register with the byte at the address held by another register
    LD = 0b1000_0011,
    /// Store the value of a register at the address held by another register
    ST = 0b1000_0100,
    /// Print a register as a decimal number
    PRN = 0b0100_0111,
    /// Print a register as an ASCII character
    PRA = 0b0100_1000,
    /// Add two registers and store the result in the first
    ADD = 0b1010_0000,
    /// Subtract the second register from the first
    SUB = 0b1010_0001,
    /// Multiply two registers
    MUL = 0b1010_0010,
    /// Divide the first register by the second
    DIV = 0b1010_0011,
    /// Remainder of dividing the first register by the second
    MOD = 0b1010_0100,
    /// Increment a register
    INC = 0b0110_0101,
    /// Decrement a register
    DEC = 0b0110_0110,
    /// Compare two registers and set the flags
    CMP = 0b1010_0111,
    /// Bitwise AND
    AND = 0b1010_1000,
    /// Bitwise NOT of a single register
    NOT = 0b0110_1001,
    /// Bitwise OR
    OR = 0b1010_1010,
    /// Bitwise XOR
    XOR = 0b1010_1011,
    /// Logical shift left by the value of the second register
    SHL = 0b1010_1100,
    /// Logical shift right by the value of the second register
    SHR = 0b1010_1101,
}

impl Instruction {
    /// Number of operand bytes following the opcode
    pub fn operand_count(self) -> u8 {
        (self as Byte) >> 6
    }

    /// Whether the opcode marks this as an ALU operation
    pub fn is_alu(self) -> bool {
        (self as Byte) & 0b0010_0000 != 0
    }

    pub fn category(self) -> Category {
        use Instruction::*;

        match self {
            NOP => Category::NoOp,
            HLT => Category::Halt,
            LDI => Category::LoadImmediate,
            LD => Category::Load,
            ST => Category::Store,
            PRN => Category::Print,
            PRA => Category::PrintChar,
            ADD => Category::Alu(AluOp::Add),
            SUB => Category::Alu(AluOp::Sub),
            MUL => Category::Alu(AluOp::Mul),
            DIV => Category::Alu(AluOp::Div),
            MOD => Category::Alu(AluOp::Mod),
            // INC and DEC take a single operand byte, unlike the other
            // two operand arithmetic instructions
            INC => Category::Alu(AluOp::Inc),
            DEC => Category::Alu(AluOp::Dec),
            CMP => Category::Alu(AluOp::Cmp),
            AND => Category::Alu(AluOp::And),
            NOT => Category::Alu(AluOp::Not),
            OR => Category::Alu(AluOp::Or),
            XOR => Category::Alu(AluOp::Xor),
            SHL => Category::Alu(AluOp::Shl),
            SHR => Category::Alu(AluOp::Shr),
        }
    }
}
