//! An emulator for the LS8, an 8-bit computer with 256 bytes of memory,
//! eight general purpose registers and a small fixed-width instruction set.
//!
//! ```
//! use ls8::machine::Machine;
//! use ls8::output::Emitted;
//! use ls8::processor::Instruction::*;
//!
//! let mut machine = Machine::new(Vec::<Emitted>::new());
//! machine.load(&[LDI as u8, 0, 8, PRN as u8, 0, HLT as u8]).unwrap();
//! machine.run().unwrap();
//!
//! assert_eq!(machine.output(), &vec![Emitted::Decimal(8)]);
//! ```

pub mod alu;
pub mod fault;
pub mod machine;
pub mod memory;
pub mod output;
pub mod processor;
pub mod registers;
