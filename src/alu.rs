//! Arithmetic and logic on register values. All arithmetic wraps at the
//! register width.

use crate::fault::Fault;
use crate::registers::{Flags, Word};

/// Operations understood by the ALU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Inc,
    Dec,
    Cmp,
    And,
    Not,
    Or,
    Xor,
    Shl,
    Shr,
}

impl AluOp {
    /// Operations that only read and write their first operand
    pub fn is_unary(self) -> bool {
        matches!(self, AluOp::Inc | AluOp::Dec | AluOp::Not)
    }
}

/// What the processor has to do with the result of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Store the value in the first operand register
    Write(Word),
    /// Replace the flags register, leave the operands alone
    Compare(Flags),
}

/// Applies `op` to `a` and `b`. Unary operations ignore `b`.
pub fn apply(op: AluOp, a: Word, b: Word) -> Result<Outcome, Fault> {
    let value = match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mul => a.wrapping_mul(b),
        AluOp::Div => a.checked_div(b).ok_or(Fault::DivisionByZero)?,
        AluOp::Mod => a.checked_rem(b).ok_or(Fault::DivisionByZero)?,
        AluOp::Inc => a.wrapping_add(1),
        AluOp::Dec => a.wrapping_sub(1),
        AluOp::Cmp => return Ok(Outcome::Compare(Flags::compare(a, b))),
        AluOp::And => a & b,
        AluOp::Not => !a,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        // the shift amount is masked to the register width
        AluOp::Shl => a.wrapping_shl(u32::from(b)),
        AluOp::Shr => a.wrapping_shr(u32::from(b)),
    };

    Ok(Outcome::Write(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    fn write(op: AluOp, a: Word, b: Word) -> Result<Word> {
        match apply(op, a, b)? {
            Outcome::Write(value) => Ok(value),
            Outcome::Compare(flags) => Err(color_eyre::eyre::eyre!(
                "{:?} compared instead of writing: {}",
                op,
                flags
            )),
        }
    }

    #[test]
    fn test_arithmetic_wraps() -> Result<()> {
        assert_eq!(write(AluOp::Add, 250, 10)?, 4);
        assert_eq!(write(AluOp::Add, 2, 3)?, 5);
        assert_eq!(write(AluOp::Sub, 3, 5)?, 254);
        assert_eq!(write(AluOp::Mul, 16, 17)?, 16);
        assert_eq!(write(AluOp::Mul, 8, 9)?, 72);
        assert_eq!(write(AluOp::Inc, 255, 0)?, 0);
        assert_eq!(write(AluOp::Dec, 0, 0)?, 255);

        Ok(())
    }

    #[test]
    fn test_wrapping_matches_modulo() -> Result<()> {
        for a in (0..=255u16).step_by(7) {
            for b in (0..=255u16).step_by(11) {
                let (x, y) = (a as Word, b as Word);
                assert_eq!(write(AluOp::Add, x, y)? as u16, (a + b) % 256);
                assert_eq!(write(AluOp::Mul, x, y)? as u16, (a * b) % 256);
                assert_eq!(write(AluOp::Sub, x, y)? as u16, (a + 256 - b) % 256);
            }
        }

        Ok(())
    }

    #[test]
    fn test_division() -> Result<()> {
        assert_eq!(write(AluOp::Div, 10, 3)?, 3);
        assert_eq!(write(AluOp::Mod, 10, 3)?, 1);
        assert_eq!(apply(AluOp::Div, 10, 0), Err(Fault::DivisionByZero));
        assert_eq!(apply(AluOp::Mod, 10, 0), Err(Fault::DivisionByZero));

        Ok(())
    }

    #[test]
    fn test_bitwise() -> Result<()> {
        assert_eq!(write(AluOp::And, 0b1100, 0b1010)?, 0b1000);
        assert_eq!(write(AluOp::Or, 0b1100, 0b1010)?, 0b1110);
        assert_eq!(write(AluOp::Xor, 0b1100, 0b1010)?, 0b0110);
        assert_eq!(write(AluOp::Not, 0b0000_1111, 0)?, 0b1111_0000);

        Ok(())
    }

    #[test]
    fn test_shifts_are_logical_and_masked() -> Result<()> {
        assert_eq!(write(AluOp::Shl, 0b1000_0001, 1)?, 0b0000_0010);
        assert_eq!(write(AluOp::Shr, 0b1000_0001, 1)?, 0b0100_0000);
        assert_eq!(write(AluOp::Shr, 0b1000_0000, 7)?, 1);
        assert_eq!(write(AluOp::Shl, 0b11, 9)?, 0b110);
        assert_eq!(write(AluOp::Shr, 0xFF, 8)?, 0xFF);

        Ok(())
    }

    #[test]
    fn test_compare() -> Result<()> {
        assert_eq!(
            apply(AluOp::Cmp, 1, 200)?,
            Outcome::Compare(Flags {
                less: true,
                greater: false,
                equal: false
            })
        );
        assert_eq!(
            apply(AluOp::Cmp, 200, 1)?,
            Outcome::Compare(Flags {
                less: false,
                greater: true,
                equal: false
            })
        );
        assert_eq!(
            apply(AluOp::Cmp, 7, 7)?,
            Outcome::Compare(Flags {
                less: false,
                greater: false,
                equal: true
            })
        );

        Ok(())
    }

    #[test]
    fn test_unary_ops() {
        assert!(AluOp::Inc.is_unary());
        assert!(AluOp::Dec.is_unary());
        assert!(AluOp::Not.is_unary());
        assert!(!AluOp::Cmp.is_unary());
    }
}
