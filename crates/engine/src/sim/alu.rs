//! Integer ALU operations for the base and M-extension instructions.
//!
//! Division follows the RISC-V rules: dividing by zero yields all ones (quotient)
//! or the dividend (remainder), and signed overflow wraps.

/// An integer arithmetic or logic operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Shift left logical.
    Sll,
    /// Set if less than (signed).
    Slt,
    /// Set if less than (unsigned).
    Sltu,
    /// Bitwise exclusive or.
    Xor,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Bitwise or.
    Or,
    /// Bitwise and.
    And,
    /// Low half of the product.
    Mul,
    /// High half of the signed product.
    Mulh,
    /// High half of the signed-by-unsigned product.
    Mulhsu,
    /// High half of the unsigned product.
    Mulhu,
    /// Signed division.
    Div,
    /// Unsigned division.
    Divu,
    /// Signed remainder.
    Rem,
    /// Unsigned remainder.
    Remu,
}

impl AluOp {
    /// Decodes a register-register operation.
    pub const fn from_register(funct3: u32, funct7: u32) -> Option<Self> {
        Some(match (funct7, funct3) {
            (0x00, 0) => Self::Add,
            (0x20, 0) => Self::Sub,
            (0x00, 1) => Self::Sll,
            (0x00, 2) => Self::Slt,
            (0x00, 3) => Self::Sltu,
            (0x00, 4) => Self::Xor,
            (0x00, 5) => Self::Srl,
            (0x20, 5) => Self::Sra,
            (0x00, 6) => Self::Or,
            (0x00, 7) => Self::And,
            (0x01, 0) => Self::Mul,
            (0x01, 1) => Self::Mulh,
            (0x01, 2) => Self::Mulhsu,
            (0x01, 3) => Self::Mulhu,
            (0x01, 4) => Self::Div,
            (0x01, 5) => Self::Divu,
            (0x01, 6) => Self::Rem,
            (0x01, 7) => Self::Remu,
            _ => return None,
        })
    }

    /// Decodes a register-immediate operation; `arithmetic` is instruction bit 30.
    pub const fn from_immediate(funct3: u32, arithmetic: bool) -> Self {
        match funct3 {
            1 => Self::Sll,
            2 => Self::Slt,
            3 => Self::Sltu,
            4 => Self::Xor,
            5 if arithmetic => Self::Sra,
            5 => Self::Srl,
            6 => Self::Or,
            7 => Self::And,
            _ => Self::Add,
        }
    }

    /// Evaluates the operation on 64-bit operands.
    pub const fn eval64(self, a: u64, b: u64) -> u64 {
        let shamt = (b & 0x3f) as u32;
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Sll => a << shamt,
            Self::Slt => ((a as i64) < (b as i64)) as u64,
            Self::Sltu => (a < b) as u64,
            Self::Xor => a ^ b,
            Self::Srl => a >> shamt,
            Self::Sra => ((a as i64) >> shamt) as u64,
            Self::Or => a | b,
            Self::And => a & b,
            Self::Mul => a.wrapping_mul(b),
            Self::Mulh => (((a as i64 as i128) * (b as i64 as i128)) >> 64) as u64,
            Self::Mulhsu => (((a as i64 as i128) * (b as i128)) >> 64) as u64,
            Self::Mulhu => (((a as u128) * (b as u128)) >> 64) as u64,
            Self::Div if b == 0 => u64::MAX,
            Self::Div => (a as i64).wrapping_div(b as i64) as u64,
            Self::Divu if b == 0 => u64::MAX,
            Self::Divu => a / b,
            Self::Rem if b == 0 => a,
            Self::Rem => (a as i64).wrapping_rem(b as i64) as u64,
            Self::Remu if b == 0 => a,
            Self::Remu => a % b,
        }
    }

    /// Evaluates the operation on 32-bit operands.
    pub const fn eval32(self, a: u32, b: u32) -> u32 {
        let shamt = b & 0x1f;
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Sll => a << shamt,
            Self::Slt => ((a as i32) < (b as i32)) as u32,
            Self::Sltu => (a < b) as u32,
            Self::Xor => a ^ b,
            Self::Srl => a >> shamt,
            Self::Sra => ((a as i32) >> shamt) as u32,
            Self::Or => a | b,
            Self::And => a & b,
            Self::Mul => a.wrapping_mul(b),
            Self::Mulh => (((a as i32 as i64) * (b as i32 as i64)) >> 32) as u32,
            Self::Mulhsu => (((a as i32 as i64) * (b as i64)) >> 32) as u32,
            Self::Mulhu => (((a as u64) * (b as u64)) >> 32) as u32,
            Self::Div if b == 0 => u32::MAX,
            Self::Div => (a as i32).wrapping_div(b as i32) as u32,
            Self::Divu if b == 0 => u32::MAX,
            Self::Divu => a / b,
            Self::Rem if b == 0 => a,
            Self::Rem => (a as i32).wrapping_rem(b as i32) as u32,
            Self::Remu if b == 0 => a,
            Self::Remu => a % b,
        }
    }
}
