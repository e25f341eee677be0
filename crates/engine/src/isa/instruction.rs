//! RISC-V instruction field extraction and encoding.
//!
//! This module provides:
//! 1. **Field Extraction:** The `InstructionBits` trait reads opcode, register and immediate fields from a raw word.
//! 2. **Encoding:** Builders for each base format, used by the assembler.

/// Field accessors on a raw 32-bit instruction word.
pub trait InstructionBits {
    /// Major opcode (bits 6:0).
    fn opcode(&self) -> u32;
    /// Destination register (bits 11:7).
    fn rd(&self) -> usize;
    /// First source register (bits 19:15).
    fn rs1(&self) -> usize;
    /// Second source register (bits 24:20).
    fn rs2(&self) -> usize;
    /// Minor opcode (bits 14:12).
    fn funct3(&self) -> u32;
    /// Function code (bits 31:25).
    fn funct7(&self) -> u32;
    /// CSR address (bits 31:20).
    fn csr(&self) -> u16;
    /// Sign-extended I-type immediate.
    fn imm_i(&self) -> i64;
    /// Sign-extended S-type immediate.
    fn imm_s(&self) -> i64;
    /// Sign-extended B-type immediate.
    fn imm_b(&self) -> i64;
    /// Sign-extended U-type immediate.
    fn imm_u(&self) -> i64;
    /// Sign-extended J-type immediate.
    fn imm_j(&self) -> i64;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & 0x7f
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & 0x1f) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & 0x1f) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & 0x1f) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & 0x7
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & 0x7f
    }

    #[inline(always)]
    fn csr(&self) -> u16 {
        (self >> 20) as u16
    }

    fn imm_i(&self) -> i64 {
        i64::from((*self as i32) >> 20)
    }

    fn imm_s(&self) -> i64 {
        let hi = (*self as i32) >> 25;
        let lo = ((self >> 7) & 0x1f) as i32;
        i64::from((hi << 5) | lo)
    }

    fn imm_b(&self) -> i64 {
        let sign = (*self as i32) >> 31;
        let bit11 = ((self >> 7) & 0x1) as i32;
        let bits4_1 = ((self >> 8) & 0xf) as i32;
        let bits10_5 = ((self >> 25) & 0x3f) as i32;
        i64::from((sign << 12) | (bit11 << 11) | (bits10_5 << 5) | (bits4_1 << 1))
    }

    fn imm_u(&self) -> i64 {
        i64::from((*self & 0xffff_f000) as i32)
    }

    fn imm_j(&self) -> i64 {
        let sign = (*self as i32) >> 31;
        let bits19_12 = ((self >> 12) & 0xff) as i32;
        let bit11 = ((self >> 20) & 0x1) as i32;
        let bits10_1 = ((self >> 21) & 0x3ff) as i32;
        i64::from((sign << 20) | (bits19_12 << 12) | (bit11 << 11) | (bits10_1 << 1))
    }
}

const fn reg(idx: usize) -> u32 {
    (idx as u32) & 0x1f
}

/// Encodes an R-type instruction.
pub const fn encode_r(opcode: u32, rd: usize, funct3: u32, rs1: usize, rs2: usize, funct7: u32) -> u32 {
    (funct7 << 25) | (reg(rs2) << 20) | (reg(rs1) << 15) | (funct3 << 12) | (reg(rd) << 7) | opcode
}

/// Encodes an I-type instruction; `imm` keeps its low 12 bits.
pub const fn encode_i(opcode: u32, rd: usize, funct3: u32, rs1: usize, imm: i64) -> u32 {
    (((imm as u32) & 0xfff) << 20) | (reg(rs1) << 15) | (funct3 << 12) | (reg(rd) << 7) | opcode
}

/// Encodes an S-type instruction.
pub const fn encode_s(opcode: u32, funct3: u32, rs1: usize, rs2: usize, imm: i64) -> u32 {
    let imm = imm as u32;
    (((imm >> 5) & 0x7f) << 25)
        | (reg(rs2) << 20)
        | (reg(rs1) << 15)
        | (funct3 << 12)
        | ((imm & 0x1f) << 7)
        | opcode
}

/// Encodes a B-type instruction; `offset` must be even.
pub const fn encode_b(opcode: u32, funct3: u32, rs1: usize, rs2: usize, offset: i64) -> u32 {
    let imm = offset as u32;
    (((imm >> 12) & 0x1) << 31)
        | (((imm >> 5) & 0x3f) << 25)
        | (reg(rs2) << 20)
        | (reg(rs1) << 15)
        | (funct3 << 12)
        | (((imm >> 1) & 0xf) << 8)
        | (((imm >> 11) & 0x1) << 7)
        | opcode
}

/// Encodes a U-type instruction from the 20-bit upper immediate.
pub const fn encode_u(opcode: u32, rd: usize, upper: i64) -> u32 {
    (((upper as u32) & 0xf_ffff) << 12) | (reg(rd) << 7) | opcode
}

/// Encodes a J-type instruction; `offset` must be even.
pub const fn encode_j(opcode: u32, rd: usize, offset: i64) -> u32 {
    let imm = offset as u32;
    (((imm >> 20) & 0x1) << 31)
        | (((imm >> 1) & 0x3ff) << 21)
        | (((imm >> 11) & 0x1) << 20)
        | (((imm >> 12) & 0xff) << 12)
        | (reg(rd) << 7)
        | opcode
}
