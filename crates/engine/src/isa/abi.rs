//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Maps the numeric (`x5`, `f10`) and ABI (`t0`, `fa0`) spellings of register
//! names to register indices, and CSR names to addresses. Lookups are case-sensitive.

use crate::core::arch::csr::CSR_NAMES;

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x3 (global pointer, gp).
pub const REG_GP: usize = 3;
/// Register x10 (first argument/return value, a0).
pub const REG_A0: usize = 10;
/// Register x11 (second argument, a1).
pub const REG_A1: usize = 11;
/// Register x17 (system call number, a7).
pub const REG_A7: usize = 17;

/// ABI names of the integer registers, indexed by register number.
pub const GPR_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// ABI names of the floating-point registers, indexed by register number.
pub const FPR_NAMES: [&str; 32] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7", "fs0", "fs1", "fa0", "fa1", "fa2",
    "fa3", "fa4", "fa5", "fa6", "fa7", "fs2", "fs3", "fs4", "fs5", "fs6", "fs7", "fs8", "fs9",
    "fs10", "fs11", "ft8", "ft9", "ft10", "ft11",
];

/// Resolves an integer register name (`x0`-`x31`, an ABI name, or `fp`).
pub fn gpr_index(name: &str) -> Option<usize> {
    if name == "fp" {
        return Some(8);
    }
    numbered(name, 'x').or_else(|| GPR_NAMES.iter().position(|&abi| abi == name))
}

/// Resolves a floating-point register name (`f0`-`f31` or an ABI name).
pub fn fpr_index(name: &str) -> Option<usize> {
    numbered(name, 'f').or_else(|| FPR_NAMES.iter().position(|&abi| abi == name))
}

/// Resolves a CSR name to its address.
pub fn csr_address(name: &str) -> Option<u16> {
    CSR_NAMES
        .iter()
        .find_map(|&(csr, addr)| (csr == name).then_some(addr))
}

fn numbered(name: &str, prefix: char) -> Option<usize> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse::<usize>().ok().filter(|&idx| idx < 32)
}
