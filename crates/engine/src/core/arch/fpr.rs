//! RISC-V Floating-Point Register File.
//!
//! Registers hold raw 64-bit patterns. Single-precision values written by
//! `fmv.w.x` are NaN-boxed: the upper 32 bits are set to all ones.

use crate::common::constants::FPR_COUNT;

/// Upper half of a NaN-boxed single-precision value.
pub const NAN_BOX: u64 = 0xffff_ffff_0000_0000;

/// Floating-Point Register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fpr {
    fregs: [u64; FPR_COUNT],
}

impl Fpr {
    /// Reads a register as raw bits.
    pub fn read(&self, idx: usize) -> u64 {
        self.fregs[idx]
    }

    /// Writes raw bits to a register.
    pub fn write(&mut self, idx: usize, val: u64) {
        self.fregs[idx] = val;
    }

    /// Writes a single-precision bit pattern, NaN-boxing it.
    pub fn write_single(&mut self, idx: usize, bits: u32) {
        self.fregs[idx] = NAN_BOX | u64::from(bits);
    }

    /// Clears every register.
    pub fn reset(&mut self) {
        self.fregs = [0; FPR_COUNT];
    }
}
