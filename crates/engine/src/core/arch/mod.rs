//! RISC-V register state.
//!
//! This module groups the architectural register files:
//! 1. **GPRs:** 32 integer registers with `x0` hardwired to zero.
//! 2. **FPRs:** 32 floating-point registers held as raw bit patterns.
//! 3. **CSRs:** The user-level control and status registers, including the retired-instruction counters.

/// Control and Status Register definitions and access logic.
pub mod csr;

/// Floating-Point Register file implementation.
pub mod fpr;

/// General-Purpose Register file implementation.
pub mod gpr;

use self::csr::Csrs;
use self::fpr::Fpr;
use self::gpr::Gpr;

/// All architectural registers of one hart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    /// Integer registers.
    pub gpr: Gpr,
    /// Floating-point registers.
    pub fpr: Fpr,
    /// Control and status registers.
    pub csrs: Csrs,
}

impl RegisterFile {
    /// Creates a register file with every register cleared.
    pub fn new() -> Self {
        Self::default()
    }
}
