//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the user-level CSR subset. It provides:
//! 1. **Address Definitions:** Constants and the name table used by the assembler and the register display.
//! 2. **Register Storage:** The `Csrs` struct holding the writable registers and the retired-instruction count.
//! 3. **Access Logic:** Reads and writes, rejecting unknown addresses and writes to the read-only counters.

use thiserror::Error;

/// User status register CSR address.
pub const USTATUS: u16 = 0x000;

/// Floating-point accrued exceptions CSR address.
pub const FFLAGS: u16 = 0x001;

/// Floating-point rounding mode CSR address.
pub const FRM: u16 = 0x002;

/// Floating-point control and status CSR address (`frm` and `fflags` combined).
pub const FCSR: u16 = 0x003;

/// User interrupt enable CSR address.
pub const UIE: u16 = 0x004;

/// User trap vector base CSR address.
pub const UTVEC: u16 = 0x005;

/// User scratch CSR address.
pub const USCRATCH: u16 = 0x040;

/// User exception program counter CSR address.
pub const UEPC: u16 = 0x041;

/// User trap cause CSR address.
pub const UCAUSE: u16 = 0x042;

/// User trap value CSR address.
pub const UTVAL: u16 = 0x043;

/// User interrupt pending CSR address.
pub const UIP: u16 = 0x044;

/// Cycle counter CSR address.
pub const CYCLE: u16 = 0xC00;

/// Timer CSR address.
pub const TIME: u16 = 0xC01;

/// Instructions-retired counter CSR address.
pub const INSTRET: u16 = 0xC02;

/// Upper 32 bits of `cycle`.
pub const CYCLEH: u16 = 0xC80;

/// Upper 32 bits of `time`.
pub const TIMEH: u16 = 0xC81;

/// Upper 32 bits of `instret`.
pub const INSTRETH: u16 = 0xC82;

/// CSR names and addresses, in display order.
pub const CSR_NAMES: [(&str, u16); 17] = [
    ("ustatus", USTATUS),
    ("fflags", FFLAGS),
    ("frm", FRM),
    ("fcsr", FCSR),
    ("uie", UIE),
    ("utvec", UTVEC),
    ("uscratch", USCRATCH),
    ("uepc", UEPC),
    ("ucause", UCAUSE),
    ("utval", UTVAL),
    ("uip", UIP),
    ("cycle", CYCLE),
    ("time", TIME),
    ("instret", INSTRET),
    ("cycleh", CYCLEH),
    ("timeh", TIMEH),
    ("instreth", INSTRETH),
];

/// A rejected CSR access.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CsrError {
    /// No register lives at this address.
    #[error("CSR 0x{0:03x} is not implemented")]
    Unknown(u16),
    /// The register cannot be written.
    #[error("CSR 0x{0:03x} is read-only")]
    ReadOnly(u16),
}

/// User-level CSR storage.
///
/// `cycle`, `time` and `instret` all report the number of retired instructions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Csrs {
    ustatus: u64,
    fflags: u64,
    frm: u64,
    uie: u64,
    utvec: u64,
    uscratch: u64,
    uepc: u64,
    ucause: u64,
    utval: u64,
    uip: u64,
    retired: u64,
}

impl Csrs {
    /// Reads a CSR.
    ///
    /// # Arguments
    ///
    /// * `addr` - CSR address.
    ///
    /// # Returns
    ///
    /// The register value, or `CsrError::Unknown` for an unimplemented address.
    pub const fn read(&self, addr: u16) -> Result<u64, CsrError> {
        Ok(match addr {
            USTATUS => self.ustatus,
            FFLAGS => self.fflags,
            FRM => self.frm,
            FCSR => (self.frm << 5) | self.fflags,
            UIE => self.uie,
            UTVEC => self.utvec,
            USCRATCH => self.uscratch,
            UEPC => self.uepc,
            UCAUSE => self.ucause,
            UTVAL => self.utval,
            UIP => self.uip,
            CYCLE | TIME | INSTRET => self.retired,
            CYCLEH | TIMEH | INSTRETH => self.retired >> 32,
            _ => return Err(CsrError::Unknown(addr)),
        })
    }

    /// Writes a CSR.
    pub const fn write(&mut self, addr: u16, val: u64) -> Result<(), CsrError> {
        match addr {
            USTATUS => self.ustatus = val,
            FFLAGS => self.fflags = val & 0x1f,
            FRM => self.frm = val & 0x7,
            FCSR => {
                self.fflags = val & 0x1f;
                self.frm = (val >> 5) & 0x7;
            }
            UIE => self.uie = val,
            UTVEC => self.utvec = val,
            USCRATCH => self.uscratch = val,
            UEPC => self.uepc = val,
            UCAUSE => self.ucause = val,
            UTVAL => self.utval = val,
            UIP => self.uip = val,
            CYCLE | TIME | INSTRET | CYCLEH | TIMEH | INSTRETH => return Err(CsrError::ReadOnly(addr)),
            _ => return Err(CsrError::Unknown(addr)),
        }
        Ok(())
    }

    /// Counts one retired instruction.
    pub const fn retire(&mut self) {
        self.retired = self.retired.wrapping_add(1);
    }

    /// Number of retired instructions.
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    /// Clears every CSR and the retired-instruction count.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
