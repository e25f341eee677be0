//! Architectural state of the simulated hart.

/// Register files (integer, floating-point and control/status).
pub mod arch;

pub use self::arch::RegisterFile;
