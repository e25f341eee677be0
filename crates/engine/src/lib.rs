//! RISC-V assembler and functional simulator.
//!
//! This crate is the engine behind the `rars` command-line driver. It provides:
//! 1. **Configuration:** [`SimConfig`] and the named memory layouts.
//! 2. **Assembly:** A two-pass assembler with file-local and global labels, data directives and pseudo-instructions.
//! 3. **Simulation:** Functional execution of RV32I/RV64I with the M extension, CSR access and console services.
//! 4. **Engine Boundary:** The [`Engine`] trait and its [`Program`] implementation.

/// The engine boundary.
pub mod api;

/// Two-pass assembler.
pub mod asm;

/// Shared constants, errors and literal parsing.
pub mod common;

/// Engine configuration.
pub mod config;

/// Architectural register state.
pub mod core;

/// Instruction set definitions.
pub mod isa;

/// Sparse memory model.
pub mod memory;

/// The reference engine.
pub mod program;

/// Instruction execution.
pub mod sim;

pub use crate::api::{Engine, TerminationReason};
pub use crate::common::error::{AddressError, AssemblyError, ErrorList, ErrorMessage, SimulationError};
pub use crate::config::{MemoryConfiguration, MemoryLayout, SimConfig};
pub use crate::memory::Memory;
pub use crate::program::Program;
