//! Shared building blocks for the engine.
//!
//! 1. **Constants:** Word size and the recognized source file extensions.
//! 2. **Errors:** Assembly message lists, simulation errors and address faults.
//! 3. **Numbers:** Literal parsing shared by the assembler and the command line.

/// Architectural and toolchain constants.
pub mod constants;

/// Error and diagnostic types.
pub mod error;

/// Integer literal parsing.
pub mod number;

pub use error::{AddressError, AssemblyError, ErrorList, ErrorMessage, Severity, SimulationError};
