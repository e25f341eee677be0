//! The engine boundary consumed by the command-line driver.

use std::path::{Path, PathBuf};

use crate::common::error::{AssemblyError, ErrorList, SimulationError};
use crate::memory::Memory;

/// Why a call to [`Engine::simulate`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// An `ebreak` was executed; simulation can resume.
    Breakpoint,
    /// The configured step limit was reached.
    MaxSteps,
    /// Execution reached a text word that was never written.
    CliffTermination,
    /// The program called an exit service.
    NormalTermination,
    /// The stop flag was raised from outside the run.
    Stopped,
}

/// Assemble/simulate engine.
///
/// Implementations own their configuration; it is fixed when the engine is constructed.
pub trait Engine {
    /// Assembles `files`, starting with `main_file`.
    ///
    /// # Returns
    ///
    /// The warnings on success, or every diagnostic when assembly failed.
    fn assemble(&mut self, files: &[PathBuf], main_file: &Path) -> Result<ErrorList, AssemblyError>;

    /// Prepares the assembled program to run.
    ///
    /// # Arguments
    ///
    /// * `program_arguments` - Strings placed on the stack as `argc`/`argv`, if any.
    /// * `stdin` - Text served to the input services instead of the process standard input.
    fn setup(&mut self, program_arguments: Option<&[String]>, stdin: Option<&str>) -> Result<(), SimulationError>;

    /// Runs until the program stops for any reason.
    fn simulate(&mut self) -> Result<TerminationReason, SimulationError>;

    /// Value of a register by name (integer, floating-point raw bits, or CSR).
    fn register_value(&self, name: &str) -> Option<i64>;

    /// The program's memory.
    fn memory(&self) -> &Memory;
}
