//! Diagnostics and error types.
//!
//! This module defines how the engine reports problems. It provides:
//! 1. **Assembly Diagnostics:** File/line messages of warning or error severity, gathered in an [`ErrorList`].
//! 2. **Simulation Errors:** Runtime faults raised while executing a program.
//! 3. **Address Errors:** Misaligned or out-of-range memory accesses.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Severity of an assembler diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The program still assembles.
    Warning,
    /// The program cannot be assembled.
    Error,
}

/// A single assembler diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorMessage {
    /// Whether this message is a warning or an error.
    pub severity: Severity,
    /// Source file the message refers to, if any.
    pub file: Option<PathBuf>,
    /// One-based source line, or 0 when the message is not tied to a line.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl ErrorMessage {
    /// Creates an error tied to a source line.
    pub fn error(file: &Path, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: Some(file.to_path_buf()),
            line,
            message: message.into(),
        }
    }

    /// Creates a warning tied to a source line.
    pub fn warning(file: &Path, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            file: Some(file.to_path_buf()),
            line,
            message: message.into(),
        }
    }

    /// Creates an error that is not tied to any file.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: None,
            line: 0,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.severity {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        match &self.file {
            Some(file) if self.line > 0 => {
                write!(f, "{kind} in {} line {}: {}", file.display(), self.line, self.message)
            }
            Some(file) => write!(f, "{kind} in {}: {}", file.display(), self.message),
            None => write!(f, "{kind}: {}", self.message),
        }
    }
}

/// Ordered collection of assembler diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorList {
    messages: Vec<ErrorMessage>,
}

impl ErrorList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn add(&mut self, message: ErrorMessage) {
        self.messages.push(message);
    }

    /// Appends every diagnostic of `other`.
    pub fn extend(&mut self, other: Self) {
        self.messages.extend(other.messages);
    }

    /// All diagnostics in the order they were reported.
    pub fn messages(&self) -> &[ErrorMessage] {
        &self.messages
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning-severity diagnostics.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns true if at least one error was reported.
    pub fn errors_occurred(&self) -> bool {
        self.error_count() > 0
    }

    /// Returns true if at least one warning was reported.
    pub fn warnings_occurred(&self) -> bool {
        self.warning_count() > 0
    }

    /// Turns every warning into an error.
    pub fn promote_warnings(&mut self) {
        for message in &mut self.messages {
            message.severity = Severity::Error;
        }
    }

    /// Renders the warnings, one per line.
    pub fn generate_warning_report(&self) -> String {
        self.report(Some(Severity::Warning))
    }

    /// Renders the errors, one per line.
    pub fn generate_error_report(&self) -> String {
        self.report(Some(Severity::Error))
    }

    /// Renders every diagnostic followed by a summary line.
    pub fn generate_error_and_warning_report(&self) -> String {
        let mut report = self.report(None);
        report.push_str(&format!(
            "Assembly failed with {} error(s) and {} warning(s).\n",
            self.error_count(),
            self.warning_count()
        ));
        report
    }

    fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|m| m.severity == severity).count()
    }

    fn report(&self, severity: Option<Severity>) -> String {
        self.messages
            .iter()
            .filter(|m| severity.is_none_or(|s| m.severity == s))
            .map(|m| format!("{m}\n"))
            .collect()
    }
}

/// Assembly failed; the list holds at least one error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("assembly failed with {} error(s)", .0.error_count())]
pub struct AssemblyError(pub ErrorList);

/// A runtime fault that stops the simulation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Runtime exception at 0x{pc:08x}: {message}")]
pub struct SimulationError {
    /// Address of the faulting instruction.
    pub pc: u32,
    /// Description of the fault.
    pub message: String,
}

impl SimulationError {
    /// Creates a fault at `pc`.
    pub fn new(pc: u32, message: impl Into<String>) -> Self {
        Self {
            pc,
            message: message.into(),
        }
    }

    /// Renders the fault as printed after a failed run.
    pub fn generate_report(&self) -> String {
        format!("Error: {self}\n")
    }
}

/// A memory access that the address space rejects.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The address is not a multiple of the access size.
    #[error("address 0x{address:08x} is not aligned on a {alignment}-byte boundary")]
    Misaligned {
        /// Faulting address.
        address: u32,
        /// Required alignment in bytes.
        alignment: u32,
    },
    /// The address lies outside every mapped segment.
    #[error("address 0x{address:08x} is out of range")]
    OutOfRange {
        /// Faulting address.
        address: u32,
    },
}

impl AddressError {
    /// The faulting address.
    pub const fn address(&self) -> u32 {
        match *self {
            Self::Misaligned { address, .. } | Self::OutOfRange { address } => address,
        }
    }
}
