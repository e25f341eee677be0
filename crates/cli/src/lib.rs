//! RARS-compatible command-line driver.
//!
//! This crate turns a RARS-style token list into a run against an [`Engine`](rars_engine::Engine). It provides:
//! 1. **Argument Parsing:** An ordered rule table that classifies every token into a [`RunConfiguration`].
//! 2. **File Resolution:** Single-file and project-mode expansion of the named sources.
//! 3. **Execution:** Assembly, setup and the simulate loop, with configurable exit codes.
//! 4. **Reporting:** Post-mortem register and memory displays, and memory dumps to files.

/// Top-level command-line flow.
pub mod app;

/// Command-line argument parsing.
pub mod args;

/// Run configuration.
pub mod config;

/// Message output stream.
pub mod console;

/// Run orchestration.
pub mod driver;

/// Memory dumps.
pub mod dump;

/// Input file resolution.
pub mod files;

/// Post-mortem reports.
pub mod report;

pub use crate::app::{Invocation, run_command_line};
pub use crate::args::{ArgumentParser, ParseOutcome};
pub use crate::config::{AddressRange, DisplayFormat, DumpRequest, RunConfiguration};
pub use crate::console::{Console, Stream};
pub use crate::driver::{DriverError, ExecutionDriver, RunOutcome};
pub use crate::dump::{DumpError, DumpFormat, MemoryDumpWriter};
pub use crate::report::PostMortemReporter;
