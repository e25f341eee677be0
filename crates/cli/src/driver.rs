//! Run orchestration.
//!
//! The driver sequences one run against an [`Engine`]:
//! 1. **Construction:** The engine is built from the run's [`SimConfig`] before any other call.
//! 2. **Assembly:** Warnings are printed; failure sets the assemble exit code and stops the run.
//! 3. **Setup:** Always performed after a successful assembly so that dumps see the loaded image.
//! 4. **Simulation:** Repeated until the program ends, with a post-mortem report at every breakpoint.

use std::path::PathBuf;

use rars_engine::{Engine, SimConfig, SimulationError, TerminationReason};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::RunConfiguration;
use crate::console::Console;
use crate::report::PostMortemReporter;

/// A violated driver invariant.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    /// `simulate` returned a reason the driver has no handling for.
    #[error("internal error: simulation returned unexpected termination reason {0:?}")]
    UnexpectedTermination(TerminationReason),
}

/// Result of one run.
#[derive(Debug)]
pub struct RunOutcome<E> {
    /// The engine, if any files were given; kept after assembly failure so dumps still run.
    pub program: Option<E>,
    /// Process exit code.
    pub exit_code: i32,
    /// Set when the run ended on a driver invariant violation.
    pub defect: Option<DriverError>,
}

/// Assembles and simulates one program.
#[derive(Debug)]
pub struct ExecutionDriver<'a> {
    config: &'a RunConfiguration,
    console: &'a mut Console,
}

impl<'a> ExecutionDriver<'a> {
    /// Creates a driver for `config` that prints on `console`.
    pub const fn new(config: &'a RunConfiguration, console: &'a mut Console) -> Self {
        Self { config, console }
    }

    /// Runs the program made of `files`.
    ///
    /// # Arguments
    ///
    /// * `files` - Resolved source files; the first is the main file.
    /// * `make_engine` - Builds the engine from the run's settings.
    ///
    /// # Returns
    ///
    /// The engine and the exit code. An empty file list is a no-op with exit code 0.
    pub fn run<E: Engine>(
        &mut self,
        files: &[PathBuf],
        make_engine: impl FnOnce(SimConfig) -> E,
    ) -> RunOutcome<E> {
        let mut outcome = RunOutcome {
            program: None,
            exit_code: 0,
            defect: None,
        };
        let Some(main_file) = files.first() else {
            return outcome;
        };

        let sim_config = self.config.sim_config();
        debug!(?sim_config, files = files.len(), "starting run");
        let mut engine = make_engine(sim_config);

        if self.config.debug {
            self.console.println("---  TOKENIZING & ASSEMBLY BEGINS  ---");
        }
        match engine.assemble(files, main_file) {
            Ok(warnings) => {
                if warnings.warnings_occurred() {
                    self.console.println(warnings.generate_warning_report());
                }
            }
            Err(e) => {
                debug!(errors = e.0.error_count(), "assembly failed");
                outcome.exit_code = self.config.assemble_error_exit_code;
                self.console.println(e.0.generate_error_and_warning_report());
                self.console.println("Processing terminated due to errors.");
                outcome.program = Some(engine);
                return outcome;
            }
        }

        let setup = engine.setup(self.config.program_arguments.as_deref(), None);
        if !self.config.assemble_only {
            if self.config.debug {
                self.console.println("--------  SIMULATION BEGINS  -----------");
            }
            match setup.and_then(|()| self.simulate(&mut engine)) {
                Ok(Ok(())) => {}
                Ok(Err(defect)) => {
                    error!(%defect, "driver invariant violated");
                    self.console.println(defect.to_string());
                    outcome.defect = Some(defect);
                }
                Err(e) => {
                    debug!(pc = e.pc, "simulation failed");
                    outcome.exit_code = self.config.simulate_error_exit_code;
                    self.console.println(e.generate_report());
                    self.console.println("Simulation terminated due to errors.");
                }
            }
            PostMortemReporter::new(self.config).report(&engine, self.console);
        } else if let Err(e) = setup {
            outcome.exit_code = self.config.simulate_error_exit_code;
            self.console.println(e.generate_report());
        }

        if self.config.debug {
            self.console.println("\n--------  ALL PROCESSING COMPLETE  -----------");
        }
        outcome.program = Some(engine);
        outcome
    }

    /// Simulates until a terminal reason, reporting at each breakpoint.
    fn simulate<E: Engine>(&mut self, engine: &mut E) -> Result<Result<(), DriverError>, SimulationError> {
        loop {
            match engine.simulate()? {
                TerminationReason::MaxSteps => {
                    self.console.println(format!(
                        "\nProgram terminated when maximum step limit {} reached.",
                        self.config.max_steps
                    ));
                    return Ok(Ok(()));
                }
                TerminationReason::CliffTermination => {
                    self.console.println("\nProgram terminated by dropping off the bottom.");
                    return Ok(Ok(()));
                }
                TerminationReason::NormalTermination => {
                    self.console.println("\nProgram terminated by calling exit");
                    return Ok(Ok(()));
                }
                TerminationReason::Breakpoint => {
                    debug!("breakpoint");
                    PostMortemReporter::new(self.config).report(&*engine, self.console);
                }
                reason @ TerminationReason::Stopped => {
                    return Ok(Err(DriverError::UnexpectedTermination(reason)));
                }
            }
        }
    }
}
