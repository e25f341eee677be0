//! Top-level command-line flow: parse, run, report, dump.

use rars_engine::{Engine, Program, SimConfig};
use tracing::debug;

use crate::args::{ArgumentParser, ParseOutcome};
use crate::config::RunConfiguration;
use crate::console::Console;
use crate::driver::ExecutionDriver;
use crate::dump::MemoryDumpWriter;
use crate::files;

/// Printed when the graphical front end is requested.
pub const GUI_UNAVAILABLE: &str = "The graphical front end is not part of this build. \
Run with one or more file names to assemble and simulate from the command line, or use h for help.";

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// The graphical front end; nothing runs.
    Gui,
    /// Usage was printed; nothing runs.
    Usage,
    /// At least one token was rejected; nothing runs.
    Invalid,
    /// A command-line run.
    Run(Box<RunConfiguration>),
}

/// Classifies `tokens`, printing the banner and any diagnostics on `console`.
pub fn prepare<S: AsRef<str>>(tokens: &[S], console: &mut Console) -> Invocation {
    if tokens.is_empty() {
        return Invocation::Gui;
    }
    match ArgumentParser::new(console).parse(tokens) {
        ParseOutcome::ShowUsage => Invocation::Usage,
        ParseOutcome::Parsed { valid: false, diagnostics, .. } => {
            debug!(count = diagnostics.len(), "rejected command line");
            Invocation::Invalid
        }
        ParseOutcome::Parsed { config, .. } if config.gui => Invocation::Gui,
        ParseOutcome::Parsed { config, .. } => Invocation::Run(Box::new(config)),
    }
}

/// Resolves, runs and dumps one configuration.
///
/// # Returns
///
/// The process exit code.
pub fn execute<E: Engine>(
    config: &RunConfiguration,
    console: &mut Console,
    make_engine: impl FnOnce(SimConfig) -> E,
) -> i32 {
    let files = match files::resolve(&config.filenames, config.project_mode) {
        Ok(files) => files,
        Err(e) => {
            console.println(format!("Error while resolving input files: {e}"));
            return config.assemble_error_exit_code;
        }
    };
    let outcome = ExecutionDriver::new(config, console).run(&files, make_engine);
    if let Some(program) = &outcome.program {
        MemoryDumpWriter::new(console).write_all(&config.dump_requests, program.memory());
    }
    console.flush();
    outcome.exit_code
}

/// Runs a whole command line against the reference engine.
///
/// # Arguments
///
/// * `tokens` - Command-line arguments, without the program name.
/// * `console` - Stream for banners, diagnostics and reports.
/// * `before_run` - Called with the parsed configuration just before a run starts.
///
/// # Returns
///
/// The process exit code; invalid arguments, usage and the GUI notice all exit with 0.
pub fn run_command_line<S: AsRef<str>>(
    tokens: &[S],
    console: &mut Console,
    before_run: impl FnOnce(&RunConfiguration),
) -> i32 {
    let code = match prepare(tokens, console) {
        Invocation::Gui => {
            console.println(GUI_UNAVAILABLE);
            0
        }
        Invocation::Usage | Invocation::Invalid => 0,
        Invocation::Run(config) => {
            before_run(&config);
            execute(&config, console, Program::new)
        }
    };
    console.flush();
    code
}
