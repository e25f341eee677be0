//! RARS-compatible RISC-V assembler and simulator CLI.
//!
//! This binary accepts the classic RARS option grammar. It performs:
//! 1. **Logging Setup:** A `tracing` subscriber on standard error, filtered by `RUST_LOG` and raised by `d`.
//! 2. **Parsing:** Every token is classified; diagnostics go to the stream selected by `me`.
//! 3. **Running:** Assembly, simulation, post-mortem reports and memory dumps.

use std::io;
use std::process;

use clap::Parser;
use rars_cli::app;
use rars_cli::{Console, Stream};
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, reload};

#[derive(Parser, Debug)]
#[command(
    name = "rars",
    author,
    version,
    about = "RARS-compatible RISC-V assembler and simulator",
    long_about = "Assemble and simulate RISC-V programs from the command line.\n\nOptions use the RARS grammar and are not case sensitive; run `rars h` for the full list.\n\nExamples:\n  rars hello.s\n  rars nc dec t0 0x10010000-0x10010010 prog.s\n  rars a dump .text HexText text.hex prog.s\n  rars prog.s pa first second"
)]
struct Cli {
    /// RARS options, file names and program arguments.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (filter, filter_handle) = reload::Layer::new(filter);
    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
    {
        eprintln!("rars: logging unavailable: {e}");
    }

    let mut console = Console::new(Stream::select(&cli.tokens));
    let code = app::run_command_line(&cli.tokens, &mut console, |config| {
        if config.debug
            && let Err(e) = filter_handle.modify(|filter| *filter = EnvFilter::new("debug"))
        {
            warn!(error = %e, "could not raise log level");
        }
    });
    process::exit(code);
}
