//! Command-line argument parsing.
//!
//! This module turns the raw token list into a [`RunConfiguration`]. It performs:
//! 1. **Pre-scans:** `nc` suppresses the banner; `me` was already applied when the [`Console`] was chosen.
//! 2. **Usage:** A lone `h` prints the usage text and stops.
//! 3. **Classification:** Each token is offered to an ordered rule table; the first rule that claims it wins.
//!
//! Parsing never fails outright. Malformed tokens are printed, recorded, and mark
//! the run invalid, and parsing continues so that every problem surfaces in one pass.

use std::path::{Path, PathBuf};

use rars_engine::MemoryConfiguration;
use rars_engine::common::number::decode_word;
use rars_engine::isa::abi::{csr_address, fpr_index, gpr_index};
use rars_engine::memory::SEGMENT_NAMES;
use tracing::trace;

use crate::config::{AddressRange, DisplayFormat, DumpRequest, RangeParse, RunConfiguration};
use crate::console::Console;
use crate::dump::DumpFormat;

/// Years shown in the banner.
pub const COPYRIGHT_YEARS: &str = "2003-2026";

/// Result of parsing the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Usage was printed; nothing should run.
    ShowUsage,
    /// The tokens were classified.
    Parsed {
        /// The resulting configuration.
        config: RunConfiguration,
        /// False if any token was rejected.
        valid: bool,
        /// Every diagnostic printed while parsing, in order.
        diagnostics: Vec<String>,
    },
}

/// Parser for the RARS-style command line.
#[derive(Debug)]
pub struct ArgumentParser<'c> {
    console: &'c mut Console,
}

impl<'c> ArgumentParser<'c> {
    /// Creates a parser that prints banners and diagnostics on `console`.
    pub const fn new(console: &'c mut Console) -> Self {
        Self { console }
    }

    /// Parses `tokens`.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Command-line arguments, without the program name.
    ///
    /// # Returns
    ///
    /// [`ParseOutcome::ShowUsage`] for a lone `h`, otherwise the parsed configuration and its validity.
    pub fn parse<S: AsRef<str>>(self, tokens: &[S]) -> ParseOutcome {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();

        if !tokens.iter().any(|token| token.eq_ignore_ascii_case("nc")) {
            self.console.println(banner());
        }
        if tokens.len() == 1 && tokens[0].eq_ignore_ascii_case("h") {
            self.console.print(usage());
            return ParseOutcome::ShowUsage;
        }

        let mut state = ParseState {
            config: RunConfiguration::default(),
            valid: true,
            in_program_arguments: false,
            diagnostics: Vec::new(),
            console: self.console,
        };
        let mut idx = 0;
        while idx < tokens.len() {
            let token = Token {
                text: tokens[idx],
                lower: tokens[idx].to_ascii_lowercase(),
                following: &tokens[idx + 1..],
            };
            let mut consumed = 0;
            for (name, rule) in RULES {
                if let Verdict::Claimed(extra) = rule(&mut state, &token) {
                    trace!(rule = name, token = token.text, "token classified");
                    consumed = extra;
                    break;
                }
            }
            idx += 1 + consumed;
        }

        ParseOutcome::Parsed {
            config: state.config,
            valid: state.valid,
            diagnostics: state.diagnostics,
        }
    }
}

/// The copyright banner printed before any other output.
pub fn banner() -> String {
    format!(
        "RARS {}  Copyright {COPYRIGHT_YEARS} {}\n",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    )
}

/// The usage text printed for `h`.
pub fn usage() -> String {
    let segments = SEGMENT_NAMES.join(", ");
    let formats = DumpFormat::ALL.map(DumpFormat::descriptor).join(", ");
    let configs = MemoryConfiguration::ALL.map(MemoryConfiguration::name).join(", ");
    format!(
        "\
Usage:  rars  [options] filename [additional filenames]
  Valid options (not case sensitive, separate by spaces) are:
      a  -- assemble only, do not simulate
  ae<n>  -- terminate with integer exit code <n> if an assemble error occurs.
  ascii  -- display memory or register contents interpreted as ASCII codes.
      b  -- brief - do not display register/memory address along with contents
      d  -- display debugging statements
    dec  -- display memory or register contents in decimal.
   dump <segment> <format> <file> -- memory dump of specified memory segment
            in specified format to specified file.  Option may be repeated.
            Dump occurs at the end of simulation unless 'a' option is used.
            Segment and format are case-sensitive and possible values are:
            <segment> = {segments}, or a range like 0x400000-0x10000000
            <format> = {formats}
      g  -- force GUI mode
      h  -- display this help.  Use by itself with no filename.
    hex  -- display memory or register contents in hexadecimal (default)
     ic  -- display count of basic instructions 'executed'
     mc <config>  -- set memory configuration.  Argument <config> is
            case-sensitive and possible values are: {configs}
     me  -- display messages to standard err instead of standard out.
            Can separate messages from program output using redirection
     nc  -- do not display copyright notice (for cleaner redirected/piped output).
     np  -- use of pseudo instructions and formats not permitted
      p  -- Project mode - assemble all files in the same directory as given file.
  se<n>  -- terminate with integer exit code <n> if a simulation (run) error occurs.
     sm  -- start execution at statement with global label main, if defined
    smc  -- Self Modifying Code - Program can write and branch to either text or data segment
   rv64  -- Enables 64 bit assembly and executables
    <n>  -- where <n> is an integer maximum count of steps to simulate.
            If 0, negative or not specified, there is no maximum.
 x<reg>  -- where <reg> is number or name (e.g. 5, t3, f10) of register whose
            content to display at end of run.  Option may be repeated.
<reg_name>  -- where <reg_name> is name (e.g. t3, f10) of register whose
            content to display at end of run.  Option may be repeated.
<m>-<n>  -- memory address range from <m> to <n> whose contents to
            display at end of run. <m> and <n> may be hex or decimal,
            must be on word boundary, <m> <= <n>.  Option may be repeated.
     pa  -- Program Arguments follow in a space-separated list.  This
            option must be placed AFTER ALL FILE NAMES, because everything
            that follows it is interpreted as a program argument to be
            made available to the program at runtime.
If more than one filename is listed, the first is assumed to be the main
unless the global statement label 'main' is defined in one of the files.
"
    )
}

struct ParseState<'c> {
    config: RunConfiguration,
    valid: bool,
    in_program_arguments: bool,
    diagnostics: Vec<String>,
    console: &'c mut Console,
}

impl ParseState<'_> {
    /// Prints a diagnostic and marks the run invalid.
    fn reject(&mut self, message: String) {
        self.valid = false;
        self.note(message);
    }

    /// Prints a diagnostic without affecting validity.
    fn note(&mut self, message: String) {
        self.console.println(&message);
        self.diagnostics.push(message);
    }
}

struct Token<'a> {
    text: &'a str,
    lower: String,
    following: &'a [&'a str],
}

enum Verdict {
    Pass,
    /// The token is handled, along with this many following tokens.
    Claimed(usize),
}

type Rule = fn(&mut ParseState<'_>, &Token<'_>) -> Verdict;

/// Classification rules in precedence order.
const RULES: &[(&str, Rule)] = &[
    ("program-argument", collect_program_argument),
    ("pa", program_argument_marker),
    ("pre-scanned", pre_scanned_switch),
    ("dump", dump_request),
    ("mc", memory_configuration),
    ("exit-code", exit_code),
    ("flag", flag),
    ("file", existing_file),
    ("sigil-register", sigil_register),
    ("register", bare_register),
    ("max-steps", max_steps),
    ("address-range", address_range),
    ("unrecognized", unrecognized),
];

/// Once `pa` has been seen, every token is a program argument, whatever it looks like.
fn collect_program_argument(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    if !state.in_program_arguments {
        return Verdict::Pass;
    }
    state
        .config
        .program_arguments
        .get_or_insert_with(Vec::new)
        .push(token.text.to_string());
    Verdict::Claimed(0)
}

fn program_argument_marker(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    if token.lower != "pa" {
        return Verdict::Pass;
    }
    state.in_program_arguments = true;
    if state.config.program_arguments.is_none() {
        state.config.program_arguments = Some(Vec::new());
    }
    Verdict::Claimed(0)
}

fn pre_scanned_switch(_: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    match token.lower.as_str() {
        "me" | "nc" => Verdict::Claimed(0),
        _ => Verdict::Pass,
    }
}

fn dump_request(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    if token.lower != "dump" {
        return Verdict::Pass;
    }
    let [segment, format, path, ..] = token.following else {
        state.reject("Dump command line argument requires a segment, format and file name.".to_string());
        return Verdict::Claimed(0);
    };
    state.config.dump_requests.push(DumpRequest {
        segment: (*segment).to_string(),
        format: (*format).to_string(),
        path: PathBuf::from(path),
    });
    Verdict::Claimed(3)
}

fn memory_configuration(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    if token.lower != "mc" {
        return Verdict::Pass;
    }
    let Some(&name) = token.following.first() else {
        state.reject("Memory configuration argument requires a configuration name.".to_string());
        return Verdict::Claimed(0);
    };
    match MemoryConfiguration::from_name(name) {
        Some(config) => state.config.memory_configuration = Some(config),
        None => state.reject(format!("Invalid memory configuration: {name}")),
    }
    Verdict::Claimed(1)
}

fn exit_code(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    let target = if token.lower.starts_with("ae") {
        &mut state.config.assemble_error_exit_code
    } else if token.lower.starts_with("se") {
        &mut state.config.simulate_error_exit_code
    } else {
        return Verdict::Pass;
    };
    match decode_word(&token.text[2..]) {
        Some(code) => {
            *target = code;
            Verdict::Claimed(0)
        }
        None => Verdict::Pass,
    }
}

fn flag(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    let config = &mut state.config;
    match token.lower.as_str() {
        "d" | "ad" | "da" => config.debug = true,
        "a" => config.assemble_only = true,
        "p" => config.project_mode = true,
        "dec" => config.display_format = DisplayFormat::Decimal,
        "hex" => config.display_format = DisplayFormat::Hexadecimal,
        "ascii" => config.display_format = DisplayFormat::Ascii,
        "g" => config.gui = true,
        "b" => config.verbose = false,
        "np" | "ne" => config.pseudo_instructions_allowed = false,
        "we" => config.warnings_are_errors = true,
        "sm" => config.start_at_main = true,
        "smc" => config.self_modifying_code = true,
        "rv64" => config.rv64_enabled = true,
        "ic" => config.count_instructions = true,
        _ => return Verdict::Pass,
    }
    Verdict::Claimed(0)
}

fn existing_file(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    if !Path::new(token.text).exists() {
        return Verdict::Pass;
    }
    state.config.filenames.push(token.text.to_string());
    Verdict::Claimed(0)
}

/// Names starting with `x` are always claimed; an unknown one is reported but
/// does not invalidate the run.
fn sigil_register(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    if !token.text.starts_with('x') {
        return Verdict::Pass;
    }
    if gpr_index(token.text).is_some() || fpr_index(token.text).is_some() {
        state.config.register_display_list.push(token.text.to_string());
    } else {
        state.note(format!("Invalid Register Name: {}", token.text));
    }
    Verdict::Claimed(0)
}

fn bare_register(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    let known = gpr_index(token.text).is_some()
        || fpr_index(token.text).is_some()
        || csr_address(token.text).is_some();
    if !known {
        return Verdict::Pass;
    }
    state.config.register_display_list.push(token.text.to_string());
    Verdict::Claimed(0)
}

fn max_steps(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    match decode_word(token.text) {
        Some(steps) => {
            state.config.max_steps = steps;
            Verdict::Claimed(0)
        }
        None => Verdict::Pass,
    }
}

fn address_range(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    match AddressRange::parse(token.text) {
        RangeParse::NotARange => return Verdict::Pass,
        RangeParse::Invalid => state.reject(format!("Invalid/unaligned address or invalid range: {}", token.text)),
        RangeParse::Valid(range) => state.config.memory_display_list.push(range),
    }
    Verdict::Claimed(0)
}

fn unrecognized(state: &mut ParseState<'_>, token: &Token<'_>) -> Verdict {
    state.reject(format!("Invalid Command Argument: {}", token.text));
    Verdict::Claimed(0)
}
