//! Run configuration.
//!
//! This module defines the data model produced by argument parsing. It provides:
//! 1. **RunConfiguration:** Every setting of one command-line run.
//! 2. **Display Formats:** How register and memory words are rendered.
//! 3. **Address Ranges and Dump Requests:** The validated `m-n` ranges and `dump` triples.
//!
//! The configuration is built once by the parser and only read afterwards.

use std::path::PathBuf;

use rars_engine::common::number::decode_word;
use rars_engine::{Memory, MemoryConfiguration, SimConfig};

/// Rendering of register and memory words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayFormat {
    /// Signed decimal.
    Decimal,
    /// `0x` followed by eight hex digits.
    #[default]
    Hexadecimal,
    /// Four two-character cells, most significant byte first.
    Ascii,
}

impl DisplayFormat {
    /// Renders a 32-bit word.
    pub fn format_word(self, value: i32) -> String {
        match self {
            Self::Decimal => value.to_string(),
            Self::Hexadecimal => hex_word(value),
            Self::Ascii => ascii_word(value),
        }
    }

    /// Renders a 64-bit register value.
    pub fn format_double_word(self, value: i64) -> String {
        match self {
            Self::Decimal => value.to_string(),
            Self::Hexadecimal => format!("0x{:016x}", value as u64),
            Self::Ascii => ascii_cells(&value.to_be_bytes()),
        }
    }
}

/// Renders `value` as `0x` and eight lowercase hex digits.
pub fn hex_word(value: i32) -> String {
    format!("0x{:08x}", value as u32)
}

/// Renders the four bytes of `value` as character cells.
///
/// Printable bytes appear as a space and the character, a few control bytes as
/// their escape, everything else as a space and a dot.
pub fn ascii_word(value: i32) -> String {
    ascii_cells(&value.to_be_bytes())
}

fn ascii_cells(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| match byte {
            0 => "\\0".to_string(),
            b'\t' => "\\t".to_string(),
            b'\n' => "\\n".to_string(),
            b'\r' => "\\r".to_string(),
            0x20..=0x7e => format!(" {}", byte as char),
            _ => " .".to_string(),
        })
        .collect()
}

/// An inclusive, word-aligned memory range with `low <= high`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressRange {
    /// First word address.
    pub low: i32,
    /// Last word address.
    pub high: i32,
}

/// Outcome of reading a token as an address range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeParse {
    /// The token does not have the `m-n` shape.
    NotARange,
    /// The token has the shape but a half does not decode, is unaligned, or `m > n`.
    Invalid,
    /// A valid range.
    Valid(AddressRange),
}

impl AddressRange {
    /// Reads `<low>-<high>`, split at the first `-`.
    ///
    /// The separator must be neither the first nor the last character. Both halves
    /// use the word literal grammar, and the comparison is signed.
    pub fn parse(text: &str) -> RangeParse {
        let Some(sep) = text.find('-') else {
            return RangeParse::NotARange;
        };
        if sep == 0 || sep + 1 >= text.len() {
            return RangeParse::NotARange;
        }
        let (Some(low), Some(high)) = (decode_word(&text[..sep]), decode_word(&text[sep + 1..])) else {
            return RangeParse::Invalid;
        };
        if low > high || !Memory::word_aligned(low as u32) || !Memory::word_aligned(high as u32) {
            return RangeParse::Invalid;
        }
        RangeParse::Valid(Self { low, high })
    }
}

/// One `dump <segment> <format> <file>` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpRequest {
    /// Segment name or `m-n` range.
    pub segment: String,
    /// Dump format descriptor.
    pub format: String,
    /// Output file.
    pub path: PathBuf,
}

/// Settings of one command-line run.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Files and directories named on the command line, in order.
    pub filenames: Vec<String>,
    /// Arguments for the simulated program; `Some` once `pa` has been seen.
    pub program_arguments: Option<Vec<String>>,
    /// Step limit per simulate call; zero or negative means unbounded.
    pub max_steps: i32,
    /// Accept pseudo-instructions.
    pub pseudo_instructions_allowed: bool,
    /// Treat assembler warnings as errors.
    pub warnings_are_errors: bool,
    /// Start execution at the global `main` label.
    pub start_at_main: bool,
    /// Allow self-modifying code.
    pub self_modifying_code: bool,
    /// Assemble and simulate in 64-bit mode.
    pub rv64_enabled: bool,
    /// Skip the simulate step.
    pub assemble_only: bool,
    /// Assemble every source file in the main file's directory.
    pub project_mode: bool,
    /// Rendering of reported values.
    pub display_format: DisplayFormat,
    /// Print names and addresses alongside values.
    pub verbose: bool,
    /// Report the number of executed instructions.
    pub count_instructions: bool,
    /// Registers to report, in order, duplicates kept.
    pub register_display_list: Vec<String>,
    /// Memory ranges to report, in order.
    pub memory_display_list: Vec<AddressRange>,
    /// Memory dumps to write after the run.
    pub dump_requests: Vec<DumpRequest>,
    /// Selected memory layout, if one was given.
    pub memory_configuration: Option<MemoryConfiguration>,
    /// Process exit code when assembly fails.
    pub assemble_error_exit_code: i32,
    /// Process exit code when simulation fails.
    pub simulate_error_exit_code: i32,
    /// Print phase banners.
    pub debug: bool,
    /// The graphical front end was requested.
    pub gui: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            filenames: Vec::new(),
            program_arguments: None,
            max_steps: 0,
            pseudo_instructions_allowed: true,
            warnings_are_errors: false,
            start_at_main: false,
            self_modifying_code: false,
            rv64_enabled: false,
            assemble_only: false,
            project_mode: false,
            display_format: DisplayFormat::Hexadecimal,
            verbose: true,
            count_instructions: false,
            register_display_list: Vec::new(),
            memory_display_list: Vec::new(),
            dump_requests: Vec::new(),
            memory_configuration: None,
            assemble_error_exit_code: 0,
            simulate_error_exit_code: 0,
            debug: false,
            gui: false,
        }
    }
}

impl RunConfiguration {
    /// The engine settings for this run.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            rv64: self.rv64_enabled,
            memory: self.memory_configuration.unwrap_or_default(),
            pseudo_instructions: self.pseudo_instructions_allowed,
            warnings_are_errors: self.warnings_are_errors,
            start_at_main: self.start_at_main,
            self_modifying_code: self.self_modifying_code,
            max_steps: self.max_steps,
        }
    }
}
