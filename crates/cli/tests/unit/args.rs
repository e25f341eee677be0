//! # Argument Parser Tests
//!
//! Verifies the banner and usage handling, each classification rule in
//! precedence order, the exact diagnostics, and which mistakes invalidate a run.

use pretty_assertions::assert_eq;
use rars_cli::args::banner;
use rars_cli::{AddressRange, ArgumentParser, DisplayFormat, DumpRequest, ParseOutcome, RunConfiguration};
use rars_engine::MemoryConfiguration;
use rstest::rstest;

use crate::common::console::captured;

struct Parsed {
    config: RunConfiguration,
    valid: bool,
    diagnostics: Vec<String>,
    output: String,
}

fn parse(tokens: &[&str]) -> Parsed {
    let (mut console, buffer) = captured();
    match ArgumentParser::new(&mut console).parse(tokens) {
        ParseOutcome::Parsed {
            config,
            valid,
            diagnostics,
        } => Parsed {
            config,
            valid,
            diagnostics,
            output: buffer.contents(),
        },
        ParseOutcome::ShowUsage => panic!("unexpected usage for {tokens:?}"),
    }
}

#[test]
fn banner_is_printed_first() {
    let parsed = parse(&["a"]);
    assert!(parsed.output.starts_with("RARS "));
    assert!(parsed.output.starts_with(&banner()));
    assert!(parsed.output.contains("Copyright"));
}

#[test]
fn nc_suppresses_banner_anywhere() {
    let parsed = parse(&["a", "NC"]);
    assert_eq!(parsed.output, "");
    assert!(parsed.valid);
}

#[rstest]
#[case("h")]
#[case("H")]
fn lone_h_shows_usage(#[case] token: &str) {
    let (mut console, buffer) = captured();
    let outcome = ArgumentParser::new(&mut console).parse(&[token]);
    assert_eq!(outcome, ParseOutcome::ShowUsage);
    let output = buffer.contents();
    assert!(output.contains("Usage:  rars"));
    assert!(output.contains(".text, .data"));
    assert!(output.contains("AsciiText, Binary, BinaryText, HexText, IntelHex"));
    assert!(output.contains("CompactDataAtZero"));
}

#[test]
fn defaults_without_options() {
    let parsed = parse(&["nc"]);
    assert!(parsed.valid);
    assert_eq!(parsed.config, RunConfiguration::default());
    assert!(parsed.config.pseudo_instructions_allowed);
    assert!(parsed.config.verbose);
    assert_eq!(parsed.config.display_format, DisplayFormat::Hexadecimal);
}

#[test]
fn fixed_vocabulary_sets_flags() {
    let parsed = parse(&["nc", "a", "p", "dec", "b", "np", "we", "sm", "smc", "rv64", "ic", "d"]);
    assert!(parsed.valid);
    let config = parsed.config;
    assert!(config.assemble_only);
    assert!(config.project_mode);
    assert_eq!(config.display_format, DisplayFormat::Decimal);
    assert!(!config.verbose);
    assert!(!config.pseudo_instructions_allowed);
    assert!(config.warnings_are_errors);
    assert!(config.start_at_main);
    assert!(config.self_modifying_code);
    assert!(config.rv64_enabled);
    assert!(config.count_instructions);
    assert!(config.debug);
}

#[rstest]
#[case("d")]
#[case("AD")]
#[case("da")]
fn debug_spellings(#[case] token: &str) {
    let parsed = parse(&["nc", token]);
    assert!(parsed.config.debug);
    assert!(!parsed.config.assemble_only);
}

#[test]
fn ne_disables_pseudo_instructions() {
    assert!(!parse(&["nc", "ne"]).config.pseudo_instructions_allowed);
}

#[test]
fn last_display_format_wins() {
    assert_eq!(parse(&["nc", "dec", "ascii"]).config.display_format, DisplayFormat::Ascii);
    assert_eq!(parse(&["nc", "ascii", "HEX"]).config.display_format, DisplayFormat::Hexadecimal);
}

#[test]
fn g_requests_gui() {
    assert!(parse(&["nc", "g"]).config.gui);
}

#[test]
fn dump_collects_triple() {
    let parsed = parse(&["nc", "dump", ".text", "HexText", "out.hex", "a"]);
    assert!(parsed.valid);
    assert_eq!(
        parsed.config.dump_requests,
        vec![DumpRequest {
            segment: ".text".to_string(),
            format: "HexText".to_string(),
            path: "out.hex".into(),
        }]
    );
    assert!(parsed.config.assemble_only);
}

#[test]
fn dump_with_too_few_tokens_is_an_error() {
    let parsed = parse(&["nc", "dump", ".text", "HexText"]);
    assert!(!parsed.valid);
    assert_eq!(
        parsed.diagnostics[0],
        "Dump command line argument requires a segment, format and file name."
    );
    assert!(parsed.config.dump_requests.is_empty());
}

#[test]
fn memory_configuration_is_applied() {
    let parsed = parse(&["nc", "mc", "CompactTextAtZero"]);
    assert!(parsed.valid);
    assert_eq!(parsed.config.memory_configuration, Some(MemoryConfiguration::CompactTextAtZero));
    assert_eq!(parsed.config.sim_config().memory, MemoryConfiguration::CompactTextAtZero);
}

#[test]
fn unknown_memory_configuration_is_an_error() {
    let parsed = parse(&["nc", "mc", "Bogus"]);
    assert!(!parsed.valid);
    assert_eq!(parsed.diagnostics, vec!["Invalid memory configuration: Bogus".to_string()]);
    assert_eq!(parsed.config.memory_configuration, None);
}

#[test]
fn trailing_mc_is_an_error() {
    let parsed = parse(&["nc", "mc"]);
    assert!(!parsed.valid);
}

#[test]
fn exit_codes_decode_after_prefix() {
    let parsed = parse(&["nc", "ae3", "SE0x10"]);
    assert!(parsed.valid);
    assert_eq!(parsed.config.assemble_error_exit_code, 3);
    assert_eq!(parsed.config.simulate_error_exit_code, 16);
}

#[test]
fn undecodable_exit_code_falls_through() {
    let parsed = parse(&["nc", "aeX"]);
    assert!(!parsed.valid);
    assert_eq!(parsed.diagnostics, vec!["Invalid Command Argument: aeX".to_string()]);
}

#[test]
fn existing_file_is_collected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.s");
    std::fs::write(&path, "nop\n").unwrap();
    let name = path.to_str().unwrap();

    let parsed = parse(&["nc", name]);
    assert!(parsed.valid);
    assert_eq!(parsed.config.filenames, vec![name.to_string()]);
}

#[test]
fn registers_keep_order_and_duplicates() {
    let parsed = parse(&["nc", "x5", "t0", "f10", "fa1", "fcsr", "t0"]);
    assert!(parsed.valid);
    assert_eq!(parsed.config.register_display_list, vec!["x5", "t0", "f10", "fa1", "fcsr", "t0"]);
}

/// An unknown name with the register sigil is reported but leaves the run valid.
#[test]
fn invalid_sigiled_register_does_not_invalidate() {
    let parsed = parse(&["nc", "x99"]);
    assert!(parsed.valid);
    assert_eq!(parsed.diagnostics, vec!["Invalid Register Name: x99".to_string()]);
    assert!(parsed.config.register_display_list.is_empty());
}

#[test]
fn unknown_bare_name_invalidates() {
    let parsed = parse(&["nc", "q7"]);
    assert!(!parsed.valid);
    assert_eq!(parsed.diagnostics, vec!["Invalid Command Argument: q7".to_string()]);
}

#[rstest]
#[case("1000", 1000)]
#[case("0x10", 16)]
#[case("-5", -5)]
#[case("0", 0)]
fn integer_sets_max_steps(#[case] token: &str, #[case] steps: i32) {
    let parsed = parse(&["nc", token]);
    assert!(parsed.valid);
    assert_eq!(parsed.config.max_steps, steps);
}

#[test]
fn valid_range_is_collected() {
    let parsed = parse(&["nc", "0x10010000-0x10010010", "0-4"]);
    assert!(parsed.valid);
    assert_eq!(
        parsed.config.memory_display_list,
        vec![
            AddressRange {
                low: 0x1001_0000,
                high: 0x1001_0010
            },
            AddressRange { low: 0, high: 4 },
        ]
    );
}

#[rstest]
#[case("0x10010002-0x10010010")]
#[case("0x10010010-0x10010000")]
#[case("0x10010000-zz")]
fn bad_range_is_an_error(#[case] token: &str) {
    let parsed = parse(&["nc", token]);
    assert!(!parsed.valid);
    assert_eq!(
        parsed.diagnostics,
        vec![format!("Invalid/unaligned address or invalid range: {token}")]
    );
    assert!(parsed.config.memory_display_list.is_empty());
}

#[test]
fn program_arguments_follow_pa() {
    let parsed = parse(&["nc", "pa", "x", "y", "z"]);
    assert!(parsed.valid);
    assert_eq!(
        parsed.config.program_arguments,
        Some(vec!["x".to_string(), "y".to_string(), "z".to_string()])
    );
}

#[test]
fn pa_alone_gives_empty_arguments() {
    let parsed = parse(&["nc", "pa"]);
    assert!(parsed.valid);
    assert_eq!(parsed.config.program_arguments, Some(Vec::new()));
}

#[test]
fn tokens_after_pa_are_never_options() {
    let parsed = parse(&["nc", "pa", "a", "hello", "250", "p", "x99", "0x3-0x8"]);
    assert!(parsed.valid);
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(
        parsed.config,
        RunConfiguration {
            program_arguments: Some(
                ["a", "hello", "250", "p", "x99", "0x3-0x8"].map(String::from).to_vec()
            ),
            ..RunConfiguration::default()
        }
    );
}

#[test]
fn dump_and_mc_after_pa_are_arguments() {
    let parsed = parse(&["nc", "pa", "dump", ".text", "mc", "pa"]);
    assert!(parsed.valid);
    assert!(parsed.config.dump_requests.is_empty());
    assert_eq!(parsed.config.memory_configuration, None);
    assert_eq!(
        parsed.config.program_arguments,
        Some(["dump", ".text", "mc", "pa"].map(String::from).to_vec())
    );
}

#[test]
fn no_program_arguments_without_pa() {
    assert_eq!(parse(&["nc", "a"]).config.program_arguments, None);
}

#[test]
fn every_error_is_reported_in_one_pass() {
    let parsed = parse(&["nc", "bogus", "0x3-0x8", "mc", "Nope"]);
    assert!(!parsed.valid);
    assert_eq!(parsed.diagnostics.len(), 3);
    assert_eq!(parsed.output.lines().count(), 3);
}
