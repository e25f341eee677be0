//! # Assembler Tests
//!
//! Verifies encoding of basic and pseudo-instructions, data layout, symbol
//! scoping across files, and how warnings and errors are reported.

use pretty_assertions::assert_eq;
use rars_engine::common::error::Severity;
use rars_engine::{Engine, SimConfig};

use crate::common::harness::TestContext;

const TEXT: u32 = 0x0040_0000;
const DATA: u32 = 0x1001_0000;

fn text_word(ctx: &TestContext, address: u32) -> Option<u32> {
    ctx.program.memory().get_raw_word_or_null(address).unwrap().map(|w| w as u32)
}

#[test]
fn small_li_encodes_as_addi() {
    let mut ctx = TestContext::new();
    let warnings = ctx.assemble("li t0, 5\n").unwrap();
    assert!(!warnings.warnings_occurred());
    assert_eq!(text_word(&ctx, TEXT), Some(0x0050_0293));
    assert_eq!(text_word(&ctx, TEXT + 4), None);
}

#[test]
fn large_li_expands_to_lui_and_addi() {
    let mut ctx = TestContext::new();
    let _ = ctx.assemble("li t0, 0x12345678\n").unwrap();
    assert_eq!(text_word(&ctx, TEXT), Some(0x1234_52b7));
    assert_eq!(text_word(&ctx, TEXT + 4), Some(0x6782_8293));
    assert_eq!(text_word(&ctx, TEXT + 8), None);
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let mut ctx = TestContext::new();
    let _ = ctx.assemble("# header\n\n   addi t0, zero, 5   # five\n").unwrap();
    assert_eq!(text_word(&ctx, TEXT), Some(0x0050_0293));
}

#[test]
fn data_directives_lay_out_values() {
    let mut ctx = TestContext::new();
    let source = ".data\nvals: .word 1, -1\n.half 0x1234\n.align 2\nptr: .word vals\n";
    let _ = ctx.assemble(source).unwrap();
    let mem = ctx.program.memory();
    assert_eq!(mem.get_word(DATA), Ok(1));
    assert_eq!(mem.get_word(DATA + 4), Ok(-1));
    assert_eq!(mem.get_word(DATA + 8), Ok(0x1234));
    assert_eq!(mem.get_word(DATA + 12), Ok(DATA as i32));
}

#[test]
fn asciz_appends_terminator() {
    let mut ctx = TestContext::new();
    let _ = ctx.assemble(".data\ns: .asciz \"AB\"\n").unwrap();
    assert_eq!(ctx.program.memory().get_word(DATA), Ok(0x4241));
    assert_eq!(ctx.program.memory().get_raw_word_or_null(DATA + 4), Ok(None));
}

#[test]
fn eqv_constants_are_substituted() {
    let mut ctx = TestContext::new();
    let _ = ctx.run(".eqv N, 12\nli t0, N\n").unwrap();
    assert_eq!(ctx.reg("t0"), 12);
}

#[test]
fn truncated_data_value_is_a_warning() {
    let mut ctx = TestContext::new();
    let warnings = ctx.assemble(".data\n.byte 300\n").unwrap();
    assert_eq!(warnings.warning_count(), 1);
    assert!(warnings.messages()[0].message.contains("truncated"));
    assert_eq!(ctx.program.memory().get_byte(DATA), Ok(44));
}

#[test]
fn warnings_become_errors_when_requested() {
    let mut ctx = TestContext::with_config(SimConfig {
        warnings_are_errors: true,
        ..SimConfig::default()
    });
    let err = ctx.assemble(".data\n.byte 300\n").unwrap_err();
    assert_eq!(err.0.error_count(), 1);
    assert_eq!(err.0.warning_count(), 0);
}

#[test]
fn undefined_global_is_a_warning() {
    let mut ctx = TestContext::new();
    let warnings = ctx.assemble(".globl missing\nnop\n").unwrap();
    assert_eq!(warnings.warning_count(), 1);
    assert_eq!(warnings.messages()[0].severity, Severity::Warning);
}

#[test]
fn unknown_operator_reports_line() {
    let mut ctx = TestContext::new();
    let err = ctx.assemble("nop\nbogus t0\n").unwrap_err();
    let messages = err.0.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].line, 2);
    assert!(messages[0].to_string().contains("line 2"));
    assert!(err.0.generate_error_and_warning_report().ends_with("Assembly failed with 1 error(s) and 0 warning(s).\n"));
    assert_eq!(err.0.generate_error_report(), format!("{}\n", messages[0]));
}

#[test]
fn undefined_label_is_an_error() {
    let mut ctx = TestContext::new();
    let err = ctx.assemble("j nowhere\n").unwrap_err();
    assert!(err.0.messages()[0].message.contains("nowhere"));
}

#[test]
fn duplicate_label_is_an_error() {
    let mut ctx = TestContext::new();
    let err = ctx.assemble("here: nop\nhere: nop\n").unwrap_err();
    assert_eq!(err.0.error_count(), 1);
}

#[test]
fn pseudo_instructions_can_be_disabled() {
    let mut ctx = TestContext::with_config(SimConfig {
        pseudo_instructions: false,
        ..SimConfig::default()
    });
    let err = ctx.assemble("nop\n").unwrap_err();
    assert!(err.0.messages()[0].message.contains("pseudo-instruction"));

    let mut ctx = TestContext::with_config(SimConfig {
        pseudo_instructions: false,
        ..SimConfig::default()
    });
    assert!(ctx.assemble("addi t0, zero, 1\n").is_ok());
}

#[test]
fn data_directive_in_text_is_rejected() {
    let mut ctx = TestContext::new();
    let err = ctx.assemble(".word 5\n").unwrap_err();
    assert!(err.0.messages()[0].message.contains("text segment"));
}

#[test]
fn rv64_instructions_need_rv64() {
    let mut ctx = TestContext::new();
    assert!(ctx.assemble("ld t0, 0(sp)\n").is_err());

    let mut ctx = TestContext::with_config(SimConfig {
        rv64: true,
        ..SimConfig::default()
    });
    assert!(ctx.assemble("ld t0, 0(sp)\n").is_ok());
}

#[test]
fn shift_amount_limit_depends_on_width() {
    let mut ctx = TestContext::new();
    assert!(ctx.assemble("slli t0, t0, 32\n").is_err());

    let mut ctx = TestContext::with_config(SimConfig {
        rv64: true,
        ..SimConfig::default()
    });
    assert!(ctx.assemble("slli t0, t0, 32\n").is_ok());
}

#[test]
fn labels_are_local_unless_global() {
    let mut ctx = TestContext::new();
    let main = ctx.source("main.s", "jal helper\nli a7, 10\necall\n");
    let other = ctx.source("other.s", "helper: li t0, 9\nret\n");
    let err = ctx.program.assemble(&[main.clone(), other], &main).unwrap_err();
    assert!(err.0.messages()[0].message.contains("helper"));
}

#[test]
fn global_labels_link_files() {
    let mut ctx = TestContext::new();
    let main = ctx.source("main.s", "loop: jal helper\nli a7, 10\necall\n");
    let other = ctx.source("other.s", ".globl helper\nloop: nop\nhelper: li t0, 9\nret\n");
    let _ = ctx.program.assemble(&[other, main.clone()], &main).unwrap();
    ctx.program.setup(None, None).unwrap();
    assert_eq!(ctx.program.simulate(), Ok(rars_engine::TerminationReason::NormalTermination));
    assert_eq!(ctx.reg("t0"), 9);
}

#[test]
fn main_file_is_assembled_first() {
    let mut ctx = TestContext::new();
    let main = ctx.source("main.s", "addi t0, zero, 5\n");
    let other = ctx.source("other.s", "addi t1, zero, 1\n");
    let _ = ctx.program.assemble(&[other, main.clone()], &main).unwrap();
    assert_eq!(text_word(&ctx, TEXT), Some(0x0050_0293));
}

#[test]
fn failed_assembly_clears_memory() {
    let mut ctx = TestContext::new();
    let _ = ctx.assemble("nop\n").unwrap();
    assert_eq!(ctx.program.memory().written_word_count(), 1);
    assert!(ctx.assemble("bogus\n").is_err());
    assert_eq!(ctx.program.memory().written_word_count(), 0);
}
