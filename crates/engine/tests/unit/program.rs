//! # Program Setup Tests
//!
//! Verifies what `setup` prepares: entry point selection, initial stack and
//! global pointers, program arguments on the stack, and errors when nothing
//! has been assembled.

use rars_engine::{Engine, SimConfig, TerminationReason};

use crate::common::harness::TestContext;

#[test]
fn setup_initializes_pointers() {
    let mut ctx = TestContext::new();
    let _ = ctx.assemble("nop\n").unwrap();
    ctx.program.setup(None, None).unwrap();
    assert_eq!(ctx.reg("sp"), 0x7fff_effc);
    assert_eq!(ctx.reg("gp"), 0x1000_8000);
    assert_eq!(ctx.program.pc(), 0x0040_0000);
}

#[test]
fn start_at_main_uses_global_main() {
    let source = ".globl main\nli t0, 1\nmain: li t0, 2\n";

    let mut ctx = TestContext::new();
    let _ = ctx.assemble(source).unwrap();
    assert_eq!(ctx.program.entry_point(), Some(0x0040_0000));
    assert_eq!(ctx.program.global_address("main"), Some(0x0040_0004));

    let mut ctx = TestContext::with_config(SimConfig {
        start_at_main: true,
        ..SimConfig::default()
    });
    let _ = ctx.assemble(source).unwrap();
    assert_eq!(ctx.program.entry_point(), Some(0x0040_0004));
    ctx.program.setup(None, None).unwrap();
    assert_eq!(ctx.program.simulate(), Ok(TerminationReason::CliffTermination));
    assert_eq!(ctx.reg("t0"), 2);
    assert_eq!(ctx.reg("cycle"), 1);
}

#[test]
fn program_arguments_are_placed_on_the_stack() {
    let mut ctx = TestContext::new();
    let _ = ctx.assemble("lw a0, 0(a1)\nli a7, 4\necall\n").unwrap();
    let arguments = vec!["ab".to_string(), "c".to_string()];
    ctx.program.setup(Some(arguments.as_slice()), None).unwrap();

    assert_eq!(ctx.reg("a0"), 2);
    let argv = ctx.reg("a1") as u32;
    assert_eq!(argv, 0x7fff_ffec);
    assert_eq!(ctx.reg("sp"), 0x7fff_ffe8);

    let memory = ctx.program.memory();
    let first = memory.get_word(argv).unwrap() as u32;
    assert_eq!(memory.get_byte(first), Ok(b'a'));
    assert_eq!(memory.get_word(argv + 8), Ok(0));

    assert_eq!(ctx.program.simulate(), Ok(TerminationReason::CliffTermination));
    assert_eq!(ctx.output(), "ab");
}

#[test]
fn empty_program_arguments_give_zero_argc() {
    let mut ctx = TestContext::new();
    let _ = ctx.assemble("nop\n").unwrap();
    ctx.program.setup(Some(Vec::<String>::new().as_slice()), None).unwrap();
    assert_eq!(ctx.reg("a0"), 0);
    let argv = ctx.reg("a1") as u32;
    assert_eq!(ctx.program.memory().get_word(argv), Ok(0));
}

#[test]
fn setup_restores_the_assembled_image() {
    let mut ctx = TestContext::new();
    let _ = ctx.assemble(".data\nv: .word 5\n.text\nla t0, v\nli t1, 9\nsw t1, 0(t0)\n").unwrap();
    ctx.program.setup(None, None).unwrap();
    let _ = ctx.program.simulate().unwrap();
    assert_eq!(ctx.program.memory().get_word(0x1001_0000), Ok(9));

    ctx.program.setup(None, None).unwrap();
    assert_eq!(ctx.program.memory().get_word(0x1001_0000), Ok(5));
    assert_eq!(ctx.reg("cycle"), 0);
}

#[test]
fn setup_without_assembly_fails() {
    let mut ctx = TestContext::new();
    assert!(ctx.program.setup(None, None).is_err());
    assert!(ctx.program.simulate().is_err());
}

#[test]
fn register_values_by_name() {
    let mut ctx = TestContext::new();
    let _ = ctx.run("li t0, 5\n").unwrap();
    assert_eq!(ctx.program.register_value("x5"), Some(5));
    assert_eq!(ctx.program.register_value("t0"), Some(5));
    assert_eq!(ctx.program.register_value("f0"), Some(0));
    assert_eq!(ctx.program.register_value("instret"), Some(1));
    assert_eq!(ctx.program.register_value("nope"), None);
}
