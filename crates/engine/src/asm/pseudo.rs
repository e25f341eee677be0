//! Pseudo-instruction expansion.
//!
//! Each pseudo-instruction expands to one or more basic instructions at the
//! point it is read, so addresses are final after the first pass. A mnemonic
//! that is also basic (`jal`, `jalr`, loads) is only a pseudo-instruction for
//! the operand shapes listed here.

use super::lexer::{is_identifier, split_memory_operand};
use super::operand::{Imm, Op, OperandParser};
use crate::isa::abi::{REG_RA, REG_ZERO};
use crate::isa::{self, Format};

/// Expands a pseudo-instruction.
///
/// # Returns
///
/// `None` when `mnemonic` with these operands is not a pseudo-instruction;
/// otherwise the basic instructions it stands for, or a description of the malformed operands.
pub fn expand(mnemonic: &str, operands: &[&str], parser: &OperandParser<'_>) -> Option<Result<Vec<Op>, String>> {
    let zero = REG_ZERO;
    let result = match (mnemonic, operands) {
        ("nop", []) => single("addi", zero, zero, 0, Imm::Value(0)),
        ("li", [rd, value]) => load_immediate(rd, value, parser),
        ("la", [rd, label]) => load_address(rd, label, parser),
        ("mv", [rd, rs]) => unary("addi", rd, rs, |d, s| (d, s, 0, Imm::Value(0)), parser),
        ("not", [rd, rs]) => unary("xori", rd, rs, |d, s| (d, s, 0, Imm::Value(-1)), parser),
        ("neg", [rd, rs]) => unary("sub", rd, rs, |d, s| (d, zero, s, Imm::None), parser),
        ("seqz", [rd, rs]) => unary("sltiu", rd, rs, |d, s| (d, s, 0, Imm::Value(1)), parser),
        ("snez", [rd, rs]) => unary("sltu", rd, rs, |d, s| (d, zero, s, Imm::None), parser),
        ("sltz", [rd, rs]) => unary("slt", rd, rs, |d, s| (d, s, zero, Imm::None), parser),
        ("sgtz", [rd, rs]) => unary("slt", rd, rs, |d, s| (d, zero, s, Imm::None), parser),
        ("j", [label]) => jump(zero, label, parser),
        ("jal", [label]) => jump(REG_RA, label, parser),
        ("call", [label]) => jump(REG_RA, label, parser),
        ("tail", [label]) => jump(zero, label, parser),
        ("jr", [rs]) => parser.gpr(rs).and_then(|rs| single("jalr", zero, rs, 0, Imm::Value(0))),
        ("jalr", [rs]) => parser.gpr(rs).and_then(|rs| single("jalr", REG_RA, rs, 0, Imm::Value(0))),
        ("jalr", [rd, rs]) if split_memory_operand(rs).is_none() => parser
            .gpr(rd)
            .and_then(|rd| Ok((rd, parser.gpr(rs)?)))
            .and_then(|(rd, rs)| single("jalr", rd, rs, 0, Imm::Value(0))),
        ("ret", []) => single("jalr", zero, REG_RA, 0, Imm::Value(0)),
        ("beqz", [rs, label]) => branch_zero("beq", rs, label, false, parser),
        ("bnez", [rs, label]) => branch_zero("bne", rs, label, false, parser),
        ("bltz", [rs, label]) => branch_zero("blt", rs, label, false, parser),
        ("bgez", [rs, label]) => branch_zero("bge", rs, label, false, parser),
        ("bgtz", [rs, label]) => branch_zero("blt", rs, label, true, parser),
        ("blez", [rs, label]) => branch_zero("bge", rs, label, true, parser),
        ("bgt", [a, b, label]) => branch_swapped("blt", a, b, label, parser),
        ("ble", [a, b, label]) => branch_swapped("bge", a, b, label, parser),
        ("bgtu", [a, b, label]) => branch_swapped("bltu", a, b, label, parser),
        ("bleu", [a, b, label]) => branch_swapped("bgeu", a, b, label, parser),
        ("csrr", [rd, csr]) => parser
            .gpr(rd)
            .and_then(|rd| Ok((rd, parser.csr(csr)?)))
            .and_then(|(rd, csr)| single("csrrs", rd, zero, 0, Imm::Value(csr))),
        ("csrw", [csr, rs]) => parser
            .csr(csr)
            .and_then(|csr| Ok((csr, parser.gpr(rs)?)))
            .and_then(|(csr, rs)| single("csrrw", zero, rs, 0, Imm::Value(csr))),
        ("rdcycle", [rd]) => read_counter(rd, "cycle", parser),
        ("rdtime", [rd]) => read_counter(rd, "time", parser),
        ("rdinstret", [rd]) => read_counter(rd, "instret", parser),
        (load, [rd, label])
            if is_identifier(label)
                && isa::lookup(load)
                    .is_some_and(|def| def.format == Format::Load && (parser.rv64 || !def.rv64_only)) =>
        {
            load_from_label(load, rd, label, parser)
        }
        _ => return None,
    };
    Some(result)
}

/// Returns true if `mnemonic` names a pseudo-instruction in some operand shape.
pub fn is_pseudo_mnemonic(mnemonic: &str) -> bool {
    const NAMES: &[&str] = &[
        "nop", "li", "la", "mv", "not", "neg", "seqz", "snez", "sltz", "sgtz", "j", "call", "tail",
        "jr", "ret", "beqz", "bnez", "bltz", "bgez", "bgtz", "blez", "bgt", "ble", "bgtu", "bleu",
        "csrr", "csrw", "rdcycle", "rdtime", "rdinstret",
    ];
    NAMES.contains(&mnemonic)
}

fn single(mnemonic: &str, rd: usize, rs1: usize, rs2: usize, imm: Imm) -> Result<Vec<Op>, String> {
    Ok(vec![Op::new(mnemonic, rd, rs1, rs2, imm)?])
}

fn unary(
    mnemonic: &str,
    rd: &str,
    rs: &str,
    shape: impl FnOnce(usize, usize) -> (usize, usize, usize, Imm),
    parser: &OperandParser<'_>,
) -> Result<Vec<Op>, String> {
    let (rd, rs1, rs2, imm) = shape(parser.gpr(rd)?, parser.gpr(rs)?);
    single(mnemonic, rd, rs1, rs2, imm)
}

fn jump(rd: usize, label: &str, parser: &OperandParser<'_>) -> Result<Vec<Op>, String> {
    single("jal", rd, 0, 0, parser.target(label)?)
}

fn branch_zero(
    mnemonic: &str,
    rs: &str,
    label: &str,
    zero_first: bool,
    parser: &OperandParser<'_>,
) -> Result<Vec<Op>, String> {
    let rs = parser.gpr(rs)?;
    let (rs1, rs2) = if zero_first { (REG_ZERO, rs) } else { (rs, REG_ZERO) };
    single(mnemonic, 0, rs1, rs2, parser.target(label)?)
}

fn branch_swapped(
    mnemonic: &str,
    a: &str,
    b: &str,
    label: &str,
    parser: &OperandParser<'_>,
) -> Result<Vec<Op>, String> {
    single(mnemonic, 0, parser.gpr(b)?, parser.gpr(a)?, parser.target(label)?)
}

fn read_counter(rd: &str, counter: &str, parser: &OperandParser<'_>) -> Result<Vec<Op>, String> {
    single("csrrs", parser.gpr(rd)?, REG_ZERO, 0, Imm::Value(parser.csr(counter)?))
}

/// Second instruction of an upper/lower pair: `addiw` keeps 64-bit results sign-correct.
const fn add_low(rv64: bool) -> &'static str {
    if rv64 { "addiw" } else { "addi" }
}

fn load_immediate(rd: &str, value: &str, parser: &OperandParser<'_>) -> Result<Vec<Op>, String> {
    let rd = parser.gpr(rd)?;
    let value = parser.value(value)?;
    let value = if parser.rv64 {
        i32::try_from(value).map_err(|_| format!("li value {value} does not fit in 32 bits"))?
    } else if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&value) {
        value as i32
    } else {
        return Err(format!("li value {value} does not fit in 32 bits"));
    };
    if (-2048..2048).contains(&value) {
        return single("addi", rd, REG_ZERO, 0, Imm::Value(i64::from(value)));
    }
    let (upper, lower) = split_hi_lo(value);
    let mut ops = vec![Op::new("lui", rd, 0, 0, Imm::Value(upper))?];
    if lower != 0 {
        ops.push(Op::new(add_low(parser.rv64), rd, rd, 0, Imm::Value(lower))?);
    }
    Ok(ops)
}

fn load_address(rd: &str, label: &str, parser: &OperandParser<'_>) -> Result<Vec<Op>, String> {
    let rd = parser.gpr(rd)?;
    if !is_identifier(label) {
        return Err(format!("\"{label}\" is not a valid label"));
    }
    Ok(vec![
        Op::new("lui", rd, 0, 0, Imm::Hi(label.to_string()))?,
        Op::new(add_low(parser.rv64), rd, rd, 0, Imm::Lo(label.to_string()))?,
    ])
}

fn load_from_label(load: &str, rd: &str, label: &str, parser: &OperandParser<'_>) -> Result<Vec<Op>, String> {
    let rd = parser.gpr(rd)?;
    Ok(vec![
        Op::new("lui", rd, 0, 0, Imm::Hi(label.to_string()))?,
        Op::new(load, rd, rd, 0, Imm::Lo(label.to_string()))?,
    ])
}

/// Splits a 32-bit value into a `lui` immediate and a sign-extended 12-bit remainder.
pub fn split_hi_lo(value: i32) -> (i64, i64) {
    let value = i64::from(value);
    let upper = ((value + 0x800) >> 12) & 0xf_ffff;
    let lower = value - (((value + 0x800) >> 12) << 12);
    (upper, lower)
}
