//! Operand parsing and the resolved form of one basic instruction.

use std::collections::HashMap;

use super::lexer::{is_identifier, parse_char_literal, split_memory_operand};
use crate::common::number::parse_int;
use crate::isa::abi::{csr_address, fpr_index, gpr_index};
use crate::isa::{self, Format, InstructionDef};

/// Immediate field of an instruction, possibly awaiting symbol resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Imm {
    /// No immediate.
    None,
    /// A known value.
    Value(i64),
    /// PC-relative offset to a label.
    Target(String),
    /// Upper 20 bits of a label address, rounded for a following `%lo`.
    Hi(String),
    /// Sign-extended low 12 bits of a label address.
    Lo(String),
}

/// A basic instruction with its operands in encoding order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Op {
    /// Instruction definition.
    pub def: &'static InstructionDef,
    /// Destination register.
    pub rd: usize,
    /// First source register (the immediate for `csrr*i`).
    pub rs1: usize,
    /// Second source register.
    pub rs2: usize,
    /// Immediate (the CSR address for CSR instructions).
    pub imm: Imm,
}

impl Op {
    /// Builds an instruction by mnemonic.
    pub fn new(mnemonic: &str, rd: usize, rs1: usize, rs2: usize, imm: Imm) -> Result<Self, String> {
        let def = isa::lookup(mnemonic).ok_or_else(|| format!("\"{mnemonic}\" is not a recognized operator"))?;
        Ok(Self { def, rd, rs1, rs2, imm })
    }

    /// Parses the operands of a basic instruction.
    pub fn parse(def: &'static InstructionDef, operands: &[&str], parser: &OperandParser<'_>) -> Result<Self, String> {
        if def.rv64_only && !parser.rv64 {
            return Err(format!("\"{}\" is only available in 64-bit mode", def.mnemonic));
        }
        let arity = match def.format {
            Format::Environment => 0,
            Format::Upper | Format::Jump | Format::Load | Format::Store | Format::MoveToFloat | Format::MoveFromFloat => 2,
            Format::JumpRegister if operands.len() == 2 => 2,
            _ => 3,
        };
        if operands.len() != arity {
            return Err(format!(
                "\"{}\" expects {arity} operand(s) but found {}",
                def.mnemonic,
                operands.len()
            ));
        }
        let mut op = Self {
            def,
            rd: 0,
            rs1: 0,
            rs2: 0,
            imm: Imm::None,
        };
        match def.format {
            Format::R => {
                op.rd = parser.gpr(operands[0])?;
                op.rs1 = parser.gpr(operands[1])?;
                op.rs2 = parser.gpr(operands[2])?;
            }
            Format::I | Format::Shift => {
                op.rd = parser.gpr(operands[0])?;
                op.rs1 = parser.gpr(operands[1])?;
                op.imm = Imm::Value(parser.value(operands[2])?);
            }
            Format::JumpRegister if operands.len() == 2 => {
                op.rd = parser.gpr(operands[0])?;
                let (offset, base) = parser.memory(operands[1])?;
                op.rs1 = base;
                op.imm = Imm::Value(offset);
            }
            Format::JumpRegister => {
                op.rd = parser.gpr(operands[0])?;
                op.rs1 = parser.gpr(operands[1])?;
                op.imm = Imm::Value(parser.value(operands[2])?);
            }
            Format::Load => {
                op.rd = parser.gpr(operands[0])?;
                let (offset, base) = parser.memory(operands[1])?;
                op.rs1 = base;
                op.imm = Imm::Value(offset);
            }
            Format::Store => {
                op.rs2 = parser.gpr(operands[0])?;
                let (offset, base) = parser.memory(operands[1])?;
                op.rs1 = base;
                op.imm = Imm::Value(offset);
            }
            Format::Branch => {
                op.rs1 = parser.gpr(operands[0])?;
                op.rs2 = parser.gpr(operands[1])?;
                op.imm = parser.target(operands[2])?;
            }
            Format::Upper => {
                op.rd = parser.gpr(operands[0])?;
                op.imm = Imm::Value(parser.value(operands[1])?);
            }
            Format::Jump => {
                op.rd = parser.gpr(operands[0])?;
                op.imm = parser.target(operands[1])?;
            }
            Format::Csr => {
                op.rd = parser.gpr(operands[0])?;
                op.imm = Imm::Value(parser.csr(operands[1])?);
                op.rs1 = parser.gpr(operands[2])?;
            }
            Format::CsrImmediate => {
                op.rd = parser.gpr(operands[0])?;
                op.imm = Imm::Value(parser.csr(operands[1])?);
                let uimm = parser.value(operands[2])?;
                op.rs1 = usize::try_from(uimm)
                    .ok()
                    .filter(|&v| v < 32)
                    .ok_or_else(|| format!("operand {uimm} is out of range 0..31"))?;
            }
            Format::Environment => {}
            Format::MoveToFloat => {
                op.rd = parser.fpr(operands[0])?;
                op.rs1 = parser.gpr(operands[1])?;
            }
            Format::MoveFromFloat => {
                op.rd = parser.gpr(operands[0])?;
                op.rs1 = parser.fpr(operands[1])?;
            }
        }
        Ok(op)
    }
}

/// Operand parser for one source file.
#[derive(Debug)]
pub struct OperandParser<'a> {
    /// Constants defined with `.eqv`.
    pub eqv: &'a HashMap<String, i64>,
    /// Whether 64-bit mode is enabled.
    pub rv64: bool,
}

impl OperandParser<'_> {
    /// Parses an integer register.
    pub fn gpr(&self, text: &str) -> Result<usize, String> {
        gpr_index(text).ok_or_else(|| format!("\"{text}\" is not a valid integer register"))
    }

    /// Parses a floating-point register.
    pub fn fpr(&self, text: &str) -> Result<usize, String> {
        fpr_index(text).ok_or_else(|| format!("\"{text}\" is not a valid floating-point register"))
    }

    /// Parses a CSR name or numeric address.
    pub fn csr(&self, text: &str) -> Result<i64, String> {
        if let Some(addr) = csr_address(text) {
            return Ok(i64::from(addr));
        }
        self.value(text)
            .ok()
            .filter(|addr| (0..=0xfff).contains(addr))
            .ok_or_else(|| format!("\"{text}\" is not a valid CSR"))
    }

    /// Parses an integer literal, character literal or `.eqv` constant.
    pub fn value(&self, text: &str) -> Result<i64, String> {
        parse_int(text)
            .or_else(|| parse_char_literal(text))
            .or_else(|| self.eqv.get(text).copied())
            .ok_or_else(|| format!("\"{text}\" is not a valid immediate value"))
    }

    /// Parses a branch or jump target: a label or a literal byte offset.
    pub fn target(&self, text: &str) -> Result<Imm, String> {
        if let Ok(value) = self.value(text) {
            return Ok(Imm::Value(value));
        }
        if is_identifier(text) {
            Ok(Imm::Target(text.to_string()))
        } else {
            Err(format!("\"{text}\" is not a valid label"))
        }
    }

    /// Parses `offset(base)`, `(base)` or a bare base register.
    pub fn memory(&self, text: &str) -> Result<(i64, usize), String> {
        match split_memory_operand(text) {
            Some((offset, base)) => {
                let offset = if offset.is_empty() { 0 } else { self.value(offset)? };
                Ok((offset, self.gpr(base)?))
            }
            None => Err(format!("\"{text}\" is not a valid memory operand")),
        }
    }
}
