//! Two-pass assembler.
//!
//! This module turns assembly source files into a memory image. It performs:
//! 1. **Pass One:** Splits lines, binds labels, expands pseudo-instructions, lays out data and assigns every instruction its address.
//! 2. **Symbol Scoping:** Labels are local to their file unless declared with `.globl`; local definitions shadow globals.
//! 3. **Pass Two:** Resolves label references, range-checks immediates and writes the encoded words into memory.
//!
//! The main file is assembled first, so its text and data start at the segment bases.

/// Line splitting and literal parsing.
pub mod lexer;

/// Operand parsing.
pub mod operand;

/// Pseudo-instruction expansion.
pub mod pseudo;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use self::lexer::{SourceLine, is_identifier, parse_char_literal, parse_string_literals, split_line, split_operands};
use self::operand::{Imm, Op, OperandParser};
use self::pseudo::split_hi_lo;
use crate::common::constants::INSTRUCTION_LENGTH_BYTES;
use crate::common::error::{AssemblyError, ErrorList, ErrorMessage};
use crate::common::number::parse_int;
use crate::config::SimConfig;
use crate::isa::instruction::{encode_b, encode_i, encode_j, encode_r, encode_s, encode_u};
use crate::isa::opcodes::{OP_IMM, OP_SYSTEM};
use crate::isa::{self, Format};
use crate::memory::Memory;

/// Result of a successful assembly.
#[derive(Clone, Debug)]
pub struct Assembled {
    /// Memory image holding the text and data segments.
    pub memory: Memory,
    /// Address where execution starts.
    pub entry: u32,
    /// Labels declared `.globl`, with their addresses.
    pub globals: HashMap<String, u32>,
    /// Warnings reported while assembling.
    pub warnings: ErrorList,
}

/// Assembles `files` into a fresh memory image.
///
/// # Arguments
///
/// * `files` - Every source file of the program.
/// * `main_file` - The file assembled first; it is added if `files` lacks it.
/// * `config` - Engine settings (word width, layout, pseudo-instruction policy, entry point).
///
/// # Returns
///
/// The memory image and entry point, or every diagnostic when at least one error occurred.
pub fn assemble(files: &[PathBuf], main_file: &Path, config: &SimConfig) -> Result<Assembled, AssemblyError> {
    let mut ordered = vec![main_file.to_path_buf()];
    ordered.extend(files.iter().filter(|f| f.as_path() != main_file).cloned());

    let mut assembler = Assembler::new(config);
    for path in &ordered {
        assembler.first_pass(path);
    }
    assembler.second_pass();
    assembler.finish()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment {
    Text,
    Data,
}

#[derive(Debug)]
struct SourceFile {
    path: PathBuf,
    locals: HashMap<String, u32>,
}

#[derive(Debug)]
struct PendingInstruction {
    file: usize,
    line: usize,
    address: u32,
    op: Op,
}

#[derive(Debug)]
struct PendingData {
    file: usize,
    line: usize,
    address: u32,
    width: u32,
    symbol: String,
}

#[derive(Debug)]
struct Assembler<'c> {
    config: &'c SimConfig,
    memory: Memory,
    messages: ErrorList,
    files: Vec<SourceFile>,
    globals: HashMap<String, u32>,
    instructions: Vec<PendingInstruction>,
    fixups: Vec<PendingData>,
    text_address: u32,
    data_address: u32,
}

impl<'c> Assembler<'c> {
    fn new(config: &'c SimConfig) -> Self {
        let layout = config.layout();
        Self {
            config,
            memory: Memory::new(layout),
            messages: ErrorList::new(),
            files: Vec::new(),
            globals: HashMap::new(),
            instructions: Vec::new(),
            fixups: Vec::new(),
            text_address: layout.text_base,
            data_address: layout.data_base,
        }
    }

    fn first_pass(&mut self, path: &Path) {
        let file = self.files.len();
        self.files.push(SourceFile {
            path: path.to_path_buf(),
            locals: HashMap::new(),
        });
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                self.messages.add(ErrorMessage::error(path, 0, format!("could not read source file: {e}")));
                return;
            }
        };
        debug!(file = %path.display(), "assembling");

        let mut segment = Segment::Text;
        let mut eqv = HashMap::new();
        let mut declared_globals = Vec::new();
        for (idx, text) in source.lines().enumerate() {
            let line = idx + 1;
            let parsed = split_line(text);
            if let Err(message) = self.line(file, line, &parsed, &mut segment, &mut eqv, &mut declared_globals) {
                self.messages.add(ErrorMessage::error(path, line, message));
            }
        }

        for (name, line) in declared_globals {
            match self.files[file].locals.get(&name).copied() {
                Some(_) if self.globals.contains_key(&name) => {
                    self.messages.add(ErrorMessage::error(
                        path,
                        line,
                        format!("global label \"{name}\" is already defined in another file"),
                    ));
                }
                Some(address) => {
                    let _ = self.globals.insert(name, address);
                }
                None => self.messages.add(ErrorMessage::warning(
                    path,
                    line,
                    format!("label \"{name}\" is declared global but never defined"),
                )),
            }
        }
    }

    fn line(
        &mut self,
        file: usize,
        line: usize,
        parsed: &SourceLine<'_>,
        segment: &mut Segment,
        eqv: &mut HashMap<String, i64>,
        declared_globals: &mut Vec<(String, usize)>,
    ) -> Result<(), String> {
        if *segment == Segment::Data {
            if let Some(alignment) = parsed.operation.and_then(natural_alignment) {
                self.data_address = align_up(self.data_address, alignment);
            }
        }
        for label in &parsed.labels {
            let address = match segment {
                Segment::Text => self.text_address,
                Segment::Data => self.data_address,
            };
            if self.files[file].locals.insert((*label).to_string(), address).is_some() {
                return Err(format!("label \"{label}\" is already defined"));
            }
        }
        let Some(operation) = parsed.operation else {
            return Ok(());
        };
        let operands = split_operands(parsed.operands);

        if operation.starts_with('.') {
            return self.directive(file, line, operation, parsed.operands, &operands, segment, eqv, declared_globals);
        }
        if *segment != Segment::Text {
            return Err(format!("\"{operation}\" is not allowed in the data segment"));
        }
        let parser = OperandParser {
            eqv,
            rv64: self.config.rv64,
        };
        let ops = match pseudo::expand(operation, &operands, &parser) {
            Some(_) if !self.config.pseudo_instructions => {
                return Err(format!(
                    "\"{operation}\" is a pseudo-instruction, but pseudo-instructions are disabled"
                ));
            }
            Some(expansion) => expansion?,
            None => {
                let def = isa::lookup(operation).ok_or_else(|| {
                    if pseudo::is_pseudo_mnemonic(operation) {
                        format!("wrong operands for pseudo-instruction \"{operation}\"")
                    } else {
                        format!("\"{operation}\" is not a recognized operator")
                    }
                })?;
                vec![Op::parse(def, &operands, &parser)?]
            }
        };
        for op in ops {
            if self.text_address > self.memory.layout().text_limit {
                return Err("text segment overflow".to_string());
            }
            self.instructions.push(PendingInstruction {
                file,
                line,
                address: self.text_address,
                op,
            });
            self.text_address = self.text_address.wrapping_add(INSTRUCTION_LENGTH_BYTES);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn directive(
        &mut self,
        file: usize,
        line: usize,
        name: &str,
        raw: &str,
        operands: &[&str],
        segment: &mut Segment,
        eqv: &mut HashMap<String, i64>,
        declared_globals: &mut Vec<(String, usize)>,
    ) -> Result<(), String> {
        match name {
            ".text" => {
                *segment = Segment::Text;
                if let [address] = operands {
                    self.text_address = address_operand(address)?;
                }
            }
            ".data" => {
                *segment = Segment::Data;
                if let [address] = operands {
                    self.data_address = address_operand(address)?;
                }
            }
            ".globl" | ".global" => {
                if operands.is_empty() {
                    return Err(format!("{name} requires at least one label"));
                }
                for label in operands {
                    if !is_identifier(label) {
                        return Err(format!("\"{label}\" is not a valid label"));
                    }
                    declared_globals.push(((*label).to_string(), line));
                }
            }
            ".eqv" | ".equ" | ".set" => {
                let [symbol, value] = operands else {
                    return Err(format!("{name} requires a symbol and a value"));
                };
                if !is_identifier(symbol) {
                    return Err(format!("\"{symbol}\" is not a valid symbol"));
                }
                let value = parse_int(value)
                    .or_else(|| parse_char_literal(value))
                    .or_else(|| eqv.get(*value).copied())
                    .ok_or_else(|| format!("\"{value}\" is not a valid value"))?;
                let _ = eqv.insert((*symbol).to_string(), value);
            }
            ".align" | ".space" | ".byte" | ".half" | ".word" | ".dword" | ".ascii" | ".asciz" | ".string"
                if *segment == Segment::Text =>
            {
                return Err(format!("{name} is not allowed in the text segment"));
            }
            ".align" => {
                let [power] = operands else {
                    return Err(".align requires one operand".to_string());
                };
                let power = parse_int(power)
                    .filter(|p| (0..=3).contains(p))
                    .ok_or_else(|| format!(".align operand \"{power}\" must be 0..3"))?;
                self.data_address = align_up(self.data_address, 1 << power);
            }
            ".space" => {
                let [size] = operands else {
                    return Err(".space requires one operand".to_string());
                };
                let size = parse_int(size)
                    .or_else(|| eqv.get(*size).copied())
                    .and_then(|s| u32::try_from(s).ok())
                    .ok_or_else(|| format!(".space operand \"{size}\" is not a valid size"))?;
                self.data_address = self.data_address.wrapping_add(size);
            }
            ".byte" => self.values(file, line, operands, 1, eqv)?,
            ".half" => self.values(file, line, operands, 2, eqv)?,
            ".word" => self.values(file, line, operands, 4, eqv)?,
            ".dword" => self.values(file, line, operands, 8, eqv)?,
            ".ascii" | ".asciz" | ".string" => {
                for mut bytes in parse_string_literals(raw)? {
                    if name != ".ascii" {
                        bytes.push(0);
                    }
                    self.emit(&bytes)?;
                }
            }
            _ => return Err(format!("\"{name}\" is not a recognized directive")),
        }
        Ok(())
    }

    fn values(
        &mut self,
        file: usize,
        line: usize,
        operands: &[&str],
        width: u32,
        eqv: &HashMap<String, i64>,
    ) -> Result<(), String> {
        if operands.is_empty() {
            return Err("missing value".to_string());
        }
        for operand in operands {
            let value = parse_int(operand)
                .or_else(|| parse_char_literal(operand))
                .or_else(|| eqv.get(*operand).copied());
            match value {
                Some(value) => {
                    if !fits(value, width) {
                        let truncated = truncate(value, width);
                        let path = self.files[file].path.clone();
                        self.messages.add(ErrorMessage::warning(
                            &path,
                            line,
                            format!("value 0x{value:x} is out-of-range and truncated to 0x{truncated:x}"),
                        ));
                    }
                    self.emit(&value.to_le_bytes()[..width as usize])?;
                }
                None if width >= 4 && is_identifier(operand) => {
                    self.fixups.push(PendingData {
                        file,
                        line,
                        address: self.data_address,
                        width,
                        symbol: (*operand).to_string(),
                    });
                    self.emit(&vec![0; width as usize])?;
                }
                None => return Err(format!("\"{operand}\" is not a valid value")),
            }
        }
        Ok(())
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<(), String> {
        for &byte in bytes {
            self.memory
                .set_byte(self.data_address, byte)
                .map_err(|e| format!("data segment overflow: {e}"))?;
            self.data_address = self.data_address.wrapping_add(1);
        }
        Ok(())
    }

    fn resolve(&self, file: usize, symbol: &str) -> Result<u32, String> {
        self.files[file]
            .locals
            .get(symbol)
            .or_else(|| self.globals.get(symbol))
            .copied()
            .ok_or_else(|| format!("symbol \"{symbol}\" is not defined"))
    }

    fn second_pass(&mut self) {
        let instructions = std::mem::take(&mut self.instructions);
        for pending in &instructions {
            let encoded = self.encode(pending).and_then(|word| {
                self.memory
                    .set_word(pending.address, word as i32)
                    .map_err(|e| e.to_string())
            });
            if let Err(message) = encoded {
                let path = self.files[pending.file].path.clone();
                self.messages.add(ErrorMessage::error(&path, pending.line, message));
            }
        }

        let fixups = std::mem::take(&mut self.fixups);
        for fixup in &fixups {
            let written = self.resolve(fixup.file, &fixup.symbol).and_then(|address| {
                let bytes = u64::from(address).to_le_bytes();
                for (offset, byte) in bytes.iter().take(fixup.width as usize).enumerate() {
                    self.memory
                        .set_byte(fixup.address.wrapping_add(offset as u32), *byte)
                        .map_err(|e| e.to_string())?;
                }
                Ok(())
            });
            if let Err(message) = written {
                let path = self.files[fixup.file].path.clone();
                self.messages.add(ErrorMessage::error(&path, fixup.line, message));
            }
        }
    }

    fn encode(&self, pending: &PendingInstruction) -> Result<u32, String> {
        let op = &pending.op;
        let def = op.def;
        let imm = match &op.imm {
            Imm::None => 0,
            Imm::Value(value) => *value,
            Imm::Target(label) => i64::from(self.resolve(pending.file, label)?) - i64::from(pending.address),
            Imm::Hi(label) => split_hi_lo(self.resolve(pending.file, label)? as i32).0,
            Imm::Lo(label) => split_hi_lo(self.resolve(pending.file, label)? as i32).1,
        };
        let check = |range: std::ops::RangeInclusive<i64>| {
            if range.contains(&imm) {
                Ok(imm)
            } else {
                Err(format!(
                    "operand {imm} of \"{}\" is out of range {}..{}",
                    def.mnemonic,
                    range.start(),
                    range.end()
                ))
            }
        };
        let word = match def.format {
            Format::R => encode_r(def.opcode, op.rd, def.funct3, op.rs1, op.rs2, def.extra),
            Format::I | Format::JumpRegister | Format::Load => {
                encode_i(def.opcode, op.rd, def.funct3, op.rs1, check(-2048..=2047)?)
            }
            Format::Shift => {
                let max = if self.config.rv64 && def.opcode == OP_IMM { 63 } else { 31 };
                let shamt = check(0..=max)?;
                encode_i(def.opcode, op.rd, def.funct3, op.rs1, (i64::from(def.extra) << 5) | shamt)
            }
            Format::Store => encode_s(def.opcode, def.funct3, op.rs1, op.rs2, check(-2048..=2047)?),
            Format::Branch => {
                let offset = check(-4096..=4094)?;
                if offset % 2 != 0 {
                    return Err(format!("branch offset {offset} is not even"));
                }
                encode_b(def.opcode, def.funct3, op.rs1, op.rs2, offset)
            }
            Format::Upper => encode_u(def.opcode, op.rd, check(-0x8_0000..=0xf_ffff)?),
            Format::Jump => {
                let offset = check(-0x10_0000..=0xf_fffe)?;
                if offset % 2 != 0 {
                    return Err(format!("jump offset {offset} is not even"));
                }
                encode_j(def.opcode, op.rd, offset)
            }
            Format::Csr | Format::CsrImmediate => encode_i(def.opcode, op.rd, def.funct3, op.rs1, imm),
            Format::Environment => encode_i(OP_SYSTEM, 0, 0, 0, i64::from(def.extra)),
            Format::MoveToFloat | Format::MoveFromFloat => {
                encode_r(def.opcode, op.rd, def.funct3, op.rs1, 0, def.extra)
            }
        };
        Ok(word)
    }

    fn finish(mut self) -> Result<Assembled, AssemblyError> {
        if self.config.warnings_are_errors && self.messages.warnings_occurred() {
            self.messages.promote_warnings();
        }
        if self.messages.errors_occurred() {
            return Err(AssemblyError(self.messages));
        }
        let layout = *self.memory.layout();
        let entry = match self.globals.get("main") {
            Some(&main) if self.config.start_at_main => main,
            _ => layout.text_base,
        };
        debug!(entry = format_args!("0x{entry:08x}"), words = self.memory.written_word_count(), "assembly complete");
        Ok(Assembled {
            memory: self.memory,
            entry,
            globals: self.globals,
            warnings: self.messages,
        })
    }
}

fn natural_alignment(directive: &str) -> Option<u32> {
    match directive {
        ".half" => Some(2),
        ".word" => Some(4),
        ".dword" => Some(8),
        _ => None,
    }
}

const fn align_up(address: u32, alignment: u32) -> u32 {
    address.wrapping_add(alignment - 1) & !(alignment - 1)
}

fn address_operand(text: &str) -> Result<u32, String> {
    parse_int(text)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| format!("\"{text}\" is not a valid address"))
}

fn fits(value: i64, width: u32) -> bool {
    if width >= 8 {
        return true;
    }
    let bits = width * 8;
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << bits) - 1;
    (min..=max).contains(&value)
}

const fn truncate(value: i64, width: u32) -> i64 {
    if width >= 8 { value } else { value & ((1i64 << (width * 8)) - 1) }
}
