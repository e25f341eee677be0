//! RISC-V instruction set definitions.
//!
//! This module describes the instructions the assembler accepts and the simulator executes:
//! 1. **ABI:** Register and CSR naming.
//! 2. **Encoding:** Field extraction and format encoders.
//! 3. **Opcodes:** Major opcode constants.
//! 4. **Instruction Table:** Mnemonic, operand format and fixed encoding fields of every basic instruction.

/// Register and CSR names.
pub mod abi;

/// Instruction field extraction and encoding.
pub mod instruction;

/// Major opcode constants.
pub mod opcodes;

use self::opcodes::{
    OP_AUIPC, OP_BRANCH, OP_FP, OP_IMM, OP_IMM_32, OP_JAL, OP_JALR, OP_LOAD, OP_LUI, OP_REG,
    OP_REG_32, OP_STORE, OP_SYSTEM,
};

/// Operand shape of a basic instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `rd, rs1, rs2`
    R,
    /// `rd, rs1, imm12`
    I,
    /// `rd, rs1, shamt`
    Shift,
    /// `rd, imm(rs1)`
    Load,
    /// `rs2, imm(rs1)`
    Store,
    /// `rs1, rs2, target`
    Branch,
    /// `rd, imm20`
    Upper,
    /// `rd, target`
    Jump,
    /// `rd, rs1, imm12` or `rd, imm(rs1)`
    JumpRegister,
    /// `rd, csr, rs1`
    Csr,
    /// `rd, csr, uimm5`
    CsrImmediate,
    /// No operands.
    Environment,
    /// `fd, rs1`
    MoveToFloat,
    /// `rd, fs1`
    MoveFromFloat,
}

/// A basic (non-pseudo) instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstructionDef {
    /// Assembly mnemonic.
    pub mnemonic: &'static str,
    /// Operand shape.
    pub format: Format,
    /// Major opcode.
    pub opcode: u32,
    /// Minor opcode.
    pub funct3: u32,
    /// `funct7` for register and shift forms, `funct12` for environment instructions.
    pub extra: u32,
    /// Only available in 64-bit mode.
    pub rv64_only: bool,
}

const fn def(
    mnemonic: &'static str,
    format: Format,
    opcode: u32,
    funct3: u32,
    extra: u32,
    rv64_only: bool,
) -> InstructionDef {
    InstructionDef {
        mnemonic,
        format,
        opcode,
        funct3,
        extra,
        rv64_only,
    }
}

/// Every basic instruction.
pub const INSTRUCTIONS: &[InstructionDef] = &[
    def("lui", Format::Upper, OP_LUI, 0, 0, false),
    def("auipc", Format::Upper, OP_AUIPC, 0, 0, false),
    def("jal", Format::Jump, OP_JAL, 0, 0, false),
    def("jalr", Format::JumpRegister, OP_JALR, 0, 0, false),
    def("beq", Format::Branch, OP_BRANCH, 0b000, 0, false),
    def("bne", Format::Branch, OP_BRANCH, 0b001, 0, false),
    def("blt", Format::Branch, OP_BRANCH, 0b100, 0, false),
    def("bge", Format::Branch, OP_BRANCH, 0b101, 0, false),
    def("bltu", Format::Branch, OP_BRANCH, 0b110, 0, false),
    def("bgeu", Format::Branch, OP_BRANCH, 0b111, 0, false),
    def("lb", Format::Load, OP_LOAD, 0b000, 0, false),
    def("lh", Format::Load, OP_LOAD, 0b001, 0, false),
    def("lw", Format::Load, OP_LOAD, 0b010, 0, false),
    def("ld", Format::Load, OP_LOAD, 0b011, 0, true),
    def("lbu", Format::Load, OP_LOAD, 0b100, 0, false),
    def("lhu", Format::Load, OP_LOAD, 0b101, 0, false),
    def("lwu", Format::Load, OP_LOAD, 0b110, 0, true),
    def("sb", Format::Store, OP_STORE, 0b000, 0, false),
    def("sh", Format::Store, OP_STORE, 0b001, 0, false),
    def("sw", Format::Store, OP_STORE, 0b010, 0, false),
    def("sd", Format::Store, OP_STORE, 0b011, 0, true),
    def("addi", Format::I, OP_IMM, 0b000, 0, false),
    def("slti", Format::I, OP_IMM, 0b010, 0, false),
    def("sltiu", Format::I, OP_IMM, 0b011, 0, false),
    def("xori", Format::I, OP_IMM, 0b100, 0, false),
    def("ori", Format::I, OP_IMM, 0b110, 0, false),
    def("andi", Format::I, OP_IMM, 0b111, 0, false),
    def("slli", Format::Shift, OP_IMM, 0b001, 0x00, false),
    def("srli", Format::Shift, OP_IMM, 0b101, 0x00, false),
    def("srai", Format::Shift, OP_IMM, 0b101, 0x20, false),
    def("addiw", Format::I, OP_IMM_32, 0b000, 0, true),
    def("slliw", Format::Shift, OP_IMM_32, 0b001, 0x00, true),
    def("srliw", Format::Shift, OP_IMM_32, 0b101, 0x00, true),
    def("sraiw", Format::Shift, OP_IMM_32, 0b101, 0x20, true),
    def("add", Format::R, OP_REG, 0b000, 0x00, false),
    def("sub", Format::R, OP_REG, 0b000, 0x20, false),
    def("sll", Format::R, OP_REG, 0b001, 0x00, false),
    def("slt", Format::R, OP_REG, 0b010, 0x00, false),
    def("sltu", Format::R, OP_REG, 0b011, 0x00, false),
    def("xor", Format::R, OP_REG, 0b100, 0x00, false),
    def("srl", Format::R, OP_REG, 0b101, 0x00, false),
    def("sra", Format::R, OP_REG, 0b101, 0x20, false),
    def("or", Format::R, OP_REG, 0b110, 0x00, false),
    def("and", Format::R, OP_REG, 0b111, 0x00, false),
    def("mul", Format::R, OP_REG, 0b000, 0x01, false),
    def("mulh", Format::R, OP_REG, 0b001, 0x01, false),
    def("mulhsu", Format::R, OP_REG, 0b010, 0x01, false),
    def("mulhu", Format::R, OP_REG, 0b011, 0x01, false),
    def("div", Format::R, OP_REG, 0b100, 0x01, false),
    def("divu", Format::R, OP_REG, 0b101, 0x01, false),
    def("rem", Format::R, OP_REG, 0b110, 0x01, false),
    def("remu", Format::R, OP_REG, 0b111, 0x01, false),
    def("addw", Format::R, OP_REG_32, 0b000, 0x00, true),
    def("subw", Format::R, OP_REG_32, 0b000, 0x20, true),
    def("sllw", Format::R, OP_REG_32, 0b001, 0x00, true),
    def("srlw", Format::R, OP_REG_32, 0b101, 0x00, true),
    def("sraw", Format::R, OP_REG_32, 0b101, 0x20, true),
    def("mulw", Format::R, OP_REG_32, 0b000, 0x01, true),
    def("divw", Format::R, OP_REG_32, 0b100, 0x01, true),
    def("divuw", Format::R, OP_REG_32, 0b101, 0x01, true),
    def("remw", Format::R, OP_REG_32, 0b110, 0x01, true),
    def("remuw", Format::R, OP_REG_32, 0b111, 0x01, true),
    def("ecall", Format::Environment, OP_SYSTEM, 0b000, 0x000, false),
    def("ebreak", Format::Environment, OP_SYSTEM, 0b000, 0x001, false),
    def("csrrw", Format::Csr, OP_SYSTEM, 0b001, 0, false),
    def("csrrs", Format::Csr, OP_SYSTEM, 0b010, 0, false),
    def("csrrc", Format::Csr, OP_SYSTEM, 0b011, 0, false),
    def("csrrwi", Format::CsrImmediate, OP_SYSTEM, 0b101, 0, false),
    def("csrrsi", Format::CsrImmediate, OP_SYSTEM, 0b110, 0, false),
    def("csrrci", Format::CsrImmediate, OP_SYSTEM, 0b111, 0, false),
    def("fmv.w.x", Format::MoveToFloat, OP_FP, 0b000, 0x78, false),
    def("fmv.x.w", Format::MoveFromFloat, OP_FP, 0b000, 0x70, false),
];

/// Finds a basic instruction by mnemonic.
pub fn lookup(mnemonic: &str) -> Option<&'static InstructionDef> {
    INSTRUCTIONS.iter().find(|def| def.mnemonic == mnemonic)
}
