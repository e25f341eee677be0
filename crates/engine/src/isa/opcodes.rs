//! Major opcodes (bits 6:0) of the supported instructions.

/// Load upper immediate.
pub const OP_LUI: u32 = 0b011_0111;
/// Add upper immediate to PC.
pub const OP_AUIPC: u32 = 0b001_0111;
/// Jump and link.
pub const OP_JAL: u32 = 0b110_1111;
/// Jump and link register.
pub const OP_JALR: u32 = 0b110_0111;
/// Conditional branches.
pub const OP_BRANCH: u32 = 0b110_0011;
/// Integer loads.
pub const OP_LOAD: u32 = 0b000_0011;
/// Integer stores.
pub const OP_STORE: u32 = 0b010_0011;
/// Register-immediate arithmetic.
pub const OP_IMM: u32 = 0b001_0011;
/// 32-bit register-immediate arithmetic (RV64 only).
pub const OP_IMM_32: u32 = 0b001_1011;
/// Register-register arithmetic.
pub const OP_REG: u32 = 0b011_0011;
/// 32-bit register-register arithmetic (RV64 only).
pub const OP_REG_32: u32 = 0b011_1011;
/// Environment calls and CSR access.
pub const OP_SYSTEM: u32 = 0b111_0011;
/// Floating-point operations.
pub const OP_FP: u32 = 0b101_0011;
