//! Instruction execution.

use super::Machine;
use super::alu::AluOp;
use crate::api::TerminationReason;
use crate::common::error::{AddressError, SimulationError};
use crate::core::arch::csr::CsrError;
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::{
    OP_AUIPC, OP_BRANCH, OP_FP, OP_IMM, OP_IMM_32, OP_JAL, OP_JALR, OP_LOAD, OP_LUI, OP_REG,
    OP_REG_32, OP_STORE, OP_SYSTEM,
};

const fn sign_extend_word(value: u32) -> u64 {
    value as i32 as i64 as u64
}

impl Machine {
    /// Executes `inst`, fetched from `pc`; `self.pc` already points past it.
    pub(super) fn execute(&mut self, pc: u32, inst: u32) -> Result<Option<TerminationReason>, SimulationError> {
        let illegal = || SimulationError::new(pc, format!("illegal instruction 0x{inst:08x}"));
        let rd = inst.rd();
        match inst.opcode() {
            OP_LUI => self.set_x(rd, inst.imm_u() as u64),
            OP_AUIPC => self.set_x(rd, (i64::from(pc) + inst.imm_u()) as u64),
            OP_JAL => {
                self.set_x(rd, u64::from(pc.wrapping_add(4)));
                self.pc = (i64::from(pc) + inst.imm_j()) as u32;
            }
            OP_JALR => {
                let target = self.x(inst.rs1()).wrapping_add(inst.imm_i() as u64) & !1;
                self.set_x(rd, u64::from(pc.wrapping_add(4)));
                self.pc = target as u32;
            }
            OP_BRANCH => {
                let a = self.x(inst.rs1());
                let b = self.x(inst.rs2());
                let taken = match inst.funct3() {
                    0b000 => a == b,
                    0b001 => a != b,
                    0b100 => (a as i64) < (b as i64),
                    0b101 => (a as i64) >= (b as i64),
                    0b110 => a < b,
                    0b111 => a >= b,
                    _ => return Err(illegal()),
                };
                if taken {
                    self.pc = (i64::from(pc) + inst.imm_b()) as u32;
                }
            }
            OP_LOAD => self.load(pc, inst)?,
            OP_STORE => self.store(pc, inst)?,
            OP_IMM => {
                let op = AluOp::from_immediate(inst.funct3(), inst & (1 << 30) != 0);
                let imm = inst.imm_i() as u64;
                self.alu(rd, op, self.x(inst.rs1()), imm);
            }
            OP_REG => {
                let op = AluOp::from_register(inst.funct3(), inst.funct7()).ok_or_else(illegal)?;
                self.alu(rd, op, self.x(inst.rs1()), self.x(inst.rs2()));
            }
            OP_IMM_32 if self.config.rv64 => {
                let op = AluOp::from_immediate(inst.funct3(), inst & (1 << 30) != 0);
                let result = op.eval32(self.x(inst.rs1()) as u32, inst.imm_i() as u32);
                self.set_x(rd, sign_extend_word(result));
            }
            OP_REG_32 if self.config.rv64 => {
                let op = AluOp::from_register(inst.funct3(), inst.funct7()).ok_or_else(illegal)?;
                let result = op.eval32(self.x(inst.rs1()) as u32, self.x(inst.rs2()) as u32);
                self.set_x(rd, sign_extend_word(result));
            }
            OP_SYSTEM => return self.system(pc, inst),
            OP_FP => match inst.funct7() {
                0x78 => self.regs.fpr.write_single(rd, self.x(inst.rs1()) as u32),
                0x70 => self.set_x(rd, sign_extend_word(self.regs.fpr.read(inst.rs1()) as u32)),
                _ => return Err(illegal()),
            },
            _ => return Err(illegal()),
        }
        Ok(None)
    }

    fn alu(&mut self, rd: usize, op: AluOp, a: u64, b: u64) {
        let result = if self.config.rv64 {
            op.eval64(a, b)
        } else {
            u64::from(op.eval32(a as u32, b as u32))
        };
        self.set_x(rd, result);
    }

    fn effective_address(&self, inst: u32, offset: i64) -> u32 {
        self.x(inst.rs1()).wrapping_add(offset as u64) as u32
    }

    fn load(&mut self, pc: u32, inst: u32) -> Result<(), SimulationError> {
        let address = self.effective_address(inst, inst.imm_i());
        let fault = |e: AddressError| SimulationError::new(pc, format!("load failed: {e}"));
        let value = match inst.funct3() {
            0b000 => self.memory.get_byte(address).map(|v| v as i8 as i64 as u64),
            0b001 => self.memory.get_half(address).map(|v| v as i16 as i64 as u64),
            0b010 => self.memory.get_word(address).map(|v| i64::from(v) as u64),
            0b011 if self.config.rv64 => self.load_double(address),
            0b100 => self.memory.get_byte(address).map(u64::from),
            0b101 => self.memory.get_half(address).map(u64::from),
            0b110 if self.config.rv64 => self.memory.get_word(address).map(|v| u64::from(v as u32)),
            _ => return Err(SimulationError::new(pc, format!("illegal instruction 0x{inst:08x}"))),
        }
        .map_err(fault)?;
        self.set_x(inst.rd(), value);
        Ok(())
    }

    fn load_double(&self, address: u32) -> Result<u64, AddressError> {
        if address % 8 != 0 {
            return Err(AddressError::Misaligned { address, alignment: 8 });
        }
        let low = self.memory.get_word(address)? as u32;
        let high = self.memory.get_word(address.wrapping_add(4))? as u32;
        Ok((u64::from(high) << 32) | u64::from(low))
    }

    fn store(&mut self, pc: u32, inst: u32) -> Result<(), SimulationError> {
        let address = self.effective_address(inst, inst.imm_s());
        if self.memory.in_text_segment(address) && !self.config.self_modifying_code {
            return Err(SimulationError::new(
                pc,
                format!("cannot write to 0x{address:08x} in the text segment"),
            ));
        }
        let value = self.x(inst.rs2());
        let stored = match inst.funct3() {
            0b000 => self.memory.set_byte(address, value as u8),
            0b001 => self.memory.set_half(address, value as u16),
            0b010 => self.memory.set_word(address, value as i32),
            0b011 if self.config.rv64 => {
                if address % 8 == 0 {
                    self.memory
                        .set_word(address, value as i32)
                        .and_then(|()| self.memory.set_word(address.wrapping_add(4), (value >> 32) as i32))
                } else {
                    Err(AddressError::Misaligned { address, alignment: 8 })
                }
            }
            _ => return Err(SimulationError::new(pc, format!("illegal instruction 0x{inst:08x}"))),
        };
        stored.map_err(|e| SimulationError::new(pc, format!("store failed: {e}")))
    }

    fn system(&mut self, pc: u32, inst: u32) -> Result<Option<TerminationReason>, SimulationError> {
        let funct3 = inst.funct3();
        if funct3 == 0 {
            return match inst >> 20 {
                0 => self.environment_call(pc),
                1 => Ok(Some(TerminationReason::Breakpoint)),
                _ => Err(SimulationError::new(pc, format!("illegal instruction 0x{inst:08x}"))),
            };
        }
        let csr = inst.csr();
        let source = if funct3 & 0b100 != 0 {
            inst.rs1() as u64
        } else {
            self.x(inst.rs1())
        };
        let fault = |e: CsrError| SimulationError::new(pc, e.to_string());
        let old = self.regs.csrs.read(csr).map_err(fault)?;
        match funct3 & 0b011 {
            0b01 => self.regs.csrs.write(csr, source).map_err(fault)?,
            0b10 if inst.rs1() != 0 => self.regs.csrs.write(csr, old | source).map_err(fault)?,
            0b11 if inst.rs1() != 0 => self.regs.csrs.write(csr, old & !source).map_err(fault)?,
            0b10 | 0b11 => {}
            _ => return Err(SimulationError::new(pc, format!("illegal instruction 0x{inst:08x}"))),
        }
        self.set_x(inst.rd(), old);
        Ok(None)
    }
}
