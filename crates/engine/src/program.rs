//! The reference [`Engine`] implementation.
//!
//! A `Program` keeps the pristine assembled image so that every `setup` starts
//! from the same memory contents, and owns the machine that runs it.

use std::io::{self, BufReader, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::debug;

use crate::api::{Engine, TerminationReason};
use crate::asm::{self, Assembled};
use crate::common::constants::WORD_LENGTH_BYTES;
use crate::common::error::{AddressError, AssemblyError, ErrorList, SimulationError};
use crate::config::SimConfig;
use crate::isa::abi::{REG_A0, REG_A1, REG_GP, REG_SP, csr_address, fpr_index, gpr_index};
use crate::memory::Memory;
use crate::sim::Machine;

/// An assembled program and the machine that executes it.
#[derive(Debug)]
pub struct Program {
    image: Option<Assembled>,
    machine: Machine,
}

impl Program {
    /// Creates an engine that talks to the process standard streams.
    pub fn new(config: SimConfig) -> Self {
        Self::with_output(config, Box::new(io::stdout()))
    }

    /// Creates an engine whose program output goes to `output`.
    pub fn with_output(config: SimConfig, output: Box<dyn Write>) -> Self {
        Self {
            image: None,
            machine: Machine::new(config, output, Box::new(BufReader::new(io::stdin()))),
        }
    }

    /// The settings this engine was built with.
    pub const fn config(&self) -> &SimConfig {
        &self.machine.config
    }

    /// Flag that interrupts [`Engine::simulate`] when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.machine.stop_handle()
    }

    /// Exit code requested by the program, once it has exited.
    pub const fn exit_code(&self) -> Option<i32> {
        self.machine.exit_code
    }

    /// Address of the next instruction.
    pub const fn pc(&self) -> u32 {
        self.machine.pc
    }

    /// Entry point of the assembled program.
    pub fn entry_point(&self) -> Option<u32> {
        self.image.as_ref().map(|image| image.entry)
    }

    /// Address of a `.globl` label.
    pub fn global_address(&self, name: &str) -> Option<u32> {
        self.image.as_ref()?.globals.get(name).copied()
    }

    fn place_arguments(&mut self, arguments: &[String]) -> Result<(), SimulationError> {
        let layout = *self.machine.memory.layout();
        let pc = self.machine.pc;
        let fault = |e: AddressError| SimulationError::new(pc, format!("cannot place program arguments: {e}"));
        let memory = &mut self.machine.memory;

        let mut cursor = layout.stack_base.wrapping_add(WORD_LENGTH_BYTES);
        let mut pointers = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let bytes = argument.as_bytes();
            cursor = cursor.wrapping_sub(bytes.len() as u32 + 1);
            for (offset, &byte) in bytes.iter().chain(&[0]).enumerate() {
                memory.set_byte(cursor.wrapping_add(offset as u32), byte).map_err(fault)?;
            }
            pointers.push(cursor);
        }

        cursor &= !(WORD_LENGTH_BYTES - 1);
        cursor = cursor.wrapping_sub(WORD_LENGTH_BYTES * (pointers.len() as u32 + 1));
        for (idx, &pointer) in pointers.iter().chain(&[0]).enumerate() {
            memory
                .set_word(cursor.wrapping_add(WORD_LENGTH_BYTES * idx as u32), pointer as i32)
                .map_err(fault)?;
        }

        self.machine.set_x(REG_A0, arguments.len() as u64);
        self.machine.set_x(REG_A1, u64::from(cursor));
        self.machine.set_x(REG_SP, u64::from(cursor.wrapping_sub(WORD_LENGTH_BYTES)));
        Ok(())
    }

    fn not_assembled(&self) -> SimulationError {
        SimulationError::new(self.machine.pc, "no program has been assembled")
    }
}

impl Engine for Program {
    fn assemble(&mut self, files: &[PathBuf], main_file: &Path) -> Result<ErrorList, AssemblyError> {
        self.image = None;
        self.machine.memory = Memory::new(self.machine.config.layout());
        let assembled = asm::assemble(files, main_file, &self.machine.config)?;
        let warnings = assembled.warnings.clone();
        self.machine.memory = assembled.memory.clone();
        self.image = Some(assembled);
        Ok(warnings)
    }

    fn setup(&mut self, program_arguments: Option<&[String]>, stdin: Option<&str>) -> Result<(), SimulationError> {
        let Some(image) = &self.image else {
            return Err(self.not_assembled());
        };
        let layout = *image.memory.layout();
        self.machine.memory = image.memory.clone();
        self.machine.pc = image.entry;
        self.machine.exit_code = None;
        self.machine.regs.gpr.reset();
        self.machine.regs.fpr.reset();
        self.machine.regs.csrs.reset();
        self.machine.set_x(REG_SP, u64::from(layout.stack_pointer));
        self.machine.set_x(REG_GP, u64::from(layout.global_pointer));
        if let Some(text) = stdin {
            self.machine.set_input(Box::new(Cursor::new(text.as_bytes().to_vec())));
        }
        if let Some(arguments) = program_arguments {
            self.place_arguments(arguments)?;
        }
        debug!(entry = format_args!("0x{:08x}", self.machine.pc), "program ready");
        Ok(())
    }

    fn simulate(&mut self) -> Result<TerminationReason, SimulationError> {
        if self.image.is_none() {
            return Err(self.not_assembled());
        }
        let reason = self.machine.run()?;
        debug!(?reason, steps = self.machine.regs.csrs.retired(), "simulation paused");
        Ok(reason)
    }

    fn register_value(&self, name: &str) -> Option<i64> {
        let regs = &self.machine.regs;
        if let Some(idx) = gpr_index(name) {
            return Some(regs.gpr.read(idx) as i64);
        }
        if let Some(idx) = fpr_index(name) {
            return Some(regs.fpr.read(idx) as i64);
        }
        csr_address(name).and_then(|addr| regs.csrs.read(addr).ok()).map(|value| value as i64)
    }

    fn memory(&self) -> &Memory {
        &self.machine.memory
    }
}
