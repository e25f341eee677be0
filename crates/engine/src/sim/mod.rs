//! Functional simulation.
//!
//! This module executes an assembled program one instruction at a time. It provides:
//! 1. **Machine State:** Registers, memory, program counter and the I/O streams used by environment calls.
//! 2. **Execution:** Fetch, decode and execute for the supported instruction subset.
//! 3. **Environment Calls:** The console and exit services.

/// Integer arithmetic.
pub mod alu;

/// Instruction execution.
pub mod execute;

/// Environment call services.
pub mod syscall;

use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use crate::api::TerminationReason;
use crate::common::error::SimulationError;
use crate::config::SimConfig;
use crate::core::RegisterFile;
use crate::memory::Memory;

/// Architectural state plus the streams a running program talks to.
pub struct Machine {
    /// Engine settings.
    pub config: SimConfig,
    /// Register state.
    pub regs: RegisterFile,
    /// Address space.
    pub memory: Memory,
    /// Address of the next instruction.
    pub pc: u32,
    /// Exit code requested by the program, once it has exited.
    pub exit_code: Option<i32>,
    stop: Arc<AtomicBool>,
    output: Box<dyn Write>,
    input: Box<dyn BufRead>,
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("config", &self.config)
            .field("pc", &format_args!("0x{:08x}", self.pc))
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}

impl Machine {
    /// Creates a machine with empty memory.
    pub fn new(config: SimConfig, output: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        let layout = config.layout();
        Self {
            config,
            regs: RegisterFile::new(),
            memory: Memory::new(layout),
            pc: layout.text_base,
            exit_code: None,
            stop: Arc::new(AtomicBool::new(false)),
            output,
            input,
        }
    }

    /// Flag that stops a run between two instructions when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Replaces the stream read by the input services.
    pub fn set_input(&mut self, input: Box<dyn BufRead>) {
        self.input = input;
    }

    /// Reads an integer register.
    pub fn x(&self, idx: usize) -> u64 {
        self.regs.gpr.read(idx)
    }

    /// Writes an integer register; in 32-bit mode the value is sign-extended from bit 31.
    pub fn set_x(&mut self, idx: usize, value: u64) {
        let value = if self.config.rv64 {
            value
        } else {
            i64::from(value as u32 as i32) as u64
        };
        self.regs.gpr.write(idx, value);
    }

    /// Runs until the program stops.
    ///
    /// The step limit applies to each call separately.
    pub fn run(&mut self) -> Result<TerminationReason, SimulationError> {
        let limit = self.config.step_limit();
        let mut steps = 0u64;
        loop {
            if self.stop.swap(false, Ordering::Relaxed) {
                return Ok(TerminationReason::Stopped);
            }
            if limit.is_some_and(|limit| steps >= limit) {
                return Ok(TerminationReason::MaxSteps);
            }
            steps += 1;
            if let Some(reason) = self.step()? {
                return Ok(reason);
            }
        }
    }

    /// Executes one instruction.
    ///
    /// # Returns
    ///
    /// `Some(reason)` when the program stops at this instruction.
    pub fn step(&mut self) -> Result<Option<TerminationReason>, SimulationError> {
        let pc = self.pc;
        if !self.config.self_modifying_code && !self.memory.in_text_segment(pc) {
            return Err(SimulationError::new(
                pc,
                format!("cannot fetch an instruction from 0x{pc:08x}, outside the text segment"),
            ));
        }
        let inst = match self.memory.get_raw_word_or_null(pc) {
            Ok(Some(word)) => word as u32,
            Ok(None) => return Ok(Some(TerminationReason::CliffTermination)),
            Err(e) => return Err(SimulationError::new(pc, format!("instruction fetch failed: {e}"))),
        };
        trace!(pc = format_args!("0x{pc:08x}"), inst = format_args!("0x{inst:08x}"), "execute");
        self.pc = pc.wrapping_add(4);
        let outcome = self.execute(pc, inst)?;
        self.regs.csrs.retire();
        Ok(outcome)
    }
}
