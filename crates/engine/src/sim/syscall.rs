//! Environment call services.
//!
//! The service number is taken from `a7` and arguments from `a0`.

use std::io::{self, BufRead, Read, Write};

use super::Machine;
use crate::api::TerminationReason;
use crate::common::error::SimulationError;
use crate::isa::abi::{REG_A0, REG_A7};

/// Print the integer in `a0`.
pub const PRINT_INT: u64 = 1;
/// Print the NUL-terminated string at `a0`.
pub const PRINT_STRING: u64 = 4;
/// Read a decimal integer line into `a0`.
pub const READ_INT: u64 = 5;
/// Exit with code 0.
pub const EXIT: u64 = 10;
/// Print the low byte of `a0` as a character.
pub const PRINT_CHAR: u64 = 11;
/// Read one byte into `a0`.
pub const READ_CHAR: u64 = 12;
/// Print `a0` in hexadecimal.
pub const PRINT_INT_HEX: u64 = 34;
/// Print `a0` as an unsigned integer.
pub const PRINT_INT_UNSIGNED: u64 = 36;
/// Exit with the code in `a0`.
pub const EXIT2: u64 = 93;

impl Machine {
    pub(super) fn environment_call(&mut self, pc: u32) -> Result<Option<TerminationReason>, SimulationError> {
        let a0 = self.x(REG_A0);
        let io_fault = |e: io::Error| SimulationError::new(pc, format!("I/O error: {e}"));
        match self.x(REG_A7) {
            PRINT_INT => write!(self.output, "{}", a0 as i64).map_err(io_fault)?,
            PRINT_STRING => {
                let text = self.read_c_string(pc, a0 as u32)?;
                self.output.write_all(&text).map_err(io_fault)?;
            }
            READ_INT => {
                let mut line = String::new();
                let _ = self.input.read_line(&mut line).map_err(io_fault)?;
                let value = line.trim().parse::<i64>().map_err(|_| {
                    SimulationError::new(pc, format!("invalid integer input: \"{}\"", line.trim()))
                })?;
                self.set_x(REG_A0, value as u64);
            }
            EXIT => {
                self.exit_code = Some(0);
                return Ok(Some(TerminationReason::NormalTermination));
            }
            PRINT_CHAR => self.output.write_all(&[a0 as u8]).map_err(io_fault)?,
            READ_CHAR => {
                let mut byte = [0u8; 1];
                let read = self.input.read(&mut byte).map_err(io_fault)?;
                if read == 0 {
                    return Err(SimulationError::new(pc, "end of input while reading a character"));
                }
                self.set_x(REG_A0, u64::from(byte[0]));
            }
            PRINT_INT_HEX if self.config.rv64 => write!(self.output, "0x{a0:016x}").map_err(io_fault)?,
            PRINT_INT_HEX => write!(self.output, "0x{:08x}", a0 as u32).map_err(io_fault)?,
            PRINT_INT_UNSIGNED if self.config.rv64 => write!(self.output, "{a0}").map_err(io_fault)?,
            PRINT_INT_UNSIGNED => write!(self.output, "{}", a0 as u32).map_err(io_fault)?,
            EXIT2 => {
                self.exit_code = Some(a0 as i32);
                return Ok(Some(TerminationReason::NormalTermination));
            }
            service => {
                return Err(SimulationError::new(
                    pc,
                    format!("invalid or unimplemented environment call service {service}"),
                ));
            }
        }
        self.output.flush().map_err(io_fault)?;
        Ok(None)
    }

    fn read_c_string(&self, pc: u32, mut address: u32) -> Result<Vec<u8>, SimulationError> {
        let mut text = Vec::new();
        loop {
            let byte = self
                .memory
                .get_byte(address)
                .map_err(|e| SimulationError::new(pc, format!("string read failed: {e}")))?;
            if byte == 0 {
                return Ok(text);
            }
            text.push(byte);
            address = address.wrapping_add(1);
        }
    }
}
