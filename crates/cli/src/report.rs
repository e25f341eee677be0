//! Post-mortem reports.
//!
//! After every breakpoint and at the end of a run, the reporter prints the
//! requested state in a fixed order:
//! 1. **Instruction Count:** The `cycle` counter, when `ic` was given.
//! 2. **Registers:** Each listed register, in command-line order.
//! 3. **Memory:** Each listed range, four words per line.

use rars_engine::Engine;
use rars_engine::isa::abi::{csr_address, fpr_index, gpr_index};
use tracing::debug;

use crate::config::{AddressRange, DisplayFormat, RunConfiguration, hex_word};
use crate::console::Console;

/// Words printed on one line of a memory report.
pub const MEMORY_WORDS_PER_LINE: usize = 4;

/// Renders requested register and memory contents.
#[derive(Debug)]
pub struct PostMortemReporter<'a> {
    config: &'a RunConfiguration,
}

impl<'a> PostMortemReporter<'a> {
    /// Creates a reporter for the settings of `config`.
    pub const fn new(config: &'a RunConfiguration) -> Self {
        Self { config }
    }

    /// Prints one complete report for the current state of `engine`.
    pub fn report<E: Engine + ?Sized>(&self, engine: &E, console: &mut Console) {
        if self.config.count_instructions {
            let count = engine.register_value("cycle").unwrap_or(0);
            console.println(format!("\n{count}"));
        }
        for name in &self.config.register_display_list {
            if let Some(line) = self.register_line(engine, name) {
                console.println(line);
            } else {
                debug!(register = %name, "register has no value");
            }
        }
        for range in &self.config.memory_display_list {
            console.println(self.memory_lines(engine, *range));
        }
    }

    /// One register line, or `None` if the engine does not know `name`.
    pub fn register_line<E: Engine + ?Sized>(&self, engine: &E, name: &str) -> Option<String> {
        let value = engine.register_value(name)?;
        let format = self.config.display_format;
        let rendered = if gpr_index(name).is_some() {
            if self.config.rv64_enabled {
                format.format_double_word(value)
            } else {
                format.format_word(value as i32)
            }
        } else if fpr_index(name).is_some() {
            render_float(format, value as u32)
        } else if csr_address(name).is_some() {
            format.format_word(value as i32)
        } else {
            return None;
        };
        Some(if self.config.verbose {
            format!("{name}\t{rendered}")
        } else {
            rendered
        })
    }

    /// The lines for one memory range, without the final newline.
    pub fn memory_lines<E: Engine + ?Sized>(&self, engine: &E, range: AddressRange) -> String {
        let memory = engine.memory();
        let mut out = String::new();
        let mut address = range.low;
        let mut shown = 0;
        while address <= range.high {
            if address < 0 && range.high >= 0 {
                break;
            }
            if shown % MEMORY_WORDS_PER_LINE == 0 {
                if shown > 0 {
                    out.push('\n');
                }
                if self.config.verbose {
                    out.push_str(&format!("Mem[{}]\t", hex_word(address)));
                }
            }
            let unsigned = address as u32;
            let value = if memory.in_text_segment(unsigned) {
                memory.get_raw_word_or_null(unsigned).map(Option::unwrap_or_default)
            } else {
                memory.get_word(unsigned)
            };
            match value {
                Ok(value) => out.push_str(&self.config.display_format.format_word(value)),
                Err(_) => out.push_str(&format!("Invalid address: {address}")),
            }
            out.push('\t');
            shown += 1;
            match address.checked_add(4) {
                Some(next) => address = next,
                None => break,
            }
        }
        out
    }
}

fn render_float(format: DisplayFormat, bits: u32) -> String {
    match format {
        DisplayFormat::Decimal => format!("{:?}", f32::from_bits(bits)),
        DisplayFormat::Hexadecimal | DisplayFormat::Ascii => format.format_word(bits as i32),
    }
}
