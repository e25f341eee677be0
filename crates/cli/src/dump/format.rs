//! Memory dump file formats.
//!
//! Every format walks the range one word at a time and stops early at the first
//! word that was never written.

use std::io::{self, Write};

use rars_engine::{AddressError, Memory};
use thiserror::Error;

use crate::config::ascii_word;

/// Failure while writing a dump body.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A word in the range could not be read.
    #[error(transparent)]
    Address(#[from] AddressError),
    /// The output could not be written.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A dump file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpFormat {
    /// One line of four character cells per word.
    AsciiText,
    /// Raw little-endian bytes.
    Binary,
    /// One line of 32 binary digits per word.
    BinaryText,
    /// One line of 8 hex digits per word.
    HexText,
    /// Intel HEX records of one word each, then an end-of-file record.
    IntelHex,
}

impl DumpFormat {
    /// Every format, in presentation order.
    pub const ALL: [Self; 5] = [Self::AsciiText, Self::Binary, Self::BinaryText, Self::HexText, Self::IntelHex];

    /// The case-sensitive name used on the command line.
    pub const fn descriptor(self) -> &'static str {
        match self {
            Self::AsciiText => "AsciiText",
            Self::Binary => "Binary",
            Self::BinaryText => "BinaryText",
            Self::HexText => "HexText",
            Self::IntelHex => "IntelHex",
        }
    }

    /// Looks up a format by its exact descriptor.
    pub fn from_descriptor(descriptor: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.descriptor() == descriptor)
    }

    /// Writes the words from `low` to `high` inclusive.
    ///
    /// # Arguments
    ///
    /// * `memory` - Source of the words.
    /// * `low` - First word address.
    /// * `high` - Last word address.
    /// * `out` - Destination.
    pub fn write_range(self, memory: &Memory, low: u32, high: u32, out: &mut impl Write) -> Result<(), FormatError> {
        let mut address = low;
        while address <= high {
            let Some(word) = memory.get_raw_word_or_null(address)? else {
                break;
            };
            match self {
                Self::AsciiText => writeln!(out, "{}", ascii_word(word))?,
                Self::Binary => out.write_all(&word.to_le_bytes())?,
                Self::BinaryText => writeln!(out, "{:032b}", word as u32)?,
                Self::HexText => writeln!(out, "{:08x}", word as u32)?,
                Self::IntelHex => writeln!(out, "{}", intel_hex_record(address.wrapping_sub(low), word))?,
            }
            match address.checked_add(4) {
                Some(next) => address = next,
                None => break,
            }
        }
        if self == Self::IntelHex {
            writeln!(out, ":00000001FF")?;
        }
        Ok(())
    }
}

/// Builds a 4-byte data record; the offset keeps its low 16 bits.
fn intel_hex_record(offset: u32, word: i32) -> String {
    let offset = offset & 0xffff;
    let word = word as u32;
    let sum = [4, offset, offset >> 8, word, word >> 8, word >> 16, word >> 24]
        .iter()
        .fold(0u32, |sum, &byte| sum.wrapping_add(byte & 0xff));
    let checksum = (sum as u8).wrapping_neg();
    format!(":04{offset:04X}00{word:08X}{checksum:02X}")
}
