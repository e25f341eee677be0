//! Sparse word-addressed memory.
//!
//! This module implements the simulated address space. It performs:
//! 1. **Storage:** Keeps only words that have been written, so "never written" is observable.
//! 2. **Access Checks:** Enforces natural alignment and rejects addresses outside every segment.
//! 3. **Segment Queries:** Resolves segment names and classifies addresses against the layout.
//!
//! Multi-byte values are little-endian within a word.

use std::collections::BTreeMap;

use crate::common::constants::WORD_LENGTH_BYTES;
use crate::common::error::AddressError;
use crate::config::MemoryLayout;

/// Segment names accepted by [`Memory::segment_bounds`].
pub const SEGMENT_NAMES: [&str; 2] = [".text", ".data"];

/// The simulated address space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    layout: MemoryLayout,
    words: BTreeMap<u32, u32>,
}

impl Memory {
    /// Creates an empty address space with the given layout.
    pub const fn new(layout: MemoryLayout) -> Self {
        Self {
            layout,
            words: BTreeMap::new(),
        }
    }

    /// The segment boundaries this memory was created with.
    pub const fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Returns true if `address` is a multiple of the word size.
    pub const fn word_aligned(address: u32) -> bool {
        address % WORD_LENGTH_BYTES == 0
    }

    /// Returns true if `address` lies in the text segment.
    pub const fn in_text_segment(&self, address: u32) -> bool {
        address >= self.layout.text_base && address <= self.layout.text_limit
    }

    /// Returns true if `address` lies in the data segment.
    pub const fn in_data_segment(&self, address: u32) -> bool {
        address >= self.layout.data_segment_base && address <= self.layout.data_segment_limit
    }

    /// Inclusive address bounds of a named segment.
    ///
    /// # Arguments
    ///
    /// * `name` - One of [`SEGMENT_NAMES`].
    ///
    /// # Returns
    ///
    /// `(low, high)`, or `None` for an unknown name.
    pub fn segment_bounds(&self, name: &str) -> Option<(u32, u32)> {
        match name {
            ".text" => Some((self.layout.text_base, self.layout.text_limit)),
            ".data" => Some((self.layout.data_base, self.layout.data_segment_limit)),
            _ => None,
        }
    }

    /// Reads a word; unwritten words read as zero.
    pub fn get_word(&self, address: u32) -> Result<i32, AddressError> {
        self.check(address, WORD_LENGTH_BYTES)?;
        Ok(self.words.get(&address).copied().unwrap_or(0) as i32)
    }

    /// Reads a word, distinguishing never-written words.
    pub fn get_raw_word_or_null(&self, address: u32) -> Result<Option<i32>, AddressError> {
        self.check(address, WORD_LENGTH_BYTES)?;
        Ok(self.words.get(&address).map(|&word| word as i32))
    }

    /// Writes a word.
    pub fn set_word(&mut self, address: u32, value: i32) -> Result<(), AddressError> {
        self.check(address, WORD_LENGTH_BYTES)?;
        let _ = self.words.insert(address, value as u32);
        Ok(())
    }

    /// Reads a halfword, zero-extended.
    pub fn get_half(&self, address: u32) -> Result<u16, AddressError> {
        self.check(address, 2)?;
        Ok((self.containing_word(address) >> ((address & 2) * 8)) as u16)
    }

    /// Writes a halfword.
    pub fn set_half(&mut self, address: u32, value: u16) -> Result<(), AddressError> {
        self.check(address, 2)?;
        self.merge(address, 0xffff, u32::from(value));
        Ok(())
    }

    /// Reads a byte.
    pub fn get_byte(&self, address: u32) -> Result<u8, AddressError> {
        self.check(address, 1)?;
        Ok((self.containing_word(address) >> ((address & 3) * 8)) as u8)
    }

    /// Writes a byte.
    pub fn set_byte(&mut self, address: u32, value: u8) -> Result<(), AddressError> {
        self.check(address, 1)?;
        self.merge(address, 0xff, u32::from(value));
        Ok(())
    }

    /// Finds the first never-written word at or above `low`.
    ///
    /// # Arguments
    ///
    /// * `low` - First word address to inspect.
    /// * `high` - Last address to inspect.
    ///
    /// # Returns
    ///
    /// The address of the first unwritten word, or `None` if every word up to `high` has been written.
    pub fn get_address_of_first_null(&self, low: u32, high: u32) -> Result<Option<u32>, AddressError> {
        self.check(low, WORD_LENGTH_BYTES)?;
        let mut address = low;
        while address <= high {
            if !self.words.contains_key(&address) {
                return Ok(Some(address));
            }
            match address.checked_add(WORD_LENGTH_BYTES) {
                Some(next) => address = next,
                None => break,
            }
        }
        Ok(None)
    }

    /// Number of words that have been written.
    pub fn written_word_count(&self) -> usize {
        self.words.len()
    }

    const fn mapped(&self, address: u32) -> bool {
        address <= self.layout.memory_high
            && (self.in_text_segment(address)
                || self.in_data_segment(address)
                || address >= self.layout.kernel_base)
    }

    const fn check(&self, address: u32, alignment: u32) -> Result<(), AddressError> {
        if address % alignment != 0 {
            return Err(AddressError::Misaligned { address, alignment });
        }
        if !self.mapped(address) {
            return Err(AddressError::OutOfRange { address });
        }
        Ok(())
    }

    fn containing_word(&self, address: u32) -> u32 {
        self.words.get(&(address & !3)).copied().unwrap_or(0)
    }

    fn merge(&mut self, address: u32, mask: u32, value: u32) {
        let shift = (address & 3) * 8;
        let word = self.words.entry(address & !3).or_insert(0);
        *word = (*word & !(mask << shift)) | ((value & mask) << shift);
    }
}
