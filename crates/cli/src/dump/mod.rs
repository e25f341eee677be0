//! Memory dumps.
//!
//! This module writes the `dump <segment> <format> <file>` requests. For each request it:
//! 1. **Resolves the Range:** A segment name, or an `m-n` address range.
//! 2. **Resolves the Format:** One of the [`DumpFormat`] descriptors.
//! 3. **Trims the Range:** Stops before the first word that was never written.
//! 4. **Writes the File:** Creating it only when there is something to dump.
//!
//! Each request fails on its own; a failure is reported and the next request still runs.

/// Dump file formats.
pub mod format;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rars_engine::Memory;
use thiserror::Error;
use tracing::debug;

pub use self::format::{DumpFormat, FormatError};
use crate::config::{AddressRange, DumpRequest, RangeParse};
use crate::console::Console;

/// Why a dump request produced no file.
#[derive(Debug, Error)]
pub enum DumpError {
    /// The segment is neither a known name nor a valid range.
    #[error("Error while attempting to save dump, segment/address-range {0} is invalid!")]
    InvalidSegment(String),
    /// No format has this descriptor.
    #[error("Error while attempting to save dump, format {0} was not found!")]
    UnknownFormat(String),
    /// The first word of the range was never written.
    #[error("This segment has not been written to, there is nothing to dump.")]
    NothingToDump,
    /// The output file could not be created.
    #[error("Error while attempting to save dump, file {} was not found!", .0.display())]
    FileNotFound(PathBuf),
    /// A word in the range could not be read.
    #[error("Error while attempting to save dump, file {}!  Could not access address: {address}!", .path.display())]
    Address {
        /// Output file.
        path: PathBuf,
        /// Faulting address, as a signed word.
        address: i32,
    },
    /// Writing the output failed.
    #[error("Error while attempting to save dump, file {}!  Disk IO failed!", .path.display())]
    Io {
        /// Output file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}

/// Writes dump requests and reports their failures.
#[derive(Debug)]
pub struct MemoryDumpWriter<'c> {
    console: &'c mut Console,
}

impl<'c> MemoryDumpWriter<'c> {
    /// Creates a writer that reports failures on `console`.
    pub const fn new(console: &'c mut Console) -> Self {
        Self { console }
    }

    /// Runs every request in order, printing one line per failed request.
    pub fn write_all(&mut self, requests: &[DumpRequest], memory: &Memory) {
        for request in requests {
            if let Err(e) = Self::write(request, memory) {
                self.console.println(e.to_string());
            }
        }
    }

    /// Runs one request.
    ///
    /// # Returns
    ///
    /// The number of words written.
    pub fn write(request: &DumpRequest, memory: &Memory) -> Result<u32, DumpError> {
        let (low, high) = resolve_segment(&request.segment, memory)
            .ok_or_else(|| DumpError::InvalidSegment(request.segment.clone()))?;
        let format = DumpFormat::from_descriptor(&request.format)
            .ok_or_else(|| DumpError::UnknownFormat(request.format.clone()))?;
        let path = request.path.as_path();

        let last = match memory
            .get_address_of_first_null(low, high)
            .map_err(|e| address_error(path, e.address()))?
        {
            Some(first_null) if first_null <= low => return Err(DumpError::NothingToDump),
            Some(first_null) => first_null - 4,
            None => high & !3,
        };

        let file = File::create(path).map_err(|_| DumpError::FileNotFound(path.to_path_buf()))?;
        let mut out = BufWriter::new(file);
        format.write_range(memory, low, last, &mut out).map_err(|e| match e {
            FormatError::Address(e) => address_error(path, e.address()),
            FormatError::Io(source) => io_error(path, source),
        })?;
        out.flush().map_err(|source| io_error(path, source))?;

        let words = (last - low) / 4 + 1;
        debug!(file = %path.display(), format = format.descriptor(), words, "memory dumped");
        Ok(words)
    }
}

fn resolve_segment(segment: &str, memory: &Memory) -> Option<(u32, u32)> {
    memory.segment_bounds(segment).or_else(|| match AddressRange::parse(segment) {
        RangeParse::Valid(range) => Some((range.low as u32, range.high as u32)),
        RangeParse::Invalid | RangeParse::NotARange => None,
    })
}

fn address_error(path: &Path, address: u32) -> DumpError {
    DumpError::Address {
        path: path.to_path_buf(),
        address: address as i32,
    }
}

fn io_error(path: &Path, source: io::Error) -> DumpError {
    DumpError::Io {
        path: path.to_path_buf(),
        source,
    }
}
