//! # Memory Dump Tests
//!
//! Segment and range resolution, each file format, and the failure messages.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rars_cli::{DumpError, DumpRequest, MemoryDumpWriter};
use rars_engine::{Memory, MemoryConfiguration};
use tempfile::TempDir;

use crate::common::console::captured;

const DATA: u32 = 0x1001_0000;

fn memory(words: &[i32]) -> Memory {
    let mut memory = Memory::new(MemoryConfiguration::Default.layout());
    for (i, &word) in words.iter().enumerate() {
        memory.set_word(DATA + 4 * i as u32, word).unwrap();
    }
    memory
}

fn request(segment: &str, format: &str, path: PathBuf) -> DumpRequest {
    DumpRequest {
        segment: segment.to_string(),
        format: format.to_string(),
        path,
    }
}

fn out(dir: &TempDir) -> PathBuf {
    dir.path().join("dump.out")
}

#[test]
fn hex_text_stops_at_first_unwritten_word() {
    let dir = tempfile::tempdir().unwrap();
    let mut memory = memory(&[1, 0xabcd]);
    memory.set_word(DATA + 12, 5).unwrap();

    let words = MemoryDumpWriter::write(&request(".data", "HexText", out(&dir)), &memory).unwrap();
    assert_eq!(words, 2);
    assert_eq!(fs::read_to_string(out(&dir)).unwrap(), "00000001\n0000abcd\n");
}

#[test]
fn binary_text_and_ascii_text() {
    let dir = tempfile::tempdir().unwrap();
    let memory = memory(&[5, 0x4142_4344]);

    let _ = MemoryDumpWriter::write(&request(".data", "BinaryText", out(&dir)), &memory).unwrap();
    assert_eq!(
        fs::read_to_string(out(&dir)).unwrap(),
        "00000000000000000000000000000101\n01000001010000100100001101000100\n"
    );

    let _ = MemoryDumpWriter::write(&request(".data", "AsciiText", out(&dir)), &memory).unwrap();
    assert_eq!(fs::read_to_string(out(&dir)).unwrap(), "\\0\\0\\0 .\n A B C D\n");
}

#[test]
fn binary_is_little_endian() {
    let dir = tempfile::tempdir().unwrap();
    let memory = memory(&[0x1234_5678]);
    let _ = MemoryDumpWriter::write(&request(".data", "Binary", out(&dir)), &memory).unwrap();
    assert_eq!(fs::read(out(&dir)).unwrap(), vec![0x78, 0x56, 0x34, 0x12]);
}

#[test]
fn intel_hex_records_and_terminator() {
    let dir = tempfile::tempdir().unwrap();
    let memory = memory(&[0x1234_5678, 0]);
    let _ = MemoryDumpWriter::write(&request(".data", "IntelHex", out(&dir)), &memory).unwrap();
    assert_eq!(
        fs::read_to_string(out(&dir)).unwrap(),
        ":0400000012345678E8\n:0400040000000000F8\n:00000001FF\n"
    );
}

#[test]
fn address_range_as_segment() {
    let dir = tempfile::tempdir().unwrap();
    let memory = memory(&[1, 2, 3]);
    let words = MemoryDumpWriter::write(&request("0x10010000-0x10010004", "HexText", out(&dir)), &memory).unwrap();
    assert_eq!(words, 2);
    assert_eq!(fs::read_to_string(out(&dir)).unwrap(), "00000001\n00000002\n");
}

#[test]
fn empty_segment_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = MemoryDumpWriter::write(&request(".text", "HexText", out(&dir)), &memory(&[1]));
    assert!(matches!(result, Err(DumpError::NothingToDump)));
    assert!(!out(&dir).exists());
}

#[test]
fn unknown_segment() {
    let dir = tempfile::tempdir().unwrap();
    let error = MemoryDumpWriter::write(&request(".kdata", "HexText", out(&dir)), &memory(&[1])).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Error while attempting to save dump, segment/address-range .kdata is invalid!"
    );
}

#[test]
fn format_descriptors_are_case_sensitive() {
    let dir = tempfile::tempdir().unwrap();
    let error = MemoryDumpWriter::write(&request(".data", "hextext", out(&dir)), &memory(&[1])).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Error while attempting to save dump, format hextext was not found!"
    );
}

#[test]
fn unwritable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("dump.out");
    let error = MemoryDumpWriter::write(&request(".data", "HexText", path.clone()), &memory(&[1])).unwrap_err();
    assert!(matches!(&error, DumpError::FileNotFound(p) if *p == path));
}

#[test]
fn unmapped_range_is_an_address_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = MemoryDumpWriter::write(&request("0x0-0x8", "HexText", out(&dir)), &memory(&[1])).unwrap_err();
    assert!(matches!(error, DumpError::Address { address: 0, .. }));
    assert!(error.to_string().ends_with("Could not access address: 0!"));
}

#[test]
fn write_all_reports_each_failure_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let (mut console, buffer) = captured();
    let requests = [
        request(".kdata", "HexText", out(&dir)),
        request(".data", "HexText", out(&dir)),
        request(".text", "HexText", dir.path().join("text.out")),
    ];
    MemoryDumpWriter::new(&mut console).write_all(&requests, &memory(&[7]));
    assert_eq!(
        buffer.contents(),
        "Error while attempting to save dump, segment/address-range .kdata is invalid!\n\
         This segment has not been written to, there is nothing to dump.\n"
    );
    assert_eq!(fs::read_to_string(out(&dir)).unwrap(), "00000007\n");
}
