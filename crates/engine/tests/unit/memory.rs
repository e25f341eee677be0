//! # Memory Tests
//!
//! Exercises the sparse address space: unwritten words, little-endian byte
//! and halfword merging, alignment and range faults, segment lookup, and the
//! first-null search used by memory dumps.

use rars_engine::{AddressError, Memory, MemoryConfiguration};

const DATA: u32 = 0x1001_0000;

fn memory() -> Memory {
    Memory::new(MemoryConfiguration::Default.layout())
}

#[test]
fn unwritten_word_reads_zero_but_raw_read_is_none() {
    let mem = memory();
    assert_eq!(mem.get_word(DATA), Ok(0));
    assert_eq!(mem.get_raw_word_or_null(DATA), Ok(None));
}

#[test]
fn word_write_and_read() {
    let mut mem = memory();
    mem.set_word(DATA, -559_038_737).unwrap();
    assert_eq!(mem.get_word(DATA), Ok(-559_038_737));
    assert_eq!(mem.get_raw_word_or_null(DATA), Ok(Some(-559_038_737)));
    assert_eq!(mem.written_word_count(), 1);
}

#[test]
fn bytes_merge_little_endian() {
    let mut mem = memory();
    mem.set_byte(DATA + 1, 0xab).unwrap();
    assert_eq!(mem.get_word(DATA), Ok(0xab00));
    mem.set_byte(DATA, 0x12).unwrap();
    assert_eq!(mem.get_word(DATA), Ok(0xab12));
    assert_eq!(mem.get_byte(DATA + 1), Ok(0xab));
}

#[test]
fn halves_merge_little_endian() {
    let mut mem = memory();
    mem.set_half(DATA + 2, 0xbeef).unwrap();
    assert_eq!(mem.get_word(DATA), Ok(0xbeef_0000_u32 as i32));
    assert_eq!(mem.get_half(DATA + 2), Ok(0xbeef));
    assert_eq!(mem.get_half(DATA), Ok(0));
}

#[test]
fn misaligned_word_access_fails() {
    let mem = memory();
    assert_eq!(
        mem.get_word(DATA + 2),
        Err(AddressError::Misaligned {
            address: DATA + 2,
            alignment: 4
        })
    );
}

#[test]
fn unmapped_address_is_out_of_range() {
    let mut mem = memory();
    assert_eq!(mem.get_word(0), Err(AddressError::OutOfRange { address: 0 }));
    assert!(mem.set_word(0x0000_1000, 1).is_err());
}

#[test]
fn segment_bounds_by_name() {
    let mem = memory();
    assert_eq!(mem.segment_bounds(".text"), Some((0x0040_0000, 0x0fff_fffc)));
    assert_eq!(mem.segment_bounds(".data"), Some((DATA, 0x7fff_ffff)));
    assert_eq!(mem.segment_bounds(".kdata"), None);
    assert_eq!(mem.segment_bounds("text"), None);
}

#[test]
fn text_segment_membership() {
    let mem = memory();
    assert!(mem.in_text_segment(0x0040_0000));
    assert!(mem.in_text_segment(0x0fff_fffc));
    assert!(!mem.in_text_segment(DATA));
    assert!(mem.in_data_segment(DATA));
}

#[test]
fn word_alignment() {
    assert!(Memory::word_aligned(0));
    assert!(Memory::word_aligned(0x1001_0004));
    assert!(!Memory::word_aligned(0x1001_0002));
}

#[test]
fn first_null_after_written_prefix() {
    let mut mem = memory();
    mem.set_word(DATA, 1).unwrap();
    mem.set_word(DATA + 4, 2).unwrap();
    mem.set_word(DATA + 12, 4).unwrap();
    assert_eq!(mem.get_address_of_first_null(DATA, DATA + 16), Ok(Some(DATA + 8)));
}

#[test]
fn first_null_at_low_end_when_nothing_written() {
    let mem = memory();
    assert_eq!(mem.get_address_of_first_null(DATA, DATA + 64), Ok(Some(DATA)));
}

#[test]
fn first_null_absent_when_range_fully_written() {
    let mut mem = memory();
    for offset in (0..16).step_by(4) {
        mem.set_word(DATA + offset, 7).unwrap();
    }
    assert_eq!(mem.get_address_of_first_null(DATA, DATA + 12), Ok(None));
}

#[test]
fn first_null_rejects_misaligned_start() {
    let mem = memory();
    assert!(mem.get_address_of_first_null(DATA + 1, DATA + 8).is_err());
}
