//! # Console Tests
//!
//! Stream selection and the shared value renderings.

use pretty_assertions::assert_eq;
use rars_cli::config::{ascii_word, hex_word};
use rars_cli::{DisplayFormat, Stream};
use rstest::rstest;

use crate::common::console::captured;

#[test]
fn me_selects_standard_error() {
    assert_eq!(Stream::select(&["a", "ME", "prog.s"]), Stream::Stderr);
    assert_eq!(Stream::select(&["a", "prog.s"]), Stream::Stdout);
    assert_eq!(Stream::select::<&str>(&[]), Stream::Stdout);
}

#[test]
fn println_appends_newline() {
    let (mut console, buffer) = captured();
    console.print("a");
    console.println("b");
    console.flush();
    assert_eq!(buffer.contents(), "ab\n");
}

#[rstest]
#[case(42, "0x0000002a")]
#[case(-1, "0xffffffff")]
#[case(0, "0x00000000")]
fn hex_words(#[case] value: i32, #[case] expected: &str) {
    assert_eq!(hex_word(value), expected);
}

#[test]
fn ascii_cells_escape_controls() {
    assert_eq!(ascii_word(0x4142_4344), " A B C D");
    assert_eq!(ascii_word(0x0009_0a7f), "\\0\\t\\n .");
    assert_eq!(ascii_word(0x0d20_0000), "\\r  \\0\\0");
}

#[test]
fn double_words_render_all_bytes() {
    assert_eq!(DisplayFormat::Hexadecimal.format_double_word(-1), "0xffffffffffffffff");
    assert_eq!(DisplayFormat::Decimal.format_double_word(-1), "-1");
    assert_eq!(DisplayFormat::Ascii.format_double_word(0x4142_4344), "\\0\\0\\0\\0 A B C D");
}
