//! # Literal Parsing Tests
//!
//! Covers the shared literal grammar: optional sign, decimal, `0x` and `0b`
//! bodies, and the 32-bit word rules used by the command line.

use proptest::prelude::*;
use rars_engine::common::number::{decode_word, parse_int};
use rstest::rstest;

#[rstest]
#[case("42", Some(42))]
#[case("-17", Some(-17))]
#[case("+5", Some(5))]
#[case("0x10", Some(16))]
#[case("-0x10", Some(-16))]
#[case("0b101", Some(5))]
#[case("0XFF", Some(255))]
#[case("010", Some(10))]
#[case("0xFFFFFFFF", Some(4_294_967_295))]
#[case("", None)]
#[case("-", None)]
#[case("0x", None)]
#[case("12a", None)]
#[case("0b102", None)]
#[case("t0", None)]
fn parse_int_cases(#[case] text: &str, #[case] expected: Option<i64>) {
    assert_eq!(parse_int(text), expected);
}

#[rstest]
#[case("0", Some(0))]
#[case("100", Some(100))]
#[case("-2147483648", Some(i32::MIN))]
#[case("2147483647", Some(i32::MAX))]
#[case("2147483648", None)]
#[case("0xFFFFFFFF", Some(-1))]
#[case("0x80000000", Some(i32::MIN))]
#[case("0x100000000", None)]
#[case("0b11111111111111111111111111111111", Some(-1))]
#[case("abc", None)]
fn decode_word_cases(#[case] text: &str, #[case] expected: Option<i32>) {
    assert_eq!(decode_word(text), expected);
}

/// A leading zero does not switch to octal.
#[test]
fn leading_zero_is_decimal() {
    assert_eq!(decode_word("0777"), Some(777));
}

proptest! {
    #[test]
    fn decimal_words_decode_to_themselves(value in any::<i32>()) {
        prop_assert_eq!(decode_word(&value.to_string()), Some(value));
    }

    #[test]
    fn hex_words_name_bit_patterns(value in any::<u32>()) {
        prop_assert_eq!(decode_word(&format!("0x{value:x}")), Some(value as i32));
        prop_assert_eq!(decode_word(&format!("0b{value:b}")), Some(value as i32));
    }
}
