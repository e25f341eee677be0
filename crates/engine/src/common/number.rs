//! Integer literal parsing.
//!
//! Literals take an optional sign followed by decimal digits, a `0x` hexadecimal
//! body, or a `0b` binary body. Octal is not recognized: a leading zero is just
//! a decimal digit.

/// Parses an integer literal into an `i64`.
///
/// # Arguments
///
/// * `text` - The literal, without surrounding whitespace.
///
/// # Returns
///
/// The value, or `None` when the text is not a well-formed literal or does not fit in 64 bits.
pub fn parse_int(text: &str) -> Option<i64> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = split_radix(body);
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else if radix == 10 {
        i64::try_from(magnitude).ok()
    } else {
        // Radix-prefixed literals name a bit pattern.
        Some(magnitude as i64)
    }
}

/// Decodes a 32-bit word literal.
///
/// Hexadecimal and binary literals may use the full unsigned 32-bit range and are
/// reinterpreted as two's complement (`0xFFFFFFFF` is `-1`). Decimal literals must
/// fit a signed 32-bit integer.
pub fn decode_word(text: &str) -> Option<i32> {
    let value = parse_int(text)?;
    let unsigned_body = text.trim_start_matches(['-', '+']);
    if split_radix(unsigned_body).0 == 10 {
        return i32::try_from(value).ok();
    }
    if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&value) {
        Some(value as i32)
    } else {
        None
    }
}

fn split_radix(body: &str) -> (u32, &str) {
    if let Some(rest) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (2, rest)
    } else {
        (10, body)
    }
}
