//! Source line splitting.
//!
//! A line is `[label:]* [operation [operands]] [# comment]`. Operands are
//! separated by commas or whitespace; quoted strings and character literals are
//! kept intact.

/// One source line broken into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Labels defined on this line, in order.
    pub labels: Vec<&'a str>,
    /// Mnemonic or directive, if any.
    pub operation: Option<&'a str>,
    /// Everything after the operation, trimmed.
    pub operands: &'a str,
}

/// Splits a raw source line.
pub fn split_line(text: &str) -> SourceLine<'_> {
    let mut rest = strip_comment(text).trim();
    let mut labels = Vec::new();
    loop {
        let ident_len = rest.find(|c: char| !is_identifier_char(c)).unwrap_or(rest.len());
        if ident_len > 0 && rest[ident_len..].starts_with(':') && is_identifier(&rest[..ident_len]) {
            labels.push(&rest[..ident_len]);
            rest = rest[ident_len + 1..].trim_start();
        } else {
            break;
        }
    }
    if rest.is_empty() {
        return SourceLine {
            labels,
            operation: None,
            operands: "",
        };
    }
    let split = rest.find(char::is_whitespace).unwrap_or(rest.len());
    SourceLine {
        labels,
        operation: Some(&rest[..split]),
        operands: rest[split..].trim(),
    }
}

/// Removes a trailing `#` comment, ignoring `#` inside quotes.
pub fn strip_comment(text: &str) -> &str {
    let mut quote = None;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, '#') => return &text[..idx],
            _ => {}
        }
    }
    text
}

/// Splits an operand list on commas and whitespace outside quotes.
pub fn split_operands(text: &str) -> Vec<&str> {
    let mut operands = Vec::new();
    let mut start = None;
    let mut quote = None;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c == ',' || c.is_whitespace() {
            if let Some(s) = start.take() {
                operands.push(&text[s..idx]);
            }
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        operands.push(&text[s..]);
    }
    operands
}

/// Splits `offset(register)` into its offset text (possibly empty) and register text.
pub fn split_memory_operand(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    Some((inner[..open].trim(), inner[open + 1..].trim()))
}

/// Parses the comma-separated string literals of `.ascii`-style directives.
///
/// # Returns
///
/// The decoded bytes of each literal, or a description of the malformed input.
pub fn parse_string_literals(text: &str) -> Result<Vec<Vec<u8>>, String> {
    let mut strings = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let body = rest
            .strip_prefix('"')
            .ok_or_else(|| format!("\"{rest}\" is not a string literal"))?;
        let mut bytes = Vec::new();
        let mut chars = body.char_indices();
        let mut end = None;
        while let Some((idx, c)) = chars.next() {
            match c {
                '"' => {
                    end = Some(idx);
                    break;
                }
                '\\' => {
                    let (_, escaped) = chars.next().ok_or("unterminated string literal")?;
                    bytes.push(unescape(escaped)?);
                }
                c => {
                    let mut buf = [0; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        let end = end.ok_or("unterminated string literal")?;
        strings.push(bytes);
        rest = body[end + 1..].trim_start();
        rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
    }
    if strings.is_empty() {
        return Err("missing string literal".to_string());
    }
    Ok(strings)
}

/// Parses a character literal such as `'a'` or `'\n'`.
pub fn parse_char_literal(text: &str) -> Option<i64> {
    let body = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = body.chars();
    let value = match (chars.next()?, chars.next()) {
        ('\\', Some(escaped)) => unescape(escaped).ok()?,
        (c, None) => return Some(i64::from(u32::from(c))),
        _ => return None,
    };
    chars.next().is_none().then_some(i64::from(value))
}

/// Returns true if `text` is a valid symbol name.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '$'))
        && chars.all(is_identifier_char)
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$')
}

fn unescape(c: char) -> Result<u8, String> {
    Ok(match c {
        'n' => b'\n',
        't' => b'\t',
        'r' => b'\r',
        '0' => 0,
        '\\' => b'\\',
        '"' => b'"',
        '\'' => b'\'',
        other => return Err(format!("unknown escape sequence \\{other}")),
    })
}
