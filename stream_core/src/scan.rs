//! Scanning utilities for fragment text.
//!
//! Fragments are raw game output, so numbers and names sit between ANSI
//! escape sequences. Every scanner here skips a sequence from `ESC` up to
//! and including the first ASCII letter.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::error::ScanError;

pub use universe::parse_thousands;

const ESC: char = '\x1b';
const BACKSPACE: char = '\x08';

/// Long game timestamp, e.g. `11:59:59 PM Mon Dec 31, 2040`.
pub const LONG_DATE_FORMAT: &str = "%I:%M:%S %p %a %b %d, %Y";

/// Characters counted as printable text.
fn is_printable(c: char) -> bool {
    (' '..='}').contains(&c)
}

/// The `len` bytes of `source` starting at `offset`.
pub fn fragment(source: &str, offset: usize, len: usize) -> Result<&str, ScanError> {
    offset
        .checked_add(len)
        .and_then(|end| source.get(offset..end))
        .ok_or(ScanError::Span {
            offset,
            len,
            source_len: source.len(),
        })
}

/// Every integer outside escape sequences, in order. Commas inside a number
/// are thousands separators; a `-` directly before the first digit makes it
/// negative.
pub fn find_integers(text: &str) -> Result<Vec<i64>, ScanError> {
    let mut values = Vec::new();
    let mut digits = String::new();
    let mut in_escape = false;
    let mut previous = None;

    for c in text.chars() {
        if !digits.is_empty() {
            if c.is_ascii_digit() {
                digits.push(c);
                previous = Some(c);
                continue;
            }
            if c == ',' {
                previous = Some(c);
                continue;
            }
            values.push(parse_number(&digits, text)?);
            digits.clear();
            if c == ESC {
                in_escape = true;
            }
        } else if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == ESC {
            in_escape = true;
        } else if c.is_ascii_digit() {
            if previous == Some('-') {
                digits.push('-');
            }
            digits.push(c);
        }
        previous = Some(c);
    }
    if !digits.is_empty() {
        values.push(parse_number(&digits, text)?);
    }
    Ok(values)
}

fn parse_number(digits: &str, text: &str) -> Result<i64, ScanError> {
    digits.parse().map_err(|_| ScanError::Malformed {
        what: "integer",
        text: text.to_string(),
    })
}

/// The first integer outside escape sequences.
pub fn find_integer(text: &str) -> Result<i64, ScanError> {
    find_integers(text)?
        .first()
        .copied()
        .ok_or_else(|| ScanError::NoInteger(text.to_string()))
}

pub fn last_integer(text: &str) -> Result<i64, ScanError> {
    find_integers(text)?
        .last()
        .copied()
        .ok_or_else(|| ScanError::NoInteger(text.to_string()))
}

/// The integer at `index`, counting from zero.
pub fn nth_integer(text: &str, index: usize) -> Result<i64, ScanError> {
    find_integers(text)?
        .get(index)
        .copied()
        .ok_or_else(|| ScanError::NoInteger(text.to_string()))
}

/// Every run of printable characters outside escape sequences.
pub fn find_printables(text: &str) -> Vec<String> {
    let mut runs = Vec::new();
    let mut run = String::new();
    let mut in_escape = false;

    for c in text.chars() {
        if !run.is_empty() {
            if is_printable(c) {
                run.push(c);
                continue;
            }
            runs.push(std::mem::take(&mut run));
            if c == ESC {
                in_escape = true;
            }
        } else if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == ESC {
            in_escape = true;
        } else if is_printable(c) {
            run.push(c);
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }
    runs
}

/// The first run of printable characters outside escape sequences.
pub fn find_printable(text: &str) -> Result<String, ScanError> {
    find_printables(text)
        .into_iter()
        .next()
        .ok_or_else(|| ScanError::NoPrintable(text.to_string()))
}

/// Remove every escape sequence.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_escape = false;
    for c in text.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == ESC {
            in_escape = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Replay backspace editing the way the game echoes it: each `BS SP BS`
/// removes the character before it.
pub fn strip_backspaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == BACKSPACE {
            out.pop();
            chars.next();
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// The first decimal number, such as a percentage with a fractional part.
pub fn find_decimal(text: &str) -> Result<f64, ScanError> {
    let text = strip_ansi(text);
    let start = text
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| ScanError::NoInteger(text.clone()))?;
    let mut seen_point = false;
    let end = text[start..]
        .find(|c: char| {
            if c == '.' && !seen_point {
                seen_point = true;
                return false;
            }
            !c.is_ascii_digit()
        })
        .map_or(text.len(), |i| start + i);
    text[start..end]
        .trim_end_matches('.')
        .parse()
        .map_err(|_| ScanError::Malformed {
            what: "decimal",
            text: text.clone(),
        })
}

/// Text after the first `": "` label separator, with escapes removed.
pub fn after_label(text: &str) -> Result<String, ScanError> {
    let plain = strip_ansi(text);
    plain
        .split_once(": ")
        .map(|(_, value)| value.trim().to_string())
        .ok_or(ScanError::Malformed {
            what: "label",
            text: plain.clone(),
        })
}

/// The last visible character, used by yes/no and mode flags.
pub fn last_char(text: &str) -> Option<char> {
    strip_ansi(text).trim_end().chars().last()
}

pub fn parse_long_date(text: &str) -> Result<NaiveDateTime, ScanError> {
    let plain = strip_ansi(text);
    NaiveDateTime::parse_from_str(plain.trim(), LONG_DATE_FORMAT)
        .map_err(|_| ScanError::BadDate(plain.clone()))
}

/// Parse an `M/D/YY` date, placing two-digit years in the coming century.
pub fn parse_short_date(text: &str) -> Result<NaiveDate, ScanError> {
    universe::parse_short_date(text, Utc::now().year())
        .ok_or_else(|| ScanError::BadDate(text.to_string()))
}
