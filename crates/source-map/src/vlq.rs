//! Base64 variable-length quantity codec used by the `mappings` field.
//!
//! Each value is split into 5-bit groups, least significant first. Every group
//! except the last has the continuation bit (`0x20`) set. The sign lives in the
//! lowest bit of the first group.

use crate::VlqError;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const SHIFT: u32 = 5;
const CONTINUATION: u8 = 1 << SHIFT;
const MASK: u8 = CONTINUATION - 1;

fn digit_value(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Encodes a single value.
pub fn encode(value: i64) -> String {
    let mut out = String::new();
    encode_into(value, &mut out);
    out
}

/// Appends the encoding of `value` to `out`.
pub fn encode_into(value: i64, out: &mut String) {
    let mut rest = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = (rest & u64::from(MASK)) as u8;
        rest >>= SHIFT;
        if rest > 0 {
            digit |= CONTINUATION;
        }
        out.push(ALPHABET[digit as usize] as char);
        if rest == 0 {
            break;
        }
    }
}

/// Decodes one value from the start of `input`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(input: &str) -> Result<(i64, usize), VlqError> {
    let mut accum: u64 = 0;
    let mut shift = 0u32;

    for (consumed, &byte) in input.as_bytes().iter().enumerate() {
        let digit = digit_value(byte).ok_or_else(|| {
            // Report the full character, not just the leading byte.
            let ch = input[consumed..].chars().next().unwrap_or(byte as char);
            VlqError::InvalidBase64(ch)
        })?;

        if shift >= 64 {
            return Err(VlqError::Overflow);
        }
        let group = u64::from(digit & MASK);
        if shift > 0 && group >> (64 - shift) != 0 {
            return Err(VlqError::Overflow);
        }
        accum |= group << shift;

        if digit & CONTINUATION == 0 {
            let magnitude = accum >> 1;
            if magnitude > i64::MAX as u64 {
                return Err(VlqError::Overflow);
            }
            let value = if accum & 1 == 1 {
                -(magnitude as i64)
            } else {
                magnitude as i64
            };
            return Ok((value, consumed + 1));
        }
        shift += SHIFT;
    }

    Err(VlqError::UnexpectedEof)
}
