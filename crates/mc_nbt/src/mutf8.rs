//! Java's "modified UTF-8", the string encoding used for names and string tags.
//!
//! It differs from UTF-8 in two places: U+0000 is written as `C0 80`, and
//! characters outside the BMP are written as a UTF-16 surrogate pair with
//! each half encoded as its own 3 byte sequence.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Encode a string, borrowing when the bytes are identical to UTF-8
pub fn encode(s: &str) -> Cow<'_, [u8]> {
    if !s.bytes().any(|b| b == 0 || b >= 0xF0) {
        return Cow::Borrowed(s.as_bytes());
    }

    let mut out = Vec::with_capacity(s.len() + 4);
    for c in s.chars() {
        match c as u32 {
            0 => out.extend_from_slice(&[0xC0, 0x80]),
            0x1_0000..=0x10_FFFF => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    push_three_bytes(&mut out, *unit as u32);
                }
            }
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    Cow::Owned(out)
}

fn push_three_bytes(out: &mut Vec<u8>, unit: u32) {
    out.push(0xE0 | (unit >> 12) as u8);
    out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
    out.push(0x80 | (unit & 0x3F) as u8);
}

/// Decode modified UTF-8.
///
/// Plain UTF-8 (including 4 byte sequences) is accepted as well, since many
/// writers in the wild never produced the modified form.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(Cow::Borrowed(s));
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    while let Some((&first, tail)) = rest.split_first() {
        let (code, used) = match first {
            0x00..=0x7F => (first as u32, 0),
            0xC0..=0xDF => (first as u32 & 0x1F, 1),
            0xE0..=0xEF => (first as u32 & 0x0F, 2),
            0xF0..=0xF7 => (first as u32 & 0x07, 3),
            _ => return Err(Error::InvalidString),
        };

        let continuation = tail.get(..used).ok_or(Error::InvalidString)?;
        let mut code = code;
        for &b in continuation {
            if b & 0xC0 != 0x80 {
                return Err(Error::InvalidString);
            }
            code = (code << 6) | (b as u32 & 0x3F);
        }

        if code > 0xFFFF {
            let c = char::from_u32(code).ok_or(Error::InvalidString)?;
            let mut pair = [0u16; 2];
            units.extend_from_slice(c.encode_utf16(&mut pair));
        } else {
            units.push(code as u16);
        }
        rest = &tail[used..];
    }

    String::from_utf16(&units)
        .map(Cow::Owned)
        .map_err(|_| Error::InvalidString)
}
