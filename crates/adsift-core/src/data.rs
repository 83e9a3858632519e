//! Hex encoding helpers for advertisement byte buffers.
//!
//! Message records are rendered as uppercase hex text before rule matching
//! and classification, and training-log rows carry the same rendering.
//! Decoding accepts either case so operator-captured fixtures round-trip
//! exactly.

use crate::error::{FilterError, Result};

/// Encode bytes as uppercase hex text, two digits per byte.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02X}")).collect()
}

/// Decode a hex string into bytes.
///
/// Accepts mixed case. The inverse of [`to_hex`]: `from_hex(&to_hex(b))`
/// yields `b` for any byte sequence.
///
/// # Errors
///
/// Returns [`FilterError::InvalidHex`] if the input has an odd number of
/// digits or contains a character that is not a hex digit.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    if text.len() % 2 != 0 {
        return Err(FilterError::InvalidHex {
            text: text.to_string(),
            reason: "odd number of digits",
        });
    }
    let mut bytes = Vec::with_capacity(text.len() / 2);
    for pair in text.as_bytes().chunks_exact(2) {
        let hi = hex_digit(pair[0]);
        let lo = hex_digit(pair[1]);
        match (hi, lo) {
            (Some(hi), Some(lo)) => bytes.push((hi << 4) | lo),
            _ => {
                return Err(FilterError::InvalidHex {
                    text: text.to_string(),
                    reason: "not a hex digit",
                })
            }
        }
    }
    Ok(bytes)
}

fn hex_digit(digit: u8) -> Option<u8> {
    (digit as char).to_digit(16).map(|d| d as u8)
}
