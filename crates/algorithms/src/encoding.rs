//! Hex encodings shared by the field, scalar and point types
//!
//! Decoding accepts an optional `0x`/`0X` prefix; encoding never emits one.

use crate::error::{Error, Result};

#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};

fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Lowercase hex of `bytes`
#[cfg(feature = "alloc")]
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string of any even length
#[cfg(feature = "alloc")]
pub fn from_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(strip_prefix(s)).map_err(|_| Error::Encoding {
        context: "hex",
        details: "invalid hex string",
    })
}

/// Decode a hex string of exactly `2 * N` digits
pub fn from_hex_array<const N: usize>(s: &str) -> Result<[u8; N]> {
    let digits = strip_prefix(s);
    if digits.len() != 2 * N {
        return Err(Error::Length {
            context: "hex",
            expected: 2 * N,
            actual: digits.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|_| Error::Encoding {
        context: "hex",
        details: "invalid hex digit",
    })?;
    Ok(out)
}
