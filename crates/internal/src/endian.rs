//! Byte-order conversion between big-endian encodings and little-endian limbs

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Convert a u64 from big-endian byte order to native byte order
///
/// `bytes` must hold at least eight bytes.
#[inline]
pub fn u64_from_be_bytes(bytes: &[u8]) -> u64 {
    BigEndian::read_u64(bytes)
}

/// Convert a u64 from little-endian byte order to native byte order
///
/// `bytes` must hold at least eight bytes.
#[inline]
pub fn u64_from_le_bytes(bytes: &[u8]) -> u64 {
    LittleEndian::read_u64(bytes)
}

/// Split a big-endian byte string of exactly `8 * N` bytes into
/// least-significant-first limbs.
#[inline]
pub fn limbs_from_be_bytes<const N: usize>(bytes: &[u8]) -> [u64; N] {
    let mut limbs = [0u64; N];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = (N - 1 - i) * 8;
        *limb = u64_from_be_bytes(&bytes[start..start + 8]);
    }
    limbs
}

/// Split a little-endian byte string of exactly `8 * N` bytes into limbs.
#[inline]
pub fn limbs_from_le_bytes<const N: usize>(bytes: &[u8]) -> [u64; N] {
    let mut limbs = [0u64; N];
    for (i, limb) in limbs.iter_mut().enumerate() {
        *limb = u64_from_le_bytes(&bytes[i * 8..i * 8 + 8]);
    }
    limbs
}

/// Write least-significant-first limbs as big-endian bytes into `out`
/// (length `8 * N`).
#[inline]
pub fn limbs_to_be_bytes<const N: usize>(limbs: &[u64; N], out: &mut [u8]) {
    for (i, limb) in limbs.iter().enumerate() {
        let start = (N - 1 - i) * 8;
        BigEndian::write_u64(&mut out[start..start + 8], *limb);
    }
}

/// Write limbs as little-endian bytes into `out` (length `8 * N`).
#[inline]
pub fn limbs_to_le_bytes<const N: usize>(limbs: &[u64; N], out: &mut [u8]) {
    for (i, limb) in limbs.iter().enumerate() {
        LittleEndian::write_u64(&mut out[i * 8..i * 8 + 8], *limb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limb_order() {
        let mut be = [0u8; 16];
        be[7] = 2;
        be[15] = 1;
        let limbs: [u64; 2] = limbs_from_be_bytes(&be);
        assert_eq!(limbs, [1, 2]);

        let mut out = [0u8; 16];
        limbs_to_be_bytes(&limbs, &mut out);
        assert_eq!(out, be);

        let mut le = [0u8; 16];
        limbs_to_le_bytes(&limbs, &mut le);
        assert_eq!(le[0], 1);
        assert_eq!(le[8], 2);
        assert_eq!(limbs_from_le_bytes::<2>(&le), limbs);
    }
}
