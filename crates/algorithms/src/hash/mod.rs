//! Hashing byte strings to field elements
//!
//! `expand_message_xmd` over SHA-256 (RFC 9380, section 5.3.1) and the
//! `hash_to_field` reductions built on it. The expander is streaming, so no
//! output buffer beyond what the caller supplies is needed.

use sha2::{Digest, Sha256};

use blscore_params::hash::{
    FP_HASH_LENGTH, FR_HASH_LENGTH, SHA256_BLOCK_SIZE, SHA256_OUTPUT_SIZE, XMD_MAX_BLOCKS,
    XMD_MAX_DST_LENGTH, XMD_OVERSIZE_DST_PREFIX,
};

use crate::ec::bls12_381::{Fp, Scalar};
use crate::error::{Error, Result};


/// Domain separation tag as fed to the expander: verbatim, or hashed when
/// longer than 255 bytes
enum Dst<'a> {
    Borrowed(&'a [u8]),
    Hashed([u8; SHA256_OUTPUT_SIZE]),
}

impl<'a> Dst<'a> {
    fn new(dst: &'a [u8]) -> Self {
        if dst.len() > XMD_MAX_DST_LENGTH {
            let mut h = Sha256::new();
            h.update(XMD_OVERSIZE_DST_PREFIX);
            h.update(dst);
            Dst::Hashed(h.finalize().into())
        } else {
            Dst::Borrowed(dst)
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            Dst::Borrowed(d) => d,
            Dst::Hashed(d) => &d[..],
        }
    }
}

/// Streaming `expand_message_xmd` with SHA-256
pub struct ExpandMsgXmd<'a> {
    dst: Dst<'a>,
    b_0: [u8; SHA256_OUTPUT_SIZE],
    b_i: [u8; SHA256_OUTPUT_SIZE],
    index: usize,
    ell: usize,
    offset: usize,
    remaining: usize,
}

impl<'a> ExpandMsgXmd<'a> {
    /// Start expanding `msg` to `len_in_bytes` pseudorandom bytes
    pub fn new(msg: &[u8], dst: &'a [u8], len_in_bytes: usize) -> Result<Self> {
        let ell = len_in_bytes.div_ceil(SHA256_OUTPUT_SIZE);
        if ell > XMD_MAX_BLOCKS || len_in_bytes > u16::MAX as usize {
            return Err(Error::param("len_in_bytes", "requested output too long"));
        }
        if len_in_bytes == 0 {
            return Err(Error::param("len_in_bytes", "requested output is empty"));
        }

        let dst = Dst::new(dst);
        let dst_bytes = dst.as_bytes();
        let dst_len = [dst_bytes.len() as u8];

        // b_0 = H(Z_pad || msg || I2OSP(len, 2) || 0 || DST')
        let mut h = Sha256::new();
        h.update([0u8; SHA256_BLOCK_SIZE]);
        h.update(msg);
        h.update((len_in_bytes as u16).to_be_bytes());
        h.update([0u8]);
        h.update(dst_bytes);
        h.update(dst_len);
        let b_0: [u8; SHA256_OUTPUT_SIZE] = h.finalize().into();

        // b_1 = H(b_0 || 1 || DST')
        let mut h = Sha256::new();
        h.update(b_0);
        h.update([1u8]);
        h.update(dst_bytes);
        h.update(dst_len);
        let b_i: [u8; SHA256_OUTPUT_SIZE] = h.finalize().into();

        Ok(ExpandMsgXmd {
            dst,
            b_0,
            b_i,
            index: 1,
            ell,
            offset: 0,
            remaining: len_in_bytes,
        })
    }

    fn next_block(&mut self) {
        let mut xored = [0u8; SHA256_OUTPUT_SIZE];
        for (x, (a, b)) in xored.iter_mut().zip(self.b_0.iter().zip(self.b_i.iter())) {
            *x = a ^ b;
        }
        self.index += 1;

        let dst_bytes = self.dst.as_bytes();
        let mut h = Sha256::new();
        h.update(xored);
        h.update([self.index as u8]);
        h.update(dst_bytes);
        h.update([dst_bytes.len() as u8]);
        self.b_i = h.finalize().into();
        self.offset = 0;
    }

    /// Fill `out` with the next bytes of the stream
    pub fn read(&mut self, out: &mut [u8]) -> Result<()> {
        if out.len() > self.remaining {
            return Err(Error::Length {
                context: "ExpandMsgXmd::read",
                expected: self.remaining,
                actual: out.len(),
            });
        }
        for byte in out.iter_mut() {
            if self.offset == SHA256_OUTPUT_SIZE {
                debug_assert!(self.index < self.ell);
                self.next_block();
            }
            *byte = self.b_i[self.offset];
            self.offset += 1;
        }
        self.remaining -= out.len();
        Ok(())
    }
}

/// Fill `out` with `expand_message_xmd(msg, dst, out.len())`
pub fn expand_message_xmd(msg: &[u8], dst: &[u8], out: &mut [u8]) -> Result<()> {
    ExpandMsgXmd::new(msg, dst, out.len())?.read(out)
}

/// `hash_to_field` into the base field: 64 bytes per element, reduced mod p
pub fn hash_to_field_fp(msg: &[u8], dst: &[u8], out: &mut [Fp]) -> Result<()> {
    let mut xmd = ExpandMsgXmd::new(msg, dst, out.len() * FP_HASH_LENGTH)?;
    let mut buf = [0u8; FP_HASH_LENGTH];
    for u in out.iter_mut() {
        xmd.read(&mut buf)?;
        *u = Fp::from_okm(&buf);
    }
    Ok(())
}

/// `hash_to_field` into the scalar field: 48 bytes per element, reduced mod r
pub fn hash_to_field_fr(msg: &[u8], dst: &[u8], out: &mut [Scalar]) -> Result<()> {
    let mut xmd = ExpandMsgXmd::new(msg, dst, out.len() * FR_HASH_LENGTH)?;
    let mut buf = [0u8; FR_HASH_LENGTH];
    for u in out.iter_mut() {
        xmd.read(&mut buf)?;
        *u = Scalar::from_okm(&buf);
    }
    Ok(())
}
