//! Constants for hashing to fields and curves

/// Output size of SHA-256 in bytes
pub const SHA256_OUTPUT_SIZE: usize = 32;

/// Input block size of SHA-256 in bytes
pub const SHA256_BLOCK_SIZE: usize = 64;

/// Maximum number of SHA-256 blocks expand_message_xmd may emit
pub const XMD_MAX_BLOCKS: usize = 255;

/// Longest domain separation tag used verbatim; longer tags are hashed
pub const XMD_MAX_DST_LENGTH: usize = 255;

/// Prefix for hashing oversized domain separation tags
pub const XMD_OVERSIZE_DST_PREFIX: &[u8] = b"H2C-OVERSIZE-DST-";

/// Bytes drawn per base field element (ceil((381 + 128) / 8))
pub const FP_HASH_LENGTH: usize = 64;

/// Bytes drawn per scalar field element (ceil((255 + 128) / 8))
pub const FR_HASH_LENGTH: usize = 48;

/// Random-oracle hash-to-G1 suite for the minimal-signature-size BLS variant
pub const G1_RO_DST: &[u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_NUL_";
