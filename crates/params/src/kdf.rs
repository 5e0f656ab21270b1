//! Constants for BLS secret-key derivation

/// Default salt for HKDF-based key generation
pub const KEYGEN_SALT: &[u8] = b"BLS-SIG-KEYGEN-SALT-";

/// Minimum length of input keying material in bytes
pub const MIN_IKM_LENGTH: usize = 32;

/// HKDF output length L = ceil((3 * ceil(log2(r))) / 16)
pub const KEYGEN_OKM_LENGTH: usize = 48;

/// Bytes per Lamport chunk in EIP-2333
pub const LAMPORT_CHUNK_SIZE: usize = 32;

/// Number of Lamport chunks per half in EIP-2333
pub const LAMPORT_CHUNKS: usize = 255;

/// Length of an EIP-2333 Lamport half (255 chunks of 32 bytes)
pub const LAMPORT_HALF_LENGTH: usize = LAMPORT_CHUNK_SIZE * LAMPORT_CHUNKS;
