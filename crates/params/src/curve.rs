//! Constants for the BLS12-381 curve

/// Absolute value of the curve parameter x = -0xd201000000010000
pub const BLS_X: u64 = 0xd201_0000_0001_0000;

/// Sign of the curve parameter x
pub const BLS_X_IS_NEGATIVE: bool = true;

/// Number of bits in |x|
pub const BLS_X_BITS: u32 = 64;

/// Size of an encoded base field element in bytes
pub const FP_SIZE: usize = 48;

/// Size of an encoded scalar in bytes
pub const SCALAR_SIZE: usize = 32;

/// Bit length of the group order r
pub const SCALAR_BITS: usize = 255;

/// Size of a compressed G1 point in bytes
pub const G1_COMPRESSED_SIZE: usize = 48;

/// Size of an uncompressed G1 point in bytes
pub const G1_UNCOMPRESSED_SIZE: usize = 96;

/// Size of a compressed G2 point in bytes
pub const G2_COMPRESSED_SIZE: usize = 96;

/// Size of an uncompressed G2 point in bytes
pub const G2_UNCOMPRESSED_SIZE: usize = 192;

/// Flag bit marking a compressed encoding
pub const FLAG_COMPRESSED: u8 = 0x80;

/// Flag bit marking the point at infinity
pub const FLAG_INFINITY: u8 = 0x40;

/// Flag bit carrying the sign of y in compressed encodings
pub const FLAG_SIGN: u8 = 0x20;

/// Number of divstep batches (62 steps each) for the base field inverse
pub const FP_DIVSTEP_BATCHES: usize = 18;

/// Number of divstep batches (62 steps each) for the scalar field inverse
pub const FR_DIVSTEP_BATCHES: usize = 12;
