//! BLS12-381 arithmetic core
//!
//! This crate provides the field, group, multi-scalar multiplication and
//! pairing arithmetic of the BLS12-381 curve, together with hashing to G1
//! and BLS secret-key derivation. It is usable in both `std` and `no_std`
//! environments; batch and multi-scalar operations need `alloc`.
//!
//! # Constant-time guarantees
//!
//! - Field arithmetic, inversion and single-point scalar multiplication run
//!   in time independent of their inputs
//! - Bulk accumulation and Pippenger bucket arithmetic assume public inputs
//!   and branch on them
//! - Secret intermediates in key derivation are zeroized on drop

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Error module and re-exports
pub mod error;
pub use error::{validate, Error, Result, ResultExt};

// Arithmetic backend selection
pub mod cpu;
pub use cpu::{backend, Backend};

// Hex helpers
pub mod encoding;

// Hashing to field elements
pub mod hash;
pub use hash::{expand_message_xmd, hash_to_field_fp, hash_to_field_fr, ExpandMsgXmd};

// Elliptic curve and pairing primitives
pub mod ec;
pub use ec::bls12_381::{
    encode_to_g1, hash_to_g1, miller_loop_n, pairing, single_miller_loop, G1Affine,
    G1Projective, G2Affine, G2Projective, Gt, MillerLoopResult, Scalar,
};
#[cfg(feature = "alloc")]
pub use ec::bls12_381::{multi_miller_loop, G2Prepared};

// Key derivation
pub mod kdf;
pub use kdf::{
    derive_child_eip2333, derive_master_eip2333, derive_path_eip2333, keygen, keygen_v3,
    keygen_v4_5, keygen_v5, KeyGen, KeygenVersion,
};
