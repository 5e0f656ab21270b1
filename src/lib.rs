//! # blscore
//!
//! A pure Rust arithmetic core for the BLS12-381 pairing-friendly curve.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! blscore = "0.3"
//! ```
//!
//! ## Features
//!
//! - `std` (default): standard library support, implies `alloc`
//! - `alloc`: batch normalization, MSM, prepared pairings
//! - `portable`: force the portable multiplication kernel
//! - `serde`: serde derives on the public error type
//! - `full`: all of the above plus `rand` re-export
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`blscore-algorithms`]: fields, groups, MSM, pairing, hashing, key derivation
//! - [`blscore-api`]: public error type
//! - [`blscore-params`]: curve and tuning constants
//! - [`blscore-internal`]: constant-time and byte-order helpers
//!
//! ## Example
//!
//! ```
//! use blscore::prelude::*;
//!
//! let sk = keygen(&[1u8; 32], b"").unwrap();
//! let pk = G2Affine::from(G2Projective::generator() * sk);
//! let h = G1Affine::from(hash_to_g1(b"message", b"EXAMPLE-DST").unwrap());
//! let sig = G1Affine::from(G1Projective::from(h) * sk);
//!
//! assert_eq!(pairing(&sig, &G2Affine::generator()), pairing(&h, &pk));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

// Core re-exports (always available)
pub use blscore_algorithms as algorithms;
pub use blscore_api as api;
pub use blscore_internal as internal;
pub use blscore_params as params;

pub use subtle;
pub use zeroize;

#[cfg(feature = "rand")]
pub use rand;

/// Common imports for blscore users
pub mod prelude {
    // Re-export error types
    pub use crate::api::{Error, Result};

    // Re-export curve types
    pub use crate::algorithms::ec::bls12_381::{
        Fp, Fp12, Fp2, G1Affine, G1Projective, G2Affine, G2Projective, Gt, MillerLoopResult,
        Scalar,
    };

    // Re-export entry points
    pub use crate::algorithms::{
        derive_child_eip2333, derive_master_eip2333, derive_path_eip2333, encode_to_g1,
        expand_message_xmd, hash_to_g1, keygen, keygen_v3, keygen_v4_5, keygen_v5, miller_loop_n,
        pairing,
    };

    #[cfg(feature = "alloc")]
    pub use crate::algorithms::{multi_miller_loop, G2Prepared};
}
