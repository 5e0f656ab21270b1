//! Public error types for the blscore library
//!
//! Every fallible boundary of the arithmetic core (byte decoding, key
//! derivation inputs, caller-provided scratch buffers) reports through the
//! [`Error`] defined here. Arithmetic itself is total and never fails.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

pub mod error;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, Result, ResultExt};
