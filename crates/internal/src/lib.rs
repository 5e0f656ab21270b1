//! Internal utilities shared by the blscore crates
//!
//! Not part of the public API; the facade re-exports it for completeness only.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod constant_time;
pub mod endian;

pub use constant_time::{mask_from_bit, select};
