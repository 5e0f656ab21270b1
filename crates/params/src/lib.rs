//! Constant values for the blscore library
//!
//! Curve parameters, encoding sizes, domain separation tags and the tuning
//! knobs of the scalar-multiplication engine. All values are immutable and
//! shared process-wide.

#![no_std]

pub mod curve;
pub mod hash;
pub mod kdf;
pub mod msm;
