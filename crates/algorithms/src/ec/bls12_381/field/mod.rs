//! Field tower for BLS12-381
//!
//! `Fp` and the scalar field share the limb-level Montgomery code in
//! [`mont`] and the divstep inverse in [`inverse`]. The extension tower is
//! Fp2 = Fp[u]/(u^2 + 1), Fp6 = Fp2[v]/(v^3 - (u + 1)),
//! Fp12 = Fp6[w]/(w^2 - v).

use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

pub(crate) mod inverse;
pub(crate) mod mont;

pub mod fp; // Base field
pub mod fp12; // Degree-12 extension (target field)
pub mod fp2; // Quadratic extension
pub mod fp6; // Degree-6 extension

/// Coordinate field of a curve group: what the Jacobian formulas, batch
/// inversion and bucket arithmetic need from Fp and Fp2.
pub trait Field:
    Sized
    + Copy
    + Default
    + Debug
    + ConditionallySelectable
    + ConstantTimeEq
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity
    fn zero() -> Self;
    /// Multiplicative identity
    fn one() -> Self;
    /// Constant-time zero test
    fn is_zero(&self) -> Choice;
    /// Squaring
    fn square(&self) -> Self;
    /// Doubling
    fn double(&self) -> Self;
    /// Constant-time inverse, zero for zero
    fn inverse(&self) -> Self;
}
