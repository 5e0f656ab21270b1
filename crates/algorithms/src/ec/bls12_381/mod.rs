//! BLS12-381 arithmetic core
//!
//! Montgomery base and scalar fields with their extension tower, Jacobian
//! group arithmetic on G1 and G2, windowed and Pippenger multi-scalar
//! multiplication, the optimal ate pairing and hashing to G1.
//!
//! **Warning:** Unaudited implementation. Use at your own risk.

#[macro_use]
mod macros;

mod field;

#[macro_use]
mod curve;

mod g1;
mod g2;
mod hash_to_curve;
mod msm;
mod pairings;
mod scalar;

#[cfg(test)]
mod tests;

pub use curve::{Affine, CurveField, Jacobian};
pub use field::{
    fp::Fp, fp12::Fp12, fp2::Fp2, fp6::Fp6, Field,
};
pub use g1::{G1Affine, G1Projective};
pub use g2::{G2Affine, G2Projective};
pub use hash_to_curve::{encode_to_g1, hash_to_g1, map_to_curve_g1};
pub use msm::{msm_scratch_size, pippenger_window, Xyzz};
pub use pairings::{miller_loop_n, pairing, single_miller_loop, Gt, MillerLoopResult};
pub use scalar::Scalar;

#[cfg(feature = "alloc")]
pub use curve::bulk_accumulate;
#[cfg(feature = "alloc")]
pub use msm::WindowTable;
#[cfg(feature = "alloc")]
pub use pairings::{multi_miller_loop, G2Prepared};
