//! G₁ group implementation for BLS12-381.

use rand::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use blscore_params::curve::{
    BLS_X, BLS_X_IS_NEGATIVE, FLAG_COMPRESSED, FLAG_INFINITY, FLAG_SIGN, G1_COMPRESSED_SIZE,
    G1_UNCOMPRESSED_SIZE,
};
use blscore_params::msm::MSM_WINDOWED_THRESHOLD_G1;

use super::curve::{Affine, CurveField, Jacobian};
use super::field::fp::Fp;
use super::msm;
use super::Scalar;
use crate::error::{validate, Error, Result};

/// G₁ affine point representation.
pub type G1Affine = Affine<Fp>;

/// G₁ point in Jacobian coordinates.
pub type G1Projective = Jacobian<Fp>;

/// b = 4 (Montgomery form)
const B: Fp = Fp::from_raw_unchecked([
    0xaa27_0000_000c_fff3,
    0x53cc_0032_fc34_000a,
    0x478f_e97a_6b0a_807f,
    0xb1d3_7ebe_e6ba_24d7,
    0x8ec9_733b_bf78_ab2f,
    0x09d6_4551_3d83_de7e,
]);

impl CurveField for Fp {
    const B: Fp = B;
}

/// Cube root of unity in Fp
pub const BETA: Fp = Fp::from_raw_unchecked([
    0x30f1_361b_798a_64e8,
    0xf3b8_ddab_7ece_5a2a,
    0x16a8_ca3a_c615_77f7,
    0xc26a_2ff8_74fd_029b,
    0x3636_b766_6070_1c6e,
    0x051b_a4ab_241b_6160,
]);

fn endomorphism(p: &G1Affine) -> G1Affine {
    let mut res = *p;
    res.x *= BETA;
    res
}

impl G1Affine {
    /// Fixed generator.
    pub fn generator() -> G1Affine {
        G1Affine::from_xy_unchecked(
            Fp::from_raw_unchecked([
                0x5cb3_8790_fd53_0c16,
                0x7817_fc67_9976_fff5,
                0x154f_95c7_143b_a1c1,
                0xf0ae_6acd_f3d0_e747,
                0xedce_6ecc_21db_f440,
                0x1201_7741_9e0b_fb75,
            ]),
            Fp::from_raw_unchecked([
                0xbaac_93d5_0ce7_2271,
                0x8c22_631a_7918_fd8e,
                0xdd59_5f13_5707_25ce,
                0x51ac_5829_5040_5194,
                0x0e1c_8c3f_ad00_59c0,
                0x0bbc_3efc_5008_a26a,
            ]),
        )
    }

    /// Subgroup check using the endomorphism: `-[x^2] P == φ(P)`
    pub fn is_torsion_free(&self) -> Choice {
        let minus_x_squared_times_p = -G1Projective::from(self).mul_by_x().mul_by_x();
        let endomorphism_p = endomorphism(self);
        minus_x_squared_times_p.ct_eq(&G1Projective::from(endomorphism_p))
    }

    /// Compress to 48 bytes.
    pub fn to_compressed(&self) -> [u8; G1_COMPRESSED_SIZE] {
        let mut res = Fp::conditional_select(&self.x, &Fp::zero(), self.infinity).to_bytes();
        res[0] |= FLAG_COMPRESSED;
        res[0] |= u8::conditional_select(&0u8, &FLAG_INFINITY, self.infinity);
        res[0] |= u8::conditional_select(
            &0u8,
            &FLAG_SIGN,
            (!self.infinity) & self.y.lexicographically_largest(),
        );
        res
    }

    /// Serialize to 96 bytes uncompressed.
    pub fn to_uncompressed(&self) -> [u8; G1_UNCOMPRESSED_SIZE] {
        let mut res = [0; G1_UNCOMPRESSED_SIZE];
        res[0..48].copy_from_slice(
            &Fp::conditional_select(&self.x, &Fp::zero(), self.infinity).to_bytes()[..],
        );
        res[48..96].copy_from_slice(
            &Fp::conditional_select(&self.y, &Fp::zero(), self.infinity).to_bytes()[..],
        );
        res[0] |= u8::conditional_select(&0u8, &FLAG_INFINITY, self.infinity);
        res
    }

    /// Decode an uncompressed point, checking curve and subgroup membership.
    pub fn from_uncompressed(bytes: &[u8; G1_UNCOMPRESSED_SIZE]) -> CtOption<Self> {
        Self::from_uncompressed_unchecked(bytes).and_then(|p| CtOption::new(p, p.is_torsion_free()))
    }

    /// Decode an uncompressed point, checking only the curve equation.
    pub fn from_uncompressed_unchecked(bytes: &[u8; G1_UNCOMPRESSED_SIZE]) -> CtOption<Self> {
        let compression_flag_set = Choice::from((bytes[0] >> 7) & 1);
        let infinity_flag_set = Choice::from((bytes[0] >> 6) & 1);
        let sort_flag_set = Choice::from((bytes[0] >> 5) & 1);

        let mut xb = [0u8; 48];
        xb.copy_from_slice(&bytes[0..48]);
        xb[0] &= 0b0001_1111;
        let mut yb = [0u8; 48];
        yb.copy_from_slice(&bytes[48..96]);

        Fp::from_bytes(&xb).and_then(|x| {
            Fp::from_bytes(&yb).and_then(|y| {
                let p = G1Affine::conditional_select(
                    &G1Affine::from_xy_unchecked(x, y),
                    &G1Affine::identity(),
                    infinity_flag_set,
                );
                CtOption::new(
                    p,
                    ((!infinity_flag_set) | (infinity_flag_set & x.is_zero() & y.is_zero()))
                        & (!compression_flag_set)
                        & (!sort_flag_set)
                        & p.is_on_curve(),
                )
            })
        })
    }

    /// Decode a compressed point, checking subgroup membership.
    pub fn from_compressed(bytes: &[u8; G1_COMPRESSED_SIZE]) -> CtOption<Self> {
        Self::from_compressed_unchecked(bytes).and_then(|p| CtOption::new(p, p.is_torsion_free()))
    }

    /// Decode a compressed point without the subgroup check. The result is
    /// on the curve by construction.
    pub fn from_compressed_unchecked(bytes: &[u8; G1_COMPRESSED_SIZE]) -> CtOption<Self> {
        let compression_flag_set = Choice::from((bytes[0] >> 7) & 1);
        let infinity_flag_set = Choice::from((bytes[0] >> 6) & 1);
        let sort_flag_set = Choice::from((bytes[0] >> 5) & 1);
        let x = {
            let mut tmp = *bytes;
            tmp[0] &= 0b0001_1111;
            Fp::from_bytes(&tmp)
        };

        x.and_then(|x| {
            CtOption::new(
                G1Affine::identity(),
                infinity_flag_set & compression_flag_set & (!sort_flag_set) & x.is_zero(),
            )
            .or_else(|| {
                ((x.square() * x) + B).sqrt().and_then(|y| {
                    let y = Fp::conditional_select(
                        &y,
                        &-y,
                        y.lexicographically_largest() ^ sort_flag_set,
                    );
                    CtOption::new(
                        G1Affine::from_xy_unchecked(x, y),
                        (!infinity_flag_set) & compression_flag_set,
                    )
                })
            })
        })
    }

    /// Checked decode of a compressed slice
    pub fn try_from_compressed(bytes: &[u8]) -> Result<Self> {
        validate::length("G1Affine::try_from_compressed", bytes.len(), G1_COMPRESSED_SIZE)?;
        let mut buf = [0u8; G1_COMPRESSED_SIZE];
        buf.copy_from_slice(bytes);

        let p: Option<G1Affine> = Self::from_compressed_unchecked(&buf).into();
        let p = p.ok_or(Error::Encoding {
            context: "G1Affine::try_from_compressed",
            details: "invalid flags or x-coordinate",
        })?;
        if !bool::from(p.is_torsion_free()) {
            return Err(Error::NotInGroup {
                context: "G1Affine::try_from_compressed",
            });
        }
        Ok(p)
    }

    /// Hex of the compressed encoding, without prefix
    #[cfg(feature = "alloc")]
    pub fn to_hex(&self) -> alloc::string::String {
        crate::encoding::to_hex(&self.to_compressed())
    }

    /// Parse a hex compressed encoding, `0x`-prefixed or bare
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = crate::encoding::from_hex_array::<G1_COMPRESSED_SIZE>(s)?;
        Self::try_from_compressed(&bytes)
    }
}

impl G1Projective {
    /// Fixed generator.
    pub fn generator() -> G1Projective {
        G1Affine::generator().to_jacobian()
    }

    /// Random point in the prime-order subgroup.
    pub fn random(mut rng: impl RngCore) -> Self {
        loop {
            let x = Fp::random(&mut rng);
            let flip_sign = Choice::from((rng.next_u32() & 1) as u8);

            let y: Option<Fp> = ((x.square() * x) + B).sqrt().into();
            if let Some(y) = y {
                let p = G1Affine::from_xy_unchecked(x, y).cneg(flip_sign);
                let p_cleared = G1Projective::from(p).clear_cofactor();
                if !bool::from(p_cleared.is_identity()) {
                    return p_cleared;
                }
            }
        }
    }

    /// Multiply by the curve parameter x (negative).
    pub(crate) fn mul_by_x(&self) -> G1Projective {
        let mut xself = G1Projective::identity();
        let mut x = BLS_X >> 1;
        let mut tmp = *self;
        while x != 0 {
            tmp = tmp.double();
            if x % 2 == 1 {
                xself += tmp;
            }
            x >>= 1;
        }
        if BLS_X_IS_NEGATIVE {
            xself = -xself;
        }
        xself
    }

    /// Multiply by `h_eff = 1 - x`, mapping curve points into the subgroup.
    pub fn clear_cofactor(&self) -> G1Projective {
        self - self.mul_by_x()
    }

    /// Sum of affine points via batched-inversion accumulation. Variable time.
    #[cfg(feature = "alloc")]
    pub fn sum_of(points: &[G1Affine]) -> G1Projective {
        super::curve::bulk_accumulate(&mut points.to_vec())
    }

    /// Multi-scalar multiplication `sum(scalars[i] * points[i])`.
    ///
    /// Variable time in the scalars once the Pippenger path is taken.
    #[cfg(feature = "alloc")]
    pub fn msm(points: &[G1Affine], scalars: &[Scalar]) -> Result<Self> {
        msm::msm(points, scalars, MSM_WINDOWED_THRESHOLD_G1)
    }

    /// Scratch slots [`G1Projective::msm_with_scratch`] needs for `n` points
    pub fn msm_scratch_size(n: usize) -> usize {
        msm::msm_scratch_size(n, MSM_WINDOWED_THRESHOLD_G1)
    }

    /// Multi-scalar multiplication with caller-owned bucket scratch
    #[cfg(feature = "alloc")]
    pub fn msm_with_scratch(
        points: &[G1Affine],
        scalars: &[Scalar],
        scratch: &mut [msm::Xyzz<Fp>],
    ) -> Result<Self> {
        msm::msm_with_scratch(points, scalars, MSM_WINDOWED_THRESHOLD_G1, scratch)
    }
}

impl_group_ops!(G1Affine, G1Projective);
