//! G₂ group implementation for BLS12-381.

use rand::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use blscore_params::curve::{
    BLS_X, BLS_X_IS_NEGATIVE, FLAG_COMPRESSED, FLAG_INFINITY, FLAG_SIGN, FP_SIZE,
    G2_COMPRESSED_SIZE, G2_UNCOMPRESSED_SIZE,
};
use blscore_params::msm::MSM_WINDOWED_THRESHOLD_G2;

use super::curve::{Affine, CurveField, Jacobian};
use super::field::fp::Fp;
use super::field::fp2::Fp2;
use super::msm;
use super::Scalar;
use crate::error::{validate, Error, Result};

/// G₂ affine point representation.
pub type G2Affine = Affine<Fp2>;

/// G₂ point in Jacobian coordinates.
pub type G2Projective = Jacobian<Fp2>;

/// b = 4(u + 1) (Montgomery form)
const B: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0xaa27_0000_000c_fff3,
        0x53cc_0032_fc34_000a,
        0x478f_e97a_6b0a_807f,
        0xb1d3_7ebe_e6ba_24d7,
        0x8ec9_733b_bf78_ab2f,
        0x09d6_4551_3d83_de7e,
    ]),
    c1: Fp::from_raw_unchecked([
        0xaa27_0000_000c_fff3,
        0x53cc_0032_fc34_000a,
        0x478f_e97a_6b0a_807f,
        0xb1d3_7ebe_e6ba_24d7,
        0x8ec9_733b_bf78_ab2f,
        0x09d6_4551_3d83_de7e,
    ]),
};

impl CurveField for Fp2 {
    const B: Fp2 = B;
}

/// 1 / ((u+1) ^ ((p-1)/3))
const PSI_COEFF_X: Fp2 = Fp2 {
    c0: Fp::zero(),
    c1: Fp::from_raw_unchecked([
        0x890d_c9e4_8675_45c3,
        0x2af3_2253_3285_a5d5,
        0x5088_0866_309b_7e2c,
        0xa20d_1b8c_7e88_1024,
        0x14e4_f04f_e2db_9068,
        0x14e5_6d3f_1564_853a,
    ]),
};

/// 1 / ((u+1) ^ ((p-1)/2))
const PSI_COEFF_Y: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x3e2f_585d_a55c_9ad1,
        0x4294_213d_86c1_8183,
        0x3828_44c8_8b62_3732,
        0x92ad_2afd_1910_3e18,
        0x1d79_4e4f_ac7c_f0b9,
        0x0bd5_92fc_7d82_5ec8,
    ]),
    c1: Fp::from_raw_unchecked([
        0x7bcf_a7a2_5aa3_0fda,
        0xdc17_dec1_2a92_7e7c,
        0x2f08_8dd8_6b4e_bef1,
        0xd1ca_2087_da74_d4a7,
        0x2da2_5966_96ce_bc1d,
        0x0e2b_7eed_bbfd_87d2,
    ]),
};

/// 1 / 2 ^ ((p-1)/3)
const PSI2_COEFF_X: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0xcd03_c9e4_8671_f071,
        0x5dab_2246_1fcd_a5d2,
        0x5870_42af_d385_1b95,
        0x8eb6_0ebe_01ba_cb9e,
        0x03f9_7d6e_83d0_50d2,
        0x18f0_2065_5463_8741,
    ]),
    c1: Fp::zero(),
};

/// Base field element at `bytes[start..start + 48]`, optionally clearing
/// the three flag bits
fn fp_at(bytes: &[u8], start: usize, strip_flags: bool) -> CtOption<Fp> {
    let mut tmp = [0u8; FP_SIZE];
    tmp.copy_from_slice(&bytes[start..start + FP_SIZE]);
    if strip_flags {
        tmp[0] &= 0b0001_1111;
    }
    Fp::from_bytes(&tmp)
}

impl G2Affine {
    /// Fixed generator.
    pub fn generator() -> G2Affine {
        G2Affine::from_xy_unchecked(
            Fp2 {
                c0: Fp::from_raw_unchecked([
                    0xf5f2_8fa2_0294_0a10,
                    0xb3f5_fb26_87b4_961a,
                    0xa1a8_93b5_3e2a_e580,
                    0x9894_999d_1a3c_aee9,
                    0x6f67_b763_1863_366b,
                    0x0581_9192_4350_bcd7,
                ]),
                c1: Fp::from_raw_unchecked([
                    0xa5a9_c075_9e23_f606,
                    0xaaa0_c59d_bccd_60c3,
                    0x3bb1_7e18_e286_7806,
                    0x1b1a_b6cc_8541_b367,
                    0xc2b6_ed0e_f215_8547,
                    0x1192_2a09_7360_edf3,
                ]),
            },
            Fp2 {
                c0: Fp::from_raw_unchecked([
                    0x4c73_0af8_6049_4c4a,
                    0x597c_fa1f_5e36_9c5a,
                    0xe7e6_856c_aa0a_635a,
                    0xbbef_b5e9_6e0d_495f,
                    0x07d3_a975_f0ef_25a2,
                    0x0083_fd8e_7e80_dae5,
                ]),
                c1: Fp::from_raw_unchecked([
                    0xadc0_fc92_df64_b05d,
                    0x18aa_270a_2b14_61dc,
                    0x86ad_ac6a_3be4_eba0,
                    0x7949_5c4e_c93d_a33a,
                    0xe717_5850_a43c_caed,
                    0x0b2b_c2a1_63de_1bf2,
                ]),
            },
        )
    }

    /// Subgroup check: `ψ(P) == [x] P`
    pub fn is_torsion_free(&self) -> Choice {
        // Section 4 of https://eprint.iacr.org/2021/1130
        let p = G2Projective::from(*self);
        p.psi().ct_eq(&p.mul_by_x())
    }

    /// Compress to 96 bytes: `x.c1 || x.c0` with flags in the first byte.
    pub fn to_compressed(&self) -> [u8; G2_COMPRESSED_SIZE] {
        let x = Fp2::conditional_select(&self.x, &Fp2::zero(), self.infinity);
        let mut res = [0; G2_COMPRESSED_SIZE];

        res[0..48].copy_from_slice(&x.c1.to_bytes());
        res[48..96].copy_from_slice(&x.c0.to_bytes());

        res[0] |= FLAG_COMPRESSED;
        res[0] |= u8::conditional_select(&0u8, &FLAG_INFINITY, self.infinity);
        res[0] |= u8::conditional_select(
            &0u8,
            &FLAG_SIGN,
            (!self.infinity) & self.y.lexicographically_largest(),
        );
        res
    }

    /// Serialize to 192 bytes uncompressed.
    pub fn to_uncompressed(&self) -> [u8; G2_UNCOMPRESSED_SIZE] {
        let mut res = [0; G2_UNCOMPRESSED_SIZE];
        let x = Fp2::conditional_select(&self.x, &Fp2::zero(), self.infinity);
        let y = Fp2::conditional_select(&self.y, &Fp2::zero(), self.infinity);

        res[0..48].copy_from_slice(&x.c1.to_bytes());
        res[48..96].copy_from_slice(&x.c0.to_bytes());
        res[96..144].copy_from_slice(&y.c1.to_bytes());
        res[144..192].copy_from_slice(&y.c0.to_bytes());

        res[0] |= u8::conditional_select(&0u8, &FLAG_INFINITY, self.infinity);
        res
    }

    /// Decode an uncompressed point, checking curve and subgroup membership.
    pub fn from_uncompressed(bytes: &[u8; G2_UNCOMPRESSED_SIZE]) -> CtOption<Self> {
        Self::from_uncompressed_unchecked(bytes).and_then(|p| CtOption::new(p, p.is_torsion_free()))
    }

    /// Decode an uncompressed point, checking only the curve equation.
    pub fn from_uncompressed_unchecked(bytes: &[u8; G2_UNCOMPRESSED_SIZE]) -> CtOption<Self> {
        let compression_flag_set = Choice::from((bytes[0] >> 7) & 1);
        let infinity_flag_set = Choice::from((bytes[0] >> 6) & 1);
        let sort_flag_set = Choice::from((bytes[0] >> 5) & 1);

        let xc1 = fp_at(bytes, 0, true);
        let xc0 = fp_at(bytes, 48, false);
        let yc1 = fp_at(bytes, 96, false);
        let yc0 = fp_at(bytes, 144, false);

        xc1.and_then(|xc1| {
            xc0.and_then(|xc0| {
                yc1.and_then(|yc1| {
                    yc0.and_then(|yc0| {
                        let x = Fp2 { c0: xc0, c1: xc1 };
                        let y = Fp2 { c0: yc0, c1: yc1 };

                        let p = G2Affine::conditional_select(
                            &G2Affine::from_xy_unchecked(x, y),
                            &G2Affine::identity(),
                            infinity_flag_set,
                        );
                        CtOption::new(
                            p,
                            ((!infinity_flag_set)
                                | (infinity_flag_set & x.is_zero() & y.is_zero()))
                                & (!compression_flag_set)
                                & (!sort_flag_set)
                                & p.is_on_curve(),
                        )
                    })
                })
            })
        })
    }

    /// Decode a compressed point, checking subgroup membership.
    pub fn from_compressed(bytes: &[u8; G2_COMPRESSED_SIZE]) -> CtOption<Self> {
        Self::from_compressed_unchecked(bytes).and_then(|p| CtOption::new(p, p.is_torsion_free()))
    }

    /// Decode a compressed point without the subgroup check.
    pub fn from_compressed_unchecked(bytes: &[u8; G2_COMPRESSED_SIZE]) -> CtOption<Self> {
        let compression_flag_set = Choice::from((bytes[0] >> 7) & 1);
        let infinity_flag_set = Choice::from((bytes[0] >> 6) & 1);
        let sort_flag_set = Choice::from((bytes[0] >> 5) & 1);

        let xc1 = fp_at(bytes, 0, true);
        let xc0 = fp_at(bytes, 48, false);

        xc1.and_then(|xc1| {
            xc0.and_then(|xc0| {
                let x = Fp2 { c0: xc0, c1: xc1 };
                CtOption::new(
                    G2Affine::identity(),
                    infinity_flag_set & compression_flag_set & (!sort_flag_set) & x.is_zero(),
                )
                .or_else(|| {
                    ((x.square() * x) + B).sqrt().and_then(|y| {
                        let y = Fp2::conditional_select(
                            &y,
                            &-y,
                            y.lexicographically_largest() ^ sort_flag_set,
                        );
                        CtOption::new(
                            G2Affine::from_xy_unchecked(x, y),
                            (!infinity_flag_set) & compression_flag_set,
                        )
                    })
                })
            })
        })
    }

    /// Checked decode of a compressed slice
    pub fn try_from_compressed(bytes: &[u8]) -> Result<Self> {
        validate::length("G2Affine::try_from_compressed", bytes.len(), G2_COMPRESSED_SIZE)?;
        let mut buf = [0u8; G2_COMPRESSED_SIZE];
        buf.copy_from_slice(bytes);

        let p: Option<G2Affine> = Self::from_compressed_unchecked(&buf).into();
        let p = p.ok_or(Error::Encoding {
            context: "G2Affine::try_from_compressed",
            details: "invalid flags or x-coordinate",
        })?;
        if !bool::from(p.is_torsion_free()) {
            return Err(Error::NotInGroup {
                context: "G2Affine::try_from_compressed",
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
        let bytes = crate::encoding::from_hex_array::<G2_COMPRESSED_SIZE>(s)?;
        Self::try_from_compressed(&bytes)
    }
}

impl G2Projective {
    /// Fixed generator.
    pub fn generator() -> G2Projective {
        G2Affine::generator().to_jacobian()
    }

    /// Random point in the prime-order subgroup.
    pub fn random(mut rng: impl RngCore) -> Self {
        loop {
            let x = Fp2::random(&mut rng);
            let flip_sign = Choice::from((rng.next_u32() & 1) as u8);

            let y: Option<Fp2> = ((x.square() * x) + B).sqrt().into();
            if let Some(y) = y {
                let p = G2Affine::from_xy_unchecked(x, y).cneg(flip_sign);
                let p_cleared = G2Projective::from(p).clear_cofactor();
                if !bool::from(p_cleared.is_identity()) {
                    return p_cleared;
                }
            }
        }
    }

    /// Multiply by the curve parameter x (negative).
    pub(crate) fn mul_by_x(&self) -> G2Projective {
        let mut xself = G2Projective::identity();
        let mut x = BLS_X >> 1;
        let mut acc = *self;
        while x != 0 {
            acc = acc.double();
            if x % 2 == 1 {
                xself += acc;
            }
            x >>= 1;
        }
        if BLS_X_IS_NEGATIVE {
            xself = -xself;
        }
        xself
    }

    /// Untwist-Frobenius-twist endomorphism ψ.
    pub(crate) fn psi(&self) -> G2Projective {
        G2Projective {
            x: self.x.frobenius_map() * PSI_COEFF_X,
            y: self.y.frobenius_map() * PSI_COEFF_Y,
            z: self.z.frobenius_map(),
        }
    }

    /// ψ²
    pub(crate) fn psi2(&self) -> G2Projective {
        G2Projective {
            x: self.x * PSI2_COEFF_X,
            y: -self.y,
            z: self.z,
        }
    }

    /// Clear the cofactor with the ψ-based chain of Budroni and Pintore:
    /// `[x^2 - x - 1] P + [x - 1] ψ(P) + ψ²(2P)`
    pub fn clear_cofactor(&self) -> G2Projective {
        let t1 = self.mul_by_x();
        let t2 = self.psi();
        self.double().psi2() + (t1 + t2).mul_by_x() - t1 - t2 - *self
    }

    /// Sum of affine points via batched-inversion accumulation. Variable time.
    #[cfg(feature = "alloc")]
    pub fn sum_of(points: &[G2Affine]) -> G2Projective {
        super::curve::bulk_accumulate(&mut points.to_vec())
    }

    /// Multi-scalar multiplication `sum(scalars[i] * points[i])`.
    #[cfg(feature = "alloc")]
    pub fn msm(points: &[G2Affine], scalars: &[Scalar]) -> Result<Self> {
        msm::msm(points, scalars, MSM_WINDOWED_THRESHOLD_G2)
    }

    /// Scratch slots [`G2Projective::msm_with_scratch`] needs for `n` points
    pub fn msm_scratch_size(n: usize) -> usize {
        msm::msm_scratch_size(n, MSM_WINDOWED_THRESHOLD_G2)
    }

    /// Multi-scalar multiplication with caller-owned bucket scratch
    #[cfg(feature = "alloc")]
    pub fn msm_with_scratch(
        points: &[G2Affine],
        scalars: &[Scalar],
        scratch: &mut [msm::Xyzz<Fp2>],
    ) -> Result<Self> {
        msm::msm_with_scratch(points, scalars, MSM_WINDOWED_THRESHOLD_G2, scratch)
    }
}

impl_group_ops!(G2Affine, G2Projective);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_on_curve() {
        assert!(bool::from(G2Affine::generator().is_on_curve()));
        assert!(bool::from(G2Affine::generator().is_torsion_free()));
    }

    #[test]
    fn test_psi_squared() {
        let p = G2Projective::generator() * Scalar::from(1234u64);
        assert_eq!(p.psi().psi(), p.psi2());
    }

    #[test]
    fn test_psi_is_homomorphic() {
        let g = G2Projective::generator();
        let a = g * Scalar::from(3u64);
        let b = g * Scalar::from(5u64);
        assert_eq!((a + b).psi(), a.psi() + b.psi());
    }
}
