//! BLS12-381 base field `GF(p)` where p = 0x1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use rand::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use blscore_internal::endian::{limbs_from_be_bytes, limbs_from_le_bytes, limbs_to_be_bytes, limbs_to_le_bytes};
use blscore_params::curve::{FP_DIVSTEP_BATCHES, FP_SIZE};

use super::inverse::divstep_inverse;
use super::mont::{self, adc, mac, MontParams};
use crate::cpu::{backend, Backend};
use crate::error::{validate, Error, Result};

// ============================================================================
// Field Constants
// ============================================================================

/// Field modulus p
const MODULUS: [u64; 6] = [
    0xb9fe_ffff_ffff_aaab,
    0x1eab_fffe_b153_ffff,
    0x6730_d2a0_f6b0_f624,
    0x6477_4b84_f385_12bf,
    0x4b1b_a7b6_434b_acd7,
    0x1a01_11ea_397f_e69a,
];

/// Montgomery parameter INV = -(p^{-1} mod 2^64) mod 2^64
const INV: u64 = 0x89f3_fffc_fffc_fffd;

/// Montgomery R = 2^384 mod p
const R: Fp = Fp([
    0x7609_0000_0002_fffd,
    0xebf4_000b_c40c_0002,
    0x5f48_9857_53c7_58ba,
    0x77ce_5853_7052_5745,
    0x5c07_1a97_a256_ec6d,
    0x15f6_5ec3_fa80_e493,
]);

static PARAMS: MontParams<6> = MontParams {
    modulus: MODULUS,
    inv: INV,
    // R^2 = 2^768 mod p
    r2: [
        0xf4df_1f34_1c34_1746,
        0x0a76_e6a6_09d1_04f1,
        0x8de5_476c_4c95_b6d5,
        0x67eb_88a9_939d_83c0,
        0x9a79_3e85_b519_952d,
        0x1198_8fe5_92ca_e3aa,
    ],
    // R^3 = 2^1152 mod p
    r3: [
        0xed48_ac6b_d94c_a1e0,
        0x315f_831e_03a7_adf8,
        0x9a53_352a_615e_29dd,
        0x34c0_4e5e_921e_1761,
        0x2512_d435_6572_4728,
        0x0aa6_3460_9175_5d4d,
    ],
    // (p - 1) / 2
    half: [
        0xdcff_7fff_ffff_d555,
        0x0f55_ffff_58a9_ffff,
        0xb398_6950_7b58_7b12,
        0xb23b_a5c2_79c2_895f,
        0x258d_d3db_21a5_d66b,
        0x0d00_88f5_1cbf_f34d,
    ],
};

/// (p + 1) / 4, the square-root exponent for p = 3 mod 4
const SQRT_EXP: [u64; 6] = [
    0xee7f_bfff_ffff_eaab,
    0x07aa_ffff_ac54_ffff,
    0xd9cc_34a8_3dac_3d89,
    0xd91d_d2e1_3ce1_44af,
    0x92c6_e9ed_90d2_eb35,
    0x0680_447a_8e5f_f9a6,
];

// ============================================================================
// Field Element Type
// ============================================================================

/// Element in Montgomery form: Fp(a) = aR mod p, with R = 2^384
#[derive(Copy, Clone)]
pub struct Fp(pub(crate) [u64; 6]);

// ============================================================================
// Wide backend kernel: fully unrolled product, then six reduction rounds
// ============================================================================

#[inline(always)]
#[allow(clippy::too_many_arguments)]
fn reduce_wide(
    t0: u64,
    t1: u64,
    t2: u64,
    t3: u64,
    t4: u64,
    t5: u64,
    t6: u64,
    t7: u64,
    t8: u64,
    t9: u64,
    t10: u64,
    t11: u64,
) -> [u64; 6] {
    // Round 1
    let k = t0.wrapping_mul(INV);
    let (_, carry) = mac(t0, k, MODULUS[0], 0);
    let (r1, carry) = mac(t1, k, MODULUS[1], carry);
    let (r2, carry) = mac(t2, k, MODULUS[2], carry);
    let (r3, carry) = mac(t3, k, MODULUS[3], carry);
    let (r4, carry) = mac(t4, k, MODULUS[4], carry);
    let (r5, carry) = mac(t5, k, MODULUS[5], carry);
    let (r6, r7) = adc(t6, 0, carry);

    // Round 2
    let k = r1.wrapping_mul(INV);
    let (_, carry) = mac(r1, k, MODULUS[0], 0);
    let (r2, carry) = mac(r2, k, MODULUS[1], carry);
    let (r3, carry) = mac(r3, k, MODULUS[2], carry);
    let (r4, carry) = mac(r4, k, MODULUS[3], carry);
    let (r5, carry) = mac(r5, k, MODULUS[4], carry);
    let (r6, carry) = mac(r6, k, MODULUS[5], carry);
    let (r7, r8) = adc(t7, r7, carry);

    // Round 3
    let k = r2.wrapping_mul(INV);
    let (_, carry) = mac(r2, k, MODULUS[0], 0);
    let (r3, carry) = mac(r3, k, MODULUS[1], carry);
    let (r4, carry) = mac(r4, k, MODULUS[2], carry);
    let (r5, carry) = mac(r5, k, MODULUS[3], carry);
    let (r6, carry) = mac(r6, k, MODULUS[4], carry);
    let (r7, carry) = mac(r7, k, MODULUS[5], carry);
    let (r8, r9) = adc(t8, r8, carry);

    // Round 4
    let k = r3.wrapping_mul(INV);
    let (_, carry) = mac(r3, k, MODULUS[0], 0);
    let (r4, carry) = mac(r4, k, MODULUS[1], carry);
    let (r5, carry) = mac(r5, k, MODULUS[2], carry);
    let (r6, carry) = mac(r6, k, MODULUS[3], carry);
    let (r7, carry) = mac(r7, k, MODULUS[4], carry);
    let (r8, carry) = mac(r8, k, MODULUS[5], carry);
    let (r9, r10) = adc(t9, r9, carry);

    // Round 5
    let k = r4.wrapping_mul(INV);
    let (_, carry) = mac(r4, k, MODULUS[0], 0);
    let (r5, carry) = mac(r5, k, MODULUS[1], carry);
    let (r6, carry) = mac(r6, k, MODULUS[2], carry);
    let (r7, carry) = mac(r7, k, MODULUS[3], carry);
    let (r8, carry) = mac(r8, k, MODULUS[4], carry);
    let (r9, carry) = mac(r9, k, MODULUS[5], carry);
    let (r10, r11) = adc(t10, r10, carry);

    // Round 6
    let k = r5.wrapping_mul(INV);
    let (_, carry) = mac(r5, k, MODULUS[0], 0);
    let (r6, carry) = mac(r6, k, MODULUS[1], carry);
    let (r7, carry) = mac(r7, k, MODULUS[2], carry);
    let (r8, carry) = mac(r8, k, MODULUS[3], carry);
    let (r9, carry) = mac(r9, k, MODULUS[4], carry);
    let (r10, carry) = mac(r10, k, MODULUS[5], carry);
    let (r11, _) = adc(t11, r11, carry);

    mont::final_sub(&[r6, r7, r8, r9, r10, r11], 0, &MODULUS)
}

#[inline]
fn mul_wide(a: &[u64; 6], b: &[u64; 6]) -> [u64; 6] {
    let (t0, carry) = mac(0, a[0], b[0], 0);
    let (t1, carry) = mac(0, a[0], b[1], carry);
    let (t2, carry) = mac(0, a[0], b[2], carry);
    let (t3, carry) = mac(0, a[0], b[3], carry);
    let (t4, carry) = mac(0, a[0], b[4], carry);
    let (t5, t6) = mac(0, a[0], b[5], carry);

    let (t1, carry) = mac(t1, a[1], b[0], 0);
    let (t2, carry) = mac(t2, a[1], b[1], carry);
    let (t3, carry) = mac(t3, a[1], b[2], carry);
    let (t4, carry) = mac(t4, a[1], b[3], carry);
    let (t5, carry) = mac(t5, a[1], b[4], carry);
    let (t6, t7) = mac(t6, a[1], b[5], carry);

    let (t2, carry) = mac(t2, a[2], b[0], 0);
    let (t3, carry) = mac(t3, a[2], b[1], carry);
    let (t4, carry) = mac(t4, a[2], b[2], carry);
    let (t5, carry) = mac(t5, a[2], b[3], carry);
    let (t6, carry) = mac(t6, a[2], b[4], carry);
    let (t7, t8) = mac(t7, a[2], b[5], carry);

    let (t3, carry) = mac(t3, a[3], b[0], 0);
    let (t4, carry) = mac(t4, a[3], b[1], carry);
    let (t5, carry) = mac(t5, a[3], b[2], carry);
    let (t6, carry) = mac(t6, a[3], b[3], carry);
    let (t7, carry) = mac(t7, a[3], b[4], carry);
    let (t8, t9) = mac(t8, a[3], b[5], carry);

    let (t4, carry) = mac(t4, a[4], b[0], 0);
    let (t5, carry) = mac(t5, a[4], b[1], carry);
    let (t6, carry) = mac(t6, a[4], b[2], carry);
    let (t7, carry) = mac(t7, a[4], b[3], carry);
    let (t8, carry) = mac(t8, a[4], b[4], carry);
    let (t9, t10) = mac(t9, a[4], b[5], carry);

    let (t5, carry) = mac(t5, a[5], b[0], 0);
    let (t6, carry) = mac(t6, a[5], b[1], carry);
    let (t7, carry) = mac(t7, a[5], b[2], carry);
    let (t8, carry) = mac(t8, a[5], b[3], carry);
    let (t9, carry) = mac(t9, a[5], b[4], carry);
    let (t10, t11) = mac(t10, a[5], b[5], carry);

    reduce_wide(t0, t1, t2, t3, t4, t5, t6, t7, t8, t9, t10, t11)
}

#[inline]
fn square_wide(a: &[u64; 6]) -> [u64; 6] {
    let (t1, carry) = mac(0, a[0], a[1], 0);
    let (t2, carry) = mac(0, a[0], a[2], carry);
    let (t3, carry) = mac(0, a[0], a[3], carry);
    let (t4, carry) = mac(0, a[0], a[4], carry);
    let (t5, t6) = mac(0, a[0], a[5], carry);

    let (t3, carry) = mac(t3, a[1], a[2], 0);
    let (t4, carry) = mac(t4, a[1], a[3], carry);
    let (t5, carry) = mac(t5, a[1], a[4], carry);
    let (t6, t7) = mac(t6, a[1], a[5], carry);

    let (t5, carry) = mac(t5, a[2], a[3], 0);
    let (t6, carry) = mac(t6, a[2], a[4], carry);
    let (t7, t8) = mac(t7, a[2], a[5], carry);

    let (t7, carry) = mac(t7, a[3], a[4], 0);
    let (t8, t9) = mac(t8, a[3], a[5], carry);

    let (t9, t10) = mac(t9, a[4], a[5], 0);

    let t11 = t10 >> 63;
    let t10 = (t10 << 1) | (t9 >> 63);
    let t9 = (t9 << 1) | (t8 >> 63);
    let t8 = (t8 << 1) | (t7 >> 63);
    let t7 = (t7 << 1) | (t6 >> 63);
    let t6 = (t6 << 1) | (t5 >> 63);
    let t5 = (t5 << 1) | (t4 >> 63);
    let t4 = (t4 << 1) | (t3 >> 63);
    let t3 = (t3 << 1) | (t2 >> 63);
    let t2 = (t2 << 1) | (t1 >> 63);
    let t1 = t1 << 1;

    let (t0, carry) = mac(0, a[0], a[0], 0);
    let (t1, carry) = adc(t1, 0, carry);
    let (t2, carry) = mac(t2, a[1], a[1], carry);
    let (t3, carry) = adc(t3, 0, carry);
    let (t4, carry) = mac(t4, a[2], a[2], carry);
    let (t5, carry) = adc(t5, 0, carry);
    let (t6, carry) = mac(t6, a[3], a[3], carry);
    let (t7, carry) = adc(t7, 0, carry);
    let (t8, carry) = mac(t8, a[4], a[4], carry);
    let (t9, carry) = adc(t9, 0, carry);
    let (t10, carry) = mac(t10, a[5], a[5], carry);
    let (t11, _) = adc(t11, 0, carry);

    reduce_wide(t0, t1, t2, t3, t4, t5, t6, t7, t8, t9, t10, t11)
}

// ============================================================================
// Core Field Operations
// ============================================================================

impl Fp {
    /// Additive identity
    #[inline]
    pub const fn zero() -> Fp {
        Fp([0, 0, 0, 0, 0, 0])
    }

    /// Multiplicative identity
    #[inline]
    pub const fn one() -> Fp {
        R
    }

    /// Check if element is zero
    pub fn is_zero(&self) -> Choice {
        Choice::from((mont::is_zero_mask(&self.0) & 1) as u8)
    }

    /// Wrap Montgomery-form limbs without checking canonicity
    pub const fn from_raw_unchecked(v: [u64; 6]) -> Fp {
        Fp(v)
    }

    /// Enter the Montgomery domain from canonical little-endian limbs.
    ///
    /// Returns none if the value is not below p.
    pub fn from_canonical(limbs: &[u64; 6]) -> CtOption<Fp> {
        let in_range = mont::lt_mask(limbs, &MODULUS);
        let v = mont::to_mont(limbs, &PARAMS);
        CtOption::new(Fp(v), Choice::from((in_range & 1) as u8))
    }

    /// Checked variant of [`Fp::from_canonical`]
    pub fn try_from_canonical(limbs: &[u64; 6]) -> Result<Fp> {
        Option::from(Self::from_canonical(limbs)).ok_or(Error::OutOfRange {
            context: "Fp::try_from_canonical",
        })
    }

    /// Leave the Montgomery domain, returning canonical little-endian limbs
    pub fn to_canonical(&self) -> [u64; 6] {
        mont::from_mont(&self.0, &MODULUS, INV)
    }

    /// Lift a small integer
    pub fn from_u64(v: u64) -> Fp {
        Fp(mont::to_mont(&[v, 0, 0, 0, 0, 0], &PARAMS))
    }

    /// Add two field elements
    #[inline]
    pub fn add(&self, rhs: &Fp) -> Fp {
        Fp(mont::add_mod(&self.0, &rhs.0, &MODULUS))
    }

    /// Subtract two field elements
    #[inline]
    pub fn sub(&self, rhs: &Fp) -> Fp {
        Fp(mont::sub_mod(&self.0, &rhs.0, &MODULUS))
    }

    /// Negate a field element
    #[inline]
    pub fn neg(&self) -> Fp {
        Fp(mont::neg_mod(&self.0, &MODULUS))
    }

    /// Double a field element
    #[inline]
    pub fn double(&self) -> Fp {
        Fp(mont::double_mod(&self.0, &MODULUS))
    }

    /// Halve a field element
    #[inline]
    pub fn half(&self) -> Fp {
        Fp(mont::half_mod(&self.0, &MODULUS))
    }

    /// Multiply two field elements
    #[inline]
    pub fn mul(&self, rhs: &Fp) -> Fp {
        match backend() {
            Backend::Wide => Fp(mul_wide(&self.0, &rhs.0)),
            Backend::Portable => Fp(mont::mul_mont(&self.0, &rhs.0, &MODULUS, INV)),
        }
    }

    /// Square this element
    #[inline]
    pub fn square(&self) -> Self {
        match backend() {
            Backend::Wide => Fp(square_wide(&self.0)),
            Backend::Portable => Fp(mont::sqr_mont(&self.0, &MODULUS, INV)),
        }
    }

    /// Variable-time exponentiation by a public exponent
    pub fn pow_vartime(&self, by: &[u64; 6]) -> Self {
        let mut res = Self::one();
        for e in by.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if ((*e >> i) & 1) == 1 {
                    res *= self;
                }
            }
        }
        res
    }

    /// Compute square root if it exists
    #[inline]
    pub fn sqrt(&self) -> CtOption<Self> {
        let sqrt = self.pow_vartime(&SQRT_EXP);
        CtOption::new(sqrt, sqrt.square().ct_eq(self))
    }

    /// Constant-time inverse; zero maps to zero.
    ///
    /// Callers that must treat zero as an error should use [`Fp::invert`].
    pub fn inverse(&self) -> Fp {
        let t = divstep_inverse(&self.0, &PARAMS, FP_DIVSTEP_BATCHES);
        // t = (aR)^{-1}; multiplying by R^3 in the Montgomery domain gives a^{-1}R
        Fp(mont::mul_mont(&t, &PARAMS.r3, &MODULUS, INV))
    }

    /// Multiplicative inverse, none for zero
    #[inline]
    pub fn invert(&self) -> CtOption<Self> {
        CtOption::new(self.inverse(), !self.is_zero())
    }

    /// Sign and parity of the canonical value: `(negative, even)` where
    /// negative means greater than (p - 1) / 2
    pub fn sign_parity(&self) -> (Choice, Choice) {
        let (neg, even) = mont::sign_parity(&self.to_canonical(), &PARAMS.half);
        (Choice::from((neg & 1) as u8), Choice::from((even & 1) as u8))
    }

    /// Check if element > (p-1)/2
    pub fn lexicographically_largest(&self) -> Choice {
        self.sign_parity().0
    }

    /// Parity of the canonical value (the hash-to-curve `sgn0`)
    pub fn sgn0(&self) -> Choice {
        !self.sign_parity().1
    }
}

// ============================================================================
// Serialization
// ============================================================================

impl Fp {
    /// Decode from big-endian bytes
    pub fn from_bytes(bytes: &[u8; FP_SIZE]) -> CtOption<Fp> {
        Self::from_canonical(&limbs_from_be_bytes::<6>(bytes))
    }

    /// Decode from little-endian bytes
    pub fn from_bytes_le(bytes: &[u8; FP_SIZE]) -> CtOption<Fp> {
        Self::from_canonical(&limbs_from_le_bytes::<6>(bytes))
    }

    /// Decode a big-endian slice, rejecting wrong lengths and values >= p
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Fp> {
        validate::length("Fp::try_from_bytes", bytes.len(), FP_SIZE)?;
        let limbs = limbs_from_be_bytes::<6>(bytes);
        Option::from(Self::from_canonical(&limbs)).ok_or(Error::OutOfRange {
            context: "Fp::try_from_bytes",
        })
    }

    /// Encode to big-endian bytes
    pub fn to_bytes(self) -> [u8; FP_SIZE] {
        let mut res = [0u8; FP_SIZE];
        limbs_to_be_bytes(&self.to_canonical(), &mut res);
        res
    }

    /// Encode to little-endian bytes
    pub fn to_bytes_le(self) -> [u8; FP_SIZE] {
        let mut res = [0u8; FP_SIZE];
        limbs_to_le_bytes(&self.to_canonical(), &mut res);
        res
    }

    /// Reduce a 768-bit big-endian integer modulo p
    pub(crate) fn from_wide_be(bytes: &[u8; 96]) -> Fp {
        let hi = limbs_from_be_bytes::<6>(&bytes[..48]);
        let lo = limbs_from_be_bytes::<6>(&bytes[48..]);
        // lo * R2 / R = lo * R; hi * R3 / R = hi * 2^384 * R
        let lo = Fp(mont::mul_mont(&lo, &PARAMS.r2, &MODULUS, INV));
        let hi = Fp(mont::mul_mont(&hi, &PARAMS.r3, &MODULUS, INV));
        lo + hi
    }

    /// Reduce 64 bytes of uniform output (hash-to-field) modulo p
    pub fn from_okm(okm: &[u8; 64]) -> Fp {
        let mut wide = [0u8; 96];
        wide[32..].copy_from_slice(okm);
        Self::from_wide_be(&wide)
    }

    /// Create random field element
    pub fn random(mut rng: impl RngCore) -> Fp {
        let mut bytes = [0u8; 96];
        rng.fill_bytes(&mut bytes);
        Self::from_wide_be(&bytes)
    }

    /// Big-endian hex encoding, without prefix
    #[cfg(feature = "alloc")]
    pub fn to_hex(&self) -> alloc::string::String {
        crate::encoding::to_hex(&self.to_bytes())
    }

    /// Parse a big-endian hex string, `0x`-prefixed or bare
    pub fn from_hex(s: &str) -> Result<Fp> {
        let bytes = crate::encoding::from_hex_array::<FP_SIZE>(s)?;
        Self::try_from_bytes(&bytes)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl fmt::Debug for Fp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tmp = self.to_bytes();
        write!(f, "0x")?;
        for &b in tmp.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl Default for Fp {
    fn default() -> Self {
        Fp::zero()
    }
}

impl zeroize::DefaultIsZeroes for Fp {}

impl ConstantTimeEq for Fp {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(Choice::from(1), |acc, (a, b)| acc & a.ct_eq(b))
    }
}

impl Eq for Fp {}
impl PartialEq for Fp {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl ConditionallySelectable for Fp {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; 6];
        for (o, (x, y)) in out.iter_mut().zip(a.0.iter().zip(b.0.iter())) {
            *o = u64::conditional_select(x, y, choice);
        }
        Fp(out)
    }
}

impl<'a> Neg for &'a Fp {
    type Output = Fp;
    #[inline]
    fn neg(self) -> Fp {
        Fp::neg(self)
    }
}

impl<'a, 'b> Sub<&'b Fp> for &'a Fp {
    type Output = Fp;
    #[inline]
    fn sub(self, rhs: &'b Fp) -> Fp {
        Fp::sub(self, rhs)
    }
}

impl<'a, 'b> Add<&'b Fp> for &'a Fp {
    type Output = Fp;
    #[inline]
    fn add(self, rhs: &'b Fp) -> Fp {
        Fp::add(self, rhs)
    }
}

impl<'a, 'b> Mul<&'b Fp> for &'a Fp {
    type Output = Fp;
    #[inline]
    fn mul(self, rhs: &'b Fp) -> Fp {
        Fp::mul(self, rhs)
    }
}

impl_neg_owned!(Fp);
impl_binops_additive!(Fp, Fp);
impl_binops_multiplicative!(Fp, Fp);

impl super::Field for Fp {
    fn zero() -> Self {
        Fp::zero()
    }
    fn one() -> Self {
        Fp::one()
    }
    fn is_zero(&self) -> Choice {
        Fp::is_zero(self)
    }
    fn square(&self) -> Self {
        Fp::square(self)
    }
    fn double(&self) -> Self {
        Fp::double(self)
    }
    fn inverse(&self) -> Self {
        Fp::inverse(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_backends_agree() {
        let a = Fp::from_u64(0x1234_5678_9abc_def0).square().square();
        let b = Fp::from_u64(0x0fed_cba9_8765_4321).square();
        assert_eq!(mul_wide(&a.0, &b.0), mont::mul_mont(&a.0, &b.0, &MODULUS, INV));
        assert_eq!(square_wide(&a.0), mont::sqr_mont(&a.0, &MODULUS, INV));
    }

    #[test]
    fn test_wide_square_matches_portable() {
        let mut rng = ChaCha20Rng::seed_from_u64(0x5157);
        let minus_one = -Fp::one();
        let mut inputs = vec![Fp::zero(), Fp::one(), minus_one];
        inputs.extend((0..64).map(|_| Fp::random(&mut rng)));

        for a in inputs {
            let portable = mont::sqr_mont(&a.0, &MODULUS, INV);
            assert_eq!(square_wide(&a.0), portable);
            assert_eq!(square_wide(&a.0), mul_wide(&a.0, &a.0));
        }
    }

    #[test]
    fn test_half_constant() {
        // 2 * half + 1 == p
        let h = PARAMS.half;
        let mut twice = [0u64; 6];
        for i in 0..6 {
            let carry_in = if i == 0 { 1 } else { h[i - 1] >> 63 };
            twice[i] = (h[i] << 1) | carry_in;
        }
        assert_eq!(twice, MODULUS);
    }

    #[test]
    fn test_r_is_montgomery_one() {
        assert_eq!(Fp::from_u64(1), R);
        assert_eq!(R.to_canonical(), [1, 0, 0, 0, 0, 0]);
    }
}
