//! BLS12-381 scalar field F_r where r = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use rand::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use blscore_internal::endian::{
    limbs_from_be_bytes, limbs_from_le_bytes, limbs_to_be_bytes, limbs_to_le_bytes,
};
use blscore_params::curve::{FR_DIVSTEP_BATCHES, SCALAR_SIZE};

use super::field::inverse::divstep_inverse;
use super::field::mont::{self, MontParams};
use crate::error::{validate, Error, Result};

// Constants
const MODULUS: [u64; 4] = [
    0xffff_ffff_0000_0001,
    0x53bd_a402_fffe_5bfe,
    0x3339_d808_09a1_d805,
    0x73ed_a753_299d_7d48,
];

/// INV = -(r^{-1} mod 2^64) mod 2^64
const INV: u64 = 0xffff_fffe_ffff_ffff;

/// R = 2^256 mod r
const R: Scalar = Scalar([
    0x0000_0001_ffff_fffe,
    0x5884_b7fa_0003_4802,
    0x998c_4fef_ecbc_4ff5,
    0x1824_b159_acc5_056f,
]);

static PARAMS: MontParams<4> = MontParams {
    modulus: MODULUS,
    inv: INV,
    // R^2 = 2^512 mod r
    r2: [
        0xc999_e990_f3f2_9c6d,
        0x2b6c_edcb_8792_5c23,
        0x05d3_1496_7254_398f,
        0x0748_d9d9_9f59_ff11,
    ],
    // R^3 = 2^768 mod r
    r3: [
        0xc62c_1807_439b_73af,
        0x1b3e_0d18_8cf0_6990,
        0x73d1_3c71_c7b5_f418,
        0x6e2a_5bb9_c8db_33e9,
    ],
    // (r - 1) / 2
    half: [
        0x7fff_ffff_8000_0000,
        0xa9de_d201_7fff_2dff,
        0x199c_ec04_04d0_ec02,
        0x39f6_d3a9_94ce_bea4,
    ],
};

/// Element of the scalar field in Montgomery form: Scalar(a) = aR mod r
#[derive(Clone, Copy, Eq)]
pub struct Scalar(pub(crate) [u64; 4]);

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tmp = self.to_bytes_be();
        write!(f, "0x")?;
        for &b in tmp.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<u64> for Scalar {
    fn from(val: u64) -> Scalar {
        Scalar(mont::to_mont(&[val, 0, 0, 0], &PARAMS))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl PartialEq for Scalar {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Scalar([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl Default for Scalar {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl zeroize::DefaultIsZeroes for Scalar {}

impl Scalar {
    /// Additive identity
    #[inline]
    pub const fn zero() -> Scalar {
        Scalar([0, 0, 0, 0])
    }

    /// Multiplicative identity
    #[inline]
    pub const fn one() -> Scalar {
        R
    }

    /// Check if element is zero
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Scalar::zero())
    }

    /// Lift any 256-bit little-endian integer, reducing it mod r
    pub fn from_raw(val: [u64; 4]) -> Scalar {
        Scalar(mont::to_mont(&val, &PARAMS))
    }

    /// Enter the Montgomery domain from canonical limbs; none if >= r
    pub fn from_canonical(limbs: &[u64; 4]) -> CtOption<Scalar> {
        let in_range = mont::lt_mask(limbs, &MODULUS);
        CtOption::new(
            Scalar(mont::to_mont(limbs, &PARAMS)),
            Choice::from((in_range & 1) as u8),
        )
    }

    /// Canonical little-endian limbs (leaves the Montgomery domain)
    pub fn to_canonical(&self) -> [u64; 4] {
        mont::from_mont(&self.0, &MODULUS, INV)
    }

    /// Add two scalars
    #[inline]
    pub fn add(&self, rhs: &Self) -> Self {
        Scalar(mont::add_mod(&self.0, &rhs.0, &MODULUS))
    }

    /// Subtract two scalars
    #[inline]
    pub fn sub(&self, rhs: &Self) -> Self {
        Scalar(mont::sub_mod(&self.0, &rhs.0, &MODULUS))
    }

    /// Negate
    #[inline]
    pub fn neg(&self) -> Self {
        Scalar(mont::neg_mod(&self.0, &MODULUS))
    }

    /// Double
    #[inline]
    pub fn double(&self) -> Scalar {
        Scalar(mont::double_mod(&self.0, &MODULUS))
    }

    /// Multiply two scalars
    #[inline]
    pub fn mul(&self, rhs: &Self) -> Self {
        Scalar(mont::mul_mont(&self.0, &rhs.0, &MODULUS, INV))
    }

    /// Square
    #[inline]
    pub fn square(&self) -> Scalar {
        Scalar(mont::sqr_mont(&self.0, &MODULUS, INV))
    }

    /// Variable-time exponentiation by a public exponent
    pub fn pow_vartime(&self, by: &[u64; 4]) -> Self {
        let mut res = Self::one();
        for e in by.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if ((*e >> i) & 1) == 1 {
                    res = res.mul(self);
                }
            }
        }
        res
    }

    /// Constant-time inverse; zero maps to zero.
    ///
    /// Callers that must treat zero as an error should use [`Scalar::invert`].
    pub fn inverse(&self) -> Scalar {
        let t = divstep_inverse(&self.0, &PARAMS, FR_DIVSTEP_BATCHES);
        Scalar(mont::mul_mont(&t, &PARAMS.r3, &MODULUS, INV))
    }

    /// Multiplicative inverse, none for zero
    pub fn invert(&self) -> CtOption<Self> {
        CtOption::new(self.inverse(), !self.is_zero())
    }

    /// Sign and parity of the canonical value: `(negative, even)` where
    /// negative means greater than (r - 1) / 2
    pub fn sign_parity(&self) -> (Choice, Choice) {
        let (neg, even) = mont::sign_parity(&self.to_canonical(), &PARAMS.half);
        (Choice::from((neg & 1) as u8), Choice::from((even & 1) as u8))
    }

    /// Create from little-endian bytes if canonical
    pub fn from_bytes(bytes: &[u8; SCALAR_SIZE]) -> CtOption<Scalar> {
        Self::from_canonical(&limbs_from_le_bytes::<4>(bytes))
    }

    /// Create from big-endian bytes if canonical
    pub fn from_bytes_be(bytes: &[u8; SCALAR_SIZE]) -> CtOption<Scalar> {
        Self::from_canonical(&limbs_from_be_bytes::<4>(bytes))
    }

    /// Checked little-endian decode of a slice
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Scalar> {
        validate::length("Scalar::try_from_bytes", bytes.len(), SCALAR_SIZE)?;
        Option::from(Self::from_canonical(&limbs_from_le_bytes::<4>(bytes))).ok_or(
            Error::OutOfRange {
                context: "Scalar::try_from_bytes",
            },
        )
    }

    /// Checked big-endian decode of a slice
    pub fn try_from_bytes_be(bytes: &[u8]) -> Result<Scalar> {
        validate::length("Scalar::try_from_bytes_be", bytes.len(), SCALAR_SIZE)?;
        Option::from(Self::from_canonical(&limbs_from_be_bytes::<4>(bytes))).ok_or(
            Error::OutOfRange {
                context: "Scalar::try_from_bytes_be",
            },
        )
    }

    /// Convert to little-endian bytes
    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        let mut res = [0u8; SCALAR_SIZE];
        limbs_to_le_bytes(&self.to_canonical(), &mut res);
        res
    }

    /// Convert to big-endian bytes
    pub fn to_bytes_be(&self) -> [u8; SCALAR_SIZE] {
        let mut res = [0u8; SCALAR_SIZE];
        limbs_to_be_bytes(&self.to_canonical(), &mut res);
        res
    }

    /// Create from 512-bit little-endian integer mod r
    pub fn from_bytes_wide(bytes: &[u8; 64]) -> Scalar {
        let lo = limbs_from_le_bytes::<4>(&bytes[..32]);
        let hi = limbs_from_le_bytes::<4>(&bytes[32..]);
        Self::from_halves(&lo, &hi)
    }

    /// Reduce 48 big-endian bytes of HKDF output (OS2IP(OKM) mod r)
    pub fn from_okm(okm: &[u8; 48]) -> Scalar {
        let mut hi_bytes = [0u8; 32];
        hi_bytes[16..].copy_from_slice(&okm[..16]);
        let hi = limbs_from_be_bytes::<4>(&hi_bytes);
        let lo = limbs_from_be_bytes::<4>(&okm[16..]);
        Self::from_halves(&lo, &hi)
    }

    /// lo + hi * 2^256 mod r
    fn from_halves(lo: &[u64; 4], hi: &[u64; 4]) -> Scalar {
        let lo = Scalar(mont::mul_mont(lo, &PARAMS.r2, &MODULUS, INV));
        let hi = Scalar(mont::mul_mont(hi, &PARAMS.r3, &MODULUS, INV));
        lo + hi
    }

    /// Uniformly random scalar
    pub fn random(mut rng: impl RngCore) -> Self {
        let mut buf = [0u8; 64];
        rng.fill_bytes(&mut buf);
        Self::from_bytes_wide(&buf)
    }

    /// Big-endian hex encoding, without prefix
    #[cfg(feature = "alloc")]
    pub fn to_hex(&self) -> alloc::string::String {
        crate::encoding::to_hex(&self.to_bytes_be())
    }

    /// Parse a big-endian hex string, `0x`-prefixed or bare
    pub fn from_hex(s: &str) -> Result<Scalar> {
        let bytes = crate::encoding::from_hex_array::<SCALAR_SIZE>(s)?;
        Self::try_from_bytes_be(&bytes)
    }
}

impl<'a> Neg for &'a Scalar {
    type Output = Scalar;
    #[inline]
    fn neg(self) -> Scalar {
        Scalar::neg(self)
    }
}

impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    #[inline]
    fn sub(self, rhs: &'b Scalar) -> Scalar {
        Scalar::sub(self, rhs)
    }
}

impl<'a, 'b> Add<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    #[inline]
    fn add(self, rhs: &'b Scalar) -> Scalar {
        Scalar::add(self, rhs)
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    #[inline]
    fn mul(self, rhs: &'b Scalar) -> Scalar {
        Scalar::mul(self, rhs)
    }
}

impl_neg_owned!(Scalar);
impl_binops_additive!(Scalar, Scalar);
impl_binops_multiplicative!(Scalar, Scalar);

impl<T> core::iter::Sum<T> for Scalar
where
    T: core::borrow::Borrow<Scalar>,
{
    fn sum<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, item| acc + item.borrow())
    }
}

impl<T> core::iter::Product<T> for Scalar
where
    T: core::borrow::Borrow<Scalar>,
{
    fn product<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, item| acc * item.borrow())
    }
}
