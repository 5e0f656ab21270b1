//! Quadratic extension Fp2 = Fp[u] / (u^2 + 1)

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use rand::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use super::fp::Fp;

/// (p - 3) / 4
const P_MINUS_3_DIV_4: [u64; 6] = [
    0xee7f_bfff_ffff_eaaa,
    0x07aa_ffff_ac54_ffff,
    0xd9cc_34a8_3dac_3d89,
    0xd91d_d2e1_3ce1_44af,
    0x92c6_e9ed_90d2_eb35,
    0x0680_447a_8e5f_f9a6,
];

/// (p - 1) / 2
const P_MINUS_1_DIV_2: [u64; 6] = [
    0xdcff_7fff_ffff_d555,
    0x0f55_ffff_58a9_ffff,
    0xb398_6950_7b58_7b12,
    0xb23b_a5c2_79c2_895f,
    0x258d_d3db_21a5_d66b,
    0x0d00_88f5_1cbf_f34d,
];

/// Element c0 + c1 * u
#[derive(Copy, Clone, Default)]
pub struct Fp2 {
    /// Real part
    pub c0: Fp,
    /// Coefficient of u
    pub c1: Fp,
}

impl fmt::Debug for Fp2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} + {:?}*u", self.c0, self.c1)
    }
}

impl From<Fp> for Fp2 {
    fn from(f: Fp) -> Fp2 {
        Fp2 {
            c0: f,
            c1: Fp::zero(),
        }
    }
}

impl ConstantTimeEq for Fp2 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.c0.ct_eq(&other.c0) & self.c1.ct_eq(&other.c1)
    }
}

impl Eq for Fp2 {}
impl PartialEq for Fp2 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl ConditionallySelectable for Fp2 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp2 {
            c0: Fp::conditional_select(&a.c0, &b.c0, choice),
            c1: Fp::conditional_select(&a.c1, &b.c1, choice),
        }
    }
}

impl zeroize::DefaultIsZeroes for Fp2 {}

impl Fp2 {
    /// Additive identity
    #[inline]
    pub const fn zero() -> Fp2 {
        Fp2 {
            c0: Fp::zero(),
            c1: Fp::zero(),
        }
    }

    /// Multiplicative identity
    #[inline]
    pub const fn one() -> Fp2 {
        Fp2 {
            c0: Fp::one(),
            c1: Fp::zero(),
        }
    }

    /// Check if element is zero
    pub fn is_zero(&self) -> Choice {
        self.c0.is_zero() & self.c1.is_zero()
    }

    /// Random element
    pub fn random(mut rng: impl RngCore) -> Fp2 {
        Fp2 {
            c0: Fp::random(&mut rng),
            c1: Fp::random(&mut rng),
        }
    }

    /// Raise to the p-th power: conjugation
    #[inline(always)]
    pub fn frobenius_map(&self) -> Self {
        self.conjugate()
    }

    /// c0 - c1 * u
    #[inline(always)]
    pub fn conjugate(&self) -> Self {
        Fp2 {
            c0: self.c0,
            c1: -self.c1,
        }
    }

    /// Multiply by the Fp6 non-residue u + 1
    #[inline(always)]
    pub fn mul_by_nonresidue(&self) -> Fp2 {
        // (a + bu)(u + 1) = (a - b) + (a + b)u
        Fp2 {
            c0: self.c0 - self.c1,
            c1: self.c0 + self.c1,
        }
    }

    /// Multiply by an element of the base field
    #[inline]
    pub fn mul_by_fp(&self, k: &Fp) -> Fp2 {
        Fp2 {
            c0: self.c0 * k,
            c1: self.c1 * k,
        }
    }

    /// Lexicographic sign: decided by c1, or by c0 when c1 is zero
    #[inline]
    pub fn lexicographically_largest(&self) -> Choice {
        self.c1.lexicographically_largest()
            | (self.c1.is_zero() & self.c0.lexicographically_largest())
    }

    /// Hash-to-curve `sgn0`: parity of c0, or of c1 when c0 is zero
    pub fn sgn0(&self) -> Choice {
        self.c0.sgn0() | (self.c0.is_zero() & self.c1.sgn0())
    }

    /// Squaring with two base-field multiplications
    pub fn square(&self) -> Fp2 {
        // (a + bu)^2 = (a + b)(a - b) + 2ab u
        let a = self.c0 + self.c1;
        let b = self.c0 - self.c1;
        let c = self.c0.double();

        Fp2 {
            c0: a * b,
            c1: c * self.c1,
        }
    }

    /// Karatsuba multiplication: three base-field multiplications
    pub fn mul(&self, rhs: &Fp2) -> Fp2 {
        let aa = self.c0 * rhs.c0;
        let bb = self.c1 * rhs.c1;
        let cross = (self.c0 + self.c1) * (rhs.c0 + rhs.c1);

        Fp2 {
            c0: aa - bb,
            c1: cross - aa - bb,
        }
    }

    /// Add two elements
    pub fn add(&self, rhs: &Fp2) -> Fp2 {
        Fp2 {
            c0: self.c0 + rhs.c0,
            c1: self.c1 + rhs.c1,
        }
    }

    /// Subtract two elements
    pub fn sub(&self, rhs: &Fp2) -> Fp2 {
        Fp2 {
            c0: self.c0 - rhs.c0,
            c1: self.c1 - rhs.c1,
        }
    }

    /// Negate
    pub fn neg(&self) -> Fp2 {
        Fp2 {
            c0: -self.c0,
            c1: -self.c1,
        }
    }

    /// Double
    pub fn double(&self) -> Fp2 {
        Fp2 {
            c0: self.c0.double(),
            c1: self.c1.double(),
        }
    }

    /// Square root for p = 3 mod 4 (Adj-Rodriguez, Algorithm 9)
    pub fn sqrt(&self) -> CtOption<Self> {
        let a1 = self.pow_vartime(&P_MINUS_3_DIV_4);
        let alpha = a1.square() * self;
        let x0 = a1 * self;

        // alpha = -1: the root is x0 * u
        let x_u = Fp2 {
            c0: -x0.c1,
            c1: x0.c0,
        };
        let b = (alpha + Fp2::one()).pow_vartime(&P_MINUS_1_DIV_2);
        let candidate = Fp2::conditional_select(&(b * x0), &x_u, alpha.ct_eq(&-Fp2::one()));
        let candidate = Fp2::conditional_select(&candidate, &Fp2::zero(), self.is_zero());

        CtOption::new(candidate, candidate.square().ct_eq(self))
    }

    /// Constant-time inverse; zero maps to zero
    pub fn inverse(&self) -> Fp2 {
        // 1 / (a + bu) = (a - bu) / (a^2 + b^2)
        let t = (self.c0.square() + self.c1.square()).inverse();
        Fp2 {
            c0: self.c0 * t,
            c1: -(self.c1 * t),
        }
    }

    /// Multiplicative inverse, none for zero
    pub fn invert(&self) -> CtOption<Self> {
        CtOption::new(self.inverse(), !self.is_zero())
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
}

impl<'a> Neg for &'a Fp2 {
    type Output = Fp2;
    #[inline]
    fn neg(self) -> Fp2 {
        Fp2::neg(self)
    }
}

impl<'a, 'b> Sub<&'b Fp2> for &'a Fp2 {
    type Output = Fp2;
    #[inline]
    fn sub(self, rhs: &'b Fp2) -> Fp2 {
        Fp2::sub(self, rhs)
    }
}

impl<'a, 'b> Add<&'b Fp2> for &'a Fp2 {
    type Output = Fp2;
    #[inline]
    fn add(self, rhs: &'b Fp2) -> Fp2 {
        Fp2::add(self, rhs)
    }
}

impl<'a, 'b> Mul<&'b Fp2> for &'a Fp2 {
    type Output = Fp2;
    #[inline]
    fn mul(self, rhs: &'b Fp2) -> Fp2 {
        Fp2::mul(self, rhs)
    }
}

impl_neg_owned!(Fp2);
impl_binops_additive!(Fp2, Fp2);
impl_binops_multiplicative!(Fp2, Fp2);

impl super::Field for Fp2 {
    fn zero() -> Self {
        Fp2::zero()
    }
    fn one() -> Self {
        Fp2::one()
    }
    fn is_zero(&self) -> Choice {
        Fp2::is_zero(self)
    }
    fn square(&self) -> Self {
        Fp2::square(self)
    }
    fn double(&self) -> Self {
        Fp2::double(self)
    }
    fn inverse(&self) -> Self {
        Fp2::inverse(self)
    }
}
