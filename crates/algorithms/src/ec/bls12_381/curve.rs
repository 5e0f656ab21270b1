//! Short Weierstrass arithmetic on `y^2 = x^3 + b` shared by G1 and G2.
//!
//! Points are kept in Jacobian coordinates `(X, Y, Z)` representing
//! `(X / Z^2, Y / Z^3)`, with `Z = 0` for the point at infinity. All
//! formulas assume `a = 0`.

use core::borrow::Borrow;
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use blscore_internal::select;

use super::field::Field;
use super::Scalar;

/// Coordinate field of one of the two curves
pub trait CurveField: Field {
    /// Curve coefficient `b`
    const B: Self;
}

// ============================================================================
// Affine points
// ============================================================================

/// Affine point with an explicit infinity flag
#[derive(Copy, Clone, Debug)]
pub struct Affine<F> {
    pub(crate) x: F,
    pub(crate) y: F,
    pub(crate) infinity: Choice,
}

impl<F: CurveField> Affine<F> {
    /// Point at infinity
    pub fn identity() -> Self {
        Affine {
            x: F::zero(),
            y: F::one(),
            infinity: Choice::from(1u8),
        }
    }

    /// Wrap coordinates without checking the curve equation
    pub fn from_xy_unchecked(x: F, y: F) -> Self {
        Affine {
            x,
            y,
            infinity: Choice::from(0u8),
        }
    }

    /// x-coordinate (zero for the identity)
    pub fn x(&self) -> F {
        F::conditional_select(&self.x, &F::zero(), self.infinity)
    }

    /// y-coordinate (zero for the identity)
    pub fn y(&self) -> F {
        F::conditional_select(&self.y, &F::zero(), self.infinity)
    }

    /// Check if point at infinity
    #[inline]
    pub fn is_identity(&self) -> Choice {
        self.infinity
    }

    /// Curve membership check; the identity is on the curve
    pub fn is_on_curve(&self) -> Choice {
        (self.y.square() - self.x.square() * self.x).ct_eq(&F::B) | self.infinity
    }

    /// Negate when `negate` is set
    #[inline]
    pub fn cneg(&self, negate: Choice) -> Self {
        Affine {
            x: self.x,
            y: select(negate, &(-self.y), &self.y),
            infinity: self.infinity,
        }
    }

    /// Lift to Jacobian coordinates
    pub fn to_jacobian(&self) -> Jacobian<F> {
        Jacobian {
            x: self.x,
            y: self.y,
            z: F::conditional_select(&F::one(), &F::zero(), self.infinity),
        }
    }
}

impl<F: CurveField> Default for Affine<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: CurveField> zeroize::DefaultIsZeroes for Affine<F> {}

impl<F: CurveField> fmt::Display for Affine<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<F: CurveField> ConstantTimeEq for Affine<F> {
    fn ct_eq(&self, other: &Self) -> Choice {
        (self.infinity & other.infinity)
            | ((!self.infinity)
                & (!other.infinity)
                & self.x.ct_eq(&other.x)
                & self.y.ct_eq(&other.y))
    }
}

impl<F: CurveField> ConditionallySelectable for Affine<F> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Affine {
            x: F::conditional_select(&a.x, &b.x, choice),
            y: F::conditional_select(&a.y, &b.y, choice),
            infinity: Choice::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl<F: CurveField> Eq for Affine<F> {}
impl<F: CurveField> PartialEq for Affine<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl<'a, F: CurveField> Neg for &'a Affine<F> {
    type Output = Affine<F>;

    #[inline]
    fn neg(self) -> Affine<F> {
        Affine {
            x: self.x,
            y: F::conditional_select(&(-self.y), &F::one(), self.infinity),
            infinity: self.infinity,
        }
    }
}

impl<F: CurveField> Neg for Affine<F> {
    type Output = Affine<F>;

    #[inline]
    fn neg(self) -> Affine<F> {
        -&self
    }
}

impl<'a, F: CurveField> From<&'a Jacobian<F>> for Affine<F> {
    fn from(p: &'a Jacobian<F>) -> Affine<F> {
        p.to_affine()
    }
}

impl<F: CurveField> From<Jacobian<F>> for Affine<F> {
    fn from(p: Jacobian<F>) -> Affine<F> {
        p.to_affine()
    }
}

// ============================================================================
// Jacobian points
// ============================================================================

/// Point in Jacobian coordinates
#[derive(Copy, Clone, Debug)]
pub struct Jacobian<F> {
    pub(crate) x: F,
    pub(crate) y: F,
    pub(crate) z: F,
}

impl<F: CurveField> Jacobian<F> {
    /// Point at infinity
    pub fn identity() -> Self {
        Jacobian {
            x: F::one(),
            y: F::one(),
            z: F::zero(),
        }
    }

    /// Check if point at infinity
    #[inline]
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Curve membership check: `Y^2 = X^3 + b Z^6`
    pub fn is_on_curve(&self) -> Choice {
        let z2 = self.z.square();
        let z6 = z2.square() * z2;
        (self.y.square()).ct_eq(&(self.x.square() * self.x + F::B * z6)) | self.is_identity()
    }

    /// Point doubling (dbl-2009-l)
    pub fn double(&self) -> Self {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = ((self.x + b).square() - a - c).double();
        let e = a.double() + a;
        let f = e.square();

        let x3 = f - d.double();
        let y3 = e * (d - x3) - c.double().double().double();
        let z3 = (self.y * self.z).double();

        // Z = 0 propagates, so the identity doubles to itself
        Jacobian {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Double `n` times
    pub fn double_n(&self, n: usize) -> Self {
        let mut acc = *self;
        for _ in 0..n {
            acc = acc.double();
        }
        acc
    }

    /// Point addition (add-2007-bl), constant time in every case: equal
    /// inputs fall through to doubling, opposite inputs to the identity.
    pub fn add(&self, rhs: &Self) -> Self {
        let z1z1 = self.z.square();
        let z2z2 = rhs.z.square();
        let u1 = self.x * z2z2;
        let u2 = rhs.x * z1z1;
        let s1 = self.y * rhs.z * z2z2;
        let s2 = rhs.y * self.z * z1z1;
        let h = u2 - u1;
        let r = (s2 - s1).double();

        let i = h.double().square();
        let j = h * i;
        let v = u1 * i;
        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (s1 * j).double();
        let z3 = ((self.z + rhs.z).square() - z1z1 - z2z2) * h;
        let sum = Jacobian {
            x: x3,
            y: y3,
            z: z3,
        };

        let same_x = h.is_zero();
        let same_y = r.is_zero();
        let lhs_inf = self.is_identity();
        let rhs_inf = rhs.is_identity();
        let both_finite = !lhs_inf & !rhs_inf;

        let res = select(both_finite & same_x & same_y, &self.double(), &sum);
        let res = select(both_finite & same_x & !same_y, &Self::identity(), &res);
        let res = select(lhs_inf, rhs, &res);
        select(rhs_inf, self, &res)
    }

    /// Mixed addition with an affine point (madd-2007-bl)
    pub fn add_mixed(&self, rhs: &Affine<F>) -> Self {
        let z1z1 = self.z.square();
        let u2 = rhs.x * z1z1;
        let s2 = rhs.y * self.z * z1z1;
        let h = u2 - self.x;
        let hh = h.square();
        let i = hh.double().double();
        let j = h * i;
        let r = (s2 - self.y).double();
        let v = self.x * i;

        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (self.y * j).double();
        let z3 = (self.z + h).square() - z1z1 - hh;
        let sum = Jacobian {
            x: x3,
            y: y3,
            z: z3,
        };

        let same_x = h.is_zero();
        let same_y = r.is_zero();
        let lhs_inf = self.is_identity();
        let rhs_inf = rhs.is_identity();
        let both_finite = !lhs_inf & !rhs_inf;

        let res = select(both_finite & same_x & same_y, &self.double(), &sum);
        let res = select(both_finite & same_x & !same_y, &Self::identity(), &res);
        let res = select(lhs_inf, &rhs.to_jacobian(), &res);
        select(rhs_inf, self, &res)
    }

    /// Negate when `negate` is set
    #[inline]
    pub fn cneg(&self, negate: Choice) -> Self {
        Jacobian {
            x: self.x,
            y: select(negate, &(-self.y), &self.y),
            z: self.z,
        }
    }

    /// Normalize with one field inversion; the identity maps to the
    /// affine identity
    pub fn to_affine(&self) -> Affine<F> {
        let zinv = self.z.inverse();
        let zinv2 = zinv.square();
        let x = self.x * zinv2;
        let y = self.y * zinv2 * zinv;

        select(
            self.is_identity(),
            &Affine::identity(),
            &Affine::from_xy_unchecked(x, y),
        )
    }

    /// Normalize a batch with a single field inversion (Montgomery's
    /// trick). Identities are carried through as the affine identity.
    ///
    /// # Panics
    ///
    /// Panics if `p` and `q` differ in length.
    pub fn batch_to_affine(p: &[Self], q: &mut [Affine<F>]) {
        assert_eq!(p.len(), q.len());

        // Forward pass: q[i].x holds the product of the preceding Zs,
        // with identities contributing 1
        let mut acc = F::one();
        for (p, q) in p.iter().zip(q.iter_mut()) {
            q.x = acc;
            acc = F::conditional_select(&(acc * p.z), &acc, p.is_identity());
        }

        acc = acc.inverse();

        for (p, q) in p.iter().rev().zip(q.iter_mut().rev()) {
            let skip = p.is_identity();
            // acc = 1 / (z_0 ... z_i); q.x = z_0 ... z_{i-1}
            let zinv = acc * q.x;
            acc = F::conditional_select(&(acc * p.z), &acc, skip);

            let zinv2 = zinv.square();
            let x = p.x * zinv2;
            let y = p.y * zinv2 * zinv;
            *q = Affine::conditional_select(
                &Affine::from_xy_unchecked(x, y),
                &Affine::identity(),
                skip,
            );
        }
    }

    /// Constant-time scalar multiplication
    pub fn mul_scalar(&self, by: &Scalar) -> Self {
        super::msm::mul_booth(self, by)
    }
}

/// Sum a set of affine points with pairwise affine additions sharing one
/// inversion per round, finishing with mixed additions once fewer than
/// `BULK_ACCUMULATE_CUTOFF` points remain.
///
/// Variable time: only use on public data. Identities are absorbed and the
/// input buffer is used as scratch.
#[cfg(feature = "alloc")]
pub fn bulk_accumulate<F: CurveField>(points: &mut Vec<Affine<F>>) -> Jacobian<F> {
    use blscore_params::msm::BULK_ACCUMULATE_CUTOFF;

    points.retain(|p| !bool::from(p.is_identity()));

    let mut sum = Jacobian::identity();
    let mut denominators: Vec<F> = Vec::with_capacity(points.len() / 2);
    let mut numerators: Vec<F> = Vec::with_capacity(points.len() / 2);

    while points.len() >= BULK_ACCUMULATE_CUTOFF {
        if points.len() % 2 == 1 {
            if let Some(p) = points.pop() {
                sum = sum.add_mixed(&p);
            }
        }

        let pairs = points.len() / 2;
        denominators.clear();
        numerators.clear();

        // Slope of each pair as num / den; opposite points get den = 1 and
        // are marked for removal below
        let mut cancelled = 0usize;
        for k in 0..pairs {
            let (p, q) = (&points[2 * k], &points[2 * k + 1]);
            if p.x == q.x {
                if p.y == q.y && !bool::from(p.y.is_zero()) {
                    let xx = p.x.square();
                    numerators.push(xx.double() + xx);
                    denominators.push(p.y.double());
                } else {
                    numerators.push(F::zero());
                    denominators.push(F::one());
                    cancelled += 1;
                }
            } else {
                numerators.push(q.y - p.y);
                denominators.push(q.x - p.x);
            }
        }

        // Prefix products, one inversion, then unwind into slopes
        let mut prefix = Vec::with_capacity(pairs);
        let mut acc = F::one();
        for d in denominators.iter() {
            prefix.push(acc);
            acc = acc * *d;
        }
        let mut inv = acc.inverse();

        for k in (0..pairs).rev() {
            let den_inv = inv * prefix[k];
            inv = inv * denominators[k];
            numerators[k] = numerators[k] * den_inv;
        }

        // Pair k reads slots 2k and 2k+1 before writing slot k, so a
        // forward pass never overwrites an unread input
        for k in 0..pairs {
            let (p, q) = (points[2 * k], points[2 * k + 1]);
            let opposite = p.x == q.x && !(p.y == q.y && !bool::from(p.y.is_zero()));
            points[k] = if opposite {
                Affine::identity()
            } else {
                let lambda = numerators[k];
                let x3 = lambda.square() - p.x - q.x;
                let y3 = lambda * (p.x - x3) - p.y;
                Affine::from_xy_unchecked(x3, y3)
            };
        }
        points.truncate(pairs);
        if cancelled > 0 {
            points.retain(|p| !bool::from(p.is_identity()));
        }
    }

    for p in points.iter() {
        sum = sum.add_mixed(p);
    }
    sum
}

impl<F: CurveField> Default for Jacobian<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: CurveField> zeroize::DefaultIsZeroes for Jacobian<F> {}

impl<F: CurveField> fmt::Display for Jacobian<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<'a, F: CurveField> From<&'a Affine<F>> for Jacobian<F> {
    fn from(p: &'a Affine<F>) -> Jacobian<F> {
        p.to_jacobian()
    }
}

impl<F: CurveField> From<Affine<F>> for Jacobian<F> {
    fn from(p: Affine<F>) -> Jacobian<F> {
        p.to_jacobian()
    }
}

impl<F: CurveField> ConstantTimeEq for Jacobian<F> {
    fn ct_eq(&self, other: &Self) -> Choice {
        // x1 z2^2 == x2 z1^2 and y1 z2^3 == y2 z1^3
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let x1 = self.x * z2z2;
        let x2 = other.x * z1z1;
        let y1 = self.y * z2z2 * other.z;
        let y2 = other.y * z1z1 * self.z;

        let self_is_zero = self.is_identity();
        let other_is_zero = other.is_identity();

        (self_is_zero & other_is_zero)
            | ((!self_is_zero) & (!other_is_zero) & x1.ct_eq(&x2) & y1.ct_eq(&y2))
    }
}

impl<F: CurveField> ConditionallySelectable for Jacobian<F> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Jacobian {
            x: F::conditional_select(&a.x, &b.x, choice),
            y: F::conditional_select(&a.y, &b.y, choice),
            z: F::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl<F: CurveField> Eq for Jacobian<F> {}
impl<F: CurveField> PartialEq for Jacobian<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl<'a, F: CurveField> Neg for &'a Jacobian<F> {
    type Output = Jacobian<F>;

    #[inline]
    fn neg(self) -> Jacobian<F> {
        Jacobian {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }
}

impl<F: CurveField> Neg for Jacobian<F> {
    type Output = Jacobian<F>;

    #[inline]
    fn neg(self) -> Jacobian<F> {
        -&self
    }
}

impl<'a, 'b, F: CurveField> Add<&'b Jacobian<F>> for &'a Jacobian<F> {
    type Output = Jacobian<F>;

    #[inline]
    fn add(self, rhs: &'b Jacobian<F>) -> Jacobian<F> {
        Jacobian::add(self, rhs)
    }
}

impl<'a, 'b, F: CurveField> Sub<&'b Jacobian<F>> for &'a Jacobian<F> {
    type Output = Jacobian<F>;

    #[inline]
    fn sub(self, rhs: &'b Jacobian<F>) -> Jacobian<F> {
        self + &(-rhs)
    }
}

impl<'a, 'b, F: CurveField> Add<&'b Affine<F>> for &'a Jacobian<F> {
    type Output = Jacobian<F>;

    #[inline]
    fn add(self, rhs: &'b Affine<F>) -> Jacobian<F> {
        self.add_mixed(rhs)
    }
}

impl<'a, 'b, F: CurveField> Sub<&'b Affine<F>> for &'a Jacobian<F> {
    type Output = Jacobian<F>;

    #[inline]
    fn sub(self, rhs: &'b Affine<F>) -> Jacobian<F> {
        self.add_mixed(&(-rhs))
    }
}

impl<'a, 'b, F: CurveField> Add<&'b Jacobian<F>> for &'a Affine<F> {
    type Output = Jacobian<F>;

    #[inline]
    fn add(self, rhs: &'b Jacobian<F>) -> Jacobian<F> {
        rhs.add_mixed(self)
    }
}

impl<'a, 'b, F: CurveField> Sub<&'b Jacobian<F>> for &'a Affine<F> {
    type Output = Jacobian<F>;

    #[inline]
    fn sub(self, rhs: &'b Jacobian<F>) -> Jacobian<F> {
        (-rhs).add_mixed(self)
    }
}

impl<'a, 'b, F: CurveField> Mul<&'b Scalar> for &'a Jacobian<F> {
    type Output = Jacobian<F>;

    fn mul(self, other: &'b Scalar) -> Jacobian<F> {
        self.mul_scalar(other)
    }
}

impl<'a, 'b, F: CurveField> Mul<&'b Jacobian<F>> for &'a Scalar {
    type Output = Jacobian<F>;

    #[inline]
    fn mul(self, rhs: &'b Jacobian<F>) -> Jacobian<F> {
        rhs * self
    }
}

impl<'a, 'b, F: CurveField> Mul<&'b Scalar> for &'a Affine<F> {
    type Output = Jacobian<F>;

    fn mul(self, other: &'b Scalar) -> Jacobian<F> {
        self.to_jacobian().mul_scalar(other)
    }
}

impl<'a, 'b, F: CurveField> Mul<&'b Affine<F>> for &'a Scalar {
    type Output = Jacobian<F>;

    #[inline]
    fn mul(self, rhs: &'b Affine<F>) -> Jacobian<F> {
        rhs * self
    }
}

impl<T, F> Sum<T> for Jacobian<F>
where
    T: Borrow<Jacobian<F>>,
    F: CurveField,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::identity(), |acc, item| acc.add(item.borrow()))
    }
}

/// Owned and assigning operator combinations for one concrete group.
macro_rules! impl_group_ops {
    ($affine:ident, $projective:ident) => {
        impl_binops_additive!($projective, $projective);
        impl_binops_additive!($projective, $affine);
        impl_binops_additive_specify_output!($affine, $projective, $projective);
        impl_binops_multiplicative!($projective, Scalar);
        impl_binops_multiplicative_mixed!($affine, Scalar, $projective);
        impl_binops_multiplicative_mixed!(Scalar, $affine, $projective);
        impl_binops_multiplicative_mixed!(Scalar, $projective, $projective);
    };
}
