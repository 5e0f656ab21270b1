//! Optimal ate pairing on BLS12-381
//!
//! The Miller loop walks the bits of |x| once, accumulating doubling lines
//! on every step and addition lines on set bits, then conjugates for the
//! negative sign of x. Lines are evaluated directly into the sparse
//! `Fp12::mul_by_014` form.

use core::borrow::Borrow;
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Neg, Sub};

use rand::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use blscore_params::curve::{BLS_X, BLS_X_BITS, BLS_X_IS_NEGATIVE};
use blscore_params::msm::MILLER_BATCH_LIMIT;

use super::field::fp12::Fp12;
use super::field::fp2::Fp2;
use super::field::fp6::Fp6;
use super::{G1Affine, G2Affine, G2Projective, Scalar};

/// Line coefficients produced by one doubling or addition step
type Line = (Fp2, Fp2, Fp2);

/// Output of the Miller loop, before final exponentiation.
#[derive(Copy, Clone, Debug)]
pub struct MillerLoopResult(pub(crate) Fp12);

impl Default for MillerLoopResult {
    fn default() -> Self {
        MillerLoopResult(Fp12::one())
    }
}

impl zeroize::DefaultIsZeroes for MillerLoopResult {}

impl ConditionallySelectable for MillerLoopResult {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        MillerLoopResult(Fp12::conditional_select(&a.0, &b.0, choice))
    }
}

impl MillerLoopResult {
    /// Raw Fp12 value
    pub fn as_fp12(&self) -> &Fp12 {
        &self.0
    }

    /// Raise to `(p^12 - 1) / r`, landing in the target group.
    ///
    /// The easy part uses one inversion and Frobenius maps; the hard part
    /// follows the chain of Hayashida, Hayasaka and Teruya
    /// (https://eprint.iacr.org/2020/875) with cyclotomic squarings.
    pub fn final_exponentiation(&self) -> Gt {
        let mut f = self.0;
        let mut t0 = f
            .frobenius_map()
            .frobenius_map()
            .frobenius_map()
            .frobenius_map()
            .frobenius_map()
            .frobenius_map();
        // f^(p^6 - 1); a zero input stays zero
        let mut t1 = f.inverse();
        let mut t2 = t0 * t1;
        t1 = t2;
        t2 = t2.frobenius_map().frobenius_map();
        t2 *= t1;
        t1 = cyclotomic_square(t2).conjugate();
        let mut t3 = cyclotomic_exp(t2);
        let mut t4 = cyclotomic_square(t3);
        let mut t5 = t1 * t3;
        t1 = cyclotomic_exp(t5);
        t0 = cyclotomic_exp(t1);
        let mut t6 = cyclotomic_exp(t0);
        t6 *= t4;
        t4 = cyclotomic_exp(t6);
        t5 = t5.conjugate();
        t4 *= t5 * t2;
        t5 = t2.conjugate();
        t1 *= t2;
        t1 = t1.frobenius_map().frobenius_map().frobenius_map();
        t6 *= t5;
        t6 = t6.frobenius_map();
        t3 *= t0;
        t3 = t3.frobenius_map().frobenius_map();
        t3 *= t1;
        t3 *= t6;
        f = t3 * t4;

        Gt(f)
    }
}

impl<'a, 'b> Add<&'b MillerLoopResult> for &'a MillerLoopResult {
    type Output = MillerLoopResult;

    #[inline]
    fn add(self, rhs: &'b MillerLoopResult) -> MillerLoopResult {
        MillerLoopResult(self.0 * rhs.0)
    }
}

impl_add_binop_specify_output!(MillerLoopResult, MillerLoopResult, MillerLoopResult);

impl core::ops::AddAssign<MillerLoopResult> for MillerLoopResult {
    #[inline]
    fn add_assign(&mut self, rhs: MillerLoopResult) {
        *self = &*self + &rhs;
    }
}

/// `(a + b u)^2` in Fp4 = Fp2[u]/(u^2 - (1 + i))
fn fp4_square(a: Fp2, b: Fp2) -> (Fp2, Fp2) {
    let t0 = a.square();
    let t1 = b.square();
    let mut t2 = t1.mul_by_nonresidue();
    let c0 = t2 + t0;
    t2 = a + b;
    t2 = t2.square();
    t2 -= t0;
    let c1 = t2 - t1;

    (c0, c1)
}

/// Granger–Scott squaring, valid only in the cyclotomic subgroup
/// (https://eprint.iacr.org/2009/565.pdf)
fn cyclotomic_square(f: Fp12) -> Fp12 {
    let mut z0 = f.c0.c0;
    let mut z4 = f.c0.c1;
    let mut z3 = f.c0.c2;
    let mut z2 = f.c1.c0;
    let mut z1 = f.c1.c1;
    let mut z5 = f.c1.c2;

    let (t0, t1) = fp4_square(z0, z1);

    // A
    z0 = t0 - z0;
    z0 = z0 + z0 + t0;

    z1 = t1 + z1;
    z1 = z1 + z1 + t1;

    let (mut t0, t1) = fp4_square(z2, z3);
    let (t2, t3) = fp4_square(z4, z5);

    // C
    z4 = t0 - z4;
    z4 = z4 + z4 + t0;

    z5 = t1 + z5;
    z5 = z5 + z5 + t1;

    // B
    t0 = t3.mul_by_nonresidue();
    z2 = t0 + z2;
    z2 = z2 + z2 + t0;

    z3 = t2 - z3;
    z3 = z3 + z3 + t2;

    Fp12 {
        c0: Fp6 {
            c0: z0,
            c1: z4,
            c2: z3,
        },
        c1: Fp6 {
            c0: z2,
            c1: z1,
            c2: z5,
        },
    }
}

/// `f^x` for f in the cyclotomic subgroup (x negative)
fn cyclotomic_exp(f: Fp12) -> Fp12 {
    let mut tmp = Fp12::one();
    let mut found_one = false;
    for i in (0..BLS_X_BITS).rev().map(|b| ((BLS_X >> b) & 1) == 1) {
        if found_one {
            tmp = cyclotomic_square(tmp)
        } else {
            found_one = i;
        }

        if i {
            tmp *= f;
        }
    }

    if BLS_X_IS_NEGATIVE {
        tmp.conjugate()
    } else {
        tmp
    }
}

// ============================================================================
// Target group
// ============================================================================

/// Element of the order-r target group, written additively: `+` is Fp12
/// multiplication and `Gt * Scalar` exponentiation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Gt(pub(crate) Fp12);

impl fmt::Display for Gt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ConstantTimeEq for Gt {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl ConditionallySelectable for Gt {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Gt(Fp12::conditional_select(&a.0, &b.0, choice))
    }
}

impl Eq for Gt {}
impl PartialEq for Gt {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl Gt {
    /// Group identity (Fp12 one)
    pub fn identity() -> Gt {
        Gt(Fp12::one())
    }

    /// `e(G1, G2)` for the fixed generators
    pub fn generator() -> Gt {
        pairing(&G1Affine::generator(), &G2Affine::generator())
    }

    /// Random group element
    pub fn random(mut rng: impl RngCore) -> Self {
        loop {
            let inner = Fp12::random(&mut rng);
            if !bool::from(inner.is_zero()) {
                let g = MillerLoopResult(inner).final_exponentiation();
                if g != Gt::identity() {
                    return g;
                }
            }
        }
    }

    /// Raw Fp12 value
    pub fn as_fp12(&self) -> &Fp12 {
        &self.0
    }

    /// Group doubling (Fp12 squaring)
    #[inline]
    pub fn double(&self) -> Gt {
        Gt(self.0.square())
    }

    /// Membership in the order-r subgroup of Fp12*.
    ///
    /// Checks `f^(p^4) * f == f^(p^2)` (cyclotomic subgroup) and then
    /// `f^p == f^x`, which holds exactly on the order-r elements.
    pub fn in_group(&self) -> Choice {
        let f = self.0;
        let f2 = f.frobenius_map().frobenius_map();
        let f4 = f2.frobenius_map().frobenius_map();
        let cyclotomic = (f4 * f).ct_eq(&f2);
        let order_r = f.frobenius_map().ct_eq(&cyclotomic_exp(f));

        !f.is_zero() & cyclotomic & order_r
    }
}

impl<'a> Neg for &'a Gt {
    type Output = Gt;

    #[inline]
    fn neg(self) -> Gt {
        // Conjugation is inversion in the cyclotomic subgroup
        Gt(self.0.conjugate())
    }
}

impl<'a, 'b> Add<&'b Gt> for &'a Gt {
    type Output = Gt;

    #[inline]
    fn add(self, rhs: &'b Gt) -> Gt {
        Gt(self.0 * rhs.0)
    }
}

impl<'a, 'b> Sub<&'b Gt> for &'a Gt {
    type Output = Gt;

    #[inline]
    fn sub(self, rhs: &'b Gt) -> Gt {
        self + (-rhs)
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a Gt {
    type Output = Gt;

    fn mul(self, other: &'b Scalar) -> Self::Output {
        let mut acc = Gt::identity();

        // Double-and-add from the top bit; r has 255 bits so bit 255 of
        // the little-endian encoding is always zero
        for bit in other
            .to_bytes()
            .iter()
            .rev()
            .flat_map(|byte| (0..8).rev().map(move |i| Choice::from((byte >> i) & 1u8)))
            .skip(1)
        {
            acc = acc.double();
            acc = Gt::conditional_select(&acc, &(acc + self), bit);
        }

        acc
    }
}

impl_neg_owned!(Gt);
impl_binops_additive!(Gt, Gt);
impl_binops_multiplicative!(Gt, Scalar);

impl<T> Sum<T> for Gt
where
    T: Borrow<Gt>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::identity(), |acc, item| acc + item.borrow())
    }
}

// ============================================================================
// Miller loop
// ============================================================================

trait MillerLoopDriver {
    type Output;

    fn doubling_step(&mut self, f: Self::Output) -> Self::Output;
    fn addition_step(&mut self, f: Self::Output) -> Self::Output;
    fn square_output(f: Self::Output) -> Self::Output;
    fn conjugate(f: Self::Output) -> Self::Output;
    fn one() -> Self::Output;
}

/// Walks the fixed public bit pattern of |x|, skipping the leading one.
fn miller_loop<D: MillerLoopDriver>(driver: &mut D) -> D::Output {
    let mut f = D::one();

    let mut found_one = false;
    for i in (0..BLS_X_BITS).rev().map(|b| (((BLS_X >> 1) >> b) & 1) == 1) {
        if !found_one {
            found_one = i;
            continue;
        }

        f = driver.doubling_step(f);

        if i {
            f = driver.addition_step(f);
        }

        f = D::square_output(f);
    }

    f = driver.doubling_step(f);

    if BLS_X_IS_NEGATIVE {
        f = D::conjugate(f);
    }

    f
}

/// Evaluate a line at `p` and multiply it into `f`
fn ell(f: Fp12, coeffs: &Line, p: &G1Affine) -> Fp12 {
    let mut c0 = coeffs.0;
    let mut c1 = coeffs.1;

    c0.c0 *= p.y;
    c0.c1 *= p.y;

    c1.c0 *= p.x;
    c1.c1 *= p.x;

    f.mul_by_014(&coeffs.2, &c1, &c0)
}

/// Tangent line at `r`, doubling `r` in place (Jacobian).
///
/// Adaptation of Algorithm 26, https://eprint.iacr.org/2010/354.pdf
fn doubling_step(r: &mut G2Projective) -> Line {
    let tmp0 = r.x.square();
    let tmp1 = r.y.square();
    let tmp2 = tmp1.square();
    let tmp3 = (tmp1 + r.x).square() - tmp0 - tmp2;
    let tmp3 = tmp3 + tmp3;
    let tmp4 = tmp0 + tmp0 + tmp0;
    let tmp6 = r.x + tmp4;
    let tmp5 = tmp4.square();
    let zsquared = r.z.square();
    r.x = tmp5 - tmp3 - tmp3;
    r.z = (r.z + r.y).square() - tmp1 - zsquared;
    r.y = (tmp3 - r.x) * tmp4;
    let tmp2 = tmp2 + tmp2;
    let tmp2 = tmp2 + tmp2;
    let tmp2 = tmp2 + tmp2;
    r.y -= tmp2;
    let tmp3 = tmp4 * zsquared;
    let tmp3 = tmp3 + tmp3;
    let tmp3 = -tmp3;
    let tmp6 = tmp6.square() - tmp0 - tmp5;
    let tmp1 = tmp1 + tmp1;
    let tmp1 = tmp1 + tmp1;
    let tmp6 = tmp6 - tmp1;
    let tmp0 = r.z * zsquared;
    let tmp0 = tmp0 + tmp0;

    (tmp0, tmp3, tmp6)
}

/// Chord through `r` and `q`, setting `r = r + q` (mixed Jacobian).
///
/// Adaptation of Algorithm 27, https://eprint.iacr.org/2010/354.pdf
fn addition_step(r: &mut G2Projective, q: &G2Affine) -> Line {
    let zsquared = r.z.square();
    let ysquared = q.y.square();
    let t0 = zsquared * q.x;
    let t1 = ((q.y + r.z).square() - ysquared - zsquared) * zsquared;
    let t2 = t0 - r.x;
    let t3 = t2.square();
    let t4 = t3 + t3;
    let t4 = t4 + t4;
    let t5 = t4 * t2;
    let t6 = t1 - r.y - r.y;
    let t9 = t6 * q.x;
    let t7 = t4 * r.x;
    r.x = t6.square() - t5 - t7 - t7;
    r.z = (r.z + t2).square() - zsquared - t3;
    let t10 = q.y + r.z;
    let t8 = (t7 - r.x) * t6;
    let t0 = r.y * t5;
    let t0 = t0 + t0;
    r.y = t8 - t0;
    let t10 = t10.square() - ysquared;
    let ztsquared = r.z.square();
    let t10 = t10 - ztsquared;
    let t9 = t9 + t9 - t10;
    let t10 = r.z + r.z;
    let t6 = -t6;
    let t1 = t6 + t6;

    (t10, t1, t9)
}

/// Up to `MILLER_BATCH_LIMIT` pairs sharing one accumulator. Pairs with an
/// identity on either side run against the generator with their lines
/// masked out, so they contribute 1.
struct Batch {
    len: usize,
    ps: [G1Affine; MILLER_BATCH_LIMIT],
    qs: [G2Affine; MILLER_BATCH_LIMIT],
    ts: [G2Projective; MILLER_BATCH_LIMIT],
    skip: [Choice; MILLER_BATCH_LIMIT],
}

impl Batch {
    fn new(pairs: &[(G1Affine, G2Affine)]) -> Self {
        let mut batch = Batch {
            len: pairs.len().min(MILLER_BATCH_LIMIT),
            ps: [G1Affine::identity(); MILLER_BATCH_LIMIT],
            qs: [G2Affine::identity(); MILLER_BATCH_LIMIT],
            ts: [G2Projective::identity(); MILLER_BATCH_LIMIT],
            skip: [Choice::from(0u8); MILLER_BATCH_LIMIT],
        };
        for (i, (p, q)) in pairs.iter().take(MILLER_BATCH_LIMIT).enumerate() {
            let skip = p.is_identity() | q.is_identity();
            let q = G2Affine::conditional_select(q, &G2Affine::generator(), skip);
            batch.ps[i] = G1Affine::conditional_select(p, &G1Affine::generator(), skip);
            batch.qs[i] = q;
            batch.ts[i] = q.to_jacobian();
            batch.skip[i] = skip;
        }
        batch
    }
}

impl MillerLoopDriver for Batch {
    type Output = Fp12;

    fn doubling_step(&mut self, mut f: Fp12) -> Fp12 {
        for i in 0..self.len {
            let coeffs = doubling_step(&mut self.ts[i]);
            let next = ell(f, &coeffs, &self.ps[i]);
            f = Fp12::conditional_select(&next, &f, self.skip[i]);
        }
        f
    }

    fn addition_step(&mut self, mut f: Fp12) -> Fp12 {
        for i in 0..self.len {
            let coeffs = addition_step(&mut self.ts[i], &self.qs[i]);
            let next = ell(f, &coeffs, &self.ps[i]);
            f = Fp12::conditional_select(&next, &f, self.skip[i]);
        }
        f
    }

    fn square_output(f: Fp12) -> Fp12 {
        f.square()
    }

    fn conjugate(f: Fp12) -> Fp12 {
        f.conjugate()
    }

    fn one() -> Fp12 {
        Fp12::one()
    }
}

/// Miller loop for a single pair. If either input is the identity the loop
/// is skipped and the result is one.
pub fn single_miller_loop(p: &G1Affine, q: &G2Affine) -> MillerLoopResult {
    if bool::from(p.is_identity() | q.is_identity()) {
        return MillerLoopResult(Fp12::one());
    }
    let mut batch = Batch::new(&[(*p, *q)]);
    MillerLoopResult(miller_loop(&mut batch))
}

/// Product of the Miller loops of all pairs, interleaving up to
/// `MILLER_BATCH_LIMIT` pairs per pass. Identity inputs contribute one.
pub fn miller_loop_n(pairs: &[(G1Affine, G2Affine)]) -> MillerLoopResult {
    let batches = pairs.len().div_ceil(MILLER_BATCH_LIMIT);
    if batches > 1 {
        log::debug!("miller loop: {} pairs in {} batches", pairs.len(), batches);
    }

    let mut acc = Fp12::one();
    for chunk in pairs.chunks(MILLER_BATCH_LIMIT) {
        let mut batch = Batch::new(chunk);
        acc *= miller_loop(&mut batch);
    }
    MillerLoopResult(acc)
}

/// Compute the optimal ate pairing `e(p, q)`.
pub fn pairing(p: &G1Affine, q: &G2Affine) -> Gt {
    single_miller_loop(p, q).final_exponentiation()
}

// ============================================================================
// Precomputed G2 lines
// ============================================================================

/// Line coefficients of a fixed G2 point, reusable across many G1 inputs.
#[cfg(feature = "alloc")]
#[derive(Clone, Debug)]
pub struct G2Prepared {
    infinity: Choice,
    coeffs: Vec<Line>,
}

#[cfg(feature = "alloc")]
impl G2Prepared {
    /// Number of stored line evaluations
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// True when no lines are stored
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Whether the prepared point is the identity
    pub fn is_identity(&self) -> Choice {
        self.infinity
    }
}

#[cfg(feature = "alloc")]
impl From<G2Affine> for G2Prepared {
    fn from(q: G2Affine) -> G2Prepared {
        struct Adder {
            cur: G2Projective,
            base: G2Affine,
            coeffs: Vec<Line>,
        }

        impl MillerLoopDriver for Adder {
            type Output = ();

            fn doubling_step(&mut self, _: Self::Output) -> Self::Output {
                let coeffs = doubling_step(&mut self.cur);
                self.coeffs.push(coeffs);
            }
            fn addition_step(&mut self, _: Self::Output) -> Self::Output {
                let coeffs = addition_step(&mut self.cur, &self.base);
                self.coeffs.push(coeffs);
            }
            fn square_output(_: Self::Output) -> Self::Output {}
            fn conjugate(_: Self::Output) -> Self::Output {}
            fn one() -> Self::Output {}
        }

        let is_identity = q.is_identity();
        let q = G2Affine::conditional_select(&q, &G2Affine::generator(), is_identity);

        let mut adder = Adder {
            cur: q.to_jacobian(),
            base: q,
            // 63 doublings and 5 additions for |x|
            coeffs: Vec::with_capacity(68),
        };

        miller_loop(&mut adder);

        G2Prepared {
            infinity: is_identity,
            coeffs: adder.coeffs,
        }
    }
}

/// Product of Miller loops against prepared G2 points. Pairs with an
/// identity on either side contribute one.
#[cfg(feature = "alloc")]
pub fn multi_miller_loop(terms: &[(&G1Affine, &G2Prepared)]) -> MillerLoopResult {
    struct Adder<'a, 'b, 'c> {
        terms: &'c [(&'a G1Affine, &'b G2Prepared)],
        index: usize,
    }

    impl<'a, 'b, 'c> MillerLoopDriver for Adder<'a, 'b, 'c> {
        type Output = Fp12;

        fn doubling_step(&mut self, f: Self::Output) -> Self::Output {
            let index = self.index;
            let mut f = f;
            for term in self.terms {
                let either_identity = term.0.is_identity() | term.1.infinity;

                let new_f = ell(f, &term.1.coeffs[index], term.0);
                f = Fp12::conditional_select(&new_f, &f, either_identity);
            }
            self.index += 1;

            f
        }
        fn addition_step(&mut self, f: Self::Output) -> Self::Output {
            self.doubling_step(f)
        }
        fn square_output(f: Self::Output) -> Self::Output {
            f.square()
        }
        fn conjugate(f: Self::Output) -> Self::Output {
            f.conjugate()
        }
        fn one() -> Self::Output {
            Fp12::one()
        }
    }

    let mut acc = Fp12::one();
    for chunk in terms.chunks(MILLER_BATCH_LIMIT) {
        let mut adder = Adder {
            terms: chunk,
            index: 0,
        };
        acc *= miller_loop(&mut adder);
    }

    MillerLoopResult(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepared_line_count() {
        let prepared = G2Prepared::from(G2Affine::generator());
        assert_eq!(prepared.len(), 68);
    }

    #[test]
    fn test_cyclotomic_square_matches_square() {
        let g = Gt::generator();
        assert_eq!(cyclotomic_square(g.0), g.0.square());
    }
}
