//! Scalar multiplication engine
//!
//! Single points and fixed-base tables use Booth-encoded signed windows
//! with constant-time table lookups. Multi-scalar multiplication picks
//! between the windowed table method (few points) and Pippenger's bucket
//! method (many points), with buckets kept in extended Jacobian (XYZZ)
//! coordinates so that no bucket ever needs an inversion.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use blscore_internal::mask_from_bit;
use blscore_params::curve::SCALAR_BITS;
use blscore_params::msm::{MAX_PIPPENGER_WINDOW, MSM_CHUNK_POINTS, SINGLE_MULT_WINDOW};
#[cfg(feature = "alloc")]
use blscore_params::msm::{MAX_TABLE_WINDOW, MIN_TABLE_WINDOW, SMALL_MSM_WINDOW};

use super::curve::{Affine, CurveField, Jacobian};
#[cfg(feature = "alloc")]
use super::curve::bulk_accumulate;
use super::Scalar;
#[cfg(feature = "alloc")]
use crate::error::{validate, Error, Result};

// ============================================================================
// Booth recoding
// ============================================================================

/// Number of signed windows needed to cover `nbits` bits
#[inline]
pub(crate) const fn booth_windows(nbits: usize, w: usize) -> usize {
    nbits / w + 1
}

#[inline]
fn bit(k: &[u64; 4], pos: usize) -> u64 {
    if pos >= 256 {
        0
    } else {
        (k[pos / 64] >> (pos % 64)) & 1
    }
}

/// Signed digit of window `j`: returns `(|d|, d < 0)` with
/// `d = ((v + 1) >> 1) - ((v >> w) << w)` where `v` is the `w + 1` bit
/// window starting at bit `w * j - 1`.
///
/// Bit positions depend only on `j` and `w`; the digit is computed without
/// branching on the scalar.
#[inline]
pub(crate) fn booth_digit(k: &[u64; 4], j: usize, w: usize) -> (u64, Choice) {
    let start = w * j;
    let mut v = 0u64;
    for i in 0..=w {
        // bit (start - 1 + i)
        if start + i >= 1 {
            v |= bit(k, start + i - 1) << i;
        }
    }

    let sign = v >> w;
    let t = (v + 1) >> 1;
    let mask = mask_from_bit(sign);
    // sign ? 2^w - t : t
    let abs = (t ^ mask)
        .wrapping_add(sign)
        .wrapping_add(mask & (1u64 << w));
    (abs, Choice::from(sign as u8))
}

/// Constant-time lookup of `digit * P` in a row of multiples `[P, 2P, ...]`
#[inline]
fn lookup<F: CurveField>(row: &[Affine<F>], abs: u64, negate: Choice) -> Affine<F> {
    let mut res = Affine::identity();
    for (i, entry) in row.iter().enumerate() {
        res.conditional_assign(entry, abs.ct_eq(&(i as u64 + 1)));
    }
    res.cneg(negate)
}

/// `[P, 2P, ..., len * P]` in Jacobian coordinates
fn multiples_into<F: CurveField>(p: &Jacobian<F>, out: &mut [Jacobian<F>]) {
    let mut acc = *p;
    for (i, slot) in out.iter_mut().enumerate() {
        if i == 1 {
            acc = p.double();
        } else if i > 1 {
            acc = acc.add(p);
        }
        *slot = acc;
    }
}

/// Constant-time variable-base multiplication with a width-5 Booth window
pub(crate) fn mul_booth<F: CurveField>(p: &Jacobian<F>, by: &Scalar) -> Jacobian<F> {
    const W: usize = SINGLE_MULT_WINDOW;
    const ROW: usize = 1 << (W - 1);

    let mut multiples = [Jacobian::<F>::identity(); ROW];
    multiples_into(p, &mut multiples);
    let mut row = [Affine::<F>::identity(); ROW];
    Jacobian::batch_to_affine(&multiples, &mut row);

    let k = by.to_canonical();
    let mut acc = Jacobian::identity();
    for j in (0..booth_windows(SCALAR_BITS, W)).rev() {
        acc = acc.double_n(W);
        let (abs, negate) = booth_digit(&k, j, W);
        acc = acc.add_mixed(&lookup(&row, abs, negate));
    }
    acc
}

// ============================================================================
// Precomputed window tables
// ============================================================================

/// Rows of multiples `[P, 2P, ..., 2^(w-1) P]` for a set of base points,
/// all normalized with a single inversion.
///
/// Evaluating the table against scalars looks entries up in constant time;
/// the per-window sums are formed with [`bulk_accumulate`] and therefore
/// leak the pattern of identity digits.
#[cfg(feature = "alloc")]
#[derive(Clone, Debug)]
pub struct WindowTable<F> {
    window: usize,
    points: usize,
    rows: Vec<Affine<F>>,
}

#[cfg(feature = "alloc")]
impl<F: CurveField> WindowTable<F> {
    /// Build tables for `bases` with window width `window` in `2..=14`
    pub fn new(bases: &[Jacobian<F>], window: usize) -> Result<Self> {
        validate::range("window", window, MIN_TABLE_WINDOW, MAX_TABLE_WINDOW)?;

        let row = 1usize << (window - 1);
        let mut jacobian = alloc::vec![Jacobian::identity(); bases.len() * row];
        for (base, out) in bases.iter().zip(jacobian.chunks_mut(row)) {
            multiples_into(base, out);
        }
        let mut rows = alloc::vec![Affine::identity(); jacobian.len()];
        Jacobian::batch_to_affine(&jacobian, &mut rows);

        Ok(WindowTable {
            window,
            points: bases.len(),
            rows,
        })
    }

    /// Window width
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of base points
    pub fn len(&self) -> usize {
        self.points
    }

    /// True when the table holds no base points
    pub fn is_empty(&self) -> bool {
        self.points == 0
    }

    /// Multiples of base point `i`
    pub fn row(&self, i: usize) -> Option<&[Affine<F>]> {
        let width = 1usize << (self.window - 1);
        self.rows.get(i * width..(i + 1) * width)
    }

    /// `sum(scalars[i] * bases[i])`
    pub fn multiply(&self, scalars: &[Scalar]) -> Result<Jacobian<F>> {
        validate::length("WindowTable::multiply", scalars.len(), self.points)?;

        let w = self.window;
        let width = 1usize << (w - 1);
        let digits: Vec<[u64; 4]> = scalars.iter().map(|s| s.to_canonical()).collect();

        let mut acc = Jacobian::identity();
        let mut selected = Vec::with_capacity(self.points);
        for j in (0..booth_windows(SCALAR_BITS, w)).rev() {
            acc = acc.double_n(w);

            selected.clear();
            for (k, row) in digits.iter().zip(self.rows.chunks(width)) {
                let (abs, negate) = booth_digit(k, j, w);
                selected.push(lookup(row, abs, negate));
            }
            acc = acc.add(&bulk_accumulate(&mut selected));
        }
        Ok(acc)
    }
}

// ============================================================================
// Pippenger buckets
// ============================================================================

/// Extended Jacobian bucket: `(X / ZZ, Y / ZZZ)` with `ZZ^3 = ZZZ^2`.
///
/// Bucket arithmetic branches on its inputs and must only see public data.
#[derive(Copy, Clone, Debug)]
pub struct Xyzz<F> {
    x: F,
    y: F,
    zz: F,
    zzz: F,
}

impl<F: CurveField> Default for Xyzz<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: CurveField> Xyzz<F> {
    /// Empty bucket
    pub fn identity() -> Self {
        Xyzz {
            x: F::one(),
            y: F::one(),
            zz: F::zero(),
            zzz: F::zero(),
        }
    }

    fn is_identity(&self) -> bool {
        bool::from(self.zz.is_zero())
    }

    /// mdbl-2008-s-1
    fn double_affine(p: &Affine<F>) -> Self {
        let u = p.y.double();
        let v = u.square();
        let w = u * v;
        let s = p.x * v;
        let xx = p.x.square();
        let m = xx.double() + xx;
        let x3 = m.square() - s.double();
        let y3 = m * (s - x3) - w * p.y;
        Xyzz {
            x: x3,
            y: y3,
            zz: v,
            zzz: w,
        }
    }

    /// dbl-2008-s-1
    fn double(&self) -> Self {
        let u = self.y.double();
        let v = u.square();
        let w = u * v;
        let s = self.x * v;
        let xx = self.x.square();
        let m = xx.double() + xx;
        let x3 = m.square() - s.double();
        let y3 = m * (s - x3) - w * self.y;
        Xyzz {
            x: x3,
            y: y3,
            zz: v * self.zz,
            zzz: w * self.zzz,
        }
    }

    /// madd-2008-s
    pub fn add_affine(&mut self, p: &Affine<F>) {
        if bool::from(p.is_identity()) {
            return;
        }
        if self.is_identity() {
            *self = Xyzz {
                x: p.x,
                y: p.y,
                zz: F::one(),
                zzz: F::one(),
            };
            return;
        }

        let u2 = p.x * self.zz;
        let s2 = p.y * self.zzz;
        let pp = u2 - self.x;
        let r = s2 - self.y;
        if bool::from(pp.is_zero()) {
            *self = if bool::from(r.is_zero()) {
                Self::double_affine(p)
            } else {
                Self::identity()
            };
            return;
        }

        let ppp2 = pp.square();
        let ppp3 = pp * ppp2;
        let q = self.x * ppp2;
        let x3 = r.square() - ppp3 - q.double();
        let y3 = r * (q - x3) - self.y * ppp3;
        self.x = x3;
        self.y = y3;
        self.zz = self.zz * ppp2;
        self.zzz = self.zzz * ppp3;
    }

    /// add-2008-s
    pub fn add(&mut self, other: &Self) {
        if other.is_identity() {
            return;
        }
        if self.is_identity() {
            *self = *other;
            return;
        }

        let u1 = self.x * other.zz;
        let u2 = other.x * self.zz;
        let s1 = self.y * other.zzz;
        let s2 = other.y * self.zzz;
        let pp = u2 - u1;
        let r = s2 - s1;
        if bool::from(pp.is_zero()) {
            *self = if bool::from(r.is_zero()) {
                self.double()
            } else {
                Self::identity()
            };
            return;
        }

        let pp2 = pp.square();
        let pp3 = pp * pp2;
        let q = u1 * pp2;
        let x3 = r.square() - pp3 - q.double();
        let y3 = r * (q - x3) - s1 * pp3;
        self.x = x3;
        self.y = y3;
        self.zz = self.zz * other.zz * pp2;
        self.zzz = self.zzz * other.zzz * pp3;
    }

    /// Convert to Jacobian: `(X * ZZ, Y * ZZZ, ZZ)`
    pub fn to_jacobian(&self) -> Jacobian<F> {
        if self.is_identity() {
            return Jacobian::identity();
        }
        Jacobian {
            x: self.x * self.zz,
            y: self.y * self.zzz,
            z: self.zz,
        }
    }
}

/// Pippenger window for `n` points: about `log2(n)`, trimmed for large
/// inputs where bucket reduction starts to dominate
pub fn pippenger_window(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let wbits = (usize::BITS - 1 - n.leading_zeros()) as usize;
    let w = if wbits > 12 {
        wbits - 3
    } else if wbits > 4 {
        wbits - 2
    } else {
        2
    };
    w.min(MAX_PIPPENGER_WINDOW)
}

/// Bucket slots the Pippenger pass needs for `n` points
pub fn pippenger_scratch_size(n: usize) -> usize {
    1usize << (pippenger_window(n) - 1)
}

/// One Pippenger pass over at most `MSM_CHUNK_POINTS` points
#[cfg(feature = "alloc")]
fn pippenger_pass<F: CurveField>(
    points: &[Affine<F>],
    digits: &[[u64; 4]],
    buckets: &mut [Xyzz<F>],
) -> Jacobian<F> {
    let w = pippenger_window(points.len());
    let nbuckets = 1usize << (w - 1);
    let buckets = &mut buckets[..nbuckets];

    let mut acc = Jacobian::identity();
    for j in (0..booth_windows(SCALAR_BITS, w)).rev() {
        acc = acc.double_n(w);

        for b in buckets.iter_mut() {
            *b = Xyzz::identity();
        }
        for (p, k) in points.iter().zip(digits.iter()) {
            let (abs, negate) = booth_digit(k, j, w);
            if abs == 0 {
                continue;
            }
            let p = if bool::from(negate) { -p } else { *p };
            buckets[(abs - 1) as usize].add_affine(&p);
        }

        // sum_i (i + 1) * bucket[i] as running sums from the top bucket down
        let mut running = Xyzz::identity();
        let mut window_sum = Xyzz::identity();
        for b in buckets.iter().rev() {
            running.add(b);
            window_sum.add(&running);
        }
        acc = acc.add(&window_sum.to_jacobian());
    }
    acc
}

// ============================================================================
// Multi-scalar multiplication
// ============================================================================

/// Scratch slots `msm_with_scratch` needs for `n` points with the given
/// windowed-method crossover. Zero when the windowed or single-point path
/// will be taken.
pub fn msm_scratch_size(n: usize, windowed_threshold: usize) -> usize {
    if n <= 1 || n < windowed_threshold {
        0
    } else {
        pippenger_scratch_size(n.min(MSM_CHUNK_POINTS))
    }
}

/// `sum(scalars[i] * points[i])`, allocating bucket scratch internally
#[cfg(feature = "alloc")]
pub fn msm<F: CurveField>(
    points: &[Affine<F>],
    scalars: &[Scalar],
    windowed_threshold: usize,
) -> Result<Jacobian<F>> {
    let mut scratch =
        alloc::vec![Xyzz::identity(); msm_scratch_size(points.len(), windowed_threshold)];
    msm_with_scratch(points, scalars, windowed_threshold, &mut scratch)
}

/// `sum(scalars[i] * points[i])` using caller-owned bucket scratch of at
/// least [`msm_scratch_size`] slots.
///
/// The Pippenger path is variable time in the scalars; inputs longer than
/// `MSM_CHUNK_POINTS` are processed in sequential chunks.
#[cfg(feature = "alloc")]
pub fn msm_with_scratch<F: CurveField>(
    points: &[Affine<F>],
    scalars: &[Scalar],
    windowed_threshold: usize,
    scratch: &mut [Xyzz<F>],
) -> Result<Jacobian<F>> {
    msm_chunked(points, scalars, windowed_threshold, scratch, MSM_CHUNK_POINTS)
}

/// MSM with Pippenger passes of at most `chunk` points each, summed in order
#[cfg(feature = "alloc")]
pub(crate) fn msm_chunked<F: CurveField>(
    points: &[Affine<F>],
    scalars: &[Scalar],
    windowed_threshold: usize,
    scratch: &mut [Xyzz<F>],
    chunk: usize,
) -> Result<Jacobian<F>> {
    validate::length("msm scalars", scalars.len(), points.len())?;
    validate::parameter(chunk > 0, "chunk", "must be non-zero")?;

    let n = points.len();
    let required = if n <= 1 || n < windowed_threshold {
        0
    } else {
        pippenger_scratch_size(n.min(chunk))
    };
    if scratch.len() < required {
        return Err(Error::InsufficientScratch {
            required,
            provided: scratch.len(),
        });
    }

    match n {
        0 => return Ok(Jacobian::identity()),
        1 => return Ok(points[0].to_jacobian().mul_scalar(&scalars[0])),
        _ => {}
    }

    if n < windowed_threshold {
        log::debug!("msm: {} points, windowed w={}", n, SMALL_MSM_WINDOW);
        let bases: Vec<Jacobian<F>> = points.iter().map(|p| p.to_jacobian()).collect();
        return WindowTable::new(&bases, SMALL_MSM_WINDOW)?.multiply(scalars);
    }

    log::debug!(
        "msm: {} points, pippenger w={}, {} chunk(s)",
        n,
        pippenger_window(n.min(chunk)),
        n.div_ceil(chunk)
    );

    let mut total = Jacobian::identity();
    for (pts, ks) in points.chunks(chunk).zip(scalars.chunks(chunk)) {
        let digits: Vec<[u64; 4]> = ks.iter().map(|s| s.to_canonical()).collect();
        total = total.add(&pippenger_pass(pts, &digits, scratch));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recompose(k: &[u64; 4], w: usize) -> i128 {
        // Only meaningful for scalars below 2^100
        let mut acc: i128 = 0;
        for j in (0..booth_windows(SCALAR_BITS, w)).rev() {
            let (abs, neg) = booth_digit(k, j, w);
            if w * j < 120 {
                let d = if bool::from(neg) { -(abs as i128) } else { abs as i128 };
                acc += d << (w * j);
            }
        }
        acc
    }

    #[test]
    fn test_booth_digits_recompose() {
        for w in 2..=14 {
            for &v in &[0u64, 1, 2, 15, 16, 17, 0x5555, 0xffff_ffff, u64::MAX] {
                let k = [v, 0, 0, 0];
                assert_eq!(recompose(&k, w), v as i128, "w={} v={:#x}", w, v);
            }
        }
    }

    #[test]
    fn test_booth_digit_bounds() {
        let k = [u64::MAX, u64::MAX, u64::MAX, 0x7fff_ffff_ffff_ffff];
        for w in 2..=14 {
            for j in 0..booth_windows(SCALAR_BITS, w) {
                let (abs, _) = booth_digit(&k, j, w);
                assert!(abs <= 1 << (w - 1));
            }
        }
    }

    #[test]
    fn test_pippenger_window() {
        assert_eq!(pippenger_window(1), 1);
        assert_eq!(pippenger_window(2), 2);
        assert_eq!(pippenger_window(31), 2);
        assert_eq!(pippenger_window(32), 3);
        assert_eq!(pippenger_window(1 << 12), 10);
        assert_eq!(pippenger_window(1 << 13), 10);
        assert_eq!(pippenger_window(1 << 16), 13);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_chunked_msm_matches_naive() {
        use super::super::g1::{G1Affine, G1Projective};
        use rand::SeedableRng;
        use rand_chacha::ChaCha20Rng;

        let mut rng = ChaCha20Rng::seed_from_u64(0xc4);
        for n in [64usize, 65, 70, 97] {
            let points: Vec<G1Affine> = (0..n)
                .map(|_| G1Affine::from(G1Projective::random(&mut rng)))
                .collect();
            let scalars: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();

            let mut expected = G1Projective::identity();
            for (p, k) in points.iter().zip(scalars.iter()) {
                expected += G1Projective::from(p) * k;
            }

            // Chunks of 32 leave a short tail pass (1, 6 or 1 points)
            let mut scratch = alloc::vec![Xyzz::identity(); pippenger_scratch_size(32)];
            let got = msm_chunked(&points, &scalars, 64, &mut scratch, 32).unwrap();
            assert_eq!(got, expected, "n = {}", n);

            let unchunked = msm(&points, &scalars, 64).unwrap();
            assert_eq!(unchunked, expected, "n = {}", n);
        }
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_chunked_msm_scratch_sized_by_chunk() {
        use super::super::g1::{G1Affine, G1Projective};

        let points = alloc::vec![G1Affine::generator(); 100];
        let scalars = alloc::vec![Scalar::one(); 100];
        let mut short = alloc::vec![Xyzz::identity(); pippenger_scratch_size(32) - 1];
        assert!(matches!(
            msm_chunked(&points, &scalars, 64, &mut short, 32),
            Err(Error::InsufficientScratch { .. })
        ));
        let mut zero_chunk = alloc::vec![Xyzz::identity(); 64];
        assert!(matches!(
            msm_chunked(&points, &scalars, 64, &mut zero_chunk, 0),
            Err(Error::Parameter { name: "chunk", .. })
        ));
        assert_eq!(
            G1Projective::msm(&points, &scalars).unwrap(),
            G1Projective::generator() * Scalar::from(100u64)
        );
    }

    #[test]
    fn test_scratch_size() {
        assert_eq!(msm_scratch_size(0, 64), 0);
        assert_eq!(msm_scratch_size(1, 0), 0);
        assert_eq!(msm_scratch_size(63, 64), 0);
        assert_eq!(msm_scratch_size(64, 64), 1 << 3);
        assert_eq!(msm_scratch_size(1 << 20, 64), 1 << 12);
    }
}
