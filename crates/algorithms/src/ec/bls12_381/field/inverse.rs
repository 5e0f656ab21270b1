//! Constant-time modular inversion by batched divsteps (Bernstein-Yang)
//!
//! The state `(delta, f, g)` starts at `(1, m, x)`. Each batch runs 62
//! divsteps on the low 64 bits of `f` and `g`, recording their effect in a
//! [`Transition`] matrix, and then applies that matrix to the full-width
//! `f, g` and to the cofactors `d, e` (kept modulo `m`). The invariants
//! `f = d*x` and `g = e*x (mod m)` hold after every batch; once `g`
//! reaches zero, `f = ±1` and `±d` is the inverse.
//!
//! The batch count is fixed per modulus from its bit length, so the
//! instruction trace never depends on `x`. With `x = 0` the loop leaves
//! `d = 0` and the result is 0.

use blscore_internal::mask_from_bit;

use super::mont::MontParams;

/// Signed limbs wide enough for `u*f + v*g` with |u|,|v| <= 2^62 and
/// f, g < 2^381 (two's complement, least significant first).
const WIDE: usize = 7;

const LOW62: u64 = (1 << 62) - 1;

/// 2x2 transition matrix accumulated over one batch of divsteps
#[derive(Clone, Copy, Debug)]
struct Transition {
    u: i64,
    v: i64,
    q: i64,
    r: i64,
}

/// Run 62 divsteps on the low words of `f` and `g`.
///
/// Every conditional is applied through masks.
fn divsteps_62(mut delta: i64, f0: u64, g0: u64) -> (i64, Transition) {
    let (mut f, mut g) = (f0, g0);
    let (mut u, mut v, mut q, mut r) = (1u64, 0u64, 0u64, 1u64);

    for _ in 0..62 {
        // swap when delta > 0 and g is odd
        let swap = ((delta.wrapping_neg() >> 63) as u64) & (g & 1).wrapping_neg();
        let swap_i = swap as i64;

        delta = (delta ^ swap_i).wrapping_sub(swap_i);

        let t = (f ^ g) & swap;
        f ^= t;
        g ^= t;
        g = (g ^ swap).wrapping_sub(swap);

        let t = (u ^ q) & swap;
        u ^= t;
        q ^= t;
        q = (q ^ swap).wrapping_sub(swap);

        let t = (v ^ r) & swap;
        v ^= t;
        r ^= t;
        r = (r ^ swap).wrapping_sub(swap);

        // g odd: g += f
        let odd = mask_from_bit(g);
        g = g.wrapping_add(f & odd);
        q = q.wrapping_add(u & odd);
        r = r.wrapping_add(v & odd);

        g >>= 1;
        u = u.wrapping_shl(1);
        v = v.wrapping_shl(1);
        delta = delta.wrapping_add(1);
    }

    (
        delta,
        Transition {
            u: u as i64,
            v: v as i64,
            q: q as i64,
            r: r as i64,
        },
    )
}

/// Interpret limb `i` of a two's-complement value as a signed digit
#[inline(always)]
fn digit(x: &[u64; WIDE], i: usize) -> i128 {
    if i == WIDE - 1 {
        x[i] as i64 as i128
    } else {
        x[i] as i128
    }
}

/// `(a*x + b*y) >> 62`, exact division, arithmetic shift
fn combine_shift(a: i64, x: &[u64; WIDE], b: i64, y: &[u64; WIDE]) -> [u64; WIDE] {
    let mut out = [0u64; WIDE];
    let mut carry: i128 = 0;
    for i in 0..WIDE {
        let t = (a as i128) * digit(x, i) + (b as i128) * digit(y, i) + carry;
        out[i] = t as u64;
        carry = t >> 64;
    }
    shift_right_62(&out)
}

fn shift_right_62(x: &[u64; WIDE]) -> [u64; WIDE] {
    let mut out = [0u64; WIDE];
    for i in 0..WIDE - 1 {
        out[i] = (x[i] >> 62) | (x[i + 1] << 2);
    }
    out[WIDE - 1] = ((x[WIDE - 1] as i64) >> 62) as u64;
    out
}

/// `(a*d + b*e) / 2^62 mod m`, for d, e in [0, m). The low 62 bits are
/// cleared by adding a multiple of `m` chosen with the Montgomery constant.
fn combine_mod(
    a: i64,
    d: &[u64; WIDE],
    b: i64,
    e: &[u64; WIDE],
    m: &[u64; WIDE],
    inv: u64,
) -> [u64; WIDE] {
    let mut acc = [0u64; WIDE];
    let mut carry: i128 = 0;
    for i in 0..WIDE {
        let t = (a as i128) * digit(d, i) + (b as i128) * digit(e, i) + carry;
        acc[i] = t as u64;
        carry = t >> 64;
    }

    let md = acc[0].wrapping_mul(inv) & LOW62;
    let mut c: u128 = 0;
    for i in 0..WIDE {
        let t = (acc[i] as u128) + (md as u128) * (m[i] as u128) + c;
        acc[i] = t as u64;
        c = t >> 64;
    }

    // now in (-m, 2m): add m if negative, then subtract m if >= m
    let mut x = shift_right_62(&acc);
    let neg = ((x[WIDE - 1] as i64) >> 63) as u64;
    let mut c: u128 = 0;
    for i in 0..WIDE {
        let t = (x[i] as u128) + ((m[i] & neg) as u128) + c;
        x[i] = t as u64;
        c = t >> 64;
    }

    let mut y = [0u64; WIDE];
    let mut borrow: i128 = 0;
    for i in 0..WIDE {
        let t = (x[i] as i128) - (m[i] as i128) + borrow;
        y[i] = t as u64;
        borrow = t >> 64;
    }
    // borrow < 0 means x < m: keep x
    let keep = borrow as i64 as u64;
    let mut out = [0u64; WIDE];
    for i in 0..WIDE {
        out[i] = (x[i] & keep) | (y[i] & !keep);
    }
    out
}

fn widen<const N: usize>(a: &[u64; N]) -> [u64; WIDE] {
    let mut out = [0u64; WIDE];
    out[..N].copy_from_slice(a);
    out
}

/// Inverse of the integer `x < m` modulo `m`, returning 0 for `x = 0`.
///
/// `batches * 62` must cover the divstep bound for the modulus width.
pub(crate) fn divstep_inverse<const N: usize>(
    x: &[u64; N],
    params: &MontParams<N>,
    batches: usize,
) -> [u64; N] {
    let m = widen(&params.modulus);
    let mut f = m;
    let mut g = widen(x);
    let mut d = [0u64; WIDE];
    let mut e = [0u64; WIDE];
    e[0] = 1;
    let mut delta = 1i64;

    for _ in 0..batches {
        let (next_delta, t) = divsteps_62(delta, f[0], g[0]);
        delta = next_delta;

        let nf = combine_shift(t.u, &f, t.v, &g);
        let ng = combine_shift(t.q, &f, t.r, &g);
        f = nf;
        g = ng;

        let nd = combine_mod(t.u, &d, t.v, &e, &m, params.inv);
        let ne = combine_mod(t.q, &d, t.r, &e, &m, params.inv);
        d = nd;
        e = ne;
    }

    // f = ±1 (or m when x = 0); negate d when f is negative
    let f_neg = ((f[WIDE - 1] as i64) >> 63) as u64;
    let mut out = [0u64; N];
    out.copy_from_slice(&d[..N]);
    let negated = super::mont::neg_mod(&out, &params.modulus);
    for i in 0..N {
        out[i] = (out[i] & !f_neg) | (negated[i] & f_neg);
    }
    out
}
