//! Fixed-width Montgomery arithmetic over little-endian `u64` limbs
//!
//! Shared by the base field (6 limbs) and the scalar field (4 limbs). Every
//! routine here runs in time independent of the limb values; corrections
//! against the modulus are applied with masks, never branches.
//!
//! Both moduli leave at least one spare bit in the top limb, which bounds
//! every intermediate below `2m` and lets a single masked subtraction
//! finish each operation.

use blscore_internal::mask_from_bit;

/// Compute a + b + carry, returning (result, carry)
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Compute a - (b + borrow), returning (result, borrow) with borrow all-ones
/// on underflow
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Compute a + (b * c) + carry, returning (result, carry)
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Per-modulus constants for one Montgomery domain
pub(crate) struct MontParams<const N: usize> {
    /// The modulus m
    pub modulus: [u64; N],
    /// -m^{-1} mod 2^64
    pub inv: u64,
    /// R^2 mod m
    pub r2: [u64; N],
    /// R^3 mod m
    pub r3: [u64; N],
    /// (m - 1) / 2
    pub half: [u64; N],
}

/// Subtract `m` from `(hi, t)` if the result is non-negative.
#[inline(always)]
pub(crate) fn final_sub<const N: usize>(t: &[u64; N], hi: u64, m: &[u64; N]) -> [u64; N] {
    let mut r = [0u64; N];
    let mut borrow = 0;
    for i in 0..N {
        (r[i], borrow) = sbb(t[i], m[i], borrow);
    }
    let (_, borrow) = sbb(hi, 0, borrow);
    // borrow is all-ones when t < m: keep t
    let mut out = [0u64; N];
    for i in 0..N {
        out[i] = (t[i] & borrow) | (r[i] & !borrow);
    }
    out
}

/// `a + b mod m`
#[inline]
pub(crate) fn add_mod<const N: usize>(a: &[u64; N], b: &[u64; N], m: &[u64; N]) -> [u64; N] {
    let mut t = [0u64; N];
    let mut carry = 0;
    for i in 0..N {
        (t[i], carry) = adc(a[i], b[i], carry);
    }
    final_sub(&t, carry, m)
}

/// `a - b mod m`
#[inline]
pub(crate) fn sub_mod<const N: usize>(a: &[u64; N], b: &[u64; N], m: &[u64; N]) -> [u64; N] {
    let mut t = [0u64; N];
    let mut borrow = 0;
    for i in 0..N {
        (t[i], borrow) = sbb(a[i], b[i], borrow);
    }
    // add m back under the borrow mask
    let mut carry = 0;
    for i in 0..N {
        (t[i], carry) = adc(t[i], m[i] & borrow, carry);
    }
    t
}

/// `-a mod m`, mapping zero to zero
#[inline]
pub(crate) fn neg_mod<const N: usize>(a: &[u64; N], m: &[u64; N]) -> [u64; N] {
    let mut t = [0u64; N];
    let mut borrow = 0;
    let mut acc = 0u64;
    for i in 0..N {
        (t[i], borrow) = sbb(m[i], a[i], borrow);
        acc |= a[i];
    }
    let mask = ((acc == 0) as u64).wrapping_sub(1);
    for limb in t.iter_mut() {
        *limb &= mask;
    }
    t
}

/// `2a mod m`
#[inline]
pub(crate) fn double_mod<const N: usize>(a: &[u64; N], m: &[u64; N]) -> [u64; N] {
    add_mod(a, a, m)
}

/// `a / 2 mod m` (m odd)
#[inline]
pub(crate) fn half_mod<const N: usize>(a: &[u64; N], m: &[u64; N]) -> [u64; N] {
    let odd = mask_from_bit(a[0]);
    let mut t = [0u64; N];
    let mut carry = 0;
    for i in 0..N {
        (t[i], carry) = adc(a[i], m[i] & odd, carry);
    }
    let mut out = [0u64; N];
    for i in 0..N {
        let next = if i + 1 < N { t[i + 1] } else { carry };
        out[i] = (t[i] >> 1) | (next << 63);
    }
    out
}

/// Montgomery multiplication `a * b * R^{-1} mod m`, coarsely integrated
/// operand scanning.
#[inline]
pub(crate) fn mul_mont<const N: usize>(
    a: &[u64; N],
    b: &[u64; N],
    m: &[u64; N],
    inv: u64,
) -> [u64; N] {
    let mut t = [0u64; N];
    let mut hi = 0u64;
    for i in 0..N {
        let mut carry = 0;
        for j in 0..N {
            (t[j], carry) = mac(t[j], a[i], b[j], carry);
        }
        let (top, top_carry) = adc(hi, carry, 0);

        let k = t[0].wrapping_mul(inv);
        let (_, mut carry) = mac(t[0], k, m[0], 0);
        for j in 1..N {
            (t[j - 1], carry) = mac(t[j], k, m[j], carry);
        }
        let (last, last_carry) = adc(top, carry, 0);
        t[N - 1] = last;
        hi = top_carry + last_carry;
    }
    final_sub(&t, hi, m)
}

/// Montgomery reduction of a double-width value held in `w[..2N]`.
#[inline]
pub(crate) fn redc<const N: usize>(w: &mut [u64; 12], m: &[u64; N], inv: u64) -> [u64; N] {
    let mut carry2 = 0;
    for i in 0..N {
        let k = w[i].wrapping_mul(inv);
        let mut carry = 0;
        for j in 0..N {
            (w[i + j], carry) = mac(w[i + j], k, m[j], carry);
        }
        (w[i + N], carry2) = adc(w[i + N], carry2, carry);
    }
    let mut t = [0u64; N];
    t.copy_from_slice(&w[N..2 * N]);
    final_sub(&t, carry2, m)
}

/// Montgomery squaring: cross products computed once and doubled, then the
/// diagonal added, then one reduction.
#[inline]
pub(crate) fn sqr_mont<const N: usize>(a: &[u64; N], m: &[u64; N], inv: u64) -> [u64; N] {
    let mut w = [0u64; 12];
    for i in 0..N {
        let mut carry = 0;
        for j in (i + 1)..N {
            (w[i + j], carry) = mac(w[i + j], a[i], a[j], carry);
        }
        w[i + N] = carry;
    }

    let mut top = 0u64;
    for limb in w.iter_mut().take(2 * N) {
        let next = *limb >> 63;
        *limb = (*limb << 1) | top;
        top = next;
    }

    let mut carry = 0;
    for i in 0..N {
        (w[2 * i], carry) = mac(w[2 * i], a[i], a[i], carry);
        (w[2 * i + 1], carry) = adc(w[2 * i + 1], 0, carry);
    }

    redc(&mut w, m, inv)
}

/// Leave the Montgomery domain: `a * R^{-1} mod m`
#[inline]
pub(crate) fn from_mont<const N: usize>(a: &[u64; N], m: &[u64; N], inv: u64) -> [u64; N] {
    let mut w = [0u64; 12];
    w[..N].copy_from_slice(a);
    redc(&mut w, m, inv)
}

/// Enter the Montgomery domain: `a * R mod m`
#[inline]
pub(crate) fn to_mont<const N: usize>(a: &[u64; N], params: &MontParams<N>) -> [u64; N] {
    mul_mont(a, &params.r2, &params.modulus, params.inv)
}

/// Returns all-ones when `a < b`, zero otherwise.
#[inline]
pub(crate) fn lt_mask<const N: usize>(a: &[u64; N], b: &[u64; N]) -> u64 {
    let mut borrow = 0;
    for i in 0..N {
        (_, borrow) = sbb(a[i], b[i], borrow);
    }
    borrow
}

/// Returns all-ones when every limb of `a` is zero.
#[inline]
pub(crate) fn is_zero_mask<const N: usize>(a: &[u64; N]) -> u64 {
    let acc = a.iter().fold(0u64, |acc, l| acc | l);
    // (acc | -acc) has its top bit set iff acc != 0
    ((acc | acc.wrapping_neg()) >> 63).wrapping_sub(1)
}

/// Sign and parity of a canonical (non-Montgomery) residue.
///
/// Returns masks `(negative, even)`: `negative` is all-ones when
/// `a > (m - 1) / 2`, `even` when the low bit is clear.
#[inline]
pub(crate) fn sign_parity<const N: usize>(a: &[u64; N], half: &[u64; N]) -> (u64, u64) {
    let negative = lt_mask(half, a);
    let even = (a[0] & 1).wrapping_sub(1);
    (negative, even)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // A small 2-limb Montgomery domain for cross-checking against u128
    // arithmetic: m = 2^127 - 1 is odd and leaves the top bit spare.
    const M: [u64; 2] = [u64::MAX, 0x7fff_ffff_ffff_ffff];

    fn m_u128() -> u128 {
        (1u128 << 127) - 1
    }

    fn limbs(x: u128) -> [u64; 2] {
        [x as u64, (x >> 64) as u64]
    }

    fn value(l: &[u64; 2]) -> u128 {
        (l[0] as u128) | ((l[1] as u128) << 64)
    }

    fn inv64(m0: u64) -> u64 {
        // Newton iteration for m0^{-1} mod 2^64
        let mut x = 1u64;
        for _ in 0..7 {
            x = x.wrapping_mul(2u64.wrapping_sub(m0.wrapping_mul(x)));
        }
        x.wrapping_neg()
    }

    #[test]
    fn test_inv_constant() {
        let inv = inv64(M[0]);
        assert_eq!(M[0].wrapping_mul(inv), u64::MAX);
    }

    proptest! {
        #[test]
        fn add_sub_match_u128(a in 0u128..(1u128 << 127) - 1, b in 0u128..(1u128 << 127) - 1) {
            let m = m_u128();
            let s = add_mod(&limbs(a), &limbs(b), &M);
            prop_assert_eq!(value(&s), (a + b) % m);
            let d = sub_mod(&limbs(a), &limbs(b), &M);
            prop_assert_eq!(value(&d), (a + m - b) % m);
            let n = neg_mod(&limbs(a), &M);
            prop_assert_eq!(value(&n), (m - a) % m);
            let h = half_mod(&limbs(a), &M);
            prop_assert_eq!(value(&double_mod(&h, &M)), a);
        }

        #[test]
        fn square_matches_mul(a in 0u128..(1u128 << 127) - 1) {
            let inv = inv64(M[0]);
            let x = limbs(a);
            prop_assert_eq!(sqr_mont(&x, &M, inv), mul_mont(&x, &x, &M, inv));
        }

        #[test]
        fn mont_roundtrip_through_one(a in 0u128..(1u128 << 127) - 1) {
            // mul_mont(a, R^2) then from_mont must return a; with R = 2^128
            // and m = 2^127 - 1, R mod m = 2 and R^2 mod m = 4.
            let inv = inv64(M[0]);
            let x = limbs(a);
            let xm = mul_mont(&x, &limbs(4), &M, inv);
            prop_assert_eq!(value(&xm), (a * 2) % m_u128());
            prop_assert_eq!(from_mont(&xm, &M, inv), x);
        }
    }
}
