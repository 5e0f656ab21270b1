//! Constant-time selection and masks
//!
//! Point arithmetic resolves its special cases (doubling, identity inputs,
//! conditional negation) with [`select`] rather than branches. Limb code
//! builds its correction masks with [`mask_from_bit`].

use subtle::{Choice, ConditionallySelectable};

/// Constant-time selection: returns `a` when `cond` is set, `b` otherwise.
#[inline(always)]
pub fn select<T>(cond: Choice, a: &T, b: &T) -> T
where
    T: ConditionallySelectable,
{
    T::conditional_select(b, a, cond)
}

/// All-ones when the low bit of `bit` is set, all-zeros otherwise
#[inline(always)]
pub fn mask_from_bit(bit: u64) -> u64 {
    (bit & 1).wrapping_neg()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_select_picks_first_on_true() {
        assert_eq!(select(Choice::from(1), &5u64, &9u64), 5);
        assert_eq!(select(Choice::from(0), &5u64, &9u64), 9);
    }

    proptest! {
        #[test]
        fn mask_matches_parity(x in any::<u64>()) {
            let m = mask_from_bit(x);
            prop_assert_eq!(m == u64::MAX, x & 1 == 1);
            prop_assert_eq!(m == 0, x & 1 == 0);
        }
    }
}
