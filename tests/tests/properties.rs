//! Algebraic properties checked with proptest over seeded inputs

use blscore_algorithms::{pairing, G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn scalar(seed: u64) -> Scalar {
    Scalar::random(ChaCha20Rng::seed_from_u64(seed))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_scalar_mul_distributes(a in any::<u64>(), b in any::<u64>()) {
        let (a, b) = (scalar(a), scalar(b));
        let g = G1Projective::generator();
        prop_assert_eq!(g * (a + b), g * a + g * b);
        let h = G2Projective::generator();
        prop_assert_eq!(h * (a * b), (h * a) * b);
    }

    #[test]
    fn prop_msm_matches_sum(seed in any::<u64>(), n in 0usize..80) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let points: Vec<G1Affine> = (0..n)
            .map(|_| G1Affine::from(G1Projective::random(&mut rng)))
            .collect();
        let scalars: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
        let expected = points
            .iter()
            .zip(&scalars)
            .fold(G1Projective::identity(), |acc, (p, k)| acc + p * k);
        prop_assert_eq!(G1Projective::msm(&points, &scalars).unwrap(), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    #[test]
    fn prop_pairing_bilinear(a in any::<u64>(), b in any::<u64>()) {
        let (a, b) = (scalar(a), scalar(b));
        let p = G1Affine::from(G1Projective::generator() * a);
        let q = G2Affine::from(G2Projective::generator() * b);
        prop_assert_eq!(
            pairing(&p, &q),
            pairing(&G1Affine::generator(), &G2Affine::generator()) * (a * b)
        );
    }
}
