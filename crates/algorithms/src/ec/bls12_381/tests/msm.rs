//! Scalar multiplication and MSM tests for BLS12-381

use super::super::{
    msm_scratch_size, G1Affine, G1Projective, G2Affine, G2Projective, Jacobian, Scalar,
    WindowTable, Xyzz,
};
use crate::error::Error;

use blscore_params::msm::{MSM_WINDOWED_THRESHOLD_G1, MSM_WINDOWED_THRESHOLD_G2};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Reference double-and-add over the canonical scalar bits
fn double_and_add<F: super::super::CurveField>(p: &Jacobian<F>, k: &Scalar) -> Jacobian<F> {
    let limbs = k.to_canonical();
    let mut acc = Jacobian::identity();
    for i in (0..256).rev() {
        acc = acc.double();
        if (limbs[i / 64] >> (i % 64)) & 1 == 1 {
            acc = acc.add(p);
        }
    }
    acc
}

fn naive_msm(points: &[G1Affine], scalars: &[Scalar]) -> G1Projective {
    points
        .iter()
        .zip(scalars)
        .fold(G1Projective::identity(), |acc, (p, k)| {
            acc + double_and_add(&p.to_jacobian(), k)
        })
}

fn random_inputs(rng: &mut ChaCha20Rng, n: usize) -> (Vec<G1Affine>, Vec<Scalar>) {
    let projective: Vec<G1Projective> = (0..n).map(|_| G1Projective::random(&mut *rng)).collect();
    let mut points = vec![G1Affine::identity(); n];
    G1Projective::batch_to_affine(&projective, &mut points);
    let scalars = (0..n).map(|_| Scalar::random(&mut *rng)).collect();
    (points, scalars)
}

#[test]
fn test_single_mul_matches_double_and_add() {
    let mut rng = ChaCha20Rng::seed_from_u64(51);
    let p = G1Projective::random(&mut rng);
    let q = G2Projective::random(&mut rng);
    for _ in 0..8 {
        let k = Scalar::random(&mut rng);
        assert_eq!(p * k, double_and_add(&p, &k));
        assert_eq!(q * k, double_and_add(&q, &k));
    }
    // Edge scalars
    for k in [Scalar::zero(), Scalar::one(), -Scalar::one(), Scalar::from(u64::MAX)] {
        assert_eq!(p * k, double_and_add(&p, &k));
    }
}

#[test]
fn test_every_table_window() {
    let mut rng = ChaCha20Rng::seed_from_u64(53);
    let bases: Vec<G1Projective> = (0..3).map(|_| G1Projective::random(&mut rng)).collect();
    let scalars: Vec<Scalar> = (0..3).map(|_| Scalar::random(&mut rng)).collect();
    let expected = bases
        .iter()
        .zip(&scalars)
        .fold(G1Projective::identity(), |acc, (p, k)| acc + double_and_add(p, k));

    for w in 2..=14 {
        let table = WindowTable::new(&bases, w).unwrap();
        assert_eq!(table.window(), w);
        assert_eq!(table.len(), 3);
        assert_eq!(table.row(0).map(|r| r.len()), Some(1 << (w - 1)));
        assert_eq!(table.multiply(&scalars).unwrap(), expected, "w = {}", w);
    }
}

#[test]
fn test_table_rows_are_multiples() {
    let g = G1Projective::generator();
    let table = WindowTable::new(&[g], 4).unwrap();
    let row = table.row(0).unwrap();
    for (i, entry) in row.iter().enumerate() {
        assert_eq!(*entry, G1Affine::from(g * Scalar::from(i as u64 + 1)));
    }
    assert!(table.row(1).is_none());
}

#[test]
fn test_table_rejects_bad_window() {
    let g = [G1Projective::generator()];
    assert!(matches!(
        WindowTable::new(&g, 1),
        Err(Error::Parameter { name: "window", .. })
    ));
    assert!(WindowTable::new(&g, 15).is_err());

    let table = WindowTable::new(&g, 3).unwrap();
    assert!(matches!(
        table.multiply(&[Scalar::one(), Scalar::one()]),
        Err(Error::Length { .. })
    ));
}

#[test]
fn test_msm_both_sides_of_crossover() {
    let mut rng = ChaCha20Rng::seed_from_u64(57);
    for n in [
        0,
        1,
        2,
        MSM_WINDOWED_THRESHOLD_G1 - 1,
        MSM_WINDOWED_THRESHOLD_G1,
        MSM_WINDOWED_THRESHOLD_G1 + 37,
        300,
    ] {
        let (points, scalars) = random_inputs(&mut rng, n);
        let expected = naive_msm(&points, &scalars);
        assert_eq!(G1Projective::msm(&points, &scalars).unwrap(), expected, "n = {}", n);
    }
}

#[test]
fn test_msm_g2() {
    let mut rng = ChaCha20Rng::seed_from_u64(59);
    for n in [MSM_WINDOWED_THRESHOLD_G2 - 1, MSM_WINDOWED_THRESHOLD_G2 + 5] {
        let points: Vec<G2Affine> = (0..n)
            .map(|_| G2Affine::from(G2Projective::random(&mut rng)))
            .collect();
        let scalars: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
        let expected = points
            .iter()
            .zip(&scalars)
            .fold(G2Projective::identity(), |acc, (p, k)| acc + p * k);
        assert_eq!(G2Projective::msm(&points, &scalars).unwrap(), expected);
    }
}

#[test]
fn test_msm_with_identities_and_zero_scalars() {
    let mut rng = ChaCha20Rng::seed_from_u64(61);
    let (mut points, mut scalars) = random_inputs(&mut rng, 100);
    points[3] = G1Affine::identity();
    points[50] = G1Affine::identity();
    scalars[7] = Scalar::zero();
    scalars[8] = -Scalar::one();
    points[9] = points[10];
    points[11] = -points[10];
    let expected = naive_msm(&points, &scalars);
    assert_eq!(G1Projective::msm(&points, &scalars).unwrap(), expected);
}

#[test]
fn test_msm_with_scratch() {
    let mut rng = ChaCha20Rng::seed_from_u64(67);
    let (points, scalars) = random_inputs(&mut rng, 200);
    let required = G1Projective::msm_scratch_size(points.len());
    assert!(required > 0);

    let mut scratch = vec![Xyzz::identity(); required];
    let with_scratch = G1Projective::msm_with_scratch(&points, &scalars, &mut scratch).unwrap();
    assert_eq!(with_scratch, G1Projective::msm(&points, &scalars).unwrap());

    // A reused buffer gives the same answer
    let again = G1Projective::msm_with_scratch(&points, &scalars, &mut scratch).unwrap();
    assert_eq!(again, with_scratch);

    let mut short = vec![Xyzz::identity(); required - 1];
    assert!(matches!(
        G1Projective::msm_with_scratch(&points, &scalars, &mut short),
        Err(Error::InsufficientScratch { required: r, provided: p }) if r == required && p == required - 1
    ));
}

#[test]
fn test_msm_scratch_size_small_inputs() {
    assert_eq!(msm_scratch_size(0, MSM_WINDOWED_THRESHOLD_G1), 0);
    assert_eq!(msm_scratch_size(1, MSM_WINDOWED_THRESHOLD_G1), 0);
    assert_eq!(
        msm_scratch_size(MSM_WINDOWED_THRESHOLD_G1 - 1, MSM_WINDOWED_THRESHOLD_G1),
        0
    );
    // Windowed path needs no buckets, so an empty buffer is fine
    let mut rng = ChaCha20Rng::seed_from_u64(71);
    let (points, scalars) = random_inputs(&mut rng, 5);
    assert!(G1Projective::msm_with_scratch(&points, &scalars, &mut []).is_ok());
}

#[test]
fn test_msm_length_mismatch() {
    let points = [G1Affine::generator(); 3];
    let scalars = [Scalar::one(); 2];
    assert!(matches!(
        G1Projective::msm(&points, &scalars),
        Err(Error::Length { .. })
    ));
}
