// Benchmarks for BLS12-381 field, group, MSM and pairing operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use blscore_algorithms::ec::bls12_381::{
    hash_to_g1, miller_loop_n, pairing, Fp, G1Affine, G1Projective, G2Affine, G2Projective, Scalar,
    WindowTable, Xyzz,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(0xb15)
}

/// Benchmark base field operations
fn bench_field_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("bls12_381-fp");
    let mut rng = rng();

    group.bench_function("multiplication", |b| {
        b.iter_batched(
            || (Fp::random(&mut rng), Fp::random(&mut rng)),
            |(x, y)| black_box(x * y),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("squaring", |b| {
        b.iter_batched(
            || Fp::random(&mut rng),
            |x| black_box(x.square()),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("inversion", |b| {
        b.iter_batched(
            || Fp::random(&mut rng),
            |x| black_box(x.inverse()),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("sqrt", |b| {
        b.iter_batched(
            || Fp::random(&mut rng).square(),
            |x| black_box(x.sqrt()),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("scalar_inversion", |b| {
        b.iter_batched(
            || Scalar::random(&mut rng),
            |x| black_box(x.inverse()),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

/// Benchmark group operations
fn bench_point_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("bls12_381-point");
    let mut rng = rng();

    group.bench_function("g1_add", |b| {
        b.iter_batched(
            || (G1Projective::random(&mut rng), G1Projective::random(&mut rng)),
            |(p, q)| black_box(p + q),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("g1_double", |b| {
        b.iter_batched(
            || G1Projective::random(&mut rng),
            |p| black_box(p.double()),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("g1_scalar_mult", |b| {
        b.iter_batched(
            || (G1Projective::random(&mut rng), Scalar::random(&mut rng)),
            |(p, s)| black_box(p * s),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("g2_scalar_mult", |b| {
        b.iter_batched(
            || (G2Projective::random(&mut rng), Scalar::random(&mut rng)),
            |(p, s)| black_box(p * s),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("g1_decompress", |b| {
        b.iter_batched(
            || G1Affine::from(G1Projective::random(&mut rng)).to_compressed(),
            |bytes| black_box(G1Affine::from_compressed(&bytes)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("hash_to_g1", |b| {
        b.iter(|| black_box(hash_to_g1(b"benchmark message", b"BENCH-DST").ok()))
    });

    group.finish();
}

/// Benchmark batch normalization, accumulation and MSM
fn bench_msm(c: &mut Criterion) {
    let mut group = c.benchmark_group("bls12_381-msm");
    group.sample_size(10);
    let mut rng = rng();

    for &n in &[16usize, 64, 256, 1024, 4096] {
        let projective: Vec<G1Projective> =
            (0..n).map(|_| G1Projective::random(&mut rng)).collect();
        let mut points = vec![G1Affine::identity(); n];
        G1Projective::batch_to_affine(&projective, &mut points);
        let scalars: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();

        group.bench_with_input(BenchmarkId::new("g1_msm", n), &n, |b, _| {
            b.iter(|| black_box(G1Projective::msm(&points, &scalars)))
        });

        let mut scratch = vec![Xyzz::identity(); G1Projective::msm_scratch_size(n)];
        group.bench_with_input(BenchmarkId::new("g1_msm_scratch", n), &n, |b, _| {
            b.iter(|| black_box(G1Projective::msm_with_scratch(&points, &scalars, &mut scratch)))
        });

        group.bench_with_input(BenchmarkId::new("g1_sum_of", n), &n, |b, _| {
            b.iter(|| black_box(G1Projective::sum_of(&points)))
        });

        group.bench_with_input(BenchmarkId::new("g1_batch_to_affine", n), &n, |b, _| {
            let mut out = vec![G1Affine::identity(); n];
            b.iter(|| G1Projective::batch_to_affine(black_box(&projective), &mut out))
        });
    }

    let bases: Vec<G1Projective> = (0..8).map(|_| G1Projective::random(&mut rng)).collect();
    let scalars: Vec<Scalar> = (0..8).map(|_| Scalar::random(&mut rng)).collect();
    for w in [4usize, 8, 12] {
        let table = WindowTable::new(&bases, w).expect("window in range");
        group.bench_with_input(BenchmarkId::new("window_table_multiply", w), &w, |b, _| {
            b.iter(|| black_box(table.multiply(&scalars)))
        });
    }

    group.finish();
}

/// Benchmark pairing operations
fn bench_pairing(c: &mut Criterion) {
    let mut group = c.benchmark_group("bls12_381-pairing");
    group.sample_size(10);
    let mut rng = rng();

    let p = G1Affine::from(G1Projective::random(&mut rng));
    let q = G2Affine::from(G2Projective::random(&mut rng));

    group.bench_function("pairing", |b| b.iter(|| black_box(pairing(&p, &q))));

    group.bench_function("final_exponentiation", |b| {
        let f = miller_loop_n(&[(p, q)]);
        b.iter(|| black_box(f.final_exponentiation()))
    });

    for &n in &[2usize, 8, 16] {
        let pairs: Vec<(G1Affine, G2Affine)> = (0..n)
            .map(|_| {
                (
                    G1Affine::from(G1Projective::random(&mut rng)),
                    G2Affine::from(G2Projective::random(&mut rng)),
                )
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("miller_loop_n", n), &n, |b, _| {
            b.iter(|| black_box(miller_loop_n(&pairs)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_field_operations,
    bench_point_operations,
    bench_msm,
    bench_pairing
);
criterion_main!(benches);
