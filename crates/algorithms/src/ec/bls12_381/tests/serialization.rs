//! Serialization and deserialization tests for BLS12-381

use super::super::field::fp::Fp;
use super::super::{G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use crate::error::Error;

// ============================================================================
// G1 Serialization Tests
// ============================================================================

#[test]
fn test_g1_compression_round_trip() {
    // Test with deterministic points
    let g = G1Projective::generator();
    for i in 1..=20 {
        let original = G1Affine::from(g * Scalar::from(i as u64));
        let compressed = original.to_compressed();
        let decompressed = G1Affine::from_compressed(&compressed).unwrap();
        assert_eq!(original, decompressed);
    }

    // Test with special points
    let special_points = vec![
        G1Affine::identity(),
        G1Affine::generator(),
        -G1Affine::generator(),
    ];

    for point in special_points {
        let compressed = point.to_compressed();
        let decompressed = G1Affine::from_compressed(&compressed).unwrap();
        assert_eq!(point, decompressed);
    }
}

#[test]
fn test_g1_uncompressed_round_trip() {
    let g = G1Projective::generator();
    for i in 1..=20 {
        let original = G1Affine::from(g * Scalar::from(i as u64));
        let uncompressed = original.to_uncompressed();
        let restored = G1Affine::from_uncompressed(&uncompressed).unwrap();
        assert_eq!(original, restored);
    }
}

#[test]
fn test_g1_invalid_compressed_rejection() {
    // Test 1: Non-canonical field element (all 0xff)
    let bytes = [0xff; 48];
    assert!(bool::from(G1Affine::from_compressed(&bytes).is_none()));

    // Test 2: Field element >= p
    let mut bytes = [0xff; 48];
    bytes[0] = 0x9a; // Set compression bit but make value >= p
    assert!(bool::from(G1Affine::from_compressed(&bytes).is_none()));

    // Test 3: Invalid flag combinations
    let mut bytes = G1Affine::generator().to_compressed();
    bytes[0] |= 0b11100000; // Set multiple incompatible flags
    assert!(bool::from(G1Affine::from_compressed(&bytes).is_none()));

    // Test 4: Compression flag not set
    let mut bytes = G1Affine::generator().to_compressed();
    bytes[0] &= 0b01111111; // Clear compression flag
    assert!(bool::from(G1Affine::from_compressed(&bytes).is_none()));

    // Test 5: Point not on curve (random x coordinate)
    let mut bytes = [0; 48];
    bytes[0] = 0x80; // Set compression flag
    bytes[47] = 0x01; // Random x coordinate
    // Either deserialization fails, or it succeeds but point is not on curve or has torsion
    let result = G1Affine::from_compressed(&bytes);
    assert!(bool::from(result.is_none()) || !bool::from(result.unwrap().is_on_curve()));
}

#[test]
fn test_g1_invalid_uncompressed_rejection() {
    // Test 1: Non-canonical field elements
    let bytes = [0xff; 96];
    assert!(bool::from(G1Affine::from_uncompressed(&bytes).is_none()));

    // Test 2: Compression flag set (should not be set for uncompressed)
    let mut bytes = G1Affine::generator().to_uncompressed();
    bytes[0] |= 0b10000000;
    assert!(bool::from(G1Affine::from_uncompressed(&bytes).is_none()));

    // Test 3: Point not on curve
    let mut bytes = [0; 96];
    bytes[47] = 0x01; // Random x
    bytes[95] = 0x02; // Random y
    let result = G1Affine::from_uncompressed(&bytes);
    assert!(bool::from(result.is_none()) ||
            !bool::from(result.unwrap().is_on_curve()));

    // Test 4: Invalid infinity representation
    let mut bytes = [0; 96];
    bytes[0] = 0b01000000; // Set infinity flag
    bytes[47] = 0x01; // But x is non-zero
    assert!(bool::from(G1Affine::from_uncompressed(&bytes).is_none()));
}

// ============================================================================
// G2 Serialization Tests
// ============================================================================

#[test]
fn test_g2_compression_round_trip() {
    let g = G2Projective::generator();
    for i in 1..=20 {
        let original = G2Affine::from(g * Scalar::from(i as u64));
        let compressed = original.to_compressed();
        let decompressed = G2Affine::from_compressed(&compressed).unwrap();
        assert_eq!(original, decompressed);
    }

    // Test with special points
    let special_points = vec![
        G2Affine::identity(),
        G2Affine::generator(),
        -G2Affine::generator(),
    ];

    for point in special_points {
        let compressed = point.to_compressed();
        let decompressed = G2Affine::from_compressed(&compressed).unwrap();
        assert_eq!(point, decompressed);
    }
}

#[test]
fn test_g2_uncompressed_round_trip() {
    let g = G2Projective::generator();
    for i in 1..=20 {
        let original = G2Affine::from(g * Scalar::from(i as u64));
        let uncompressed = original.to_uncompressed();
        let restored = G2Affine::from_uncompressed(&uncompressed).unwrap();
        assert_eq!(original, restored);
    }
}

#[test]
fn test_g2_invalid_compressed_rejection() {
    // Test 1: Non-canonical field element
    let bytes = [0xff; 96];
    assert!(bool::from(G2Affine::from_compressed(&bytes).is_none()));

    // Test 2: Invalid flag combinations
    let mut bytes = G2Affine::generator().to_compressed();
    bytes[0] = 0b11100000; // Multiple flags set
    assert!(bool::from(G2Affine::from_compressed(&bytes).is_none()));

    // Test 3: Point not on curve
    let mut bytes = [0; 96];
    bytes[0] = 0x80; // Compression flag
    bytes[95] = 0x01; // Random x coordinate
    let result = G2Affine::from_compressed(&bytes);
    assert!(bool::from(result.is_none()) ||
            !bool::from(result.unwrap().is_on_curve()));
}

#[test]
fn test_g2_invalid_uncompressed_rejection() {
    // Test 1: Non-canonical field elements
    let bytes = [0xff; 192];
    assert!(bool::from(G2Affine::from_uncompressed(&bytes).is_none()));

    // Test 2: Point not on curve
    let mut bytes = [0; 192];
    bytes[95] = 0x01;  // Random x
    bytes[191] = 0x02; // Random y
    let result = G2Affine::from_uncompressed(&bytes);
    assert!(bool::from(result.is_none()) ||
            !bool::from(result.unwrap().is_on_curve()));
}

// ============================================================================
// Known Encodings
// ============================================================================

#[test]
fn test_generator_encodings() {
    assert_eq!(
        G1Affine::generator().to_hex(),
        "97f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb"
    );
    assert_eq!(
        G2Affine::generator().to_hex(),
        "93e02b6052719f607dacd3a088274f65596bd0d09920b61ab5da61bbdc7f5049334cf11213945d57e5ac7d055d042b7e\
         024aa2b2f08f0a91260805272dc51051c6e47ad4fa403b02b4510b647ae3d1770bac0326a805bbefd48056c8c121bdb8"
    );
    assert_eq!(
        G1Affine::from_hex(&G1Affine::generator().to_hex()).unwrap(),
        G1Affine::generator()
    );
    assert_eq!(
        G2Affine::from_hex(&G2Affine::generator().to_hex()).unwrap(),
        G2Affine::generator()
    );
}

#[test]
fn test_identity_encodings() {
    let mut expected = [0u8; 48];
    expected[0] = 0xc0;
    assert_eq!(G1Affine::identity().to_compressed(), expected);

    let mut expected = [0u8; 96];
    expected[0] = 0x40;
    assert_eq!(G1Affine::identity().to_uncompressed(), expected);
}

#[test]
fn test_sequential_multiples_round_trip() {
    let mut e = G1Projective::identity();
    let mut f = G2Projective::identity();
    for _ in 0..64 {
        let a = G1Affine::from(e);
        assert_eq!(G1Affine::from_compressed(&a.to_compressed()).unwrap(), a);
        assert_eq!(G1Affine::from_uncompressed(&a.to_uncompressed()).unwrap(), a);

        let b = G2Affine::from(f);
        assert_eq!(G2Affine::from_compressed(&b.to_compressed()).unwrap(), b);
        assert_eq!(G2Affine::from_uncompressed(&b.to_uncompressed()).unwrap(), b);

        e = &e + &G1Projective::generator();
        f = &f + &G2Projective::generator();
    }
}

#[test]
fn test_try_from_compressed_errors() {
    assert!(matches!(
        G1Affine::try_from_compressed(&[0u8; 47]),
        Err(Error::Length { .. })
    ));

    // On the curve, outside the subgroup
    let p = super::super::map_to_curve_g1(&Fp::from_u64(5));
    let bytes = p.to_compressed();
    assert!(bool::from(G1Affine::from_compressed_unchecked(&bytes).is_some()));
    assert!(matches!(
        G1Affine::try_from_compressed(&bytes),
        Err(Error::NotInGroup { .. })
    ));
}

// ============================================================================
// Field Element Serialization Tests
// ============================================================================

#[test]
fn test_fp_from_bytes_rejection() {
    // Test value >= p should be rejected
    let bytes = [0xff; 48];
    assert!(bool::from(Fp::from_bytes(&bytes).is_none()));
    assert!(matches!(
        Fp::try_from_bytes(&bytes),
        Err(Error::OutOfRange { .. })
    ));

    // p - 1
    let p_minus_1: [u8; 48] = [
        0x1a, 0x01, 0x11, 0xea, 0x39, 0x7f, 0xe6, 0x9a, 0x4b, 0x1b, 0xa7, 0xb6, 0x43, 0x4b, 0xac,
        0xd7, 0x64, 0x77, 0x4b, 0x84, 0xf3, 0x85, 0x12, 0xbf, 0x67, 0x30, 0xd2, 0xa0, 0xf6, 0xb0,
        0xf6, 0x24, 0x1e, 0xab, 0xff, 0xfe, 0xb1, 0x53, 0xff, 0xff, 0xb9, 0xfe, 0xff, 0xff, 0xff,
        0xff, 0xaa, 0xaa,
    ];
    assert_eq!(Fp::from_bytes(&p_minus_1).unwrap(), -Fp::one());
}

#[test]
fn test_scalar_canonical_encoding() {
    let s = Scalar::from(0x0102_0304u64);
    let le = s.to_bytes();
    assert_eq!(le[..4], [0x04, 0x03, 0x02, 0x01]);
    assert_eq!(Scalar::from_bytes(&le).unwrap(), s);

    // r itself is not canonical
    let r_le = (-Scalar::one()).to_bytes();
    let mut r = r_le;
    r[0] += 1;
    assert!(bool::from(Scalar::from_bytes(&r).is_none()));
    assert!(Scalar::try_from_bytes(&r).is_err());
}
