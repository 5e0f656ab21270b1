//! End-to-end signing flows over the arithmetic core

use blscore_algorithms::{derive_path_eip2333, keygen, Scalar};
use blscore_api::Error;
use blscore_tests::{aggregate, public_key, public_key_from_bytes, sign, verify, verify_aggregate};

fn secret(seed: u8) -> Scalar {
    keygen(&[seed; 32], b"").unwrap()
}

#[test]
fn test_sign_then_verify() {
    let sk = secret(1);
    let pk = public_key(&sk);
    let msg = b"attestation for slot 42";
    let sig = sign(&sk, msg).unwrap();
    assert!(verify(&pk, msg, &sig).unwrap());
}

#[test]
fn test_flipped_message_byte_fails() {
    let sk = secret(2);
    let pk = public_key(&sk);
    let msg = b"attestation for slot 42".to_vec();
    let sig = sign(&sk, &msg).unwrap();

    for i in 0..msg.len() {
        let mut tampered = msg.clone();
        tampered[i] ^= 0x01;
        assert!(!verify(&pk, &tampered, &sig).unwrap(), "byte {}", i);
    }
}

#[test]
fn test_wrong_key_fails() {
    let sig = sign(&secret(3), b"msg").unwrap();
    assert!(!verify(&public_key(&secret(4)), b"msg", &sig).unwrap());
}

#[test]
fn test_identity_signature_rejected() {
    let pk = public_key(&secret(5));
    assert!(!verify(&pk, b"msg", &blscore_algorithms::G1Affine::identity()).unwrap());
}

#[test]
fn test_aggregate_distinct_messages() {
    let sks: Vec<Scalar> = (10..16).map(secret).collect();
    let pks: Vec<_> = sks.iter().map(public_key).collect();
    let msgs: Vec<Vec<u8>> = (0..sks.len()).map(|i| format!("message {}", i).into_bytes()).collect();
    let msg_refs: Vec<&[u8]> = msgs.iter().map(|m| m.as_slice()).collect();

    let sigs: Vec<_> = sks
        .iter()
        .zip(&msgs)
        .map(|(sk, m)| sign(sk, m).unwrap())
        .collect();
    let agg = aggregate(&sigs);
    assert!(verify_aggregate(&pks, &msg_refs, &agg).unwrap());

    // Swapping two messages breaks it
    let mut swapped = msg_refs.clone();
    swapped.swap(0, 1);
    assert!(!verify_aggregate(&pks, &swapped, &agg).unwrap());
}

#[test]
fn test_eip2333_validator_key_signs() {
    let seed = [0x42u8; 32];
    let sk = derive_path_eip2333(&seed, "m/12381/3600/0/0/0").unwrap();
    let pk = public_key(&sk);
    let sig = sign(&sk, b"deposit").unwrap();
    assert!(verify(&pk, b"deposit", &sig).unwrap());

    let other = derive_path_eip2333(&seed, "m/12381/3600/1/0/0").unwrap();
    assert_ne!(sk, other);
}

#[test]
fn test_encodings_survive_round_trip() {
    let sk = secret(6);
    let pk = public_key(&sk);
    let sig = sign(&sk, b"wire").unwrap();

    let pk2 = blscore_algorithms::G2Affine::from_hex(&pk.to_hex()).unwrap();
    let sig2 = blscore_algorithms::G1Affine::try_from_compressed(&sig.to_compressed()).unwrap();
    assert!(verify(&pk2, b"wire", &sig2).unwrap());
}

#[test]
fn test_public_key_decoding() {
    let pk = public_key(&secret(7));
    assert_eq!(public_key_from_bytes(&pk.to_compressed()).unwrap(), pk);

    assert!(matches!(
        public_key_from_bytes(&[0u8; 48]),
        Err(Error::InvalidLength { expected: 96, actual: 48, .. })
    ));
    assert!(matches!(
        public_key_from_bytes(&[0xffu8; 96]),
        Err(Error::NotInGroup { .. })
    ));
}
