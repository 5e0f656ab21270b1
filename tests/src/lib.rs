//! Integration helpers for the blscore workspace tests
//!
//! A minimal-signature-size BLS scheme (signatures in G1, public
//! keys in G2) assembled from the arithmetic core, so that end-to-end
//! flows can be checked without a separate signature crate.

use blscore_algorithms::{
    hash_to_g1, miller_loop_n, G1Affine, G1Projective, G2Affine, G2Projective, Gt, Result, Scalar,
};
use blscore_api::error::{validate, ConstantTimeResult};
use blscore_params::curve::G2_COMPRESSED_SIZE;
use blscore_params::hash::G1_RO_DST;

/// Public key `sk * G2`
pub fn public_key(sk: &Scalar) -> G2Affine {
    G2Affine::from(G2Projective::generator() * sk)
}

/// Decode a compressed public key, rejecting points outside the subgroup
pub fn public_key_from_bytes(bytes: &[u8]) -> blscore_api::Result<G2Affine> {
    validate::length("public key", bytes.len(), G2_COMPRESSED_SIZE)?;
    let mut buf = [0u8; G2_COMPRESSED_SIZE];
    buf.copy_from_slice(bytes);
    G2Affine::from_compressed(&buf).ct_or_not_in_group("public key")
}

/// Signature `sk * H(msg)`
pub fn sign(sk: &Scalar, msg: &[u8]) -> Result<G1Affine> {
    Ok(G1Affine::from(hash_to_g1(msg, G1_RO_DST)? * sk))
}

/// Check `e(sig, G2) == e(H(msg), pk)` as a single two-pair product
pub fn verify(pk: &G2Affine, msg: &[u8], sig: &G1Affine) -> Result<bool> {
    if bool::from(sig.is_identity()) || !bool::from(sig.is_torsion_free()) {
        return Ok(false);
    }
    let h = G1Affine::from(hash_to_g1(msg, G1_RO_DST)?);
    let pairs = [(-*sig, G2Affine::generator()), (h, *pk)];
    Ok(miller_loop_n(&pairs).final_exponentiation() == Gt::identity())
}

/// Sum of signatures
pub fn aggregate(sigs: &[G1Affine]) -> G1Affine {
    G1Affine::from(G1Projective::sum_of(sigs))
}

/// Verify an aggregate over distinct messages, one pair per signer
pub fn verify_aggregate(pks: &[G2Affine], msgs: &[&[u8]], sig: &G1Affine) -> Result<bool> {
    if pks.len() != msgs.len() || pks.is_empty() {
        return Ok(false);
    }
    let mut pairs = Vec::with_capacity(pks.len() + 1);
    pairs.push((-*sig, G2Affine::generator()));
    for (pk, msg) in pks.iter().zip(msgs) {
        pairs.push((G1Affine::from(hash_to_g1(msg, G1_RO_DST)?), *pk));
    }
    Ok(miller_loop_n(&pairs).final_exponentiation() == Gt::identity())
}
