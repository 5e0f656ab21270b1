//! EIP-2333 hierarchical key derivation
//!
//! A child key is the `KeyGen` of a compressed Lamport public key whose
//! secret halves are HKDF expansions of the parent key and its complement.

use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use blscore_params::kdf::{LAMPORT_CHUNK_SIZE, LAMPORT_HALF_LENGTH};

use super::keygen::keygen;
use crate::ec::bls12_381::Scalar;
use crate::error::{Error, Result};

/// Master secret key from a seed of at least 32 bytes
pub fn derive_master_eip2333(seed: &[u8]) -> Result<Scalar> {
    keygen(seed, &[])
}

/// Hash every 32-byte chunk of one Lamport half into `pk`
fn absorb_lamport_half(ikm: &[u8], salt: &[u8], pk: &mut Sha256) -> Result<()> {
    let mut okm = Zeroizing::new([0u8; LAMPORT_HALF_LENGTH]);
    Hkdf::<Sha256>::new(Some(salt), ikm)
        .expand(&[], &mut okm[..])
        .map_err(|_| Error::Other("HKDF-Expand output length"))?;
    for chunk in okm.chunks_exact(LAMPORT_CHUNK_SIZE) {
        pk.update(Sha256::digest(chunk));
    }
    Ok(())
}

/// Child secret key at `index` below `parent`
pub fn derive_child_eip2333(parent: &Scalar, index: u32) -> Result<Scalar> {
    let salt = index.to_be_bytes();
    let ikm = Zeroizing::new(parent.to_bytes_be());
    let mut not_ikm = Zeroizing::new([0u8; 32]);
    for (n, b) in not_ikm.iter_mut().zip(ikm.iter()) {
        *n = !b;
    }

    let mut lamport_pk = Sha256::new();
    absorb_lamport_half(&ikm[..], &salt, &mut lamport_pk)?;
    absorb_lamport_half(&not_ikm[..], &salt, &mut lamport_pk)?;
    let compressed: [u8; 32] = lamport_pk.finalize().into();

    keygen(&compressed, &[])
}

/// Key at a path such as `m/12381/3600/0/0` below the seed's master key
pub fn derive_path_eip2333(seed: &[u8], path: &str) -> Result<Scalar> {
    let mut components = path.split('/');
    if components.next() != Some("m") {
        return Err(Error::Encoding {
            context: "EIP-2333 path",
            details: "path must start with 'm'",
        });
    }

    let mut sk = derive_master_eip2333(seed)?;
    for component in components {
        let index = component.parse::<u32>().map_err(|_| Error::Encoding {
            context: "EIP-2333 path",
            details: "component is not a 32-bit index",
        })?;
        sk = derive_child_eip2333(&sk, index)?;
    }
    Ok(sk)
}
