//! HKDF `KeyGen` (draft-irtf-cfrg-bls-signature, revisions 3 through 5)

use hkdf::HkdfExtract;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use blscore_params::kdf::{KEYGEN_OKM_LENGTH, KEYGEN_SALT, MIN_IKM_LENGTH};

use crate::ec::bls12_381::Scalar;
use crate::error::{validate, Error, Result};

/// Revision of the key-generation procedure
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeygenVersion {
    /// Fixed salt used verbatim, single HKDF round
    V3,
    /// Fixed salt hashed once, rehashed until the key is nonzero
    #[default]
    V4,
    /// Caller salt hashed once, rehashed until the key is nonzero
    V4_5,
    /// Caller salt used verbatim, rehashed until the key is nonzero
    V5,
}

impl KeygenVersion {
    fn accepts_salt(self) -> bool {
        matches!(self, KeygenVersion::V4_5 | KeygenVersion::V5)
    }

    fn hashes_salt_first(self) -> bool {
        matches!(self, KeygenVersion::V4 | KeygenVersion::V4_5)
    }

    fn retries_zero(self) -> bool {
        !matches!(self, KeygenVersion::V3)
    }
}

/// Builder for a single key derivation
#[derive(Clone, Debug)]
pub struct KeyGen<'a> {
    version: KeygenVersion,
    ikm: Option<&'a [u8]>,
    salt: Option<&'a [u8]>,
    info: &'a [u8],
}

impl<'a> KeyGen<'a> {
    /// Start a derivation with the given revision
    pub fn new(version: KeygenVersion) -> Self {
        KeyGen {
            version,
            ikm: None,
            salt: None,
            info: &[],
        }
    }

    /// Input keying material, at least 32 bytes
    pub fn with_ikm(mut self, ikm: &'a [u8]) -> Self {
        self.ikm = Some(ikm);
        self
    }

    /// Salt; only V4_5 and V5 take one
    pub fn with_salt(mut self, salt: &'a [u8]) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Key information, empty by default
    pub fn with_info(mut self, info: &'a [u8]) -> Self {
        self.info = info;
        self
    }

    /// Run the derivation
    pub fn derive(self) -> Result<Scalar> {
        let ikm = self
            .ikm
            .ok_or_else(|| Error::param("ikm", "Input keying material is required"))?;
        validate::min_length("keygen IKM", ikm.len(), MIN_IKM_LENGTH)?;
        validate::parameter(
            self.salt.is_none() || self.version.accepts_salt(),
            "salt",
            "this keygen version uses a fixed salt",
        )?;

        let initial = self.salt.unwrap_or(KEYGEN_SALT);
        let mut hashed = Zeroizing::new([0u8; 32]);
        let mut use_hashed = self.version.hashes_salt_first();
        if use_hashed {
            hashed.copy_from_slice(&Sha256::digest(initial));
        }

        loop {
            let salt: &[u8] = if use_hashed { &hashed[..] } else { initial };
            let sk = hkdf_mod_r(ikm, salt, self.info)?;
            if !self.version.retries_zero() || !bool::from(sk.is_zero()) {
                return Ok(sk);
            }
            log::trace!("keygen produced a zero key, rehashing salt");
            let next: [u8; 32] = Sha256::digest(salt).into();
            hashed.copy_from_slice(&next);
            use_hashed = true;
        }
    }
}

/// One HKDF round: OS2IP(HKDF-Expand(HKDF-Extract(salt, IKM || 0), info || I2OSP(L, 2), L)) mod r
fn hkdf_mod_r(ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<Scalar> {
    let mut extract = HkdfExtract::<Sha256>::new(Some(salt));
    extract.input_ikm(ikm);
    extract.input_ikm(&[0u8]);
    let (_, hk) = extract.finalize();

    let mut okm = Zeroizing::new([0u8; KEYGEN_OKM_LENGTH]);
    let length = (KEYGEN_OKM_LENGTH as u16).to_be_bytes();
    hk.expand_multi_info(&[info, &length[..]], &mut okm[..])
        .map_err(|_| Error::Other("HKDF-Expand output length"))?;
    Ok(Scalar::from_okm(&okm))
}

/// `KeyGen` revision 4, the default
pub fn keygen(ikm: &[u8], info: &[u8]) -> Result<Scalar> {
    KeyGen::new(KeygenVersion::V4)
        .with_ikm(ikm)
        .with_info(info)
        .derive()
}

/// `KeyGen` revision 3
pub fn keygen_v3(ikm: &[u8], info: &[u8]) -> Result<Scalar> {
    KeyGen::new(KeygenVersion::V3)
        .with_ikm(ikm)
        .with_info(info)
        .derive()
}

/// `KeyGen` revision 4 with a caller-chosen salt, hashed before use
pub fn keygen_v4_5(ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<Scalar> {
    KeyGen::new(KeygenVersion::V4_5)
        .with_ikm(ikm)
        .with_salt(salt)
        .with_info(info)
        .derive()
}

/// `KeyGen` revision 5: caller salt used verbatim
pub fn keygen_v5(ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<Scalar> {
    KeyGen::new(KeygenVersion::V5)
        .with_ikm(ikm)
        .with_salt(salt)
        .with_info(info)
        .derive()
}
