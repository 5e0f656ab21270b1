//! BLS secret-key derivation
//!
//! HKDF-based `KeyGen` in its successive revisions, and the EIP-2333
//! hierarchical derivation built on it.
//!
//! ## Example usage
//!
//! ```
//! use blscore_algorithms::kdf::{KeyGen, KeygenVersion};
//!
//! let ikm = [7u8; 32];
//!
//! // Operation pattern API
//! let sk1 = KeyGen::new(KeygenVersion::V5)
//!     .with_ikm(&ikm)
//!     .with_salt(b"application salt")
//!     .with_info(b"context info")
//!     .derive()
//!     .unwrap();
//!
//! // Free-function API
//! let sk2 = blscore_algorithms::kdf::keygen_v5(&ikm, b"application salt", b"context info").unwrap();
//!
//! assert_eq!(sk1, sk2);
//! ```

mod eip2333;
mod keygen;


pub use eip2333::{derive_child_eip2333, derive_master_eip2333, derive_path_eip2333};
pub use keygen::{keygen, keygen_v3, keygen_v4_5, keygen_v5, KeyGen, KeygenVersion};
