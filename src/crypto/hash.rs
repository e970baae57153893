//! Challenge-response authentication.
//!
//! GNTP never sends the password. Each request carries a fresh salt and
//! a key-hash:
//!
//! ```text
//! key     = HASH(password || salt)
//! keyHash = HASH(key)
//! header  = ALGO ":" HEX(keyHash) "." HEX(salt)
//! ```
//!
//! The daemon recomputes `key` from its copy of the password and the salt,
//! and the same `key` seeds the cipher layer.

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use rand::{rngs::OsRng, RngCore};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::core::{ConfigError, CryptoError, SALT_SIZE};

/// Hash algorithm used for the key and key-hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// MD5 (16-byte digest).
    #[default]
    Md5,
    /// SHA-1 (20-byte digest).
    Sha1,
    /// SHA-256 (32-byte digest).
    Sha256,
}

impl HashAlgorithm {
    /// Protocol identifier.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha256 => "SHA256",
        }
    }

    /// Digest length in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
        }
    }

    /// Hash the concatenation of `parts`.
    pub fn digest(&self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashAlgorithm::Md5 => digest_parts::<Md5>(parts),
            HashAlgorithm::Sha1 => digest_parts::<Sha1>(parts),
            HashAlgorithm::Sha256 => digest_parts::<Sha256>(parts),
        }
    }
}

fn digest_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [HashAlgorithm::Md5, HashAlgorithm::Sha1, HashAlgorithm::Sha256]
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownHashAlgorithm(s.to_string()))
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-request authentication material.
///
/// Never reuse a challenge across requests. The derived key is zeroized
/// on drop.
pub struct AuthChallenge {
    algorithm: HashAlgorithm,
    salt: Vec<u8>,
    key: Vec<u8>,
    key_hash: Vec<u8>,
}

impl AuthChallenge {
    /// Derive a challenge from `password` with a fresh random salt.
    pub fn generate(algorithm: HashAlgorithm, password: &str) -> Self {
        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);
        Self::with_salt(algorithm, password, &salt)
    }

    /// Derive a challenge from `password` and a known salt.
    pub fn with_salt(algorithm: HashAlgorithm, password: &str, salt: &[u8]) -> Self {
        let key = algorithm.digest(&[password.as_bytes(), salt]);
        let key_hash = algorithm.digest(&[key.as_slice()]);
        Self {
            algorithm,
            salt: salt.to_vec(),
            key,
            key_hash,
        }
    }

    /// Parse a `ALGO:KEYHASH.SALT` header and check it against `password`.
    ///
    /// This is the receiving side of the exchange. On success the returned
    /// challenge carries the same key the sender derived.
    pub fn verify(header: &str, password: &str) -> Result<Self, CryptoError> {
        let malformed = || CryptoError::MalformedHeader(header.to_string());

        let (name, rest) = header.split_once(':').ok_or_else(malformed)?;
        let (key_hash_hex, salt_hex) = rest.split_once('.').ok_or_else(malformed)?;
        let algorithm: HashAlgorithm = name.parse().map_err(|_| malformed())?;
        let key_hash = hex::decode(key_hash_hex).map_err(|_| malformed())?;
        let salt = hex::decode(salt_hex).map_err(|_| malformed())?;
        if salt.is_empty() {
            return Err(malformed());
        }

        let challenge = Self::with_salt(algorithm, password, &salt);
        if !constant_time_eq::constant_time_eq(&challenge.key_hash, &key_hash) {
            return Err(CryptoError::KeyHashMismatch);
        }
        Ok(challenge)
    }

    /// Hash algorithm in use.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The random salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The derived key, `HASH(password || salt)`.
    ///
    /// # Security
    /// Handle with care - this is the encryption key material.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// `HASH(key)`, the value sent on the wire.
    pub fn key_hash(&self) -> &[u8] {
        &self.key_hash
    }

    /// Render the `ALGO:KEYHASH.SALT` header.
    pub fn header(&self) -> String {
        format!(
            "{}:{}.{}",
            self.algorithm.name(),
            hex::encode_upper(&self.key_hash),
            hex::encode_upper(&self.salt)
        )
    }
}

impl fmt::Debug for AuthChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthChallenge")
            .field("algorithm", &self.algorithm)
            .field("salt", &hex::encode_upper(&self.salt))
            .finish_non_exhaustive()
    }
}

impl Drop for AuthChallenge {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
