//! Message body encryption.
//!
//! GNTP 1.0 encrypts the whole header block of a request. The only cipher
//! offered here is AES in CBC mode with PKCS#7 padding:
//!
//! - Key: the first 24 bytes of the challenge key (AES-192), so the hash
//!   must be SHA256; MD5 and SHA1 digests are too short
//! - IV: 16 fresh random bytes per request, sent as `AES:IV_HEX`
//!
//! Padding always appends 1..=16 bytes, so decryption is unambiguous.

use std::fmt;
use std::str::FromStr;

use aes::Aes192;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use super::hash::AuthChallenge;
use crate::core::{ConfigError, CryptoError, AES_192_KEY_SIZE, AES_BLOCK_SIZE, NONE_TOKEN};

type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;

/// Encryption algorithm applied to authenticated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncryptAlgorithm {
    /// Plaintext body.
    #[default]
    None,
    /// AES-192-CBC with PKCS#7 padding.
    Aes,
}

impl EncryptAlgorithm {
    /// Protocol identifier.
    pub fn name(&self) -> &'static str {
        match self {
            EncryptAlgorithm::None => NONE_TOKEN,
            EncryptAlgorithm::Aes => "AES",
        }
    }

    /// Minimum challenge key length this algorithm needs.
    pub fn key_size(&self) -> usize {
        match self {
            EncryptAlgorithm::None => 0,
            EncryptAlgorithm::Aes => AES_192_KEY_SIZE,
        }
    }

    /// Apply this algorithm to `plaintext` using the challenge key.
    ///
    /// Returns the encryption header and the body to put on the wire.
    pub fn seal(
        &self,
        challenge: &AuthChallenge,
        plaintext: &[u8],
    ) -> Result<SealedBody, CryptoError> {
        match self {
            EncryptAlgorithm::None => Ok(SealedBody {
                header: NONE_TOKEN.to_string(),
                body: plaintext.to_vec(),
            }),
            EncryptAlgorithm::Aes => {
                let context = EncryptionContext::generate(challenge)?;
                Ok(SealedBody {
                    header: context.header(),
                    body: context.encrypt(plaintext)?,
                })
            }
        }
    }
}

impl FromStr for EncryptAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [EncryptAlgorithm::None, EncryptAlgorithm::Aes]
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownEncryptAlgorithm(s.to_string()))
    }
}

impl fmt::Display for EncryptAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of [`EncryptAlgorithm::seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBody {
    /// `NONE` or `AES:IV_HEX`.
    pub header: String,
    /// Plaintext or ciphertext body.
    pub body: Vec<u8>,
}

/// AES key and IV for a single request.
///
/// The key is zeroized on drop.
pub struct EncryptionContext {
    key: Vec<u8>,
    iv: [u8; AES_BLOCK_SIZE],
}

impl EncryptionContext {
    /// Derive the key from `challenge` and draw a fresh IV.
    pub fn generate(challenge: &AuthChallenge) -> Result<Self, CryptoError> {
        let mut iv = [0u8; AES_BLOCK_SIZE];
        OsRng.fill_bytes(&mut iv);
        Self::with_iv(challenge, iv)
    }

    /// Derive the key from `challenge` with a known IV.
    ///
    /// Fails with [`CryptoError::InvalidKeyLength`] when the challenge key
    /// is shorter than an AES-192 key.
    pub fn with_iv(
        challenge: &AuthChallenge,
        iv: [u8; AES_BLOCK_SIZE],
    ) -> Result<Self, CryptoError> {
        let key = challenge
            .key()
            .get(..AES_192_KEY_SIZE)
            .ok_or(CryptoError::InvalidKeyLength)?;
        Ok(Self {
            key: key.to_vec(),
            iv,
        })
    }

    /// Rebuild the context from an `AES:IV_HEX` header.
    pub fn from_header(header: &str, challenge: &AuthChallenge) -> Result<Self, CryptoError> {
        let malformed = || CryptoError::MalformedHeader(header.to_string());

        let (name, iv_hex) = header.split_once(':').ok_or_else(malformed)?;
        if name.parse::<EncryptAlgorithm>() != Ok(EncryptAlgorithm::Aes) {
            return Err(malformed());
        }
        let iv: [u8; AES_BLOCK_SIZE] = hex::decode(iv_hex)
            .map_err(|_| malformed())?
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;

        Self::with_iv(challenge, iv)
    }

    /// Key size in bytes.
    pub fn key_size(&self) -> usize {
        self.key.len()
    }

    /// The IV.
    pub fn iv(&self) -> &[u8; AES_BLOCK_SIZE] {
        &self.iv
    }

    /// Render the `AES:IV_HEX` header.
    pub fn header(&self) -> String {
        format!("{}:{}", EncryptAlgorithm::Aes.name(), hex::encode_upper(self.iv))
    }

    /// Pad and encrypt.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(Aes192CbcEnc::new_from_slices(&self.key, &self.iv)
            .map_err(|_| CryptoError::InvalidKeyLength)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    /// Decrypt and strip padding.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.is_empty() || ciphertext.len() % AES_BLOCK_SIZE != 0 {
            return Err(CryptoError::DecryptionFailed);
        }
        Aes192CbcDec::new_from_slices(&self.key, &self.iv)
            .map_err(|_| CryptoError::InvalidKeyLength)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}

impl fmt::Debug for EncryptionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionContext")
            .field("key_size", &self.key.len())
            .field("iv", &hex::encode_upper(self.iv))
            .finish_non_exhaustive()
    }
}

impl Drop for EncryptionContext {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
