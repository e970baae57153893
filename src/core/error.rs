//! Error types for the GNTP client.

use std::io;

use thiserror::Error;

use crate::crypto::{EncryptAlgorithm, HashAlgorithm};

/// Errors raised while resolving a client configuration.
///
/// All of these surface from `ClientConfigBuilder::build`, before any
/// network I/O takes place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Hash algorithm name not in {MD5, SHA1, SHA256}.
    #[error("unknown hash algorithm: {0}")]
    UnknownHashAlgorithm(String),

    /// Encryption algorithm name not in {NONE, AES}.
    #[error("unknown encryption algorithm: {0}")]
    UnknownEncryptAlgorithm(String),

    /// Server address is empty.
    #[error("server address must not be empty")]
    EmptyServer,

    /// I/O deadline must be non-zero.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    /// REGISTER needs at least one notification definition.
    #[error("at least one notification type must be configured")]
    NoNotificationTypes,

    /// The hash digest is shorter than the cipher key it has to seed.
    #[error("{cipher} needs a {key_size}-byte key but {hash} digests are shorter; use SHA256")]
    KeyTooShort {
        /// Configured hash algorithm.
        hash: HashAlgorithm,
        /// Configured encryption algorithm.
        cipher: EncryptAlgorithm,
        /// Key length the cipher requires.
        key_size: usize,
    },
}

/// Errors in the crypto layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A hash or encryption header could not be parsed.
    #[error("malformed security header: {0}")]
    MalformedHeader(String),

    /// The key-hash does not match the password and salt.
    #[error("key hash mismatch")]
    KeyHashMismatch,

    /// Key or IV has the wrong length for the cipher.
    #[error("invalid key or iv length")]
    InvalidKeyLength,

    /// Ciphertext is not block aligned or its padding is corrupt.
    #[error("decryption failed (bad padding or corrupted data)")]
    DecryptionFailed,
}

/// Top-level GNTP errors.
///
/// Every call returns at most one of these; nothing is retried internally.
#[derive(Debug, Error)]
pub enum GntpError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Crypto error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Dial, write or read failure, passed through untranslated.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// An async deadline expired.
    #[error("operation timed out")]
    Timeout,

    /// The daemon answered `-ERROR`.
    ///
    /// Displays as the bare description so callers can show it verbatim.
    #[error("{description}")]
    Protocol {
        /// Value of `Error-Code`, when present and numeric.
        code: Option<u16>,
        /// Value of `Error-Description`, or a generic message.
        description: String,
    },

    /// The response could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GntpError {
    /// Check if the daemon rejected the request or answered garbage.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            GntpError::Protocol { .. } | GntpError::MalformedResponse(_)
        )
    }

    /// Check if this is a network-level failure.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, GntpError::Io(_) | GntpError::Timeout)
    }

    /// Check if this is a configuration failure.
    pub fn is_config(&self) -> bool {
        matches!(self, GntpError::Config(_))
    }
}

/// Result type for GNTP operations.
pub type GntpResult<T> = Result<T, GntpError>;
