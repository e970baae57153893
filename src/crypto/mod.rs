//! GNTP client - Security Layer
//!
//! Implements the two halves of the GNTP 1.0 request envelope:
//! - Challenge-response key hashing ([`AuthChallenge`])
//! - Optional AES-CBC body encryption ([`EncryptionContext`])
//!
//! Both draw their randomness from the operating system RNG and are built
//! fresh for every request.

mod cipher;
mod hash;

pub use cipher::{EncryptAlgorithm, EncryptionContext, SealedBody};
pub use hash::{AuthChallenge, HashAlgorithm};
