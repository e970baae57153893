//! # GNTP Client
//!
//! A client for the **G**rowl **N**otification **T**ransport **P**rotocol
//! (GNTP 1.0). It registers an application with a local or remote
//! notification daemon and pushes notifications over plain TCP:
//!
//! - **Authentication**: salted challenge-response key-hash (MD5, SHA1, SHA256)
//! - **Confidentiality**: optional AES-CBC body encryption with PKCS#7 padding
//! - **Simplicity**: one blocking round trip per call, no retries, no pooling
//!
//! ## Feature Flags
//!
//! - `async`: tokio-based `*_async` variants of every operation
//!
//! ## Modules
//!
//! - [`core`]: Constants and error types
//! - [`crypto`]: Key-hash and cipher layer
//! - [`wire`]: Request framing and response decoding
//! - [`transport`]: TCP round trip with deadlines
//! - [`client`]: Configuration and the REGISTER / NOTIFY operations
//!
//! ## Example Usage
//!
//! ```no_run
//! use gntp_client::prelude::*;
//!
//! let client = GntpClient::new(ClientConfig::with_password("secret"))?;
//! client.register()?;
//!
//! let options = NotifyOptions::new().icon("http://example.com/build.png");
//! match client.notify("Build finished", "All tests passed", &options) {
//!     Ok(()) => {}
//!     Err(e) if e.is_protocol() => eprintln!("daemon said: {e}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), GntpError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod client;
pub mod core;
pub mod crypto;
pub mod transport;
pub mod wire;

#[cfg(test)]
mod testing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::client::*;
    pub use crate::core::{ConfigError, CryptoError, GntpError, GntpResult};
    pub use crate::crypto::{EncryptAlgorithm, HashAlgorithm};
    pub use crate::wire::{HeaderBlock, Method, Request, Response, ResponseKind};
}

// Re-export commonly used items at crate root
pub use crate::client::{ClientConfig, ClientConfigBuilder, GntpClient, NotificationType, NotifyOptions};
pub use crate::core::{ConfigError, CryptoError, GntpError, GntpResult};
pub use crate::crypto::{EncryptAlgorithm, HashAlgorithm};
