//! GNTP client - core types and constants.
//!
//! Protocol constants and the error taxonomy shared by every layer. This
//! module has no dependencies on the crypto, wire or transport layers.

mod constants;
mod error;

pub use constants::*;
pub use error::*;
