//! GNTP client - Client Library
//!
//! Configuration and the REGISTER / NOTIFY operations.

#[allow(clippy::module_inception)]
mod client;
mod config;

pub use client::*;
pub use config::*;
