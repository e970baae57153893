//! GNTP client - Wire Codec
//!
//! Text framing for GNTP 1.0:
//!
//! ```text
//! Authenticated:   GNTP/1.0 <METHOD> <ENCRYPTION> <HASH>\r\n<body>\r\n\r\n
//! Unauthenticated: GNTP/1.0 <METHOD> NONE\r\n<headers>\r\n
//! Response:        GNTP/1.0 -OK|-ERROR|-CALLBACK ...\r\n[Name: value\r\n]*\r\n
//! ```
//!
//! A body is a sequence of header blocks. Each block is a run of
//! `Name: Value\r\n` lines closed by an empty line.

mod request;
mod response;

pub use request::*;
pub use response::*;

/// Split a `Name: Value` line.
///
/// A single space after the colon belongs to the separator; everything
/// else is kept.
pub(crate) fn split_header_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.strip_prefix(' ').unwrap_or(value)))
}
