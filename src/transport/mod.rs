//! GNTP client - Transport Layer
//!
//! One TCP connection per request:
//!
//! ```text
//! connect (deadline) -> write_all(frame) -> read until EOF or "\r\n\r\n"
//! ```
//!
//! There is no pooling, keep-alive or retry. Every read and write carries
//! a deadline and the response is capped in size. The socket is dropped
//! on every exit path.
//!
//! - [`TcpTransport::send`]: blocking `std::net` round trip
//! - `TcpTransport::send_async`: tokio round trip (requires `async` feature)

#[cfg(feature = "async")]
mod async_tcp;
mod tcp;

pub use tcp::*;

use crate::core::{GntpError, GntpResult, MESSAGE_TERMINATOR};

/// Read buffer size.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Accumulates response bytes up to a size cap.
#[derive(Debug)]
pub(crate) struct ResponseBuffer {
    data: Vec<u8>,
    limit: usize,
    scanned: usize,
    complete: bool,
}

impl ResponseBuffer {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
            scanned: 0,
            complete: false,
        }
    }

    /// Append a chunk read from the socket.
    ///
    /// Bytes after the first terminator are dropped. The cap applies to the
    /// response itself, not to whatever the peer sends after it.
    pub(crate) fn extend(&mut self, chunk: &[u8]) -> GntpResult<()> {
        if self.complete {
            return Ok(());
        }
        self.data.extend_from_slice(chunk);

        // Re-scan the tail in case the terminator straddles two chunks.
        let start = self.scanned.saturating_sub(MESSAGE_TERMINATOR.len() - 1);
        if let Some(pos) = self.data[start..]
            .windows(MESSAGE_TERMINATOR.len())
            .position(|w| w == MESSAGE_TERMINATOR)
        {
            self.data.truncate(start + pos + MESSAGE_TERMINATOR.len());
            self.complete = true;
        }
        self.scanned = self.data.len();

        if self.data.len() > self.limit {
            return Err(GntpError::MalformedResponse(format!(
                "response exceeds {} bytes",
                self.limit
            )));
        }
        Ok(())
    }

    /// Whether the response terminator has arrived.
    pub(crate) fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.data
    }
}
