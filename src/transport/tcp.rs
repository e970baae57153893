//! Blocking TCP round trip.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, trace};

use super::{ResponseBuffer, READ_CHUNK_SIZE};
use crate::core::{GntpResult, DEFAULT_TIMEOUT, MAX_RESPONSE_SIZE};

/// Single-shot TCP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpTransport {
    /// Deadline for connect, and for each write and read.
    pub timeout: Duration,
    /// Maximum response size in bytes.
    pub max_response_size: usize,
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }
}

impl TcpTransport {
    /// Create a transport with the given deadline and response cap.
    pub fn new(timeout: Duration, max_response_size: usize) -> Self {
        Self {
            timeout,
            max_response_size,
        }
    }

    /// Send `frame` to `server` and return the raw response.
    ///
    /// Connection errors are returned as-is; nothing is retried.
    pub fn send(&self, server: &str, frame: &[u8]) -> GntpResult<Vec<u8>> {
        let mut stream = self.connect(server)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        stream.write_all(frame)?;
        stream.flush()?;
        trace!(bytes = frame.len(), "request written");

        let mut response = ResponseBuffer::new(self.max_response_size);
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        while !response.is_complete() {
            let n = match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            response.extend(&chunk[..n])?;
        }

        let response = response.into_inner();
        trace!(bytes = response.len(), "response read");
        Ok(response)
    }

    fn connect(&self, server: &str) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in server.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!(%addr, error = %e, "connect failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{server} did not resolve to any address"),
            )
        }))
    }
}
