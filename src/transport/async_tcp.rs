//! Async TCP round trip on tokio.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::trace;

use super::{ResponseBuffer, TcpTransport, READ_CHUNK_SIZE};
use crate::core::{GntpError, GntpResult};

async fn within<T>(
    deadline: Duration,
    fut: impl Future<Output = std::io::Result<T>>,
) -> GntpResult<T> {
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(GntpError::Timeout),
    }
}

impl TcpTransport {
    /// Async variant of [`TcpTransport::send`].
    ///
    /// Each step is bounded by the transport deadline; expiry yields
    /// [`GntpError::Timeout`].
    pub async fn send_async(&self, server: &str, frame: &[u8]) -> GntpResult<Vec<u8>> {
        let mut stream = within(self.timeout, TcpStream::connect(server)).await?;

        within(self.timeout, async {
            stream.write_all(frame).await?;
            stream.flush().await
        })
        .await?;
        trace!(bytes = frame.len(), "request written");

        let mut response = ResponseBuffer::new(self.max_response_size);
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        while !response.is_complete() {
            let n = within(self.timeout, stream.read(&mut chunk)).await?;
            if n == 0 {
                break;
            }
            response.extend(&chunk[..n])?;
        }

        let response = response.into_inner();
        trace!(bytes = response.len(), "response read");
        Ok(response)
    }
}
