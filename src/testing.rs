//! In-process GNTP daemon for tests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Accepts one connection, answers it, and hands back the request bytes.
pub(crate) struct MockDaemon {
    addr: String,
    handle: JoinHandle<Vec<u8>>,
}

impl MockDaemon {
    /// Answer the next request with a fixed response.
    pub(crate) fn reply(response: &[u8]) -> Self {
        let response = response.to_vec();
        Self::spawn(move |_| response)
    }

    /// Answer the next request with whatever `handler` returns.
    pub(crate) fn spawn<F>(handler: F) -> Self
    where
        F: FnOnce(&[u8]) -> Vec<u8> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock daemon");
        let addr = listener.local_addr().expect("local addr").to_string();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let request = read_request(&mut stream);
            let response = handler(&request);
            let _ = stream.write_all(&response);
            request
        });

        Self { addr, handle }
    }

    /// Address to point the client at.
    pub(crate) fn addr(&self) -> &str {
        &self.addr
    }

    /// Wait for the daemon and return the request it saw.
    pub(crate) fn received(self) -> Vec<u8> {
        self.handle.join().expect("mock daemon panicked")
    }
}

/// Read until the request terminator, the peer closes, or a short idle gap.
fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("set read timeout");

    let mut request = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
        if request.ends_with(b"\r\n\r\n") {
            break;
        }
    }
    request
}
