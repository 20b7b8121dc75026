//! A canned OSRM stand-in for behavioural tests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Serves the same HTTP response to every request on a loopback port.
#[derive(Debug)]
pub struct StubOsrmServer {
    base_url: String,
    requests: Arc<AtomicUsize>,
}

impl StubOsrmServer {
    /// Start a server answering every request with `status` and `body`.
    ///
    /// The accept loop runs on a detached thread for the rest of the test
    /// process.
    pub fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap_or_else(|err| {
            panic!("failed to bind stub OSRM listener: {err}");
        });
        let address = listener.local_addr().unwrap_or_else(|err| {
            panic!("failed to read stub OSRM address: {err}");
        });
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\n\
             Content-Length: {length}\r\nConnection: close\r\n\r\n{body}",
            reason = reason_phrase(status),
            length = body.len(),
        );
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                counter.fetch_add(1, Ordering::SeqCst);
                answer(stream, response.as_bytes());
            }
        });
        Self {
            base_url: format!("http://{address}"),
            requests,
        }
    }

    /// Base URL to configure the provider with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn answer(mut stream: TcpStream, response: &[u8]) {
    let mut request = Vec::new();
    let mut buffer = [0_u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => return,
            Ok(read) => request.extend_from_slice(buffer.get(..read).unwrap_or_default()),
        }
    }
    let _ = stream.write_all(response);
    let _ = stream.flush();
}

const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
