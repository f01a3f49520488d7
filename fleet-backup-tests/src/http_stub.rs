//! One-shot loopback HTTP servers for download tests
//!
//! Each stub binds an ephemeral port, answers exactly one request and
//! shuts down. Nothing here leaves the loopback interface.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serve `body` once with a 200 response and correct Content-Length.
/// Returns the URL to fetch.
pub fn serve_bytes(body: Vec<u8>) -> String {
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(&body);
    serve_raw(response)
}

/// Serve an empty response with the given status once
pub fn serve_status(status: u16, reason: &str) -> String {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status, reason
    )
    .into_bytes();
    serve_raw(response)
}

/// Answer the first connection with `response`, then shut down
pub fn serve_raw(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind loopback listener");
    let addr = listener.local_addr().expect("Failed to read listener address");

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            // Drain the request head before answering
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(&response);
            let _ = stream.flush();
        }
    });

    format!("http://{}/image.tar.gz", addr)
}
