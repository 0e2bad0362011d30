//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single static body for every GET, or a fixed error status.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct ImageServerOptions {
    /// Status line returned for GET; anything but 200 sends no body.
    pub status: &'static str,
    /// Close the connection after this many body bytes (Content-Length still claims the full body).
    pub truncate_after: Option<usize>,
}

impl Default for ImageServerOptions {
    fn default() -> Self {
        Self {
            status: "200 OK",
            truncate_after: None,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns a URL
/// ending in `/image.jpg`. The server runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, ImageServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ImageServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, opts));
        }
    });
    format!("http://127.0.0.1:{}/image.jpg", port)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: ImageServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let method = std::str::from_utf8(&buf[..n])
        .ok()
        .and_then(|r| r.split_whitespace().next())
        .unwrap_or("");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    if opts.status != "200 OK" {
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            opts.status
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    match opts.truncate_after {
        Some(cut) => {
            let _ = stream.write_all(&body[..cut.min(body.len())]);
        }
        None => {
            let _ = stream.write_all(body);
        }
    }
}
