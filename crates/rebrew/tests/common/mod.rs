//! Shared fixtures for integration tests.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

const FOUND_BODY: &str =
    r#"<html><p class="names">App</p><p class="desc">Some application</p></html>"#;
const MISSING_BODY: &str = "<html>No cask with this name.</html>";

/// Serve canned cask pages on a local socket. Keys listed in `known` get a
/// page with both structural markers; everything else gets a marker-free
/// page. Returns the catalog base URL.
pub fn spawn_catalog_server(known: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            serve_one(stream, |path| {
                let is_known = known.iter().any(|key| path == format!("/cask/{key}"));
                let body = if is_known { FOUND_BODY } else { MISSING_BODY };
                ("200 OK", body.to_owned())
            });
        }
    });
    format!("http://{addr}/cask")
}

/// Serve an error status for every request. Returns the catalog base URL.
#[allow(dead_code)]
pub fn spawn_failing_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            serve_one(stream, |_| ("503 Service Unavailable", String::new()));
        }
    });
    format!("http://{addr}/cask")
}

fn serve_one(mut stream: TcpStream, respond: impl Fn(&str) -> (&'static str, String)) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain the request headers before answering.
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line == "\r\n" => break,
            Ok(_) => {}
            Err(_) => return,
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (status, body) = respond(path);
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.shutdown(std::net::Shutdown::Both);
}
