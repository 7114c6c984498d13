//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of routes keyed by request target (path plus query).
//! Unknown targets get 404. Every request's head is recorded so tests can
//! check headers such as `Authorization`.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn json(body: &str) -> Self {
        Self {
            status: "200 OK",
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: "200 OK",
            headers: vec![("Content-Type".into(), "application/octet-stream".into())],
            body,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: "302 Found",
            headers: vec![("Location".into(), location.into())],
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A bound but not yet serving listener; `base()` is known before routes are built.
pub struct ApiServer {
    listener: TcpListener,
    base: String,
}

/// Request heads seen by the server, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

impl ApiServer {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        Self {
            listener,
            base: format!("http://127.0.0.1:{}", port),
        }
    }

    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Serve `routes` in a background thread until the process exits.
    pub fn serve(self, routes: HashMap<String, Response>) -> RequestLog {
        let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);
        let log_bg = Arc::clone(&log);
        thread::spawn(move || {
            for stream in self.listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log_bg);
                thread::spawn(move || handle(stream, &routes, &log));
            }
        });
        log
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Response>, log: &RequestLog) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut head = Vec::new();
    let mut buf = [0u8; 4096];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&head).into_owned();
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(request);

    let not_found = Response {
        status: "404 Not Found",
        headers: Vec::new(),
        body: b"{\"message\":\"Not Found\"}".to_vec(),
    };
    let resp = routes.get(&target).unwrap_or(&not_found);

    let mut out = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        resp.status,
        resp.body.len()
    );
    for (name, value) in &resp.headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str("\r\n");
    let _ = stream.write_all(out.as_bytes());
    let _ = stream.write_all(&resp.body);
}
