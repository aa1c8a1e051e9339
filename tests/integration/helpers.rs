//! A minimal fake of the IEClub API for integration tests.
//!
//! Serves canned JSON per `METHOD path` over plain HTTP/1.1 on an ephemeral
//! port and records every request it receives.

use serde_json::Value;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
pub struct FakeApiBuilder {
    routes: HashMap<String, Route>,
}

impl FakeApiBuilder {
    pub fn json(self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.raw(method, path, status, &body.to_string())
    }

    pub fn raw(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            format!("{method} {path}"),
            Route {
                status,
                body: body.to_string(),
                delay: None,
            },
        );
        self
    }

    /// Delay the response for an already registered route.
    pub fn delayed(mut self, method: &str, path: &str, delay: Duration) -> Self {
        if let Some(route) = self.routes.get_mut(&format!("{method} {path}")) {
            route.delay = Some(delay);
        }
        self
    }

    pub fn start(self) -> FakeApi {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let routes = Arc::new(self.routes);
        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log);
                thread::spawn(move || handle(stream, &routes, &log));
            }
        });

        FakeApi {
            base_url: format!("http://{addr}/api"),
            requests,
        }
    }
}

pub struct FakeApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeApi {
    pub fn builder() -> FakeApiBuilder {
        FakeApiBuilder::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_to(&self, path: &str) -> Option<RecordedRequest> {
        self.requests().into_iter().find(|r| r.path == path)
    }
}

fn handle(stream: TcpStream, routes: &HashMap<String, Route>, log: &Mutex<Vec<RecordedRequest>>) {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let full_path = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    if length > 0 && reader.read_exact(&mut body).is_err() {
        return;
    }

    // Routes are keyed without the /api prefix the client is rooted at.
    let path = full_path
        .strip_prefix("/api")
        .unwrap_or(&full_path)
        .to_string();

    log.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let route = routes.get(&format!("{method} {path}")).cloned().unwrap_or(Route {
        status: 404,
        body: r#"{"message":"not found"}"#.to_string(),
        delay: None,
    });
    if let Some(delay) = route.delay {
        thread::sleep(delay);
    }

    let response = format!(
        "HTTP/1.1 {} Fake\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        route.body.len(),
        route.body
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
