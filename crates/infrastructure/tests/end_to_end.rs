//! End-to-end tests: real reqwest transport against a local HTTP responder.

#![allow(clippy::unwrap_used)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use apiprobe_application::{ApiClient, ClientConfig};
use apiprobe_domain::{ErrorKind, Failures, Params};
use apiprobe_infrastructure::{ClientBuilder, Expectations, JsonExpectations, ReqwestTransport};
use flate2::Compression;
use flate2::write::GzEncoder;
use pretty_assertions::assert_eq;
use regex::Regex;
use tempfile::NamedTempFile;

const DOCUMENT: &str = r#"{
    "paths": {
        "/health": {
            "get": {"operationId": "HealthCheck", "tags": ["health"]}
        },
        "/broken": {
            "get": {"operationId": "Broken", "tags": ["health"]}
        },
        "/compressed": {
            "get": {"operationId": "Compressed", "tags": ["health"]}
        },
        "/moved": {
            "get": {"operationId": "Moved", "tags": ["health"]}
        },
        "/slow": {
            "get": {"operationId": "Slow"}
        },
        "/users/{id}": {
            "get": {
                "operationId": "GetUser",
                "tags": ["users"],
                "parameters": [
                    {"name": "id", "in": "path", "required": true, "type": "string"},
                    {"name": "filter", "in": "query", "type": "string"}
                ]
            }
        }
    }
}"#;

/// A request line and headers as received by the responder.
type Received = Arc<Mutex<Vec<String>>>;

struct Responder {
    port: u16,
    received: Received,
}

impl Responder {
    fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let received: Received = Arc::default();

        let log = Arc::clone(&received);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let log = Arc::clone(&log);
                thread::spawn(move || handle(stream, &log));
            }
        });

        Self { port, received }
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

fn handle(mut stream: TcpStream, log: &Mutex<Vec<String>>) {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !buffer.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buffer).into_owned();
    log.lock().unwrap().push(head.clone());

    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let response = route(&target);
    let _ = stream.write_all(&response);
    let _ = stream.flush();
}

fn route(target: &str) -> Vec<u8> {
    match target {
        "/health" => respond(
            "200 OK",
            &[
                ("Content-Type", "application/json"),
                ("Set-Cookie", "session=abc; Path=/; HttpOnly"),
            ],
            br#"{"name":"X","version":"1.2.3"}"#,
        ),
        "/broken" => respond("500 Internal Server Error", &[], b""),
        "/compressed" => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(br#"{"name":"X","version":"1.2.3"}"#)
                .unwrap();
            respond(
                "200 OK",
                &[("Content-Type", "application/json"), ("Content-Encoding", "gzip")],
                &encoder.finish().unwrap(),
            )
        }
        "/moved" => respond("302 Found", &[("Location", "/health")], b""),
        "/slow" => {
            thread::sleep(Duration::from_secs(2));
            respond("200 OK", &[], b"late")
        }
        other => {
            let body = serde_json::json!({ "target": other }).to_string();
            respond("200 OK", &[("Content-Type", "application/json")], body.as_bytes())
        }
    }
}

fn respond(status: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {status}\r\nConnection: close\r\nContent-Length: {}\r\n", body.len());
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

fn document() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();
    file
}

fn client(document: &NamedTempFile, config: ClientConfig) -> ApiClient<ReqwestTransport> {
    ClientBuilder::new(document.path())
        .with_config(config.with_host("127.0.0.1"))
        .build()
        .unwrap()
}

#[test]
fn health_check_passes_with_no_failures() {
    let responder = Responder::start();
    let document = document();
    let client = client(&document, ClientConfig::default().with_port(responder.port));
    let failures = Failures::new();
    let version = Regex::new(r"1\.\d\.\d").unwrap();

    let response = client
        .execute_json("health.HealthCheck", &Params::new())
        .expect_error(&failures, None)
        .expect_status(&failures, 200)
        .expect_value(&failures, "name", "X")
        .expect_value_match(&failures, "version", &version)
        .expect_header_value(&failures, "content-type", "application/json");

    failures.assert_none();
    assert_eq!(response.response.status, "OK");
    assert_eq!(
        response.response.request_url,
        format!("http://127.0.0.1:{}/health", responder.port)
    );
    assert_eq!(response.response.cookies.len(), 1);
    assert_eq!(response.response.cookies[0].name, "session");
    assert!(response.response.cookies[0].http_only);
}

#[test]
fn identity_header_is_stamped() {
    let responder = Responder::start();
    let document = document();
    let client = client(
        &document,
        ClientConfig::default()
            .with_port(responder.port)
            .with_identity_header("X-Probe-Run"),
    );

    let response = client.execute("health.HealthCheck", &Params::new());
    assert!(!response.is_errored());

    let received = responder.received();
    assert_eq!(received.len(), 1);
    let head = received[0].to_ascii_lowercase();
    assert!(head.contains("x-probe-run: true"));
    assert!(head.contains("content-type: application/json"));
}

#[test]
fn server_error_records_exactly_one_failure() {
    let responder = Responder::start();
    let document = document();
    let client = client(&document, ClientConfig::default().with_port(responder.port));
    let failures = Failures::new();

    let _ = client
        .execute_json("health.Broken", &Params::new())
        .expect_status(&failures, 200);

    assert_eq!(
        failures.messages(),
        vec!["expected statuscode '200', got '500' instead"]
    );
}

#[test]
fn gzip_body_is_transparent() {
    let responder = Responder::start();
    let document = document();
    let client = client(&document, ClientConfig::default().with_port(responder.port));
    let failures = Failures::new();

    let response = client
        .execute_json("health.Compressed", &Params::new())
        .expect_status(&failures, 200)
        .expect_value(&failures, "name", "X")
        .expect_value_string(&failures, "version", "1.2.3");

    failures.assert_none();
    assert_eq!(response.response.body, r#"{"name":"X","version":"1.2.3"}"#);
}

#[test]
fn redirects_are_followed_only_when_enabled() {
    let responder = Responder::start();
    let document = document();
    let client = client(&document, ClientConfig::default().with_port(responder.port));
    let failures = Failures::new();

    let _ = client
        .execute("health.Moved", &Params::new())
        .expect_status(&failures, 302)
        .expect_header_value(&failures, "Location", "/health");

    client.set_follow_redirects(true);
    let followed = client
        .execute_json("health.Moved", &Params::new())
        .expect_status(&failures, 200)
        .expect_value(&failures, "name", "X");

    failures.assert_none();
    assert!(followed.response.request_url.ends_with("/health"));
}

#[test]
fn path_and_query_parameters_reach_the_server() {
    let responder = Responder::start();
    let document = document();
    let client = client(&document, ClientConfig::default().with_port(responder.port));
    let failures = Failures::new();

    let params = Params::new()
        .with("id", "a b")
        .with("filter{0}", "x")
        .with("filter{1}", "y&z");

    let _ = client
        .execute_json("users.GetUser", &params)
        .expect_value(&failures, "target", "/users/a%20b?filter=x&filter=y%26z");

    failures.assert_none();
}

#[test]
fn binding_errors_never_reach_the_server() {
    let responder = Responder::start();
    let document = document();
    let client = client(&document, ClientConfig::default().with_port(responder.port));
    let failures = Failures::new();

    let missing = client
        .execute_json("users.GetUser", &Params::new())
        .expect_status(&failures, 200)
        .expect_value(&failures, "target", "anything");
    let extraneous = client.execute("users.GetUser", &Params::new().with("id", 1).with("page", 2));

    assert!(failures.is_empty());
    assert_eq!(
        missing.response.error().map(|e| e.kind()),
        Some(ErrorKind::MissingRequiredParameter)
    );
    assert_eq!(
        extraneous.error().map(|e| e.kind()),
        Some(ErrorKind::ExtraneousParameter)
    );
    assert!(responder.received().is_empty());
}

#[test]
fn timeout_surfaces_as_transport_error() {
    let responder = Responder::start();
    let document = document();
    let client = client(
        &document,
        ClientConfig::default()
            .with_port(responder.port)
            .with_timeout_ms(200),
    );

    let response = client.execute("Slow", &Params::new());
    let err = response.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("/slow"));
}

#[test]
fn connection_refused_carries_url() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let document = document();
    let client = client(&document, ClientConfig::default().with_port(port));

    let response = client.execute("health.HealthCheck", &Params::new());
    let err = response.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(
        err.to_string()
            .contains(&format!("request to URL http://127.0.0.1:{port}/health failed"))
    );
    assert_eq!(response.status_code, 0);
}
