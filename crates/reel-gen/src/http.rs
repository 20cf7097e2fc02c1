//! Shared `ureq` plumbing for the HTTP-backed providers and platform clients

use reel_core::{ReelError, Result};
use std::io::Read;
use std::time::Duration;
use ureq::http::Response;
use ureq::Body;

pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 60;
pub(crate) const TRANSFER_TIMEOUT_SECS: u64 = 600;
const ERROR_BODY_LIMIT: usize = 512;

/// Build an agent that hands non-2xx responses back instead of erroring,
/// so each stage can classify the status itself.
pub(crate) fn build_agent(timeout_secs: u64) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .http_status_as_error(false)
        .build();
    config.into()
}

/// Fail with `stage` unless the response carries a 2xx status
pub(crate) fn ensure_success(
    response: &mut Response<Body>,
    service: &str,
    stage: fn(String) -> ReelError,
) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(stage(format!(
        "{} returned HTTP {}: {}",
        service,
        status.as_u16(),
        truncate(&body, ERROR_BODY_LIMIT)
    )))
}

pub(crate) fn read_json(
    response: &mut Response<Body>,
    service: &str,
    stage: fn(String) -> ReelError,
) -> Result<serde_json::Value> {
    response
        .body_mut()
        .read_json()
        .map_err(|e| stage(format!("Failed to parse {} response: {}", service, e)))
}

/// Read the whole body into memory. Either every byte arrives or the stage fails.
pub(crate) fn read_bytes(response: Response<Body>, stage: fn(String) -> ReelError) -> Result<Vec<u8>> {
    let mut reader = response.into_body().into_reader();
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| stage(format!("Failed to read response body: {}", e)))?;
    Ok(bytes)
}

fn truncate(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }
    let mut out: String = s.chars().take(limit).collect();
    out.push_str("...");
    out
}


/// One-shot loopback HTTP server for exercising the real request paths
#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    pub(crate) struct CapturedRequest {
        pub request_line: String,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl CapturedRequest {
        pub(crate) fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    /// Answer a single request with `status` and `body`.
    ///
    /// Returns the base URL and a thread that yields the captured request.
    pub(crate) fn serve_once(
        status: u16,
        body: &'static str,
    ) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut headers = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    headers.push((k.trim().to_string(), v.trim().to_string()));
                }
            }

            let length = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(0);
            let mut request_body = vec![0u8; length];
            reader.read_exact(&mut request_body).unwrap();

            write!(
                stream,
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();

            CapturedRequest {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: request_body,
            }
        });
        (base, server)
    }
}
