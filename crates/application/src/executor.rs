//! Request executor
//!
//! Performs one call through an [`HttpTransport`] and turns the outcome into
//! a [`Response`] envelope: timing, gzip decoding, header collapse.

use std::io::Read;
use std::time::Instant;

use apiprobe_domain::{CallError, Response};
use flate2::read::GzDecoder;

use crate::ports::{HttpTransport, OutgoingRequest, RawResponse};

/// Sends `request` and wraps the result.
///
/// Never fails: transport and decode failures are attached to the returned
/// envelope, with the target URL in the message.
pub fn execute_request<T: HttpTransport + ?Sized>(transport: &T, request: &OutgoingRequest) -> Response {
    tracing::debug!(method = %request.method, url = %request.url, "sending request");

    let start = Instant::now();
    let raw = match transport.send(request) {
        Ok(raw) => raw,
        Err(err) => {
            let message = err.to_string();
            tracing::debug!(url = %request.url, error = %message, "request failed");
            let error = if err.is_decode() {
                CallError::Decode {
                    url: request.url.clone(),
                    message,
                }
            } else {
                CallError::Transport {
                    url: request.url.clone(),
                    message,
                }
            };
            return Response::errored(error);
        }
    };
    let elapsed = start.elapsed();

    let RawResponse {
        status_code,
        status_text,
        headers,
        cookies,
        body,
        url,
    } = raw;

    let body = match decode_body(&headers, body) {
        Ok(body) => body,
        Err(message) => {
            return Response::errored(CallError::Decode {
                url: request.url.clone(),
                message,
            });
        }
    };

    tracing::debug!(status = status_code, elapsed = ?elapsed, url = %url, "request completed");

    Response::completed(
        status_code,
        status_text,
        headers,
        cookies,
        String::from_utf8_lossy(&body).into_owned(),
        elapsed,
        url,
    )
}

/// Decompresses a gzip-encoded body.
///
/// A body labelled gzip whose gzip header cannot be read (missing, truncated
/// or invalid) is kept as-is, so the mismatch shows up in body assertions
/// rather than as an error. Only a failure after the header parsed is an error.
fn decode_body(headers: &[(String, String)], body: Vec<u8>) -> Result<Vec<u8>, String> {
    let gzipped = headers.iter().any(|(name, value)| {
        name.eq_ignore_ascii_case("content-encoding") && value.trim().eq_ignore_ascii_case("gzip")
    });
    if !gzipped || body.is_empty() {
        return Ok(body);
    }

    let mut decoder = GzDecoder::new(body.as_slice());
    let mut decoded = Vec::new();
    match decoder.read_to_end(&mut decoded) {
        Ok(_) => Ok(decoded),
        Err(e) if decoder.header().is_none() => {
            tracing::warn!(
                bytes = body.len(),
                error = %e,
                "body is labelled gzip but has no readable gzip header; keeping raw bytes"
            );
            Ok(body)
        }
        Err(e) => Err(format!("gzip: {e}")),
    }
}
