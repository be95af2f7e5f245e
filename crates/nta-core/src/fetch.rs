//! HTTP document fetching.
//!
//! Uses the curl crate (libcurl) to GET a JSON document and return the body
//! as text. A non-2xx status and a transport failure are distinct error
//! variants so callers can report the server's reason phrase separately
//! from connection problems. No retry: either error ends the run.

use std::str;
use std::time::Duration;
use thiserror::Error;

/// Error returned by [`fetch`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP response had a non-2xx status. `reason` carries the status-line
    /// reason phrase when the server sent one.
    #[error("HTTP {code}: {reason}")]
    Http { code: u32, reason: String },
    /// libcurl reported an error (DNS, connect, timeout, TLS, ...).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
}

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Performs a GET request with default timeouts and returns the body as text.
pub fn fetch(url: &str) -> Result<String, FetchError> {
    fetch_with_timeouts(url, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT)
}

/// Performs a GET request and returns the body as text.
///
/// Follows redirects and sends `Accept: application/json`. Runs in the
/// current thread and blocks until the transfer completes or times out.
pub fn fetch_with_timeouts(
    url: &str,
    connect_timeout: Duration,
    timeout: Duration,
) -> Result<String, FetchError> {
    let mut body: Vec<u8> = Vec::new();
    let mut status_line: Option<String> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                // Keep the last status line; redirects produce several.
                if s.starts_with("HTTP/") {
                    status_line = Some(s.trim_end().to_string());
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            code,
            reason: reason_phrase(status_line.as_deref(), code),
        });
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Reason phrase from a status line, e.g. "HTTP/1.1 404 Not Found" ->
/// "Not Found". HTTP/2 servers send no phrase; fall back to the bare code.
fn reason_phrase(status_line: Option<&str>, code: u32) -> String {
    status_line
        .and_then(|line| line.splitn(3, ' ').nth(2))
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| format!("status {}", code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_phrase_http1() {
        assert_eq!(
            reason_phrase(Some("HTTP/1.1 404 Not Found"), 404),
            "Not Found"
        );
    }

    #[test]
    fn reason_phrase_multiword() {
        assert_eq!(
            reason_phrase(Some("HTTP/1.0 500 Internal Server Error"), 500),
            "Internal Server Error"
        );
    }

    #[test]
    fn reason_phrase_http2_no_phrase() {
        assert_eq!(reason_phrase(Some("HTTP/2 403"), 403), "status 403");
    }

    #[test]
    fn reason_phrase_missing_line() {
        assert_eq!(reason_phrase(None, 502), "status 502");
    }

    #[test]
    fn http_error_display() {
        let err = FetchError::Http {
            code: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }
}
