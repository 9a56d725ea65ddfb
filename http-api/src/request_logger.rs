//! Structured request logging middleware
//!
//! Emits one tracing event per request with method, path, status, latency and
//! a truncated query summary. Health checks are not logged.

use std::time::Instant;

use axum::{body::Body, extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};

/// Maximum length for query values before truncation
const MAX_PARAM_LENGTH: usize = 30;

/// Truncation suffix for long parameters
const TRUNCATION_SUFFIX: &str = "...";

/// Paths that are served without a log line
const SILENT_PATHS: [&str; 1] = ["/health"];

/// Request logging middleware
pub async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if SILENT_PATHS.contains(&path.as_str()) {
        return next.run(request).await;
    }

    let start_time = Instant::now();
    let method = request.method().clone();
    let query = request.uri().query().map(format_query_summary).unwrap_or_default();

    let response = next.run(request).await;
    let latency_ms = start_time.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(%method, %path, status, latency_ms, query = %query, "request failed");
    } else {
        info!(%method, %path, status, latency_ms, query = %query, "request handled");
    }

    response
}

/// Format a raw query string into `key="value"` pairs with truncation
fn format_query_summary(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if is_sensitive_parameter(key) {
                format!("{key}=\"[REDACTED]\"")
            } else {
                format!("{key}=\"{}\"", truncate_string(value, MAX_PARAM_LENGTH))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Truncate string to max length with suffix, respecting char boundaries
fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let truncated_length = max_length.saturating_sub(TRUNCATION_SUFFIX.len());
        let head: String = input.chars().take(truncated_length).collect();
        format!("{head}{TRUNCATION_SUFFIX}")
    }
}

/// Check if parameter should be redacted
fn is_sensitive_parameter(key: &str) -> bool {
    let sensitive_keys = ["password", "token", "secret", "key", "auth", "credential"];

    let key_lower = key.to_lowercase();
    sensitive_keys.iter().any(|&sensitive| key_lower.contains(sensitive))
}
