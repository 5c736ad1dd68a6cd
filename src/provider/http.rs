//! Shared HTTP client and status mapping.

use std::sync::OnceLock;

use crate::error::RekonError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Map a non-200 HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> RekonError {
    match status {
        401 | 403 => RekonError::Authentication(extract_message(body)),
        _ => RekonError::api(status, extract_message(body)),
    }
}

/// Pull `error.message` out of a JSON error body, falling back to the raw body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
