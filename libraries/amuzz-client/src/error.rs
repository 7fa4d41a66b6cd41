//! Mapping of transport and HTTP failures onto `GatewayError`.

use amuzz_core::GatewayError;
use reqwest::{Response, StatusCode};

/// Map a failed `send()`.
pub(crate) fn from_send(err: reqwest::Error) -> GatewayError {
    if err.is_connect() || err.is_timeout() {
        GatewayError::Unreachable(err.to_string())
    } else if err.is_decode() {
        GatewayError::Decode(err.to_string())
    } else {
        GatewayError::Request(err.to_string())
    }
}

/// Turn a non-success response into an error.
///
/// 401 means the token was rejected. Anything else keeps the status and the
/// most specific message the body offers.
pub(crate) async fn from_response(response: Response) -> GatewayError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return GatewayError::Unauthorized;
    }

    let body = response.text().await.unwrap_or_default();
    GatewayError::server(status.as_u16(), error_message(status, &body))
}

/// Pull `message` / `error` / `msg` out of a JSON error body, falling back
/// to the raw body, then to the status line.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "msg"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}
