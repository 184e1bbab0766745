//! Client-facing error responses.
//!
//! # Responsibilities
//! - Map routing misses to 404 (blocked and unmatched look the same)
//! - Map upstream failures to 502 with a diagnostic message
//!
//! # Design Decisions
//! - Plain-text bodies; these responses carry no backend content
//! - A blocked request is reported as not-found, not forbidden, so the rule
//!   set does not leak which paths exist

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// 404 response for blocked requests and unmatched paths.
pub fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, message.to_string()).into_response()
}

/// 502 response for backend connect/write failures.
pub fn bad_gateway(message: &str) -> Response {
    (StatusCode::BAD_GATEWAY, message.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(not_found("nope").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_gateway_status() {
        assert_eq!(bad_gateway("down").status(), StatusCode::BAD_GATEWAY);
    }
}
