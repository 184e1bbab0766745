//! Backend response rewriting.
//!
//! # Responsibilities
//! - Copy status and headers onto the proxy's outbound response
//! - Strip Transfer-Encoding (the proxy's transport decides framing)
//! - Rewrite self-referential redirect Locations to the proxy's origin
//! - Strip the Domain attribute from Set-Cookie values
//! - Stream the body through byte-for-byte
//!
//! # Design Decisions
//! - Header multiplicity and per-key order are preserved
//! - Set-Cookie is taken apart structurally, not regex-matched: the Domain
//!   attribute is dropped by segment, the cookie pair itself never is
//! - Rewriting is an explicit config mode; disabled means pass-through
//! - Error-status bodies arrive on the same stream as success bodies and
//!   pass through unchanged, so backend error pages reach the client

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use axum::BoxError;
use thiserror::Error;
use url::Url;

use crate::config::RewriteConfig;

/// Errors raised while resolving the rewrite configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    /// Rewrite mode enabled without the backend's base URL.
    #[error("rewrite.backend_base_url is required when rewrite is enabled")]
    MissingBackendBaseUrl,

    /// Rewrite mode enabled without the proxy's public origin.
    #[error("rewrite.public_origin is required when rewrite is enabled")]
    MissingPublicOrigin,

    /// The public origin could not be parsed or normalized.
    #[error("rewrite.public_origin {origin:?} is invalid: {reason}")]
    InvalidPublicOrigin { origin: String, reason: String },
}

/// Resolved rewrite settings, computed once at startup.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// Prefix the backend uses in self-referential redirect Locations.
    backend_base_url: String,
    /// Normalized proxy origin (default ports dropped) plus mount path.
    proxy_base: String,
}

impl RewriteContext {
    /// Resolve the rewrite config. Returns `None` when rewriting is disabled;
    /// an enabled but incomplete config is a startup error.
    pub fn from_config(
        config: &RewriteConfig,
        mount_path: &str,
    ) -> Result<Option<Self>, RewriteError> {
        if !config.enabled {
            return Ok(None);
        }

        let backend_base_url = config
            .backend_base_url
            .clone()
            .ok_or(RewriteError::MissingBackendBaseUrl)?;
        let origin = config
            .public_origin
            .as_deref()
            .ok_or(RewriteError::MissingPublicOrigin)?;

        let parsed = Url::parse(origin).map_err(|e| RewriteError::InvalidPublicOrigin {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RewriteError::InvalidPublicOrigin {
                origin: origin.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        // Url::origin() omits the port when it is the scheme's default.
        let proxy_base = format!("{}{}", parsed.origin().ascii_serialization(), mount_path);

        Ok(Some(Self {
            backend_base_url,
            proxy_base,
        }))
    }
}

/// Redirect statuses whose Location header is subject to rewriting.
fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Map the backend response onto the proxy's outbound response.
///
/// The status is copied verbatim and the body streams through in the
/// transport's chunks; only the headers are reworked.
pub fn rewrite_response<B>(response: Response<B>, rewrite: Option<&RewriteContext>) -> Response<Body>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let (parts, body) = response.into_parts();

    let mut headers = HeaderMap::with_capacity(parts.headers.len());
    for (name, value) in parts.headers.iter() {
        if name == header::TRANSFER_ENCODING {
            continue;
        }

        if let Some(context) = rewrite {
            if name == header::LOCATION && is_redirect(parts.status) {
                headers.append(name.clone(), context.rewrite_location(value));
                continue;
            }
            if name == header::SET_COOKIE {
                headers.append(name.clone(), rewrite_set_cookie(value));
                continue;
            }
        }

        headers.append(name.clone(), value.clone());
    }

    let mut outbound = Response::new(Body::new(body));
    *outbound.status_mut() = parts.status;
    *outbound.headers_mut() = headers;
    outbound
}

impl RewriteContext {
    /// Replace the backend's base URL prefix with the proxy's own base.
    /// Locations pointing elsewhere pass through unchanged.
    fn rewrite_location(&self, value: &HeaderValue) -> HeaderValue {
        let Ok(location) = value.to_str() else {
            return value.clone();
        };
        let Some(rest) = location.strip_prefix(&self.backend_base_url) else {
            return value.clone();
        };
        let rewritten = format!("{}{}", self.proxy_base, rest);
        HeaderValue::from_str(&rewritten).unwrap_or_else(|_| value.clone())
    }
}

/// Drop the Domain attribute from a Set-Cookie value, keeping every other
/// attribute in its original order.
fn rewrite_set_cookie(value: &HeaderValue) -> HeaderValue {
    let Ok(cookie) = value.to_str() else {
        return value.clone();
    };
    let stripped = strip_domain_attribute(cookie);
    HeaderValue::from_str(&stripped).unwrap_or_else(|_| value.clone())
}

fn strip_domain_attribute(cookie: &str) -> String {
    cookie
        .split(';')
        .enumerate()
        .filter_map(|(index, segment)| {
            let trimmed = segment.trim();
            // Segment 0 is the name=value pair itself; never dropped, even
            // for a cookie literally named "domain".
            if index > 0 {
                let attribute = trimmed.split('=').next().unwrap_or(trimmed).trim();
                if attribute.eq_ignore_ascii_case("domain") {
                    return None;
                }
            }
            Some(trimmed)
        })
        .collect::<Vec<_>>()
        .join("; ")
}
