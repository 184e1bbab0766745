//! Outbound request construction and execution.
//!
//! # Responsibilities
//! - Build the outbound request for a resolved target URL
//! - Copy inbound headers, minus framing and cookie headers
//! - Synthesize a single Cookie header from the inbound cookie pairs
//! - Stream the request body for configured body-carrying methods
//! - Surface connect/write failures as distinguishable errors
//!
//! # Design Decisions
//! - Content-Length is never copied: the transport recomputes framing for
//!   the streamed body, and a stale value would corrupt it
//! - Host is not copied: the client derives it from the target URI, so the
//!   backend sees its own authority (a prerequisite for redirect rewriting)
//! - The hyper client never follows redirects; they are observed and
//!   rewritten by the response rewriter instead
//! - Bodies stream through without buffering; non-body methods forward an
//!   empty body

use std::collections::HashSet;
use std::time::Duration;

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::config::TimeoutConfig;

/// Errors raised while forwarding a request to the backend.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The composed target URL is not a valid URI.
    #[error("invalid target URL {url:?}: {reason}")]
    InvalidTarget { url: String, reason: String },

    /// Connecting to the backend or writing the request failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// Executes outbound requests against resolved target URLs.
///
/// Owns the shared HTTP client; per-request state lives entirely in the
/// request flow that calls [`Forwarder::forward`].
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    body_methods: HashSet<Method>,
}

impl Forwarder {
    /// Create a forwarder with a connect timeout and the set of methods
    /// whose request body is streamed to the backend.
    pub fn new(timeouts: &TimeoutConfig, body_methods: HashSet<Method>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build::<_, Body>(connector);

        Self {
            client,
            body_methods,
        }
    }

    /// Forward the inbound request to `target`, returning the backend's
    /// response with its body still streaming.
    pub async fn forward(
        &self,
        target: &str,
        request: Request<Body>,
    ) -> Result<hyper::Response<Incoming>, ForwardError> {
        let uri: Uri = target.parse().map_err(|e: axum::http::uri::InvalidUri| {
            ForwardError::InvalidTarget {
                url: target.to_string(),
                reason: e.to_string(),
            }
        })?;

        let (parts, body) = request.into_parts();
        let outbound = self.build_outbound(uri, parts, body);

        Ok(self.client.request(outbound).await?)
    }

    /// Construct the outbound request: method and headers copied from the
    /// inbound request, body included only for body-carrying methods.
    fn build_outbound(&self, uri: Uri, parts: Parts, body: Body) -> Request<Body> {
        let outbound_body = if self.body_methods.contains(&parts.method) {
            body
        } else {
            Body::empty()
        };

        let mut outbound = Request::new(outbound_body);
        *outbound.method_mut() = parts.method.clone();
        *outbound.uri_mut() = uri;

        let headers = outbound.headers_mut();
        for (name, value) in parts.headers.iter() {
            if name == header::CONTENT_LENGTH || name == header::COOKIE || name == header::HOST {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }

        if let Some(cookie_header) = synthesize_cookie_header(&parts.headers) {
            headers.insert(header::COOKIE, cookie_header);
        }

        outbound
    }
}

/// Join all inbound cookie pairs into a single `Cookie` header value.
///
/// Returns `None` when the request carries no cookies; a header consisting
/// of the separator alone is never emitted.
fn synthesize_cookie_header(headers: &HeaderMap) -> Option<HeaderValue> {
    let pairs: Vec<&str> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();

    if pairs.is_empty() {
        return None;
    }
    HeaderValue::from_str(&pairs.join("; ")).ok()
}
