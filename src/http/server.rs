//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the axum router and shared state from validated configuration
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch each request: match rules → forward → rewrite
//! - Serve until the shutdown signal fires
//!
//! # Design Decisions
//! - `HttpServer::new` is fallible: a config that cannot produce a rule set
//!   refuses to serve (configuration errors are fatal, never deferred)
//! - The rule set is built once and shared read-only via Arc; request
//!   handlers never synchronize
//! - Blocked and NotFound terminate before any outbound call

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{validate_config, ConfigError, ProxyConfig};
use crate::config::validation::parse_body_methods;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::proxy::{rewrite_response, Forwarder, RewriteContext};
use crate::routing::{Decision, RuleSet};

/// Application state injected into the proxy handler.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleSet>,
    pub forwarder: Arc<Forwarder>,
    pub rewrite: Option<Arc<RewriteContext>>,
}

/// HTTP server for the mapping proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build the server from configuration.
    ///
    /// Fails when the configuration cannot produce a valid rule set or
    /// rewrite context; the service must not start serving in that case.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let rules = Arc::new(
            RuleSet::from_config(&config)
                .map_err(|e| ConfigError::Validation(vec![e.into()]))?,
        );
        let rewrite = RewriteContext::from_config(&config.rewrite, &config.routing.mount_path)
            .map_err(|e| ConfigError::Validation(vec![e.into()]))?
            .map(Arc::new);
        let body_methods =
            parse_body_methods(&config.forwarding).map_err(|e| ConfigError::Validation(vec![e]))?;
        let forwarder = Arc::new(Forwarder::new(&config.timeouts, body_methods));

        tracing::info!(
            rules = rules.len(),
            rewrite_enabled = rewrite.is_some(),
            "Rule set constructed"
        );

        let state = AppState {
            rules,
            forwarder,
            rewrite,
        };

        let router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http());

        Ok(Self { router })
    }

    /// Run the server on the given listener until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler: match rules, forward, rewrite.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    let decision = state.rules.evaluate(&path, query.as_deref());
    let outcome = decision.label();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        decision = outcome,
        "Routing decision"
    );

    let target = match decision {
        Decision::Blocked => {
            tracing::info!(request_id = %request_id, path = %path, "Request blocked by rule");
            metrics::record_request(&method, 404, outcome, start);
            return response::not_found("Not Found");
        }
        Decision::NotFound => {
            tracing::warn!(request_id = %request_id, path = %path, "No mapping rule matched");
            metrics::record_request(&method, 404, outcome, start);
            return response::not_found("No mapping rule matched");
        }
        Decision::Forward(target) | Decision::Fallback(target) => target,
    };

    match state.forwarder.forward(&target, request).await {
        Ok(backend_response) => {
            let status = backend_response.status();
            tracing::debug!(
                request_id = %request_id,
                target = %target,
                status = %status,
                "Backend responded"
            );
            metrics::record_request(&method, status.as_u16(), outcome, start);
            rewrite_response(backend_response, state.rewrite.as_deref())
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                target = %target,
                error = %e,
                "Upstream request failed"
            );
            metrics::record_request(&method, 502, outcome, start);
            response::bad_gateway("Upstream request failed")
        }
    }
}
