//! Shared test infrastructure: a scriptable mock backend.
//!
//! The backend binds an ephemeral port, counts every request it receives,
//! and serves a handful of fixed routes the proxy tests exercise. Anything
//! else is echoed back as `{method} {path_and_query}|{body}` so tests can
//! assert on exactly what the proxy sent.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use tokio::net::TcpListener;

#[derive(Clone)]
struct BackendState {
    hits: Arc<AtomicUsize>,
    base_url: String,
}

/// Handle to a running mock backend.
pub struct MockBackend {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockBackend {
    /// The backend's own base URL, e.g. `http://127.0.0.1:41234`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests that reached the backend.
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a mock backend on an ephemeral port.
pub async fn start_mock_backend() -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));

    let state = BackendState {
        hits: hits.clone(),
        base_url: format!("http://{}", addr),
    };
    let app = Router::new().fallback(handler).with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend { addr, hits }
}

async fn handler(State(state): State<BackendState>, request: Request<Body>) -> Response<Body> {
    state.hits.fetch_add(1, Ordering::SeqCst);

    match request.uri().path() {
        // Self-referential redirect, the shape a backend emits after a
        // form login or a trailing-slash fixup.
        "/redirect" => Response::builder()
            .status(StatusCode::FOUND)
            .header(
                header::LOCATION,
                format!("{}/new/path", state.base_url),
            )
            .body(Body::empty())
            .unwrap(),

        // Two cookies with Domain attributes, one lowercase.
        "/cookie" => Response::builder()
            .header(
                header::SET_COOKIE,
                "session=abc; Domain=backend.internal; Path=/; Secure",
            )
            .header(
                header::SET_COOKIE,
                "theme=dark; domain=.backend.internal; Max-Age=3600",
            )
            .body(Body::empty())
            .unwrap(),

        // Error response with a diagnostic body.
        "/fail" => Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Body::from("backend error page"))
            .unwrap(),

        // Report selected request headers back to the test.
        "/echo-headers" => {
            let cookie = header_or_none(&request, header::COOKIE);
            let host = header_or_none(&request, header::HOST);
            Response::new(Body::from(format!("cookie={cookie}\nhost={host}")))
        }

        // Echo everything else.
        _ => {
            let method = request.method().clone();
            let path_and_query = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_default();
            let body = axum::body::to_bytes(request.into_body(), usize::MAX)
                .await
                .unwrap();
            Response::new(Body::from(format!(
                "{} {}|{}",
                method,
                path_and_query,
                String::from_utf8_lossy(&body)
            )))
        }
    }
}

fn header_or_none(request: &Request<Body>, name: header::HeaderName) -> String {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("<none>")
        .to_string()
}
