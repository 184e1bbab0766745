//! HTTP boundary layer.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware, dispatch)
//!     → routing layer decides: block / forward / fallback / not-found
//!     → proxy layer forwards and rewrites
//!     → response.rs (error responses for misses and upstream failures)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
