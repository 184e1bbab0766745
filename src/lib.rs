//! Rule-mapping reverse proxy.
//!
//! Routes inbound HTTP requests through an ordered list of mapping rules
//! (block, prefix-rewrite, or contains), then forwards to the resolved
//! backend and rewrites the response so it appears to originate from the
//! proxy itself (redirect locations, cookie domains).
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                MAPPING PROXY                  │
//!                    │                                               │
//!   Client Request   │  ┌────────┐   ┌─────────┐   ┌─────────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│ routing │──▶│   proxy::   │──┼──▶ Backend
//!                    │  │ server │   │ matcher │   │  forwarder  │  │
//!                    │  └────────┘   └────┬────┘   └─────────────┘  │
//!                    │                    │ Blocked / NotFound       │
//!                    │                    ▼                          │
//!   Client Response  │  ┌────────┐   ┌─────────┐                    │
//!   ◀────────────────┼──│  http  │◀──│ proxy:: │◀───────────────────┼─── Backend
//!                    │  │response│   │rewriter │                    │     Response
//!                    │  └────────┘   └─────────┘                    │
//!                    │                                               │
//!                    │  config · observability · lifecycle           │
//!                    └───────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod proxy;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
