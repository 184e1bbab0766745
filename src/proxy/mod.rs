//! Proxy subsystem: outbound forwarding and response rewriting.
//!
//! # Data Flow
//! ```text
//! Decision::Forward(target) | Decision::Fallback(target)
//!     → forwarder.rs (build outbound request, stream body, execute)
//!     → backend response (status, headers, streaming body)
//!     → rewriter.rs (strip framing, rewrite Location / Set-Cookie)
//!     → outbound response to the client
//! ```

pub mod forwarder;
pub mod rewriter;

pub use forwarder::{ForwardError, Forwarder};
pub use rewriter::{rewrite_response, RewriteContext, RewriteError};
