//! Routing subsystem: ordered mapping rules and the matching decision.
//!
//! # Data Flow
//! ```text
//! config rules (validated)
//!     → rule.rs (resolve targets, build immutable RuleSet)
//!     → shared via Arc to all request handlers
//!
//! Per request:
//!     path + query
//!     → matcher.rs (ordered evaluation, first match wins)
//!     → Decision { Blocked | Forward | Fallback | NotFound }
//!     → consumed by the HTTP boundary layer
//! ```
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) ordered scan; configuration order is priority order
//! - Explicit NotFound rather than silent default

pub mod matcher;
pub mod rule;

pub use matcher::Decision;
pub use rule::{MappingRule, RuleError, RuleSet};
