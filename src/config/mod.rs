//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors collected)
//!     → ProxyConfig (validated, immutable)
//!     → rule set / forwarder / rewriter built from it at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the rule set never changes while the
//!   process serves traffic
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ForwardingConfig, ListenerConfig, NoMatchBehavior, ObservabilityConfig, ProxyConfig,
    RewriteConfig, RoutingConfig, RuleConfig, RuleKind, TimeoutConfig,
};
pub use validation::{parse_body_methods, validate_config, ValidationError};
