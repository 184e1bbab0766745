//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce rule invariants (non-block rules need targets, block rules
//!   must not carry one, targets must be absolute http(s) URLs)
//! - Check mode coherence (fallback mode needs a target, rewrite mode needs
//!   its URLs)
//! - Validate body-forwarding method names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure: `&ProxyConfig` → `Result<(), Vec<ValidationError>>`
//! - Rule invariants are checked by constructing the rules themselves, so
//!   validation and construction cannot drift apart

use std::collections::HashSet;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::{ForwardingConfig, ProxyConfig};
use crate::proxy::rewriter::{RewriteContext, RewriteError};
use crate::routing::rule::{resolve_default_target, MappingRule, RuleError};

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A rule violates a construction invariant.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// The rewrite section is enabled but incomplete or malformed.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// A body-forwarding method name is not a valid HTTP method.
    #[error("forwarding.body_methods: {0:?} is not a valid HTTP method")]
    BodyMethod(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, rule) in config.rules.iter().enumerate() {
        if let Err(e) = MappingRule::from_config(index, rule, config.routing.base_url.as_deref()) {
            errors.push(e.into());
        }
    }

    if let Err(e) = resolve_default_target(&config.routing) {
        errors.push(e.into());
    }

    if let Err(e) = RewriteContext::from_config(&config.rewrite, &config.routing.mount_path) {
        errors.push(e.into());
    }

    if let Err(e) = parse_body_methods(&config.forwarding) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse the configured body-forwarding method names.
pub fn parse_body_methods(config: &ForwardingConfig) -> Result<HashSet<Method>, ValidationError> {
    config
        .body_methods
        .iter()
        .map(|name| {
            Method::from_bytes(name.to_ascii_uppercase().as_bytes())
                .map_err(|_| ValidationError::BodyMethod(name.clone()))
        })
        .collect()
}
