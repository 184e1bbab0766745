//! Mapping rules and rule-set construction.
//!
//! # Responsibilities
//! - Resolve rule targets (`${baseUrl}` substitution) once at startup
//! - Enforce per-rule invariants at construction time
//! - Produce the immutable `RuleSet` shared by all request handlers
//!
//! # Design Decisions
//! - Construction is the only fallible step; matching never fails
//! - A block rule with a target is rejected, not silently ignored
//! - The rule set is immutable after construction (thread-safe without locks)

use axum::http::Uri;
use thiserror::Error;

use crate::config::{NoMatchBehavior, ProxyConfig, RoutingConfig, RuleConfig, RuleKind};

/// Placeholder resolved against `routing.base_url` in rule targets.
const BASE_URL_PLACEHOLDER: &str = "${baseUrl}";

/// Errors raised while constructing the rule set.
///
/// All of these are configuration errors: the service must refuse to start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    /// A non-block rule has no target URL.
    #[error("rule {index} ({kind:?}): target is required")]
    MissingTarget { index: usize, kind: RuleKind },

    /// A block rule carries a target URL.
    #[error("rule {index}: block rules must not carry a target")]
    UnexpectedTarget { index: usize },

    /// A rule has an empty pattern.
    #[error("rule {index}: pattern must not be empty")]
    EmptyPattern { index: usize },

    /// A target references `${baseUrl}` but no base URL is configured.
    #[error("rule {index}: target references ${{baseUrl}} but routing.base_url is not set")]
    UnresolvedBaseUrl { index: usize },

    /// A resolved target is not an absolute http(s) URL.
    #[error("rule {index}: target {url:?} is not a valid URL: {reason}")]
    InvalidTarget {
        index: usize,
        url: String,
        reason: String,
    },

    /// Fallback mode selected without a fallback target.
    #[error("routing.default_target is required when on_no_match = \"default_target\"")]
    MissingDefaultTarget,

    /// The fallback target is not an absolute http(s) URL.
    #[error("routing.default_target {url:?} is not a valid URL: {reason}")]
    InvalidDefaultTarget { url: String, reason: String },
}

/// A single mapping rule with its target fully resolved.
#[derive(Debug, Clone)]
pub struct MappingRule {
    pub kind: RuleKind,
    pub pattern: String,
    target: Option<String>,
}

impl MappingRule {
    /// Build a rule from its config entry, resolving the `${baseUrl}`
    /// placeholder. `index` is the rule's position, used for error reporting.
    pub fn from_config(
        index: usize,
        config: &RuleConfig,
        base_url: Option<&str>,
    ) -> Result<Self, RuleError> {
        if config.pattern.is_empty() {
            return Err(RuleError::EmptyPattern { index });
        }

        let target = match (config.kind, config.target.as_deref()) {
            (RuleKind::Block, None) => None,
            (RuleKind::Block, Some(_)) => {
                return Err(RuleError::UnexpectedTarget { index });
            }
            (kind, None) => {
                return Err(RuleError::MissingTarget { index, kind });
            }
            (_, Some(template)) => {
                let resolved = if template.contains(BASE_URL_PLACEHOLDER) {
                    let base = base_url.ok_or(RuleError::UnresolvedBaseUrl { index })?;
                    template.replace(BASE_URL_PLACEHOLDER, base)
                } else {
                    template.to_string()
                };
                require_absolute_url(&resolved).map_err(|reason| RuleError::InvalidTarget {
                    index,
                    url: resolved.clone(),
                    reason,
                })?;
                Some(resolved)
            }
        };

        Ok(Self {
            kind: config.kind,
            pattern: config.pattern.clone(),
            target,
        })
    }

    /// The resolved target URL. Empty for block rules, which never forward.
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or_default()
    }
}

/// The ordered, immutable set of mapping rules plus fallback configuration.
///
/// Built once at startup and shared via `Arc` by every request flow;
/// concurrent reads need no synchronization.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<MappingRule>,
    pub(crate) default_target: Option<String>,
    pub(crate) mount_path: String,
    pub(crate) match_full_path: bool,
}

impl RuleSet {
    /// Construct the rule set from validated configuration.
    ///
    /// Fails on the first violated rule invariant; `validate_config` reports
    /// all of them up front.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, RuleError> {
        let rules = config
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                MappingRule::from_config(index, rule, config.routing.base_url.as_deref())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let default_target = resolve_default_target(&config.routing)?;

        Ok(Self {
            rules,
            default_target,
            mount_path: config.routing.mount_path.clone(),
            match_full_path: config.routing.match_full_path,
        })
    }

    /// Number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Resolve the fallback target for the configured no-match mode.
///
/// Shared with `validate_config` so the startup report and rule-set
/// construction cannot drift apart.
pub(crate) fn resolve_default_target(
    routing: &RoutingConfig,
) -> Result<Option<String>, RuleError> {
    match routing.on_no_match {
        NoMatchBehavior::NotFound => Ok(None),
        NoMatchBehavior::DefaultTarget => {
            let target = routing
                .default_target
                .clone()
                .ok_or(RuleError::MissingDefaultTarget)?;
            require_absolute_url(&target).map_err(|reason| RuleError::InvalidDefaultTarget {
                url: target.clone(),
                reason,
            })?;
            Ok(Some(target))
        }
    }
}

/// A forwardable target must be an absolute http(s) URL; a typo'd scheme or
/// a bare path is a configuration error, not a per-request 502.
fn require_absolute_url(url: &str) -> Result<(), String> {
    let uri: Uri = url
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| e.to_string())?;
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        Some(other) => return Err(format!("unsupported scheme {other:?}")),
        None => return Err("missing scheme".to_string()),
    }
    if uri.authority().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
