//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the mapping proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ordered mapping rules. Order is priority: the first matching rule
    /// decides the outcome.
    pub rules: Vec<RuleConfig>,

    /// Routing behavior around the rule list (mount point, fallback).
    pub routing: RoutingConfig,

    /// Request-body forwarding policy.
    pub forwarding: ForwardingConfig,

    /// Response rewriting (redirect locations, cookie domains).
    pub rewrite: RewriteConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// The kind of a mapping rule.
///
/// A closed set: an unknown kind in the config file is a parse error, never
/// a rule that silently matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Terminate matching requests with 404. Matches against path + query.
    Block,
    /// Rewrite a path prefix to a target URL. Matches against the path only
    /// so the query string can be cleanly reattached.
    Prefix,
    /// Forward to a fixed target when the pattern appears anywhere in
    /// path + query. Looser than `Prefix`, used for legacy paths.
    Contains,
}

/// A single mapping rule as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// What kind of match this rule performs.
    pub kind: RuleKind,

    /// Pattern matched against the request (see `RuleKind` for what part).
    pub pattern: String,

    /// Target URL template. Required unless `kind = "block"`; may contain a
    /// `${baseUrl}` placeholder resolved once at startup.
    #[serde(default)]
    pub target: Option<String>,
}

/// Behavior when no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchBehavior {
    /// Respond 404 without contacting any backend.
    #[default]
    NotFound,
    /// Forward to `routing.default_target`, appending the remainder path.
    DefaultTarget,
}

/// Routing behavior around the rule list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Value substituted for `${baseUrl}` in rule targets at startup.
    pub base_url: Option<String>,

    /// The proxy's own mount point (e.g., "/app"). Empty when the proxy is
    /// mounted at the root.
    pub mount_path: String,

    /// When false (the default), the mount path is stripped from the inbound
    /// path before rules are matched. When true, rules see the full path
    /// including the mount point.
    pub match_full_path: bool,

    /// What to do when no rule matches.
    pub on_no_match: NoMatchBehavior,

    /// Fallback base URL, required when `on_no_match = "default_target"`.
    pub default_target: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            mount_path: String::new(),
            match_full_path: false,
            on_no_match: NoMatchBehavior::NotFound,
            default_target: None,
        }
    }
}

/// Request-body forwarding policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Methods whose request body is streamed to the backend. Other methods
    /// are forwarded with an empty body.
    pub body_methods: Vec<String>,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            body_methods: vec!["POST".to_string()],
        }
    }
}

/// Response rewriting configuration.
///
/// An explicit mode: when disabled, backend `Location` and `Set-Cookie`
/// headers pass through untouched.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RewriteConfig {
    /// Enable redirect-location and cookie-domain rewriting.
    pub enabled: bool,

    /// The base URL the backend uses for self-referential redirects
    /// (e.g., "http://backend:8080"). Required when enabled.
    pub backend_base_url: Option<String>,

    /// The proxy's public origin (e.g., "https://proxy.example.com").
    /// Default ports are dropped during normalization. Required when enabled.
    pub public_origin: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
