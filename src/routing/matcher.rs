//! Rule matching: the routing decision for one request.
//!
//! # Responsibilities
//! - Evaluate the rule list strictly in configured order
//! - Stop at the first matching rule (configuration order is priority order)
//! - Compose the target URL for forwarded requests
//! - Return an explicit decision; no response is written from here
//!
//! # Design Decisions
//! - `block` and `contains` test path + query; `prefix` tests the path only
//!   so the query string can be reattached after the rewritten prefix
//! - No specificity ranking: rule order is the only tie-break
//! - A configured mount point scopes the proxy: requests outside it are
//!   NotFound before any rule is evaluated
//! - Blocked and NotFound are values, not side effects; the boundary layer
//!   turns them into responses

use crate::config::RuleKind;
use crate::routing::rule::RuleSet;

/// The outcome of evaluating the rule set against one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// A block rule matched; respond 404 without any backend call.
    Blocked,
    /// A rule matched; forward to this fully composed target URL.
    Forward(String),
    /// No rule matched and a default target is configured.
    Fallback(String),
    /// No rule matched and no default target is configured.
    NotFound,
}

impl Decision {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Blocked => "blocked",
            Decision::Forward(_) => "forward",
            Decision::Fallback(_) => "fallback",
            Decision::NotFound => "no_match",
        }
    }
}

impl RuleSet {
    /// Evaluate the rules against a request path and optional query string.
    ///
    /// `path` is the raw request path including the proxy's mount point;
    /// unless `match_full_path` is set, the mount point is stripped before
    /// rules see it.
    pub fn evaluate(&self, path: &str, query: Option<&str>) -> Decision {
        let Some(scoped) = self.strip_mount(path) else {
            return Decision::NotFound;
        };
        let match_path = if self.match_full_path { path } else { scoped };
        let full_url = compose_url(match_path, query);

        for rule in &self.rules {
            match rule.kind {
                RuleKind::Block => {
                    if full_url.starts_with(&rule.pattern) {
                        return Decision::Blocked;
                    }
                }
                RuleKind::Prefix => {
                    if let Some(remainder) = match_path.strip_prefix(rule.pattern.as_str()) {
                        return Decision::Forward(compose_url(
                            &format!("{}{}", rule.target(), remainder),
                            query,
                        ));
                    }
                }
                RuleKind::Contains => {
                    if full_url.contains(&rule.pattern) {
                        let mut target = rule.target().to_string();
                        if let Some(q) = query {
                            if !target.contains('?') {
                                target.push('?');
                                target.push_str(q);
                            }
                        }
                        return Decision::Forward(target);
                    }
                }
            }
        }

        match &self.default_target {
            Some(base) => {
                let remainder = scoped.trim_start_matches('/');
                let target = format!("{}/{}", base.trim_end_matches('/'), remainder);
                Decision::Fallback(compose_url(&target, query))
            }
            None => Decision::NotFound,
        }
    }

    /// Path beyond the proxy's own mount point, or `None` when the request
    /// does not sit under it. The remainder must be empty or start at a
    /// segment boundary: `/application` is not under a `/app` mount.
    fn strip_mount<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.mount_path.is_empty() {
            return Some(path);
        }
        path.strip_prefix(self.mount_path.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Append the query string, if any, to a path or URL.
fn compose_url(base: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{}?{}", base, q),
        None => base.to_string(),
    }
}
