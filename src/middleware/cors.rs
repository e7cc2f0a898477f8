//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native apps and server-to-server calls are not
//!   restricted by CORS.
//! - Every OPTIONS request is answered here (preflights by `CorsLayer`, the rest
//!   with a bare 200), so it never reaches the auth layers. The access policy
//!   permits OPTIONS as well.
//!
//! Policy:
//! - Development: permissive (Allow-Origin: *), WITHOUT credentials.
//! - Production: origins from `CORS_ALLOWED_ORIGINS`, WITHOUT credentials.
//!   A pattern may use `*` for a whole host label or for the port,
//!   e.g. `http://192.168.*.*:8081` or `http://localhost:*`.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Method, Request, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

/// One entry of the origin allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPattern {
    scheme: String,
    host: Vec<String>,
    port: Option<String>,
}

impl OriginPattern {
    /// `scheme://host[:port]`; returns None for anything else.
    pub fn parse(pattern: &str) -> Option<Self> {
        let (scheme, rest) = pattern.trim().trim_end_matches('/').split_once("://")?;
        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (rest, None),
        };

        if scheme.is_empty() || host.is_empty() || port.is_some_and(str::is_empty) {
            return None;
        }

        Some(Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.split('.').map(str::to_ascii_lowercase).collect(),
            port: port.map(str::to_string),
        })
    }

    pub fn matches(&self, origin: &str) -> bool {
        let Some(origin) = Self::parse(origin) else {
            return false;
        };

        let host_matches = self.host.len() == origin.host.len()
            && self
                .host
                .iter()
                .zip(&origin.host)
                .all(|(want, got)| want == "*" || want == got);

        let port_matches = match (self.port.as_deref(), origin.port.as_deref()) {
            (None, None) => true,
            (Some("*"), Some(_)) => true,
            (Some(want), Some(got)) => want == got,
            _ => false,
        };

        self.scheme == origin.scheme && host_matches && port_matches
    }
}

fn allow_origin(patterns: &[String]) -> AllowOrigin {
    if patterns.iter().any(|p| p.trim() == "*") {
        return AllowOrigin::any();
    }

    let allowed: Vec<OriginPattern> = patterns
        .iter()
        .filter_map(|p| {
            let parsed = OriginPattern::parse(p);
            if parsed.is_none() {
                tracing::warn!(pattern = %p, "ignoring unparsable CORS origin pattern");
            }
            parsed
        })
        .collect();

    // An empty allowlist allows none (no CORS headers).
    AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
        origin
            .to_str()
            .is_ok_and(|origin| allowed.iter().any(|p| p.matches(origin)))
    })
}

// Handlers never serve OPTIONS; answer it here so it is 200 on every path,
// with or without a token.
async fn answer_options(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Do not combine wildcard origin (`Any`) with `allow_credentials(true)`.
pub fn apply(router: Router, config: &Config) -> Router {
    let cors = if config.app_env.is_production() {
        CorsLayer::new().allow_origin(allow_origin(&config.cors_allowed_origins))
    } else {
        CorsLayer::new().allow_origin(Any)
    }
    .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        HeaderName::from_static("x-request-id"),
    ])
    .max_age(std::time::Duration::from_secs(60 * 10));

    router
        .layer(middleware::from_fn(answer_options))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_origin() {
        let p = OriginPattern::parse("http://localhost:8081").unwrap();
        assert!(p.matches("http://localhost:8081"));
        assert!(!p.matches("http://localhost:8082"));
        assert!(!p.matches("https://localhost:8081"));
        assert!(!p.matches("http://localhost"));
    }

    #[test]
    fn wildcard_host_labels() {
        let p = OriginPattern::parse("http://192.168.*.*:8081").unwrap();
        assert!(p.matches("http://192.168.1.20:8081"));
        assert!(p.matches("http://192.168.0.1:8081"));
        assert!(!p.matches("http://192.169.1.20:8081"));
        assert!(!p.matches("http://192.168.1:8081"));
        assert!(!p.matches("http://192.168.1.20:9000"));
    }

    #[test]
    fn wildcard_port() {
        let p = OriginPattern::parse("http://localhost:*").unwrap();
        assert!(p.matches("http://localhost:3000"));
        assert!(p.matches("http://LOCALHOST:19006"));
        assert!(!p.matches("http://localhost"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(OriginPattern::parse("localhost").is_none());
        assert!(OriginPattern::parse("http://").is_none());
        assert!(OriginPattern::parse("http://host:").is_none());
        let p = OriginPattern::parse("https://app.example.com").unwrap();
        assert!(!p.matches("null"));
    }
}
