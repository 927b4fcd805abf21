//! Resolution of the public `scheme://host` used to build image URLs.
//!
//! By default the value is derived from each request, so a beer reached via
//! two host names carries two different absolute image URLs. Setting
//! `PUBLIC_BASE_URL` swaps in a fixed base instead. The scheme guess is a
//! heuristic, not a security boundary.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};

use crate::state::AppState;

/// Produces the `scheme://host` prefix for externally addressable paths.
pub trait HostResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap, uri: &Uri) -> String;
}

/// Derives the prefix from the inbound request.
///
/// The host comes from the `Host` header, then the URI authority. The
/// scheme is `https` when the request URI carries a scheme or a proxy set
/// `X-Forwarded-Proto: https`; otherwise `http`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestHostResolver;

impl HostResolver for RequestHostResolver {
    fn resolve(&self, headers: &HeaderMap, uri: &Uri) -> String {
        let host = headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        let forwarded_https = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));

        let scheme = if uri.scheme().is_some() || forwarded_https {
            "https"
        } else {
            "http"
        };

        format!("{scheme}://{host}")
    }
}

/// Always returns the configured base URL.
#[derive(Debug, Clone)]
pub struct ConfiguredHostResolver {
    base_url: String,
}

impl ConfiguredHostResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl HostResolver for ConfiguredHostResolver {
    fn resolve(&self, _headers: &HeaderMap, _uri: &Uri) -> String {
        self.base_url.clone()
    }
}

/// Pick the resolver for the given `PUBLIC_BASE_URL` setting.
pub fn resolver_for(public_base_url: Option<&str>) -> Arc<dyn HostResolver> {
    match public_base_url {
        Some(base) => Arc::new(ConfiguredHostResolver::new(base)),
        None => Arc::new(RequestHostResolver),
    }
}

/// Extractor yielding the resolved `scheme://host` for the current request.
#[derive(Debug, Clone)]
pub struct PublicHost(pub String);

impl FromRequestParts<AppState> for PublicHost {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(PublicHost(
            state.host_resolver.resolve(&parts.headers, &parts.uri),
        ))
    }
}
