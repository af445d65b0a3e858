use std::collections::HashMap;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Response, StatusCode},
};
use interfaces_github_rest::index::GitHubRestResult;
use serde::Serialize;

use crate::error::{classify_upstream, RelayError, Resource};

/// Response headers relayed from GitHub to the browser: caching, pagination
/// and rate-limit accounting stay intact end to end.
const RELAYED_RESPONSE_HEADERS: [&str; 10] = [
    "etag",
    "cache-control",
    "last-modified",
    "link",
    "x-ratelimit-limit",
    "x-ratelimit-remaining",
    "x-ratelimit-reset",
    "x-ratelimit-used",
    "x-ratelimit-resource",
    "retry-after",
];

/// Request headers forwarded to GitHub so conditional requests keep working.
const FORWARDED_CONDITIONAL_HEADERS: [&str; 2] = ["if-none-match", "if-modified-since"];

/// Query parameters forwarded upstream, per route family.
pub const REPOS_QUERY: [&str; 5] = ["page", "per_page", "sort", "direction", "type"];
pub const LIST_QUERY: [&str; 2] = ["page", "per_page"];
pub const SEARCH_QUERY: [&str; 3] = ["q", "page", "per_page"];

/// GitHub username grammar: 1..=39 ASCII alphanumerics or hyphens, no edge
/// hyphen, no consecutive hyphens. Checked before any upstream call.
pub fn validate_username(username: &str) -> Result<&str, RelayError> {
    let length_ok = (1..=39).contains(&username.len());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-');
    let edges_ok = !username.starts_with('-') && !username.ends_with('-');
    let no_double_hyphen = !username.contains("--");

    if length_ok && chars_ok && edges_ok && no_double_hyphen {
        Ok(username)
    } else {
        Err(RelayError::InvalidUsername)
    }
}

/// Pick the browser's conditional headers out of an incoming request.
pub fn conditional_headers(request_headers: &HeaderMap) -> HeaderMap {
    let mut conditional = HeaderMap::new();
    for name in FORWARDED_CONDITIONAL_HEADERS {
        if let Some(value) = request_headers.get(name) {
            conditional.insert(name, value.clone());
        }
    }
    conditional
}

/// Keep only allowlisted query parameters, in allowlist order.
pub fn forwarded_query(
    params: &HashMap<String, String>,
    allowed: &[&str],
) -> Vec<(String, String)> {
    allowed
        .iter()
        .filter_map(|name| params.get(*name).map(|value| (name.to_string(), value.clone())))
        .collect()
}

/// The subset of upstream response headers the relay passes back.
pub fn relayed_response_headers(upstream: &HeaderMap) -> Vec<(&'static str, HeaderValue)> {
    RELAYED_RESPONSE_HEADERS
        .iter()
        .filter_map(|name| upstream.get(*name).map(|value| (*name, value.clone())))
        .collect()
}

/// Relay an upstream result verbatim: 200 and 304 pass through with the
/// header subset, anything else goes through the error vocabulary.
pub fn relay_response(
    resource: Resource,
    upstream: GitHubRestResult,
) -> Result<Response<Body>, RelayError> {
    match upstream.status.as_u16() {
        200 | 304 => {
            let mut builder = Response::builder()
                .status(upstream.status)
                .header("Content-Type", "application/json");

            for (name, value) in relayed_response_headers(&upstream.headers) {
                builder = builder.header(name, value);
            }

            builder
                .body(Body::from(upstream.body))
                .map_err(|source| RelayError::ResponseBuild { source })
        }
        _ => Err(classify_upstream(
            resource,
            upstream.status,
            &upstream.headers,
        )),
    }
}

/// Serve a locally projected body (`rate`, `items`) while still relaying the
/// upstream header subset.
pub fn relay_projected_json(
    upstream_headers: &HeaderMap,
    body: &impl Serialize,
) -> Result<Response<Body>, RelayError> {
    let json =
        serde_json::to_string(body).map_err(|source| RelayError::SerializeBody { source })?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json");

    for (name, value) in relayed_response_headers(upstream_headers) {
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from(json))
        .map_err(|source| RelayError::ResponseBuild { source })
}
