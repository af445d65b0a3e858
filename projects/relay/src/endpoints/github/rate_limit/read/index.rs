use std::sync::Arc;

use axum::{body::Body, extract::State, http::Response};
use interfaces_github_rest::index::RateLimitBody;

use crate::{
    error::{classify_upstream, RelayError, Resource},
    relay::relay_projected_json,
    state::RelayState,
};

/// GET /api/github/rate-limit — only the core `rate` object, so the
/// front-end can show remaining quota without digging through the envelope.
pub async fn handler(State(state): State<Arc<RelayState>>) -> Result<Response<Body>, RelayError> {
    let upstream = state
        .github
        .fetch_rate_limit()
        .await
        .map_err(RelayError::unreachable)?;

    if upstream.status.as_u16() != 200 {
        return Err(classify_upstream(
            Resource::RateLimit,
            upstream.status,
            &upstream.headers,
        ));
    }

    let parsed: RateLimitBody = serde_json::from_str(&upstream.body)
        .map_err(|source| RelayError::UpstreamDecode { source })?;

    relay_projected_json(&upstream.headers, &parsed.rate)
}
