use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    extract::{Query, State},
    http::Response,
};
use interfaces_github_rest::index::SearchUsersBody;

use crate::{
    error::{classify_upstream, RelayError, Resource},
    relay::{forwarded_query, relay_projected_json, SEARCH_QUERY},
    state::RelayState,
};

/// GET /api/search/users?q=… — only the `items` array of the search
/// envelope is relayed.
pub async fn handler(
    State(state): State<Arc<RelayState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response<Body>, RelayError> {
    if params.get("q").map(|q| q.trim().is_empty()).unwrap_or(true) {
        return Err(RelayError::MissingSearchQuery);
    }

    let upstream = state
        .github
        .search_users(&forwarded_query(&params, &SEARCH_QUERY))
        .await
        .map_err(RelayError::unreachable)?;

    if upstream.status.as_u16() != 200 {
        return Err(classify_upstream(
            Resource::Search,
            upstream.status,
            &upstream.headers,
        ));
    }

    let parsed: SearchUsersBody = serde_json::from_str(&upstream.body)
        .map_err(|source| RelayError::UpstreamDecode { source })?;

    relay_projected_json(&upstream.headers, &parsed.items)
}
