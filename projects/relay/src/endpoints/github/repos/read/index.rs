use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response},
};

use crate::{
    error::{RelayError, Resource},
    relay::{conditional_headers, forwarded_query, relay_response, validate_username, REPOS_QUERY},
    state::RelayState,
};

/// GET /api/github/{username}/repos
///
/// Defaults to `per_page=100&sort=updated` when the browser does not page
/// explicitly, so the front-end sees the whole first screen in one call.
pub async fn handler(
    State(state): State<Arc<RelayState>>,
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response<Body>, RelayError> {
    let username = validate_username(&username)?;

    let mut query = forwarded_query(&params, &REPOS_QUERY);
    if !params.contains_key("per_page") {
        query.push(("per_page".to_string(), "100".to_string()));
    }
    if !params.contains_key("sort") {
        query.push(("sort".to_string(), "updated".to_string()));
    }

    let upstream = state
        .github
        .fetch_user_repos(username, &query, &conditional_headers(&headers))
        .await
        .map_err(RelayError::unreachable)?;

    relay_response(Resource::Repos, upstream)
}
