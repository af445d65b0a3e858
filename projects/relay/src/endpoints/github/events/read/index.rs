use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response},
};

use crate::{
    error::{RelayError, Resource},
    relay::{conditional_headers, forwarded_query, relay_response, validate_username, LIST_QUERY},
    state::RelayState,
};

/// GET /api/github/{username}/events — the user's public timeline.
pub async fn handler(
    State(state): State<Arc<RelayState>>,
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response<Body>, RelayError> {
    let username = validate_username(&username)?;

    let upstream = state
        .github
        .fetch_user_events(
            username,
            &forwarded_query(&params, &LIST_QUERY),
            &conditional_headers(&headers),
        )
        .await
        .map_err(RelayError::unreachable)?;

    relay_response(Resource::Events, upstream)
}
