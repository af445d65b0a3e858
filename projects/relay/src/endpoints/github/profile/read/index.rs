use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Response},
};

use crate::{
    error::{RelayError, Resource},
    relay::{conditional_headers, relay_response, validate_username},
    state::RelayState,
};

/// GET /api/github/{username} — the user's profile, relayed verbatim.
pub async fn handler(
    State(state): State<Arc<RelayState>>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<Response<Body>, RelayError> {
    let username = validate_username(&username)?;

    let upstream = state
        .github
        .fetch_user(username, &conditional_headers(&headers))
        .await
        .map_err(RelayError::unreachable)?;

    relay_response(Resource::User, upstream)
}
