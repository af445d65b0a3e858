//! GitHub profile checker relay
//!
//! - REST-shaped routes under `/api` in `endpoints/`
//! - GitHub REST client in `interfaces_github_rest`
//! - Static front-end served from `public/`
//! - Optional GITHUB_TOKEN env var for authenticated upstream calls

use std::{sync::Arc, time::Duration};

use axum::{
    handler::HandlerWithoutStateExt,
    http::{header::CONTENT_TYPE, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

pub mod config;
pub mod endpoints;
pub mod error;
pub mod log;
pub mod relay;
pub mod state;

use endpoints::github::events::read::index::handler as github_events_handler;
use endpoints::github::followers::read::index::handler as github_followers_handler;
use endpoints::github::following::read::index::handler as github_following_handler;
use endpoints::github::profile::read::index::handler as github_profile_handler;
use endpoints::github::rate_limit::read::index::handler as github_rate_limit_handler;
use endpoints::github::repos::read::index::handler as github_repos_handler;
use endpoints::github::starred::read::index::handler as github_starred_handler;
use endpoints::message::read::index::handler as message_handler;
use endpoints::search::users::read::index::handler as search_users_handler;
use state::RelayState;

/// Build the full router: `/api` relay routes, JSON 404 fallback, static
/// front-end, CORS and request logging.
pub fn app(state: Arc<RelayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    // The static route wins over the `{username}` capture by axum precedence,
    // so `/api/github/rate-limit` never reaches the profile handler.
    let api = Router::new()
        .route("/message", get(message_handler))
        .route("/github/rate-limit", get(github_rate_limit_handler))
        .route("/github/{username}", get(github_profile_handler))
        .route("/github/{username}/repos", get(github_repos_handler))
        .route("/github/{username}/starred", get(github_starred_handler))
        .route("/github/{username}/events", get(github_events_handler))
        .route("/github/{username}/followers", get(github_followers_handler))
        .route("/github/{username}/following", get(github_following_handler))
        .route("/search/users", get(search_users_handler))
        .fallback(route_not_found)
        .with_state(state.clone());

    Router::new()
        .nest("/api", api)
        .fallback_service(
            ServeDir::new(&state.config.public_dir)
                .not_found_service(route_not_found.into_service()),
        )
        .layer(middleware::from_fn(log::request_log))
        .layer(cors)
}

/// Everything unrouted answers JSON, like the API itself.
async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Route not found"})),
    )
}
