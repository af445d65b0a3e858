use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use interfaces_github_rest::index::GitHubRequestError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Which upstream resource a handler was relaying; selects the 404 wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Repos,
    Starred,
    Events,
    Followers,
    Following,
    Search,
    RateLimit,
}

impl Resource {
    pub fn not_found_message(self) -> &'static str {
        match self {
            Resource::User => "User not found",
            Resource::Repos => "Repositories not found",
            Resource::Starred => "Starred repos not found",
            Resource::Events => "Events not found",
            Resource::Followers => "Followers not found",
            Resource::Following => "Following not found",
            Resource::Search | Resource::RateLimit => "Resource not found",
        }
    }
}

/// The relay's whole error vocabulary. Every handler failure renders as
/// `{"error": <message>}` with the status from `status_code`.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid username")]
    InvalidUsername,

    #[error("Missing search query")]
    MissingSearchQuery,

    #[error("{}", .resource.not_found_message())]
    NotFound { resource: Resource },

    #[error("GitHub rate limit exceeded")]
    RateLimited {
        reset: Option<String>,
        retry_after: Option<String>,
    },

    #[error("Access forbidden by GitHub")]
    Forbidden,

    #[error("GitHub rejected the request")]
    Unprocessable,

    #[error("GitHub is unavailable")]
    Unavailable { status: u16 },

    #[error("Unexpected GitHub response")]
    UnexpectedStatus { status: u16 },

    #[error("Unexpected GitHub response")]
    UpstreamDecode {
        #[source]
        source: serde_json::Error,
    },

    #[error("GitHub is unreachable")]
    Unreachable {
        #[source]
        source: GitHubRequestError,
    },

    #[error("Internal server error")]
    SerializeBody {
        #[source]
        source: serde_json::Error,
    },

    #[error("Internal server error")]
    ResponseBuild {
        #[source]
        source: axum::http::Error,
    },
}

impl RelayError {
    /// Connect failures, timeouts and half-read bodies all land here.
    pub fn unreachable(source: GitHubRequestError) -> Self {
        warn!("github request failed: {source}");
        RelayError::Unreachable { source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidUsername | RelayError::MissingSearchQuery => StatusCode::BAD_REQUEST,
            RelayError::NotFound { .. } => StatusCode::NOT_FOUND,
            RelayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            RelayError::Forbidden => StatusCode::FORBIDDEN,
            RelayError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::Unavailable { .. }
            | RelayError::UnexpectedStatus { .. }
            | RelayError::UpstreamDecode { .. }
            | RelayError::Unreachable { .. } => StatusCode::BAD_GATEWAY,
            RelayError::SerializeBody { .. } | RelayError::ResponseBuild { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Map a non-success upstream status onto the local vocabulary.
///
/// GitHub reports primary rate-limit exhaustion as 403 and secondary limits
/// as 429; both are recognized through `X-RateLimit-Remaining: 0`.
pub fn classify_upstream(
    resource: Resource,
    status: StatusCode,
    headers: &HeaderMap,
) -> RelayError {
    let header_string = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    match status.as_u16() {
        404 => RelayError::NotFound { resource },
        403 | 429 if header_string("x-ratelimit-remaining").as_deref() == Some("0") => {
            RelayError::RateLimited {
                reset: header_string("x-ratelimit-reset"),
                retry_after: header_string("retry-after"),
            }
        }
        429 => RelayError::RateLimited {
            reset: header_string("x-ratelimit-reset"),
            retry_after: header_string("retry-after"),
        },
        403 => RelayError::Forbidden,
        422 => RelayError::Unprocessable,
        status if (500..=599).contains(&status) => RelayError::Unavailable { status },
        status => RelayError::UnexpectedStatus { status },
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };

        let mut response = (status, Json(body)).into_response();

        // Keep the browser's retry accounting intact when GitHub throttled us.
        if let RelayError::RateLimited { reset, retry_after } = self {
            let headers = response.headers_mut();
            if let Some(value) = reset.and_then(|reset| HeaderValue::from_str(&reset).ok()) {
                headers.insert("x-ratelimit-reset", value);
            }
            if let Some(value) = retry_after.and_then(|after| HeaderValue::from_str(&after).ok()) {
                headers.insert("retry-after", value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for &(name, value) in pairs {
            headers.insert(name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn upstream_404_uses_resource_wording() {
        let err = classify_upstream(Resource::User, StatusCode::NOT_FOUND, &HeaderMap::new());
        assert_eq!(err.to_string(), "User not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = classify_upstream(Resource::Starred, StatusCode::NOT_FOUND, &HeaderMap::new());
        assert_eq!(err.to_string(), "Starred repos not found");
    }

    #[test]
    fn exhausted_403_becomes_rate_limited() {
        let err = classify_upstream(
            Resource::Repos,
            StatusCode::FORBIDDEN,
            &headers(&[
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1700000000"),
            ]),
        );

        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        match err {
            RelayError::RateLimited { reset, .. } => {
                assert_eq!(reset.as_deref(), Some("1700000000"));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn plain_403_stays_forbidden() {
        let err = classify_upstream(
            Resource::Repos,
            StatusCode::FORBIDDEN,
            &headers(&[("x-ratelimit-remaining", "12")]),
        );
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Access forbidden by GitHub");
    }

    #[test]
    fn upstream_429_is_rate_limited_even_with_budget_left() {
        let err = classify_upstream(
            Resource::Search,
            StatusCode::TOO_MANY_REQUESTS,
            &headers(&[("retry-after", "30")]),
        );
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn upstream_5xx_maps_to_bad_gateway() {
        let err = classify_upstream(
            Resource::User,
            StatusCode::SERVICE_UNAVAILABLE,
            &HeaderMap::new(),
        );
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "GitHub is unavailable");
    }

    #[test]
    fn upstream_422_maps_to_unprocessable() {
        let err = classify_upstream(
            Resource::Search,
            StatusCode::UNPROCESSABLE_ENTITY,
            &HeaderMap::new(),
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "GitHub rejected the request");
    }

    #[test]
    fn leftover_4xx_maps_to_bad_gateway() {
        let err = classify_upstream(Resource::User, StatusCode::GONE, &HeaderMap::new());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Unexpected GitHub response");
    }

    #[test]
    fn rate_limited_response_carries_reset_headers() {
        let response = RelayError::RateLimited {
            reset: Some("1700000000".to_string()),
            retry_after: Some("30".to_string()),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get("x-ratelimit-reset").unwrap(),
            "1700000000",
        );
        assert_eq!(response.headers().get("retry-after").unwrap(), "30");
    }
}
