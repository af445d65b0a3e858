use std::time::Duration;

use reqwest::{
    header::HeaderMap,
    Client, StatusCode,
};
use serde::Deserialize;
use thiserror::Error;

const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "github-checker-relay";

/// Raw outcome of one GitHub REST call. The relay forwards these pieces
/// without interpreting the body.
pub struct GitHubRestResult {
    pub body: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Body shape of `GET /rate_limit`; only the `rate` object is relayed.
#[derive(Deserialize)]
pub struct RateLimitBody {
    pub rate: serde_json::Value,
}

/// Body shape of `GET /search/users`; only `items` is relayed.
#[derive(Deserialize)]
pub struct SearchUsersBody {
    pub items: Vec<serde_json::Value>,
}

pub struct GitHubRestClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Error)]
pub enum NewGitHubRestClientError {
    #[error("ClientBuild: {source}")]
    ClientBuild {
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum GitHubRequestError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

impl GitHubRestClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NewGitHubRestClientError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| NewGitHubRestClientError::ClientBuild { source })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// One GET against the GitHub REST API.
    ///
    /// `conditional` carries the browser's `If-None-Match` / `If-Modified-Since`
    /// headers so upstream can answer 304.
    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
        conditional: &HeaderMap,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        let mut request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);

        if !query.is_empty() {
            request = request.query(query);
        }

        for (name, value) in conditional {
            request = request.header(name, value);
        }

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| GitHubRequestError::RequestSend { source })?;

        let status = response.status();
        let headers = response.headers().clone();

        let body = response
            .text()
            .await
            .map_err(|source| GitHubRequestError::ResponseRead { source })?;

        Ok(GitHubRestResult {
            body,
            status,
            headers,
        })
    }

    pub async fn fetch_user(
        &self,
        username: &str,
        conditional: &HeaderMap,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        self.get(&format!("/users/{username}"), &[], conditional)
            .await
    }

    pub async fn fetch_user_repos(
        &self,
        username: &str,
        query: &[(String, String)],
        conditional: &HeaderMap,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        self.get(&format!("/users/{username}/repos"), query, conditional)
            .await
    }

    pub async fn fetch_user_starred(
        &self,
        username: &str,
        query: &[(String, String)],
        conditional: &HeaderMap,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        self.get(&format!("/users/{username}/starred"), query, conditional)
            .await
    }

    /// Public timeline only; the relay never acts as the viewed user.
    pub async fn fetch_user_events(
        &self,
        username: &str,
        query: &[(String, String)],
        conditional: &HeaderMap,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        self.get(&format!("/users/{username}/events/public"), query, conditional)
            .await
    }

    pub async fn fetch_user_followers(
        &self,
        username: &str,
        query: &[(String, String)],
        conditional: &HeaderMap,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        self.get(&format!("/users/{username}/followers"), query, conditional)
            .await
    }

    pub async fn fetch_user_following(
        &self,
        username: &str,
        query: &[(String, String)],
        conditional: &HeaderMap,
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        self.get(&format!("/users/{username}/following"), query, conditional)
            .await
    }

    pub async fn search_users(
        &self,
        query: &[(String, String)],
    ) -> Result<GitHubRestResult, GitHubRequestError> {
        self.get("/search/users", query, &HeaderMap::new()).await
    }

    pub async fn fetch_rate_limit(&self) -> Result<GitHubRestResult, GitHubRequestError> {
        self.get("/rate_limit", &[], &HeaderMap::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        http::HeaderMap as AxumHeaderMap,
        routing::get,
        Json, Router,
    };
    use reqwest::header::HeaderValue;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve app");
        });
        format!("http://{addr}")
    }

    fn echo_headers_app() -> Router {
        Router::new().route(
            "/users/octocat",
            get(|headers: AxumHeaderMap| async move {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string)
                };
                Json(serde_json::json!({
                    "accept": header("accept"),
                    "api_version": header("x-github-api-version"),
                    "authorization": header("authorization"),
                    "if_none_match": header("if-none-match"),
                    "user_agent": header("user-agent"),
                }))
            }),
        )
    }

    #[tokio::test]
    async fn get_sends_github_headers_and_bearer_token() {
        let base = spawn(echo_headers_app()).await;
        let client = GitHubRestClient::new(&base, Some("sekrit".to_string()), Duration::from_secs(5))
            .expect("build client");

        let mut conditional = HeaderMap::new();
        conditional.insert("if-none-match", HeaderValue::from_static("\"abc\""));

        let result = client.fetch_user("octocat", &conditional).await.expect("fetch user");
        assert_eq!(result.status, StatusCode::OK);

        let seen: serde_json::Value = serde_json::from_str(&result.body).expect("parse body");
        assert_eq!(seen["accept"], "application/vnd.github+json");
        assert_eq!(seen["api_version"], GITHUB_API_VERSION);
        assert_eq!(seen["authorization"], "Bearer sekrit");
        assert_eq!(seen["if_none_match"], "\"abc\"");
        assert_eq!(seen["user_agent"], USER_AGENT);
    }

    #[tokio::test]
    async fn get_without_token_sends_no_authorization() {
        let base = spawn(echo_headers_app()).await;
        let client =
            GitHubRestClient::new(&base, None, Duration::from_secs(5)).expect("build client");

        let result = client
            .fetch_user("octocat", &HeaderMap::new())
            .await
            .expect("fetch user");

        let seen: serde_json::Value = serde_json::from_str(&result.body).expect("parse body");
        assert_eq!(seen["authorization"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn get_relays_status_headers_and_body() {
        let app = Router::new().route(
            "/users/ghost",
            get(|| async {
                (
                    axum::http::StatusCode::NOT_FOUND,
                    [("x-ratelimit-remaining", "42")],
                    Json(serde_json::json!({"message": "Not Found"})),
                )
            }),
        );
        let base = spawn(app).await;
        let client =
            GitHubRestClient::new(&base, None, Duration::from_secs(5)).expect("build client");

        let result = client
            .fetch_user("ghost", &HeaderMap::new())
            .await
            .expect("fetch user");

        assert_eq!(result.status, StatusCode::NOT_FOUND);
        assert_eq!(
            result.headers.get("x-ratelimit-remaining").map(|v| v.to_str().unwrap()),
            Some("42"),
        );
        assert!(result.body.contains("Not Found"));
    }

    #[tokio::test]
    async fn query_parameters_are_appended() {
        let app = Router::new().route(
            "/search/users",
            get(
                |axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                    query.unwrap_or_default()
                },
            ),
        );
        let base = spawn(app).await;
        let client =
            GitHubRestClient::new(&base, None, Duration::from_secs(5)).expect("build client");

        let query = vec![
            ("q".to_string(), "tom repos:>42".to_string()),
            ("per_page".to_string(), "5".to_string()),
        ];
        let result = client.search_users(&query).await.expect("search users");

        assert_eq!(result.body, "q=tom+repos%3A%3E42&per_page=5");
    }
}
