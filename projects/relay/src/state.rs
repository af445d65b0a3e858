use std::sync::Arc;

use interfaces_github_rest::index::{GitHubRestClient, NewGitHubRestClientError};
use thiserror::Error;

use crate::config::{Config, ConfigLoadError, UPSTREAM_TIMEOUT};

/// Shared handler state: the config and one reused GitHub client, so every
/// request rides the same connection pool.
pub struct RelayState {
    pub config: Config,
    pub github: GitHubRestClient,
}

#[derive(Debug, Error)]
pub enum StateInitError {
    #[error("ConfigLoad: {source}")]
    ConfigLoad {
        #[from]
        source: ConfigLoadError,
    },

    #[error("NewGitHubRestClient: {source}")]
    NewGitHubRestClient {
        #[from]
        source: NewGitHubRestClientError,
    },
}

impl RelayState {
    pub fn new() -> Result<Arc<Self>, StateInitError> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Arc<Self>, StateInitError> {
        let github = GitHubRestClient::new(
            &config.github_api_url,
            config.github_token.clone(),
            UPSTREAM_TIMEOUT,
        )?;

        Ok(Arc::new(Self { config, github }))
    }
}
