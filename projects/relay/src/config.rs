use std::{env, num::ParseIntError, path::PathBuf, time::Duration};

use thiserror::Error;

/// Budget for one upstream round trip, matching the front-end's own abort
/// timeout so the relay never outlives the browser request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub public_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("InvalidPort: {source}")]
    InvalidPort {
        #[source]
        source: ParseIntError,
    },
}

impl Config {
    pub fn load() -> Result<Self, ConfigLoadError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|source| ConfigLoadError::InvalidPort { source })?,
            Err(_) => 3000,
        };

        let github_token = env::var("GITHUB_TOKEN").ok().filter(|token| !token.is_empty());

        let github_api_url = env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string());

        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        Ok(Self {
            port,
            github_token,
            github_api_url,
            public_dir,
        })
    }
}
