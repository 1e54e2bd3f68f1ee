//! Startup configuration loading from the remote config endpoint.

use thiserror::Error;
use url::Url;

use crate::config::schema::{Config, RemoteConfig, CONFIG_URL_ENV, MASTERQUERY_URL_ENV};
use crate::resilience::{retry_until_deadline, BackoffPolicy, DeadlineExceeded};
use crate::search::AuthMode;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("audio player needs a {0} env var")]
    MissingEnv(&'static str),

    #[error("invalid URL in {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },

    #[error("giving up on app config at {url}: {source}")]
    DeadlineExceeded {
        url: Url,
        source: DeadlineExceeded<reqwest::Error>,
    },
}

/// Fetches the app config, retrying with backoff until the deadline.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    client: reqwest::Client,
    auth: AuthMode,
    policy: BackoffPolicy,
}

impl ConfigLoader {
    pub fn new(client: reqwest::Client, auth: AuthMode) -> Self {
        Self {
            client,
            auth,
            policy: BackoffPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve both endpoints, then fetch the remote document.
    ///
    /// Missing or malformed endpoints fail at once; only the fetch retries.
    pub async fn load(
        &self,
        config_endpoint: Option<&str>,
        query_endpoint: Option<&str>,
    ) -> Result<Config, ConfigError> {
        let config_endpoint = required_url(CONFIG_URL_ENV, config_endpoint)?;
        let query_endpoint = required_url(MASTERQUERY_URL_ENV, query_endpoint)?;

        let remote = retry_until_deadline(&self.policy, "app config", || self.fetch(&config_endpoint))
            .await
            .map_err(|source| ConfigError::DeadlineExceeded {
                url: config_endpoint.clone(),
                source,
            })?;

        let mut search_root = remote.search_root;
        if !search_root.path().ends_with('/') {
            let path = format!("{}/", search_root.path());
            search_root.set_path(&path);
        }

        tracing::info!(
            config_endpoint = %config_endpoint,
            query_endpoint = %query_endpoint,
            search_root = %search_root,
            "App config loaded"
        );

        Ok(Config {
            config_endpoint,
            query_endpoint,
            search_root,
        })
    }

    async fn fetch(&self, url: &Url) -> Result<RemoteConfig, reqwest::Error> {
        let request = self.client.get(url.clone());
        self.auth
            .apply(request)
            .send()
            .await?
            .error_for_status()?
            .json::<RemoteConfig>()
            .await
    }
}

fn required_url(name: &'static str, value: Option<&str>) -> Result<Url, ConfigError> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingEnv(name))?;
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })
}
