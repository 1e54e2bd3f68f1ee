//! Search backend seam and its HTTP implementation.

use std::future::Future;
use thiserror::Error;
use url::Url;

use crate::search::auth::AuthMode;
use crate::search::registrar::{QueryRegistrar, RegistrationError};
use crate::search::types::{SearchQuery, SearchResult};

/// Path of the query handler relative to the search root.
pub const QUERY_PATH: &str = "camli/search/query";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The remote search service, as seen by the refresh cache.
pub trait SearchBackend: Send + Sync + 'static {
    /// Register `query` as the standing query.
    fn register(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<(), RegistrationError>> + Send;

    /// Execute `query` and return matched, described blobs.
    fn query(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResult, SearchError>> + Send;
}

/// Talks to the blob store over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: reqwest::Client,
    auth: AuthMode,
    query_url: Url,
    registrar: QueryRegistrar,
}

impl HttpSearchBackend {
    pub fn new(
        client: reqwest::Client,
        auth: AuthMode,
        search_root: &Url,
        registration_url: Url,
    ) -> Result<Self, SearchError> {
        let query_url = search_root.join(QUERY_PATH)?;
        let registrar = QueryRegistrar::new(client.clone(), auth.clone(), registration_url);

        Ok(Self {
            client,
            auth,
            query_url,
            registrar,
        })
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }
}

impl SearchBackend for HttpSearchBackend {
    async fn register(&self, query: &SearchQuery) -> Result<(), RegistrationError> {
        self.registrar.register(query).await
    }

    async fn query(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        let request = self.client.post(self.query_url.clone()).json(query);
        let response = self.auth.apply(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        Ok(response.json::<SearchResult>().await?)
    }
}
