//! Registration of the standing query with the app handler.

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::search::auth::AuthMode;
use crate::search::types::SearchQuery;

/// Body the app handler answers with when it accepted the query.
pub const ACKNOWLEDGEMENT: &str = "OK";

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("failed to serialize query: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("registration request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("query rejected by app handler ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Posts the standing query once to the registration endpoint.
#[derive(Debug, Clone)]
pub struct QueryRegistrar {
    client: reqwest::Client,
    auth: AuthMode,
    endpoint: Url,
}

impl QueryRegistrar {
    pub fn new(client: reqwest::Client, auth: AuthMode, endpoint: Url) -> Self {
        Self {
            client,
            auth,
            endpoint,
        }
    }

    pub async fn register(&self, query: &SearchQuery) -> Result<(), RegistrationError> {
        let body = serde_json::to_vec(query)?;
        let request = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        let response = self.auth.apply(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        check_acknowledgement(status, body)?;
        tracing::info!(endpoint = %self.endpoint, "Standing query registered");
        Ok(())
    }
}

/// Accept only a 2xx response whose body is exactly the acknowledgement.
pub fn check_acknowledgement(status: StatusCode, body: String) -> Result<(), RegistrationError> {
    if status.is_success() && body == ACKNOWLEDGEMENT {
        Ok(())
    } else {
        Err(RegistrationError::Rejected { status, body })
    }
}
