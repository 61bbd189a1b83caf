//! Remote catalog fetching.
//!
//! Each remote index is a single unauthenticated GET returning the full
//! catalog as one JSON array.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Cask, Formula};
use crate::config::SyncConfig;

/// Errors from fetching a remote catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or undecodable body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

/// Trait for fetching the two remote catalogs.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch_formulae(&self) -> Result<Vec<Formula>, FetchError>;

    async fn fetch_casks(&self) -> Result<Vec<Cask>, FetchError>;
}

/// HTTP catalog fetcher backed by the Homebrew formulae API.
pub struct HttpCatalogFetcher {
    client: Client,
    formula_url: String,
    cask_url: String,
}

impl HttpCatalogFetcher {
    pub fn new(config: &SyncConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            formula_url: config.formula_url.clone(),
            cask_url: config.cask_url.clone(),
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Vec<T>, FetchError> {
        debug!("Fetching catalog from {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let records: Vec<T> = response.json().await?;
        debug!("Fetched {} records from {}", records.len(), url);
        Ok(records)
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch_formulae(&self) -> Result<Vec<Formula>, FetchError> {
        self.fetch_json(&self.formula_url).await
    }

    async fn fetch_casks(&self) -> Result<Vec<Cask>, FetchError> {
        self.fetch_json(&self.cask_url).await
    }
}
