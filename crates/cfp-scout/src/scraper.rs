use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::parser::ParseError;
use crate::types::Candidate;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

/// A listing site that yields call-for-papers candidates.
///
/// Implementors only provide [`Source::fetch_listings`]. Callers go through
/// [`Source::fetch`], which never fails: any error is logged and the source
/// contributes nothing to the run.
#[async_trait]
pub trait Source: Send + Sync {
    /// Short human-readable name used in logs and run summaries.
    fn name(&self) -> &str;

    async fn fetch_listings(&self) -> Result<Vec<Candidate>, ScraperError>;

    async fn fetch(&self) -> Vec<Candidate> {
        match self.fetch_listings().await {
            Ok(candidates) => {
                log::info!("{}: {} candidate(s) found", self.name(), candidates.len());
                candidates
            }
            Err(e) => {
                log::warn!("{} error: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}

pub fn build_client(timeout: Duration) -> Result<Client, ScraperError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(format!(
            "{}/{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))
        .build()?)
}

pub(crate) async fn get_html(client: &Client, url: &str) -> Result<String, ScraperError> {
    Ok(client
        .get(url)
        .send()
        .await
        .inspect_err(|e| log::debug!("HTTP error: {e:?}"))?
        .error_for_status()?
        .text()
        .await
        .inspect_err(|e| log::debug!("Decode error: {e:?}"))?)
}
