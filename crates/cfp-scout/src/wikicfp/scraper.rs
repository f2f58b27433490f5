use async_trait::async_trait;
use reqwest::Client;

use super::parser::parse_event_table;
use crate::scraper::{ScraperError, Source, get_html};
use crate::types::Candidate;

/// WikiCFP event table, reached through a configurable endpoint.
#[derive(Debug, Clone)]
pub struct WikiCfp {
    client: Client,
    endpoint: String,
    base_url: String,
}

impl WikiCfp {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            base_url: super::BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl Source for WikiCfp {
    fn name(&self) -> &str {
        "WikiCFP"
    }

    async fn fetch_listings(&self) -> Result<Vec<Candidate>, ScraperError> {
        log::debug!("Fetching {}", self.endpoint);
        let html = get_html(&self.client, &self.endpoint).await?;
        Ok(parse_event_table(&html, &self.base_url)?)
    }
}
