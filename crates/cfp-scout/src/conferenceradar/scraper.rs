use async_trait::async_trait;
use reqwest::Client;

use super::parser::parse_search_results;
use crate::scraper::{ScraperError, Source, get_html};
use crate::types::Candidate;

/// ConferenceRadar keyword search, one results page per run.
#[derive(Debug, Clone)]
pub struct ConferenceRadar {
    client: Client,
    endpoint: String,
    base_url: String,
}

impl ConferenceRadar {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            base_url: super::BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl Source for ConferenceRadar {
    fn name(&self) -> &str {
        "ConferenceRadar"
    }

    async fn fetch_listings(&self) -> Result<Vec<Candidate>, ScraperError> {
        log::debug!("Fetching {}", self.endpoint);
        let html = get_html(&self.client, &self.endpoint).await?;
        Ok(parse_search_results(&html, &self.base_url)?)
    }
}
