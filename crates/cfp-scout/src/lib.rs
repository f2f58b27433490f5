pub mod conferenceradar;
pub mod config;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod scraper;
pub mod store;
pub mod types;
pub mod wikicfp;

pub use config::Config;
pub use filter::KeywordFilter;
pub use pipeline::{Pipeline, RunSummary};
pub use scraper::{ScraperError, Source};
pub use store::{HistoryStore, StoreError};

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
