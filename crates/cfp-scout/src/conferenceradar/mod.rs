mod parser;
pub mod scraper;

pub use scraper::ConferenceRadar;

pub const DEFAULT_ENDPOINT: &str =
    "https://www.conferenceradar.com/search?q=international+economics+OR+logistics";

pub(crate) const BASE_URL: &str = "https://www.conferenceradar.com";
