use std::path::PathBuf;
use std::time::Duration;

use crate::filter::DEFAULT_KEYWORDS;

pub const DEFAULT_STORE_PATH: &str = "cfp_found.csv";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Construction-time settings for one discovery run.
#[derive(Debug, Clone)]
pub struct Config {
    pub keywords: Vec<String>,
    pub store_path: PathBuf,
    pub wikicfp_url: String,
    pub conferenceradar_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            wikicfp_url: crate::wikicfp::DEFAULT_ENDPOINT.to_string(),
            conferenceradar_url: crate::conferenceradar::DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
