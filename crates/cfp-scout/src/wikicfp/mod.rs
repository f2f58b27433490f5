mod parser;
pub mod scraper;

pub use scraper::WikiCfp;

pub const DEFAULT_ENDPOINT: &str = "https://web.archive.org/web/20240101000000*/http://www.wikicfp.com/cfp/servlet/event.showcfp?eventid=90000";

pub(crate) const BASE_URL: &str = "https://wikicfp.com";
