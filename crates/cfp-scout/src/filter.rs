pub const DEFAULT_KEYWORDS: &[&str] = &[
    "international economics",
    "global logistics",
    "supply chain",
    "trade policy",
    "international trade",
    "logistics management",
    "global supply chains",
    "transportation economics",
    "port logistics",
    "cross-border logistics",
    "world economy",
];

/// Case-insensitive substring match of a title against a keyword list.
///
/// Matching is deliberately not word-bounded: with the keyword `trade`,
/// the title `Retrade Expo` is relevant.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn matches(&self, title: &str) -> bool {
        self.matched_keyword(title).is_some()
    }

    /// First keyword, in configured order, contained in `title`.
    pub fn matched_keyword(&self, title: &str) -> Option<&str> {
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .find(|k| title.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl Default for KeywordFilter {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}
