use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A listing as scraped from a source, before the pipeline has decided on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Canonical URL of the listing, the deduplication key.
    pub identifier: String,
    pub title: String,
    /// Free text, exactly as the source publishes it.
    pub date: String,
    pub location: String,
}

impl Candidate {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            date: date.into(),
            location: location.into(),
        }
    }
}

/// An accepted listing, as recorded in the history store.
///
/// Field order is the column order of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub identifier: String,
    pub title: String,
    pub date: String,
    pub location: String,
    pub discovered_at: NaiveDate,
}

impl Entry {
    pub fn accept(candidate: Candidate, discovered_at: NaiveDate) -> Self {
        Self {
            identifier: candidate.identifier,
            title: candidate.title,
            date: candidate.date,
            location: candidate.location,
            discovered_at,
        }
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)?;
        if !self.date.is_empty() {
            write!(f, " ({})", self.date)?;
        }
        if !self.location.is_empty() {
            write!(f, " @ {}", self.location)?;
        }
        write!(f, "\n     {}", self.identifier)
    }
}
