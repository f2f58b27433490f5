use std::collections::HashSet;
use std::fmt::Display;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::conferenceradar::ConferenceRadar;
use crate::filter::KeywordFilter;
use crate::scraper::{ScraperError, Source, build_client};
use crate::store::{HistoryStore, StoreError};
use crate::types::{Candidate, Entry};
use crate::wikicfp::WikiCfp;

/// Per-source counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub fetched: usize,
    pub relevant: usize,
    pub duplicates: usize,
    pub accepted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_date: NaiveDate,
    pub sources: Vec<SourceReport>,
    /// Newly recorded entries, in acceptance order.
    pub accepted: Vec<Entry>,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for report in &self.sources {
            writeln!(
                f,
                "  {:<16} fetched {:>3} | relevant {:>3} | already seen {:>3} | new {:>3}",
                report.source, report.fetched, report.relevant, report.duplicates, report.accepted
            )?;
        }

        if self.accepted.is_empty() {
            return write!(f, "No new CFP found.");
        }

        writeln!(f)?;
        for (i, entry) in self.accepted.iter().enumerate() {
            writeln!(f, "{:>3}. {}", i + 1, entry)?;
        }
        write!(f, "{} new CFP(s) added.", self.accepted.len())
    }
}

/// Fetch, filter, dedupe, append.
///
/// Sources are queried one at a time in the order they were added. The first
/// source to produce an identifier wins it for the run.
pub struct Pipeline {
    store: HistoryStore,
    filter: KeywordFilter,
    sources: Vec<Box<dyn Source>>,
}

impl Pipeline {
    pub fn new(store: HistoryStore, filter: KeywordFilter) -> Self {
        Self {
            store,
            filter,
            sources: Vec::new(),
        }
    }

    /// WikiCFP then ConferenceRadar, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, ScraperError> {
        let client = build_client(config.timeout)?;

        Ok(Self::new(
            HistoryStore::new(&config.store_path),
            KeywordFilter::new(&config.keywords),
        )
        .with_source(WikiCfp::new(client.clone(), &config.wikicfp_url))
        .with_source(ConferenceRadar::new(client, &config.conferenceradar_url)))
    }

    pub fn with_source(mut self, source: impl Source + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// One full discovery pass. Source failures only shrink the result;
    /// store failures abort the run.
    pub async fn run(&self, run_date: NaiveDate) -> Result<RunSummary, StoreError> {
        let mut known = self.store.load()?;
        log::info!("{} CFP(s) already recorded", known.len());

        let mut accepted = Vec::new();
        let mut reports = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let candidates = source.fetch().await;
            let report = self.select(
                source.name(),
                candidates,
                &mut known,
                run_date,
                &mut accepted,
            );
            reports.push(report);
        }

        if accepted.is_empty() {
            log::info!("Nothing new to record");
        } else {
            self.store.append(&accepted)?;
            log::info!(
                "Recorded {} new CFP(s) in {:?}",
                accepted.len(),
                self.store.path()
            );
        }

        Ok(RunSummary {
            run_date,
            sources: reports,
            accepted,
        })
    }

    fn select(
        &self,
        source: &str,
        candidates: Vec<Candidate>,
        known: &mut HashSet<String>,
        run_date: NaiveDate,
        accepted: &mut Vec<Entry>,
    ) -> SourceReport {
        let mut report = SourceReport {
            source: source.to_string(),
            fetched: candidates.len(),
            ..Default::default()
        };

        for candidate in candidates {
            let Some(keyword) = self.filter.matched_keyword(&candidate.title) else {
                log::debug!("Not relevant: '{}'", candidate.title);
                continue;
            };
            report.relevant += 1;

            if !known.insert(candidate.identifier.clone()) {
                log::debug!("Already seen: {}", candidate.identifier);
                report.duplicates += 1;
                continue;
            }

            log::debug!("Accepted '{}' (matched '{}')", candidate.title, keyword);
            report.accepted += 1;
            accepted.push(Entry::accept(candidate, run_date));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Listing {
        name: &'static str,
        candidates: Vec<Candidate>,
        calls: Arc<AtomicUsize>,
    }

    impl Listing {
        fn new(name: &'static str, candidates: Vec<Candidate>) -> Self {
            Self {
                name,
                candidates,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Source for Listing {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_listings(&self) -> Result<Vec<Candidate>, ScraperError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }
    }

    struct Outage;

    #[async_trait]
    impl Source for Outage {
        fn name(&self) -> &str {
            "outage"
        }

        async fn fetch_listings(&self) -> Result<Vec<Candidate>, ScraperError> {
            Err(ParseError::MissingStructure("event items".to_string()).into())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn cfp(id: &str, title: &str) -> Candidate {
        Candidate::new(format!("https://cfp.example/{id}"), title, "2026", "")
    }

    fn pipeline(dir: &tempfile::TempDir) -> Pipeline {
        Pipeline::new(
            HistoryStore::new(dir.path().join("cfp_found.csv")),
            KeywordFilter::default(),
        )
    }

    #[tokio::test]
    async fn test_relevant_candidates_are_accepted_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(&dir).with_source(Listing::new(
            "radar",
            vec![
                cfp("1", "Global Supply Chains Summit 2025"),
                cfp("2", "Annual Bake Sale"),
            ],
        ));

        let summary = pipeline.run(day(19)).await.unwrap();

        assert_eq!(summary.accepted.len(), 1);
        let entry = &summary.accepted[0];
        assert_eq!(entry.identifier, "https://cfp.example/1");
        assert_eq!(entry.discovered_at, day(19));
        assert_eq!(
            summary.sources,
            vec![SourceReport {
                source: "radar".to_string(),
                fetched: 2,
                relevant: 1,
                duplicates: 0,
                accepted: 1,
            }]
        );
        assert_eq!(pipeline.store().records().unwrap(), summary.accepted);
    }

    #[tokio::test]
    async fn test_second_run_over_same_listings_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let listings = vec![
            cfp("1", "International Trade Conference"),
            cfp("2", "Port Logistics Workshop"),
        ];
        let pipeline = pipeline(&dir).with_source(Listing::new("wiki", listings));

        let first = pipeline.run(day(18)).await.unwrap();
        let second = pipeline.run(day(19)).await.unwrap();

        assert_eq!(first.accepted.len(), 2);
        assert!(second.is_empty());
        assert_eq!(second.sources[0].duplicates, 2);
        assert_eq!(pipeline.store().records().unwrap(), first.accepted);
    }

    #[tokio::test]
    async fn test_first_source_wins_duplicate_identifier_within_run() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(&dir)
            .with_source(Listing::new("wiki", vec![cfp("same", "World Economy Forum")]))
            .with_source(Listing::new(
                "radar",
                vec![cfp("same", "World Economy Forum (mirror)")],
            ));

        let summary = pipeline.run(day(19)).await.unwrap();

        assert_eq!(summary.accepted.len(), 1);
        assert_eq!(summary.accepted[0].title, "World Economy Forum");
        assert_eq!(summary.sources[1].duplicates, 1);
        assert_eq!(summary.sources[1].accepted, 0);
    }

    #[tokio::test]
    async fn test_substring_keyword_match_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(
            HistoryStore::new(dir.path().join("cfp_found.csv")),
            KeywordFilter::new(["trade"]),
        )
        .with_source(Listing::new(
            "wiki",
            vec![cfp("1", "Retrade Expo"), cfp("2", "Annual Bake Sale")],
        ));

        let summary = pipeline.run(day(19)).await.unwrap();

        assert_eq!(summary.accepted.len(), 1);
        assert_eq!(summary.accepted[0].title, "Retrade Expo");
    }

    #[tokio::test]
    async fn test_failing_source_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(&dir)
            .with_source(Outage)
            .with_source(Listing::new("radar", vec![cfp("1", "Trade Policy Forum")]));

        let summary = pipeline.run(day(19)).await.unwrap();

        assert_eq!(summary.sources[0].fetched, 0);
        assert_eq!(summary.accepted.len(), 1);
        assert_eq!(pipeline.store().load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_is_appended_after_existing_history_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("cfp_found.csv"));
        let existing = vec![
            Entry::accept(cfp("a", "World Economy A"), day(1)),
            Entry::accept(cfp("b", "World Economy B"), day(2)),
        ];
        store.append(&existing).unwrap();

        let pipeline = pipeline(&dir)
            .with_source(Listing::new(
                "wiki",
                vec![cfp("c", "World Economy C"), cfp("a", "World Economy A")],
            ))
            .with_source(Listing::new("radar", vec![cfp("d", "World Economy D")]));

        pipeline.run(day(19)).await.unwrap();

        let ids: Vec<_> = store
            .records()
            .unwrap()
            .into_iter()
            .map(|e| e.identifier)
            .collect();
        assert_eq!(
            ids,
            [
                "https://cfp.example/a",
                "https://cfp.example/b",
                "https://cfp.example/c",
                "https://cfp.example/d",
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_store_aborts_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cfp_found.csv"), "not,a,history,file\n").unwrap();
        let source = Listing::new("wiki", vec![cfp("1", "World Economy Forum")]);
        let calls = source.calls.clone();
        let pipeline = pipeline(&dir).with_source(source);

        let result = pipeline.run(day(19)).await;

        assert!(matches!(result, Err(StoreError::Malformed { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    /// Occupies the store path with a directory while the run is fetching.
    struct BlocksStore {
        store_path: std::path::PathBuf,
    }

    #[async_trait]
    impl Source for BlocksStore {
        fn name(&self) -> &str {
            "blocks-store"
        }

        async fn fetch_listings(&self) -> Result<Vec<Candidate>, ScraperError> {
            std::fs::create_dir_all(&self.store_path).unwrap();
            Ok(vec![cfp("1", "International Trade Conference")])
        }
    }

    #[tokio::test]
    async fn test_store_write_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("cfp_found.csv");
        let pipeline = pipeline(&dir).with_source(BlocksStore {
            store_path: store_path.clone(),
        });

        let result = pipeline.run(day(19)).await;

        assert!(matches!(result, Err(StoreError::Write { .. })));
        assert!(store_path.is_dir());
    }

    #[tokio::test]
    async fn test_empty_run_leaves_no_store_behind() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(&dir).with_source(Outage);

        let summary = pipeline.run(day(19)).await.unwrap();

        assert!(summary.is_empty());
        assert!(summary.to_string().ends_with("No new CFP found."));
        assert!(!pipeline.store().path().exists());
    }

    #[test]
    fn test_summary_display_lists_new_entries() {
        let summary = RunSummary {
            run_date: day(19),
            sources: vec![SourceReport {
                source: "WikiCFP".to_string(),
                fetched: 3,
                relevant: 1,
                duplicates: 0,
                accepted: 1,
            }],
            accepted: vec![Entry::accept(cfp("1", "World Economy Forum"), day(19))],
        };

        let text = summary.to_string();

        assert!(text.contains("1. World Economy Forum (2026)"));
        assert!(text.contains("https://cfp.example/1"));
        assert!(text.ends_with("1 new CFP(s) added."));
    }

    #[test]
    fn test_from_config_wires_sources_in_order() {
        let pipeline = Pipeline::from_config(&Config::default()).unwrap();

        let names: Vec<_> = pipeline.sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["WikiCFP", "ConferenceRadar"]);
        assert_eq!(pipeline.store().path(), std::path::Path::new("cfp_found.csv"));
    }
}
