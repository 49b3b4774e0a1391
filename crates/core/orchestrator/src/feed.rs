use herald_core_config::{FeedConfig, FeedSelection};
use herald_types_events::RecordSource;

/// A polled endpoint as the orchestrator sees it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feed {
    /// Ledger key
    pub name: String,
    pub url: String,
    pub source: RecordSource,
    pub selection: FeedSelection,
    /// Leading elements inspected by `scan` feeds
    pub scan_depth: usize,
}

impl Feed {
    pub fn latest(name: impl Into<String>, url: impl Into<String>, source: RecordSource) -> Self {
        Self { name: name.into(), url: url.into(), source, selection: FeedSelection::Latest, scan_depth: 1 }
    }

    /// Newest-first feed. Ids are block numbers, so when several records share a
    /// block only the oldest one listed is published.
    pub fn scan(name: impl Into<String>, url: impl Into<String>, source: RecordSource, scan_depth: usize) -> Self {
        Self { name: name.into(), url: url.into(), source, selection: FeedSelection::Scan, scan_depth }
    }

    pub fn from_config(config: &FeedConfig, default_scan_depth: usize) -> Self {
        Self {
            name: config.name.clone(),
            url: config.url.clone(),
            source: config.source,
            selection: config.selection,
            scan_depth: config.scan_depth_or(default_scan_depth),
        }
    }
}
