//! Data sources consumed by the feed and the detail loader.

mod cache;
mod mock;

use async_trait::async_trait;
use serde::Serialize;

pub use cache::MatchCache;
pub use mock::{MockSource, DEFAULT_LATENCY};

use crate::error::Result;
use crate::model::{FeedQuery, Match, MatchDetails, MatchEvent};

/// One slice of the fixtures matching a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub matches: Vec<Match>,
    /// Number of fixtures matching the query, across all pages.
    pub total_matching: usize,
}

impl Page {
    /// Slice an already filtered list of fixtures.
    pub fn from_filtered(filtered: impl IntoIterator<Item = Match>, offset: usize, limit: usize) -> Self {
        let filtered: Vec<Match> = filtered.into_iter().collect();
        let total_matching = filtered.len();
        let matches = filtered.into_iter().skip(offset).take(limit).collect();
        Self {
            matches,
            total_matching,
        }
    }

    pub fn has_more(&self, offset: usize, limit: usize) -> bool {
        offset + limit < self.total_matching
    }
}

/// Paged access to fixtures.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Fixtures matching `query`, starting at `offset`. Filters are applied
    /// before slicing, so offsets are relative to the filtered list.
    async fn fetch_page(&self, query: &FeedQuery, offset: usize, limit: usize) -> Result<Page>;
}

/// Per-fixture enrichment: details and timeline.
#[async_trait]
pub trait MatchDetailSource: Send + Sync {
    /// `Ok(None)` when the backend has no enriched record for `match_id`.
    async fn fetch_details(&self, match_id: &str) -> Result<Option<MatchDetails>>;

    /// `Ok(None)` when no timeline was recorded.
    async fn fetch_events(&self, match_id: &str) -> Result<Option<Vec<MatchEvent>>>;
}
